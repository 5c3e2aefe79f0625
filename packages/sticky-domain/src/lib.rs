pub mod codec;
pub mod note;
pub mod owner;
pub mod pin;
