//! Serde support for partial-update payloads.
//!
//! A field typed `Option<Option<T>>` and annotated with
//! `#[serde(default, deserialize_with = "crate::patch::deserialize_some")]` reads as:
//! - `None`: the key was absent, leave the column alone;
//! - `Some(None)`: the key was `null`;
//! - `Some(Some(value))`: the key carried a value.

use serde::{Deserialize, Deserializer};

pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
	T: Deserialize<'de>,
	D: Deserializer<'de>,
{
	T::deserialize(deserializer).map(Some)
}
