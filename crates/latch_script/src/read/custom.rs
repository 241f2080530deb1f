//! Destinations that decode themselves from JSON text.

use crate::read::{BoxError, CustomDecode, Decode, Slot};
use serde::de::DeserializeOwned;

/// Reads any `serde` type through the engine's `JSON.stringify` output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned> CustomDecode for Json<T> {
    fn decode_json(&mut self, json: &str) -> Result<(), BoxError> {
        self.0 = serde_json::from_str(json)?;
        Ok(())
    }
}

impl<T: DeserializeOwned + Default> Decode for Json<T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Custom(self)
    }

    fn zero() -> Self {
        Json(T::default())
    }
}

/// The JSON text of a value, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawJson(pub String);

impl RawJson {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CustomDecode for RawJson {
    fn decode_json(&mut self, json: &str) -> Result<(), BoxError> {
        self.0.clear();
        self.0.push_str(json);
        Ok(())
    }
}

impl Decode for RawJson {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Custom(self)
    }

    fn zero() -> Self {
        Self::default()
    }
}

impl CustomDecode for serde_json::Value {
    fn decode_json(&mut self, json: &str) -> Result<(), BoxError> {
        *self = serde_json::from_str(json)?;
        Ok(())
    }
}

impl Decode for serde_json::Value {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Custom(self)
    }

    fn zero() -> Self {
        serde_json::Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_wrapper_deserializes() {
        let mut numbers: Json<Vec<u32>> = Json::default();
        numbers.decode_json("[1, 2, 3]").unwrap();
        assert_eq!(numbers.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn json_wrapper_reports_bad_input() {
        let mut numbers: Json<Vec<u32>> = Json::default();
        assert!(numbers.decode_json("{\"a\": 1}").is_err());
    }

    #[test]
    fn raw_json_is_verbatim() {
        let mut raw = RawJson("stale".to_string());
        raw.decode_json("{\"a\":[1,2]}").unwrap();
        assert_eq!(raw.as_str(), "{\"a\":[1,2]}");
    }
}
