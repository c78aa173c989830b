use serde::Serialize;
use serde::ser::Impossible;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// A value read back from a storage area.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    /// The stored text was a JSON document.
    Json(Value),
    /// The stored text was not JSON and is returned as written.
    Raw(String),
}

impl Fetched {
    /// Decodes stored text, keeping it verbatim when it is not JSON.
    pub fn decode(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(value) => Fetched::Json(value),
            Err(_) => Fetched::Raw(raw),
        }
    }

    /// Converts into a JSON value, a raw string becoming a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            Fetched::Json(value) => value,
            Fetched::Raw(raw) => Value::String(raw),
        }
    }

    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(self.into_value()).map_err(Error::Decode)
    }
}

/// Text form of a value as it is handed to a storage area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    /// JSON text of an array or object.
    Structured(String),
    /// Literal form of a primitive, as a storage area would coerce it.
    Scalar(String),
}

impl Encoded {
    pub fn as_str(&self) -> &str {
        match self {
            Encoded::Structured(text) | Encoded::Scalar(text) => text,
        }
    }
}

pub(crate) fn is_structured(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Encoded> {
    // serde_json turns NaN and infinities into null, so floats are caught first
    if let Ok(Some(text)) = value.serialize(FloatLiteral) {
        return Ok(Encoded::Scalar(text));
    }

    let value = serde_json::to_value(value).map_err(Error::Encode)?;

    if is_structured(&value) {
        let text = serde_json::to_string(&value).map_err(Error::Encode)?;
        return Ok(Encoded::Structured(text));
    }

    // Null, booleans and numbers print the same as JSON and as literals
    let text = match value {
        Value::String(s) => s,
        other => other.to_string(),
    };

    Ok(Encoded::Scalar(text))
}

/// Host coercion of a float: `NaN`, `Infinity`, `-Infinity`, otherwise the
/// shortest decimal form without a trailing `.0`.
fn float_text(value: f64, finite: String) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        finite
    }
}

/// Yields the literal form of a top-level float, `None` for anything else.
struct FloatLiteral;

type Probe = core::result::Result<Option<String>, serde_json::Error>;

fn not_float() -> serde_json::Error {
    serde::ser::Error::custom("not a float")
}

impl serde::Serializer for FloatLiteral {
    type Ok = Option<String>;
    type Error = serde_json::Error;
    type SerializeSeq = Impossible<Option<String>, serde_json::Error>;
    type SerializeTuple = Impossible<Option<String>, serde_json::Error>;
    type SerializeTupleStruct = Impossible<Option<String>, serde_json::Error>;
    type SerializeTupleVariant = Impossible<Option<String>, serde_json::Error>;
    type SerializeMap = Impossible<Option<String>, serde_json::Error>;
    type SerializeStruct = Impossible<Option<String>, serde_json::Error>;
    type SerializeStructVariant = Impossible<Option<String>, serde_json::Error>;

    fn serialize_f32(self, v: f32) -> Probe {
        Ok(Some(float_text(f64::from(v), v.to_string())))
    }

    fn serialize_f64(self, v: f64) -> Probe {
        Ok(Some(float_text(v, v.to_string())))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Probe {
        value.serialize(self)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(self, _name: &'static str, value: &T) -> Probe {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Probe {
        Ok(None)
    }

    fn serialize_i8(self, _v: i8) -> Probe {
        Ok(None)
    }

    fn serialize_i16(self, _v: i16) -> Probe {
        Ok(None)
    }

    fn serialize_i32(self, _v: i32) -> Probe {
        Ok(None)
    }

    fn serialize_i64(self, _v: i64) -> Probe {
        Ok(None)
    }

    fn serialize_u8(self, _v: u8) -> Probe {
        Ok(None)
    }

    fn serialize_u16(self, _v: u16) -> Probe {
        Ok(None)
    }

    fn serialize_u32(self, _v: u32) -> Probe {
        Ok(None)
    }

    fn serialize_u64(self, _v: u64) -> Probe {
        Ok(None)
    }

    fn serialize_char(self, _v: char) -> Probe {
        Ok(None)
    }

    fn serialize_str(self, _v: &str) -> Probe {
        Ok(None)
    }

    fn serialize_bytes(self, _v: &[u8]) -> Probe {
        Ok(None)
    }

    fn serialize_none(self) -> Probe {
        Ok(None)
    }

    fn serialize_unit(self) -> Probe {
        Ok(None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Probe {
        Ok(None)
    }

    fn serialize_unit_variant(self, _name: &'static str, _index: u32, _variant: &'static str) -> Probe {
        Ok(None)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Probe {
        Ok(None)
    }

    fn serialize_seq(self, _len: Option<usize>) -> core::result::Result<Self::SerializeSeq, Self::Error> {
        Err(not_float())
    }

    fn serialize_tuple(self, _len: usize) -> core::result::Result<Self::SerializeTuple, Self::Error> {
        Err(not_float())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> core::result::Result<Self::SerializeTupleStruct, Self::Error> {
        Err(not_float())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> core::result::Result<Self::SerializeTupleVariant, Self::Error> {
        Err(not_float())
    }

    fn serialize_map(self, _len: Option<usize>) -> core::result::Result<Self::SerializeMap, Self::Error> {
        Err(not_float())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> core::result::Result<Self::SerializeStruct, Self::Error> {
        Err(not_float())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> core::result::Result<Self::SerializeStructVariant, Self::Error> {
        Err(not_float())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Form {
        id: u32,
        name: String,
    }

    #[test]
    fn test_is_structured() {
        assert!(is_structured(&json!(["id", 1, "name", "new"])));
        assert!(is_structured(&json!({"id": 1, "name": "new"})));
        assert!(is_structured(&json!([])));
        assert!(is_structured(&json!({})));

        assert!(!is_structured(&json!(null)));
        assert!(!is_structured(&json!(42)));
        assert!(!is_structured(&json!(true)));
        assert!(!is_structured(&json!("only")));
    }

    #[test]
    fn test_encode_structured() {
        let encoded = encode(&Form { id: 1, name: "new".into() }).unwrap();
        assert_eq!(encoded, Encoded::Structured(r#"{"id":1,"name":"new"}"#.into()));

        let encoded = encode(&vec![1, 2, 3]).unwrap();
        assert_eq!(encoded, Encoded::Structured("[1,2,3]".into()));
    }

    #[test]
    fn test_encode_scalar_literal_form() {
        assert_eq!(encode("only").unwrap(), Encoded::Scalar("only".into()));
        assert_eq!(encode(&42).unwrap(), Encoded::Scalar("42".into()));
        assert_eq!(encode(&1.5).unwrap(), Encoded::Scalar("1.5".into()));
        assert_eq!(encode(&false).unwrap(), Encoded::Scalar("false".into()));
        assert_eq!(encode(&()).unwrap(), Encoded::Scalar("null".into()));
        assert_eq!(encode(&None::<u8>).unwrap(), Encoded::Scalar("null".into()));
    }

    #[test]
    fn test_encode_float_host_form() {
        assert_eq!(encode(&1.0f64).unwrap(), Encoded::Scalar("1".into()));
        assert_eq!(encode(&-0.25f64).unwrap(), Encoded::Scalar("-0.25".into()));
        assert_eq!(encode(&0.1f32).unwrap(), Encoded::Scalar("0.1".into()));
        assert_eq!(encode(&f64::NAN).unwrap(), Encoded::Scalar("NaN".into()));
        assert_eq!(encode(&f64::INFINITY).unwrap(), Encoded::Scalar("Infinity".into()));
        assert_eq!(encode(&f32::NEG_INFINITY).unwrap(), Encoded::Scalar("-Infinity".into()));
        assert_eq!(encode(&Some(f64::NAN)).unwrap(), Encoded::Scalar("NaN".into()));

        // Inside structures floats follow JSON rules
        assert_eq!(encode(&[f64::NAN, 1.0]).unwrap(), Encoded::Structured("[null,1.0]".into()));
    }

    #[test]
    fn test_non_finite_float_does_not_read_back_as_null() {
        let Encoded::Scalar(text) = encode(&f64::NAN).unwrap() else {
            panic!("Expected scalar encoding");
        };

        assert_eq!(Fetched::decode(text), Fetched::Raw("NaN".into()));
    }

    #[test]
    fn test_encode_rejects_non_string_map_keys() {
        let mut map = HashMap::new();
        map.insert(vec![1u8], "value");

        assert!(matches!(encode(&map), Err(Error::Encode(_))));
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            Fetched::decode(r#"{"id":1}"#.into()),
            Fetched::Json(json!({"id": 1}))
        );
        assert_eq!(Fetched::decode("42".into()), Fetched::Json(json!(42)));
        assert_eq!(Fetched::decode("only".into()), Fetched::Raw("only".into()));
        assert_eq!(Fetched::decode("{broken".into()), Fetched::Raw("{broken".into()));
    }

    #[test]
    fn test_deserialize_typed() {
        let form: Form = Fetched::decode(r#"{"id":1,"name":"new"}"#.into())
            .deserialize()
            .unwrap();
        assert_eq!(form, Form { id: 1, name: "new".into() });

        let text: String = Fetched::Raw("only".into()).deserialize().unwrap();
        assert_eq!(text, "only");

        let err = Fetched::Raw("only".into()).deserialize::<u32>().unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
