//! Purpose: Select the JSON encoder/decoder for a leg of controller/module messaging.
//! Exports: `JsonEncoder`, `JsonDecoder`, `EncodeStyle`, `CodecProfile`, `resolve_*`, `dump_canonical`.
//! Role: Stateless profile resolution plus the canonical encode/decode primitives.
//! Invariants: Resolution never fails; every profile and direction maps to the canonical pair.
//! Invariants: `EncodeStyle::Legacy` output is byte-identical for key-permuted equal inputs.
//! Invariants: Codec failures are returned to the caller, never logged as diagnostics.
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use crate::core::canonical;
use crate::core::direction::Direction;
use crate::core::error::{Error, ErrorKind};
use crate::json::parse;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EncodeStyle {
    /// Compact output in serializer order.
    #[default]
    Compact,
    /// Sorted keys and 4-space indentation, kept for consumers that diff dumps.
    Legacy,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct JsonEncoder {
    style: EncodeStyle,
}

impl JsonEncoder {
    pub const fn new() -> Self {
        Self {
            style: EncodeStyle::Compact,
        }
    }

    pub const fn legacy() -> Self {
        Self {
            style: EncodeStyle::Legacy,
        }
    }

    pub const fn with_style(mut self, style: EncodeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> EncodeStyle {
        self.style
    }

    pub fn to_value<T: Serialize + ?Sized>(&self, structure: &T) -> Result<Value, Error> {
        serde_json::to_value(structure).map_err(serialization_error)
    }

    pub fn encode<T: Serialize + ?Sized>(&self, structure: &T) -> Result<String, Error> {
        match self.style {
            EncodeStyle::Compact => serde_json::to_string(structure).map_err(serialization_error),
            EncodeStyle::Legacy => {
                let value = self.to_value(structure)?;
                Ok(canonical::to_canonical_string(&value))
            }
        }
    }

    pub fn encode_to_vec<T: Serialize + ?Sized>(&self, structure: &T) -> Result<Vec<u8>, Error> {
        match self.style {
            EncodeStyle::Compact => serde_json::to_vec(structure).map_err(serialization_error),
            EncodeStyle::Legacy => self.encode(structure).map(String::into_bytes),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct JsonDecoder;

impl JsonDecoder {
    pub const fn new() -> Self {
        Self
    }

    pub fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, Error> {
        parse::from_str(text).map_err(|err| parse_error(err, "decode text"))
    }

    /// Decode a raw transport payload.
    pub fn decode_slice<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, Error> {
        parse::from_slice(bytes).map_err(|err| parse_error(err, "decode bytes"))
    }
}

/// Profile handle: a name, optionally bound to a messaging direction.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CodecProfile {
    name: String,
    direction: Option<Direction>,
}

impl CodecProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: None,
        }
    }

    pub fn module(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction: Some(direction),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn encoder(&self) -> JsonEncoder {
        trace!(profile = %self.name, direction = ?self.direction, "resolved json encoder");
        JsonEncoder::new()
    }

    pub fn decoder(&self) -> JsonDecoder {
        trace!(profile = %self.name, direction = ?self.direction, "resolved json decoder");
        JsonDecoder::new()
    }
}

impl From<&str> for CodecProfile {
    fn from(name: &str) -> Self {
        CodecProfile::named(name)
    }
}

impl From<String> for CodecProfile {
    fn from(name: String) -> Self {
        CodecProfile::named(name)
    }
}

pub fn resolve_encoder(profile: impl Into<CodecProfile>) -> JsonEncoder {
    profile.into().encoder()
}

pub fn resolve_decoder(profile: impl Into<CodecProfile>) -> JsonDecoder {
    profile.into().decoder()
}

pub fn resolve_module_encoder(module_name: &str, direction: Direction) -> JsonEncoder {
    CodecProfile::module(module_name, direction).encoder()
}

pub fn resolve_module_decoder(module_name: &str, direction: Direction) -> JsonDecoder {
    CodecProfile::module(module_name, direction).decoder()
}

/// Sorted-key, 4-space-indented dump kept for consumers that diff serialized output.
pub fn dump_canonical<T: Serialize + ?Sized>(structure: &T) -> Result<String, Error> {
    JsonEncoder::legacy().encode(structure)
}

fn serialization_error(err: serde_json::Error) -> Error {
    Error::new(ErrorKind::Serialization)
        .with_message("value has no JSON representation")
        .with_hint("Map keys must be strings and every value must serialize to JSON.")
        .with_source(err)
}

fn parse_error(err: serde_json::Error, context: &str) -> Error {
    let hint = parse::hint_for_error(&err, context);
    let mut mapped = Error::new(ErrorKind::Parse)
        .with_message("invalid JSON")
        .with_hint(hint);
    if err.line() > 0 {
        mapped = mapped.with_position(err.line(), err.column());
    }
    mapped.with_source(err)
}

#[cfg(test)]
mod tests {
    use super::{
        CodecProfile, EncodeStyle, JsonDecoder, JsonEncoder, dump_canonical, resolve_decoder,
        resolve_encoder, resolve_module_decoder, resolve_module_encoder,
    };
    use crate::core::direction::Direction;
    use crate::core::error::ErrorKind;
    use serde::ser::Error as _;
    use serde::{Serialize, Serializer};
    use serde_json::{Value, json};
    use std::collections::BTreeMap;

    struct NoJsonForm;

    impl Serialize for NoJsonForm {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("no registered conversion"))
        }
    }

    #[test]
    fn compact_is_the_default_style() {
        assert_eq!(JsonEncoder::default().style(), EncodeStyle::Compact);
        let text = JsonEncoder::new().encode(&json!({"a": [1, 2]})).expect("encode");
        assert_eq!(text, "{\"a\":[1,2]}");
    }

    #[test]
    fn legacy_toggle_matches_dump() {
        let value = json!({"b": 1, "a": 2});
        let legacy = JsonEncoder::new()
            .with_style(EncodeStyle::Legacy)
            .encode(&value)
            .expect("encode");
        assert_eq!(legacy, dump_canonical(&value).expect("dump"));
        assert_eq!(legacy, "{\n    \"a\": 2,\n    \"b\": 1\n}");
    }

    #[test]
    fn legacy_bytes_match_legacy_text() {
        let value = json!({"k": ["v"]});
        let bytes = JsonEncoder::legacy().encode_to_vec(&value).expect("bytes");
        let text = JsonEncoder::legacy().encode(&value).expect("text");
        assert_eq!(bytes, text.into_bytes());
    }

    #[test]
    fn serialize_failure_is_serialization_error() {
        let err = JsonEncoder::new().encode(&NoJsonForm).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);

        let mut map = BTreeMap::new();
        map.insert(vec![1u8], 1u8);
        let err = dump_canonical(&map).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }

    #[test]
    fn malformed_text_is_parse_error_with_position() {
        let err = JsonDecoder::new()
            .decode::<Value>("{\n  \"a\": ,\n}")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.line(), Some(2));
        assert!(err.column().is_some());
        assert!(err.hint().unwrap_or_default().contains("parse category: syntax"));
    }

    #[test]
    fn decode_slice_reads_transport_bytes() {
        let value: Value = JsonDecoder::new()
            .decode_slice(br#"{"changed":false}"#)
            .expect("decode");
        assert_eq!(value["changed"], false);
    }

    #[test]
    fn every_profile_and_direction_resolves() {
        let value = json!({"msg": "ok", "n": 1});
        for name in ["default", "module_legacy", "x"] {
            let text = resolve_encoder(name).encode(&value).expect("encode");
            let back: Value = resolve_decoder(name).decode(&text).expect("decode");
            assert_eq!(back, value);
            for direction in Direction::ALL {
                let text = resolve_module_encoder(name, direction)
                    .encode(&value)
                    .expect("encode");
                let back: Value = resolve_module_decoder(name, direction)
                    .decode(&text)
                    .expect("decode");
                assert_eq!(back, value);
            }
        }
    }

    #[test]
    fn profile_handle_keeps_name_and_direction() {
        let profile = CodecProfile::module("ping", Direction::ModuleToController);
        assert_eq!(profile.name(), "ping");
        assert_eq!(profile.direction(), Some(Direction::ModuleToController));
        assert_eq!(resolve_encoder(profile.clone()), profile.encoder());
        assert_eq!(CodecProfile::from("legacy").direction(), None);
    }
}
