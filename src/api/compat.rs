//! Purpose: Keep legacy codec names resolvable after the move to profile resolution.
//! Exports: `LegacyItem`, `resolve_legacy_name`, deprecated aliases.
//! Role: Compile-time compatibility table; no runtime reflection.
//! Invariants: Every legacy name maps to the canonical codec or the canonical dump.
//! Invariants: The table only shrinks; names are never repurposed.

use serde::Serialize;

use crate::core::codec::{JsonDecoder, JsonEncoder, dump_canonical};
use crate::core::error::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LegacyItem {
    Encoder,
    Decoder,
    Dump,
}

const LEGACY_NAMES: &[(&str, LegacyItem)] = &[
    ("AnsibleJSONEncoder", LegacyItem::Encoder),
    ("_AnsibleJSONEncoder", LegacyItem::Encoder),
    ("AnsibleJSONDecoder", LegacyItem::Decoder),
    ("_AnsibleJSONDecoder", LegacyItem::Decoder),
    ("json_dump", LegacyItem::Dump),
];

pub fn resolve_legacy_name(name: &str) -> Option<LegacyItem> {
    LEGACY_NAMES
        .iter()
        .find(|(legacy, _)| *legacy == name)
        .map(|(_, item)| *item)
}

pub fn legacy_names() -> impl Iterator<Item = &'static str> {
    LEGACY_NAMES.iter().map(|(name, _)| *name)
}

#[deprecated(since = "0.1.0", note = "use `resolve_encoder` or `JsonEncoder::new`")]
pub fn legacy_encoder() -> JsonEncoder {
    JsonEncoder::new()
}

#[deprecated(since = "0.1.0", note = "use `resolve_decoder` or `JsonDecoder::new`")]
pub fn legacy_decoder() -> JsonDecoder {
    JsonDecoder::new()
}

#[deprecated(since = "0.1.0", note = "use `dump_canonical`")]
pub fn json_dump<T: Serialize + ?Sized>(structure: &T) -> Result<String, Error> {
    dump_canonical(structure)
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::{
        LegacyItem, json_dump, legacy_decoder, legacy_encoder, legacy_names, resolve_legacy_name,
    };
    use crate::core::codec::{JsonDecoder, JsonEncoder, dump_canonical};
    use serde_json::json;

    #[test]
    fn every_legacy_name_resolves() {
        for name in legacy_names() {
            assert!(resolve_legacy_name(name).is_some(), "{name}");
        }
        assert_eq!(
            resolve_legacy_name("AnsibleJSONEncoder"),
            Some(LegacyItem::Encoder)
        );
        assert_eq!(
            resolve_legacy_name("_AnsibleJSONEncoder"),
            Some(LegacyItem::Encoder)
        );
        assert_eq!(
            resolve_legacy_name("AnsibleJSONDecoder"),
            Some(LegacyItem::Decoder)
        );
        assert_eq!(
            resolve_legacy_name("_AnsibleJSONDecoder"),
            Some(LegacyItem::Decoder)
        );
        assert_eq!(legacy_names().count(), 5);
        assert_eq!(resolve_legacy_name("json_dump"), Some(LegacyItem::Dump));
    }

    #[test]
    fn unknown_name_is_absent() {
        assert_eq!(resolve_legacy_name("AnsibleJSONWriter"), None);
        assert_eq!(resolve_legacy_name("ansiblejsonencoder"), None);
        assert_eq!(resolve_legacy_name(""), None);
    }

    #[test]
    fn aliases_return_canonical_primitives() {
        assert_eq!(legacy_encoder(), JsonEncoder::new());
        assert_eq!(legacy_decoder(), JsonDecoder::new());
        let value = json!({"b": [2], "a": 1});
        assert_eq!(
            json_dump(&value).expect("dump"),
            dump_canonical(&value).expect("dump")
        );
    }
}
