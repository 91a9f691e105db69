//! Scene document parsing.
//!
//! Scene documents are YAML (JSON is accepted as a YAML subset) and are
//! parsed into a generic [`Document`] value. No schema is applied.
//!
//! Duplicate mapping keys are accepted and the last occurrence wins. Strict
//! YAML forbids duplicates, and `serde_yaml`'s own `Mapping` rejects them,
//! but existing scene files depend on the lenient behaviour, so parsing goes
//! through [`LenientValue`] instead of `serde_yaml::Value`'s deserializer.
//!
//! # Example
//!
//! ```rust
//! use scenery_bundle::document::parse_document;
//!
//! let doc = parse_document("sources:\n  osm: {type: MVT}\nsources:\n  osm: {type: GeoJSON}").unwrap();
//! let kind = doc
//!     .get("sources")
//!     .and_then(|s| s.get("osm"))
//!     .and_then(|o| o.get("type"))
//!     .and_then(|t| t.as_str());
//! assert_eq!(kind, Some("GeoJSON"));
//! ```

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value};

/// A parsed scene document.
pub type Document = Value;

/// Parse scene document text, accepting duplicate keys.
///
/// Blank input parses as [`Value::Null`].
pub fn parse_document(text: &str) -> Result<Document, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str::<LenientValue>(text).map(LenientValue::into_inner)
}

/// A YAML value deserialized with last-one-wins duplicate keys.
#[derive(Debug, Clone, PartialEq)]
pub struct LenientValue(Value);

impl LenientValue {
    /// Take the parsed value.
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl<'de> Deserialize<'de> for LenientValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LenientVisitor).map(LenientValue)
    }
}

struct LenientVisitor;

impl<'de> de::Visitor<'de> for LenientVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("any YAML value")
    }

    fn visit_bool<E>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E>(self, i: i64) -> Result<Value, E> {
        Ok(Value::Number(i.into()))
    }

    fn visit_u64<E>(self, u: u64) -> Result<Value, E> {
        Ok(Value::Number(u.into()))
    }

    fn visit_f64<E>(self, f: f64) -> Result<Value, E> {
        Ok(Value::Number(f.into()))
    }

    fn visit_str<E>(self, s: &str) -> Result<Value, E> {
        Ok(Value::String(s.to_owned()))
    }

    fn visit_string<E>(self, s: String) -> Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        LenientValue::deserialize(deserializer).map(LenientValue::into_inner)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(LenientValue(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut mapping = Mapping::new();
        while let Some((LenientValue(key), LenientValue(value))) = map.next_entry()? {
            // insert replaces: a repeated key keeps its first position, last value
            if mapping.insert(key, value).is_some() {
                log::trace!("Duplicate key in scene document, keeping last value");
            }
        }
        Ok(Value::Mapping(mapping))
    }

    fn visit_enum<A>(self, data: A) -> Result<Value, A::Error>
    where
        A: EnumAccess<'de>,
    {
        let (tag, variant) = data.variant::<String>()?;
        let LenientValue(value) = variant.newtype_variant()?;
        Ok(Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tag),
            value,
        })))
    }
}
