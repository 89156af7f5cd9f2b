// 🔤 Entity Value - one recognized occurrence of an entity
//
// "What the user typed is a VALUE, what we show back is a VIEW of that value"
//
// Each value carries:
// - raw_text: the literal text the user supplied
// - display_text: the canonical form shown to template authors
// - builtin_type: recognizer tag ("datetimeV2", "number", ...)
// - resolution: structured payload for built-in types, never interpreted here

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque structured payload attached by built-in recognizers
pub type Resolution = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// TEXT SOURCE
// ============================================================================

/// Which text of an EntityValue a rendering should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSource {
    /// Literal user text
    Raw,

    /// Canonical text, falling back to the user text when empty
    #[default]
    Display,
}

// ============================================================================
// ENTITY VALUE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityValue {
    /// Literal substring supplied by the user
    pub raw_text: String,

    /// Canonicalized text (empty = same as raw_text)
    #[serde(default)]
    pub display_text: String,

    /// Recognizer-provided type tag (None = not a built-in)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_builtin_type"
    )]
    pub builtin_type: Option<String>,

    /// Resolution payload, carried through untouched
    #[serde(default)]
    pub resolution: Resolution,
}

/// "" and null both mean "no built-in type"
fn deserialize_builtin_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(tag.filter(|t| !t.is_empty()))
}

impl EntityValue {
    /// Value whose display text is the raw text
    pub fn new(raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        EntityValue {
            display_text: raw_text.clone(),
            raw_text,
            builtin_type: None,
            resolution: Resolution::new(),
        }
    }

    /// Value with a distinct canonical form
    ///
    /// Example: raw "tmrw" → display "tomorrow"
    pub fn with_display(raw_text: impl Into<String>, display_text: impl Into<String>) -> Self {
        EntityValue {
            raw_text: raw_text.into(),
            display_text: display_text.into(),
            builtin_type: None,
            resolution: Resolution::new(),
        }
    }

    /// Tag this value as a built-in type with its resolution payload
    pub fn builtin(mut self, builtin_type: impl Into<String>, resolution: Resolution) -> Self {
        let builtin_type = builtin_type.into();
        // Empty tag means "no built-in type"
        self.builtin_type = if builtin_type.is_empty() { None } else { Some(builtin_type) };
        self.resolution = resolution;
        self
    }

    /// Text shown to the template author
    pub fn display(&self) -> &str {
        if self.display_text.is_empty() {
            &self.raw_text
        } else {
            &self.display_text
        }
    }

    /// Text selected by the caller's TextSource
    pub fn text(&self, source: TextSource) -> &str {
        match source {
            TextSource::Raw => &self.raw_text,
            TextSource::Display => self.display(),
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.builtin_type.as_deref().map_or(false, |t| !t.is_empty())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_value_displays_raw_text() {
        let value = EntityValue::new("Seattle");

        assert_eq!(value.raw_text, "Seattle");
        assert_eq!(value.display(), "Seattle");
        assert!(!value.is_builtin());
        assert!(value.resolution.is_empty());
    }

    #[test]
    fn test_display_falls_back_to_raw_when_empty() {
        let value = EntityValue::with_display("tmrw", "");

        assert_eq!(value.display(), "tmrw");
        assert_eq!(value.text(TextSource::Display), "tmrw");
        assert_eq!(value.text(TextSource::Raw), "tmrw");
    }

    #[test]
    fn test_display_prefers_canonical_text() {
        let value = EntityValue::with_display("tmrw", "tomorrow");

        assert_eq!(value.text(TextSource::Display), "tomorrow");
        assert_eq!(value.text(TextSource::Raw), "tmrw");
    }

    #[test]
    fn test_builtin_resolution_passes_through() {
        let resolution = json!({ "timex": "2026-10-20", "type": "date" })
            .as_object()
            .cloned()
            .unwrap();
        let value = EntityValue::with_display("tmrw", "tomorrow").builtin("datetimeV2", resolution.clone());

        assert!(value.is_builtin());
        assert_eq!(value.builtin_type.as_deref(), Some("datetimeV2"));
        assert_eq!(value.resolution, resolution);
    }

    #[test]
    fn test_empty_builtin_tag_means_no_builtin() {
        let value = EntityValue::new("42").builtin("", Resolution::new());

        assert!(!value.is_builtin());
        assert_eq!(value.builtin_type, None);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let value: EntityValue = serde_json::from_value(json!({ "rawText": "e1u1" })).unwrap();

        assert_eq!(value.raw_text, "e1u1");
        assert_eq!(value.display_text, "");
        assert_eq!(value.display(), "e1u1");
        assert_eq!(value.builtin_type, None);
        assert!(value.resolution.is_empty());
    }

    #[test]
    fn test_deserialize_empty_builtin_tag_matches_builder() {
        let built = EntityValue::new("42").builtin("", Resolution::new());
        let parsed: EntityValue =
            serde_json::from_str(r#"{"rawText":"42","displayText":"42","builtinType":""}"#).unwrap();
        let null_tag: EntityValue =
            serde_json::from_str(r#"{"rawText":"42","displayText":"42","builtinType":null}"#).unwrap();

        assert_eq!(parsed.builtin_type, None);
        assert_eq!(parsed, built);
        assert_eq!(null_tag, built);
    }

    #[test]
    fn test_deserialize_keeps_non_empty_builtin_tag() {
        let parsed: EntityValue =
            serde_json::from_value(json!({ "rawText": "five", "builtinType": "number" })).unwrap();

        assert_eq!(parsed.builtin_type.as_deref(), Some("number"));
        assert!(parsed.is_builtin());
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let value = EntityValue::with_display("e1u1", "e1d1");
        let json = serde_json::to_value(&value).unwrap();

        assert_eq!(json["rawText"], "e1u1");
        assert_eq!(json["displayText"], "e1d1");
        assert!(json.get("builtinType").is_none());
    }
}
