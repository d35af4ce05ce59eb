//! Registry record types, one per subtag category.
//!
//! Records are immutable once loaded. Tags hold them through `Arc` handles
//! cloned out of the [`Registry`](super::Registry), so a record always outlives
//! every tag that refers to it.

use serde::Deserialize;

/// Accessors shared by every registry record.
pub trait SubtagRecord {
    /// The subtag (or whole tag, for grandfathered and redundant records).
    fn tag(&self) -> &str;

    /// Every description registered for the record, in registry order.
    fn descriptions(&self) -> &[String];

    /// The registered replacement, if the record is deprecated in favour of
    /// another tag.
    fn preferred_tag(&self) -> Option<&str>;

    /// The first registered description.
    fn description(&self) -> &str {
        self.descriptions().first().map(String::as_str).unwrap_or("")
    }

    /// The preferred tag when one is registered, otherwise the record's own tag.
    fn better_tag(&self) -> &str {
        self.preferred_tag().unwrap_or_else(|| self.tag())
    }
}

/// Construction of the synthetic `"*"` and `""` entries.
pub(crate) trait Synthetic: Sized {
    fn synthetic(tag: &str, description: &str) -> Self;
}

/// Primary language subtag (ISO 639).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LanguageRecord {
    #[serde(rename = "subtag")]
    tag: String,
    #[serde(default)]
    descriptions: Vec<String>,
    preferred_value: Option<String>,
    suppress_script: Option<String>,
    macrolanguage: Option<String>,
    scope: Option<String>,
}

impl LanguageRecord {
    /// Script that should not be written alongside this language.
    pub fn suppress_script(&self) -> Option<&str> {
        self.suppress_script.as_deref()
    }

    /// Macrolanguage this language is encompassed by.
    pub fn macrolanguage(&self) -> Option<&str> {
        self.macrolanguage.as_deref()
    }

    /// Registry scope (`macrolanguage`, `collection`, `special`, `private-use`).
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }
}

/// Extended language subtag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExtlangRecord {
    #[serde(rename = "subtag")]
    tag: String,
    #[serde(default)]
    descriptions: Vec<String>,
    preferred_value: Option<String>,
    prefix: Option<String>,
    macrolanguage: Option<String>,
}

impl ExtlangRecord {
    /// The primary language this extlang must follow.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn macrolanguage(&self) -> Option<&str> {
        self.macrolanguage.as_deref()
    }
}

/// Script subtag (ISO 15924).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScriptRecord {
    #[serde(rename = "subtag")]
    tag: String,
    #[serde(default)]
    descriptions: Vec<String>,
    preferred_value: Option<String>,
}

/// Region subtag (ISO 3166-1 or UN M.49).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegionRecord {
    #[serde(rename = "subtag")]
    tag: String,
    #[serde(default)]
    descriptions: Vec<String>,
    preferred_value: Option<String>,
}

/// Variant subtag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VariantRecord {
    #[serde(rename = "subtag")]
    tag: String,
    #[serde(default)]
    descriptions: Vec<String>,
    preferred_value: Option<String>,
    #[serde(default)]
    prefixes: Vec<String>,
}

impl VariantRecord {
    /// Tags this variant may extend. Empty means the variant is unrestricted.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

/// Whole tag registered under RFC 3066 that does not decompose into subtags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GrandfatheredRecord {
    #[serde(rename = "tag")]
    tag: String,
    #[serde(default)]
    descriptions: Vec<String>,
    preferred_value: Option<String>,
}

/// Decomposable tag registered before the current grammar existed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RedundantRecord {
    #[serde(rename = "tag")]
    tag: String,
    #[serde(default)]
    descriptions: Vec<String>,
    preferred_value: Option<String>,
}

macro_rules! subtag_record {
    ($($record:ident),+ $(,)?) => {
        $(
            impl SubtagRecord for $record {
                fn tag(&self) -> &str {
                    &self.tag
                }

                fn descriptions(&self) -> &[String] {
                    &self.descriptions
                }

                fn preferred_tag(&self) -> Option<&str> {
                    self.preferred_value.as_deref()
                }
            }

            impl Synthetic for $record {
                fn synthetic(tag: &str, description: &str) -> Self {
                    Self {
                        tag: tag.to_string(),
                        descriptions: vec![description.to_string()],
                        ..Default::default()
                    }
                }
            }
        )+
    };
}

subtag_record!(
    LanguageRecord,
    ExtlangRecord,
    ScriptRecord,
    RegionRecord,
    VariantRecord,
    GrandfatheredRecord,
    RedundantRecord,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_better_tag_prefers_preferred_value() {
        let record: LanguageRecord = serde_json::from_str(
            r#"{"subtag": "in", "descriptions": ["Indonesian"], "preferred_value": "id"}"#,
        )
        .expect("valid record");

        assert_eq!(record.tag(), "in");
        assert_eq!(record.preferred_tag(), Some("id"));
        assert_eq!(record.better_tag(), "id");
    }

    #[test]
    fn test_better_tag_falls_back_to_own_tag() {
        let record = RegionRecord::synthetic("US", "United States");
        assert_eq!(record.better_tag(), "US");
        assert_eq!(record.description(), "United States");
    }

    #[test]
    fn test_description_returns_first_of_many() {
        let record: LanguageRecord = serde_json::from_str(
            r#"{"subtag": "es", "descriptions": ["Spanish", "Castilian"]}"#,
        )
        .expect("valid record");

        assert_eq!(record.description(), "Spanish");
        assert_eq!(record.descriptions().len(), 2);
    }

    #[test]
    fn test_variant_prefixes_default_to_empty() {
        let record: VariantRecord =
            serde_json::from_str(r#"{"subtag": "fonipa", "descriptions": ["IPA"]}"#)
                .expect("valid record");
        assert!(record.prefixes().is_empty());
    }
}
