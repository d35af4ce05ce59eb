//! Language tag entity and the operations defined on it.
//!
//! A [`Tag`] is produced by the [`Parser`] and holds shared handles to the
//! registry records for each component. Canonicalization, range matching and
//! locale conversion all work on parsed tags.

mod canonicalize;
mod matcher;
mod parser;
mod scanner;
mod state;

pub use parser::Parser;
pub use scanner::{Scanner, Token};
pub use state::{TagState, WildcardMap};

use crate::error::{Error, Result};
use crate::extension::Extension;
use crate::registry::{
    ExtlangRecord, GrandfatheredRecord, LanguageRecord, Registry, RegionRecord, ScriptRecord,
    SubtagRecord, VariantRecord,
};
use serde::Serialize;
use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

/// A parsed language tag.
///
/// Either `grandfathered` is set and every other component is empty, or the
/// tag is composed of the other components.
#[derive(Debug, Clone, Default)]
pub struct Tag {
    state: TagState,
    wildcard_map: WildcardMap,
    raw_string: OnceCell<String>,
    language: Option<Arc<LanguageRecord>>,
    extlang: Option<Arc<ExtlangRecord>>,
    script: Option<Arc<ScriptRecord>>,
    region: Option<Arc<RegionRecord>>,
    variants: Vec<Arc<VariantRecord>>,
    extension: Option<Extension>,
    privateuse: String,
    grandfathered: Option<Arc<GrandfatheredRecord>>,
}

impl Tag {
    /// Create an empty tag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `input` as a language tag.
    ///
    /// # Arguments
    /// * `input` - The tag string (e.g., "en-US", "zh-cmn-Hans-CN")
    /// * `registry` - Registry to resolve subtags against
    ///
    /// # Returns
    /// * `Ok(Tag)` if `input` is well-formed and every subtag is registered
    /// * `Err(Error::Syntax)` otherwise
    ///
    /// # Example
    /// ```
    /// use langtag::registry::SubtagRecord;
    /// use langtag::{Registry, Tag};
    ///
    /// # fn main() -> langtag::Result<()> {
    /// let tag = Tag::parse("en-US", Registry::global())?;
    /// assert_eq!(tag.region().map(|r| r.tag()), Some("US"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn parse(input: &str, registry: &Registry) -> Result<Tag> {
        Parser::new(registry).parse(input)
    }

    /// Continue parsing with more subtags, as if `-input` had been appended to
    /// the string this tag was parsed from.
    ///
    /// The tag is left unchanged on error.
    pub fn parse_with_extra_token(&mut self, input: &str, registry: &Registry) -> Result<()> {
        *self = Parser::new(registry).resume(self, input)?;
        Ok(())
    }

    /// Reset every component.
    pub fn clear(&mut self) {
        *self = Tag::default();
    }

    pub fn state(&self) -> TagState {
        self.state
    }

    /// Components filled in by wildcards when this tag was parsed as a range.
    pub fn wildcard_map(&self) -> WildcardMap {
        self.wildcard_map
    }

    pub fn language(&self) -> Option<&Arc<LanguageRecord>> {
        self.language.as_ref()
    }

    pub fn extlang(&self) -> Option<&Arc<ExtlangRecord>> {
        self.extlang.as_ref()
    }

    pub fn script(&self) -> Option<&Arc<ScriptRecord>> {
        self.script.as_ref()
    }

    pub fn region(&self) -> Option<&Arc<RegionRecord>> {
        self.region.as_ref()
    }

    pub fn variants(&self) -> &[Arc<VariantRecord>] {
        &self.variants
    }

    pub fn extension(&self) -> Option<&Extension> {
        self.extension.as_ref()
    }

    /// Private use subtags including the leading `x`, or an empty string.
    pub fn privateuse(&self) -> &str {
        &self.privateuse
    }

    pub fn grandfathered(&self) -> Option<&Arc<GrandfatheredRecord>> {
        self.grandfathered.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.grandfathered.is_none()
            && self.language.is_none()
            && self.extlang.is_none()
            && self.script.is_none()
            && self.region.is_none()
            && self.variants.is_empty()
            && self.extension.is_none()
            && self.privateuse.is_empty()
    }

    /// The tag as a string.
    ///
    /// Right after parsing this is the input as given. Once a component
    /// changes it is rebuilt from the components.
    pub fn tag_string(&self) -> &str {
        self.raw_string.get_or_init(|| self.build_string())
    }

    fn build_string(&self) -> String {
        if let Some(grandfathered) = &self.grandfathered {
            return grandfathered.tag().to_string();
        }

        let mut parts: Vec<String> = Vec::new();
        if let Some(language) = &self.language {
            parts.push(language.tag().to_string());
            if let Some(extlang) = &self.extlang {
                parts.push(extlang.tag().to_string());
            }
            if let Some(script) = &self.script {
                parts.push(script.tag().to_string());
            }
            if let Some(region) = &self.region {
                parts.push(region.tag().to_string());
            }
            parts.extend(self.variants.iter().map(|v| v.tag().to_string()));
            if let Some(extension) = self.extension.as_ref().filter(|e| !e.is_empty()) {
                parts.push(extension.to_string());
            }
        }
        if !self.privateuse.is_empty() {
            parts.push(self.privateuse.clone());
        }
        parts.join("-")
    }

    fn invalidate(&mut self) {
        self.raw_string.take();
    }

    fn set_raw_string(&mut self, raw: String) {
        self.raw_string = OnceCell::from(raw);
    }

    /// Drop the least specific component: private use, then the last
    /// extension token, the last variant, region, script, extlang and
    /// finally the language.
    pub fn truncate(&mut self) -> Result<()> {
        if self.grandfathered.is_some() {
            return Err(Error::no_tag("Grandfathered subtag can't be truncated."));
        }

        let truncated = if !self.privateuse.is_empty() {
            self.privateuse.clear();
            true
        } else if let Some(extension) = self.extension.as_mut() {
            extension.truncate();
            if extension.is_empty() {
                self.extension = None;
            }
            true
        } else {
            self.variants.pop().is_some()
                || self.region.take().is_some()
                || self.script.take().is_some()
                || self.extlang.take().is_some()
                || self.language.take().is_some()
        };
        if !truncated {
            return Err(Error::no_tag("No tags to be truncated."));
        }

        self.invalidate();
        Ok(())
    }

    /// Compare with `other`, treating `other` as the reference.
    ///
    /// Components `other` leaves out are not compared, and `*` on either side
    /// matches anything. Comparison is case-insensitive.
    pub fn compare(&self, other: &Tag) -> bool {
        matcher::compare(self, other)
    }

    /// Whether this tag matches the language range `pattern` (RFC 4647).
    ///
    /// A grandfathered tag matches only itself or the range `*`.
    pub fn matches(&self, pattern: &str, registry: &Registry) -> Result<bool> {
        matcher::matches(self, pattern, registry)
    }

    /// Apply `pattern` to this tag and return the resulting tag, with
    /// wildcarded components replaced by this tag's values.
    ///
    /// Returns `Ok(None)` when the tag does not match.
    pub fn lookup(&self, pattern: &str, registry: &Registry) -> Result<Option<String>> {
        matcher::lookup(self, pattern, registry)
    }

    /// Canonical form of this tag.
    pub fn canonicalize(&self, registry: &Registry) -> Result<String> {
        canonicalize::canonicalize(self, registry)
    }

    /// Expand the tag with CLDR likely subtags (e.g. `zh` to `zh-Hans-CN`).
    ///
    /// Returns `Ok(None)` when no expansion is registered for the tag.
    pub fn transform(&self, registry: &Registry) -> Result<Option<String>> {
        let tag_string = self.tag_string();
        if tag_string.is_empty() {
            return Err(Error::no_tag("No tag to transform."));
        }
        Ok(registry
            .lookup_likely_subtags(tag_string)
            .map(str::to_string))
    }

    /// Serializable view of every component.
    pub fn summary(&self) -> TagSummary {
        TagSummary {
            tag: self.tag_string().to_string(),
            state: self.state,
            language: self.language.as_deref().map(SubtagSummary::from_record),
            extlang: self.extlang.as_deref().map(SubtagSummary::from_record),
            script: self.script.as_deref().map(SubtagSummary::from_record),
            region: self.region.as_deref().map(SubtagSummary::from_record),
            variants: self
                .variants
                .iter()
                .map(|v| SubtagSummary::from_record(v.as_ref()))
                .collect(),
            extension: self.extension.as_ref().map(|e| e.to_string()),
            privateuse: Some(self.privateuse.clone()).filter(|p| !p.is_empty()),
            grandfathered: self
                .grandfathered
                .as_deref()
                .map(SubtagSummary::from_record),
            wildcards: self.wildcard_map.states().collect(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_string())
    }
}

/// One component of a [`TagSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtagSummary {
    pub subtag: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred: Option<String>,
}

impl SubtagSummary {
    fn from_record<R: SubtagRecord + ?Sized>(record: &R) -> Self {
        Self {
            subtag: record.tag().to_string(),
            description: record.description().to_string(),
            preferred: record.preferred_tag().map(str::to_string),
        }
    }
}

/// Serializable dump of a [`Tag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSummary {
    pub tag: String,
    pub state: TagState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<SubtagSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extlang: Option<SubtagSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<SubtagSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<SubtagSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<SubtagSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privateuse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grandfathered: Option<SubtagSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub wildcards: Vec<TagState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> &'static Registry {
        Registry::global()
    }

    fn parse(s: &str) -> Tag {
        Tag::parse(s, registry()).unwrap_or_else(|e| panic!("failed to parse {}: {}", s, e))
    }

    // ==================== Accessor Tests ====================

    #[test]
    fn test_components() {
        let tag = parse("zh-cmn-Hans-CN");
        assert_eq!(tag.language().map(|r| r.tag()), Some("zh"));
        assert_eq!(tag.extlang().map(|r| r.tag()), Some("cmn"));
        assert_eq!(tag.script().map(|r| r.tag()), Some("Hans"));
        assert_eq!(tag.region().map(|r| r.tag()), Some("CN"));
        assert!(tag.variants().is_empty());
        assert!(tag.extension().is_none());
        assert_eq!(tag.privateuse(), "");
        assert_eq!(tag.state(), TagState::PreVariant);
    }

    #[test]
    fn test_new_tag_is_empty() {
        let tag = Tag::new();
        assert!(tag.is_empty());
        assert_eq!(tag.tag_string(), "");
        assert_eq!(tag.state(), TagState::None);
    }

    #[test]
    fn test_clear() {
        let mut tag = parse("en-US");
        tag.clear();
        assert!(tag.is_empty());
        assert_eq!(tag.to_string(), "");
    }

    // ==================== String Tests ====================

    #[test]
    fn test_tag_string_keeps_input() {
        let tag = parse("EN-us");
        assert_eq!(tag.tag_string(), "EN-us");
    }

    #[test]
    fn test_tag_string_rebuilt_after_change() {
        let mut tag = parse("EN-us");
        tag.truncate().unwrap();
        assert_eq!(tag.tag_string(), "en");
    }

    #[test]
    fn test_private_use_only() {
        let tag = parse("x-foo-bar");
        assert!(tag.language().is_none());
        assert_eq!(tag.privateuse(), "x-foo-bar");
        assert_eq!(tag.to_string(), "x-foo-bar");
    }

    // ==================== Truncate Tests ====================

    #[test]
    fn test_truncate_order() {
        let mut tag = parse("en-Latn-US-oxendict-u-co-phonebk-x-foo");
        let mut seen = Vec::new();
        while tag.truncate().is_ok() {
            seen.push(tag.tag_string().to_string());
        }
        assert_eq!(
            seen,
            vec![
                "en-Latn-US-oxendict-u-co-phonebk",
                "en-Latn-US-oxendict-u-co",
                "en-Latn-US-oxendict-u",
                "en-Latn-US-oxendict",
                "en-Latn-US",
                "en-Latn",
                "en",
                "",
            ]
        );
    }

    #[test]
    fn test_truncate_empty_tag() {
        let mut tag = Tag::new();
        assert!(matches!(tag.truncate(), Err(Error::NoTag(_))));
    }

    #[test]
    fn test_truncate_grandfathered() {
        let mut tag = parse("i-klingon");
        assert!(matches!(tag.truncate(), Err(Error::NoTag(_))));
    }

    // ==================== Compare Tests ====================

    #[test]
    fn test_compare_case_insensitive() {
        assert!(parse("EN-us").compare(&parse("en-US")));
    }

    #[test]
    fn test_compare_ignores_missing_reference_components() {
        assert!(parse("en-US").compare(&parse("en")));
        assert!(!parse("en").compare(&parse("en-US")));
        assert!(!parse("en-US").compare(&parse("de")));
    }

    #[test]
    fn test_compare_grandfathered() {
        assert!(parse("i-klingon").compare(&parse("I-KLINGON")));
        assert!(!parse("i-klingon").compare(&parse("tlh")));
        assert!(!parse("tlh").compare(&parse("i-klingon")));
    }

    // ==================== Transform Tests ====================

    #[test]
    fn test_transform() {
        let tag = parse("zh");
        assert_eq!(
            tag.transform(registry()).unwrap().as_deref(),
            Some("zh-Hans-CN")
        );
    }

    #[test]
    fn test_transform_unknown() {
        let tag = parse("tlh");
        assert_eq!(tag.transform(registry()).unwrap(), None);
    }

    #[test]
    fn test_transform_empty_tag() {
        assert!(matches!(
            Tag::new().transform(registry()),
            Err(Error::NoTag(_))
        ));
    }

    // ==================== Summary Tests ====================

    #[test]
    fn test_summary_serializes() {
        let tag = parse("in-ID");
        let json = serde_json::to_value(tag.summary()).unwrap();
        assert_eq!(json["tag"], "in-ID");
        assert_eq!(json["language"]["subtag"], "in");
        assert_eq!(json["language"]["preferred"], "id");
        assert_eq!(json["region"]["subtag"], "ID");
        assert_eq!(json["state"], "pre_variant");
        assert!(json.get("grandfathered").is_none());
    }

    #[test]
    fn test_summary_grandfathered() {
        let summary = parse("i-klingon").summary();
        assert_eq!(
            summary.grandfathered.map(|g| g.preferred),
            Some(Some("tlh".to_string()))
        );
        assert!(summary.language.is_none());
    }
}
