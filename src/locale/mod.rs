//! Conversion between POSIX locale names and language tags.
//!
//! The mapping is heuristic. A locale name `language[_territory][.codeset][@modifier]`
//! becomes `language[-script][-territory][-variant][-x[-codeset-<codeset>][-<modifier>]]`,
//! with the modifier interpreted as a script, a variant or a private use
//! marker, in that order.

mod tables;

use crate::error::{Error, Result};
use crate::registry::{Registry, SubtagRecord};
use crate::tag::Tag;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Tag used for the `C` and `POSIX` locales.
pub const POSIX_TAG: &str = "en-US-u-va-posix";

/// Environment variables consulted for the current locale, highest priority first.
pub const LOCALE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_CTYPE", "LANG"];

static LOCALE_REGEX: OnceLock<Regex> = OnceLock::new();

fn locale_regex() -> &'static Regex {
    LOCALE_REGEX.get_or_init(|| {
        Regex::new(
            r"^(?P<language>[^_.@]*)(?:_(?P<territory>[^.@]*))?(?:\.(?P<codeset>[^@]*))?(?:@(?P<modifier>.*))?$",
        )
        .expect("locale pattern is valid")
    })
}

/// Components of a POSIX locale name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleParts<'a> {
    pub language: &'a str,
    pub territory: Option<&'a str>,
    pub codeset: Option<&'a str>,
    pub modifier: Option<&'a str>,
}

impl<'a> LocaleParts<'a> {
    pub fn parse(locale: &'a str) -> Option<Self> {
        let caps = locale_regex().captures(locale)?;
        let group = |name: &str| caps.name(name).map(|m| m.as_str());

        Some(Self {
            language: group("language").unwrap_or(""),
            territory: group("territory"),
            codeset: group("codeset"),
            modifier: group("modifier"),
        })
    }
}

/// Name of the current locale from `LC_ALL`, `LC_CTYPE` or `LANG`.
///
/// Returns an empty string, which maps to the POSIX locale, if none is set.
pub fn current_locale_name() -> String {
    LOCALE_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

/// Build the language tag string for a POSIX locale name without parsing it.
pub fn locale_to_tag_string(locale: &str) -> Result<String> {
    let parts = LocaleParts::parse(locale)
        .ok_or_else(|| Error::syntax(format!("Invalid locale name: {}", locale)))?;

    let is_posix = matches!(parts.language, "" | "C" | "POSIX")
        && parts.territory.is_none()
        && parts.modifier.is_none();
    if is_posix {
        return Ok(POSIX_TAG.to_string());
    }

    let codeset = parts
        .codeset
        .filter(|c| !c.eq_ignore_ascii_case("utf-8") && !c.eq_ignore_ascii_case("utf8"));

    if parts.language.len() > 3
        && parts.territory.is_none()
        && codeset.is_none()
        && parts.modifier.is_none()
    {
        if let Some(resolved) = tables::locale_from_alias(parts.language) {
            debug!(alias = parts.language, locale = resolved, "Resolved locale alias");
            return locale_to_tag_string(resolved);
        }
    }

    let mut script = None;
    let mut variant = None;
    let mut privateuse: Option<&str> = None;
    if let Some(modifier) = parts.modifier {
        if modifier.eq_ignore_ascii_case(tables::IQTELIF) {
            // Latin script, with the orthography kept as private use.
            script = tables::script_from_modifier("Latin");
            privateuse = tables::privateuse_from_modifier(modifier).flatten();
        } else if let Some(code) = tables::script_from_modifier(modifier) {
            script = Some(code);
        } else if let Some(name) = tables::variant_from_modifier(modifier) {
            variant = Some(name);
        } else {
            privateuse = match tables::privateuse_from_modifier(modifier) {
                Some(known) => known,
                None => {
                    warn!("Unknown modifiers: {}", modifier);
                    Some(modifier)
                }
            };
        }
    }

    let mut tag = parts.language.to_string();
    for subtag in [script, parts.territory, variant].into_iter().flatten() {
        tag.push('-');
        tag.push_str(subtag);
    }
    if codeset.is_some() || privateuse.is_some() {
        tag.push_str("-x");
        if let Some(codeset) = codeset {
            tag.push_str("-codeset-");
            tag.push_str(codeset);
        }
        if let Some(privateuse) = privateuse {
            tag.push('-');
            tag.push_str(privateuse);
        }
    }

    Ok(tag)
}

impl Tag {
    /// Convert a POSIX locale name (e.g. `sr_RS@latin`) to a tag.
    pub fn from_locale(locale: &str, registry: &Registry) -> Result<Tag> {
        let tag_string = locale_to_tag_string(locale)?;
        debug!(locale, tag = %tag_string, "Converted locale to tag");
        Tag::parse(&tag_string, registry)
    }

    /// Convert the current process locale to a tag.
    pub fn from_current_locale(registry: &Registry) -> Result<Tag> {
        Self::from_locale(&current_locale_name(), registry)
    }

    /// Convert the tag to a POSIX locale name (`language[_REGION][@script]`).
    ///
    /// The tag is canonicalized first. Scripts are only kept when glibc has a
    /// modifier name for them.
    pub fn to_locale(&self, registry: &Registry) -> Result<String> {
        let canonical = self.canonicalize(registry)?;
        let tag = Tag::parse(&canonical, registry)?;

        let language = tag.language().ok_or_else(|| {
            Error::no_tag(format!("No language subtag to convert to a locale: {}", canonical))
        })?;

        let mut locale = language.better_tag().to_string();
        if let Some(region) = tag.region() {
            locale.push('_');
            locale.push_str(region.tag());
        }
        if let Some(modifier) = tag.script().and_then(|s| tables::modifier_from_script(s.tag())) {
            locale.push('@');
            locale.push_str(&modifier);
        }

        Ok(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn from_locale(locale: &str) -> String {
        Tag::from_locale(locale, Registry::global())
            .unwrap_or_else(|e| panic!("failed to convert {}: {}", locale, e))
            .to_string()
    }

    fn to_locale(tag: &str) -> String {
        let registry = Registry::global();
        Tag::parse(tag, registry)
            .and_then(|t| t.to_locale(registry))
            .unwrap_or_else(|e| panic!("failed to convert {}: {}", tag, e))
    }

    // ==================== Splitting Tests ====================

    #[test]
    fn test_locale_parts() {
        let parts = LocaleParts::parse("sr_RS.UTF-8@latin").unwrap();
        assert_eq!(parts.language, "sr");
        assert_eq!(parts.territory, Some("RS"));
        assert_eq!(parts.codeset, Some("UTF-8"));
        assert_eq!(parts.modifier, Some("latin"));

        let parts = LocaleParts::parse("de").unwrap();
        assert_eq!(parts.territory, None);
        assert_eq!(parts.codeset, None);
    }

    // ==================== From Locale Tests ====================

    #[test]
    fn test_posix_locales() {
        assert_eq!(from_locale("C"), POSIX_TAG);
        assert_eq!(from_locale("POSIX"), POSIX_TAG);
        assert_eq!(from_locale(""), POSIX_TAG);
        assert_eq!(from_locale("C.UTF-8"), POSIX_TAG);
    }

    #[test]
    fn test_utf8_codeset_dropped() {
        assert_eq!(from_locale("ja_JP.UTF-8"), "ja-JP");
        assert_eq!(from_locale("en_US.utf8"), "en-US");
    }

    #[test]
    fn test_other_codeset_kept() {
        assert_eq!(from_locale("de_DE.ISO-8859-1"), "de-DE-x-codeset-ISO-8859-1");
    }

    #[test]
    fn test_script_modifier() {
        assert_eq!(from_locale("sr_RS@latin"), "sr-Latn-RS");
    }

    #[test]
    fn test_variant_modifier() {
        assert_eq!(from_locale("ca_ES@valencia"), "ca-ES-valencia");
    }

    #[test]
    fn test_ignored_modifier() {
        assert_eq!(from_locale("de_DE@euro"), "de-DE");
    }

    #[test]
    fn test_iqtelif_modifier() {
        assert_eq!(from_locale("tt_RU@iqtelif"), "tt-Latn-RU-x-iqtel");
    }

    #[test]
    fn test_unknown_modifier_kept_as_private_use() {
        assert_eq!(from_locale("de_DE@foo"), "de-DE-x-foo");
    }

    #[test]
    fn test_codeset_and_modifier() {
        assert_eq!(
            from_locale("de_DE.ISO-8859-15@euro"),
            "de-DE-x-codeset-ISO-8859-15"
        );
        assert_eq!(
            from_locale("aa_ER.ISO-8859-1@abegede"),
            "aa-ER-x-codeset-ISO-8859-1-abegede"
        );
    }

    #[test]
    fn test_locale_alias() {
        assert_eq!(from_locale("german"), "de-DE-x-codeset-ISO-8859-1");
        assert_eq!(from_locale("japanese"), "ja-JP-x-codeset-eucJP");
        assert_eq!(from_locale("german.UTF-8"), "de-DE-x-codeset-ISO-8859-1");
    }

    #[test]
    fn test_invalid_locale() {
        assert!(Tag::from_locale("xx_YY", Registry::global()).is_err());
    }

    // ==================== To Locale Tests ====================

    #[test]
    fn test_to_locale() {
        assert_eq!(to_locale("en-US"), "en_US");
        assert_eq!(to_locale("en-Latn-US"), "en_US");
        assert_eq!(to_locale("sr-Latn-RS"), "sr_RS@latin");
        assert_eq!(to_locale("zh-Hans-CN"), "zh_CN");
        assert_eq!(to_locale("in"), "id");
    }

    #[test]
    fn test_to_locale_grandfathered() {
        assert_eq!(to_locale("i-klingon"), "tlh");
    }

    #[test]
    fn test_to_locale_without_language() {
        let registry = Registry::global();
        let tag = Tag::parse("x-foo", registry).unwrap();
        assert!(matches!(tag.to_locale(registry), Err(Error::NoTag(_))));
    }

    // ==================== Current Locale Tests ====================

    #[test]
    #[serial]
    fn test_current_locale_priority() {
        let saved: Vec<_> = LOCALE_ENV_VARS
            .iter()
            .map(|v| (*v, std::env::var(v).ok()))
            .collect();

        std::env::set_var("LC_ALL", "");
        std::env::set_var("LC_CTYPE", "fr_FR.UTF-8");
        std::env::set_var("LANG", "de_DE.UTF-8");
        assert_eq!(current_locale_name(), "fr_FR.UTF-8");

        let tag = Tag::from_current_locale(Registry::global()).unwrap();
        assert_eq!(tag.to_string(), "fr-FR");

        std::env::set_var("LC_ALL", "ja_JP.UTF-8");
        assert_eq!(current_locale_name(), "ja_JP.UTF-8");

        for (var, value) in saved {
            match value {
                Some(value) => std::env::set_var(var, value),
                None => std::env::remove_var(var),
            }
        }
    }
}
