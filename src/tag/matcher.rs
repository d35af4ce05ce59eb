//! Language range matching and lookup (RFC 4647).

use super::state::TagState;
use super::{Parser, Tag};
use crate::error::Result;
use crate::extension::Extension;
use crate::registry::{Registry, SubtagRecord};

/// `None` only matches `None`; `*` on either side matches anything.
fn subtag_matches(tag: Option<&str>, pattern: Option<&str>) -> bool {
    match (tag, pattern) {
        (None, None) => true,
        (Some("*"), _) | (_, Some("*")) => true,
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

fn record_tag<R: SubtagRecord>(record: Option<&std::sync::Arc<R>>) -> Option<&str> {
    record.map(|r| r.tag())
}

/// Whether every component of `pattern` was filled by a wildcard, as in `*`.
fn is_full_wildcard(pattern: &Tag) -> bool {
    [
        TagState::Lang,
        TagState::Extlang,
        TagState::Script,
        TagState::Region,
        TagState::Variant,
        TagState::Extension,
        TagState::PrivateUse,
    ]
    .into_iter()
    .all(|state| pattern.wildcard_map.contains(state))
}

pub(super) fn compare(tag: &Tag, pattern: &Tag) -> bool {
    match (&tag.grandfathered, &pattern.grandfathered) {
        (Some(a), Some(b)) => return a.tag().eq_ignore_ascii_case(b.tag()),
        (None, None) => {}
        (Some(_), None) => return is_full_wildcard(pattern),
        (None, Some(_)) => return false,
    }

    if !subtag_matches(record_tag(tag.language.as_ref()), record_tag(pattern.language.as_ref())) {
        return false;
    }
    if pattern.extlang.is_some()
        && !subtag_matches(record_tag(tag.extlang.as_ref()), record_tag(pattern.extlang.as_ref()))
    {
        return false;
    }
    if pattern.script.is_some()
        && !subtag_matches(record_tag(tag.script.as_ref()), record_tag(pattern.script.as_ref()))
    {
        return false;
    }
    if pattern.region.is_some()
        && !subtag_matches(record_tag(tag.region.as_ref()), record_tag(pattern.region.as_ref()))
    {
        return false;
    }

    let variants_match = pattern.variants.iter().enumerate().all(|(i, p)| {
        subtag_matches(tag.variants.get(i).map(|v| v.tag()), Some(p.tag()))
    });
    if !variants_match {
        return false;
    }

    if let Some(extension) = &pattern.extension {
        if !Extension::matches(tag.extension.as_ref(), extension) {
            return false;
        }
    }

    if !pattern.privateuse.is_empty() {
        return subtag_matches(Some(&tag.privateuse), Some(&pattern.privateuse));
    }

    true
}

/// Mark components the pattern left out, but that come before where the
/// pattern ended, as "present but empty" so they do not match by absence.
fn fill_unspecified(tag: &Tag, pattern: &mut Tag, registry: &Registry) {
    let reached = pattern.state;

    if reached > TagState::Extlang && pattern.extlang.is_none() && tag.extlang.is_some() {
        pattern.extlang = registry.lookup_extlang("");
    }
    if reached > TagState::Script && pattern.script.is_none() && tag.script.is_some() {
        pattern.script = registry.lookup_script("");
    }
    if reached > TagState::Region && pattern.region.is_none() && tag.region.is_some() {
        pattern.region = registry.lookup_region("");
    }
    if reached > TagState::Variant && pattern.variants.is_empty() && !tag.variants.is_empty() {
        pattern.variants.extend(registry.lookup_variant(""));
    }
    if reached > TagState::Extension && pattern.extension.is_none() && tag.extension.is_some() {
        pattern.extension = Some(Extension::empty_sentinel(registry.extension_modules()));
    }
    pattern.invalidate();
}

fn parse_range(tag: &Tag, pattern: &str, registry: &Registry) -> Result<(Tag, bool)> {
    let mut range = Parser::wildcard(registry).parse(pattern)?;
    fill_unspecified(tag, &mut range, registry);
    let matched = compare(tag, &range);
    Ok((range, matched))
}

pub(super) fn matches(tag: &Tag, pattern: &str, registry: &Registry) -> Result<bool> {
    parse_range(tag, pattern, registry).map(|(_, matched)| matched)
}

pub(super) fn lookup(tag: &Tag, pattern: &str, registry: &Registry) -> Result<Option<String>> {
    let (mut range, matched) = parse_range(tag, pattern, registry)?;
    if !matched {
        return Ok(None);
    }
    if tag.grandfathered.is_some() {
        return Ok(Some(tag.tag_string().to_string()));
    }

    let wildcards = range.wildcard_map;
    for state in wildcards.states() {
        match state {
            TagState::Lang => range.language = tag.language.clone(),
            TagState::Extlang => range.extlang = tag.extlang.clone(),
            TagState::Script => range.script = tag.script.clone(),
            TagState::Region => range.region = tag.region.clone(),
            TagState::Variant => range.variants = tag.variants.clone(),
            TagState::Extension | TagState::ExtensionToken | TagState::ExtensionToken2 => {
                range.extension = tag.extension.clone();
            }
            TagState::PrivateUse | TagState::PrivateUseToken | TagState::PrivateUseToken2 => {
                range.privateuse = tag.privateuse.clone();
            }
            _ => {}
        }
    }
    range.invalidate();

    Ok(Some(range.tag_string().to_string()))
}
