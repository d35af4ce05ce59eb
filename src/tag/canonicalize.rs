//! Canonical form of a parsed tag (RFC 5646 section 4.5).

use super::{Parser, Tag};
use crate::error::{Error, Result};
use crate::registry::{Registry, SubtagRecord};
use tracing::debug;

pub(super) fn canonicalize(tag: &Tag, registry: &Registry) -> Result<String> {
    if let Some(grandfathered) = &tag.grandfathered {
        return Ok(grandfathered.better_tag().to_string());
    }

    let tag = replace_redundant(tag, registry)?;
    let mut out = String::new();

    if let Some(language) = &tag.language {
        push_language(&mut out, language.better_tag(), registry);

        if let Some(extlang) = &tag.extlang {
            match extlang.preferred_tag() {
                Some(preferred) => {
                    out.clear();
                    // Kept in extlang form (`sgn-ase`, not `ase`) so the result is stable.
                    push_language(&mut out, preferred, registry);
                }
                None => push_subtag(&mut out, extlang.tag()),
            }
        }

        if let Some(script) = &tag.script {
            let suppressed = language
                .suppress_script()
                .is_some_and(|s| s.eq_ignore_ascii_case(script.tag()));
            if !suppressed {
                push_subtag(&mut out, script.tag());
            }
        }

        if let Some(region) = &tag.region {
            push_subtag(&mut out, region.better_tag());
        }

        let before_variants = out.len();
        for variant in &tag.variants {
            let better = variant.better_tag();
            if !better.eq_ignore_ascii_case(variant.tag()) {
                // A deprecated variant replaces every variant before it.
                out.truncate(before_variants);
            }
            push_subtag(&mut out, better);
        }

        if let Some(extension) = tag.extension.as_ref().filter(|e| !e.is_empty()) {
            push_subtag(&mut out, &extension.canonical_string());
        }
    }

    if !tag.privateuse.is_empty() {
        push_subtag(&mut out, &tag.privateuse);
    }

    if out.is_empty() {
        return Err(Error::no_tag("No tag to convert."));
    }
    Ok(out)
}

/// A language that is also an extlang is written in extlang form (`zh-yue`).
fn push_language(out: &mut String, language: &str, registry: &Registry) {
    if let Some(extlang) = registry.lookup_extlang(language) {
        if let Some(prefix) = extlang.prefix() {
            out.push_str(prefix);
            out.push('-');
        }
    }
    out.push_str(language);
}

fn push_subtag(out: &mut String, subtag: &str) {
    if !out.is_empty() {
        out.push('-');
    }
    out.push_str(subtag);
}

/// Look the tag up in the redundant registry, shortening it until an entry
/// matches, and splice in the preferred replacement of that entry.
fn replace_redundant(tag: &Tag, registry: &Registry) -> Result<Tag> {
    let mut result = tag.clone();
    let mut probe = tag.clone();
    probe.invalidate();

    loop {
        let probe_string = probe.tag_string().to_string();
        if probe_string.is_empty() {
            break;
        }

        if let Some(redundant) = registry.lookup_redundant(&probe_string) {
            if let Some(preferred) = redundant.preferred_tag() {
                debug!(
                    redundant = redundant.tag(),
                    preferred, "Replacing redundant tag"
                );
                let parser = Parser::new(registry);
                let rtag = parser.parse(redundant.tag())?;
                let ntag = parser.parse(preferred)?;
                result.subtract(&rtag);
                result.replace(&ntag);
            }
            break;
        }

        probe.truncate()?;
    }

    Ok(result)
}

impl Tag {
    /// Remove every component category present in `other`.
    fn subtract(&mut self, other: &Tag) {
        if other.language.is_some() {
            self.language = None;
        }
        if other.extlang.is_some() {
            self.extlang = None;
        }
        if other.script.is_some() {
            self.script = None;
        }
        if other.region.is_some() {
            self.region = None;
        }
        if !other.variants.is_empty() {
            self.variants.clear();
        }
        if other.extension.is_some() {
            self.extension = None;
        }
        if !other.privateuse.is_empty() {
            self.privateuse.clear();
        }
        self.invalidate();
    }

    /// Copy in every component category present in `other`.
    fn replace(&mut self, other: &Tag) {
        if other.language.is_some() {
            self.language = other.language.clone();
        }
        if other.extlang.is_some() {
            self.extlang = other.extlang.clone();
        }
        if other.script.is_some() {
            self.script = other.script.clone();
        }
        if other.region.is_some() {
            self.region = other.region.clone();
        }
        if !other.variants.is_empty() {
            self.variants = other.variants.clone();
        }
        if other.extension.is_some() {
            self.extension = other.extension.clone();
        }
        if !other.privateuse.is_empty() {
            self.privateuse = other.privateuse.clone();
        }
        self.invalidate();
    }
}
