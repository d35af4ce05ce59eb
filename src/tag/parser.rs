//! Tag grammar state machine.
//!
//! Subtag length alone does not say which component a token is, so tokens
//! after the language are tried against an ordered list of categories and
//! fall through to the next one when the length or the registry lookup does
//! not fit.

use super::scanner::{Scanner, Token};
use super::state::TagState;
use super::Tag;
use crate::error::{Error, Result};
use crate::extension::Extension;
use crate::registry::{Registry, SubtagRecord};
use std::sync::Arc;
use tracing::debug;

/// Component categories tried for a token, in fall-through order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Extlang,
    Script,
    Region,
    Variant,
    Extension,
    PrivateUse,
}

const CASCADE: [Category; 6] = [
    Category::Extlang,
    Category::Script,
    Category::Region,
    Category::Variant,
    Category::Extension,
    Category::PrivateUse,
];

/// Parses tag strings against a registry.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'r> {
    registry: &'r Registry,
    allow_wildcard: bool,
}

impl<'r> Parser<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            allow_wildcard: false,
        }
    }

    /// A parser for language ranges, where `*` may stand for any subtag.
    pub fn wildcard(registry: &'r Registry) -> Self {
        Self {
            registry,
            allow_wildcard: true,
        }
    }

    /// Parse a whole tag string.
    pub fn parse(&self, input: &str) -> Result<Tag> {
        let mut tag = Tag::new();

        if let Some(grandfathered) = self.registry.lookup_grandfathered(input) {
            tag.grandfathered = Some(grandfathered);
            tag.set_raw_string(input.to_string());
            return Ok(tag);
        }

        tag.state = TagState::Lang;
        self.run(&mut tag, input)?;
        tag.set_raw_string(input.to_string());
        Ok(tag)
    }

    /// Continue parsing `tag` with `input` as the next subtags.
    pub fn resume(&self, tag: &Tag, input: &str) -> Result<Tag> {
        if tag.state == TagState::None {
            return Err(Error::syntax(
                "Unable to continue parsing a tag that was not parsed before",
            ));
        }

        let mut next = tag.clone();
        if let Some(state) = next.state.after_hyphen() {
            next.state = state;
        }
        self.run(&mut next, input)?;

        let raw = format!("{}-{}", tag.tag_string(), input);
        next.set_raw_string(raw);
        Ok(next)
    }

    fn run(&self, tag: &mut Tag, input: &str) -> Result<()> {
        let mut scanner = Scanner::new(input);
        let mut wildcard_start: Option<TagState> = None;
        let mut last_token = "";
        let mut count = 0;

        while !scanner.is_eof() {
            let token = scanner.next_token()?;
            count += 1;
            last_token = token.as_str();

            match token {
                Token::Hyphen => {
                    tag.state = tag.state.after_hyphen().ok_or_else(|| {
                        Error::syntax(format!(
                            "Invalid syntax found during parsing a token: {}",
                            last_token
                        ))
                    })?;
                }
                Token::Wildcard if self.allow_wildcard => {
                    // A run of wildcards is filled from where the first one started.
                    wildcard_start.get_or_insert(tag.state);
                    if tag.state == TagState::Lang {
                        // Set now so the prefix checks of later subtags see it.
                        tag.language = self.registry.lookup_language("*");
                    }
                    tag.state = match tag.state {
                        TagState::Lang => TagState::PreExtlang,
                        state => state.prev(),
                    };
                }
                Token::Wildcard => {
                    return Err(Error::syntax(format!(
                        "Wildcard is not allowed in a language tag: {}",
                        input
                    )));
                }
                Token::Subtag(subtag) => {
                    tag.state = self.parse_token(tag, subtag)?;
                    if let Some(begin) = wildcard_start.take() {
                        let end = tag.state.prev();
                        self.fill_wildcard(tag, begin, end);
                    }
                }
            }
        }

        if let Some(begin) = wildcard_start {
            self.fill_wildcard(tag, begin, TagState::End);
        }

        if !tag.state.is_terminal() {
            return Err(Error::syntax(format!(
                "Invalid tag: {}, last token = '{}', state = {:?}, parsed count = {}",
                input, last_token, tag.state, count
            )));
        }
        if let Some(extension) = &tag.extension {
            if !extension.is_complete() {
                return Err(Error::syntax(format!(
                    "Incomplete extension in tag: {}, last token = '{}'",
                    input, last_token
                )));
            }
        }

        tag.invalidate();
        Ok(())
    }

    /// Classify one subtag in the current state, returning the next state.
    fn parse_token(&self, tag: &mut Tag, token: &str) -> Result<TagState> {
        match tag.state {
            TagState::Lang => self.parse_language(tag, token),
            TagState::Extlang => self.classify(tag, token, Category::Extlang),
            TagState::Script => self.classify(tag, token, Category::Script),
            TagState::Region => self.classify(tag, token, Category::Region),
            TagState::Variant => self.classify(tag, token, Category::Variant),
            TagState::Extension => self.classify(tag, token, Category::Extension),
            TagState::PrivateUse => self.classify(tag, token, Category::PrivateUse),
            TagState::ExtensionToken | TagState::ExtensionToken2 => {
                self.parse_extension_token(tag, token)
            }
            TagState::PrivateUseToken | TagState::PrivateUseToken2 => {
                if token.len() > 8 {
                    // `x` owns the rest of the tag, so there is nothing to fall back to.
                    return Err(Error::syntax(format!(
                        "Invalid tag for the private use: token = '{}'",
                        token
                    )));
                }
                tag.privateuse.push('-');
                tag.privateuse.push_str(token);
                Ok(TagState::InPrivateUseToken)
            }
            state => Err(Error::syntax(format!(
                "Unable to parse tag: {}, token = '{}' state = {:?}",
                tag.tag_string(),
                token,
                state
            ))),
        }
    }

    fn parse_language(&self, tag: &mut Tag, token: &str) -> Result<TagState> {
        match token.len() {
            1 if token.eq_ignore_ascii_case("x") => {
                tag.privateuse.push('x');
                Ok(TagState::InPrivateUse)
            }
            2 | 3 => {
                let language = self.registry.lookup_language(token).ok_or_else(|| {
                    Error::syntax(format!("Unknown ISO 639 code: {}", token))
                })?;
                // Guard against a record that only matched by alias.
                if !language.tag().eq_ignore_ascii_case(token) {
                    return Err(Error::syntax(format!("No such language subtag: {}", token)));
                }
                tag.language = Some(language);
                Ok(TagState::PreExtlang)
            }
            4 => Err(Error::syntax(format!("Reserved for future use: {}", token))),
            5..=8 => Err(Error::syntax(format!(
                "Registered language subtags are not supported: {}",
                token
            ))),
            _ => Err(Error::syntax(format!("Invalid language subtag: {}", token))),
        }
    }

    /// Try `token` against each category from `from` onwards.
    fn classify(&self, tag: &mut Tag, token: &str, from: Category) -> Result<TagState> {
        let start = CASCADE.iter().position(|c| *c == from).unwrap_or(0);

        for category in &CASCADE[start..] {
            if let Some(state) = self.attempt(*category, tag, token)? {
                return Ok(state);
            }
            debug!(token, ?category, "Subtag did not fit, trying next category");
        }

        Err(Error::syntax(format!(
            "Unable to parse tag: {}, token = '{}' state = {:?}",
            tag.tag_string(),
            token,
            tag.state
        )))
    }

    /// `Ok(None)` means the token is not of this category and the next one
    /// should be tried. Errors stop the cascade.
    fn attempt(&self, category: Category, tag: &mut Tag, token: &str) -> Result<Option<TagState>> {
        match category {
            Category::Extlang => self.attempt_extlang(tag, token),
            Category::Script => {
                if token.len() != 4 {
                    return Ok(None);
                }
                Ok(self.registry.lookup_script(token).map(|script| {
                    tag.script = Some(script);
                    TagState::PreRegion
                }))
            }
            Category::Region => {
                let is_numeric = token.len() == 3 && token.bytes().all(|b| b.is_ascii_digit());
                if token.len() != 2 && !is_numeric {
                    return Ok(None);
                }
                Ok(self.registry.lookup_region(token).map(|region| {
                    tag.region = Some(region);
                    TagState::PreVariant
                }))
            }
            Category::Variant => self.attempt_variant(tag, token),
            Category::Extension => {
                let mut chars = token.chars();
                let singleton = match (chars.next(), chars.next()) {
                    (Some(c), None) if !matches!(c, 'x' | 'X' | '*' | '-') => c,
                    _ => return Ok(None),
                };
                tag.extension
                    .get_or_insert_with(Extension::new)
                    .add_singleton(singleton, self.registry.extension_modules())?;
                Ok(Some(TagState::InExtension))
            }
            Category::PrivateUse => {
                if !token.eq_ignore_ascii_case("x") {
                    return Ok(None);
                }
                tag.privateuse.push('x');
                Ok(Some(TagState::InPrivateUse))
            }
        }
    }

    fn attempt_extlang(&self, tag: &mut Tag, token: &str) -> Result<Option<TagState>> {
        if token.len() != 3 {
            return Ok(None);
        }
        let Some(extlang) = self.registry.lookup_extlang(token) else {
            return Ok(None);
        };

        let language = tag.language.as_ref().map_or("", |l| l.better_tag());
        if let Some(prefix) = extlang.prefix() {
            if !has_wildcard_language(tag) && !prefix.eq_ignore_ascii_case(language) {
                // No fall-through: a registered extlang in the wrong place is an error.
                return Err(Error::syntax(format!(
                    "extlang '{}' is supposed to be used with {}, but {}",
                    extlang.tag(),
                    prefix,
                    language
                )));
            }
        }

        tag.extlang = Some(extlang);
        Ok(Some(TagState::PreScript))
    }

    fn attempt_variant(&self, tag: &mut Tag, token: &str) -> Result<Option<TagState>> {
        let fits = (5..=8).contains(&token.len())
            || (token.len() == 4 && token.as_bytes()[0].is_ascii_digit());
        if !fits {
            return Ok(None);
        }
        let Some(variant) = self.registry.lookup_variant(token) else {
            return Ok(None);
        };

        let prefixes = variant.prefixes();
        if !prefixes.is_empty() && !has_wildcard_language(tag) {
            tag.invalidate();
            let current = tag
                .canonicalize(self.registry)
                .unwrap_or_else(|_| tag.tag_string().to_string());
            if !prefixes.iter().any(|p| has_subtag_prefix(&current, p)) {
                return Err(Error::syntax(format!(
                    "variant '{}' is supposed to be used with {}, but {}",
                    token,
                    prefixes.join(","),
                    current
                )));
            }
        }

        if tag.variants.iter().any(|v| Arc::ptr_eq(v, &variant)) {
            return Err(Error::syntax(format!("Duplicate variants: {}", variant.tag())));
        }

        tag.variants.push(variant);
        Ok(Some(TagState::PreVariant))
    }

    fn parse_extension_token(&self, tag: &mut Tag, token: &str) -> Result<TagState> {
        let Some(extension) = tag.extension.as_mut() else {
            return Err(Error::syntax(format!("No extension for token: {}", token)));
        };

        if (2..=8).contains(&token.len()) {
            extension.add_token(token)?;
            return Ok(TagState::InExtensionToken);
        }

        if tag.state == TagState::ExtensionToken2 && extension.is_complete() {
            // The previous singleton is done, so this may start the next one.
            return self.classify(tag, token, Category::Extension);
        }

        debug!(token, "Cancelling incomplete extension");
        extension.cancel_singleton();
        if extension.is_empty() {
            tag.extension = None;
        }
        self.attempt(Category::PrivateUse, tag, token)?
            .ok_or_else(|| {
                Error::syntax(format!("Invalid token after extension singleton: {}", token))
            })
    }

    /// Set every component from `begin` up to (not including) `end` to the
    /// wildcard record and mark it in the wildcard map.
    fn fill_wildcard(&self, tag: &mut Tag, begin: TagState, end: TagState) {
        debug!(?begin, ?end, "Filling wildcard range");

        let mut state = begin;
        while state < end {
            tag.wildcard_map.insert(state);
            match state {
                TagState::Lang => tag.language = self.registry.lookup_language("*"),
                TagState::Extlang => tag.extlang = self.registry.lookup_extlang("*"),
                TagState::Script => tag.script = self.registry.lookup_script("*"),
                TagState::Region => tag.region = self.registry.lookup_region("*"),
                TagState::Variant => {
                    if let Some(variant) = self.registry.lookup_variant("*") {
                        tag.variants.push(variant);
                    }
                }
                TagState::Extension => {
                    tag.extension = Some(Extension::wildcard(self.registry.extension_modules()));
                }
                TagState::PrivateUse => {
                    tag.privateuse.clear();
                    tag.privateuse.push('*');
                }
                _ => {}
            }
            state = state.next();
        }
        tag.invalidate();
    }
}

fn has_wildcard_language(tag: &Tag) -> bool {
    tag.language.as_ref().is_some_and(|l| l.tag() == "*")
}

/// Case-insensitive prefix test that only matches at a subtag boundary, so
/// `sl` is a prefix of `sl-rozaj` but not of `slo`.
fn has_subtag_prefix(tag: &str, prefix: &str) -> bool {
    tag.len() >= prefix.len()
        && tag.is_char_boundary(prefix.len())
        && tag[..prefix.len()].eq_ignore_ascii_case(prefix)
        && matches!(tag.as_bytes().get(prefix.len()), None | Some(b'-'))
}
