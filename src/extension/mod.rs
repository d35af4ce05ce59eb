//! Extension subtags: singleton-keyed token sequences and their validators.

mod module;
mod transformed;
mod unicode;

pub use module::{
    singleton_char_to_index, singleton_index_to_char, ExtensionModule, ExtensionModuleRegistry,
    GenericModule, SequenceState, MAX_EXTENSION_MODULES,
};
pub use transformed::TransformedModule;
pub use unicode::UnicodeLocaleModule;

use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct ExtensionEntry {
    singleton: char,
    tokens: Vec<String>,
    module: Arc<dyn ExtensionModule>,
}

/// Ordered extension container. At most one entry per singleton.
#[derive(Debug, Clone, Default)]
pub struct Extension {
    entries: Vec<ExtensionEntry>,
}

impl Extension {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extension holding only the `*` singleton, used by wildcard ranges.
    pub(crate) fn wildcard(modules: &ExtensionModuleRegistry) -> Self {
        Self::placeholder('*', modules)
    }

    /// Extension holding only the empty singleton, used by range matching
    /// to mark "present but unspecified".
    pub(crate) fn empty_sentinel(modules: &ExtensionModuleRegistry) -> Self {
        Self::placeholder(' ', modules)
    }

    fn placeholder(singleton: char, modules: &ExtensionModuleRegistry) -> Self {
        Self {
            entries: vec![ExtensionEntry {
                singleton,
                tokens: Vec::new(),
                module: modules.lookup(singleton),
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_singleton(&self, singleton: char) -> bool {
        let singleton = singleton.to_ascii_lowercase();
        self.entries.iter().any(|e| e.singleton == singleton)
    }

    /// Singletons in insertion order.
    pub fn singletons(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.iter().map(|e| e.singleton)
    }

    pub fn tokens(&self, singleton: char) -> Option<&[String]> {
        let singleton = singleton.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|e| e.singleton == singleton)
            .map(|e| e.tokens.as_slice())
    }

    /// Start a new singleton. Fails on `x`, on non-alphanumerics and on a
    /// singleton already present.
    pub fn add_singleton(
        &mut self,
        singleton: char,
        modules: &ExtensionModuleRegistry,
    ) -> Result<()> {
        let singleton = singleton.to_ascii_lowercase();
        if !singleton.is_ascii_alphanumeric() || singleton_char_to_index(singleton).is_none() {
            return Err(Error::syntax(format!(
                "Invalid singleton for extension: {}",
                singleton
            )));
        }
        if self.has_singleton(singleton) {
            return Err(Error::syntax(format!(
                "Duplicate singleton for extension: {}",
                singleton
            )));
        }
        self.entries.push(ExtensionEntry {
            singleton,
            tokens: Vec::new(),
            module: modules.lookup(singleton),
        });
        Ok(())
    }

    /// Append a token to the current singleton. The token is rejected, and
    /// not kept, if the singleton's validator refuses the resulting sequence.
    pub fn add_token(&mut self, token: &str) -> Result<()> {
        let entry = self
            .entries
            .last_mut()
            .ok_or_else(|| Error::syntax(format!("No singleton for extension token: {}", token)))?;

        entry.tokens.push(token.to_string());
        if let Err(message) = entry.module.validate(&entry.tokens) {
            entry.tokens.pop();
            return Err(Error::Syntax(message));
        }
        Ok(())
    }

    /// Roll back the singleton currently being parsed.
    pub fn cancel_singleton(&mut self) {
        self.entries.pop();
    }

    /// Whether the singleton currently being parsed may end here.
    pub fn is_complete(&self) -> bool {
        self.entries.last().map_or(true, |e| {
            matches!(e.module.validate(&e.tokens), Ok(SequenceState::Complete))
        })
    }

    /// Drop the last token, or the last singleton if it has no tokens left.
    ///
    /// Returns `false` if there was nothing to drop.
    pub fn truncate(&mut self) -> bool {
        match self.entries.last_mut() {
            Some(entry) if !entry.tokens.is_empty() => {
                entry.tokens.pop();
            }
            Some(_) => {
                self.entries.pop();
            }
            None => return false,
        }
        true
    }

    /// Singletons ordered `0-9` then `a-z`, each followed by its canonical tokens.
    pub fn canonical_string(&self) -> String {
        let mut entries: Vec<&ExtensionEntry> = self.entries.iter().collect();
        entries.sort_by_key(|e| singleton_char_to_index(e.singleton));

        entries
            .into_iter()
            .map(|e| join_entry(e.singleton, &e.module.canonicalize(&e.tokens)))
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Range comparison: a `*` singleton on either side matches anything,
    /// otherwise both must carry the same singletons and tokens.
    pub fn matches(tag: Option<&Extension>, pattern: &Extension) -> bool {
        if pattern.has_singleton('*') {
            return true;
        }
        let Some(tag) = tag else {
            return false;
        };
        if tag.has_singleton('*') {
            return true;
        }

        tag.entries.len() == pattern.entries.len()
            && pattern.entries.iter().all(|p| {
                tag.tokens(p.singleton).is_some_and(|tokens| {
                    tokens.len() == p.tokens.len()
                        && tokens
                            .iter()
                            .zip(&p.tokens)
                            .all(|(a, b)| a.eq_ignore_ascii_case(b))
                })
            })
    }
}

fn join_entry(singleton: char, tokens: &[String]) -> String {
    let mut s = singleton.to_string();
    for token in tokens {
        s.push('-');
        s.push_str(token);
    }
    s
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .entries
            .iter()
            .map(|e| join_entry(e.singleton, &e.tokens))
            .collect::<Vec<_>>()
            .join("-");
        f.write_str(&joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modules() -> ExtensionModuleRegistry {
        ExtensionModuleRegistry::with_builtin_modules()
    }

    fn extension_with(parts: &[(char, &[&str])]) -> Extension {
        let modules = modules();
        let mut ext = Extension::new();
        for (singleton, tokens) in parts {
            ext.add_singleton(*singleton, &modules).expect("valid singleton");
            for token in *tokens {
                ext.add_token(token).expect("valid token");
            }
        }
        ext
    }

    // ==================== Singleton Tests ====================

    #[test]
    fn test_add_singleton_and_tokens() {
        let ext = extension_with(&[('u', &["co", "phonebk"])]);
        assert!(ext.has_singleton('u'));
        assert!(ext.has_singleton('U'));
        assert_eq!(
            ext.tokens('u'),
            Some(&["co".to_string(), "phonebk".to_string()][..])
        );
        assert_eq!(ext.to_string(), "u-co-phonebk");
    }

    #[test]
    fn test_duplicate_singleton_rejected() {
        let mut ext = extension_with(&[('u', &["co", "phonebk"])]);
        let result = ext.add_singleton('U', &modules());
        assert!(matches!(result, Err(Error::Syntax(m)) if m.contains("Duplicate singleton")));
    }

    #[test]
    fn test_private_use_singleton_rejected() {
        let mut ext = Extension::new();
        assert!(ext.add_singleton('x', &modules()).is_err());
        assert!(ext.is_empty());
    }

    #[test]
    fn test_invalid_token_not_kept() {
        let mut ext = extension_with(&[('u', &["co", "phonebk"])]);
        assert!(ext.add_token("co").is_err());
        assert_eq!(ext.tokens('u').map(|t| t.len()), Some(2));
    }

    #[test]
    fn test_cancel_singleton() {
        let mut ext = extension_with(&[('a', &["foo"])]);
        ext.add_singleton('b', &modules()).unwrap();
        ext.cancel_singleton();
        assert!(!ext.has_singleton('b'));
        assert!(ext.has_singleton('a'));
    }

    #[test]
    fn test_is_complete() {
        let mut ext = extension_with(&[('t', &["m0"])]);
        assert!(!ext.is_complete());
        ext.add_token("names").unwrap();
        assert!(ext.is_complete());
    }

    // ==================== Truncate Tests ====================

    #[test]
    fn test_truncate_drops_tokens_then_singleton() {
        let mut ext = extension_with(&[('a', &["foo"]), ('b', &["bar"])]);

        assert!(ext.truncate());
        assert_eq!(ext.to_string(), "a-foo-b");
        assert!(ext.truncate());
        assert_eq!(ext.to_string(), "a-foo");
        assert!(ext.truncate());
        assert!(ext.truncate());
        assert!(ext.is_empty());
        assert!(!ext.truncate());
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_canonical_string_orders_singletons() {
        let ext = extension_with(&[('u', &["NU", "arab", "co", "phonebk"]), ('a', &["Foo"]), ('1', &["bar"])]);
        assert_eq!(ext.to_string(), "u-NU-arab-co-phonebk-a-Foo-1-bar");
        assert_eq!(ext.canonical_string(), "1-bar-a-foo-u-co-phonebk-nu-arab");
    }

    // ==================== Matching Tests ====================

    #[test]
    fn test_matches_wildcard() {
        let modules = modules();
        let wildcard = Extension::wildcard(&modules);
        let ext = extension_with(&[('u', &["co", "phonebk"])]);

        assert!(Extension::matches(Some(&ext), &wildcard));
        assert!(Extension::matches(None, &wildcard));
    }

    #[test]
    fn test_matches_literal() {
        let ext = extension_with(&[('u', &["co", "phonebk"])]);
        let same = extension_with(&[('U', &["CO", "PHONEBK"])]);
        let other = extension_with(&[('u', &["co", "pinyin"])]);

        assert!(Extension::matches(Some(&ext), &same));
        assert!(!Extension::matches(Some(&ext), &other));
        assert!(!Extension::matches(None, &same));
    }

    #[test]
    fn test_empty_sentinel_does_not_match_real_extension() {
        let ext = extension_with(&[('u', &["co", "phonebk"])]);
        let sentinel = Extension::empty_sentinel(&modules());
        assert!(!Extension::matches(Some(&ext), &sentinel));
    }
}
