//! Extension module registry: per-singleton grammar validators.
//!
//! The table is bounded. One slot exists for each singleton `0-9` and `a-z`,
//! plus the wildcard `*` and the empty sentinel ` ` used by range matching.
//! `x` never gets a slot since private use owns the rest of the tag.

use super::transformed::TransformedModule;
use super::unicode::UnicodeLocaleModule;
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Number of slots in the module table.
pub const MAX_EXTENSION_MODULES: usize = 38;

const WILDCARD_INDEX: usize = 36;
const EMPTY_INDEX: usize = 37;

/// How far an extension's token sequence has come.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    /// Well-formed so far, but more tokens are required.
    Incomplete,
    /// Well-formed and may end here.
    Complete,
}

/// Grammar validator for the tokens following one extension singleton.
pub trait ExtensionModule: fmt::Debug + Send + Sync {
    /// Check the accumulated tokens after the last one was appended.
    ///
    /// Returns the message describing why the sequence is ill-formed on error.
    fn validate(&self, tokens: &[String]) -> std::result::Result<SequenceState, String>;

    /// Canonical form of a complete token sequence.
    fn canonicalize(&self, tokens: &[String]) -> Vec<String> {
        tokens.iter().map(|t| t.to_ascii_lowercase()).collect()
    }
}

/// Accepts any non-empty sequence of 2-8 alphanumeric tokens.
#[derive(Debug, Default)]
pub struct GenericModule;

impl ExtensionModule for GenericModule {
    fn validate(&self, tokens: &[String]) -> std::result::Result<SequenceState, String> {
        if let Some(bad) = tokens.iter().find(|t| !is_extension_token(t)) {
            return Err(format!("Invalid extension token: '{}'", bad));
        }
        Ok(if tokens.is_empty() {
            SequenceState::Incomplete
        } else {
            SequenceState::Complete
        })
    }
}

/// Placeholder modules for `*` and ` `; they carry no tokens.
#[derive(Debug, Default)]
struct PlaceholderModule;

impl ExtensionModule for PlaceholderModule {
    fn validate(&self, tokens: &[String]) -> std::result::Result<SequenceState, String> {
        if tokens.is_empty() {
            Ok(SequenceState::Complete)
        } else {
            Err("Placeholder singletons take no tokens".to_string())
        }
    }
}

pub(crate) fn is_extension_token(token: &str) -> bool {
    (2..=8).contains(&token.len()) && token.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Map a singleton character to its slot in the module table.
pub fn singleton_char_to_index(singleton: char) -> Option<usize> {
    match singleton.to_ascii_lowercase() {
        c @ '0'..='9' => Some(c as usize - '0' as usize),
        'x' => None,
        c @ 'a'..='z' => Some(c as usize - 'a' as usize + 10),
        '*' => Some(WILDCARD_INDEX),
        ' ' => Some(EMPTY_INDEX),
        _ => None,
    }
}

/// Inverse of [`singleton_char_to_index`].
pub fn singleton_index_to_char(index: usize) -> Option<char> {
    match index {
        0..=9 => char::from_digit(index as u32, 10),
        10..=35 => Some((b'a' + (index - 10) as u8) as char).filter(|c| *c != 'x'),
        WILDCARD_INDEX => Some('*'),
        EMPTY_INDEX => Some(' '),
        _ => None,
    }
}

/// Bounded table mapping singletons to validators.
#[derive(Debug, Clone)]
pub struct ExtensionModuleRegistry {
    modules: [Option<Arc<dyn ExtensionModule>>; MAX_EXTENSION_MODULES],
    fallback: Arc<dyn ExtensionModule>,
}

impl ExtensionModuleRegistry {
    /// A table with only the wildcard and empty placeholders.
    pub fn new() -> Self {
        let mut modules: [Option<Arc<dyn ExtensionModule>>; MAX_EXTENSION_MODULES] =
            std::array::from_fn(|_| None);
        modules[WILDCARD_INDEX] = Some(Arc::new(PlaceholderModule));
        modules[EMPTY_INDEX] = Some(Arc::new(PlaceholderModule));

        Self {
            modules,
            fallback: Arc::new(GenericModule),
        }
    }

    /// A table with the `u` (RFC 6067) and `t` (RFC 6497) validators.
    pub fn with_builtin_modules() -> Self {
        let mut registry = Self::new();
        registry.modules[singleton_index('u')] = Some(Arc::new(UnicodeLocaleModule));
        registry.modules[singleton_index('t')] = Some(Arc::new(TransformedModule));
        registry
    }

    /// Register `module` for `singleton`, replacing any previous one.
    pub fn register(&mut self, singleton: char, module: Arc<dyn ExtensionModule>) -> Result<()> {
        match singleton_char_to_index(singleton) {
            Some(index) if index < WILDCARD_INDEX => {
                self.modules[index] = Some(module);
                Ok(())
            }
            _ => Err(Error::syntax(format!(
                "Not a valid extension singleton: '{}'",
                singleton
            ))),
        }
    }

    /// Validator for `singleton`, or the generic one if none is registered.
    pub fn lookup(&self, singleton: char) -> Arc<dyn ExtensionModule> {
        singleton_char_to_index(singleton)
            .and_then(|i| self.modules[i].clone())
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// Whether a dedicated validator is registered for `singleton`.
    pub fn is_registered(&self, singleton: char) -> bool {
        singleton_char_to_index(singleton).is_some_and(|i| self.modules[i].is_some())
    }
}

impl Default for ExtensionModuleRegistry {
    fn default() -> Self {
        Self::with_builtin_modules()
    }
}

fn singleton_index(singleton: char) -> usize {
    singleton_char_to_index(singleton).unwrap_or(EMPTY_INDEX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // ==================== Index Conversion Tests ====================

    #[test]
    fn test_index_round_trip() {
        for index in 0..MAX_EXTENSION_MODULES {
            if let Some(c) = singleton_index_to_char(index) {
                assert_eq!(singleton_char_to_index(c), Some(index));
            }
        }
    }

    #[test]
    fn test_index_ordering() {
        assert_eq!(singleton_char_to_index('0'), Some(0));
        assert_eq!(singleton_char_to_index('a'), Some(10));
        assert_eq!(singleton_char_to_index('U'), Some(30));
        assert_eq!(singleton_char_to_index('z'), Some(35));
    }

    #[test]
    fn test_private_use_singleton_has_no_slot() {
        assert_eq!(singleton_char_to_index('x'), None);
        assert_eq!(singleton_char_to_index('X'), None);
        assert_eq!(singleton_index_to_char(33), None);
    }

    #[test]
    fn test_invalid_characters_have_no_slot() {
        assert_eq!(singleton_char_to_index('-'), None);
        assert_eq!(singleton_char_to_index('é'), None);
        assert_eq!(singleton_index_to_char(MAX_EXTENSION_MODULES), None);
    }

    // ==================== Registry Tests ====================

    #[test]
    fn test_builtin_modules_registered() {
        let registry = ExtensionModuleRegistry::with_builtin_modules();
        assert!(registry.is_registered('u'));
        assert!(registry.is_registered('t'));
        assert!(!registry.is_registered('a'));
    }

    #[test]
    fn test_register_rejects_reserved_singletons() {
        let mut registry = ExtensionModuleRegistry::new();
        assert!(registry.register('x', Arc::new(GenericModule)).is_err());
        assert!(registry.register('*', Arc::new(GenericModule)).is_err());
        assert!(registry.register('a', Arc::new(GenericModule)).is_ok());
        assert!(registry.is_registered('a'));
    }

    // ==================== Generic Module Tests ====================

    #[test]
    fn test_generic_module_states() {
        let module = GenericModule;
        assert_eq!(module.validate(&[]), Ok(SequenceState::Incomplete));
        assert_eq!(
            module.validate(&tokens(&["abc", "de"])),
            Ok(SequenceState::Complete)
        );
        assert!(module.validate(&tokens(&["a"])).is_err());
        assert!(module.validate(&tokens(&["abcdefghi"])).is_err());
    }

    #[test]
    fn test_generic_module_lowercases() {
        assert_eq!(GenericModule.canonicalize(&tokens(&["ABC"])), tokens(&["abc"]));
    }
}
