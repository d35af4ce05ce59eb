//! Validator for the `u` extension (RFC 6067, Unicode locale extension).
//!
//! Grammar: `u-(attribute)*(-key(-type)*)*` where attributes and types are
//! 3-8 alphanumerics and a key is an alphanumeric followed by a letter.

use super::module::{is_extension_token, ExtensionModule, SequenceState};

#[derive(Debug, Default)]
pub struct UnicodeLocaleModule;

fn is_key(token: &str) -> bool {
    token.len() == 2
}

impl ExtensionModule for UnicodeLocaleModule {
    fn validate(&self, tokens: &[String]) -> Result<SequenceState, String> {
        let mut keys: Vec<String> = Vec::new();

        for token in tokens {
            if !is_extension_token(token) {
                return Err(format!("Invalid token for the 'u' extension: '{}'", token));
            }
            if is_key(token) {
                if !token.as_bytes()[1].is_ascii_alphabetic() {
                    return Err(format!("Invalid key for the 'u' extension: '{}'", token));
                }
                let key = token.to_ascii_lowercase();
                if keys.contains(&key) {
                    return Err(format!("Duplicate key for the 'u' extension: '{}'", token));
                }
                keys.push(key);
            }
        }

        Ok(if tokens.is_empty() {
            SequenceState::Incomplete
        } else {
            SequenceState::Complete
        })
    }

    /// Lower-cases every token and orders keywords by key. Attributes keep
    /// their position ahead of the first keyword.
    fn canonicalize(&self, tokens: &[String]) -> Vec<String> {
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_ascii_lowercase()).collect();
        let first_key = lowered.iter().position(|t| is_key(t)).unwrap_or(lowered.len());

        let mut keywords: Vec<Vec<String>> = Vec::new();
        for token in &lowered[first_key..] {
            match keywords.last_mut() {
                Some(keyword) if !is_key(token) => keyword.push(token.clone()),
                _ => keywords.push(vec![token.clone()]),
            }
        }
        keywords.sort_by(|a, b| a[0].cmp(&b[0]));

        let mut result = lowered[..first_key].to_vec();
        result.extend(keywords.into_iter().flatten());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keyword_sequence_is_complete() {
        let module = UnicodeLocaleModule;
        assert_eq!(
            module.validate(&tokens(&["co", "phonebk"])),
            Ok(SequenceState::Complete)
        );
        assert_eq!(module.validate(&[]), Ok(SequenceState::Incomplete));
    }

    #[test]
    fn test_attributes_before_keywords() {
        let module = UnicodeLocaleModule;
        assert_eq!(
            module.validate(&tokens(&["foobar", "nu", "arab"])),
            Ok(SequenceState::Complete)
        );
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let module = UnicodeLocaleModule;
        let result = module.validate(&tokens(&["co", "phonebk", "CO", "pinyin"]));
        assert!(result.unwrap_err().contains("Duplicate key"));
    }

    #[test]
    fn test_key_must_end_with_letter() {
        let module = UnicodeLocaleModule;
        assert!(module.validate(&tokens(&["c1"])).is_err());
    }

    #[test]
    fn test_canonicalize_sorts_keywords() {
        let module = UnicodeLocaleModule;
        assert_eq!(
            module.canonicalize(&tokens(&["Attr", "nu", "arab", "CO", "phonebk"])),
            tokens(&["attr", "co", "phonebk", "nu", "arab"])
        );
    }
}
