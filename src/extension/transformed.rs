//! Validator for the `t` extension (RFC 6497, transformed content).
//!
//! Grammar: `t-(tlang)?(-tfield)*` with at least one of the two. `tlang` is a
//! language tag without extensions, `tfield` is a key (letter + digit)
//! followed by one or more 3-8 alphanumeric values.

use super::module::{is_extension_token, ExtensionModule, SequenceState};

#[derive(Debug, Default)]
pub struct TransformedModule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Language,
    Script,
    Region,
    Variant,
    FieldKey,
    FieldValue,
}

fn is_field_key(token: &str) -> bool {
    let b = token.as_bytes();
    b.len() == 2 && b[0].is_ascii_alphabetic() && b[1].is_ascii_digit()
}

fn is_language(token: &str) -> bool {
    matches!(token.len(), 2..=3 | 5..=8) && token.bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_script(token: &str) -> bool {
    token.len() == 4 && token.bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_region(token: &str) -> bool {
    (token.len() == 2 && token.bytes().all(|b| b.is_ascii_alphabetic()))
        || (token.len() == 3 && token.bytes().all(|b| b.is_ascii_digit()))
}

fn is_variant(token: &str) -> bool {
    (5..=8).contains(&token.len()) || (token.len() == 4 && token.as_bytes()[0].is_ascii_digit())
}

impl ExtensionModule for TransformedModule {
    fn validate(&self, tokens: &[String]) -> Result<SequenceState, String> {
        let mut phase = Phase::Start;
        let mut keys: Vec<String> = Vec::new();

        for token in tokens {
            if !is_extension_token(token) {
                return Err(format!("Invalid token for the 't' extension: '{}'", token));
            }
            if is_field_key(token) {
                if phase == Phase::FieldKey {
                    return Err(format!("Field without a value in the 't' extension before '{}'", token));
                }
                let key = token.to_ascii_lowercase();
                if keys.contains(&key) {
                    return Err(format!("Duplicate field for the 't' extension: '{}'", token));
                }
                keys.push(key);
                phase = Phase::FieldKey;
                continue;
            }
            phase = match phase {
                Phase::Start if is_language(token) => Phase::Language,
                Phase::Language if is_script(token) => Phase::Script,
                Phase::Language | Phase::Script if is_region(token) => Phase::Region,
                Phase::Language | Phase::Script | Phase::Region | Phase::Variant
                    if is_variant(token) =>
                {
                    Phase::Variant
                }
                Phase::FieldKey | Phase::FieldValue if token.len() >= 3 => Phase::FieldValue,
                _ => {
                    return Err(format!(
                        "Unexpected token in the 't' extension: '{}'",
                        token
                    ))
                }
            };
        }

        Ok(match phase {
            Phase::Start | Phase::FieldKey => SequenceState::Incomplete,
            _ => SequenceState::Complete,
        })
    }

    /// Lower-cases every token and orders fields by key. The source language
    /// stays in front.
    fn canonicalize(&self, tokens: &[String]) -> Vec<String> {
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_ascii_lowercase()).collect();
        let first_field = lowered
            .iter()
            .position(|t| is_field_key(t))
            .unwrap_or(lowered.len());

        let mut fields: Vec<Vec<String>> = Vec::new();
        for token in &lowered[first_field..] {
            match fields.last_mut() {
                Some(field) if !is_field_key(token) => field.push(token.clone()),
                _ => fields.push(vec![token.clone()]),
            }
        }
        fields.sort_by(|a, b| a[0].cmp(&b[0]));

        let mut result = lowered[..first_field].to_vec();
        result.extend(fields.into_iter().flatten());
        result
    }
}
