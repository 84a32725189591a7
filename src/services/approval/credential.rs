//! One-time passwords handed to newly created provider accounts.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Serialize, Serializer};

const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijkmnpqrstuvwxyz";
const DIGITS: &[u8] = b"23456789";

pub const MIN_LENGTH: usize = 8;

/// A generated password, held only between account creation and the
/// welcome email.
///
/// `Debug` is redacted so the value cannot reach a log line by accident.
/// Serializing exposes it; it is serialized only into the approval response.
#[derive(Clone, PartialEq, Eq)]
pub struct TemporaryCredential(String);

impl TemporaryCredential {
    /// Generates a password of `length` characters (at least `MIN_LENGTH`)
    /// drawn from upper case letters, lower case letters and digits, with at
    /// least one of each. Look-alike characters (`I`, `O`, `l`, `o`, `0`, `1`)
    /// are excluded.
    pub fn generate(length: usize) -> Self {
        let length = length.max(MIN_LENGTH);
        let mut rng = rand::rng();
        let pick = |rng: &mut rand::rngs::ThreadRng, set: &[u8]| {
            set[rng.random_range(0..set.len())] as char
        };

        let mut chars: Vec<char> = vec![
            pick(&mut rng, UPPER),
            pick(&mut rng, LOWER),
            pick(&mut rng, DIGITS),
        ];
        let all: Vec<u8> = [UPPER, LOWER, DIGITS].concat();
        while chars.len() < length {
            chars.push(pick(&mut rng, &all));
        }
        chars.shuffle(&mut rng);

        Self(chars.into_iter().collect())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for TemporaryCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TemporaryCredential(<redacted>)")
    }
}

impl Serialize for TemporaryCredential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn has_all_classes(password: &str) -> bool {
        password.chars().any(|c| c.is_ascii_uppercase())
            && password.chars().any(|c| c.is_ascii_lowercase())
            && password.chars().any(|c| c.is_ascii_digit())
    }

    #[test]
    fn test_default_length_is_twelve() {
        let credential = TemporaryCredential::generate(12);
        assert_eq!(credential.expose().len(), 12);
        assert!(has_all_classes(credential.expose()));
    }

    #[test]
    fn test_debug_is_redacted() {
        let credential = TemporaryCredential::generate(12);
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains(credential.expose()));
    }

    #[test]
    fn test_short_lengths_are_raised() {
        assert_eq!(TemporaryCredential::generate(3).expose().len(), MIN_LENGTH);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let credential = TemporaryCredential::generate(12);
        assert_eq!(
            serde_json::to_value(&credential).unwrap(),
            serde_json::Value::String(credential.expose().to_string())
        );
    }

    proptest! {
        #[test]
        fn prop_generated_passwords_are_alphanumeric_with_every_class(length in 8usize..64) {
            let credential = TemporaryCredential::generate(length);
            let password = credential.expose();
            prop_assert_eq!(password.len(), length);
            prop_assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
            prop_assert!(has_all_classes(password));
        }
    }
}
