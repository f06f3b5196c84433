//! Shortcode generation and validation.
//!
//! Codes are drawn uniformly from the 62-symbol alphanumeric alphabet using the
//! thread-local CSPRNG, so a code reveals nothing about creation order or time.

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Alphabet for generated codes.
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default length of generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Shortest accepted shortcode.
pub const MIN_CODE_LENGTH: usize = 4;

/// Longest accepted shortcode.
pub const MAX_CODE_LENGTH: usize = 10;

/// Pattern every shortcode must match, generated or user-supplied.
pub static SHORTCODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]{4,10}$").expect("shortcode pattern is a valid regex")
});

/// Produces random candidate shortcodes of a fixed length.
///
/// The generator holds no state besides its length. Uniqueness is not its
/// concern: callers insert through the store, which is the final arbiter.
#[derive(Debug, Clone, Copy)]
pub struct ShortcodeGenerator {
    length: usize,
}

impl ShortcodeGenerator {
    /// Creates a generator for codes of `length` characters.
    ///
    /// The length is clamped into `4..=10` so every generated code also passes
    /// [`ShortcodeGenerator::validate`].
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(MIN_CODE_LENGTH, MAX_CODE_LENGTH),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Generates a candidate code.
    ///
    /// # Examples
    ///
    /// ```
    /// use url_shortener::utils::code_generator::ShortcodeGenerator;
    ///
    /// let code = ShortcodeGenerator::default().generate();
    /// assert_eq!(code.len(), 6);
    /// assert!(ShortcodeGenerator::validate(&code));
    /// ```
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();

        (0..self.length)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect()
    }

    /// Returns true if `code` matches `^[a-zA-Z0-9]{4,10}$`.
    pub fn validate(code: &str) -> bool {
        SHORTCODE_REGEX.is_match(code)
    }
}

impl Default for ShortcodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_default_length() {
        let code = ShortcodeGenerator::default().generate();
        assert_eq!(code.len(), DEFAULT_CODE_LENGTH);
    }

    #[test]
    fn test_generate_configured_length() {
        for length in MIN_CODE_LENGTH..=MAX_CODE_LENGTH {
            let code = ShortcodeGenerator::new(length).generate();
            assert_eq!(code.len(), length);
        }
    }

    #[test]
    fn test_length_is_clamped() {
        assert_eq!(ShortcodeGenerator::new(1).length(), MIN_CODE_LENGTH);
        assert_eq!(ShortcodeGenerator::new(64).length(), MAX_CODE_LENGTH);
    }

    #[test]
    fn test_generate_alphanumeric_only() {
        let generator = ShortcodeGenerator::new(10);
        for _ in 0..200 {
            let code = generator.generate();
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()), "{code}");
        }
    }

    #[test]
    fn test_generated_codes_pass_validation() {
        let generator = ShortcodeGenerator::default();
        for _ in 0..200 {
            assert!(ShortcodeGenerator::validate(&generator.generate()));
        }
    }

    #[test]
    fn test_generate_produces_unique_codes() {
        let generator = ShortcodeGenerator::new(10);
        let codes: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();

        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_validate_accepts_bounds() {
        assert!(ShortcodeGenerator::validate("abcd"));
        assert!(ShortcodeGenerator::validate("abcdEFGH12"));
        assert!(ShortcodeGenerator::validate("ABC1"));
        assert!(ShortcodeGenerator::validate("1234"));
    }

    #[test]
    fn test_validate_rejects_length() {
        assert!(!ShortcodeGenerator::validate(""));
        assert!(!ShortcodeGenerator::validate("abc"));
        assert!(!ShortcodeGenerator::validate("abcdefghijk"));
    }

    #[test]
    fn test_validate_rejects_symbols() {
        assert!(!ShortcodeGenerator::validate("my-link"));
        assert!(!ShortcodeGenerator::validate("my_link"));
        assert!(!ShortcodeGenerator::validate("my link"));
        assert!(!ShortcodeGenerator::validate("abcd\n"));
        assert!(!ShortcodeGenerator::validate("cafés"));
    }
}
