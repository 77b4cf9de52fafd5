//! Normalized Shannon entropy, used as a secret-likelihood signal.

use std::collections::HashMap;

/// Alphabet size assumed for typical secret charsets (base64-ish plus a few
/// symbols). Entropy is normalized against `log2` of this.
pub const ASSUMED_ALPHABET: f64 = 72.0;

/// Character-frequency Shannon entropy of `s`, scaled to `0.0..=1.0`.
///
/// Returns `0.0` for the empty string and for strings made of a single
/// repeated character.
///
/// # Examples
///
/// ```rust
/// use dotenv_diff::shannon_entropy_normalized;
///
/// assert_eq!(shannon_entropy_normalized(""), 0.0);
/// assert_eq!(shannon_entropy_normalized("aaaaaaaa"), 0.0);
/// assert!(shannon_entropy_normalized("Xk9$mQ2!vB7#pL4@") > 0.6);
/// ```
pub fn shannon_entropy_normalized(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }
    let mut freq: HashMap<char, usize> = HashMap::new();
    let mut len = 0usize;
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
        len += 1;
    }
    let len = len as f64;
    let entropy: f64 = freq
        .values()
        .map(|&n| {
            let p = n as f64 / len;
            -p * p.log2()
        })
        .sum();
    (entropy / ASSUMED_ALPHABET.log2()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        for s in [
            "a",
            "ab",
            "password",
            "4eC39HqLyjWDarjtT1zdp7dc",
            "the quick brown fox jumps over the lazy dog",
            "🔑🔑🔒",
        ] {
            let e = shannon_entropy_normalized(s);
            assert!((0.0..=1.0).contains(&e), "{s}: {e}");
        }
    }

    #[test]
    fn test_constant_string_is_zero() {
        assert_eq!(shannon_entropy_normalized("zzzzzzzzzzzz"), 0.0);
    }

    #[test]
    fn test_two_symbol_string() {
        // H = 1 bit, normalized by log2(72).
        let e = shannon_entropy_normalized("abab");
        assert!((e - 1.0 / 72f64.log2()).abs() < 1e-12);
    }

    #[test]
    fn test_random_token_scores_higher_than_word() {
        assert!(
            shannon_entropy_normalized("aB3xQ9kL2mN8pR4tV6wY1zC5")
                > shannon_entropy_normalized("developmentdevelopment")
        );
    }

    #[test]
    fn test_many_distinct_characters_are_capped() {
        let s: String = (0x4e00u32..0x4e00 + 200).filter_map(char::from_u32).collect();
        assert_eq!(shannon_entropy_normalized(&s), 1.0);
    }
}
