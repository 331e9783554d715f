use crate::Generator;
use rand::Rng;
use snaplink_core::Slug;
use typed_builder::TypedBuilder;

/// Base58 alphabet: ASCII alphanumerics without the look-alikes `0`, `O`, `I`
/// and `l`.
pub const UNAMBIGUOUS_ALPHABET: &[u8] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

pub const DEFAULT_LENGTH: usize = 6;

/// Draws fixed-length slugs uniformly from an alphabet.
///
/// With the defaults the space holds 58^6 (about 3.8e10) candidates.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RandomGenerator {
    #[builder(default = DEFAULT_LENGTH)]
    length: usize,
    #[builder(default = UNAMBIGUOUS_ALPHABET)]
    alphabet: &'static [u8],
}

impl RandomGenerator {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet(&self) -> &'static [u8] {
        self.alphabet
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    type Output = Slug;

    fn generate(&self) -> Slug {
        let mut rng = rand::thread_rng();
        let code: String = (0..self.length)
            .map(|_| self.alphabet[rng.gen_range(0..self.alphabet.len())] as char)
            .collect();
        Slug::new_unchecked(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_six_characters_from_the_alphabet() {
        let generator = RandomGenerator::new();

        for _ in 0..1_000 {
            let slug = generator.generate();
            assert_eq!(slug.as_str().len(), 6);
            assert!(slug
                .as_str()
                .bytes()
                .all(|b| UNAMBIGUOUS_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn generated_slugs_pass_validation() {
        let generator = RandomGenerator::new();
        let slug = generator.generate();
        assert!(Slug::new(slug.as_str()).is_ok());
    }

    #[test]
    fn alphabet_has_no_ambiguous_characters() {
        assert_eq!(UNAMBIGUOUS_ALPHABET.len(), 58);
        for c in [b'0', b'O', b'I', b'l'] {
            assert!(!UNAMBIGUOUS_ALPHABET.contains(&c));
        }
    }

    #[test]
    fn custom_length_and_alphabet() {
        let generator = RandomGenerator::builder()
            .length(10)
            .alphabet(b"ab")
            .build();

        let slug = generator.generate();
        assert_eq!(slug.as_str().len(), 10);
        assert!(slug.as_str().chars().all(|c| c == 'a' || c == 'b'));
    }

    #[test]
    fn candidates_rarely_repeat() {
        let generator = RandomGenerator::new();
        let seen: HashSet<String> = (0..1_000)
            .map(|_| generator.generate().to_string())
            .collect();
        // 1000 draws from ~3.8e10 candidates: a single duplicate is already unlikely.
        assert!(seen.len() >= 999);
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
