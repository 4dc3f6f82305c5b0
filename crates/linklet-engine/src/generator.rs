use linklet_core::{ShortCode, ALPHABET, CODE_LENGTH};
use rand::Rng;

/// Trait for generating short-code candidates.
///
/// Implementations are pure generators that don't interact with storage;
/// collision checking against the forward index is the engine's job.
pub trait CodeGenerator: Send + Sync + 'static {
    /// Generates one candidate short code.
    fn generate(&self) -> ShortCode;
}

/// Uniform random code generator.
///
/// Draws [`CODE_LENGTH`] characters independently and uniformly from the
/// 62-character [`ALPHABET`] using the thread-local RNG. Not
/// cryptographic, and doesn't need to be: codes are identifiers, not
/// secrets, and the 62^6 space keeps collisions astronomically rare.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator;

impl RandomGenerator {
    /// Creates a new random generator.
    pub fn new() -> Self {
        Self
    }
}

impl CodeGenerator for RandomGenerator {
    fn generate(&self) -> ShortCode {
        let mut rng = rand::rng();
        let code: String = (0..CODE_LENGTH)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_six_alphanumeric_chars() {
        let generator = RandomGenerator::new();

        for _ in 0..100 {
            let code = generator.generate();
            assert_eq!(code.as_str().len(), 6);
            assert!(code.as_str().bytes().all(|b| b.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn generated_codes_pass_validation() {
        let generator = RandomGenerator::new();

        for _ in 0..100 {
            let code = generator.generate();
            assert!(ShortCode::new(code.as_str()).is_ok());
        }
    }

    #[test]
    fn hundred_draws_are_distinct() {
        let generator = RandomGenerator::new();

        let codes: HashSet<String> = (0..100)
            .map(|_| generator.generate().as_str().to_owned())
            .collect();
        assert_eq!(codes.len(), 100);
    }

    #[test]
    fn thousand_draws_are_distinct() {
        let generator = RandomGenerator::new();

        let codes: HashSet<String> = (0..1000)
            .map(|_| generator.generate().as_str().to_owned())
            .collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
