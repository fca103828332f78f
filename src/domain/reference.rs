//! Short random references for transactions posted without one.
//!
//! A reference is an integer in `[0, 20000)` followed by one uppercase letter.
//! Nothing here guarantees uniqueness; the engine checks the store.

use rand::Rng;

const NUMBER_BOUND: u32 = 20_000;

pub fn generate() -> String {
    generate_with(&mut rand::thread_rng())
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let number = rng.gen_range(0..NUMBER_BOUND);
    let letter = char::from(b'A' + rng.gen_range(0..26u8));
    format!("{number}{letter}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_reference_shape() {
        for _ in 0..1_000 {
            let reference = generate();
            let (number, letter) = reference.split_at(reference.len() - 1);

            assert!((1..=5).contains(&number.len()), "{reference}");
            let number: u32 = number.parse().unwrap();
            assert!(number < NUMBER_BOUND);

            let letter = letter.chars().next().unwrap();
            assert!(letter.is_ascii_uppercase(), "{reference}");
        }
    }
}
