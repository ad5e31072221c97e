//! Random color labels for the favorite-color question.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

/// Exclusive upper bound of generated colors; `#FFFFFF` is never produced.
const COLOR_SPACE: usize = 0xFF_FFFF;

/// Largest palette a configuration may ask for.
pub const MAX_PALETTE_SIZE: usize = 10_000;

/// Generates `count` distinct `#RRGGBB` labels using the thread RNG.
#[must_use]
pub fn generate_palette(count: usize) -> Vec<String> {
    generate_palette_with(&mut rand::thread_rng(), count)
}

/// Generates `count` distinct labels from a fixed seed.
#[must_use]
pub fn seeded_palette(seed: u64, count: usize) -> Vec<String> {
    generate_palette_with(&mut StdRng::seed_from_u64(seed), count)
}

/// Generates `count` distinct upper-case hex color labels from `rng`.
///
/// `count` is capped at [`MAX_PALETTE_SIZE`].
pub fn generate_palette_with<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<String> {
    index::sample(rng, COLOR_SPACE, count.min(MAX_PALETTE_SIZE))
        .into_iter()
        .map(|color| format!("#{color:06X}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_palette_size_and_format() {
        let palette = generate_palette(100);
        assert_eq!(palette.len(), 100);
        for label in &palette {
            assert_eq!(label.len(), 7);
            assert!(label.starts_with('#'));
            assert!(label[1..].chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        }
    }

    #[test]
    fn test_palette_is_distinct() {
        let palette = generate_palette(500);
        let unique: HashSet<_> = palette.iter().collect();
        assert_eq!(unique.len(), palette.len());
    }

    #[test]
    fn test_seeded_palette_is_reproducible() {
        assert_eq!(seeded_palette(7, 10), seeded_palette(7, 10));
        assert_ne!(seeded_palette(7, 10), seeded_palette(8, 10));
    }

    #[test]
    fn test_oversized_request_is_capped() {
        let palette = seeded_palette(3, MAX_PALETTE_SIZE + 1);
        assert_eq!(palette.len(), MAX_PALETTE_SIZE);
        assert!(!palette.contains(&"#FFFFFF".to_string()));
    }

    #[test]
    fn test_empty_palette() {
        assert!(generate_palette(0).is_empty());
    }
}
