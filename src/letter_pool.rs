use crate::shuffle::shuffle;
use rand::Rng;

pub const DEFAULT_POOL_SIZE: usize = 12;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Build the letters offered for a round: every letter of `normalized_word`
/// plus random distractors up to `pool_size`, shuffled together.
///
/// Words at least as long as the pool get no distractors; the pool simply
/// grows to the word's length. Distractors are sampled with replacement from
/// the letters the word does not use, so a pangram gets none at all.
pub fn generate<R: Rng + ?Sized>(normalized_word: &str, pool_size: usize, rng: &mut R) -> Vec<char> {
    let word_letters: Vec<char> = normalized_word.chars().collect();
    if word_letters.len() >= pool_size {
        return shuffle(&word_letters, rng);
    }

    let available: Vec<char> = ALPHABET
        .chars()
        .filter(|c| !word_letters.contains(c))
        .collect();
    let needed = if available.is_empty() {
        0
    } else {
        pool_size - word_letters.len()
    };

    let mut letters = word_letters;
    letters.extend((0..needed).map(|_| available[rng.gen_range(0..available.len())]));
    shuffle(&letters, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn contains_word_letters(pool: &[char], word: &str) -> bool {
        let pool_counts = pool.iter().copied().counts();
        word.chars()
            .counts()
            .iter()
            .all(|(c, n)| pool_counts.get(c).copied().unwrap_or(0) >= *n)
    }

    #[test]
    fn test_generate_pads_to_pool_size() {
        let mut rng = StdRng::seed_from_u64(3);
        for word in ["soleil", "riviere", "a", "chocolat", "anagramme", "montagnes"] {
            let pool = generate(word, DEFAULT_POOL_SIZE, &mut rng);
            assert_eq!(pool.len(), DEFAULT_POOL_SIZE, "{word}");
            assert!(contains_word_letters(&pool, word), "{word}");
            assert!(pool.iter().all(|c| c.is_ascii_lowercase()), "{word}");
        }
    }

    #[test]
    fn test_distractors_avoid_word_letters() {
        let mut rng = StdRng::seed_from_u64(5);
        let word = "livre";
        for _ in 0..50 {
            let pool = generate(word, DEFAULT_POOL_SIZE, &mut rng);
            let mut extra = pool.iter().copied().counts();
            for c in word.chars() {
                *extra.get_mut(&c).unwrap() -= 1;
            }
            for (c, n) in extra {
                if n > 0 {
                    assert!(!word.contains(c), "distractor {c} is a word letter");
                }
            }
        }
    }

    #[test]
    fn test_exact_length_word_has_no_distractors() {
        let mut rng = StdRng::seed_from_u64(9);
        let word = "abcdefghijkl";
        let pool = generate(word, 12, &mut rng);
        assert_eq!(pool.iter().sorted().collect::<String>(), word);
    }

    #[test]
    fn test_long_word_grows_pool() {
        let mut rng = StdRng::seed_from_u64(13);
        let word = "anticonstitutionnellement";
        let pool = generate(word, DEFAULT_POOL_SIZE, &mut rng);
        assert_eq!(pool.len(), word.chars().count());
        assert_eq!(pool.iter().copied().counts(), word.chars().counts());
    }

    #[test]
    fn test_pangram_gets_no_distractors() {
        let mut rng = StdRng::seed_from_u64(17);
        let word = "abcdefghijklmnopqrstuvwxyz";
        let pool = generate(word, 40, &mut rng);
        assert_eq!(pool.len(), 26);
    }

    #[test]
    fn test_non_ascii_letters_are_kept() {
        let mut rng = StdRng::seed_from_u64(19);
        let pool = generate("œuvre", DEFAULT_POOL_SIZE, &mut rng);
        assert_eq!(pool.len(), DEFAULT_POOL_SIZE);
        assert!(pool.contains(&'œ'));
    }
}
