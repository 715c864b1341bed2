use crate::letter_pool;
use crate::normalize::normalize;
use crate::words::Word;
use rand::Rng;
use std::collections::BTreeSet;

/// One word-guessing attempt.
///
/// Letters are conserved: every letter is either in the pool or in the guess,
/// and the combined multiset never changes after the round is built.
/// A consumed pool slot is `None`; returned letters go to the first empty slot.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    word: Word,
    normalized_word: String,
    target: Vec<char>,
    letter_pool: Vec<Option<char>>,
    guess: Vec<Option<char>>,
    hinted: BTreeSet<usize>,
    time_remaining: u32,
}

impl RoundState {
    pub fn new<R: Rng + ?Sized>(word: Word, pool_size: usize, round_secs: u32, rng: &mut R) -> Self {
        let normalized_word = normalize(&word.text);
        let target: Vec<char> = normalized_word.chars().collect();
        let letter_pool = letter_pool::generate(&normalized_word, pool_size, rng)
            .into_iter()
            .map(Some)
            .collect();

        Self {
            word,
            guess: vec![None; target.len()],
            normalized_word,
            target,
            letter_pool,
            hinted: BTreeSet::new(),
            time_remaining: round_secs,
        }
    }

    pub fn word(&self) -> &Word {
        &self.word
    }

    pub fn normalized_word(&self) -> &str {
        &self.normalized_word
    }

    pub fn letter_pool(&self) -> &[Option<char>] {
        &self.letter_pool
    }

    pub fn guess(&self) -> &[Option<char>] {
        &self.guess
    }

    pub fn hinted(&self) -> &BTreeSet<usize> {
        &self.hinted
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// First pool slot currently holding `letter`.
    pub fn pool_index_of(&self, letter: char) -> Option<usize> {
        self.letter_pool.iter().position(|s| *s == Some(letter))
    }

    /// The filled guess slots joined together.
    pub fn guessed_word(&self) -> String {
        self.guess.iter().flatten().collect()
    }

    pub fn is_solved(&self) -> bool {
        self.guess.iter().all(Option::is_some) && self.guessed_word() == self.normalized_word
    }

    /// One second off the clock. True once the clock has run out.
    pub(crate) fn tick(&mut self) -> bool {
        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.time_remaining == 0
    }

    /// Move the letter at `pool_index` into the first empty guess slot.
    pub(crate) fn place_letter(&mut self, pool_index: usize) -> bool {
        let Some(letter) = self.letter_pool.get(pool_index).copied().flatten() else {
            return false;
        };
        let Some(slot) = self.guess.iter().position(Option::is_none) else {
            return false;
        };
        self.guess[slot] = Some(letter);
        self.letter_pool[pool_index] = None;
        true
    }

    /// Send the last player-placed letter back to the pool. Hinted slots stay.
    pub(crate) fn backspace(&mut self) -> bool {
        let last = (0..self.guess.len())
            .rev()
            .find(|i| self.guess[*i].is_some() && !self.hinted.contains(i));
        match last.and_then(|i| self.guess[i].take()) {
            Some(letter) => {
                self.return_to_pool(letter);
                true
            }
            None => false,
        }
    }

    /// Guess positions that do not yet hold their correct letter.
    pub fn hint_candidates(&self) -> Vec<usize> {
        (0..self.target.len())
            .filter(|&i| self.guess[i] != Some(self.target[i]))
            .collect()
    }

    /// Put the correct letter at `index` and pin it there.
    ///
    /// A wrong letter already at `index` goes back to the pool. The correct
    /// letter comes out of the pool, or, when every copy is already on the
    /// board, out of a slot where the player misplaced it. The pool holds
    /// every copy the word needs and `index` still lacks one, so when the
    /// pool is out at least one copy sits in a wrong slot.
    pub(crate) fn reveal(&mut self, index: usize) -> bool {
        let Some(&correct) = self.target.get(index) else {
            return false;
        };

        if self.guess[index] != Some(correct) {
            if let Some(wrong) = self.guess[index].take() {
                self.return_to_pool(wrong);
            }
            if let Some(slot) = self.pool_index_of(correct) {
                self.letter_pool[slot] = None;
            } else if let Some(misplaced) = (0..self.guess.len())
                .find(|&j| self.guess[j] == Some(correct) && self.target[j] != correct)
            {
                self.guess[misplaced] = None;
            }
            self.guess[index] = Some(correct);
        }

        self.hinted.insert(index);
        true
    }

    fn return_to_pool(&mut self, letter: char) {
        match self.letter_pool.iter().position(Option::is_none) {
            Some(slot) => self.letter_pool[slot] = Some(letter),
            None => self.letter_pool.push(Some(letter)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn round(text: &str) -> RoundState {
        let mut rng = StdRng::seed_from_u64(99);
        RoundState::new(Word::new(text, "indice"), 12, 60, &mut rng)
    }

    fn letters(r: &RoundState) -> HashMap<char, usize> {
        r.letter_pool
            .iter()
            .chain(r.guess.iter())
            .flatten()
            .copied()
            .counts()
    }

    fn type_word(r: &mut RoundState, text: &str) {
        for c in text.chars() {
            let idx = r.pool_index_of(c).unwrap();
            assert!(r.place_letter(idx));
        }
    }

    #[test]
    fn test_new_round_normalizes_word() {
        let r = round("Rivière");
        assert_eq!(r.normalized_word(), "riviere");
        assert_eq!(r.guess().len(), 7);
        assert!(r.guess().iter().all(Option::is_none));
        assert_eq!(r.letter_pool().len(), 12);
        assert_eq!(r.time_remaining(), 60);
        assert!(r.hinted().is_empty());
    }

    #[test]
    fn test_place_letter_fills_first_empty_slot() {
        let mut r = round("soleil");
        let s = r.pool_index_of('s').unwrap();
        assert!(r.place_letter(s));
        assert_eq!(r.guess()[0], Some('s'));
        assert_eq!(r.letter_pool()[s], None);

        // consumed slot is inert
        assert!(!r.place_letter(s));
        assert!(!r.place_letter(100));
    }

    #[test]
    fn test_place_letter_when_guess_full() {
        let mut r = round("livre");
        type_word(&mut r, "livre");
        let before = r.clone();
        let spare = r.letter_pool().iter().position(Option::is_some).unwrap();
        assert!(!r.place_letter(spare));
        assert_eq!(r, before);
    }

    #[test]
    fn test_backspace_returns_letter_to_first_empty_pool_slot() {
        let mut r = round("jardin");
        type_word(&mut r, "ja");
        let first_empty = r.letter_pool().iter().position(Option::is_none).unwrap();

        assert!(r.backspace());
        assert_eq!(r.guess()[1], None);
        assert_eq!(r.letter_pool()[first_empty], Some('a'));
        assert_eq!(letters(&r), letters(&round("jardin")));
    }

    #[test]
    fn test_backspace_skips_hinted_slots() {
        let mut r = round("voyage");
        assert!(r.reveal(5));
        assert!(!r.backspace());
        assert_eq!(r.guess()[5], Some('e'));

        type_word(&mut r, "v");
        assert!(r.backspace());
        assert_eq!(r.guess()[0], None);
        assert_eq!(r.guess()[5], Some('e'));
    }

    #[test]
    fn test_reveal_replaces_wrong_letter() {
        let mut r = round("musique");
        let initial = letters(&r);
        // 'e' belongs at the end, put it first
        type_word(&mut r, "e");
        assert!(r.reveal(0));

        assert_eq!(r.guess()[0], Some('m'));
        assert!(r.hinted().contains(&0));
        assert_eq!(letters(&r), initial);
        assert!(r.pool_index_of('e').is_some());
    }

    #[test]
    fn test_reveal_takes_misplaced_letter_when_pool_is_out() {
        // a n a g r a m m e: three 'a', all typed before slot 0 gets one
        let mut r = round("anagramme");
        let initial = letters(&r);
        type_word(&mut r, "naaa");
        // guess: n a a a _ _ _ _ _; only slot 2 is right
        assert_eq!(r.pool_index_of('a'), None);

        assert!(r.reveal(0));
        assert_eq!(r.guess()[0], Some('a'));
        assert_eq!(r.guess()[1], None, "misplaced 'a' moved to the hint");
        assert_eq!(r.guess()[2], Some('a'), "correct 'a' untouched");
        assert_eq!(r.guess()[3], Some('a'));
        assert!(r.pool_index_of('n').is_some());
        assert_eq!(letters(&r), initial);
    }

    #[test]
    fn test_hint_candidates_exclude_correct_slots() {
        let mut r = round("anagramme");
        type_word(&mut r, "an");
        assert_eq!(r.hint_candidates(), (2..9).collect::<Vec<_>>());
        r.reveal(8);
        assert_eq!(r.hint_candidates(), (2..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_letters_conserved_over_random_play() {
        let mut rng = StdRng::seed_from_u64(1234);
        for text in ["anagramme", "bibliothèque", "anticonstitutionnellement", "cerise"] {
            let mut r = RoundState::new(Word::new(text, "indice"), 12, 60, &mut rng);
            let initial = letters(&r);
            for _ in 0..300 {
                match rng.gen_range(0..3) {
                    0 => {
                        let idx = rng.gen_range(0..r.letter_pool().len());
                        r.place_letter(idx);
                    }
                    1 => {
                        r.backspace();
                    }
                    _ => {
                        let candidates = r.hint_candidates();
                        if !candidates.is_empty() {
                            let i = candidates[rng.gen_range(0..candidates.len())];
                            r.reveal(i);
                        }
                    }
                }
                assert_eq!(letters(&r), initial, "{text}");
                for i in r.hinted() {
                    assert_eq!(r.guess()[*i], Some(r.normalized_word().chars().nth(*i).unwrap()));
                }
            }
        }
    }

    #[test]
    fn test_is_solved() {
        let mut r = round("forêt");
        assert!(!r.is_solved());
        type_word(&mut r, "fore");
        assert!(!r.is_solved());
        type_word(&mut r, "t");
        assert!(r.is_solved());
    }

    #[test]
    fn test_tick_runs_out() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut r = RoundState::new(Word::new("plage", "sable"), 12, 2, &mut rng);
        assert!(!r.tick());
        assert!(r.tick());
        assert!(r.tick());
        assert_eq!(r.time_remaining(), 0);
    }
}
