use rand::seq::SliceRandom;
use rand::Rng;

/// Return a uniformly shuffled copy of `items` (Fisher-Yates), leaving the input as is.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}
