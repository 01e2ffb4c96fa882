//! Fisher–Yates shuffle over an injected random source.

use rand::Rng;
use rand::seq::SliceRandom;

/// Shuffle `items` in place; every permutation is equally likely.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}
