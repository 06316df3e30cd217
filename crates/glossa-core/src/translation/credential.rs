//! API key selection.
//!
//! The settings may hold several comma-separated keys; each call picks one at
//! random so load spreads across keys by chance. There is no usage tracking,
//! so a single key can still be exhausted by a burst.

use rand::Rng;
use rand::seq::SliceRandom;

/// Picks one non-empty key from a comma-separated list, uniformly at random.
///
/// Entries are not trimmed. Returns `None` when no non-empty entry exists.
pub fn select_api_key<'a, R: Rng + ?Sized>(raw: &'a str, rng: &mut R) -> Option<&'a str> {
    let keys: Vec<&str> = raw.split(',').filter(|key| !key.is_empty()).collect();
    keys.choose(rng).copied()
}
