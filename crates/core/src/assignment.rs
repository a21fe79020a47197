//! Work assignment: hand a user some page that still needs correcting.
//!
//! Selection is uniformly random over the unfinished pages. There is no
//! reservation, so two users may be handed the same page.

use rand::seq::IndexedRandom;
use rand::Rng;

/// Pick one candidate page id, or `None` if nothing is left to do.
pub fn pick_page<'a, R: Rng + ?Sized>(unfinished: &'a [String], rng: &mut R) -> Option<&'a str> {
    unfinished.choose(rng).map(String::as_str)
}
