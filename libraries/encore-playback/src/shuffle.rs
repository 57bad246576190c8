//! Shuffle selection for end-of-track advance
//!
//! `next`/`prev` always walk the queue in order; only the automatic
//! advance after a track ends consults the shuffle flag.

use rand::Rng;

/// Pick a random queue position other than `current`
///
/// Returns `None` when there is nothing else to pick (fewer than two
/// entries). Every other position is equally likely.
pub fn pick_next<R: Rng + ?Sized>(len: usize, current: usize, rng: &mut R) -> Option<usize> {
    if len < 2 {
        return None;
    }

    // Draw from the len-1 other slots and skip over `current`
    let pick = rng.gen_range(0..len - 1);
    if pick >= current.min(len - 1) {
        Some(pick + 1)
    } else {
        Some(pick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn nothing_to_pick_from_short_queue() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick_next(0, 0, &mut rng), None);
        assert_eq!(pick_next(1, 0, &mut rng), None);
    }

    #[test]
    fn never_repeats_current() {
        let mut rng = StdRng::seed_from_u64(42);
        for current in 0..5 {
            for _ in 0..200 {
                let pick = pick_next(5, current, &mut rng).unwrap();
                assert_ne!(pick, current);
                assert!(pick < 5);
            }
        }
    }

    #[test]
    fn two_entries_always_swap() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_next(2, 0, &mut rng), Some(1));
        assert_eq!(pick_next(2, 1, &mut rng), Some(0));
    }

    #[test]
    fn reaches_every_other_position() {
        let mut rng = StdRng::seed_from_u64(3);
        let seen: HashSet<usize> = (0..500)
            .filter_map(|_| pick_next(6, 2, &mut rng))
            .collect();
        assert_eq!(seen, HashSet::from([0, 1, 3, 4, 5]));
    }
}
