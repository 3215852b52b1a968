// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Random assignment of replacement-pool entries to sources.

use rand::Rng;

use crate::error::{Error, Result};

/// A planned pairing of a source with a replacement-pool slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub source_index: usize,
    pub pool_index: usize,
}

/// Number of sources a run attempts: `floor(replace_ratio * source_len)`.
pub fn assignment_count(source_len: usize, replace_ratio: f64) -> usize {
    (replace_ratio * source_len as f64).floor() as usize
}

/// Draws the assignments for one run.
///
/// Pool indices are sampled independently and uniformly from
/// `0..pool_size`, with replacement. Assignment `k` always pairs with source
/// `k`, so sources are attempted from the front of the list in order.
pub fn plan<R: Rng + ?Sized>(
    source_len: usize,
    pool_size: usize,
    replace_ratio: f64,
    rng: &mut R,
) -> Result<Vec<Assignment>> {
    if !(0.0..=1.0).contains(&replace_ratio) {
        return Err(Error::InvalidConfig(format!(
            "replace_ratio must be within [0, 1], got {replace_ratio}"
        )));
    }

    let count = assignment_count(source_len, replace_ratio);
    if count > 0 && pool_size == 0 {
        return Err(Error::InvalidConfig(format!(
            "{count} replacements requested but the replacement pool is empty"
        )));
    }

    Ok((0..count)
        .map(|source_index| Assignment {
            source_index,
            pool_index: rng.gen_range(0..pool_size),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn count_is_floored() {
        assert_eq!(assignment_count(10, 1.0), 10);
        assert_eq!(assignment_count(10, 0.35), 3);
        assert_eq!(assignment_count(3, 0.5), 1);
        assert_eq!(assignment_count(0, 1.0), 0);
        assert_eq!(assignment_count(7, 0.0), 0);
    }

    #[test]
    fn sources_are_paired_in_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let plan = plan(6, 4, 1.0, &mut rng).unwrap();

        let sources: Vec<_> = plan.iter().map(|a| a.source_index).collect();
        assert_eq!(sources, [0, 1, 2, 3, 4, 5]);
        assert!(plan.iter().all(|a| a.pool_index < 4));
    }

    #[test]
    fn ratio_grid_matches_floor() {
        let mut rng = StdRng::seed_from_u64(3);
        for len in [0usize, 1, 5, 17] {
            for ratio in [0.0, 0.1, 0.5, 0.99, 1.0] {
                let plan = plan(len, 2, ratio, &mut rng).unwrap();
                assert_eq!(plan.len(), assignment_count(len, ratio));
            }
        }
    }

    #[test]
    fn pool_indices_repeat_and_cover_pool() {
        let mut rng = StdRng::seed_from_u64(5);
        let plan = plan(200, 3, 1.0, &mut rng).unwrap();
        let mut seen = [0usize; 3];
        for a in &plan {
            seen[a.pool_index] += 1;
        }
        assert!(seen.iter().all(|&n| n > 0));
        assert_eq!(seen.iter().sum::<usize>(), 200);
    }

    #[test]
    fn empty_pool_fails_only_when_work_is_requested() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(plan(4, 0, 0.5, &mut rng), Err(Error::InvalidConfig(_))));
        assert!(plan(4, 0, 0.0, &mut rng).unwrap().is_empty());
        assert!(plan(0, 0, 1.0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_ratio_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(plan(4, 2, 1.5, &mut rng), Err(Error::InvalidConfig(_))));
        assert!(matches!(plan(4, 2, -0.1, &mut rng), Err(Error::InvalidConfig(_))));
        assert!(matches!(plan(4, 2, f64::NAN, &mut rng), Err(Error::InvalidConfig(_))));
    }
}
