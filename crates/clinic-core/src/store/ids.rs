//! Id generation.
//!
//! New ids are `base + live count`. Hard deletes shrink the live count, so
//! under [`IdPolicy::LiveCount`] a later add can hand out an id that an
//! appointment still references. [`IdPolicy::Monotonic`] never goes below
//! the highest id ever issued in the block, deleted records included.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::ID_BLOCK;

/// How the next id is derived from a store's contents.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// `base + count`, ids can be reused after a hard delete
    #[default]
    LiveCount,
    /// `max(base + count, highest id ever issued in the block + 1)`
    Monotonic,
}

/// Next id for a store holding `count` records, given the highest id
/// issued so far in `base`'s block.
///
/// Must be called once per creation, before the record is appended.
pub fn generate_id(policy: IdPolicy, base: i32, count: usize, highest_issued: Option<i32>) -> i32 {
    let by_count = base + count as i32;
    match policy {
        IdPolicy::LiveCount => by_count,
        IdPolicy::Monotonic => highest_issued.map_or(by_count, |highest| by_count.max(highest + 1)),
    }
}

/// Highest id seen in each id block. Marks only ever go up.
///
/// Users mix blocks (admins 3001.., receptionists 4001.., doctors 2001..),
/// so each block keeps its own mark.
#[derive(Debug, Clone, Default)]
pub struct HighWater {
    marks: BTreeMap<i32, i32>,
}

impl HighWater {
    pub fn raise(&mut self, id: i32) {
        let mark = self.marks.entry(block_of(id)).or_insert(id);
        *mark = (*mark).max(id);
    }

    /// Highest id seen in the block that starts at `base`.
    pub fn highest(&self, base: i32) -> Option<i32> {
        self.marks.get(&block_of(base)).copied()
    }
}

// blocks are 1001..=2000, 2001..=3000, ...
fn block_of(id: i32) -> i32 {
    (id - 1).div_euclid(ID_BLOCK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_count_uses_count_only() {
        assert_eq!(generate_id(IdPolicy::LiveCount, 1001, 0, None), 1001);
        assert_eq!(generate_id(IdPolicy::LiveCount, 1001, 3, Some(1003)), 1004);
        // 1002 was hard-deleted: the next add reuses 1003
        assert_eq!(generate_id(IdPolicy::LiveCount, 1001, 2, Some(1003)), 1003);
    }

    #[test]
    fn test_monotonic_skips_past_highest() {
        assert_eq!(generate_id(IdPolicy::Monotonic, 1001, 2, Some(1003)), 1004);
        // the highest record itself was deleted
        assert_eq!(generate_id(IdPolicy::Monotonic, 1001, 1, Some(1002)), 1003);
        assert_eq!(generate_id(IdPolicy::Monotonic, 1001, 0, None), 1001);
    }

    #[test]
    fn test_high_water_never_drops() {
        let mut marks = HighWater::default();
        marks.raise(1002);
        marks.raise(1001);
        assert_eq!(marks.highest(1001), Some(1002));
        assert_eq!(marks.highest(2001), None);
    }

    #[test]
    fn test_high_water_keeps_blocks_apart() {
        let mut marks = HighWater::default();
        marks.raise(3001);
        marks.raise(3002);
        marks.raise(4001);
        marks.raise(2000);
        assert_eq!(marks.highest(3001), Some(3002));
        assert_eq!(marks.highest(4001), Some(4001));
        assert_eq!(marks.highest(1001), Some(2000));
        assert_eq!(marks.highest(2001), None);
    }
}
