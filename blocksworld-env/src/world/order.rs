//! Target stacking order of a multi-color world.
use super::{Block, Location};
use std::collections::HashMap;

/// Bottom-to-top block colors of every column in the solved arrangement,
/// with a running count of blocks currently in position.
///
/// The count is maintained incrementally by the world: it changes only when
/// a dropped block flips its in-position flag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Order {
    columns: Vec<Vec<u32>>,
    num_blocks_in_position: usize,
}

impl Order {
    /// Reads the target arrangement from a layout.
    ///
    /// `heights[x]` bounds the rows scanned in column `x`; cells without a
    /// block in `lookup` (the agent's cell) are skipped.
    pub fn from_layout(
        lookup: &HashMap<Location, usize>,
        blocks: &[Block],
        heights: &[usize],
    ) -> Self {
        let columns = heights
            .iter()
            .enumerate()
            .map(|(x, &h)| {
                (0..h)
                    .filter_map(|y| lookup.get(&Location::new(x, y)))
                    .map(|&ix| blocks[ix].color())
                    .collect()
            })
            .collect();

        Self {
            columns,
            num_blocks_in_position: 0,
        }
    }

    /// Target colors of column `x`, bottom to top.
    pub fn column(&self, x: usize) -> &[u32] {
        self.columns.get(x).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if `candidate` placed in `column` on top of `below`
    /// (on the floor if `None`) occupies a slot of the target arrangement
    /// holding its color, and `below` holds the color of the slot underneath.
    pub fn is_in_position(&self, candidate: &Block, column: usize, below: Option<&Block>) -> bool {
        let target = self.column(column);
        match below {
            None => target.first() == Some(&candidate.color()),
            Some(below) => match below.location() {
                Some(loc) if loc.x == column => {
                    target.get(loc.y) == Some(&below.color())
                        && target.get(loc.y + 1) == Some(&candidate.color())
                }
                _ => false,
            },
        }
    }

    pub fn num_blocks_in_position(&self) -> usize {
        self.num_blocks_in_position
    }

    /// Adds `delta` to the number of blocks in position.
    pub fn adjust_count(&mut self, delta: i32) {
        let count = self.num_blocks_in_position as i64 + delta as i64;
        debug_assert!(count >= 0, "negative number of blocks in position");
        self.num_blocks_in_position = count.max(0) as usize;
    }

    pub(crate) fn reset_count(&mut self) {
        self.num_blocks_in_position = 0;
    }
}
