use super::{Location, Order};
use crate::BlockId;

/// A movable block.
///
/// The location is owned by the world holding the block; a block picked up
/// by the agent has no location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Block {
    id: BlockId,
    color: u32,
    location: Option<Location>,
    in_position: bool,
}

impl Block {
    pub fn new(id: BlockId, color: u32) -> Self {
        Self {
            id,
            color,
            location: None,
            in_position: false,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// `true` if the block sat in its target slot when it was last placed.
    pub fn in_position(&self) -> bool {
        self.in_position
    }

    /// Overwrites the location. Bounds are the caller's responsibility.
    pub fn set_location(&mut self, loc: Location) {
        self.location = Some(loc);
    }

    pub(crate) fn clear_location(&mut self) {
        self.location = None;
    }

    /// Compares the block's current slot against `order`, given the block it
    /// rests on (`None` on the floor), and stores the result.
    pub fn mark_in_position(&mut self, order: &Order, below: Option<&Block>) {
        self.in_position = match self.location {
            Some(loc) => order.is_in_position(self, loc.x, below),
            None => false,
        };
    }
}
