use super::{Block, Cell, Grid, Location};
use crate::AgentId;
use std::collections::HashMap;

/// What the agent carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentState {
    Empty,

    /// `block` indexes the block table of the world; `picked_from` is the
    /// cell the block was taken from.
    Holding { block: usize, picked_from: Location },
}

/// The actor of a world.
///
/// The agent occupies a cell on top of a column like a block, but it is never
/// part of the block lookup. A held block travels inside the agent's cell:
/// picking lowers the agent into the cell the block left, dropping puts the
/// block back into the agent's cell and lifts the agent by one row. Either way
/// the column stays contiguous.
///
/// None of the methods check their preconditions; [`BlocksWorld::update`]
/// filters impossible actions before calling them.
///
/// [`BlocksWorld::update`]: super::BlocksWorld::update
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    id: AgentId,
    location: Location,
    state: AgentState,
}

impl Agent {
    pub fn new(id: AgentId, location: Location) -> Self {
        Self {
            id,
            location,
            state: AgentState::Empty,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.state, AgentState::Holding { .. })
    }

    /// Index of the held block.
    pub fn held_block(&self) -> Option<usize> {
        match self.state {
            AgentState::Holding { block, .. } => Some(block),
            AgentState::Empty => None,
        }
    }

    /// Where the held block was picked from.
    pub fn picked_from(&self) -> Option<Location> {
        match self.state {
            AgentState::Holding { picked_from, .. } => Some(picked_from),
            AgentState::Empty => None,
        }
    }

    /// Moves the agent from its cell to `dest`, which must be the free cell on
    /// top of a neighbouring column.
    pub fn move_to(&mut self, dest: Location, grid: &mut Grid, heights: &mut [usize]) {
        grid.clear(self.location);
        heights[self.location.x] -= 1;

        grid.set(dest, Cell::Agent(self.id));
        heights[dest.x] += 1;
        self.location = dest;
    }

    /// Takes `block`, which must rest directly below the agent.
    pub fn pick_up(
        &mut self,
        ix: usize,
        block: &mut Block,
        grid: &mut Grid,
        lookup: &mut HashMap<Location, usize>,
        heights: &mut [usize],
    ) {
        let from = match block.location() {
            Some(loc) => loc,
            None => return,
        };

        lookup.remove(&from);
        block.clear_location();

        grid.clear(self.location);
        grid.set(from, Cell::Agent(self.id));
        heights[from.x] -= 1;

        self.location = from;
        self.state = AgentState::Holding {
            block: ix,
            picked_from: from,
        };
    }

    /// Puts the held block into the agent's cell and steps on top of it.
    ///
    /// Returns the index of the dropped block and the cell it was picked from,
    /// or `None` if the agent was empty-handed.
    pub fn drop(
        &mut self,
        blocks: &mut [Block],
        grid: &mut Grid,
        lookup: &mut HashMap<Location, usize>,
        heights: &mut [usize],
    ) -> Option<(usize, Location)> {
        let (ix, picked_from) = match self.state {
            AgentState::Holding { block, picked_from } => (block, picked_from),
            AgentState::Empty => return None,
        };

        let at = self.location;
        let block = &mut blocks[ix];
        block.set_location(at);
        grid.set(at, Cell::Block(block.id()));
        lookup.insert(at, ix);

        let above = at.above();
        debug_assert!(above.y < grid.height(), "no room above the dropped block");
        grid.set(above, Cell::Agent(self.id));
        heights[at.x] += 1;

        self.location = above;
        self.state = AgentState::Empty;
        Some((ix, picked_from))
    }
}
