//! Errors of the Blocks World environment.
//!
//! All of them are setup errors: a world or an environment cannot be built
//! from the given layout or configuration. Actions that are impossible in the
//! current state are not errors, they are no-ops.
use crate::BlockId;
use thiserror::Error;

/// Errors raised while setting up a world or an environment.
#[derive(Error, Debug, PartialEq)]
pub enum BlocksWorldError {
    /// More towers than columns.
    #[error("{num_towers} towers do not fit into {width} columns")]
    TooManyTowers { num_towers: usize, width: usize },

    /// More blocks than the world was built for.
    #[error("{num_blocks} blocks exceed the maximum of {max_num_blocks}")]
    TooManyBlocks {
        num_blocks: usize,
        max_num_blocks: usize,
    },

    /// A tower reaches the ceiling of the grid.
    #[error("tower {tower} has {len} blocks, at most {max} fit under the ceiling")]
    TowerTooTall { tower: usize, len: usize, max: usize },

    /// A tower refers to an object without an entry in the object id table.
    #[error("object {0} has no entry in the object id table")]
    UnknownObject(usize),

    /// The same block id appears twice.
    #[error("block id {0} is used more than once")]
    DuplicateBlock(BlockId),

    /// A block id collides with the empty cell value or the agent id.
    #[error("block id {0} is reserved for empty cells or the agent")]
    ReservedId(BlockId),

    /// Towers or the agent were assigned to columns that do not exist or clash.
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),

    /// The agent's column has no headroom.
    #[error("column {0} has no headroom for the agent")]
    NoHeadroom(usize),

    /// A colorless world with an agent was reset without target heights.
    #[error("colorless worlds need target heights")]
    MissingTargetHeights,

    /// Target heights do not cover every column.
    #[error("expected target heights for {expected} columns, got {got}")]
    TargetHeightsMismatch { expected: usize, got: usize },

    /// An action name outside `left`, `right`, `pick` and `drop`.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// An action index outside the action table.
    #[error("action index {0} is out of range")]
    ActionIndexOutOfRange(usize),

    /// Inconsistent environment configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
