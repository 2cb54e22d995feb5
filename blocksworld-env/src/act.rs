//! Action for [`BlocksWorldMatrixEnv`](crate::BlocksWorldMatrixEnv).
use crate::{Action, BlocksWorldError};
use blocksworld_core::Act;
use std::convert::TryFrom;

/// Action for [`BlocksWorldMatrixEnv`](crate::BlocksWorldMatrixEnv), an entry
/// of the action table `0: left, 1: right, 2: pick, 3: drop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlocksWorldAct {
    pub act: Action,
}

impl BlocksWorldAct {
    pub fn new(act: Action) -> Self {
        Self { act }
    }

    /// Looks up the action table.
    pub fn from_index(ix: usize) -> Result<Self, BlocksWorldError> {
        Action::from_index(ix).map(Self::new)
    }

    pub fn index(&self) -> usize {
        self.act.index()
    }
}

impl Act for BlocksWorldAct {}

impl From<Action> for BlocksWorldAct {
    fn from(act: Action) -> Self {
        Self { act }
    }
}

impl TryFrom<usize> for BlocksWorldAct {
    type Error = BlocksWorldError;

    fn try_from(ix: usize) -> Result<Self, Self::Error> {
        Self::from_index(ix)
    }
}
