use crate::BlocksWorldError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// An action of the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Left,
    Right,
    Pick,
    Drop,
}

impl Action {
    /// The action table of [`BlocksWorldMatrixEnv`](crate::BlocksWorldMatrixEnv),
    /// in index order.
    pub const ALL: [Action; 4] = [Action::Left, Action::Right, Action::Pick, Action::Drop];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Pick => "pick",
            Action::Drop => "drop",
        }
    }

    /// Position of the action in [`Action::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Action::Left => 0,
            Action::Right => 1,
            Action::Pick => 2,
            Action::Drop => 3,
        }
    }

    pub fn from_index(ix: usize) -> Result<Self, BlocksWorldError> {
        Self::ALL
            .get(ix)
            .copied()
            .ok_or(BlocksWorldError::ActionIndexOutOfRange(ix))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = BlocksWorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Action::Left),
            "right" => Ok(Action::Right),
            "pick" => Ok(Action::Pick),
            "drop" => Ok(Action::Drop),
            _ => Err(BlocksWorldError::UnknownAction(s.to_string())),
        }
    }
}
