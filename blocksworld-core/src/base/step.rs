//! What an environment emits per action.
use super::Env;

/// Per-step values specific to an environment.
pub trait Info {}

impl Info for () {}

/// Outcome of one action: the action itself, the next observation, the reward
/// and whether the episode is over.
pub struct Step<E: Env> {
    /// The action that was applied.
    pub act: E::Act,

    /// Observation after the action.
    pub obs: E::Obs,

    pub reward: f32,

    /// The task was solved.
    pub is_terminated: bool,

    /// The episode hit its step limit without being solved.
    pub is_truncated: bool,

    pub info: E::Info,

    /// First observation of the next episode, set by [`Env::step_with_reset`]
    /// once this one is over.
    pub init_obs: Option<E::Obs>,
}

impl<E: Env> Step<E> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        obs: E::Obs,
        act: E::Act,
        reward: f32,
        is_terminated: bool,
        is_truncated: bool,
        info: E::Info,
        init_obs: Option<E::Obs>,
    ) -> Self {
        Self {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
            info,
            init_obs,
        }
    }

    /// The episode is over, either way.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
