#![warn(missing_docs)]
//! Interfaces between the Blocks World environment and the code driving it.
//!
//! Learning code only sees an environment through [`Env`]: it resets the
//! environment, feeds actions chosen by a [`Policy`] and receives [`Step`]
//! objects back. [`Evaluator`]s and [`util::eval_with_recorder`] run whole
//! episodes on top of these traits, and [`record`] carries per-step values
//! out of the environment.
pub mod error;
pub mod record;
pub mod util;

mod base;
pub use base::{Act, Configurable, Env, Info, Obs, Policy, Step};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

#[cfg(test)]
mod dummy;
