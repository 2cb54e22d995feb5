use crate::N_ACTIONS;
use blocksworld_core::Obs;
use ndarray::{Array2, Array3, ArrayView2, Axis};

/// Observation of [`BlocksWorldMatrixEnv`](crate::BlocksWorldMatrixEnv).
#[derive(Debug, Clone, PartialEq)]
pub struct BlocksWorldObs {
    /// Input and target grids stacked along the first axis, shape `(2, width, height)`.
    pub grids: Array3<f32>,

    /// Legality of every entry of the action table. All actions are always
    /// legal; impossible ones are no-ops.
    pub legal_actions: [bool; N_ACTIONS],
}

impl BlocksWorldObs {
    pub(crate) fn new(input: Array2<f32>, target: Array2<f32>) -> Self {
        let (width, height) = input.dim();
        let mut grids = Array3::zeros((2, width, height));
        grids.index_axis_mut(Axis(0), 0).assign(&input);
        grids.index_axis_mut(Axis(0), 1).assign(&target);
        Self {
            grids,
            legal_actions: [true; N_ACTIONS],
        }
    }

    /// The grid of the world the agent acts in.
    pub fn input(&self) -> ArrayView2<f32> {
        self.grids.index_axis(Axis(0), 0)
    }

    /// The grid of the target arrangement.
    pub fn target(&self) -> ArrayView2<f32> {
        self.grids.index_axis(Axis(0), 1)
    }
}

impl Obs for BlocksWorldObs {}
