//! Batch Informed Trees (BIT*) path planning
//!
//! BIT* is an anytime sampling-based motion planner that alternates
//! informed batch sampling with best-first tree expansion ordered by
//! admissible lower-bound cost estimates. The search is performed over a
//! grid-discretized configuration space: every vertex and sample is keyed
//! by the integer id of its grid cell.
//!
//! Ref:
//!     - J. D. Gammell, S. S. Srinivasa, T. D. Barfoot,
//!       "Batch Informed Trees (BIT*): Sampling-based Optimal Planning via
//!       the Heuristically Guided Search of Implicit Random Geometric Graphs"
//!       https://arxiv.org/abs/1405.5848

pub mod grid_index;
pub mod tree;
pub mod cost;
pub mod sampler;
pub mod planner;

pub use grid_index::{GridIndex, NodeId};
pub use tree::Tree;
pub use cost::CostModel;
pub use sampler::InformedSampler;
pub use planner::{BitStarConfig, BitStarPlanner};
