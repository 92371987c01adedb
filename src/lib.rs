//! rust_motion_planning - motion planning and path tracking for wheeled
//! and articulated robots
//!
//! This crate provides a Batch Informed Trees (BIT*) planner together with
//! its supporting grid-indexed tree structure, closed-form Dubins and
//! Reeds-Shepp path generators, a cubic-spline track representation with a
//! rear wheel feedback tracking controller, and n-joint arm kinematics.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod path_planning;
pub mod path_tracking;
pub mod arm_navigation;

// Re-export common types for convenience
pub use common::{Point2D, Pose2D, State2D, Path2D, CircleObstacle};
pub use common::{PathPlanner, PathTracker};
pub use common::{PlanningError, PlanningResult};
pub use path_planning::bit_star::{BitStarConfig, BitStarPlanner};
