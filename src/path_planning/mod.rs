//! Path planning algorithms

pub mod bit_star;
pub mod dubins_path;
pub mod reeds_shepp_path;
pub mod cubic_spline_planner;

pub use bit_star::*;
pub use dubins_path::*;
pub use reeds_shepp_path::*;
pub use cubic_spline_planner::*;
