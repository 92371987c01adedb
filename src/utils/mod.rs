//! Utility modules for rust_motion_planning

pub mod visualization;

pub use visualization::{colors, PathStyle, PointStyle, Visualizer};
