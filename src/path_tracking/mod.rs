//! Path tracking controllers

pub mod rear_wheel_feedback;

pub use rear_wheel_feedback::*;
