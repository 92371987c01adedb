//! Arm navigation and manipulator kinematics

pub mod n_joint_arm;

pub use n_joint_arm::*;
