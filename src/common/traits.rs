//! Common traits defining interfaces for planning and tracking algorithms

use crate::common::error::PlanningError;
use crate::common::types::*;

/// Trait for path planning algorithms
pub trait PathPlanner {
    /// Plan a path from start to goal
    fn plan(&mut self, start: Point2D, goal: Point2D) -> Result<Path2D, PlanningError>;
}

/// Trait for path tracking/following algorithms
pub trait PathTracker {
    /// Compute (acceleration, steering angle) to follow the tracked path
    fn compute_control(&mut self, current_state: &State2D) -> (f64, f64);

    /// Check if the goal has been reached
    fn is_goal_reached(&self, current_state: &State2D) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that traits compile correctly
    struct DummyPlanner;

    impl PathPlanner for DummyPlanner {
        fn plan(&mut self, start: Point2D, _goal: Point2D) -> Result<Path2D, PlanningError> {
            Ok(Path2D::from_points(vec![start]))
        }
    }

    #[test]
    fn test_path_planner_trait() {
        let mut planner = DummyPlanner;
        let result = planner.plan(Point2D::origin(), Point2D::new(1.0, 1.0));
        assert!(result.is_ok());
    }
}
