//! Error types for rust_motion_planning

use std::fmt;

/// Main error type for planning and tracking algorithms
#[derive(Debug)]
pub enum PlanningError {
    /// Start/goal/bounds dimensionality mismatch
    InvalidDimension { expected: usize, got: usize },
    /// Iteration budget exhausted before the goal was connected.
    /// Expected and non-fatal; the caller decides whether to retry
    /// with a larger budget.
    NoPathFound,
    /// Start equals goal, or the informed set has zero volume
    DegenerateGeometry(String),
    /// Invalid parameter
    InvalidParameter(String),
    /// Numerical computation failed (SVD, matrix inversion, etc.)
    NumericalError(String),
    /// Visualization error
    VisualizationError(String),
}

impl fmt::Display for PlanningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanningError::InvalidDimension { expected, got } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, got)
            }
            PlanningError::NoPathFound => write!(f, "No path found within the iteration budget"),
            PlanningError::DegenerateGeometry(msg) => write!(f, "Degenerate geometry: {}", msg),
            PlanningError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PlanningError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            PlanningError::VisualizationError(msg) => write!(f, "Visualization error: {}", msg),
        }
    }
}

impl std::error::Error for PlanningError {}

/// Result type alias for planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanningError::NoPathFound;
        assert_eq!(
            format!("{}", err),
            "No path found within the iteration budget"
        );
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = PlanningError::InvalidDimension { expected: 2, got: 3 };
        assert_eq!(format!("{}", err), "Dimension mismatch: expected 2, got 3");
    }
}
