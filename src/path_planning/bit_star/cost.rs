//! Edge distance and heuristic cost between grid cell ids
//!
//! Both costs resolve the ids to configuration points through the grid and
//! return the Euclidean norm of the difference. Using the same metric for
//! the heuristic keeps it consistent and admissible (it never exceeds the
//! true edge distance), which the BIT* lower-bound pruning relies on.

use super::grid_index::{GridIndex, NodeId};

#[derive(Debug, Clone)]
pub struct CostModel {
    grid: GridIndex,
}

impl CostModel {
    pub fn new(grid: GridIndex) -> Self {
        CostModel { grid }
    }

    /// True edge cost: L2 norm between the cell anchor points
    pub fn distance(&self, a: NodeId, b: NodeId) -> f64 {
        let pa = self.grid.to_point(a);
        let pb = self.grid.to_point(b);
        pa.iter()
            .zip(pb.iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// Admissible cost-to-go estimate; identical to the edge metric
    pub fn heuristic(&self, a: NodeId, b: NodeId) -> f64 {
        self.distance(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost_model() -> CostModel {
        let grid = GridIndex::new(vec![0.0, 0.0], vec![15.0, 15.0], 0.1).unwrap();
        CostModel::new(grid)
    }

    #[test]
    fn test_metric_symmetry_and_identity() {
        let cost = cost_model();
        let grid = GridIndex::new(vec![0.0, 0.0], vec![15.0, 15.0], 0.1).unwrap();
        let a = grid.to_id(&[1.0, 2.0]);
        let b = grid.to_id(&[4.0, 6.0]);
        assert!((cost.distance(a, b) - cost.distance(b, a)).abs() < 1e-12);
        assert_eq!(cost.distance(a, a), 0.0);
    }

    #[test]
    fn test_known_distance() {
        let cost = cost_model();
        let grid = GridIndex::new(vec![0.0, 0.0], vec![15.0, 15.0], 0.1).unwrap();
        let a = grid.to_id(&[0.0, 0.0]);
        let b = grid.to_id(&[3.0, 4.0]);
        assert!((cost.distance(a, b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_heuristic_is_admissible() {
        // The heuristic must never exceed the true edge distance
        let cost = cost_model();
        let grid = GridIndex::new(vec![0.0, 0.0], vec![15.0, 15.0], 0.1).unwrap();
        for &(ax, ay, bx, by) in &[
            (0.0, 0.0, 5.0, 10.0),
            (1.5, 2.5, 1.5, 2.5),
            (14.0, 0.5, 0.5, 14.0),
        ] {
            let a = grid.to_id(&[ax, ay]);
            let b = grid.to_id(&[bx, by]);
            assert!(cost.heuristic(a, b) <= cost.distance(a, b) + 1e-12);
        }
    }
}
