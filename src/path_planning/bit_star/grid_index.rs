//! Bidirectional mapping between configuration-space points and grid cell ids
//!
//! The planning space is discretized into hyper-rectangular cells of a fixed
//! resolution. Each cell is identified by a single integer obtained by
//! mixed-radix encoding of the per-axis cell coordinates. The mapping is a
//! bijection up to quantization: `to_point(to_id(p))` lies within one
//! resolution step of `p` on every axis.

use crate::common::{PlanningError, PlanningResult};

/// Integer id of one grid cell of the discretized configuration space
pub type NodeId = i64;

/// Fixed-resolution grid over a bounded configuration space
///
/// Limits and resolution are fixed at construction; there is no dynamic
/// resizing. Out-of-range coordinates are not rejected: they still encode
/// to some id without clamping.
#[derive(Debug, Clone)]
pub struct GridIndex {
    lower_limit: Vec<f64>,
    upper_limit: Vec<f64>,
    resolution: f64,
    num_cells: Vec<i64>,
}

impl GridIndex {
    pub fn new(
        lower_limit: Vec<f64>,
        upper_limit: Vec<f64>,
        resolution: f64,
    ) -> PlanningResult<Self> {
        if lower_limit.len() != upper_limit.len() {
            return Err(PlanningError::InvalidDimension {
                expected: lower_limit.len(),
                got: upper_limit.len(),
            });
        }
        if lower_limit.is_empty() {
            return Err(PlanningError::InvalidParameter(
                "grid needs at least one dimension".to_string(),
            ));
        }
        if resolution <= 0.0 {
            return Err(PlanningError::InvalidParameter(format!(
                "resolution must be positive, got {}",
                resolution
            )));
        }
        for (lo, hi) in lower_limit.iter().zip(upper_limit.iter()) {
            if hi <= lo {
                return Err(PlanningError::InvalidParameter(format!(
                    "upper limit {} not above lower limit {}",
                    hi, lo
                )));
            }
        }

        let num_cells = lower_limit
            .iter()
            .zip(upper_limit.iter())
            .map(|(lo, hi)| ((hi - lo) / resolution).ceil() as i64)
            .collect();

        Ok(GridIndex {
            lower_limit,
            upper_limit,
            resolution,
            num_cells,
        })
    }

    pub fn dimension(&self) -> usize {
        self.lower_limit.len()
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn lower_limit(&self) -> &[f64] {
        &self.lower_limit
    }

    pub fn upper_limit(&self) -> &[f64] {
        &self.upper_limit
    }

    /// Quantize a configuration point to per-axis grid coordinates
    fn point_to_grid(&self, point: &[f64]) -> Vec<i64> {
        point
            .iter()
            .zip(self.lower_limit.iter())
            .map(|(x, lo)| ((x - lo) / self.resolution).round() as i64)
            .collect()
    }

    /// Mixed-radix encode grid coordinates to a single id:
    /// id = sum_i coord[i] * prod_{j<i} num_cells[j]
    fn grid_to_id(&self, coord: &[i64]) -> NodeId {
        let mut id = 0;
        let mut stride = 1;
        for (c, n) in coord.iter().zip(self.num_cells.iter()) {
            id += c * stride;
            stride *= n;
        }
        id
    }

    /// Mixed-radix decode, highest axis first (floor division so that
    /// negative ids from out-of-range points still round-trip)
    fn id_to_grid(&self, id: NodeId) -> Vec<i64> {
        let dim = self.dimension();
        let mut coord = vec![0; dim];
        let mut rem = id;
        for i in (0..dim).rev() {
            let stride: i64 = self.num_cells[..i].iter().product();
            coord[i] = rem.div_euclid(stride);
            rem -= coord[i] * stride;
        }
        coord
    }

    fn grid_to_point(&self, coord: &[i64]) -> Vec<f64> {
        coord
            .iter()
            .zip(self.lower_limit.iter())
            .map(|(c, lo)| lo + self.resolution * (*c as f64))
            .collect()
    }

    /// Map a configuration point to the id of its grid cell
    pub fn to_id(&self, point: &[f64]) -> NodeId {
        self.grid_to_id(&self.point_to_grid(point))
    }

    /// Map a grid cell id back to a configuration point (the cell anchor)
    pub fn to_point(&self, id: NodeId) -> Vec<f64> {
        self.grid_to_point(&self.id_to_grid(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planning_grid() -> GridIndex {
        GridIndex::new(vec![0.0, 0.0], vec![15.0, 15.0], 0.1).unwrap()
    }

    #[test]
    fn test_quantization_bound() {
        let grid = planning_grid();
        for &(x, y) in &[
            (0.0, 0.0),
            (5.0, 10.0),
            (0.03, 14.9),
            (7.77, 3.21),
            (12.501, 0.099),
        ] {
            let id = grid.to_id(&[x, y]);
            let p = grid.to_point(id);
            assert!((p[0] - x).abs() <= grid.resolution(), "x off for ({}, {})", x, y);
            assert!((p[1] - y).abs() <= grid.resolution(), "y off for ({}, {})", x, y);
        }
    }

    #[test]
    fn test_round_trip_is_stable() {
        // Quantizing an already-quantized point must be the identity
        let grid = planning_grid();
        let id = grid.to_id(&[3.4, 9.7]);
        let p = grid.to_point(id);
        assert_eq!(grid.to_id(&p), id);
    }

    #[test]
    fn test_out_of_range_still_encodes() {
        // No clamping: points outside the limits map to some id
        let grid = planning_grid();
        let id = grid.to_id(&[-3.0, 20.0]);
        let p = grid.to_point(id);
        assert_eq!(grid.to_id(&p), id);
    }

    #[test]
    fn test_distinct_cells_get_distinct_ids() {
        let grid = planning_grid();
        let a = grid.to_id(&[1.0, 1.0]);
        let b = grid.to_id(&[1.1, 1.0]);
        let c = grid.to_id(&[1.0, 1.1]);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn test_rejects_bad_construction() {
        assert!(GridIndex::new(vec![0.0], vec![1.0, 2.0], 0.1).is_err());
        assert!(GridIndex::new(vec![0.0, 0.0], vec![1.0, 1.0], 0.0).is_err());
        assert!(GridIndex::new(vec![0.0, 2.0], vec![1.0, 1.0], 0.1).is_err());
        assert!(GridIndex::new(vec![], vec![], 0.1).is_err());
    }
}
