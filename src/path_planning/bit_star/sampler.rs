//! Informed sampling for BIT*
//!
//! Before any finite solution cost is known the sampler draws uniformly
//! over the configuration-space box. Once a solution of cost `c_best` is
//! known it draws inside the prolate hyperspheroid with foci at start and
//! goal (the informed set): only configurations inside it can still improve
//! the solution. The ellipsoid frame is aligned with the start-goal axis by
//! the SVD rotation C = U * diag(1, 1, det(U) det(V^T)) * V^T.

use std::f64::consts::PI;

use nalgebra::{Matrix3, RowVector3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::{PlanningError, PlanningResult, Point2D};

pub struct InformedSampler {
    min_rand: f64,
    max_rand: f64,
    c_min: f64,
    center: Vector3<f64>,
    rotation: Matrix3<f64>,
    rng: StdRng,
}

impl InformedSampler {
    pub fn new(start: Point2D, goal: Point2D, rand_area: (f64, f64)) -> PlanningResult<Self> {
        Self::build(start, goal, rand_area, StdRng::from_entropy())
    }

    /// Deterministic variant for reproducible planning runs
    pub fn with_seed(
        start: Point2D,
        goal: Point2D,
        rand_area: (f64, f64),
        seed: u64,
    ) -> PlanningResult<Self> {
        Self::build(start, goal, rand_area, StdRng::seed_from_u64(seed))
    }

    fn build(
        start: Point2D,
        goal: Point2D,
        rand_area: (f64, f64),
        rng: StdRng,
    ) -> PlanningResult<Self> {
        if rand_area.1 <= rand_area.0 {
            return Err(PlanningError::InvalidParameter(format!(
                "sample area [{}, {}] is empty",
                rand_area.0, rand_area.1
            )));
        }
        let c_min = start.distance(&goal);
        if c_min <= f64::EPSILON {
            return Err(PlanningError::DegenerateGeometry(
                "start and goal coincide".to_string(),
            ));
        }

        let center = Vector3::new(
            (start.x + goal.x) / 2.0,
            (start.y + goal.y) / 2.0,
            0.0,
        );

        // Rotation aligning the ellipsoid's major axis with the
        // start-goal direction
        let a1 = Vector3::new(
            (goal.x - start.x) / c_min,
            (goal.y - start.y) / c_min,
            0.0,
        );
        let m = a1 * RowVector3::new(1.0, 0.0, 0.0);
        let svd = m.svd(true, true);
        let (u, v_t) = match (svd.u, svd.v_t) {
            (Some(u), Some(v_t)) => (u, v_t),
            _ => {
                return Err(PlanningError::NumericalError(
                    "SVD of the ellipsoid frame failed".to_string(),
                ))
            }
        };
        let det = u.determinant() * v_t.transpose().determinant();
        let rotation = u * Matrix3::from_diagonal(&Vector3::new(1.0, 1.0, det)) * v_t;

        Ok(InformedSampler {
            min_rand: rand_area.0,
            max_rand: rand_area.1,
            c_min,
            center,
            rotation,
            rng,
        })
    }

    pub fn c_min(&self) -> f64 {
        self.c_min
    }

    /// Draw a batch of samples under the current best solution cost
    pub fn sample_batch(&mut self, m: usize, c_best: f64) -> Vec<Point2D> {
        (0..m).map(|_| self.sample(c_best)).collect()
    }

    /// Draw one sample: uniform while c_best is infinite, otherwise inside
    /// the informed ellipsoid
    pub fn sample(&mut self, c_best: f64) -> Point2D {
        if c_best.is_finite() {
            // Clamp guards the degenerate c_best == c_min ellipsoid
            let conjugate = (c_best * c_best - self.c_min * self.c_min).max(0.0).sqrt() / 2.0;
            let radii = Vector3::new(c_best / 2.0, conjugate, conjugate);
            let ball = self.sample_unit_ball();
            let p = self.rotation * Matrix3::from_diagonal(&radii) * ball + self.center;
            Point2D::new(p[0], p[1])
        } else {
            self.sample_free_space()
        }
    }

    /// Rejection-free polar construction of a point in the unit disc
    fn sample_unit_ball(&mut self) -> Vector3<f64> {
        let a: f64 = self.rng.gen();
        let b: f64 = self.rng.gen();
        let (a, b) = if b < a { (b, a) } else { (a, b) };
        if b <= f64::EPSILON {
            // Both uniforms at zero; the origin is the only valid answer
            return Vector3::zeros();
        }
        Vector3::new(
            b * (2.0 * PI * a / b).cos(),
            b * (2.0 * PI * a / b).sin(),
            0.0,
        )
    }

    fn sample_free_space(&mut self) -> Point2D {
        Point2D::new(
            self.rng.gen_range(self.min_rand..=self.max_rand),
            self.rng.gen_range(self.min_rand..=self.max_rand),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler() -> InformedSampler {
        InformedSampler::with_seed(
            Point2D::new(0.0, 0.0),
            Point2D::new(5.0, 10.0),
            (0.0, 15.0),
            7,
        )
        .unwrap()
    }

    #[test]
    fn test_uniform_samples_stay_in_box() {
        let mut s = sampler();
        for p in s.sample_batch(500, f64::INFINITY) {
            assert!(p.x >= 0.0 && p.x <= 15.0);
            assert!(p.y >= 0.0 && p.y <= 15.0);
        }
    }

    #[test]
    fn test_informed_samples_stay_in_ellipsoid() {
        let mut s = sampler();
        let start = Point2D::new(0.0, 0.0);
        let goal = Point2D::new(5.0, 10.0);
        let c_best = 1.2 * s.c_min();
        for p in s.sample_batch(500, c_best) {
            // Defining property of the prolate hyperspheroid with foci at
            // start and goal
            let via = start.distance(&p) + p.distance(&goal);
            assert!(via <= c_best + 1e-9, "sample {:?} outside informed set", p);
        }
    }

    #[test]
    fn test_degenerate_c_best_produces_finite_samples() {
        // c_best == c_min collapses the conjugate axes; samples must stay
        // on the start-goal segment instead of going NaN
        let mut s = sampler();
        let c_min = s.c_min();
        for p in s.sample_batch(100, c_min) {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    #[test]
    fn test_coincident_start_goal_is_rejected() {
        let r = InformedSampler::with_seed(
            Point2D::new(1.0, 1.0),
            Point2D::new(1.0, 1.0),
            (0.0, 15.0),
            1,
        );
        assert!(matches!(r, Err(PlanningError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_seeded_sampler_is_reproducible() {
        let mut a = sampler();
        let mut b = sampler();
        let pa = a.sample(f64::INFINITY);
        let pb = b.sample(f64::INFINITY);
        assert_eq!(pa, pb);
    }
}
