//! Cubic spline path planner
//!
//! Fits a natural cubic spline through a list of waypoints, parameterized
//! by accumulated chord length, and samples position, yaw and curvature
//! along it. Used as the track representation for the path tracking
//! controllers.
//!
//! Ref:
//!     - PythonRobotics: https://github.com/AtsushiSakai/PythonRobotics/tree/master/PathPlanning/CubicSpline

extern crate nalgebra as na;

use itertools::Itertools;

use crate::common::{PlanningError, PlanningResult};

/// One-dimensional natural cubic spline y(x) over monotonic knots
#[derive(Debug, Clone)]
pub struct Spline {
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
    x: Vec<f64>,
}

impl Spline {
    pub fn new(x: &[f64], y: &[f64]) -> PlanningResult<Spline> {
        if x.len() != y.len() {
            return Err(PlanningError::InvalidDimension {
                expected: x.len(),
                got: y.len(),
            });
        }
        if x.len() < 3 {
            return Err(PlanningError::InvalidParameter(
                "spline needs at least three knots".to_string(),
            ));
        }
        let h: Vec<f64> = x.iter().tuple_windows().map(|(a, b)| b - a).collect();
        if h.iter().any(|&step| step <= 0.0) {
            return Err(PlanningError::InvalidParameter(
                "spline knots must be strictly increasing".to_string(),
            ));
        }

        let nx = x.len();
        let a: Vec<f64> = y.to_vec();

        // Natural boundary: second derivative zero at both ends
        let mut a_mat = na::DMatrix::<f64>::zeros(nx, nx);
        a_mat[(0, 0)] = 1.0;
        a_mat[(nx - 1, nx - 1)] = 1.0;
        for i in 0..nx - 2 {
            a_mat[(i + 1, i + 1)] = 2.0 * (h[i] + h[i + 1]);
            a_mat[(i + 1, i)] = h[i];
            a_mat[(i + 1, i + 2)] = h[i + 1];
        }

        let mut b_vec = na::DVector::<f64>::zeros(nx);
        for i in 0..nx - 2 {
            b_vec[i + 1] =
                3.0 * (a[i + 2] - a[i + 1]) / h[i + 1] - 3.0 * (a[i + 1] - a[i]) / h[i];
        }

        let c_vec = a_mat
            .lu()
            .solve(&b_vec)
            .ok_or_else(|| PlanningError::NumericalError("spline system is singular".to_string()))?;
        let c: Vec<f64> = c_vec.iter().copied().collect();

        let mut b = Vec::with_capacity(nx - 1);
        let mut d = Vec::with_capacity(nx - 1);
        for i in 0..nx - 1 {
            d.push((c[i + 1] - c[i]) / (3.0 * h[i]));
            b.push((a[i + 1] - a[i]) / h[i] - h[i] * (c[i + 1] + 2.0 * c[i]) / 3.0);
        }

        Ok(Spline { a, b, c, d, x: x.to_vec() })
    }

    /// Position at t, clamped to the knot range
    pub fn calc(&self, t: f64) -> f64 {
        let i = self.search_index(t);
        let dx = t - self.x[i];
        self.a[i] + self.b[i] * dx + self.c[i] * dx.powi(2) + self.d[i] * dx.powi(3)
    }

    /// First derivative at t
    pub fn calc_d(&self, t: f64) -> f64 {
        let i = self.search_index(t);
        let dx = t - self.x[i];
        self.b[i] + 2.0 * self.c[i] * dx + 3.0 * self.d[i] * dx.powi(2)
    }

    /// Second derivative at t
    pub fn calc_dd(&self, t: f64) -> f64 {
        let i = self.search_index(t);
        let dx = t - self.x[i];
        2.0 * self.c[i] + 6.0 * self.d[i] * dx
    }

    fn search_index(&self, t: f64) -> usize {
        match self
            .x
            .binary_search_by(|knot| knot.partial_cmp(&t).unwrap_or(std::cmp::Ordering::Less))
        {
            Ok(i) => i.min(self.x.len() - 2),
            Err(i) => i.saturating_sub(1).min(self.x.len() - 2),
        }
    }
}

/// 2D spline track parameterized by arc length s
#[derive(Debug, Clone)]
pub struct Spline2D {
    pub s: Vec<f64>,
    sx: Spline,
    sy: Spline,
}

impl Spline2D {
    pub fn new(x: &[f64], y: &[f64]) -> PlanningResult<Spline2D> {
        let s = Self::calc_s(x, y);
        let sx = Spline::new(&s, x)?;
        let sy = Spline::new(&s, y)?;
        Ok(Spline2D { s, sx, sy })
    }

    fn calc_s(x: &[f64], y: &[f64]) -> Vec<f64> {
        let mut s = vec![0.0];
        for ((x0, y0), (x1, y1)) in x.iter().zip(y.iter()).tuple_windows() {
            let ds = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
            s.push(s[s.len() - 1] + ds);
        }
        s
    }

    pub fn length(&self) -> f64 {
        self.s[self.s.len() - 1]
    }

    pub fn calc_position(&self, s: f64) -> (f64, f64) {
        (self.sx.calc(s), self.sy.calc(s))
    }

    pub fn calc_yaw(&self, s: f64) -> f64 {
        let dx = self.sx.calc_d(s);
        let dy = self.sy.calc_d(s);
        dy.atan2(dx)
    }

    pub fn calc_curvature(&self, s: f64) -> f64 {
        let dx = self.sx.calc_d(s);
        let dy = self.sy.calc_d(s);
        let ddx = self.sx.calc_dd(s);
        let ddy = self.sy.calc_dd(s);
        (ddy * dx - ddx * dy) / (dx * dx + dy * dy).powf(1.5)
    }

    /// Sample the track at uniform arc-length steps:
    /// (x, y, yaw, curvature, s) vectors
    pub fn sample_course(
        &self,
        ds: f64,
    ) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
        let mut rx = Vec::new();
        let mut ry = Vec::new();
        let mut ryaw = Vec::new();
        let mut rk = Vec::new();
        let mut rs = Vec::new();
        let mut s = 0.0;
        while s < self.length() {
            let (x, y) = self.calc_position(s);
            rx.push(x);
            ry.push(y);
            ryaw.push(self.calc_yaw(s));
            rk.push(self.calc_curvature(s));
            rs.push(s);
            s += ds;
        }
        (rx, ry, ryaw, rk, rs)
    }
}
