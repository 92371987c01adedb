//! Reeds-Shepp path planner
//!
//! Curvature-constrained paths for a car that can drive both forward and
//! in reverse. Candidate words are solved in a normalized start-local
//! frame with signed segment lengths (negative means reversing), then the
//! shortest one is interpolated back into the world frame with per-sample
//! direction flags. This module covers the SCS family (S-L-S and its
//! reflection S-R-S).
//!
//! Ref:
//!     - PythonRobotics: https://github.com/AtsushiSakai/PythonRobotics
//!     - J. A. Reeds, L. A. Shepp, "Optimal paths for a car that goes both
//!       forwards and backwards" (1990)

use std::f64::consts::PI;

use crate::common::{normalize_angle, PlanningError, PlanningResult, Pose2D};

use super::dubins_path::SegmentType;

/// A planned Reeds-Shepp path in the world frame
#[derive(Debug, Clone)]
pub struct ReedsSheppPath {
    /// Signed segment lengths [m]; negative segments are driven in reverse
    pub lengths: Vec<f64>,
    pub ctypes: Vec<SegmentType>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub yaw: Vec<f64>,
    /// +1 forward / -1 reverse per sample
    pub directions: Vec<i8>,
    /// Total length [m], sum of unsigned segment lengths
    pub total_length: f64,
}

/// Wrap an angle into [-pi, pi] via modular reduction
fn mod2pi(x: f64) -> f64 {
    let mut v = x.rem_euclid(2.0 * PI);
    if v > PI {
        v -= 2.0 * PI;
    }
    v
}

/// Straight-Left-Straight word in the normalized frame
fn sls(x: f64, y: f64, phi: f64) -> Option<(f64, f64, f64)> {
    let phi = mod2pi(phi);
    if phi <= 0.0 || phi >= PI * 0.99 || y == 0.0 {
        return None;
    }
    let xd = -y / phi.tan() + x;
    let t = xd - (phi / 2.0).tan();
    let u = phi;
    let hyp = ((x - xd).powi(2) + y * y).sqrt();
    let v = if y > 0.0 {
        hyp - (phi / 2.0).tan()
    } else {
        -hyp - (phi / 2.0).tan()
    };
    Some((t, u, v))
}

struct Candidate {
    lengths: [f64; 3],
    ctypes: [SegmentType; 3],
}

/// Collect the SCS words, suppressing duplicates and near-zero paths
fn scs_words(x: f64, y: f64, phi: f64) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut push = |lengths: [f64; 3], ctypes: [SegmentType; 3]| {
        let total: f64 = lengths.iter().map(|l| l.abs()).sum();
        if total < 0.01 {
            return;
        }
        let duplicate = candidates.iter().any(|c| {
            c.ctypes == ctypes
                && c.lengths
                    .iter()
                    .zip(lengths.iter())
                    .map(|(a, b)| (a - b).abs())
                    .sum::<f64>()
                    <= 0.01
        });
        if !duplicate {
            candidates.push(Candidate { lengths, ctypes });
        }
    };

    if let Some((t, u, v)) = sls(x, y, phi) {
        push(
            [t, u, v],
            [SegmentType::Straight, SegmentType::Left, SegmentType::Straight],
        );
    }
    if let Some((t, u, v)) = sls(x, -y, -phi) {
        push(
            [t, u, v],
            [SegmentType::Straight, SegmentType::Right, SegmentType::Straight],
        );
    }
    candidates
}

/// Plan the shortest available Reeds-Shepp path between two poses.
/// `max_curvature` in [1/m], `step_size` in [m].
pub fn plan_reeds_shepp_path(
    start: Pose2D,
    goal: Pose2D,
    max_curvature: f64,
    step_size: f64,
) -> PlanningResult<ReedsSheppPath> {
    if max_curvature <= 0.0 {
        return Err(PlanningError::InvalidParameter(
            "max curvature must be positive".to_string(),
        ));
    }
    if step_size <= 0.0 {
        return Err(PlanningError::InvalidParameter(
            "step size must be positive".to_string(),
        ));
    }

    // Normalized start-local frame: rotate by -start.yaw, scale by curvature
    let dx = goal.x - start.x;
    let dy = goal.y - start.y;
    let (sin_yaw, cos_yaw) = start.yaw.sin_cos();
    let x = (cos_yaw * dx + sin_yaw * dy) * max_curvature;
    let y = (-sin_yaw * dx + cos_yaw * dy) * max_curvature;
    let phi = goal.yaw - start.yaw;

    let candidates = scs_words(x, y, phi);
    let best = candidates
        .into_iter()
        .min_by(|a, b| {
            let la: f64 = a.lengths.iter().map(|l| l.abs()).sum();
            let lb: f64 = b.lengths.iter().map(|l| l.abs()).sum();
            la.partial_cmp(&lb).unwrap_or(std::cmp::Ordering::Equal)
        })
        .ok_or_else(|| {
            PlanningError::DegenerateGeometry(
                "no feasible SCS Reeds-Shepp word for this query".to_string(),
            )
        })?;

    let (lx, ly, lyaw, directions) =
        generate_local_course(&best.lengths, &best.ctypes, max_curvature, step_size * max_curvature);

    let x_world: Vec<f64> = lx
        .iter()
        .zip(ly.iter())
        .map(|(ix, iy)| cos_yaw * ix - sin_yaw * iy + start.x)
        .collect();
    let y_world: Vec<f64> = lx
        .iter()
        .zip(ly.iter())
        .map(|(ix, iy)| sin_yaw * ix + cos_yaw * iy + start.y)
        .collect();
    let yaw_world: Vec<f64> = lyaw
        .iter()
        .map(|iyaw| normalize_angle(iyaw + start.yaw))
        .collect();

    let lengths: Vec<f64> = best.lengths.iter().map(|l| l / max_curvature).collect();
    let total_length = lengths.iter().map(|l| l.abs()).sum();

    Ok(ReedsSheppPath {
        lengths,
        ctypes: best.ctypes.to_vec(),
        x: x_world,
        y: y_world,
        yaw: yaw_world,
        directions,
        total_length,
    })
}

/// Sample the word in the normalized local frame. Each segment is swept
/// from its own origin pose, so segment endpoints are exact.
fn generate_local_course(
    lengths: &[f64; 3],
    ctypes: &[SegmentType; 3],
    max_curvature: f64,
    step: f64,
) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<i8>) {
    let mut px = vec![0.0];
    let mut py = vec![0.0];
    let mut pyaw = vec![0.0];
    let mut directions: Vec<i8> = vec![if lengths[0] >= 0.0 { 1 } else { -1 }];

    for (&l, &ctype) in lengths.iter().zip(ctypes.iter()) {
        let origin = (px[px.len() - 1], py[py.len() - 1], pyaw[pyaw.len() - 1]);
        let direction: i8 = if l >= 0.0 { 1 } else { -1 };
        let d = step.copysign(l);

        let mut pd = d;
        while pd.abs() < l.abs() {
            let (ix, iy, iyaw) = interpolate(origin, pd, ctype, max_curvature);
            px.push(ix);
            py.push(iy);
            pyaw.push(iyaw);
            directions.push(direction);
            pd += d;
        }
        let (ix, iy, iyaw) = interpolate(origin, l, ctype, max_curvature);
        px.push(ix);
        py.push(iy);
        pyaw.push(iyaw);
        directions.push(direction);
    }

    (px, py, pyaw, directions)
}

fn interpolate(
    origin: (f64, f64, f64),
    l: f64,
    ctype: SegmentType,
    max_curvature: f64,
) -> (f64, f64, f64) {
    let (ox, oy, oyaw) = origin;
    match ctype {
        SegmentType::Straight => (
            ox + l / max_curvature * oyaw.cos(),
            oy + l / max_curvature * oyaw.sin(),
            oyaw,
        ),
        SegmentType::Left => {
            let ldx = l.sin() / max_curvature;
            let ldy = (1.0 - l.cos()) / max_curvature;
            (
                ox + oyaw.cos() * ldx - oyaw.sin() * ldy,
                oy + oyaw.sin() * ldx + oyaw.cos() * ldy,
                oyaw + l,
            )
        }
        SegmentType::Right => {
            let ldx = l.sin() / max_curvature;
            let ldy = -(1.0 - l.cos()) / max_curvature;
            (
                ox + oyaw.cos() * ldx - oyaw.sin() * ldy,
                oy + oyaw.sin() * ldx + oyaw.cos() * ldy,
                oyaw - l,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sls_word_reaches_goal() {
        let start = Pose2D::new(0.0, 0.0, 0.0);
        let goal = Pose2D::new(5.0, 5.0, 45.0f64.to_radians());
        let path = plan_reeds_shepp_path(start, goal, 1.0, 0.1).unwrap();
        let n = path.x.len();
        assert!((path.x[n - 1] - goal.x).abs() < 1e-6);
        assert!((path.y[n - 1] - goal.y).abs() < 1e-6);
        assert!(normalize_angle(path.yaw[n - 1] - goal.yaw).abs() < 1e-6);
        assert_eq!(
            path.ctypes,
            vec![SegmentType::Straight, SegmentType::Left, SegmentType::Straight]
        );
    }

    #[test]
    fn test_reflected_word_turns_right() {
        let start = Pose2D::new(0.0, 0.0, 0.0);
        let goal = Pose2D::new(5.0, -5.0, -45.0f64.to_radians());
        let path = plan_reeds_shepp_path(start, goal, 1.0, 0.1).unwrap();
        let n = path.x.len();
        assert!((path.x[n - 1] - goal.x).abs() < 1e-6);
        assert!((path.y[n - 1] - goal.y).abs() < 1e-6);
        assert_eq!(
            path.ctypes,
            vec![SegmentType::Straight, SegmentType::Right, SegmentType::Straight]
        );
    }

    #[test]
    fn test_negative_segment_is_marked_reverse() {
        // The first straight of the (5, 5, 45 deg) query is negative:
        // the car backs up before the arc
        let start = Pose2D::new(0.0, 0.0, 0.0);
        let goal = Pose2D::new(5.0, 5.0, 45.0f64.to_radians());
        let path = plan_reeds_shepp_path(start, goal, 1.0, 0.1).unwrap();
        assert!(path.lengths[0] < 0.0);
        assert_eq!(path.directions[0], -1);
        assert_eq!(path.directions[path.directions.len() - 1], 1);
    }

    #[test]
    fn test_total_length_matches_segments() {
        let start = Pose2D::new(0.0, 0.0, 0.0);
        let goal = Pose2D::new(5.0, 5.0, 45.0f64.to_radians());
        let path = plan_reeds_shepp_path(start, goal, 1.0, 0.1).unwrap();
        let sum: f64 = path.lengths.iter().map(|l| l.abs()).sum();
        assert!((path.total_length - sum).abs() < 1e-12);
        assert!(path.total_length > 0.0);
    }

    #[test]
    fn test_infeasible_heading_is_rejected() {
        // phi <= 0 has no SLS solution and y = 0 collapses the word
        let start = Pose2D::new(0.0, 0.0, 0.0);
        let goal = Pose2D::new(5.0, 0.0, 0.0);
        assert!(plan_reeds_shepp_path(start, goal, 1.0, 0.1).is_err());
    }
}
