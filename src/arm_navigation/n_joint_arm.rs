//! N-joint serial arm kinematics
//!
//! Forward kinematics, basic Jacobian and resolved-rate inverse kinematics
//! for a serial manipulator described by modified Denavit-Hartenberg
//! parameters. End effector orientation uses ZYZ Euler angles.
//!
//! Ref:
//!     - PythonRobotics: https://github.com/AtsushiSakai/PythonRobotics
//!     - B. Siciliano, L. Sciavicco, L. Villani, G. Oriolo, "Robotics:
//!       Modelling, Planning and Control"

use nalgebra::{DMatrix, DVector, Matrix4, Vector3};

use crate::common::{PlanningError, PlanningResult};

const IK_MAX_ITER: usize = 500;
const IK_STEP_GAIN: f64 = 0.5;
const IK_TOLERANCE: f64 = 1e-6;
const PINV_EPSILON: f64 = 1e-10;

/// One link, as modified DH parameters [theta, alpha, a, d]
#[derive(Debug, Clone)]
pub struct Link {
    dh_params: [f64; 4],
}

impl Link {
    pub fn new(dh_params: [f64; 4]) -> Self {
        Link { dh_params }
    }

    pub fn joint_angle(&self) -> f64 {
        self.dh_params[0]
    }

    pub fn transformation_matrix(&self) -> Matrix4<f64> {
        let [theta, alpha, a, d] = self.dh_params;
        let (st, ct) = theta.sin_cos();
        let (sa, ca) = alpha.sin_cos();
        Matrix4::new(
            ct, -st, 0.0, a,
            ca * st, ca * ct, -sa, -d * sa,
            sa * st, sa * ct, ca, d * ca,
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

/// End effector pose as (x, y, z, alpha, beta, gamma) with ZYZ Euler angles
pub type EePose = [f64; 6];

/// Serial manipulator with one revolute joint per link
#[derive(Debug, Clone)]
pub struct NLinkArm {
    links: Vec<Link>,
}

impl NLinkArm {
    pub fn new(dh_params_list: &[[f64; 4]]) -> PlanningResult<Self> {
        if dh_params_list.is_empty() {
            return Err(PlanningError::InvalidParameter(
                "arm needs at least one link".to_string(),
            ));
        }
        Ok(NLinkArm {
            links: dh_params_list.iter().map(|&p| Link::new(p)).collect(),
        })
    }

    pub fn n_joints(&self) -> usize {
        self.links.len()
    }

    pub fn joint_angles(&self) -> Vec<f64> {
        self.links.iter().map(|l| l.joint_angle()).collect()
    }

    pub fn set_joint_angles(&mut self, joint_angles: &[f64]) -> PlanningResult<()> {
        if joint_angles.len() != self.links.len() {
            return Err(PlanningError::InvalidDimension {
                expected: self.links.len(),
                got: joint_angles.len(),
            });
        }
        for (link, &angle) in self.links.iter_mut().zip(joint_angles.iter()) {
            link.dh_params[0] = angle;
        }
        Ok(())
    }

    fn update_joint_angles(&mut self, diff: &DVector<f64>) {
        for (link, d) in self.links.iter_mut().zip(diff.iter()) {
            link.dh_params[0] += d * IK_STEP_GAIN;
        }
    }

    /// Base-to-end-effector transform
    pub fn transformation_matrix(&self) -> Matrix4<f64> {
        self.links
            .iter()
            .fold(Matrix4::identity(), |acc, link| {
                acc * link.transformation_matrix()
            })
    }

    /// End effector position and ZYZ Euler angles
    pub fn forward_kinematics(&self) -> EePose {
        let trans = self.transformation_matrix();
        let (alpha, beta, gamma) = euler_zyz(&trans);
        [
            trans[(0, 3)],
            trans[(1, 3)],
            trans[(2, 3)],
            alpha,
            beta,
            gamma,
        ]
    }

    /// Geometric Jacobian, 6 x n, columns ordered by joint.
    /// Each column is [z_i x (p_ee - p_i); z_i].
    pub fn basic_jacobian(&self, ee_pose: &EePose) -> DMatrix<f64> {
        let ee_pos = Vector3::new(ee_pose[0], ee_pose[1], ee_pose[2]);
        let n = self.links.len();
        let mut columns: Vec<[f64; 6]> = Vec::with_capacity(n);

        let mut trans = Matrix4::identity();
        for link in &self.links {
            trans *= link.transformation_matrix();
            let pos = Vector3::new(trans[(0, 3)], trans[(1, 3)], trans[(2, 3)]);
            let z_axis = Vector3::new(trans[(0, 2)], trans[(1, 2)], trans[(2, 2)]);
            let linear = z_axis.cross(&(ee_pos - pos));
            columns.push([
                linear.x, linear.y, linear.z, z_axis.x, z_axis.y, z_axis.z,
            ]);
        }

        DMatrix::from_fn(6, n, |i, j| columns[j][i])
    }

    /// Resolved-rate inverse kinematics toward `ref_ee_pose`. The angular
    /// part of the pose error is mapped to angular velocity through the ZYZ
    /// rate matrix before the pseudo-inverse step. Returns the number of
    /// iterations on convergence.
    pub fn inverse_kinematics(&mut self, ref_ee_pose: &EePose) -> PlanningResult<usize> {
        for iteration in 0..IK_MAX_ITER {
            let ee_pose = self.forward_kinematics();
            let diff = DVector::from_fn(6, |i, _| ref_ee_pose[i] - ee_pose[i]);
            if diff.norm() < IK_TOLERANCE {
                return Ok(iteration);
            }

            let jacobian = self.basic_jacobian(&ee_pose);
            let k_alpha = zyz_rate_matrix(ee_pose[3], ee_pose[4]);
            let pinv = jacobian
                .pseudo_inverse(PINV_EPSILON)
                .map_err(|e| PlanningError::NumericalError(e.to_string()))?;
            let theta_dot = pinv * k_alpha * diff;
            self.update_joint_angles(&theta_dot);
        }
        Err(PlanningError::NumericalError(
            "inverse kinematics did not converge".to_string(),
        ))
    }
}

/// ZYZ Euler angles of a rotation, as read from a homogeneous transform
fn euler_zyz(trans: &Matrix4<f64>) -> (f64, f64, f64) {
    let alpha = trans[(1, 2)].atan2(trans[(0, 2)]);
    let beta = (trans[(0, 2)] * alpha.cos() + trans[(1, 2)] * alpha.sin())
        .atan2(trans[(2, 2)]);
    let gamma = (-trans[(0, 0)] * alpha.sin() + trans[(1, 0)] * alpha.cos())
        .atan2(-trans[(0, 1)] * alpha.sin() + trans[(1, 1)] * alpha.cos());
    (alpha, beta, gamma)
}

/// Maps ZYZ Euler angle rates to body angular velocity; identity on the
/// linear block
fn zyz_rate_matrix(alpha: f64, beta: f64) -> DMatrix<f64> {
    let mut k = DMatrix::identity(6, 6);
    k[(3, 3)] = 0.0;
    k[(3, 4)] = -alpha.sin();
    k[(3, 5)] = alpha.cos() * beta.sin();
    k[(4, 3)] = 0.0;
    k[(4, 4)] = alpha.cos();
    k[(4, 5)] = alpha.sin() * beta.sin();
    k[(5, 3)] = 1.0;
    k[(5, 4)] = 0.0;
    k[(5, 5)] = beta.cos();
    k
}
