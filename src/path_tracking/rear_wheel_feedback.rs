//! Rear wheel feedback path tracking controller
//!
//! Steers a kinematic bicycle model along a spline course by feeding back
//! the rear-axle heading and lateral errors.
//!
//! Ref:
//!     - PythonRobotics: https://github.com/AtsushiSakai/PythonRobotics
//!     - B. Paden, M. Cap, S. Z. Yong, D. Yershov and E. Frazzoli,
//!       "A Survey of Motion Planning and Control Techniques for
//!       Self-Driving Urban Vehicles"

use crate::common::{normalize_angle, PathTracker, PlanningError, PlanningResult, State2D};
use crate::path_planning::cubic_spline_planner::Spline2D;

/// Kinematic bicycle model state, referenced at the rear axle
#[derive(Debug, Clone, Copy)]
pub struct VehicleState {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
    pub v: f64,
    pub wheelbase: f64,
}

impl VehicleState {
    pub fn new(x: f64, y: f64, yaw: f64, v: f64, wheelbase: f64) -> Self {
        VehicleState { x, y, yaw, v, wheelbase }
    }

    pub fn update(&mut self, a: f64, delta: f64, dt: f64) {
        self.x += self.v * self.yaw.cos() * dt;
        self.y += self.v * self.yaw.sin() * dt;
        self.yaw += self.v / self.wheelbase * delta.tan() * dt;
        self.yaw = normalize_angle(self.yaw);
        self.v += a * dt;
    }

    pub fn to_state2d(&self) -> State2D {
        State2D::new(self.x, self.y, self.yaw, self.v)
    }
}

/// Gains and vehicle parameters for the rear wheel feedback law
#[derive(Debug, Clone)]
pub struct RearWheelFeedbackConfig {
    /// Heading error gain
    pub kth: f64,
    /// Lateral error gain
    pub ke: f64,
    /// Speed proportional gain
    pub kp: f64,
    /// Vehicle wheelbase [m]
    pub wheelbase: f64,
    /// Goal distance threshold [m]
    pub goal_threshold: f64,
    /// Maximum steering angle [rad]
    pub max_steer: f64,
    /// Control period [s]
    pub dt: f64,
}

impl Default for RearWheelFeedbackConfig {
    fn default() -> Self {
        Self {
            kth: 1.0,
            ke: 0.5,
            kp: 1.0,
            wheelbase: 2.9,
            goal_threshold: 0.3,
            max_steer: 45.0f64.to_radians(),
            dt: 0.1,
        }
    }
}

/// Rear wheel feedback controller over a sampled spline course
pub struct RearWheelFeedbackController {
    config: RearWheelFeedbackConfig,
    course_x: Vec<f64>,
    course_y: Vec<f64>,
    course_yaw: Vec<f64>,
    course_k: Vec<f64>,
    target_speed: f64,
    last_target_idx: usize,
}

impl RearWheelFeedbackController {
    /// Fit a cubic spline through the waypoints and sample it every `ds`
    /// meters as the reference course.
    pub fn from_waypoints(
        config: RearWheelFeedbackConfig,
        ax: &[f64],
        ay: &[f64],
        ds: f64,
        target_speed: f64,
    ) -> PlanningResult<Self> {
        if ds <= 0.0 {
            return Err(PlanningError::InvalidParameter(
                "course sampling step must be positive".to_string(),
            ));
        }
        let spline = Spline2D::new(ax, ay)?;
        let (course_x, course_y, course_yaw, course_k, _) = spline.sample_course(ds);
        if course_x.is_empty() {
            return Err(PlanningError::InvalidParameter(
                "course sampling produced no points".to_string(),
            ));
        }
        Ok(RearWheelFeedbackController {
            config,
            course_x,
            course_y,
            course_yaw,
            course_k,
            target_speed,
            last_target_idx: 0,
        })
    }

    pub fn course(&self) -> (&[f64], &[f64]) {
        (&self.course_x, &self.course_y)
    }

    /// Nearest course index to the rear axle, searching forward from the
    /// last target so the reference never walks backwards. Returns the
    /// index and the signed lateral error (positive left of the course).
    fn calc_target_index(&self, state: &VehicleState) -> (usize, f64) {
        let mut min_dist = f64::INFINITY;
        let mut min_idx = self.last_target_idx;
        for i in self.last_target_idx..self.course_x.len() {
            let dx = state.x - self.course_x[i];
            let dy = state.y - self.course_y[i];
            let d = (dx * dx + dy * dy).sqrt();
            if d < min_dist {
                min_dist = d;
                min_idx = i;
            }
        }

        let dx = state.x - self.course_x[min_idx];
        let dy = state.y - self.course_y[min_idx];
        let path_yaw = self.course_yaw[min_idx];
        let error = -path_yaw.sin() * dx + path_yaw.cos() * dy;
        (min_idx, error)
    }

    /// Steering angle from the rear wheel feedback law:
    ///
    /// omega = v k cos(th_e) / (1 - k e) - kth |v| th_e - ke v sin(th_e) e / th_e
    /// delta = atan(L omega / v)
    pub fn compute_steering(&mut self, state: &VehicleState) -> f64 {
        let (target_idx, e) = self.calc_target_index(state);
        self.last_target_idx = target_idx;

        let k = self.course_k[target_idx];
        let yaw_ref = self.course_yaw[target_idx];
        let th_e = normalize_angle(state.yaw - yaw_ref);

        let v = state.v;
        // sin(th_e)/th_e tends to 1; take the limit directly near zero
        let sinc_th = if th_e.abs() < 1e-9 { 1.0 } else { th_e.sin() / th_e };

        let denom = 1.0 - k * e;
        let denom = if denom.abs() < 0.01 {
            0.01 * if denom < 0.0 { -1.0 } else { 1.0 }
        } else {
            denom
        };

        let omega = v * k * th_e.cos() / denom
            - self.config.kth * v.abs() * th_e
            - self.config.ke * v * sinc_th * e;

        let delta = if v.abs() > 0.01 {
            (self.config.wheelbase * omega / v).atan()
        } else {
            0.0
        };
        delta.clamp(-self.config.max_steer, self.config.max_steer)
    }

    pub fn compute_acceleration(&self, current_speed: f64) -> f64 {
        self.config.kp * (self.target_speed - current_speed)
    }

    fn goal(&self) -> (f64, f64) {
        (
            self.course_x[self.course_x.len() - 1],
            self.course_y[self.course_y.len() - 1],
        )
    }

    /// Roll the closed loop forward until the goal threshold is reached or
    /// `t_max` seconds elapse. Returns the driven trajectory.
    pub fn simulate(&mut self, mut state: VehicleState, t_max: f64) -> Vec<State2D> {
        let dt = self.config.dt;
        let mut trajectory = vec![state.to_state2d()];
        let mut time = 0.0;
        while time < t_max {
            let a = self.compute_acceleration(state.v);
            let delta = self.compute_steering(&state);
            state.update(a, delta, dt);
            time += dt;
            trajectory.push(state.to_state2d());
            if self.is_goal_reached(&state.to_state2d()) {
                break;
            }
        }
        trajectory
    }
}

impl PathTracker for RearWheelFeedbackController {
    fn compute_control(&mut self, current_state: &State2D) -> (f64, f64) {
        let state = VehicleState::new(
            current_state.x,
            current_state.y,
            current_state.yaw,
            current_state.v,
            self.config.wheelbase,
        );
        let a = self.compute_acceleration(state.v);
        let delta = self.compute_steering(&state);
        (a, delta)
    }

    fn is_goal_reached(&self, current_state: &State2D) -> bool {
        let (gx, gy) = self.goal();
        let dx = current_state.x - gx;
        let dy = current_state.y - gy;
        (dx * dx + dy * dy).sqrt() < self.config.goal_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_controller() -> RearWheelFeedbackController {
        let ax = [0.0, 6.0, 12.5, 5.0, 7.5, 3.0, -1.0];
        let ay = [0.0, 0.0, 5.0, 6.5, 3.0, 5.0, -2.0];
        RearWheelFeedbackController::from_waypoints(
            RearWheelFeedbackConfig::default(),
            &ax,
            &ay,
            0.1,
            10.0 / 3.6,
        )
        .unwrap()
    }

    #[test]
    fn test_vehicle_state_update() {
        let mut state = VehicleState::new(0.0, 0.0, 0.0, 1.0, 2.9);
        state.update(0.0, 0.0, 1.0);
        assert!((state.x - 1.0).abs() < 1e-10);
        assert!(state.y.abs() < 1e-10);
        assert!(state.yaw.abs() < 1e-10);
    }

    #[test]
    fn test_straight_course_zero_steering() {
        let ax = [0.0, 10.0, 20.0, 30.0];
        let ay = [0.0, 0.0, 0.0, 0.0];
        let mut controller = RearWheelFeedbackController::from_waypoints(
            RearWheelFeedbackConfig::default(),
            &ax,
            &ay,
            0.5,
            5.0,
        )
        .unwrap();

        let state = VehicleState::new(5.0, 0.0, 0.0, 5.0, 2.9);
        let steering = controller.compute_steering(&state);
        assert!(steering.abs() < 1e-6);
    }

    #[test]
    fn test_lateral_error_steers_back() {
        let ax = [0.0, 10.0, 20.0, 30.0];
        let ay = [0.0, 0.0, 0.0, 0.0];
        let mut controller = RearWheelFeedbackController::from_waypoints(
            RearWheelFeedbackConfig::default(),
            &ax,
            &ay,
            0.5,
            5.0,
        )
        .unwrap();

        // Left of the course with a small left heading error: the law must
        // steer right
        let state = VehicleState::new(5.0, 2.0, 0.1, 5.0, 2.9);
        let steering = controller.compute_steering(&state);
        assert!(steering < 0.0, "expected right steering, got {}", steering);
    }

    #[test]
    fn test_closed_loop_reaches_goal() {
        let mut controller = demo_controller();
        let (cx, cy) = controller.course();
        let start = VehicleState::new(cx[0], cy[0], 0.0, 0.0, 2.9);
        let goal = (cx[cx.len() - 1], cy[cy.len() - 1]);

        let trajectory = controller.simulate(start, 120.0);
        let last = trajectory.last().unwrap();
        let dist = ((last.x - goal.0).powi(2) + (last.y - goal.1).powi(2)).sqrt();
        assert!(dist < 0.3, "final distance to goal: {}", dist);
    }

    #[test]
    fn test_tracker_trait_outputs_are_finite() {
        let mut controller = demo_controller();
        let state = State2D::new(0.0, 0.0, 0.0, 1.0);
        let (a, delta) = controller.compute_control(&state);
        assert!(a.is_finite());
        assert!(delta.is_finite());
        assert!(!controller.is_goal_reached(&state));
    }
}
