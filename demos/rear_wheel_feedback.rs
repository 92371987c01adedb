//! Rear Wheel Feedback Control Example
//!
//! Tracks a cubic spline course with the rear wheel feedback steering law.
//!
//! Run with: cargo run --example rear_wheel_feedback

use rust_motion_planning::common::{Path2D, Point2D};
use rust_motion_planning::path_tracking::rear_wheel_feedback::{
    RearWheelFeedbackConfig, RearWheelFeedbackController, VehicleState,
};
use rust_motion_planning::utils::{colors, PathStyle, Visualizer};

fn main() {
    println!("Rear wheel feedback tracking start!!");

    let ax = [0.0, 6.0, 12.5, 5.0, 7.5, 3.0, -1.0];
    let ay = [0.0, 0.0, 5.0, 6.5, 3.0, 5.0, -2.0];
    let target_speed = 10.0 / 3.6;

    let config = RearWheelFeedbackConfig::default();
    let wheelbase = config.wheelbase;
    let mut controller =
        match RearWheelFeedbackController::from_waypoints(config, &ax, &ay, 0.1, target_speed) {
            Ok(c) => c,
            Err(e) => {
                println!("Course setup failed: {}", e);
                return;
            }
        };

    let (cx, cy) = controller.course();
    let course = Path2D::from_xy(cx, cy);
    let start = VehicleState::new(cx[0], cy[0] - 0.5, 0.2, 0.0, wheelbase);

    let trajectory = controller.simulate(start, 120.0);
    let driven = Path2D::from_points(
        trajectory
            .iter()
            .map(|s| Point2D::new(s.x, s.y))
            .collect(),
    );
    println!("Simulated {} steps", trajectory.len());

    let _ = std::fs::create_dir_all("img/path_tracking");
    let mut vis = Visualizer::new("Rear Wheel Feedback Control");
    vis.draw_path_styled(&course, &PathStyle::new(colors::COURSE, "course"));
    vis.draw_path_styled(&driven, &PathStyle::new(colors::TRAJECTORY, "trajectory"));
    let out = "img/path_tracking/rear_wheel_feedback_result.png";
    match vis.save_png(out, 800, 600) {
        Ok(()) => println!("Plot saved to: {}", out),
        Err(e) => println!("Visualization failed: {}", e),
    }

    println!("Rear wheel feedback tracking finish!!");
}
