//! BIT* Path Planning Example
//!
//! Plans a path around circular obstacles and keeps refining it batch by
//! batch until the iteration budget runs out.
//!
//! Run with: cargo run --example bit_star

use rust_motion_planning::path_planning::bit_star::{BitStarConfig, BitStarPlanner};
use rust_motion_planning::common::{CircleObstacle, Point2D};

fn segment_hits_obstacle(a: &Point2D, b: &Point2D, obstacles: &[CircleObstacle]) -> bool {
    let steps = 20;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let p = Point2D::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
        if obstacles.iter().any(|o| o.contains(&p)) {
            return true;
        }
    }
    false
}

fn main() {
    println!("BIT* path planning start!!");

    let start = Point2D::new(0.0, 0.0);
    let goal = Point2D::new(5.0, 10.0);
    let obstacles: Vec<CircleObstacle> = vec![
        (3.0, 3.0, 1.5).into(),
        (7.0, 7.0, 1.0).into(),
        (2.0, 8.0, 1.0).into(),
        (8.0, 2.0, 1.0).into(),
    ];

    let config = BitStarConfig {
        max_iter: 300,
        rng_seed: Some(7),
        ..Default::default()
    };

    let mut planner = match BitStarPlanner::new(start, goal, obstacles.clone(), (0.0, 15.0), config) {
        Ok(p) => p,
        Err(e) => {
            println!("Planner setup failed: {}", e);
            return;
        }
    };
    let validator_obstacles = obstacles.clone();
    planner.set_edge_validator(Box::new(move |a, b| {
        !segment_hits_obstacle(a, b, &validator_obstacles)
    }));

    match planner.plan() {
        Ok(path) => {
            println!("Path found with {} points", path.points.len());
            println!("Final cost: {:.3}", planner.best_cost());
            println!("Cost history: {:?}", planner.cost_history());

            let _ = std::fs::create_dir_all("img/path_planning");
            let out = "img/path_planning/bit_star_result.png";
            match planner.visualize(&path, out) {
                Ok(()) => println!("Plot saved to: {}", out),
                Err(e) => println!("Visualization failed: {}", e),
            }
        }
        Err(e) => {
            println!("Planning failed: {}", e);
        }
    }

    println!("BIT* path planning finish!!");
}
