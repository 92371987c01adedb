//! Visualization utilities for rust_motion_planning
//!
//! Provides a unified interface for plotting using gnuplot. Plotting is an
//! optional sink: no algorithm in this crate depends on it for correctness.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{CircleObstacle, Path2D, PlanningError, PlanningResult, Point2D};

/// Color palette for consistent styling
pub mod colors {
    pub const OBSTACLE: &str = "#000000";
    pub const START: &str = "#00FF00";
    pub const GOAL: &str = "#0000FF";
    pub const PATH: &str = "#FF0000";
    pub const TREE: &str = "#87CEEB";
    pub const COURSE: &str = "#FFA500";
    pub const TRAJECTORY: &str = "#008000";
}

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::new(colors::PATH, "Path")
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }
}

/// Thin stateful wrapper over a gnuplot figure
pub struct Visualizer {
    figure: Figure,
    title: String,
}

impl Visualizer {
    pub fn new(title: &str) -> Self {
        Self {
            figure: Figure::new(),
            title: title.to_string(),
        }
    }

    /// Draw circular obstacles as outlines
    pub fn draw_obstacles(&mut self, obstacles: &[CircleObstacle]) -> &mut Self {
        for obs in obstacles {
            let n = 40;
            let x: Vec<f64> = (0..=n)
                .map(|i| {
                    let t = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                    obs.center.x + obs.radius * t.cos()
                })
                .collect();
            let y: Vec<f64> = (0..=n)
                .map(|i| {
                    let t = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                    obs.center.y + obs.radius * t.sin()
                })
                .collect();
            self.figure
                .axes2d()
                .lines(&x, &y, &[Color(colors::OBSTACLE), LineWidth(1.0)]);
        }
        self
    }

    /// Draw a single line segment (one tree edge)
    pub fn draw_segment(&mut self, a: Point2D, b: Point2D, color: &str) -> &mut Self {
        self.figure
            .axes2d()
            .lines(&[a.x, b.x], &[a.y, b.y], &[Color(color), LineWidth(0.5)]);
        self
    }

    /// Draw a path with the default style and the given caption
    pub fn draw_path(&mut self, path: &Path2D, caption: &str) -> &mut Self {
        self.draw_path_styled(path, &PathStyle::new(colors::PATH, caption))
    }

    pub fn draw_path_styled(&mut self, path: &Path2D, style: &PathStyle) -> &mut Self {
        self.figure.axes2d().lines(
            &path.x_coords(),
            &path.y_coords(),
            &[
                Caption(&style.caption),
                Color(&style.color),
                LineWidth(style.line_width),
            ],
        );
        self
    }

    pub fn draw_points(&mut self, points: &[Point2D], style: &PointStyle) -> &mut Self {
        let x: Vec<f64> = points.iter().map(|p| p.x).collect();
        let y: Vec<f64> = points.iter().map(|p| p.y).collect();
        self.figure.axes2d().points(
            &x,
            &y,
            &[
                Caption(&style.caption),
                Color(&style.color),
                PointSymbol(style.symbol),
                PointSize(style.size),
            ],
        );
        self
    }

    pub fn draw_start_goal(&mut self, start: Point2D, goal: Point2D) -> &mut Self {
        self.draw_points(&[start], &PointStyle::new(colors::START, "Start").with_size(1.5));
        self.draw_points(&[goal], &PointStyle::new(colors::GOAL, "Goal").with_size(1.5))
    }

    fn apply_settings(&mut self) {
        let title = self.title.clone();
        self.figure
            .axes2d()
            .set_title(&title, &[])
            .set_x_label("X [m]", &[])
            .set_y_label("Y [m]", &[])
            .set_aspect_ratio(AutoOption::Fix(1.0));
    }

    /// Save the figure to a png file
    pub fn save_png(&mut self, output_path: &str, width: u32, height: u32) -> PlanningResult<()> {
        self.apply_settings();
        self.figure
            .save_to_png(output_path, width, height)
            .map_err(|e| PlanningError::VisualizationError(e.to_string()))
    }
}
