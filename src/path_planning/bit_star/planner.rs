//! BIT* best-first search engine
//!
//! The outer loop alternates three phases. When both work queues are empty
//! a new batch of informed samples is drawn and every tree vertex is
//! requeued (BATCH_START). Vertices are then expanded in best-first order
//! into candidate edges for as long as the cheapest vertex lower bound does
//! not exceed the cheapest edge lower bound (VERTEX_EXPANSION). Finally the
//! best candidate edge is evaluated and committed into the tree when it
//! provably improves the best known solution cost (EDGE_EVALUATION). The
//! planner is anytime: after the first goal connection it keeps refining
//! until the iteration budget runs out.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ordered_float::NotNan;

use crate::common::{CircleObstacle, Path2D, PathPlanner, PlanningError, PlanningResult, Point2D};
use crate::utils::Visualizer;

use super::cost::CostModel;
use super::grid_index::{GridIndex, NodeId};
use super::sampler::InformedSampler;
use super::tree::Tree;

/// Tunable parameters for the BIT* planner
#[derive(Debug, Clone)]
pub struct BitStarConfig {
    /// Grid discretization step [m]
    pub resolution: f64,
    /// Scaling of the shrinking connection radius
    pub eta: f64,
    /// Number of samples drawn per batch
    pub batch_size: usize,
    /// Outer iteration budget
    pub max_iter: usize,
    /// Fixed RNG seed for reproducible runs
    pub rng_seed: Option<u64>,
}

impl Default for BitStarConfig {
    fn default() -> Self {
        Self {
            resolution: 0.1,
            eta: 2.0,
            batch_size: 200,
            max_iter: 200,
            rng_seed: None,
        }
    }
}

/// Edge predicate injected at commit time; returns false to veto an edge
pub type EdgeValidator = Box<dyn Fn(&Point2D, &Point2D) -> bool>;

/// Batch Informed Trees planner over a grid-discretized 2D space
pub struct BitStarPlanner {
    config: BitStarConfig,
    start: Point2D,
    goal: Point2D,
    obstacle_list: Vec<CircleObstacle>,
    rand_area: (f64, f64),

    grid: GridIndex,
    cost: CostModel,
    // None only for a degenerate start == goal query, which never samples
    sampler: Option<InformedSampler>,
    tree: Tree,
    start_id: NodeId,
    goal_id: NodeId,

    g_scores: HashMap<NodeId, f64>,
    f_scores: HashMap<NodeId, f64>,
    parents: HashMap<NodeId, NodeId>,

    vertex_queue: BinaryHeap<Reverse<(NotNan<f64>, NodeId)>>,
    vertex_members: HashSet<NodeId>,
    edge_queue: BinaryHeap<Reverse<(NotNan<f64>, NodeId, NodeId)>>,
    edge_members: HashSet<(NodeId, NodeId)>,
    old_vertices: HashSet<NodeId>,
    radius: f64,

    cost_history: Vec<f64>,
    edge_validator: Option<EdgeValidator>,
    cancel_flag: Option<Arc<AtomicBool>>,
}

/// NaN cannot order the heaps; map it to the unreachable cost
fn heap_key(value: f64) -> NotNan<f64> {
    NotNan::new(value).unwrap_or_else(|_| NotNan::new(f64::INFINITY).unwrap())
}

impl BitStarPlanner {
    pub fn new(
        start: Point2D,
        goal: Point2D,
        obstacle_list: Vec<CircleObstacle>,
        rand_area: (f64, f64),
        config: BitStarConfig,
    ) -> PlanningResult<Self> {
        if config.batch_size == 0 {
            return Err(PlanningError::InvalidParameter(
                "batch size must be positive".to_string(),
            ));
        }
        let grid = GridIndex::new(
            vec![rand_area.0, rand_area.0],
            vec![rand_area.1, rand_area.1],
            config.resolution,
        )?;
        let cost = CostModel::new(grid.clone());
        let start_id = grid.to_id(&[start.x, start.y]);
        let goal_id = grid.to_id(&[goal.x, goal.y]);

        // A start == goal query must still construct: plan() answers it
        // with a single-point path, so the informed sampler (which has no
        // valid ellipsoid frame for coincident foci) is never needed
        let degenerate = start_id == goal_id || start.distance(&goal) <= f64::EPSILON;
        let sampler = if degenerate {
            None
        } else {
            Some(Self::make_sampler(start, goal, rand_area, &config)?)
        };

        let mut planner = BitStarPlanner {
            config,
            start,
            goal,
            obstacle_list,
            rand_area,
            grid,
            cost,
            sampler,
            tree: Tree::new(),
            start_id,
            goal_id,
            g_scores: HashMap::new(),
            f_scores: HashMap::new(),
            parents: HashMap::new(),
            vertex_queue: BinaryHeap::new(),
            vertex_members: HashSet::new(),
            edge_queue: BinaryHeap::new(),
            edge_members: HashSet::new(),
            old_vertices: HashSet::new(),
            radius: f64::INFINITY,
            cost_history: Vec::new(),
            edge_validator: None,
            cancel_flag: None,
        };
        planner.init_scores();
        Ok(planner)
    }

    fn make_sampler(
        start: Point2D,
        goal: Point2D,
        rand_area: (f64, f64),
        config: &BitStarConfig,
    ) -> PlanningResult<InformedSampler> {
        match config.rng_seed {
            Some(seed) => InformedSampler::with_seed(start, goal, rand_area, seed),
            None => InformedSampler::new(start, goal, rand_area),
        }
    }

    /// Inject a collision predicate consulted before every edge commit.
    /// Without one the planner is obstacle-oblivious; the obstacle list is
    /// then only used for visualization.
    pub fn set_edge_validator(&mut self, validator: EdgeValidator) {
        self.edge_validator = Some(validator);
    }

    /// Install a flag that aborts planning at the next batch boundary
    pub fn set_cancel_flag(&mut self, flag: Arc<AtomicBool>) {
        self.cancel_flag = Some(flag);
    }

    /// Best known cost from start per outer iteration (non-increasing)
    pub fn cost_history(&self) -> &[f64] {
        &self.cost_history
    }

    /// Best known solution cost so far
    pub fn best_cost(&self) -> f64 {
        self.g_score(self.goal_id)
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    fn init_scores(&mut self) {
        // The goal starts life as a pool sample; the tree holds only start
        self.tree.add_sample(self.goal_id, self.goal);
        self.g_scores.insert(self.goal_id, f64::INFINITY);
        self.f_scores.insert(self.goal_id, 0.0);

        self.tree.add_vertex(self.start_id);
        self.g_scores.insert(self.start_id, 0.0);
        self.f_scores
            .insert(self.start_id, self.cost.heuristic(self.start_id, self.goal_id));
    }

    fn g_score(&self, id: NodeId) -> f64 {
        self.g_scores.get(&id).copied().unwrap_or(f64::INFINITY)
    }

    fn f_score(&self, id: NodeId) -> f64 {
        self.f_scores.get(&id).copied().unwrap_or(f64::INFINITY)
    }

    /// Run the search. All state belongs to this instance. Calling again
    /// refines the same tree for another `max_iter` iterations and keeps
    /// appending to `cost_history`, so the recorded cost stays
    /// non-increasing across calls.
    pub fn plan(&mut self) -> PlanningResult<Path2D> {
        // Degenerate query: nothing to search
        if self.start_id == self.goal_id || self.start.distance(&self.goal) <= f64::EPSILON {
            return Ok(Path2D::from_points(vec![self.start]));
        }
        if self.config.max_iter == 0 {
            return Err(PlanningError::NoPathFound);
        }

        let mut iterations = 0;
        while iterations < self.config.max_iter {
            if let Some(flag) = &self.cancel_flag {
                // Only at batch boundaries: a partially evaluated commit
                // would leave the score tables inconsistent
                if flag.load(Ordering::Relaxed) {
                    break;
                }
            }

            if self.vertex_queue.is_empty() && self.edge_queue.is_empty() {
                self.start_batch();
            }

            // Expand vertices while the cheapest vertex lower bound does
            // not exceed the cheapest edge lower bound
            while let Some((vertex_value, vid)) = self.best_vertex() {
                if vertex_value > self.best_edge_value() {
                    break;
                }
                self.vertex_members.remove(&vid);
                self.expand_vertex(vid);
            }

            match self.pop_best_edge() {
                Some((u, w)) => self.evaluate_edge(u, w),
                None => {
                    // Stale queues with no edge to try: force a fresh batch
                    self.clear_queues();
                }
            }

            self.cost_history.push(self.best_cost());
            iterations += 1;
        }

        self.extract_path()
    }

    /// BATCH_START: draw informed samples, reset the connection radius and
    /// requeue every tree vertex
    fn start_batch(&mut self) {
        let c_best = self.best_cost();
        let samples = match self.sampler.as_mut() {
            Some(sampler) => sampler.sample_batch(self.config.batch_size, c_best),
            // Degenerate queries short-circuit in plan() and never get here
            None => return,
        };
        for point in samples {
            let id = self.grid.to_id(&[point.x, point.y]);
            // The goal's own pool entry is authoritative; committed cells
            // never return to the pool
            if id == self.goal_id || self.tree.contains_vertex(id) {
                continue;
            }
            self.tree.add_sample(id, point);
        }

        self.old_vertices.extend(self.tree.vertex_ids());
        self.radius = self.connection_radius(self.tree.vertex_count() + self.tree.sample_count());

        let ids: Vec<NodeId> = self.tree.vertex_ids().collect();
        for id in ids {
            self.push_vertex(id);
        }
    }

    /// Shrinking connection radius from the sample density:
    /// r(q) = eta * 2 * ((1 + 1/d) * (measure / zeta_d))^(1/d) * (ln q / q)^(1/d)
    fn connection_radius(&self, q: usize) -> f64 {
        let dim = 2.0;
        let q = q.max(2) as f64;
        let extent = self.rand_area.1 - self.rand_area.0;
        let space_measure = extent * extent;
        let unit_ball_measure = std::f64::consts::PI;
        let gamma = self.config.eta
            * 2.0
            * ((1.0 + 1.0 / dim) * (space_measure / unit_ball_measure)).powf(1.0 / dim);
        gamma * (q.ln() / q).powf(1.0 / dim)
    }

    fn vertex_value(&self, id: NodeId) -> f64 {
        self.g_score(id) + self.cost.heuristic(id, self.goal_id)
    }

    fn edge_value(&self, u: NodeId, w: NodeId) -> f64 {
        self.g_score(u) + self.cost.distance(u, w) + self.cost.heuristic(w, self.goal_id)
    }

    fn push_vertex(&mut self, id: NodeId) {
        if self.vertex_members.insert(id) {
            self.vertex_queue
                .push(Reverse((heap_key(self.vertex_value(id)), id)));
        }
    }

    fn push_edge(&mut self, u: NodeId, w: NodeId) {
        if self.edge_members.insert((u, w)) {
            self.edge_queue
                .push(Reverse((heap_key(self.edge_value(u, w)), u, w)));
        }
    }

    /// Peek the cheapest live vertex. Keys are pushed once and only shrink
    /// (g-scores never grow), so a stale head is re-keyed and re-pushed.
    fn best_vertex(&mut self) -> Option<(f64, NodeId)> {
        while let Some(&Reverse((key, id))) = self.vertex_queue.peek() {
            if !self.vertex_members.contains(&id) {
                self.vertex_queue.pop();
                continue;
            }
            let current = self.vertex_value(id);
            if current + 1e-12 < key.into_inner() {
                self.vertex_queue.pop();
                self.vertex_queue.push(Reverse((heap_key(current), id)));
                continue;
            }
            return Some((key.into_inner(), id));
        }
        None
    }

    fn best_edge_value(&mut self) -> f64 {
        while let Some(&Reverse((key, u, w))) = self.edge_queue.peek() {
            if !self.edge_members.contains(&(u, w)) {
                self.edge_queue.pop();
                continue;
            }
            let current = self.edge_value(u, w);
            if current + 1e-12 < key.into_inner() {
                self.edge_queue.pop();
                self.edge_queue.push(Reverse((heap_key(current), u, w)));
                continue;
            }
            return key.into_inner();
        }
        f64::INFINITY
    }

    fn pop_best_edge(&mut self) -> Option<(NodeId, NodeId)> {
        self.best_edge_value();
        while let Some(Reverse((_, u, w))) = self.edge_queue.pop() {
            if self.edge_members.remove(&(u, w)) {
                return Some((u, w));
            }
        }
        None
    }

    fn clear_queues(&mut self) {
        self.vertex_queue.clear();
        self.vertex_members.clear();
        self.edge_queue.clear();
        self.edge_members.clear();
    }

    /// VERTEX_EXPANSION: push candidate edges from v to every pool sample
    /// (and, for vertices new in this batch, every tree vertex) within the
    /// connection radius whose optimistic total cost can still beat the
    /// best known solution
    fn expand_vertex(&mut self, vid: NodeId) {
        let mut candidates: Vec<NodeId> = self
            .tree
            .sample_ids()
            .filter(|&sid| sid != vid && self.cost.distance(vid, sid) <= self.radius)
            .collect();

        if !self.old_vertices.contains(&vid) {
            // Rewiring candidates: tree vertices near a vertex added in
            // this batch
            candidates.extend(self.tree.vertex_ids().filter(|&w| {
                w != vid
                    && self.cost.distance(vid, w) <= self.radius
                    && !self.tree.has_edge(vid, w)
                    && !self.edge_members.contains(&(vid, w))
            }));
        }

        let c_best = self.best_cost();
        for x in candidates {
            let lower_bound = self.cost.distance(self.start_id, vid)
                + self.cost.heuristic(vid, x)
                + self.cost.heuristic(x, self.goal_id);
            if lower_bound < c_best {
                self.push_edge(vid, x);
            }
        }
    }

    /// EDGE_EVALUATION: commit (u, w) when the three nested cost checks all
    /// beat the best known solution cost
    fn evaluate_edge(&mut self, u: NodeId, w: NodeId) {
        let c_best = self.best_cost();
        let estimated_vertex_cost =
            self.g_score(u) + self.cost.distance(u, w) + self.cost.heuristic(w, self.goal_id);

        if estimated_vertex_cost >= c_best {
            // The best candidate cannot improve the solution any more;
            // everything behind it in the queues is at least as bad
            self.clear_queues();
            return;
        }

        let estimated_edge_cost = self.cost.distance(self.start_id, u)
            + self.cost.heuristic(u, w)
            + self.cost.heuristic(w, self.goal_id);
        let actual_cost = self.g_score(u) + self.cost.distance(u, w);
        if estimated_edge_cost >= c_best || actual_cost >= c_best {
            return;
        }

        if let Some(validator) = &self.edge_validator {
            let pu = Point2D::from(point2(&self.grid.to_point(u)));
            let pw = Point2D::from(point2(&self.grid.to_point(w)));
            if !validator(&pu, &pw) {
                return;
            }
        }

        // Commit: promote the far endpoint, connect, then repair all
        // downstream costs in one atomic relaxation pass
        self.tree.remove_sample(w);
        self.tree.add_vertex(w);
        if self.tree.add_edge(u, w) && actual_cost < self.g_score(w) {
            self.g_scores.insert(w, actual_cost);
            self.f_scores
                .insert(w, actual_cost + self.cost.heuristic(w, self.goal_id));
            self.parents.insert(w, u);
        }
        self.push_vertex(w);

        if u == self.goal_id || w == self.goal_id {
            println!(
                "BIT*: goal connected, cost {:.3}",
                self.g_score(self.goal_id)
            );
        }

        self.propagate_costs();
        self.prune_edge_queue();
    }

    /// Relaxation over the committed tree, propagating improved costs to
    /// all affected descendants. The open set is keyed by the f-score
    /// table (g + goal heuristic); the heuristic is consistent so every
    /// vertex is settled with its final g. Must run to completion to keep
    /// the score tables consistent.
    fn propagate_costs(&mut self) {
        let mut open: BinaryHeap<Reverse<(NotNan<f64>, NodeId)>> = BinaryHeap::new();
        let mut closed: HashSet<NodeId> = HashSet::new();

        open.push(Reverse((heap_key(self.f_score(self.start_id)), self.start_id)));
        while let Some(Reverse((_, current))) = open.pop() {
            if !closed.insert(current) {
                continue;
            }
            let g_current = self.g_score(current);
            let neighbors: Vec<NodeId> = self.tree.neighbors(current).to_vec();
            for nb in neighbors {
                if closed.contains(&nb) {
                    continue;
                }
                let tentative = g_current + self.cost.distance(current, nb);
                if tentative + 1e-12 < self.g_score(nb) {
                    self.g_scores.insert(nb, tentative);
                    self.f_scores
                        .insert(nb, tentative + self.cost.heuristic(nb, self.goal_id));
                    self.parents.insert(nb, current);
                }
                open.push(Reverse((heap_key(self.f_score(nb)), nb)));
            }
        }
    }

    /// Drop queued edges whose optimistic cost can no longer beat the
    /// updated best solution cost
    fn prune_edge_queue(&mut self) {
        let c_best = self.best_cost();
        let survivors: Vec<(NodeId, NodeId)> = self
            .edge_members
            .iter()
            .copied()
            .filter(|&(u, w)| self.edge_value(u, w) < c_best)
            .collect();
        self.edge_queue.clear();
        self.edge_members.clear();
        for (u, w) in survivors {
            self.push_edge(u, w);
        }
    }

    /// TERMINATED: walk parent links goal -> start. Endpoints keep the
    /// caller's exact coordinates; interior waypoints decode through the
    /// grid.
    fn extract_path(&self) -> PlanningResult<Path2D> {
        if !self.best_cost().is_finite() {
            return Err(PlanningError::NoPathFound);
        }

        let mut ids = vec![self.goal_id];
        let mut current = self.goal_id;
        while current != self.start_id {
            current = *self
                .parents
                .get(&current)
                .ok_or(PlanningError::NoPathFound)?;
            ids.push(current);
            if ids.len() > self.tree.vertex_count() + 1 {
                return Err(PlanningError::NumericalError(
                    "parent links form a cycle".to_string(),
                ));
            }
        }
        ids.reverse();

        let last = ids.len() - 1;
        let points = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                if i == 0 {
                    self.start
                } else if i == last {
                    self.goal
                } else {
                    Point2D::from(point2(&self.grid.to_point(id)))
                }
            })
            .collect();
        Ok(Path2D::from_points(points))
    }

    /// Render the sample tree and the final path with gnuplot
    pub fn visualize(&self, path: &Path2D, output_path: &str) -> PlanningResult<()> {
        let mut vis = Visualizer::new("BIT* Path Planning");
        vis.draw_obstacles(&self.obstacle_list);
        for (a, b) in self.tree.edges() {
            let pa = self.grid.to_point(a);
            let pb = self.grid.to_point(b);
            vis.draw_segment(
                Point2D::new(pa[0], pa[1]),
                Point2D::new(pb[0], pb[1]),
                crate::utils::colors::TREE,
            );
        }
        vis.draw_path(path, "BIT* Path");
        vis.draw_start_goal(self.start, self.goal);
        vis.save_png(output_path, 800, 600)
    }
}

fn point2(coords: &[f64]) -> (f64, f64) {
    (coords[0], coords[1])
}

impl PathPlanner for BitStarPlanner {
    fn plan(&mut self, start: Point2D, goal: Point2D) -> PlanningResult<Path2D> {
        // Restart the search from scratch with the new query
        let fresh = BitStarPlanner::new(
            start,
            goal,
            self.obstacle_list.clone(),
            self.rand_area,
            self.config.clone(),
        )?;
        let validator = self.edge_validator.take();
        let cancel = self.cancel_flag.take();
        *self = fresh;
        self.edge_validator = validator;
        self.cancel_flag = cancel;
        BitStarPlanner::plan(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_planner(max_iter: usize) -> BitStarPlanner {
        let config = BitStarConfig {
            max_iter,
            rng_seed: Some(42),
            ..Default::default()
        };
        BitStarPlanner::new(
            Point2D::new(0.0, 0.0),
            Point2D::new(5.0, 10.0),
            Vec::new(),
            (0.0, 15.0),
            config,
        )
        .unwrap()
    }

    #[test]
    fn test_finds_path_in_open_space() {
        let mut planner = scenario_planner(200);
        let path = planner.plan().unwrap();
        assert!(!path.is_empty());

        // Endpoints quantize to the start and goal cells
        let grid = planner.grid();
        let first = path.points[0];
        let last = path.points[path.len() - 1];
        assert_eq!(grid.to_id(&[first.x, first.y]), grid.to_id(&[0.0, 0.0]));
        assert_eq!(grid.to_id(&[last.x, last.y]), grid.to_id(&[5.0, 10.0]));

        // Total length is finite and bounded below by the straight line
        let straight = Point2D::new(0.0, 0.0).distance(&Point2D::new(5.0, 10.0));
        let length = path.total_length();
        assert!(length.is_finite());
        assert!(length >= straight - 1e-6);
    }

    #[test]
    fn test_consecutive_waypoints_are_tree_edges() {
        let mut planner = scenario_planner(200);
        let path = planner.plan().unwrap();
        let grid_ids: Vec<_> = path
            .points
            .iter()
            .map(|p| planner.grid().to_id(&[p.x, p.y]))
            .collect();
        for pair in grid_ids.windows(2) {
            assert!(
                planner.tree().has_edge(pair[0], pair[1]),
                "waypoints {:?} not connected by a committed edge",
                pair
            );
        }
    }

    #[test]
    fn test_best_cost_is_monotonically_non_increasing() {
        let mut planner = scenario_planner(200);
        planner.plan().unwrap();
        for w in planner.cost_history().windows(2) {
            assert!(w[1] <= w[0] + 1e-9, "cost went up: {} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn test_f_scores_track_g_plus_heuristic() {
        // Every committed vertex keeps f = g + h; the relaxation open set
        // is ordered by this table
        let mut planner = scenario_planner(200);
        planner.plan().unwrap();
        for id in planner.tree().vertex_ids() {
            let g = planner.g_score(id);
            if !g.is_finite() {
                continue;
            }
            let f = planner.f_score(id);
            let h = planner.cost.heuristic(id, planner.goal_id);
            assert!(
                (f - (g + h)).abs() < 1e-9,
                "vertex {}: f {} != g {} + h {}",
                id,
                f,
                g,
                h
            );
        }
    }

    #[test]
    fn test_second_plan_call_keeps_refining() {
        let mut planner = scenario_planner(200);
        let first = planner.plan().unwrap();
        let cost_after_first = planner.best_cost();
        let history_after_first = planner.cost_history().len();

        let second = planner.plan().unwrap();
        assert!(!first.is_empty() && !second.is_empty());
        assert!(planner.best_cost() <= cost_after_first + 1e-9);
        assert!(planner.cost_history().len() > history_after_first);
        // Monotone across the call boundary, not just within one call
        for w in planner.cost_history().windows(2) {
            assert!(w[1] <= w[0] + 1e-9, "cost went up: {} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn test_start_equals_goal_returns_single_point() {
        // Construction must succeed even though the informed ellipsoid has
        // no frame for coincident foci
        let config = BitStarConfig {
            rng_seed: Some(1),
            ..Default::default()
        };
        let mut planner = BitStarPlanner::new(
            Point2D::new(3.0, 3.0),
            Point2D::new(3.0, 3.0),
            Vec::new(),
            (0.0, 15.0),
            config,
        )
        .unwrap();
        assert!(planner.best_cost().abs() < 1e-12);
        let path = planner.plan().unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.points[0], Point2D::new(3.0, 3.0));
        assert!((path.total_length()).abs() < 1e-12);
        // The search loop never ran
        assert!(planner.cost_history().is_empty());
    }

    #[test]
    fn test_same_cell_start_goal_returns_single_point() {
        // Distinct coordinates that quantize to one grid cell are the same
        // degenerate query
        let config = BitStarConfig {
            rng_seed: Some(1),
            ..Default::default()
        };
        let mut planner = BitStarPlanner::new(
            Point2D::new(3.0, 3.0),
            Point2D::new(3.01, 2.99),
            Vec::new(),
            (0.0, 15.0),
            config,
        )
        .unwrap();
        let path = planner.plan().unwrap();
        assert_eq!(path.len(), 1);
        assert!(planner.cost_history().is_empty());
    }

    #[test]
    fn test_zero_budget_returns_no_path() {
        let mut planner = scenario_planner(0);
        let result = planner.plan();
        assert!(matches!(result, Err(PlanningError::NoPathFound)));
        // Only the start vertex was ever added
        assert_eq!(planner.tree().vertex_count(), 1);
    }

    #[test]
    fn test_edge_validator_vetoes_everything() {
        let mut planner = scenario_planner(20);
        planner.set_edge_validator(Box::new(|_, _| false));
        assert!(matches!(planner.plan(), Err(PlanningError::NoPathFound)));
    }

    #[test]
    fn test_cancel_flag_stops_planning() {
        let mut planner = scenario_planner(200);
        let flag = Arc::new(AtomicBool::new(true));
        planner.set_cancel_flag(flag);
        // Cancelled before the first batch: no solution to extract
        assert!(matches!(planner.plan(), Err(PlanningError::NoPathFound)));
        assert_eq!(planner.tree().vertex_count(), 1);
    }

    #[test]
    fn test_path_planner_trait_replans() {
        let mut planner = scenario_planner(200);
        let path = PathPlanner::plan(
            &mut planner,
            Point2D::new(1.0, 1.0),
            Point2D::new(10.0, 4.0),
        )
        .unwrap();
        assert!(!path.is_empty());
        assert_eq!(path.points[0], Point2D::new(1.0, 1.0));
    }
}
