/*
 * Copyright (C) 2023 Open Source Robotics Foundation
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
*/

pub mod halt;
pub use halt::Halt;

pub mod settings;
pub use settings::{Settings, SettingsError};

use crate::{
    algorithm::{IndexedQueue, Key, Path, SearchStatus, ValueMap},
    configurable::Configurable,
    data::{Data, EdgeChange},
    error::{Anyhow, ThisError},
};
use log::{debug, trace};
use smallvec::SmallVec;

type Neighbors<V> = SmallVec<[V; 8]>;

/// The Planner maintains a shortest path from a movable start vertex to a
/// fixed goal vertex through the [`Data`] that it was given.
///
/// It implements the optimized D* Lite algorithm (Koenig & Likhachev, *Fast
/// Replanning for Navigation in Unknown Terrain*, Figure 9). The search runs
/// backwards from the goal and keeps two cost-to-goal estimates per vertex:
/// `g`, the settled estimate, and `rhs`, a one-step lookahead computed from
/// the successors' `g`. Vertices whose estimates disagree are kept in a
/// frontier queue, and every call to [`Planner::plan`] only repairs those.
///
/// The host is expected to:
/// * call [`Planner::flag_changed`] (or [`Planner::flag_changes`]) after it
///   changes the cost of an edge in its data,
/// * call [`Planner::update_start`] whenever the agent advances, and
/// * call [`Planner::plan`] whenever it wants an up to date path.
///
/// The Planner can also be given default halting behavior which bounds how
/// much repair work a single call to [`Planner::plan`] may do. The Halting
/// generic must implement the [`Halt`] trait for the planner's frontier queue.
#[derive(Debug, Clone)]
pub struct Planner<D: Data, Halting = ()> {
    data: D,
    start: D::Vertex,
    goal: D::Vertex,
    g: ValueMap<D::Vertex>,
    rhs: ValueMap<D::Vertex>,
    queue: IndexedQueue<D::Vertex>,
    /// Accumulated heuristic distance that the start has moved. Adding this to
    /// new keys keeps them comparable with keys that were computed for an
    /// earlier start, so the queue never needs to be re-keyed.
    km: f64,
    settings: Settings,
    default_halting: Halting,
    last_repair: RepairStats,
}

/// Counters describing the work done by the most recent repair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairStats {
    /// Number of vertices taken from the top of the queue.
    pub iterations: usize,
    /// Vertices whose key had gone stale and were put back with a new key.
    pub rekeyed: usize,
    /// Vertices whose `g` was lowered to their `rhs`.
    pub overconsistent: usize,
    /// Vertices whose `g` was invalidated because the path they relied on
    /// became more expensive.
    pub underconsistent: usize,
    /// The repair was stopped by the halting behavior before it converged.
    pub halted: bool,
}

impl RepairStats {
    /// Number of vertices whose `g` value was changed.
    pub fn expansions(&self) -> usize {
        self.overconsistent + self.underconsistent
    }
}

#[derive(ThisError, Debug)]
pub enum PlannerError<E> {
    #[error("An error occurred in the planning data:\n{0}")]
    Data(E),
    #[error(
        "Following the cost field for {0} steps did not reach the goal. The \
        field may not have converged yet."
    )]
    UnresolvedPath(usize),
}

impl<D: Data> Planner<D, ()> {
    /// Create a new planner that will find paths from `start` to `goal`
    /// through `data`. No search is performed until [`Planner::plan`] is
    /// called.
    pub fn new(
        data: D,
        start: D::Vertex,
        goal: D::Vertex,
    ) -> Result<Self, PlannerError<D::DataError>> {
        let mut planner = Self {
            data,
            start,
            goal: goal.clone(),
            g: ValueMap::new(),
            rhs: ValueMap::new(),
            queue: IndexedQueue::new(),
            km: 0.0,
            settings: Settings::default(),
            default_halting: (),
            last_repair: RepairStats::default(),
        };

        planner.rhs.set(goal.clone(), 0.0);
        let key = planner.calc_key(&goal)?;
        planner.queue.insert(goal, key);
        Ok(planner)
    }
}

impl<D: Data, Halting> Planner<D, Halting> {
    /// Consume this Planner and create a new Planner with a different default
    /// Halting value.
    pub fn with_halting<NewHalting>(self, halting: NewHalting) -> Planner<D, NewHalting> {
        Planner {
            data: self.data,
            start: self.start,
            goal: self.goal,
            g: self.g,
            rhs: self.rhs,
            queue: self.queue,
            km: self.km,
            settings: self.settings,
            default_halting: halting,
            last_repair: self.last_repair,
        }
    }

    /// Replace the settings of this planner. Unlike [`Configurable::configure`]
    /// the settings are not validated.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// The start vertex, as it is currently.
    pub fn start(&self) -> &D::Vertex {
        &self.start
    }

    pub fn goal(&self) -> &D::Vertex {
        &self.goal
    }

    pub fn km(&self) -> f64 {
        self.km
    }

    /// The settled cost-to-goal estimate of a vertex.
    pub fn g(&self, vertex: &D::Vertex) -> f64 {
        self.g.get(vertex)
    }

    /// The one-step lookahead cost-to-goal estimate of a vertex.
    pub fn rhs(&self, vertex: &D::Vertex) -> f64 {
        self.rhs.get(vertex)
    }

    /// Is the vertex currently waiting in the frontier queue?
    pub fn is_queued(&self, vertex: &D::Vertex) -> bool {
        self.queue.contains(vertex)
    }

    pub fn frontier_len(&self) -> usize {
        self.queue.len()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Statistics of the most recent repair performed by [`Planner::plan`].
    pub fn last_repair(&self) -> &RepairStats {
        &self.last_repair
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    /// Mutable access to the planning data. Any edge costs that are changed
    /// through this must be reported with [`Planner::flag_changed`].
    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    pub fn into_data(self) -> D {
        self.data
    }

    /// Notify the planner that the cost of traversing from `from` to `to` has
    /// changed from `old_cost` to `new_cost`. The data must already report
    /// `new_cost` for this edge.
    ///
    /// This only records the inconsistency. The repair happens during the next
    /// call to [`Planner::plan`], so any number of changes can be flagged
    /// before planning again.
    pub fn flag_changed(
        &mut self,
        from: &D::Vertex,
        to: &D::Vertex,
        old_cost: f64,
        new_cost: f64,
    ) -> Result<(), PlannerError<D::DataError>> {
        trace!("flagged edge cost change: {old_cost} -> {new_cost}");
        if *from != self.goal {
            if old_cost > new_cost {
                let through_to = new_cost + self.g.get(to);
                if through_to < self.rhs.get(from) {
                    self.rhs.set(from.clone(), through_to);
                }
            } else if self.settings.approx_eq(self.rhs.get(from), old_cost + self.g.get(to)) {
                // The estimate of `from` was based on this edge, so it has to
                // be recomputed from scratch.
                let rhs = self.lookahead(from)?;
                self.rhs.set(from.clone(), rhs);
            }
        }

        self.update_vertex(from)
    }

    /// Flag every change in a batch, as produced by the data sources in
    /// [`crate::graph`].
    pub fn flag_changes(
        &mut self,
        changes: impl IntoIterator<Item = EdgeChange<D::Vertex>>,
    ) -> Result<(), PlannerError<D::DataError>> {
        for change in changes {
            self.flag_changed(&change.from, &change.to, change.old_cost, change.new_cost)?;
        }

        Ok(())
    }

    /// Move the start to a new vertex. This is cheap: instead of re-keying the
    /// whole queue, the heuristic distance moved is accumulated into `km`.
    pub fn update_start(&mut self, start: D::Vertex) -> Result<(), PlannerError<D::DataError>> {
        let moved = self
            .data
            .distance(&self.start, &start)
            .map_err(PlannerError::Data)?;
        self.km += moved;
        self.start = start;
        Ok(())
    }

    /// Repair the search using the default halting behavior of this planner
    /// and then extract the current lowest cost path.
    ///
    /// Returns [`SearchStatus::Impossible`] if the goal cannot be reached from
    /// the start given everything that the planner currently knows, and
    /// [`SearchStatus::Incomplete`] if the halting behavior stopped the
    /// repair before it converged.
    pub fn plan(&mut self) -> Result<SearchStatus<Path<D::Vertex>>, PlannerError<D::DataError>>
    where
        Halting: Halt<IndexedQueue<D::Vertex>>,
    {
        let halting = self.default_halting.clone();
        self.plan_with_halting(halting)
    }

    /// Same as [`Planner::plan`] but using a custom halting behavior.
    pub fn plan_with_halting<H: Halt<IndexedQueue<D::Vertex>>>(
        &mut self,
        mut halting: H,
    ) -> Result<SearchStatus<Path<D::Vertex>>, PlannerError<D::DataError>> {
        self.last_repair = self.compute_shortest_path(&mut halting)?;
        if self.last_repair.halted {
            return Ok(SearchStatus::Incomplete);
        }

        self.extract_path()
    }

    /// Walk greedily from the start to the goal, always stepping to the
    /// successor that minimizes `cost + g`.
    ///
    /// [`Planner::plan`] calls this after the repair converges. Calling it
    /// directly after a halted repair gives the best path found so far, which
    /// may be suboptimal.
    pub fn extract_path(&self) -> Result<SearchStatus<Path<D::Vertex>>, PlannerError<D::DataError>> {
        let mut current = self.start.clone();
        let mut vertices = vec![current.clone()];
        let mut total_cost = 0.0;

        // Every vertex after the start must have a finite g, so a path that
        // does not revisit anything can be no longer than this.
        let max_len = self.g.len() + 1;

        while current != self.goal {
            if self.rhs.get(&current) == f64::INFINITY {
                return Ok(SearchStatus::Impossible);
            }

            let mut best: Option<(D::Vertex, f64)> = None;
            let mut best_value = f64::INFINITY;
            for next in self.data.successors(&current) {
                let cost = self
                    .data
                    .cost(&current, &next)
                    .map_err(PlannerError::Data)?;
                let value = cost + self.g.get(&next);
                if value < best_value {
                    best_value = value;
                    best = Some((next, cost));
                }
            }

            // A finite rhs with no finite way forward means the field has
            // not caught up with the data yet.
            let (next, cost) = match best {
                Some(best) => best,
                None => return Err(PlannerError::UnresolvedPath(vertices.len() - 1)),
            };

            total_cost += cost;
            vertices.push(next.clone());
            current = next;

            if vertices.len() > max_len {
                return Err(PlannerError::UnresolvedPath(vertices.len() - 1));
            }
        }

        Ok(SearchStatus::Solved(Path { vertices, total_cost }))
    }

    fn calc_key(&self, vertex: &D::Vertex) -> Result<Key, PlannerError<D::DataError>> {
        let estimate = f64::min(self.g.get(vertex), self.rhs.get(vertex));
        let h = self
            .data
            .distance(&self.start, vertex)
            .map_err(PlannerError::Data)?;
        Ok(Key::new(estimate + h + self.km, estimate))
    }

    /// Make the queue membership of `vertex` agree with its consistency.
    fn update_vertex(&mut self, vertex: &D::Vertex) -> Result<(), PlannerError<D::DataError>> {
        let consistent = self
            .settings
            .approx_eq(self.g.get(vertex), self.rhs.get(vertex));
        let queued = self.queue.contains(vertex);

        if !consistent {
            let key = self.calc_key(vertex)?;
            if queued {
                self.queue.update(vertex, key);
            } else {
                self.queue.insert(vertex.clone(), key);
            }
        } else if queued {
            self.queue.remove(vertex);
        }

        Ok(())
    }

    /// The lowest `cost + g` over the successors of `vertex`.
    fn lookahead(&self, vertex: &D::Vertex) -> Result<f64, PlannerError<D::DataError>> {
        let mut rhs = f64::INFINITY;
        for next in self.data.successors(vertex) {
            let value = self
                .data
                .cost(vertex, &next)
                .map_err(PlannerError::Data)?
                + self.g.get(&next);
            if value < rhs {
                rhs = value;
            }
        }

        Ok(rhs)
    }

    fn compute_shortest_path<H: Halt<IndexedQueue<D::Vertex>>>(
        &mut self,
        halting: &mut H,
    ) -> Result<RepairStats, PlannerError<D::DataError>> {
        let mut stats = RepairStats::default();
        loop {
            let (u, k_old) = match self.queue.top() {
                Some(u) => (u.clone(), self.queue.top_key()),
                None => break,
            };

            // Keys are sums of costs taken in different orders, so the top
            // key is compared with the start's key within tolerance. The
            // start itself must also be settled before the repair can end.
            let start_key = self.calc_key(&self.start)?;
            let start_consistent = self.settings.approx_eq(
                self.g.get(&self.start),
                self.rhs.get(&self.start),
            );
            if start_consistent && self.settings.key_exceeds(&k_old, &start_key) {
                break;
            }

            if halting.halt(&self.queue) {
                stats.halted = true;
                break;
            }

            stats.iterations += 1;
            let k_new = self.calc_key(&u)?;
            let g_u = self.g.get(&u);
            let rhs_u = self.rhs.get(&u);

            if k_old < k_new {
                trace!("re-keying from {k_old} to {k_new}");
                stats.rekeyed += 1;
                self.queue.update(&u, k_new);
            } else if g_u > rhs_u {
                trace!("lowering g from {g_u} to {rhs_u}");
                stats.overconsistent += 1;
                self.g.set(u.clone(), rhs_u);
                self.queue.remove(&u);

                let predecessors: Neighbors<D::Vertex> =
                    self.data.predecessors(&u).into_iter().collect();
                for p in predecessors {
                    if p != self.goal {
                        let through_u = self.data.cost(&p, &u).map_err(PlannerError::Data)? + rhs_u;
                        if through_u < self.rhs.get(&p) {
                            self.rhs.set(p.clone(), through_u);
                        }
                    }

                    self.update_vertex(&p)?;
                }
            } else {
                trace!("invalidating g (was {g_u})");
                stats.underconsistent += 1;
                self.g.set(u.clone(), f64::INFINITY);

                let predecessors: Neighbors<D::Vertex> =
                    self.data.predecessors(&u).into_iter().collect();
                for p in predecessors {
                    if p != self.goal {
                        let through_u = self.data.cost(&p, &u).map_err(PlannerError::Data)? + g_u;
                        if self.settings.approx_eq(self.rhs.get(&p), through_u) {
                            let rhs = self.lookahead(&p)?;
                            self.rhs.set(p.clone(), rhs);
                        }
                    }

                    self.update_vertex(&p)?;
                }

                // The rhs of u only depends on its successors, so it does not
                // need to be recomputed unless u is its own predecessor, which
                // the loop above already covered.
                self.update_vertex(&u)?;
            }
        }

        debug!(
            "repair finished after {} iterations ({} expansions, {} re-keyed, halted: {}), \
            {} vertices remain queued",
            stats.iterations,
            stats.expansions(),
            stats.rekeyed,
            stats.halted,
            self.queue.len(),
        );

        Ok(stats)
    }
}

/// Changing the settings does not invalidate the search. A tolerance change
/// may leave some queued vertices consistent, which the next repair simply
/// dequeues.
impl<D: Data, Halting> Configurable for Planner<D, Halting> {
    type Configuration = Settings;
    fn configure<F>(mut self, f: F) -> Result<Self, Anyhow>
    where
        F: FnOnce(Self::Configuration) -> Result<Self::Configuration, Anyhow>,
    {
        let settings = f(self.settings)?;
        settings.validate()?;
        self.settings = settings;
        Ok(self)
    }
}
