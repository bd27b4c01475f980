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

use std::hash::Hash;

/// The `Vertex` trait describes the identity of a location in the planning
/// data. The planner never creates or destroys vertices, it only compares and
/// hashes the ones that the [`Data`] hands to it.
pub trait Vertex: Clone + Eq + Hash {}
impl<T: Clone + Eq + Hash> Vertex for T {}

/// The `Data` trait is implemented by whatever structure the host uses to
/// store its graph. The [`crate::Planner`] plans through it without knowing
/// anything about how vertices or costs are stored.
pub trait Data {
    /// How vertices are identified.
    type Vertex: Vertex;

    /// What kind of error can happen if a bad vertex is provided.
    type DataError;

    /// The return type that allows the planner to iterate over successors.
    type Successors<'a>: IntoIterator<Item = Self::Vertex> + 'a
    where
        Self: 'a;

    /// The return type that allows the planner to iterate over predecessors.
    type Predecessors<'a>: IntoIterator<Item = Self::Vertex> + 'a
    where
        Self: 'a;

    /// Get the vertices that can be reached directly from `vertex`.
    fn successors<'a>(&'a self, vertex: &Self::Vertex) -> Self::Successors<'a>;

    /// Get the vertices that can reach `vertex` directly. For undirected
    /// graphs this is the same set as [`Data::successors`].
    fn predecessors<'a>(&'a self, vertex: &Self::Vertex) -> Self::Predecessors<'a>;

    /// Estimate the distance between two vertices. In practice the planner
    /// always passes its current start as `from`.
    ///
    /// The estimate must follow these rules:
    ///
    /// ```text
    /// distance(a, a) == 0
    /// distance(a, b) <= cost(a, c) + distance(c, b)  (where a and c are neighbors)
    /// ```
    fn distance(
        &self,
        from: &Self::Vertex,
        to: &Self::Vertex,
    ) -> Result<f64, Self::DataError>;

    /// The exact cost of moving from `from` to the neighboring `to`. An
    /// impassable edge should report `f64::INFINITY`.
    ///
    /// The result for vertices that are not neighbors is up to the
    /// implementation. The planner only asks for the cost of pairs that it
    /// obtained from [`Data::successors`] or [`Data::predecessors`].
    fn cost(
        &self,
        from: &Self::Vertex,
        to: &Self::Vertex,
    ) -> Result<f64, Self::DataError>;
}

/// A record of one directed edge whose traversal cost has changed. Data
/// sources that can be modified return these so the host can forward them to
/// [`crate::Planner::flag_changes`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeChange<V> {
    pub from: V,
    pub to: V,
    pub old_cost: f64,
    pub new_cost: f64,
}

impl<V> EdgeChange<V> {
    pub fn new(from: V, to: V, old_cost: f64, new_cost: f64) -> Self {
        Self { from, to, old_cost, new_cost }
    }

    /// Did the edge become cheaper to traverse?
    pub fn is_decrease(&self) -> bool {
        self.old_cost > self.new_cost
    }
}
