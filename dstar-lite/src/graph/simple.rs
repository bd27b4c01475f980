/*
 * Copyright (C) 2022 Open Source Robotics Foundation
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

use crate::{
    data::{Data, EdgeChange},
    error::ThisError,
    heuristic::{Heuristic, Uninformed},
};

/// A directed graph stored as adjacency lists. Vertices are identified by
/// their index into `vertices`, and each vertex may carry an arbitrary payload
/// that the heuristic uses to estimate distances.
///
/// Edge costs can be changed after construction. An edge with a cost of
/// `f64::INFINITY` is impassable.
#[derive(Debug, Clone, Default)]
pub struct SimpleGraph<V, H = Uninformed> {
    pub vertices: Vec<V>,
    edges: Vec<Vec<(usize, f64)>>,
    reverse: Vec<Vec<usize>>,
    heuristic: H,
}

impl<V> SimpleGraph<V, Uninformed> {
    pub fn from_iters(
        vertices: impl IntoIterator<Item = V>,
        input_edges: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Self {
        let mut graph = Self {
            vertices: Vec::from_iter(vertices),
            edges: Vec::new(),
            reverse: Vec::new(),
            heuristic: Uninformed,
        };

        for (from, to, cost) in input_edges {
            graph.insert_edge(from, to, cost);
        }

        graph
    }

    /// Same as [`SimpleGraph::from_iters`] except each input edge is inserted
    /// in both directions with the same cost.
    pub fn undirected(
        vertices: impl IntoIterator<Item = V>,
        input_edges: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Self {
        Self::from_iters(
            vertices,
            input_edges
                .into_iter()
                .flat_map(|(a, b, cost)| [(a, b, cost), (b, a, cost)]),
        )
    }
}

impl<V, H> SimpleGraph<V, H> {
    /// Consume this graph and give it a different heuristic.
    pub fn with_heuristic<NewH>(self, heuristic: NewH) -> SimpleGraph<V, NewH> {
        SimpleGraph {
            vertices: self.vertices,
            edges: self.edges,
            reverse: self.reverse,
            heuristic,
        }
    }

    pub fn vertex(&self, key: usize) -> Option<&V> {
        self.vertices.get(key)
    }

    pub fn edge_cost(&self, from: usize, to: usize) -> Option<f64> {
        self.edges
            .get(from)?
            .iter()
            .find(|(target, _)| *target == to)
            .map(|(_, cost)| *cost)
    }

    /// Change the cost of an existing edge. The returned [`EdgeChange`] can be
    /// passed along to [`crate::Planner::flag_changes`].
    pub fn set_cost(
        &mut self,
        from: usize,
        to: usize,
        cost: f64,
    ) -> Result<EdgeChange<usize>, SimpleGraphError> {
        let edge = self
            .edges
            .get_mut(from)
            .and_then(|outgoing| outgoing.iter_mut().find(|(target, _)| *target == to))
            .ok_or(SimpleGraphError::MissingEdge(from, to))?;

        let old_cost = edge.1;
        edge.1 = cost;
        Ok(EdgeChange::new(from, to, old_cost, cost))
    }

    /// Change the cost of an edge in both directions.
    pub fn set_undirected_cost(
        &mut self,
        a: usize,
        b: usize,
        cost: f64,
    ) -> Result<[EdgeChange<usize>; 2], SimpleGraphError> {
        Ok([self.set_cost(a, b, cost)?, self.set_cost(b, a, cost)?])
    }

    /// Add an edge that did not exist before. From the planner's point of view
    /// this is an edge whose cost dropped from infinity.
    pub fn add_edge(
        &mut self,
        from: usize,
        to: usize,
        cost: f64,
    ) -> Result<EdgeChange<usize>, SimpleGraphError> {
        for v in [from, to] {
            if v >= self.vertices.len() {
                return Err(SimpleGraphError::MissingVertex(v));
            }
        }

        if self.edge_cost(from, to).is_some() {
            return self.set_cost(from, to, cost);
        }

        self.insert_edge(from, to, cost);
        Ok(EdgeChange::new(from, to, f64::INFINITY, cost))
    }

    fn insert_edge(&mut self, from: usize, to: usize, cost: f64) {
        let required = usize::max(from, to) + 1;
        if self.edges.len() < required {
            self.edges.resize_with(required, Vec::new);
            self.reverse.resize_with(required, Vec::new);
        }

        self.edges[from].push((to, cost));
        self.reverse[to].push(from);
    }
}

fn edge_target(edge: &(usize, f64)) -> usize {
    edge.0
}

impl<V, H: Heuristic<V>> Data for SimpleGraph<V, H> {
    type Vertex = usize;
    type DataError = SimpleGraphError;

    type Successors<'a> = std::iter::Map<
        std::slice::Iter<'a, (usize, f64)>,
        fn(&(usize, f64)) -> usize,
    >
    where
        Self: 'a;

    type Predecessors<'a> = std::iter::Copied<std::slice::Iter<'a, usize>>
    where
        Self: 'a;

    fn successors<'a>(&'a self, vertex: &usize) -> Self::Successors<'a> {
        let outgoing: &'a [(usize, f64)] = self
            .edges
            .get(*vertex)
            .map(|e| e.as_slice())
            .unwrap_or(&[]);

        outgoing.iter().map(edge_target as fn(&(usize, f64)) -> usize)
    }

    fn predecessors<'a>(&'a self, vertex: &usize) -> Self::Predecessors<'a> {
        let incoming: &'a [usize] = self
            .reverse
            .get(*vertex)
            .map(|e| e.as_slice())
            .unwrap_or(&[]);

        incoming.iter().copied()
    }

    fn distance(&self, from: &usize, to: &usize) -> Result<f64, SimpleGraphError> {
        let from_vertex = self
            .vertices
            .get(*from)
            .ok_or(SimpleGraphError::MissingVertex(*from))?;
        let to_vertex = self
            .vertices
            .get(*to)
            .ok_or(SimpleGraphError::MissingVertex(*to))?;

        Ok(self.heuristic.estimate(from_vertex, to_vertex))
    }

    fn cost(&self, from: &usize, to: &usize) -> Result<f64, SimpleGraphError> {
        self.edge_cost(*from, *to)
            .ok_or(SimpleGraphError::MissingEdge(*from, *to))
    }
}

#[derive(ThisError, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleGraphError {
    #[error("The graph does not contain vertex {0}")]
    MissingVertex(usize),
    #[error("The graph does not contain an edge from {0} to {1}")]
    MissingEdge(usize, usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::Euclidean;
    use approx::assert_relative_eq;

    type Point = nalgebra::Point2<f64>;

    #[test]
    fn test_predecessors_mirror_successors() {
        /*
         * 0 ---> 1 ---> 2
         * ^             |
         * +-------------+
         */
        let graph = SimpleGraph::from_iters(
            [(), (), ()],
            [(0, 1, 1.0), (1, 2, 1.0), (2, 0, 5.0)],
        );

        assert_eq!(graph.successors(&0).into_iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(graph.predecessors(&0).into_iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!(graph.predecessors(&2).into_iter().collect::<Vec<_>>(), vec![1]);
        assert_relative_eq!(graph.cost(&2, &0).unwrap(), 5.0);
        assert_eq!(graph.cost(&0, &2), Err(SimpleGraphError::MissingEdge(0, 2)));
        assert_eq!(graph.successors(&7).into_iter().count(), 0);
    }

    #[test]
    fn test_cost_changes_are_reported() {
        let mut graph = SimpleGraph::undirected(
            [Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            [(0, 1, 2.0)],
        )
        .with_heuristic(Euclidean::default());

        assert_relative_eq!(graph.distance(&0, &1).unwrap(), 1.0);
        assert_eq!(graph.distance(&0, &4), Err(SimpleGraphError::MissingVertex(4)));

        let [forward, backward] = graph.set_undirected_cost(0, 1, 7.0).unwrap();
        assert_eq!(forward, EdgeChange::new(0, 1, 2.0, 7.0));
        assert_eq!(backward, EdgeChange::new(1, 0, 2.0, 7.0));
        assert_relative_eq!(graph.cost(&1, &0).unwrap(), 7.0);

        assert_eq!(
            graph.set_cost(0, 0, 1.0),
            Err(SimpleGraphError::MissingEdge(0, 0)),
        );
    }

    #[test]
    fn test_add_edge() {
        let mut graph = SimpleGraph::from_iters([(), (), ()], [(0, 1, 1.0)]);
        let change = graph.add_edge(1, 2, 3.0).unwrap();
        assert!(change.is_decrease());
        assert_eq!(change.old_cost, f64::INFINITY);
        assert_eq!(graph.predecessors(&2).into_iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(graph.add_edge(1, 9, 3.0), Err(SimpleGraphError::MissingVertex(9)));
    }
}
