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

/// A sequence of vertices leading from the planner's start to its goal.
#[derive(Debug, Clone, PartialEq)]
pub struct Path<V> {
    /// Every vertex along the path, beginning with the start and ending with
    /// the goal.
    pub vertices: Vec<V>,
    /// Sum of the edge costs along the path.
    pub total_cost: f64,
}

impl<V> Path<V> {
    pub fn start(&self) -> Option<&V> {
        self.vertices.first()
    }

    pub fn goal(&self) -> Option<&V> {
        self.vertices.last()
    }

    /// The vertex an agent at the start should move to next. This is None when
    /// the start is already the goal.
    pub fn next_step(&self) -> Option<&V> {
        self.vertices.get(1)
    }

    /// Number of edges traversed by the path.
    pub fn steps(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

impl<V> IntoIterator for Path<V> {
    type Item = V;
    type IntoIter = std::vec::IntoIter<V>;
    fn into_iter(self) -> Self::IntoIter {
        self.vertices.into_iter()
    }
}
