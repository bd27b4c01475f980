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

/// Estimate the remaining cost between two vertex payloads. This is used by
/// [`crate::SimpleGraph`] to provide [`crate::Data::distance`].
///
/// The estimate must never exceed the true cost and must be consistent with
/// the edge costs of the graph it is used with.
pub trait Heuristic<V> {
    fn estimate(&self, from: &V, to: &V) -> f64;
}

/// In cases where a heuristic needs to be specified but no useful estimate is
/// available, the Uninformed heuristic always estimates zero. This turns the
/// search into a plain uniform-cost repair, which is also a useful reference
/// point for benchmarking heuristic performance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uninformed;
impl<V> Heuristic<V> for Uninformed {
    fn estimate(&self, _: &V, _: &V) -> f64 {
        0.0
    }
}

/// Straight-line distance between points, scaled by the cheapest cost per
/// unit of distance that any edge of the graph can have.
#[derive(Debug, Clone, Copy)]
pub struct Euclidean {
    pub cost_per_meter: f64,
}

impl Euclidean {
    pub fn new(cost_per_meter: f64) -> Self {
        Self { cost_per_meter }
    }
}

impl Default for Euclidean {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Heuristic<nalgebra::Point2<f64>> for Euclidean {
    fn estimate(&self, from: &nalgebra::Point2<f64>, to: &nalgebra::Point2<f64>) -> f64 {
        (to - from).norm() * self.cost_per_meter
    }
}

impl<V, F: Fn(&V, &V) -> f64> Heuristic<V> for F {
    fn estimate(&self, from: &V, to: &V) -> f64 {
        self(from, to)
    }
}
