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

//! Incremental single-goal replanning with D* Lite.
//!
//! The [`Planner`] implements the optimized D* Lite algorithm from Sven Koenig
//! and Maxim Likhachev's *Fast Replanning for Navigation in Unknown Terrain*.
//! It keeps a shortest path from a movable start to a fixed goal and repairs
//! only the part of its search that is affected when edge costs change or the
//! start advances.
//!
//! The graph itself is supplied by the host through the [`Data`] trait. The
//! [`graph`] module provides two ready-made data sources: an adjacency list
//! [`SimpleGraph`] and a bounded [`OccupancyGrid`].

pub mod algorithm;
pub use algorithm::{Path, SearchStatus};

pub mod data;
pub use data::{Data, EdgeChange, Vertex};

pub mod heuristic;
pub use heuristic::Heuristic;

pub mod graph;
pub use graph::{OccupancyGrid, SimpleGraph};

pub mod planner;
pub use planner::{Planner, PlannerError};

pub mod configurable;
pub use configurable::Configurable;

pub mod error;

pub mod prelude {
    pub use super::{
        algorithm::{Path, SearchStatus},
        configurable::Configurable,
        data::{Data, EdgeChange, Vertex},
        heuristic::Heuristic,
        planner::{halt::Halt, Planner, Settings},
    };
}
