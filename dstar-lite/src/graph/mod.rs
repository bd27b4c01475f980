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

//! Ready-made [`crate::Data`] implementations. Hosts with their own graph
//! storage can implement [`crate::Data`] directly instead.

pub mod simple;
pub use simple::{SimpleGraph, SimpleGraphError};

pub mod occupancy;
pub use occupancy::{Cell, Connectivity, OccupancyGrid, OccupancyGridError};
