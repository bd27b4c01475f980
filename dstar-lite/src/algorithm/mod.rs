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

pub mod key;
pub use key::Key;

pub mod value_map;
pub use value_map::ValueMap;

pub mod queue;
pub use queue::IndexedQueue;

pub mod path;
pub use path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchStatus<Solution> {
    /// The repair was halted before it converged.
    Incomplete,
    /// The goal cannot currently be reached from the start.
    Impossible,
    Solved(Solution),
}

impl<S> SearchStatus<S> {
    pub fn incomplete(&self) -> bool {
        matches!(self, SearchStatus::Incomplete)
    }

    pub fn impossible(&self) -> bool {
        matches!(self, SearchStatus::Impossible)
    }

    pub fn solved(&self) -> bool {
        matches!(self, SearchStatus::Solved(_))
    }

    pub fn solution(self) -> Option<S> {
        match self {
            Self::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    /// If the status contains a solution, apply a function to that solution.
    pub fn map<U, F: FnOnce(S) -> U>(self, op: F) -> SearchStatus<U> {
        match self {
            SearchStatus::Solved(solution) => SearchStatus::Solved(op(solution)),
            SearchStatus::Incomplete => SearchStatus::Incomplete,
            SearchStatus::Impossible => SearchStatus::Impossible,
        }
    }
}

impl<S> From<S> for SearchStatus<S> {
    fn from(value: S) -> Self {
        SearchStatus::Solved(value)
    }
}

/// The `Measure` trait can be implemented by search memory to provide an
/// indication of how large its current level of effort or memory footprint
/// is. This may be used to halt repairs that have grown excessively large.
pub trait Measure {
    /// How "big" is the current memory footprint or level of effort. The exact
    /// meaning of this value may vary between implementations.
    fn size(&self) -> usize;
}
