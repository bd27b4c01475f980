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

use crate::{algorithm::Key, error::ThisError};
use serde::{Deserialize, Serialize};

/// Absolute tolerance used when the planner has not been configured otherwise.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Tunable parameters of a [`crate::Planner`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Two cost estimates whose absolute difference is no more than this are
    /// treated as equal when deciding whether a vertex is locally consistent.
    /// Choose a value that is small compared to the edge costs of the graph.
    pub tolerance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Settings {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SettingsError::InvalidTolerance(self.tolerance));
        }

        Ok(())
    }

    /// Equal within tolerance. Identical values (including two infinities)
    /// are always equal.
    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        a == b || (a - b).abs() <= self.tolerance
    }

    /// `a` is less than `b` by more than the tolerance.
    pub fn definitely_less(&self, a: f64, b: f64) -> bool {
        a < b && !self.approx_eq(a, b)
    }

    /// Key `l` is lexically greater than key `r` even after allowing for
    /// rounding in each component.
    pub fn key_exceeds(&self, l: &Key, r: &Key) -> bool {
        if self.approx_eq(l.a, r.a) {
            self.definitely_less(r.b, l.b)
        } else {
            l.a > r.a
        }
    }
}

#[derive(ThisError, Debug, Clone, Copy, PartialEq)]
pub enum SettingsError {
    #[error("The tolerance must be finite and non-negative, but {0} was given")]
    InvalidTolerance(f64),
}
