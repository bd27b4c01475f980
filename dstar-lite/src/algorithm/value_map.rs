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

use std::{collections::HashMap, hash::Hash};

/// A sparse map from vertex to cost estimate. Vertices that have no entry read
/// as `f64::INFINITY`, and writing `f64::INFINITY` removes the entry, so the
/// map only ever holds finite values.
#[derive(Debug, Clone)]
pub struct ValueMap<V> {
    values: HashMap<V, f64>,
}

impl<V> Default for ValueMap<V> {
    fn default() -> Self {
        Self { values: HashMap::new() }
    }
}

impl<V: Hash + Eq> ValueMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, vertex: &V) -> f64 {
        self.values.get(vertex).copied().unwrap_or(f64::INFINITY)
    }

    pub fn set(&mut self, vertex: V, value: f64) {
        if value == f64::INFINITY {
            self.values.remove(&vertex);
        } else {
            self.values.insert(vertex, value);
        }
    }

    /// Number of vertices with a finite value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&V, f64)> {
        self.values.iter().map(|(v, value)| (v, *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_reads_as_infinity() {
        let mut map = ValueMap::new();
        assert_eq!(map.get(&"a"), f64::INFINITY);
        map.set("a", 2.0);
        assert_eq!(map.get(&"a"), 2.0);
        assert_eq!(map.get(&"b"), f64::INFINITY);
    }

    #[test]
    fn test_storing_infinity_removes_entry() {
        let mut map = ValueMap::new();
        map.set(1, 0.0);
        map.set(2, 5.0);
        assert_eq!(map.len(), 2);

        map.set(2, f64::INFINITY);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&2), f64::INFINITY);
        assert!(map.iter().all(|(_, value)| value.is_finite()));

        map.set(3, f64::INFINITY);
        assert_eq!(map.len(), 1);
    }
}
