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

use float_ord::FloatOrd;
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

/// The priority of a vertex inside the frontier queue.
///
/// Keys are compared in lexical order. Key `l` is less than key `r` when
///
/// ```text
/// l.a < r.a || (l.a == r.a && l.b < r.b)
/// ```
///
/// `a` approximates the cost of a path from the start through the vertex, and
/// `b` breaks ties in favor of vertices with a smaller local cost estimate.
/// Infinite components are ordered after every finite value.
#[derive(Clone, Copy, Debug)]
pub struct Key {
    pub a: f64,
    pub b: f64,
}

impl Key {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// The key reported by an empty queue. Every key of a reachable vertex is
    /// less than this.
    pub fn infinite() -> Self {
        Self::new(f64::INFINITY, f64::INFINITY)
    }

    pub fn is_infinite(&self) -> bool {
        self.a.is_infinite() && self.b.is_infinite()
    }

    fn convert(&self) -> (FloatOrd<f64>, FloatOrd<f64>) {
        (FloatOrd(self.a), FloatOrd(self.b))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.convert() == other.convert()
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.convert().cmp(&other.convert())
    }
}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.convert().hash(state);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key({}, {})", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical_order() {
        assert!(Key::new(1.0, 5.0) < Key::new(2.0, 0.0));
        assert!(Key::new(1.0, 0.0) < Key::new(1.0, 0.5));
        assert_eq!(Key::new(1.0, 0.5), Key::new(1.0, 0.5));
        assert_eq!(Key::new(3.0, 1.0).cmp(&Key::new(3.0, 1.0)), Ordering::Equal);
        assert_eq!(Key::new(3.0, 2.0).cmp(&Key::new(3.0, 1.0)), Ordering::Greater);
    }

    #[test]
    fn test_infinity_is_ordered() {
        let inf = Key::infinite();
        assert!(inf.is_infinite());
        assert_eq!(inf, Key::infinite());
        assert!(Key::new(1e300, 1e300) < inf);
        assert!(Key::new(f64::INFINITY, 3.0) < inf);
        assert!(Key::new(f64::INFINITY, 3.0) > Key::new(1e300, f64::INFINITY));
        assert_ne!(Key::new(f64::INFINITY, 3.0), inf);
    }

    #[test]
    fn test_order_is_total_and_transitive() {
        let values = [0.0, 0.5, 1.0, 7.25, f64::INFINITY];
        let mut keys = Vec::new();
        for a in values {
            for b in values {
                keys.push(Key::new(a, b));
            }
        }

        for l in &keys {
            for r in &keys {
                let outcomes = [l < r, l == r, l > r];
                assert_eq!(outcomes.iter().filter(|x| **x).count(), 1, "{l} vs {r}");

                for m in &keys {
                    if l < r && r < m {
                        assert!(l < m, "{l} < {r} < {m}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Key::new(1.5, 2.0).to_string(), "key(1.5, 2)");
    }
}
