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

use crate::{
    algorithm::{Key, Measure},
    data::Vertex,
};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct QueueEntry<V> {
    vertex: V,
    key: Key,
}

/// A binary min-heap of vertices ordered by [`Key`] which also tracks where
/// each vertex currently sits inside the heap. That lets the planner test
/// membership in O(1) and change or remove the priority of an arbitrary
/// vertex in O(log n).
///
/// Every heap mutation goes through [`IndexedQueue::swap`] or an explicit
/// index update, so the index map never goes stale.
#[derive(Debug, Clone)]
pub struct IndexedQueue<V> {
    heap: Vec<QueueEntry<V>>,
    index: HashMap<V, usize>,
}

impl<V> Default for IndexedQueue<V> {
    fn default() -> Self {
        Self {
            heap: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V: Vertex> IndexedQueue<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, vertex: &V) -> bool {
        self.index.contains_key(vertex)
    }

    /// Get the current priority of `vertex` if it is in the queue.
    pub fn key_of(&self, vertex: &V) -> Option<Key> {
        self.index.get(vertex).map(|i| self.heap[*i].key)
    }

    /// The vertex with the smallest key.
    pub fn top(&self) -> Option<&V> {
        self.heap.first().map(|entry| &entry.vertex)
    }

    /// The smallest key in the queue, or [`Key::infinite`] if the queue is
    /// empty.
    pub fn top_key(&self) -> Key {
        self.heap
            .first()
            .map(|entry| entry.key)
            .unwrap_or_else(Key::infinite)
    }

    /// Remove the vertex with the smallest key.
    pub fn pop(&mut self) -> Option<(V, Key)> {
        if self.heap.is_empty() {
            return None;
        }

        let last = self.heap.len() - 1;
        self.swap(0, last);
        let entry = self.heap.pop()?;
        self.index.remove(&entry.vertex);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }

        Some((entry.vertex, entry.key))
    }

    /// Add a vertex that is not currently in the queue.
    ///
    /// # Panics
    ///
    /// Panics if the vertex is already queued. Use [`IndexedQueue::update`] to
    /// change the key of a queued vertex.
    pub fn insert(&mut self, vertex: V, key: Key) {
        assert!(
            !self.index.contains_key(&vertex),
            "attempted to insert a vertex that is already in the queue",
        );

        let i = self.heap.len();
        self.index.insert(vertex.clone(), i);
        self.heap.push(QueueEntry { vertex, key });
        self.sift_up(i);
    }

    /// Change the key of a queued vertex. Nothing happens if the vertex
    /// already has exactly this key.
    ///
    /// # Panics
    ///
    /// Panics if the vertex is not queued.
    pub fn update(&mut self, vertex: &V, key: Key) {
        let i = match self.index.get(vertex) {
            Some(i) => *i,
            None => panic!("attempted to update a vertex that is not in the queue"),
        };

        let previous = self.heap[i].key;
        if previous == key {
            return;
        }

        self.heap[i].key = key;
        if key < previous {
            self.sift_up(i);
        } else {
            self.sift_down(i);
        }
    }

    /// Remove an arbitrary vertex from the queue, returning the key it had.
    pub fn remove(&mut self, vertex: &V) -> Option<Key> {
        let i = self.index.remove(vertex)?;
        let entry = self.heap.swap_remove(i);
        if i < self.heap.len() {
            // The former last entry now sits in the hole left at i
            if let Some(slot) = self.index.get_mut(&self.heap[i].vertex) {
                *slot = i;
            }

            let i = self.sift_up(i);
            self.sift_down(i);
        }

        Some(entry.key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&V, Key)> {
        self.heap.iter().map(|entry| (&entry.vertex, entry.key))
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        for k in [i, j] {
            if let Some(slot) = self.index.get_mut(&self.heap[k].vertex) {
                *slot = k;
            }
        }
    }

    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[i].key < self.heap[parent].key {
                self.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }

        i
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < len && self.heap[left].key < self.heap[smallest].key {
                smallest = left;
            }

            if right < len && self.heap[right].key < self.heap[smallest].key {
                smallest = right;
            }

            if smallest == i {
                return;
            }

            self.swap(i, smallest);
            i = smallest;
        }
    }
}

impl<V> Measure for IndexedQueue<V> {
    fn size(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn assert_consistent<V: Vertex + std::fmt::Debug>(queue: &IndexedQueue<V>) {
        assert_eq!(queue.heap.len(), queue.index.len());
        for (i, entry) in queue.heap.iter().enumerate() {
            assert_eq!(queue.index.get(&entry.vertex), Some(&i), "{:?}", entry.vertex);
            if i > 0 {
                assert!(queue.heap[(i - 1) / 2].key <= entry.key);
            }
        }
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = IndexedQueue::<u32>::new();
        assert!(queue.is_empty());
        assert!(queue.top().is_none());
        assert_eq!(queue.top_key(), Key::infinite());
        assert!(queue.pop().is_none());
        assert!(queue.remove(&3).is_none());
    }

    #[test]
    fn test_pop_order() {
        let mut queue = IndexedQueue::new();
        queue.insert('c', Key::new(3.0, 0.0));
        queue.insert('a', Key::new(1.0, 1.0));
        queue.insert('d', Key::new(3.0, 1.0));
        queue.insert('b', Key::new(1.0, 2.0));
        queue.insert('e', Key::new(f64::INFINITY, 0.0));
        assert_consistent(&queue);

        assert_eq!(queue.top(), Some(&'a'));
        assert_eq!(queue.top_key(), Key::new(1.0, 1.0));

        let order: Vec<char> = std::iter::from_fn(|| queue.pop().map(|(v, _)| v)).collect();
        assert_eq!(order, vec!['a', 'b', 'c', 'd', 'e']);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_update_moves_both_ways() {
        let mut queue = IndexedQueue::new();
        for (v, a) in [(0, 5.0), (1, 4.0), (2, 3.0), (3, 2.0), (4, 1.0)] {
            queue.insert(v, Key::new(a, 0.0));
        }

        queue.update(&0, Key::new(0.5, 0.0));
        assert_consistent(&queue);
        assert_eq!(queue.top(), Some(&0));

        queue.update(&0, Key::new(10.0, 0.0));
        assert_consistent(&queue);
        assert_eq!(queue.top(), Some(&4));
        assert_eq!(queue.key_of(&0), Some(Key::new(10.0, 0.0)));

        // Updating to the same key changes nothing
        let before: Vec<_> = queue.iter().map(|(v, k)| (*v, k)).collect();
        queue.update(&2, Key::new(3.0, 0.0));
        let after: Vec<_> = queue.iter().map(|(v, k)| (*v, k)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_arbitrary() {
        let mut queue = IndexedQueue::new();
        for v in 0..10 {
            queue.insert(v, Key::new((v * 7 % 10) as f64, 0.0));
        }

        assert_eq!(queue.remove(&3), Some(Key::new(1.0, 0.0)));
        assert!(!queue.contains(&3));
        assert!(queue.remove(&3).is_none());
        assert_consistent(&queue);

        let mut previous = Key::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        while let Some((v, key)) = queue.pop() {
            assert_ne!(v, 3);
            assert!(previous <= key);
            previous = key;
        }
    }

    #[test]
    #[should_panic]
    fn test_double_insert_panics() {
        let mut queue = IndexedQueue::new();
        queue.insert(1, Key::new(1.0, 1.0));
        queue.insert(1, Key::new(2.0, 2.0));
    }

    #[test]
    fn test_random_operations_match_reference() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut queue = IndexedQueue::new();
        let mut reference: HashMap<u64, Key> = HashMap::new();

        for _ in 0..2000 {
            let vertex: u64 = rng.gen_range(0..40);
            let key = Key::new(rng.gen_range(0..20u32) as f64, rng.gen_range(0..5u32) as f64);
            match rng.gen_range(0..4u32) {
                0 | 1 => {
                    if reference.contains_key(&vertex) {
                        queue.update(&vertex, key);
                    } else {
                        queue.insert(vertex, key);
                    }
                    reference.insert(vertex, key);
                }
                2 => {
                    assert_eq!(queue.remove(&vertex), reference.remove(&vertex));
                }
                _ => {
                    let expected = reference.values().min().copied();
                    match queue.pop() {
                        Some((v, k)) => {
                            assert_eq!(Some(k), expected);
                            assert_eq!(reference.remove(&v), Some(k));
                        }
                        None => assert!(expected.is_none()),
                    }
                }
            }

            assert_consistent(&queue);
            assert_eq!(queue.len(), reference.len());
            for v in 0..40 {
                assert_eq!(queue.contains(&v), reference.contains_key(&v));
                assert_eq!(queue.key_of(&v), reference.get(&v).copied());
            }
        }
    }

    #[test]
    fn test_measure_is_queue_length() {
        let mut queue = IndexedQueue::new();
        queue.insert("x", Key::new(0.0, 0.0));
        queue.insert("y", Key::new(0.0, 0.0));
        assert_eq!(queue.size(), 2);
    }
}
