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
    data::{Data, EdgeChange},
    error::ThisError,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i64,
    pub y: i64,
}

impl Cell {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn shifted(&self, dx: i64, dy: i64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<[i64; 2]> for Cell {
    fn from([x, y]: [i64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// Which cells count as neighbors of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    /// Only orthogonal moves.
    Four,
    /// Orthogonal and diagonal moves.
    Eight,
}

const ORTHOGONAL: [(i64, i64); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
const DIAGONAL: [(i64, i64); 4] = [(1, 1), (-1, 1), (-1, -1), (1, -1)];

type CellNeighbors = SmallVec<[Cell; 8]>;

/// A bounded grid of cells where any cell can be marked as occupied. Moving
/// into an occupied cell costs `f64::INFINITY`; otherwise orthogonal moves cost
/// 1 and diagonal moves cost √2.
///
/// Occupying or freeing a cell reports every directed edge whose cost changed
/// so the host can forward them to [`crate::Planner::flag_changes`].
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    width: i64,
    height: i64,
    connectivity: Connectivity,
    occupied: HashSet<Cell>,
}

impl OccupancyGrid {
    pub fn new(width: u32, height: u32, connectivity: Connectivity) -> Self {
        Self {
            width: width as i64,
            height: height as i64,
            connectivity,
            occupied: HashSet::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        0 <= cell.x && cell.x < self.width && 0 <= cell.y && cell.y < self.height
    }

    pub fn is_occupied(&self, cell: &Cell) -> bool {
        self.occupied.contains(cell)
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = &Cell> {
        self.occupied.iter()
    }

    /// All cells inside the grid that are adjacent to `cell`, occupied or not.
    pub fn neighbors(&self, cell: &Cell) -> CellNeighbors {
        let mut neighbors = CellNeighbors::new();
        if !self.contains(cell) {
            return neighbors;
        }

        let diagonal: &[(i64, i64)] = match self.connectivity {
            Connectivity::Four => &[],
            Connectivity::Eight => &DIAGONAL,
        };

        for (dx, dy) in ORTHOGONAL.iter().chain(diagonal) {
            let n = cell.shifted(*dx, *dy);
            if self.contains(&n) {
                neighbors.push(n);
            }
        }

        neighbors
    }

    /// Mark a cell as occupied or free, returning the edges whose cost changed
    /// as a result. Nothing is returned if the cell was already in the
    /// requested state.
    pub fn set_occupied(
        &mut self,
        cell: Cell,
        occupied: bool,
    ) -> Result<Vec<EdgeChange<Cell>>, OccupancyGridError> {
        if !self.contains(&cell) {
            return Err(OccupancyGridError::OutOfBounds(cell));
        }

        let changed = if occupied {
            self.occupied.insert(cell)
        } else {
            self.occupied.remove(&cell)
        };

        if !changed {
            return Ok(Vec::new());
        }

        Ok(self
            .neighbors(&cell)
            .into_iter()
            .map(|n| {
                let free = self.step_cost(&n, &cell);
                if occupied {
                    EdgeChange::new(n, cell, free, f64::INFINITY)
                } else {
                    EdgeChange::new(n, cell, f64::INFINITY, free)
                }
            })
            .collect())
    }

    fn is_adjacent(&self, from: &Cell, to: &Cell) -> bool {
        let (dx, dy) = ((to.x - from.x).abs(), (to.y - from.y).abs());
        match self.connectivity {
            Connectivity::Four => dx + dy == 1,
            Connectivity::Eight => dx <= 1 && dy <= 1 && dx + dy > 0,
        }
    }

    /// Cost of the move ignoring occupancy.
    fn step_cost(&self, from: &Cell, to: &Cell) -> f64 {
        if from.x != to.x && from.y != to.y {
            std::f64::consts::SQRT_2
        } else {
            1.0
        }
    }
}

impl Data for OccupancyGrid {
    type Vertex = Cell;
    type DataError = OccupancyGridError;
    type Successors<'a> = smallvec::IntoIter<[Cell; 8]>;
    type Predecessors<'a> = smallvec::IntoIter<[Cell; 8]>;

    fn successors<'a>(&'a self, vertex: &Cell) -> Self::Successors<'a> {
        self.neighbors(vertex).into_iter()
    }

    fn predecessors<'a>(&'a self, vertex: &Cell) -> Self::Predecessors<'a> {
        self.neighbors(vertex).into_iter()
    }

    fn distance(&self, from: &Cell, to: &Cell) -> Result<f64, OccupancyGridError> {
        let (dx, dy) = ((to.x - from.x).abs() as f64, (to.y - from.y).abs() as f64);
        Ok(match self.connectivity {
            Connectivity::Four => dx + dy,
            // Octile distance
            Connectivity::Eight => {
                dx + dy + (std::f64::consts::SQRT_2 - 2.0) * f64::min(dx, dy)
            }
        })
    }

    fn cost(&self, from: &Cell, to: &Cell) -> Result<f64, OccupancyGridError> {
        for cell in [from, to] {
            if !self.contains(cell) {
                return Err(OccupancyGridError::OutOfBounds(*cell));
            }
        }

        if !self.is_adjacent(from, to) {
            return Err(OccupancyGridError::NotAdjacent(*from, *to));
        }

        if self.is_occupied(to) {
            return Ok(f64::INFINITY);
        }

        Ok(self.step_cost(from, to))
    }
}

#[derive(ThisError, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyGridError {
    #[error("Cell {0:?} is outside of the grid")]
    OutOfBounds(Cell),
    #[error("Cells {0:?} and {1:?} are not adjacent")]
    NotAdjacent(Cell, Cell),
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_neighbors_respect_bounds() {
        let grid = OccupancyGrid::new(3, 3, Connectivity::Eight);
        assert_eq!(grid.neighbors(&Cell::new(0, 0)).len(), 3);
        assert_eq!(grid.neighbors(&Cell::new(1, 1)).len(), 8);
        assert_eq!(grid.neighbors(&Cell::new(5, 5)).len(), 0);

        let grid = OccupancyGrid::new(3, 3, Connectivity::Four);
        assert_eq!(grid.neighbors(&Cell::new(1, 1)).len(), 4);
        assert_eq!(grid.neighbors(&Cell::new(2, 0)).len(), 2);
    }

    #[test]
    fn test_costs() {
        let mut grid = OccupancyGrid::new(4, 4, Connectivity::Eight);
        let a = Cell::new(1, 1);
        assert_relative_eq!(grid.cost(&a, &Cell::new(2, 1)).unwrap(), 1.0);
        assert_relative_eq!(grid.cost(&a, &Cell::new(2, 2)).unwrap(), std::f64::consts::SQRT_2);
        assert_eq!(
            grid.cost(&a, &Cell::new(3, 3)),
            Err(OccupancyGridError::NotAdjacent(a, Cell::new(3, 3))),
        );
        assert_eq!(
            grid.cost(&a, &Cell::new(1, 4)),
            Err(OccupancyGridError::OutOfBounds(Cell::new(1, 4))),
        );

        grid.set_occupied(Cell::new(2, 1), true).unwrap();
        assert_eq!(grid.cost(&a, &Cell::new(2, 1)).unwrap(), f64::INFINITY);
        // Leaving an occupied cell is still allowed
        assert_relative_eq!(grid.cost(&Cell::new(2, 1), &a).unwrap(), 1.0);
    }

    #[test]
    fn test_occupancy_changes() {
        let mut grid = OccupancyGrid::new(3, 3, Connectivity::Four);
        let center = Cell::new(1, 1);

        let changes = grid.set_occupied(center, true).unwrap();
        assert_eq!(changes.len(), 4);
        for change in &changes {
            assert_eq!(change.to, center);
            assert_relative_eq!(change.old_cost, 1.0);
            assert_eq!(change.new_cost, f64::INFINITY);
        }

        assert!(grid.set_occupied(center, true).unwrap().is_empty());

        let changes = grid.set_occupied(center, false).unwrap();
        assert_eq!(changes.len(), 4);
        assert!(changes.iter().all(|c| c.is_decrease()));

        assert_eq!(
            grid.set_occupied(Cell::new(-1, 0), true),
            Err(OccupancyGridError::OutOfBounds(Cell::new(-1, 0))),
        );
    }

    #[test]
    fn test_octile_distance_is_admissible() {
        let grid = OccupancyGrid::new(10, 10, Connectivity::Eight);
        let from = Cell::new(0, 0);
        let to = Cell::new(3, 7);
        assert_relative_eq!(
            grid.distance(&from, &to).unwrap(),
            3.0 * std::f64::consts::SQRT_2 + 4.0,
        );
        assert_relative_eq!(grid.distance(&to, &to).unwrap(), 0.0);
    }
}
