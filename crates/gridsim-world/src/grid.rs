//! Square occupancy grid.

use gridsim_core::{EntityId, Error, Offset, Position, Result};
use std::collections::BTreeMap;

/// A bounded square grid mapping cells to the entity visible there
#[derive(Debug, Clone)]
pub struct Grid {
    size: i32,
    occupants: BTreeMap<Position, EntityId>,
}

impl Grid {
    pub fn new(size: i32) -> Self {
        Self {
            size,
            occupants: BTreeMap::new(),
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.in_bounds(self.size)
    }

    pub fn check_bounds(&self, pos: Position) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                x: pos.x,
                y: pos.y,
                size: self.size,
            })
        }
    }

    /// Entity visible at a cell
    pub fn occupant(&self, pos: Position) -> Option<EntityId> {
        self.occupants.get(&pos).copied()
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.occupants.contains_key(&pos)
    }

    /// Claim a vacant cell for an entity. Returns false if the cell already
    /// has an occupant, which is left in place.
    pub fn claim(&mut self, pos: Position, id: EntityId) -> bool {
        if self.occupants.contains_key(&pos) {
            return false;
        }
        self.occupants.insert(pos, id);
        true
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.occupants.len()
    }

    /// Occupied cells in row-major scan order
    pub fn occupied(&self) -> impl Iterator<Item = (Position, EntityId)> + '_ {
        self.occupants.iter().map(|(pos, id)| (*pos, *id))
    }

    /// In-bounds Chebyshev neighbor cells of a position, in `Offset::ALL` order.
    /// An off-grid position has no neighbors.
    pub fn neighbor_cells(&self, pos: Position) -> impl Iterator<Item = (Offset, Position)> + '_ {
        let on_grid = self.contains(pos);
        Offset::ALL
            .into_iter()
            .filter(move |_| on_grid)
            .filter_map(move |offset| pos.offset(offset).map(|neighbor| (offset, neighbor)))
            .filter(move |(_, neighbor)| self.contains(*neighbor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10);
        assert_eq!(grid.size(), 10);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_check_bounds() {
        let grid = Grid::new(10);
        assert!(grid.check_bounds(Position::new(9, 0)).is_ok());

        let err = grid.check_bounds(Position::new(10, 3)).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { x: 10, y: 3, size: 10 }));
    }

    #[test]
    fn test_first_claim_wins() {
        let mut grid = Grid::new(10);
        let pos = Position::new(2, 3);

        assert!(grid.claim(pos, EntityId(0)));
        assert!(!grid.claim(pos, EntityId(1)));
        assert_eq!(grid.occupant(pos), Some(EntityId(0)));
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_occupied_scan_order() {
        let mut grid = Grid::new(10);
        grid.claim(Position::new(5, 5), EntityId(0));
        grid.claim(Position::new(2, 3), EntityId(1));
        grid.claim(Position::new(2, 7), EntityId(2));

        let order: Vec<_> = grid.occupied().map(|(_, id)| id).collect();
        assert_eq!(order, vec![EntityId(1), EntityId(2), EntityId(0)]);
    }

    #[test]
    fn test_neighbor_cells_interior_and_corner() {
        let grid = Grid::new(10);
        assert_eq!(grid.neighbor_cells(Position::new(5, 5)).count(), 8);
        assert_eq!(grid.neighbor_cells(Position::new(0, 0)).count(), 3);
        assert_eq!(grid.neighbor_cells(Position::new(0, 4)).count(), 5);
    }

    #[test]
    fn test_off_grid_position_has_no_neighbors() {
        let grid = Grid::new(10);
        assert_eq!(grid.neighbor_cells(Position::new(-1, 0)).count(), 0);
        assert_eq!(grid.neighbor_cells(Position::new(10, 10)).count(), 0);
        assert_eq!(grid.neighbor_cells(Position::new(i32::MAX, 0)).count(), 0);
        assert_eq!(grid.neighbor_cells(Position::new(i32::MIN, i32::MAX)).count(), 0);
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbors() {
        let grid = Grid::new(1);
        assert_eq!(grid.neighbor_cells(Position::new(0, 0)).count(), 0);
    }

    proptest! {
        #[test]
        fn neighbor_cells_stay_in_bounds(size in 1i32..40, x in 0i32..40, y in 0i32..40) {
            prop_assume!(x < size && y < size);
            let grid = Grid::new(size);
            let pos = Position::new(x, y);

            let expected = Offset::ALL
                .iter()
                .filter(|offset| pos.offset(**offset).is_some_and(|cell| cell.in_bounds(size)))
                .count();
            let cells: Vec<_> = grid.neighbor_cells(pos).collect();

            prop_assert_eq!(cells.len(), expected);
            for (_, cell) in cells {
                prop_assert!(cell.in_bounds(size));
                prop_assert_eq!(cell.chebyshev_distance(&pos), 1);
            }
        }
    }
}
