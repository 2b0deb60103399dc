//! Tile classification grid derived from the level description.

use std::collections::BTreeMap;

use thiserror::Error;
use tile_defence_core::{CellCoord, LevelDescription, TileCategory, TileClass};
use tracing::warn;

use crate::route::LevelError;

/// Largest number of cells a level's bounding box may span.
pub const MAX_GRID_CELLS: u64 = 1 << 20;

/// Reasons a batch of cells could not be marked as occupied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum OccupancyError {
    /// The cell lies outside the grid.
    #[error("cell ({}, {}) lies outside the grid", .0.column(), .0.row())]
    OutOfBounds(CellCoord),
    /// The cell is not a free tile.
    #[error("cell ({}, {}) is not free", .cell.column(), .cell.row())]
    NotFree {
        /// Offending cell.
        cell: CellCoord,
        /// Classification found at the cell.
        class: Option<TileClass>,
    },
}

/// Classification and terrain of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Current occupancy classification.
    pub class: TileClass,
    /// Terrain category the tile was described with.
    pub category: TileCategory,
}

/// Dense grid covering the bounding box of every described cell.
#[derive(Clone, Debug)]
pub struct TileGrid {
    origin: CellCoord,
    columns: u32,
    rows: u32,
    tiles: Vec<Option<Tile>>,
}

impl TileGrid {
    /// Builds the grid from a level description.
    ///
    /// Cells listed under an unrecognized category are dropped with a warning.
    /// When a cell is listed under several categories, walls win over the
    /// route, and the route wins over free tiles. Fails with
    /// [`LevelError::TooLarge`] when the bounding box spans more than
    /// [`MAX_GRID_CELLS`] cells.
    pub fn from_level(level: &LevelDescription) -> Result<Self, LevelError> {
        let mut described: BTreeMap<CellCoord, TileCategory> = BTreeMap::new();
        let mut recognized: Vec<(TileCategory, &[CellCoord])> = Vec::new();
        for (name, cells) in level.categories() {
            match TileCategory::parse(name) {
                Ok(category) => recognized.push((category, cells)),
                Err(error) => warn!(%error, cells = cells.len(), "skipping tile category"),
            }
        }
        recognized.sort_by_key(|(category, _)| precedence(*category));
        for (category, cells) in recognized {
            for cell in cells {
                let _ = described.insert(*cell, category);
            }
        }

        let Some(min_column) = described.keys().map(CellCoord::column).min() else {
            return Ok(Self {
                origin: CellCoord::new(0, 0),
                columns: 0,
                rows: 0,
                tiles: Vec::new(),
            });
        };
        let min_row = described.keys().map(CellCoord::row).min().unwrap_or(0);
        let max_column = described.keys().map(CellCoord::column).max().unwrap_or(0);
        let max_row = described.keys().map(CellCoord::row).max().unwrap_or(0);

        let columns = u64::from(max_column - min_column) + 1;
        let rows = u64::from(max_row - min_row) + 1;
        let cells = columns
            .checked_mul(rows)
            .filter(|cells| *cells <= MAX_GRID_CELLS)
            .ok_or(LevelError::TooLarge { columns, rows })?;

        let mut grid = Self {
            origin: CellCoord::new(min_column, min_row),
            columns: columns as u32,
            rows: rows as u32,
            tiles: vec![None; cells as usize],
        };
        for (cell, category) in described {
            if let Some(index) = grid.index(cell) {
                grid.tiles[index] = Some(Tile {
                    class: category.class(),
                    category,
                });
            }
        }
        Ok(grid)
    }

    /// Upper-left cell of the grid's bounding box.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Number of columns covered by the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows covered by the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the grid bounds.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Current classification of the cell, or `None` when it was never described.
    #[must_use]
    pub fn classify(&self, cell: CellCoord) -> Option<TileClass> {
        self.tile(cell).map(|tile| tile.class)
    }

    /// Tile stored at the cell.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell).and_then(|index| self.tiles[index])
    }

    /// Marks every cell as occupied, or none of them when any is not free.
    pub fn occupy(
        &mut self,
        cells: impl IntoIterator<Item = CellCoord>,
    ) -> Result<(), OccupancyError> {
        let mut indices = Vec::new();
        for cell in cells {
            let index = self.index(cell).ok_or(OccupancyError::OutOfBounds(cell))?;
            match self.tiles[index] {
                Some(Tile {
                    class: TileClass::Default,
                    ..
                }) => indices.push(index),
                other => {
                    return Err(OccupancyError::NotFree {
                        cell,
                        class: other.map(|tile| tile.class),
                    })
                }
            }
        }

        for index in indices {
            if let Some(tile) = self.tiles[index].as_mut() {
                tile.class = TileClass::Occupied;
            }
        }
        Ok(())
    }

    /// Iterates every described tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let origin = self.origin;
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().filter_map(move |(index, tile)| {
            let index = index as u32;
            tile.map(|tile| {
                (
                    CellCoord::new(
                        origin.column() + index % columns,
                        origin.row() + index / columns,
                    ),
                    tile,
                )
            })
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = cell.column().checked_sub(self.origin.column())?;
        let row = cell.row().checked_sub(self.origin.row())?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some((row as usize) * (self.columns as usize) + column as usize)
    }
}

fn precedence(category: TileCategory) -> u8 {
    match category {
        TileCategory::FreeTile => 0,
        TileCategory::Path | TileCategory::Start | TileCategory::End => 1,
        TileCategory::Walls => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::{OccupancyError, TileGrid, MAX_GRID_CELLS};
    use crate::route::LevelError;
    use tile_defence_core::{CellCoord, LevelDescription, TileCategory, TileClass};

    fn level() -> LevelDescription {
        LevelDescription::new()
            .with_cells("walls", [CellCoord::new(1, 1)])
            .with_cells("path", [CellCoord::new(2, 1)])
            .with_cells(
                "free_tile",
                [CellCoord::new(1, 2), CellCoord::new(2, 2), CellCoord::new(3, 3)],
            )
            .with_cells("lava", [CellCoord::new(2, 3)])
    }

    #[test]
    fn bounds_cover_recognized_cells() {
        let grid = TileGrid::from_level(&level()).expect("level fits");
        assert_eq!(grid.origin(), CellCoord::new(1, 1));
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.rows(), 3);
        assert!(!grid.contains(CellCoord::new(0, 0)));
    }

    #[test]
    fn classification_follows_categories() {
        let grid = TileGrid::from_level(&level()).expect("level fits");
        assert_eq!(grid.classify(CellCoord::new(1, 1)), Some(TileClass::Wall));
        assert_eq!(grid.classify(CellCoord::new(2, 1)), Some(TileClass::Occupied));
        assert_eq!(grid.classify(CellCoord::new(1, 2)), Some(TileClass::Default));
        assert_eq!(
            grid.classify(CellCoord::new(2, 3)),
            None,
            "unrecognized categories are excluded"
        );
        assert_eq!(
            grid.tile(CellCoord::new(2, 1)).map(|tile| tile.category),
            Some(TileCategory::Path)
        );
    }

    #[test]
    fn occupy_is_all_or_nothing() {
        let mut grid = TileGrid::from_level(&level()).expect("level fits");
        let result = grid.occupy([CellCoord::new(1, 2), CellCoord::new(1, 1)]);
        assert_eq!(
            result,
            Err(OccupancyError::NotFree {
                cell: CellCoord::new(1, 1),
                class: Some(TileClass::Wall),
            })
        );
        assert_eq!(
            grid.classify(CellCoord::new(1, 2)),
            Some(TileClass::Default),
            "failed occupy must not flip any cell"
        );

        grid.occupy([CellCoord::new(1, 2), CellCoord::new(2, 2)])
            .expect("free cells can be occupied");
        assert_eq!(grid.classify(CellCoord::new(1, 2)), Some(TileClass::Occupied));
        assert_eq!(grid.classify(CellCoord::new(2, 2)), Some(TileClass::Occupied));
    }

    #[test]
    fn walls_take_precedence_over_other_categories() {
        let level = LevelDescription::new()
            .with_cells("free_tile", [CellCoord::new(0, 0)])
            .with_cells("walls", [CellCoord::new(0, 0)]);
        let grid = TileGrid::from_level(&level).expect("level fits");
        assert_eq!(grid.classify(CellCoord::new(0, 0)), Some(TileClass::Wall));
    }

    #[test]
    fn iteration_is_row_major() {
        let grid = TileGrid::from_level(&level()).expect("level fits");
        let cells: Vec<CellCoord> = grid.iter().map(|(cell, _)| cell).collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(1, 1),
                CellCoord::new(2, 1),
                CellCoord::new(1, 2),
                CellCoord::new(2, 2),
                CellCoord::new(3, 3),
            ]
        );
    }

    #[test]
    fn oversized_bounds_are_rejected() {
        let edge = LevelDescription::new()
            .with_cells("free_tile", [CellCoord::new(0, 0), CellCoord::new(u32::MAX, 0)]);
        assert_eq!(
            TileGrid::from_level(&edge).err(),
            Some(LevelError::TooLarge {
                columns: u64::from(u32::MAX) + 1,
                rows: 1,
            })
        );

        let sparse = LevelDescription::new().with_cells(
            "free_tile",
            [CellCoord::new(0, 0), CellCoord::new(100_000, 100_000)],
        );
        assert!(matches!(TileGrid::from_level(&sparse), Err(LevelError::TooLarge { .. })));

        let corners = LevelDescription::new()
            .with_cells("free_tile", [CellCoord::new(0, 0), CellCoord::new(u32::MAX, u32::MAX)]);
        assert!(matches!(TileGrid::from_level(&corners), Err(LevelError::TooLarge { .. })));
    }

    #[test]
    fn bounds_at_the_cell_limit_are_accepted() {
        let level = LevelDescription::new().with_cells(
            "free_tile",
            [CellCoord::new(0, 0), CellCoord::new(1023, 1023)],
        );
        let grid = TileGrid::from_level(&level).expect("limit is inclusive");
        assert_eq!(u64::from(grid.columns()) * u64::from(grid.rows()), MAX_GRID_CELLS);
    }
}
