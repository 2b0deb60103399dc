//! Enemy route traced through the path cells of a level.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use thiserror::Error;
use tile_defence_core::{CellCoord, LevelDescription, PixelPoint, TileCategory};

/// Errors raised when a level cannot provide an enemy route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The bounding box of the described cells is too large to store.
    #[error("level spans {columns}x{rows} cells, which exceeds the grid limit")]
    TooLarge {
        /// Columns spanned by the described cells.
        columns: u64,
        /// Rows spanned by the described cells.
        rows: u64,
    },
    /// No `start` cell is listed.
    #[error("level has no start cell")]
    MissingStart,
    /// No `end` cell is listed.
    #[error("level has no end cell")]
    MissingEnd,
    /// The end cannot be reached from the start through path cells.
    #[error("no path connects the start to an end cell")]
    DisconnectedRoute,
}

/// Polyline through cell centers, measured in map pixels.
#[derive(Clone, Debug)]
pub struct Route {
    cells: Vec<CellCoord>,
    points: Vec<PixelPoint>,
    distances: Vec<f32>,
}

impl Route {
    /// Traces the shortest 4-connected walk from the first start cell to any end cell.
    pub fn trace(level: &LevelDescription, cell_size: u32) -> Result<Self, LevelError> {
        let mut start = None;
        let mut ends = BTreeSet::new();
        let mut walkable = BTreeSet::new();
        for (name, cells) in level.categories() {
            match TileCategory::parse(name) {
                Ok(TileCategory::Start) => {
                    if start.is_none() {
                        start = cells.first().copied();
                    }
                }
                Ok(TileCategory::End) => {
                    ends.extend(cells.iter().copied());
                    walkable.extend(cells.iter().copied());
                }
                Ok(TileCategory::Path) => walkable.extend(cells.iter().copied()),
                _ => {}
            }
        }

        let start = start.ok_or(LevelError::MissingStart)?;
        if ends.is_empty() {
            return Err(LevelError::MissingEnd);
        }

        let mut parents: BTreeMap<CellCoord, CellCoord> = BTreeMap::new();
        let mut queue = VecDeque::from([start]);
        let mut reached = None;
        while let Some(cell) = queue.pop_front() {
            if ends.contains(&cell) {
                reached = Some(cell);
                break;
            }
            for neighbor in neighbors(cell) {
                if neighbor == start || parents.contains_key(&neighbor) {
                    continue;
                }
                if !walkable.contains(&neighbor) {
                    continue;
                }
                let _ = parents.insert(neighbor, cell);
                queue.push_back(neighbor);
            }
        }

        let mut cursor = reached.ok_or(LevelError::DisconnectedRoute)?;
        let mut cells = vec![cursor];
        while let Some(parent) = parents.get(&cursor) {
            cells.push(*parent);
            cursor = *parent;
        }
        cells.reverse();

        Ok(Self::from_cells(cells, cell_size))
    }

    fn from_cells(cells: Vec<CellCoord>, cell_size: u32) -> Self {
        let points: Vec<PixelPoint> = cells.iter().map(|cell| cell.center(cell_size)).collect();
        let mut distances = Vec::with_capacity(points.len());
        let mut travelled = 0.0;
        for (index, point) in points.iter().enumerate() {
            if index > 0 {
                travelled += points[index - 1].distance(*point);
            }
            distances.push(travelled);
        }
        Self {
            cells,
            points,
            distances,
        }
    }

    /// Cells visited by the route from start to end.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Total length of the route in pixels.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// Position after travelling `progress` pixels from the start, clamped to the route.
    #[must_use]
    pub fn point_at(&self, progress: f32) -> PixelPoint {
        let Some(first) = self.points.first() else {
            return PixelPoint::default();
        };
        if progress <= 0.0 {
            return *first;
        }

        for index in 1..self.points.len() {
            let segment_end = self.distances[index];
            if progress <= segment_end {
                let segment_start = self.distances[index - 1];
                let span = segment_end - segment_start;
                let (from, to) = (self.points[index - 1], self.points[index]);
                if span <= f32::EPSILON {
                    return to;
                }
                let ratio = (progress - segment_start) / span;
                return PixelPoint::new(
                    from.x + (to.x - from.x) * ratio,
                    from.y + (to.y - from.y) * ratio,
                );
            }
        }

        self.points.last().copied().unwrap_or(*first)
    }

    /// Progress of the route point closest to the provided position.
    #[must_use]
    pub fn closest_progress(&self, point: PixelPoint) -> f32 {
        let Some(first) = self.points.first() else {
            return 0.0;
        };

        let mut best_progress = 0.0;
        let mut best_distance = first.distance_squared(point);
        for index in 1..self.points.len() {
            let (from, to) = (self.points[index - 1], self.points[index]);
            let (dx, dy) = (to.x - from.x, to.y - from.y);
            let length_squared = dx * dx + dy * dy;
            if length_squared <= f32::EPSILON {
                continue;
            }
            let t = (((point.x - from.x) * dx + (point.y - from.y) * dy) / length_squared)
                .clamp(0.0, 1.0);
            let projected = PixelPoint::new(from.x + dx * t, from.y + dy * t);
            let distance = projected.distance_squared(point);
            if distance < best_distance {
                best_distance = distance;
                best_progress = self.distances[index - 1] + t * length_squared.sqrt();
            }
        }
        best_progress
    }
}

fn neighbors(cell: CellCoord) -> impl Iterator<Item = CellCoord> {
    let (column, row) = (cell.column(), cell.row());
    [
        row.checked_sub(1).map(|row| CellCoord::new(column, row)),
        column.checked_add(1).map(|column| CellCoord::new(column, row)),
        row.checked_add(1).map(|row| CellCoord::new(column, row)),
        column.checked_sub(1).map(|column| CellCoord::new(column, row)),
    ]
    .into_iter()
    .flatten()
}

#[cfg(test)]
mod tests {
    use super::{LevelError, Route};
    use tile_defence_core::{CellCoord, LevelDescription, PixelPoint};

    fn bent_level() -> LevelDescription {
        LevelDescription::new()
            .with_cells("start", [CellCoord::new(0, 0)])
            .with_cells("path", [CellCoord::new(1, 0), CellCoord::new(2, 0), CellCoord::new(2, 1)])
            .with_cells("end", [CellCoord::new(2, 2)])
    }

    #[test]
    fn trace_follows_adjacent_path_cells() {
        let route = Route::trace(&bent_level(), 10).expect("route exists");
        assert_eq!(
            route.cells(),
            &[
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(2, 0),
                CellCoord::new(2, 1),
                CellCoord::new(2, 2),
            ]
        );
        assert!((route.length() - 40.0).abs() < 1e-4);
    }

    #[test]
    fn point_at_interpolates_and_clamps() {
        let route = Route::trace(&bent_level(), 10).expect("route exists");
        assert_eq!(route.point_at(0.0), PixelPoint::new(5.0, 5.0));
        assert_eq!(route.point_at(15.0), PixelPoint::new(20.0, 5.0));
        assert_eq!(route.point_at(25.0), PixelPoint::new(25.0, 10.0));
        assert_eq!(route.point_at(500.0), PixelPoint::new(25.0, 25.0));
    }

    #[test]
    fn closest_progress_projects_onto_segments() {
        let route = Route::trace(&bent_level(), 10).expect("route exists");
        let progress = route.closest_progress(PixelPoint::new(12.0, 8.0));
        assert!((progress - 7.0).abs() < 1e-4, "progress was {progress}");
        let progress = route.closest_progress(PixelPoint::new(40.0, 20.0));
        assert!((progress - 35.0).abs() < 1e-4, "progress was {progress}");
    }

    #[test]
    fn missing_markers_are_reported() {
        let no_start = LevelDescription::new().with_cells("end", [CellCoord::new(0, 0)]);
        assert_eq!(Route::trace(&no_start, 10).err(), Some(LevelError::MissingStart));

        let no_end = LevelDescription::new().with_cells("start", [CellCoord::new(0, 0)]);
        assert_eq!(Route::trace(&no_end, 10).err(), Some(LevelError::MissingEnd));

        let gap = LevelDescription::new()
            .with_cells("start", [CellCoord::new(0, 0)])
            .with_cells("end", [CellCoord::new(3, 0)]);
        assert_eq!(Route::trace(&gap, 10).err(), Some(LevelError::DisconnectedRoute));
    }
}
