//! Pre-converted level descriptions consumed by the world.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::{CellCoord, TileClass};

/// Map layout expressed as tile category names paired with their cells.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct LevelDescription {
    categories: BTreeMap<String, Vec<CellCoord>>,
}

impl LevelDescription {
    /// Creates an empty description.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the provided cells to a category, creating it if needed.
    #[must_use]
    pub fn with_cells(
        mut self,
        category: impl Into<String>,
        cells: impl IntoIterator<Item = CellCoord>,
    ) -> Self {
        self.categories
            .entry(category.into())
            .or_default()
            .extend(cells);
        self
    }

    /// Iterates categories in name order together with their cell lists.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &[CellCoord])> {
        self.categories
            .iter()
            .map(|(name, cells)| (name.as_str(), cells.as_slice()))
    }
}

/// Recognised tile categories of a level description.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TileCategory {
    /// Blocking terrain.
    Walls,
    /// Cells the enemies walk over.
    Path,
    /// First cell of the enemy route.
    Start,
    /// Last cell of the enemy route.
    End,
    /// Buildable terrain.
    FreeTile,
}

impl TileCategory {
    /// Every recognised category.
    pub const ALL: [TileCategory; 5] = [
        TileCategory::Walls,
        TileCategory::Path,
        TileCategory::Start,
        TileCategory::End,
        TileCategory::FreeTile,
    ];

    /// Resolves a category name used by level descriptions.
    pub fn parse(name: &str) -> Result<Self, UnrecognizedTileCategory> {
        Self::ALL
            .into_iter()
            .find(|category| category.name() == name)
            .ok_or_else(|| UnrecognizedTileCategory {
                name: name.to_owned(),
            })
    }

    /// Name of the category inside level descriptions.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Walls => "walls",
            Self::Path => "path",
            Self::Start => "start",
            Self::End => "end",
            Self::FreeTile => "free_tile",
        }
    }

    /// Classification assigned to cells of the category.
    #[must_use]
    pub const fn class(self) -> TileClass {
        match self {
            Self::Walls => TileClass::Wall,
            Self::Path | Self::Start | Self::End => TileClass::Occupied,
            Self::FreeTile => TileClass::Default,
        }
    }

    /// Reports whether cells of the category belong to the enemy route.
    #[must_use]
    pub const fn is_route(self) -> bool {
        matches!(self, Self::Path | Self::Start | Self::End)
    }
}

/// Error raised when a level description uses an unknown category name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unrecognized tile category `{name}`")]
pub struct UnrecognizedTileCategory {
    /// Category name found in the description.
    pub name: String,
}
