#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input routing system that turns pointer and key events into actions.

use tile_defence_core::{
    CellCoord, InputEvent, KeyCode, PixelPoint, PixelRect, PointerButton, TowerKind,
    WindowConfig,
};
use tracing::debug;

/// Screen geometry of the HUD strip, tower cards, and map.
#[derive(Clone, Debug, PartialEq)]
pub struct HudLayout {
    cell_size: u32,
    hud: PixelRect,
    map: PixelRect,
    cards: Vec<(TowerKind, PixelRect)>,
}

impl HudLayout {
    /// Lays out one card per tower kind left to right, with the map below the HUD.
    ///
    /// `map_columns` and `map_rows` count cells from the map origin, so the
    /// map covers every cell whose coordinates are below them.
    #[must_use]
    pub fn new(window: &WindowConfig, map_columns: u32, map_rows: u32) -> Self {
        let cell_size = window.cell_size.max(1);
        let card = window.card_size;
        let spacing = window.card_spacing;
        let card_y = window.hud_height.saturating_sub(card) / 2;

        let cards: Vec<(TowerKind, PixelRect)> = TowerKind::ALL
            .into_iter()
            .enumerate()
            .map(|(index, kind)| {
                let index = index as u32;
                let x = spacing + index * (card + spacing);
                (kind, PixelRect::new(x as i32, card_y as i32, card, card))
            })
            .collect();

        let map_width = map_columns.saturating_mul(cell_size);
        let cards_width = spacing + (cards.len() as u32) * (card + spacing);
        let hud = PixelRect::new(0, 0, map_width.max(cards_width), window.hud_height);
        let map = PixelRect::new(
            0,
            window.hud_height as i32,
            map_width,
            map_rows.saturating_mul(cell_size),
        );

        Self {
            cell_size,
            hud,
            map,
            cards,
        }
    }

    /// Rectangle covered by the HUD strip.
    #[must_use]
    pub const fn hud(&self) -> PixelRect {
        self.hud
    }

    /// Rectangle covered by the map.
    #[must_use]
    pub const fn map(&self) -> PixelRect {
        self.map
    }

    /// Window offset of the map's top-left corner.
    #[must_use]
    pub const fn map_origin(&self) -> (i32, i32) {
        (self.map.x, self.map.y)
    }

    /// Card rectangles in display order.
    #[must_use]
    pub fn cards(&self) -> &[(TowerKind, PixelRect)] {
        &self.cards
    }

    /// Tower card under the pointer, if any.
    #[must_use]
    pub fn card_at(&self, position: PixelPoint) -> Option<TowerKind> {
        self.cards
            .iter()
            .find(|(_, rect)| rect.contains(position))
            .map(|(kind, _)| *kind)
    }

    /// Map cell under the pointer, if the pointer lies over the map.
    #[must_use]
    pub fn cell_at(&self, position: PixelPoint) -> Option<CellCoord> {
        if !self.map.contains(position) {
            return None;
        }
        let x = position.x - self.map.x as f32;
        let y = position.y - self.map.y as f32;
        let size = self.cell_size as f32;
        Some(CellCoord::new((x / size) as u32, (y / size) as u32))
    }
}

/// Tower card selection state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Selection {
    /// No card is selected.
    #[default]
    Idle,
    /// A card was clicked and awaits a map click.
    CardSelected(TowerKind),
}

/// Actions produced by routing input events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoutedAction {
    /// The player asked to close the game.
    Quit,
    /// The pause flag flipped.
    TogglePause {
        /// Pause flag after the toggle.
        paused: bool,
    },
    /// A tower card was selected.
    SelectCard(TowerKind),
    /// The selected card was dropped without a placement.
    CancelSelection,
    /// The player asked to build the selected tower at a cell.
    PlaceTower {
        /// Tower kind from the selected card.
        kind: TowerKind,
        /// Clicked map cell used as the footprint origin.
        cell: CellCoord,
    },
}

/// State machine mapping raw input events onto game actions.
#[derive(Clone, Debug)]
pub struct InputRouter {
    layout: HudLayout,
    selection: Selection,
    paused: bool,
}

impl InputRouter {
    /// Creates an idle, unpaused router for the provided layout.
    #[must_use]
    pub fn new(layout: HudLayout) -> Self {
        Self {
            layout,
            selection: Selection::Idle,
            paused: false,
        }
    }

    /// Current card selection.
    #[must_use]
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Reports whether the simulation is paused.
    #[must_use]
    pub const fn paused(&self) -> bool {
        self.paused
    }

    /// Layout used to hit-test pointer positions.
    #[must_use]
    pub fn layout(&self) -> &HudLayout {
        &self.layout
    }

    /// Routes a single input event, appending the resulting actions.
    pub fn handle(&mut self, event: InputEvent, out: &mut Vec<RoutedAction>) {
        match event {
            InputEvent::Quit => out.push(RoutedAction::Quit),
            InputEvent::KeyDown(KeyCode::Escape) => {
                self.paused = !self.paused;
                out.push(RoutedAction::TogglePause {
                    paused: self.paused,
                });
            }
            InputEvent::KeyDown(KeyCode::Other) => {}
            InputEvent::PointerDown {
                button: PointerButton::Secondary,
                ..
            } => {
                if self.selection != Selection::Idle {
                    self.selection = Selection::Idle;
                    out.push(RoutedAction::CancelSelection);
                }
            }
            InputEvent::PointerDown {
                button: PointerButton::Primary,
                position,
            } => self.primary_click(position, out),
            InputEvent::PointerDown {
                button: PointerButton::Other,
                ..
            } => {}
        }
    }

    fn primary_click(&mut self, position: PixelPoint, out: &mut Vec<RoutedAction>) {
        if let Some(kind) = self.layout.card_at(position) {
            match self.selection {
                Selection::Idle => {
                    self.selection = Selection::CardSelected(kind);
                    out.push(RoutedAction::SelectCard(kind));
                }
                Selection::CardSelected(selected) => {
                    debug!(
                        selected = selected.name(),
                        clicked = kind.name(),
                        "card click ignored while a card is selected"
                    );
                }
            }
            return;
        }

        let Some(cell) = self.layout.cell_at(position) else {
            return;
        };
        if let Selection::CardSelected(kind) = self.selection {
            self.selection = Selection::Idle;
            out.push(RoutedAction::PlaceTower { kind, cell });
        }
    }
}
