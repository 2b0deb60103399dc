use tile_defence_core::{
    CellCoord, InputEvent, KeyCode, PixelPoint, PointerButton, TowerKind, WindowConfig,
};
use tile_defence_system_input::{HudLayout, InputRouter, RoutedAction, Selection};

fn router() -> InputRouter {
    InputRouter::new(HudLayout::new(&WindowConfig::default(), 20, 10))
}

fn click(x: f32, y: f32) -> InputEvent {
    InputEvent::PointerDown {
        button: PointerButton::Primary,
        position: PixelPoint::new(x, y),
    }
}

fn route(router: &mut InputRouter, events: &[InputEvent]) -> Vec<RoutedAction> {
    let mut out = Vec::new();
    for event in events {
        router.handle(*event, &mut out);
    }
    out
}

const ARROW_CARD: (f32, f32) = (10.0, 20.0);
const CANNON_CARD: (f32, f32) = (70.0, 20.0);

#[test]
fn card_then_map_click_requests_placement() {
    let mut router = router();
    let actions = route(
        &mut router,
        &[click(ARROW_CARD.0, ARROW_CARD.1), click(40.0, 64.0 + 40.0)],
    );

    assert_eq!(
        actions,
        vec![
            RoutedAction::SelectCard(TowerKind::Arrow),
            RoutedAction::PlaceTower {
                kind: TowerKind::Arrow,
                cell: CellCoord::new(2, 2),
            },
        ]
    );
    assert_eq!(router.selection(), Selection::Idle, "map click resolves selection");
}

#[test]
fn card_clicks_are_ignored_while_selected() {
    let mut router = router();
    let actions = route(
        &mut router,
        &[
            click(ARROW_CARD.0, ARROW_CARD.1),
            click(CANNON_CARD.0, CANNON_CARD.1),
        ],
    );

    assert_eq!(actions, vec![RoutedAction::SelectCard(TowerKind::Arrow)]);
    assert_eq!(router.selection(), Selection::CardSelected(TowerKind::Arrow));
}

#[test]
fn clicks_outside_cards_and_map_keep_selection() {
    let mut router = router();
    let actions = route(
        &mut router,
        &[click(CANNON_CARD.0, CANNON_CARD.1), click(300.0, 30.0)],
    );

    assert_eq!(actions, vec![RoutedAction::SelectCard(TowerKind::Cannon)]);
    assert_eq!(router.selection(), Selection::CardSelected(TowerKind::Cannon));
}

#[test]
fn map_click_without_selection_does_nothing() {
    let mut router = router();
    assert!(route(&mut router, &[click(40.0, 100.0)]).is_empty());
}

#[test]
fn secondary_click_cancels_selection() {
    let mut router = router();
    let cancel = InputEvent::PointerDown {
        button: PointerButton::Secondary,
        position: PixelPoint::new(40.0, 100.0),
    };
    let actions = route(&mut router, &[click(ARROW_CARD.0, ARROW_CARD.1), cancel, cancel]);

    assert_eq!(
        actions,
        vec![
            RoutedAction::SelectCard(TowerKind::Arrow),
            RoutedAction::CancelSelection,
        ],
        "a second cancel has nothing to cancel"
    );
    assert_eq!(router.selection(), Selection::Idle);
}

#[test]
fn escape_toggles_pause_without_touching_selection() {
    let mut router = router();
    let escape = InputEvent::KeyDown(KeyCode::Escape);
    let actions = route(
        &mut router,
        &[escape, click(ARROW_CARD.0, ARROW_CARD.1), escape],
    );

    assert_eq!(
        actions,
        vec![
            RoutedAction::TogglePause { paused: true },
            RoutedAction::SelectCard(TowerKind::Arrow),
            RoutedAction::TogglePause { paused: false },
        ]
    );
    assert!(!router.paused());
    assert_eq!(router.selection(), Selection::CardSelected(TowerKind::Arrow));
}

#[test]
fn quit_and_unbound_inputs() {
    let mut router = router();
    let actions = route(
        &mut router,
        &[
            InputEvent::KeyDown(KeyCode::Other),
            InputEvent::PointerDown {
                button: PointerButton::Other,
                position: PixelPoint::new(10.0, 20.0),
            },
            InputEvent::Quit,
        ],
    );
    assert_eq!(actions, vec![RoutedAction::Quit]);
}
