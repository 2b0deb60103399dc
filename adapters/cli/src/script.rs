//! Scripted input replayed by headless runs.

use std::{collections::VecDeque, fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use tile_defence_core::{InputEvent, KeyCode, PixelPoint, PointerButton};
use tile_defence_rendering::InputSource;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
struct Script {
    #[serde(default)]
    events: Vec<ScriptedEvent>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ScriptedEvent {
    Quit {
        tick: u64,
    },
    KeyDown {
        tick: u64,
        key: KeyCode,
    },
    PointerDown {
        tick: u64,
        button: PointerButton,
        x: f32,
        y: f32,
    },
}

impl ScriptedEvent {
    fn tick(&self) -> u64 {
        match *self {
            Self::Quit { tick } | Self::KeyDown { tick, .. } | Self::PointerDown { tick, .. } => {
                tick
            }
        }
    }

    fn to_input(self) -> InputEvent {
        match self {
            Self::Quit { .. } => InputEvent::Quit,
            Self::KeyDown { key, .. } => InputEvent::KeyDown(key),
            Self::PointerDown { button, x, y, .. } => InputEvent::PointerDown {
                button,
                position: PixelPoint::new(x, y),
            },
        }
    }
}

/// Input source replaying events stamped with the loop iteration they belong to.
#[derive(Debug, Default)]
pub(crate) struct ScriptedInput {
    events: VecDeque<(u64, InputEvent)>,
    tick: u64,
}

impl ScriptedInput {
    /// Reads a script from disk.
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read input script at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse input script at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let script: Script = toml::from_str(contents)?;
        let mut events: Vec<(u64, InputEvent)> = script
            .events
            .into_iter()
            .map(|event| (event.tick(), event.to_input()))
            .collect();
        events.sort_by_key(|(tick, _)| *tick);
        Ok(Self {
            events: events.into(),
            tick: 0,
        })
    }
}

impl InputSource for ScriptedInput {
    fn drain(&mut self) -> Vec<InputEvent> {
        let mut drained = Vec::new();
        while let Some((tick, _)) = self.events.front() {
            if *tick > self.tick {
                break;
            }
            if let Some((_, event)) = self.events.pop_front() {
                drained.push(event);
            }
        }
        if !drained.is_empty() {
            debug!(tick = self.tick, events = drained.len(), "scripted input");
        }
        self.tick += 1;
        drained
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn events_are_released_on_their_tick_in_file_order() {
        let mut input = ScriptedInput::parse(
            r#"
            [[events]]
            tick = 2
            type = "quit"

            [[events]]
            tick = 0
            type = "key_down"
            key = "escape"

            [[events]]
            tick = 0
            type = "pointer_down"
            button = "secondary"
            x = 4.0
            y = 8
            "#,
        )
        .expect("script parses");

        assert_eq!(
            input.drain(),
            vec![
                InputEvent::KeyDown(KeyCode::Escape),
                InputEvent::PointerDown {
                    button: PointerButton::Secondary,
                    position: PixelPoint::new(4.0, 8.0),
                },
            ]
        );
        assert!(input.drain().is_empty());
        assert_eq!(input.drain(), vec![InputEvent::Quit]);
        assert!(input.drain().is_empty(), "script is exhausted");
    }

    #[test]
    fn empty_input_never_produces_events() {
        let mut input = ScriptedInput::default();
        assert!(input.drain().is_empty());
        assert!(input.drain().is_empty());
    }

    #[test]
    fn unknown_event_types_are_rejected() {
        let result = ScriptedInput::parse(
            r#"
            [[events]]
            tick = 0
            type = "scroll"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn bundled_script_parses() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scripts/opening.toml");
        let mut input = ScriptedInput::from_path(&path).expect("bundled script parses");
        assert_eq!(input.drain().len(), 2, "card and map click on the first tick");
    }
}
