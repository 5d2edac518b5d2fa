//! Application modes and the run conditions that gate systems on them.
//!
//! The game has three screens: Play (the scored game), Study (all regions
//! revealed, no scoring), and Author (content editing). Mode is a plain
//! resource rather than a `States` schedule so systems can gate with
//! `run_if` closures.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::game::StartSessionRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Play,
    Study,
    Author,
}

impl Mode {
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Play => "Jugar (F1)",
            Mode::Study => "Estudiar (F2)",
            Mode::Author => "Editar (F3)",
        }
    }

    pub fn all() -> &'static [Mode] {
        &[Mode::Play, Mode::Study, Mode::Author]
    }
}

#[derive(Resource, Default)]
pub struct CurrentMode {
    pub mode: Mode,
}

/// Run condition: returns true when the current mode matches.
///
/// Usage: `.run_if(mode_is(Mode::Play))`
pub fn mode_is(mode: Mode) -> impl FnMut(Res<CurrentMode>) -> bool + Clone {
    move |current: Res<CurrentMode>| current.mode == mode
}

/// Switch modes with F1/F2/F3. Entering Play restarts the session so the
/// player always begins from a fresh shuffle.
pub fn handle_mode_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut current_mode: ResMut<CurrentMode>,
    mut start_events: MessageWriter<StartSessionRequest>,
    mut contexts: EguiContexts,
) {
    // Don't switch modes if typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let new_mode = if keyboard.just_pressed(KeyCode::F1) {
        Some(Mode::Play)
    } else if keyboard.just_pressed(KeyCode::F2) {
        Some(Mode::Study)
    } else if keyboard.just_pressed(KeyCode::F3) {
        Some(Mode::Author)
    } else {
        None
    };

    if let Some(mode) = new_mode
        && mode != current_mode.mode
    {
        current_mode.mode = mode;
        if mode == Mode::Play {
            start_events.write(StartSessionRequest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_play() {
        assert_eq!(Mode::default(), Mode::Play);
        assert_eq!(CurrentMode::default().mode, Mode::Play);
    }

    #[test]
    fn test_all_returns_all_modes() {
        let all = Mode::all();
        assert_eq!(all.len(), 3);
        assert!(all.contains(&Mode::Play));
        assert!(all.contains(&Mode::Study));
        assert!(all.contains(&Mode::Author));
    }

    #[test]
    fn test_display_names_contain_shortcuts() {
        for mode in Mode::all() {
            let name = mode.display_name();
            assert!(name.contains('('), "Display name should contain shortcut: {}", name);
            assert!(name.contains(')'), "Display name should contain shortcut: {}", name);
        }
    }
}
