use bevy::prelude::*;
use bevy_egui::EguiContexts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorTool {
    #[default]
    Select,
    Place,
}

impl AuthorTool {
    pub fn display_name(&self) -> &'static str {
        match self {
            AuthorTool::Select => "Seleccionar (V)",
            AuthorTool::Place => "Colocar (P)",
        }
    }

    pub fn all() -> &'static [AuthorTool] {
        &[AuthorTool::Select, AuthorTool::Place]
    }
}

#[derive(Resource, Default)]
pub struct CurrentAuthorTool {
    pub tool: AuthorTool,
}

pub fn handle_tool_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut current_tool: ResMut<CurrentAuthorTool>,
    mut contexts: EguiContexts,
) {
    // Don't change tools if typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyV) {
        current_tool.tool = AuthorTool::Select;
    } else if keyboard.just_pressed(KeyCode::KeyP) {
        current_tool.tool = AuthorTool::Place;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tool_is_select() {
        assert_eq!(AuthorTool::default(), AuthorTool::Select);
        assert_eq!(CurrentAuthorTool::default().tool, AuthorTool::Select);
    }

    #[test]
    fn test_display_names_contain_shortcuts() {
        for tool in AuthorTool::all() {
            let name = tool.display_name();
            assert!(name.contains('('), "Display name should contain shortcut: {}", name);
        }
    }
}
