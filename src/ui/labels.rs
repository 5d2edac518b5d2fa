use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::atlas::AtlasData;
use crate::config::AppConfig;
use crate::game::{
    canonical_to_world, GameSession, SessionCompleted, SessionPhase, StartSessionRequest,
};
use crate::map_view::MapCamera;
use crate::modes::{CurrentMode, Mode};
use crate::theme;

/// Draw one name chip anchored at a canonical map point.
fn label_chip(
    ctx: &egui::Context,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    anchor: Vec2,
    text: &str,
) {
    let world = canonical_to_world(anchor);
    let Ok(viewport) = camera.world_to_viewport(camera_transform, world.extend(0.0)) else {
        return;
    };

    egui::Area::new(egui::Id::new(("map_label", text)))
        .fixed_pos(egui::pos2(viewport.x + 8.0, viewport.y - 8.0))
        .order(egui::Order::Background)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(theme::MAP_LABEL_BG)
                .corner_radius(3.0)
                .inner_margin(egui::Margin::symmetric(4, 2))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(text)
                            .color(theme::MAP_LABEL_TEXT)
                            .size(12.0),
                    );
                });
        });
}

/// Name chips over the map. In play, placed features are labelled (plus
/// everything else when the test overlay is on); in study, all features are.
pub fn map_labels_ui(
    mut contexts: EguiContexts,
    current_mode: Res<CurrentMode>,
    config: Res<AppConfig>,
    atlas: Res<AtlasData>,
    session: Res<GameSession>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MapCamera>>,
) -> Result {
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return Ok(());
    };
    let ctx = contexts.ctx_mut()?;

    match current_mode.mode {
        Mode::Play => {
            for record in session.placed() {
                if let Some(feature) = atlas.feature(&record.feature_id) {
                    label_chip(ctx, camera, camera_transform, feature.anchor, &feature.name);
                }
            }
            if config.data.show_regions_in_play {
                for feature in session.remaining().iter().chain(session.failed()) {
                    label_chip(ctx, camera, camera_transform, feature.anchor, &feature.name);
                }
            }
        }
        Mode::Study => {
            for feature in &atlas.features {
                label_chip(ctx, camera, camera_transform, feature.anchor, &feature.name);
            }
        }
        Mode::Author => {}
    }

    Ok(())
}

/// The completion message the banner is currently showing, if any.
#[derive(Resource, Default)]
pub struct CompletionBanner {
    pub completion: Option<SessionCompleted>,
}

/// Latch the session-completed message for the banner and drop it again
/// once a restart puts the session back in progress.
pub fn track_completion(
    mut events: MessageReader<SessionCompleted>,
    session: Res<GameSession>,
    mut banner: ResMut<CompletionBanner>,
) {
    for completed in events.read() {
        banner.completion = Some(*completed);
    }
    if session.phase() != SessionPhase::Completed {
        banner.completion = None;
    }
}

/// End-of-round banner with the final score.
pub fn completion_banner_ui(
    mut contexts: EguiContexts,
    current_mode: Res<CurrentMode>,
    session: Res<GameSession>,
    banner: Res<CompletionBanner>,
    mut start_events: MessageWriter<StartSessionRequest>,
) -> Result {
    if current_mode.mode != Mode::Play {
        return Ok(());
    }
    let Some(completion) = banner.completion else {
        return Ok(());
    };

    egui::Window::new("Fin de la ronda")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            if completion.perfect {
                ui.label(
                    egui::RichText::new("¡Perfecto! Todos en su sitio.")
                        .color(theme::SUCCESS_TEXT)
                        .size(16.0)
                        .strong(),
                );
            } else {
                ui.label(egui::RichText::new("Ronda terminada").size(16.0).strong());
                ui.label(format!("Fallados: {}", session.failed().len()));
            }
            ui.add_space(4.0);
            ui.label(format!("Puntuación: {}", completion.score));
            ui.add_space(8.0);
            if ui.button("Jugar otra vez").clicked() {
                start_events.write(StartSessionRequest);
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{Feature, Region};

    fn test_app() -> App {
        let mut app = App::new();
        app.add_message::<SessionCompleted>()
            .init_resource::<GameSession>()
            .init_resource::<CompletionBanner>()
            .add_systems(Update, track_completion);
        app
    }

    #[test]
    fn test_banner_latches_completion_until_restart() {
        let mut app = test_app();

        // An empty round completes immediately; the message reaches the banner
        app.world_mut().resource_mut::<GameSession>().start(Vec::new());
        app.world_mut().write_message(SessionCompleted {
            score: 0,
            perfect: true,
        });
        app.update();
        assert_eq!(
            app.world().resource::<CompletionBanner>().completion,
            Some(SessionCompleted {
                score: 0,
                perfect: true
            })
        );

        // The banner stays up across frames while the session is finished
        app.update();
        assert!(app.world().resource::<CompletionBanner>().completion.is_some());

        // Restarting the session takes it down
        let pirineos = Feature {
            id: "1".to_string(),
            name: "Pirineos".to_string(),
            category_id: None,
            anchor: Vec2::new(490.0, 80.0),
            region: Region::Circle { tolerance: 60.0 },
        };
        app.world_mut().resource_mut::<GameSession>().start(vec![pirineos]);
        app.update();
        assert!(app.world().resource::<CompletionBanner>().completion.is_none());
    }
}
