use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::{AppConfig, SaveConfigRequest};
use crate::game::{GameSession, SessionPhase, StartSessionRequest};
use crate::modes::{CurrentMode, Mode};

use super::dialogs::ImportExportState;

/// Main toolbar: mode switcher, play controls, and atlas import/export.
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut current_mode: ResMut<CurrentMode>,
    mut config: ResMut<AppConfig>,
    session: Res<GameSession>,
    mut import_export: ResMut<ImportExportState>,
    mut start_events: MessageWriter<StartSessionRequest>,
    mut save_config_events: MessageWriter<SaveConfigRequest>,
) -> Result {
    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                for mode in Mode::all() {
                    let selected = current_mode.mode == *mode;
                    let button = egui::Button::new(
                        egui::RichText::new(mode.display_name()).size(14.0).strong(),
                    )
                    .min_size(egui::vec2(0.0, 28.0))
                    .selected(selected);

                    if ui.add(button).clicked() && !selected {
                        current_mode.mode = *mode;
                        if *mode == Mode::Play {
                            start_events.write(StartSessionRequest);
                        }
                    }
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                if ui
                    .checkbox(&mut config.data.show_regions_in_play, "Modo test")
                    .changed()
                {
                    config.dirty = true;
                    save_config_events.write(SaveConfigRequest);
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                if ui.button("Importar...").clicked() {
                    import_export.request_import = true;
                }
                if ui.button("Exportar...").clicked() {
                    import_export.request_export = true;
                }

                // Right-aligned score readout
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match session.phase() {
                        SessionPhase::InProgress | SessionPhase::Completed => {
                            ui.label(
                                egui::RichText::new(format!("Puntos: {}", session.score()))
                                    .strong(),
                            );
                        }
                        SessionPhase::NotStarted => {}
                    }
                });
            });
        });
    Ok(())
}
