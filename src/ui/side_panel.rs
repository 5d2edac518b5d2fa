use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::atlas::{AtlasData, CreateCategoryRequest, DeleteCategoryRequest};
use crate::author::{AuthorStaging, AuthorTool, CurrentAuthorTool, SelectedFeature};
use crate::config::{AppConfig, SaveConfigRequest};
use crate::game::{GameSession, SessionFilter, SessionPhase, StartSessionRequest};
use crate::modes::{CurrentMode, Mode};
use crate::play::ActiveDrag;
use crate::theme;

/// Scratch state for the category management inputs in the authoring panel.
#[derive(Resource, Default)]
pub struct CategoryPanelState {
    pub new_category_name: String,
}

/// Left side panel. Content follows the active mode.
#[allow(clippy::too_many_arguments)]
pub fn side_panel_ui(
    mut contexts: EguiContexts,
    current_mode: Res<CurrentMode>,
    atlas: Res<AtlasData>,
    session: Res<GameSession>,
    mut filter: ResMut<SessionFilter>,
    mut config: ResMut<AppConfig>,
    mut active_drag: ResMut<ActiveDrag>,
    mut staging: ResMut<AuthorStaging>,
    mut current_tool: ResMut<CurrentAuthorTool>,
    mut selected: ResMut<SelectedFeature>,
    mut panel_state: ResMut<CategoryPanelState>,
    mut start_events: MessageWriter<StartSessionRequest>,
    mut save_config_events: MessageWriter<SaveConfigRequest>,
    mut create_category_events: MessageWriter<CreateCategoryRequest>,
    mut delete_category_events: MessageWriter<DeleteCategoryRequest>,
) -> Result {
    egui::SidePanel::left("side_panel")
        .default_width(230.0)
        .resizable(true)
        .show(contexts.ctx_mut()?, |ui| match current_mode.mode {
            Mode::Play => play_panel(
                ui,
                &session,
                &atlas,
                &mut filter,
                &mut config,
                &mut active_drag,
                &mut start_events,
                &mut save_config_events,
            ),
            Mode::Study => study_panel(ui, &atlas),
            Mode::Author => author_panel(
                ui,
                &atlas,
                &mut staging,
                &mut current_tool,
                &mut selected,
                &mut panel_state,
                &mut create_category_events,
                &mut delete_category_events,
            ),
        });
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn play_panel(
    ui: &mut egui::Ui,
    session: &GameSession,
    atlas: &AtlasData,
    filter: &mut SessionFilter,
    config: &mut AppConfig,
    active_drag: &mut ActiveDrag,
    start_events: &mut MessageWriter<StartSessionRequest>,
    save_config_events: &mut MessageWriter<SaveConfigRequest>,
) {
    ui.add_space(8.0);
    ui.heading("Sitúa en el mapa");
    ui.add_space(8.0);

    // Category filter; changing it restarts the round
    ui.horizontal(|ui| {
        ui.label("Categoría:");
        let selected_text = filter
            .category_id
            .as_deref()
            .and_then(|id| atlas.category(id))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "Todas".to_string());
        egui::ComboBox::from_id_salt("category_filter")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                let mut changed = false;
                if ui
                    .selectable_label(filter.category_id.is_none(), "Todas")
                    .clicked()
                {
                    filter.category_id = None;
                    changed = true;
                }
                for category in &atlas.categories {
                    let is_selected = filter.category_id.as_deref() == Some(category.id.as_str());
                    if ui.selectable_label(is_selected, &category.name).clicked() {
                        filter.category_id = Some(category.id.clone());
                        changed = true;
                    }
                }
                if changed {
                    config.data.last_category_filter = filter.category_id.clone();
                    config.dirty = true;
                    save_config_events.write(SaveConfigRequest);
                    start_events.write(StartSessionRequest);
                }
            });
    });

    ui.add_space(4.0);
    if ui.button("Reiniciar").clicked() {
        start_events.write(StartSessionRequest);
    }

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    if session.phase() == SessionPhase::NotStarted {
        ui.label(egui::RichText::new("Pulsa Reiniciar para empezar").weak());
        return;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        // Any remaining label can be armed; the shuffled order only decides
        // how the list reads, not which one the player may try next.
        for feature in session.remaining() {
            let is_armed = active_drag.feature_id.as_deref() == Some(feature.id.as_str());
            let button = egui::Button::new(&feature.name)
                .min_size(egui::vec2(ui.available_width(), 26.0))
                .selected(is_armed);
            let response = ui.add(button);
            if response.clicked() {
                active_drag.feature_id = if is_armed {
                    None
                } else {
                    Some(feature.id.clone())
                };
            }
        }

        if !session.failed().is_empty() {
            ui.add_space(8.0);
            ui.separator();
            ui.label(egui::RichText::new("Fallados").strong());
            for feature in session.failed() {
                ui.colored_label(theme::FAILED_TEXT, &feature.name);
            }
        }

        if !session.placed().is_empty() {
            ui.add_space(8.0);
            ui.separator();
            ui.label(egui::RichText::new("Colocados").strong());
            for record in session.placed() {
                let name = atlas
                    .feature(&record.feature_id)
                    .map(|f| f.name.as_str())
                    .unwrap_or(record.feature_id.as_str());
                ui.colored_label(theme::SUCCESS_TEXT, name);
            }
        }
    });
}

fn study_panel(ui: &mut egui::Ui, atlas: &AtlasData) {
    ui.add_space(8.0);
    ui.heading("Estudio");
    ui.add_space(8.0);
    ui.label(
        egui::RichText::new("Todos los accidentes del atlas están marcados en el mapa.").weak(),
    );
    ui.add_space(8.0);
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for category in &atlas.categories {
            ui.add_space(4.0);
            ui.label(egui::RichText::new(&category.name).strong());
            for feature in &atlas.features {
                if feature.category_id.as_deref() == Some(category.id.as_str()) {
                    ui.label(format!("  {}", feature.name));
                }
            }
        }

        let uncategorized: Vec<_> = atlas
            .features
            .iter()
            .filter(|f| {
                f.category_id
                    .as_deref()
                    .is_none_or(|id| atlas.category(id).is_none())
            })
            .collect();
        if !uncategorized.is_empty() {
            ui.add_space(4.0);
            ui.label(egui::RichText::new("Sin categoría").strong());
            for feature in uncategorized {
                ui.label(format!("  {}", feature.name));
            }
        }
    });
}

#[allow(clippy::too_many_arguments)]
fn author_panel(
    ui: &mut egui::Ui,
    atlas: &AtlasData,
    staging: &mut AuthorStaging,
    current_tool: &mut CurrentAuthorTool,
    selected: &mut SelectedFeature,
    panel_state: &mut CategoryPanelState,
    create_category_events: &mut MessageWriter<CreateCategoryRequest>,
    delete_category_events: &mut MessageWriter<DeleteCategoryRequest>,
) {
    ui.add_space(8.0);
    ui.heading("Edición");
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        for tool in AuthorTool::all() {
            let is_selected = current_tool.tool == *tool;
            if ui
                .add(egui::Button::new(tool.display_name()).selected(is_selected))
                .clicked()
            {
                current_tool.tool = *tool;
            }
        }
    });

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    // Staging inputs for the place tool
    ui.label(egui::RichText::new("Nuevo accidente").strong());
    ui.horizontal(|ui| {
        ui.label("Nombre:");
        ui.text_edit_singleline(&mut staging.name);
    });
    ui.horizontal(|ui| {
        ui.label("Tolerancia:");
        ui.add(
            egui::DragValue::new(&mut staging.tolerance)
                .range(1.0..=300.0)
                .speed(1.0)
                .suffix(" px"),
        );
    });
    ui.horizontal(|ui| {
        ui.label("Categoría:");
        let selected_text = staging
            .category_id
            .as_deref()
            .and_then(|id| atlas.category(id))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "Ninguna".to_string());
        egui::ComboBox::from_id_salt("staging_category")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                if ui
                    .selectable_label(staging.category_id.is_none(), "Ninguna")
                    .clicked()
                {
                    staging.category_id = None;
                }
                for category in &atlas.categories {
                    let is_selected =
                        staging.category_id.as_deref() == Some(category.id.as_str());
                    if ui.selectable_label(is_selected, &category.name).clicked() {
                        staging.category_id = Some(category.id.clone());
                    }
                }
            });
    });
    ui.label(
        egui::RichText::new("Con la herramienta Colocar, haz clic en el mapa para crearlo.")
            .weak()
            .small(),
    );

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    ui.label(egui::RichText::new("Accidentes").strong());
    egui::ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
        for feature in &atlas.features {
            let is_selected = selected.id.as_deref() == Some(feature.id.as_str());
            if ui.selectable_label(is_selected, &feature.name).clicked() {
                selected.id = if is_selected {
                    None
                } else {
                    Some(feature.id.clone())
                };
            }
        }
    });

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    ui.label(egui::RichText::new("Categorías").strong());
    let mut delete_id = None;
    for category in &atlas.categories {
        ui.horizontal(|ui| {
            ui.label(&category.name);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("🗑").clicked() {
                    delete_id = Some(category.id.clone());
                }
            });
        });
    }
    if let Some(id) = delete_id {
        delete_category_events.write(DeleteCategoryRequest { id });
    }

    ui.horizontal(|ui| {
        ui.text_edit_singleline(&mut panel_state.new_category_name);
        let name = panel_state.new_category_name.trim();
        if ui.add_enabled(!name.is_empty(), egui::Button::new("Añadir")).clicked() {
            create_category_events.write(CreateCategoryRequest {
                name: name.to_string(),
            });
            panel_state.new_category_name.clear();
        }
    });
}
