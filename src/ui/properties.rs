use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::atlas::{
    AtlasData, DeleteFeatureRequest, FeatureEdit, FeatureEditRequest, Region,
};
use crate::author::SelectedFeature;
use crate::modes::{CurrentMode, Mode};

/// Properties window for the feature selected in the authoring mode. Every
/// change goes through the edit messages so the dirty tracking stays honest.
pub fn properties_panel_ui(
    mut contexts: EguiContexts,
    current_mode: Res<CurrentMode>,
    atlas: Res<AtlasData>,
    mut selected: ResMut<SelectedFeature>,
    mut edit_events: MessageWriter<FeatureEditRequest>,
    mut delete_events: MessageWriter<DeleteFeatureRequest>,
) -> Result {
    if current_mode.mode != Mode::Author {
        return Ok(());
    }
    let Some(id) = selected.id.clone() else {
        return Ok(());
    };
    let Some(feature) = atlas.feature(&id) else {
        // Selection outlived the feature (deleted elsewhere)
        selected.id = None;
        return Ok(());
    };

    let mut pending: Vec<FeatureEdit> = Vec::new();
    let mut should_delete = false;

    egui::Window::new("Propiedades")
        .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
        .resizable(false)
        .show(contexts.ctx_mut()?, |ui| {
            let mut name = feature.name.clone();
            ui.horizontal(|ui| {
                ui.label("Nombre:");
                if ui.text_edit_singleline(&mut name).changed() && !name.trim().is_empty() {
                    pending.push(FeatureEdit::Rename(name.clone()));
                }
            });

            ui.horizontal(|ui| {
                ui.label("Categoría:");
                let selected_text = feature
                    .category_id
                    .as_deref()
                    .and_then(|cid| atlas.category(cid))
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "Ninguna".to_string());
                egui::ComboBox::from_id_salt("feature_category")
                    .selected_text(selected_text)
                    .show_ui(ui, |ui| {
                        if ui
                            .selectable_label(feature.category_id.is_none(), "Ninguna")
                            .clicked()
                        {
                            pending.push(FeatureEdit::SetCategory(None));
                        }
                        for category in &atlas.categories {
                            let is_selected =
                                feature.category_id.as_deref() == Some(category.id.as_str());
                            if ui.selectable_label(is_selected, &category.name).clicked() {
                                pending
                                    .push(FeatureEdit::SetCategory(Some(category.id.clone())));
                            }
                        }
                    });
            });

            ui.separator();

            let mut anchor = feature.anchor;
            let mut anchor_changed = false;
            ui.horizontal(|ui| {
                ui.label("X:");
                anchor_changed |= ui
                    .add(egui::DragValue::new(&mut anchor.x).speed(1.0))
                    .changed();
                ui.label("Y:");
                anchor_changed |= ui
                    .add(egui::DragValue::new(&mut anchor.y).speed(1.0))
                    .changed();
            });
            if anchor_changed {
                pending.push(FeatureEdit::Move(anchor));
            }

            ui.separator();

            match feature.region {
                Region::Circle { tolerance } => {
                    let mut tolerance = tolerance;
                    ui.horizontal(|ui| {
                        ui.label("Tolerancia:");
                        if ui
                            .add(
                                egui::DragValue::new(&mut tolerance)
                                    .range(1.0..=300.0)
                                    .speed(1.0)
                                    .suffix(" px"),
                            )
                            .changed()
                        {
                            pending.push(FeatureEdit::SetTolerance(tolerance));
                        }
                    });

                    if ui.button("Convertir en rectángulo").clicked() {
                        pending.push(FeatureEdit::SetZone {
                            width: 100.0,
                            height: 40.0,
                        });
                    }
                }
                Region::Rect {
                    width,
                    height,
                    rotation_degrees,
                    ..
                } => {
                    let mut width = width;
                    let mut height = height;
                    let mut zone_changed = false;
                    ui.horizontal(|ui| {
                        ui.label("Ancho:");
                        zone_changed |= ui
                            .add(egui::DragValue::new(&mut width).range(1.0..=736.0).speed(1.0))
                            .changed();
                        ui.label("Alto:");
                        zone_changed |= ui
                            .add(egui::DragValue::new(&mut height).range(1.0..=523.0).speed(1.0))
                            .changed();
                    });
                    if zone_changed {
                        pending.push(FeatureEdit::SetZone { width, height });
                    }

                    let mut rotation = rotation_degrees;
                    ui.horizontal(|ui| {
                        ui.label("Rotación:");
                        if ui
                            .add(
                                egui::DragValue::new(&mut rotation)
                                    .range(-180.0..=180.0)
                                    .speed(1.0)
                                    .suffix("°"),
                            )
                            .changed()
                        {
                            pending.push(FeatureEdit::SetRotation(rotation));
                        }
                    });

                    if ui.button("Convertir en círculo").clicked() {
                        pending.push(FeatureEdit::ClearZone);
                    }
                }
            }

            ui.separator();

            if ui.button("Eliminar (Supr)").clicked() {
                should_delete = true;
            }
        });

    for edit in pending {
        edit_events.write(FeatureEditRequest {
            id: id.clone(),
            edit,
        });
    }
    if should_delete {
        selected.id = None;
        delete_events.write(DeleteFeatureRequest { id });
    }

    Ok(())
}
