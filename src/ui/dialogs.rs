use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use bevy_egui::{egui, EguiContexts};
use futures_lite::future;
use std::path::PathBuf;

use crate::atlas::{
    AsyncAtlasOperation, AtlasLoadError, AtlasSaveError, ExportAtlasRequest, LoadAtlasRequest,
};
use crate::config::ConfigResetNotification;

/// Pending native file dialogs for atlas import/export.
#[derive(Resource, Default)]
pub struct ImportExportState {
    pub request_import: bool,
    pub request_export: bool,
    pub pending_import: Option<Task<Option<PathBuf>>>,
    pub pending_export: Option<Task<Option<PathBuf>>>,
}

impl ImportExportState {
    pub fn any_pending(&self) -> bool {
        self.pending_import.is_some() || self.pending_export.is_some()
    }
}

/// Spawn the native pickers on request, poll them, and forward the chosen
/// path into the atlas load/export pipeline.
pub fn import_export_system(
    mut state: ResMut<ImportExportState>,
    async_op: Res<AsyncAtlasOperation>,
    mut load_events: MessageWriter<LoadAtlasRequest>,
    mut export_events: MessageWriter<ExportAtlasRequest>,
) {
    if let Some(ref mut task) = state.pending_import
        && let Some(result) = future::block_on(future::poll_once(task))
    {
        state.pending_import = None;
        if let Some(path) = result {
            load_events.write(LoadAtlasRequest { path: Some(path) });
        }
    }

    if let Some(ref mut task) = state.pending_export
        && let Some(result) = future::block_on(future::poll_once(task))
    {
        state.pending_export = None;
        if let Some(path) = result {
            export_events.write(ExportAtlasRequest { path });
        }
    }

    if state.request_import {
        state.request_import = false;
        if state.pending_import.is_none() && !async_op.is_busy() {
            let task_pool = AsyncComputeTaskPool::get();
            state.pending_import = Some(task_pool.spawn(async {
                rfd::AsyncFileDialog::new()
                    .set_title("Importar atlas")
                    .add_filter("Atlas JSON", &["json"])
                    .pick_file()
                    .await
                    .map(|h| h.path().to_path_buf())
            }));
        }
    }

    if state.request_export {
        state.request_export = false;
        if state.pending_export.is_none() && !async_op.is_busy() {
            let task_pool = AsyncComputeTaskPool::get();
            state.pending_export = Some(task_pool.spawn(async {
                rfd::AsyncFileDialog::new()
                    .set_title("Exportar atlas")
                    .add_filter("Atlas JSON", &["json"])
                    .set_file_name("atlas.json")
                    .save_file()
                    .await
                    .map(|h| h.path().to_path_buf())
            }));
        }
    }
}

/// Dismissable error dialogs for failed atlas saves and loads.
pub fn atlas_error_dialogs_ui(
    mut contexts: EguiContexts,
    mut save_error: ResMut<AtlasSaveError>,
    mut load_error: ResMut<AtlasLoadError>,
) -> Result {
    let mut dismiss_save = false;
    if let Some(ref error) = save_error.message {
        egui::Window::new("Error al guardar")
            .collapsible(false)
            .resizable(true)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(contexts.ctx_mut()?, |ui| {
                egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                    ui.colored_label(egui::Color32::RED, error);
                });
                if ui.button("Cerrar").clicked() {
                    dismiss_save = true;
                }
            });
    }
    if dismiss_save {
        save_error.message = None;
    }

    let mut dismiss_load = false;
    if let Some(ref error) = load_error.message {
        egui::Window::new("Error al cargar")
            .collapsible(false)
            .resizable(true)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(contexts.ctx_mut()?, |ui| {
                egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                    ui.colored_label(egui::Color32::RED, error);
                });
                if ui.button("Cerrar").clicked() {
                    dismiss_load = true;
                }
            });
    }
    if dismiss_load {
        load_error.message = None;
    }

    Ok(())
}

/// Modal shown while an atlas save or load is in flight.
pub fn async_operation_modal_ui(
    mut contexts: EguiContexts,
    async_op: Res<AsyncAtlasOperation>,
) -> Result {
    if !async_op.is_busy() {
        return Ok(());
    }

    let message = if async_op.is_saving {
        "Guardando atlas..."
    } else {
        "Cargando atlas..."
    };

    egui::Window::new("Un momento")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(message);
            });
        });

    Ok(())
}

/// One-time notice that a corrupt config file was replaced with defaults.
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    egui::Window::new("Configuración restablecida")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("El archivo de configuración no se pudo leer y se ha restablecido.");
            if let Some(ref reason) = notification.reason {
                ui.label(egui::RichText::new(reason).weak().small());
            }
            if ui.button("Aceptar").clicked() {
                notification.show = false;
            }
        });

    Ok(())
}
