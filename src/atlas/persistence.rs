//! Atlas persistence: async JSON save/load plus dirty tracking.
//!
//! The whole feature set lives in one JSON document. File I/O runs on the
//! IoTaskPool so a slow disk never stalls a frame; systems poll the spawned
//! tasks once per update. Authoring edits mark the atlas dirty and a
//! debounced autosave writes it back.

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use futures_lite::future;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::constants::AUTOSAVE_DEBOUNCE_SECS;
use crate::game::StartSessionRequest;

use super::atlas_data::{AtlasData, SavedAtlas};

/// Message: write the atlas to its configured location.
#[derive(Message)]
pub struct SaveAtlasRequest;

/// Message: read the atlas from disk (None = configured location).
/// Loading a missing default file seeds the starter dataset instead.
#[derive(Message)]
pub struct LoadAtlasRequest {
    pub path: Option<PathBuf>,
}

/// Message: write a copy of the atlas to an explicit path (export).
#[derive(Message)]
pub struct ExportAtlasRequest {
    pub path: PathBuf,
}

/// Tracks unsaved authoring edits and the autosave cooldown.
#[derive(Resource)]
pub struct AtlasDirtyState {
    pub is_dirty: bool,
    cooldown: Timer,
}

impl Default for AtlasDirtyState {
    fn default() -> Self {
        let mut cooldown = Timer::from_seconds(AUTOSAVE_DEBOUNCE_SECS, TimerMode::Once);
        cooldown.pause();
        Self {
            is_dirty: false,
            cooldown,
        }
    }
}

impl AtlasDirtyState {
    /// Mark the atlas dirty and restart the autosave countdown.
    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
        self.cooldown.reset();
        self.cooldown.unpause();
    }
}

/// Last save failure, shown to the user until dismissed or a save succeeds.
#[derive(Resource, Default)]
pub struct AtlasSaveError {
    pub message: Option<String>,
}

/// Last load failure, shown to the user until dismissed.
#[derive(Resource, Default)]
pub struct AtlasLoadError {
    pub message: Option<String>,
}

/// Tracks in-flight file operations so we never start overlapping ones.
#[derive(Resource, Default)]
pub struct AsyncAtlasOperation {
    pub is_saving: bool,
    pub is_loading: bool,
}

impl AsyncAtlasOperation {
    pub fn is_busy(&self) -> bool {
        self.is_saving || self.is_loading
    }
}

struct SaveResult {
    path: PathBuf,
    /// True when this save should clear the dirty flag (not an export copy)
    primary: bool,
    error: Option<String>,
}

enum LoadOutcome {
    Loaded(SavedAtlas),
    /// Default file did not exist; the starter dataset was used.
    Seeded(SavedAtlas),
    Failed(String),
}

struct LoadResult {
    path: PathBuf,
    outcome: LoadOutcome,
}

#[derive(Component)]
pub(crate) struct SaveAtlasTask(Task<SaveResult>);

#[derive(Component)]
pub(crate) struct LoadAtlasTask(Task<LoadResult>);

/// Startup: kick off the initial atlas load.
pub fn request_initial_load(mut load_events: MessageWriter<LoadAtlasRequest>) {
    load_events.write(LoadAtlasRequest { path: None });
}

fn spawn_save_task(
    commands: &mut Commands,
    data: &AtlasData,
    path: PathBuf,
    primary: bool,
) {
    let saved = SavedAtlas::from_data(data);
    let task = IoTaskPool::get().spawn(async move {
        let error = match serde_json::to_string_pretty(&saved) {
            Ok(json) => std::fs::write(&path, json)
                .err()
                .map(|e| format!("Failed to write atlas file: {}", e)),
            Err(e) => Some(format!("Failed to serialize atlas: {}", e)),
        };
        SaveResult {
            path,
            primary,
            error,
        }
    });
    commands.spawn(SaveAtlasTask(task));
}

/// Starts an async save of the atlas to its configured location.
pub fn save_atlas_system(
    mut commands: Commands,
    mut events: MessageReader<SaveAtlasRequest>,
    data: Res<AtlasData>,
    config: Res<AppConfig>,
    mut async_op: ResMut<AsyncAtlasOperation>,
) {
    for _ in events.read() {
        if async_op.is_saving {
            warn!("Atlas save already in progress");
            continue;
        }
        async_op.is_saving = true;
        spawn_save_task(&mut commands, &data, config.atlas_file(), true);
    }
}

/// Starts an async export of the atlas to a user-chosen path.
pub fn export_atlas_system(
    mut commands: Commands,
    mut events: MessageReader<ExportAtlasRequest>,
    data: Res<AtlasData>,
    mut async_op: ResMut<AsyncAtlasOperation>,
) {
    for event in events.read() {
        if async_op.is_saving {
            warn!("Atlas save already in progress");
            continue;
        }
        async_op.is_saving = true;
        spawn_save_task(&mut commands, &data, event.path.clone(), false);
    }
}

/// Polls save tasks and handles completion.
pub fn poll_save_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut SaveAtlasTask)>,
    mut async_op: ResMut<AsyncAtlasOperation>,
    mut dirty_state: ResMut<AtlasDirtyState>,
    mut save_error: ResMut<AtlasSaveError>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(result) = future::block_on(future::poll_once(&mut task.0)) {
            async_op.is_saving = false;

            match result.error {
                None => {
                    info!("Atlas saved to {:?}", result.path);
                    save_error.message = None;
                    if result.primary {
                        dirty_state.is_dirty = false;
                    }
                }
                Some(error) => {
                    error!("{}", error);
                    save_error.message = Some(error);
                }
            }

            commands.entity(entity).despawn();
        }
    }
}

/// Starts an async load of the atlas.
pub fn load_atlas_system(
    mut commands: Commands,
    mut events: MessageReader<LoadAtlasRequest>,
    config: Res<AppConfig>,
    mut async_op: ResMut<AsyncAtlasOperation>,
) {
    for event in events.read() {
        if async_op.is_loading {
            warn!("Atlas load already in progress");
            continue;
        }
        async_op.is_loading = true;

        let is_default = event.path.is_none();
        let path = event.path.clone().unwrap_or_else(|| config.atlas_file());

        let task = IoTaskPool::get().spawn(async move {
            let outcome = if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(json) => match serde_json::from_str::<SavedAtlas>(&json) {
                        Ok(saved) => LoadOutcome::Loaded(saved),
                        Err(e) => LoadOutcome::Failed(format!("Atlas file is corrupted: {}", e)),
                    },
                    Err(e) => LoadOutcome::Failed(format!("Could not read atlas file: {}", e)),
                }
            } else if is_default {
                LoadOutcome::Seeded(SavedAtlas::from_data(&AtlasData::seed()))
            } else {
                LoadOutcome::Failed(format!("No such file: {}", path.display()))
            };
            LoadResult { path, outcome }
        });
        commands.spawn(LoadAtlasTask(task));
    }
}

/// Polls load tasks; a finished load replaces the atlas and restarts the
/// play session so the label list matches the new data.
pub fn poll_load_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut LoadAtlasTask)>,
    mut async_op: ResMut<AsyncAtlasOperation>,
    mut data: ResMut<AtlasData>,
    mut dirty_state: ResMut<AtlasDirtyState>,
    mut load_error: ResMut<AtlasLoadError>,
    mut start_events: MessageWriter<StartSessionRequest>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(result) = future::block_on(future::poll_once(&mut task.0)) {
            async_op.is_loading = false;

            match result.outcome {
                LoadOutcome::Loaded(saved) => {
                    info!("Atlas loaded from {:?}", result.path);
                    *data = saved.into_data();
                    load_error.message = None;
                    start_events.write(StartSessionRequest);
                }
                LoadOutcome::Seeded(saved) => {
                    info!("No atlas at {:?}, seeding starter data", result.path);
                    *data = saved.into_data();
                    // Persist the seed so the next run finds a file
                    dirty_state.mark_dirty();
                    start_events.write(StartSessionRequest);
                }
                LoadOutcome::Failed(error) => {
                    error!("{}", error);
                    load_error.message = Some(error);
                }
            }

            commands.entity(entity).despawn();
        }
    }
}

/// Debounced autosave: once the atlas has been dirty and untouched for the
/// cooldown period, write it back.
pub fn autosave_system(
    time: Res<Time>,
    mut dirty_state: ResMut<AtlasDirtyState>,
    async_op: Res<AsyncAtlasOperation>,
    mut save_events: MessageWriter<SaveAtlasRequest>,
) {
    if !dirty_state.is_dirty {
        return;
    }
    dirty_state.cooldown.tick(time.delta());
    if dirty_state.cooldown.just_finished() && !async_op.is_busy() {
        save_events.write(SaveAtlasRequest);
    }
}
