//! The scoring core: coordinate normalization, placement evaluation, and
//! the session state machine, plus the systems that tie them to the atlas.

pub mod evaluate;
mod normalize;
mod session;

pub use evaluate::{evaluate, HitResult};
pub use normalize::{
    canonical_rotation_to_world, canonical_to_world, normalize, world_to_canonical, MapSurface,
    SurfaceRect,
};
pub use session::{
    Completion, GameSession, PlacementOutcome, PlacementRecord, SessionPhase,
};

use bevy::prelude::*;

use crate::atlas::AtlasData;
use crate::config::AppConfig;

/// The category filter applied to new play sessions. None = all features.
#[derive(Resource, Default)]
pub struct SessionFilter {
    pub category_id: Option<String>,
}

/// Message: (re)start the play session from the current atlas and filter.
#[derive(Message)]
pub struct StartSessionRequest;

/// Message: the session just finished. Read by UI for the final banner.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCompleted {
    pub score: u32,
    pub perfect: bool,
}

/// Pick up the category filter that was active when the app last closed.
fn restore_session_filter(config: Res<AppConfig>, mut filter: ResMut<SessionFilter>) {
    filter.category_id = config.data.last_category_filter.clone();
}

/// Snapshot the filtered feature set and start a fresh session over it.
fn handle_start_session(
    mut events: MessageReader<StartSessionRequest>,
    atlas: Res<AtlasData>,
    filter: Res<SessionFilter>,
    mut session: ResMut<GameSession>,
) {
    // Multiple requests in one frame collapse into a single restart
    if events.read().next().is_some() {
        let features = atlas.filtered_features(filter.category_id.as_deref());
        info!(
            "Starting session with {} features (filter: {:?})",
            features.len(),
            filter.category_id
        );
        session.start(features);
    }
    events.clear();
}

/// Forward the session's one-shot completion signal as a message.
fn emit_completion(
    mut session: ResMut<GameSession>,
    mut completed: MessageWriter<SessionCompleted>,
) {
    if let Some(completion) = session.take_completion() {
        info!(
            "Session complete: score {} ({})",
            completion.score,
            if completion.perfect { "perfect" } else { "with misses" }
        );
        completed.write(SessionCompleted {
            score: completion.score,
            perfect: completion.perfect,
        });
    }
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameSession>()
            .init_resource::<MapSurface>()
            .init_resource::<SessionFilter>()
            .add_message::<StartSessionRequest>()
            .add_message::<SessionCompleted>()
            .add_systems(
                Startup,
                restore_session_filter.after(crate::config::ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    handle_start_session.run_if(on_message::<StartSessionRequest>),
                    emit_completion,
                ),
            );
    }
}
