//! The shared map view: 2D camera, the relief-map sprite, and the
//! per-frame tracking of where the map sits on screen.

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::{MAP_HEIGHT, MAP_WIDTH};
use crate::game::{canonical_to_world, MapSurface, SurfaceRect};

/// Path of the relief map image under `assets/`, the single static raster
/// asset the whole game is built around.
pub const MAP_IMAGE_PATH: &str = "mapa_relieve_espana_peq.jpg";

#[derive(Component)]
pub struct MapCamera;

#[derive(Component)]
pub struct MapSprite;

#[derive(Component)]
pub struct CameraZoom {
    pub scale: f32,
}

impl Default for CameraZoom {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        MapCamera,
        CameraZoom::default(),
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

/// Spawn the map image centered on the origin at native resolution, so
/// canonical<->world conversion stays a fixed translation + y-flip.
pub fn spawn_map(mut commands: Commands, asset_server: Res<AssetServer>) {
    let texture: Handle<Image> = asset_server.load(MAP_IMAGE_PATH);
    commands.spawn((
        Sprite {
            image: texture,
            custom_size: Some(Vec2::new(MAP_WIDTH, MAP_HEIGHT)),
            ..default()
        },
        Transform::from_translation(Vec3::new(0.0, 0.0, 0.0)),
        MapSprite,
    ));
}

/// Recompute the map's on-screen bounding rectangle each frame. Pointer
/// positions get normalized against this rect, which keeps drops correct
/// under any pan, zoom, or window resize.
pub fn update_map_surface(
    camera_query: Query<(&Camera, &GlobalTransform), With<MapCamera>>,
    mut surface: ResMut<MapSurface>,
) {
    let Ok((camera, camera_transform)) = camera_query.single() else {
        surface.rect = None;
        return;
    };

    let top_left_world = canonical_to_world(Vec2::ZERO);
    let bottom_right_world = canonical_to_world(Vec2::new(MAP_WIDTH, MAP_HEIGHT));

    let (Ok(top_left), Ok(bottom_right)) = (
        camera.world_to_viewport(camera_transform, top_left_world.extend(0.0)),
        camera.world_to_viewport(camera_transform, bottom_right_world.extend(0.0)),
    ) else {
        surface.rect = None;
        return;
    };

    surface.rect = Some(SurfaceRect {
        left: top_left.x,
        top: top_left.y,
        width: bottom_right.x - top_left.x,
        height: bottom_right.y - top_left.y,
    });
}

pub fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<bevy::input::mouse::MouseMotion>,
    mut camera_query: Query<(&mut Transform, &CameraZoom), With<MapCamera>>,
) {
    if !mouse_button.pressed(MouseButton::Middle) {
        mouse_motion.clear();
        return;
    }

    let Ok((mut transform, zoom)) = camera_query.single_mut() else {
        return;
    };

    for event in mouse_motion.read() {
        let delta = event.delta * zoom.scale;
        transform.translation.x -= delta.x;
        transform.translation.y += delta.y;
    }
}

pub fn camera_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut camera_query: Query<&mut CameraZoom, With<MapCamera>>,
) {
    let Ok(mut zoom) = camera_query.single_mut() else {
        return;
    };

    // Ignore scroll while the cursor is outside the window
    if window_query.single().is_ok_and(|w| w.cursor_position().is_none()) {
        scroll_events.clear();
        return;
    }

    for event in scroll_events.read() {
        let scroll_amount = match event.unit {
            MouseScrollUnit::Line => event.y * 0.1,
            MouseScrollUnit::Pixel => event.y * 0.001,
        };

        zoom.scale = (zoom.scale - scroll_amount).clamp(0.25, 4.0);
    }
}

pub fn apply_camera_zoom(
    mut camera_query: Query<(&CameraZoom, &mut Projection), (With<MapCamera>, Changed<CameraZoom>)>,
) {
    for (zoom, mut projection) in camera_query.iter_mut() {
        if let Projection::Orthographic(ref mut ortho) = *projection {
            ortho.scale = zoom.scale;
        }
    }
}

pub struct MapViewPlugin;

impl Plugin for MapViewPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_camera, spawn_map))
            .add_systems(
                Update,
                (camera_pan, camera_zoom, apply_camera_zoom, update_map_surface),
            );
    }
}
