//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Intrinsic pixel width of the reference map image
/// (`assets/mapa_relieve_espana_peq.jpg`). All canonical geometry is
/// expressed in this coordinate space, independent of on-screen scale.
pub const MAP_WIDTH: f32 = 736.0;

/// Intrinsic pixel height of the reference map image.
pub const MAP_HEIGHT: f32 = 523.0;

/// Points awarded for dropping a label inside its correct region.
pub const HIT_REWARD: u32 = 100;

/// Default circular tolerance radius (canonical units) for newly
/// authored features.
pub const DEFAULT_TOLERANCE: f32 = 30.0;

/// Fallback pick radius (canonical units) when selecting a feature in the
/// authoring mode by clicking near its anchor.
pub const AUTHOR_PICK_RADIUS: f32 = 12.0;

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1280.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 800.0;

/// Seconds of authoring inactivity before dirty atlas data is autosaved.
pub const AUTOSAVE_DEBOUNCE_SECS: f32 = 2.0;
