//! Centralized color theme for the application.
//!
//! This module provides all colors used for map overlays and UI accents.
//! Modify values here to change the application's color scheme.

use bevy::prelude::Color;
use bevy_egui::egui;

// ============================================================================
// Region Overlay Colors
// ============================================================================

/// Outline for correct-region overlays (study mode and "show regions")
pub const REGION_OUTLINE: Color = Color::srgba(0.13, 0.55, 0.13, 0.8);

/// Anchor dot inside a region overlay
pub const REGION_ANCHOR: Color = Color::srgb(0.13, 0.55, 0.13);

// ============================================================================
// Play Mode Colors
// ============================================================================

/// Marker for a correctly placed feature
pub const PLACED_MARKER: Color = Color::srgb(0.16, 0.65, 0.27);

/// Floating indicator that follows the cursor while a label is armed
pub const DRAG_INDICATOR: Color = Color::srgba(0.0, 0.48, 1.0, 0.9);

// ============================================================================
// Authoring Colors
// ============================================================================

/// Outline for the selected feature's region in the authoring mode
pub const AUTHOR_SELECTION: Color = Color::srgb(0.2, 0.6, 1.0);

/// Outline for unselected features' regions in the authoring mode
pub const AUTHOR_REGION: Color = Color::srgba(0.5, 0.5, 0.5, 0.6);

// ============================================================================
// UI Accent Colors (egui)
// ============================================================================

/// Label text color for failed features in the side panel
pub const FAILED_TEXT: egui::Color32 = egui::Color32::from_rgb(220, 53, 69);

/// Label text color for placed features and success banners
pub const SUCCESS_TEXT: egui::Color32 = egui::Color32::from_rgb(40, 167, 69);

/// Background for the label chips rendered over the map
pub const MAP_LABEL_BG: egui::Color32 = egui::Color32::from_rgba_premultiplied(255, 255, 255, 230);

/// Text color for label chips rendered over the map
pub const MAP_LABEL_TEXT: egui::Color32 = egui::Color32::from_rgb(20, 20, 20);
