//! Message-driven authoring edits to the atlas.
//!
//! All mutations flow through these request messages so the update rules
//! (zone fields change together, category deletes null their references,
//! every edit marks the atlas dirty) live in exactly one place.

use bevy::prelude::*;

use super::atlas_data::AtlasData;
use super::feature::{Category, Feature, Region};
use super::persistence::AtlasDirtyState;

/// Message: create a feature at a canonical anchor point.
#[derive(Message)]
pub struct CreateFeatureRequest {
    pub name: String,
    pub anchor: Vec2,
    pub tolerance: f32,
    pub category_id: Option<String>,
}

/// A single validated change to an existing feature.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureEdit {
    Move(Vec2),
    Rename(String),
    SetCategory(Option<String>),
    /// Circle mode only; ignored for rectangular features.
    SetTolerance(f32),
    /// Switch to (or resize) a rectangular zone. Rotation is preserved when
    /// the feature is already rectangular, otherwise starts at 0.
    SetZone { width: f32, height: f32 },
    /// Rectangular mode only; ignored for circular features.
    SetRotation(f32),
    /// Drop the zone entirely, returning to a circle of the tolerance the
    /// feature carried into rect mode. Width, height, and rotation all go
    /// away together.
    ClearZone,
}

/// Message: apply one edit to a feature.
#[derive(Message)]
pub struct FeatureEditRequest {
    pub id: String,
    pub edit: FeatureEdit,
}

/// Message: delete a feature.
#[derive(Message)]
pub struct DeleteFeatureRequest {
    pub id: String,
}

/// Message: create a category.
#[derive(Message)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// Message: delete a category. Features keep existing; their category
/// reference is nulled.
#[derive(Message)]
pub struct DeleteCategoryRequest {
    pub id: String,
}

/// Generate a fresh feature/category id: millisecond timestamp token,
/// disambiguated if two creations land in the same millisecond.
fn fresh_id(data: &AtlasData) -> String {
    let base = chrono::Utc::now().timestamp_millis().to_string();
    if data.feature(&base).is_none() && data.category(&base).is_none() {
        return base;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{}-{}", base, n);
        if data.feature(&candidate).is_none() && data.category(&candidate).is_none() {
            return candidate;
        }
        n += 1;
    }
}

/// Apply a single edit to a feature. Returns false when the edit does not
/// apply (wrong shape mode), in which case nothing changed.
fn apply_edit(feature: &mut Feature, edit: &FeatureEdit) -> bool {
    match edit {
        FeatureEdit::Move(anchor) => {
            feature.anchor = *anchor;
            true
        }
        FeatureEdit::Rename(name) => {
            if name.trim().is_empty() {
                return false;
            }
            feature.name = name.trim().to_string();
            true
        }
        FeatureEdit::SetCategory(category_id) => {
            feature.category_id = category_id.clone();
            true
        }
        FeatureEdit::SetTolerance(tolerance) => match feature.region {
            Region::Circle { .. } if *tolerance > 0.0 => {
                feature.region = Region::Circle {
                    tolerance: *tolerance,
                };
                true
            }
            _ => false,
        },
        FeatureEdit::SetZone { width, height } => {
            if *width <= 0.0 || *height <= 0.0 {
                return false;
            }
            let rotation_degrees = feature.region.rotation_degrees();
            // A circle's tolerance rides along dormant so clearing the
            // zone later restores it.
            let tolerance = feature.region.tolerance();
            feature.region = Region::Rect {
                width: *width,
                height: *height,
                rotation_degrees,
                tolerance,
            };
            true
        }
        FeatureEdit::SetRotation(degrees) => match feature.region {
            Region::Rect {
                width,
                height,
                tolerance,
                ..
            } => {
                feature.region = Region::Rect {
                    width,
                    height,
                    rotation_degrees: *degrees,
                    tolerance,
                };
                true
            }
            Region::Circle { .. } => false,
        },
        FeatureEdit::ClearZone => match feature.region {
            Region::Rect { tolerance, .. } => {
                feature.region = Region::Circle { tolerance };
                true
            }
            Region::Circle { .. } => false,
        },
    }
}

pub fn handle_create_feature(
    mut events: MessageReader<CreateFeatureRequest>,
    mut data: ResMut<AtlasData>,
    mut dirty_state: ResMut<AtlasDirtyState>,
) {
    for event in events.read() {
        let name = event.name.trim();
        if name.is_empty() || event.tolerance <= 0.0 {
            warn!("Ignoring feature creation with empty name or bad tolerance");
            continue;
        }

        let id = fresh_id(&data);
        info!("Creating feature '{}' ({}) at {:?}", name, id, event.anchor);
        data.features.push(Feature {
            id,
            name: name.to_string(),
            category_id: event.category_id.clone(),
            anchor: event.anchor,
            region: Region::Circle {
                tolerance: event.tolerance,
            },
        });
        dirty_state.mark_dirty();
    }
}

pub fn handle_feature_edits(
    mut events: MessageReader<FeatureEditRequest>,
    mut data: ResMut<AtlasData>,
    mut dirty_state: ResMut<AtlasDirtyState>,
) {
    for event in events.read() {
        let Some(feature) = data.feature_mut(&event.id) else {
            warn!("Edit for unknown feature {}", event.id);
            continue;
        };
        if apply_edit(feature, &event.edit) {
            dirty_state.mark_dirty();
        }
    }
}

pub fn handle_delete_feature(
    mut events: MessageReader<DeleteFeatureRequest>,
    mut data: ResMut<AtlasData>,
    mut dirty_state: ResMut<AtlasDirtyState>,
) {
    for event in events.read() {
        let before = data.features.len();
        data.features.retain(|f| f.id != event.id);
        if data.features.len() != before {
            info!("Deleted feature {}", event.id);
            dirty_state.mark_dirty();
        }
    }
}

pub fn handle_create_category(
    mut events: MessageReader<CreateCategoryRequest>,
    mut data: ResMut<AtlasData>,
    mut dirty_state: ResMut<AtlasDirtyState>,
) {
    for event in events.read() {
        let name = event.name.trim();
        if name.is_empty() {
            continue;
        }
        let id = fresh_id(&data);
        data.categories.push(Category {
            id,
            name: name.to_string(),
        });
        dirty_state.mark_dirty();
    }
}

pub fn handle_delete_category(
    mut events: MessageReader<DeleteCategoryRequest>,
    mut data: ResMut<AtlasData>,
    mut dirty_state: ResMut<AtlasDirtyState>,
) {
    for event in events.read() {
        let before = data.categories.len();
        data.categories.retain(|c| c.id != event.id);
        if data.categories.len() == before {
            continue;
        }

        // Set-null semantics: features outlive their category
        for feature in data.features.iter_mut() {
            if feature.category_id.as_deref() == Some(event.id.as_str()) {
                feature.category_id = None;
            }
        }
        info!("Deleted category {}", event.id);
        dirty_state.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle_feature() -> Feature {
        Feature {
            id: "f1".to_string(),
            name: "Pirineos".to_string(),
            category_id: None,
            anchor: Vec2::new(490.0, 80.0),
            region: Region::Circle { tolerance: 60.0 },
        }
    }

    fn rect_feature() -> Feature {
        Feature {
            region: Region::Rect {
                width: 100.0,
                height: 40.0,
                rotation_degrees: 15.0,
                tolerance: 43.0,
            },
            ..circle_feature()
        }
    }

    #[test]
    fn test_move_edit() {
        let mut feature = circle_feature();
        assert!(apply_edit(&mut feature, &FeatureEdit::Move(Vec2::new(10.0, 20.0))));
        assert_eq!(feature.anchor, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_rename_rejects_empty() {
        let mut feature = circle_feature();
        assert!(!apply_edit(&mut feature, &FeatureEdit::Rename("  ".to_string())));
        assert_eq!(feature.name, "Pirineos");
    }

    #[test]
    fn test_set_tolerance_only_applies_to_circles() {
        let mut feature = rect_feature();
        assert!(!apply_edit(&mut feature, &FeatureEdit::SetTolerance(25.0)));
        assert_eq!(feature.region, rect_feature().region);

        let mut feature = circle_feature();
        assert!(apply_edit(&mut feature, &FeatureEdit::SetTolerance(25.0)));
        assert_eq!(feature.region, Region::Circle { tolerance: 25.0 });
    }

    #[test]
    fn test_set_zone_converts_circle_to_rect() {
        let mut feature = circle_feature();
        assert!(apply_edit(
            &mut feature,
            &FeatureEdit::SetZone {
                width: 80.0,
                height: 30.0
            }
        ));
        assert_eq!(
            feature.region,
            Region::Rect {
                width: 80.0,
                height: 30.0,
                rotation_degrees: 0.0,
                tolerance: 60.0,
            }
        );
    }

    #[test]
    fn test_set_zone_preserves_rotation_on_resize() {
        let mut feature = rect_feature();
        assert!(apply_edit(
            &mut feature,
            &FeatureEdit::SetZone {
                width: 120.0,
                height: 50.0
            }
        ));
        assert_eq!(feature.region.rotation_degrees(), 15.0);
    }

    #[test]
    fn test_set_rotation_ignored_for_circles() {
        let mut feature = circle_feature();
        assert!(!apply_edit(&mut feature, &FeatureEdit::SetRotation(45.0)));
        assert_eq!(feature.region, Region::Circle { tolerance: 60.0 });
    }

    #[test]
    fn test_clear_zone_restores_carried_tolerance() {
        // Clearing the zone must remove width, height, and rotation in one
        // step, and the circle comes back with the tolerance the rect kept.
        let mut feature = rect_feature();
        assert!(apply_edit(&mut feature, &FeatureEdit::ClearZone));
        assert_eq!(feature.region, Region::Circle { tolerance: 43.0 });
    }

    #[test]
    fn test_clear_zone_on_circle_is_noop() {
        let mut feature = circle_feature();
        assert!(!apply_edit(&mut feature, &FeatureEdit::ClearZone));
    }

    #[test]
    fn test_set_zone_carries_circle_tolerance() {
        let mut feature = circle_feature();
        assert!(apply_edit(
            &mut feature,
            &FeatureEdit::SetZone {
                width: 80.0,
                height: 30.0
            }
        ));
        assert!(apply_edit(&mut feature, &FeatureEdit::ClearZone));
        assert_eq!(feature.region, Region::Circle { tolerance: 60.0 });
    }

    #[test]
    fn test_fresh_id_disambiguates_collisions() {
        let mut data = AtlasData::default();
        let first = fresh_id(&data);
        data.features.push(Feature {
            id: first.clone(),
            ..circle_feature()
        });
        let second = fresh_id(&data);
        assert_ne!(first, second);
    }
}
