use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Category, Feature, Region};

/// The full feature/category collection, held in memory while the app runs.
#[derive(Resource, Debug, Clone, Default)]
pub struct AtlasData {
    pub features: Vec<Feature>,
    pub categories: Vec<Category>,
}

impl AtlasData {
    pub fn feature(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn feature_mut(&mut self, id: &str) -> Option<&mut Feature> {
        self.features.iter_mut().find(|f| f.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Features matching a category filter; None or empty = all features.
    pub fn filtered_features(&self, filter: Option<&str>) -> Vec<Feature> {
        match filter {
            None | Some("") => self.features.clone(),
            Some(id) => self
                .features
                .iter()
                .filter(|f| f.category_id.as_deref() == Some(id))
                .cloned()
                .collect(),
        }
    }

    /// Starter dataset for a first run without an atlas file.
    pub fn seed() -> Self {
        let cordilleras = Category {
            id: "cordilleras".to_string(),
            name: "Cordilleras".to_string(),
        };
        let circle = |id: &str, name: &str, x: f32, y: f32| Feature {
            id: id.to_string(),
            name: name.to_string(),
            category_id: Some(cordilleras.id.clone()),
            anchor: Vec2::new(x, y),
            region: Region::Circle { tolerance: 60.0 },
        };

        Self {
            features: vec![
                circle("1", "Pirineos", 490.0, 80.0),
                circle("2", "Cordillera Cantábrica", 150.0, 90.0),
                circle("3", "Sistema Ibérico", 350.0, 200.0),
                circle("4", "Sierra Morena", 220.0, 350.0),
                circle("5", "Sistemas Béticos", 300.0, 430.0),
                Feature {
                    id: "6".to_string(),
                    name: "Meseta Central".to_string(),
                    category_id: Some(cordilleras.id.clone()),
                    anchor: Vec2::new(312.0, 151.0),
                    region: Region::Rect {
                        width: 128.0,
                        height: 37.0,
                        rotation_degrees: -25.0,
                        tolerance: 43.0,
                    },
                },
            ],
            categories: vec![cordilleras],
        }
    }
}

/// One feature row in the atlas file. The row is flat: the zone columns
/// are nullable, and width+height both present is what makes a feature
/// rectangular.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedFeature {
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub categoria_id: Option<String>,
    pub x: f32,
    pub y: f32,
    pub tolerancia: f32,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub rotation: Option<f32>,
}

impl SavedFeature {
    pub fn from_feature(feature: &Feature) -> Self {
        let (tolerancia, width, height, rotation) = match feature.region {
            Region::Circle { tolerance } => (tolerance, None, None, None),
            Region::Rect {
                width,
                height,
                rotation_degrees,
                tolerance,
            } => (tolerance, Some(width), Some(height), Some(rotation_degrees)),
        };

        Self {
            id: feature.id.clone(),
            nombre: feature.name.clone(),
            categoria_id: feature.category_id.clone(),
            x: feature.anchor.x,
            y: feature.anchor.y,
            tolerancia,
            width,
            height,
            rotation,
        }
    }

    /// Normalize a wire row into the domain type. Only rows with both zone
    /// dimensions become rectangles; a half-set zone degrades to a circle,
    /// which is how the all-or-nothing zone invariant is enforced at the
    /// boundary.
    pub fn into_feature(self) -> Feature {
        let region = match (self.width, self.height) {
            (Some(width), Some(height)) => Region::Rect {
                width,
                height,
                rotation_degrees: self.rotation.unwrap_or(0.0),
                tolerance: self.tolerancia,
            },
            _ => Region::Circle {
                tolerance: self.tolerancia,
            },
        };

        Feature {
            id: self.id,
            name: self.nombre,
            category_id: self.categoria_id,
            anchor: Vec2::new(self.x, self.y),
            region,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCategory {
    pub id: String,
    pub nombre: String,
}

/// On-disk representation of the whole atlas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedAtlas {
    pub features: Vec<SavedFeature>,
    #[serde(default)]
    pub categories: Vec<SavedCategory>,
}

impl SavedAtlas {
    pub fn from_data(data: &AtlasData) -> Self {
        Self {
            features: data.features.iter().map(SavedFeature::from_feature).collect(),
            categories: data
                .categories
                .iter()
                .map(|c| SavedCategory {
                    id: c.id.clone(),
                    nombre: c.name.clone(),
                })
                .collect(),
        }
    }

    pub fn into_data(self) -> AtlasData {
        AtlasData {
            features: self.features.into_iter().map(SavedFeature::into_feature).collect(),
            categories: self
                .categories
                .into_iter()
                .map(|c| Category {
                    id: c.id,
                    name: c.nombre,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_has_known_features() {
        let data = AtlasData::seed();
        assert_eq!(data.features.len(), 6);
        assert_eq!(data.categories.len(), 1);
        let pirineos = data.feature("1").unwrap();
        assert_eq!(pirineos.name, "Pirineos");
        assert_eq!(pirineos.anchor, Vec2::new(490.0, 80.0));
    }

    #[test]
    fn test_filtered_features_no_filter_returns_all() {
        let data = AtlasData::seed();
        assert_eq!(data.filtered_features(None).len(), 6);
        assert_eq!(data.filtered_features(Some("")).len(), 6);
    }

    #[test]
    fn test_filtered_features_unknown_category_is_empty() {
        let data = AtlasData::seed();
        assert!(data.filtered_features(Some("volcanes")).is_empty());
    }

    #[test]
    fn test_saved_feature_roundtrip_circle() {
        let feature = Feature {
            id: "7".to_string(),
            name: "Teide".to_string(),
            category_id: None,
            anchor: Vec2::new(60.0, 480.0),
            region: Region::Circle { tolerance: 22.0 },
        };

        let saved = SavedFeature::from_feature(&feature);
        assert!(saved.width.is_none());
        assert!(saved.height.is_none());
        assert!(saved.rotation.is_none());
        assert_eq!(saved.into_feature(), feature);
    }

    #[test]
    fn test_saved_feature_roundtrip_rect() {
        let feature = Feature {
            id: "8".to_string(),
            name: "Valle del Ebro".to_string(),
            category_id: Some("valles".to_string()),
            anchor: Vec2::new(430.0, 140.0),
            region: Region::Rect {
                width: 150.0,
                height: 50.0,
                rotation_degrees: -35.0,
                tolerance: 43.0,
            },
        };

        let saved = SavedFeature::from_feature(&feature);
        // The wire row keeps the tolerance even while the zone is active
        assert_eq!(saved.tolerancia, 43.0);
        let restored = saved.into_feature();
        assert_eq!(restored.region, feature.region);
        assert_eq!(restored.anchor, feature.anchor);
    }

    #[test]
    fn test_half_set_zone_degrades_to_circle() {
        // A row with width but no height must not produce a partial zone
        let saved = SavedFeature {
            id: "9".to_string(),
            nombre: "Partial".to_string(),
            categoria_id: None,
            x: 10.0,
            y: 20.0,
            tolerancia: 45.0,
            width: Some(100.0),
            height: None,
            rotation: Some(30.0),
        };

        let feature = saved.into_feature();
        assert_eq!(feature.region, Region::Circle { tolerance: 45.0 });
    }

    #[test]
    fn test_rect_rotation_defaults_to_zero() {
        let saved = SavedFeature {
            id: "10".to_string(),
            nombre: "Zona".to_string(),
            categoria_id: None,
            x: 0.0,
            y: 0.0,
            tolerancia: 30.0,
            width: Some(80.0),
            height: Some(40.0),
            rotation: None,
        };

        match saved.into_feature().region {
            Region::Rect { rotation_degrees, .. } => assert_eq!(rotation_degrees, 0.0),
            other => panic!("expected rect, got {:?}", other),
        }
    }

    #[test]
    fn test_saved_atlas_json_roundtrip() {
        let data = AtlasData::seed();
        let saved = SavedAtlas::from_data(&data);
        let json = serde_json::to_string_pretty(&saved).unwrap();
        let restored: SavedAtlas = serde_json::from_str(&json).unwrap();
        let restored = restored.into_data();

        assert_eq!(restored.features, data.features);
        assert_eq!(restored.categories, data.categories);
    }

    #[test]
    fn test_atlas_without_categories_field_parses() {
        // Older atlas files had no categories array
        let json = r#"{ "features": [
            { "id": "1", "nombre": "Pirineos", "x": 490, "y": 80, "tolerancia": 60 }
        ] }"#;

        let parsed: SavedAtlas = serde_json::from_str(json).unwrap();
        let data = parsed.into_data();
        assert_eq!(data.features.len(), 1);
        assert!(data.categories.is_empty());
        assert!(data.features[0].category_id.is_none());
    }
}
