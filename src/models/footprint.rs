// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Footprint model: a pin a user dropped on the map.

use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Maximum title length accepted from the popup editor.
pub const MAX_TITLE_LEN: u64 = 100;
/// Maximum description length accepted from the popup editor.
pub const MAX_DESCRIPTION_LEN: u64 = 2000;

/// Stored footprint row (`footprints` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Footprint {
    /// Backend-assigned id
    pub id: String,
    /// Owner (auth user id)
    pub user_id: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    pub title: String,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    /// When the place was visited (ISO 8601)
    pub visited_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Footprint {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// A map position as delivered by the map widget's click callback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Coordinates {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

impl Coordinates {
    /// Check the position is a real point on the globe.
    pub fn check(&self) -> Result<(), String> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err("coordinates must be finite numbers".to_string());
        }
        self.validate().map_err(|e| e.to_string())
    }
}

/// A footprint that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct FootprintDraft {
    pub user_id: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[validate(length(min = 1, max = MAX_TITLE_LEN))]
    pub title: String,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub visited_at: String,
}

/// Partial update of a footprint. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FootprintPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = MAX_TITLE_LEN))]
    pub title: Option<String>,
    /// `Some(None)` clears the description (sent as `null`).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    #[validate(length(max = MAX_DESCRIPTION_LEN))]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visited_at: Option<String>,
}

impl FootprintPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.photo_url.is_none()
            && self.visited_at.is_none()
    }

    /// Apply the set fields to `footprint` in place.
    pub fn apply_to(&self, footprint: &mut Footprint) {
        if let Some(title) = &self.title {
            footprint.title = title.clone();
        }
        if let Some(description) = &self.description {
            footprint.description = description.clone();
        }
        if let Some(photo_url) = &self.photo_url {
            footprint.photo_url = Some(photo_url.clone());
        }
        if let Some(visited_at) = &self.visited_at {
            footprint.visited_at = visited_at.clone();
        }
    }
}

/// A field that is present is `Some`, even when its value is `null`.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Footprint {
        Footprint {
            id: "fp-1".to_string(),
            user_id: "user-1".to_string(),
            lat: 35.6762,
            lng: 139.6503,
            title: "Pin 1".to_string(),
            description: None,
            photo_url: None,
            visited_at: "2026-01-01T00:00:00Z".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_coordinates_range() {
        assert!(Coordinates { lat: 35.0, lng: 139.0 }.check().is_ok());
        assert!(Coordinates { lat: 90.0, lng: -180.0 }.check().is_ok());
        assert!(Coordinates { lat: 90.5, lng: 0.0 }.check().is_err());
        assert!(Coordinates { lat: 0.0, lng: 180.1 }.check().is_err());
        assert!(Coordinates {
            lat: f64::NAN,
            lng: 0.0
        }
        .check()
        .is_err());
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let mut footprint = sample();
        let patch = FootprintPatch {
            description: Some(Some("Shibuya crossing".to_string())),
            ..Default::default()
        };

        patch.apply_to(&mut footprint);

        assert_eq!(footprint.title, "Pin 1");
        assert_eq!(footprint.description.as_deref(), Some("Shibuya crossing"));
    }

    #[test]
    fn test_patch_rejects_empty_title() {
        let patch = FootprintPatch {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
        assert!(FootprintPatch::default().is_empty());
    }

    #[test]
    fn test_patch_null_description_clears() {
        let mut footprint = sample();
        footprint.description = Some("Old note".to_string());

        let patch: FootprintPatch =
            serde_json::from_value(serde_json::json!({ "description": null })).unwrap();
        assert_eq!(patch.description, Some(None));
        assert!(!patch.is_empty());

        patch.apply_to(&mut footprint);
        assert_eq!(footprint.description, None);

        let untouched: FootprintPatch =
            serde_json::from_value(serde_json::json!({ "title": "x" })).unwrap();
        assert_eq!(untouched.description, None);
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({ "description": null })
        );
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = FootprintPatch {
            title: Some("Tokyo Tower".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "Tokyo Tower" }));
    }
}
