// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Turns a click on the map into a footprint draft.

use crate::error::FootprintError;
use crate::models::{Coordinates, FootprintDraft, Session};
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use validator::Validate;

/// Builds drafts with a placeholder title (`Pin <n>`) at the clicked position.
#[derive(Debug, Clone)]
pub struct MapClickAdapter {
    title_prefix: String,
}

impl Default for MapClickAdapter {
    fn default() -> Self {
        Self {
            title_prefix: "Pin".to_string(),
        }
    }
}

impl MapClickAdapter {
    pub fn with_title_prefix(prefix: impl Into<String>) -> Self {
        Self {
            title_prefix: prefix.into(),
        }
    }

    /// Draft for a click at `at`, given how many pins are already on the map.
    ///
    /// The coordinates are copied exactly; nothing is rounded or snapped.
    pub fn draft(
        &self,
        session: &Session,
        at: Coordinates,
        pins_on_map: usize,
        now: DateTime<Utc>,
    ) -> Result<FootprintDraft, FootprintError> {
        at.check().map_err(FootprintError::Invalid)?;

        let draft = FootprintDraft {
            user_id: session.user_id.clone(),
            lat: at.lat,
            lng: at.lng,
            title: format!("{} {}", self.title_prefix, pins_on_map + 1),
            description: None,
            photo_url: None,
            visited_at: format_utc_rfc3339(now),
        };

        draft
            .validate()
            .map_err(|e| FootprintError::Invalid(e.to_string()))?;
        Ok(draft)
    }
}
