// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GeoJSON feed of footprints for map layers.

use crate::models::Footprint;
use geo::{BoundingRect, MultiPoint, Point};
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, JsonValue};

/// One Point feature per footprint, in store order, with a bbox around all of them.
pub fn feature_collection(footprints: &[Footprint]) -> FeatureCollection {
    let points: Vec<Point<f64>> = footprints
        .iter()
        .map(|f| Point::new(f.lng, f.lat)) // GeoJSON is x=lng, y=lat
        .collect();

    let bbox = MultiPoint::from(points.clone())
        .bounding_rect()
        .map(|rect| vec![rect.min().x, rect.min().y, rect.max().x, rect.max().y]);

    let features = footprints
        .iter()
        .zip(points.iter())
        .map(|(footprint, point)| Feature {
            bbox: None,
            geometry: Some(Geometry::new(geojson::Value::from(point))),
            id: Some(Id::String(footprint.id.clone())),
            properties: Some(properties(footprint)),
            foreign_members: None,
        })
        .collect();

    FeatureCollection {
        bbox,
        features,
        foreign_members: None,
    }
}

fn properties(footprint: &Footprint) -> JsonObject {
    let mut props = JsonObject::new();
    props.insert("title".to_string(), JsonValue::from(footprint.title.clone()));
    props.insert(
        "description".to_string(),
        footprint
            .description
            .clone()
            .map(JsonValue::from)
            .unwrap_or(JsonValue::Null),
    );
    props.insert(
        "photo_url".to_string(),
        footprint
            .photo_url
            .clone()
            .map(JsonValue::from)
            .unwrap_or(JsonValue::Null),
    );
    props.insert(
        "visited_at".to_string(),
        JsonValue::from(footprint.visited_at.clone()),
    );
    props
}
