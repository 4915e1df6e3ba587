// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod footprint;
pub mod map;
pub mod user;

pub use footprint::{Coordinates, Footprint, FootprintDraft, FootprintPatch};
pub use map::MapSettings;
pub use user::{Session, User};
