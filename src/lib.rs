//! Telecom site and sector ingestion.
//!
//! Tabular files and KML documents come in through [`engine::ImportEngine`],
//! land in a [`model::SiteStore`], and go out again through [`export`] or
//! the [`thematic`] legends.

pub mod alarms;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod geo;
pub mod kml;
pub mod model;
pub mod net;
pub mod tabular;
pub mod thematic;

pub use error::{ImportError, Result};
