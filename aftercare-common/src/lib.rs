//! # Aftercare Common Library
//!
//! Shared code for the aftercare services including:
//! - Tracker data model (todos, symptoms, notes)
//! - Tracker record validation (the server-side projection)
//! - Brochure content model (tagged section variants)
//! - API envelope types
//! - Backoff policy for soft-dependency connectors
//! - Configuration resolution helpers

pub mod backoff;
pub mod brochure;
pub mod config;
pub mod envelope;
pub mod error;
pub mod model;

pub use error::{Error, Result};
