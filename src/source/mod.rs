//! Sources of builds to browse.
//!
//! # Modules
//!
//! - `backend`: The [`BuildSource`] trait
//! - `buildkite`: Live Buildkite REST API client
//! - `json`: Saved API response on disk
//! - `models`: API wire types and their conversion to [`Build`](crate::domain::Build)

pub mod backend;
pub mod buildkite;
pub mod json;
pub mod models;

pub use backend::BuildSource;
pub use buildkite::BuildkiteClient;
pub use json::JsonFileSource;
pub use models::{ApiBuild, ApiCreator, ApiPipeline};
