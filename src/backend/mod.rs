//! Recipe backend HTTP API

pub mod api;
pub mod error;
pub mod types;

pub use api::BackendClient;
pub use types::{RecipeId, RecipeSummary};
