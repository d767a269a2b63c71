//! Shared types for backend communication

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Name prefix the backend gives to suggestions it could not parse
pub const UNPROCESSED_PREFIX: &str = "Receita não processada";

/// Recipe identifier as issued by the backend.
///
/// The backend sends string ids (`"recipe_0"`), but numeric ids are accepted
/// too and kept in their decimal form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecipeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => RecipeId(s),
            Raw::Number(n) => RecipeId(n.to_string()),
        })
    }
}

/// One suggested recipe
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub ingredients_text: String,
    #[serde(default)]
    pub instructions_text: String,
    /// Unparsed model output, only present on unprocessed entries
    #[serde(default)]
    pub raw_text: Option<String>,
}

impl RecipeSummary {
    /// Whether the backend flagged this entry as unprocessed
    pub fn is_unprocessed(&self) -> bool {
        self.name.starts_with(UNPROCESSED_PREFIX)
    }
}

#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub ingredients: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub recipes: Vec<RecipeSummary>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AudioResponse {
    pub audio_url: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionRequest<'a> {
    pub question: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswerResponse {
    pub answer: Option<String>,
    pub error: Option<String>,
}

/// Body shape of non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}
