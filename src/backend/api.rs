//! HTTP client for the recipe backend API

use std::time::Duration;

use reqwest::{Client, Response, Url};

use super::error::ApiError;
use super::types::{
    AnswerResponse, AudioResponse, QuestionRequest, RecipeId, SearchRequest, SearchResponse,
};

/// Client for communicating with the recipe backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Client with a per-request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the backend for recipes using the given ingredients
    pub async fn search_recipes(&self, ingredients: &str) -> Result<SearchResponse, ApiError> {
        let url = format!("{}/get_recipes", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&SearchRequest { ingredients })
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Request narration of a recipe's instructions
    pub async fn recipe_audio(&self, recipe_id: &RecipeId) -> Result<AudioResponse, ApiError> {
        let url = format!("{}/get_recipe_audio/{}", self.base_url, recipe_id);
        let response = self.client.get(&url).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Send a follow-up question about a recipe
    pub async fn ask_question(
        &self,
        recipe_id: &RecipeId,
        question: &str,
    ) -> Result<AnswerResponse, ApiError> {
        let url = format!("{}/ask_question/{}", self.base_url, recipe_id);
        let response = self
            .client
            .post(&url)
            .json(&QuestionRequest { question })
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Download the audio file an `audio_url` points at
    pub async fn download_audio(&self, audio_url: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.resolve(audio_url)?;
        let response = self.client.get(url).send().await?;
        let bytes = Self::check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Resolve a possibly relative reference (e.g. `/static/audio/x.mp3`)
    pub fn resolve(&self, reference: &str) -> Result<Url, ApiError> {
        let base = Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        base.join(reference)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", reference, e)))
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), &body))
    }
}
