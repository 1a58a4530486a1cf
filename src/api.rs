//! Thin authenticated wrapper around the recipe REST API.
//!
//! Every endpoint answers with the same envelope:
//! `{ "status": "success" | "error", "data": ..., "message": ... }`.
//! On success the `data` payload is returned; on error the server's
//! `message` becomes the display string of [`ApiError::Server`].

use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with `status: "error"`. Shown to the user verbatim.
    #[error("{0}")]
    Server(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from server")]
    BadPayload,

    #[error("Could not read image file: {0}")]
    Image(std::io::Error),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    data: Option<T>,
    message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// A recipe record as the API returns it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// An image file selected for upload, validated by the form beforehand.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttachment {
    pub path: PathBuf,
    pub content_type: String,
    pub file_name: String,
}

/// Payload assembled by the create/edit dialog, sent as multipart form data.
#[derive(Debug, Clone, Default)]
pub struct RecipeSubmission {
    pub title: String,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub image: Option<ImageAttachment>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<String>,
}

impl ApiClient {
    /// The cookie store carries the session issued by `/users/login`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: Arc::new(base_url.trim_end_matches('/').to_string()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<serde_json::Value, ApiError> {
        let resp = self.http.post(self.url("/users/login")).json(req).send().await?;
        read_data(resp).await
    }

    pub async fn signup(&self, req: &SignupRequest) -> Result<serde_json::Value, ApiError> {
        let resp = self.http.post(self.url("/users/signup")).json(req).send().await?;
        read_data(resp).await
    }

    pub async fn all_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let resp = self.http.get(self.url("/recipes/all")).send().await?;
        read_data(resp).await
    }

    pub async fn my_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let resp = self.http.get(self.url("/recipes/current")).send().await?;
        read_data(resp).await
    }

    pub async fn create_recipe(&self, sub: &RecipeSubmission) -> Result<Recipe, ApiError> {
        let form = submission_form(sub, None).await?;
        let resp = self
            .http
            .post(self.url("/recipes/create"))
            .multipart(form)
            .send()
            .await?;
        read_data(resp).await
    }

    pub async fn update_recipe(&self, id: &str, sub: &RecipeSubmission) -> Result<Recipe, ApiError> {
        let form = submission_form(sub, Some(id)).await?;
        let resp = self
            .http
            .patch(self.url(&format!("/recipes/update/{id}")))
            .multipart(form)
            .send()
            .await?;
        read_data(resp).await
    }

    pub async fn delete_recipe(&self, id: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.url(&format!("/recipes/delete/{id}")))
            .send()
            .await?;
        read_status(resp).await
    }

    /// Fetch a recipe photo by its absolute URL. Images come back as raw
    /// bytes, not wrapped in the envelope.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let resp = self.http.get(url).send().await?.error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }

    pub async fn generate_recipe(&self, ingredients: &[String]) -> Result<Recipe, ApiError> {
        let body = serde_json::json!({ "ingredients": ingredients });
        let resp = self
            .http
            .post(self.url("/recipes/generate"))
            .json(&body)
            .send()
            .await?;
        read_data(resp).await
    }
}

/// Build the multipart body: plain fields, repeated `tags[]`/`ingredients[]`,
/// and the image under the `image` key the server expects.
async fn submission_form(
    sub: &RecipeSubmission,
    id: Option<&str>,
) -> Result<multipart::Form, ApiError> {
    let mut form = multipart::Form::new()
        .text("title", sub.title.clone())
        .text("instructions", sub.instructions.clone());
    for tag in &sub.tags {
        form = form.text("tags[]", tag.clone());
    }
    for ing in &sub.ingredients {
        form = form.text("ingredients[]", ing.clone());
    }
    if let Some(id) = id {
        form = form.text("_id", id.to_string());
    }
    if let Some(image) = &sub.image {
        let bytes = tokio::fs::read(&image.path).await.map_err(ApiError::Image)?;
        let part = multipart::Part::bytes(bytes)
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        form = form.part("image", part);
    }
    Ok(form)
}

/// Parse the envelope and return `data`. The body is parsed even for non-2xx
/// responses, since the server reports failures inside the envelope.
async fn read_data<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp.text().await?;
    match parse_envelope::<T>(&body) {
        Ok(env) if env.status == "success" => env.data.ok_or(ApiError::BadPayload),
        Ok(env) => Err(ApiError::Server(envelope_message(env.message, status))),
        Err(_) => Err(ApiError::BadPayload),
    }
}

/// Like [`read_data`] for endpoints that answer with `{status}` only.
async fn read_status(resp: reqwest::Response) -> Result<(), ApiError> {
    let status = resp.status();
    let body = resp.text().await?;
    match parse_envelope::<serde_json::Value>(&body) {
        Ok(env) if env.status == "success" => Ok(()),
        Ok(env) => Err(ApiError::Server(envelope_message(env.message, status))),
        Err(_) => Err(ApiError::BadPayload),
    }
}

fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<Envelope<T>, serde_json::Error> {
    serde_json::from_str(body)
}

fn envelope_message(message: Option<String>, status: reqwest::StatusCode) -> String {
    message.unwrap_or_else(|| format!("Request failed ({status})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_yields_data() {
        let env: Envelope<Vec<Recipe>> = parse_envelope(
            r#"{"status":"success","data":[{"_id":"r1","title":"Pancakes","tags":["breakfast"],"ingredients":["eggs","flour"],"instructions":"Mix.","imageUrl":"http://x/p.jpg"}]}"#,
        )
        .unwrap();
        assert_eq!(env.status, "success");
        let recipes = env.data.unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].id, "r1");
        assert_eq!(recipes[0].title, "Pancakes");
        assert_eq!(recipes[0].image_url.as_deref(), Some("http://x/p.jpg"));
    }

    #[test]
    fn error_envelope_carries_server_message() {
        let env: Envelope<serde_json::Value> =
            parse_envelope(r#"{"status":"error","message":"Invalid credentials"}"#).unwrap();
        assert_eq!(env.status, "error");
        assert!(env.data.is_none());
        assert_eq!(env.message.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn malformed_body_is_rejected() {
        assert!(parse_envelope::<serde_json::Value>("<html>oops</html>").is_err());
    }

    #[test]
    fn recipe_fields_default_when_missing() {
        let env: Envelope<Recipe> =
            parse_envelope(r#"{"status":"success","data":{"_id":"r2","title":"Toast"}}"#).unwrap();
        let recipe = env.data.unwrap();
        assert!(recipe.tags.is_empty());
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.image_url.is_none());
    }

    #[test]
    fn missing_message_falls_back_to_status_line() {
        let msg = envelope_message(None, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(msg.contains("500"));
    }
}
