use crate::config::Config;
use crate::error::FetchError;
use crate::image::SelectedImage;
use crate::model::{DishRequest, ErrorBody, PredictionResponse, RecipeResponse, RecipeResult};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

pub const RECIPE_PATH: &str = "/recipe";
pub const PREDICT_PATH: &str = "/predict_and_recipe/";

/// A lookup that will hit exactly one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Image(SelectedImage),
    DishName(String),
}

/// Which endpoint a lookup targets; picks the fallback error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Image,
    DishName,
}

impl RequestKind {
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Image => "Error retrieving recipe from image",
            Self::DishName => "Error retrieving recipe",
        }
    }
}

/// HTTP client for the prediction/recipe service.
#[derive(Debug, Clone)]
pub struct RecipeClient {
    client: Client,
    base_url: String,
}

impl RecipeClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue the single request for `lookup`.
    pub async fn fetch(&self, lookup: &Lookup) -> Result<RecipeResult, FetchError> {
        match lookup {
            Lookup::Image(image) => self.predict_and_recipe(image).await,
            Lookup::DishName(name) => self.recipe_by_name(name).await,
        }
    }

    /// `POST /recipe`. The label is the name as typed, not anything echoed
    /// back by the service.
    pub async fn recipe_by_name(&self, dish_name: &str) -> Result<RecipeResult, FetchError> {
        let url = format!("{}{}", self.base_url, RECIPE_PATH);
        tracing::debug!("Looking up recipes for {:?} at {}", dish_name, url);

        let response = self
            .client
            .post(&url)
            .json(&DishRequest { dish_name })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send recipe request: {}", e);
                e
            })?;

        let body: RecipeResponse = read_body(response, RequestKind::DishName).await?;
        Ok(RecipeResult {
            label: dish_name.to_string(),
            recipes: body.results,
        })
    }

    /// `POST /predict_and_recipe/` with the image as multipart field `image_file`.
    pub async fn predict_and_recipe(&self, image: &SelectedImage) -> Result<RecipeResult, FetchError> {
        let url = format!("{}{}", self.base_url, PREDICT_PATH);
        tracing::debug!(
            "Sending {} ({} bytes, {}) to {}",
            image.file_name,
            image.bytes.len(),
            image.mime,
            url
        );

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime)?;
        let form = Form::new().part("image_file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send prediction request: {}", e);
                e
            })?;

        let body: PredictionResponse = read_body(response, RequestKind::Image).await?;
        tracing::info!("Service predicted {:?}", body.predicted_label);
        Ok(RecipeResult {
            label: body.predicted_label,
            recipes: body.results,
        })
    }
}

async fn read_body<T: DeserializeOwned>(
    response: reqwest::Response,
    kind: RequestKind,
) -> Result<T, FetchError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message().map(str::to_string))
            .unwrap_or_else(|| kind.fallback_message().to_string());
        tracing::warn!("Recipe service error (status {}): {}", status, message);
        return Err(FetchError::Server {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&body).map_err(|e| {
        tracing::error!("Malformed response from recipe service: {}", e);
        FetchError::Decode(e)
    })
}
