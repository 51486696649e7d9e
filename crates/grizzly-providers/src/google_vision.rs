//! Google Cloud Vision provider.
//!
//! Calls the `images:annotate` REST endpoint. Auth via the `x-goog-api-key`
//! header, so the key never appears in URLs or request errors.
//! All detection features are requested in one call.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use grizzly_core::{
    config::GoogleVisionConfig,
    error::GrizzlyError,
    message::{FaceAnnotation, LabelAnnotation, ObjectAnnotation, VisionAnalysis},
    traits::ImageAnnotator,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const LABEL_DETECTION: &str = "LABEL_DETECTION";
const OBJECT_LOCALIZATION: &str = "OBJECT_LOCALIZATION";
const FACE_DETECTION: &str = "FACE_DETECTION";
const TEXT_DETECTION: &str = "TEXT_DETECTION";

/// Google Cloud Vision client.
pub struct GoogleVisionProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleVisionProvider {
    /// Create from config values.
    pub fn from_config(cfg: &GoogleVisionConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("google-vision: falling back to default http client: {e}");
                reqwest::Client::new()
            });
        Self {
            client,
            base_url: cfg.base_url.clone(),
            api_key: cfg.api_key.clone(),
        }
    }

    async fn annotate(
        &self,
        image: &[u8],
        features: &[&'static str],
    ) -> Result<AnnotateImageResponse, GrizzlyError> {
        if self.api_key.is_empty() {
            return Err(GrizzlyError::Provider(
                "google-vision: no API key configured".to_string(),
            ));
        }

        let base = self.base_url.trim_end_matches('/');
        debug!(
            "google-vision: POST {base}/images:annotate features={features:?} bytes={}",
            image.len()
        );
        let url = format!("{base}/images:annotate");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(image, features))
            .send()
            .await
            .map_err(|e| {
                GrizzlyError::Provider(format!("google-vision request failed: {}", e.without_url()))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(GrizzlyError::Provider(format!(
                "google-vision returned {status}: {text}"
            )));
        }

        let parsed: BatchAnnotateResponse = resp.json().await.map_err(|e| {
            GrizzlyError::Provider(format!("google-vision: failed to parse response: {e}"))
        })?;

        first_response(parsed)
    }
}

#[derive(Serialize)]
pub(crate) struct BatchAnnotateRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Serialize)]
pub(crate) struct AnnotateImageRequest {
    pub image: ImageContent,
    pub features: Vec<Feature>,
}

#[derive(Serialize)]
pub(crate) struct ImageContent {
    pub content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub max_results: u32,
}

#[derive(Deserialize)]
pub(crate) struct BatchAnnotateResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnnotateImageResponse {
    #[serde(default)]
    pub label_annotations: Vec<LabelAnnotation>,
    #[serde(default)]
    pub localized_object_annotations: Vec<ObjectAnnotation>,
    #[serde(default)]
    pub face_annotations: Vec<FaceAnnotation>,
    #[serde(default)]
    pub text_annotations: Vec<TextAnnotation>,
    pub error: Option<ApiStatus>,
}

#[derive(Deserialize)]
pub(crate) struct TextAnnotation {
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
pub(crate) struct ApiStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

pub(crate) fn build_request(image: &[u8], features: &[&'static str]) -> BatchAnnotateRequest {
    BatchAnnotateRequest {
        requests: vec![AnnotateImageRequest {
            image: ImageContent {
                content: BASE64.encode(image),
            },
            features: features
                .iter()
                .map(|&kind| Feature {
                    kind,
                    max_results: 10,
                })
                .collect(),
        }],
    }
}

fn first_response(parsed: BatchAnnotateResponse) -> Result<AnnotateImageResponse, GrizzlyError> {
    let resp = parsed.responses.into_iter().next().unwrap_or_default();
    if let Some(status) = resp.error.as_ref() {
        return Err(GrizzlyError::Provider(format!(
            "google-vision error {}: {}",
            status.code, status.message
        )));
    }
    Ok(resp)
}

impl AnnotateImageResponse {
    /// The first text annotation holds the full detected text.
    fn full_text(&self) -> String {
        self.text_annotations
            .first()
            .map(|t| t.description.clone())
            .unwrap_or_default()
    }

    fn into_analysis(self) -> VisionAnalysis {
        let text = self.full_text();
        VisionAnalysis {
            labels: self.label_annotations,
            objects: self.localized_object_annotations,
            faces: self.face_annotations,
            text,
        }
    }
}

#[async_trait]
impl ImageAnnotator for GoogleVisionProvider {
    fn name(&self) -> &str {
        "google-vision"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn analyze(&self, image: &[u8]) -> Result<VisionAnalysis, GrizzlyError> {
        let resp = self
            .annotate(
                image,
                &[
                    LABEL_DETECTION,
                    OBJECT_LOCALIZATION,
                    FACE_DETECTION,
                    TEXT_DETECTION,
                ],
            )
            .await?;
        Ok(resp.into_analysis())
    }

    async fn detect_text(&self, image: &[u8]) -> Result<String, GrizzlyError> {
        let resp = self.annotate(image, &[TEXT_DETECTION]).await?;
        Ok(resp.full_text())
    }
}
