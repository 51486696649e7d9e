//! Mock providers shared by the chat and API tests.

use async_trait::async_trait;
use grizzly_core::{
    error::GrizzlyError,
    message::{LabelAnnotation, TranslationOptions, VisionAnalysis},
    traits::{ImageAnnotator, LanguageModel},
};
use std::sync::{Arc, Mutex};

/// A language model that returns a fixed answer (or fails) and records the
/// prompt of every call.
pub struct MockModel {
    answer: Option<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockModel {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }

    fn respond(&self, prompt: String) -> Result<String, GrizzlyError> {
        self.calls.lock().unwrap().push(prompt);
        self.answer
            .clone()
            .ok_or_else(|| GrizzlyError::Provider("mock model offline".to_string()))
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    fn name(&self) -> &str {
        "mock-model"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn translate(
        &self,
        _text: &str,
        options: &TranslationOptions,
    ) -> Result<String, GrizzlyError> {
        self.respond(options.system_prompt())
    }

    async fn analyze_image(&self, _image_url: &str, prompt: &str) -> Result<String, GrizzlyError> {
        self.respond(prompt.to_string())
    }
}

/// A vision service that returns a fixed analysis (or fails).
pub struct MockVision {
    result: Option<VisionAnalysis>,
}

impl MockVision {
    pub fn failing() -> Self {
        Self { result: None }
    }

    pub fn returning(analysis: VisionAnalysis) -> Self {
        Self {
            result: Some(analysis),
        }
    }

    pub fn with_labels(labels: &[&str]) -> Self {
        Self::returning(Self::analysis(labels))
    }

    pub fn analysis(labels: &[&str]) -> VisionAnalysis {
        VisionAnalysis {
            labels: labels
                .iter()
                .map(|l| LabelAnnotation {
                    description: l.to_string(),
                    score: 0.9,
                })
                .collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ImageAnnotator for MockVision {
    fn name(&self) -> &str {
        "mock-vision"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn analyze(&self, _image: &[u8]) -> Result<VisionAnalysis, GrizzlyError> {
        self.result
            .clone()
            .ok_or_else(|| GrizzlyError::Provider("mock vision offline".to_string()))
    }
}
