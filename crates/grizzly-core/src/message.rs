use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::language::SupportedLanguage;

/// Prompt sent with an uploaded image for a general description.
pub const ANALYZE_IMAGE_PROMPT: &str =
    "Describe what you see in this image with details about objects, scene, and any text visible.";

/// Prompt asking the model to OCR an image and translate the result.
pub fn extract_and_translate_prompt(target_language: &str) -> String {
    format!(
        "Extract all text from this image and translate it to {target_language}. \
         Return only the translated text."
    )
}

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single entry in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// An assistant reply plus how it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantReply {
    pub message: ChatMessage,
    /// Language of the user's message (and of any canned text).
    pub language: SupportedLanguage,
    /// True when the reply is canned text substituted for a failed or empty
    /// provider response.
    pub fallback: bool,
}

/// Parameters for a text translation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    pub target_language: String,
    /// Replaces the default translator system prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl TranslationOptions {
    pub fn new(source_language: Option<String>, target_language: impl Into<String>) -> Self {
        Self {
            source_language,
            target_language: target_language.into(),
            system: None,
        }
    }

    /// System prompt for the translation request.
    pub fn system_prompt(&self) -> String {
        if let Some(ref system) = self.system {
            return system.clone();
        }
        let from = match self.source_language.as_deref() {
            Some(src) if !src.trim().is_empty() => format!("from {src} "),
            _ => String::new(),
        };
        format!(
            "You are a helpful translator that accurately translates text {from}to {}. \
             Provide only the translation without explanations.",
            self.target_language
        )
    }
}

/// A label detected in an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelAnnotation {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: f32,
}

/// An object localized in an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectAnnotation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: f32,
}

/// A detected face and its expression likelihoods (`VERY_UNLIKELY` .. `VERY_LIKELY`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceAnnotation {
    #[serde(default)]
    pub detection_confidence: f32,
    #[serde(default)]
    pub joy_likelihood: String,
    #[serde(default)]
    pub sorrow_likelihood: String,
    #[serde(default)]
    pub anger_likelihood: String,
    #[serde(default)]
    pub surprise_likelihood: String,
}

/// Combined result of label, object, face, and text detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisionAnalysis {
    pub labels: Vec<LabelAnnotation>,
    pub objects: Vec<ObjectAnnotation>,
    pub faces: Vec<FaceAnnotation>,
    /// Full detected text, empty when none.
    pub text: String,
}

impl VisionAnalysis {
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.description.clone()).collect()
    }
}
