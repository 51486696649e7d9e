//! Chat orchestration.
//!
//! Detects the user's language, forwards the work to the language model and
//! the vision service, and substitutes canned localized text when either of
//! them fails. Providers never surface errors to the conversation.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use grizzly_core::{
    detect_language, i18n,
    message::{AssistantReply, ChatMessage, TranslationOptions, ANALYZE_IMAGE_PROMPT},
    responses,
    traits::{ImageAnnotator, LanguageModel},
    SupportedLanguage,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Encode image bytes as a `data:` URL for the multimodal model.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Produces assistant replies for user input.
pub struct ChatService {
    model: Arc<dyn LanguageModel>,
    vision: Arc<dyn ImageAnnotator>,
}

impl ChatService {
    pub fn new(model: Arc<dyn LanguageModel>, vision: Arc<dyn ImageAnnotator>) -> Self {
        Self { model, vision }
    }

    /// Greeting for a fresh conversation.
    pub fn welcome(&self, lang: SupportedLanguage) -> AssistantReply {
        reply(lang, responses::welcome_message(lang), false)
    }

    /// Reply to a text message: translate it into the other supported
    /// language, or fall back to a random canned reply.
    pub async fn reply_to_text(&self, text: &str) -> AssistantReply {
        let lang = detect_language(text);
        let options =
            TranslationOptions::new(Some(lang.name().to_string()), lang.opposite().name());
        debug!("chat: detected {lang}, translating to {}", lang.opposite());

        match self.model.translate(text, &options).await {
            Ok(translated) if !translated.trim().is_empty() => reply(lang, translated, false),
            Ok(_) => {
                warn!("chat: {} returned an empty translation", self.model.name());
                reply(lang, responses::random_response(lang), true)
            }
            Err(e) => {
                warn!("chat: translation failed: {e}");
                reply(lang, responses::random_response(lang), true)
            }
        }
    }

    /// Reply to an uploaded image in the conversation language.
    ///
    /// Prefers the model's description, then a summary of the vision
    /// labels, then the image-received message.
    pub async fn reply_to_image(
        &self,
        image: &[u8],
        mime: &str,
        lang: SupportedLanguage,
    ) -> AssistantReply {
        let url = data_url(mime, image);
        let (description, analysis) = tokio::join!(
            self.model.analyze_image(&url, ANALYZE_IMAGE_PROMPT),
            self.vision.analyze(image),
        );

        match description {
            Ok(text) if !text.trim().is_empty() => return reply(lang, text, false),
            Ok(_) => warn!("chat: {} returned an empty description", self.model.name()),
            Err(e) => warn!("chat: image description failed: {e}"),
        }

        match analysis {
            Ok(analysis) => {
                let labels = analysis.label_names();
                if let Some(summary) = i18n::vision_summary(lang, &labels, &analysis.text) {
                    return reply(lang, summary, false);
                }
            }
            Err(e) => warn!("chat: vision analysis failed: {e}"),
        }

        reply(lang, responses::image_received_message(lang), true)
    }

    /// Acknowledge an uploaded document.
    pub fn reply_to_document(&self, lang: SupportedLanguage) -> AssistantReply {
        reply(lang, responses::document_received_message(lang), false)
    }
}

fn reply(lang: SupportedLanguage, content: impl Into<String>, fallback: bool) -> AssistantReply {
    AssistantReply {
        message: ChatMessage::assistant(content),
        language: lang,
        fallback,
    }
}
