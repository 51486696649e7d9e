use crate::{
    error::GrizzlyError,
    message::{TranslationOptions, VisionAnalysis},
};
use async_trait::async_trait;

/// Hosted multimodal language model used for translation and image prompting.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether credentials are configured.
    fn is_configured(&self) -> bool;

    /// Translate `text` according to `options`.
    async fn translate(&self, text: &str, options: &TranslationOptions)
        -> Result<String, GrizzlyError>;

    /// Answer `prompt` about an image given as a URL or `data:` URL.
    async fn analyze_image(&self, image_url: &str, prompt: &str) -> Result<String, GrizzlyError>;
}

/// Image annotation service: labels, objects, faces and OCR.
#[async_trait]
pub trait ImageAnnotator: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether credentials are configured.
    fn is_configured(&self) -> bool;

    /// Run every detection feature on the image bytes.
    async fn analyze(&self, image: &[u8]) -> Result<VisionAnalysis, GrizzlyError>;

    /// Text detection only. Empty string when no text is found.
    async fn detect_text(&self, image: &[u8]) -> Result<String, GrizzlyError> {
        Ok(self.analyze(image).await?.text)
    }
}
