//! Format helpers for strings with interpolation.

use crate::language::SupportedLanguage;

/// Chat transcript label for an uploaded image.
pub fn image_label(lang: SupportedLanguage, name: &str) -> String {
    match lang {
        SupportedLanguage::Spanish => format!("[Imagen: {name}]"),
        SupportedLanguage::English => format!("[Image: {name}]"),
    }
}

/// Chat transcript label for an uploaded document.
pub fn document_label(lang: SupportedLanguage, name: &str) -> String {
    match lang {
        SupportedLanguage::Spanish => format!("[Documento: {name}]"),
        SupportedLanguage::English => format!("[Document: {name}]"),
    }
}

/// Describe vision labels (and any detected text) in the user's language.
///
/// Returns `None` when there is nothing to say, so the caller can fall back
/// to the image-received message.
pub fn vision_summary(lang: SupportedLanguage, labels: &[String], text: &str) -> Option<String> {
    let text = text.trim();
    if labels.is_empty() && text.is_empty() {
        return None;
    }

    let joined = labels
        .iter()
        .take(5)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = match lang {
        SupportedLanguage::Spanish => format!("Veo lo siguiente en tu imagen: {joined}."),
        SupportedLanguage::English => format!("I see the following in your image: {joined}."),
    };
    if !text.is_empty() {
        let found = match lang {
            SupportedLanguage::Spanish => format!(" También encontré este texto: \"{text}\""),
            SupportedLanguage::English => format!(" I also found this text: \"{text}\""),
        };
        out.push_str(&found);
    }
    Some(out)
}
