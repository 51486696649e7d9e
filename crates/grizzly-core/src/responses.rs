//! Canned assistant replies for a detected language.

use rand::Rng;

use crate::i18n::{self, MessageKind};
use crate::language::SupportedLanguage;

/// Greeting shown when a conversation starts.
pub fn welcome_message(lang: SupportedLanguage) -> &'static str {
    i18n::t(MessageKind::Welcome, lang)
}

/// A fallback reply chosen uniformly at random (with replacement).
pub fn random_response(lang: SupportedLanguage) -> &'static str {
    random_response_with(&mut rand::thread_rng(), lang)
}

/// Same as [`random_response`], drawing from the given generator.
pub fn random_response_with<R: Rng + ?Sized>(rng: &mut R, lang: SupportedLanguage) -> &'static str {
    let index = rng.gen_range(0..i18n::variant_count());
    i18n::variant(index, lang).unwrap_or_else(|| i18n::t(MessageKind::RandomResponse, lang))
}

pub fn image_received_message(lang: SupportedLanguage) -> &'static str {
    i18n::t(MessageKind::ImageReceived, lang)
}

pub fn document_received_message(lang: SupportedLanguage) -> &'static str {
    i18n::t(MessageKind::DocumentReceived, lang)
}

pub fn error_message(lang: SupportedLanguage) -> &'static str {
    i18n::t(MessageKind::Error, lang)
}
