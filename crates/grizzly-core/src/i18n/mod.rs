//! Internationalization: the static table of canned assistant strings.
//!
//! Uses a simple `t(kind, lang)` lookup for static strings and the helpers in
//! `format` for strings with interpolation. Every `(kind, lang)` pair has a
//! string, so lookups are total.

mod format;


pub use format::*;

use serde::{Deserialize, Serialize};

use crate::language::SupportedLanguage;

/// Which family of canned strings is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    Welcome,
    RandomResponse,
    ImageReceived,
    DocumentReceived,
    Error,
}

impl MessageKind {
    pub const ALL: [MessageKind; 5] = [
        Self::Welcome,
        Self::RandomResponse,
        Self::ImageReceived,
        Self::DocumentReceived,
        Self::Error,
    ];
}

/// Fallback replies. Index `i` is the same sentence in every language.
const RESPONSES: &[(&str, &str)] = &[
    (
        "I'm here to help! Could you provide more details?",
        "¡Estoy aquí para ayudar! ¿Podrías proporcionar más detalles?",
    ),
    (
        "That's an interesting question. Let me think about that...",
        "Esa es una pregunta interesante. Déjame pensar en eso...",
    ),
    (
        "I understand what you're asking. Here's what I can tell you...",
        "Entiendo lo que estás preguntando. Esto es lo que puedo decirte...",
    ),
    (
        "Thanks for sharing that. Is there anything specific you'd like to know?",
        "Gracias por compartir eso. ¿Hay algo específico que te gustaría saber?",
    ),
    (
        "I'd be happy to assist with that. Let me explain...",
        "Estaré encantado de ayudarte con eso. Déjame explicarte...",
    ),
];

/// Return the localized string for `kind` in `lang`.
///
/// For [`MessageKind::RandomResponse`] this is the first variant; use
/// [`variant`] or `responses::random_response` to pick among them.
pub fn t(kind: MessageKind, lang: SupportedLanguage) -> &'static str {
    use SupportedLanguage::{English, Spanish};

    match (kind, lang) {
        (MessageKind::Welcome, English) => {
            "Hello! I'm Grizzly, your AI assistant. How can I help you today?"
        }
        (MessageKind::Welcome, Spanish) => {
            "¡Hola! Soy Grizzly, tu asistente de IA. ¿Cómo puedo ayudarte hoy?"
        }
        (MessageKind::RandomResponse, _) => pick(RESPONSES[0], lang),
        (MessageKind::ImageReceived, English) => {
            "I've received your image. Let me analyze it for you..."
        }
        (MessageKind::ImageReceived, Spanish) => {
            "He recibido tu imagen. Déjame analizarla para ti..."
        }
        (MessageKind::DocumentReceived, English) => {
            "I've received your document. Let me process it and extract the information..."
        }
        (MessageKind::DocumentReceived, Spanish) => {
            "He recibido tu documento. Déjame procesarlo y extraer la información..."
        }
        (MessageKind::Error, English) => "Sorry, there was an error processing your message.",
        (MessageKind::Error, Spanish) => "Lo siento, hubo un error al procesar tu mensaje.",
    }
}

/// Number of fallback reply variants. Always at least one.
pub fn variant_count() -> usize {
    RESPONSES.len()
}

/// The fallback reply at `index`, or `None` when out of range.
pub fn variant(index: usize, lang: SupportedLanguage) -> Option<&'static str> {
    RESPONSES.get(index).map(|pair| pick(*pair, lang))
}

/// Every fallback reply for `lang`, in index order.
pub fn variants(lang: SupportedLanguage) -> impl Iterator<Item = &'static str> {
    RESPONSES.iter().map(move |pair| pick(*pair, lang))
}

fn pick(pair: (&'static str, &'static str), lang: SupportedLanguage) -> &'static str {
    match lang {
        SupportedLanguage::English => pair.0,
        SupportedLanguage::Spanish => pair.1,
    }
}
