//! # grizzly-core
//!
//! Language detection, localized content, configuration, and error handling
//! for the Grizzly assistant.

pub mod config;
pub mod error;
pub mod i18n;
pub mod language;
pub mod languages;
pub mod message;
pub mod responses;
pub mod traits;

pub use language::{detect_language, SupportedLanguage};
