//! # grizzly-providers
//!
//! External AI service clients for Grizzly.

pub mod google_vision;
pub mod huggingface;
