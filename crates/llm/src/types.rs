//! Provider identification.

use pravah_core::config::canonical_provider;

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Gemini,
    Ollama,
    Mock,
}

impl ProviderType {
    /// Parse provider type from string, accepting the names config accepts.
    pub fn parse(s: &str) -> Option<Self> {
        match canonical_provider(s)? {
            "gemini" => Some(Self::Gemini),
            "ollama" => Some(Self::Ollama),
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }

    /// Whether the provider needs an API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::Gemini)
    }
}
