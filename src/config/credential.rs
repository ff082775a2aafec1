// ABOUTME: Reasoning-provider credential classification
// ABOUTME: Distinguishes configured keys from empty values and template placeholders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::credentials::PLACEHOLDER_PREFIXES;
use std::fmt;

/// State of the reasoning-provider credential after reading the environment
///
/// Only [`LlmCredential::Configured`] allows the coach to call the provider. The other
/// two variants both mean "not configured" and are kept apart for startup diagnostics.
#[derive(Clone, PartialEq, Eq)]
pub enum LlmCredential {
    /// A usable API key
    Configured(String),
    /// Variable unset or blank
    Missing,
    /// A template value left in place (`ta_cle...`, `your_...`, or the variable name itself)
    Placeholder,
}

impl LlmCredential {
    /// Classify a raw environment value read from `variable`
    #[must_use]
    pub fn classify(raw: Option<&str>, variable: &str) -> Self {
        let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
            return Self::Missing;
        };

        let lowered = value.to_lowercase();
        if value == variable
            || PLACEHOLDER_PREFIXES
                .iter()
                .any(|prefix| lowered.starts_with(prefix))
        {
            return Self::Placeholder;
        }

        Self::Configured(value.to_owned())
    }

    /// True when the provider may be called
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }

    /// The API key, when configured
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        match self {
            Self::Configured(key) => Some(key),
            Self::Missing | Self::Placeholder => None,
        }
    }
}

impl fmt::Debug for LlmCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured(_) => f.write_str("Configured(<redacted>)"),
            Self::Missing => f.write_str("Missing"),
            Self::Placeholder => f.write_str("Placeholder"),
        }
    }
}

impl fmt::Display for LlmCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured(_) => f.write_str("configured"),
            Self::Missing => f.write_str("missing"),
            Self::Placeholder => f.write_str("placeholder"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAR: &str = "OPENAI_API_KEY";

    #[test]
    fn test_missing_and_blank_values() {
        assert_eq!(LlmCredential::classify(None, VAR), LlmCredential::Missing);
        assert_eq!(LlmCredential::classify(Some(""), VAR), LlmCredential::Missing);
        assert_eq!(
            LlmCredential::classify(Some("   "), VAR),
            LlmCredential::Missing
        );
    }

    #[test]
    fn test_placeholder_values() {
        for raw in ["ta_cle_ici", "TA_CLE", "your_api_key", "OPENAI_API_KEY", "<key>"] {
            assert_eq!(
                LlmCredential::classify(Some(raw), VAR),
                LlmCredential::Placeholder,
                "{raw} should be a placeholder"
            );
        }
    }

    #[test]
    fn test_configured_key_is_trimmed() {
        let credential = LlmCredential::classify(Some("  sk-live-123 \n"), VAR);
        assert!(credential.is_configured());
        assert_eq!(credential.api_key(), Some("sk-live-123"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let credential = LlmCredential::Configured("sk-secret".to_owned());
        assert!(!format!("{credential:?}").contains("sk-secret"));
    }
}
