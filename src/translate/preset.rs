//! Named backend presets
//!
//! A preset is chosen once from configuration and resolved into a
//! `BackendConfig`. Credentials come from named environment variables with
//! placeholder fallbacks; the variable lookup is passed in by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder used when a credential variable is unset
pub const KEY_PLACEHOLDER: &str = "INSERT_KEY_HERE";

/// Azure OpenAI API version requested by the hosted preset
pub const AZURE_API_VERSION: &str = "2023-12-01-preview";

/// Known translation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreset {
    /// Local model served by Ollama's OpenAI-compatible endpoint
    #[default]
    Ollama,
    /// Hosted Gemini through Google's OpenAI-compatible endpoint
    Gemini,
    /// Hosted Azure OpenAI deployment
    Azure,
}

impl BackendPreset {
    /// Preset name as used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendPreset::Ollama => "ollama",
            BackendPreset::Gemini => "gemini",
            BackendPreset::Azure => "azure",
        }
    }
}

impl fmt::Display for BackendPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ollama" => Ok(BackendPreset::Ollama),
            "gemini" => Ok(BackendPreset::Gemini),
            "azure" => Ok(BackendPreset::Azure),
            other => Err(format!("unknown backend preset '{other}'")),
        }
    }
}

/// How the credential is presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>` against `{endpoint}/chat/completions`
    Bearer,
    /// `api-key: <key>` against an Azure deployment URL
    AzureApiKey {
        /// `api-version` query parameter
        api_version: String,
    },
}

/// Resolved connection settings for one backend
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL (Azure: resource endpoint)
    pub endpoint: String,
    /// Credential
    pub api_key: String,
    /// Model identifier (Azure: deployment name)
    pub model: String,
    /// Credential presentation
    pub auth: AuthScheme,
}

impl BackendConfig {
    /// Bearer-authenticated OpenAI-compatible backend
    pub fn bearer(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            auth: AuthScheme::Bearer,
        }
    }

    /// Resolve a preset, reading credentials through `lookup`
    pub fn from_preset<F>(preset: BackendPreset, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, fallback: &str| lookup(name).unwrap_or_else(|| fallback.to_string());
        match preset {
            BackendPreset::Ollama => {
                Self::bearer("http://localhost:11434/v1", "ollama", "llama3.2:3b")
            }
            BackendPreset::Gemini => Self::bearer(
                "https://generativelanguage.googleapis.com/v1beta/openai",
                var("GOOGLE_API_KEY", KEY_PLACEHOLDER),
                "gemini-1.5-flash",
            ),
            BackendPreset::Azure => Self {
                endpoint: var(
                    "AZURE_OPENAI_ENDPOINT",
                    "https://your-resource.openai.azure.com/",
                ),
                api_key: var("AZURE_OPENAI_API_KEY", KEY_PLACEHOLDER),
                model: "gpt-4o".to_string(),
                auth: AuthScheme::AzureApiKey {
                    api_version: AZURE_API_VERSION.to_string(),
                },
            },
        }
    }

    /// Resolve a preset from the process environment
    pub fn from_env(preset: BackendPreset) -> Self {
        Self::from_preset(preset, |name| std::env::var(name).ok())
    }

    /// Chat-completions URL for this backend
    pub fn completions_url(&self) -> String {
        let base = self.endpoint.trim_end_matches('/');
        match &self.auth {
            AuthScheme::Bearer => format!("{base}/chat/completions"),
            AuthScheme::AzureApiKey { api_version } => format!(
                "{base}/openai/deployments/{}/chat/completions?api-version={api_version}",
                self.model
            ),
        }
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("auth", &self.auth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_preset() {
        let config = BackendConfig::from_preset(BackendPreset::Ollama, |_| None);
        assert_eq!(config.model, "llama3.2:3b");
        assert_eq!(
            config.completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_gemini_reads_key_or_placeholder() {
        let config = BackendConfig::from_preset(BackendPreset::Gemini, |name| {
            (name == "GOOGLE_API_KEY").then(|| "AIza-test".to_string())
        });
        assert_eq!(config.api_key, "AIza-test");

        let config = BackendConfig::from_preset(BackendPreset::Gemini, |_| None);
        assert_eq!(config.api_key, KEY_PLACEHOLDER);
    }

    #[test]
    fn test_azure_deployment_url() {
        let config = BackendConfig::from_preset(BackendPreset::Azure, |name| match name {
            "AZURE_OPENAI_ENDPOINT" => Some("https://acme.openai.azure.com/".to_string()),
            _ => None,
        });
        assert_eq!(
            config.completions_url(),
            "https://acme.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2023-12-01-preview"
        );
    }

    #[test]
    fn test_preset_parsing_and_debug_redaction() {
        assert_eq!("Azure".parse::<BackendPreset>(), Ok(BackendPreset::Azure));
        assert!("openai".parse::<BackendPreset>().is_err());

        let config = BackendConfig::bearer("http://x", "secret", "m");
        assert!(!format!("{config:?}").contains("secret"));
    }
}
