//! Completion provider implementations for Slugline.
//!
//! Currently a single backend: Anthropic's native Messages API. The
//! [`from_config`] factory is the only place the rest of the system learns
//! which backend is in play; everything downstream works against
//! `CompletionProvider`.

pub mod anthropic;

pub use anthropic::AnthropicProvider;

use slugline_config::AppConfig;
use slugline_core::{CompletionProvider, ProviderError};
use std::sync::Arc;

/// Build the configured completion provider.
///
/// Fails with `NotConfigured` when no API key is available or the configured
/// provider kind is unknown.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn CompletionProvider>, ProviderError> {
    let api_key = config.provider.api_key.clone().ok_or_else(|| {
        ProviderError::NotConfigured(
            "no API key set; put it in ~/.slugline/config.toml or export SLUGLINE_API_KEY".into(),
        )
    })?;

    match config.provider.kind.as_str() {
        "anthropic" => {
            let mut provider = AnthropicProvider::new(api_key);
            if let Some(ref base_url) = config.provider.base_url {
                provider = provider.with_base_url(base_url);
            }
            Ok(Arc::new(provider))
        }
        other => Err(ProviderError::NotConfigured(format!(
            "unknown provider kind '{other}'"
        ))),
    }
}
