//! Startup selection of the generation backend.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tracing::{info, warn};

use strategos_core::GenerationBackend;
use strategos_settings::{read_secret, ChatSettings, GenerationSettings, LlmProviderKind};

use crate::gemini::GeminiBackend;
use crate::openai::OpenAiBackend;

/// Model and sampling parameters for one backend instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Sampling {
    pub model: String,
    pub temperature: f64,
    pub max_output_tokens: Option<u32>,
    pub timeout: Duration,
}

impl Sampling {
    pub fn for_directive(settings: &GenerationSettings) -> Self {
        Self {
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    pub fn for_chat(generation: &GenerationSettings, chat: &ChatSettings) -> Self {
        Self {
            model: chat.model.clone().unwrap_or_else(|| generation.model.clone()),
            temperature: chat.temperature,
            max_output_tokens: chat.max_output_tokens,
            timeout: Duration::from_secs(chat.timeout_secs),
        }
    }
}

/// Build the configured backend, reading its API key from the environment.
///
/// Returns `None` when the provider is `none` or its key is missing; callers
/// then fall back to placeholder output.
pub fn build_backend(
    settings: &GenerationSettings,
    sampling: Sampling,
) -> Option<Arc<dyn GenerationBackend>> {
    let api_key = read_secret(&settings.key_env());
    build_backend_with_key(settings, sampling, api_key)
}

pub fn build_backend_with_key(
    settings: &GenerationSettings,
    sampling: Sampling,
    api_key: Option<SecretString>,
) -> Option<Arc<dyn GenerationBackend>> {
    if settings.provider == LlmProviderKind::None {
        info!("generation backend disabled, using placeholder output");
        return None;
    }

    let Some(api_key) = api_key else {
        warn!(
            provider = ?settings.provider,
            env = ?settings.key_env(),
            "no API key found, using placeholder output"
        );
        return None;
    };

    let base_url = settings.base_url.clone();
    let backend: Arc<dyn GenerationBackend> = match settings.provider {
        LlmProviderKind::Gemini => Arc::new(GeminiBackend::new(sampling, base_url, api_key)),
        LlmProviderKind::Openai => Arc::new(OpenAiBackend::new(sampling, base_url, api_key)),
        LlmProviderKind::None => return None,
    };

    info!(backend = backend.name(), model = backend.model(), "generation backend ready");
    Some(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_sampling_inherits_generation_model() {
        let generation = GenerationSettings::default();
        let chat = ChatSettings::default();
        let sampling = Sampling::for_chat(&generation, &chat);
        assert_eq!(sampling.model, "gemini-2.5-flash");
        assert_eq!(sampling.max_output_tokens, Some(400));
        assert_eq!(sampling.timeout, Duration::from_secs(60));
    }

    #[test]
    fn chat_sampling_model_override() {
        let generation = GenerationSettings::default();
        let chat = ChatSettings {
            model: Some("gemini-2.5-pro".into()),
            ..Default::default()
        };
        assert_eq!(Sampling::for_chat(&generation, &chat).model, "gemini-2.5-pro");
    }

    #[test]
    fn missing_key_yields_none() {
        let settings = GenerationSettings::default();
        let backend = build_backend_with_key(&settings, Sampling::for_directive(&settings), None);
        assert!(backend.is_none());
    }

    #[test]
    fn none_provider_yields_none_even_with_key() {
        let settings = GenerationSettings {
            provider: LlmProviderKind::None,
            ..Default::default()
        };
        let backend = build_backend_with_key(
            &settings,
            Sampling::for_directive(&settings),
            Some(SecretString::from("k")),
        );
        assert!(backend.is_none());
    }

    #[test]
    fn provider_selects_adapter() {
        let gemini = GenerationSettings::default();
        let backend = build_backend_with_key(
            &gemini,
            Sampling::for_directive(&gemini),
            Some(SecretString::from("k")),
        )
        .unwrap();
        assert_eq!(backend.name(), "gemini");

        let openai = GenerationSettings {
            provider: LlmProviderKind::Openai,
            model: "gpt-4o-mini".into(),
            ..Default::default()
        };
        let backend = build_backend_with_key(
            &openai,
            Sampling::for_directive(&openai),
            Some(SecretString::from("k")),
        )
        .unwrap();
        assert_eq!(backend.name(), "openai");
        assert_eq!(backend.model(), "gpt-4o-mini");
    }
}
