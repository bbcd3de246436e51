//! Content request resolution.
//!
//! Validation order is observable through the error returned, so the checks
//! below run in a fixed sequence: model, platform, tone, credential.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::catalog::Catalog;
use crate::credentials::CredentialStore;
use crate::error::{ProviderError, ResolveError, Result};
use crate::provider::{Generation, GenerationRequest, ProviderRegistry};

/// Default bound on a single provider call.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Incoming content-generation request.
#[derive(Clone, Deserialize)]
pub struct ContentRequest {
    /// Kind of content, e.g. "caption", "hashtag", "bio".
    pub content_type: String,
    #[serde(default)]
    pub platform: Option<String>,
    pub description: String,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// User-supplied key; overrides the server-side key when non-empty.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ContentRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentRequest")
            .field("content_type", &self.content_type)
            .field("platform", &self.platform)
            .field("description", &self.description)
            .field("tone", &self.tone)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Successful generation with derived metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentResult {
    pub result: String,
    pub character_count: usize,
    pub platform_limit: u32,
}

impl ContentResult {
    fn new(result: String, platform_limit: u32) -> Self {
        Self {
            character_count: result.chars().count(),
            result,
            platform_limit,
        }
    }
}

/// Build the prompt handed to the provider.
pub fn build_prompt(content_type: &str, description: &str) -> String {
    format!("{content_type}: {description}")
}

/// Resolves requests against immutable reference tables and dispatches to a
/// provider.
#[derive(Debug, Clone)]
pub struct ContentResolver {
    catalog: Arc<Catalog>,
    credentials: Arc<CredentialStore>,
    providers: ProviderRegistry,
    timeout: Duration,
}

impl ContentResolver {
    pub fn new(catalog: Catalog, credentials: CredentialStore, providers: ProviderRegistry) -> Self {
        Self {
            catalog: Arc::new(catalog),
            credentials: Arc::new(credentials),
            providers,
            timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    /// Override the provider call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Validate a request and generate content for it.
    #[instrument(skip_all, fields(content_type = %request.content_type))]
    pub async fn resolve(&self, request: ContentRequest) -> Result<ContentResult> {
        let catalog = &self.catalog;

        // Empty strings count as absent, same as an empty api_key.
        let platform_value = request
            .platform
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| catalog.default_platform().to_string());
        let tone_value = request
            .tone
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| catalog.default_tone().to_string());
        let model_key = request
            .model
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| catalog.default_model_key())
            .to_lowercase();

        let model = catalog.model(&model_key).ok_or(ResolveError::InvalidModel)?;
        let api_key = self
            .credentials
            .resolve(&model_key, request.api_key.as_deref());

        let platform = catalog
            .platform(&platform_value)
            .ok_or(ResolveError::InvalidPlatform)?;
        let tone = catalog.tone(&tone_value).ok_or(ResolveError::InvalidTone)?;

        let Some(api_key) = api_key else {
            return Err(ResolveError::MissingCredential {
                label: model.label.clone(),
            });
        };

        let generation = GenerationRequest {
            api_key,
            prompt: build_prompt(&request.content_type, &request.description),
            model_key: model_key.clone(),
            model_label: model.label.clone(),
            platform: platform.value.clone(),
            tone: tone.value.clone(),
        };

        let provider = self.providers.get(&model_key);
        debug!(provider = provider.name(), model = %model_key, "Dispatching generation");

        let outcome = match tokio::time::timeout(self.timeout, provider.generate(&generation)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(ProviderError::Timeout {
                secs: self.timeout.as_secs(),
            }),
        };

        match outcome {
            Ok(Generation::Text(text)) => Ok(ContentResult::new(text, platform.effective_limit())),
            Ok(Generation::UsageExceeded) => Err(ResolveError::QuotaExceeded {
                label: model.label.clone(),
            }),
            Err(e) => {
                error!(provider = provider.name(), "Error generating content: {}", e);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::catalog::{CatalogConfig, ModelDescriptor, Platform, Tone};
    use crate::provider::GenerationProvider;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        reply: Option<Generation>,
    }

    #[async_trait]
    impl GenerationProvider for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> std::result::Result<Generation, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .reply
                .clone()
                .unwrap_or_else(|| Generation::Text(format!("{}|{}", request.api_key, request.prompt))))
        }
    }

    struct Failing;

    #[async_trait]
    impl GenerationProvider for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> std::result::Result<Generation, ProviderError> {
            Err(ProviderError::Failed {
                provider: "failing".into(),
                message: "upstream exploded".into(),
            })
        }
    }

    struct Stalled;

    #[async_trait]
    impl GenerationProvider for Stalled {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> std::result::Result<Generation, ProviderError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Generation::Text("late".into()))
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(CatalogConfig {
            platforms: vec![
                Platform {
                    value: "instagram".into(),
                    label: "Instagram".into(),
                    icon_name: None,
                    description: None,
                    character_limit: Some(2200),
                },
                Platform {
                    value: "twitter".into(),
                    label: "Twitter".into(),
                    icon_name: None,
                    description: None,
                    character_limit: Some(280),
                },
                Platform {
                    value: "threads".into(),
                    label: "Threads".into(),
                    icon_name: None,
                    description: None,
                    character_limit: None,
                },
            ],
            tones: vec![
                Tone {
                    value: "engaging".into(),
                    label: "Engaging".into(),
                    description: None,
                },
                Tone {
                    value: "fun".into(),
                    label: "Fun".into(),
                    description: None,
                },
            ],
            models: vec![
                ModelDescriptor {
                    key: "gemini".into(),
                    label: "Gemini".into(),
                },
                ModelDescriptor {
                    key: "openai".into(),
                    label: "OpenAI".into(),
                },
            ],
            default_platform: Some("instagram".into()),
            default_tone: Some("engaging".into()),
        })
        .unwrap()
    }

    fn resolver_with(provider: Arc<dyn GenerationProvider>) -> ContentResolver {
        ContentResolver::new(
            catalog(),
            CredentialStore::new().with_key("gemini", "server-key"),
            ProviderRegistry::new(provider),
        )
    }

    fn request() -> ContentRequest {
        ContentRequest {
            content_type: "caption".into(),
            platform: None,
            description: "sunset photo".into(),
            tone: None,
            model: None,
            api_key: None,
        }
    }

    #[tokio::test]
    async fn test_defaults_applied() {
        let resolver = ContentResolver::new(
            catalog(),
            CredentialStore::new().with_key("gemini", "k"),
            ProviderRegistry::default(),
        );
        let result = resolver.resolve(request()).await.unwrap();
        assert_eq!(
            result.result,
            "AI-generated caption: sunset photo for instagram using Gemini (tone: engaging)"
        );
        assert_eq!(result.platform_limit, 2200);
        assert_eq!(result.character_count, result.result.chars().count());
    }

    #[tokio::test]
    async fn test_instagram_caption_request() {
        let resolver = ContentResolver::new(
            catalog(),
            CredentialStore::new().with_key("gemini", "k"),
            ProviderRegistry::default(),
        );
        let result = resolver
            .resolve(ContentRequest {
                platform: Some("instagram".into()),
                tone: Some("engaging".into()),
                model: Some("gemini".into()),
                ..request()
            })
            .await
            .unwrap();
        assert!(result.result.contains("caption: sunset photo"));
        assert_eq!(result.platform_limit, 2200);
    }

    #[tokio::test]
    async fn test_invalid_model_short_circuits() {
        let provider = Arc::new(Counting::default());
        let resolver = resolver_with(provider.clone());
        let err = resolver
            .resolve(ContentRequest {
                model: Some("unknown".into()),
                platform: Some("nope".into()),
                ..request()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidModel));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_platform_before_tone() {
        let provider = Arc::new(Counting::default());
        let resolver = resolver_with(provider.clone());
        let err = resolver
            .resolve(ContentRequest {
                platform: Some("myspace".into()),
                tone: Some("grumpy".into()),
                ..request()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidPlatform));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_tone_before_credential() {
        let provider = Arc::new(Counting::default());
        let resolver = resolver_with(provider.clone());
        let err = resolver
            .resolve(ContentRequest {
                tone: Some("grumpy".into()),
                model: Some("openai".into()),
                ..request()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidTone));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_uses_label() {
        let provider = Arc::new(Counting::default());
        let resolver = resolver_with(provider.clone());
        let err = resolver
            .resolve(ContentRequest {
                model: Some("openai".into()),
                api_key: Some(String::new()),
                ..request()
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "OpenAI API key required");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_request_key_overrides_server_key() {
        let resolver = resolver_with(Arc::new(Counting::default()));

        let result = resolver
            .resolve(ContentRequest {
                api_key: Some("user-key".into()),
                ..request()
            })
            .await
            .unwrap();
        assert_eq!(result.result, "user-key|caption: sunset photo");

        let result = resolver
            .resolve(ContentRequest {
                api_key: Some(String::new()),
                ..request()
            })
            .await
            .unwrap();
        assert_eq!(result.result, "server-key|caption: sunset photo");
    }

    #[tokio::test]
    async fn test_empty_fields_fall_back_to_defaults() {
        let resolver = ContentResolver::new(
            catalog(),
            CredentialStore::new().with_key("gemini", "k"),
            ProviderRegistry::default(),
        );
        let result = resolver
            .resolve(ContentRequest {
                platform: Some(String::new()),
                tone: Some(String::new()),
                model: Some(String::new()),
                ..request()
            })
            .await
            .unwrap();
        assert_eq!(
            result.result,
            "AI-generated caption: sunset photo for instagram using Gemini (tone: engaging)"
        );
    }

    #[tokio::test]
    async fn test_unset_default_platform_is_instagram() {
        let catalog = Catalog::new(CatalogConfig {
            platforms: vec![
                Platform {
                    value: "twitter".into(),
                    label: "Twitter".into(),
                    icon_name: None,
                    description: None,
                    character_limit: Some(280),
                },
                Platform {
                    value: "instagram".into(),
                    label: "Instagram".into(),
                    icon_name: None,
                    description: None,
                    character_limit: Some(2200),
                },
            ],
            tones: vec![Tone {
                value: "engaging".into(),
                label: "Engaging".into(),
                description: None,
            }],
            models: vec![ModelDescriptor {
                key: "gemini".into(),
                label: "Gemini".into(),
            }],
            default_platform: None,
            default_tone: None,
        })
        .unwrap();
        let resolver = ContentResolver::new(
            catalog,
            CredentialStore::new().with_key("gemini", "k"),
            ProviderRegistry::default(),
        );
        let result = resolver.resolve(request()).await.unwrap();
        assert!(result.result.ends_with("for instagram using Gemini (tone: engaging)"));
        assert_eq!(result.platform_limit, 2200);
    }

    #[tokio::test]
    async fn test_model_key_is_lowercased() {
        let resolver = resolver_with(Arc::new(Counting::default()));
        let result = resolver
            .resolve(ContentRequest {
                model: Some("GEMINI".into()),
                ..request()
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_platform_limit_fallback() {
        let resolver = resolver_with(Arc::new(Counting::default()));
        let threads = resolver
            .resolve(ContentRequest {
                platform: Some("threads".into()),
                ..request()
            })
            .await
            .unwrap();
        assert_eq!(threads.platform_limit, 2200);

        let twitter = resolver
            .resolve(ContentRequest {
                platform: Some("twitter".into()),
                ..request()
            })
            .await
            .unwrap();
        assert_eq!(twitter.platform_limit, 280);
    }

    #[tokio::test]
    async fn test_character_count_counts_chars() {
        let resolver = resolver_with(Arc::new(Counting {
            calls: AtomicUsize::new(0),
            reply: Some(Generation::Text("héllo 🌅".into())),
        }));
        let result = resolver.resolve(request()).await.unwrap();
        assert_eq!(result.character_count, 7);
    }

    #[tokio::test]
    async fn test_usage_exceeded() {
        let resolver = resolver_with(Arc::new(Counting {
            calls: AtomicUsize::new(0),
            reply: Some(Generation::UsageExceeded),
        }));
        let err = resolver.resolve(request()).await.unwrap_err();
        assert!(matches!(err, ResolveError::QuotaExceeded { ref label } if label == "Gemini"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_internal() {
        let resolver = resolver_with(Arc::new(Failing));
        let err = resolver.resolve(request()).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate content");
        assert!(err.detail().contains("upstream exploded"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_timeout_is_internal() {
        let resolver = resolver_with(Arc::new(Stalled)).with_timeout(Duration::from_secs(2));
        let err = resolver.resolve(request()).await.unwrap_err();
        assert!(matches!(err, ResolveError::Internal(_)));
        assert!(err.detail().contains("timed out"));
    }

    #[test]
    fn test_build_prompt() {
        assert_eq!(build_prompt("bio", "chef in Lyon"), "bio: chef in Lyon");
    }

    #[test]
    fn test_request_deserialize_optional_fields() {
        let req: ContentRequest =
            serde_json::from_str(r#"{"content_type":"hashtag","description":"coffee"}"#).unwrap();
        assert!(req.platform.is_none());
        assert!(req.model.is_none());
        assert!(req.api_key.is_none());

        let req: ContentRequest = serde_json::from_str(
            r#"{"content_type":"bio","description":"x","api_key":"sk-private"}"#,
        )
        .unwrap();
        assert_eq!(req.api_key.as_deref(), Some("sk-private"));
        assert!(!format!("{req:?}").contains("sk-private"));
    }
}
