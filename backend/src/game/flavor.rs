//! Best-effort restyling of outgoing messages through a chat model.
//!
//! Rewriting never blocks a turn: failures and timeouts fall back to the
//! original text, and successful rewrites are kept in a bounded LRU cache.

use crate::config::RewriteConfig;
use crate::error::RewriteError;
use async_trait::async_trait;
use lru::LruCache;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

pub const FORMATTER_PROMPT: &str = "\
You are a message formatter for a football guessing game.

IMPORTANT:
- You do NOT control the game.
- You do NOT start new games.
- You do NOT choose players.
- You do NOT repeat rules unless explicitly asked.
- You do NOT invent career paths or facts.

Your ONLY job:
- Rewrite the message you receive in a friendly, game-like tone.
- NEVER add new information.
- NEVER remove important information and give the full CareerPath of the player.
- NEVER reveal the player's name unless it is already present in the message.

If the message contains:
- \"Correct\" or \"Bravo\": congratulate briefly.
- \"Wrong\": encourage the user briefly.
- A hint: present it clearly.
- \"Game over\": be polite and ask if they want to play again.

Be concise. No emoji spam. No explanations.";

const DEFAULT_TEMPERATURE: f32 = 0.7;

#[async_trait]
pub trait Rewriter: Send + Sync {
    async fn rewrite(&self, text: &str) -> Result<String, RewriteError>;
}

/// Rewriter backed by an OpenAI-compatible `/chat/completions` endpoint
pub struct ChatRewriter {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl ChatRewriter {
    pub fn new(config: &RewriteConfig) -> Result<Self, RewriteError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.api_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: DEFAULT_TEMPERATURE,
        })
    }
}

#[async_trait]
impl Rewriter for ChatRewriter {
    async fn rewrite(&self, text: &str) -> Result<String, RewriteError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: FORMATTER_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        decode_reply(status, &body)
    }
}

/// Extract the first choice's trimmed content from a `/chat/completions` response
fn decode_reply(status: StatusCode, body: &str) -> Result<String, RewriteError> {
    if !status.is_success() {
        return Err(RewriteError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let parsed: ChatResponse = serde_json::from_str(body)?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(RewriteError::Empty)
}

/// Renders outgoing text through an optional [`Rewriter`]
pub struct FlavorService {
    rewriter: Option<Arc<dyn Rewriter>>,
    cache: Mutex<LruCache<String, String>>,
    timeout: Duration,
}

impl FlavorService {
    pub fn new(rewriter: Arc<dyn Rewriter>, timeout: Duration, cache_size: usize) -> Self {
        Self {
            rewriter: Some(rewriter),
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(cache_size).unwrap_or(NonZeroUsize::MIN),
            )),
            timeout,
        }
    }

    /// Pass every message through untouched
    pub fn disabled() -> Self {
        Self {
            rewriter: None,
            cache: Mutex::new(LruCache::new(NonZeroUsize::MIN)),
            timeout: Duration::ZERO,
        }
    }

    pub async fn render(&self, text: &str) -> String {
        let Some(rewriter) = &self.rewriter else {
            return text.to_string();
        };

        let key = text.trim().to_string();
        if let Some(hit) = self.cached(&key) {
            debug!("Rewrite cache hit");
            return hit;
        }

        let result = match tokio::time::timeout(self.timeout, rewriter.rewrite(text)).await {
            Ok(result) => result,
            Err(_) => Err(RewriteError::Timeout(self.timeout)),
        };

        match result {
            Ok(rewritten) => {
                self.store(key, rewritten.clone());
                rewritten
            }
            Err(err) => {
                warn!(error = %err, "Rewrite failed, sending original text");
                text.to_string()
            }
        }
    }

    fn cached(&self, key: &str) -> Option<String> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(key).cloned()
    }

    fn store(&self, key: String, value: String) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.put(key, value);
    }
}
