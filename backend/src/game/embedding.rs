//! Text embeddings for name matching.
//!
//! Every embedding handed out by an [`Embedder`] is L2-normalized, so cosine
//! similarity reduces to a dot product.

use crate::config::EmbeddingConfig;
use crate::error::EmbedError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub type Embedding = Vec<f32>;

pub const DEFAULT_TRIGRAM_DIMENSION: usize = 512;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedError>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}

/// Scale a vector to unit length. Zero vectors are left untouched.
pub fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Cosine similarity of two normalized vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Local, deterministic embedder built from hashed character trigrams.
///
/// Text is lowercased, whitespace-collapsed and stripped of common Latin
/// diacritics before hashing, so "Pelé", "pele" and " PELE " embed identically.
#[derive(Debug, Clone)]
pub struct TrigramEmbedder {
    dimension: usize,
}

impl Default for TrigramEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGRAM_DIMENSION)
    }
}

impl TrigramEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_sync(&self, text: &str) -> Embedding {
        let folded: String = text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .flat_map(char::to_lowercase)
            .map(fold_diacritic)
            .collect();
        let padded: Vec<char> = format!(" {folded} ").chars().collect();

        let mut vector = vec![0.0; self.dimension];
        for window in padded.windows(3) {
            vector[bucket(window, self.dimension)] += 1.0;
        }
        normalize(&mut vector);
        vector
    }
}

#[async_trait]
impl Embedder for TrigramEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedError> {
        Ok(self.embed_sync(text))
    }
}

// FNV-1a over the trigram's code points
fn bucket(window: &[char], dimension: usize) -> usize {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for c in window {
        for byte in (*c as u32).to_le_bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
    }
    (hash % dimension as u64) as usize
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ı' => 'i',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' | 'ś' | 'ş' => 's',
        'ž' | 'ź' | 'ż' => 'z',
        'ğ' => 'g',
        'ł' => 'l',
        'ř' => 'r',
        'ß' => 's',
        other => other,
    }
}

/// Client for an OpenAI-compatible `/embeddings` endpoint
pub struct HttpEmbedder {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

impl HttpEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbedError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/embeddings", config.api_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedError> {
        self.embed_batch(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| EmbedError::Malformed("empty embedding list".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedError> {
        debug!(count = texts.len(), model = self.model, "Requesting embeddings");

        let mut request = self.http.post(&self.endpoint).json(&EmbeddingRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_embeddings(status, &body, texts.len())
    }
}

/// Turn an `/embeddings` response into normalized vectors in input order
fn decode_embeddings(
    status: StatusCode,
    body: &str,
    expected: usize,
) -> Result<Vec<Embedding>, EmbedError> {
    if !status.is_success() {
        return Err(EmbedError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let mut parsed: EmbeddingResponse =
        serde_json::from_str(body).map_err(|err| EmbedError::Malformed(err.to_string()))?;
    if parsed.data.len() != expected {
        return Err(EmbedError::Malformed(format!(
            "expected {expected} embeddings, got {}",
            parsed.data.len()
        )));
    }

    parsed.data.sort_by_key(|d| d.index);
    Ok(parsed
        .data
        .into_iter()
        .map(|d| {
            let mut vector = d.embedding;
            normalize(&mut vector);
            vector
        })
        .collect())
}
