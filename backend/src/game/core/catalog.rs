use super::player::PlayerRecord;
use crate::error::CatalogError;
use crate::game::embedding::{Embedder, Embedding};
use rand::Rng;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

const COL_NAME: &str = "Name";
const COL_CAREER_PATH: &str = "CareerPath";
const COL_COUNTRY: &str = "Country";
const COL_POSITION: &str = "Position";
const COL_NICKNAME: &str = "Nickname";
const COL_BIRTH_YEAR: &str = "BirthYear";

/// Read-only table of players with one precomputed name embedding each.
/// A catalog always holds at least one player.
pub struct Catalog {
    records: Vec<PlayerRecord>,
    embeddings: Vec<Embedding>,
    dimension: usize,
}

impl Catalog {
    /// Load a CSV catalog from disk
    pub async fn load(path: impl AsRef<Path>, embedder: &dyn Embedder) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading player catalog");
        let bytes = tokio::fs::read(path).await?;
        Self::from_reader(bytes.as_slice(), embedder).await
    }

    /// Parse CSV with a header row. `Name` and `CareerPath` are required;
    /// any other missing column reads as empty.
    pub async fn from_reader<R: Read>(reader: R, embedder: &dyn Embedder) -> Result<Self, CatalogError> {
        let records = parse_records(reader)?;
        Self::from_records(records, embedder).await
    }

    /// Build a catalog from already-parsed records, embedding every name
    pub async fn from_records(
        records: Vec<PlayerRecord>,
        embedder: &dyn Embedder,
    ) -> Result<Self, CatalogError> {
        if records.is_empty() {
            return Err(CatalogError::Empty);
        }

        let names: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
        let embeddings = embedder.embed_batch(&names).await?;

        let dimension = embeddings.first().map(Vec::len).unwrap_or_default();
        if embeddings.len() != records.len() {
            return Err(CatalogError::Embedding(crate::error::EmbedError::Malformed(
                format!("{} names but {} embeddings", records.len(), embeddings.len()),
            )));
        }
        if let Some((record, embedding)) = records
            .iter()
            .zip(&embeddings)
            .find(|(_, e)| e.len() != dimension)
        {
            return Err(CatalogError::DimensionMismatch {
                name: record.name.clone(),
                expected: dimension,
                found: embedding.len(),
            });
        }

        debug!(players = records.len(), dimension, "Catalog embeddings computed");

        Ok(Self {
            records,
            embeddings,
            dimension,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a constructed catalog
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    /// Uniform pick, with replacement across calls
    pub fn pick_random(&self) -> &PlayerRecord {
        self.pick_random_with(&mut rand::rng())
    }

    pub fn pick_random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &PlayerRecord {
        &self.records[rng.random_range(0..self.records.len())]
    }

    /// Case-insensitive exact nickname lookup. First match wins; empty nicknames never match.
    pub fn find_by_nickname(&self, text: &str) -> Option<&PlayerRecord> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.records
            .iter()
            .find(|r| r.has_nickname() && r.nickname.to_lowercase() == needle)
    }

    /// Records paired with their name embeddings, in catalog order
    pub fn entries(&self) -> impl Iterator<Item = (&PlayerRecord, &[f32])> {
        self.records
            .iter()
            .zip(self.embeddings.iter().map(Vec::as_slice))
    }
}

struct Columns {
    name: usize,
    career_path: usize,
    country: Option<usize>,
    position: Option<usize>,
    nickname: Option<usize>,
    birth_year: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, CatalogError> {
        let find = |column: &str| headers.iter().position(|h| h.trim() == column);

        Ok(Self {
            name: find(COL_NAME).ok_or(CatalogError::MissingColumn(COL_NAME))?,
            career_path: find(COL_CAREER_PATH).ok_or(CatalogError::MissingColumn(COL_CAREER_PATH))?,
            country: find(COL_COUNTRY),
            position: find(COL_POSITION),
            nickname: find(COL_NICKNAME),
            birth_year: find(COL_BIRTH_YEAR),
        })
    }
}

fn field(row: &csv::StringRecord, index: Option<usize>) -> String {
    index
        .and_then(|i| row.get(i))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn parse_birth_year(raw: &str) -> Option<u16> {
    if raw.is_empty() {
        return None;
    }
    // Spreadsheet exports sometimes write years as "1987.0"
    let year = raw.split('.').next().unwrap_or(raw);
    match year.parse() {
        Ok(year) => Some(year),
        Err(_) => {
            debug!(raw, "Ignoring unparseable birth year");
            None
        }
    }
}

fn parse_records<R: Read>(reader: R) -> Result<Vec<PlayerRecord>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(reader.headers()?)?;
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in reader.records() {
        let row = row?;
        let name = field(&row, Some(columns.name));
        if name.is_empty() {
            skipped += 1;
            continue;
        }

        records.push(PlayerRecord {
            name,
            career_path: field(&row, Some(columns.career_path)),
            position: field(&row, columns.position),
            nationality: field(&row, columns.country),
            birth_year: parse_birth_year(&field(&row, columns.birth_year)),
            nickname: field(&row, columns.nickname),
        });
    }

    if skipped > 0 {
        warn!(skipped, "Skipped catalog rows without a name");
    }

    Ok(records)
}
