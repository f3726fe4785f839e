use super::catalog::Catalog;
use super::player::PlayerRecord;
use crate::error::EmbedError;
use crate::game::embedding::{Embedder, cosine_similarity};
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.72;
pub const DEFAULT_TOP_K: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchParams {
    /// Minimum similarity for the target to count as guessed
    pub threshold: f32,
    /// How many of the best-ranked players are checked for the target
    pub top_k: usize,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub correct: bool,
    /// Similarity in [0, 1]
    pub score: f32,
    pub matched_name: String,
}

/// A catalog player scored against a guess
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub record: &'a PlayerRecord,
    pub similarity: f32,
}

/// Decide whether `guess` names `target_name`.
///
/// A nickname hit is authoritative. Otherwise the target must appear among the
/// `top_k` most similar players with similarity at or above the threshold.
/// When it does not, the reported score and name come from the single most
/// similar player in the whole catalog, which drives "very close" feedback.
pub async fn match_guess(
    guess: &str,
    target_name: &str,
    catalog: &Catalog,
    embedder: &dyn Embedder,
    params: MatchParams,
) -> Result<MatchResult, EmbedError> {
    let normalized = guess.trim().to_lowercase();

    if let Some(record) = catalog.find_by_nickname(&normalized) {
        debug!(guess = normalized, matched = record.name, "Nickname match");
        return Ok(MatchResult {
            correct: true,
            score: 1.0,
            matched_name: record.name.clone(),
        });
    }

    let query = embedder.embed(&normalized).await?;
    if query.len() != catalog.dimension() {
        return Err(EmbedError::DimensionMismatch {
            expected: catalog.dimension(),
            found: query.len(),
        });
    }

    let ranked = rank(catalog, &query);
    Ok(evaluate(&ranked, target_name, params))
}

/// Every catalog player by descending similarity. Exact ties keep catalog order.
pub fn rank<'a>(catalog: &'a Catalog, query: &[f32]) -> Vec<Candidate<'a>> {
    let mut ranked: Vec<Candidate<'a>> = catalog
        .entries()
        .map(|(record, embedding)| Candidate {
            record,
            similarity: cosine_similarity(query, embedding),
        })
        .collect();
    ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    ranked
}

/// Apply the top-K correctness rule to an already ranked candidate list
pub fn evaluate(ranked: &[Candidate<'_>], target_name: &str, params: MatchParams) -> MatchResult {
    let target = target_name.to_lowercase();

    let hit = ranked
        .iter()
        .take(params.top_k)
        .find(|c| c.record.name.to_lowercase() == target && c.similarity >= params.threshold);

    if let Some(candidate) = hit {
        return MatchResult {
            correct: true,
            score: clamp_score(candidate.similarity),
            matched_name: candidate.record.name.clone(),
        };
    }

    match ranked.first() {
        Some(best) => MatchResult {
            correct: false,
            score: clamp_score(best.similarity),
            matched_name: best.record.name.clone(),
        },
        None => MatchResult {
            correct: false,
            score: 0.0,
            matched_name: String::new(),
        },
    }
}

fn clamp_score(similarity: f32) -> f32 {
    similarity.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::embedding::TrigramEmbedder;
    use crate::game::embedding::testing::StaticEmbedder;

    fn player(name: &str, nickname: &str) -> PlayerRecord {
        PlayerRecord {
            nickname: nickname.to_string(),
            ..PlayerRecord::new(name, "Somewhere→Elsewhere")
        }
    }

    async fn trigram_catalog() -> Catalog {
        let records = vec![
            player("Pelé", "O Rei"),
            player("Ronaldinho", "Dinho"),
            player("Zinedine Zidane", "Zizou"),
            player("Lionel Messi", ""),
            player("Thierry Henry", ""),
        ];
        Catalog::from_records(records, &TrigramEmbedder::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn nickname_match_is_correct_with_full_score() {
        let catalog = trigram_catalog().await;
        let embedder = TrigramEmbedder::default();

        for record in catalog.records().iter().filter(|r| r.has_nickname()) {
            let result = match_guess(&record.nickname, &record.name, &catalog, &embedder, MatchParams::default())
                .await
                .unwrap();

            assert!(result.correct);
            assert_eq!(result.score, 1.0);
            assert_eq!(result.matched_name, record.name);
        }
    }

    #[tokio::test]
    async fn exact_name_is_correct() {
        let catalog = trigram_catalog().await;
        let embedder = TrigramEmbedder::default();

        for record in catalog.records() {
            let guess = format!("  {}  ", record.name.to_uppercase());
            let result = match_guess(&guess, &record.name, &catalog, &embedder, MatchParams::default())
                .await
                .unwrap();

            assert!(result.correct, "{} should match itself", record.name);
            assert!(result.score >= DEFAULT_MATCH_THRESHOLD);
            assert_eq!(result.matched_name, record.name);
        }
    }

    #[tokio::test]
    async fn guess_without_diacritics_is_correct() {
        let catalog = trigram_catalog().await;
        let result = match_guess("pele", "Pelé", &catalog, &TrigramEmbedder::default(), MatchParams::default())
            .await
            .unwrap();

        assert!(result.correct);
        assert_eq!(result.matched_name, "Pelé");
    }

    #[tokio::test]
    async fn naming_another_player_is_wrong_but_reports_that_player() {
        let catalog = trigram_catalog().await;
        let result = match_guess("Lionel Messi", "Pelé", &catalog, &TrigramEmbedder::default(), MatchParams::default())
            .await
            .unwrap();

        assert!(!result.correct);
        assert_eq!(result.matched_name, "Lionel Messi");
        assert!(result.score > 0.99);
    }

    #[tokio::test]
    async fn nickname_of_another_player_is_authoritative() {
        // Nickname hits short-circuit before the target is consulted
        let catalog = trigram_catalog().await;
        let result = match_guess("zizou", "Pelé", &catalog, &TrigramEmbedder::default(), MatchParams::default())
            .await
            .unwrap();

        assert!(result.correct);
        assert_eq!(result.matched_name, "Zinedine Zidane");
    }

    #[tokio::test]
    async fn empty_guess_is_valid_and_does_not_match() {
        let catalog = trigram_catalog().await;
        let result = match_guess("", "Pelé", &catalog, &TrigramEmbedder::default(), MatchParams::default())
            .await
            .unwrap();

        assert!(!result.correct);
        assert_eq!(result.score, 0.0);
    }

    #[tokio::test]
    async fn single_player_catalog_matches_itself() {
        let embedder = TrigramEmbedder::default();
        let catalog = Catalog::from_records(vec![player("Pelé", "")], &embedder).await.unwrap();

        let result = match_guess("Pelé", "Pelé", &catalog, &embedder, MatchParams::default())
            .await
            .unwrap();
        assert!(result.correct);
        assert!((result.score - 1.0).abs() < 1e-5);
    }

    // Target scores above threshold but ranks third: not correct with top_k = 2,
    // yet the reported score comes from the best player overall.
    #[tokio::test]
    async fn correctness_uses_top_k_but_feedback_uses_best_overall() {
        let embedder = StaticEmbedder::new(
            &[
                ("Target Player", [0.75, 0.661_437_8]),
                ("Other One", [0.95, 0.312_249_9]),
                ("Other Two", [0.9, -0.435_889_9]),
                ("query", [1.0, 0.0]),
            ],
        );
        let records = vec![
            player("Target Player", ""),
            player("Other One", ""),
            player("Other Two", ""),
        ];
        let catalog = Catalog::from_records(records, &embedder).await.unwrap();

        let result = match_guess("query", "Target Player", &catalog, &embedder, MatchParams::default())
            .await
            .unwrap();
        assert!(!result.correct);
        assert_eq!(result.matched_name, "Other One");
        assert!((result.score - 0.95).abs() < 1e-4);

        let wider = MatchParams {
            top_k: 3,
            ..MatchParams::default()
        };
        let result = match_guess("query", "Target Player", &catalog, &embedder, wider)
            .await
            .unwrap();
        assert!(result.correct);
        assert_eq!(result.matched_name, "Target Player");
        assert!((result.score - 0.75).abs() < 1e-4);
    }

    #[tokio::test]
    async fn target_on_top_below_threshold_is_wrong() {
        let embedder = StaticEmbedder::new(
            &[
                ("Target Player", [0.7, 0.714_142_8]),
                ("Other One", [0.5, 0.866_025_4]),
                ("query", [1.0, 0.0]),
            ],
        );
        let records = vec![player("Target Player", ""), player("Other One", "")];
        let catalog = Catalog::from_records(records, &embedder).await.unwrap();

        let result = match_guess("query", "Target Player", &catalog, &embedder, MatchParams::default())
            .await
            .unwrap();
        assert!(!result.correct);
        assert_eq!(result.matched_name, "Target Player");
        assert!((result.score - 0.7).abs() < 1e-4);
    }

    #[tokio::test]
    async fn ties_keep_catalog_order() {
        let embedder = StaticEmbedder::new(
            &[
                ("First Twin", [1.0, 0.0]),
                ("Second Twin", [1.0, 0.0]),
                ("query", [1.0, 0.0]),
            ],
        );
        let records = vec![player("First Twin", ""), player("Second Twin", "")];
        let catalog = Catalog::from_records(records, &embedder).await.unwrap();

        let top_one = MatchParams {
            top_k: 1,
            ..MatchParams::default()
        };
        let result = match_guess("query", "Second Twin", &catalog, &embedder, top_one)
            .await
            .unwrap();
        assert!(!result.correct);
        assert_eq!(result.matched_name, "First Twin");

        let result = match_guess("query", "Second Twin", &catalog, &embedder, MatchParams::default())
            .await
            .unwrap();
        assert!(result.correct);
        assert_eq!(result.matched_name, "Second Twin");
    }

    #[tokio::test]
    async fn dimension_mismatch_is_an_error() {
        let catalog = trigram_catalog().await;
        let other = TrigramEmbedder::new(16);

        let result = match_guess("Henry", "Thierry Henry", &catalog, &other, MatchParams::default()).await;
        assert!(matches!(result, Err(EmbedError::DimensionMismatch { .. })));
    }

    #[tokio::test]
    async fn negative_similarity_is_clamped_to_zero() {
        let embedder = StaticEmbedder::new(
            &[("Target Player", [-1.0, 0.0]), ("query", [1.0, 0.0])],
        );
        let catalog = Catalog::from_records(vec![player("Target Player", "")], &embedder)
            .await
            .unwrap();

        let result = match_guess("query", "Target Player", &catalog, &embedder, MatchParams::default())
            .await
            .unwrap();
        assert!(!result.correct);
        assert_eq!(result.score, 0.0);
    }
}
