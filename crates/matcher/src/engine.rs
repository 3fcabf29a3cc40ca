use std::cmp::Ordering;

use catalog::Catalog;
use semantic::cosine_similarity;

use crate::types::{MatchError, RankedMatch, Ranking};

/// Upper bound on [`Ranking::runners_up`].
pub const MAX_RUNNERS_UP: usize = 2;

/// Rounds to 4 decimal places, the precision scores are shown with.
pub fn round4(value: f32) -> f32 {
    ((value as f64 * 10_000.0).round() / 10_000.0) as f32
}

/// Ranks every catalog entry against `query`.
///
/// `catalog_vectors[i]` must be the embedding of `catalog.get(i)`.
pub fn rank(
    query: &[f32],
    catalog_vectors: &[Vec<f32>],
    catalog: &Catalog,
) -> Result<Ranking, MatchError> {
    if catalog.is_empty() {
        return Err(MatchError::EmptyCatalog);
    }
    if catalog_vectors.len() != catalog.len() {
        return Err(MatchError::LengthMismatch {
            records: catalog.len(),
            vectors: catalog_vectors.len(),
        });
    }

    let mut scored = similarities(query, catalog_vectors)?;
    // Stable sort: equal scores keep catalog order, so the lowest index wins ties.
    scored.sort_by(|a, b| descending(a.1, b.1));

    let mut ranked = scored.into_iter().map(|(index, similarity)| RankedMatch {
        index,
        record: catalog.records()[index].clone(),
        similarity_score: round4(similarity),
    });
    let best = ranked.next().ok_or(MatchError::EmptyCatalog)?;
    let runners_up = ranked.take(MAX_RUNNERS_UP).collect();

    Ok(Ranking { best, runners_up })
}

fn similarities(query: &[f32], vectors: &[Vec<f32>]) -> Result<Vec<(usize, f32)>, MatchError> {
    vectors
        .iter()
        .enumerate()
        .map(|(index, vector)| {
            if vector.len() != query.len() {
                return Err(MatchError::DimensionMismatch {
                    index,
                    expected: query.len(),
                    found: vector.len(),
                });
            }
            let similarity = cosine_similarity(query, vector);
            // NaN sorts as the weakest possible match.
            Ok((index, if similarity.is_nan() { -1.0 } else { similarity }))
        })
        .collect()
}

fn descending(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
