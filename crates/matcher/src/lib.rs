//! # Ambiance Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` picks the catalog entries whose atmosphere embedding is closest
//! to a query embedding. It knows nothing about models or HTTP: callers hand
//! it a query vector, the catalog, and one precomputed vector per catalog
//! record (same order).
//!
//! ## Core Types
//!
//! - [`Ranking`]: the best match plus up to two runners-up.
//! - [`RankedMatch`]: catalog index, the record, and its cosine similarity
//!   rounded to four decimals.
//! - [`MatchError`]: empty catalog or misaligned inputs.
//!
//! ## Ranking rules
//!
//! - Similarity is cosine similarity over the raw vectors.
//! - The best match is the highest similarity; on ties the lowest index wins.
//! - Runners-up are the next entries in descending similarity order (ties
//!   again by index), at most [`MAX_RUNNERS_UP`].
//! - There is no minimum score: a non-empty catalog always yields a best match.
//!
//! ## Example Usage
//!
//! ```
//! use catalog::Catalog;
//! use matcher::rank;
//!
//! let catalog = Catalog::builtin();
//! let vectors: Vec<Vec<f32>> = (0..catalog.len())
//!     .map(|i| if i == 1 { vec![1.0, 0.0] } else { vec![0.0, 1.0] })
//!     .collect();
//!
//! let ranking = rank(&[0.9, 0.1], &vectors, &catalog).expect("aligned inputs");
//! assert_eq!(ranking.best.index, 1);
//! assert_eq!(ranking.runners_up.len(), 2);
//! ```

mod engine;
mod types;

pub use crate::engine::{rank, round4, MAX_RUNNERS_UP};
pub use crate::types::{MatchError, RankedMatch, Ranking};
