//! The derived catalog document a sync pass hands to the store.

use serde::{Deserialize, Serialize};

use crate::frames::FrameCandidate;
use crate::ContentKind;

/// A fully derived catalog title, ready for the merge-upsert. Produced by
/// payload normalization; identity is `(tmdb_id, kind)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogTitle {
    pub tmdb_id: i64,
    pub kind: ContentKind,
    pub title: String,
    pub title_localized: Option<String>,
    pub release_date: Option<String>,
    pub popularity: f64,
    pub vote_count: i64,
    pub vote_average: f64,
    pub genre_ids: Vec<i32>,
    pub country_codes: Vec<String>,
    pub year: Option<i32>,
    pub is_animated: bool,
    pub frames: Vec<FrameCandidate>,
}
