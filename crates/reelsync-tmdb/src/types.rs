//! TMDB API response types.
//!
//! One struct per endpoint payload, deserialized strictly at the boundary so
//! the rest of the pipeline never probes loosely-typed maps. Movie and TV
//! payloads differ in a few field names (`title`/`name`,
//! `release_date`/`first_air_date`); serde aliases fold both shapes into one
//! type.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// discover
// ---------------------------------------------------------------------------

/// One page from the `discover/{movie,tv}` endpoint. An empty `results`
/// array signals exhaustion.
#[derive(Debug, Deserialize)]
pub struct DiscoverPage {
    pub page: i32,
    #[serde(default)]
    pub results: Vec<ListItem>,
    #[serde(default)]
    pub total_pages: i32,
    #[serde(default)]
    pub total_results: i64,
}

/// A single list entry from a discover page.
#[derive(Debug, Clone, Deserialize)]
pub struct ListItem {
    pub id: i64,
    /// `title` for movies, `name` for TV.
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    /// `release_date` for movies, `first_air_date` for TV. Kept as the raw
    /// string; year derivation happens in normalization.
    #[serde(default, alias = "first_air_date")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

// ---------------------------------------------------------------------------
// details
// ---------------------------------------------------------------------------

/// Detail payload for a single title. Only the fields the list entry lacks
/// are modeled; everything else rides along in the list item.
#[derive(Debug, Default, Deserialize)]
pub struct TitleDetail {
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
}

/// A production-country entry. `iso_3166_1` is occasionally missing
/// upstream; such entries are skipped during normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductionCountry {
    #[serde(default)]
    pub iso_3166_1: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Localized detail payload, requested with an explicit `language`. Movies
/// carry `title`, TV carries `name`.
#[derive(Debug, Deserialize)]
pub struct LocalizedDetail {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl LocalizedDetail {
    /// The localized display title, whichever field the payload used.
    #[must_use]
    pub fn display_title(self) -> Option<String> {
        self.title.or(self.name)
    }
}

// ---------------------------------------------------------------------------
// images
// ---------------------------------------------------------------------------

/// The `{kind}/{id}/images` payload. Only backdrops are of interest.
#[derive(Debug, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub backdrops: Vec<RawFrame>,
}

/// A backdrop candidate before normalization.
///
/// The live API names the path `file_path`; documents ingested before the
/// frame rework used `path` or `frame_path`. All three spellings land here.
/// A frame with no resolvable path is dropped by [`crate::normalize_frames`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawFrame {
    #[serde(default, alias = "file_path", alias = "frame_path")]
    pub path: Option<String>,
    #[serde(default)]
    pub aspect_ratio: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub width: i32,
}
