//! TMDB API client and payload normalization for the reelsync catalog.

mod client;
mod error;
mod normalize;
mod retry;
mod types;

pub use client::{DiscoverQuery, TmdbClient};
pub use error::TmdbError;
pub use normalize::{extract_year, normalize_frames, normalize_title, ANIMATION_GENRE_ID};
pub use types::{
    DiscoverPage, ListItem, LocalizedDetail, ProductionCountry, RawFrame, TitleDetail,
};
