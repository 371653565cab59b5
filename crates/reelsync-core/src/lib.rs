use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod frames;

pub use app_config::{AppConfig, Environment};
pub use catalog::CatalogTitle;
pub use config::{load_app_config, load_app_config_from_env};
pub use frames::{select_representative, FrameCandidate};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingEnvVar(String),
    #[error("environment variable {var} has an invalid value: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Content kind of a catalog record. Together with the TMDB id it forms the
/// record identity `(tmdb_id, kind)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Tv,
}

impl ContentKind {
    /// The value stored in the `kind` column and used as the TMDB URL segment.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Tv => "tv",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(ContentKind::Movie),
            "tv" => Ok(ContentKind::Tv),
            other => Err(format!("unknown content kind '{other}' (expected movie|tv)")),
        }
    }
}

/// The ranking dimension a crawl is ordered by. Determines the upstream sort
/// directive and which per-record sync timestamp an upsert stamps. It does
/// not participate in cursor identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingDimension {
    Popularity,
    VoteCount,
}

impl RankingDimension {
    /// The `sort_by` query value the TMDB discover endpoint expects.
    #[must_use]
    pub fn as_sort_param(self) -> &'static str {
        match self {
            RankingDimension::Popularity => "popularity.desc",
            RankingDimension::VoteCount => "vote_count.desc",
        }
    }
}

impl fmt::Display for RankingDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingDimension::Popularity => f.write_str("popularity"),
            RankingDimension::VoteCount => f.write_str("vote_count"),
        }
    }
}

impl FromStr for RankingDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popularity" | "popularity.desc" => Ok(RankingDimension::Popularity),
            "vote_count" | "vote_count.desc" => Ok(RankingDimension::VoteCount),
            other => Err(format!(
                "unknown ranking dimension '{other}' (expected popularity|vote_count)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_kind_round_trips_through_str() {
        assert_eq!("movie".parse::<ContentKind>().unwrap(), ContentKind::Movie);
        assert_eq!("tv".parse::<ContentKind>().unwrap(), ContentKind::Tv);
        assert_eq!(ContentKind::Movie.as_str(), "movie");
        assert!("series".parse::<ContentKind>().is_err());
    }

    #[test]
    fn ranking_dimension_accepts_bare_and_desc_forms() {
        assert_eq!(
            "popularity".parse::<RankingDimension>().unwrap(),
            RankingDimension::Popularity
        );
        assert_eq!(
            "vote_count.desc".parse::<RankingDimension>().unwrap(),
            RankingDimension::VoteCount
        );
        assert!("rating".parse::<RankingDimension>().is_err());
    }

    #[test]
    fn ranking_dimension_sort_params_match_tmdb() {
        assert_eq!(
            RankingDimension::Popularity.as_sort_param(),
            "popularity.desc"
        );
        assert_eq!(
            RankingDimension::VoteCount.as_sort_param(),
            "vote_count.desc"
        );
    }
}
