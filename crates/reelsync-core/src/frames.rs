//! Representative-frame selection.
//!
//! A record carries a list of candidate frames plus an operator-curated set
//! of excluded paths. [`select_representative`] picks the single frame used
//! to represent the record. It is re-run on every write because the excluded
//! set can change out-of-band between syncs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A single candidate frame for a catalog record.
///
/// Stored as part of the record's `frames` JSONB list. `path` is the opaque
/// TMDB image path (e.g. `"/abc.jpg"`) and is unique within a record after
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameCandidate {
    pub path: String,
    #[serde(default)]
    pub aspect_ratio: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub width: i32,
}

/// Picks the best frame not in `excluded`: highest `vote_average`, ties
/// broken by `width`. Ties beyond that keep the incoming order (stable
/// sort) but that order is not a guarantee.
///
/// Returns `None` when no candidate survives the exclusion filter.
#[must_use]
pub fn select_representative(
    candidates: &[FrameCandidate],
    excluded: &HashSet<String>,
) -> Option<String> {
    let mut valid: Vec<&FrameCandidate> = candidates
        .iter()
        .filter(|f| !f.path.is_empty() && !excluded.contains(&f.path))
        .collect();

    valid.sort_by(|a, b| {
        b.vote_average
            .total_cmp(&a.vote_average)
            .then_with(|| b.width.cmp(&a.width))
    });

    valid.first().map(|f| f.path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(path: &str, vote_average: f64, width: i32) -> FrameCandidate {
        FrameCandidate {
            path: path.to_string(),
            aspect_ratio: 1.78,
            vote_average,
            width,
        }
    }

    fn excluded(paths: &[&str]) -> HashSet<String> {
        paths.iter().map(|p| (*p).to_string()).collect()
    }

    #[test]
    fn picks_highest_vote_average() {
        let frames = vec![frame("/a.jpg", 7.5, 1920), frame("/b.jpg", 8.0, 1280)];
        let best = select_representative(&frames, &HashSet::new());
        assert_eq!(best.as_deref(), Some("/b.jpg"));
    }

    #[test]
    fn breaks_vote_ties_by_width() {
        let frames = vec![frame("/narrow.jpg", 6.0, 1280), frame("/wide.jpg", 6.0, 3840)];
        let best = select_representative(&frames, &HashSet::new());
        assert_eq!(best.as_deref(), Some("/wide.jpg"));
    }

    #[test]
    fn never_returns_an_excluded_path() {
        let frames = vec![frame("/a.jpg", 7.5, 1920), frame("/b.jpg", 8.0, 1280)];
        let best = select_representative(&frames, &excluded(&["/b.jpg"]));
        assert_eq!(best.as_deref(), Some("/a.jpg"));
    }

    #[test]
    fn returns_none_when_all_candidates_excluded() {
        let frames = vec![frame("/a.jpg", 7.5, 1920)];
        assert_eq!(select_representative(&frames, &excluded(&["/a.jpg"])), None);
    }

    #[test]
    fn returns_none_for_empty_candidate_list() {
        assert_eq!(select_representative(&[], &HashSet::new()), None);
    }

    #[test]
    fn skips_candidates_with_empty_path() {
        let frames = vec![frame("", 9.9, 4000), frame("/ok.jpg", 1.0, 100)];
        let best = select_representative(&frames, &HashSet::new());
        assert_eq!(best.as_deref(), Some("/ok.jpg"));
    }

    #[test]
    fn result_is_always_a_candidate_path() {
        let frames = vec![
            frame("/a.jpg", 3.0, 100),
            frame("/b.jpg", 2.0, 200),
            frame("/c.jpg", 1.0, 300),
        ];
        let bad = excluded(&["/a.jpg", "/c.jpg", "/not-present.jpg"]);
        let best = select_representative(&frames, &bad).unwrap();
        assert!(frames.iter().any(|f| f.path == best));
        assert!(!bad.contains(&best));
    }

    #[test]
    fn frame_candidate_serde_round_trip() {
        let f = frame("/x.jpg", 5.5, 1920);
        let json = serde_json::to_string(&f).unwrap();
        let back: FrameCandidate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
    }
}
