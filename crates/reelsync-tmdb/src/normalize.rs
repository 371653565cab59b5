//! Normalization of TMDB payloads into the domain document the store
//! persists.
//!
//! Pure transforms, no I/O. Malformed input is dropped, never raised: a
//! frame without a path disappears, a junk release date yields no year, a
//! production country without an ISO code is skipped.

use reelsync_core::{CatalogTitle, ContentKind, FrameCandidate};

use crate::types::{ListItem, RawFrame, TitleDetail};

/// TMDB genre tag for animation; drives the `is_animated` flag.
pub const ANIMATION_GENRE_ID: i32 = 16;

/// Parses the year from the first four characters of a release-date string.
///
/// Returns `None` when the date is missing, shorter than four characters,
/// or not numeric; never an error.
#[must_use]
pub fn extract_year(release_date: Option<&str>) -> Option<i32> {
    let s = release_date?;
    if s.len() < 4 {
        return None;
    }
    s.get(..4)?.parse::<i32>().ok()
}

/// Normalizes raw backdrop candidates: drops entries with no resolvable
/// path and deduplicates by path, keeping the widest variant when the same
/// path arrives from different calls.
#[must_use]
pub fn normalize_frames(raw: Vec<RawFrame>) -> Vec<FrameCandidate> {
    let mut by_path: Vec<FrameCandidate> = Vec::with_capacity(raw.len());

    for frame in raw {
        let Some(path) = frame.path.filter(|p| !p.is_empty()) else {
            continue;
        };
        let candidate = FrameCandidate {
            path,
            aspect_ratio: frame.aspect_ratio,
            vote_average: frame.vote_average,
            width: frame.width,
        };
        match by_path.iter_mut().find(|f| f.path == candidate.path) {
            Some(existing) => {
                if candidate.width > existing.width {
                    *existing = candidate;
                }
            }
            None => by_path.push(candidate),
        }
    }

    by_path
}

/// Builds the derived catalog document from one list entry plus the
/// per-title fetches (detail, localized title, backdrops).
#[must_use]
pub fn normalize_title(
    item: &ListItem,
    kind: ContentKind,
    detail: &TitleDetail,
    title_localized: Option<String>,
    raw_frames: Vec<RawFrame>,
) -> CatalogTitle {
    let country_codes = detail
        .production_countries
        .iter()
        .filter_map(|c| c.iso_3166_1.clone())
        .collect();

    CatalogTitle {
        tmdb_id: item.id,
        kind,
        title: item.title.clone().unwrap_or_default(),
        title_localized,
        release_date: item.release_date.clone(),
        popularity: item.popularity,
        vote_count: item.vote_count,
        vote_average: item.vote_average,
        genre_ids: item.genre_ids.clone(),
        country_codes,
        year: extract_year(item.release_date.as_deref()),
        is_animated: item.genre_ids.contains(&ANIMATION_GENRE_ID),
        frames: normalize_frames(raw_frames),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductionCountry;

    fn raw(path: Option<&str>, width: i32) -> RawFrame {
        RawFrame {
            path: path.map(str::to_string),
            aspect_ratio: 1.78,
            vote_average: 5.0,
            width,
        }
    }

    #[test]
    fn extract_year_from_full_date() {
        assert_eq!(extract_year(Some("1999-05-01")), Some(1999));
    }

    #[test]
    fn extract_year_from_bare_year() {
        assert_eq!(extract_year(Some("2010")), Some(2010));
    }

    #[test]
    fn extract_year_missing_or_junk_is_none() {
        assert_eq!(extract_year(None), None);
        assert_eq!(extract_year(Some("")), None);
        assert_eq!(extract_year(Some("abc")), None);
        assert_eq!(extract_year(Some("19")), None);
    }

    #[test]
    fn normalize_frames_dedups_by_path_keeping_widest() {
        let frames = normalize_frames(vec![raw(Some("/x.jpg"), 100), raw(Some("/x.jpg"), 200)]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].path, "/x.jpg");
        assert_eq!(frames[0].width, 200);
    }

    #[test]
    fn normalize_frames_keeps_first_when_duplicate_is_narrower() {
        let frames = normalize_frames(vec![raw(Some("/x.jpg"), 300), raw(Some("/x.jpg"), 200)]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].width, 300);
    }

    #[test]
    fn normalize_frames_drops_pathless_entries() {
        let frames = normalize_frames(vec![raw(None, 500), raw(Some(""), 500), raw(Some("/a.jpg"), 10)]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].path, "/a.jpg");
    }

    #[test]
    fn raw_frame_accepts_all_three_path_spellings() {
        let from_api: RawFrame =
            serde_json::from_str(r#"{"file_path": "/api.jpg", "width": 1920}"#).unwrap();
        let legacy: RawFrame =
            serde_json::from_str(r#"{"frame_path": "/old.jpg", "width": 1280}"#).unwrap();
        let canonical: RawFrame =
            serde_json::from_str(r#"{"path": "/new.jpg", "width": 640}"#).unwrap();
        assert_eq!(from_api.path.as_deref(), Some("/api.jpg"));
        assert_eq!(legacy.path.as_deref(), Some("/old.jpg"));
        assert_eq!(canonical.path.as_deref(), Some("/new.jpg"));
    }

    #[test]
    fn normalize_title_derives_everything() {
        let item = ListItem {
            id: 42,
            title: Some("Inception".to_string()),
            release_date: Some("2010-07-16".to_string()),
            popularity: 90.5,
            vote_count: 34000,
            vote_average: 8.3,
            genre_ids: vec![28, 878],
        };
        let detail = TitleDetail {
            production_countries: vec![
                ProductionCountry {
                    iso_3166_1: Some("US".to_string()),
                    name: Some("United States of America".to_string()),
                },
                ProductionCountry {
                    iso_3166_1: None,
                    name: Some("unknown".to_string()),
                },
                ProductionCountry {
                    iso_3166_1: Some("GB".to_string()),
                    name: None,
                },
            ],
        };
        let frames = vec![raw(Some("/a.jpg"), 1920), raw(Some("/b.jpg"), 1280)];

        let doc = normalize_title(
            &item,
            ContentKind::Movie,
            &detail,
            Some("Начало".to_string()),
            frames,
        );

        assert_eq!(doc.tmdb_id, 42);
        assert_eq!(doc.kind, ContentKind::Movie);
        assert_eq!(doc.year, Some(2010));
        assert!(!doc.is_animated);
        assert_eq!(doc.country_codes, vec!["US", "GB"]);
        assert_eq!(doc.title_localized.as_deref(), Some("Начало"));
        assert_eq!(doc.frames.len(), 2);
    }

    #[test]
    fn normalize_title_flags_animation_genre() {
        let item = ListItem {
            id: 1,
            title: Some("Spirited Away".to_string()),
            release_date: Some("2001-07-20".to_string()),
            popularity: 0.0,
            vote_count: 0,
            vote_average: 0.0,
            genre_ids: vec![ANIMATION_GENRE_ID, 14],
        };
        let doc = normalize_title(&item, ContentKind::Movie, &TitleDetail::default(), None, vec![]);
        assert!(doc.is_animated);
    }
}
