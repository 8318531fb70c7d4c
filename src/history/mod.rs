//! Watch-history input
//!
//! A history export is a JSON array with one object per watch event. Only two
//! fields matter here:
//!
//! ```json
//! [
//!   {
//!     "header": "YouTube",
//!     "title": "Watched Some Video",
//!     "titleUrl": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
//!     "time": "2021-03-14T15:09:26.535Z"
//!   }
//! ]
//! ```
//!
//! Entries for removed videos have no `titleUrl`. They still count toward the
//! population and the year histogram, but cannot be sampled.

pub mod histogram;

use anyhow::Context;
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

/// Query parameter carrying the video identifier in a watch URL
pub const VIDEO_ID_PARAM: &str = "v";

/// Opaque provider-side video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One logged watch event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Link to the watched video, empty when the export omits it
    #[serde(rename = "titleUrl", default, deserialize_with = "nullable_string")]
    pub source_locator: String,

    /// When the video was watched
    #[serde(rename = "time", default, deserialize_with = "lenient_timestamp")]
    pub watched_at: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    pub fn new(source_locator: impl Into<String>, watched_at: Option<DateTime<Utc>>) -> Self {
        Self {
            source_locator: source_locator.into(),
            watched_at,
        }
    }

    /// Parsed locator, `None` when empty or not a valid absolute URL
    pub fn locator_url(&self) -> Option<Url> {
        if self.source_locator.is_empty() {
            return None;
        }
        Url::parse(&self.source_locator).ok()
    }
}

/// Extract the `v` query parameter from a watch URL
///
/// Returns `None` if the parameter is absent or empty.
pub fn video_id_from_url(url: &Url) -> Option<VideoId> {
    url.query_pairs()
        .find(|(key, _)| key == VIDEO_ID_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .map(VideoId)
}

fn nullable_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// Parse a history export from raw JSON bytes
pub fn parse_history(bytes: &[u8]) -> serde_json::Result<Vec<HistoryEntry>> {
    serde_json::from_slice(bytes)
}

/// Load a history export from disk
pub fn load_history(path: &Path) -> crate::Result<Vec<HistoryEntry>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read history file: {}", path.display()))?;

    let entries = parse_history(&bytes)
        .with_context(|| format!("Failed to parse history file: {}", path.display()))?;

    log::info!("Loaded {} history entries from {}", entries.len(), path.display());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use std::io::Write;

    fn id_of(entry: &HistoryEntry) -> Option<VideoId> {
        entry.locator_url().as_ref().and_then(video_id_from_url)
    }

    #[test]
    fn test_parse_takeout_entry() {
        let json = br#"[
            {
                "header": "YouTube",
                "title": "Watched Something",
                "titleUrl": "https://www.youtube.com/watch?v=abc123",
                "time": "2021-03-14T15:09:26.535Z",
                "products": ["YouTube"]
            }
        ]"#;

        let entries = parse_history(json).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source_locator, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(entries[0].watched_at.unwrap().year(), 2021);
        assert_eq!(id_of(&entries[0]), Some(VideoId::from("abc123")));
    }

    #[test]
    fn test_missing_fields_are_tolerated() {
        let json = br#"[
            {"title": "Watched a video that has been removed", "time": "2019-01-01T00:00:00Z"},
            {"titleUrl": null, "time": null},
            {"titleUrl": "https://www.youtube.com/watch?v=x", "time": "not a date"}
        ]"#;

        let entries = parse_history(json).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].source_locator, "");
        assert!(entries[0].watched_at.is_some());
        assert_eq!(entries[1].source_locator, "");
        assert!(entries[1].watched_at.is_none());
        assert!(entries[2].watched_at.is_none());
    }

    #[test]
    fn test_not_an_array_fails() {
        assert!(parse_history(br#"{"titleUrl": "x"}"#).is_err());
    }

    #[test]
    fn test_video_id_extraction() {
        let entry = HistoryEntry::new("https://www.youtube.com/watch?feature=share&v=XYZ", None);
        assert_eq!(id_of(&entry), Some(VideoId::from("XYZ")));

        let no_param = HistoryEntry::new("https://www.youtube.com/channel/UC123", None);
        assert!(no_param.locator_url().is_some());
        assert_eq!(id_of(&no_param), None);

        let empty_param = HistoryEntry::new("https://www.youtube.com/watch?v=", None);
        assert_eq!(id_of(&empty_param), None);
    }

    #[test]
    fn test_unparseable_locator() {
        assert!(HistoryEntry::new("", None).locator_url().is_none());
        assert!(HistoryEntry::new("not a url", None).locator_url().is_none());
    }

    #[test]
    fn test_load_history_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"titleUrl": "https://www.youtube.com/watch?v=a", "time": "2020-05-01T10:00:00Z"}]"#)
            .unwrap();

        let entries = load_history(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_load_history_missing_file() {
        let err = load_history(Path::new("/nonexistent/history.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read history file"));
    }
}
