//! Batch planning
//!
//! The videos endpoint accepts at most 50 identifiers per call. Identifiers are
//! assigned to batches in input order; only the last batch may be partial.

use crate::history::VideoId;
use reqwest::Url;

/// Maximum identifiers per metadata request
pub const MAX_BATCH_SIZE: usize = 50;

/// Resource part requested from the videos endpoint
pub const CONTENT_DETAILS_PART: &str = "contentDetails";

/// A group of identifiers fetched in one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Position of this batch in the plan
    pub index: usize,
    pub ids: Vec<VideoId>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifiers joined with commas, as the `id` parameter expects
    pub fn joined_ids(&self) -> String {
        self.ids
            .iter()
            .map(VideoId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Request URL for this batch
    ///
    /// `{endpoint}?part=contentDetails&id={ids}&key={api_key}`
    pub fn request_url(&self, endpoint: &Url, api_key: &str) -> Url {
        let mut url = endpoint.clone();
        url.query_pairs_mut()
            .append_pair("part", CONTENT_DETAILS_PART)
            .append_pair("id", &self.joined_ids())
            .append_pair("key", api_key);
        url
    }
}

/// Split identifiers into batches of at most `batch_size`
///
/// An empty input yields an empty plan. A `batch_size` of zero is treated as 1.
pub fn plan_with_size(identifiers: &[VideoId], batch_size: usize) -> Vec<Batch> {
    identifiers
        .chunks(batch_size.max(1))
        .enumerate()
        .map(|(index, chunk)| Batch {
            index,
            ids: chunk.to_vec(),
        })
        .collect()
}

/// Split identifiers into batches of [`MAX_BATCH_SIZE`]
pub fn plan(identifiers: &[VideoId]) -> Vec<Batch> {
    plan_with_size(identifiers, MAX_BATCH_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<VideoId> {
        (0..n).map(|i| VideoId::new(format!("v{}", i))).collect()
    }

    #[test]
    fn test_empty_plan() {
        assert!(plan(&[]).is_empty());
    }

    #[test]
    fn test_single_partial_batch() {
        let batches = plan(&ids(7));
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 7);
        assert_eq!(batches[0].index, 0);
    }

    #[test]
    fn test_exact_multiple_has_no_empty_tail() {
        let batches = plan(&ids(100));
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.len() == MAX_BATCH_SIZE));
    }

    #[test]
    fn test_order_preserved_across_batches() {
        let input = ids(123);
        let batches = plan(&input);

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2].len(), 23);

        let flattened: Vec<VideoId> = batches.into_iter().flat_map(|b| b.ids).collect();
        assert_eq!(flattened, input);
    }

    #[test]
    fn test_joined_ids() {
        let batch = Batch { index: 0, ids: vec!["a".into(), "b".into(), "c".into()] };
        assert_eq!(batch.joined_ids(), "a,b,c");
    }

    #[test]
    fn test_request_url_shape() {
        let endpoint = Url::parse("https://www.googleapis.com/youtube/v3/videos").unwrap();
        let batch = Batch { index: 0, ids: vec!["a".into(), "b".into()] };

        let url = batch.request_url(&endpoint, "secret");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(url.path(), "/youtube/v3/videos");
        assert_eq!(
            pairs,
            vec![
                ("part".to_string(), "contentDetails".to_string()),
                ("id".to_string(), "a,b".to_string()),
                ("key".to_string(), "secret".to_string()),
            ]
        );
    }

    #[test]
    fn test_custom_batch_size() {
        let batches = plan_with_size(&ids(5), 2);
        let sizes: Vec<usize> = batches.iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(plan_with_size(&ids(2), 0).len(), 2);
    }
}
