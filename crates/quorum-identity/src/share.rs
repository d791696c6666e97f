//! Share links
//!
//! A share link carries labels in its fragment:
//! `<base_url>/#/<org>?labels=<payload>`, where the payload is the export
//! JSON array encoded as URL-safe base64 without padding.

use crate::directory::LocalIdentityDirectory;
use crate::errors::{IdentityError, IdentityResult};
use crate::export::parse_label_entries;
use crate::record::LabelEntry;
use crate::selection::Selection;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use quorum_core::Address;

const LABELS_PARAM: &str = "labels";

/// Encode entries as a share payload.
pub fn encode_labels(entries: &[LabelEntry]) -> IdentityResult<String> {
    let json = serde_json::to_vec(entries)
        .map_err(|e| IdentityError::storage(format!("Failed to encode labels: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a share payload.
///
/// Standard base64 (with or without padding) is accepted as well, since
/// older links were produced that way.
pub fn decode_labels(payload: &str) -> IdentityResult<Vec<LabelEntry>> {
    let payload = payload.trim();
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| URL_SAFE.decode(payload))
        .or_else(|_| STANDARD.decode(payload))
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .or_else(|_| STANDARD.decode(payload.replace(' ', "+")))
        .map_err(|e| IdentityError::invalid_share_link(format!("payload is not base64 ({e})")))?;
    let json = String::from_utf8(bytes)
        .map_err(|_| IdentityError::invalid_share_link("payload is not UTF-8"))?;
    parse_label_entries(&json).map_err(|e| IdentityError::invalid_share_link(e.to_string()))
}

/// Build a share link for `entries`. Sharing nothing is refused.
pub fn build_share_link(base_url: &str, org: &str, entries: &[LabelEntry]) -> IdentityResult<String> {
    if entries.is_empty() {
        return Err(IdentityError::EmptySelection);
    }
    Ok(format!(
        "{}/#/{}?{}={}",
        base_url.trim_end_matches('/'),
        org,
        LABELS_PARAM,
        encode_labels(entries)?
    ))
}

/// Extract and decode the labels of a share link.
pub fn parse_share_link(link: &str) -> IdentityResult<Vec<LabelEntry>> {
    let (_, query) = link
        .split_once('?')
        .ok_or_else(|| IdentityError::invalid_share_link("link has no query"))?;
    let payload = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == LABELS_PARAM)
        .map(|(_, value)| value)
        .ok_or_else(|| IdentityError::invalid_share_link("link has no labels"))?;
    decode_labels(payload)
}

/// Review state for labels received through a share link.
///
/// Every label starts selected; saving imports only the selected subset.
#[derive(Debug, Clone)]
pub struct SharedLabels {
    labels: Vec<LabelEntry>,
    selection: Selection,
}

impl SharedLabels {
    /// Review decoded labels.
    pub fn new(labels: Vec<LabelEntry>) -> Self {
        let selection = Selection::new(labels.iter().map(|l| l.address));
        Self { labels, selection }
    }

    /// Review the labels carried by a share link.
    pub fn from_link(link: &str) -> IdentityResult<Self> {
        Ok(Self::new(parse_share_link(link)?))
    }

    /// Labels in link order
    pub fn labels(&self) -> &[LabelEntry] {
        &self.labels
    }

    /// Current selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Flip one label
    pub fn toggle(&mut self, address: &Address) -> bool {
        self.selection.toggle(address)
    }

    /// Header checkbox
    pub fn toggle_all(&mut self) {
        self.selection.toggle_all();
    }

    /// Selected labels, in link order.
    pub fn selected_labels(&self) -> Vec<LabelEntry> {
        self.labels
            .iter()
            .filter(|l| self.selection.is_selected(&l.address))
            .cloned()
            .collect()
    }

    /// Import the selected labels (one `Import` event). Returns the count.
    pub async fn save(&self, directory: &LocalIdentityDirectory) -> IdentityResult<usize> {
        let selected = self.selected_labels();
        if selected.is_empty() {
            return Err(IdentityError::EmptySelection);
        }
        directory.import_many(selected).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn entries() -> Vec<LabelEntry> {
        vec![
            LabelEntry::new(Address::from_bytes([1; 20]), "Café & Co. ✓"),
            LabelEntry::new(Address::from_bytes([2; 20]), "a/b?c=d#e"),
        ]
    }

    #[test]
    fn test_link_format() {
        let link = build_share_link("https://console.example/", "acme.eth", &entries()).unwrap();
        let (prefix, payload) = link.split_once("?labels=").unwrap();
        assert_eq!(prefix, "https://console.example/#/acme.eth");
        assert!(payload
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(parse_share_link(&link).unwrap(), entries());
    }

    #[test]
    fn test_standard_base64_accepted() {
        let json = serde_json::to_vec(&entries()).unwrap();
        let payload = STANDARD.encode(json);
        assert_eq!(decode_labels(&payload).unwrap(), entries());
    }

    #[test]
    fn test_invalid_links() {
        assert_matches!(parse_share_link("https://x/#/org"), Err(IdentityError::InvalidShareLink { .. }));
        assert_matches!(
            parse_share_link("https://x/#/org?other=1"),
            Err(IdentityError::InvalidShareLink { .. })
        );
        assert_matches!(decode_labels("!!!"), Err(IdentityError::InvalidShareLink { .. }));
        assert_matches!(build_share_link("https://x", "org", &[]), Err(IdentityError::EmptySelection));
    }

    #[test]
    fn test_review_selection() {
        let mut shared = SharedLabels::new(entries());
        assert!(shared.selection().all_selected());
        shared.toggle(&Address::from_bytes([1; 20]));
        assert_eq!(shared.selected_labels(), vec![entries()[1].clone()]);
        shared.toggle_all();
        assert!(shared.selected_labels().is_empty());
    }
}
