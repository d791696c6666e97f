//! Forwarding paths
//!
//! When the account cannot perform an intent directly, the resolver returns
//! one or more paths: chains of transactions through forwarder apps, the last
//! hop being the intent itself. Signing a path means submitting its first
//! transaction.

use crate::errors::{SignerError, SignerResult};
use quorum_core::Address;
use serde::{Deserialize, Serialize};

/// Maximum length of a hop name in a radio item title.
pub const RADIO_ITEM_TITLE_LENGTH: usize = 30;

/// One transaction, as handed to the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Target contract
    pub to: Address,
    /// Display name of the target (app or forwarder)
    #[serde(default)]
    pub name: String,
    /// What the hop does
    #[serde(default)]
    pub description: String,
    /// Hex calldata
    #[serde(default)]
    pub data: String,
}

/// The action a user asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionIntent {
    /// Contract the action runs on
    pub to: Address,
    /// App name
    #[serde(default)]
    pub name: Option<String>,
    /// Radspec description
    #[serde(default)]
    pub description: Option<String>,
    /// Transaction performing the action directly
    pub transaction: Transaction,
}

/// How an intent can be performed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForwardingPaths {
    /// The account can perform the intent itself
    pub direct: bool,
    /// Candidate paths, each ending with the intent
    #[serde(default)]
    pub paths: Vec<Vec<Transaction>>,
}

impl ForwardingPaths {
    /// Directly performable.
    pub fn direct() -> Self {
        Self {
            direct: true,
            paths: Vec::new(),
        }
    }

    /// Performable only through forwarders. Empty paths are dropped.
    pub fn via(paths: Vec<Vec<Transaction>>) -> Self {
        Self {
            direct: false,
            paths: paths.into_iter().filter(|p| !p.is_empty()).collect(),
        }
    }

    /// Whether the intent cannot be performed at all.
    pub fn is_impossible(&self) -> bool {
        !self.direct && self.paths.is_empty()
    }
}

/// A radio-list entry describing one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRadioItem {
    /// Hop names joined with ` → `, each shortened
    pub title: String,
    /// Single hop's description, or one numbered line per hop
    pub description: Vec<String>,
}

impl PathRadioItem {
    /// Describe a path. The final hop (the intent itself) is left out.
    pub fn from_path(path: &[Transaction]) -> Self {
        let hops = &path[..path.len().saturating_sub(1)];
        let title = hops
            .iter()
            .map(|hop| shorten_name(&hop.name))
            .collect::<Vec<_>>()
            .join(" → ");
        let description = match hops {
            [single] => vec![single.description.clone()],
            _ => hops
                .iter()
                .enumerate()
                .map(|(i, hop)| format!("{}. {}: {}", i + 1, hop.name, hop.description))
                .collect(),
        };
        Self { title, description }
    }
}

fn shorten_name(name: &str) -> String {
    if name.chars().count() > RADIO_ITEM_TITLE_LENGTH {
        let short: String = name.chars().take(RADIO_ITEM_TITLE_LENGTH).collect();
        format!("{short}…")
    } else {
        name.to_string()
    }
}

/// Path choice for one intent; starts on path 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSelector {
    intent: TransactionIntent,
    paths: ForwardingPaths,
    selected: usize,
}

impl PathSelector {
    /// Start a selection. Fails with `NoPath` when nothing can perform the
    /// intent.
    pub fn new(intent: TransactionIntent, paths: ForwardingPaths) -> SignerResult<Self> {
        if paths.is_impossible() {
            return Err(SignerError::NoPath);
        }
        Ok(Self {
            intent,
            paths,
            selected: 0,
        })
    }

    /// The intent.
    pub fn intent(&self) -> &TransactionIntent {
        &self.intent
    }

    /// Whether the intent is performed directly.
    pub fn is_direct(&self) -> bool {
        self.paths.direct
    }

    /// Whether the path list is shown.
    pub fn shows_paths(&self) -> bool {
        !self.paths.direct
    }

    /// Heading above the radio list.
    pub fn paths_description(&self) -> &'static str {
        if self.paths.paths.len() > 1 {
            "Here are some options you can use to perform it:"
        } else {
            "You can perform this action through:"
        }
    }

    /// Radio items, one per path.
    pub fn radio_items(&self) -> Vec<PathRadioItem> {
        self.paths
            .paths
            .iter()
            .map(|path| PathRadioItem::from_path(path))
            .collect()
    }

    /// Selected path index.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Choose a path.
    pub fn select(&mut self, index: usize) -> SignerResult<()> {
        let len = self.paths.paths.len();
        if !self.paths.direct && index >= len {
            return Err(SignerError::PathOutOfRange { index, len });
        }
        self.selected = index;
        Ok(())
    }

    /// The transaction signing submits: the intent's own transaction when
    /// direct, otherwise the first hop of the selected path.
    pub fn transaction_to_sign(&self) -> SignerResult<&Transaction> {
        if self.paths.direct {
            return Ok(&self.intent.transaction);
        }
        self.paths
            .paths
            .get(self.selected)
            .and_then(|path| path.first())
            .ok_or(SignerError::PathOutOfRange {
                index: self.selected,
                len: self.paths.paths.len(),
            })
    }
}
