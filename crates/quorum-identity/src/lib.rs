//! Quorum Identity - Local Identity Directory
//!
//! Client-side labels for addresses. The directory keeps a map from
//! lower-cased address to [`IdentityRecord`], persists it per organization
//! through an [`IdentityStorage`] handler, and announces every change on an
//! [`IdentityBus`] so that each [`IdentityBadge`] can re-resolve its label.
//!
//! Labels leave the device only through export files and share links; both
//! carry the same `[{address, name}]` JSON array of [`LabelEntry`] values.

#![forbid(unsafe_code)]

pub mod badge;
pub mod bus;
pub mod directory;
pub mod errors;
pub mod export;
pub mod record;
pub mod selection;
pub mod share;
pub mod storage;

pub use badge::{BadgeSubject, IdentityBadge};
pub use bus::{IdentityBus, IdentityEvent, IdentitySubscription, DEFAULT_BUS_CAPACITY};
pub use directory::LocalIdentityDirectory;
pub use errors::{IdentityError, IdentityResult};
pub use export::{export_file_name, export_json, parse_label_entries};
pub use record::{IdentityRecord, LabelEntry};
pub use selection::Selection;
pub use share::{build_share_link, decode_labels, encode_labels, parse_share_link, SharedLabels};
pub use storage::{FileIdentityStorage, IdentityStorage, MemoryIdentityStorage};
