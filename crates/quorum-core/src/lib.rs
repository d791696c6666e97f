//! Quorum Core - Organization Access-Control Model
//!
//! This crate provides the foundational types shared by every Quorum crate.
//! It contains no UI state and no persistence, only the vocabulary the
//! permission console speaks.
//!
//! # Contents
//!
//! - [`Address`]: 20-byte account/contract address with EIP-55 rendering
//! - [`AppInstance`], [`Role`], [`RoleBytes`]: installed application metadata
//! - [`Entity`] and [`classify`]: the closed set of things an address can be
//! - [`QuorumError`] and [`ErrorCategory`]: unified error handling
//! - [`QuorumConfig`]: file + environment configuration
//! - [`ChainReader`] and [`SnapshotChain`]: read access to on-chain permissions
//!
//! # Sentinel Addresses
//!
//! The access-control contracts reserve three addresses:
//!
//! - `Address::ZERO` marks an unset manager (permission not created yet)
//! - the burn address (`0x…01` by default) marks a discarded manager
//! - `Address::ANY_ENTITY` (`0xff…ff`) is the "any account" grantee

#![forbid(unsafe_code)]

pub mod address;
pub mod app;
pub mod chain;
pub mod config;
pub mod entity;
pub mod errors;

pub use address::{is_address, is_empty_address, Address, AddressError};
pub use app::{named_apps, AppIcon, AppInstance, Role, RoleBytes};
pub use chain::{ChainReader, PermissionRecord, SnapshotChain};
pub use config::{OrganizationConfig, QuorumConfig};
pub use entity::{classify, classify_grantee, ClassifyContext, Entity, EntityKind};
pub use errors::{ErrorCategory, QuorumError, Result as QuorumResult};
