//! # Entities and Classification
//!
//! Every address shown in the console is one of a closed set of entity
//! kinds. Classification is pure: the same address and app set always yield
//! the same entity.

use crate::address::Address;
use crate::app::AppInstance;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag of an [`Entity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Externally-owned account or unknown contract
    Account,
    /// Installed app instance
    App,
    /// The organization itself
    Dao,
    /// Wildcard grantee
    Any,
    /// Discarded manager
    Burn,
    /// Zero address
    None,
}

impl EntityKind {
    /// Label for the "Type" column of entity tables.
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::App => "App",
            Self::Dao => "DAO",
            Self::Account | Self::Any | Self::Burn | Self::None => "Account",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Account => "account",
            Self::App => "app",
            Self::Dao => "dao",
            Self::Any => "any",
            Self::Burn => "burn",
            Self::None => "none",
        };
        f.write_str(tag)
    }
}

/// An address interpreted in the context of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entity {
    /// Plain account
    Account {
        /// Account address
        address: Address,
    },
    /// Installed app
    App {
        /// Proxy address
        address: Address,
        /// App metadata
        app: Box<AppInstance>,
    },
    /// The organization's root
    Dao {
        /// Organization address
        address: Address,
    },
    /// Any account (wildcard grantee)
    Any,
    /// Discarded manager
    Burn {
        /// Burn address in effect
        address: Address,
    },
    /// Unset
    None,
}

impl Entity {
    /// The entity's kind tag.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Account { .. } => EntityKind::Account,
            Self::App { .. } => EntityKind::App,
            Self::Dao { .. } => EntityKind::Dao,
            Self::Any => EntityKind::Any,
            Self::Burn { .. } => EntityKind::Burn,
            Self::None => EntityKind::None,
        }
    }

    /// Address backing this entity.
    pub fn address(&self) -> Address {
        match self {
            Self::Account { address }
            | Self::App { address, .. }
            | Self::Dao { address }
            | Self::Burn { address } => *address,
            Self::Any => Address::ANY_ENTITY,
            Self::None => Address::ZERO,
        }
    }

    /// App metadata for app entities.
    pub fn app(&self) -> Option<&AppInstance> {
        match self {
            Self::App { app, .. } => Some(app),
            _ => None,
        }
    }

    /// Whether this entity may appear in a grantee list.
    pub fn is_grantable(&self) -> bool {
        !matches!(self, Self::None | Self::Burn { .. })
    }
}

/// Context needed to classify addresses.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyContext<'a> {
    /// Current app set
    pub apps: &'a [AppInstance],
    /// Configured burn address
    pub burn_address: Address,
    /// Organization root address, when known
    pub dao_address: Option<Address>,
}

impl<'a> ClassifyContext<'a> {
    /// Context with the default burn address and no organization root.
    pub fn new(apps: &'a [AppInstance]) -> Self {
        Self {
            apps,
            burn_address: Address::DEFAULT_BURN,
            dao_address: None,
        }
    }

    /// Set the burn address.
    pub fn with_burn_address(mut self, burn_address: Address) -> Self {
        self.burn_address = burn_address;
        self
    }

    /// Set the organization root.
    pub fn with_dao(mut self, dao_address: Address) -> Self {
        self.dao_address = Some(dao_address);
        self
    }
}

/// Classify a concrete address. Never returns [`Entity::Any`].
pub fn classify(address: Address, ctx: &ClassifyContext<'_>) -> Entity {
    if address.is_zero() {
        return Entity::None;
    }
    if address == ctx.burn_address {
        return Entity::Burn { address };
    }
    if let Some(app) = ctx.apps.iter().find(|app| app.proxy_address == address) {
        return Entity::App {
            address,
            app: Box::new(app.clone()),
        };
    }
    if ctx.dao_address == Some(address) {
        return Entity::Dao { address };
    }
    Entity::Account { address }
}

/// Classify an address read from a grantee list.
///
/// Identical to [`classify`] except that the contracts' wildcard address
/// maps to [`Entity::Any`].
pub fn classify_grantee(address: Address, ctx: &ClassifyContext<'_>) -> Entity {
    if address == Address::ANY_ENTITY {
        return Entity::Any;
    }
    classify(address, ctx)
}
