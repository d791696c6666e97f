//! # Signer Panel
//!
//! Holds at most one request. A transaction request shows its forwarding
//! paths (or an "action impossible" notice), a message request shows the
//! message; signing moves the request's [`SigningState`] and the panel then
//! shows the status screen until closed.

use crate::errors::{SignerError, SignerResult};
use crate::impossible::{ActionImpossible, ImpossibleReason};
use crate::message::MessageIntent;
use crate::paths::{ForwardingPaths, PathSelector, Transaction, TransactionIntent};
use crate::status::{IntentKind, SignerStatus, SigningState};
use async_trait::async_trait;
use quorum_core::Address;

/// Sends transactions through the connected wallet.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Sign and broadcast; returns the transaction hash.
    async fn send_transaction(&self, transaction: &Transaction) -> SignerResult<String>;
}

/// Signs messages with the connected account.
#[async_trait]
pub trait MessageSigner: Send + Sync {
    /// Returns the signature.
    async fn sign_message(&self, message: &str, requesting_app: Address) -> SignerResult<String>;
}

#[derive(Debug, Clone)]
enum Request {
    Transaction {
        selector: PathSelector,
        pretransaction: Option<Transaction>,
        state: SigningState,
    },
    Impossible(ActionImpossible),
    Message {
        intent: MessageIntent,
        state: SigningState,
    },
}

/// What the panel currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelContent<'a> {
    /// Path choice and the "Create transaction" button
    ActionPaths(&'a PathSelector),
    /// "Action impossible" notice
    Impossible(&'a ActionImpossible),
    /// Message preview and the "Sign message" button
    SignMessage(&'a MessageIntent),
    /// Signing progress or result
    Status(&'a SigningState),
}

/// Signer side panel.
#[derive(Debug, Clone, Default)]
pub struct SignerPanel {
    request: Option<Request>,
    signing_enabled: bool,
    provider: Option<String>,
}

impl SignerPanel {
    /// Empty, closed panel.
    pub fn new(signing_enabled: bool) -> Self {
        Self {
            request: None,
            signing_enabled,
            provider: None,
        }
    }

    /// Name of the wallet provider for status texts.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Wallet provider name, if known.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Enable or disable signing (e.g. account connected or not).
    pub fn set_signing_enabled(&mut self, enabled: bool) {
        self.signing_enabled = enabled;
    }

    /// Whether the sign buttons are enabled.
    pub fn signing_enabled(&self) -> bool {
        self.signing_enabled
    }

    /// Whether a request is open.
    pub fn is_open(&self) -> bool {
        self.request.is_some()
    }

    /// Open a transaction request with its resolved paths.
    pub fn open_transaction(
        &mut self,
        intent: TransactionIntent,
        paths: ForwardingPaths,
        pretransaction: Option<Transaction>,
    ) {
        let request = match PathSelector::new(intent.clone(), paths) {
            Ok(selector) => Request::Transaction {
                selector,
                pretransaction,
                state: SigningState::new(IntentKind::Transaction),
            },
            Err(_) => {
                tracing::info!(to = %intent.to, "No forwarding path for intent");
                Request::Impossible(ActionImpossible::new(&intent, ImpossibleReason::NoPermission))
            }
        };
        self.replace(request);
    }

    /// Open a transaction request whose paths could not be computed.
    pub fn open_unresolved(&mut self, intent: TransactionIntent, err: &SignerError) {
        tracing::warn!(to = %intent.to, error = %err, "Path resolution failed");
        self.replace(Request::Impossible(ActionImpossible::new(
            &intent,
            ImpossibleReason::PathError,
        )));
    }

    /// Open a message request.
    pub fn open_message(&mut self, intent: MessageIntent) {
        self.replace(Request::Message {
            intent,
            state: SigningState::new(IntentKind::Message),
        });
    }

    fn replace(&mut self, request: Request) {
        if self.request.is_some() {
            tracing::debug!("Replacing open signer request");
        }
        self.request = Some(request);
    }

    /// Current content, `None` when closed.
    pub fn content(&self) -> Option<PanelContent<'_>> {
        self.request.as_ref().map(|request| match request {
            Request::Transaction { state, .. } | Request::Message { state, .. }
                if state.status() != SignerStatus::Idle =>
            {
                PanelContent::Status(state)
            }
            Request::Transaction { selector, .. } => PanelContent::ActionPaths(selector),
            Request::Message { intent, .. } => PanelContent::SignMessage(intent),
            Request::Impossible(notice) => PanelContent::Impossible(notice),
        })
    }

    /// Signing state of the open request.
    pub fn signing_state(&self) -> Option<&SigningState> {
        match self.request.as_ref()? {
            Request::Transaction { state, .. } | Request::Message { state, .. } => Some(state),
            Request::Impossible(_) => None,
        }
    }

    /// Whether a pre-transaction must be signed first.
    pub fn requires_two_transactions(&self) -> bool {
        matches!(
            self.request,
            Some(Request::Transaction {
                pretransaction: Some(_),
                ..
            })
        )
    }

    /// Choose a forwarding path.
    pub fn select_path(&mut self, index: usize) -> SignerResult<()> {
        match self.request.as_mut() {
            Some(Request::Transaction { selector, .. }) => selector.select(index),
            _ => Err(SignerError::WrongRequest {
                expected: "transaction",
            }),
        }
    }

    /// Sign the open transaction request.
    ///
    /// Submits the pre-transaction first when there is one, then the
    /// intent's own transaction (direct) or the selected path's first hop.
    /// Returns the transaction hashes in submission order.
    pub async fn sign_transaction(&mut self, submitter: &dyn TransactionSubmitter) -> SignerResult<Vec<String>> {
        if !self.signing_enabled {
            return Err(SignerError::SigningDisabled);
        }
        let Some(Request::Transaction {
            selector,
            pretransaction,
            state,
        }) = self.request.as_mut()
        else {
            return Err(SignerError::WrongRequest {
                expected: "transaction",
            });
        };
        let transaction = selector.transaction_to_sign()?.clone();
        state.begin()?;
        tracing::info!(
            to = %transaction.to,
            path = selector.selected(),
            direct = selector.is_direct(),
            two_step = pretransaction.is_some(),
            "Signing transaction"
        );

        let mut hashes = Vec::with_capacity(2);
        for tx in pretransaction.iter().chain(std::iter::once(&transaction)) {
            match submitter.send_transaction(tx).await {
                Ok(hash) => hashes.push(hash),
                Err(err) => {
                    tracing::warn!(to = %tx.to, error = %err, "Transaction not signed");
                    state.fail(&err)?;
                    return Err(err);
                }
            }
        }
        state.succeed()?;
        Ok(hashes)
    }

    /// Sign the open message request; returns the signature.
    pub async fn sign_message(&mut self, signer: &dyn MessageSigner) -> SignerResult<String> {
        if !self.signing_enabled {
            return Err(SignerError::SigningDisabled);
        }
        let Some(Request::Message { intent, state }) = self.request.as_mut() else {
            return Err(SignerError::WrongRequest { expected: "message" });
        };
        state.begin()?;
        tracing::info!(app = %intent.requesting_app, "Signing message");
        match signer.sign_message(&intent.message, intent.requesting_app).await {
            Ok(signature) => {
                state.succeed()?;
                Ok(signature)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Message not signed");
                state.fail(&err)?;
                Err(err)
            }
        }
    }

    /// Close the panel, discarding the request. An issued call is not
    /// cancelled.
    pub fn close(&mut self) {
        self.request = None;
    }
}
