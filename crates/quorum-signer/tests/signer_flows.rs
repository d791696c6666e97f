//! Signer panel flows against recording wallet doubles.

use assert_matches::assert_matches;
use async_trait::async_trait;
use parking_lot::Mutex;
use proptest::prelude::*;
use quorum_core::Address;
use quorum_signer::{
    clean_error_message, ForwardingPaths, ImpossibleReason, MessageIntent, MessageSigner, PanelContent,
    SignerError, SignerPanel, SignerResult, SignerStatus, Transaction, TransactionIntent,
    TransactionSubmitter,
};

#[derive(Default)]
struct RecordingWallet {
    sent: Mutex<Vec<Transaction>>,
    reject: Option<String>,
}

impl RecordingWallet {
    fn rejecting(raw: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reject: Some(raw.to_string()),
        }
    }

    fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl TransactionSubmitter for RecordingWallet {
    async fn send_transaction(&self, transaction: &Transaction) -> SignerResult<String> {
        if let Some(raw) = &self.reject {
            return Err(SignerError::wallet(raw));
        }
        let mut sent = self.sent.lock();
        sent.push(transaction.clone());
        Ok(format!("0xhash{}", sent.len()))
    }
}

#[async_trait]
impl MessageSigner for RecordingWallet {
    async fn sign_message(&self, message: &str, _requesting_app: Address) -> SignerResult<String> {
        match &self.reject {
            Some(raw) => Err(SignerError::wallet(raw)),
            None => Ok(format!("sig:{}", message.len())),
        }
    }
}

fn tx(seed: u8, name: &str) -> Transaction {
    Transaction {
        to: Address::from_bytes([seed; 20]),
        name: name.to_string(),
        description: format!("{name} step"),
        data: format!("0x{seed:02x}"),
    }
}

fn intent() -> TransactionIntent {
    TransactionIntent {
        to: Address::from_bytes([9; 20]),
        name: Some("Finance".into()),
        description: Some("Pay 1 ETH".into()),
        transaction: tx(9, "Finance"),
    }
}

// ============================================================================
// Forwarding paths
// ============================================================================

#[tokio::test]
async fn selected_path_first_hop_is_signed() {
    let wallet = RecordingWallet::default();
    let mut panel = SignerPanel::new(true);
    panel.open_transaction(
        intent(),
        ForwardingPaths::via(vec![
            vec![tx(1, "Voting"), tx(9, "Finance")],
            vec![tx(2, "Tokens"), tx(3, "Voting"), tx(9, "Finance")],
        ]),
        None,
    );

    let Some(PanelContent::ActionPaths(selector)) = panel.content() else {
        panic!("expected path selection");
    };
    assert_eq!(selector.selected(), 0);
    assert!(selector.shows_paths());
    assert_eq!(selector.radio_items()[1].title, "Tokens → Voting");

    panel.select_path(1).unwrap();
    let hashes = panel.sign_transaction(&wallet).await.unwrap();
    assert_eq!(hashes, vec!["0xhash1"]);
    assert_eq!(wallet.sent(), vec![tx(2, "Tokens")]);
    assert_matches!(panel.content(), Some(PanelContent::Status(state)) if state.status() == SignerStatus::Signed);
}

#[tokio::test]
async fn single_path_still_signs_first_hop() {
    let wallet = RecordingWallet::default();
    let mut panel = SignerPanel::new(true);
    panel.open_transaction(intent(), ForwardingPaths::via(vec![vec![tx(1, "Voting"), tx(9, "Finance")]]), None);
    assert_matches!(panel.select_path(1), Err(SignerError::PathOutOfRange { index: 1, len: 1 }));
    panel.sign_transaction(&wallet).await.unwrap();
    assert_eq!(wallet.sent(), vec![tx(1, "Voting")]);
}

#[tokio::test]
async fn direct_intent_signs_its_own_transaction_after_pretransaction() {
    let wallet = RecordingWallet::default();
    let mut panel = SignerPanel::new(true);
    panel.open_transaction(intent(), ForwardingPaths::direct(), Some(tx(4, "Token approval")));
    assert!(panel.requires_two_transactions());

    let hashes = panel.sign_transaction(&wallet).await.unwrap();
    assert_eq!(hashes.len(), 2);
    assert_eq!(wallet.sent(), vec![tx(4, "Token approval"), tx(9, "Finance")]);
}

#[tokio::test]
async fn no_path_is_impossible() {
    let mut panel = SignerPanel::new(true);
    panel.open_transaction(intent(), ForwardingPaths::via(vec![]), None);
    assert_matches!(
        panel.content(),
        Some(PanelContent::Impossible(notice)) if notice.reason == ImpossibleReason::NoPermission
    );
    assert_matches!(
        panel.sign_transaction(&RecordingWallet::default()).await,
        Err(SignerError::WrongRequest { .. })
    );

    panel.open_unresolved(intent(), &SignerError::path_resolution("timeout"));
    let Some(PanelContent::Impossible(notice)) = panel.content() else {
        panic!("expected notice");
    };
    assert!(notice.text().contains("find a path or send a transaction"));
}

// ============================================================================
// Status machine through the panel
// ============================================================================

#[tokio::test]
async fn rejected_signature_is_terminal() {
    let wallet = RecordingWallet::rejecting("Returned error: Error: User denied transaction signature\nstack");
    let mut panel = SignerPanel::new(true).with_provider("MetaMask");
    panel.open_transaction(intent(), ForwardingPaths::direct(), None);

    assert_matches!(
        panel.sign_transaction(&wallet).await,
        Err(SignerError::Wallet { message }) if message == "User denied transaction signature"
    );
    let state = panel.signing_state().unwrap();
    assert_eq!(state.status(), SignerStatus::Error);
    assert_eq!(state.label(), Some("Error signing the transaction."));
    assert!(state.can_close());

    // Terminal: a second attempt is refused without reaching the wallet.
    assert_matches!(
        panel.sign_transaction(&RecordingWallet::default()).await,
        Err(SignerError::InvalidTransition { .. })
    );

    panel.close();
    assert!(!panel.is_open());
    assert!(panel.content().is_none());
}

#[tokio::test]
async fn signing_disabled_is_refused() {
    let wallet = RecordingWallet::default();
    let mut panel = SignerPanel::new(false);
    panel.open_transaction(intent(), ForwardingPaths::direct(), None);
    assert_matches!(panel.sign_transaction(&wallet).await, Err(SignerError::SigningDisabled));
    assert!(wallet.sent().is_empty());
    assert_eq!(panel.signing_state().map(|s| s.status()), Some(SignerStatus::Idle));

    panel.set_signing_enabled(true);
    panel.sign_transaction(&wallet).await.unwrap();
    assert_eq!(wallet.sent().len(), 1);
}

#[tokio::test]
async fn message_signing() {
    let mut panel = SignerPanel::new(true);
    panel.open_message(MessageIntent {
        message: "Log in".into(),
        requesting_app: Address::from_bytes([5; 20]),
    });
    let Some(PanelContent::SignMessage(message)) = panel.content() else {
        panic!("expected message");
    };
    assert!(message.is_human_readable());

    let signature = panel.sign_message(&RecordingWallet::default()).await.unwrap();
    assert_eq!(signature, "sig:6");
    let state = panel.signing_state().unwrap();
    assert_eq!(state.label(), Some("Message signed!"));
    assert_eq!(state.info(None), vec!["Success! Your message has been signed."]);
    assert_matches!(
        panel.sign_transaction(&RecordingWallet::default()).await,
        Err(SignerError::WrongRequest { expected: "transaction" })
    );
}

proptest! {
    #[test]
    fn cleaned_message_is_single_line(raw in "\\PC*(\n\\PC*)?") {
        let cleaned = clean_error_message(&raw);
        prop_assert!(!cleaned.contains('\n'));
        prop_assert!(raw.contains(cleaned.as_str()));
    }
}
