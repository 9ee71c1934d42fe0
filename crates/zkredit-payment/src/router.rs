//! Payment routing.
//!
//! Chooses between a direct account-to-account transfer and a
//! contract-mediated payment, then drives the external [`LedgerClient`].
//! Every ledger call is bounded by the configured settlement timeout. A
//! failed receipt is surfaced as-is and never retried.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use zkredit_core::address::{AccountId, EvmAddress};
use zkredit_core::constants::{DEFAULT_GAS_LIMIT, DEFAULT_SETTLEMENT_TIMEOUT_SECS, PAYMENT_FUNCTION};
use zkredit_core::error::{ConfigurationError, PaymentError, ValidationError};
use zkredit_core::traits::LedgerClient;
use zkredit_core::types::{ContractCall, PaymentResult, SettlementReceipt};

/// Canonical `0x`-prefixed, lowercase, 40-hex-char form of an address.
///
/// Accepts native account ids (`0.0.123`) and hex addresses with or without
/// the prefix. Idempotent.
///
/// # Examples
///
/// ```
/// use zkredit_payment::normalize_address;
///
/// let once = normalize_address("0.0.4321").unwrap();
/// assert_eq!(once, "0x00000000000000000000000000000000000010e1");
/// assert_eq!(normalize_address(&once).unwrap(), once);
/// assert!(normalize_address("").is_err());
/// ```
pub fn normalize_address(value: &str) -> Result<String, ValidationError> {
    EvmAddress::parse(value).map(|address| address.to_string())
}

/// How a payment settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// Debit the sender and credit the receiver directly.
    DirectTransfer,
    /// Invoke the payment contract, attaching the amount as payable value.
    ContractCall { contract: EvmAddress },
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectTransfer => f.write_str("direct"),
            Self::ContractCall { contract } => write!(f, "contract:{contract}"),
        }
    }
}

/// Settlement settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfig {
    /// Payment contract id (native or hex). `None`, empty, or a zero
    /// address selects direct transfers.
    pub contract_id: Option<String>,
    /// Gas limit attached to contract calls.
    pub gas_limit: u64,
    /// Upper bound on a single ledger call.
    pub settlement_timeout: Duration,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            contract_id: None,
            gas_limit: DEFAULT_GAS_LIMIT,
            settlement_timeout: Duration::from_secs(DEFAULT_SETTLEMENT_TIMEOUT_SECS),
        }
    }
}

/// Select the transfer mode for a configuration.
pub fn resolve_mode(config: &PaymentConfig) -> Result<TransferMode, ConfigurationError> {
    let Some(raw) = config
        .contract_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        return Ok(TransferMode::DirectTransfer);
    };

    let contract = EvmAddress::parse(raw).map_err(|e| ConfigurationError::Invalid {
        key: "payment contract id".to_string(),
        reason: e.to_string(),
    })?;
    if contract.is_zero() {
        Ok(TransferMode::DirectTransfer)
    } else {
        Ok(TransferMode::ContractCall { contract })
    }
}

/// Executes payments through a [`LedgerClient`].
#[derive(Clone)]
pub struct PaymentRouter {
    client: Arc<dyn LedgerClient>,
    config: PaymentConfig,
}

impl PaymentRouter {
    pub fn new(client: Arc<dyn LedgerClient>, config: PaymentConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &PaymentConfig {
        &self.config
    }

    /// Transfer mode for this router's configuration.
    pub fn mode(&self) -> Result<TransferMode, ConfigurationError> {
        resolve_mode(&self.config)
    }

    /// Settle `amount_units` smallest units from `sender` to `receiver`.
    ///
    /// Fails with [`PaymentError::Validation`] for a zero amount (or, in
    /// direct mode, a receiver that is not an account-id address),
    /// [`PaymentError::Timeout`] when the ledger does not answer in time,
    /// and [`PaymentError::Execution`] when the receipt is not a success.
    pub async fn execute(
        &self,
        mode: &TransferMode,
        sender: &AccountId,
        receiver: &EvmAddress,
        amount_units: u64,
    ) -> Result<PaymentResult, PaymentError> {
        if amount_units == 0 {
            return Err(ValidationError::NonPositiveAmount.into());
        }

        let receipt = match mode {
            TransferMode::DirectTransfer => {
                if !receiver.is_long_zero() {
                    return Err(ValidationError::MalformedAddress(format!(
                        "{receiver} does not encode an account id"
                    ))
                    .into());
                }
                let to = AccountId::from_evm_address(receiver);
                self.bounded(self.client.transfer(sender, &to, amount_units))
                    .await?
            }
            TransferMode::ContractCall { contract } => {
                let call = ContractCall {
                    contract: *contract,
                    function: PAYMENT_FUNCTION.to_string(),
                    payer: *sender,
                    receiver: *receiver,
                    amount: amount_units,
                    payable: amount_units,
                    gas_limit: self.config.gas_limit,
                };
                self.bounded(self.client.call_contract(&call)).await?
            }
        };

        if !receipt.status.is_success() {
            warn!(
                %mode,
                tx = %receipt.transaction_id,
                status = %receipt.status,
                "settlement rejected"
            );
            return Err(PaymentError::Execution {
                status: receipt.status.to_string(),
            });
        }

        info!(
            %mode,
            tx = %receipt.transaction_id,
            receiver = %receiver,
            amount_units,
            "payment settled"
        );

        Ok(PaymentResult {
            transaction_id: receipt.transaction_id,
            transaction_hash: receipt.transaction_hash,
            status: receipt.status,
            amount_units,
            receiver_address: *receiver,
        })
    }

    async fn bounded<F>(&self, call: F) -> Result<SettlementReceipt, PaymentError>
    where
        F: std::future::Future<Output = Result<SettlementReceipt, PaymentError>>,
    {
        let limit = self.config.settlement_timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_ms = limit.as_millis() as u64, "settlement timed out");
                Err(PaymentError::Timeout {
                    after_ms: limit.as_millis() as u64,
                })
            }
        }
    }
}
