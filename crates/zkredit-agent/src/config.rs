//! Agent configuration loaded from environment variables.
//!
//! | Variable                          | Default            |
//! |-----------------------------------|--------------------|
//! | `ZKREDIT_NETWORK`                 | `testnet`          |
//! | `ZKREDIT_PAYMENT_CONTRACT_ID`     | unset (direct)     |
//! | `ZKREDIT_WORKER_ADDRESS`          | required           |
//! | `ZKREDIT_RECEIVER_ADDRESS`        | required           |
//! | `ZKREDIT_REMITTANCE_CAP`          | `5000`             |
//! | `ZKREDIT_LEDGER_TOPIC`            | `0.0.920393`       |
//! | `ZKREDIT_SETTLEMENT_TIMEOUT_SECS` | `30`               |
//! | `ZKREDIT_PROOF_TIMEOUT_SECS`      | `60`               |
//! | `ZKREDIT_LOG_LEVEL`               | `info`             |
//! | `ZKREDIT_LOG_FORMAT`              | `text`             |

use std::time::Duration;

use tracing::warn;

use zkredit_core::address::{AccountId, EvmAddress};
use zkredit_core::amount::Amount;
use zkredit_core::constants::{
    LedgerNetwork, DEFAULT_GAS_LIMIT, DEFAULT_LEDGER_TOPIC, DEFAULT_PROOF_TIMEOUT_SECS,
    DEFAULT_REMITTANCE_CAP, DEFAULT_SETTLEMENT_TIMEOUT_SECS,
};
use zkredit_core::error::ConfigurationError;
use zkredit_payment::{resolve_mode, PaymentConfig};

pub const ENV_PREFIX: &str = "ZKREDIT_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub network: LedgerNetwork,
    /// Contract id, gas limit, and settlement timeout.
    pub payment: PaymentConfig,
    /// Account the worker's remittances are debited from.
    pub worker_account: AccountId,
    /// Receiver used when a remittance names none.
    pub default_receiver: EvmAddress,
    /// Largest single remittance accepted.
    pub remittance_cap: Amount,
    pub ledger_topic: String,
    pub proof_timeout: Duration,
    pub log_level: String,
    /// `text` or `json`.
    pub log_format: String,
}

impl AgentConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which receives full variable
    /// names (`ZKREDIT_...`). Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let network = match get("NETWORK") {
            None => LedgerNetwork::default(),
            Some(raw) => raw.parse().unwrap_or_else(|unknown| {
                warn!(network = %unknown, "unknown ledger network, using testnet");
                LedgerNetwork::Testnet
            }),
        };

        let worker_raw = get("WORKER_ADDRESS")
            .ok_or_else(|| ConfigurationError::Missing(format!("{ENV_PREFIX}WORKER_ADDRESS")))?;
        let worker_account = parse_account("WORKER_ADDRESS", &worker_raw)?;

        let receiver_raw = get("RECEIVER_ADDRESS")
            .ok_or_else(|| ConfigurationError::Missing(format!("{ENV_PREFIX}RECEIVER_ADDRESS")))?;
        let default_receiver =
            EvmAddress::parse(&receiver_raw).map_err(|e| invalid("RECEIVER_ADDRESS", e))?;

        let remittance_cap = match get("REMITTANCE_CAP") {
            None => Amount::from_whole(DEFAULT_REMITTANCE_CAP),
            Some(raw) => {
                let cap: Amount = raw.parse().map_err(|e| invalid("REMITTANCE_CAP", e))?;
                if cap.is_zero() {
                    return Err(invalid("REMITTANCE_CAP", "must be positive"));
                }
                cap
            }
        };

        let settlement_timeout = secs(
            get("SETTLEMENT_TIMEOUT_SECS"),
            "SETTLEMENT_TIMEOUT_SECS",
            DEFAULT_SETTLEMENT_TIMEOUT_SECS,
        )?;
        let proof_timeout = secs(
            get("PROOF_TIMEOUT_SECS"),
            "PROOF_TIMEOUT_SECS",
            DEFAULT_PROOF_TIMEOUT_SECS,
        )?;

        let log_format = get("LOG_FORMAT").unwrap_or_else(|| "text".to_string());
        if log_format != "text" && log_format != "json" {
            return Err(invalid("LOG_FORMAT", "expected 'text' or 'json'"));
        }

        let payment = PaymentConfig {
            contract_id: get("PAYMENT_CONTRACT_ID"),
            gas_limit: DEFAULT_GAS_LIMIT,
            settlement_timeout,
        };
        resolve_mode(&payment)?;

        Ok(Self {
            network,
            payment,
            worker_account,
            default_receiver,
            remittance_cap,
            ledger_topic: get("LEDGER_TOPIC").unwrap_or_else(|| DEFAULT_LEDGER_TOPIC.to_string()),
            proof_timeout,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format,
        })
    }
}

fn invalid(name: &str, reason: impl ToString) -> ConfigurationError {
    ConfigurationError::Invalid {
        key: format!("{ENV_PREFIX}{name}"),
        reason: reason.to_string(),
    }
}

/// Native id, or a hex address that encodes one.
fn parse_account(name: &str, raw: &str) -> Result<AccountId, ConfigurationError> {
    if raw.contains('.') {
        return raw.parse().map_err(|e| invalid(name, e));
    }
    let address = EvmAddress::parse(raw).map_err(|e| invalid(name, e))?;
    if !address.is_long_zero() {
        return Err(invalid(name, "address does not encode an account id"));
    }
    Ok(AccountId::from_evm_address(&address))
}

fn secs(raw: Option<String>, name: &str, default: u64) -> Result<Duration, ConfigurationError> {
    let secs = match raw {
        None => default,
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| invalid(name, "must be a positive integer"))?,
    };
    if secs == 0 {
        return Err(invalid(name, "must be a positive integer"));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AgentConfig, ConfigurationError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (format!("ZKREDIT_{k}"), v.to_string()))
            .collect();
        AgentConfig::from_lookup(|key| map.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("WORKER_ADDRESS", "0.0.1001"),
        ("RECEIVER_ADDRESS", "0.0.7001"),
    ];

    #[test]
    fn defaults_apply() {
        let c = load(&REQUIRED).unwrap();
        assert_eq!(c.network, LedgerNetwork::Testnet);
        assert_eq!(c.payment.contract_id, None);
        assert_eq!(c.payment.gas_limit, 600_000);
        assert_eq!(c.payment.settlement_timeout, Duration::from_secs(30));
        assert_eq!(c.proof_timeout, Duration::from_secs(60));
        assert_eq!(c.worker_account, AccountId::new(0, 0, 1001));
        assert_eq!(c.remittance_cap, Amount::from_whole(5_000));
        assert_eq!(c.ledger_topic, "0.0.920393");
        assert_eq!(c.log_level, "info");
        assert_eq!(c.log_format, "text");
    }

    #[test]
    fn missing_worker_address() {
        let err = load(&[("RECEIVER_ADDRESS", "0.0.7001")]).unwrap_err();
        assert_eq!(err, ConfigurationError::Missing("ZKREDIT_WORKER_ADDRESS".into()));
    }

    #[test]
    fn blank_receiver_counts_as_missing() {
        let err = load(&[("WORKER_ADDRESS", "0.0.1001"), ("RECEIVER_ADDRESS", "  ")]).unwrap_err();
        assert_eq!(err, ConfigurationError::Missing("ZKREDIT_RECEIVER_ADDRESS".into()));
    }

    #[test]
    fn unknown_network_falls_back_to_testnet() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("NETWORK", "devnet"));
        assert_eq!(load(&vars).unwrap().network, LedgerNetwork::Testnet);
    }

    #[test]
    fn overrides_are_read() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("NETWORK", "Mainnet"),
            ("PAYMENT_CONTRACT_ID", "0.0.6006"),
            ("REMITTANCE_CAP", "1000.50"),
            ("LEDGER_TOPIC", "0.0.42"),
            ("SETTLEMENT_TIMEOUT_SECS", "5"),
            ("PROOF_TIMEOUT_SECS", "7"),
            ("LOG_FORMAT", "json"),
        ]);
        let c = load(&vars).unwrap();
        assert_eq!(c.network, LedgerNetwork::Mainnet);
        assert_eq!(c.payment.contract_id.as_deref(), Some("0.0.6006"));
        assert_eq!(c.remittance_cap, "1000.50".parse().unwrap());
        assert_eq!(c.ledger_topic, "0.0.42");
        assert_eq!(c.payment.settlement_timeout, Duration::from_secs(5));
        assert_eq!(c.proof_timeout, Duration::from_secs(7));
        assert_eq!(c.log_format, "json");
    }

    #[test]
    fn hex_worker_address_must_encode_account() {
        let vars = [
            ("WORKER_ADDRESS", "0x00000000000000000000000000000000000003e9"),
            ("RECEIVER_ADDRESS", "0.0.7001"),
        ];
        assert_eq!(load(&vars).unwrap().worker_account, AccountId::new(0, 0, 1001));

        let alias = [
            ("WORKER_ADDRESS", "0xffffffffffffffffffffffffffffffffffffffff"),
            ("RECEIVER_ADDRESS", "0.0.7001"),
        ];
        assert!(matches!(load(&alias), Err(ConfigurationError::Invalid { .. })));
    }

    #[test]
    fn malformed_values_rejected() {
        for (key, value) in [
            ("RECEIVER_ADDRESS", "0xzz"),
            ("PAYMENT_CONTRACT_ID", "0.0.x"),
            ("REMITTANCE_CAP", "lots"),
            ("REMITTANCE_CAP", "0"),
            ("SETTLEMENT_TIMEOUT_SECS", "-1"),
            ("PROOF_TIMEOUT_SECS", "0"),
            ("LOG_FORMAT", "xml"),
        ] {
            let mut vars: Vec<(&str, &str)> =
                REQUIRED.iter().copied().filter(|(k, _)| *k != key).collect();
            vars.push((key, value));
            assert!(
                matches!(load(&vars), Err(ConfigurationError::Invalid { .. })),
                "{key}={value}"
            );
        }
    }
}
