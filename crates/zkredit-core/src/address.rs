//! Ledger address types.
//!
//! Two textual forms identify the same account:
//! - native account ids, `shard.realm.num` (e.g. `0.0.123456`);
//! - 20-byte hex addresses, `0x` followed by 40 hex characters.
//!
//! A native id maps onto the "long-zero" hex form: 4 bytes of shard, 8 bytes
//! of realm, and 8 bytes of account number, all big-endian. [`EvmAddress`]
//! is the canonical representation; its `Display` form is the normalized
//! address string.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Length of a hex-style address in bytes.
pub const EVM_ADDRESS_LEN: usize = 20;

/// A canonical 20-byte ledger address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EvmAddress([u8; EVM_ADDRESS_LEN]);

impl EvmAddress {
    /// The all-zero address.
    pub const ZERO: EvmAddress = EvmAddress([0u8; EVM_ADDRESS_LEN]);

    pub const fn from_bytes(bytes: [u8; EVM_ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; EVM_ADDRESS_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; EVM_ADDRESS_LEN]
    }

    /// Parse either a native account id or a hex address.
    ///
    /// Hex input may omit the `0x` prefix and may be shorter than 40
    /// characters, in which case it is left-padded with zeros.
    ///
    /// # Examples
    ///
    /// ```
    /// use zkredit_core::address::EvmAddress;
    ///
    /// let native = EvmAddress::parse("0.0.1234").unwrap();
    /// assert_eq!(native.to_string(), "0x00000000000000000000000000000000000004d2");
    ///
    /// let short = EvmAddress::parse("4d2").unwrap();
    /// assert_eq!(short, native);
    /// ```
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::EmptyAddress);
        }
        if value.contains('.') {
            return Ok(value.parse::<AccountId>()?.to_evm_address());
        }

        let hex_part = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .unwrap_or(value);
        if hex_part.is_empty() || hex_part.len() > EVM_ADDRESS_LEN * 2 {
            return Err(ValidationError::MalformedAddress(value.to_string()));
        }

        let padded = format!("{:0>width$}", hex_part, width = EVM_ADDRESS_LEN * 2);
        let mut bytes = [0u8; EVM_ADDRESS_LEN];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|_| ValidationError::MalformedAddress(value.to_string()))?;
        Ok(Self(bytes))
    }

    /// Whether this address is a long-zero encoding of a native account id.
    ///
    /// Long-zero addresses have zero shard and realm bytes; the account
    /// number sits in the last 8 bytes.
    pub fn is_long_zero(&self) -> bool {
        self.0[..12] == [0u8; 12]
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvmAddress({self})")
    }
}

impl FromStr for EvmAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for EvmAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EvmAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        EvmAddress::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A native ledger account id, `shard.realm.num`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId {
    pub shard: u32,
    pub realm: u64,
    pub num: u64,
}

impl AccountId {
    pub const fn new(shard: u32, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }

    /// Long-zero hex form of this account id.
    pub fn to_evm_address(&self) -> EvmAddress {
        let mut bytes = [0u8; EVM_ADDRESS_LEN];
        bytes[..4].copy_from_slice(&self.shard.to_be_bytes());
        bytes[4..12].copy_from_slice(&self.realm.to_be_bytes());
        bytes[12..].copy_from_slice(&self.num.to_be_bytes());
        EvmAddress(bytes)
    }

    /// Recover the account id encoded in a long-zero address.
    ///
    /// Every 20-byte value decodes to some `shard.realm.num`; callers that
    /// need to reject alias-style addresses should check
    /// [`EvmAddress::is_long_zero`] first.
    pub fn from_evm_address(address: &EvmAddress) -> Self {
        let b = address.as_bytes();
        let mut shard = [0u8; 4];
        let mut realm = [0u8; 8];
        let mut num = [0u8; 8];
        shard.copy_from_slice(&b[..4]);
        realm.copy_from_slice(&b[4..12]);
        num.copy_from_slice(&b[12..]);
        Self {
            shard: u32::from_be_bytes(shard),
            realm: u64::from_be_bytes(realm),
            num: u64::from_be_bytes(num),
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::EmptyAddress);
        }
        let malformed = || ValidationError::MalformedAddress(s.to_string());
        let mut parts = s.split('.');
        let (Some(shard), Some(realm), Some(num), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        Ok(Self {
            shard: shard.parse().map_err(|_| malformed())?,
            realm: realm.parse().map_err(|_| malformed())?,
            num: num.parse().map_err(|_| malformed())?,
        })
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn native_id_maps_to_long_zero() {
        let addr = EvmAddress::parse("0.0.920393").unwrap();
        assert_eq!(addr.to_string(), "0x00000000000000000000000000000000000e0b49");
        assert!(addr.is_long_zero());
    }

    #[test]
    fn shard_and_realm_are_encoded() {
        let addr = AccountId::new(1, 2, 3).to_evm_address();
        assert_eq!(addr.to_string(), "0x0000000100000000000000020000000000000003");
    }

    #[test]
    fn hex_without_prefix_gets_prefix() {
        let addr = EvmAddress::parse("AbCdEf0123456789abcdef0123456789ABCDEF01").unwrap();
        assert_eq!(addr.to_string(), "0xabcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn short_hex_is_left_padded() {
        let addr = EvmAddress::parse("0x1").unwrap();
        assert_eq!(addr.to_string(), format!("0x{}1", "0".repeat(39)));
    }

    #[test]
    fn empty_is_rejected() {
        assert_eq!(EvmAddress::parse(""), Err(ValidationError::EmptyAddress));
        assert_eq!(EvmAddress::parse("   "), Err(ValidationError::EmptyAddress));
    }

    #[test]
    fn malformed_inputs_rejected() {
        for bad in [
            "0x",
            "0xzz",
            "0x00000000000000000000000000000000000000001",
            "0.0",
            "0.0.x",
            "1.2.3.4",
        ] {
            assert!(
                matches!(EvmAddress::parse(bad), Err(ValidationError::MalformedAddress(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn account_id_roundtrip_through_address() {
        let id = AccountId::new(0, 0, 5_012_345);
        assert_eq!(AccountId::from_evm_address(&id.to_evm_address()), id);
        assert_eq!(id.to_string().parse::<AccountId>().unwrap(), id);
    }

    #[test]
    fn alias_address_is_not_long_zero() {
        let addr = EvmAddress::parse("0xffffffffffffffffffffffffffffffffffffffff").unwrap();
        assert!(!addr.is_long_zero());
    }

    #[test]
    fn serde_uses_canonical_string() {
        let addr = EvmAddress::parse("0.0.7").unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x0000000000000000000000000000000000000007\"");
        let back: EvmAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn account_id_serializes_as_native_string() {
        let id = AccountId::new(0, 0, 1001);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0.0.1001\"");
        assert_eq!(serde_json::from_str::<AccountId>(&json).unwrap(), id);
        assert!(serde_json::from_str::<AccountId>("\"0.0\"").is_err());
    }

    proptest! {
        #[test]
        fn parse_is_idempotent(bytes in proptest::array::uniform20(any::<u8>())) {
            let once = EvmAddress::from_bytes(bytes).to_string();
            let twice = EvmAddress::parse(&once).unwrap().to_string();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn native_parse_is_idempotent(shard in any::<u32>(), realm in any::<u64>(), num in any::<u64>()) {
            let once = EvmAddress::parse(&format!("{shard}.{realm}.{num}")).unwrap();
            let twice = EvmAddress::parse(&once.to_string()).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
