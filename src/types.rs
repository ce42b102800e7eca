// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The persisted stake request entity.

use crate::events::StakeRequestedEvent;
use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stake request tracked by the facilitator, keyed by its request hash.
///
/// `message_hash` is set by the downstream acceptance process once the
/// request is linked to an on-chain message; while it is `None` the record
/// is awaiting (re)processing. A re-delivery of the same request at a
/// strictly higher block keeps the originally recorded terms; any other
/// re-delivery replaces the record wholesale (see
/// [`StakeRequestHandler`](crate::handlers::StakeRequestHandler)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRequest {
    pub request_hash: H256,
    pub amount: U256,
    pub gas_price: U256,
    pub gas_limit: U256,
    pub nonce: U256,
    #[serde(with = "checksum_address")]
    pub beneficiary: Address,
    #[serde(with = "checksum_address")]
    pub gateway: Address,
    #[serde(with = "checksum_address")]
    pub staker: Address,
    #[serde(with = "checksum_address")]
    pub staker_proxy: Address,
    pub block_number: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_hash: Option<H256>,
}

impl StakeRequest {
    /// Build a fresh record from a normalized event, awaiting linkage.
    pub fn from_event(event: &StakeRequestedEvent) -> Self {
        Self {
            request_hash: event.request_hash,
            amount: event.amount,
            gas_price: event.gas_price,
            gas_limit: event.gas_limit,
            nonce: event.nonce,
            beneficiary: event.beneficiary,
            gateway: event.gateway,
            staker: event.staker,
            staker_proxy: event.staker_proxy,
            block_number: event.block_number,
            message_hash: None,
        }
    }

    /// True while no downstream message has been linked to this request.
    pub fn awaiting_linkage(&self) -> bool {
        self.message_hash.is_none()
    }
}

impl fmt::Display for StakeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StakeRequest({}, block={}, {})",
            self.request_hash,
            self.block_number,
            if self.awaiting_linkage() {
                "awaiting linkage"
            } else {
                "linked"
            }
        )
    }
}

/// Serialize account addresses in their EIP-55 checksummed rendering;
/// accept any-case hex on the way in.
mod checksum_address {
    use ethers::types::Address;
    use ethers::utils::to_checksum;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_checksum(address, None))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Address::from_str(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record() -> StakeRequest {
        StakeRequest {
            request_hash: H256::from_low_u64_be(0xaa),
            amount: U256::from(10u64),
            gas_price: U256::from(5u64),
            gas_limit: U256::from(100u64),
            nonce: U256::from(1u64),
            beneficiary: Address::from_str("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap(),
            gateway: Address::from_low_u64_be(0x6a),
            staker: Address::from_low_u64_be(0x57),
            staker_proxy: Address::from_low_u64_be(0x58),
            block_number: U256::from(100u64),
            message_hash: None,
        }
    }

    #[test]
    fn test_addresses_serialize_with_eip55_checksum() {
        let value = serde_json::to_value(record()).unwrap();
        // Known EIP-55 vector
        assert_eq!(
            value["beneficiary"],
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn test_absent_message_hash_is_omitted() {
        let value = serde_json::to_value(record()).unwrap();
        assert!(value.get("message_hash").is_none());

        let mut linked = record();
        linked.message_hash = Some(H256::from_low_u64_be(0x99));
        let value = serde_json::to_value(linked).unwrap();
        assert!(value.get("message_hash").is_some());
    }

    #[test]
    fn test_record_roundtrips_through_serde() {
        let mut original = record();
        original.message_hash = Some(H256::from_low_u64_be(0x99));

        let json = serde_json::to_string(&original).unwrap();
        let decoded: StakeRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_checksummed_input_deserializes_to_same_address() {
        let json = serde_json::to_string(&record()).unwrap();
        let decoded: StakeRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.beneficiary, record().beneficiary);
    }

    #[test]
    fn test_awaiting_linkage() {
        let mut record = record();
        assert!(record.awaiting_linkage());
        record.message_hash = Some(H256::from_low_u64_be(0x99));
        assert!(!record.awaiting_linkage());
    }

    #[test]
    fn test_display_reports_linkage_state() {
        let mut record = record();
        assert!(format!("{}", record).contains("awaiting linkage"));
        record.message_hash = Some(H256::from_low_u64_be(0x99));
        assert!(format!("{}", record).contains("linked"));
    }
}
