// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Raw stake request events as delivered by the origin-chain ingestion
//! layer, and their normalized form. Normalization checksums the address
//! fields and parses every numeric field as a 256-bit integer, so values
//! beyond the 53-bit safe-integer range survive intact.

use crate::error::{FacilitatorError, FacilitatorResult};
use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Wire shape of a stake request event observed on the origin chain.
///
/// All fields arrive as strings: decimal strings for the numeric fields,
/// any-case hex for hashes and addresses. Nothing is validated until the
/// event is normalized into a [`StakeRequestedEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStakeRequestEvent {
    pub request_hash: String,
    pub amount: String,
    pub gas_price: String,
    pub gas_limit: String,
    pub nonce: String,
    pub beneficiary: String,
    pub gateway: String,
    pub staker: String,
    pub staker_proxy: String,
    pub block_number: String,
}

/// Sanitized version of [`RawStakeRequestEvent`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeRequestedEvent {
    pub request_hash: H256,
    pub amount: U256,
    pub gas_price: U256,
    pub gas_limit: U256,
    pub nonce: U256,
    pub beneficiary: Address,
    pub gateway: Address,
    pub staker: Address,
    pub staker_proxy: Address,
    pub block_number: U256,
}

impl TryFrom<&RawStakeRequestEvent> for StakeRequestedEvent {
    type Error = FacilitatorError;

    fn try_from(raw: &RawStakeRequestEvent) -> FacilitatorResult<Self> {
        Ok(Self {
            request_hash: parse_hash("requestHash", &raw.request_hash)?,
            amount: parse_uint("amount", &raw.amount)?,
            gas_price: parse_uint("gasPrice", &raw.gas_price)?,
            gas_limit: parse_uint("gasLimit", &raw.gas_limit)?,
            nonce: parse_uint("nonce", &raw.nonce)?,
            beneficiary: parse_address("beneficiary", &raw.beneficiary)?,
            gateway: parse_address("gateway", &raw.gateway)?,
            staker: parse_address("staker", &raw.staker)?,
            staker_proxy: parse_address("stakerProxy", &raw.staker_proxy)?,
            block_number: parse_uint("blockNumber", &raw.block_number)?,
        })
    }
}

/// Parse a 32-byte hash from an optionally 0x-prefixed hex string.
pub(crate) fn parse_hash(field: &'static str, value: &str) -> FacilitatorResult<H256> {
    H256::from_str(value).map_err(|_| FacilitatorError::InvalidHash {
        field,
        value: value.to_string(),
    })
}

/// Parse a 20-byte account address from an optionally 0x-prefixed hex
/// string of any case. The parsed form is canonical, so two observations
/// of the same address compare equal regardless of input casing.
pub(crate) fn parse_address(field: &'static str, value: &str) -> FacilitatorResult<Address> {
    Address::from_str(value).map_err(|_| FacilitatorError::InvalidAddress {
        field,
        value: value.to_string(),
    })
}

/// Parse a non-negative decimal integer into a 256-bit value.
pub(crate) fn parse_uint(field: &'static str, value: &str) -> FacilitatorResult<U256> {
    if value.is_empty() {
        return Err(FacilitatorError::InvalidNumeric {
            field,
            value: value.to_string(),
        });
    }
    U256::from_dec_str(value).map_err(|_| FacilitatorError::InvalidNumeric {
        field,
        value: value.to_string(),
    })
}
