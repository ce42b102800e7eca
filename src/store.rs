// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Record store boundary - keyed get/save over persisted stake requests
//!
//! The persistence engine behind this trait is a host concern; the
//! facilitator only depends on point lookup and upsert by request hash.
//! An in-memory implementation is provided for hosts that keep the record
//! set resident and for tests.

use crate::error::FacilitatorResult;
use crate::types::StakeRequest;
use async_trait::async_trait;
use ethers::types::H256;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Keyed persistence for stake request records.
#[async_trait]
pub trait StakeRequestStore: Send + Sync {
    /// Point lookup by request hash.
    async fn get(&self, request_hash: &H256) -> FacilitatorResult<Option<StakeRequest>>;

    /// Upsert by request hash. Returns the persisted value.
    async fn save(&self, record: StakeRequest) -> FacilitatorResult<StakeRequest>;
}

/// In-memory store for stake request records
#[derive(Debug, Default)]
pub struct InMemoryStakeRequestStore {
    records: RwLock<HashMap<H256, StakeRequest>>,
}

impl InMemoryStakeRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl StakeRequestStore for InMemoryStakeRequestStore {
    async fn get(&self, request_hash: &H256) -> FacilitatorResult<Option<StakeRequest>> {
        Ok(self.records.read().await.get(request_hash).cloned())
    }

    async fn save(&self, record: StakeRequest) -> FacilitatorResult<StakeRequest> {
        debug!(
            "[StakeRequestStore] Saving {} (block={})",
            record.request_hash, record.block_number
        );
        let mut records = self.records.write().await;
        records.insert(record.request_hash, record.clone());
        Ok(record)
    }
}
