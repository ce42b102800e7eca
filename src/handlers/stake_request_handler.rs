// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Stake request reconciliation
//!
//! Raw stake request events observed on the origin chain are normalized,
//! resolved against the record store and persisted:
//!
//! ```text
//! RawStakeRequestEvent
//!        │
//!        ▼ (parse all fields, reject batch on first malformed event)
//! StakeRequestedEvent
//!        │
//!        ▼ (store.get per event, concurrent)
//! merge policy ──► brand-new record        (no prior record, or
//!        │          from the event          observed block <= stored block;
//!        │                                  any stored message hash is lost)
//!        └───────► stored record with      (observed block > stored block;
//!                   bumped block height     stored terms kept, linkage
//!                   and cleared linkage     re-armed)
//!        │
//!        ▼ (store.save per record, awaited before returning)
//! Vec<StakeRequest> in input order
//! ```
//!
//! Two events in one batch that share a request hash race on the same
//! stored record and the last save wins, unless
//! [`StakeRequestHandlerConfig::serialize_duplicate_keys`] is set, in which
//! case the batch resolves duplicates in input order deterministically.

use crate::error::{FacilitatorError, FacilitatorResult};
use crate::events::{RawStakeRequestEvent, StakeRequestedEvent};
use crate::handlers::EntityHandler;
use crate::metrics::FacilitatorMetrics;
use crate::store::StakeRequestStore;
use crate::types::StakeRequest;
use async_trait::async_trait;
use ethers::types::H256;
use futures::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for [`StakeRequestHandler`]
#[derive(Clone, Debug, Default)]
pub struct StakeRequestHandlerConfig {
    /// Resolve events sharing a request hash in input order against each
    /// other's outcome, and issue their saves sequentially, instead of
    /// letting them race with last save winning. Changes the observable
    /// outcome of duplicate-key batches.
    pub serialize_duplicate_keys: bool,
}

/// Reconciles observed stake request events into the record store.
///
/// One record is kept per request hash. A re-delivery at a strictly higher
/// block keeps the originally recorded economic terms, bumps the block
/// height and clears the message hash so downstream linkage runs again;
/// every other observation replaces the stored record wholesale, dropping
/// any recorded message hash.
pub struct StakeRequestHandler<S> {
    store: Arc<S>,
    config: StakeRequestHandlerConfig,
    metrics: Arc<FacilitatorMetrics>,
}

impl<S: StakeRequestStore> StakeRequestHandler<S> {
    pub fn new(
        store: Arc<S>,
        config: StakeRequestHandlerConfig,
        metrics: Arc<FacilitatorMetrics>,
    ) -> Self {
        Self {
            store,
            config,
            metrics,
        }
    }

    /// Decide the record for one event against whatever is stored.
    fn merge(&self, event: &StakeRequestedEvent, existing: Option<StakeRequest>) -> StakeRequest {
        match existing {
            Some(mut record) if event.block_number > record.block_number => {
                debug!(
                    "[StakeRequestHandler] Re-arming stake request {}: block {} -> {}",
                    record.request_hash, record.block_number, event.block_number
                );
                record.block_number = event.block_number;
                record.message_hash = None;
                self.metrics.stake_requests_rearmed.inc();
                record
            }
            Some(record) => {
                if let Some(message_hash) = record.message_hash {
                    warn!(
                        "[StakeRequestHandler] Dropping message hash {} of stake request {}: re-delivered at block {} (stored block {})",
                        message_hash, record.request_hash, event.block_number, record.block_number
                    );
                }
                debug!(
                    "[StakeRequestHandler] Replacing stake request {}: observed block {} <= stored block {}",
                    record.request_hash, event.block_number, record.block_number
                );
                self.metrics.stake_requests_replaced.inc();
                StakeRequest::from_event(event)
            }
            None => {
                debug!(
                    "[StakeRequestHandler] New stake request {} at block {}",
                    event.request_hash, event.block_number
                );
                self.metrics.stake_requests_created.inc();
                StakeRequest::from_event(event)
            }
        }
    }

    async fn resolve(&self, event: &StakeRequestedEvent) -> FacilitatorResult<StakeRequest> {
        let existing = self.store.get(&event.request_hash).await?;
        Ok(self.merge(event, existing))
    }

    /// Resolve a batch with per-key serialization: events sharing a request
    /// hash see the outcome of the previous event in the group rather than
    /// the prior stored record.
    async fn resolve_serialized(
        &self,
        events: &[StakeRequestedEvent],
    ) -> FacilitatorResult<Vec<StakeRequest>> {
        let mut group_index: HashMap<H256, usize> = HashMap::new();
        let mut groups: Vec<(H256, Vec<usize>)> = Vec::new();
        for (idx, event) in events.iter().enumerate() {
            match group_index.get(&event.request_hash) {
                Some(&group) => groups[group].1.push(idx),
                None => {
                    group_index.insert(event.request_hash, groups.len());
                    groups.push((event.request_hash, vec![idx]));
                }
            }
        }

        let mut resolved: Vec<Option<StakeRequest>> = vec![None; events.len()];
        for (request_hash, indices) in groups {
            let mut current = self.store.get(&request_hash).await?;
            for idx in indices {
                let record = self.merge(&events[idx], current.take());
                current = Some(record.clone());
                resolved[idx] = Some(record);
            }
        }

        Ok(resolved
            .into_iter()
            .map(|record| record.expect("every input index belongs to exactly one group"))
            .collect())
    }

    async fn persist_batch(
        &self,
        raw_events: Vec<RawStakeRequestEvent>,
    ) -> FacilitatorResult<Vec<StakeRequest>> {
        // Parse every event before touching the store, so one malformed
        // field rejects the batch with nothing persisted.
        let events = raw_events
            .iter()
            .map(StakeRequestedEvent::try_from)
            .collect::<FacilitatorResult<Vec<_>>>()?;

        self.metrics
            .stake_requests_received
            .inc_by(events.len() as u64);

        let resolved = if self.config.serialize_duplicate_keys {
            self.resolve_serialized(&events).await?
        } else {
            try_join_all(events.iter().map(|event| self.resolve(event))).await?
        };

        // One save per resolved record, all awaited before returning. The
        // saves are not transactional: the first failure is reported and
        // saves already committed stay committed.
        let persisted = if self.config.serialize_duplicate_keys {
            let mut persisted = Vec::with_capacity(resolved.len());
            for record in resolved {
                persisted.push(self.store.save(record).await?);
            }
            persisted
        } else {
            try_join_all(resolved.into_iter().map(|record| self.store.save(record))).await?
        };

        info!(
            "[StakeRequestHandler] Persisted batch of {} stake requests",
            persisted.len()
        );

        Ok(persisted)
    }

    fn observe_error(&self, err: &FacilitatorError) {
        match err {
            FacilitatorError::Storage(_) => self.metrics.err_storage.inc(),
            other => self
                .metrics
                .err_parse
                .with_label_values(&[other.error_type()])
                .inc(),
        }
    }
}

#[async_trait]
impl<S: StakeRequestStore> EntityHandler for StakeRequestHandler<S> {
    type Raw = RawStakeRequestEvent;
    type Entity = StakeRequest;

    async fn persist(
        &self,
        raw_events: Vec<RawStakeRequestEvent>,
    ) -> FacilitatorResult<Vec<StakeRequest>> {
        let _timer = self.metrics.persist_latency.start_timer();
        match self.persist_batch(raw_events).await {
            Ok(records) => Ok(records),
            Err(err) => {
                self.observe_error(&err);
                Err(err)
            }
        }
    }
}
