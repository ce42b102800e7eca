// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Business-logic handlers that turn raw chain events into persisted records.

use crate::error::FacilitatorResult;
use async_trait::async_trait;

mod stake_request_handler;

pub use stake_request_handler::{StakeRequestHandler, StakeRequestHandlerConfig};

/// Capability contract for persisting a batch of raw events.
///
/// Any type that can resolve raw events of its `Raw` shape into persisted
/// entities satisfies this role; there is no required base type.
#[async_trait]
pub trait EntityHandler: Send + Sync {
    /// Raw event shape consumed by this handler.
    type Raw: Send;
    /// Persisted entity produced by this handler.
    type Entity: Send;

    /// Resolve and persist a batch of raw events.
    ///
    /// Returns the persisted entities in input order, one per input event.
    /// Rejects on any parse or storage failure; a parse failure rejects the
    /// batch before anything is persisted.
    async fn persist(&self, raw_events: Vec<Self::Raw>) -> FacilitatorResult<Vec<Self::Entity>>;
}
