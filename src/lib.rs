// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Reorg-aware reconciliation of gateway stake requests.
//!
//! This library ingests raw stake request events observed on an origin
//! chain and reconciles them into a durable record set keyed by request
//! hash. Chain reorganizations can re-deliver the same logical request at a
//! different block height; the merge policy in
//! [`handlers::StakeRequestHandler`] decides per event whether to re-arm
//! the stored record for downstream linkage or replace it outright.
//!
//! Event subscription, transaction submission and the persistence engine
//! behind [`store::StakeRequestStore`] are host concerns.

pub mod error;
pub mod events;
pub mod handlers;
pub mod metrics;
pub mod store;
pub mod types;

pub use error::{FacilitatorError, FacilitatorResult};
pub use events::{RawStakeRequestEvent, StakeRequestedEvent};
pub use handlers::{EntityHandler, StakeRequestHandler, StakeRequestHandlerConfig};
pub use metrics::FacilitatorMetrics;
pub use store::{InMemoryStakeRequestStore, StakeRequestStore};
pub use types::StakeRequest;
