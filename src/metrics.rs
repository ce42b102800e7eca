// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, Histogram, IntCounter, IntCounterVec, Registry,
};

const PERSIST_LATENCY_SEC_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10., 30., 60.,
];

#[derive(Clone, Debug)]
pub struct FacilitatorMetrics {
    pub(crate) stake_requests_received: IntCounter,
    pub(crate) stake_requests_created: IntCounter,
    pub(crate) stake_requests_rearmed: IntCounter,
    pub(crate) stake_requests_replaced: IntCounter,
    pub(crate) err_parse: IntCounterVec,
    pub(crate) err_storage: IntCounter,
    pub(crate) persist_latency: Histogram,
}

impl FacilitatorMetrics {
    pub fn new(registry: &Registry) -> Self {
        Self {
            stake_requests_received: register_int_counter_with_registry!(
                "facilitator_stake_requests_received",
                "Total number of raw stake request events received for persistence",
                registry,
            )
            .unwrap(),
            stake_requests_created: register_int_counter_with_registry!(
                "facilitator_stake_requests_created",
                "Total number of stake request records created for a fresh request hash",
                registry,
            )
            .unwrap(),
            stake_requests_rearmed: register_int_counter_with_registry!(
                "facilitator_stake_requests_rearmed",
                "Total number of records re-armed by a higher-block re-delivery",
                registry,
            )
            .unwrap(),
            stake_requests_replaced: register_int_counter_with_registry!(
                "facilitator_stake_requests_replaced",
                "Total number of records replaced by a non-advancing re-delivery",
                registry,
            )
            .unwrap(),
            err_parse: register_int_counter_vec_with_registry!(
                "facilitator_err_parse",
                "Total number of rejected batches with a malformed event, by error type",
                &["error_type"],
                registry,
            )
            .unwrap(),
            err_storage: register_int_counter_with_registry!(
                "facilitator_err_storage",
                "Total number of record store failures surfaced to callers",
                registry,
            )
            .unwrap(),
            persist_latency: register_histogram_with_registry!(
                "facilitator_persist_latency",
                "Latency of persist batches in seconds",
                PERSIST_LATENCY_SEC_BUCKETS.to_vec(),
                registry,
            )
            .unwrap(),
        }
    }

    pub fn new_for_testing() -> Self {
        let registry = Registry::new();
        Self::new(&registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_for_testing() {
        let metrics = FacilitatorMetrics::new_for_testing();
        metrics.stake_requests_received.inc_by(3);
        metrics.stake_requests_created.inc();
        assert_eq!(metrics.stake_requests_received.get(), 3);
        assert_eq!(metrics.stake_requests_created.get(), 1);
    }

    #[test]
    fn test_err_parse_labels() {
        let metrics = FacilitatorMetrics::new_for_testing();
        metrics.err_parse.with_label_values(&["invalid_address"]).inc();
        metrics.err_parse.with_label_values(&["invalid_numeric"]).inc();
        metrics.err_parse.with_label_values(&["invalid_numeric"]).inc();
        assert_eq!(
            metrics
                .err_parse
                .with_label_values(&["invalid_numeric"])
                .get(),
            2
        );
    }

    #[test]
    fn test_registry_exposes_facilitator_families() {
        let registry = Registry::new();
        let metrics = FacilitatorMetrics::new(&registry);
        metrics.stake_requests_replaced.inc();

        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "facilitator_stake_requests_replaced"));
    }
}
