//! # Prometheus Metrics
//!
//! Counts calls, rejections and emitted events during a replay run, and
//! times each call. Printed in the Prometheus text exposition format when
//! `replay --metrics` is given.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] so they
//! do not collide with any default global registry consumers.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Holds all Prometheus metric handles for a replay run.
#[derive(Clone)]
pub struct ReplayMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Calls executed, labeled by operation name.
    pub calls_total: IntCounterVec,
    /// Calls rejected, labeled by error kind.
    pub calls_rejected_total: IntCounterVec,
    /// Ledger events appended across all committed calls.
    pub events_emitted_total: IntCounter,
    /// Time spent inside the ledger per call, in seconds.
    pub call_latency_seconds: Histogram,
}

impl ReplayMetrics {
    /// Creates and registers all metrics.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("campus".into()), None)?;

        let calls_total = IntCounterVec::new(
            Opts::new("calls_total", "Ledger calls executed, by operation"),
            &["op"],
        )?;
        registry.register(Box::new(calls_total.clone()))?;

        let calls_rejected_total = IntCounterVec::new(
            Opts::new("calls_rejected_total", "Ledger calls rejected, by reason"),
            &["reason"],
        )?;
        registry.register(Box::new(calls_rejected_total.clone()))?;

        let events_emitted_total = IntCounter::new(
            "events_emitted_total",
            "Ledger events appended by committed calls",
        )?;
        registry.register(Box::new(events_emitted_total.clone()))?;

        let call_latency_seconds = Histogram::with_opts(
            HistogramOpts::new("call_latency_seconds", "Ledger call latency in seconds").buckets(
                vec![
                    0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005,
                    0.01,
                ],
            ),
        )?;
        registry.register(Box::new(call_latency_seconds.clone()))?;

        Ok(Self {
            registry,
            calls_total,
            calls_rejected_total,
            events_emitted_total,
            call_latency_seconds,
        })
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
