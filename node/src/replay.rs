//! Scripted call replay.
//!
//! A script is a JSON array of steps. Each step names the caller, the call,
//! and optionally the revert reason the call is expected to fail with:
//!
//! ```json
//! [
//!   { "caller": "admin", "call": { "op": "add_student", "account": "student1" } },
//!   { "caller": "student1", "call": { "op": "mint", "to": "student1", "amount": "1" },
//!     "expect_error": "Only admin can call this" }
//! ]
//! ```
//!
//! Every step produces one JSON line on the output. A step diverges when a
//! call expected to commit is rejected, or a call expected to fail commits
//! or fails with a different reason.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use campus_contracts::{Call, CallOutcome, EventRecord, LedgerSnapshot, PaymentReceipt, SharedLedger};
use campus_protocol::Address;

use crate::metrics::ReplayMetrics;

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub caller: Address,
    pub call: Call,
    /// Revert reason this call must fail with. `None` means it must commit.
    #[serde(default)]
    pub expect_error: Option<String>,
    /// Free-form label echoed in the report.
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Committed,
    Rejected,
}

/// One line of replay output.
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub op: &'static str,
    pub caller: Address,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<PaymentReceipt>,
    pub matched: bool,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Serialize)]
pub struct ReplaySummary {
    pub steps: usize,
    pub committed: usize,
    pub rejected: usize,
    /// Indices of steps whose result differed from the expectation.
    pub diverged: Vec<usize>,
    pub supply_invariant_holds: bool,
    pub snapshot: LedgerSnapshot,
}

impl ReplaySummary {
    pub fn is_clean(&self) -> bool {
        self.diverged.is_empty() && self.supply_invariant_holds
    }

    /// Turns an unclean run into an error naming what went wrong.
    pub fn ensure_clean(&self) -> Result<()> {
        if self.is_clean() {
            return Ok(());
        }
        if !self.supply_invariant_holds {
            bail!("total supply no longer equals the sum of balances");
        }
        bail!(
            "{} step(s) diverged from expectation: {:?}",
            self.diverged.len(),
            self.diverged
        )
    }
}

pub fn load_script(path: &Path) -> Result<Vec<Step>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    parse_script(&raw).with_context(|| format!("invalid script {}", path.display()))
}

pub fn parse_script(raw: &str) -> Result<Vec<Step>> {
    Ok(serde_json::from_str(raw)?)
}

/// Executes `steps` in order against `ledger`, writing one JSON line per
/// step to `out`. With `fail_fast`, stops after the first divergence.
pub fn replay<W: Write>(
    ledger: &SharedLedger,
    steps: &[Step],
    metrics: &ReplayMetrics,
    fail_fast: bool,
    out: &mut W,
) -> Result<ReplaySummary> {
    let mut committed = 0;
    let mut rejected = 0;
    let mut diverged = Vec::new();

    for (index, step) in steps.iter().enumerate() {
        let op = step.call.name();
        let first_new = ledger.read(|coin| coin.events().len() as u64);

        let timer = metrics.call_latency_seconds.start_timer();
        let result = ledger.execute(step.caller, step.call.clone());
        timer.observe_duration();
        metrics.calls_total.with_label_values(&[op]).inc();

        let events = ledger.events_since(first_new);
        metrics.events_emitted_total.inc_by(events.len() as u64);

        let matched = match (&result, step.expect_error.as_deref()) {
            (Ok(_), None) => true,
            (Err(e), Some(expected)) => e.reason() == expected,
            _ => false,
        };

        let mut report = StepReport {
            step: index,
            note: step.note.clone(),
            op,
            caller: step.caller,
            status: StepStatus::Committed,
            kind: None,
            reason: None,
            receipt: None,
            matched,
            events,
        };
        match result {
            Ok(outcome) => {
                committed += 1;
                if let CallOutcome::Paid(receipt) = outcome {
                    report.receipt = Some(receipt);
                }
            }
            Err(e) => {
                rejected += 1;
                metrics
                    .calls_rejected_total
                    .with_label_values(&[e.kind().as_str()])
                    .inc();
                report.status = StepStatus::Rejected;
                report.kind = Some(e.kind().as_str());
                report.reason = Some(e.reason());
            }
        }

        serde_json::to_writer(&mut *out, &report)?;
        writeln!(out)?;

        if !matched {
            tracing::warn!(
                step = index,
                op,
                expected = step.expect_error.as_deref().unwrap_or("commit"),
                got = report.reason.unwrap_or("commit"),
                "step diverged from expectation"
            );
            diverged.push(index);
            if fail_fast {
                break;
            }
        }
    }

    let (snapshot, supply_invariant_holds) =
        ledger.read(|coin| (coin.snapshot(), coin.check_supply_invariant()));

    Ok(ReplaySummary {
        steps: committed + rejected,
        committed,
        rejected,
        diverged,
        supply_invariant_holds,
        snapshot,
    })
}
