//! The aggregation entry point and the freshness guard for async callers.

use crate::config::GroupSpec;
use crate::filter::Filters;
use crate::group::build_tree;
use crate::model::{Report, Transaction};
use crate::EngineError;

/// Run one full aggregation pass: validate the grouping, filter the batch,
/// derive per-pass fields, and build the roll-up tree.
///
/// Pure and synchronous: the result depends only on the arguments, nothing
/// is cached across calls, and the returned [`Report`] owns all of its data.
/// Data-quality problems (bad dates, non-finite numerics) never abort the
/// pass; they are counted in `report.warnings`. Only a misconfigured
/// `GroupSpec` or filter bound is an error.
pub fn aggregate(
    records: &[Transaction],
    filters: &Filters,
    spec: &GroupSpec,
) -> Result<Report, EngineError> {
    spec.validate()?;
    let (kept, mut warnings) = filters.apply(records)?;
    let root = build_tree(&kept, spec, &mut warnings);
    Ok(Report { root, warnings })
}

// ---------------------------------------------------------------------------
// ReportSession
// ---------------------------------------------------------------------------

/// Opaque handle for one requested computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Last-request-wins bookkeeping for callers that run [`aggregate`] off the
/// UI thread.
///
/// Call [`begin`](Self::begin) when a recomputation is requested and hand
/// the ticket to the worker; when the worker finishes,
/// [`install`](Self::install) accepts the report only if no newer request
/// was issued in the meantime. A stale result is refused and dropped; it
/// can never overwrite a fresher one. There is no mid-computation
/// cancellation to perform, since `aggregate` is a pure function.
#[derive(Debug, Default)]
pub struct ReportSession {
    latest: u64,
    report: Option<Report>,
}

impl ReportSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new computation request, superseding all earlier ones.
    pub fn begin(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Install a completed report. Returns `false` (report discarded) when
    /// the ticket has been superseded by a later `begin`.
    pub fn install(&mut self, ticket: Ticket, report: Report) -> bool {
        if ticket.0 != self.latest {
            return false;
        }
        self.report = Some(report);
        true
    }

    /// The most recently installed report, if any.
    pub fn current(&self) -> Option<&Report> {
        self.report.as_ref()
    }
}
