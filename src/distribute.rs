//! Quadrant distribution and the final reduction.
//!
//! The coordinator splits the root box `partition_depth` times, hands every
//! quadrant to a worker on a rayon pool, and waits for all of them. Each
//! worker owns its own bound and candidate set; nothing is shared while the
//! workers run except the read-only objective and precision. The reports
//! are then folded into one answer:
//!
//! 1. `min_ub` is the minimum of the workers' bounds;
//! 2. all candidate sets are merged and every record whose lower bound
//!    exceeds the global `min_ub` is purged. A worker only purged against
//!    its own bound, which may be looser than the global one.
//!
//! With `parallel = false` the same quadrants are searched one after another
//! on the calling thread, each still starting from `+inf`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::candidates::CandidateSet;
use crate::error::{MinimizeError, Result};
use crate::search::BranchAndBound;
use crate::trace::TraceWriter;
use crate::types::{Evaluable, SearchBox, SearchOptions, SearchResult, SearchStats};

/// What one worker sends back to the coordinator.
#[derive(Debug, Clone)]
pub struct WorkerReport {
    /// Index of the quadrant in partition order.
    pub quadrant: usize,
    pub region: SearchBox,
    /// The worker's local best bound.
    pub min_ub: f64,
    pub candidates: CandidateSet,
    pub stats: SearchStats,
}

/// Split `root` `depth` times into `4^depth` quadrants.
///
/// Quadrants come out in the order a depth-first search would reach them.
pub fn partition(root: &SearchBox, depth: u32) -> Vec<SearchBox> {
    let mut boxes = vec![*root];
    for _ in 0..depth {
        boxes = boxes.iter().flat_map(|b| b.split()).collect();
    }
    boxes
}

/// Search one quadrant from scratch.
pub fn run_worker<E: Evaluable + ?Sized>(
    func: &E,
    quadrant: usize,
    region: SearchBox,
    precision: f64,
    tracer: Option<Arc<TraceWriter>>,
) -> Result<WorkerReport> {
    let mut bnb = BranchAndBound::new(func, precision)?;
    if let Some(tw) = tracer {
        bnb = bnb.with_tracer(tw);
    }
    bnb.search(region);
    let (min_ub, candidates, stats) = bnb.into_parts();
    debug!(
        quadrant,
        region = %region,
        min_ub,
        candidates = candidates.len(),
        nfev = stats.nfev,
        "worker finished"
    );
    Ok(WorkerReport {
        quadrant,
        region,
        min_ub,
        candidates,
        stats,
    })
}

/// Fold worker reports into one result.
///
/// # Errors
/// Returns `MinimizeError::InvalidArgs` if a quadrant index is out of range
/// or reported twice, or if a report holds a candidate outside its region.
/// Returns `MinimizeError::WorkerFailed` naming the first quadrant in
/// `0..expected` without a report. Nothing is reduced in either case.
pub fn reduce(reports: Vec<WorkerReport>, expected: usize) -> Result<SearchResult> {
    let mut seen = vec![false; expected];
    for r in &reports {
        match seen.get_mut(r.quadrant) {
            None => {
                return Err(MinimizeError::InvalidArgs(format!(
                    "report for quadrant {} but only {} expected",
                    r.quadrant, expected
                )))
            }
            Some(true) => {
                return Err(MinimizeError::InvalidArgs(format!(
                    "quadrant {} reported twice",
                    r.quadrant
                )))
            }
            Some(slot) => *slot = true,
        }
        if let Some(stray) = r.candidates.iter().find(|m| !r.region.encloses(&m.bounds)) {
            return Err(MinimizeError::InvalidArgs(format!(
                "quadrant {} reported candidate {} outside its region {}",
                r.quadrant, stray.bounds, r.region
            )));
        }
    }
    if let Some(missing) = seen.iter().position(|&s| !s) {
        return Err(MinimizeError::WorkerFailed {
            quadrant: missing,
            reason: "no report received".into(),
        });
    }

    let min_ub = reports
        .iter()
        .map(|r| r.min_ub)
        .fold(f64::INFINITY, f64::min);

    let mut merged = CandidateSet::new();
    let mut stats = SearchStats::default();
    for r in reports {
        stats.merge(&r.stats);
        merged.merge(r.candidates);
    }

    let purged = merged.purge_above(min_ub);
    stats.purged += purged;
    if purged > 0 {
        debug!(purged, min_ub, "reconciliation purged stale candidates");
    }

    info!(
        min_ub,
        minimizers = merged.len(),
        nfev = stats.nfev,
        "reduction complete"
    );
    Ok(SearchResult::new(min_ub, merged.into_vec(), stats))
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Runs a partitioned search and reduces the workers' results.
pub struct Coordinator<'f, E: Evaluable + ?Sized> {
    func: &'f E,
    root: SearchBox,
    options: SearchOptions,
    tracer: Option<Arc<TraceWriter>>,
}

impl<'f, E: Evaluable + ?Sized> Coordinator<'f, E> {
    pub fn new(func: &'f E, root: SearchBox, options: SearchOptions) -> Self {
        Self {
            func,
            root,
            options,
            tracer: None,
        }
    }

    /// Share one trace buffer across all workers.
    pub fn with_tracer(mut self, tracer: Arc<TraceWriter>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn quadrants(&self) -> Vec<SearchBox> {
        partition(&self.root, self.options.partition_depth)
    }

    /// Run every worker, wait for all of them, then reduce.
    ///
    /// # Errors
    /// Invalid options or root box are rejected before any worker starts. A
    /// worker that panics fails the whole run with
    /// `MinimizeError::WorkerFailed`; no partial result is returned.
    pub fn minimize(&self) -> Result<SearchResult> {
        self.options.validate()?;
        self.root.validate()?;

        let quadrants = self.quadrants();
        info!(
            quadrants = quadrants.len(),
            workers = self.options.workers,
            precision = self.options.precision,
            parallel = self.options.parallel,
            "starting distributed search"
        );

        let reports = if self.options.parallel {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.workers)
                .build()?;
            pool.install(|| {
                quadrants
                    .par_iter()
                    .enumerate()
                    .map(|(i, q)| self.guarded_worker(i, *q))
                    .collect::<Result<Vec<_>>>()
            })?
        } else {
            quadrants
                .iter()
                .enumerate()
                .map(|(i, q)| self.guarded_worker(i, *q))
                .collect::<Result<Vec<_>>>()?
        };

        reduce(reports, quadrants.len())
    }

    fn guarded_worker(&self, quadrant: usize, region: SearchBox) -> Result<WorkerReport> {
        let precision = self.options.precision;
        let tracer = self.tracer.clone();
        panic::catch_unwind(AssertUnwindSafe(|| {
            run_worker(self.func, quadrant, region, precision, tracer)
        }))
        .map_err(|payload| MinimizeError::WorkerFailed {
            quadrant,
            reason: panic_reason(payload),
        })?
    }
}

/// Partitioned search of `root` with `options`.
pub fn minimize_box<E: Evaluable + ?Sized>(
    func: &E,
    root: SearchBox,
    options: &SearchOptions,
) -> Result<SearchResult> {
    Coordinator::new(func, root, options.clone()).minimize()
}
