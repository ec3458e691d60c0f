//! Depth-first interval branch-and-bound.
//!
//! A [`BranchAndBound`] is one worker's search context. It owns the best
//! upper bound found so far (`min_ub`) and the candidate set, and threads them
//! through the recursion by `&mut self`, so a bound found in an early quadrant
//! immediately prunes later ones.
//!
//! For each box:
//! 1. evaluate the objective enclosure `r`;
//! 2. prune if `r.lo > min_ub`;
//! 3. tighten `min_ub` to `r.hi` if smaller, purging stale candidates at once;
//! 4. record the box if its x-width is at most the precision, or if it is
//!    too narrow in floating point to be halved again;
//! 5. otherwise split into quadrants and recurse in split order.
//!
//! Splitting halves both extents together, so the x-width alone decides
//! termination.

use std::sync::Arc;

use crate::candidates::CandidateSet;
use crate::error::Result;
use crate::trace::TraceWriter;
use crate::trace_write;
use crate::types::{validate_precision, Evaluable, Minimizer, SearchBox, SearchResult, SearchStats};

/// One worker's branch-and-bound state.
pub struct BranchAndBound<'f, E: Evaluable + ?Sized> {
    func: &'f E,
    threshold: f64,
    min_ub: f64,
    candidates: CandidateSet,
    stats: SearchStats,
    #[cfg_attr(not(feature = "trace"), allow(dead_code))]
    tracer: Option<Arc<TraceWriter>>,
}

impl<'f, E: Evaluable + ?Sized> BranchAndBound<'f, E> {
    /// Create a fresh context with `min_ub = +inf` and no candidates.
    ///
    /// # Errors
    /// Returns `MinimizeError::InvalidPrecision` unless `threshold` is finite
    /// and > 0; the recursion would not terminate otherwise.
    pub fn new(func: &'f E, threshold: f64) -> Result<Self> {
        validate_precision(threshold)?;
        Ok(Self {
            func,
            threshold,
            min_ub: f64::INFINITY,
            candidates: CandidateSet::new(),
            stats: SearchStats::default(),
            tracer: None,
        })
    }

    /// Start from a known upper bound instead of `+inf`.
    pub fn with_bound(mut self, min_ub: f64) -> Self {
        self.min_ub = min_ub;
        self
    }

    /// Start from an existing candidate set.
    ///
    /// Records above the current bound are dropped right away.
    pub fn with_candidates(mut self, candidates: CandidateSet) -> Self {
        self.candidates = candidates;
        self.stats.purged += self.candidates.purge_above(self.min_ub);
        self
    }

    /// Send search events to `tracer` (requires the `trace` feature).
    pub fn with_tracer(mut self, tracer: Arc<TraceWriter>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn min_ub(&self) -> f64 {
        self.min_ub
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Search `b` to exhaustion, updating the bound and candidates.
    ///
    /// May be called repeatedly on disjoint boxes; the bound carries over.
    pub fn search(&mut self, b: SearchBox) {
        self.visit(b, 0);
    }

    fn visit(&mut self, b: SearchBox, depth: usize) {
        let r = self.func.evaluate(&b);
        self.stats.nfev += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
        trace_write!(
            self.tracer,
            "TRACE EVAL depth={} box=[{},{}]x[{},{}] lo={} hi={}",
            depth,
            b.x.lo,
            b.x.hi,
            b.y.lo,
            b.y.hi,
            r.lo,
            r.hi
        );

        if r.lo > self.min_ub {
            self.stats.pruned += 1;
            trace_write!(
                self.tracer,
                "TRACE PRUNE depth={} lo={} min_ub={}",
                depth,
                r.lo,
                self.min_ub
            );
            return;
        }

        if r.hi < self.min_ub {
            self.tighten(r.hi);
        }

        // A box down to adjacent floats cannot be halved any further.
        if b.x.width() <= self.threshold || !b.x.is_divisible() {
            self.candidates.insert(Minimizer::new(b, r));
            self.stats.recorded += 1;
            trace_write!(self.tracer, "TRACE RECORD depth={} lo={} hi={}", depth, r.lo, r.hi);
            return;
        }

        self.stats.splits += 1;
        trace_write!(self.tracer, "TRACE SPLIT depth={}", depth);
        for sub in b.split() {
            self.visit(sub, depth + 1);
        }
    }

    /// Lower the best bound and drop every candidate it rules out.
    fn tighten(&mut self, bound: f64) {
        let purged = self.candidates.purge_above(bound);
        self.stats.purged += purged;
        trace_write!(
            self.tracer,
            "TRACE TIGHTEN old={} new={} purged={}",
            self.min_ub,
            bound,
            purged
        );
        self.min_ub = bound;
    }

    /// Consume the context, returning `(min_ub, candidates, stats)`.
    pub fn into_parts(self) -> (f64, CandidateSet, SearchStats) {
        (self.min_ub, self.candidates, self.stats)
    }

    pub fn into_result(self) -> SearchResult {
        SearchResult::new(self.min_ub, self.candidates.into_vec(), self.stats)
    }
}

/// Search `b` with an externally held bound and candidate set.
///
/// `min_ub` and `candidates` are updated in place exactly as the recursive
/// search would update them.
///
/// # Errors
/// Returns `MinimizeError::InvalidPrecision` if `threshold` is not finite and
/// > 0. Neither accumulator is touched in that case.
pub fn search<E: Evaluable + ?Sized>(
    func: &E,
    b: SearchBox,
    threshold: f64,
    min_ub: &mut f64,
    candidates: &mut CandidateSet,
) -> Result<SearchStats> {
    let mut bnb = BranchAndBound::new(func, threshold)?
        .with_bound(*min_ub)
        .with_candidates(std::mem::take(candidates));
    bnb.search(b);
    let (bound, set, stats) = bnb.into_parts();
    *min_ub = bound;
    *candidates = set;
    Ok(stats)
}

/// Run a single sequential search over the whole of `root`.
pub fn minimize_sequential<E: Evaluable + ?Sized>(
    func: &E,
    root: SearchBox,
    threshold: f64,
) -> Result<SearchResult> {
    root.validate()?;
    let mut bnb = BranchAndBound::new(func, threshold)?;
    bnb.search(root);
    Ok(bnb.into_result())
}
