//! Core type definitions: search boxes, the objective contract, minimizer
//! records, options and results.

use std::fmt;

use crate::error::{MinimizeError, Result, Termination};
use crate::interval::Interval;

// ──────────────────────────────────────────────────────────────────────────────
// Search box
// ──────────────────────────────────────────────────────────────────────────────

/// A 2D rectangular search region, one interval per dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchBox {
    pub x: Interval,
    pub y: Interval,
}

impl SearchBox {
    pub fn new(x: Interval, y: Interval) -> Self {
        Self { x, y }
    }

    /// Build a box from raw bounds, rejecting NaN and reversed extents.
    pub fn from_bounds(x: (f64, f64), y: (f64, f64)) -> Result<Self> {
        Ok(Self {
            x: Interval::try_new(x.0, x.1)?,
            y: Interval::try_new(y.0, y.1)?,
        })
    }

    /// Quadrant split: bisect both extents at their midpoints.
    ///
    /// The order is fixed: `(xl, yl)`, `(xl, yr)`, `(xr, yl)`, `(xr, yr)`.
    /// Sub-boxes share edges at the midpoints and exactly cover `self`.
    pub fn split(&self) -> [SearchBox; 4] {
        let (xl, xr) = self.x.bisect();
        let (yl, yr) = self.y.bisect();
        [
            SearchBox::new(xl, yl),
            SearchBox::new(xl, yr),
            SearchBox::new(xr, yl),
            SearchBox::new(xr, yr),
        ]
    }

    pub fn area(&self) -> f64 {
        self.x.width() * self.y.width()
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x.mid(), self.y.mid())
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        self.x.contains(px) && self.y.contains(py)
    }

    /// True if `other` lies entirely within `self`.
    pub fn encloses(&self, other: &SearchBox) -> bool {
        self.x.encloses(&other.x) && self.y.encloses(&other.y)
    }

    /// Smallest box containing both `self` and `other`.
    pub fn hull(&self, other: &SearchBox) -> SearchBox {
        SearchBox::new(self.x.hull(&other.x), self.y.hull(&other.y))
    }

    /// Check that both extents are ordered and finite.
    pub fn validate(&self) -> Result<()> {
        for i in [self.x, self.y] {
            if !(i.lo <= i.hi) || !i.lo.is_finite() || !i.hi.is_finite() {
                return Err(MinimizeError::InvalidInterval { lo: i.lo, hi: i.hi });
            }
        }
        Ok(())
    }
}

impl fmt::Display for SearchBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.x, f)?;
        write!(f, " x ")?;
        fmt::Display::fmt(&self.y, f)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Objective contract
// ──────────────────────────────────────────────────────────────────────────────

/// An interval extension of a two-variable objective.
///
/// For every point `(px, py)` in `b`, `f(px, py)` must lie within
/// `evaluate(b)`. The search relies on this without checking it.
pub trait Evaluable: Sync {
    fn evaluate(&self, b: &SearchBox) -> Interval;
}

impl<F> Evaluable for F
where
    F: Fn(&SearchBox) -> Interval + Sync + ?Sized,
{
    #[inline]
    fn evaluate(&self, b: &SearchBox) -> Interval {
        self(b)
    }
}

/// Boxed objective signature, as stored in a function registry.
pub type IntervalFn = dyn Fn(&SearchBox) -> Interval + Send + Sync;

// ──────────────────────────────────────────────────────────────────────────────
// Minimizer record
// ──────────────────────────────────────────────────────────────────────────────

/// A box refined to precision that could still hold a global minimizer,
/// with the enclosure of the objective over it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Minimizer {
    pub bounds: SearchBox,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl Minimizer {
    pub fn new(bounds: SearchBox, value: Interval) -> Self {
        Self {
            bounds,
            lower_bound: value.lo,
            upper_bound: value.hi,
        }
    }

    /// The objective enclosure over this box.
    pub fn value(&self) -> Interval {
        Interval::new(self.lower_bound, self.upper_bound)
    }
}

impl fmt::Display for Minimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.bounds, f)?;
        write!(f, " : ")?;
        fmt::Display::fmt(&self.value(), f)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Options
// ──────────────────────────────────────────────────────────────────────────────

/// Deepest supported root partition (4^8 = 65536 quadrants).
pub const MAX_PARTITION_DEPTH: u32 = 8;

/// Configuration for a distributed minimization run.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Box width at or below which a surviving box is recorded instead of
    /// split. Must be finite and > 0.
    pub precision: f64,

    /// Number of times the root box is split before handing quadrants out.
    /// Depth 1 gives the classic four quadrants; depth k gives 4^k.
    pub partition_depth: u32,

    /// Number of worker threads in the pool.
    pub workers: usize,

    /// Search quadrants on a rayon pool. When `false`, quadrants are searched
    /// one after another on the calling thread, each still with its own
    /// bound and candidate set.
    pub parallel: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            precision: 1e-2,
            partition_depth: 1,
            workers: 4,
            parallel: true,
        }
    }
}

impl SearchOptions {
    /// Options with the given precision and the default four-worker layout.
    pub fn with_precision(precision: f64) -> Self {
        Self {
            precision,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_precision(self.precision)?;
        if self.workers == 0 {
            return Err(MinimizeError::InvalidArgs("workers must be > 0".into()));
        }
        if self.partition_depth > MAX_PARTITION_DEPTH {
            return Err(MinimizeError::InvalidArgs(format!(
                "partition_depth {} exceeds maximum {}",
                self.partition_depth, MAX_PARTITION_DEPTH
            )));
        }
        Ok(())
    }

    /// Number of root quadrants this configuration produces.
    pub fn quadrant_count(&self) -> usize {
        4usize.pow(self.partition_depth)
    }
}

/// Reject precisions the search could never terminate on.
pub fn validate_precision(precision: f64) -> Result<()> {
    if precision.is_finite() && precision > 0.0 {
        Ok(())
    } else {
        Err(MinimizeError::InvalidPrecision(precision))
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Statistics and result
// ──────────────────────────────────────────────────────────────────────────────

/// Counters collected by one search, summed across workers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Objective evaluations.
    pub nfev: usize,
    /// Boxes discarded because their lower bound exceeded the best bound.
    pub pruned: usize,
    /// Boxes split into quadrants.
    pub splits: usize,
    /// Candidates recorded at precision.
    pub recorded: usize,
    /// Candidates removed after a tighter bound was found.
    pub purged: usize,
    /// Deepest recursion level reached (root = 0).
    pub max_depth: usize,
}

impl SearchStats {
    /// Fold another worker's counters into this one.
    pub fn merge(&mut self, other: &SearchStats) {
        self.nfev += other.nfev;
        self.pruned += other.pruned;
        self.splits += other.splits;
        self.recorded += other.recorded;
        self.purged += other.purged;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

/// Outcome of a minimization run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    /// Tightest proven upper bound on the global minimum.
    pub min_ub: f64,

    /// Surviving candidates, ordered by lower bound.
    pub minimizers: Vec<Minimizer>,

    pub stats: SearchStats,

    pub termination: Termination,
}

impl SearchResult {
    pub fn new(min_ub: f64, minimizers: Vec<Minimizer>, stats: SearchStats) -> Self {
        let termination = if minimizers.is_empty() {
            Termination::Pruned
        } else {
            Termination::PrecisionReached
        };
        Self {
            min_ub,
            minimizers,
            stats,
            termination,
        }
    }

    pub fn len(&self) -> usize {
        self.minimizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minimizers.is_empty()
    }

    /// Hull of the objective enclosures of all candidates: a verified
    /// enclosure of the global minimum when the run succeeded.
    pub fn minimum_enclosure(&self) -> Option<Interval> {
        let lo = self
            .minimizers
            .iter()
            .map(|m| m.lower_bound)
            .fold(f64::INFINITY, f64::min);
        if self.minimizers.is_empty() {
            None
        } else {
            Some(Interval::new(lo, self.min_ub))
        }
    }

    /// Smallest box holding every candidate: where the global minimizers
    /// can be.
    pub fn bounding_box(&self) -> Option<SearchBox> {
        let mut boxes = self.minimizers.iter().map(|m| m.bounds);
        let first = boxes.next()?;
        Some(boxes.fold(first, |acc, b| acc.hull(&b)))
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.minimizers {
            writeln!(f, "{:.16}", m)?;
        }
        writeln!(f, "Number of minimizers: {}", self.minimizers.len())?;
        write!(f, "Upper bound for minimum: {:.16}", self.min_ub)
    }
}
