//! # interval-bnb: verified 2D global minimization
//!
//! Interval branch-and-bound over a rectangular search region. Every box is
//! bounded with an interval enclosure of the objective, so the search can
//! *prove* that a box cannot hold the global minimum and drop it. What is
//! left when every surviving box is narrower than the requested precision is
//! a verified answer:
//!
//! - `min_ub`, an upper bound on the global minimum that some point in the
//!   region provably achieves or beats;
//! - the candidate boxes, each of which could still contain a global
//!   minimizer, with the enclosure of the objective over it.
//!
//! ## Layout
//!
//! - [`interval`]: closed intervals and their arithmetic.
//! - [`types`]: search boxes and the quadrant split, the [`Evaluable`]
//!   objective contract, options, records and results.
//! - [`candidates`]: the candidate set, ordered by lower bound.
//! - [`search`](mod@search): the depth-first branch-and-bound engine.
//! - [`distribute`]: root partitioning into quadrants, parallel workers on a
//!   rayon pool, and the min-reduction with candidate reconciliation.
//! - [`functions`]: named benchmark objectives and their search boxes.
//!
//! ## Example
//!
//! ```
//! use interval_bnb::{minimize_box, SearchBox, SearchOptions};
//!
//! let sphere = |b: &SearchBox| b.x.sqr() + b.y.sqr();
//! let root = SearchBox::from_bounds((-2.0, 2.0), (-2.0, 2.0)).unwrap();
//! let result = minimize_box(&sphere, root, &SearchOptions::with_precision(0.5)).unwrap();
//!
//! assert_eq!(result.min_ub, 0.5);
//! assert!(result.minimizers.iter().any(|m| m.bounds.contains(0.0, 0.0)));
//! ```

pub mod candidates;
pub mod distribute;
pub mod error;
pub mod functions;
pub mod interval;
pub mod search;
pub mod trace;
pub mod types;

pub use candidates::CandidateSet;
pub use distribute::{minimize_box, partition, reduce, Coordinator, WorkerReport};
pub use error::{MinimizeError, Result, Termination};
pub use functions::{FunctionRegistry, ObjectiveFunction};
pub use interval::Interval;
pub use search::{minimize_sequential, search, BranchAndBound};
pub use types::{
    Evaluable, IntervalFn, Minimizer, SearchBox, SearchOptions, SearchResult, SearchStats,
    MAX_PARTITION_DEPTH,
};
