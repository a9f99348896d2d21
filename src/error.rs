//! Construction-time error taxonomy.
//!
//! Everything here is a `LogicError` in the sense of spec §7: a programmer
//! mistake discovered once, at plan-construction time, never at `execute`
//! time. `execute` and the progressive-execution API are infallible; their
//! preconditions are `debug_assert!`s, not `Result`s (see the module docs on
//! `Plan::execute`).

use thiserror::Error;

/// Reasons a plan (or plan-adjacent object) failed to construct.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// `size == 0`; there is no such thing as a zero-length transform.
    #[error("transform size must be at least 1, got 0")]
    ZeroSize,

    /// `size` exceeds the addressable range the index type was budgeted for
    /// (spec §3: "wide enough for addressing arrays of size up to 2^24
    /// complex samples comfortably").
    #[error("transform size {0} exceeds the maximum supported size (2^24)")]
    SizeTooLarge(usize),

    /// A real plan was asked to handle an odd length; spec §1 Non-goals
    /// explicitly excludes odd-length real DFTs.
    #[error("real transform size must be even, got {0}")]
    OddRealSize(usize),

    /// A multi-dimensional plan was given a shape whose element count does
    /// not match the buffer it's later asked to operate on, or whose rank
    /// is outside the supported 0..=8 range.
    #[error("unsupported tensor rank {0} (supported range is 0..=8)")]
    RankOutOfRange(usize),

    /// A dimension in a multi-D shape was zero.
    #[error("shape dimension {index} is zero")]
    ZeroDimension {
        /// Index of the offending dimension.
        index: usize,
    },

    /// The last axis of a multi-D real shape must be even (same constraint
    /// as `OddRealSize`, restated for the tensor case).
    #[error("last axis of a real tensor shape must be even, got {0}")]
    OddRealLastAxis(usize),
}

/// Convenience alias for fallible constructors.
pub type Result<T> = std::result::Result<T, PlanError>;
