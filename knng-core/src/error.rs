//! Error types for the k-NN graph core library.
//!
//! Defines the error enum exposed by the public API, the stable error codes
//! used by logging surfaces, and a convenient result alias.

use thiserror::Error;

use crate::termination::Phase;

/// Generates a stable error-code enum for an error type.
///
/// Each entry maps a code variant to the error variant pattern it covers
/// and to the code's string form. The macro emits the code enum with
/// `as_str` and `Display`, and a `code()` accessor on the error type.
#[doc(hidden)]
#[macro_export]
macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl ::core::fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced when configuring or running [`crate::Knn`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum KnnError {
    /// A configuration parameter was outside its accepted range.
    #[error("invalid parameter `{parameter}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Human-readable description of the accepted range.
        reason: String,
    },
    /// The similarity computer declared missing data fatal and returned an
    /// undefined similarity for a pair on first use.
    #[error(
        "similarity computer `{computer}` has no defined similarity between nodes {node} and {candidate}"
    )]
    MissingSimilarity {
        /// Name of the similarity computer.
        computer: String,
        /// Node whose neighbour list was being filled.
        node: usize,
        /// Candidate neighbour node.
        candidate: usize,
    },
    /// The run observed a termination signal and stopped.
    #[error("computation terminated during the {phase} phase")]
    Terminated {
        /// Phase that observed the termination signal.
        phase: Phase,
    },
    /// An internal invariant was violated, indicating a logic error.
    #[error("k-NN invariant violated: {message}")]
    InvariantViolation {
        /// Description of the violated invariant.
        message: String,
    },
    /// A synchronisation primitive became poisoned after a panic.
    #[error("lock for {resource} is poisoned")]
    LockPoisoned {
        /// Name of the locked resource that was poisoned.
        resource: &'static str,
    },
    /// The worker pool could not be created.
    #[error("failed to build worker pool with {concurrency} threads: {message}")]
    ThreadPool {
        /// Requested worker count.
        concurrency: usize,
        /// Message reported by the pool builder.
        message: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`KnnError`] variants.
    enum KnnErrorCode for KnnError {
        /// A configuration parameter was outside its accepted range.
        InvalidParameter => InvalidParameter { .. } => "KNN_INVALID_PARAMETER",
        /// The similarity computer returned an undefined similarity on first use.
        MissingSimilarity => MissingSimilarity { .. } => "KNN_MISSING_SIMILARITY",
        /// The run observed a termination signal and stopped.
        Terminated => Terminated { .. } => "KNN_TERMINATED",
        /// An internal invariant was violated.
        InvariantViolation => InvariantViolation { .. } => "KNN_INVARIANT_VIOLATION",
        /// A synchronisation primitive became poisoned.
        LockPoisoned => LockPoisoned { .. } => "KNN_LOCK_POISONED",
        /// The worker pool could not be created.
        ThreadPool => ThreadPool { .. } => "KNN_THREAD_POOL",
    }
}

impl KnnError {
    /// Returns `true` when the error represents an external termination
    /// request rather than a failure.
    ///
    /// # Examples
    /// ```
    /// use knng_core::{KnnError, Phase};
    ///
    /// let err = KnnError::Terminated { phase: Phase::Join };
    /// assert!(err.is_terminated());
    /// ```
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated { .. })
    }

    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, KnnError>;
