//! Error types for factorization and solve operations.

use std::fmt;

/// Errors reported by the factorization kernel and the triangular solves.
#[derive(Debug, Clone)]
pub enum LuError {
    /// Configuration rejected before factorization started.
    InvalidConfig { reason: String },
    /// Matrix descriptor is malformed (lengths, base, column pointers).
    InvalidMatrix { reason: String },
    /// The matching search or its bookkeeping reached an inconsistent state.
    MatchingViolation { reason: String },
    /// A column of the LU structure has no entries where some are required.
    ColumnLength { col: usize },
    /// No pivot candidate could be found for a column.
    NoPivot { col: usize },
    /// The selected pivot is numerically zero.
    ZeroPivot { col: usize },
    /// The LU structure failed a consistency check during back-substitution.
    SingularSolve { reason: String },
}

impl fmt::Display for LuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LuError::InvalidConfig { reason } => {
                write!(f, "invalid configuration: {}", reason)
            }
            LuError::InvalidMatrix { reason } => {
                write!(f, "invalid matrix: {}", reason)
            }
            LuError::MatchingViolation { reason } => {
                write!(f, "matching violation: {}", reason)
            }
            LuError::ColumnLength { col } => {
                write!(f, "zero length column {} in LU structure", col)
            }
            LuError::NoPivot { col } => {
                write!(f, "no pivot candidate in column {}", col)
            }
            LuError::ZeroPivot { col } => {
                write!(f, "numerically zero pivot in column {}", col)
            }
            LuError::SingularSolve { reason } => {
                write!(f, "solve failed: {}", reason)
            }
        }
    }
}

impl std::error::Error for LuError {}
