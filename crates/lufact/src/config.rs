//! Factorization configuration.

use crate::error::LuError;

/// Pivot selection policy applied to each column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PivotPolicy {
    /// Accept the row assigned to the column by the initial matching.
    NoPivoting,
    /// Pick the row of maximum magnitude in the lower part of the column.
    #[default]
    Partial,
    /// Prefer the matched row when its magnitude is within
    /// `pivot_threshold` of the maximum, otherwise fall back to the
    /// maximum-magnitude row.
    Threshold,
    /// Copy and drop only; no pivot is recorded and the column is not
    /// scaled. Used for the trailing columns of a wide matrix, which have
    /// no diagonal; the driver switches to this policy automatically once
    /// all rows have been pivoted.
    NoDiagonal,
}

/// Configuration for [`crate::factorize`].
///
/// The defaults give an exact factorization (no dropping, no per-column
/// fill cap) with partial pivoting.
#[derive(Debug, Clone)]
pub struct FactorConfig {
    /// Pivot selection policy.
    pub pivot_policy: PivotPolicy,
    /// Threshold fraction in (0, 1] for [`PivotPolicy::Threshold`]: the
    /// matched diagonal candidate is accepted when
    /// `|diag| >= pivot_threshold * max|L column|`.
    pub pivot_threshold: f64,
    /// Entries smaller than `drop_threshold * max|column part|` that are
    /// outside the pattern of `A` are dropped. Zero disables dropping.
    pub drop_threshold: f64,
    /// Cap on kept entries per column as a multiple of the column count of
    /// `A`. Negative disables the cap.
    pub col_fill_ratio: f64,
    /// Initial arena size as a multiple of nnz(A).
    pub fill_ratio: f64,
    /// Growth factor applied to the arena when it fills up. Must be > 1.
    pub expand_ratio: f64,
    /// Optional caller-supplied column ordering of length ncol.
    pub col_perm: Option<Vec<usize>>,
    /// Index base of `col_perm`, 0 or 1.
    pub col_perm_base: usize,
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            pivot_policy: PivotPolicy::Partial,
            pivot_threshold: 1.0,
            drop_threshold: 0.0,
            col_fill_ratio: -1.0,
            fill_ratio: 4.0,
            expand_ratio: 1.2,
            col_perm: None,
            col_perm_base: 0,
        }
    }
}

impl FactorConfig {
    pub(crate) fn validate(&self, ncol: usize) -> Result<(), LuError> {
        if !(self.pivot_threshold > 0.0 && self.pivot_threshold <= 1.0) {
            return Err(LuError::InvalidConfig {
                reason: format!(
                    "pivot_threshold {} must be in (0, 1]",
                    self.pivot_threshold
                ),
            });
        }
        if self.drop_threshold < 0.0 {
            return Err(LuError::InvalidConfig {
                reason: format!("drop_threshold {} must be >= 0", self.drop_threshold),
            });
        }
        if !(self.fill_ratio > 0.0) {
            return Err(LuError::InvalidConfig {
                reason: format!("fill_ratio {} must be > 0", self.fill_ratio),
            });
        }
        if !(self.expand_ratio > 1.0) {
            return Err(LuError::InvalidConfig {
                reason: format!("expand_ratio {} must be > 1", self.expand_ratio),
            });
        }
        if self.col_perm_base > 1 {
            return Err(LuError::InvalidConfig {
                reason: format!("col_perm_base {} must be 0 or 1", self.col_perm_base),
            });
        }
        if let Some(perm) = &self.col_perm {
            if perm.len() != ncol {
                return Err(LuError::InvalidConfig {
                    reason: format!(
                        "column permutation length {} must equal ncol {}",
                        perm.len(),
                        ncol
                    ),
                });
            }
            for &p in perm {
                if p < self.col_perm_base || p - self.col_perm_base >= ncol {
                    return Err(LuError::InvalidConfig {
                        reason: format!("column permutation entry {} out of range", p),
                    });
                }
            }
        }
        Ok(())
    }
}
