//! Compressed sparse column input descriptor.

use std::borrow::Cow;

use crate::error::LuError;

/// Sparse matrix in compressed sparse column (CSC) form.
///
/// Column `j` occupies `colptr[j]..colptr[j+1]` of `rowind`/`values`
/// (adjusted by `base`). Rows within a column must be unique; their order
/// does not matter. The descriptor may be 0- or 1-based; 1-based input is
/// normalized onto internal copies, the caller's slices are never touched.
#[derive(Debug, Clone)]
pub struct CscMatrix<'a> {
    /// Number of rows.
    pub nrow: usize,
    /// Number of columns.
    pub ncol: usize,
    /// Index base of `colptr` and `rowind`, 0 or 1.
    pub base: usize,
    /// Column start positions, length ncol + 1.
    pub colptr: &'a [usize],
    /// Row index of each nonzero, length nnz.
    pub rowind: &'a [usize],
    /// Value of each nonzero, length nnz.
    pub values: &'a [f64],
}

impl<'a> CscMatrix<'a> {
    /// Number of stored nonzeros.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn validate(&self) -> Result<(), LuError> {
        if self.base > 1 {
            return Err(LuError::InvalidMatrix {
                reason: format!("base {} must be 0 or 1", self.base),
            });
        }
        if self.colptr.len() != self.ncol + 1 {
            return Err(LuError::InvalidMatrix {
                reason: format!(
                    "column pointer length {} != expected {}",
                    self.colptr.len(),
                    self.ncol + 1
                ),
            });
        }
        if self.rowind.len() != self.values.len() {
            return Err(LuError::InvalidMatrix {
                reason: format!(
                    "row index length {} != value length {}",
                    self.rowind.len(),
                    self.values.len()
                ),
            });
        }
        if self.colptr[0] != self.base {
            return Err(LuError::InvalidMatrix {
                reason: format!(
                    "column pointer must start at base {}, found {}",
                    self.base, self.colptr[0]
                ),
            });
        }
        for j in 0..self.ncol {
            if self.colptr[j + 1] < self.colptr[j] {
                return Err(LuError::InvalidMatrix {
                    reason: format!("negative length for column {}", j),
                });
            }
        }
        if self.colptr[self.ncol] - self.base != self.nnz() {
            return Err(LuError::InvalidMatrix {
                reason: format!(
                    "column pointers cover {} entries but nnz is {}",
                    self.colptr[self.ncol] - self.base,
                    self.nnz()
                ),
            });
        }
        for &r in self.rowind {
            if r < self.base || r - self.base >= self.nrow {
                return Err(LuError::InvalidMatrix {
                    reason: format!("row index {} out of range", r),
                });
            }
        }
        Ok(())
    }

    /// Column pointers and row indices in 0-based form. Borrows the input
    /// when it is already 0-based.
    pub(crate) fn to_zero_based(&self) -> (Cow<'a, [usize]>, Cow<'a, [usize]>) {
        if self.base == 0 {
            (Cow::Borrowed(self.colptr), Cow::Borrowed(self.rowind))
        } else {
            let colptr = self.colptr.iter().map(|&p| p - self.base).collect();
            let rowind = self.rowind.iter().map(|&r| r - self.base).collect();
            (Cow::Owned(colptr), Cow::Owned(rowind))
        }
    }
}
