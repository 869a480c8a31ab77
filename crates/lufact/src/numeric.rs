//! Numeric step: left-looking column update.

use crate::factor::LuFactors;

/// Compute the values of column `jcol` in the dense accumulator, using the
/// previously finished columns of `L`, and allocate arena slots for the
/// fill that appears in the lower part.
///
/// The `U` entries were laid out in reverse topological order, so walking
/// them from the last emitted backward visits every predecessor before the
/// columns that depend on it. `dense[krow]` at that moment is the final
/// (unscaled) value of `U(rperm(krow), jcol)`.
pub(crate) fn update_column(
    jcol: usize,
    lu: &mut LuFactors,
    dense: &mut [f64],
    found: &mut [usize],
) {
    let nzuend = lu.lcolptr[jcol];
    let nnzu = nzuend - lu.ucolptr[jcol];

    for nzuind in 1..=nnzu {
        let nzuptr = nzuend - nzuind;
        let krow = lu.rowind[nzuptr];
        let kcol = lu.row_perm[krow];
        let ukj = dense[krow];

        for nzlptr in lu.lcolptr[kcol]..lu.ucolptr[kcol + 1] {
            let irow = lu.rowind[nzlptr];
            dense[irow] -= ukj * lu.values[nzlptr];
            // New nonzero in L: give it a slot.
            if found[irow] != jcol {
                found[irow] = jcol;
                lu.rowind[lu.last] = irow;
                lu.last += 1;
            }
        }
    }

    lu.ucolptr[jcol + 1] = lu.last;
}
