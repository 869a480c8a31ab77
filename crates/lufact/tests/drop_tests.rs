//! Tests for threshold dropping and the per-column fill cap.
//!
//! The matrices here are built diagonally dominant with sorted row
//! indices, so the cheap assignment matches every column to its diagonal
//! and partial pivoting keeps that choice: the row permutation stays the
//! identity and the pattern of each factored column is exactly the
//! pattern of the corresponding column of A.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lufact::{factorize, CscMatrix, FactorConfig};

struct Csc {
    n: usize,
    colptr: Vec<usize>,
    rowind: Vec<usize>,
    values: Vec<f64>,
}

impl Csc {
    fn as_matrix(&self) -> CscMatrix<'_> {
        CscMatrix {
            nrow: self.n,
            ncol: self.n,
            base: 0,
            colptr: &self.colptr,
            rowind: &self.rowind,
            values: &self.values,
        }
    }
}

/// Arrow matrix: dense first column, dense first row, heavy diagonal.
/// Eliminating the first column fills every later column, which gives the
/// drop logic something to chew on.
fn arrow_matrix(n: usize) -> Csc {
    let mut colptr = vec![0usize];
    let mut rowind = Vec::new();
    let mut values = Vec::new();

    rowind.push(0);
    values.push(4.0);
    for i in 1..n {
        rowind.push(i);
        values.push(1.0 + 0.1 * i as f64);
    }
    colptr.push(rowind.len());

    for j in 1..n {
        rowind.push(0);
        values.push(3.0);
        rowind.push(j);
        values.push(4.0 + j as f64);
        colptr.push(rowind.len());
    }

    Csc {
        n,
        colptr,
        rowind,
        values,
    }
}

/// Random diagonally dominant matrix with two off-diagonal entries per
/// column and sorted row indices.
fn random_dominant(n: usize, seed: u64) -> Csc {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut colptr = vec![0usize];
    let mut rowind = Vec::new();
    let mut values = Vec::new();

    for j in 0..n {
        let mut rows = vec![j];
        while rows.len() < 3 {
            let r = rng.gen_range(0..n);
            if !rows.contains(&r) {
                rows.push(r);
            }
        }
        rows.sort_unstable();
        for r in rows {
            if r == j {
                rowind.push(r);
                values.push(6.0 + j as f64);
            } else {
                rowind.push(r);
                values.push(rng.gen_range(0.2..1.0));
            }
        }
        colptr.push(rowind.len());
    }

    Csc {
        n,
        colptr,
        rowind,
        values,
    }
}

/// For every factored column, check that each kept entry of L whose row is
/// outside the pattern of the matching column of A has magnitude at least
/// `drop_threshold` times the column max. Returns how many such entries
/// survived in total.
fn check_drop_property(a: &Csc, lu: &lufact::LuFactors, drop_threshold: f64) -> usize {
    assert_eq!(
        lu.row_perm(),
        (0..a.n).collect::<Vec<_>>().as_slice(),
        "test matrix must keep the identity row permutation"
    );

    let mut survivors = 0;
    for j in 0..a.n {
        let qcol = lu.col_perm()[j];
        let pattern: Vec<usize> = a.rowind[a.colptr[qcol]..a.colptr[qcol + 1]].to_vec();

        let lstart = lu.lcolptr()[j];
        let lend = lu.ucolptr()[j + 1];
        let mut maxl = 0.0f64;
        for p in lstart..lend {
            maxl = maxl.max(lu.values()[p].abs());
        }
        for p in lstart..lend {
            let row = lu.row_indices()[p];
            if !pattern.contains(&row) {
                survivors += 1;
                assert!(
                    lu.values()[p].abs() + 1e-12 >= drop_threshold * maxl,
                    "kept fill entry ({}, {}) = {} below drop threshold {}",
                    row,
                    j,
                    lu.values()[p],
                    drop_threshold * maxl
                );
            }
        }
    }
    survivors
}

// ============================================================================
// Threshold dropping
// ============================================================================

#[test]
fn test_drop_threshold_bounds_kept_fill() {
    let a = arrow_matrix(10);

    let exact = factorize(&FactorConfig::default(), &a.as_matrix()).unwrap();

    let config = FactorConfig {
        drop_threshold: 0.1,
        ..Default::default()
    };
    let lu = factorize(&config, &a.as_matrix()).unwrap();

    let survivors = check_drop_property(&a, &lu, 0.1);
    assert!(survivors > 0, "expected some fill to survive the threshold");
    assert!(
        lu.nnz() < exact.nnz(),
        "dropping must shrink the factors: {} vs {}",
        lu.nnz(),
        exact.nnz()
    );
}

#[test]
fn test_drop_threshold_random_5x5() {
    let a = random_dominant(5, 42);

    let exact = factorize(&FactorConfig::default(), &a.as_matrix()).unwrap();

    let config = FactorConfig {
        drop_threshold: 0.5,
        ..Default::default()
    };
    let lu = factorize(&config, &a.as_matrix()).unwrap();

    check_drop_property(&a, &lu, 0.5);
    assert!(lu.nnz() <= exact.nnz());
}

#[test]
fn test_drop_keeps_pattern_entries() {
    // Entries present in A are never dropped, however small.
    let a = arrow_matrix(8);
    let config = FactorConfig {
        drop_threshold: 0.9,
        ..Default::default()
    };
    let lu = factorize(&config, &a.as_matrix()).unwrap();

    for j in 0..a.n {
        let qcol = lu.col_perm()[j];
        for ptr in a.colptr[qcol]..a.colptr[qcol + 1] {
            let arow = a.rowind[ptr];
            let parow = lu.row_perm()[arow];
            let found = (lu.ucolptr()[j]..lu.ucolptr()[j + 1])
                .any(|p| lu.row_indices()[p] == parow);
            assert!(
                found,
                "pattern entry ({}, {}) missing from the factors",
                arow, qcol
            );
        }
    }
}

// ============================================================================
// Per-column fill cap
// ============================================================================

#[test]
fn test_col_fill_ratio_caps_fill() {
    let a = arrow_matrix(12);

    let exact = factorize(&FactorConfig::default(), &a.as_matrix()).unwrap();

    let config = FactorConfig {
        col_fill_ratio: 1.0,
        ..Default::default()
    };
    let lu = factorize(&config, &a.as_matrix()).unwrap();

    assert!(
        lu.nnz() < exact.nnz(),
        "fill cap must shrink the factors: {} vs {}",
        lu.nnz(),
        exact.nnz()
    );

    // The factors remain structurally sound.
    for j in 0..a.n {
        let dptr = lu.lcolptr()[j] - 1;
        assert_eq!(lu.row_indices()[dptr], j);
        assert_ne!(lu.values()[dptr], 0.0);
    }
}
