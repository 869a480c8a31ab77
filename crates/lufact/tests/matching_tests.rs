//! Tests for the maximum bipartite matching used to seed the diagonal.

use lufact::matching::maximum_matching;
use lufact::NONE;

// ============================================================================
// Perfect matchings
// ============================================================================

#[test]
fn test_matching_identity() {
    let n = 5;
    let colptr: Vec<usize> = (0..=n).collect();
    let rowind: Vec<usize> = (0..n).collect();

    let m = maximum_matching(n, n, &colptr, &rowind).unwrap();

    assert!(m.is_perfect());
    assert_eq!(m.rank(), n);
    for c in 0..n {
        assert_eq!(m.col_to_row[c], c);
        assert_eq!(m.row_to_col[c], c);
    }
}

#[test]
fn test_matching_cycle() {
    // Column j is nonzero only in row (j+1) mod n: a single cycle with a
    // unique perfect matching.
    let n = 4;
    let colptr: Vec<usize> = (0..=n).collect();
    let rowind: Vec<usize> = (0..n).map(|j| (j + 1) % n).collect();

    let m = maximum_matching(n, n, &colptr, &rowind).unwrap();

    assert!(m.is_perfect());
    for j in 0..n {
        assert_eq!(m.col_to_row[j], (j + 1) % n);
    }
}

#[test]
fn test_matching_augmenting_path_rematches() {
    // col 0 = {r0, r1}, col 1 = {r0}. The cheap pass gives r0 to col 0;
    // col 1 must then push col 0 over to r1 through an augmenting path.
    let colptr = vec![0, 2, 3];
    let rowind = vec![0, 1, 0];

    let m = maximum_matching(2, 2, &colptr, &rowind).unwrap();

    assert!(m.is_perfect());
    assert_eq!(m.col_to_row, vec![1, 0]);
    assert_eq!(m.row_to_col, vec![1, 0]);
}

// ============================================================================
// Deficient patterns
// ============================================================================

#[test]
fn test_matching_rank_deficient() {
    // Three columns all sharing the single row 0: structural rank 1.
    let colptr = vec![0, 1, 2, 3];
    let rowind = vec![0, 0, 0];

    let m = maximum_matching(3, 3, &colptr, &rowind).unwrap();

    assert_eq!(m.rank(), 1);
    assert!(!m.is_perfect());
    assert_eq!(m.col_to_row[0], 0);
    assert_eq!(m.col_to_row[1], NONE);
    assert_eq!(m.col_to_row[2], NONE);
}

#[test]
fn test_matching_empty_column() {
    let colptr = vec![0, 1, 1];
    let rowind = vec![0];

    let m = maximum_matching(2, 2, &colptr, &rowind).unwrap();

    assert_eq!(m.rank(), 1);
    assert_eq!(m.col_to_row[1], NONE);
    assert_eq!(m.row_to_col[1], NONE);
}

#[test]
fn test_matching_more_rows_than_columns() {
    // 4 rows, 2 columns: a perfect column matching leaves rows unmatched.
    let colptr = vec![0, 2, 4];
    let rowind = vec![1, 3, 0, 3];

    let m = maximum_matching(4, 2, &colptr, &rowind).unwrap();

    assert!(m.is_perfect());
    let matched_rows = m.row_to_col.iter().filter(|&&c| c != NONE).count();
    assert_eq!(matched_rows, 2);
}
