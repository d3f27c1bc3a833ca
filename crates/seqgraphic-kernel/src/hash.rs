//! Rolling support hashes for finding parallel lines.
//!
//! Every processed row (column) carries the sum of the weights of its nonzero
//! columns (rows). Two lines with the same restricted support always have the
//! same hash, so a hash match is a sound shortlist; the exact support
//! comparison afterwards is what decides.
//!
//! The weights come from the fixed recurrence `w₀ = 1, wᵢ₊₁ = 3·wᵢ mod 2⁶¹`.
//! They are not seeded: the same input always yields the same shortlist.

use crate::element::Element;
use crate::error::GraphicError;
use crate::matrix::SparseMatrix;
use std::ops::Range;

const HASH_MODULUS: i64 = 1 << 61;

/// Keeps hash arithmetic inside `(-2⁶¹, 2⁶¹)` so that sums of two values and
/// the tripling step never overflow `i64`.
pub fn project_signed_hash(value: i64) -> i64 {
    value % HASH_MODULUS
}

/// Weights for indices `0..size`.
pub fn create_hash_vector(size: usize) -> Result<Vec<i64>, GraphicError> {
    let mut weights = Vec::new();
    weights.try_reserve_exact(size)?;
    let mut h: i64 = 1;
    for _ in 0..size {
        weights.push(h);
        h = project_signed_hash(3 * h);
    }
    Ok(weights)
}

/// Fold the majors in `majors` into both accumulators, looking only at
/// partners below `minor_size`.
pub fn update_hash_values(
    matrix: &SparseMatrix,
    major_hashes: &mut [i64],
    minor_hashes: &mut [i64],
    weights: &[i64],
    majors: Range<usize>,
    minor_size: usize,
) {
    for major in majors {
        for &minor in matrix.row_prefix(major, minor_size) {
            major_hashes[major] = project_signed_hash(major_hashes[major] + weights[minor]);
            minor_hashes[minor] = project_signed_hash(minor_hashes[minor] + weights[major]);
        }
    }
}

fn support_hash(support: &[usize], weights: &[i64]) -> i64 {
    support
        .iter()
        .fold(0, |acc, &minor| project_signed_hash(acc + weights[minor]))
}

/// Find the line among majors `0..num_majors` whose support below
/// `num_minors` equals that of `major`.
///
/// Returned in row orientation: a single nonzero yields the partner as a
/// column, a match yields a row. Callers working on the transpose flip it.
pub fn find_parallel(
    matrix: &SparseMatrix,
    major: usize,
    num_majors: usize,
    num_minors: usize,
    major_hashes: &[i64],
    weights: &[i64],
) -> Option<Element> {
    let support = matrix.row_prefix(major, num_minors);
    match support {
        [] => None,
        [single] => Some(Element::Column(*single)),
        _ => {
            let hash = support_hash(support, weights);
            (0..num_majors)
                .filter(|&other| major_hashes[other] == hash)
                .find(|&other| matrix.row_prefix(other, num_minors) == support)
                .map(Element::Row)
        }
    }
}

/// Hash state for one run: weights plus one accumulator per row and column.
#[derive(Debug, Clone)]
pub struct HashOracle {
    weights: Vec<i64>,
    row_hashes: Vec<i64>,
    column_hashes: Vec<i64>,
}

impl HashOracle {
    pub fn new(num_rows: usize, num_columns: usize) -> Result<Self, GraphicError> {
        let weights = create_hash_vector(num_rows.max(num_columns))?;
        let mut row_hashes = Vec::new();
        row_hashes.try_reserve_exact(num_rows)?;
        row_hashes.resize(num_rows, 0);
        let mut column_hashes = Vec::new();
        column_hashes.try_reserve_exact(num_columns)?;
        column_hashes.resize(num_columns, 0);
        Ok(Self {
            weights,
            row_hashes,
            column_hashes,
        })
    }

    pub fn weights(&self) -> &[i64] {
        &self.weights
    }

    pub fn row_hash(&self, row: usize) -> i64 {
        self.row_hashes[row]
    }

    pub fn column_hash(&self, column: usize) -> i64 {
        self.column_hashes[column]
    }

    /// Absorb new rows against the first `num_columns` columns.
    pub fn absorb_rows(&mut self, matrix: &SparseMatrix, rows: Range<usize>, num_columns: usize) {
        update_hash_values(
            matrix,
            &mut self.row_hashes,
            &mut self.column_hashes,
            &self.weights,
            rows,
            num_columns,
        );
    }

    /// Absorb new columns against the first `num_rows` rows.
    pub fn absorb_columns(
        &mut self,
        transpose: &SparseMatrix,
        columns: Range<usize>,
        num_rows: usize,
    ) {
        update_hash_values(
            transpose,
            &mut self.column_hashes,
            &mut self.row_hashes,
            &self.weights,
            columns,
            num_rows,
        );
    }

    /// The element the (not yet absorbed) `row` is parallel to.
    pub fn parallel_row(
        &self,
        matrix: &SparseMatrix,
        row: usize,
        num_rows: usize,
        num_columns: usize,
    ) -> Option<Element> {
        find_parallel(matrix, row, num_rows, num_columns, &self.row_hashes, &self.weights)
    }

    /// The element the (not yet absorbed) `column` is parallel to.
    pub fn parallel_column(
        &self,
        transpose: &SparseMatrix,
        column: usize,
        num_columns: usize,
        num_rows: usize,
    ) -> Option<Element> {
        find_parallel(
            transpose,
            column,
            num_columns,
            num_rows,
            &self.column_hashes,
            &self.weights,
        )
        .map(Element::transpose)
    }

    /// Rows below `num_rows` whose hash equals that of `row` restricted to
    /// `num_columns`. Always contains every exact match.
    pub fn row_candidates(
        &self,
        matrix: &SparseMatrix,
        row: usize,
        num_rows: usize,
        num_columns: usize,
    ) -> Vec<usize> {
        let hash = support_hash(matrix.row_prefix(row, num_columns), &self.weights);
        (0..num_rows)
            .filter(|&other| self.row_hashes[other] == hash)
            .collect()
    }

    /// Column counterpart of [`HashOracle::row_candidates`].
    pub fn column_candidates(
        &self,
        transpose: &SparseMatrix,
        column: usize,
        num_columns: usize,
        num_rows: usize,
    ) -> Vec<usize> {
        let hash = support_hash(transpose.row_prefix(column, num_rows), &self.weights);
        (0..num_columns)
            .filter(|&other| self.column_hashes[other] == hash)
            .collect()
    }
}
