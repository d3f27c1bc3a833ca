//! Compressed sparse row storage for 0/±1 matrices.
//!
//! Every row keeps its nonzero column indices strictly increasing, so the
//! nonzeros of a row inside a column prefix form a leading slice.

use crate::error::GraphicError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A read-only sparse matrix with entries in {-1, 0, 1}.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i8>>", into = "Vec<Vec<i8>>")]
pub struct SparseMatrix {
    num_rows: usize,
    num_columns: usize,
    row_slice: Vec<usize>,
    entry_columns: Vec<usize>,
    entry_values: Vec<i8>,
}

impl SparseMatrix {
    /// Build from dense rows. All rows must have the same length.
    pub fn from_dense(rows: &[Vec<i8>]) -> Result<Self, GraphicError> {
        let num_columns = rows.first().map_or(0, Vec::len);
        let mut row_slice = Vec::with_capacity(rows.len() + 1);
        let mut entry_columns = Vec::new();
        let mut entry_values = Vec::new();
        row_slice.push(0);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != num_columns {
                return Err(GraphicError::InvalidMatrix(format!(
                    "row {} has {} entries, expected {num_columns}",
                    r + 1,
                    row.len()
                )));
            }
            for (c, &value) in row.iter().enumerate() {
                match value {
                    0 => {}
                    -1 | 1 => {
                        entry_columns.push(c);
                        entry_values.push(value);
                    }
                    other => {
                        return Err(GraphicError::InvalidMatrix(format!(
                            "entry ({}, {}) is {other}, expected -1, 0 or 1",
                            r + 1,
                            c + 1
                        )));
                    }
                }
            }
            row_slice.push(entry_columns.len());
        }
        Ok(Self {
            num_rows: rows.len(),
            num_columns,
            row_slice,
            entry_columns,
            entry_values,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn num_nonzeros(&self) -> usize {
        self.entry_columns.len()
    }

    /// Nonzero column indices of `row`, increasing.
    pub fn row(&self, row: usize) -> &[usize] {
        &self.entry_columns[self.row_slice[row]..self.row_slice[row + 1]]
    }

    /// Values matching [`SparseMatrix::row`].
    pub fn row_values(&self, row: usize) -> &[i8] {
        &self.entry_values[self.row_slice[row]..self.row_slice[row + 1]]
    }

    /// Nonzero column indices of `row` that are smaller than `limit`.
    pub fn row_prefix(&self, row: usize, limit: usize) -> &[usize] {
        let entries = self.row(row);
        &entries[..entries.partition_point(|&c| c < limit)]
    }

    pub fn get(&self, row: usize, column: usize) -> i8 {
        let entries = self.row(row);
        match entries.binary_search(&column) {
            Ok(pos) => self.row_values(row)[pos],
            Err(_) => 0,
        }
    }

    /// The transposed matrix; its rows are this matrix's columns.
    pub fn transpose(&self) -> Self {
        let mut counts = vec![0usize; self.num_columns + 1];
        for &c in &self.entry_columns {
            counts[c + 1] += 1;
        }
        for c in 0..self.num_columns {
            counts[c + 1] += counts[c];
        }
        let row_slice = counts.clone();
        let mut cursor = counts;
        let mut entry_columns = vec![0usize; self.entry_columns.len()];
        let mut entry_values = vec![0i8; self.entry_values.len()];
        for row in 0..self.num_rows {
            for e in self.row_slice[row]..self.row_slice[row + 1] {
                let column = self.entry_columns[e];
                let slot = cursor[column];
                entry_columns[slot] = row;
                entry_values[slot] = self.entry_values[e];
                cursor[column] += 1;
            }
        }
        Self {
            num_rows: self.num_columns,
            num_columns: self.num_rows,
            row_slice,
            entry_columns,
            entry_values,
        }
    }

    pub fn to_dense(&self) -> Vec<Vec<i8>> {
        (0..self.num_rows)
            .map(|row| {
                let mut dense = vec![0i8; self.num_columns];
                for (&c, &v) in self.row(row).iter().zip(self.row_values(row)) {
                    dense[c] = v;
                }
                dense
            })
            .collect()
    }
}

impl TryFrom<Vec<Vec<i8>>> for SparseMatrix {
    type Error = GraphicError;

    fn try_from(rows: Vec<Vec<i8>>) -> Result<Self, Self::Error> {
        Self::from_dense(&rows)
    }
}

impl From<SparseMatrix> for Vec<Vec<i8>> {
    fn from(matrix: SparseMatrix) -> Self {
        matrix.to_dense()
    }
}

/// Text form `"m n v11 v12 … vmn"`, whitespace separated, row-major.
impl FromStr for SparseMatrix {
    type Err = GraphicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let mut dimension = |name: &str| -> Result<usize, GraphicError> {
            tokens
                .next()
                .ok_or_else(|| GraphicError::InvalidMatrix(format!("missing {name} count")))?
                .parse()
                .map_err(|e| GraphicError::InvalidMatrix(format!("bad {name} count: {e}")))
        };
        let num_rows = dimension("row")?;
        let num_columns = dimension("column")?;
        let values = tokens
            .map(|t| {
                t.parse::<i8>()
                    .map_err(|e| GraphicError::InvalidMatrix(format!("bad entry `{t}`: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if values.len() != num_rows * num_columns {
            return Err(GraphicError::InvalidMatrix(format!(
                "expected {} entries for a {num_rows}x{num_columns} matrix, found {}",
                num_rows * num_columns,
                values.len()
            )));
        }
        if num_columns == 0 {
            return Ok(Self {
                num_rows,
                num_columns: 0,
                row_slice: vec![0; num_rows + 1],
                entry_columns: Vec::new(),
                entry_values: Vec::new(),
            });
        }
        let rows: Vec<Vec<i8>> = values.chunks(num_columns).map(<[i8]>::to_vec).collect();
        Self::from_dense(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SparseMatrix {
        "3 4  1 0 -1 1  0 0 0 0  0 1 1 0".parse().unwrap()
    }

    #[test]
    fn rows_are_sorted_and_prefix_is_a_slice() {
        let m = sample();
        assert_eq!(m.num_rows(), 3);
        assert_eq!(m.num_columns(), 4);
        assert_eq!(m.num_nonzeros(), 5);
        assert_eq!(m.row(0), &[0, 2, 3]);
        assert_eq!(m.row_values(0), &[1, -1, 1]);
        assert_eq!(m.row_prefix(0, 3), &[0, 2]);
        assert_eq!(m.row_prefix(0, 0), &[] as &[usize]);
        assert!(m.row(1).is_empty());
        assert_eq!(m.get(0, 2), -1);
        assert_eq!(m.get(1, 2), 0);
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let m = sample();
        let t = m.transpose();
        assert_eq!(t.num_rows(), 4);
        assert_eq!(t.num_columns(), 3);
        assert_eq!(t.row(2), &[0, 2]);
        assert_eq!(t.row_values(2), &[-1, 1]);
        assert_eq!(t.row(1), &[2]);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn rejects_non_ternary_entries() {
        let err = SparseMatrix::from_dense(&[vec![1, 2]]).unwrap_err();
        assert!(matches!(err, GraphicError::InvalidMatrix(_)));
        assert!("2 2 1 0 1".parse::<SparseMatrix>().is_err());
        assert!(SparseMatrix::from_dense(&[vec![1, 0], vec![1]]).is_err());
    }

    #[test]
    fn serde_round_trips_dense_rows() {
        let m = sample();
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json, serde_json::json!([[1, 0, -1, 1], [0, 0, 0, 0], [0, 1, 1, 0]]));
        let back: SparseMatrix = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }
}
