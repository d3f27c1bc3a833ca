//! Step shapes and their dispatch.
//!
//! A step grows the processed boundary by one of five shapes. Preparing an
//! [`Extension`] collects exactly the data its handler needs (parallel
//! elements or a restricted support) before the witness state is touched.

use crate::element::Element;
use crate::error::GraphicError;
use crate::hash::HashOracle;
use crate::matrix::SparseMatrix;
use crate::state::WitnessState;
use crate::{column, local, row};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rows and columns of a minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Boundary {
    pub rows: usize,
    pub columns: usize,
}

impl Boundary {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// How many rows and columns a step adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepShape {
    /// One row and one column.
    RowAndColumn,
    /// Two rows and one column.
    TwoRowsOneColumn,
    /// One row and two columns.
    OneRowTwoColumns,
    /// One column.
    Column,
    /// One row.
    Row,
}

impl StepShape {
    /// The shape taking `from` to `to`, if it is one of the five.
    pub fn classify(from: Boundary, to: Boundary) -> Option<Self> {
        let added_rows = to.rows.checked_sub(from.rows)?;
        let added_columns = to.columns.checked_sub(from.columns)?;
        match (added_rows, added_columns) {
            (1, 1) => Some(Self::RowAndColumn),
            (2, 1) => Some(Self::TwoRowsOneColumn),
            (1, 2) => Some(Self::OneRowTwoColumns),
            (0, 1) => Some(Self::Column),
            (1, 0) => Some(Self::Row),
            _ => None,
        }
    }

    /// `(added rows, added columns)`.
    pub fn added(self) -> (usize, usize) {
        match self {
            Self::RowAndColumn => (1, 1),
            Self::TwoRowsOneColumn => (2, 1),
            Self::OneRowTwoColumns => (1, 2),
            Self::Column => (0, 1),
            Self::Row => (1, 0),
        }
    }
}

/// Why a step is not graphic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum Obstruction {
    /// A new line is parallel to no processed element.
    NoParallel { line: Element },
    /// The edges of two parallel elements share no endpoint.
    NotAdjacent { first: Element, second: Element },
    /// The row edges of a new column do not form a path.
    NotAPath { leaves: usize },
    /// A new row has no nonzero among the processed columns.
    EmptySupport { line: Element },
    /// Removing the new row's column edges leaves no cut vertex.
    NoArticulationPoint,
    /// Not exactly one cut vertex lies on every affected cycle.
    AmbiguousSplit { candidates: usize },
    /// The components around the split node cannot be two-coloured.
    OddCycle,
}

impl Obstruction {
    /// Stable snake_case name.
    pub fn class(&self) -> &'static str {
        match self {
            Self::NoParallel { .. } => "no_parallel",
            Self::NotAdjacent { .. } => "not_adjacent",
            Self::NotAPath { .. } => "not_a_path",
            Self::EmptySupport { .. } => "empty_support",
            Self::NoArticulationPoint => "no_articulation_point",
            Self::AmbiguousSplit { .. } => "ambiguous_split",
            Self::OddCycle => "odd_cycle",
        }
    }
}

impl fmt::Display for Obstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoParallel { line } => write!(f, "{line} is parallel to no processed element"),
            Self::NotAdjacent { first, second } => {
                write!(f, "edges of {first} and {second} are not adjacent")
            }
            Self::NotAPath { leaves } => {
                write!(f, "column edges close no path ({leaves} leaves, expected 2)")
            }
            Self::EmptySupport { line } => write!(f, "{line} has no processed nonzero"),
            Self::NoArticulationPoint => write!(f, "no articulation point"),
            Self::AmbiguousSplit { candidates } => {
                write!(f, "{candidates} split candidates, expected exactly 1")
            }
            Self::OddCycle => write!(f, "components around the split node form an odd cycle"),
        }
    }
}

/// Result of applying one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepVerdict {
    Graphic,
    NotGraphic(Obstruction),
}

impl StepVerdict {
    pub fn is_graphic(&self) -> bool {
        matches!(self, StepVerdict::Graphic)
    }
}

/// A step ready to be applied, carrying what its handler consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extension<'m> {
    RowAndColumn {
        row_parallel: Element,
        column_parallel: Element,
    },
    TwoRowsOneColumn {
        parallels: [Element; 2],
    },
    OneRowTwoColumns {
        parallels: [Element; 2],
    },
    /// Processed rows with a nonzero in the new column.
    Column { support: &'m [usize] },
    /// Processed columns with a nonzero in the new row.
    Row { row: usize, support: &'m [usize] },
}

impl<'m> Extension<'m> {
    /// Look up parallels or supports against the processed `base` boundary.
    ///
    /// Fails with [`Obstruction::NoParallel`] when a new line has no parallel
    /// element, which already decides the step.
    pub fn prepare(
        shape: StepShape,
        base: Boundary,
        matrix: &'m SparseMatrix,
        transpose: &'m SparseMatrix,
        oracle: &HashOracle,
    ) -> Result<Self, Obstruction> {
        let row_parallel = |row: usize| {
            oracle
                .parallel_row(matrix, row, base.rows, base.columns)
                .ok_or(Obstruction::NoParallel {
                    line: Element::Row(row),
                })
        };
        let column_parallel = |column: usize| {
            oracle
                .parallel_column(transpose, column, base.columns, base.rows)
                .ok_or(Obstruction::NoParallel {
                    line: Element::Column(column),
                })
        };
        Ok(match shape {
            StepShape::RowAndColumn => Extension::RowAndColumn {
                row_parallel: row_parallel(base.rows)?,
                column_parallel: column_parallel(base.columns)?,
            },
            StepShape::TwoRowsOneColumn => Extension::TwoRowsOneColumn {
                parallels: [row_parallel(base.rows)?, row_parallel(base.rows + 1)?],
            },
            StepShape::OneRowTwoColumns => Extension::OneRowTwoColumns {
                parallels: [
                    column_parallel(base.columns)?,
                    column_parallel(base.columns + 1)?,
                ],
            },
            StepShape::Column => Extension::Column {
                support: transpose.row_prefix(base.columns, base.rows),
            },
            StepShape::Row => Extension::Row {
                row: base.rows,
                support: matrix.row_prefix(base.rows, base.columns),
            },
        })
    }

    pub fn shape(&self) -> StepShape {
        match self {
            Extension::RowAndColumn { .. } => StepShape::RowAndColumn,
            Extension::TwoRowsOneColumn { .. } => StepShape::TwoRowsOneColumn,
            Extension::OneRowTwoColumns { .. } => StepShape::OneRowTwoColumns,
            Extension::Column { .. } => StepShape::Column,
            Extension::Row { .. } => StepShape::Row,
        }
    }

    /// Run the handler. The state is modified only on a graphic verdict.
    pub fn apply(&self, state: &mut WitnessState) -> Result<StepVerdict, GraphicError> {
        match *self {
            Extension::RowAndColumn {
                row_parallel,
                column_parallel,
            } => local::extend_row_and_column(state, row_parallel, column_parallel),
            Extension::TwoRowsOneColumn { parallels } => local::extend_two_rows(state, parallels),
            Extension::OneRowTwoColumns { parallels } => {
                local::extend_two_columns(state, parallels)
            }
            Extension::Column { support } => column::extend_column(state, support),
            Extension::Row { row, support } => row::extend_row(state, row, support),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_accepts_only_five_shapes() {
        let base = Boundary::new(3, 3);
        assert_eq!(
            StepShape::classify(base, Boundary::new(4, 4)),
            Some(StepShape::RowAndColumn)
        );
        assert_eq!(
            StepShape::classify(base, Boundary::new(5, 4)),
            Some(StepShape::TwoRowsOneColumn)
        );
        assert_eq!(
            StepShape::classify(base, Boundary::new(4, 5)),
            Some(StepShape::OneRowTwoColumns)
        );
        assert_eq!(StepShape::classify(base, Boundary::new(3, 4)), Some(StepShape::Column));
        assert_eq!(StepShape::classify(base, Boundary::new(4, 3)), Some(StepShape::Row));
        assert_eq!(StepShape::classify(base, Boundary::new(3, 3)), None);
        assert_eq!(StepShape::classify(base, Boundary::new(5, 5)), None);
        assert_eq!(StepShape::classify(base, Boundary::new(2, 4)), None);
        for shape in [
            StepShape::RowAndColumn,
            StepShape::TwoRowsOneColumn,
            StepShape::OneRowTwoColumns,
            StepShape::Column,
            StepShape::Row,
        ] {
            let (r, c) = shape.added();
            assert_eq!(StepShape::classify(base, Boundary::new(3 + r, 3 + c)), Some(shape));
        }
    }

    #[test]
    fn obstruction_serializes_with_class_tag() {
        let obstruction = Obstruction::NotAdjacent {
            first: Element::Row(0),
            second: Element::Column(2),
        };
        assert_eq!(obstruction.class(), "not_adjacent");
        assert_eq!(
            serde_json::to_value(&obstruction).unwrap(),
            serde_json::json!({"class": "not_adjacent", "first": "r1", "second": "c3"})
        );
        assert_eq!(
            serde_json::to_value(Obstruction::OddCycle).unwrap(),
            serde_json::json!({"class": "odd_cycle"})
        );
        assert_eq!(
            Obstruction::NotAPath { leaves: 3 }.to_string(),
            "column edges close no path (3 leaves, expected 2)"
        );
    }

    #[test]
    fn prepare_finds_parallels_against_the_base() {
        // Wheel plus a row parallel to c1 and a column parallel to r2.
        let m = SparseMatrix::from_dense(&[
            vec![1, 1, 0, 0],
            vec![1, 0, 1, 1],
            vec![0, 1, 1, 0],
            vec![1, 0, 0, 1],
        ])
        .unwrap();
        let t = m.transpose();
        let mut oracle = HashOracle::new(4, 4).unwrap();
        oracle.absorb_rows(&m, 0..3, 3);
        let base = Boundary::new(3, 3);

        let extension = Extension::prepare(StepShape::RowAndColumn, base, &m, &t, &oracle).unwrap();
        assert_eq!(
            extension,
            Extension::RowAndColumn {
                row_parallel: Element::Column(0),
                column_parallel: Element::Row(1),
            }
        );
        assert_eq!(
            Extension::prepare(StepShape::Row, base, &m, &t, &oracle).unwrap(),
            Extension::Row {
                row: 3,
                support: &[0],
            }
        );
        assert_eq!(
            Extension::prepare(StepShape::Column, base, &m, &t, &oracle)
                .unwrap()
                .shape(),
            StepShape::Column
        );
    }

    #[test]
    fn prepare_reports_missing_parallel() {
        let m = SparseMatrix::from_dense(&[
            vec![1, 1, 0, 0],
            vec![1, 0, 1, 0],
            vec![0, 1, 1, 0],
            vec![1, 1, 1, 1],
        ])
        .unwrap();
        let t = m.transpose();
        let mut oracle = HashOracle::new(4, 4).unwrap();
        oracle.absorb_rows(&m, 0..3, 3);
        assert_eq!(
            Extension::prepare(StepShape::RowAndColumn, Boundary::new(3, 3), &m, &t, &oracle),
            Err(Obstruction::NoParallel {
                line: Element::Row(3)
            })
        );
    }
}
