//! JSON case files.
//!
//! ```json
//! {
//!   "matrix": [[1, 1, 0], [1, 0, 1], [0, 1, 1], [1, 1, 0]],
//!   "rows": [3, 4],
//!   "columns": [3, 3],
//!   "options": { "certifySteps": true }
//! }
//! ```
//!
//! `matrix` may also be the text form `"m n v11 v12 …"`. `rowElements` and
//! `columnElements` default to the identity.

use crate::element::Element;
use crate::error::GraphicError;
use crate::matrix::SparseMatrix;
use crate::sequence::{MinorSequence, SequenceOptions, SequenceOutcome, test_graphic_sequence};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Matrix as dense rows or as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatrixSpec {
    Dense(Vec<Vec<i8>>),
    Text(String),
}

impl MatrixSpec {
    pub fn to_matrix(&self) -> Result<SparseMatrix, GraphicError> {
        match self {
            MatrixSpec::Dense(rows) => SparseMatrix::from_dense(rows),
            MatrixSpec::Text(text) => text.parse(),
        }
    }
}

/// A matrix together with the minor sequence to certify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicCase {
    pub matrix: MatrixSpec,
    pub rows: Vec<usize>,
    pub columns: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_elements: Option<Vec<Element>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_elements: Option<Vec<Element>>,
    #[serde(default)]
    pub options: SequenceOptions,
}

impl GraphicCase {
    pub fn from_json(text: &str) -> Result<Self, GraphicError> {
        serde_json::from_str(text).map_err(|e| GraphicError::InvalidCase(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, GraphicError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| GraphicError::InvalidCase(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn sequence(&self) -> Result<MinorSequence, GraphicError> {
        MinorSequence::new(self.rows.clone(), self.columns.clone())
    }

    /// Run with the case's own options.
    pub fn run(&self) -> Result<SequenceOutcome, GraphicError> {
        self.run_with(&self.options)
    }

    pub fn run_with(&self, options: &SequenceOptions) -> Result<SequenceOutcome, GraphicError> {
        let matrix = self.matrix.to_matrix()?;
        let transpose = matrix.transpose();
        let sequence = self.sequence()?;
        let row_elements = self
            .row_elements
            .clone()
            .unwrap_or_else(|| Element::rows(matrix.num_rows()));
        let column_elements = self
            .column_elements
            .clone()
            .unwrap_or_else(|| Element::columns(matrix.num_columns()));
        test_graphic_sequence(
            &matrix,
            &transpose,
            &row_elements,
            &column_elements,
            &sequence,
            options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_dense_matrices_agree() {
        let dense = GraphicCase::from_json(
            r#"{"matrix": [[1,1,0],[1,0,1],[0,1,1]], "rows": [3], "columns": [3]}"#,
        )
        .unwrap();
        let text = GraphicCase::from_json(
            r#"{"matrix": "3 3 1 1 0 1 0 1 0 1 1", "rows": [3], "columns": [3]}"#,
        )
        .unwrap();
        assert_eq!(
            dense.matrix.to_matrix().unwrap(),
            text.matrix.to_matrix().unwrap()
        );
        assert!(!dense.options.certify_steps);
        assert_eq!(
            dense.run().unwrap().report(false),
            text.run().unwrap().report(false)
        );
    }

    #[test]
    fn custom_elements_label_the_witness() {
        let case = GraphicCase::from_json(
            r#"{
                "matrix": [[1,1,0],[1,0,1],[0,1,1]],
                "rows": [3],
                "columns": [3],
                "rowElements": ["c4", "c5", "c6"],
                "columnElements": ["r4", "r5", "r6"],
                "options": {"certifySteps": true}
            }"#,
        )
        .unwrap();
        assert!(case.options.certify_steps);
        let witness = case.run().unwrap().witness.unwrap();
        assert_eq!(witness.edge_elements()[0], Some(Element::Row(3)));
        assert_eq!(witness.edge_elements()[1], Some(Element::Column(3)));
    }

    #[test]
    fn malformed_cases_are_rejected() {
        assert!(matches!(
            GraphicCase::from_json(r#"{"matrix": [[1]], "rows": [3]}"#),
            Err(GraphicError::InvalidCase(_))
        ));
        let bad_matrix =
            GraphicCase::from_json(r#"{"matrix": [[1, 2]], "rows": [3], "columns": [3]}"#)
                .unwrap();
        assert!(matches!(bad_matrix.run(), Err(GraphicError::InvalidMatrix(_))));
    }
}
