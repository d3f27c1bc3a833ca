//! Running a minor sequence.
//!
//! The first minor is a wheel; every later minor adds lines in one of the
//! five [`StepShape`]s. The run stops at the first step that is not graphic
//! and otherwise hands back the witness graph for the last minor.

use crate::certify::certify_witness;
use crate::element::Element;
use crate::error::GraphicError;
use crate::extension::{Boundary, Extension, StepShape, StepVerdict};
use crate::hash::HashOracle;
use crate::matrix::SparseMatrix;
use crate::state::WitnessState;
use crate::wheel::build_wheel;
use crate::witness::{SequenceReport, StepFailure, Witness};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Boundaries of a nested sequence of leading minors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSequence", into = "RawSequence")]
pub struct MinorSequence {
    boundaries: Vec<Boundary>,
}

#[derive(Serialize, Deserialize)]
struct RawSequence {
    rows: Vec<usize>,
    columns: Vec<usize>,
}

/// One transition between consecutive minors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Index of the minor being reached.
    pub index: usize,
    pub from: Boundary,
    pub to: Boundary,
    pub shape: StepShape,
}

impl MinorSequence {
    /// Validate the boundary lists.
    ///
    /// The first minor must be square of size at least 3 and every later
    /// minor must grow by one of the five step shapes.
    pub fn new(rows: Vec<usize>, columns: Vec<usize>) -> Result<Self, GraphicError> {
        if rows.len() != columns.len() {
            return Err(GraphicError::InvalidSequence(format!(
                "{} row boundaries but {} column boundaries",
                rows.len(),
                columns.len()
            )));
        }
        let boundaries: Vec<Boundary> = rows
            .into_iter()
            .zip(columns)
            .map(|(r, c)| Boundary::new(r, c))
            .collect();
        let Some(first) = boundaries.first() else {
            return Err(GraphicError::InvalidSequence("no minors".to_owned()));
        };
        if first.rows != first.columns || first.rows < 3 {
            return Err(GraphicError::InvalidSequence(format!(
                "first minor is {first}, expected a square of size at least 3"
            )));
        }
        for (i, pair) in boundaries.windows(2).enumerate() {
            if StepShape::classify(pair[0], pair[1]).is_none() {
                return Err(GraphicError::InvalidSequence(format!(
                    "step {} goes from {} to {}",
                    i + 1,
                    pair[0],
                    pair[1]
                )));
            }
        }
        Ok(Self { boundaries })
    }

    /// Number of minors.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Always false; a sequence holds at least the wheel.
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn boundary(&self, index: usize) -> Boundary {
        self.boundaries[index]
    }

    pub fn first(&self) -> Boundary {
        self.boundaries[0]
    }

    pub fn last(&self) -> Boundary {
        self.boundaries[self.boundaries.len() - 1]
    }

    /// The transitions after the wheel, in order.
    pub fn steps(&self) -> impl Iterator<Item = Step> + '_ {
        self.boundaries
            .windows(2)
            .enumerate()
            .filter_map(|(i, pair)| {
                StepShape::classify(pair[0], pair[1]).map(|shape| Step {
                    index: i + 1,
                    from: pair[0],
                    to: pair[1],
                    shape,
                })
            })
    }

    /// Check that every minor fits inside `matrix`.
    pub fn check_fits(&self, matrix: &SparseMatrix) -> Result<(), GraphicError> {
        let last = self.last();
        if last.rows > matrix.num_rows() || last.columns > matrix.num_columns() {
            return Err(GraphicError::InvalidSequence(format!(
                "last minor {last} exceeds the {}x{} matrix",
                matrix.num_rows(),
                matrix.num_columns()
            )));
        }
        Ok(())
    }
}

impl TryFrom<RawSequence> for MinorSequence {
    type Error = GraphicError;

    fn try_from(raw: RawSequence) -> Result<Self, Self::Error> {
        Self::new(raw.rows, raw.columns)
    }
}

impl From<MinorSequence> for RawSequence {
    fn from(sequence: MinorSequence) -> Self {
        let (rows, columns) = sequence
            .boundaries
            .iter()
            .map(|b| (b.rows, b.columns))
            .unzip();
        Self { rows, columns }
    }
}

/// Run options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SequenceOptions {
    /// Re-verify the witness after the wheel and after every graphic step.
    pub certify_steps: bool,
}

/// What a run established.
#[derive(Debug, Clone)]
pub struct SequenceOutcome {
    /// Index of the last minor known to be graphic.
    pub last_graphic_minor: usize,
    /// The step that stopped the run early.
    pub failure: Option<StepFailure>,
    /// The witness for the last minor, present only if every step was graphic.
    pub witness: Option<Witness>,
    minors: usize,
}

impl SequenceOutcome {
    pub fn is_graphic(&self) -> bool {
        self.witness.is_some()
    }

    /// Summary for serialization; `with_edges` includes the full edge list.
    pub fn report(&self, with_edges: bool) -> SequenceReport {
        SequenceReport {
            graphic: self.is_graphic(),
            minors: self.minors,
            last_graphic_minor: self.last_graphic_minor,
            failure: self.failure.clone(),
            nodes: self.witness.as_ref().map(|w| w.graph().node_count()),
            witness_digest: self.witness.as_ref().map(Witness::digest),
            edges: self
                .witness
                .as_ref()
                .filter(|_| with_edges)
                .map(Witness::edges),
        }
    }
}

fn certify_step(
    state: &WitnessState,
    transpose: &SparseMatrix,
    step: usize,
) -> Result<(), GraphicError> {
    let violations = certify_witness(state, transpose);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(GraphicError::Witness { step, violations })
    }
}

/// Certify every minor of `sequence` in order.
///
/// `row_elements[r]`/`column_elements[c]` name the caller's element for row
/// `r`/column `c` and are only used to label the final witness.
pub fn test_graphic_sequence(
    matrix: &SparseMatrix,
    transpose: &SparseMatrix,
    row_elements: &[Element],
    column_elements: &[Element],
    sequence: &MinorSequence,
    options: &SequenceOptions,
) -> Result<SequenceOutcome, GraphicError> {
    if transpose.num_rows() != matrix.num_columns()
        || transpose.num_columns() != matrix.num_rows()
    {
        return Err(GraphicError::InvalidMatrix(format!(
            "transpose is {}x{} for a {}x{} matrix",
            transpose.num_rows(),
            transpose.num_columns(),
            matrix.num_rows(),
            matrix.num_columns()
        )));
    }
    sequence.check_fits(matrix)?;
    let last = sequence.last();
    if row_elements.len() < last.rows || column_elements.len() < last.columns {
        return Err(GraphicError::InvalidSequence(format!(
            "element maps cover {}x{}, last minor is {last}",
            row_elements.len(),
            column_elements.len()
        )));
    }

    let wheel = sequence.first();
    let mut state = build_wheel(matrix, transpose, wheel.rows)?;
    let mut oracle = HashOracle::new(matrix.num_rows(), matrix.num_columns())?;
    oracle.absorb_rows(matrix, 0..wheel.rows, wheel.columns);
    if options.certify_steps {
        certify_step(&state, transpose, 0)?;
    }
    debug!(size = wheel.rows, "wheel built");

    let mut last_graphic_minor = 0;
    let mut failure = None;
    for step in sequence.steps() {
        debug_assert_eq!(state.num_rows(), step.from.rows);
        debug_assert_eq!(state.num_columns(), step.from.columns);

        let verdict = match Extension::prepare(step.shape, step.from, matrix, transpose, &oracle) {
            Ok(extension) => extension.apply(&mut state)?,
            Err(obstruction) => StepVerdict::NotGraphic(obstruction),
        };
        debug!(
            step = step.index,
            shape = ?step.shape,
            from = %step.from,
            to = %step.to,
            graphic = verdict.is_graphic(),
            "extension step"
        );
        match verdict {
            StepVerdict::Graphic => last_graphic_minor = step.index,
            StepVerdict::NotGraphic(obstruction) => {
                failure = Some(StepFailure {
                    step: step.index,
                    boundary: step.to,
                    obstruction,
                });
                break;
            }
        }
        if options.certify_steps {
            certify_step(&state, transpose, step.index)?;
        }
        oracle.absorb_rows(matrix, step.from.rows..step.to.rows, step.from.columns);
        oracle.absorb_columns(transpose, step.from.columns..step.to.columns, step.to.rows);
    }

    let witness = failure
        .is_none()
        .then(|| Witness::from_state(state, row_elements, column_elements));
    info!(
        minors = sequence.len(),
        last_graphic_minor,
        graphic = witness.is_some(),
        "sequence checked"
    );
    Ok(SequenceOutcome {
        last_graphic_minor,
        failure,
        witness,
        minors: sequence.len(),
    })
}

/// A matrix with its transpose, run with identity element maps.
#[derive(Debug, Clone)]
pub struct GraphicSequence {
    matrix: SparseMatrix,
    transpose: SparseMatrix,
    options: SequenceOptions,
}

impl GraphicSequence {
    pub fn new(matrix: SparseMatrix) -> Self {
        let transpose = matrix.transpose();
        Self {
            matrix,
            transpose,
            options: SequenceOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SequenceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn matrix(&self) -> &SparseMatrix {
        &self.matrix
    }

    pub fn transpose(&self) -> &SparseMatrix {
        &self.transpose
    }

    pub fn run(&self, sequence: &MinorSequence) -> Result<SequenceOutcome, GraphicError> {
        test_graphic_sequence(
            &self.matrix,
            &self.transpose,
            &Element::rows(self.matrix.num_rows()),
            &Element::columns(self.matrix.num_columns()),
            sequence,
            &self.options,
        )
    }
}
