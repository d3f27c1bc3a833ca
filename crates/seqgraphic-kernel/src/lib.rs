//! # Seqgraphic Kernel
//!
//! Incremental graphicness certification: given a 0/±1 matrix and a nested
//! sequence of leading minors, keep a graph whose spanning tree is the rows
//! and whose fundamental cycles are the columns, and stop at the first minor
//! that has no such graph.
//!
//! ## Architecture
//!
//! ```text
//! MinorSequence          ← wheel size, then one of five step shapes per minor
//!     │
//! test_graphic_sequence  ← builds the wheel, dispatches steps, keeps hashes
//!     │
//! Extension              ← parallels / supports looked up per step
//!     │
//! local · column · row   ← handlers mutating the WitnessState on success
//!     │
//! traverse               ← articulation points, tree paths, components
//! ```
//!
//! Only nonzero patterns matter; signs are ignored.

pub mod case;
pub mod certify;
pub mod column;
pub mod element;
pub mod error;
pub mod extension;
pub mod hash;
pub mod local;
pub mod matrix;
pub mod row;
pub mod sequence;
pub mod state;
pub mod traverse;
pub mod wheel;
pub mod witness;

pub use case::{GraphicCase, MatrixSpec};
pub use certify::certify_witness;
pub use element::Element;
pub use error::{GraphicError, Invariant, Violation};
pub use extension::{Boundary, Extension, Obstruction, StepShape, StepVerdict};
pub use hash::HashOracle;
pub use matrix::SparseMatrix;
pub use sequence::{
    GraphicSequence, MinorSequence, SequenceOptions, SequenceOutcome, test_graphic_sequence,
};
pub use state::{WitnessGraph, WitnessState};
pub use wheel::build_wheel;
pub use witness::{SequenceReport, StepFailure, Witness, WitnessEdge};
