//! Modelos neutrales (Artifact, formatos, matrices, tablas, fingerprint, contexto).

pub mod artifact;
pub mod context;
pub mod fingerprint;
pub mod matrix;
pub mod table;

pub use artifact::{Artifact, ArtifactFormat, ArtifactFormatError, ArtifactValue, OutputSpec};
pub use context::ExecutionContext;
pub use fingerprint::{InputFingerprint, StepFingerprintInput};
pub use matrix::{CsrMatrix, DenseMatrix, NumericArray, ShapeError};
pub use table::{Column, NamedColumn, Table};
