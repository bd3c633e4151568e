//! Core types for vtkscan-rs.
//!
//! This crate provides the fundamental types shared by the scanner and the
//! cell geometry engine:
//! - [`ValueFormat`] and the big-endian value codec
//! - The descriptor data model ([`Dataset`] and its section descriptors)
//! - [`ValueArray`], the owned result of bulk materialization
//! - [`VtkError`] and the crate-wide [`Result`] alias

// Codec and fill code intentionally casts between numeric formats
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod format;
pub mod model;
pub mod value;

pub use error::{Result, VtkError};
pub use format::{decode_f32, decode_f64, decode_i32, write_component, ValueFormat};
pub use model::{
    AttributeSection, CellTypes, CellsTopology, Dataset, DatasetBody, DatasetKind, FieldBlock,
    FieldValue, PointPositions, StructuredGrid, StructuredPoints, UnstructuredGrid,
};
pub use value::ValueArray;

// Re-export glam types for convenience
pub use glam::{DVec3, UVec3};
