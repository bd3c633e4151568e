//! Structural descriptors of a parsed legacy VTK file.
//!
//! Descriptors are cheap, immutable, and copyable: they record where bulk
//! payloads live in the file (byte offset + element count + format) without
//! holding any payload bytes. Materializing a descriptor is a separate,
//! explicit operation on the parser.

use glam::{DVec3, UVec3};
use serde::{Deserialize, Serialize};

use crate::format::ValueFormat;

/// The dataset kind tag of a parsed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetKind {
    UnstructuredGrid,
    StructuredGrid,
    StructuredPoints,
}

/// Location of the point coordinate payload.
///
/// The payload occupies `nb_points * 3 * format.size()` bytes starting at
/// `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointPositions {
    /// Number of points.
    pub nb_points: u32,
    /// Per-coordinate numeric format.
    pub format: ValueFormat,
    /// Byte offset of the first coordinate in the file.
    pub offset: u64,
}

/// Location of the CELLS topology payload.
///
/// Each record is `[points_in_cell, idx0, idx1, ...]`, all 4-byte
/// big-endian signed integers; `whole_size` is the total word count across
/// all records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellsTopology {
    /// Number of cells.
    pub nb_cells: u32,
    /// Total i32 word count across all topology records.
    pub whole_size: u32,
    /// Byte offset of the first word in the file.
    pub offset: u64,
}

/// Location of the CELL_TYPES payload: one 4-byte big-endian type code per
/// cell, aligned with [`CellsTopology`] in iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellTypes {
    /// Number of cells.
    pub nb_cells: u32,
    /// Byte offset of the first type code in the file.
    pub offset: u64,
}

/// One named array inside a `FIELD` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    /// The array name.
    pub name: String,
    /// The numeric format of the stored values.
    pub format: ValueFormat,
    /// Number of tuples.
    pub nb_tuples: u32,
    /// Number of values per tuple.
    pub nb_values_per_tuple: u32,
    /// Byte offset of the first value in the file.
    pub offset: u64,
}

impl FieldValue {
    /// Total number of stored values.
    pub fn nb_values(&self) -> u64 {
        u64::from(self.nb_tuples) * u64::from(self.nb_values_per_tuple)
    }
}

/// A named `FIELD` block: an ordered group of value arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBlock {
    /// The block name.
    pub name: String,
    /// The arrays, in declaration order.
    pub values: Vec<FieldValue>,
}

/// A `POINT_DATA` or `CELL_DATA` section. A dataset carries at most one of
/// each; a section may hold zero or more field blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSection {
    /// The element count declared on the section line.
    pub declared_count: u32,
    /// The field blocks, in declaration order.
    pub blocks: Vec<FieldBlock>,
}

impl AttributeSection {
    /// All field value descriptors of this section, in first-seen order.
    pub fn field_values(&self) -> impl Iterator<Item = &FieldValue> {
        self.blocks.iter().flat_map(|b| b.values.iter())
    }
}

/// A `STRUCTURED_POINTS` body. Small enough to decode eagerly at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructuredPoints {
    /// Grid dimensions.
    pub dimensions: UVec3,
    /// Spacing between samples along each axis.
    pub spacing: DVec3,
    /// Origin of the grid.
    pub origin: DVec3,
}

/// A `STRUCTURED_GRID` body.
///
/// Recognized as a dataset tag, but its body parser is intentionally
/// unimplemented and always fails; `parse` never produces this variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredGrid {
    /// Grid size along each axis.
    pub size: [u32; 3],
    /// The point coordinate payload.
    pub points: PointPositions,
}

/// An `UNSTRUCTURED_GRID` body: three deferred payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstructuredGrid {
    /// The point coordinate payload.
    pub points: PointPositions,
    /// The cell topology payload.
    pub cells: CellsTopology,
    /// The cell type payload.
    pub cell_types: CellTypes,
}

/// The dataset body, selected by the `DATASET` header line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DatasetBody {
    StructuredPoints(StructuredPoints),
    StructuredGrid(StructuredGrid),
    UnstructuredGrid(UnstructuredGrid),
}

impl DatasetBody {
    /// The kind tag of this body.
    pub fn kind(&self) -> DatasetKind {
        match self {
            DatasetBody::StructuredPoints(_) => DatasetKind::StructuredPoints,
            DatasetBody::StructuredGrid(_) => DatasetKind::StructuredGrid,
            DatasetBody::UnstructuredGrid(_) => DatasetKind::UnstructuredGrid,
        }
    }
}

/// A single parsed file's structural summary.
///
/// Created by the scanner in one pass and immutable afterwards; bulk
/// payloads stay in the file until a descriptor is materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// File format version as `(major, minor)`.
    pub version: (u32, u32),
    /// The free-text header line, stored verbatim.
    pub header: String,
    /// The dataset body.
    pub body: DatasetBody,
    /// The `POINT_DATA` section, if present.
    pub point_data: Option<AttributeSection>,
    /// The `CELL_DATA` section, if present.
    pub cell_data: Option<AttributeSection>,
}

impl Dataset {
    /// The dataset kind tag.
    pub fn kind(&self) -> DatasetKind {
        self.body.kind()
    }

    /// The unstructured grid body, if this dataset is one.
    pub fn unstructured_grid(&self) -> Option<&UnstructuredGrid> {
        match &self.body {
            DatasetBody::UnstructuredGrid(g) => Some(g),
            _ => None,
        }
    }

    /// The structured points body, if this dataset is one.
    pub fn structured_points(&self) -> Option<&StructuredPoints> {
        match &self.body {
            DatasetBody::StructuredPoints(p) => Some(p),
            _ => None,
        }
    }
}
