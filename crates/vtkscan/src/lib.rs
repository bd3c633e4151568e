//! Lazy structural reader for legacy binary VTK files.
//!
//! A [`VtkParser`] scans a file's ASCII header lines in one pass,
//! recording byte offsets and element counts for every binary payload
//! without reading them. Consumers materialize only the payloads they
//! need, then hand topology to the cell geometry engine
//! ([`vtkscan_cells`]) to build GPU-ready vertex and index buffers.
//!
//! ```no_run
//! use vtkscan::{VtkParser, cell_construction_descriptor};
//!
//! # fn main() -> vtkscan::Result<()> {
//! let mut parser = VtkParser::open("wedges.vtk")?;
//! parser.parse()?;
//!
//! let topology = parser.read_unstructured_grid_cell_composition()?;
//! let cell_types = parser.read_unstructured_grid_cell_types()?;
//! let run = cell_construction_descriptor(cell_types.len() as u32, &topology, &cell_types);
//! println!("first homogeneous run: {} cells, {} vertices", run.nb_cells, run.buffer_size);
//! # Ok(())
//! # }
//! ```
//!
//! Only the BINARY variant is handled; ASCII files fail to parse.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

mod parser;
mod scan;

pub use parser::VtkParser;

// Re-export the data model and geometry engine so the parser crate is a
// one-stop surface for renderer integration.
pub use vtkscan_cells::{
    cell_construction_descriptor, cell_construction_descriptor_with, CellConstruction,
    fill_unstructured_grid_cell_buffer, fill_unstructured_grid_cell_buffer_with,
    fill_unstructured_grid_cell_element_buffer, fill_unstructured_grid_cell_element_buffer_with,
    default_registry, CellHandler, CellRegistry, PrimitiveMode, Wedge, VTK_WEDGE,
};
pub use vtkscan_core::{
    decode_f32, decode_f64, decode_i32, write_component, AttributeSection, CellTypes,
    CellsTopology, Dataset, DatasetBody, DatasetKind, FieldBlock, FieldValue, PointPositions,
    Result, StructuredGrid, StructuredPoints, UnstructuredGrid, ValueArray, ValueFormat, VtkError,
};
