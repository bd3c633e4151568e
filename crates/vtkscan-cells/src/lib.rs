//! Cell-type registry and geometry engine for vtkscan-rs.
//!
//! This crate turns raw unstructured-grid topology into GPU-ready buffers:
//! - [`CellHandler`] is the per-type capability (arity, primitive mode,
//!   sizing, vertex fill, index fill)
//! - [`CellRegistry`] maps VTK cell-type codes to handlers
//! - [`cell_construction_descriptor`] analyzes a batch of cells into
//!   homogeneous renderable runs
//! - the `fill_*` functions write one run's vertex or index buffer
//!
//! No GPU API is touched; the engine only fills CPU-side buffers.

// Geometry code intentionally uses casts for indices and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

pub mod construction;
pub mod handler;
pub mod registry;
pub mod wedge;

pub use construction::{
    cell_construction_descriptor, cell_construction_descriptor_with, CellConstruction,
    fill_unstructured_grid_cell_buffer, fill_unstructured_grid_cell_buffer_with,
    fill_unstructured_grid_cell_element_buffer, fill_unstructured_grid_cell_element_buffer_with,
};
pub use handler::{CellHandler, PrimitiveMode};
pub use registry::{default_registry, CellRegistry, VTK_WEDGE};
pub use wedge::Wedge;
