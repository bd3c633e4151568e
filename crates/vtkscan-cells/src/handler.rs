//! The per-cell-type geometry handler capability.

use vtkscan_core::{ValueArray, ValueFormat};

/// Rendering primitive mode a cell decomposes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveMode {
    /// Point list.
    Points,
    /// Line list.
    Lines,
    /// Triangle list.
    Triangles,
}

/// Geometry services for one VTK cell type.
///
/// A handler receives one cell's topology record (the point indices, without
/// the leading count word) and decomposes it into render primitives. The
/// buffer-size convention is uniform across both fill paths:
/// [`buffer_size`](CellHandler::buffer_size) counts *output vertices*; the
/// vertex path writes `buffer_size * 3` coordinate components and the index
/// path writes `buffer_size` indices.
pub trait CellHandler: Send + Sync {
    /// Number of points defining this cell type, or `None` when unbounded.
    fn point_count(&self) -> Option<u32>;

    /// The rendering primitive mode of the decomposition.
    fn mode(&self) -> PrimitiveMode;

    /// Number of output vertices produced for this cell.
    fn buffer_size(&self, topology: &[i32]) -> u32;

    /// Writes the cell's decomposed coordinates into `dest`.
    ///
    /// `dest` holds `buffer_size * 3` components of `dest_format`, in native
    /// layout; coordinates are fetched from `points` (a flat xyz array) at
    /// the indices named by `topology` and converted to `dest_format`.
    fn fill_vertex_buffer(
        &self,
        points: &ValueArray,
        topology: &[i32],
        dest: &mut [u8],
        dest_format: ValueFormat,
    );

    /// Writes the cell's decomposed point indices into `dest`
    /// (`buffer_size` entries).
    fn fill_index_buffer(&self, topology: &[i32], dest: &mut [i32]);
}
