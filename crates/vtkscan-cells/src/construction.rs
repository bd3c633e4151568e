//! Batch analysis and buffer filling over runs of cells.
//!
//! A renderer issues one draw call per homogeneous run of cells:
//! [`cell_construction_descriptor`] analyzes the next run and reports how
//! far it got, and the fill functions then write the run's vertex or index
//! buffer. Heterogeneous batches are handled by re-invoking with the
//! topology array advanced by the returned word offset.

use vtkscan_core::{ValueArray, ValueFormat};

use crate::handler::PrimitiveMode;
use crate::registry::{default_registry, CellRegistry};

/// Result of analyzing a run of cells for one renderable batch.
///
/// Never persisted; recomputed per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellConstruction {
    /// Total output vertices required for the run.
    pub buffer_size: u32,
    /// Primitive mode of the run, or `None` when no cell was consumed.
    pub mode: Option<PrimitiveMode>,
    /// Number of cells consumed before stopping.
    pub nb_cells: u32,
    /// Topology words consumed; advance the topology slice by this much for
    /// the follow-up call.
    pub next: u32,
    /// True when the run stopped on a malformed or unregistered cell.
    pub error: bool,
}

impl CellConstruction {
    fn stopped(self, error: bool) -> Self {
        Self { error, ..self }
    }
}

/// Analyzes up to `nb_cells` cells against the built-in registry.
///
/// Stops with `error = true` on an unregistered type code, an arity
/// mismatch between a topology record and its handler, or a truncated
/// array; stops *without* error when the primitive mode established by the
/// run's first cell diverges (the diverging cell is not consumed). The
/// partial accumulation is returned in every case.
pub fn cell_construction_descriptor(
    nb_cells: u32,
    topology: &[i32],
    cell_types: &[i32],
) -> CellConstruction {
    cell_construction_descriptor_with(default_registry(), nb_cells, topology, cell_types)
}

/// [`cell_construction_descriptor`] against a caller-supplied registry.
pub fn cell_construction_descriptor_with(
    registry: &CellRegistry,
    nb_cells: u32,
    topology: &[i32],
    cell_types: &[i32],
) -> CellConstruction {
    let mut acc = CellConstruction {
        buffer_size: 0,
        mode: None,
        nb_cells: 0,
        next: 0,
        error: false,
    };

    for i in 0..nb_cells as usize {
        let Some(&code) = cell_types.get(i) else {
            return acc.stopped(true);
        };
        let Some(handler) = registry.handler(code) else {
            log::warn!("cell {i}: unregistered cell type {code}");
            return acc.stopped(true);
        };

        match acc.mode {
            None => acc.mode = Some(handler.mode()),
            Some(mode) if mode != handler.mode() => return acc, // homogeneous run ends here
            Some(_) => {}
        }

        let word = acc.next as usize;
        let Some(&declared) = topology.get(word) else {
            return acc.stopped(true);
        };
        if declared < 0 {
            return acc.stopped(true);
        }
        if let Some(expected) = handler.point_count() {
            if declared as u32 != expected {
                log::warn!("cell {i}: topology declares {declared} points, handler expects {expected}");
                return acc.stopped(true);
            }
        }
        let Some(record) = topology.get(word + 1..word + 1 + declared as usize) else {
            return acc.stopped(true);
        };

        acc.buffer_size += handler.buffer_size(record);
        acc.nb_cells += 1;
        acc.next += 1 + declared as u32;
    }

    acc
}

/// Writes the decomposed coordinates of `nb_cells` cells into `dest`.
///
/// Each cell contributes `buffer_size * 3` components of `dest_format`
/// (defaulting to the point array's own format) at the running byte
/// offset. An unregistered cell type or malformed record aborts the whole
/// fill silently; bytes already written stay as they are.
pub fn fill_unstructured_grid_cell_buffer(
    nb_cells: u32,
    points: &ValueArray,
    topology: &[i32],
    cell_types: &[i32],
    dest: &mut [u8],
    dest_format: Option<ValueFormat>,
) {
    fill_unstructured_grid_cell_buffer_with(
        default_registry(),
        nb_cells,
        points,
        topology,
        cell_types,
        dest,
        dest_format,
    );
}

/// [`fill_unstructured_grid_cell_buffer`] against a caller-supplied registry.
pub fn fill_unstructured_grid_cell_buffer_with(
    registry: &CellRegistry,
    nb_cells: u32,
    points: &ValueArray,
    topology: &[i32],
    cell_types: &[i32],
    dest: &mut [u8],
    dest_format: Option<ValueFormat>,
) {
    let format = dest_format.unwrap_or_else(|| points.format());
    let comp_size = format.size();
    let mut word = 0usize;
    let mut offset = 0usize;

    for i in 0..nb_cells as usize {
        let Some((handler, record)) = resolve_cell(registry, topology, cell_types, i, word) else {
            return;
        };
        let bytes = handler.buffer_size(record) as usize * 3 * comp_size;
        let Some(chunk) = dest.get_mut(offset..offset + bytes) else {
            log::warn!("cell {i}: vertex buffer too small, aborting fill");
            return;
        };
        handler.fill_vertex_buffer(points, record, chunk, format);
        offset += bytes;
        word += 1 + record.len();
    }
}

/// Writes the decomposed point indices of `nb_cells` cells into `dest`.
///
/// Each cell contributes `buffer_size` indices at the running offset; the
/// same silent-abort contract as the vertex fill applies.
pub fn fill_unstructured_grid_cell_element_buffer(
    nb_cells: u32,
    topology: &[i32],
    cell_types: &[i32],
    dest: &mut [i32],
) {
    fill_unstructured_grid_cell_element_buffer_with(
        default_registry(),
        nb_cells,
        topology,
        cell_types,
        dest,
    );
}

/// [`fill_unstructured_grid_cell_element_buffer`] against a caller-supplied
/// registry.
pub fn fill_unstructured_grid_cell_element_buffer_with(
    registry: &CellRegistry,
    nb_cells: u32,
    topology: &[i32],
    cell_types: &[i32],
    dest: &mut [i32],
) {
    let mut word = 0usize;
    let mut offset = 0usize;

    for i in 0..nb_cells as usize {
        let Some((handler, record)) = resolve_cell(registry, topology, cell_types, i, word) else {
            return;
        };
        let entries = handler.buffer_size(record) as usize;
        let Some(chunk) = dest.get_mut(offset..offset + entries) else {
            log::warn!("cell {i}: element buffer too small, aborting fill");
            return;
        };
        handler.fill_index_buffer(record, chunk);
        offset += entries;
        word += 1 + record.len();
    }
}

/// Resolves cell `i`'s handler and topology record, or `None` to abort.
fn resolve_cell<'a>(
    registry: &'a CellRegistry,
    topology: &'a [i32],
    cell_types: &[i32],
    i: usize,
    word: usize,
) -> Option<(&'a dyn crate::handler::CellHandler, &'a [i32])> {
    let &code = cell_types.get(i)?;
    let Some(handler) = registry.handler(code) else {
        log::warn!("cell {i}: unregistered cell type {code}, aborting fill");
        return None;
    };
    let &declared = topology.get(word)?;
    if declared < 0 {
        log::warn!("cell {i}: negative point count in topology record");
        return None;
    }
    let record = topology.get(word + 1..word + 1 + declared as usize)?;
    Some((handler, record))
}
