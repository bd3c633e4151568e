//! The parser object: exclusive owner of the open file, one-shot scanner,
//! and on-demand bulk materializer.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ReadBytesExt};

use vtkscan_core::{
    CellTypes, CellsTopology, Dataset, DatasetKind, FieldValue, PointPositions, Result,
    StructuredPoints, UnstructuredGrid, ValueArray, ValueFormat, VtkError,
};

use crate::scan;

/// A lazily scanned legacy VTK file.
///
/// `open` + [`parse`](VtkParser::parse) populate the structural
/// [`Dataset`]; bulk payloads stay on disk until one of the `read_*`
/// methods materializes them. The parser exclusively owns the file handle
/// for its lifetime and releases it exactly once, on
/// [`close`](VtkParser::close) or drop.
///
/// Materialization moves the shared file cursor, so it takes `&mut self`;
/// callers that need parallel reads open independent parsers on the same
/// path.
#[derive(Debug)]
pub struct VtkParser {
    path: PathBuf,
    reader: Option<BufReader<File>>,
    dataset: Option<Dataset>,
}

impl VtkParser {
    /// Opens `path` without reading anything yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        log::debug!("opened VTK file {}", path.display());
        Ok(Self {
            path,
            reader: Some(BufReader::new(file)),
            dataset: None,
        })
    }

    /// Scans the file structure in a single pass.
    ///
    /// On success every descriptor is populated; on failure no dataset is
    /// retained and materialization methods keep failing.
    pub fn parse(&mut self) -> Result<()> {
        self.dataset = None;
        let reader = reader_mut(&mut self.reader)?;
        let dataset = scan::scan(reader)?;
        log::debug!(
            "parsed {:?} dataset from {}",
            dataset.kind(),
            self.path.display()
        );
        self.dataset = Some(dataset);
        Ok(())
    }

    /// The parsed dataset, if `parse` has succeeded.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// The dataset kind tag, if parsed.
    pub fn dataset_kind(&self) -> Option<DatasetKind> {
        self.dataset.as_ref().map(Dataset::kind)
    }

    /// The structured-points body, if this file is one.
    pub fn structured_points_descriptor(&self) -> Option<StructuredPoints> {
        self.dataset.as_ref()?.structured_points().copied()
    }

    /// The unstructured-grid point coordinate descriptor.
    pub fn unstructured_grid_point_descriptor(&self) -> Option<PointPositions> {
        Some(self.dataset.as_ref()?.unstructured_grid()?.points)
    }

    /// The unstructured-grid cell topology descriptor.
    pub fn unstructured_grid_cell_descriptor(&self) -> Option<CellsTopology> {
        Some(self.dataset.as_ref()?.unstructured_grid()?.cells)
    }

    /// The unstructured-grid cell type descriptor.
    pub fn unstructured_grid_cell_types_descriptor(&self) -> Option<CellTypes> {
        Some(self.dataset.as_ref()?.unstructured_grid()?.cell_types)
    }

    /// Names of the point-data field arrays, in first-seen order.
    pub fn point_field_value_names(&self) -> Vec<String> {
        field_names(self.dataset.as_ref().and_then(|d| d.point_data.as_ref()))
    }

    /// Descriptors of the point-data field arrays, in first-seen order.
    pub fn point_field_value_descriptors(&self) -> Vec<FieldValue> {
        field_descriptors(self.dataset.as_ref().and_then(|d| d.point_data.as_ref()))
    }

    /// Names of the cell-data field arrays, in first-seen order.
    pub fn cell_field_value_names(&self) -> Vec<String> {
        field_names(self.dataset.as_ref().and_then(|d| d.cell_data.as_ref()))
    }

    /// Descriptors of the cell-data field arrays, in first-seen order.
    pub fn cell_field_value_descriptors(&self) -> Vec<FieldValue> {
        field_descriptors(self.dataset.as_ref().and_then(|d| d.cell_data.as_ref()))
    }

    /// Materializes `count` big-endian values of `format` starting at byte
    /// `offset` into a freshly owned, native-layout buffer.
    ///
    /// This is the only code path that copies payload bytes out of the
    /// file; it is always explicit and on-demand, and every call re-reads
    /// from disk.
    pub fn read_values(
        &mut self,
        offset: u64,
        count: usize,
        format: ValueFormat,
    ) -> Result<ValueArray> {
        let reader = reader_mut(&mut self.reader)?;
        reader.seek(SeekFrom::Start(offset))?;
        let values = match format {
            ValueFormat::Int => ValueArray::Int(read_i32s(reader, count)?),
            ValueFormat::Float => {
                let mut buf = vec![0f32; count];
                reader.read_f32_into::<BigEndian>(&mut buf)?;
                ValueArray::Float(buf)
            }
            ValueFormat::Double => {
                let mut buf = vec![0f64; count];
                reader.read_f64_into::<BigEndian>(&mut buf)?;
                ValueArray::Double(buf)
            }
            ValueFormat::UnsignedChar => {
                let mut buf = vec![0u8; count];
                reader.read_exact(&mut buf)?;
                ValueArray::UnsignedChar(buf)
            }
            ValueFormat::Char => {
                let mut buf = vec![0i8; count];
                reader.read_i8_into(&mut buf)?;
                ValueArray::Char(buf)
            }
        };
        Ok(values)
    }

    /// Materializes all point coordinates as one flat array of
    /// `nb_points * 3` components.
    pub fn read_unstructured_grid_points(&mut self) -> Result<ValueArray> {
        let points = self.require_unstructured_grid()?.points;
        self.read_values(points.offset, points.nb_points as usize * 3, points.format)
    }

    /// Materializes the full CELLS topology word array.
    pub fn read_unstructured_grid_cell_composition(&mut self) -> Result<Vec<i32>> {
        let cells = self.require_unstructured_grid()?.cells;
        let reader = reader_mut(&mut self.reader)?;
        reader.seek(SeekFrom::Start(cells.offset))?;
        read_i32s(reader, cells.whole_size as usize)
    }

    /// Materializes the full CELL_TYPES code array.
    pub fn read_unstructured_grid_cell_types(&mut self) -> Result<Vec<i32>> {
        let cell_types = self.require_unstructured_grid()?.cell_types;
        let reader = reader_mut(&mut self.reader)?;
        reader.seek(SeekFrom::Start(cell_types.offset))?;
        read_i32s(reader, cell_types.nb_cells as usize)
    }

    /// Materializes the raw values of one field array descriptor.
    pub fn read_field_values(&mut self, value: &FieldValue) -> Result<ValueArray> {
        self.read_values(value.offset, value.nb_values() as usize, value.format)
    }

    /// Releases the file handle. Idempotent; materialization afterwards
    /// fails with an I/O error.
    pub fn close(&mut self) {
        if self.reader.take().is_some() {
            log::debug!("closed VTK file {}", self.path.display());
        }
    }

    fn require_unstructured_grid(&self) -> Result<UnstructuredGrid> {
        self.dataset
            .as_ref()
            .ok_or_else(|| VtkError::DatasetUnavailable("no dataset parsed yet".into()))?
            .unstructured_grid()
            .copied()
            .ok_or_else(|| {
                VtkError::DatasetUnavailable("dataset is not an unstructured grid".into())
            })
    }
}

fn reader_mut(reader: &mut Option<BufReader<File>>) -> Result<&mut BufReader<File>> {
    reader.as_mut().ok_or_else(|| {
        VtkError::Io(io::Error::new(io::ErrorKind::Other, "file handle closed"))
    })
}

fn read_i32s<R: Read>(reader: &mut R, count: usize) -> Result<Vec<i32>> {
    let mut buf = vec![0i32; count];
    reader.read_i32_into::<BigEndian>(&mut buf)?;
    Ok(buf)
}

fn field_names(section: Option<&vtkscan_core::AttributeSection>) -> Vec<String> {
    section
        .map(|s| s.field_values().map(|v| v.name.clone()).collect())
        .unwrap_or_default()
}

fn field_descriptors(section: Option<&vtkscan_core::AttributeSection>) -> Vec<FieldValue> {
    section
        .map(|s| s.field_values().cloned().collect())
        .unwrap_or_default()
}
