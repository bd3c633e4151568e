//! The structural scanner: a single-pass, line-oriented walk of a legacy
//! VTK file that records byte offsets and element counts while seeking
//! past every binary payload.
//!
//! Header lines are `\n`-terminated ASCII interleaved with raw big-endian
//! payload blocks; the scanner never copies payload bytes. All line
//! grammars live in process-wide compiled tables, built once.

use std::io::{BufRead, Seek, SeekFrom};

use once_cell::sync::Lazy;
use regex::Regex;

use vtkscan_core::{
    AttributeSection, CellTypes, CellsTopology, Dataset, DatasetBody, DVec3, FieldBlock,
    FieldValue, PointPositions, Result, StructuredPoints, UVec3, UnstructuredGrid, ValueFormat,
    VtkError,
};

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^# vtk DataFile Version (\d+)\.(\d+)\s*$").expect("version regex"));
static DATASET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^DATASET (\w+)\s*$").expect("dataset regex"));
static POINTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^POINTS (\d+) (\w+)\s*$").expect("points regex"));
static CELLS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^CELLS (\d+) (\d+)\s*$").expect("cells regex"));
static CELL_TYPES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^CELL_TYPES (\d+)\s*$").expect("cell types regex"));
static POINT_DATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^POINT_DATA (\d+)\s*$").expect("point data regex"));
static CELL_DATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^CELL_DATA (\d+)\s*$").expect("cell data regex"));
static FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^FIELD (\w+) (\d+)\s*$").expect("field regex"));
static FIELD_VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+) (\d+) (\d+) (\w+)\s*$").expect("field value regex"));
static INFORMATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^INFORMATION (\d+)\s*$").expect("information regex"));
static NAME_LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^NAME ([A-Za-z_0-9]+) LOCATION ([A-Za-z_0-9]+)\s*$").expect("name regex")
});
static DATA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^DATA (\d+)((?: [+-]?\d*\.?\d+(?:[eE][+-]?\d+)?)*)\s*$").expect("data regex")
});
static DIMENSIONS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^DIMENSIONS (\d+) (\d+) (\d+)\s*$").expect("dimensions regex"));
static SPACING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^SPACING (\S+) (\S+) (\S+)\s*$").expect("spacing regex"));
static ORIGIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ORIGIN (\S+) (\S+) (\S+)\s*$").expect("origin regex"));

/// Scans `reader` from the start and returns the populated dataset.
///
/// Fails fast on the first malformed token; no partial state escapes.
pub(crate) fn scan<R: BufRead + Seek>(reader: &mut R) -> Result<Dataset> {
    reader.seek(SeekFrom::Start(0))?;

    // Line 1: version
    let line = read_line(reader)?
        .ok_or_else(|| VtkError::MalformedHeader("empty file".into()))?;
    let caps = VERSION_RE
        .captures(&line)
        .ok_or_else(|| VtkError::MalformedHeader(format!("bad version line: {line:?}")))?;
    let version = (parse_u32(&caps[1], "major version")?, parse_u32(&caps[2], "minor version")?);

    // Line 2: free-text header, stored verbatim
    let header = read_line(reader)?
        .ok_or_else(|| VtkError::MalformedHeader("missing header line".into()))?;

    // Line 3: file format
    let line = read_line(reader)?
        .ok_or_else(|| VtkError::MalformedHeader("missing file format line".into()))?;
    match line.trim_end() {
        "BINARY" => {}
        "ASCII" => {
            return Err(VtkError::UnsupportedFormat(
                "ASCII files are not handled, only BINARY".into(),
            ))
        }
        other => {
            return Err(VtkError::MalformedHeader(format!(
                "bad file format line: {other:?}"
            )))
        }
    }

    // Line 4: dataset structure
    let line = require_line(reader)?;
    let caps = DATASET_RE
        .captures(&line)
        .ok_or_else(|| VtkError::MalformedHeader(format!("expected DATASET line, got {line:?}")))?;
    let body = match &caps[1] {
        "UNSTRUCTURED_GRID" => DatasetBody::UnstructuredGrid(scan_unstructured_grid(reader)?),
        "STRUCTURED_POINTS" => DatasetBody::StructuredPoints(scan_structured_points(reader)?),
        "STRUCTURED_GRID" => {
            return Err(VtkError::UnsupportedFormat(
                "STRUCTURED_GRID body parsing is not implemented".into(),
            ))
        }
        other => {
            return Err(VtkError::MalformedHeader(format!(
                "unknown dataset structure {other}"
            )))
        }
    };

    // Trailing attribute sections: at most one of each, in either order.
    let mut point_data: Option<AttributeSection> = None;
    let mut cell_data: Option<AttributeSection> = None;
    while let Some(line) = read_line(reader)? {
        if let Some(caps) = POINT_DATA_RE.captures(&line) {
            if point_data.is_some() {
                return Err(VtkError::UnexpectedToken("duplicate POINT_DATA section".into()));
            }
            let n = parse_u32(&caps[1], "POINT_DATA count")?;
            point_data = Some(scan_attribute_section(reader, n)?);
        } else if let Some(caps) = CELL_DATA_RE.captures(&line) {
            if cell_data.is_some() {
                return Err(VtkError::UnexpectedToken("duplicate CELL_DATA section".into()));
            }
            let n = parse_u32(&caps[1], "CELL_DATA count")?;
            cell_data = Some(scan_attribute_section(reader, n)?);
        } else {
            return Err(VtkError::UnexpectedToken(format!(
                "expected POINT_DATA or CELL_DATA, got {line:?}"
            )));
        }
    }

    Ok(Dataset {
        version,
        header,
        body,
        point_data,
        cell_data,
    })
}

/// UNSTRUCTURED_GRID body: POINTS, CELLS, CELL_TYPES — any order, each
/// exactly once. Records each block's descriptor and seeks past its
/// payload.
fn scan_unstructured_grid<R: BufRead + Seek>(reader: &mut R) -> Result<UnstructuredGrid> {
    let mut points: Option<PointPositions> = None;
    let mut cells: Option<CellsTopology> = None;
    let mut cell_types: Option<CellTypes> = None;

    while points.is_none() || cells.is_none() || cell_types.is_none() {
        let line = require_line(reader)?;
        if let Some(caps) = POINTS_RE.captures(&line) {
            if points.is_some() {
                return Err(VtkError::UnexpectedToken("duplicate POINTS block".into()));
            }
            let nb_points = parse_u32(&caps[1], "point count")?;
            let format = ValueFormat::from_name(&caps[2]).ok_or_else(|| {
                VtkError::UnsupportedFormat(format!("unknown point type name '{}'", &caps[2]))
            })?;
            let offset = reader.stream_position()?;
            skip_payload(reader, u64::from(nb_points) * 3 * format.size() as u64)?;
            consume_block_terminator(reader)?;
            consume_optional_metadata(reader)?;
            points = Some(PointPositions {
                nb_points,
                format,
                offset,
            });
        } else if let Some(caps) = CELLS_RE.captures(&line) {
            if cells.is_some() {
                return Err(VtkError::UnexpectedToken("duplicate CELLS block".into()));
            }
            let nb_cells = parse_u32(&caps[1], "cell count")?;
            let whole_size = parse_u32(&caps[2], "cell word count")?;
            let offset = reader.stream_position()?;
            skip_payload(reader, u64::from(whole_size) * 4)?;
            consume_block_terminator(reader)?;
            consume_optional_metadata(reader)?;
            cells = Some(CellsTopology {
                nb_cells,
                whole_size,
                offset,
            });
        } else if let Some(caps) = CELL_TYPES_RE.captures(&line) {
            if cell_types.is_some() {
                return Err(VtkError::UnexpectedToken("duplicate CELL_TYPES block".into()));
            }
            let nb_cells = parse_u32(&caps[1], "cell type count")?;
            let offset = reader.stream_position()?;
            skip_payload(reader, u64::from(nb_cells) * 4)?;
            consume_block_terminator(reader)?;
            consume_optional_metadata(reader)?;
            cell_types = Some(CellTypes { nb_cells, offset });
        } else {
            return Err(VtkError::UnexpectedToken(format!(
                "unexpected token in UNSTRUCTURED_GRID body: {line:?}"
            )));
        }
    }

    // The loop condition guarantees all three blocks are present.
    Ok(UnstructuredGrid {
        points: points.ok_or_else(|| VtkError::UnexpectedToken("missing POINTS block".into()))?,
        cells: cells.ok_or_else(|| VtkError::UnexpectedToken("missing CELLS block".into()))?,
        cell_types: cell_types
            .ok_or_else(|| VtkError::UnexpectedToken("missing CELL_TYPES block".into()))?,
    })
}

/// STRUCTURED_POINTS body: DIMENSIONS, SPACING, ORIGIN — any order, each
/// exactly once, decoded immediately (no deferred payload).
fn scan_structured_points<R: BufRead + Seek>(reader: &mut R) -> Result<StructuredPoints> {
    let mut dimensions: Option<UVec3> = None;
    let mut spacing: Option<DVec3> = None;
    let mut origin: Option<DVec3> = None;

    while dimensions.is_none() || spacing.is_none() || origin.is_none() {
        let line = require_line(reader)?;
        if let Some(caps) = DIMENSIONS_RE.captures(&line) {
            if dimensions.is_some() {
                return Err(VtkError::UnexpectedToken("duplicate DIMENSIONS line".into()));
            }
            dimensions = Some(UVec3::new(
                parse_u32(&caps[1], "dimension")?,
                parse_u32(&caps[2], "dimension")?,
                parse_u32(&caps[3], "dimension")?,
            ));
        } else if let Some(caps) = SPACING_RE.captures(&line) {
            if spacing.is_some() {
                return Err(VtkError::UnexpectedToken("duplicate SPACING line".into()));
            }
            spacing = Some(parse_dvec3(&caps)?);
        } else if let Some(caps) = ORIGIN_RE.captures(&line) {
            if origin.is_some() {
                return Err(VtkError::UnexpectedToken("duplicate ORIGIN line".into()));
            }
            origin = Some(parse_dvec3(&caps)?);
        } else {
            return Err(VtkError::UnexpectedToken(format!(
                "unexpected token in STRUCTURED_POINTS body: {line:?}"
            )));
        }
        consume_optional_metadata(reader)?;
    }

    Ok(StructuredPoints {
        dimensions: dimensions
            .ok_or_else(|| VtkError::UnexpectedToken("missing DIMENSIONS line".into()))?,
        spacing: spacing.ok_or_else(|| VtkError::UnexpectedToken("missing SPACING line".into()))?,
        origin: origin.ok_or_else(|| VtkError::UnexpectedToken("missing ORIGIN line".into()))?,
    })
}

/// One POINT_DATA/CELL_DATA section: consumes FIELD blocks until the first
/// line that is not a FIELD line, which is rewound for the caller.
fn scan_attribute_section<R: BufRead + Seek>(
    reader: &mut R,
    declared_count: u32,
) -> Result<AttributeSection> {
    let mut blocks = Vec::new();

    loop {
        let pos = reader.stream_position()?;
        let Some(line) = read_line(reader)? else {
            break;
        };
        let Some(caps) = FIELD_RE.captures(&line) else {
            // Not ours: rewind so the main loop can reinterpret it.
            reader.seek(SeekFrom::Start(pos))?;
            break;
        };
        let block_name = caps[1].to_string();
        let nb_arrays = parse_u32(&caps[2], "field array count")?;

        let mut values = Vec::with_capacity(nb_arrays as usize);
        for _ in 0..nb_arrays {
            let line = require_line(reader)?;
            let caps = FIELD_VALUE_RE.captures(&line).ok_or_else(|| {
                VtkError::UnexpectedToken(format!("malformed field array line: {line:?}"))
            })?;
            let name = caps[1].to_string();
            let nb_values_per_tuple = parse_u32(&caps[2], "values per tuple")?;
            let nb_tuples = parse_u32(&caps[3], "tuple count")?;
            let format = ValueFormat::from_name(&caps[4]).ok_or_else(|| {
                VtkError::UnsupportedFormat(format!("unknown field type name '{}'", &caps[4]))
            })?;
            let offset = reader.stream_position()?;

            skip_payload(
                reader,
                u64::from(nb_tuples) * u64::from(nb_values_per_tuple) * format.size() as u64,
            )?;
            consume_payload_newline(reader)?;
            consume_optional_metadata(reader)?;

            log::debug!(
                "found field array '{name}' ({nb_tuples} x {nb_values_per_tuple} {})",
                format.name()
            );
            values.push(FieldValue {
                name,
                format,
                nb_tuples,
                nb_values_per_tuple,
                offset,
            });
        }
        blocks.push(FieldBlock {
            name: block_name,
            values,
        });
    }

    Ok(AttributeSection {
        declared_count,
        blocks,
    })
}

/// METADATA block: validated line by line, content discarded, terminated
/// by a blank line.
fn scan_metadata<R: BufRead + Seek>(reader: &mut R) -> Result<()> {
    loop {
        let line = read_line(reader)?.ok_or_else(|| {
            VtkError::UnexpectedToken("unexpected end of file in METADATA block".into())
        })?;
        if line.is_empty() {
            return Ok(());
        }
        if !INFORMATION_RE.is_match(&line)
            && !NAME_LOCATION_RE.is_match(&line)
            && !DATA_RE.is_match(&line)
        {
            return Err(VtkError::UnexpectedToken(format!(
                "unexpected token in METADATA block: {line:?}"
            )));
        }
    }
}

/// Consumes a `METADATA` line and its block if one follows; otherwise
/// rewinds.
fn consume_optional_metadata<R: BufRead + Seek>(reader: &mut R) -> Result<()> {
    let pos = reader.stream_position()?;
    match read_line(reader)? {
        Some(line) if line == "METADATA" => scan_metadata(reader),
        Some(_) => {
            reader.seek(SeekFrom::Start(pos))?;
            Ok(())
        }
        None => Ok(()),
    }
}

/// After a dataset block payload: the separating newline (an empty line).
/// EOF is tolerated so a file may end right after its last payload.
fn consume_block_terminator<R: BufRead + Seek>(reader: &mut R) -> Result<()> {
    match read_line(reader)? {
        None => Ok(()),
        Some(line) if line.is_empty() => Ok(()),
        Some(line) => Err(VtkError::UnexpectedToken(format!(
            "expected end of payload, got {line:?}"
        ))),
    }
}

/// After a field array payload: exactly one `\n`, tolerating payloads that
/// are not newline-terminated by rewinding the byte just read.
fn consume_payload_newline<R: BufRead + Seek>(reader: &mut R) -> Result<()> {
    let mut byte = [0u8; 1];
    match reader.read(&mut byte)? {
        0 => Ok(()),
        _ if byte[0] == b'\n' => Ok(()),
        _ => {
            reader.seek(SeekFrom::Current(-1))?;
            Ok(())
        }
    }
}

/// Seeks past a binary payload without reading it.
fn skip_payload<R: Seek>(reader: &mut R, len: u64) -> Result<()> {
    reader.seek(SeekFrom::Current(len as i64))?;
    Ok(())
}

/// Reads one `\n`-terminated line with the terminator (and any `\r`)
/// stripped, or `None` at end of file.
fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    String::from_utf8(buf)
        .map(Some)
        .map_err(|_| VtkError::UnexpectedToken("non-UTF-8 header line".into()))
}

/// Reads one line, treating end of file as a scan failure.
fn require_line<R: BufRead>(reader: &mut R) -> Result<String> {
    read_line(reader)?
        .ok_or_else(|| VtkError::UnexpectedToken("unexpected end of file".into()))
}

fn parse_u32(s: &str, what: &str) -> Result<u32> {
    s.parse()
        .map_err(|_| VtkError::UnexpectedToken(format!("{what} out of range: {s}")))
}

/// Locale-independent floating parse of three captured components.
fn parse_dvec3(caps: &regex::Captures<'_>) -> Result<DVec3> {
    let mut parts = [0.0f64; 3];
    for (i, part) in parts.iter_mut().enumerate() {
        *part = caps[i + 1]
            .parse()
            .map_err(|_| VtkError::UnexpectedToken(format!("bad float: {}", &caps[i + 1])))?;
    }
    Ok(DVec3::from_array(parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn cursor(bytes: &[u8]) -> Cursor<Vec<u8>> {
        Cursor::new(bytes.to_vec())
    }

    fn minimal_grid() -> Vec<u8> {
        let mut file = Vec::new();
        file.extend_from_slice(b"# vtk DataFile Version 3.0\n");
        file.extend_from_slice(b"minted for tests\n");
        file.extend_from_slice(b"BINARY\n");
        file.extend_from_slice(b"DATASET UNSTRUCTURED_GRID\n");
        file.extend_from_slice(b"POINTS 1 float\n");
        file.extend_from_slice(&[0u8; 12]);
        file.extend_from_slice(b"\n");
        file.extend_from_slice(b"CELLS 0 0\n");
        file.extend_from_slice(b"\n");
        file.extend_from_slice(b"CELL_TYPES 0\n");
        file
    }

    #[test]
    fn test_minimal_unstructured_grid() {
        let bytes = minimal_grid();
        let dataset = scan(&mut cursor(&bytes)).unwrap();

        assert_eq!(dataset.version, (3, 0));
        assert_eq!(dataset.header, "minted for tests");
        let grid = dataset.unstructured_grid().unwrap();
        assert_eq!(grid.points.nb_points, 1);
        assert_eq!(grid.points.format, ValueFormat::Float);
        assert_eq!(grid.cells.nb_cells, 0);
        assert_eq!(grid.cell_types.nb_cells, 0);
        assert!(dataset.point_data.is_none());
        assert!(dataset.cell_data.is_none());

        // the recorded payload fits inside the file
        let end = grid.points.offset + u64::from(grid.points.nb_points) * 3 * 4;
        assert!(end <= bytes.len() as u64);
    }

    #[test]
    fn test_ascii_is_rejected() {
        let bytes = b"# vtk DataFile Version 2.0\nheader\nASCII\nDATASET UNSTRUCTURED_GRID\n";
        let err = scan(&mut cursor(bytes)).unwrap_err();
        assert!(matches!(err, VtkError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_bad_version_line_is_rejected() {
        let bytes = b"# vtk DataFile 3.0\nheader\nBINARY\n";
        let err = scan(&mut cursor(bytes)).unwrap_err();
        assert!(matches!(err, VtkError::MalformedHeader(_)));
    }

    #[test]
    fn test_structured_grid_is_recognized_but_unsupported() {
        let bytes = b"# vtk DataFile Version 3.0\nheader\nBINARY\nDATASET STRUCTURED_GRID\n";
        let err = scan(&mut cursor(bytes)).unwrap_err();
        assert!(matches!(err, VtkError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_structured_points_decodes_in_any_order() {
        let bytes = b"# vtk DataFile Version 4.2\nvol\nBINARY\nDATASET STRUCTURED_POINTS\n\
SPACING 0.5 0.5 2.0\nDIMENSIONS 2 3 4\nORIGIN -1.0 0 1.5\n";
        let dataset = scan(&mut cursor(bytes)).unwrap();

        let sp = dataset.structured_points().unwrap();
        assert_eq!(sp.dimensions, UVec3::new(2, 3, 4));
        assert_eq!(sp.spacing, DVec3::new(0.5, 0.5, 2.0));
        assert_eq!(sp.origin, DVec3::new(-1.0, 0.0, 1.5));
    }

    #[test]
    fn test_field_scanning_rewinds_foreign_line() {
        let mut file = minimal_grid();
        file.extend_from_slice(b"\nPOINT_DATA 1\nFIELD FieldData 1\n");
        file.extend_from_slice(b"pressure 1 1 double\n");
        file.extend_from_slice(&1.0f64.to_be_bytes());
        file.extend_from_slice(b"\n");
        file.extend_from_slice(b"CELL_DATA 0\n");

        let dataset = scan(&mut cursor(&file)).unwrap();
        let section = dataset.point_data.unwrap();
        let names: Vec<_> = section.field_values().map(|v| v.name.clone()).collect();
        assert_eq!(names, ["pressure"]);
        assert!(dataset.cell_data.is_some());
    }

    #[test]
    fn test_duplicate_point_data_is_rejected() {
        let mut file = minimal_grid();
        file.extend_from_slice(b"\nPOINT_DATA 1\nPOINT_DATA 1\n");
        let err = scan(&mut cursor(&file)).unwrap_err();
        assert!(matches!(err, VtkError::UnexpectedToken(_)));
    }

    #[test]
    fn test_metadata_blocks_are_consumed() {
        let mut file = Vec::new();
        file.extend_from_slice(b"# vtk DataFile Version 3.0\nh\nBINARY\n");
        file.extend_from_slice(b"DATASET UNSTRUCTURED_GRID\n");
        file.extend_from_slice(b"POINTS 1 float\n");
        file.extend_from_slice(&[0u8; 12]);
        file.extend_from_slice(b"\nMETADATA\nINFORMATION 2\n");
        file.extend_from_slice(b"NAME L2_NORM_RANGE LOCATION vtkDataArray\n");
        file.extend_from_slice(b"DATA 2 0 5.5\n\n");
        file.extend_from_slice(b"CELLS 0 0\n\nCELL_TYPES 0\n");

        assert!(scan(&mut cursor(&file)).is_ok());
    }

    #[test]
    fn test_unknown_metadata_line_is_rejected() {
        let mut file = Vec::new();
        file.extend_from_slice(b"# vtk DataFile Version 3.0\nh\nBINARY\n");
        file.extend_from_slice(b"DATASET UNSTRUCTURED_GRID\n");
        file.extend_from_slice(b"POINTS 1 float\n");
        file.extend_from_slice(&[0u8; 12]);
        file.extend_from_slice(b"\nMETADATA\nCOLOR blue\n\n");
        file.extend_from_slice(b"CELLS 0 0\n\nCELL_TYPES 0\n");

        let err = scan(&mut cursor(&file)).unwrap_err();
        assert!(matches!(err, VtkError::UnexpectedToken(_)));
    }

    #[test]
    fn test_unknown_point_format_is_rejected() {
        let bytes = b"# vtk DataFile Version 3.0\nh\nBINARY\nDATASET UNSTRUCTURED_GRID\n\
POINTS 1 vtkIdType\n";
        let err = scan(&mut cursor(bytes)).unwrap_err();
        assert!(matches!(err, VtkError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_unterminated_field_payload_at_eof() {
        let mut file = minimal_grid();
        file.extend_from_slice(b"\nCELL_DATA 1\nFIELD FieldData 1\n");
        file.extend_from_slice(b"mask 1 2 unsigned_char\n");
        file.extend_from_slice(&[1u8, 0]); // payload, no trailing newline

        let dataset = scan(&mut cursor(&file)).unwrap();
        let section = dataset.cell_data.unwrap();
        let value = section.field_values().next().unwrap();
        assert_eq!(value.format, ValueFormat::UnsignedChar);
        assert_eq!(value.nb_tuples, 2);
        assert_eq!(value.nb_values_per_tuple, 1);
    }
}
