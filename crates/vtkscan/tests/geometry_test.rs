//! Renderer-shaped pipeline tests: parse, materialize, then build vertex
//! and index buffers from wedge topology.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use tempfile::NamedTempFile;

use vtkscan::{
    cell_construction_descriptor, fill_unstructured_grid_cell_buffer,
    fill_unstructured_grid_cell_element_buffer, PrimitiveMode, ValueFormat, VtkParser,
};

/// Two wedges sharing their quad face: 8 points, 2 topology records.
fn two_wedge_file() -> Vec<u8> {
    let coords: Vec<f32> = (0..8)
        .flat_map(|i| [i as f32, 100.0 + i as f32, 200.0 + i as f32])
        .collect();
    let topology = [6, 0, 1, 2, 3, 4, 5, 6, 1, 6, 2, 4, 7, 5];

    let mut file = Vec::new();
    file.extend_from_slice(b"# vtk DataFile Version 3.0\n");
    file.extend_from_slice(b"two wedges\n");
    file.extend_from_slice(b"BINARY\n");
    file.extend_from_slice(b"DATASET UNSTRUCTURED_GRID\n");
    file.extend_from_slice(b"POINTS 8 float\n");
    for &c in &coords {
        file.write_f32::<BigEndian>(c).expect("encode");
    }
    file.extend_from_slice(b"\n");
    file.extend_from_slice(b"CELLS 2 14\n");
    for &w in &topology {
        file.write_i32::<BigEndian>(w).expect("encode");
    }
    file.extend_from_slice(b"\n");
    file.extend_from_slice(b"CELL_TYPES 2\n");
    file.write_i32::<BigEndian>(13).expect("encode");
    file.write_i32::<BigEndian>(13).expect("encode");
    file.extend_from_slice(b"\n");
    file
}

fn parse_two_wedges() -> (VtkParser, NamedTempFile) {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(&two_wedge_file()).expect("write");
    file.flush().expect("flush");
    let mut parser = VtkParser::open(file.path()).expect("open");
    parser.parse().expect("parse");
    (parser, file)
}

#[test]
fn test_construction_descriptor_covers_the_batch() {
    let (mut parser, _file) = parse_two_wedges();
    let topology = parser
        .read_unstructured_grid_cell_composition()
        .expect("topology");
    let cell_types = parser.read_unstructured_grid_cell_types().expect("types");

    let run = cell_construction_descriptor(2, &topology, &cell_types);
    assert!(!run.error);
    assert_eq!(run.nb_cells, 2);
    assert_eq!(run.mode, Some(PrimitiveMode::Triangles));
    assert_eq!(run.buffer_size, 2 * 24);
    assert_eq!(run.next, 14); // sum of (1 + 6) over both records
}

#[test]
fn test_element_buffer_draws_from_cell_points() {
    let (mut parser, _file) = parse_two_wedges();
    let topology = parser
        .read_unstructured_grid_cell_composition()
        .expect("topology");
    let cell_types = parser.read_unstructured_grid_cell_types().expect("types");

    let mut indices = vec![0i32; 2 * 24];
    fill_unstructured_grid_cell_element_buffer(2, &topology, &cell_types, &mut indices);

    // first wedge [0..6]: fixed triangulation order, front triangle first
    assert_eq!(&indices[..6], &[0, 1, 2, 3, 5, 4]);
    assert!(indices[..24].iter().all(|&i| (0..6).contains(&i)));
    // second wedge draws only from its own record
    assert!(indices[24..].iter().all(|&i| [1, 6, 2, 4, 7, 5].contains(&i)));
}

#[test]
fn test_vertex_buffer_matches_materialized_points() {
    let (mut parser, _file) = parse_two_wedges();
    let points = parser.read_unstructured_grid_points().expect("points");
    let topology = parser
        .read_unstructured_grid_cell_composition()
        .expect("topology");
    let cell_types = parser.read_unstructured_grid_cell_types().expect("types");

    let run = cell_construction_descriptor(2, &topology, &cell_types);
    let mut dest = vec![0u8; run.buffer_size as usize * 3 * 4];
    fill_unstructured_grid_cell_buffer(2, &points, &topology, &cell_types, &mut dest, None);

    let out: Vec<f32> = dest
        .chunks_exact(4)
        .map(|c| f32::from_ne_bytes(c.try_into().unwrap()))
        .collect();
    // slot 0 of the first wedge is point 0
    assert_eq!(&out[..3], &[0.0, 100.0, 200.0]);
    // slot 0 of the second wedge is point 1
    let second = 24 * 3;
    assert_eq!(&out[second..second + 3], &[1.0, 101.0, 201.0]);
}

#[test]
fn test_vertex_buffer_converts_to_requested_format() {
    let (mut parser, _file) = parse_two_wedges();
    let points = parser.read_unstructured_grid_points().expect("points");
    let topology = parser
        .read_unstructured_grid_cell_composition()
        .expect("topology");
    let cell_types = parser.read_unstructured_grid_cell_types().expect("types");

    let mut dest = vec![0u8; 2 * 24 * 3 * 8];
    fill_unstructured_grid_cell_buffer(
        2,
        &points,
        &topology,
        &cell_types,
        &mut dest,
        Some(ValueFormat::Double),
    );

    let first = f64::from_ne_bytes(dest[..8].try_into().unwrap());
    assert_eq!(first, 0.0);
    let y = f64::from_ne_bytes(dest[8..16].try_into().unwrap());
    assert_eq!(y, 100.0);
}
