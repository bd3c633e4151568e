//! Dumps the structural summary of a legacy VTK file and materializes its
//! payloads once, to demonstrate the descriptor/materialize split.
//!
//! Usage: `cargo run --example dump -- path/to/file.vtk`

use vtkscan::{DatasetKind, VtkParser};

fn main() -> vtkscan::Result<()> {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: dump <file.vtk>");
        std::process::exit(1);
    };

    let mut parser = VtkParser::open(&path)?;
    parser.parse()?;

    let dataset = parser.dataset().expect("parse succeeded");
    println!(
        "{}",
        serde_json::to_string_pretty(dataset).expect("dataset serializes")
    );

    if parser.dataset_kind() == Some(DatasetKind::UnstructuredGrid) {
        let points = parser.read_unstructured_grid_points()?;
        println!("materialized {} point components", points.len());
        let cell_types = parser.read_unstructured_grid_cell_types()?;
        println!("materialized {} cell types", cell_types.len());
    }

    for descriptor in parser.point_field_value_descriptors() {
        let values = parser.read_field_values(&descriptor)?;
        println!(
            "point field '{}': {} values ({} bytes)",
            descriptor.name,
            values.len(),
            values.byte_len()
        );
    }
    for descriptor in parser.cell_field_value_descriptors() {
        let values = parser.read_field_values(&descriptor)?;
        println!(
            "cell field '{}': {} values ({} bytes)",
            descriptor.name,
            values.len(),
            values.byte_len()
        );
    }

    parser.close();
    Ok(())
}
