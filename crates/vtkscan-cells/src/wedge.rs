//! The 6-point wedge prism handler (VTK cell type 13).

use vtkscan_core::{write_component, ValueArray, ValueFormat};

use crate::handler::{CellHandler, PrimitiveMode};

/// Output slots per wedge: 8 triangles of 3 vertices.
const WEDGE_VERTEX_COUNT: usize = 24;

/// Local wedge vertex for each of the 24 output slots.
///
/// Emission order: front triangle, back triangle, left quad (2 triangles),
/// right quad (2 triangles), bottom quad (2 triangles).
const WEDGE_TRIANGULATION: [usize; WEDGE_VERTEX_COUNT] = [
    0, 1, 2, // front
    3, 5, 4, // back
    3, 0, 2, 3, 2, 5, // left
    1, 4, 2, 4, 5, 2, // right
    3, 0, 1, 3, 1, 4, // bottom
];

/// The wedge prism: 6 defining points, decomposed into a 24-vertex
/// triangle list.
pub struct Wedge;

impl CellHandler for Wedge {
    fn point_count(&self) -> Option<u32> {
        Some(6)
    }

    fn mode(&self) -> PrimitiveMode {
        PrimitiveMode::Triangles
    }

    fn buffer_size(&self, _topology: &[i32]) -> u32 {
        WEDGE_VERTEX_COUNT as u32
    }

    fn fill_vertex_buffer(
        &self,
        points: &ValueArray,
        topology: &[i32],
        dest: &mut [u8],
        dest_format: ValueFormat,
    ) {
        let comp_size = dest_format.size();
        for (slot, &local) in WEDGE_TRIANGULATION.iter().enumerate() {
            let point = topology[local] as usize;
            for c in 0..3 {
                let value = points.component(point * 3 + c).unwrap_or_else(|| {
                    log::warn!("wedge references point {point} outside the coordinate array");
                    0.0
                });
                let at = (slot * 3 + c) * comp_size;
                write_component(&mut dest[at..at + comp_size], dest_format, value);
            }
        }
    }

    fn fill_index_buffer(&self, topology: &[i32], dest: &mut [i32]) {
        for (slot, &local) in WEDGE_TRIANGULATION.iter().enumerate() {
            dest[slot] = topology[local];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wedge_arity_and_mode() {
        assert_eq!(Wedge.point_count(), Some(6));
        assert_eq!(Wedge.mode(), PrimitiveMode::Triangles);
        assert_eq!(Wedge.buffer_size(&[0, 1, 2, 3, 4, 5]), 24);
    }

    #[test]
    fn test_index_buffer_follows_triangulation_order() {
        let topology = [10, 11, 12, 13, 14, 15];
        let mut dest = [0i32; 24];
        Wedge.fill_index_buffer(&topology, &mut dest);

        let expected: Vec<i32> = WEDGE_TRIANGULATION.iter().map(|&l| topology[l]).collect();
        assert_eq!(dest.to_vec(), expected);
        // front triangle, then back triangle
        assert_eq!(&dest[..6], &[10, 11, 12, 13, 15, 14]);
    }

    #[test]
    fn test_vertex_buffer_fetches_coordinates() {
        // 6 points, xyz each: point i sits at (i, 10+i, 20+i)
        let coords: Vec<f32> = (0..6)
            .flat_map(|i| [i as f32, 10.0 + i as f32, 20.0 + i as f32])
            .collect();
        let points = ValueArray::Float(coords);
        let topology = [0, 1, 2, 3, 4, 5];

        let mut dest = vec![0u8; 24 * 3 * 4];
        Wedge.fill_vertex_buffer(&points, &topology, &mut dest, ValueFormat::Float);

        let out: Vec<f32> = dest
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes(c.try_into().unwrap()))
            .collect();
        // slot 0 -> local vertex 0, slot 3 -> local vertex 3, slot 4 -> local vertex 5
        assert_eq!(&out[..3], &[0.0, 10.0, 20.0]);
        assert_eq!(&out[9..12], &[3.0, 13.0, 23.0]);
        assert_eq!(&out[12..15], &[5.0, 15.0, 25.0]);
    }

    #[test]
    fn test_vertex_buffer_converts_to_double() {
        let points = ValueArray::Float(vec![0.5; 18]);
        let topology = [0, 1, 2, 3, 4, 5];

        let mut dest = vec![0u8; 24 * 3 * 8];
        Wedge.fill_vertex_buffer(&points, &topology, &mut dest, ValueFormat::Double);

        let first = f64::from_ne_bytes(dest[..8].try_into().unwrap());
        assert_eq!(first, 0.5);
    }
}
