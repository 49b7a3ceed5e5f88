//! Feeds recorded primitives back through a [`MeshLoader`].
//!
//! The exporter and the loader meet here: primitives captured with a
//! [`RecordingWriter`](crate::primitives_writer::RecordingWriter) are
//! replayed as the element callbacks a COLLADA parser would issue.

use collada_core::mesh_loader::{MeshLoader, PrimitiveAttributes, PrimitiveElement};

use crate::primitives_writer::{ExportType, RecordedElement, RecordedPrimitive};

fn primitive_element(export_type: ExportType) -> PrimitiveElement {
    match export_type {
        ExportType::Triangles => PrimitiveElement::Triangles,
        ExportType::Polylist => PrimitiveElement::Polylist,
        ExportType::Polygons => PrimitiveElement::Polygons,
    }
}

fn widen(indices: &[u32]) -> Vec<u64> {
    indices.iter().map(|&i| u64::from(i)).collect()
}

fn replay_primitive(loader: &mut MeshLoader, primitive: &RecordedPrimitive) -> bool {
    let header = &primitive.header;
    let element = primitive_element(header.export_type);
    let attributes = PrimitiveAttributes {
        count: Some(header.count),
        material: header.material.clone(),
    };

    let mut ok = loader.begin_primitive(element, &attributes);
    for input in &header.inputs {
        ok &= loader.primitive_input(
            input.semantic,
            &input.source,
            input.offset,
            input.set.unwrap_or(0),
        );
    }
    if element == PrimitiveElement::Polylist {
        ok &= loader.begin_vcount();
        ok &= loader.data_vcount(&header.vcount);
        ok &= loader.end_vcount();
    }

    for recorded in &primitive.elements {
        match recorded {
            RecordedElement::P(indices) => {
                ok &= loader.begin_p();
                ok &= loader.data_p(&widen(indices));
                ok &= loader.end_p();
            }
            RecordedElement::Ph { polygon, holes } => {
                ok &= loader.begin_ph();
                ok &= loader.begin_p();
                ok &= loader.data_p(&widen(polygon));
                ok &= loader.end_p();
                for hole in holes {
                    ok &= loader.begin_h();
                    ok &= loader.data_h(&widen(hole));
                    ok &= loader.end_h();
                }
                ok &= loader.end_ph();
            }
        }
    }
    ok & loader.end_primitive()
}

/// Replays `primitives` into `loader`. Returns false if any callback was
/// rejected.
pub fn replay_primitives(loader: &mut MeshLoader, primitives: &[RecordedPrimitive]) -> bool {
    let mut ok = true;
    for primitive in primitives {
        if !replay_primitive(loader, primitive) {
            log::warn!(
                "Replay of <{}> was not accepted",
                primitive.header.export_type.element_name()
            );
            ok = false;
        }
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives_writer::{PrimitiveHeader, PrimitiveInput};
    use collada_core::input::InputSemantic;
    use collada_core::source::Source;

    #[test]
    fn test_replay_polylist() {
        let mut loader = MeshLoader::new("quad", "");
        loader.add_source(Source::new_float("quad-positions", vec![0.0; 12], 3));
        let primitive = RecordedPrimitive {
            header: PrimitiveHeader {
                export_type: ExportType::Polylist,
                count: 1,
                material: Some("red".to_string()),
                inputs: vec![PrimitiveInput {
                    semantic: InputSemantic::Position,
                    source: "#quad-positions".to_string(),
                    offset: 0,
                    set: None,
                }],
                vcount: vec![4],
            },
            elements: vec![RecordedElement::P(vec![0, 1, 2, 3])],
        };

        assert!(replay_primitives(&mut loader, &[primitive]));
        let mesh = loader.into_mesh();
        assert_eq!(mesh.num_primitives(), 1);
        let decoded = &mesh.primitives()[0];
        assert_eq!(decoded.position_indices(), &[0, 1, 2, 3]);
        assert_eq!(decoded.grouped_vertices_vertex_count(), &[4]);
        assert_eq!(decoded.material(), "red");
    }
}
