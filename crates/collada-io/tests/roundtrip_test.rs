//! Flatten host polygons, replay the recorded primitives through the loader
//! and compare the decoded index arrays with the host data.

use collada_core::input::InputSemantic;
use collada_core::mesh::Mesh;
use collada_core::mesh_loader::MeshLoader;
use collada_core::mesh_primitive::{PolygonHole, PrimitiveType};
use collada_core::source::Source;
use collada_core::FaceIndex;
use collada_io::{
    replay_primitives, ExportSources, GeometryPolygonExporter, PolyMesh, Polygon,
    RecordedElement, RecordingWriter,
};
use proptest::prelude::*;

const VERTEX_COUNT: usize = 16;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn export_sources() -> ExportSources {
    ExportSources::new()
        .with_polygon_source(InputSemantic::Vertex, "tri-positions", 0)
        .with_polygon_source(InputSemantic::Normal, "tri-normals", 0)
        .with_polygon_source(InputSemantic::TexCoord, "tri-map1", 0)
        .with_vertex_source("tri-positions")
}

/// Loader holding the sources the exported inputs reference.
fn loader() -> MeshLoader {
    let mut loader = MeshLoader::new("tri", "");
    loader.add_source(Source::new_float("tri-positions", vec![0.5; VERTEX_COUNT * 3], 3));
    loader.add_source(Source::new_float("tri-normals", vec![0.0; VERTEX_COUNT * 3], 3));
    loader.add_source(Source::new_float("tri-map1", vec![0.25; VERTEX_COUNT * 2], 2));
    assert!(loader.begin_vertices("tri-vertices", ""));
    assert!(loader.vertices_input(InputSemantic::Position, "#tri-positions"));
    assert!(loader.end_vertices());
    loader
}

fn round_trip(mesh: &PolyMesh) -> (Vec<collada_io::RecordedPrimitive>, Mesh) {
    let mut writer = RecordingWriter::new();
    GeometryPolygonExporter::new(mesh, "tri", export_sources())
        .export_polygon_sources(&mut writer)
        .expect("recording never fails");
    let primitives = writer.into_primitives();

    let mut loader = loader();
    assert!(replay_primitives(&mut loader, &primitives), "replay rejected");
    (primitives, loader.into_mesh())
}

/// Face vertices as (position, normal, uv) index triples.
fn triangle_mesh(face_vertices: &[(u32, u32, u32)]) -> PolyMesh {
    let mut mesh = PolyMesh::new().with_uv_sets(&["map1"]);
    for triangle in face_vertices.chunks(3) {
        let vertices = triangle.iter().map(|v| v.0).collect();
        let normals = triangle.iter().map(|v| v.1).collect();
        let uvs = triangle.iter().map(|v| v.2).collect();
        mesh.add_polygon(
            Polygon::new(vertices)
                .with_normals(normals)
                .with_uvs(vec![uvs]),
        );
    }
    mesh
}

fn face_vertices() -> impl Strategy<Value = Vec<(u32, u32, u32)>> {
    let index = 0..VERTEX_COUNT as u32;
    (1usize..12).prop_flat_map(move |n| {
        prop::collection::vec((index.clone(), index.clone(), index.clone()), n * 3)
    })
}

proptest! {
    #[test]
    fn prop_triangles_round_trip(face_vertices in face_vertices()) {
        let mesh = triangle_mesh(&face_vertices);
        let (_, decoded) = round_trip(&mesh);

        prop_assert_eq!(decoded.num_primitives(), 1);
        let primitive = &decoded.primitives()[0];
        let positions: Vec<u32> = face_vertices.iter().map(|v| v.0).collect();
        let normals: Vec<u32> = face_vertices.iter().map(|v| v.1).collect();
        let uvs: Vec<u32> = face_vertices.iter().map(|v| v.2).collect();

        prop_assert_eq!(primitive.face_count(), face_vertices.len() / 3);
        prop_assert_eq!(primitive.position_indices(), positions.as_slice());
        prop_assert_eq!(primitive.normal_indices(), normals.as_slice());
        prop_assert_eq!(primitive.uv_coord_indices().len(), 1);
        prop_assert_eq!(primitive.uv_coord_indices()[0].indices(), uvs.as_slice());
        prop_assert!(primitive.has_only_triangles());
    }
}

#[test]
fn test_quad_round_trip_keeps_polylist_counts() {
    init_logger();
    let mut mesh = PolyMesh::new().with_uv_sets(&["map1"]);
    mesh.add_polygon(
        Polygon::new(vec![0, 1, 2, 3])
            .with_normals(vec![0, 0, 0, 0])
            .with_uvs(vec![vec![0, 1, 2, 3]]),
    );
    mesh.add_polygon(
        Polygon::new(vec![3, 2, 4])
            .with_normals(vec![1, 1, 1])
            .with_uvs(vec![vec![3, 2, 4]]),
    );

    let (primitives, decoded) = round_trip(&mesh);
    assert_eq!(primitives[0].header.vcount, vec![4, 3]);

    let primitive = &decoded.primitives()[0];
    assert_eq!(primitive.primitive_type(), PrimitiveType::Polygons);
    assert_eq!(primitive.grouped_vertices_vertex_count(), &[4, 3]);
    assert_eq!(primitive.position_indices(), &[0, 1, 2, 3, 3, 2, 4]);
    assert_eq!(primitive.normal_indices(), &[0, 0, 0, 0, 1, 1, 1]);
    assert_eq!(decoded.triangle_count(), 3);
}

fn holed_mesh(outer: Vec<u32>, holes: &[Vec<u32>]) -> PolyMesh {
    let mut polygon = Polygon::new(outer);
    for hole in holes {
        polygon = polygon.with_hole(hole.clone());
    }
    let count = polygon.vertex_count();
    polygon = polygon
        .with_normals(vec![0; count])
        .with_uvs(vec![vec![0; count]]);

    let mut mesh = PolyMesh::new().with_uv_sets(&["map1"]);
    mesh.add_polygon(polygon);
    mesh
}

#[test]
fn test_hole_accounting_nine_vertices() {
    init_logger();
    let mesh = holed_mesh(vec![0, 1, 2, 3, 4, 5], &[vec![6, 7, 8]]);
    let (primitives, decoded) = round_trip(&mesh);

    let primitive = &primitives[0];
    assert_eq!(primitive.header.count, 1);
    match &primitive.elements[0] {
        RecordedElement::Ph { polygon, holes } => {
            assert_eq!(polygon.len(), 6 * 3, "outer face loses the hole's vertices");
            assert_eq!(holes.len(), 1);
            assert_eq!(holes[0].len(), 3 * 3);
        }
        other => panic!("expected <ph>, got {:?}", other),
    }

    let decoded = &decoded.primitives()[0];
    assert_eq!(decoded.face_count(), 1);
    assert_eq!(decoded.grouped_vertices_vertex_count(), &[6, -3]);
    assert_eq!(
        decoded.polygon_holes(),
        &[PolygonHole { entry: 1, face: FaceIndex(0) }]
    );
    assert_eq!(decoded.position_indices().len(), 9, "every visited vertex is decoded");
}

#[test]
fn test_hole_accounting_six_vertices() {
    init_logger();
    let mesh = holed_mesh(vec![0, 1, 2], &[vec![3, 4, 5]]);
    let (_, decoded) = round_trip(&mesh);

    let decoded = &decoded.primitives()[0];
    assert_eq!(decoded.grouped_vertices_vertex_count(), &[3, -3]);
    assert_eq!(decoded.num_polygon_holes(), 1);
    assert_eq!(decoded.position_indices(), &[0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_two_holes_in_one_polygon() {
    init_logger();
    let mesh = holed_mesh(vec![0, 1, 2, 3], &[vec![4, 5, 6], vec![7, 8, 9]]);
    let (_, decoded) = round_trip(&mesh);

    let decoded = &decoded.primitives()[0];
    assert_eq!(decoded.face_count(), 1);
    assert_eq!(decoded.grouped_vertices_vertex_count(), &[4, -3, -3]);
    assert_eq!(
        decoded.polygon_holes(),
        &[
            PolygonHole { entry: 1, face: FaceIndex(0) },
            PolygonHole { entry: 2, face: FaceIndex(0) },
        ]
    );
    assert_eq!(decoded.vertex_index_count(), 10);
}
