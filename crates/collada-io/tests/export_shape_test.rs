//! Element choice, shader slots and COLLADA text output of the polygon
//! exporter.

use std::fs;
use std::io::BufWriter;

use collada_core::input::InputSemantic;
use collada_io::{
    ColladaPrimitivesWriter, ExportOptions, ExportSources, ExportType, GeometryPolygonExporter,
    PolyMesh, Polygon, RecordedPrimitive, RecordingWriter,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn position_sources() -> ExportSources {
    ExportSources::new()
        .with_polygon_source(InputSemantic::Vertex, "shape-positions", 0)
        .with_vertex_source("shape-positions")
}

fn export(mesh: &PolyMesh, options: ExportOptions) -> (Vec<RecordedPrimitive>, bool) {
    let mut writer = RecordingWriter::new();
    let mut exporter =
        GeometryPolygonExporter::new(mesh, "shape", position_sources()).with_options(options);
    let written = exporter
        .export_polygon_sources(&mut writer)
        .expect("recording never fails");
    let primitives = writer.into_primitives();
    assert_eq!(written, primitives.len());
    (primitives, exporter.is_triangulated())
}

fn quad_and_triangle() -> PolyMesh {
    let mut mesh = PolyMesh::new();
    mesh.add_polygon(Polygon::new(vec![0, 1, 2, 3]));
    mesh.add_polygon(Polygon::new(vec![3, 2, 4]));
    mesh
}

#[test]
fn test_untriangulated_mesh_is_polylist() {
    init_logger();
    let (primitives, triangulated) = export(&quad_and_triangle(), ExportOptions::default());

    assert!(!triangulated);
    assert_eq!(primitives.len(), 1);
    let header = &primitives[0].header;
    assert_eq!(header.export_type, ExportType::Polylist);
    assert_eq!(header.count, 2);
    assert_eq!(header.vcount, vec![4, 3]);
    assert_eq!(header.material, None, "default slot has no material");
    assert_eq!(header.inputs.len(), 1);
    assert_eq!(header.inputs[0].source, "#shape-vertices");
    assert_eq!(primitives[0].indices(), vec![0, 1, 2, 3, 3, 2, 4]);
}

#[test]
fn test_triangulated_mesh_is_triangles() {
    init_logger();
    let options = ExportOptions::new().with_triangulation(true);
    let (primitives, triangulated) = export(&quad_and_triangle(), options);

    assert!(triangulated);
    let header = &primitives[0].header;
    assert_eq!(header.export_type, ExportType::Triangles);
    assert_eq!(header.count, 3);
    assert!(header.vcount.is_empty());
    assert_eq!(primitives[0].indices(), vec![0, 1, 2, 0, 2, 3, 3, 2, 4]);
}

#[test]
fn test_holed_polygon_disables_triangulation() {
    init_logger();
    let mut mesh = quad_and_triangle();
    mesh.add_polygon(Polygon::new(vec![5, 6, 7, 8]).with_hole(vec![9, 10, 11]));
    let options = ExportOptions::new().with_triangulation(true);
    let (primitives, triangulated) = export(&mesh, options);

    assert!(!triangulated, "one failed triangulation disables it mesh-wide");
    let header = &primitives[0].header;
    assert_eq!(header.export_type, ExportType::Polygons);
    assert_eq!(header.count, 3);
    assert_eq!(primitives[0].elements.len(), 3);
}

#[test]
fn test_shader_slots_and_default_slot() {
    init_logger();
    let mut mesh = PolyMesh::new().with_shaders(&["red", "blue"]);
    mesh.add_polygon(Polygon::new(vec![0, 1, 2]).with_shader(1));
    mesh.add_polygon(Polygon::new(vec![2, 1, 3]));
    mesh.add_polygon(Polygon::new(vec![3, 1, 4]).with_shader(1));
    mesh.add_polygon(Polygon::new(vec![4, 1, 5]).with_shader(7));

    let (primitives, _) = export(&mesh, ExportOptions::default());

    assert_eq!(primitives.len(), 2, "the empty 'red' slot is skipped");
    assert_eq!(primitives[0].header.material.as_deref(), Some("blue"));
    assert_eq!(primitives[0].header.count, 2);
    assert_eq!(primitives[0].indices(), vec![0, 1, 2, 3, 1, 4]);
    assert_eq!(primitives[1].header.material, None);
    assert_eq!(primitives[1].header.count, 2);
    assert_eq!(primitives[1].indices(), vec![2, 1, 3, 4, 1, 5]);
}

#[test]
fn test_small_polygons_are_skipped() {
    init_logger();
    let mut mesh = PolyMesh::new();
    mesh.add_polygon(Polygon::new(vec![0, 1]));
    mesh.add_polygon(Polygon::new(vec![0, 1, 2]));

    let (primitives, _) = export(&mesh, ExportOptions::default());
    assert_eq!(primitives[0].header.count, 1);
    assert_eq!(primitives[0].header.vcount, vec![3]);
}

#[test]
fn test_mesh_without_polygons_writes_nothing() {
    let (primitives, _) = export(&PolyMesh::new(), ExportOptions::default());
    assert!(primitives.is_empty());
}

#[test]
fn test_collada_text_written_to_file() {
    init_logger();
    let mut mesh = PolyMesh::new().with_shaders(&["stone"]);
    mesh.add_polygon(
        Polygon::new(vec![0, 1, 2, 3])
            .with_hole(vec![4, 5, 6])
            .with_shader(0),
    );

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("primitives.dae");
    let file = fs::File::create(&path).expect("create output");
    let mut writer = ColladaPrimitivesWriter::new(BufWriter::new(file)).with_indent_level(3);
    let written = GeometryPolygonExporter::new(&mesh, "shape", position_sources())
        .export_polygon_sources(&mut writer)
        .expect("write primitives");
    assert_eq!(written, 1);
    drop(writer);

    let text = fs::read_to_string(&path).expect("read output");
    let expected = "      <polygons count=\"1\" material=\"stone\">\n\
                    \x20       <input semantic=\"VERTEX\" source=\"#shape-vertices\" offset=\"0\"/>\n\
                    \x20       <ph>\n\
                    \x20         <p>0 1 2 3</p>\n\
                    \x20         <h>4 5 6</h>\n\
                    \x20       </ph>\n\
                    \x20     </polygons>\n";
    assert_eq!(text, expected);
}
