//! COLLADA I/O library for flattening host polygon meshes into mesh
//! primitives.
//!
//! A host mesh is exposed through the [`PolygonMesh`] trait. The
//! [`GeometryPolygonExporter`] groups its polygons by shader and writes one
//! `<triangles>`, `<polylist>` or `<polygons>` element per group to a
//! [`PrimitivesWriter`].
//!
//! # Element Choice
//!
//! | Mesh content                 | Element        |
//! |------------------------------|----------------|
//! | holed polygons               | `<polygons>`   |
//! | triangulated                 | `<triangles>`  |
//! | anything else                | `<polylist>`   |
//!
//! # Writing COLLADA text
//!
//! ```ignore
//! use collada_io::{ColladaPrimitivesWriter, ExportOptions, ExportSources, GeometryPolygonExporter};
//!
//! let sources = ExportSources::new()
//!     .with_polygon_source(InputSemantic::Vertex, "box-positions", 0)
//!     .with_polygon_source(InputSemantic::TexCoord, "box-map1", 0)
//!     .with_vertex_source("box-positions");
//! let mut writer = ColladaPrimitivesWriter::new(file).with_indent_level(3);
//! GeometryPolygonExporter::new(&mesh, "box", sources)
//!     .with_options(ExportOptions::new().with_triangulation(true))
//!     .export_polygon_sources(&mut writer)?;
//! ```
//!
//! # Round trip
//!
//! With the `loader` feature, recorded primitives can be decoded again:
//!
//! ```ignore
//! let mut writer = RecordingWriter::new();
//! exporter.export_polygon_sources(&mut writer)?;
//! replay_primitives(&mut loader, writer.primitives());
//! let mesh = loader.into_mesh();
//! ```

// Exporter (requires exporter feature)
#[cfg(feature = "exporter")]
pub mod polygon_exporter;

// Loader bridge (requires loader feature)
#[cfg(feature = "loader")]
pub mod replay;

// Always available
pub mod export_options;
pub mod poly_mesh;
pub mod primitives_writer;
pub mod traits;

// Re-export main types for convenience
pub use export_options::ExportOptions;
pub use poly_mesh::{PolyMesh, Polygon};
#[cfg(feature = "exporter")]
pub use polygon_exporter::{ExportSources, GeometryPolygonExporter, PolygonSource, SourceInput};
pub use primitives_writer::{
    ColladaPrimitivesWriter, ExportType, IndexElementKind, PrimitiveHeader, PrimitiveInput,
    PrimitivesWriter, RecordedElement, RecordedPrimitive, RecordingWriter, WriterStateError,
};
#[cfg(feature = "loader")]
pub use replay::replay_primitives;
pub use traits::{ColorSet, HoleInfo, PolygonMesh};
