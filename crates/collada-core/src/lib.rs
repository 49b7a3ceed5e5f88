//! COLLADA Core Library
//!
//! Mesh data model, merging of `<source>` arrays and callback-driven
//! decoding of the offset-interleaved index streams of `<mesh>` primitives.

pub mod data_types;
pub mod geometry_indices;
pub mod index_list;
pub mod input;
pub mod material_id_info;
pub mod mesh;
pub mod mesh_loader;
pub mod mesh_primitive;
pub mod mesh_vertex_data;
pub mod source;
pub mod source_array_merger;
pub mod status;

// =============================================================================
// Re-exports
// =============================================================================

pub use data_types::DataType;
pub use geometry_indices::{FaceIndex, MaterialId};
pub use index_list::IndexList;
pub use input::{InputSemantic, InputShared, InputUnshared, MeshPrimitiveInputList, Vertices};
pub use mesh::Mesh;
pub use mesh_loader::{GeometryWriter, LoaderState, MeshLoader, PrimitiveAttributes, PrimitiveElement};
pub use mesh_primitive::{MeshPrimitive, PolygonHole, PrimitiveType};
pub use mesh_vertex_data::MeshVertexData;
pub use source::{Source, SourceList, SourceValues};
pub use status::{ColladaError, Status};
