//! Flattens a host polygon mesh into COLLADA mesh primitives.
//!
//! Polygons are grouped by shader slot; every slot becomes one primitive.
//! Polygons without a valid slot are collected in a trailing primitive
//! without material. Each face vertex contributes one index per written
//! attribute, in input offset order.
//!
//! # Example
//!
//! ```ignore
//! use collada_io::polygon_exporter::{ExportSources, GeometryPolygonExporter};
//! use collada_io::primitives_writer::RecordingWriter;
//!
//! let sources = ExportSources::new()
//!     .with_polygon_source(InputSemantic::Vertex, "box-positions", 0)
//!     .with_polygon_source(InputSemantic::Normal, "box-normals", 0)
//!     .with_vertex_source("box-positions");
//! let mut writer = RecordingWriter::new();
//! GeometryPolygonExporter::new(&mesh, "box", sources).export_polygon_sources(&mut writer)?;
//! ```

use std::io;

use collada_core::input::InputSemantic;

use crate::export_options::ExportOptions;
use crate::primitives_writer::{
    ExportType, IndexElementKind, PrimitiveHeader, PrimitiveInput, PrimitivesWriter,
};
use crate::traits::PolygonMesh;

/// A source to be referenced by the primitives of the mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInput {
    pub semantic: InputSemantic,
    pub source_id: String,
    /// UV set or color set index.
    pub set: u64,
}

/// Sources of the exported mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSources {
    /// Per-face-vertex sources, in the order their inputs are written.
    pub polygon_sources: Vec<SourceInput>,
    /// Ids of the sources placed in `<vertices>`.
    pub vertex_source_ids: Vec<String>,
}

impl ExportSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_polygon_source(
        mut self,
        semantic: InputSemantic,
        source_id: impl Into<String>,
        set: u64,
    ) -> Self {
        self.polygon_sources.push(SourceInput {
            semantic,
            source_id: source_id.into(),
            set,
        });
        self
    }

    pub fn with_vertex_source(mut self, source_id: impl Into<String>) -> Self {
        self.vertex_source_ids.push(source_id.into());
        self
    }

    fn is_vertex_source(&self, source_id: &str) -> bool {
        self.vertex_source_ids.iter().any(|id| id == source_id)
    }
}

/// An attribute written for every face vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WrittenAttribute {
    semantic: InputSemantic,
    set: u64,
}

fn is_exportable(semantic: InputSemantic) -> bool {
    matches!(
        semantic,
        InputSemantic::Vertex
            | InputSemantic::Position
            | InputSemantic::Normal
            | InputSemantic::Tangent
            | InputSemantic::Binormal
            | InputSemantic::TexCoord
            | InputSemantic::Uv
            | InputSemantic::Color
    )
}

/// Index runs of one host polygon, buffered before they are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolygonSource {
    attribute_indices: Vec<Vec<u32>>,
    face_vertex_counts: Vec<usize>,
    hole_faces: Vec<usize>,
    vertex_count_list: Vec<u64>,
    is_holed: bool,
}

impl PolygonSource {
    fn new(num_attributes: usize) -> Self {
        Self {
            attribute_indices: vec![Vec::new(); num_attributes],
            ..Self::default()
        }
    }

    /// Indices of each written attribute, in offset order.
    pub fn attribute_indices(&self) -> &[Vec<u32>] {
        &self.attribute_indices
    }

    /// Vertex count of every face; hole faces follow their polygon.
    pub fn face_vertex_counts(&self) -> &[usize] {
        &self.face_vertex_counts
    }

    /// Positions in [`PolygonSource::face_vertex_counts`] that are holes.
    pub fn hole_faces(&self) -> &[usize] {
        &self.hole_faces
    }

    pub fn is_holed(&self) -> bool {
        self.is_holed
    }

    pub fn num_vertices(&self) -> usize {
        self.attribute_indices.first().map_or(0, Vec::len)
    }

    /// Faces written for the polygon, holes excluded.
    pub fn num_faces(&self) -> usize {
        self.face_vertex_counts.len() - self.hole_faces.len()
    }

    fn is_hole_face(&self, face: usize) -> bool {
        self.hole_faces.contains(&face)
    }

    fn lengths(&self) -> Vec<usize> {
        self.attribute_indices.iter().map(Vec::len).collect()
    }

    fn truncate(&mut self, lengths: &[usize]) {
        for (indices, &len) in self.attribute_indices.iter_mut().zip(lengths) {
            indices.truncate(len);
        }
    }
}

pub struct GeometryPolygonExporter<'a, M: PolygonMesh + ?Sized> {
    mesh: &'a M,
    mesh_id: String,
    sources: ExportSources,
    options: ExportOptions,
    triangulated: bool,
    consumed_holes: Vec<bool>,
}

impl<'a, M: PolygonMesh + ?Sized> GeometryPolygonExporter<'a, M> {
    pub fn new(mesh: &'a M, mesh_id: impl Into<String>, sources: ExportSources) -> Self {
        Self {
            mesh,
            mesh_id: mesh_id.into(),
            sources,
            options: ExportOptions::default(),
            triangulated: false,
            consumed_holes: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether the last export wrote triangles.
    pub fn is_triangulated(&self) -> bool {
        self.triangulated
    }

    /// Writes one primitive per non-empty shader slot and returns the number
    /// of primitives written.
    pub fn export_polygon_sources<W: PrimitivesWriter + ?Sized>(
        &mut self,
        writer: &mut W,
    ) -> io::Result<usize> {
        self.triangulated = self.options.triangulate && self.verify_triangulation();
        self.consumed_holes = vec![false; self.mesh.hole_infos().len()];

        let (inputs, attributes) = self.generate_polygon_set_inputs();
        let shader_count = self.mesh.shaders().len();
        let mut written = 0;

        for slot in 0..=shader_count {
            let polygons = self.create_shader_polygons(slot, shader_count, &attributes);
            let count: usize = polygons.iter().map(PolygonSource::num_faces).sum();
            if count == 0 {
                continue;
            }

            let is_holed = polygons.iter().any(PolygonSource::is_holed);
            let export_type = self.determine_export_type(is_holed);
            let vcount = match export_type {
                ExportType::Polylist => polygons
                    .iter()
                    .flat_map(|polygon| polygon.vertex_count_list.iter().copied())
                    .collect(),
                _ => Vec::new(),
            };
            let header = PrimitiveHeader {
                export_type,
                count,
                material: self.mesh.shaders().get(slot).cloned(),
                inputs: inputs.clone(),
                vcount,
            };
            log::debug!(
                "Mesh '{}': writing <{}> with {} faces",
                self.mesh_id,
                export_type.element_name(),
                count
            );

            writer.open_primitive(&header)?;
            write_shader_polygons(writer, &polygons, export_type)?;
            writer.close_primitive()?;
            written += 1;
        }
        Ok(written)
    }

    /// Every polygon with more than three vertices must triangulate.
    fn verify_triangulation(&self) -> bool {
        for polygon in 0..self.mesh.num_polygons() {
            if self.mesh.polygon_vertex_count(polygon) <= 3 {
                continue;
            }
            match self.mesh.triangulate(polygon) {
                Some(triangles) if !triangles.is_empty() => {}
                _ => {
                    log::warn!(
                        "Mesh '{}': polygon {} has no valid triangulation, exporting polygons",
                        self.mesh_id,
                        polygon
                    );
                    return false;
                }
            }
        }
        true
    }

    fn determine_export_type(&self, is_holed: bool) -> ExportType {
        if is_holed && !self.triangulated {
            ExportType::Polygons
        } else if self.triangulated {
            ExportType::Triangles
        } else {
            ExportType::Polylist
        }
    }

    /// Builds the `<input>` list shared by all primitives of the mesh and the
    /// attributes written per face vertex.
    fn generate_polygon_set_inputs(&self) -> (Vec<PrimitiveInput>, Vec<WrittenAttribute>) {
        let mut inputs = Vec::new();
        let mut attributes: Vec<WrittenAttribute> = Vec::new();
        let mut normals_offset = None;

        for source in &self.sources.polygon_sources {
            let semantic = source.semantic;
            if !is_exportable(semantic) {
                log::warn!(
                    "Mesh '{}': source '{}' with semantic {} is not exported",
                    self.mesh_id,
                    source.source_id,
                    semantic
                );
                continue;
            }
            if semantic != InputSemantic::Vertex
                && self.sources.is_vertex_source(&source.source_id)
            {
                continue;
            }
            if semantic.is_normal_like() && !self.mesh.has_face_vertex_normals() {
                log::warn!(
                    "Mesh '{}': no face vertex normals, {} input dropped",
                    self.mesh_id,
                    semantic
                );
                continue;
            }

            let shared_offset = if semantic.is_normal_like() {
                normals_offset
            } else {
                None
            };
            let duplicate = attributes
                .iter()
                .position(|a| a.semantic == semantic && a.set == source.set);
            let offset = match shared_offset.or(duplicate.map(|i| i as u64)) {
                Some(offset) => offset,
                None => {
                    attributes.push(WrittenAttribute {
                        semantic,
                        set: source.set,
                    });
                    (attributes.len() - 1) as u64
                }
            };
            if semantic.is_normal_like() && normals_offset.is_none() {
                normals_offset = Some(offset);
            }

            let source_id = if semantic == InputSemantic::Vertex {
                self.options.vertices_id(&self.mesh_id)
            } else {
                source.source_id.clone()
            };
            let set = (semantic.is_tex_coord() || semantic == InputSemantic::Color)
                .then_some(source.set);
            inputs.push(PrimitiveInput {
                semantic,
                source: format!("#{}", source_id),
                offset,
                set,
            });
        }
        (inputs, attributes)
    }

    fn in_slot(&self, polygon: usize, slot: usize, shader_count: usize) -> bool {
        match self.mesh.shader_index(polygon) {
            Some(index) if index < shader_count => index == slot,
            _ => slot == shader_count,
        }
    }

    fn create_shader_polygons(
        &mut self,
        slot: usize,
        shader_count: usize,
        attributes: &[WrittenAttribute],
    ) -> Vec<PolygonSource> {
        let mut polygons = Vec::new();
        for polygon in 0..self.mesh.num_polygons() {
            if !self.in_slot(polygon, slot, shader_count) {
                continue;
            }
            let source = self.initialize_polygon_source(polygon, attributes);
            if source.num_faces() > 0 {
                polygons.push(source);
            }
        }
        polygons
    }

    fn initialize_polygon_source(
        &mut self,
        polygon: usize,
        attributes: &[WrittenAttribute],
    ) -> PolygonSource {
        let mesh = self.mesh;
        let mut source = PolygonSource::new(attributes.len());
        let vertex_count = mesh.polygon_vertex_count(polygon);

        if self.triangulated && vertex_count > 3 {
            for triangle in mesh.triangulate(polygon).unwrap_or_default() {
                source.face_vertex_counts.push(3);
                source.vertex_count_list.push(3);
                for vertex in triangle {
                    write_vertex_indices(mesh, &mut source, polygon, vertex, attributes);
                }
            }
            return source;
        }
        if vertex_count < 3 {
            log::debug!(
                "Mesh '{}': polygon {} with {} vertices skipped",
                self.mesh_id,
                polygon,
                vertex_count
            );
            return source;
        }

        let mut vertices: Vec<usize> = (0..vertex_count).collect();
        if self.options.remove_duplicate_vertices {
            let mut seen = Vec::with_capacity(vertex_count);
            vertices.retain(|&vertex| {
                let index = mesh.vertex_index(polygon, vertex);
                if seen.contains(&index) {
                    false
                } else {
                    seen.push(index);
                    true
                }
            });
        }
        let run = vertices.len();
        let holed = mesh.is_holed(polygon) && !self.triangulated;
        let start = source.lengths();

        source.is_holed = holed;
        source.face_vertex_counts.push(run);
        for (position, &vertex) in vertices.iter().enumerate() {
            if holed {
                let vertex_index = mesh.vertex_index(polygon, vertex);
                self.handle_holed_polygon(&mut source, polygon, vertex_index, run, position);
            }
            write_vertex_indices(mesh, &mut source, polygon, vertex, attributes);
        }

        if run < 3 {
            log::debug!(
                "Mesh '{}': polygon {} degenerate after duplicate removal",
                self.mesh_id,
                polygon
            );
            source.truncate(&start);
            source.face_vertex_counts.clear();
            source.hole_faces.clear();
            source.is_holed = false;
        } else {
            source.vertex_count_list.push(run as u64);
        }
        source
    }

    /// Starts a hole face when the vertex at `position` is the first vertex of
    /// an unused hole of `polygon`. The current last face loses the vertices
    /// from `position` to the end of the run, which become the hole.
    fn handle_holed_polygon(
        &mut self,
        source: &mut PolygonSource,
        polygon: usize,
        vertex_index: u32,
        run: usize,
        position: usize,
    ) {
        if position == 0 {
            return;
        }
        let holes = self.mesh.hole_infos();
        let found = holes.iter().enumerate().position(|(i, hole)| {
            !self.consumed_holes.get(i).copied().unwrap_or(true)
                && hole.polygon == polygon
                && hole.first_vertex == vertex_index
        });
        let Some(hole) = found else {
            return;
        };
        self.consumed_holes[hole] = true;

        let hole_vertex_count = run - position;
        if holes[hole].vertex_count != hole_vertex_count {
            log::debug!(
                "Mesh '{}': hole of polygon {} spans {} vertices, host reports {}",
                self.mesh_id,
                polygon,
                hole_vertex_count,
                holes[hole].vertex_count
            );
        }
        if let Some(last) = source.face_vertex_counts.last_mut() {
            *last = last.saturating_sub(hole_vertex_count);
        }
        source.hole_faces.push(source.face_vertex_counts.len());
        source.face_vertex_counts.push(hole_vertex_count);
    }
}

fn write_vertex_indices<M: PolygonMesh + ?Sized>(
    mesh: &M,
    source: &mut PolygonSource,
    polygon: usize,
    vertex: usize,
    attributes: &[WrittenAttribute],
) {
    let vertex_index = mesh.vertex_index(polygon, vertex);
    for (indices, attribute) in source.attribute_indices.iter_mut().zip(attributes) {
        let set = attribute.set as usize;
        let index = match attribute.semantic {
            InputSemantic::Vertex | InputSemantic::Position => vertex_index,
            InputSemantic::Normal | InputSemantic::Tangent | InputSemantic::Binormal => {
                mesh.normal_index(polygon, vertex).unwrap_or(0)
            }
            InputSemantic::TexCoord | InputSemantic::Uv => {
                mesh.uv_index(polygon, vertex, set).unwrap_or(0)
            }
            InputSemantic::Color => mesh.color_index(polygon, vertex, set).unwrap_or_else(|| {
                mesh.color_sets()
                    .get(set)
                    .map_or(0, |color_set| color_set.white_color_index)
            }),
            _ => 0,
        };
        indices.push(index);
    }
}

fn open_polygon_or_hole<W: PrimitivesWriter + ?Sized>(
    writer: &mut W,
    source: &PolygonSource,
    face: usize,
) -> io::Result<()> {
    if source.is_hole_face(face) {
        writer.open_element(IndexElementKind::Hole)
    } else {
        writer.open_element(IndexElementKind::Polygon)
    }
}

fn write_vertex<W: PrimitivesWriter + ?Sized>(
    writer: &mut W,
    source: &PolygonSource,
    position: usize,
) -> io::Result<()> {
    for indices in &source.attribute_indices {
        writer.append_index(indices[position])?;
    }
    Ok(())
}

fn write_shader_polygons<W: PrimitivesWriter + ?Sized>(
    writer: &mut W,
    polygons: &[PolygonSource],
    export_type: ExportType,
) -> io::Result<()> {
    if export_type != ExportType::Polygons {
        writer.open_element(IndexElementKind::Polygon)?;
        for source in polygons {
            for position in 0..source.num_vertices() {
                write_vertex(writer, source, position)?;
            }
        }
        return writer.close_element();
    }

    for source in polygons {
        if source.is_holed() {
            writer.open_element(IndexElementKind::PolygonWithHoles)?;
        }
        let mut face = 0;
        let mut face_end = source.face_vertex_counts[0];
        open_polygon_or_hole(writer, source, face)?;
        for position in 0..source.num_vertices() {
            if source.is_holed()
                && position == face_end
                && face + 1 < source.face_vertex_counts.len()
            {
                face += 1;
                writer.close_element()?;
                face_end += source.face_vertex_counts[face];
                open_polygon_or_hole(writer, source, face)?;
            }
            write_vertex(writer, source, position)?;
        }
        writer.close_element()?;
        if source.is_holed() {
            writer.close_element()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly_mesh::{PolyMesh, Polygon};
    use crate::primitives_writer::{RecordedElement, RecordedPrimitive, RecordingWriter};

    fn sources() -> ExportSources {
        ExportSources::new()
            .with_polygon_source(InputSemantic::Vertex, "m-positions", 0)
            .with_polygon_source(InputSemantic::Normal, "m-normals", 0)
            .with_polygon_source(InputSemantic::TexCoord, "m-uv0", 0)
            .with_vertex_source("m-positions")
    }

    fn export(mesh: &PolyMesh, options: ExportOptions) -> Vec<RecordedPrimitive> {
        let mut writer = RecordingWriter::new();
        let mut exporter =
            GeometryPolygonExporter::new(mesh, "m", sources()).with_options(options);
        exporter.export_polygon_sources(&mut writer).unwrap();
        writer.into_primitives()
    }

    #[test]
    fn test_input_offsets() {
        let mut mesh = PolyMesh::new().with_uv_sets(&["map1"]);
        mesh.add_polygon(Polygon::new(vec![0, 1, 2]).with_normals(vec![0, 1, 2]).with_uvs(vec![vec![0, 1, 2]]));
        let sources = sources()
            .with_polygon_source(InputSemantic::Tangent, "m-tangents", 0)
            .with_polygon_source(InputSemantic::TexCoord, "m-uv0-copy", 0);

        let exporter = GeometryPolygonExporter::new(&mesh, "m", sources);
        let (inputs, attributes) = exporter.generate_polygon_set_inputs();
        let summary: Vec<(InputSemantic, &str, u64, Option<u64>)> = inputs
            .iter()
            .map(|i| (i.semantic, i.source.as_str(), i.offset, i.set))
            .collect();
        assert_eq!(
            summary,
            vec![
                (InputSemantic::Vertex, "#m-vertices", 0, None),
                (InputSemantic::Normal, "#m-normals", 1, None),
                (InputSemantic::TexCoord, "#m-uv0", 2, Some(0)),
                (InputSemantic::Tangent, "#m-tangents", 1, None),
                (InputSemantic::TexCoord, "#m-uv0-copy", 2, Some(0)),
            ]
        );
        assert_eq!(attributes.len(), 3);
    }

    #[test]
    fn test_normals_dropped_without_face_vertex_normals() {
        let mut mesh = PolyMesh::new().with_uv_sets(&["map1"]);
        mesh.add_polygon(Polygon::new(vec![0, 1, 2]).with_uvs(vec![vec![5, 6, 7]]));

        let primitives = export(&mesh, ExportOptions::default());
        let inputs = &primitives[0].header.inputs;
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[1].semantic, InputSemantic::TexCoord);
        assert_eq!(inputs[1].offset, 1);
        assert_eq!(primitives[0].indices(), vec![0, 5, 1, 6, 2, 7]);
    }

    #[test]
    fn test_duplicate_vertex_removal_erases_degenerate_polygon() {
        let mut mesh = PolyMesh::new();
        mesh.add_polygon(Polygon::new(vec![0, 1, 1, 0]));
        mesh.add_polygon(Polygon::new(vec![2, 3, 3, 4]));
        let sources = ExportSources::new()
            .with_polygon_source(InputSemantic::Vertex, "m-positions", 0)
            .with_vertex_source("m-positions");

        let mut writer = RecordingWriter::new();
        GeometryPolygonExporter::new(&mesh, "m", sources)
            .with_options(ExportOptions::new().with_duplicate_vertex_removal(true))
            .export_polygon_sources(&mut writer)
            .unwrap();

        let primitive = &writer.primitives()[0];
        assert_eq!(primitive.header.count, 1);
        assert_eq!(primitive.header.vcount, vec![3]);
        assert_eq!(primitive.indices(), vec![2, 3, 4]);
    }

    #[test]
    fn test_color_falls_back_to_white() {
        let mut mesh = PolyMesh::new().with_color_set("colorSet1", 9);
        mesh.add_polygon(Polygon::new(vec![0, 1, 2]).with_colors(vec![vec![Some(4), None, Some(5)]]));
        let sources = ExportSources::new()
            .with_polygon_source(InputSemantic::Vertex, "m-positions", 0)
            .with_polygon_source(InputSemantic::Color, "m-colors", 0)
            .with_vertex_source("m-positions");

        let mut writer = RecordingWriter::new();
        GeometryPolygonExporter::new(&mesh, "m", sources)
            .export_polygon_sources(&mut writer)
            .unwrap();
        assert_eq!(writer.primitives()[0].indices(), vec![0, 4, 1, 9, 2, 5]);
        assert_eq!(writer.primitives()[0].header.inputs[1].set, Some(0));
    }

    #[test]
    fn test_holed_polygon_written_as_ph() {
        let mut mesh = PolyMesh::new();
        mesh.add_polygon(Polygon::new(vec![0, 1, 2, 3]).with_hole(vec![4, 5, 6]));
        let sources = ExportSources::new()
            .with_polygon_source(InputSemantic::Vertex, "m-positions", 0)
            .with_vertex_source("m-positions");

        let mut writer = RecordingWriter::new();
        GeometryPolygonExporter::new(&mesh, "m", sources)
            .export_polygon_sources(&mut writer)
            .unwrap();

        let primitive = &writer.primitives()[0];
        assert_eq!(primitive.header.export_type, ExportType::Polygons);
        assert_eq!(primitive.header.count, 1);
        assert_eq!(
            primitive.elements,
            vec![RecordedElement::Ph {
                polygon: vec![0, 1, 2, 3],
                holes: vec![vec![4, 5, 6]],
            }]
        );
    }
}
