//! In-memory host mesh.
//!
//! [`PolyMesh`] implements [`PolygonMesh`] over plain vectors. It is used by
//! tools that build meshes programmatically and by the exporter tests.

use crate::traits::{ColorSet, HoleInfo, PolygonMesh};

/// A polygon of a [`PolyMesh`]. Hole vertices follow the outer boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Polygon {
    pub vertices: Vec<u32>,
    pub normals: Option<Vec<u32>>,
    /// Per UV set, one index per face vertex.
    pub uvs: Vec<Vec<u32>>,
    /// Per color set, one optional index per face vertex.
    pub colors: Vec<Vec<Option<u32>>>,
    pub hole_sizes: Vec<usize>,
    pub shader: Option<usize>,
}

impl Polygon {
    pub fn new(vertices: Vec<u32>) -> Self {
        Self {
            vertices,
            ..Self::default()
        }
    }

    pub fn with_normals(mut self, normals: Vec<u32>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_uvs(mut self, uvs: Vec<Vec<u32>>) -> Self {
        self.uvs = uvs;
        self
    }

    pub fn with_colors(mut self, colors: Vec<Vec<Option<u32>>>) -> Self {
        self.colors = colors;
        self
    }

    /// Appends a hole boundary to the vertex list.
    pub fn with_hole(mut self, vertices: Vec<u32>) -> Self {
        self.hole_sizes.push(vertices.len());
        self.vertices.extend(vertices);
        self
    }

    pub fn with_shader(mut self, shader: usize) -> Self {
        self.shader = Some(shader);
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn outer_vertex_count(&self) -> usize {
        self.vertices
            .len()
            .saturating_sub(self.hole_sizes.iter().sum::<usize>())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PolyMesh {
    polygons: Vec<Polygon>,
    holes: Vec<HoleInfo>,
    shaders: Vec<String>,
    uv_set_names: Vec<String>,
    color_sets: Vec<ColorSet>,
}

impl PolyMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shaders(mut self, shaders: &[&str]) -> Self {
        self.shaders = shaders.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_uv_sets(mut self, names: &[&str]) -> Self {
        self.uv_set_names = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_color_set(mut self, name: &str, white_color_index: u32) -> Self {
        self.color_sets.push(ColorSet::new(name, white_color_index));
        self
    }

    /// Adds a polygon and returns its index.
    pub fn add_polygon(&mut self, polygon: Polygon) -> usize {
        let index = self.polygons.len();
        let mut first = polygon.outer_vertex_count();
        for &size in &polygon.hole_sizes {
            if let Some(&first_vertex) = polygon.vertices.get(first) {
                self.holes.push(HoleInfo {
                    polygon: index,
                    vertex_count: size,
                    first_vertex,
                });
            }
            first += size;
        }
        self.polygons.push(polygon);
        index
    }

    pub fn polygon(&self, index: usize) -> Option<&Polygon> {
        self.polygons.get(index)
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }
}

impl PolygonMesh for PolyMesh {
    fn num_polygons(&self) -> usize {
        self.polygons.len()
    }

    fn polygon_vertex_count(&self, polygon: usize) -> usize {
        self.polygons.get(polygon).map_or(0, Polygon::vertex_count)
    }

    fn vertex_index(&self, polygon: usize, vertex: usize) -> u32 {
        self.polygons
            .get(polygon)
            .and_then(|p| p.vertices.get(vertex))
            .copied()
            .unwrap_or(0)
    }

    fn has_face_vertex_normals(&self) -> bool {
        !self.polygons.is_empty() && self.polygons.iter().all(|p| p.normals.is_some())
    }

    fn normal_index(&self, polygon: usize, vertex: usize) -> Option<u32> {
        self.polygons
            .get(polygon)?
            .normals
            .as_ref()?
            .get(vertex)
            .copied()
    }

    fn uv_set_names(&self) -> &[String] {
        &self.uv_set_names
    }

    fn uv_index(&self, polygon: usize, vertex: usize, uv_set: usize) -> Option<u32> {
        self.polygons.get(polygon)?.uvs.get(uv_set)?.get(vertex).copied()
    }

    fn color_sets(&self) -> &[ColorSet] {
        &self.color_sets
    }

    fn color_index(&self, polygon: usize, vertex: usize, color_set: usize) -> Option<u32> {
        self.polygons
            .get(polygon)?
            .colors
            .get(color_set)?
            .get(vertex)
            .copied()
            .flatten()
    }

    fn is_holed(&self, polygon: usize) -> bool {
        self.polygons
            .get(polygon)
            .map_or(false, |p| !p.hole_sizes.is_empty())
    }

    fn hole_infos(&self) -> &[HoleInfo] {
        &self.holes
    }

    /// Fan triangulation around the first vertex. Holed polygons are not
    /// triangulated.
    fn triangulate(&self, polygon: usize) -> Option<Vec<[usize; 3]>> {
        let p = self.polygons.get(polygon)?;
        if !p.hole_sizes.is_empty() || p.vertex_count() < 3 {
            return None;
        }
        Some((1..p.vertex_count() - 1).map(|i| [0, i, i + 1]).collect())
    }

    fn shaders(&self) -> &[String] {
        &self.shaders
    }

    fn shader_index(&self, polygon: usize) -> Option<usize> {
        self.polygons.get(polygon)?.shader
    }
}
