/// Options of the polygon exporter.
///
/// # Example
///
/// ```ignore
/// let options = ExportOptions::new()
///     .with_triangulation(true)
///     .with_duplicate_vertex_removal(false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Export every polygon as triangles when the host can triangulate all of them.
    pub triangulate: bool,
    /// Drop repeated mesh vertices inside a polygon before writing it.
    pub remove_duplicate_vertices: bool,
    /// Suffix appended to the mesh id to reference the `<vertices>` element.
    pub vertices_suffix: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self {
            triangulate: false,
            remove_duplicate_vertices: false,
            vertices_suffix: "-vertices".to_string(),
        }
    }

    pub fn with_triangulation(mut self, triangulate: bool) -> Self {
        self.triangulate = triangulate;
        self
    }

    pub fn with_duplicate_vertex_removal(mut self, remove: bool) -> Self {
        self.remove_duplicate_vertices = remove;
        self
    }

    pub fn with_vertices_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.vertices_suffix = suffix.into();
        self
    }

    /// Id of the `<vertices>` element of the mesh `mesh_id`.
    pub fn vertices_id(&self, mesh_id: &str) -> String {
        format!("{}{}", mesh_id, self.vertices_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = ExportOptions::new()
            .with_triangulation(true)
            .with_vertices_suffix("-verts");
        assert!(options.triangulate);
        assert!(!options.remove_duplicate_vertices);
        assert_eq!(options.vertices_id("box"), "box-verts");
        assert_eq!(ExportOptions::default().vertices_id("box"), "box-vertices");
    }
}
