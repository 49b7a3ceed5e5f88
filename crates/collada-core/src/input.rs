//! `<input>` declarations of `<vertices>` and of the mesh primitive elements.

use std::fmt;

/// Semantic of a COLLADA `<input>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSemantic {
    Binormal,
    Color,
    Normal,
    Position,
    Tangent,
    TexBinormal,
    TexCoord,
    TexTangent,
    Uv,
    Vertex,
    Unknown,
}

impl InputSemantic {
    /// Parses the value of a `semantic` attribute. Unrecognised names map to
    /// [`InputSemantic::Unknown`].
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "BINORMAL" => InputSemantic::Binormal,
            "COLOR" => InputSemantic::Color,
            "NORMAL" => InputSemantic::Normal,
            "POSITION" => InputSemantic::Position,
            "TANGENT" => InputSemantic::Tangent,
            "TEXBINORMAL" => InputSemantic::TexBinormal,
            "TEXCOORD" => InputSemantic::TexCoord,
            "TEXTANGENT" => InputSemantic::TexTangent,
            "UV" => InputSemantic::Uv,
            "VERTEX" => InputSemantic::Vertex,
            _ => InputSemantic::Unknown,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            InputSemantic::Binormal => "BINORMAL",
            InputSemantic::Color => "COLOR",
            InputSemantic::Normal => "NORMAL",
            InputSemantic::Position => "POSITION",
            InputSemantic::Tangent => "TANGENT",
            InputSemantic::TexBinormal => "TEXBINORMAL",
            InputSemantic::TexCoord => "TEXCOORD",
            InputSemantic::TexTangent => "TEXTANGENT",
            InputSemantic::Uv => "UV",
            InputSemantic::Vertex => "VERTEX",
            InputSemantic::Unknown => "UNKNOWN",
        }
    }

    /// Normals and the geometric tangent frame share one index stream on export.
    pub fn is_normal_like(self) -> bool {
        matches!(
            self,
            InputSemantic::Normal | InputSemantic::Tangent | InputSemantic::Binormal
        )
    }

    pub fn is_tex_coord(self) -> bool {
        matches!(self, InputSemantic::TexCoord | InputSemantic::Uv)
    }
}

impl fmt::Display for InputSemantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the id part of a URI fragment reference such as `"#mesh-positions"`.
///
/// Leading and trailing whitespace is skipped and a missing `#` is tolerated.
pub fn uri_fragment(uri: &str) -> &str {
    let trimmed = uri.trim();
    let without_hash = trimmed.strip_prefix('#').unwrap_or(trimmed);
    match without_hash.find(char::is_whitespace) {
        Some(end) => &without_hash[..end],
        None => without_hash,
    }
}

/// An `<input>` without offset, as found inside `<vertices>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputUnshared {
    pub semantic: InputSemantic,
    pub source: String,
}

impl InputUnshared {
    pub fn new(semantic: InputSemantic, source: impl Into<String>) -> Self {
        Self {
            semantic,
            source: source.into(),
        }
    }

    pub fn source_id(&self) -> &str {
        uri_fragment(&self.source)
    }
}

/// An `<input>` of a mesh primitive, carrying its position in the index tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputShared {
    pub semantic: InputSemantic,
    pub source: String,
    pub offset: u64,
    pub set: u64,
}

impl InputShared {
    pub fn new(semantic: InputSemantic, source: impl Into<String>, offset: u64, set: u64) -> Self {
        Self {
            semantic,
            source: source.into(),
            offset,
            set,
        }
    }

    pub fn source_id(&self) -> &str {
        uri_fragment(&self.source)
    }
}

/// The `<vertices>` element of a mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vertices {
    pub id: String,
    pub name: String,
    pub inputs: Vec<InputUnshared>,
}

impl Vertices {
    pub fn input_by_semantic(&self, semantic: InputSemantic) -> Option<&InputUnshared> {
        self.inputs.iter().find(|input| input.semantic == semantic)
    }
}

/// Inputs declared by the primitive element currently being parsed.
#[derive(Debug, Clone, Default)]
pub struct MeshPrimitiveInputList {
    inputs: Vec<InputShared>,
}

impl MeshPrimitiveInputList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an input. A `VERTEX` input is replaced by the inputs of the
    /// `<vertices>` element, each placed at the `VERTEX` offset and set.
    pub fn append_input(&mut self, input: InputShared, vertices: &Vertices) {
        if input.semantic != InputSemantic::Vertex {
            self.inputs.push(input);
            return;
        }
        if vertices.inputs.is_empty() {
            log::warn!(
                "VERTEX input '{}' references a <vertices> element without inputs",
                input.source
            );
            return;
        }
        for vertex_input in &vertices.inputs {
            self.inputs.push(InputShared::new(
                vertex_input.semantic,
                vertex_input.source.clone(),
                input.offset,
                input.set,
            ));
        }
    }

    pub fn inputs(&self) -> &[InputShared] {
        &self.inputs
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn max_offset(&self) -> u64 {
        self.inputs.iter().map(|input| input.offset).max().unwrap_or(0)
    }

    pub fn position_input(&self) -> Option<&InputShared> {
        self.input_by_semantic(InputSemantic::Position)
    }

    pub fn normal_input(&self) -> Option<&InputShared> {
        self.input_by_semantic(InputSemantic::Normal)
    }

    pub fn input_by_semantic(&self, semantic: InputSemantic) -> Option<&InputShared> {
        self.inputs.iter().find(|input| input.semantic == semantic)
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
    }
}
