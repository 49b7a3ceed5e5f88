//! Sinks for flattened mesh primitives.
//!
//! [`ColladaPrimitivesWriter`] emits COLLADA 1.4 `<triangles>`, `<polylist>`
//! and `<polygons>` elements to any [`Write`] implementation.
//! [`RecordingWriter`] keeps the primitives in memory.
//!
//! # Example
//!
//! ```ignore
//! use collada_io::primitives_writer::ColladaPrimitivesWriter;
//!
//! let mut writer = ColladaPrimitivesWriter::new(Vec::new()).with_indent_level(3);
//! exporter.export_polygon_sources(&mut writer)?;
//! let xml = String::from_utf8(writer.into_inner()).unwrap();
//! ```

use std::io::{self, Write};

use collada_core::input::InputSemantic;
use thiserror::Error;

/// Element chosen for a flattened primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportType {
    Triangles,
    Polylist,
    Polygons,
}

impl ExportType {
    pub fn element_name(self) -> &'static str {
        match self {
            ExportType::Triangles => "triangles",
            ExportType::Polylist => "polylist",
            ExportType::Polygons => "polygons",
        }
    }
}

/// An `<input>` of a flattened primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveInput {
    pub semantic: InputSemantic,
    /// URI of the referenced element, `#` included.
    pub source: String,
    pub offset: u64,
    pub set: Option<u64>,
}

/// Everything written before the first index of a primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveHeader {
    pub export_type: ExportType,
    /// Number of triangles or polygons, holes excluded.
    pub count: usize,
    pub material: Option<String>,
    pub inputs: Vec<PrimitiveInput>,
    /// Vertex count per polygon, only used by `<polylist>`.
    pub vcount: Vec<u64>,
}

/// Index containers inside a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexElementKind {
    /// `<p>`
    Polygon,
    /// `<ph>`, wraps one `<p>` and its `<h>` elements.
    PolygonWithHoles,
    /// `<h>`
    Hole,
}

impl IndexElementKind {
    pub fn tag(self) -> &'static str {
        match self {
            IndexElementKind::Polygon => "p",
            IndexElementKind::PolygonWithHoles => "ph",
            IndexElementKind::Hole => "h",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriterStateError {
    #[error("No primitive is open")]
    NoPrimitive,
    #[error("A primitive is already open")]
    PrimitiveOpen,
    #[error("<{0}> is not allowed here")]
    Misplaced(&'static str),
    #[error("Index written outside of <p> or <h>")]
    IndexOutsideElement,
    #[error("No element is open")]
    NoElement,
    #[error("Primitive closed with open elements")]
    UnclosedElements,
}

impl From<WriterStateError> for io::Error {
    fn from(err: WriterStateError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, err)
    }
}

/// Receives flattened primitives from the polygon exporter.
pub trait PrimitivesWriter {
    fn open_primitive(&mut self, header: &PrimitiveHeader) -> io::Result<()>;

    fn open_element(&mut self, kind: IndexElementKind) -> io::Result<()>;

    fn append_index(&mut self, index: u32) -> io::Result<()>;

    fn close_element(&mut self) -> io::Result<()>;

    fn close_primitive(&mut self) -> io::Result<()>;

    fn append_indices(&mut self, indices: &[u32]) -> io::Result<()> {
        for &index in indices {
            self.append_index(index)?;
        }
        Ok(())
    }
}

/// Tracks which elements are open and rejects misplaced calls.
#[derive(Debug, Clone, Default)]
struct ElementStack {
    primitive_open: bool,
    open: Vec<IndexElementKind>,
}

impl ElementStack {
    fn open_primitive(&mut self) -> Result<(), WriterStateError> {
        if self.primitive_open {
            return Err(WriterStateError::PrimitiveOpen);
        }
        self.primitive_open = true;
        Ok(())
    }

    fn open(&mut self, kind: IndexElementKind) -> Result<(), WriterStateError> {
        if !self.primitive_open {
            return Err(WriterStateError::NoPrimitive);
        }
        let parent = self.open.last().copied();
        let allowed = match kind {
            IndexElementKind::Polygon => {
                matches!(parent, None | Some(IndexElementKind::PolygonWithHoles))
            }
            IndexElementKind::PolygonWithHoles => parent.is_none(),
            IndexElementKind::Hole => parent == Some(IndexElementKind::PolygonWithHoles),
        };
        if !allowed {
            return Err(WriterStateError::Misplaced(kind.tag()));
        }
        self.open.push(kind);
        Ok(())
    }

    fn check_index(&self) -> Result<(), WriterStateError> {
        match self.open.last() {
            Some(IndexElementKind::Polygon) | Some(IndexElementKind::Hole) => Ok(()),
            _ => Err(WriterStateError::IndexOutsideElement),
        }
    }

    fn close(&mut self) -> Result<IndexElementKind, WriterStateError> {
        self.open.pop().ok_or(WriterStateError::NoElement)
    }

    fn close_primitive(&mut self) -> Result<(), WriterStateError> {
        if !self.primitive_open {
            return Err(WriterStateError::NoPrimitive);
        }
        if !self.open.is_empty() {
            return Err(WriterStateError::UnclosedElements);
        }
        self.primitive_open = false;
        Ok(())
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Writes primitives as indented COLLADA text.
#[derive(Debug)]
pub struct ColladaPrimitivesWriter<W: Write> {
    out: W,
    indent: &'static str,
    level: usize,
    stack: ElementStack,
    element_empty: bool,
    export_type: Option<ExportType>,
}

impl<W: Write> ColladaPrimitivesWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            indent: "  ",
            level: 0,
            stack: ElementStack::default(),
            element_empty: true,
            export_type: None,
        }
    }

    /// Nesting level of the primitive elements, e.g. 3 inside
    /// `<library_geometries><geometry><mesh>`.
    pub fn with_indent_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    pub fn with_tabs(mut self) -> Self {
        self.indent = "\t";
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn write_indent(&mut self) -> io::Result<()> {
        for _ in 0..self.level {
            self.out.write_all(self.indent.as_bytes())?;
        }
        Ok(())
    }

    fn write_input(&mut self, input: &PrimitiveInput) -> io::Result<()> {
        self.write_indent()?;
        write!(
            self.out,
            "<input semantic=\"{}\" source=\"{}\" offset=\"{}\"",
            input.semantic,
            escape_attribute(&input.source),
            input.offset
        )?;
        if let Some(set) = input.set {
            write!(self.out, " set=\"{}\"", set)?;
        }
        self.out.write_all(b"/>\n")
    }
}

impl<W: Write> PrimitivesWriter for ColladaPrimitivesWriter<W> {
    fn open_primitive(&mut self, header: &PrimitiveHeader) -> io::Result<()> {
        self.stack.open_primitive()?;
        self.export_type = Some(header.export_type);

        self.write_indent()?;
        write!(
            self.out,
            "<{} count=\"{}\"",
            header.export_type.element_name(),
            header.count
        )?;
        if let Some(material) = &header.material {
            write!(self.out, " material=\"{}\"", escape_attribute(material))?;
        }
        self.out.write_all(b">\n")?;
        self.level += 1;

        for input in &header.inputs {
            self.write_input(input)?;
        }
        if header.export_type == ExportType::Polylist {
            self.write_indent()?;
            self.out.write_all(b"<vcount>")?;
            for (i, count) in header.vcount.iter().enumerate() {
                if i > 0 {
                    self.out.write_all(b" ")?;
                }
                write!(self.out, "{}", count)?;
            }
            self.out.write_all(b"</vcount>\n")?;
        }
        Ok(())
    }

    fn open_element(&mut self, kind: IndexElementKind) -> io::Result<()> {
        self.stack.open(kind)?;
        self.write_indent()?;
        write!(self.out, "<{}>", kind.tag())?;
        if kind == IndexElementKind::PolygonWithHoles {
            self.out.write_all(b"\n")?;
            self.level += 1;
        }
        self.element_empty = true;
        Ok(())
    }

    fn append_index(&mut self, index: u32) -> io::Result<()> {
        self.stack.check_index()?;
        if !self.element_empty {
            self.out.write_all(b" ")?;
        }
        write!(self.out, "{}", index)?;
        self.element_empty = false;
        Ok(())
    }

    fn close_element(&mut self) -> io::Result<()> {
        let kind = self.stack.close()?;
        if kind == IndexElementKind::PolygonWithHoles {
            self.level = self.level.saturating_sub(1);
            self.write_indent()?;
        }
        writeln!(self.out, "</{}>", kind.tag())
    }

    fn close_primitive(&mut self) -> io::Result<()> {
        self.stack.close_primitive()?;
        self.level = self.level.saturating_sub(1);
        self.write_indent()?;
        let name = self.export_type.take().map_or("triangles", ExportType::element_name);
        writeln!(self.out, "</{}>", name)?;
        self.out.flush()
    }
}

/// Index content of a recorded primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedElement {
    P(Vec<u32>),
    Ph { polygon: Vec<u32>, holes: Vec<Vec<u32>> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPrimitive {
    pub header: PrimitiveHeader,
    pub elements: Vec<RecordedElement>,
}

impl RecordedPrimitive {
    /// All indices in document order.
    pub fn indices(&self) -> Vec<u32> {
        let mut indices = Vec::new();
        for element in &self.elements {
            match element {
                RecordedElement::P(values) => indices.extend_from_slice(values),
                RecordedElement::Ph { polygon, holes } => {
                    indices.extend_from_slice(polygon);
                    for hole in holes {
                        indices.extend_from_slice(hole);
                    }
                }
            }
        }
        indices
    }
}

/// Keeps written primitives in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingWriter {
    primitives: Vec<RecordedPrimitive>,
    current: Option<RecordedPrimitive>,
    stack: ElementStack,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitives(&self) -> &[RecordedPrimitive] {
        &self.primitives
    }

    pub fn into_primitives(self) -> Vec<RecordedPrimitive> {
        self.primitives
    }

    fn target(&mut self) -> Result<&mut Vec<u32>, WriterStateError> {
        let kind = self.stack.open.last().copied();
        let element = self
            .current
            .as_mut()
            .and_then(|primitive| primitive.elements.last_mut())
            .ok_or(WriterStateError::IndexOutsideElement)?;
        match (kind, element) {
            (Some(IndexElementKind::Polygon), RecordedElement::P(values)) => Ok(values),
            (Some(IndexElementKind::Polygon), RecordedElement::Ph { polygon, .. }) => Ok(polygon),
            (Some(IndexElementKind::Hole), RecordedElement::Ph { holes, .. }) => {
                holes.last_mut().ok_or(WriterStateError::IndexOutsideElement)
            }
            _ => Err(WriterStateError::IndexOutsideElement),
        }
    }
}

impl PrimitivesWriter for RecordingWriter {
    fn open_primitive(&mut self, header: &PrimitiveHeader) -> io::Result<()> {
        self.stack.open_primitive()?;
        self.current = Some(RecordedPrimitive {
            header: header.clone(),
            elements: Vec::new(),
        });
        Ok(())
    }

    fn open_element(&mut self, kind: IndexElementKind) -> io::Result<()> {
        let in_ph = self.stack.open.last() == Some(&IndexElementKind::PolygonWithHoles);
        self.stack.open(kind)?;
        let Some(primitive) = self.current.as_mut() else {
            return Err(WriterStateError::NoPrimitive.into());
        };
        match kind {
            IndexElementKind::Polygon if !in_ph => {
                primitive.elements.push(RecordedElement::P(Vec::new()))
            }
            IndexElementKind::Polygon => {}
            IndexElementKind::PolygonWithHoles => primitive.elements.push(RecordedElement::Ph {
                polygon: Vec::new(),
                holes: Vec::new(),
            }),
            IndexElementKind::Hole => {
                if let Some(RecordedElement::Ph { holes, .. }) = primitive.elements.last_mut() {
                    holes.push(Vec::new());
                }
            }
        }
        Ok(())
    }

    fn append_index(&mut self, index: u32) -> io::Result<()> {
        self.stack.check_index()?;
        self.target()?.push(index);
        Ok(())
    }

    fn close_element(&mut self) -> io::Result<()> {
        self.stack.close()?;
        Ok(())
    }

    fn close_primitive(&mut self) -> io::Result<()> {
        self.stack.close_primitive()?;
        if let Some(primitive) = self.current.take() {
            self.primitives.push(primitive);
        }
        Ok(())
    }
}
