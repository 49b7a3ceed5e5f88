//! Callback-driven decoder of a COLLADA `<mesh>` element.
//!
//! An XML front end reports elements and character data through the
//! `begin_*`, `data_*` and `end_*` methods. Character data may arrive in any
//! number of chunks; all decoding state lives in the loader between calls.
//! Every callback returns `false` when the call was ignored, which a parser
//! may treat as a request to keep going.

use crate::data_types::DataType;
use crate::geometry_indices::FaceIndex;
use crate::index_list::IndexList;
use crate::input::{
    InputSemantic, InputShared, InputUnshared, MeshPrimitiveInputList, Vertices,
};
use crate::material_id_info::MaterialIdInfo;
use crate::mesh::Mesh;
use crate::mesh_primitive::{IndexArrayLengths, MeshPrimitive, PrimitiveType};
use crate::source::{AccessorParameter, Source, SourceList, SourceValues};
use crate::source_array_merger::{merge_source_element, COLOR_STRIDE_RANGE, UV_STRIDE_RANGE};
use crate::status::ColladaError;

/// Receives finished meshes, typically a host application importer.
pub trait GeometryWriter {
    fn write_geometry(&mut self, mesh: Mesh) -> bool;
}

impl GeometryWriter for Vec<Mesh> {
    fn write_geometry(&mut self, mesh: Mesh) -> bool {
        self.push(mesh);
        true
    }
}

/// Primitive elements of a `<mesh>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveElement {
    Triangles,
    Polylist,
    Polygons,
    Tristrips,
    Trifans,
}

impl PrimitiveElement {
    pub fn primitive_type(self) -> PrimitiveType {
        match self {
            PrimitiveElement::Triangles => PrimitiveType::Triangles,
            PrimitiveElement::Polylist | PrimitiveElement::Polygons => PrimitiveType::Polygons,
            PrimitiveElement::Tristrips => PrimitiveType::Tristrips,
            PrimitiveElement::Trifans => PrimitiveType::Trifans,
        }
    }

    pub fn element_name(self) -> &'static str {
        match self {
            PrimitiveElement::Triangles => "triangles",
            PrimitiveElement::Polylist => "polylist",
            PrimitiveElement::Polygons => "polygons",
            PrimitiveElement::Tristrips => "tristrips",
            PrimitiveElement::Trifans => "trifans",
        }
    }
}

/// Attributes of a primitive element's begin tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimitiveAttributes {
    pub count: Option<usize>,
    pub material: Option<String>,
}

impl PrimitiveAttributes {
    pub fn new(count: usize, material: impl Into<String>) -> Self {
        Self {
            count: Some(count),
            material: Some(material.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Idle,
    DeclaringInputs,
    ReadingVCount,
    ReadingIndices,
    ReadingHoleIndices,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexElement {
    P,
    H,
}

#[derive(Debug, Clone, Copy)]
struct SemanticOffset {
    offset: u64,
    correction: u64,
}

/// A texcoord or color input being decoded.
#[derive(Debug, Clone)]
struct ChannelInput {
    offset: u64,
    correction: u64,
    stride: u64,
    set: u64,
    name: String,
    initial_index: usize,
    slot: Option<usize>,
}

impl ChannelInput {
    fn index_list(&self) -> IndexList {
        IndexList::new(self.name.clone(), self.set, self.stride, self.initial_index)
    }
}

/// Upper bound for buffers pre-sized from `count` attributes.
const MAX_PRESIZE: usize = 1 << 20;

fn presize(count: usize, per_item: usize) -> usize {
    count.saturating_mul(per_item).min(MAX_PRESIZE)
}

fn vertex_count_entry(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

fn corrected(value: u64, correction: u64) -> u32 {
    u32::try_from(value.saturating_add(correction)).unwrap_or(u32::MAX)
}

fn push_channel(lists: &mut Vec<IndexList>, channel: &mut ChannelInput, value: u64) {
    let slot = match channel.slot {
        Some(slot) => slot,
        None => {
            lists.push(channel.index_list());
            let slot = lists.len() - 1;
            channel.slot = Some(slot);
            slot
        }
    };
    lists[slot].push(corrected(value, channel.correction));
}

/// Walks an offset-interleaved index stream and de-interleaves it into the
/// index arrays of a primitive.
#[derive(Debug, Clone, Default)]
struct IndexStreamDecoder {
    position: Option<SemanticOffset>,
    normal: Option<SemanticOffset>,
    uv_channels: Vec<ChannelInput>,
    color_channels: Vec<ChannelInput>,
    max_offset: u64,
    offset_counter: u64,
    tuple_count: usize,
}

impl IndexStreamDecoder {
    fn begin_element(&mut self) {
        self.offset_counter = 0;
        self.tuple_count = 0;
    }

    fn decode(&mut self, primitive: &mut MeshPrimitive, data: &[u64]) {
        for &value in data {
            let k = self.offset_counter;
            if let Some(position) = self.position.filter(|p| p.offset == k) {
                primitive
                    .position_indices_mut()
                    .push(corrected(value, position.correction));
            }
            if let Some(normal) = self.normal.filter(|n| n.offset == k) {
                primitive
                    .normal_indices_mut()
                    .push(corrected(value, normal.correction));
            }
            for channel in self.uv_channels.iter_mut().filter(|c| c.offset == k) {
                push_channel(primitive.uv_coord_indices_mut(), channel, value);
            }
            for channel in self.color_channels.iter_mut().filter(|c| c.offset == k) {
                push_channel(primitive.color_indices_mut(), channel, value);
            }
            if k >= self.max_offset {
                self.offset_counter = 0;
                self.tuple_count += 1;
            } else {
                self.offset_counter += 1;
            }
        }
    }

    fn has_partial_tuple(&self) -> bool {
        self.offset_counter != 0
    }
}

/// Decodes one `<mesh>` into a [`Mesh`].
#[derive(Debug)]
pub struct MeshLoader {
    mesh: Mesh,
    sources: SourceList,
    current_source: Option<Source>,
    vertices: Vertices,
    in_vertices: bool,
    material_ids: MaterialIdInfo,
    state: LoaderState,
    element: Option<PrimitiveElement>,
    open_index_element: Option<IndexElement>,
    primitive: Option<MeshPrimitive>,
    inputs: MeshPrimitiveInputList,
    decoder: IndexStreamDecoder,
    element_start: IndexArrayLengths,
    vertex_count: usize,
    expected_vertex_count: usize,
    vcount_entries: usize,
    face_count: usize,
    strip_count: usize,
    hole_face: Option<FaceIndex>,
}

impl MeshLoader {
    /// Creates a loader for the geometry `id`. An empty `name` falls back to
    /// the id.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        let mut name = name.into();
        if name.is_empty() {
            name = id.clone();
        }
        Self {
            mesh: Mesh::new(id, name),
            sources: SourceList::new(),
            current_source: None,
            vertices: Vertices::default(),
            in_vertices: false,
            material_ids: MaterialIdInfo::new(),
            state: LoaderState::Idle,
            element: None,
            open_index_element: None,
            primitive: None,
            inputs: MeshPrimitiveInputList::new(),
            decoder: IndexStreamDecoder::default(),
            element_start: IndexArrayLengths::default(),
            vertex_count: 0,
            expected_vertex_count: 0,
            vcount_entries: 0,
            face_count: 0,
            strip_count: 0,
            hole_face: None,
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn sources(&self) -> &SourceList {
        &self.sources
    }

    pub fn vertices(&self) -> &Vertices {
        &self.vertices
    }

    pub fn material_ids(&self) -> &MaterialIdInfo {
        &self.material_ids
    }

    fn unexpected(&self, call: &str) -> bool {
        log::warn!(
            "Mesh '{}': {} ignored in state {:?}",
            self.mesh.id(),
            call,
            self.state
        );
        false
    }

    // ---------------------------------------------------------------------
    // <source>
    // ---------------------------------------------------------------------

    /// Adds a source parsed elsewhere.
    pub fn add_source(&mut self, source: Source) {
        self.sources.push(source);
    }

    pub fn begin_source(&mut self, id: &str) -> bool {
        if self.current_source.is_some() || self.state != LoaderState::Idle {
            return self.unexpected("begin_source");
        }
        self.current_source = Some(Source::new(id, SourceValues::default(), 1));
        true
    }

    fn begin_array(&mut self, values: SourceValues, call: &str) -> bool {
        match self.current_source.as_mut() {
            Some(source) => {
                *source.values_mut() = values;
                true
            }
            None => self.unexpected(call),
        }
    }

    pub fn begin_float_array(&mut self, count: Option<usize>) -> bool {
        let values = SourceValues::Float(Vec::with_capacity(presize(count.unwrap_or(0), 1)));
        self.begin_array(values, "begin_float_array")
    }

    pub fn data_float_array(&mut self, data: &[f32]) -> bool {
        match self.current_source.as_mut().map(Source::values_mut) {
            Some(SourceValues::Float(values)) => {
                values.extend_from_slice(data);
                true
            }
            _ => self.unexpected("data_float_array"),
        }
    }

    pub fn begin_double_array(&mut self, count: Option<usize>) -> bool {
        let values = SourceValues::Double(Vec::with_capacity(presize(count.unwrap_or(0), 1)));
        self.begin_array(values, "begin_double_array")
    }

    pub fn data_double_array(&mut self, data: &[f64]) -> bool {
        match self.current_source.as_mut().map(Source::values_mut) {
            Some(SourceValues::Double(values)) => {
                values.extend_from_slice(data);
                true
            }
            _ => self.unexpected("data_double_array"),
        }
    }

    pub fn begin_int_array(&mut self, count: Option<usize>) -> bool {
        let values = SourceValues::Int(Vec::with_capacity(presize(count.unwrap_or(0), 1)));
        self.begin_array(values, "begin_int_array")
    }

    pub fn data_int_array(&mut self, data: &[i64]) -> bool {
        match self.current_source.as_mut().map(Source::values_mut) {
            Some(SourceValues::Int(values)) => {
                values.extend_from_slice(data);
                true
            }
            _ => self.unexpected("data_int_array"),
        }
    }

    pub fn begin_accessor(&mut self, stride: u64) -> bool {
        match self.current_source.as_mut() {
            Some(source) => {
                source.set_stride(stride);
                true
            }
            None => self.unexpected("begin_accessor"),
        }
    }

    pub fn begin_param(&mut self, name: &str, type_name: &str) -> bool {
        match self.current_source.as_mut() {
            Some(source) => {
                source.add_parameter(AccessorParameter {
                    name: name.to_string(),
                    data_type: DataType::from_param_type(type_name),
                });
                true
            }
            None => self.unexpected("begin_param"),
        }
    }

    pub fn end_source(&mut self) -> bool {
        match self.current_source.take() {
            Some(source) => {
                self.sources.push(source);
                true
            }
            None => self.unexpected("end_source"),
        }
    }

    // ---------------------------------------------------------------------
    // <vertices>
    // ---------------------------------------------------------------------

    pub fn begin_vertices(&mut self, id: &str, name: &str) -> bool {
        if self.in_vertices || self.state != LoaderState::Idle {
            return self.unexpected("begin_vertices");
        }
        self.vertices = Vertices {
            id: id.to_string(),
            name: name.to_string(),
            inputs: Vec::new(),
        };
        self.in_vertices = true;
        true
    }

    pub fn vertices_input(&mut self, semantic: InputSemantic, source: &str) -> bool {
        if !self.in_vertices {
            return self.unexpected("vertices_input");
        }
        self.vertices.inputs.push(InputUnshared::new(semantic, source));
        true
    }

    pub fn end_vertices(&mut self) -> bool {
        if !self.in_vertices {
            return self.unexpected("end_vertices");
        }
        self.in_vertices = false;
        true
    }

    // ---------------------------------------------------------------------
    // Primitive elements
    // ---------------------------------------------------------------------

    pub fn begin_primitive(
        &mut self,
        element: PrimitiveElement,
        attributes: &PrimitiveAttributes,
    ) -> bool {
        if self.state != LoaderState::Idle || self.current_source.is_some() {
            return self.unexpected("begin_primitive");
        }
        let mut primitive = MeshPrimitive::new(element.primitive_type());
        let symbol = attributes.material.as_deref().unwrap_or("");
        primitive.set_material_id(self.material_ids.material_id(symbol));
        primitive.set_material(symbol);
        if let Some(count) = attributes.count {
            match element {
                PrimitiveElement::Triangles => primitive.reserve(presize(count, 3)),
                PrimitiveElement::Polylist | PrimitiveElement::Polygons => {
                    primitive.reserve(presize(count, 4))
                }
                PrimitiveElement::Tristrips | PrimitiveElement::Trifans => {}
            }
        }

        self.primitive = Some(primitive);
        self.element = Some(element);
        self.inputs.clear();
        self.decoder = IndexStreamDecoder::default();
        self.open_index_element = None;
        self.vertex_count = 0;
        self.expected_vertex_count = 0;
        self.vcount_entries = 0;
        self.face_count = 0;
        self.strip_count = 0;
        self.hole_face = None;
        self.state = LoaderState::DeclaringInputs;
        true
    }

    pub fn primitive_input(
        &mut self,
        semantic: InputSemantic,
        source: &str,
        offset: u64,
        set: u64,
    ) -> bool {
        if self.state != LoaderState::DeclaringInputs {
            return self.unexpected("primitive_input");
        }
        self.inputs
            .append_input(InputShared::new(semantic, source, offset, set), &self.vertices);
        true
    }

    /// Merges the sources referenced by the declared inputs and resolves the
    /// offset and index correction of every decoded semantic.
    fn prepare_decoding(&mut self) {
        let mut decoder = IndexStreamDecoder {
            max_offset: self.inputs.max_offset(),
            ..IndexStreamDecoder::default()
        };
        if self.inputs.is_empty() {
            log::warn!("Mesh '{}': primitive without inputs", self.mesh.id());
        }

        for input in self.inputs.inputs() {
            let semantic = input.semantic;
            let Some(source) = self.sources.by_id_mut(input.source_id()) else {
                log::warn!(
                    "Mesh '{}': {}",
                    self.mesh.id(),
                    ColladaError::UnknownSource(input.source_id().to_string())
                );
                continue;
            };
            match merge_source_element(&mut self.mesh, source, semantic) {
                Ok(_) | Err(ColladaError::AlreadyLoaded(_)) => {}
                Err(err) => {
                    log::warn!("Mesh '{}': input {} skipped: {}", self.mesh.id(), semantic, err);
                    continue;
                }
            }
            if !source.data_type().is_floating_point() {
                continue;
            }

            let offset = SemanticOffset {
                offset: input.offset,
                correction: source.index_correction(),
            };
            let stride = source.stride();
            let channel = || ChannelInput {
                offset: input.offset,
                correction: source.index_correction(),
                stride,
                set: input.set,
                name: source.id().to_string(),
                initial_index: source.initial_index(),
                slot: None,
            };
            match semantic {
                InputSemantic::Position => {
                    if decoder.position.is_none() {
                        decoder.position = Some(offset);
                    }
                }
                InputSemantic::Normal => {
                    if stride != 3 {
                        log::debug!(
                            "Mesh '{}': normal source '{}' with stride {} not indexed",
                            self.mesh.id(),
                            source.id(),
                            stride
                        );
                    } else if decoder.normal.is_none() {
                        decoder.normal = Some(offset);
                    }
                }
                InputSemantic::TexCoord | InputSemantic::Uv => {
                    if (UV_STRIDE_RANGE.0..=UV_STRIDE_RANGE.1).contains(&stride) {
                        decoder.uv_channels.push(channel());
                    }
                }
                InputSemantic::Color => {
                    if (COLOR_STRIDE_RANGE.0..=COLOR_STRIDE_RANGE.1).contains(&stride) {
                        decoder.color_channels.push(channel());
                    }
                }
                _ => {}
            }
        }
        self.decoder = decoder;
    }

    fn leave_declaring_inputs(&mut self) {
        if self.state == LoaderState::DeclaringInputs {
            self.prepare_decoding();
            self.state = LoaderState::ReadingIndices;
        }
    }

    pub fn begin_vcount(&mut self) -> bool {
        if self.state != LoaderState::DeclaringInputs
            || self.element != Some(PrimitiveElement::Polylist)
        {
            return self.unexpected("begin_vcount");
        }
        self.leave_declaring_inputs();
        self.state = LoaderState::ReadingVCount;
        true
    }

    pub fn data_vcount(&mut self, data: &[u64]) -> bool {
        if self.state != LoaderState::ReadingVCount {
            return self.unexpected("data_vcount");
        }
        let Some(primitive) = self.primitive.as_mut() else {
            return false;
        };
        for &count in data {
            let count = usize::try_from(count).unwrap_or(usize::MAX);
            primitive.append_grouped_vertices_vertex_count(vertex_count_entry(count));
            self.expected_vertex_count = self.expected_vertex_count.saturating_add(count);
            self.vcount_entries += 1;
        }
        true
    }

    pub fn end_vcount(&mut self) -> bool {
        if self.state != LoaderState::ReadingVCount {
            return self.unexpected("end_vcount");
        }
        self.state = LoaderState::ReadingIndices;
        true
    }

    fn begin_index_element(&mut self, element: IndexElement) {
        self.open_index_element = Some(element);
        self.decoder.begin_element();
        if let Some(primitive) = self.primitive.as_ref() {
            self.element_start = primitive.index_array_lengths();
        }
    }

    /// Closes a `<p>` or `<h>`. Entries of an incomplete trailing tuple are
    /// dropped. Returns the number of complete tuples.
    fn end_index_element(&mut self) -> usize {
        self.open_index_element = None;
        let tuples = self.decoder.tuple_count;
        if self.decoder.has_partial_tuple() {
            log::debug!(
                "Mesh '{}': dropping incomplete index tuple",
                self.mesh.id()
            );
            if let Some(primitive) = self.primitive.as_mut() {
                primitive.truncate_after(&self.element_start, tuples);
            }
            self.decoder.offset_counter = 0;
        }
        tuples
    }

    pub fn begin_p(&mut self) -> bool {
        self.leave_declaring_inputs();
        let allowed = matches!(
            self.state,
            LoaderState::ReadingIndices | LoaderState::ReadingHoleIndices
        );
        if !allowed || self.open_index_element.is_some() {
            return self.unexpected("begin_p");
        }
        self.begin_index_element(IndexElement::P);
        true
    }

    pub fn data_p(&mut self, data: &[u64]) -> bool {
        if self.open_index_element != Some(IndexElement::P) {
            return self.unexpected("data_p");
        }
        match self.primitive.as_mut() {
            Some(primitive) => {
                self.decoder.decode(primitive, data);
                true
            }
            None => false,
        }
    }

    pub fn end_p(&mut self) -> bool {
        if self.open_index_element != Some(IndexElement::P) {
            return self.unexpected("end_p");
        }
        let tuples = self.end_index_element();
        let Some(element) = self.element else {
            return false;
        };
        let Some(primitive) = self.primitive.as_mut() else {
            return false;
        };
        match element {
            PrimitiveElement::Triangles | PrimitiveElement::Polylist => {
                self.vertex_count += tuples;
            }
            PrimitiveElement::Polygons => {
                if self.state == LoaderState::ReadingHoleIndices {
                    self.hole_face = None;
                }
                if tuples == 0 {
                    log::debug!("Mesh '{}': empty polygon ignored", self.mesh.id());
                } else {
                    primitive.append_grouped_vertices_vertex_count(vertex_count_entry(tuples));
                    if self.state == LoaderState::ReadingHoleIndices {
                        self.hole_face = Some(FaceIndex::from(self.face_count));
                    }
                    self.face_count += 1;
                    self.vertex_count += tuples;
                }
            }
            PrimitiveElement::Tristrips | PrimitiveElement::Trifans => {
                if tuples >= 3 {
                    primitive.append_grouped_vertices_vertex_count(vertex_count_entry(tuples));
                    self.face_count += tuples - 2;
                    self.strip_count += 1;
                    self.vertex_count += tuples;
                } else {
                    log::debug!(
                        "Mesh '{}': {} run of {} vertices erased",
                        self.mesh.id(),
                        element.element_name(),
                        tuples
                    );
                    primitive.restore_index_array_lengths(&self.element_start);
                }
            }
        }
        true
    }

    pub fn begin_ph(&mut self) -> bool {
        self.leave_declaring_inputs();
        if self.state != LoaderState::ReadingIndices
            || self.open_index_element.is_some()
            || self.element != Some(PrimitiveElement::Polygons)
        {
            return self.unexpected("begin_ph");
        }
        self.hole_face = None;
        self.state = LoaderState::ReadingHoleIndices;
        true
    }

    pub fn end_ph(&mut self) -> bool {
        if self.state != LoaderState::ReadingHoleIndices || self.open_index_element.is_some() {
            return self.unexpected("end_ph");
        }
        self.hole_face = None;
        self.state = LoaderState::ReadingIndices;
        true
    }

    pub fn begin_h(&mut self) -> bool {
        if self.state != LoaderState::ReadingHoleIndices || self.open_index_element.is_some() {
            return self.unexpected("begin_h");
        }
        self.begin_index_element(IndexElement::H);
        true
    }

    /// Hole data is only decoded when the `<ph>` produced a polygon.
    pub fn data_h(&mut self, data: &[u64]) -> bool {
        if self.open_index_element != Some(IndexElement::H) {
            return self.unexpected("data_h");
        }
        if self.hole_face.is_none() {
            return true;
        }
        match self.primitive.as_mut() {
            Some(primitive) => {
                self.decoder.decode(primitive, data);
                true
            }
            None => false,
        }
    }

    pub fn end_h(&mut self) -> bool {
        if self.open_index_element != Some(IndexElement::H) {
            return self.unexpected("end_h");
        }
        let tuples = self.end_index_element();
        let Some(face) = self.hole_face else {
            log::debug!(
                "Mesh '{}': hole without enclosing polygon ignored",
                self.mesh.id()
            );
            return true;
        };
        if tuples > 0 {
            if let Some(primitive) = self.primitive.as_mut() {
                primitive.append_polygon_hole(face, tuples);
                self.vertex_count += tuples;
            }
        }
        true
    }

    pub fn end_primitive(&mut self) -> bool {
        self.leave_declaring_inputs();
        if self.state != LoaderState::ReadingIndices || self.open_index_element.is_some() {
            return self.unexpected("end_primitive");
        }
        self.state = LoaderState::Idle;
        self.inputs.clear();
        let (Some(element), Some(mut primitive)) = (self.element.take(), self.primitive.take())
        else {
            return false;
        };

        let face_count = match element {
            PrimitiveElement::Triangles => {
                let faces = self.vertex_count / 3;
                primitive.truncate_index_arrays(faces * 3);
                faces
            }
            PrimitiveElement::Polylist => {
                if self.vertex_count >= self.expected_vertex_count && self.vertex_count > 0 {
                    primitive.truncate_index_arrays(self.expected_vertex_count);
                    self.vcount_entries
                } else {
                    log::debug!(
                        "Mesh '{}': polylist supplies {} of {} vertices",
                        self.mesh.id(),
                        self.vertex_count,
                        self.expected_vertex_count
                    );
                    0
                }
            }
            PrimitiveElement::Polygons => self.face_count,
            PrimitiveElement::Tristrips | PrimitiveElement::Trifans => {
                primitive.set_grouped_vertex_elements_count(self.strip_count);
                self.face_count
            }
        };

        if face_count == 0 {
            log::debug!(
                "Mesh '{}': discarding empty <{}>",
                self.mesh.id(),
                element.element_name()
            );
            return true;
        }
        primitive.set_face_count(face_count);
        self.mesh.add_primitive(primitive);
        true
    }

    /// Hands the finished mesh to `writer`.
    pub fn end_mesh<W: GeometryWriter + ?Sized>(self, writer: &mut W) -> bool {
        let mesh = self.into_mesh();
        writer.write_geometry(mesh)
    }

    pub fn into_mesh(self) -> Mesh {
        if self.state != LoaderState::Idle {
            log::warn!(
                "Mesh '{}': unfinished <{}> dropped",
                self.mesh.id(),
                self.element.map_or("primitive", PrimitiveElement::element_name)
            );
        }
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader_with_positions(count: usize) -> MeshLoader {
        let mut loader = MeshLoader::new("geom", "");
        loader.add_source(Source::new_float("pos", vec![0.0; count * 3], 3));
        loader.begin_vertices("verts", "");
        loader.vertices_input(InputSemantic::Position, "#pos");
        loader.end_vertices();
        loader
    }

    #[test]
    fn test_name_falls_back_to_id() {
        let loader = MeshLoader::new("geom-id", "");
        assert_eq!(loader.mesh().name(), "geom-id");
        let loader = MeshLoader::new("geom-id", "Box");
        assert_eq!(loader.mesh().name(), "Box");
    }

    #[test]
    fn test_source_callbacks() {
        let mut loader = MeshLoader::new("geom", "");
        assert!(loader.begin_source("pos"));
        assert!(loader.begin_float_array(Some(6)));
        assert!(loader.data_float_array(&[0.0, 1.0]));
        assert!(loader.data_float_array(&[2.0, 3.0, 4.0, 5.0]));
        assert!(!loader.data_double_array(&[1.0]));
        assert!(loader.begin_accessor(3));
        assert!(loader.begin_param("X", "float"));
        assert!(loader.end_source());

        let source = loader.sources().by_id("pos").unwrap();
        assert_eq!(source.value_count(), 6);
        assert_eq!(source.stride(), 3);
        assert_eq!(source.parameters()[0].data_type, DataType::Float32);
    }

    #[test]
    fn test_triangles_with_partial_tuple() {
        let mut loader = loader_with_positions(4);
        loader.add_source(Source::new_float("nrm", vec![0.0; 6], 3));
        loader.begin_primitive(PrimitiveElement::Triangles, &PrimitiveAttributes::new(1, "mat"));
        loader.primitive_input(InputSemantic::Vertex, "#verts", 0, 0);
        loader.primitive_input(InputSemantic::Normal, "#nrm", 1, 0);
        loader.begin_p();
        loader.data_p(&[0, 0, 1, 1, 2]);
        loader.data_p(&[0, 3]);
        loader.end_p();
        loader.end_primitive();

        let mesh = loader.into_mesh();
        let primitive = &mesh.primitives()[0];
        assert_eq!(primitive.face_count(), 1);
        assert_eq!(primitive.position_indices(), &[0, 1, 2]);
        assert_eq!(primitive.normal_indices(), &[0, 1, 0]);
        assert_eq!(primitive.material(), "mat");
    }

    #[test]
    fn test_calls_in_wrong_state_are_ignored() {
        let mut loader = loader_with_positions(3);
        assert!(!loader.begin_p());
        assert!(!loader.data_p(&[0, 1, 2]));
        assert!(!loader.end_primitive());
        assert!(loader.begin_primitive(PrimitiveElement::Triangles, &PrimitiveAttributes::default()));
        assert!(!loader.begin_vcount());
        assert!(!loader.begin_primitive(PrimitiveElement::Triangles, &PrimitiveAttributes::default()));
        assert_eq!(loader.state(), LoaderState::DeclaringInputs);
    }

    #[test]
    fn test_polygons_with_hole() {
        let mut loader = loader_with_positions(7);
        loader.begin_primitive(PrimitiveElement::Polygons, &PrimitiveAttributes::new(1, ""));
        loader.primitive_input(InputSemantic::Vertex, "#verts", 0, 0);
        loader.begin_ph();
        loader.begin_p();
        loader.data_p(&[0, 1, 2, 3]);
        loader.end_p();
        loader.begin_h();
        loader.data_h(&[4, 5, 6]);
        loader.end_h();
        loader.end_ph();
        loader.end_primitive();

        let mesh = loader.into_mesh();
        let primitive = &mesh.primitives()[0];
        assert_eq!(primitive.face_count(), 1);
        assert_eq!(primitive.grouped_vertices_vertex_count(), &[4, -3]);
        assert_eq!(primitive.polygon_holes()[0].face, FaceIndex(0));
        assert_eq!(primitive.position_indices(), &[0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_hole_after_empty_polygon_ignored() {
        let mut loader = loader_with_positions(3);
        loader.begin_primitive(PrimitiveElement::Polygons, &PrimitiveAttributes::default());
        loader.primitive_input(InputSemantic::Vertex, "#verts", 0, 0);
        loader.begin_p();
        loader.data_p(&[0, 1, 2]);
        loader.end_p();
        loader.begin_ph();
        loader.begin_p();
        loader.end_p();
        loader.begin_h();
        loader.data_h(&[0, 1, 2]);
        loader.end_h();
        loader.end_ph();
        loader.end_primitive();

        let mesh = loader.into_mesh();
        let primitive = &mesh.primitives()[0];
        assert_eq!(primitive.face_count(), 1);
        assert_eq!(primitive.grouped_vertices_vertex_count(), &[3]);
        assert_eq!(primitive.position_indices().len(), 3);
        assert_eq!(primitive.num_polygon_holes(), 0);
    }

    #[test]
    fn test_material_ids_per_symbol() {
        let mut loader = loader_with_positions(3);
        for material in ["a", "b", "a"] {
            loader.begin_primitive(PrimitiveElement::Triangles, &PrimitiveAttributes::new(1, material));
            loader.primitive_input(InputSemantic::Vertex, "#verts", 0, 0);
            loader.begin_p();
            loader.data_p(&[0, 1, 2]);
            loader.end_p();
            loader.end_primitive();
        }
        let mut meshes: Vec<Mesh> = Vec::new();
        assert!(loader.end_mesh(&mut meshes));
        let ids: Vec<u64> = meshes[0].primitives().iter().map(|p| p.material_id().0).collect();
        assert_eq!(ids, vec![0, 1, 0]);
    }
}
