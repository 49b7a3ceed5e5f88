use crate::data_types::DataType;
use crate::input::uri_fragment;

/// Flat value buffer of a `<source>` element.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceValues {
    Float(Vec<f32>),
    Double(Vec<f64>),
    Int(Vec<i64>),
    Bool(Vec<bool>),
    Name(Vec<String>),
}

impl Default for SourceValues {
    fn default() -> Self {
        SourceValues::Float(Vec::new())
    }
}

impl SourceValues {
    pub fn data_type(&self) -> DataType {
        match self {
            SourceValues::Float(_) => DataType::Float32,
            SourceValues::Double(_) => DataType::Float64,
            SourceValues::Int(_) => DataType::Int32,
            SourceValues::Bool(_) => DataType::Bool,
            SourceValues::Name(_) => DataType::Name,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SourceValues::Float(v) => v.len(),
            SourceValues::Double(v) => v.len(),
            SourceValues::Int(v) => v.len(),
            SourceValues::Bool(v) => v.len(),
            SourceValues::Name(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves the buffer out, leaving an empty buffer of the same type behind.
    pub fn take(&mut self) -> SourceValues {
        let empty = match self {
            SourceValues::Float(_) => SourceValues::Float(Vec::new()),
            SourceValues::Double(_) => SourceValues::Double(Vec::new()),
            SourceValues::Int(_) => SourceValues::Int(Vec::new()),
            SourceValues::Bool(_) => SourceValues::Bool(Vec::new()),
            SourceValues::Name(_) => SourceValues::Name(Vec::new()),
        };
        std::mem::replace(self, empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorParameter {
    pub name: String,
    pub data_type: DataType,
}

/// A `<source>` element of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    id: String,
    values: SourceValues,
    stride: u64,
    parameters: Vec<AccessorParameter>,
    is_loaded: bool,
    initial_index: usize,
    value_count: usize,
}

impl Source {
    pub fn new(id: impl Into<String>, values: SourceValues, stride: u64) -> Self {
        let value_count = values.len();
        Self {
            id: id.into(),
            values,
            stride,
            parameters: Vec::new(),
            is_loaded: false,
            initial_index: 0,
            value_count,
        }
    }

    pub fn new_float(id: impl Into<String>, values: Vec<f32>, stride: u64) -> Self {
        Self::new(id, SourceValues::Float(values), stride)
    }

    pub fn new_double(id: impl Into<String>, values: Vec<f64>, stride: u64) -> Self {
        Self::new(id, SourceValues::Double(values), stride)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data_type(&self) -> DataType {
        self.values.data_type()
    }

    pub fn values(&self) -> &SourceValues {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut SourceValues {
        &mut self.values
    }

    /// Moves the value buffer out of the source. The scalar count is kept so
    /// that offsets can still be computed after an ownership handoff.
    pub fn take_values(&mut self) -> SourceValues {
        self.value_count = self.value_count();
        self.values.take()
    }

    /// Number of scalar values the source held before any handoff.
    pub fn value_count(&self) -> usize {
        self.value_count.max(self.values.len())
    }

    /// Number of logical values (tuples of `stride` scalars).
    pub fn element_count(&self) -> usize {
        match self.stride {
            0 => 0,
            stride => self.value_count() / stride as usize,
        }
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn set_stride(&mut self, stride: u64) {
        self.stride = stride;
    }

    pub fn parameters(&self) -> &[AccessorParameter] {
        &self.parameters
    }

    pub fn add_parameter(&mut self, parameter: AccessorParameter) {
        self.parameters.push(parameter);
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn set_is_loaded(&mut self, is_loaded: bool) {
        self.is_loaded = is_loaded;
    }

    /// Scalar position of this source's first value inside the merged buffer
    /// of its semantic.
    pub fn initial_index(&self) -> usize {
        self.initial_index
    }

    pub fn set_initial_index(&mut self, initial_index: usize) {
        self.initial_index = initial_index;
    }

    /// Index correction applied to raw indices decoded against this source.
    pub fn index_correction(&self) -> u64 {
        match self.stride {
            0 => 0,
            stride => self.initial_index as u64 / stride,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SourceList {
    sources: Vec<Source>,
}

impl SourceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: Source) {
        if self.index_of(source.id()).is_some() {
            log::warn!("Duplicate source id '{}', later definition ignored", source.id());
            return;
        }
        self.sources.push(source);
    }

    fn index_of(&self, uri: &str) -> Option<usize> {
        let id = uri_fragment(uri);
        self.sources.iter().position(|source| source.id == id)
    }

    /// Looks a source up by id or URI fragment.
    pub fn by_id(&self, uri: &str) -> Option<&Source> {
        self.index_of(uri).map(|i| &self.sources[i])
    }

    pub fn by_id_mut(&mut self, uri: &str) -> Option<&mut Source> {
        self.index_of(uri).map(move |i| &mut self.sources[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn clear(&mut self) {
        self.sources.clear();
    }
}
