/// Decoded indices of one texcoord or color channel of a primitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexList {
    name: String,
    set_index: u64,
    stride: u64,
    initial_index: usize,
    indices: Vec<u32>,
}

impl IndexList {
    pub fn new(name: impl Into<String>, set_index: u64, stride: u64, initial_index: usize) -> Self {
        Self {
            name: name.into(),
            set_index,
            stride,
            initial_index,
            indices: Vec::new(),
        }
    }

    /// Id of the source the indices were decoded against.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_index(&self) -> u64 {
        self.set_index
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn initial_index(&self) -> usize {
        self.initial_index
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn indices_mut(&mut self) -> &mut Vec<u32> {
        &mut self.indices
    }

    pub fn push(&mut self, index: u32) {
        self.indices.push(index);
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn truncate(&mut self, len: usize) {
        self.indices.truncate(len);
    }
}
