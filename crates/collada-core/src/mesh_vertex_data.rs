//! Per-semantic vertex buffers of a mesh.
//!
//! A buffer starts untyped and takes the element type of the first source
//! merged into it. Later sources are converted to that type on append.

use num_traits::{Float, NumCast};

use crate::data_types::DataType;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum VertexValues {
    #[default]
    Empty,
    Float(Vec<f32>),
    Double(Vec<f64>),
}

/// Describes one source merged into a channelled semantic (colors, UV sets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputInfo {
    pub name: String,
    pub stride: u64,
    pub length: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshVertexData {
    values: VertexValues,
    input_infos: Vec<InputInfo>,
}

fn convert<S: NumCast + Copy, T: Float>(values: &[S]) -> impl Iterator<Item = T> + '_ {
    values
        .iter()
        .map(|&v| <T as NumCast>::from(v).unwrap_or_else(T::zero))
}

impl MeshVertexData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_type(&self) -> DataType {
        match self.values {
            VertexValues::Empty => DataType::Invalid,
            VertexValues::Float(_) => DataType::Float32,
            VertexValues::Double(_) => DataType::Float64,
        }
    }

    pub fn values(&self) -> &VertexValues {
        &self.values
    }

    /// Number of scalar values in the buffer.
    pub fn values_count(&self) -> usize {
        match &self.values {
            VertexValues::Empty => 0,
            VertexValues::Float(v) => v.len(),
            VertexValues::Double(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values_count() == 0
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.values {
            VertexValues::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match &self.values {
            VertexValues::Double(v) => Some(v),
            _ => None,
        }
    }

    /// Takes ownership of a first source's values without copying.
    /// Returns false if the buffer already holds data.
    pub fn set_float_data(&mut self, values: Vec<f32>) -> bool {
        if !self.is_empty() {
            return false;
        }
        self.values = VertexValues::Float(values);
        true
    }

    pub fn set_double_data(&mut self, values: Vec<f64>) -> bool {
        if !self.is_empty() {
            return false;
        }
        self.values = VertexValues::Double(values);
        true
    }

    /// Appends values, converting them to the buffer's element type. An
    /// untyped buffer adopts the type of the incoming values.
    pub fn append_values<T>(&mut self, values: &[T])
    where
        T: Float,
    {
        match &mut self.values {
            VertexValues::Float(buffer) => buffer.extend(convert::<T, f32>(values)),
            VertexValues::Double(buffer) => buffer.extend(convert::<T, f64>(values)),
            VertexValues::Empty => {
                if std::mem::size_of::<T>() == std::mem::size_of::<f32>() {
                    self.values = VertexValues::Float(convert::<T, f32>(values).collect());
                } else {
                    self.values = VertexValues::Double(convert::<T, f64>(values).collect());
                }
            }
        }
    }

    pub fn append_input_info(&mut self, name: impl Into<String>, stride: u64, length: usize) {
        self.input_infos.push(InputInfo {
            name: name.into(),
            stride,
            length,
        });
    }

    pub fn input_infos(&self) -> &[InputInfo] {
        &self.input_infos
    }

    pub fn num_input_infos(&self) -> usize {
        self.input_infos.len()
    }

    pub fn clear(&mut self) {
        self.values = VertexValues::Empty;
        self.input_infos.clear();
    }
}
