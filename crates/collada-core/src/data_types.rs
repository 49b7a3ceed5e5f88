/// Value type of a COLLADA `<source>` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Invalid = 0,
    Bool,
    Int32,
    Float32,
    Float64,
    Name,
}

impl DataType {
    pub fn is_floating_point(&self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }

    /// Maps an accessor `<param type="...">` name to a data type.
    pub fn from_param_type(type_name: &str) -> Self {
        match type_name {
            "float" => DataType::Float32,
            "double" => DataType::Float64,
            "int" => DataType::Int32,
            "bool" => DataType::Bool,
            "name" | "Name" | "IDREF" => DataType::Name,
            _ => DataType::Invalid,
        }
    }
}
