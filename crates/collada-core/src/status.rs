use thiserror::Error;

use crate::data_types::DataType;
use crate::input::InputSemantic;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColladaError {
    #[error("Source '{0}' is already loaded")]
    AlreadyLoaded(String),
    #[error("Source '{source_id}' has data type {data_type:?}, expected float or double")]
    UnsupportedDataType { source_id: String, data_type: DataType },
    #[error("Source '{source_id}' has stride {stride} for {semantic}, allowed range is {min}..={max}")]
    InvalidStride {
        source_id: String,
        semantic: InputSemantic,
        stride: u64,
        min: u64,
        max: u64,
    },
    #[error("Semantic {0} is not supported for mesh sources")]
    UnsupportedSemantic(InputSemantic),
    #[error("Unknown source: {0}")]
    UnknownSource(String),
}

pub type Status = Result<(), ColladaError>;
