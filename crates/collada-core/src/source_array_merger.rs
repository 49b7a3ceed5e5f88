//! Merges the `<source>` arrays of a mesh into one buffer per semantic.
//!
//! Each merged source records its `initial_index`, the number of scalar
//! values already in the semantic's buffer when it was merged. Indices
//! decoded against the source are later shifted by `initial_index / stride`.

use crate::input::InputSemantic;
use crate::mesh::Mesh;
use crate::mesh_vertex_data::MeshVertexData;
use crate::source::{Source, SourceValues};
use crate::status::{ColladaError, Status};

pub const COLOR_STRIDE_RANGE: (u64, u64) = (3, 4);
pub const UV_STRIDE_RANGE: (u64, u64) = (2, 4);

/// Merges `source` into the buffer of `semantic` and returns its initial index.
pub fn merge_source_element(
    mesh: &mut Mesh,
    source: &mut Source,
    semantic: InputSemantic,
) -> Result<usize, ColladaError> {
    match semantic {
        InputSemantic::Position => load_positions_source(mesh, source),
        InputSemantic::Normal => load_normals_source(mesh, source),
        InputSemantic::Color => load_colors_source(mesh, source),
        InputSemantic::TexCoord | InputSemantic::Uv => load_uv_coordinates_source(mesh, source),
        other => {
            log::warn!("Source '{}' has unsupported semantic {}", source.id(), other);
            Err(ColladaError::UnsupportedSemantic(other))
        }
    }
}

pub fn load_positions_source(mesh: &mut Mesh, source: &mut Source) -> Result<usize, ColladaError> {
    check_mergeable(source)?;
    Ok(merge_values(mesh.positions_mut(), source))
}

/// Normal sources of any stride are merged; the decoder only indexes those
/// with stride 3.
pub fn load_normals_source(mesh: &mut Mesh, source: &mut Source) -> Result<usize, ColladaError> {
    check_mergeable(source)?;
    if source.stride() != 3 {
        log::debug!(
            "Normal source '{}' has stride {}, its indices will be ignored",
            source.id(),
            source.stride()
        );
    }
    Ok(merge_values(mesh.normals_mut(), source))
}

pub fn load_colors_source(mesh: &mut Mesh, source: &mut Source) -> Result<usize, ColladaError> {
    load_channel_source(mesh.colors_mut(), source, InputSemantic::Color, COLOR_STRIDE_RANGE)
}

pub fn load_uv_coordinates_source(
    mesh: &mut Mesh,
    source: &mut Source,
) -> Result<usize, ColladaError> {
    load_channel_source(mesh.uv_coords_mut(), source, InputSemantic::TexCoord, UV_STRIDE_RANGE)
}

fn load_channel_source(
    data: &mut MeshVertexData,
    source: &mut Source,
    semantic: InputSemantic,
    (min, max): (u64, u64),
) -> Result<usize, ColladaError> {
    check_mergeable(source)?;
    let stride = source.stride();
    if stride < min || stride > max {
        log::warn!(
            "Source '{}' has stride {} for {}, expected {}..={}",
            source.id(),
            stride,
            semantic,
            min,
            max
        );
        source.set_is_loaded(true);
        return Err(ColladaError::InvalidStride {
            source_id: source.id().to_string(),
            semantic,
            stride,
            min,
            max,
        });
    }
    let length = source.value_count();
    let initial_index = merge_values(data, source);
    data.append_input_info(source.id(), stride, length);
    Ok(initial_index)
}

fn check_mergeable(source: &mut Source) -> Status {
    if source.is_loaded() {
        return Err(ColladaError::AlreadyLoaded(source.id().to_string()));
    }
    let data_type = source.data_type();
    if !data_type.is_floating_point() {
        log::warn!(
            "Source '{}' has data type {:?}, only float and double arrays are merged",
            source.id(),
            data_type
        );
        source.set_is_loaded(true);
        return Err(ColladaError::UnsupportedDataType {
            source_id: source.id().to_string(),
            data_type,
        });
    }
    Ok(())
}

/// The first source of a semantic hands its buffer over, later ones are
/// copied and converted to the buffer's element type.
fn merge_values(data: &mut MeshVertexData, source: &mut Source) -> usize {
    let initial_index = data.values_count();
    if data.is_empty() {
        match source.take_values() {
            SourceValues::Float(values) => {
                data.set_float_data(values);
            }
            SourceValues::Double(values) => {
                data.set_double_data(values);
            }
            _ => {}
        }
    } else {
        match source.values() {
            SourceValues::Float(values) => data.append_values(values.as_slice()),
            SourceValues::Double(values) => data.append_values(values.as_slice()),
            _ => {}
        }
    }
    source.set_initial_index(initial_index);
    source.set_is_loaded(true);
    initial_index
}
