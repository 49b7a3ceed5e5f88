//! Benchmarks for index-stream decoding.
//!
//! Run with: cargo bench -p collada-core

use collada_core::input::InputSemantic;
use collada_core::mesh_loader::{MeshLoader, PrimitiveAttributes, PrimitiveElement};
use collada_core::source::Source;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Interleaved position/normal/uv tuples of a `grid x grid` quad grid split
/// into triangles.
fn grid_triangles(grid: u64) -> Vec<u64> {
    let row = grid + 1;
    let mut data = Vec::with_capacity((grid * grid * 6 * 3) as usize);
    for y in 0..grid {
        for x in 0..grid {
            let a = y * row + x;
            let b = a + 1;
            let c = a + row;
            let d = c + 1;
            for v in [a, b, c, c, b, d] {
                data.extend_from_slice(&[v, 0, v]);
            }
        }
    }
    data
}

fn decode(grid: u64, data: &[u64], chunk: usize) -> usize {
    let vertex_count = ((grid + 1) * (grid + 1)) as usize;
    let mut loader = MeshLoader::new("grid", "");
    loader.add_source(Source::new_float("pos", vec![0.0; vertex_count * 3], 3));
    loader.add_source(Source::new_float("nrm", vec![0.0, 0.0, 1.0], 3));
    loader.add_source(Source::new_float("uv", vec![0.0; vertex_count * 2], 2));

    loader.begin_primitive(
        PrimitiveElement::Triangles,
        &PrimitiveAttributes::new((grid * grid * 2) as usize, "grid"),
    );
    loader.primitive_input(InputSemantic::Position, "#pos", 0, 0);
    loader.primitive_input(InputSemantic::Normal, "#nrm", 1, 0);
    loader.primitive_input(InputSemantic::TexCoord, "#uv", 2, 0);
    loader.begin_p();
    for part in data.chunks(chunk) {
        loader.data_p(part);
    }
    loader.end_p();
    loader.end_primitive();
    loader.into_mesh().face_count()
}

fn bench_triangles(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_triangles");
    for grid in [16u64, 64, 256] {
        let data = grid_triangles(grid);
        group.throughput(Throughput::Elements(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(grid), &data, |b, data| {
            b.iter(|| decode(grid, black_box(data), 4096));
        });
    }
    group.finish();
}

fn bench_chunk_size(c: &mut Criterion) {
    let data = grid_triangles(128);
    let mut group = c.benchmark_group("decode_chunk_size");
    for chunk in [64usize, 1024, 16384] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &chunk, |b, &chunk| {
            b.iter(|| decode(128, black_box(&data), chunk));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_triangles, bench_chunk_size);
criterion_main!(benches);
