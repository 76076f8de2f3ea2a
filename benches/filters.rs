use criterion::{black_box, criterion_group, criterion_main, Criterion};
use filterstack::{Filter, FilterKind, LayerStack, PixelBuffer};
use std::time::Duration;

fn test_image(width: u32, height: u32) -> PixelBuffer {
    let mut bytes = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            bytes.extend_from_slice(&[
                (x % 256) as u8,
                (y % 256) as u8,
                ((x * 7 + y * 13) % 256) as u8,
                255,
            ]);
        }
    }
    PixelBuffer::new(width, height, bytes).expect("Test image should build")
}

fn criterion_benchmark(c: &mut Criterion) {
    let image = test_image(512, 512);

    // One default-parameter filter at a time
    let mut group = c.benchmark_group("filters");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(5));

    for kind in FilterKind::ALL {
        let filter = Filter::from(kind);
        group.bench_function(kind.id(), |b| b.iter(|| filter.apply(black_box(&image))));
    }

    let mut heavy = Filter::from(FilterKind::MedianNoiseReduction);
    heavy.set_param("strength", 5.0);
    group.bench_function("noise-reduction-max", |b| {
        b.iter(|| heavy.apply(black_box(&image)))
    });
    group.finish();

    // Full palette stacked
    let mut stack = LayerStack::new();
    for filter in Filter::catalog() {
        stack.add(&filter);
    }
    c.bench_function("compose_all_layers", |b| {
        b.iter(|| stack.compose(black_box(&image)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
