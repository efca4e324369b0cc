use phasecorr::{
    build_mask, CorrelateConfig, Grid, ImageView, PhaseCorrelator, SpectralTransform,
    TransformMode,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn make_image(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

fn extract_patch(
    image: &[u8],
    img_width: usize,
    x0: usize,
    y0: usize,
    width: usize,
    height: usize,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = (y0 + y) * img_width;
        for x in 0..width {
            out.push(image[row + x0 + x]);
        }
    }
    out
}

fn bench_pipeline(c: &mut Criterion) {
    let img_width = 256;
    let img_height = 256;
    let image = make_image(img_width, img_height);
    let grid = Grid::from_vec2(image.clone(), img_height, img_width).unwrap();

    let patch_width = 192;
    let patch_height = 160;
    let patch = extract_patch(&image, img_width, 40, 30, patch_width, patch_height);
    let patch = Grid::from_vec2(patch, patch_height, patch_width).unwrap();

    let mut engine = SpectralTransform::new();
    c.bench_function("forward_fft_256", |b| {
        b.iter(|| black_box(engine.transform(&grid, TransformMode::FORWARD, false).unwrap()));
    });

    let mut correlator = PhaseCorrelator::new().with_config(CorrelateConfig::default());
    c.bench_function("correlate_256_vs_patch", |b| {
        b.iter(|| black_box(correlator.surface(&grid, &patch).unwrap()));
    });

    if cfg!(feature = "rayon") {
        let mut correlator_par = PhaseCorrelator::new()
            .with_config(CorrelateConfig::default())
            .with_parallel(true);
        c.bench_function("correlate_256_vs_patch_parallel", |b| {
            b.iter(|| black_box(correlator_par.surface(&grid, &patch).unwrap()));
        });
    }

    let view = ImageView::from_slice(&image, img_width, img_height).unwrap();
    c.bench_function("stroke_mask_256", |b| {
        b.iter(|| black_box(build_mask(view).unwrap()));
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
