use criterion::{Criterion, black_box, criterion_group, criterion_main};
use hindsight::config::RenderConfig;
use hindsight::lens::LensDistorter;
use hindsight::pipeline::LensPipeline;
use hindsight::road::RoadProjector;
use hindsight::types::FrameInputs;
use hindsight::vignette::build_mask;

fn bench_kernels(c: &mut Criterion) {
    let cfg = RenderConfig::default();
    let inputs = FrameInputs { lateral_offset: 40.0, scroll_position: 5000.0 };

    let projector = RoadProjector::new(&cfg).unwrap();
    c.bench_function("project_road", |b| b.iter(|| projector.project(black_box(&inputs))));

    let road = projector.project(&inputs);
    let distorter = LensDistorter::new(cfg.lens_width, cfg.lens_height, cfg.distortion_k).unwrap();
    c.bench_function("distort_lens", |b| b.iter(|| distorter.distort(black_box(&road)).unwrap()));

    c.bench_function("build_vignette", |b| {
        b.iter(|| build_mask(black_box(cfg.lens_width), cfg.lens_height, cfg.vignette_max_alpha, cfg.vignette_exponent))
    });

    let mut pipeline = LensPipeline::new(&cfg).unwrap();
    c.bench_function("render_both_lenses", |b| b.iter(|| pipeline.render(black_box(&inputs)).unwrap()));
}

criterion_group!(benches, bench_kernels);
criterion_main!(benches);
