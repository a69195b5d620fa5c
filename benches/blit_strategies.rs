use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tileblit::util::Rng;
use tileblit::{
    Blitter, DrawRequest, ImageSource, PixelBuffer, Strategy, StrategyMode, TileLayer, TileMap,
};

fn noisy_sheet() -> ImageSource {
    let mut rng = Rng::new(0xBE7C);
    let pixels = (0..64 * 64).map(|_| rng.next_pixel()).collect();
    ImageSource::from_argb(64, 64, pixels).unwrap()
}

/// One 16x16 sprite per strategy, with and without mirroring
fn bench_single_sprite(c: &mut Criterion) {
    let sheet = noisy_sheet();
    let mut group = c.benchmark_group("sprite_16x16");

    for strategy in Strategy::ALL {
        for &(fx, fy) in &[(false, false), (true, true)] {
            let req = DrawRequest::new(40, 40, 16, 16, 16, 16).flipped(fx, fy);
            let id = BenchmarkId::new(strategy.name(), if fx { "flipped" } else { "plain" });
            group.bench_with_input(id, &req, |b, req| {
                let mut buf = PixelBuffer::filled(320, 240, 0xFFFF_FFFF);
                b.iter(|| {
                    Blitter::draw_sprite_with(strategy, &mut buf, &sheet, black_box(req)).unwrap();
                })
            });
        }
    }
    group.finish();
}

/// Full 320x240 demo frame: two layers of 16x16 tiles
fn bench_tile_map_frame(c: &mut Criterion) {
    let sheet = ImageSource::placeholder_sheet(16);
    let layers = vec![TileLayer::new(0, 0), TileLayer::new(0, 40)];
    let map = TileMap::covering(320, 240, 16, layers);
    let mut group = c.benchmark_group("tile_map_frame");

    for mode in [
        StrategyMode::Scalar,
        StrategyMode::Vector4,
        StrategyMode::Vector8,
        StrategyMode::Auto,
    ] {
        let blitter = Blitter::new().with_mode(mode);
        group.bench_function(format!("{:?}", mode), |b| {
            let mut buf = PixelBuffer::filled(320, 240, 0xFFFF_FFFF);
            b.iter(|| map.draw(&blitter, black_box(&mut buf), &sheet).unwrap())
        });
    }
    group.finish();
}

fn bench_fill_rect(c: &mut Criterion) {
    c.bench_function("fill_rect_320x240", |b| {
        let mut buf = PixelBuffer::new();
        b.iter(|| buf.fill_rect(black_box(-4), black_box(-4), 328, 248, 0xFF33_6699))
    });
}

criterion_group!(benches, bench_single_sprite, bench_tile_map_frame, bench_fill_rect);
criterion_main!(benches);
