//! Spin Timing Benchmarks
//!
//! Benchmarks for schedule generation, frame-driven advancement and ring builds.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gl_loop::{
    BoardConfig, GemLoopEngine, Ring, SequenceRandom, SpinDriver, SpinPlan, SpinSchedule,
    SpinTiming, Viewport,
};

const RING_LEN: usize = 24;
const LOOP_COUNTS: &[u32] = &[4, 6, 16, 64];

fn bench_schedule_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule_generate");
    let timing = SpinTiming::normal();

    for &loops in LOOP_COUNTS {
        let total_steps = loops as usize * RING_LEN + 11;
        group.throughput(Throughput::Elements(total_steps as u64));

        group.bench_with_input(BenchmarkId::from_parameter(loops), &total_steps, |b, &steps| {
            b.iter(|| SpinSchedule::generate(black_box(steps), 9300.0, RING_LEN, &timing))
        });
    }

    group.finish();
}

fn bench_driver_frames(c: &mut Criterion) {
    let timing = SpinTiming::normal();
    let plan = SpinPlan::new(5, 17, RING_LEN, 9300.0);

    c.bench_function("driver_60fps_full_spin", |b| {
        b.iter(|| {
            let mut driver = SpinDriver::new(plan, 0, RING_LEN, &timing);
            while !driver.advance(black_box(16.667)).landed {}
            black_box(driver.pointer_index())
        })
    });
}

fn bench_ring_build(c: &mut Criterion) {
    let board = BoardConfig::default();
    let viewports = [
        ("desktop", Viewport::desktop(1280.0, 800.0)),
        ("portrait", Viewport::touch(390.0, 844.0)),
    ];

    let mut group = c.benchmark_group("ring_build");
    for (name, viewport) in viewports {
        group.bench_with_input(BenchmarkId::from_parameter(name), &viewport, |b, vp| {
            b.iter(|| Ring::build(black_box(vp), &board))
        });
    }
    group.finish();
}

fn bench_engine_round(c: &mut Criterion) {
    c.bench_function("engine_round", |b| {
        b.iter(|| {
            let mut engine =
                GemLoopEngine::new().with_random(SequenceRandom::new(vec![0.3, 0.5, 0.7]));
            engine.place_bet(12).ok();
            engine.start_spin().ok();
            while engine.advance(black_box(16.667)).is_none() {}
            black_box(engine.session().coins)
        })
    });
}

criterion_group!(
    benches,
    bench_schedule_generate,
    bench_driver_frames,
    bench_ring_build,
    bench_engine_round
);
criterion_main!(benches);
