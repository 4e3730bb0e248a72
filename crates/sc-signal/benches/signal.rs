use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sc_signal::channel::{ChannelPipeline, ChannelState};
use sc_signal::measurement::Channel;
use sc_signal::sample::SAMPLE_STRIDE;
use sc_signal::smoothing::Smoother;

fn sample() -> Vec<f64> {
    SAMPLE_STRIDE.iter().map(|&v| v as f64).collect()
}

fn bench_smoothing(c: &mut Criterion) {
    let values = sample();
    let smoother = Smoother::new(10);
    c.bench_function("smooth_202", |b| {
        b.iter(|| smoother.smooth(black_box(&values)));
    });
}

fn bench_analyze(c: &mut Criterion) {
    let values = sample();
    let pipeline = ChannelPipeline::default();
    c.bench_function("analyze_202", |b| {
        b.iter(|| pipeline.analyze(black_box(&values)));
    });
}

// Cumulative cost of a session: every frame replays the whole history.
fn bench_session_replay(c: &mut Criterion) {
    let pipeline = ChannelPipeline::default();
    c.bench_function("stream_202_frames", |b| {
        b.iter(|| {
            let mut state = ChannelState::new(Channel::Stride, None);
            for &v in &SAMPLE_STRIDE {
                let _ = state.record(black_box(v as f64), &pipeline);
            }
            state.cadence()
        });
    });
}

criterion_group!(benches, bench_smoothing, bench_analyze, bench_session_replay);
criterion_main!(benches);
