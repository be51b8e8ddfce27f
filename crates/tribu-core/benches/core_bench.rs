//! Criterion benchmarks for tribu-core DSP primitives
//!
//! Run with: cargo bench -p tribu-core
#![allow(missing_docs)]

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tribu_core::{FilterBank, FilterTopology, Lfo, LfoMode, LfoWaveform, Vco, VcoWaveform};

const SAMPLE_RATE: f32 = 44100.0;
const BLOCK: usize = 512;

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("Vco");
    for (name, waveform) in [
        ("saw", VcoWaveform::Sawtooth),
        ("triangle", VcoWaveform::Triangle),
        ("square", VcoWaveform::Square),
    ] {
        group.bench_function(name, |b| {
            let mut vco = Vco::new();
            vco.set_waveform(waveform);
            vco.set_pitch(0.0);
            b.iter(|| {
                for _ in 0..BLOCK {
                    black_box(vco.process(black_box(1.0 / SAMPLE_RATE)));
                }
            });
        });
    }
    group.finish();
}

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("FilterBank");
    let input = generate_test_signal(BLOCK);
    for (name, topology) in [
        ("ms20", FilterTopology::Ms20),
        ("ms20_previous", FilterTopology::Ms20Previous),
        ("ladder", FilterTopology::Ladder),
        ("moog", FilterTopology::Moog),
    ] {
        group.bench_function(name, |b| {
            let mut bank = FilterBank::new(SAMPLE_RATE);
            bank.set_topology(topology);
            bank.set_cutoff(0.7);
            bank.set_resonance(0.8);
            b.iter(|| {
                for &sample in &input {
                    black_box(bank.process(black_box(sample)));
                }
            });
        });
    }
    group.finish();
}

fn bench_lfo(c: &mut Criterion) {
    c.bench_function("Lfo/fast_saw", |b| {
        let mut lfo = Lfo::new();
        lfo.set_mode(LfoMode::Fast);
        lfo.set_rate_knob(0.5);
        b.iter(|| {
            for _ in 0..BLOCK {
                black_box(lfo.process(black_box(1.0 / SAMPLE_RATE), LfoWaveform::Sawtooth));
            }
        });
    });
}

criterion_group!(benches, bench_oscillator, bench_filters, bench_lfo);
criterion_main!(benches);
