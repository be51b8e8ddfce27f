//! Property-based tests for the tribu-core DSP primitives.
//!
//! Filter stability across randomized parameters and inputs, envelope
//! monotonicity, and oscillator boundedness, using proptest for input
//! generation.

use proptest::prelude::*;
use tribu_core::{
    Envelope, FilterBank, FilterTopology, LadderFilter, Lfo, LfoMode, LfoWaveform, MoogFilter,
    Ms20Filter, Ms20PreviousFilter, Vco, VcoWaveform,
};

fn topology_from(index: usize) -> FilterTopology {
    match index % 4 {
        0 => FilterTopology::Ms20,
        1 => FilterTopology::Ms20Previous,
        2 => FilterTopology::Ladder,
        _ => FilterTopology::Moog,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Every topology produces finite output for any cutoff/resonance
    /// pair over random bounded input.
    #[test]
    fn filter_bank_stability(
        cutoff in 0.0f32..=1.0f32,
        resonance in 0.0f32..=1.0f32,
        topology in 0usize..4,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut bank = FilterBank::new(44100.0);
        bank.set_topology(topology_from(topology));
        bank.set_cutoff(cutoff);
        bank.set_resonance(resonance);
        bank.snap_parameters();

        for _ in 0..8 {
            for &sample in &input {
                let out = bank.process(sample);
                prop_assert!(
                    out.is_finite(),
                    "topology {:?} (cutoff={}, resonance={}) produced {}",
                    topology_from(topology), cutoff, resonance, out
                );
            }
        }
    }

    /// Individual topologies stay finite under hot input (well past
    /// full scale) at extreme sample rates.
    #[test]
    fn filters_survive_hot_input(
        cutoff in 0.0f32..=1.0f32,
        resonance in 0.0f32..=1.0f32,
        gain in 1.0f32..=8.0f32,
        sample_rate in prop::sample::select(vec![8000.0f32, 44100.0, 192000.0]),
    ) {
        let mut ms20 = Ms20Filter::new(sample_rate);
        let mut previous = Ms20PreviousFilter::new(sample_rate);
        let mut ladder = LadderFilter::new(sample_rate);
        let mut moog = MoogFilter::new(sample_rate);
        ms20.set_cutoff(cutoff);
        previous.set_cutoff(cutoff);
        ladder.set_cutoff(cutoff);
        moog.set_cutoff(cutoff);
        ms20.set_resonance(resonance);
        previous.set_resonance(resonance);
        ladder.set_resonance(resonance);
        moog.set_resonance(resonance);

        let mut phase = 0.0f32;
        for _ in 0..2000 {
            phase += 220.0 / sample_rate;
            if phase >= 1.0 {
                phase -= 1.0;
            }
            let input = (2.0 * phase - 1.0) * gain;
            prop_assert!(ms20.process(input).is_finite());
            prop_assert!(previous.process(input).is_finite());
            prop_assert!(ladder.process(input).is_finite());
            prop_assert!(moog.process(input).is_finite());
        }
    }

    /// The envelope output always stays inside [0, 1] and ends at zero
    /// some time after gate-off.
    #[test]
    fn envelope_bounded_and_terminates(
        attack in 0.001f32..1.0f32,
        decay in 0.001f32..1.0f32,
        sustain in 0.0f32..=1.0f32,
        release in 0.001f32..1.0f32,
        held_samples in 1usize..5000,
    ) {
        let st = 1.0 / 1000.0;
        let mut env = Envelope::new();
        env.set_attack(attack);
        env.set_decay(decay);
        env.set_sustain(sustain);
        env.set_release(release);
        env.trigger();

        for _ in 0..held_samples {
            let v = env.process(st);
            prop_assert!((0.0..=1.0).contains(&v), "envelope out of range: {}", v);
        }
        env.gate_off();
        // Longest release is 1 s = 1000 samples; give it margin.
        for _ in 0..1100 {
            let v = env.process(st);
            prop_assert!((0.0..=1.0).contains(&v));
        }
        prop_assert_eq!(env.value(), 0.0);
    }

    /// Oscillator output is bounded for any musical pitch and waveform.
    #[test]
    fn oscillator_bounded(
        pitch in -5.0f32..5.0f32,
        waveform in 0usize..3,
    ) {
        let mut vco = Vco::new();
        vco.set_waveform(match waveform {
            0 => VcoWaveform::Square,
            1 => VcoWaveform::Triangle,
            _ => VcoWaveform::Sawtooth,
        });
        vco.set_pitch(pitch);
        for _ in 0..5000 {
            let s = vco.process(1.0 / 44100.0);
            prop_assert!(s.is_finite());
            prop_assert!(s.abs() <= 2.0, "oscillator output {} out of bounds", s);
        }
    }

    /// The LFO stays inside [-1, 1] in every mode/waveform combination.
    #[test]
    fn lfo_bounded(
        knob in 0.0f32..=1.0f32,
        mode in 0usize..3,
        waveform in 0usize..4,
    ) {
        let mut lfo = Lfo::new();
        lfo.set_mode(match mode {
            0 => LfoMode::OneShot,
            1 => LfoMode::Slow,
            _ => LfoMode::Fast,
        });
        lfo.set_rate_knob(knob);
        lfo.gate_retrigger();
        let waveform = match waveform {
            0 => LfoWaveform::Square,
            1 => LfoWaveform::Triangle,
            2 => LfoWaveform::Sawtooth,
            _ => LfoWaveform::SampleHold,
        };
        for _ in 0..5000 {
            let v = lfo.process(1.0 / 44100.0, waveform);
            prop_assert!((-1.0..=1.0).contains(&v), "lfo output {} out of range", v);
        }
    }
}
