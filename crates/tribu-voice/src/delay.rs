//! Clock-syncable delay line.
//!
//! The only component in the workspace that heap-allocates: its ring
//! buffer is sized at construction and on sample-rate changes, never on
//! the per-sample path.

/// Interpolated digital delay with tempo-clock tracking.
///
/// While a clock is present on the sync input (rising edges less than
/// two seconds apart), the measured interval between edges overrides the
/// time knob, locking repeats to the tempo. The effective delay length
/// is smoothed 1% per sample toward its target so time changes pitch-
/// bend instead of crackling. Feedback is fixed at `amount · 0.4`,
/// clamped well inside stability.
#[derive(Debug, Clone)]
pub struct Delay {
    buffer: Vec<f32>,
    write_index: usize,
    sample_rate: f32,
    max_delay_time: f32,
    last_clock: f32,
    samples_since_clock: u32,
    clock_interval: f32,
    smoothed_delay_samples: f32,
}

impl Default for Delay {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl Delay {
    const MAX_DELAY_TIME: f32 = 2.0;

    /// Create a delay with a 2 s buffer at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let mut delay = Self {
            buffer: Vec::new(),
            write_index: 0,
            sample_rate: 44100.0,
            max_delay_time: Self::MAX_DELAY_TIME,
            last_clock: 0.0,
            samples_since_clock: 0,
            clock_interval: 0.0,
            smoothed_delay_samples: 1.0,
        };
        delay.set_sample_rate(sample_rate);
        delay
    }

    /// Resize the buffer for a new sample rate. Clears the delay memory;
    /// this is a reconfiguration barrier, not a per-sample operation.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = if sample_rate > 1000.0 {
            sample_rate
        } else {
            44100.0
        };
        let samples = (self.max_delay_time * self.sample_rate) as usize + 1;
        self.buffer.clear();
        self.buffer.resize(samples, 0.0);
        self.write_index = 0;
        self.smoothed_delay_samples = 1.0;
    }

    /// Whether a tempo clock has been seen recently enough to govern the
    /// delay time.
    pub fn clock_locked(&self) -> bool {
        (self.samples_since_clock as f32) < self.sample_rate * 2.0 && self.clock_interval > 0.0
    }

    /// Clear the delay memory and clock tracking.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.last_clock = 0.0;
        self.samples_since_clock = 0;
        self.clock_interval = 0.0;
        self.smoothed_delay_samples = 1.0;
    }

    /// Process one sample.
    ///
    /// `clock` is the sync voltage (rising edges above 1.0 are measured),
    /// `time` the normalized delay-time knob, `amount` the wet/feedback
    /// amount in [0, 1]. Amount ≤ 0 bypasses.
    pub fn process(&mut self, input: f32, clock: f32, time: f32, amount: f32) -> f32 {
        if self.buffer.is_empty() {
            return input;
        }
        let amount = amount.clamp(0.0, 1.0);
        if amount <= 0.0 {
            return input;
        }

        let input = input.clamp(-10.0, 10.0);

        let clock_edge = clock > 1.0 && self.last_clock <= 1.0;
        self.last_clock = clock;

        if clock_edge {
            let measured = self.samples_since_clock as f32 / self.sample_rate;
            if measured > 0.01 && measured < 4.0 {
                self.clock_interval = measured;
            }
            self.samples_since_clock = 0;
        } else {
            self.samples_since_clock = self.samples_since_clock.saturating_add(1);
        }

        let delay_time = if clock > 0.1 && self.clock_locked() {
            self.clock_interval
        } else {
            0.01 + time.clamp(0.0, 1.0) * 1.99
        };
        let delay_time = delay_time.clamp(0.001, self.max_delay_time);

        let max_samples = self.buffer.len();
        let target = (delay_time * self.sample_rate).clamp(1.0, (max_samples - 1) as f32);
        self.smoothed_delay_samples += (target - self.smoothed_delay_samples) * 0.01;

        let whole = self.smoothed_delay_samples as usize;
        let fraction = self.smoothed_delay_samples - whole as f32;
        let read1 = (self.write_index + max_samples - whole) % max_samples;
        let read2 = (self.write_index + max_samples - whole - 1) % max_samples;
        let sample1 = self.buffer[read1];
        let sample2 = self.buffer[read2];
        let delayed = sample1 + fraction * (sample2 - sample1);

        let feedback = (delayed * amount * 0.4).clamp(-2.0, 2.0);
        self.buffer[self.write_index] = input + feedback;
        self.write_index = (self.write_index + 1) % max_samples;

        input * (1.0 - amount) + delayed * amount
    }
}
