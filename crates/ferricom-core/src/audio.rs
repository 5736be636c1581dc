//! Non-linear channel mixer feeding a band-limited resampler.
//!
//! Every CPU cycle the APU hands the five channel DAC levels to
//! [`Mixer::push`]; the standard two-group approximation combines them into
//! one amplitude, and only the *changes* are fed to the blip buffer. At the
//! end of each video frame the buffer is flushed into whole samples at the
//! host rate.

use ferricom_blip::BlipBuffer;

/// NTSC CPU clock rate driving the APU.
pub const CPU_CLOCK_HZ: f64 = 1_789_773.0;

/// Default host sample rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Scale from the mixer's 0.0..~1.0 amplitude to i16, including the 0.5
/// headroom gain.
const AMPLITUDE_SCALE: f64 = 0.5 * 32767.0;

#[derive(Debug)]
pub struct Mixer {
    blip: BlipBuffer,
    sample_rate: u32,
    /// CPU clocks since the frame started.
    clock: u64,
    last_amplitude: i32,
    samples: Vec<i16>,
}

impl Mixer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            blip: BlipBuffer::new(CPU_CLOCK_HZ, f64::from(sample_rate)),
            sample_rate,
            clock: 0,
            last_amplitude: 0,
            samples: Vec::with_capacity(1024),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
        self.blip.set_rates(CPU_CLOCK_HZ, f64::from(sample_rate));
    }

    /// Accepts the channel DAC levels for one CPU cycle.
    pub fn push(&mut self, pulse1: u8, pulse2: u8, triangle: u8, noise: u8, dmc: u8) {
        let amplitude = mix(pulse1, pulse2, triangle, noise, dmc);
        let delta = amplitude - self.last_amplitude;
        if delta != 0 {
            self.blip.add_delta(self.clock, delta);
            self.last_amplitude = amplitude;
        }
        self.clock += 1;
    }

    /// Flushes the elapsed frame into finished samples.
    pub fn end_frame(&mut self) {
        self.blip.end_frame(self.clock);
        self.clock = 0;

        let avail = self.blip.samples_avail();
        let start = self.samples.len();
        self.samples.resize(start + avail, 0);
        let produced = self.blip.read_samples(&mut self.samples[start..]);
        self.samples.truncate(start + produced);
    }

    /// Moves the accumulated frame audio into `out`.
    pub fn drain_samples(&mut self, out: &mut Vec<i16>) {
        out.append(&mut self.samples);
    }

    pub fn clear(&mut self) {
        self.blip.clear();
        self.clock = 0;
        self.last_amplitude = 0;
        self.samples.clear();
    }
}

/// The standard two-group DAC approximation.
fn mix(pulse1: u8, pulse2: u8, triangle: u8, noise: u8, dmc: u8) -> i32 {
    let pulse_sum = f64::from(pulse1) + f64::from(pulse2);
    let pulse_out = if pulse_sum > 0.0 {
        95.88 / (8128.0 / pulse_sum + 100.0)
    } else {
        0.0
    };

    let tnd_sum =
        f64::from(triangle) / 8227.0 + f64::from(noise) / 12241.0 + f64::from(dmc) / 22638.0;
    let tnd_out = if tnd_sum > 0.0 {
        159.79 / (1.0 / tnd_sum + 100.0)
    } else {
        0.0
    };

    ((pulse_out + tnd_out) * AMPLITUDE_SCALE) as i32
}
