use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rodio::Source;
use std::f32::consts::PI;
use std::time::Duration;

use super::voice::VoiceProfile;

/// Speech stand-in: a hum at a pitch-scaled base frequency with a syllabic
/// amplitude wobble and a little noise on top. The real synthesis engine is
/// an external capability; this source gives the demo an audible,
/// trust-distinguishable voice cue of the right length.
pub struct VoiceCue {
    base_freq: f32,
    /// Syllable cadence in Hz, scaled by speaking rate.
    cadence: f32,
    sample_rate: u32,
    num_sample: usize,
    total_samples: usize,
    rng: StdRng,
}

impl VoiceCue {
    pub fn new(profile: VoiceProfile, duration: Duration) -> Self {
        let sample_rate = 44100;
        Self {
            // 110 Hz is roughly a low male fundamental; pitch scales up from there
            base_freq: 110.0 * profile.pitch,
            cadence: 4.0 * profile.rate,
            sample_rate,
            num_sample: 0,
            total_samples: (duration.as_secs_f32() * sample_rate as f32) as usize,
            rng: StdRng::from_entropy(),
        }
    }
}

impl Iterator for VoiceCue {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }
        self.num_sample = self.num_sample.wrapping_add(1);

        let t = self.num_sample as f32 / self.sample_rate as f32;

        let hum = (2.0 * PI * self.base_freq * t).sin();
        // Second harmonic makes it sound voiced rather than a pure tone
        let harmonic = 0.4 * (2.0 * PI * self.base_freq * 2.0 * t).sin();
        let breath = self.rng.gen_range(-1.0..1.0) * 0.05;

        // Amplitude wobble at syllable cadence, never fully silent
        let envelope = 0.6 + 0.4 * (2.0 * PI * self.cadence * t).sin().abs();

        Some((hum + harmonic + breath) * envelope * 0.15)
    }
}

impl Source for VoiceCue {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1 // Mono
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(
            self.total_samples as f32 / self.sample_rate as f32,
        ))
    }
}
