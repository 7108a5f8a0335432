use std::time::Duration;

/// Average speaking pace used to size playback to the transcript.
const BASE_WORDS_PER_SEC: f32 = 2.5;

/// Voice parameters chosen from the caller-trust flag. Purely a UX cue:
/// trusted callers get a brighter, quicker voice, unknown callers a lower,
/// slower one, so the listener can tell them apart before any verdict lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceProfile {
    pub pitch: f32,
    pub rate: f32,
    /// Named-voice preference for a synthesis engine that carries named
    /// voices. The in-process cue only realizes pitch and rate; the name is
    /// logged alongside playback as the hint a real engine would receive.
    pub preferred_voice: &'static str,
}

impl VoiceProfile {
    pub fn for_caller(trusted: bool) -> Self {
        if trusted {
            Self {
                pitch: 1.2,
                rate: 1.0,
                preferred_voice: "Samantha",
            }
        } else {
            Self {
                pitch: 0.8,
                rate: 0.9,
                preferred_voice: "Daniel",
            }
        }
    }

    /// How long the given transcript takes to speak at this profile's rate.
    pub fn playback_duration(&self, text: &str) -> Duration {
        let words = text.split_whitespace().count().max(1) as f32;
        Duration::from_secs_f32(words / (BASE_WORDS_PER_SEC * self.rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_profile_is_brighter_and_faster() {
        let trusted = VoiceProfile::for_caller(true);
        let unknown = VoiceProfile::for_caller(false);
        assert!(trusted.pitch > unknown.pitch);
        assert!(trusted.rate > unknown.rate);
        assert_eq!(trusted.preferred_voice, "Samantha");
        assert_eq!(unknown.preferred_voice, "Daniel");
    }

    #[test]
    fn slower_rate_plays_longer() {
        let trusted = VoiceProfile::for_caller(true);
        let unknown = VoiceProfile::for_caller(false);
        let text = "Grandma, I'm in jail! Please send money now!";
        assert!(unknown.playback_duration(text) > trusted.playback_duration(text));
    }

    #[test]
    fn empty_text_still_has_nonzero_duration() {
        let profile = VoiceProfile::for_caller(true);
        assert!(profile.playback_duration("") > Duration::ZERO);
    }
}
