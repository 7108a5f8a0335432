pub mod cue;
pub mod player;
pub mod voice;

pub use player::SpeechPlayer;
pub use voice::VoiceProfile;
