//! Voice sample playback.
//!
//! Only one sample plays at a time. The player is handed in by the caller
//! so tests and headless runs can use a fake.

use crate::error::DashboardError;
use agentdesk_api::Voice;
use agentdesk_core::VoiceId;
use rootcause::prelude::Report;
use tracing::debug;

/// Something that can play an audio URL.
pub trait AudioPlayer: Send {
    /// Starts playing `url`, replacing nothing; the caller stops first.
    fn play(&mut self, url: &str) -> Result<(), Report<DashboardError>>;

    fn stop(&mut self);
}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    Playing,
    Stopped,
}

/// Owner of the single audio handle behind the voice preview buttons.
pub struct VoicePreview<P> {
    player: P,
    playing: Option<VoiceId>,
}

impl<P: AudioPlayer> VoicePreview<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            playing: None,
        }
    }

    /// Voice whose sample is currently playing.
    #[must_use]
    pub fn playing(&self) -> Option<&VoiceId> {
        self.playing.as_ref()
    }

    #[must_use]
    pub fn player(&self) -> &P {
        &self.player
    }

    /// Plays the voice's sample, or stops it if it is the one playing.
    ///
    /// Any other sample is stopped first.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Rejected` if the voice has no sample, or the
    /// player's error if playback cannot start. Nothing is playing
    /// afterwards in either case.
    pub fn toggle(&mut self, voice: &Voice) -> Result<PreviewState, Report<DashboardError>> {
        if self.playing.as_ref() == Some(&voice.id) {
            self.stop();
            return Ok(PreviewState::Stopped);
        }
        self.stop();

        let url = voice
            .preview_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| DashboardError::Rejected {
                details: format!("voice {} has no preview", voice.name),
            })?;
        self.player.play(url)?;
        debug!(voice_id = %voice.id, "voice preview started");
        self.playing = Some(voice.id.clone());
        Ok(PreviewState::Playing)
    }

    /// Stops whatever is playing. Does nothing if nothing is.
    pub fn stop(&mut self) {
        if let Some(voice_id) = self.playing.take() {
            self.player.stop();
            debug!(voice_id = %voice_id, "voice preview stopped");
        }
    }

    /// Records that the current sample reached its end.
    pub fn finished(&mut self) {
        self.playing = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakePlayer {
        log: Vec<String>,
        broken: bool,
    }

    impl AudioPlayer for FakePlayer {
        fn play(&mut self, url: &str) -> Result<(), Report<DashboardError>> {
            if self.broken {
                return Err(DashboardError::Rejected {
                    details: "audio device unavailable".to_string(),
                }
                .into());
            }
            self.log.push(format!("play {url}"));
            Ok(())
        }

        fn stop(&mut self) {
            self.log.push("stop".to_string());
        }
    }

    fn voice(id: &str, preview: Option<&str>) -> Voice {
        Voice {
            id: VoiceId::new(id),
            name: id.to_string(),
            provider: None,
            gender: None,
            accent: None,
            preview_url: preview.map(str::to_string),
        }
    }

    #[test]
    fn starting_another_voice_stops_the_first() {
        let mut preview = VoicePreview::new(FakePlayer::default());
        let rachel = voice("rachel", Some("https://cdn.example.com/rachel.mp3"));
        let adam = voice("adam", Some("https://cdn.example.com/adam.mp3"));

        assert_eq!(preview.toggle(&rachel).unwrap(), PreviewState::Playing);
        assert_eq!(preview.toggle(&adam).unwrap(), PreviewState::Playing);
        assert_eq!(preview.playing().map(VoiceId::as_str), Some("adam"));
        assert_eq!(
            preview.player().log,
            vec![
                "play https://cdn.example.com/rachel.mp3",
                "stop",
                "play https://cdn.example.com/adam.mp3"
            ]
        );
    }

    #[test]
    fn same_voice_toggles_off() {
        let mut preview = VoicePreview::new(FakePlayer::default());
        let rachel = voice("rachel", Some("https://cdn.example.com/rachel.mp3"));

        preview.toggle(&rachel).unwrap();
        assert_eq!(preview.toggle(&rachel).unwrap(), PreviewState::Stopped);
        assert!(preview.playing().is_none());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut preview = VoicePreview::new(FakePlayer::default());
        preview.stop();
        preview.toggle(&voice("adam", Some("a.mp3"))).unwrap();
        preview.stop();
        preview.stop();
        assert_eq!(preview.player().log, vec!["play a.mp3", "stop"]);
    }

    #[test]
    fn missing_sample_or_broken_player() {
        let mut preview = VoicePreview::new(FakePlayer::default());
        preview.toggle(&voice("adam", Some("a.mp3"))).unwrap();
        assert!(preview.toggle(&voice("silent", None)).is_err());
        assert!(preview.playing().is_none());

        let mut preview = VoicePreview::new(FakePlayer {
            broken: true,
            ..FakePlayer::default()
        });
        assert!(preview.toggle(&voice("adam", Some("a.mp3"))).is_err());
        assert!(preview.playing().is_none());
    }

    #[test]
    fn finished_clears_without_stop() {
        let mut preview = VoicePreview::new(FakePlayer::default());
        preview.toggle(&voice("adam", Some("a.mp3"))).unwrap();
        preview.finished();
        preview.stop();
        assert_eq!(preview.player().log, vec!["play a.mp3"]);
    }
}
