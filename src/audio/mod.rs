//! Narration playback
//!
//! The view state talks to audio output through the [`Playback`] trait so the
//! rodio-backed [`AudioPlayer`] can be swapped for an in-memory fake in tests.

pub mod player;

pub use player::AudioPlayer;

use thiserror::Error;

/// Something the player reports back after `play`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The loaded source played to its end
    Finished,
    /// Opening the output device or decoding failed
    Failed(String),
}

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    Stream(#[from] rodio::StreamError),

    #[error("could not start playback: {0}")]
    Play(#[from] rodio::PlayError),

    #[error("could not decode audio: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}

/// Audio output as seen by the view state
pub trait Playback {
    /// Attach `bytes` as the current source and start playing it
    fn play(&mut self, bytes: Vec<u8>);

    /// Stop playback and detach the current source
    fn stop(&mut self);

    /// Whether a source is attached
    fn has_source(&self) -> bool;

    /// Next pending event for the attached source, if any
    fn poll_event(&mut self) -> Option<PlaybackEvent>;
}
