//! rodio-backed narration player
//!
//! The output stream is not `Send`, so it lives on a dedicated thread that
//! takes commands over a channel and reports events back. Events carry the
//! generation of the source they belong to; events for a source that has
//! since been replaced or stopped are discarded.

use std::io::Cursor;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use super::{Playback, PlaybackError, PlaybackEvent};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

enum PlayerCommand {
    Play { generation: u64, bytes: Vec<u8> },
    Stop,
}

/// Handle to the player thread
pub struct AudioPlayer {
    commands: Sender<PlayerCommand>,
    events: Receiver<(u64, PlaybackEvent)>,
    generation: u64,
    loaded: bool,
}

impl AudioPlayer {
    /// Start the player thread. The output device is opened on first use.
    pub fn spawn() -> Self {
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        if let Err(e) = std::thread::Builder::new()
            .name("audio-player".into())
            .spawn(move || run(command_rx, event_tx))
        {
            tracing::error!("Failed to start audio thread: {}", e);
        }

        Self::with_channels(command_tx, event_rx)
    }

    fn with_channels(
        commands: Sender<PlayerCommand>,
        events: Receiver<(u64, PlaybackEvent)>,
    ) -> Self {
        Self {
            commands,
            events,
            generation: 0,
            loaded: false,
        }
    }

    fn send(&self, command: PlayerCommand) -> bool {
        self.commands.send(command).is_ok()
    }
}

impl Playback for AudioPlayer {
    fn play(&mut self, bytes: Vec<u8>) {
        self.generation += 1;
        self.loaded = true;
        tracing::debug!("Playing {} bytes of audio (generation {})", bytes.len(), self.generation);
        let generation = self.generation;
        if !self.send(PlayerCommand::Play { generation, bytes }) {
            tracing::error!("Audio thread is gone");
        }
    }

    fn stop(&mut self) {
        if self.loaded {
            self.generation += 1;
            self.loaded = false;
            self.send(PlayerCommand::Stop);
        }
    }

    fn has_source(&self) -> bool {
        self.loaded
    }

    fn poll_event(&mut self) -> Option<PlaybackEvent> {
        if !self.loaded {
            return None;
        }
        loop {
            match self.events.try_recv() {
                Ok((generation, event)) if generation == self.generation => return Some(event),
                Ok(_) => continue,
                Err(TryRecvError::Empty) => return None,
                // The thread owns the event sender, so it is no longer running
                Err(TryRecvError::Disconnected) => {
                    return Some(PlaybackEvent::Failed("audio thread is not running".into()))
                }
            }
        }
    }
}

fn run(commands: Receiver<PlayerCommand>, events: Sender<(u64, PlaybackEvent)>) {
    let mut output: Option<(OutputStream, OutputStreamHandle)> = None;
    let mut active: Option<(u64, Sink)> = None;

    loop {
        match commands.recv_timeout(POLL_INTERVAL) {
            Ok(PlayerCommand::Play { generation, bytes }) => {
                if let Some((_, sink)) = active.take() {
                    sink.stop();
                }
                match start(&mut output, bytes) {
                    Ok(sink) => active = Some((generation, sink)),
                    Err(e) => {
                        tracing::error!("Audio playback failed: {}", e);
                        let _ = events.send((generation, PlaybackEvent::Failed(e.to_string())));
                    }
                }
            }
            Ok(PlayerCommand::Stop) => {
                if let Some((_, sink)) = active.take() {
                    sink.stop();
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let finished = matches!(&active, Some((_, sink)) if sink.empty());
        if finished {
            if let Some((generation, _)) = active.take() {
                let _ = events.send((generation, PlaybackEvent::Finished));
            }
        }
    }

    tracing::debug!("Audio thread stopped");
}

fn start(
    output: &mut Option<(OutputStream, OutputStreamHandle)>,
    bytes: Vec<u8>,
) -> Result<Sink, PlaybackError> {
    if output.is_none() {
        *output = Some(OutputStream::try_default()?);
    }
    let Some((_, handle)) = output.as_ref() else {
        return Err(PlaybackError::Stream(rodio::StreamError::NoDevice));
    };

    let source = Decoder::new(Cursor::new(bytes))?;
    let sink = Sink::try_new(handle)?;
    sink.append(source);
    sink.play();
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_from_replaced_source_are_dropped() {
        let (command_tx, _command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let mut player = AudioPlayer::with_channels(command_tx, event_rx);

        player.play(vec![1]);
        player.stop();
        assert!(!player.has_source());
        player.play(vec![2]);

        event_tx.send((1, PlaybackEvent::Finished)).unwrap();
        assert_eq!(player.poll_event(), None);

        event_tx.send((player.generation, PlaybackEvent::Finished)).unwrap();
        assert_eq!(player.poll_event(), Some(PlaybackEvent::Finished));
    }

    #[test]
    fn test_play_sends_command_with_generation() {
        let (command_tx, command_rx) = mpsc::channel();
        let (_event_tx, event_rx) = mpsc::channel();
        let mut player = AudioPlayer::with_channels(command_tx, event_rx);

        player.play(vec![9, 9]);
        match command_rx.try_recv() {
            Ok(PlayerCommand::Play { generation, bytes }) => {
                assert_eq!(generation, 1);
                assert_eq!(bytes, vec![9, 9]);
            }
            _ => panic!("Expected a play command"),
        }

        player.stop();
        assert!(matches!(command_rx.try_recv(), Ok(PlayerCommand::Stop)));
    }

    #[test]
    fn test_dead_thread_reports_failure() {
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel::<(u64, PlaybackEvent)>();
        drop(command_rx);
        drop(event_tx);
        let mut player = AudioPlayer::with_channels(command_tx, event_rx);

        player.play(vec![1, 2, 3]);
        assert!(matches!(player.poll_event(), Some(PlaybackEvent::Failed(_))));
    }

    #[test]
    fn test_no_events_without_source() {
        let (command_tx, _command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        drop(event_tx);
        let mut player = AudioPlayer::with_channels(command_tx, event_rx);

        assert_eq!(player.poll_event(), None);
    }
}
