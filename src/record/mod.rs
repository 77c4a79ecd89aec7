//! Frame capture
//!
//! Rendered frames are handed to a worker thread through a bounded queue, and
//! the worker streams them to any `Write` sink. The ffmpeg recorder plugs the
//! encoder's stdin in as that sink. When the queue is full, `push` blocks: a
//! slow encoder stalls the simulation loop rather than losing frames.

pub mod ffmpeg;
pub mod worker;

pub use ffmpeg::{FfmpegRecorder, VideoSettings, transcode_gif};
pub use worker::FrameRecorder;

use std::process::ExitStatus;

use crate::render::Canvas;

/// Default number of frames that may wait for the encoder
pub const DEFAULT_QUEUE_FRAMES: usize = 8;

/// Recording errors
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("recording I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("frame is {got_width}x{got_height}, recorder expects {width}x{height}")]
    FrameSize {
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },
    #[error("video dimensions must be even and non-zero, got {width}x{height}")]
    OddDimensions { width: u32, height: u32 },
    #[error("recorder already finished")]
    Closed,
    #[error("recorder worker panicked")]
    WorkerPanicked,
    #[error("encoder exited with {status}: {stderr}")]
    EncoderFailed { status: ExitStatus, stderr: String },
}

/// Consumer of rendered frames
pub trait FrameSink {
    /// Queue one frame; blocks while the queue is full
    fn push(&mut self, frame: &Canvas) -> Result<(), RecordError>;

    /// Flush queued frames and finalize the output
    fn finish(&mut self) -> Result<(), RecordError>;

    /// Frames accepted so far
    fn frames(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ShapeConfig, SimConfig};
    use crate::render::{Style, draw_scene};
    use crate::sim::{Simulator, TickInput, tick};

    #[test]
    fn test_simulated_frames_stream_in_order() {
        let config = SimConfig {
            shape: ShapeConfig::Regular {
                sides: 6,
                circumradius: 120.0,
            },
            ..SimConfig::with_seed(3)
        };
        let (width, height) = (config.viewport.width, config.viewport.height);
        let mut sim = Simulator::new(config).unwrap();
        let mut canvas = Canvas::new(width, height);
        let mut recorder = FrameRecorder::spawn(Vec::new(), width, height, 2).unwrap();

        let mut last_frame = Vec::new();
        for _ in 0..30 {
            tick(&mut sim, &TickInput::default(), 1.0 / 60.0);
            draw_scene(&sim.view(), &mut canvas, &Style::default());
            recorder.push(&canvas).unwrap();
            last_frame = canvas.as_bytes().to_vec();
        }
        assert_eq!(recorder.frames(), 30);

        let bytes = recorder.into_inner().unwrap();
        let frame_len = (width * height * 3) as usize;
        assert_eq!(bytes.len(), 30 * frame_len);
        assert_eq!(&bytes[29 * frame_len..], &last_frame[..]);
    }
}
