//! Video encoding through an external `ffmpeg` process

use std::ffi::OsString;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, ChildStdin, Command, Output, Stdio};
use std::thread::{self, JoinHandle};

use super::{DEFAULT_QUEUE_FRAMES, FrameRecorder, FrameSink, RecordError};
use crate::render::Canvas;

/// Scale/rate filter for the derived animated GIF
pub const GIF_FILTER: &str = "fps=10,scale=320:-1:flags=lanczos";

/// Encoder settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSettings {
    /// Executable to run
    pub program: String,
    /// Frames per second written into the container
    pub fps: u32,
    /// Frames that may wait for the encoder before `push` blocks
    pub queue_frames: usize,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            fps: 60,
            queue_frames: DEFAULT_QUEUE_FRAMES,
        }
    }
}

/// Arguments that read raw rgb24 frames from stdin and write an MPEG-4 video
pub fn encode_args(width: u32, height: u32, fps: u32, output: &Path) -> Vec<OsString> {
    let size = format!("{width}x{height}");
    let fps = fps.to_string();
    let mut args: Vec<OsString> = [
        "-y", "-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgb24", "-s", size.as_str(), "-r",
        fps.as_str(), "-i", "-", "-c:v", "mpeg4", "-q:v", "3", "-pix_fmt", "yuv420p",
    ]
    .iter()
    .map(OsString::from)
    .collect();
    args.push(output.as_os_str().to_owned());
    args
}

/// Arguments that transcode a video into a downscaled animated GIF
pub fn gif_args(video: &Path, gif: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-loglevel", "error", "-i"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(video.as_os_str().to_owned());
    args.push("-vf".into());
    args.push(GIF_FILTER.into());
    args.push(gif.as_os_str().to_owned());
    args
}

fn check_output(output: Output) -> Result<(), RecordError> {
    if output.status.success() {
        Ok(())
    } else {
        Err(RecordError::EncoderFailed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Collect the encoder's stderr so a chatty encoder never blocks on a full pipe
fn drain_stderr(mut pipe: ChildStderr) -> io::Result<JoinHandle<io::Result<Vec<u8>>>> {
    thread::Builder::new()
        .name("encoder-stderr".into())
        .spawn(move || {
            let mut bytes = Vec::new();
            pipe.read_to_end(&mut bytes)?;
            Ok(bytes)
        })
}

/// Pipes rendered frames into `ffmpeg`
pub struct FfmpegRecorder {
    output: PathBuf,
    child: Option<Child>,
    frames: Option<FrameRecorder<ChildStdin>>,
    stderr: Option<JoinHandle<io::Result<Vec<u8>>>>,
    accepted: u64,
}

impl FfmpegRecorder {
    /// Start the encoder process writing to `output`
    pub fn spawn(
        output: impl Into<PathBuf>,
        width: u32,
        height: u32,
        settings: &VideoSettings,
    ) -> Result<Self, RecordError> {
        if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
            return Err(RecordError::OddDimensions { width, height });
        }
        let output = output.into();

        let mut child = Command::new(&settings.program)
            .args(encode_args(width, height, settings.fps, &output))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RecordError::Spawn {
                program: settings.program.clone(),
                source,
            })?;

        let stderr = match child.stderr.take() {
            Some(pipe) => Some(drain_stderr(pipe)?),
            None => None,
        };
        let stdin = child.stdin.take().ok_or(RecordError::Closed)?;
        let frames = FrameRecorder::spawn(stdin, width, height, settings.queue_frames)?;

        log::info!(
            "Recording {}x{} @ {} fps to {}",
            width,
            height,
            settings.fps,
            output.display()
        );

        Ok(Self {
            output,
            child: Some(child),
            frames: Some(frames),
            stderr,
            accepted: 0,
        })
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl FrameSink for FfmpegRecorder {
    fn push(&mut self, frame: &Canvas) -> Result<(), RecordError> {
        let frames = self.frames.as_mut().ok_or(RecordError::Closed)?;
        frames.push(frame)?;
        self.accepted += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RecordError> {
        // Dropping stdin tells ffmpeg the stream is complete
        let written = match self.frames.take() {
            Some(frames) => frames.into_inner().map(drop),
            None => Ok(()),
        };

        let Some(mut child) = self.child.take() else {
            return written;
        };
        let stderr = match self.stderr.take().map(JoinHandle::join) {
            Some(Ok(Ok(bytes))) => bytes,
            Some(Ok(Err(e))) => {
                log::warn!("Failed to read encoder stderr: {e}");
                Vec::new()
            }
            Some(Err(_)) => {
                log::warn!("Encoder stderr reader panicked");
                Vec::new()
            }
            None => Vec::new(),
        };
        let status = child.wait()?;
        check_output(Output {
            status,
            stdout: Vec::new(),
            stderr,
        })?;
        written?;

        log::info!(
            "Recorded {} frames to {}",
            self.accepted,
            self.output.display()
        );
        Ok(())
    }

    fn frames(&self) -> u64 {
        self.accepted
    }
}

impl Drop for FfmpegRecorder {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            log::warn!("Recording to {} failed: {e}", self.output.display());
        }
    }
}

/// Convert a finished video into an animated GIF
pub fn transcode_gif(program: &str, video: &Path, gif: &Path) -> Result<(), RecordError> {
    log::info!("Transcoding {} -> {}", video.display(), gif.display());
    let output = Command::new(program)
        .args(gif_args(video, gif))
        .stdin(Stdio::null())
        .output()
        .map_err(|source| RecordError::Spawn {
            program: program.to_string(),
            source,
        })?;
    check_output(output)
}
