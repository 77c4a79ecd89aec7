//! Background frame writer fed by a bounded channel

use std::io::{self, Write};
use std::sync::mpsc::{SyncSender, sync_channel};
use std::thread::{self, JoinHandle};

use super::{FrameSink, RecordError};
use crate::render::Canvas;

/// Streams raw `rgb24` frames to `W` on a dedicated thread
pub struct FrameRecorder<W: Write + Send + 'static> {
    width: u32,
    height: u32,
    sender: Option<SyncSender<Vec<u8>>>,
    worker: Option<JoinHandle<io::Result<W>>>,
    frames: u64,
}

impl<W: Write + Send + 'static> FrameRecorder<W> {
    /// Start the worker; at most `queue` frames wait in memory
    pub fn spawn(writer: W, width: u32, height: u32, queue: usize) -> Result<Self, RecordError> {
        let (sender, receiver) = sync_channel::<Vec<u8>>(queue.max(1));
        let worker = thread::Builder::new()
            .name("frame-recorder".into())
            .spawn(move || {
                let mut writer = writer;
                for frame in receiver {
                    writer.write_all(&frame)?;
                }
                writer.flush()?;
                Ok(writer)
            })?;

        Ok(Self {
            width,
            height,
            sender: Some(sender),
            worker: Some(worker),
            frames: 0,
        })
    }

    /// Close the queue and wait for the worker to drain it
    fn join(&mut self) -> Result<Option<W>, RecordError> {
        self.sender.take();
        match self.worker.take() {
            None => Ok(None),
            Some(handle) => match handle.join() {
                Ok(result) => Ok(Some(result?)),
                Err(_) => Err(RecordError::WorkerPanicked),
            },
        }
    }

    /// Finish and hand back the writer
    pub fn into_inner(mut self) -> Result<W, RecordError> {
        self.join()?.ok_or(RecordError::Closed)
    }
}

impl<W: Write + Send + 'static> FrameSink for FrameRecorder<W> {
    fn push(&mut self, frame: &Canvas) -> Result<(), RecordError> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(RecordError::FrameSize {
                width: self.width,
                height: self.height,
                got_width: frame.width(),
                got_height: frame.height(),
            });
        }
        let sender = self.sender.as_ref().ok_or(RecordError::Closed)?;
        if sender.send(frame.as_bytes().to_vec()).is_err() {
            // Worker hung up early; report why
            self.join()?;
            return Err(RecordError::Closed);
        }
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RecordError> {
        self.join().map(|_| ())
    }

    fn frames(&self) -> u64 {
        self.frames
    }
}

impl<W: Write + Send + 'static> Drop for FrameRecorder<W> {
    fn drop(&mut self) {
        if let Err(e) = self.join() {
            log::warn!("Frame recorder dropped with error: {e}");
        }
    }
}
