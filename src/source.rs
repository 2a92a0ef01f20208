//! Frame acquisition boundary.
//!
//! The detector only ever sees this trait: a blocking sequential read
//! with a position index, a frame rate, and an optional total count
//! (`None` for live feeds). Exhaustion is an ordinary `None`, which the
//! scanner treats as the end of its window rather than a fault.
use crate::image::{io::load_grayscale_image, GrayImageU8};
use std::path::{Path, PathBuf};

/// A single sample from the video source. Consumed by the pipeline stage
/// that needs it, never retained.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Monotonically increasing position in the stream.
    pub index: u64,
    /// Timestamp derived from the source frame rate.
    pub timestamp_s: f64,
    pub gray: GrayImageU8,
}

pub trait FrameSource {
    /// Blocking read of the next frame; `None` when the stream ends.
    fn next_frame(&mut self) -> Option<Frame>;

    /// Source frame rate; also the length of a one-second scan window.
    fn fps(&self) -> f64;

    /// Total frames when known (recorded streams); `None` for live feeds.
    fn total_frames(&self) -> Option<u64>;
}

/// In-memory source over pre-decoded grayscale frames.
pub struct MemorySource {
    frames: Vec<GrayImageU8>,
    fps: f64,
    cursor: usize,
}

impl MemorySource {
    pub fn new(frames: Vec<GrayImageU8>, fps: f64) -> Self {
        Self {
            frames,
            fps,
            cursor: 0,
        }
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> Option<Frame> {
        let gray = self.frames.get(self.cursor)?.clone();
        let index = self.cursor as u64;
        self.cursor += 1;
        Some(Frame {
            index,
            timestamp_s: index as f64 / self.fps,
            gray,
        })
    }

    fn fps(&self) -> f64 {
        self.fps
    }

    fn total_frames(&self) -> Option<u64> {
        Some(self.frames.len() as u64)
    }
}

/// Recorded stream as a directory of image files, ordered by file name.
pub struct DirectorySource {
    paths: Vec<PathBuf>,
    fps: f64,
    cursor: usize,
}

impl DirectorySource {
    pub fn open(dir: &Path, fps: f64) -> Result<Self, String> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| format!("Failed to read frame dir {}: {e}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        if paths.is_empty() {
            return Err(format!("No frames in {}", dir.display()));
        }
        paths.sort();
        Ok(Self {
            paths,
            fps,
            cursor: 0,
        })
    }
}

impl FrameSource for DirectorySource {
    fn next_frame(&mut self) -> Option<Frame> {
        // unreadable files end the stream like a failed capture read would
        let path = self.paths.get(self.cursor)?;
        let gray = load_grayscale_image(path).ok()?;
        let index = self.cursor as u64;
        self.cursor += 1;
        Some(Frame {
            index,
            timestamp_s: index as f64 / self.fps,
            gray,
        })
    }

    fn fps(&self) -> f64 {
        self.fps
    }

    fn total_frames(&self) -> Option<u64> {
        Some(self.paths.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(w: usize, h: usize) -> GrayImageU8 {
        GrayImageU8::new(w, h, vec![0; w * h])
    }

    #[test]
    fn memory_source_sequences_indices() {
        let mut src = MemorySource::new(vec![blank(4, 4), blank(4, 4), blank(4, 4)], 30.0);
        assert_eq!(src.total_frames(), Some(3));
        assert_eq!(src.next_frame().unwrap().index, 0);
        assert_eq!(src.next_frame().unwrap().index, 1);
        let last = src.next_frame().unwrap();
        assert_eq!(last.index, 2);
        assert!((last.timestamp_s - 2.0 / 30.0).abs() < 1e-9);
        assert!(src.next_frame().is_none());
    }
}
