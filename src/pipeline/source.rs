use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use serde::Deserialize;

use crate::{
    error::SourceError,
    types::{FrameInput, HandObservation, Handedness, NUM_LANDMARKS},
};

/// Upstream seam: one call per frame, in order. `Ok(None)` ends the stream.
pub trait LandmarkSource: Send + 'static {
    fn next_frame(&mut self) -> Result<Option<FrameInput>, SourceError>;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<FrameInput>, SourceError> {
        (**self).next_frame()
    }
}

#[derive(Debug, Deserialize)]
struct FrameRecord {
    #[serde(default)]
    hand: Option<HandRecord>,
}

#[derive(Debug, Deserialize)]
struct HandRecord {
    #[serde(default)]
    handedness: Handedness,
    landmarks: Vec<(f32, f32)>,
}

/// Reads newline-delimited JSON frames written by an external landmark
/// detector:
///
/// ```text
/// {"hand": null}
/// {"hand": {"handedness": "Left", "landmarks": [[0.41, 0.72], ...]}}
/// ```
pub struct JsonLinesSource<R: BufRead + Send + 'static> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead + Send + 'static> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl JsonLinesSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl JsonLinesSource<BufReader<io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead + Send + 'static> LandmarkSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Option<FrameInput>, SourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }

            let record: FrameRecord =
                serde_json::from_str(text).map_err(|source| SourceError::Parse {
                    line: self.line,
                    source,
                })?;
            return decode_record(record, self.line).map(Some);
        }
    }
}

fn decode_record(record: FrameRecord, line: usize) -> Result<FrameInput, SourceError> {
    let Some(hand) = record.hand else {
        return Ok(None);
    };

    let got = hand.landmarks.len();
    let landmarks: [(f32, f32); NUM_LANDMARKS] = hand
        .landmarks
        .try_into()
        .map_err(|_| SourceError::LandmarkCount { line, got })?;

    Ok(Some(HandObservation {
        landmarks,
        handedness: hand.handedness,
    }))
}

/// In-memory frames, mostly for replays and tests.
pub struct VecSource {
    frames: std::vec::IntoIter<FrameInput>,
}

impl VecSource {
    pub fn new(frames: Vec<FrameInput>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl LandmarkSource for VecSource {
    fn next_frame(&mut self) -> Result<Option<FrameInput>, SourceError> {
        Ok(self.frames.next())
    }
}
