// ConsoleLink - app/feed.rs
//
// Host event feed: decodes JSON-lines host events and streams them to the
// console from stdin or a followed file.
//
// Architecture:
//   - `parse_line` turns one feed line into a `HostEvent`.
//   - `FeedDecoder` splits raw bytes into numbered lines and decodes them.
//     Bytes stay undecoded until their newline arrives, so a character split
//     across two reads is never mangled. Stdin and the follower share it.
//   - `read_stream` drains a `BufRead` (stdin) until EOF.
//   - `FeedFollower` performs one poll tick against a growing feed file.
//     `FeedWatcher` runs it on a background thread; an `Arc<AtomicBool>`
//     cancel flag stops it.
//   - Both send `FeedProgress` messages over an mpsc channel. The console is
//     only ever touched by the receiving thread.
//
// Error policy:
//   - A malformed line is reported as `FeedProgress::Warning` and skipped.
//   - Invalid UTF-8 is decoded lossily (U+FFFD) in both readers.
//   - A line longer than MAX_FEED_PARTIAL_BYTES is reported once and skipped
//     up to and including its newline.
//   - A stat or read error on the followed file is reported once per failure
//     streak; the next tick retries.
//   - A truncated feed file (size < offset) restarts reading from byte 0.

use crate::core::filter::FilterCategory;
use crate::core::model::{HostLogType, HostTransition};
use crate::platform::fs;
use crate::util::constants::{
    DEBUG_MAX_LINE_PREVIEW, FEED_CANCEL_CHECK_INTERVAL_MS, MAX_FEED_PARTIAL_BYTES,
    MAX_FEED_READ_BYTES_PER_TICK,
};
use crate::util::error::FeedError;
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::io::{BufRead, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

// =============================================================================
// Wire format
// =============================================================================

/// One event delivered by the host editor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// A console message.
    Log {
        message: String,
        #[serde(default)]
        detail: Option<String>,
        #[serde(default = "default_log_type")]
        severity: HostLogType,
        /// Host capture time; stamped on receipt when absent.
        #[serde(default)]
        timestamp: Option<DateTime<Local>>,
    },
    /// Flip one filter toggle.
    Toggle { category: FilterCategory },
    /// Set one filter toggle explicitly.
    SetFilter {
        category: FilterCategory,
        enabled: bool,
    },
    /// Explicit save request (button or keyboard shortcut).
    Save,
    /// Copy the rendered output to the clipboard.
    Copy,
    /// Clear the console.
    Clear,
    /// Run-mode transition.
    Transition { state: HostTransition },
    /// The host is shutting down.
    Quit,
}

fn default_log_type() -> HostLogType {
    HostLogType::Log
}

/// Decode one feed line.
///
/// Blank lines yield `Ok(None)`. Lines not starting with `{` are plain log
/// messages with no detail.
pub fn parse_line(line: &str, line_number: u64) -> Result<Option<HostEvent>, FeedError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    if !line.trim_start().starts_with('{') {
        return Ok(Some(HostEvent::Log {
            message: line.to_string(),
            detail: None,
            severity: HostLogType::Log,
            timestamp: None,
        }));
    }

    serde_json::from_str(line)
        .map(Some)
        .map_err(|e| FeedError::Malformed {
            line_number,
            preview: preview(line),
            source: e,
        })
}

fn preview(line: &str) -> String {
    line.chars().take(DEBUG_MAX_LINE_PREVIEW).collect()
}

// =============================================================================
// Progress messages
// =============================================================================

/// Messages sent from a feed reader thread to the console thread.
#[derive(Debug)]
pub enum FeedProgress {
    /// Decoded events in feed order.
    Events(Vec<HostEvent>),
    /// A non-fatal problem; reading continues.
    Warning(FeedError),
    /// The stream reached end of input.
    Ended,
    /// The follower was cancelled.
    Stopped,
}

// =============================================================================
// Line assembly and decoding
// =============================================================================

/// One newline-delimited unit produced by `LineAssembler`.
#[derive(Debug, PartialEq)]
enum Segment {
    /// A complete line without its trailing `\n`.
    Line(Vec<u8>),
    /// A line that exceeded the length limit; its bytes were dropped.
    TooLong,
}

/// Buffers raw bytes and yields complete lines.
#[derive(Debug)]
struct LineAssembler {
    partial: Vec<u8>,
    /// Set after an oversized fragment was dropped: everything up to and
    /// including the next newline belongs to that line.
    discarding: bool,
    max_line_bytes: usize,
}

impl LineAssembler {
    fn new(max_line_bytes: usize) -> Self {
        Self {
            partial: Vec::new(),
            discarding: false,
            max_line_bytes,
        }
    }

    fn push(&mut self, mut bytes: &[u8]) -> Vec<Segment> {
        let mut segments = Vec::new();

        if self.discarding {
            match bytes.iter().position(|&b| b == b'\n') {
                Some(nl) => {
                    self.discarding = false;
                    bytes = &bytes[nl + 1..];
                }
                None => return segments,
            }
        }

        self.partial.extend_from_slice(bytes);

        let mut start = 0;
        while let Some(len) = self.partial[start..].iter().position(|&b| b == b'\n') {
            let end = start + len;
            if len > self.max_line_bytes {
                segments.push(Segment::TooLong);
            } else {
                segments.push(Segment::Line(self.partial[start..end].to_vec()));
            }
            start = end + 1;
        }
        self.partial.drain(..start);

        if self.partial.len() > self.max_line_bytes {
            self.partial.clear();
            self.discarding = true;
            segments.push(Segment::TooLong);
        }
        segments
    }

    /// Take the unterminated last line at end of input.
    fn finish(&mut self) -> Option<Vec<u8>> {
        let discarding = std::mem::take(&mut self.discarding);
        if discarding || self.partial.is_empty() {
            self.partial.clear();
            return None;
        }
        Some(std::mem::take(&mut self.partial))
    }

    fn reset(&mut self) {
        self.partial.clear();
        self.discarding = false;
    }
}

/// Decodes raw feed bytes into progress messages, numbering lines from 1.
///
/// Consecutive events are batched into one `FeedProgress::Events`; warnings
/// keep their position relative to the events around them.
#[derive(Debug)]
pub struct FeedDecoder {
    lines: LineAssembler,
    line_number: u64,
}

impl FeedDecoder {
    pub fn new() -> Self {
        Self::with_max_line_bytes(MAX_FEED_PARTIAL_BYTES)
    }

    pub fn with_max_line_bytes(max_line_bytes: usize) -> Self {
        Self {
            lines: LineAssembler::new(max_line_bytes),
            line_number: 0,
        }
    }

    /// Number of lines seen so far, skipped lines included.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Feed the next chunk of raw bytes.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<FeedProgress> {
        let mut out = Vec::new();
        let mut events = Vec::new();
        for segment in self.lines.push(bytes) {
            self.line_number += 1;
            let decoded = match segment {
                Segment::Line(raw) => decode_line(&raw, self.line_number),
                Segment::TooLong => Err(FeedError::LineTooLong {
                    line_number: self.line_number,
                    limit: self.lines.max_line_bytes,
                }),
            };
            collect_decoded(decoded, &mut events, &mut out);
        }
        flush_events(&mut events, &mut out);
        out
    }

    /// Decode a final line that has no trailing newline.
    pub fn finish(&mut self) -> Vec<FeedProgress> {
        let mut out = Vec::new();
        if let Some(raw) = self.lines.finish() {
            self.line_number += 1;
            let mut events = Vec::new();
            collect_decoded(decode_line(&raw, self.line_number), &mut events, &mut out);
            flush_events(&mut events, &mut out);
        }
        out
    }

    /// Drop any buffered fragment. Line numbering continues.
    pub fn reset(&mut self) {
        self.lines.reset();
    }
}

impl Default for FeedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_line(raw: &[u8], line_number: u64) -> Result<Option<HostEvent>, FeedError> {
    parse_line(&String::from_utf8_lossy(raw), line_number)
}

fn collect_decoded(
    decoded: Result<Option<HostEvent>, FeedError>,
    events: &mut Vec<HostEvent>,
    out: &mut Vec<FeedProgress>,
) {
    match decoded {
        Ok(Some(event)) => events.push(event),
        Ok(None) => {}
        Err(e) => {
            flush_events(events, out);
            out.push(FeedProgress::Warning(e));
        }
    }
}

fn flush_events(events: &mut Vec<HostEvent>, out: &mut Vec<FeedProgress>) {
    if !events.is_empty() {
        out.push(FeedProgress::Events(std::mem::take(events)));
    }
}

// =============================================================================
// Stream reader (stdin)
// =============================================================================

/// Read `reader` until EOF, sending decoded events as they arrive.
///
/// Returns early if the receiving side hangs up.
pub fn read_stream<R: BufRead>(mut reader: R, source: &Path, tx: &mpsc::Sender<FeedProgress>) {
    let mut decoder = FeedDecoder::new();

    loop {
        let chunk = match reader.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(source = %source.display(), error = %e, "Feed stream read error");
                let _ = tx.send(FeedProgress::Warning(FeedError::Io {
                    path: source.to_path_buf(),
                    source: e,
                }));
                break;
            }
        };
        if chunk.is_empty() {
            break;
        }
        let consumed = chunk.len();
        let progress = decoder.push(chunk);
        reader.consume(consumed);

        for msg in progress {
            if tx.send(msg).is_err() {
                return;
            }
        }
    }

    for msg in decoder.finish() {
        if tx.send(msg).is_err() {
            return;
        }
    }
    tracing::debug!(lines = decoder.line_number(), "Feed stream ended");
    let _ = tx.send(FeedProgress::Ended);
}

// =============================================================================
// FeedFollower (one poll tick against a followed file)
// =============================================================================

/// Incremental reader for a feed file that the host appends to.
#[derive(Debug)]
pub struct FeedFollower {
    path: PathBuf,
    offset: u64,
    decoder: FeedDecoder,
    /// Set while stat/read keeps failing, so a streak is reported once.
    failing: bool,
}

impl FeedFollower {
    /// Follow `path` from its first byte.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            offset: 0,
            decoder: FeedDecoder::new(),
            failing: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes of the feed file consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read whatever was appended since the last tick, at most
    /// `MAX_FEED_READ_BYTES_PER_TICK` bytes.
    pub fn poll(&mut self) -> Vec<FeedProgress> {
        let current_size = match std::fs::metadata(&self.path) {
            Ok(m) => m.len(),
            Err(e) => return self.io_problem(e, "stat"),
        };

        if current_size < self.offset {
            tracing::info!(
                file = %self.path.display(),
                old_offset = self.offset,
                new_size = current_size,
                "Feed truncated, restarting from the beginning"
            );
            self.offset = 0;
            self.decoder.reset();
        }

        if current_size == self.offset {
            self.recovered();
            return Vec::new();
        }

        let limit = (current_size - self.offset).min(MAX_FEED_READ_BYTES_PER_TICK as u64) as usize;
        let new_bytes = match fs::read_bytes_at(&self.path, self.offset, limit) {
            Ok(b) => b,
            Err(e) => return self.io_problem(e, "read"),
        };
        self.recovered();
        self.offset += new_bytes.len() as u64;

        let progress = self.decoder.push(&new_bytes);
        if !progress.is_empty() {
            tracing::debug!(
                bytes = new_bytes.len(),
                messages = progress.len(),
                "Feed: new input"
            );
        }
        progress
    }

    fn io_problem(&mut self, e: std::io::Error, operation: &'static str) -> Vec<FeedProgress> {
        if self.failing {
            tracing::debug!(file = %self.path.display(), error = %e, operation, "Feed: still failing");
            return Vec::new();
        }
        self.failing = true;
        tracing::warn!(file = %self.path.display(), error = %e, operation, "Feed file unavailable");
        vec![FeedProgress::Warning(FeedError::Io {
            path: self.path.clone(),
            source: e,
        })]
    }

    fn recovered(&mut self) {
        if self.failing {
            tracing::info!(file = %self.path.display(), "Feed file available again");
            self.failing = false;
        }
    }
}

// =============================================================================
// FeedWatcher (followed file on a background thread)
// =============================================================================

/// Follows a feed file on a background thread.
pub struct FeedWatcher {
    /// Channel receiver for feed progress messages.
    pub progress_rx: Option<mpsc::Receiver<FeedProgress>>,
    /// Cancel flag shared with the background thread.
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl FeedWatcher {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            cancel_flag: None,
        }
    }

    /// Start following `path` from its first byte. Any running follower is
    /// stopped first.
    ///
    /// Fails without starting a thread if `path` cannot be opened.
    pub fn start(&mut self, path: PathBuf, poll_interval_ms: u64) -> Result<(), FeedError> {
        self.stop();

        std::fs::File::open(&path).map_err(|e| FeedError::Io {
            path: path.clone(),
            source: e,
        })?;

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        self.progress_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));

        tracing::info!(path = %path.display(), poll_interval_ms, "Following feed file");
        let follower = FeedFollower::new(path);
        std::thread::spawn(move || {
            run_feed_follower(follower, poll_interval_ms, tx, cancel);
        });
        Ok(())
    }

    /// Request the background thread to stop. It exits within
    /// `FEED_CANCEL_CHECK_INTERVAL_MS`.
    pub fn stop(&mut self) {
        if let Some(flag) = &self.cancel_flag {
            flag.store(true, Ordering::SeqCst);
        }
        self.cancel_flag = None;
        self.progress_rx = None;
    }

    /// Returns `true` if a follower thread is currently active.
    pub fn is_active(&self) -> bool {
        self.cancel_flag.is_some()
    }
}

impl Default for FeedWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FeedWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Background poll loop.
fn run_feed_follower(
    mut follower: FeedFollower,
    poll_interval_ms: u64,
    tx: mpsc::Sender<FeedProgress>,
    cancel: Arc<AtomicBool>,
) {
    macro_rules! send {
        ($msg:expr) => {
            if tx.send($msg).is_err() {
                // Console side closed; exit silently.
                return;
            }
        };
    }

    let slices = (poll_interval_ms / FEED_CANCEL_CHECK_INTERVAL_MS).max(1);
    let mut first_tick = true;

    loop {
        if !first_tick {
            for _ in 0..slices {
                std::thread::sleep(Duration::from_millis(FEED_CANCEL_CHECK_INTERVAL_MS));
                if cancel.load(Ordering::SeqCst) {
                    send!(FeedProgress::Stopped);
                    return;
                }
            }
        }
        first_tick = false;

        for msg in follower.poll() {
            send!(msg);
        }
    }
}
