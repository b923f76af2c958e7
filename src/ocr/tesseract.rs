//! Tesseract CLI recognizer.
//!
//! Runs `<command> <image> stdout -l <language>` as a child process and reads
//! the recognized text from its stdout. The CLI reports no progress of its
//! own, so progress is estimated from elapsed time while the child runs.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::{detect_image_format, RecognitionError, TextRecognizer};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Elapsed time at which the progress estimate reaches half way.
const HALF_PROGRESS_AFTER: Duration = Duration::from_secs(3);

pub struct TesseractRecognizer {
    command: String,
    language: String,
}

impl TesseractRecognizer {
    pub fn new(command: &str, language: &str) -> Self {
        Self {
            command: command.to_string(),
            language: language.to_string(),
        }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(
        &self,
        image: &Path,
        progress: &mut dyn FnMut(u8),
        cancel: &AtomicBool,
    ) -> Result<String, RecognitionError> {
        let bytes = std::fs::read(image).map_err(|e| {
            RecognitionError::UnsupportedImage(format!("cannot read {}: {e}", image.display()))
        })?;
        let format = detect_image_format(&bytes)?;
        tracing::info!(image = %image.display(), ?format, language = %self.language, "starting recognition");
        progress(0);

        let mut child = Command::new(&self.command)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RecognitionError::Engine(format!("failed to start {}: {e}", self.command)))?;

        // Drain both pipes on their own threads so a chatty child cannot block.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let started = Instant::now();
        let mut last_reported = 0u8;
        let status = loop {
            if cancel.load(Ordering::Relaxed) {
                let _ = child.kill();
                let _ = child.wait();
                tracing::info!("recognition cancelled");
                return Err(RecognitionError::Cancelled);
            }
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    let estimate = estimate_progress(started.elapsed());
                    if estimate > last_reported {
                        last_reported = estimate;
                        progress(estimate);
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RecognitionError::Engine(format!("failed to poll {}: {e}", self.command)));
                }
            }
        };

        let text = join(stdout, "stdout")?;
        let errors = join(stderr, "stderr")?;

        if !status.success() {
            let detail = errors.trim();
            return Err(RecognitionError::Engine(if detail.is_empty() {
                format!("{} exited with {status}", self.command)
            } else {
                format!("{} exited with {status}: {detail}", self.command)
            }));
        }

        progress(100);
        tracing::info!(chars = text.chars().count(), elapsed_ms = started.elapsed().as_millis() as u64, "recognition finished");
        Ok(text)
    }
}

type PipeReader = std::thread::JoinHandle<std::io::Result<String>>;

fn drain<R: Read + Send + 'static>(mut pipe: R) -> PipeReader {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    })
}

/// Collect a drained pipe. A failed read is an engine error, not short output.
fn join(handle: Option<PipeReader>, name: &str) -> Result<String, RecognitionError> {
    let Some(handle) = handle else {
        return Ok(String::new());
    };
    handle
        .join()
        .map_err(|_| RecognitionError::Engine(format!("{name} reader panicked")))?
        .map_err(|e| RecognitionError::Engine(format!("failed to read engine {name}: {e}")))
}

/// Monotonic estimate in `0..=99` that approaches 99 as time passes.
fn estimate_progress(elapsed: Duration) -> u8 {
    let t = elapsed.as_secs_f64();
    let half = HALF_PROGRESS_AFTER.as_secs_f64();
    let fraction = t / (t + half);
    (fraction * 99.0).floor() as u8
}
