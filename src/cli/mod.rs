pub mod doctor;
pub mod import;
pub mod scan;
pub mod shell;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dosewise::ocr::{RecognitionError, TextRecognizer};
use indicatif::{ProgressBar, ProgressStyle};

/// Run recognition on a blocking thread with a progress bar. Ctrl-C cancels
/// the run; the engine's own errors are returned as-is.
pub async fn recognize_with_progress(
    recognizer: Arc<dyn TextRecognizer>,
    image: PathBuf,
) -> Result<String, RecognitionError> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  recognizing {bar:40.cyan/blue} {pos:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );

    let cancel = Arc::new(AtomicBool::new(false));
    let mut task = {
        let cancel = Arc::clone(&cancel);
        let pb = pb.clone();
        tokio::task::spawn_blocking(move || {
            recognizer.recognize(&image, &mut |p| pb.set_position(u64::from(p)), &cancel)
        })
    };

    let finished = tokio::select! {
        res = &mut task => Some(res),
        _ = interrupted() => None,
    };
    let joined = match finished {
        Some(res) => res,
        None => {
            cancel.store(true, Ordering::Relaxed);
            task.await
        }
    };
    pb.finish_and_clear();

    joined.unwrap_or_else(|e| Err(RecognitionError::Engine(format!("recognition task failed: {e}"))))
}

/// Resolves on Ctrl-C. Never resolves if the signal cannot be listened for.
pub async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
