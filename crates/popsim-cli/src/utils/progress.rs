use crate::data::DownloadProgress;
use indicatif::{HumanBytes, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use stdpopsim::engine::progress::{Progress, ProgressCallback};
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders engine progress on stderr as a single spinner.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
    base_message: Arc<Mutex<String>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::new_spinner().with_style(spinner_style());
        pb.set_draw_target(target);
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
            base_message: Arc::new(Mutex::new(String::new())),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();
        let base_clone = self.base_message.clone();

        Box::new(move |progress: Progress| {
            let (Ok(pb_guard), Ok(mut base)) = (pb_clone.lock(), base_clone.lock()) else {
                warn!("Progress state mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb_guard.reset();
                    pb_guard.set_style(spinner_style());
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb_guard.set_message(name.to_string());
                    *base = name.to_string();
                }
                Progress::OutputWritten { bytes } => {
                    pb_guard.set_message(format!("{} ({})", base, HumanBytes(bytes)));
                }
                Progress::PhaseFinish => {
                    pb_guard.disable_steady_tick();
                    pb_guard.finish_and_clear();
                    base.clear();
                }
            }
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// A byte-counting bar for map downloads, drawn on stderr.
pub fn download_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    pb.set_draw_target(ProgressDrawTarget::stderr_with_hz(2));
    pb
}

/// Feeds [`DownloadProgress`] events into a bar from [`download_bar`].
pub fn download_callback(pb: &ProgressBar) -> impl FnMut(DownloadProgress) + '_ {
    move |progress| match progress {
        DownloadProgress::Started { total_size } => {
            if let Some(size) = total_size {
                pb.set_length(size);
            }
            pb.set_message("Downloading...");
        }
        DownloadProgress::Downloading { downloaded } => {
            pb.set_position(downloaded);
        }
        DownloadProgress::Unpacking => {
            pb.set_style(spinner_style());
            pb.set_message("Unpacking archive...");
        }
    }
}
