// Pipelines — train, classify, and evaluate, wiring the corpus reader to the
// model. These are what the CLI commands call.

pub mod classify;
pub mod evaluate;
pub mod train;

use indicatif::{ProgressBar, ProgressStyle};

/// A `[bar] pos/len` progress bar, or a hidden one when `show` is false.
fn progress_bar(len: usize, label: &str, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!("  {label} [{{bar:30}}] {{pos}}/{{len}} ({{eta}})"))
            .expect("valid template"),
    );
    pb
}
