use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::ui;

/// Optional progress bar; every method is a no-op when progress is off.
pub struct Progress {
    bar: Option<ProgressBar>,
}

fn terminal_columns() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
}

fn bar_template() -> &'static str {
    match terminal_columns() {
        Some(cols) if cols >= 110 => "{bar:40.cyan/blue} {pos}/{len} {elapsed_precise} {msg}",
        Some(cols) if cols >= 80 => "{wide_bar:.cyan/blue} {pos}/{len} {msg}",
        _ => "{wide_bar:.cyan/blue} {percent}% {msg}",
    }
}

impl Progress {
    #[must_use]
    pub fn bar(total: u64, message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template(bar_template())
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }
}
