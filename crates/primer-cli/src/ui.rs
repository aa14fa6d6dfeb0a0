use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub table_color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let prefs = resolve(
        flags,
        std::io::stderr().is_terminal(),
        std::io::stdout().is_terminal(),
    );
    let _ = UI_PREFS.set(prefs);
}

/// Progress draws on stderr, tables on stdout; each checks its own stream.
fn resolve(flags: &GlobalFlags, stderr_tty: bool, stdout_tty: bool) -> UiPrefs {
    let table = flags.format == OutputFormat::Table;
    let table_color = match flags.color {
        ColorMode::Always => table,
        ColorMode::Never => false,
        ColorMode::Auto => {
            stdout_tty && table && !flags.quiet && std::env::var_os("NO_COLOR").is_none()
        }
    };

    let progress = match flags.progress {
        ProgressMode::On => !flags.quiet && flags.format != OutputFormat::Json,
        ProgressMode::Off => false,
        ProgressMode::Auto => stderr_tty && !flags.quiet && flags.format != OutputFormat::Json,
    };

    let term_width = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);

    UiPrefs {
        table_color,
        progress,
        term_width,
    }
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        table_color: false,
        progress: false,
        term_width: None,
    })
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::cli::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};

    fn flags(format: OutputFormat, quiet: bool) -> GlobalFlags {
        GlobalFlags {
            format,
            quiet,
            verbose: false,
            color: ColorMode::Auto,
            progress: ProgressMode::Auto,
            root: None,
        }
    }

    #[test]
    fn progress_needs_a_terminal_in_auto_mode() {
        assert!(resolve(&flags(OutputFormat::Table, false), true, true).progress);
        assert!(!resolve(&flags(OutputFormat::Table, false), false, true).progress);
    }

    #[test]
    fn quiet_and_json_suppress_progress() {
        assert!(!resolve(&flags(OutputFormat::Table, true), true, true).progress);
        assert!(!resolve(&flags(OutputFormat::Json, false), true, true).progress);
    }

    #[test]
    fn color_always_only_applies_to_tables() {
        let mut always = flags(OutputFormat::Table, false);
        always.color = ColorMode::Always;
        assert!(resolve(&always, false, false).table_color);
        always.format = OutputFormat::Raw;
        assert!(!resolve(&always, false, false).table_color);
    }
}
