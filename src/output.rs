//! # Console Output
//!
//! Helpers for what submodule-sync prints while it works: phase banners and
//! per-action lines, coloured when the terminal and the user allow it.
//!
//! ## Respecting User Preferences
//!
//! Colour is controlled by:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! Console output is presentation only. The durable record of a run is the
//! log file written through the `log` facade.

use std::env;

use console::style;

use crate::report::Phase;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
    /// Suppress progress output; the final summary is still printed.
    pub quiet: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: "always", "never" or "auto".
    /// In auto mode colors are disabled by `NO_COLOR`, `CLICOLOR=0`,
    /// `TERM=dumb`, or a non-TTY stdout unless `CLICOLOR_FORCE=1`.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self {
            use_color,
            quiet: false,
        }
    }

    /// Same configuration with progress output suppressed or enabled.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn detect_color_support() -> bool {
        // The presence of NO_COLOR, even empty, disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self {
            use_color: true,
            quiet: false,
        }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self {
            use_color: false,
            quiet: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Banner printed when a phase starts.
pub fn phase_banner(config: &OutputConfig, phase: Phase) -> String {
    let title = match phase {
        Phase::Initialize => "*** Initializing submodules ***",
        Phase::Remove => "*** Removing old projects ***",
        Phase::Add => "*** Adding new projects ***",
        Phase::Update => "*** Updating existing projects ***",
    };
    if !config.use_color {
        return title.to_string();
    }
    let styled = match phase {
        Phase::Initialize => style(title).bold(),
        Phase::Remove => style(title).red(),
        Phase::Add => style(title).green(),
        Phase::Update => style(title).blue(),
    };
    styled.force_styling(true).to_string()
}

/// Line printed before a submodule is acted on, e.g. "Removing submodule libs/c".
pub fn action_line(config: &OutputConfig, phase: Phase, subject: &str) -> String {
    let verb = match phase {
        Phase::Initialize => "Initializing",
        Phase::Remove => "Removing submodule",
        Phase::Add => "Adding submodule",
        Phase::Update => "Updating submodule",
    };
    let line = format!("{} {}", verb, subject);
    if !config.use_color {
        return line;
    }
    let styled = match phase {
        Phase::Initialize => style(line),
        Phase::Remove => style(line).red(),
        Phase::Add => style(line).green(),
        Phase::Update => style(line).blue(),
    };
    styled.force_styling(true).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("NEVER");
        assert!(!config.use_color);
    }

    #[test]
    fn test_quiet_builder() {
        let config = OutputConfig::without_color().quiet(true);
        assert!(config.quiet);
        assert!(!config.use_color);
    }

    #[test]
    fn test_emoji_helper() {
        assert_eq!(emoji(&OutputConfig::with_color(), "✅", "[OK]"), "✅");
        assert_eq!(emoji(&OutputConfig::without_color(), "✅", "[OK]"), "[OK]");
    }

    #[test]
    fn test_phase_banner_plain() {
        let config = OutputConfig::without_color();
        assert_eq!(
            phase_banner(&config, Phase::Remove),
            "*** Removing old projects ***"
        );
        assert_eq!(
            phase_banner(&config, Phase::Update),
            "*** Updating existing projects ***"
        );
    }

    #[test]
    fn test_phase_banner_colored() {
        let banner = phase_banner(&OutputConfig::with_color(), Phase::Add);
        assert!(banner.contains("\u{1b}["));
        assert!(banner.contains("*** Adding new projects ***"));
    }

    #[test]
    fn test_action_line() {
        let config = OutputConfig::without_color();
        assert_eq!(
            action_line(&config, Phase::Add, "../b"),
            "Adding submodule ../b"
        );
    }
}
