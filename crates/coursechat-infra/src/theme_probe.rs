//! Terminal color-scheme detection.
//!
//! Many terminals (rxvt, Konsole, iTerm2 with the option enabled) export
//! `COLORFGBG` as `"<fg>;<bg>"` or `"<fg>;<default>;<bg>"` using ANSI color
//! indices. The background index decides the theme.

use coursechat_types::theme::Theme;

/// Environment variable carrying the terminal's foreground/background colors.
pub const COLORFGBG: &str = "COLORFGBG";

/// Read the terminal's preferred theme from the environment.
pub fn probe_terminal_theme() -> Option<Theme> {
    let value = std::env::var(COLORFGBG).ok()?;
    let theme = parse_colorfgbg(&value);
    tracing::debug!(value = %value, theme = ?theme, "Probed terminal theme");
    theme
}

/// Map a `COLORFGBG` value to a theme.
///
/// Background indices 0-6 and 8 are dark colors; 7 and 9-15 are light.
pub fn parse_colorfgbg(value: &str) -> Option<Theme> {
    let background: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    match background {
        0..=6 | 8 => Some(Theme::Dark),
        7 | 9..=15 => Some(Theme::Light),
        _ => None,
    }
}
