//! Terminal markdown rendering with syntax-highlighted code blocks.
//!
//! `TerminalFormatter` is the terminal's [`ContentFormatter`]: `termimad` for
//! prose and `syntect` for fenced code. The skin follows the applied theme,
//! read from the theme state's `watch` channel on every render.

use std::borrow::Cow;

use coursechat_core::render::ContentFormatter;
use coursechat_types::theme::Theme;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;
use termimad::crossterm::style::Color;
use tokio::sync::watch;

/// Terminal formatter with theme-aware skins and syntax highlighting.
pub struct TerminalFormatter {
    dark: MadSkin,
    light: MadSkin,
    theme: watch::Receiver<Theme>,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl TerminalFormatter {
    /// Create a formatter that follows the given theme channel.
    pub fn new(theme: watch::Receiver<Theme>) -> Self {
        let mut dark = MadSkin::default_dark();
        dark.bold.set_fg(Color::Cyan);
        dark.headers[0].set_fg(Color::Cyan);
        dark.headers[1].set_fg(Color::Cyan);
        dark.inline_code.set_fg(Color::Yellow);

        let mut light = MadSkin::default_light();
        light.bold.set_fg(Color::DarkBlue);
        light.headers[0].set_fg(Color::DarkBlue);
        light.headers[1].set_fg(Color::DarkBlue);
        light.inline_code.set_fg(Color::DarkMagenta);

        Self {
            dark,
            light,
            theme,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    fn current_theme(&self) -> Theme {
        *self.theme.borrow()
    }

    fn skin(&self) -> &MadSkin {
        match self.current_theme() {
            Theme::Dark => &self.dark,
            Theme::Light => &self.light,
        }
    }

    /// Highlight a code block using syntect.
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let theme_name = match self.current_theme() {
            Theme::Dark => "base16-ocean.dark",
            Theme::Light => "InspiredGitHub",
        };
        let theme = &self.theme_set.themes[theme_name];
        let mut h = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        output.push_str(&format!("  {}\n", console::style(format!("--- {lang} ---")).dim()));

        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }

        output
    }
}

impl ContentFormatter for TerminalFormatter {
    fn escape(&self, text: &str) -> String {
        strip_control(text)
    }

    /// Render markdown; code fences are highlighted via syntect, everything
    /// else goes through termimad.
    fn markdown(&self, text: &str) -> String {
        let text = strip_control(text);
        let skin = self.skin();
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in text.lines() {
            if line.starts_with("```") && !in_code_block {
                in_code_block = true;
                code_lang = line.trim_start_matches('`').trim().to_string();
                code_buf.clear();
            } else if line.starts_with("```") && in_code_block {
                in_code_block = false;
                output.push_str(&self.highlight_code(&code_buf, &code_lang));
                output.push('\n');
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                output.push_str(&format!("{}", skin.term_text(line)));
            }
        }

        // Unclosed fence.
        if in_code_block && !code_buf.is_empty() {
            output.push_str(&self.highlight_code(&code_buf, &code_lang));
        }

        output
    }
}

/// Remove escape sequences and control characters, keeping newlines and tabs.
pub fn strip_control(text: &str) -> String {
    let stripped: Cow<'_, str> = console::strip_ansi_codes(text);
    stripped
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Wrap `label` in an OSC 8 hyperlink to `url`.
pub fn hyperlink(label: &str, url: &str) -> String {
    let url = strip_control(url);
    format!("\x1b]8;;{url}\x1b\\{label}\x1b]8;;\x1b\\")
}
