//! Terminal markdown rendering with syntax-highlighted code blocks and
//! chart-aware streaming output.
//!
//! `ChatRenderer` combines `termimad` for prose and `syntect` for code
//! block highlighting. During streaming, tokens pass through a
//! [`StreamingFilter`] that withholds ```chart blocks (they are rendered
//! as glyph charts after the response completes, not as raw JSON).

use std::io::Write;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;

/// Terminal markdown renderer with syntax highlighting.
pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(termimad::crossterm::style::Color::Cyan);
        skin.headers[0].set_fg(termimad::crossterm::style::Color::Cyan);
        skin.headers[1].set_fg(termimad::crossterm::style::Color::Cyan);
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render a complete markdown response with syntax-highlighted code
    /// blocks.
    ///
    /// Code fences with a language tag are highlighted via syntect;
    /// everything else is rendered through termimad.
    pub fn render_final(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in markdown.lines() {
            if line.starts_with("```") && !in_code_block {
                in_code_block = true;
                code_lang = line.trim_start_matches('`').trim().to_string();
                code_buf.clear();
            } else if line.starts_with("```") && in_code_block {
                in_code_block = false;
                let highlighted = self.highlight_code(&code_buf, &code_lang);
                output.push_str(&highlighted);
                output.push('\n');
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                let rendered = self.skin.term_text(line);
                output.push_str(&format!("{rendered}"));
            }
        }

        if in_code_block && !code_buf.is_empty() {
            let highlighted = self.highlight_code(&code_buf, &code_lang);
            output.push_str(&highlighted);
        }

        output
    }

    /// Print a single streaming token (raw, no formatting).
    pub fn print_streaming_token(&self, token: &str) {
        print!("{token}");
        let _ = std::io::stdout().flush();
    }

    /// Print the stats footer after an agent response.
    ///
    /// Format: "| {tokens} tokens · {time}s · {model}"
    pub fn print_stats_footer(&self, tokens: u32, response_ms: u64, model: &str) {
        let seconds = response_ms as f64 / 1000.0;
        let footer = format!(
            "\n  {} {} tokens {} {:.1}s {} {}",
            console::style("|").dim(),
            console::style(tokens).dim(),
            console::style("\u{00b7}").dim(),
            console::style(seconds).dim(),
            console::style("\u{00b7}").dim(),
            console::style(model).dim(),
        );
        println!("{footer}");
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

        let theme = &self.theme_set.themes["base16-ocean.dark"];
        let mut h = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        output.push_str(&format!(
            "  {}\n",
            console::style(format!("--- {lang} ---")).dim()
        ));

        for line in code.lines() {
            let ranges: Vec<(Style, &str)> =
                h.highlight_line(line, &self.syntax_set).unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }

        output
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Line-buffered streaming filter that withholds ```chart blocks.
///
/// Tokens arrive in arbitrary fragments; this filter emits only complete
/// lines, and swallows the lines between a ```chart fence and its closing
/// fence. The swallowed chart is rendered separately once the full
/// response is known.
#[derive(Default)]
pub struct StreamingFilter {
    partial: String,
    in_chart_block: bool,
}

impl StreamingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a token; returns the text that should be printed now.
    pub fn push(&mut self, token: &str) -> String {
        let mut printable = String::new();
        self.partial.push_str(token);

        while let Some(newline_pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=newline_pos).collect();
            printable.push_str(&self.filter_line(&line));
        }

        printable
    }

    /// Flush any trailing partial line at end of stream.
    pub fn finish(&mut self) -> String {
        if self.partial.is_empty() {
            return String::new();
        }
        let line = std::mem::take(&mut self.partial);
        self.filter_line(&line)
    }

    fn filter_line(&mut self, line: &str) -> String {
        let trimmed = line.trim();
        if !self.in_chart_block && trimmed == "```chart" {
            self.in_chart_block = true;
            return String::new();
        }
        if self.in_chart_block {
            if trimmed == "```" {
                self.in_chart_block = false;
            }
            return String::new();
        }
        line.to_string()
    }
}
