//! Terminal presentation: coloured output and line-based prompts
//!
//! The in-memory implementations back the command tests.

use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Mutex;

use crossterm::style::{Color, StyledContent, Stylize};

use crate::traits::{OutputSink, Prompter};
use crate::types::Style;

fn styled(style: Style, text: &str) -> StyledContent<&str> {
    match style {
        Style::Plain => text.stylize(),
        Style::Title => text.with(Color::Blue).bold(),
        Style::Heading => text.with(Color::Yellow).bold(),
        Style::Info => text.with(Color::Cyan),
        Style::Success => text.with(Color::Green),
        Style::Warning => text.with(Color::Yellow),
        Style::Error => text.with(Color::Red),
        Style::Dim => text.dim(),
        Style::Highlight => text.with(Color::Magenta).bold(),
    }
}

/// Colour only when stdout is an interactive terminal
pub fn stdout_supports_color() -> bool {
    io::stdout().is_terminal()
}

/// Writes styled lines to stdout
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    color: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Plain output without escape codes
    pub fn without_color() -> Self {
        Self::with_color(false)
    }

    pub fn with_color(color: bool) -> Self {
        Self { color }
    }

    /// Coloured on a terminal, plain when redirected or piped
    pub fn for_stdout() -> Self {
        Self::with_color(stdout_supports_color())
    }

    pub fn render(&self, style: Style, text: &str) -> String {
        if !self.color || style == Style::Plain {
            return text.to_string();
        }
        styled(style, text).to_string()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for ConsoleSink {
    fn emit(&self, style: Style, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", self.render(style, text));
    }
}

/// Records lines in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(Style, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Style, String)> {
        self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    /// All recorded text joined with newlines
    pub fn text(&self) -> String {
        self.lines()
            .into_iter()
            .map(|(_, line)| line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|(_, line)| line.contains(needle))
    }
}

impl OutputSink for MemorySink {
    fn emit(&self, style: Style, text: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((style, text.to_string()));
        }
    }
}

/// Reads answers from stdin
#[derive(Debug, Clone, Default)]
pub struct StdinPrompter {
    color: bool,
}

impl StdinPrompter {
    pub fn new() -> Self {
        Self { color: false }
    }

    pub fn with_color(color: bool) -> Self {
        Self { color }
    }

    pub fn for_stdout() -> Self {
        Self::with_color(stdout_supports_color())
    }

    pub fn render_prompt(&self, prompt: &str) -> String {
        if self.color {
            styled(Style::Info, prompt).to_string()
        } else {
            prompt.to_string()
        }
    }
}

impl Prompter for StdinPrompter {
    fn ask(&self, prompt: &str) -> Option<String> {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{}", self.render_prompt(prompt));
        let _ = stdout.flush();
        drop(stdout);

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

/// Replays a fixed list of answers, then reports end of input
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Questions asked so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|asked| asked.clone()).unwrap_or_default()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, prompt: &str) -> Option<String> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(prompt.to_string());
        }
        self.answers.lock().ok()?.pop_front()
    }
}

/// Print a double-line box banner
pub fn banner(sink: &dyn OutputSink, title: &str) {
    const WIDTH: usize = 62;
    let padding = WIDTH.saturating_sub(title.chars().count() + 2);
    sink.blank();
    sink.emit(Style::Title, &format!("╔{}╗", "═".repeat(WIDTH)));
    sink.emit(Style::Title, &format!("║  {}{}║", title, " ".repeat(padding)));
    sink.emit(Style::Title, &format!("╚{}╝", "═".repeat(WIDTH)));
    sink.blank();
}

/// Print `title` underlined with `ch`
pub fn section(sink: &dyn OutputSink, title: &str, ch: char, width: usize) {
    sink.emit(Style::Heading, title);
    sink.emit(Style::Dim, &ch.to_string().repeat(width));
}

/// Ask a yes/no question; `default` applies to an empty answer or end of input
pub fn confirm(prompter: &dyn Prompter, question: &str, default: bool) -> bool {
    match prompter.ask(question) {
        Some(answer) => match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        },
        None => default,
    }
}
