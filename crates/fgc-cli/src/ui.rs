//! UI utilities for the CLI

use colored::*;
use crossterm::{
    event::{self, Event, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode, size},
};
use std::io::{self, IsTerminal, Write};

use fgc_core::{Answer, Result};

const PREVIEW_CHARS: usize = 220;

/// Display startup banner
pub fn display_banner(model_label: &str) {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(60, terminal_width.saturating_sub(4));

    let top_border = format!("┌{}┐", "─".repeat(banner_width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(banner_width - 2));
    let empty_line = format!("│{}│", " ".repeat(banner_width - 2));

    println!();
    println!("{}", top_border.blue());
    println!("{}", empty_line.blue());

    let title = "💬 Finance Glossary Copilot";
    let title_line = format!(
        "│  {}{}│",
        title.blue().bold(),
        " ".repeat(banner_width.saturating_sub(title.chars().count() + 4))
    );
    println!("{}", title_line);

    println!("{}", empty_line.blue());
    println!("{}", bottom_border.blue());
    println!();
    println!(
        "{}",
        "Grounded Q&A over your CSV notes using a local LLM.".dimmed()
    );
    println!("{} {}", "Model in use:".dimmed(), model_label.cyan());
    println!();
    println!(
        "{}",
        "💡 Tip: add clear definitions to your CSV and rebuild the index for sharper answers."
            .dimmed()
    );
    println!();
}

/// Handle input with command history navigation
pub async fn handle_input_with_history(history: &mut Vec<String>) -> Result<String> {
    // Piped input: read from stdin directly
    if !io::stdin().is_terminal() {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_string();
        if !input.is_empty() {
            history.push(input.clone());
        }
        return Ok(input);
    }

    enable_raw_mode()?;
    let mut input = String::new();
    let mut history_index: Option<usize> = None;
    let mut cursor_pos = 0;

    print!("{} ", "fgc>".green().bold());
    io::stdout().flush()?;

    loop {
        if let Event::Key(key_event) = event::read()? {
            match key_event.code {
                KeyCode::Enter => {
                    disable_raw_mode()?;
                    println!();
                    if !input.is_empty() {
                        history.push(input.clone());
                    }
                    return Ok(input);
                }
                KeyCode::Char(c) => {
                    input.insert(cursor_pos, c);
                    cursor_pos += 1;
                    print!("\r{} {}", "fgc>".green().bold(), input);
                    io::stdout().flush()?;
                }
                KeyCode::Backspace => {
                    if cursor_pos > 0 {
                        input.remove(cursor_pos - 1);
                        cursor_pos -= 1;
                        print!(
                            "\r{} {}  \r{} {}",
                            "fgc>".green().bold(),
                            input,
                            "fgc>".green().bold(),
                            input
                        );
                        io::stdout().flush()?;
                    }
                }
                KeyCode::Up => {
                    if !history.is_empty() {
                        let new_index = match history_index {
                            None => history.len() - 1,
                            Some(idx) if idx > 0 => idx - 1,
                            Some(idx) => idx,
                        };
                        history_index = Some(new_index);
                        input = history[new_index].clone();
                        cursor_pos = input.len();
                        print!(
                            "\r{} {}  \r{} {}",
                            "fgc>".green().bold(),
                            " ".repeat(50),
                            "fgc>".green().bold(),
                            input
                        );
                        io::stdout().flush()?;
                    }
                }
                KeyCode::Down => {
                    if let Some(idx) = history_index {
                        if idx < history.len() - 1 {
                            let new_index = idx + 1;
                            history_index = Some(new_index);
                            input = history[new_index].clone();
                        } else {
                            history_index = None;
                            input.clear();
                        }
                        cursor_pos = input.len();
                        print!(
                            "\r{} {}  \r{} {}",
                            "fgc>".green().bold(),
                            " ".repeat(50),
                            "fgc>".green().bold(),
                            input
                        );
                        io::stdout().flush()?;
                    }
                }
                KeyCode::Esc => {
                    disable_raw_mode()?;
                    println!();
                    return Ok(String::new());
                }
                _ => {}
            }
        }
    }
}

/// Display help message
pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!(
        "  {} - Ask a finance question in natural language",
        "question".green()
    );
    println!(
        "  {} - Switch simple-explanation mode on or off",
        "eli15 on|off".green()
    );
    println!("  {} - Show index statistics", "stats".green());
    println!("  {} - Show this help message", "help".green());
    println!("  {} - Exit the application", "exit/quit".green());
    println!();
    println!("{}", "Examples:".bold());
    println!("  What is diversification?");
    println!("  How does compound interest work?");
}

/// Render an answer and the snippets it was grounded on
pub fn render_answer(answer: &Answer) {
    println!();
    println!("{}", "💡 Answer".bold());
    println!("{}", answer.text.trim());

    if answer.sources.is_empty() {
        return;
    }

    println!();
    println!("{}", "📘 Sources (top matches)".bold());
    for (i, snippet) in answer.sources.iter().enumerate() {
        let row = snippet
            .row()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "—".to_string());
        let source_label = snippet
            .source()
            .map(|s| format!(" • source: {}", s.bold()))
            .unwrap_or_default();

        println!(
            "  {} Row {}{}",
            format!("{}.", i + 1).green(),
            row,
            source_label
        );
        println!("     {}", preview(&snippet.content, PREVIEW_CHARS).dimmed());
    }
}

/// Single-line preview of snippet content, truncated to `max_chars`
pub fn preview(content: &str, max_chars: usize) -> String {
    let flattened = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }
    let truncated: String = flattened.chars().take(max_chars).collect();
    format!("{}…", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_flattens_whitespace() {
        assert_eq!(preview("a  b\nc\t d", 220), "a b c d");
    }

    #[test]
    fn test_preview_truncates_long_content() {
        let long = "word ".repeat(100);
        let shown = preview(&long, 220);
        assert_eq!(shown.chars().count(), 221);
        assert!(shown.ends_with('…'));
    }

    #[test]
    fn test_preview_keeps_short_content_intact() {
        let text = "Inflation is a general rise in prices.";
        assert_eq!(preview(text, 220), text);
    }
}
