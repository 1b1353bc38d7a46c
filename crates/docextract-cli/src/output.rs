use std::io::Write;

use owo_colors::OwoColorize;

use docextract_core::ExtractError;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// One-line summary, written to stderr so stdout stays pure text.
pub fn print_summary(
    w: &mut dyn Write,
    file_name: &str,
    media_type: &str,
    chars: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let line = format!("Extracted {} characters from {} ({})", chars, file_name, media_type);
    if color.enabled() {
        writeln!(w, "{}", line.dimmed())
    } else {
        writeln!(w, "{}", line)
    }
}

pub fn print_failure(w: &mut dyn Write, err: &ExtractError, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "error:".red().bold(), err.red())
    } else {
        writeln!(w, "error: {}", err)
    }
}

/// The same body the HTTP service would return.
pub fn json_body(result: &Result<String, ExtractError>) -> serde_json::Value {
    match result {
        Ok(text) => serde_json::json!({ "text": text }),
        Err(e) => serde_json::json!({ "error": e.to_string() }),
    }
}
