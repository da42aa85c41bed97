//! Printers: status lines, framed solutions and markdown (termimad).

use owo_colors::OwoColorize;
use termimad::MadSkin;

const RULE_WIDTH: usize = 38;

pub struct MarkdownPrinter {
    pub skin: MadSkin,
}

impl Default for MarkdownPrinter {
    fn default() -> Self {
        Self { skin: MadSkin::default() }
    }
}

impl MarkdownPrinter {
    pub fn print(&self, text: &str) {
        self.skin.print_text(text);
    }
}

pub fn rule(ch: char) -> String {
    std::iter::repeat(ch).take(RULE_WIDTH).collect()
}

pub fn banner() {
    println!("\n{}", rule('='));
    println!("  Neuro-Symbolic Puzzle Solver");
    println!("  User > LLM > Prolog > LLM > User");
    println!("{}\n", rule('='));
}

/// Bracketed progress line, e.g. `[Executing Prolog program...]`.
pub fn status(text: &str) {
    println!("{}", format!("[{}]", text).cyan());
}

pub fn failure(text: &str) {
    eprintln!("{}", format!("[ERROR] {}", text).red());
}

pub fn solution(text: &str, markdown: bool) {
    println!("\n{}", rule('-'));
    println!("{}", "Solution:".green());
    println!("{}", rule('-'));
    if markdown {
        MarkdownPrinter::default().print(text);
    } else {
        println!("{}", text);
    }
    println!("{}\n", rule('-'));
}
