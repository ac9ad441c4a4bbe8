//! Shared CLI helpers — path expansion, report rendering, banner.

use std::fmt::Write as _;
use std::path::PathBuf;

use colored::Colorize;

use newscheck_core::types::{AttemptOutcome, Method, VerificationReport, Verdict};

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

// ─────────────────────────────────────────────
// Report rendering
// ─────────────────────────────────────────────

/// Render a verification report for the terminal.
pub fn render_report(report: &VerificationReport) -> String {
    let mut out = String::new();

    if report.limit_exceeded(Method::Gemini) {
        let _ = writeln!(
            out,
            "{}",
            "⚠ Gemini usage limit exceeded, used fallback methods.".yellow()
        );
    }

    let _ = writeln!(out);
    match report.verdict {
        Some(Verdict::True) => {
            let _ = writeln!(out, "{}", "✅ This news is TRUE".green().bold());
        }
        Some(Verdict::Fake) => {
            let _ = writeln!(out, "{}", "❌ This news is FAKE".red().bold());
        }
        None => {
            let _ = writeln!(
                out,
                "{}",
                "❔ Could not determine whether this news is true".yellow().bold()
            );
        }
    }

    if let Some(method) = report.method {
        let _ = writeln!(out, "  {:<12} {}%", "Confidence:".bold(), report.confidence);
        let _ = writeln!(out, "  {:<12} {}", "Method:".bold(), method.display_name());
    }

    if let Some(explanation) = &report.explanation {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "Explanation".cyan().bold());
        let _ = writeln!(out, "  {explanation}");
    }

    if !report.sources.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "Sources".cyan().bold());
        for source in &report.sources {
            if source.starts_with("http") {
                let _ = writeln!(out, "  • {}", source.underline());
            } else {
                let _ = writeln!(out, "  • {source}");
            }
        }
    }

    if !report.attempts.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "Checked".dimmed());
        for attempt in &report.attempts {
            let _ = writeln!(
                out,
                "  {:<26} {} {}",
                attempt.method.display_name(),
                outcome_label(&attempt.outcome),
                format!("({} ms)", attempt.elapsed_ms).dimmed()
            );
        }
    }

    out
}

/// Print a verification report to stdout.
pub fn print_report(report: &VerificationReport) {
    print!("{}", render_report(report));
    println!();
}

fn outcome_label(outcome: &AttemptOutcome) -> String {
    match outcome {
        AttemptOutcome::Verdict => "✓ verdict".green().to_string(),
        AttemptOutcome::NoVerdict(detail) => format!("· {detail}").dimmed().to_string(),
        AttemptOutcome::Skipped(reason) => format!("- skipped: {reason}").dimmed().to_string(),
        AttemptOutcome::LimitExceeded => "⚠ limit exceeded".yellow().to_string(),
        AttemptOutcome::Failed(err) => format!("✗ {err}").red().to_string(),
    }
}

/// Print the banner shown at REPL start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "📰 Newscheck".cyan().bold(), version.dimmed());
    println!(
        "{}",
        "Paste a headline or news text, or \"exit\" to quit.".dimmed()
    );
    println!();
}

/// Print a "checking" placeholder while the chain runs.
pub fn print_checking() {
    eprint!("{}", "⠿ checking...".dimmed());
}

/// Clear the "checking" placeholder.
pub fn clear_checking() {
    eprint!("\r{}\r", " ".repeat(40));
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
