//! Handles all user-facing output for the CLI.
//!
//! Color resolution, verdicts, diffs, and summaries live here so every
//! subcommand prints the same way.

use std::io::Write;

use difference::{Changeset, Difference};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::args::ColorMode;
use crate::equality::Verdict;
use crate::report::TestSummary;

/// Resolves `--color` against whether stdout is a terminal.
pub fn color_choice(mode: ColorMode) -> ColorChoice {
    match mode {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto if atty::is(atty::Stream::Stdout) => ColorChoice::Auto,
        ColorMode::Auto => ColorChoice::Never,
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Prints the outcome of a deep comparison, with a line diff of the two
/// documents when they differ.
pub fn print_verdict(choice: ColorChoice, verdict: &Verdict, expected: &str, actual: &str) {
    let mut stdout = StandardStream::stdout(choice);
    if verdict.equal {
        paint(&mut stdout, Color::Green, "equal");
        return;
    }

    paint(&mut stdout, Color::Red, "not equal");
    if let Some(explanation) = &verdict.explanation {
        let _ = writeln!(stdout, "  {explanation}");
    }
    if !verdict.path.is_empty() {
        let _ = writeln!(stdout, "  at {}", verdict.path.join(" > "));
    }
    let changeset = Changeset::new(expected, actual, "\n");
    print_diff(&mut stdout, &changeset.diffs);
}

/// Prints pass/fail counts and the failing cases.
pub fn print_summary(choice: ColorChoice, summary: &TestSummary) {
    let mut stdout = StandardStream::stdout(choice);
    let _ = writeln!(stdout);
    for failure in &summary.failures {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
        let _ = writeln!(stdout, "FAILED {}: {}", failure.should, failure.error);
        let _ = stdout.reset();
    }
    let color = if summary.has_failures() {
        Color::Red
    } else {
        Color::Green
    };
    paint(
        &mut stdout,
        color,
        &format!(
            "{} passed, {} failed ({:.1}%)",
            summary.passed,
            summary.failed,
            summary.success_rate()
        ),
    );
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn paint(stdout: &mut StandardStream, color: Color, text: &str) {
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = writeln!(stdout, "{text}");
    let _ = stdout.reset();
}

fn print_diff(stdout: &mut StandardStream, diffs: &[Difference]) {
    for diff in diffs {
        match diff {
            Difference::Same(ref x) => {
                let _ = stdout.reset();
                let _ = writeln!(stdout, " {}", x.replace('\n', "\n "));
            }
            Difference::Add(ref x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                let _ = writeln!(stdout, "+{}", x.replace('\n', "\n+"));
            }
            Difference::Rem(ref x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                let _ = writeln!(stdout, "-{}", x.replace('\n', "\n-"));
            }
        }
    }
    let _ = stdout.reset();
}
