use std::time::Instant;

use clap::Parser;
use colored::Colorize;

use crate::cli::Cli;
use crate::discovery::collect_fixture_files;
use crate::execution::{SuiteSummary, run_suite};

const FAILURES_PER_KIND: usize = 5;

/// Returns `false` when any fixture failed.
pub fn run() -> bool {
    let cli = Cli::parse();
    let start = Instant::now();

    let files = collect_fixture_files(&cli.path);
    println!(
        "{} {} fixture(s) from {}\n",
        "stepmark".bold().cyan(),
        files.len(),
        cli.path.display()
    );

    let summary = run_suite(&files, cli.verbose);
    print_kind_table(&summary);
    if !cli.verbose {
        print_failures(&summary);
    }

    let totals = summary.totals();
    let verdict = if summary.has_failures() {
        "FAILED".red().bold()
    } else {
        "ok".green().bold()
    };
    println!(
        "\n{verdict}: {} passed, {} failed, {} skipped in {:.2}s",
        totals.passed,
        totals.failed,
        totals.skipped,
        start.elapsed().as_secs_f64()
    );

    !summary.has_failures()
}

fn print_kind_table(summary: &SuiteSummary) {
    println!("{:<8} {:>5} {:>5} {:>5}", "kind", "pass", "fail", "skip");
    for (kind, tally) in &summary.by_kind {
        let failed = if tally.failed > 0 {
            format!("{:>5}", tally.failed).red().to_string()
        } else {
            format!("{:>5}", tally.failed)
        };
        println!("{kind:<8} {:>5} {failed} {:>5}", tally.passed, tally.skipped);
    }
}

fn print_failures(summary: &SuiteSummary) {
    for (kind, failures) in &summary.failures {
        println!("\n{} {kind} ({} failing)", "--".red(), failures.len());
        for failure in failures.iter().take(FAILURES_PER_KIND) {
            println!("  {}\n    {}", failure.path.display(), failure.reason);
        }
        if failures.len() > FAILURES_PER_KIND {
            println!(
                "  {} more, rerun with --verbose",
                failures.len() - FAILURES_PER_KIND
            );
        }
    }
}
