use crate::probe::prelude::*;

/// Aggregated counts plus the ordered warning and failure lines for one run.
/// Warnings never affect the exit code; only `failed` does.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
    pub failures: Vec<String>,
    pub warnings: Vec<String>,
    pub total_duration_ms: u128,
}

impl RunSummary {
    /// Partition the records by outcome, preserving execution order within
    /// each partition.
    pub fn from_records(records: &[ProbeRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };

        for record in records {
            summary.total_duration_ms += record.elapsed.as_millis();
            match &record.outcome {
                Outcome::Passed => summary.passed += 1,
                Outcome::Warning(_) => {
                    summary.warned += 1;
                    summary.warnings.push(record.line());
                }
                Outcome::Failed(_) => {
                    summary.failed += 1;
                    summary.failures.push(record.line());
                }
            }
        }

        summary
    }

    pub fn all_clear(&self) -> bool {
        self.failed == 0
    }
}

/// Print a section banner.
pub fn banner(title: &str) {
    println!("{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

pub fn to_fixed_width(input: &str, width: usize) -> String {
    use unicode_truncate::UnicodeTruncateStr;

    let (truncated, _) = input.unicode_truncate(width);
    format!("{:<width$}", truncated, width = width)
}

/// Print the grouped result lines followed by the combined summary with its
/// failure and warning sections.
pub fn print_report(records: &[ProbeRecord], summary: &RunSummary) {
    println!();
    banner("COMPREHENSIVE TEST SUMMARY");

    for group in ProbeGroup::ALL {
        println!();
        println!("{}:", group.heading());
        for record in records.iter().filter(|r| r.group == group) {
            println!("  {}", record.line());
        }
    }

    println!();
    println!("Total Tests: {}", summary.total);
    println!("Successful Tests: {}", summary.passed);
    println!("Warning Tests (Auth Required): {}", summary.warned);
    println!("Failed Tests: {}", summary.failed);
    println!("Duration: {}ms", summary.total_duration_ms);

    if !summary.failures.is_empty() {
        println!();
        println!("CRITICAL FAILURES:");
        for failure in &summary.failures {
            println!("  {failure}");
        }
    }

    if !summary.warnings.is_empty() {
        println!();
        println!("WARNINGS (Expected - Auth Required):");
        for warning in &summary.warnings {
            println!("  {warning}");
        }
    }

    if summary.all_clear() {
        println!();
        println!("✅ All accessible tests passed! Auth-protected endpoints behaving as expected.");
    }
}
