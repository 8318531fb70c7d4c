//! Human-readable text output

use crate::coordinator::EstimationReport;
use crate::util::time::{format_number, format_seconds_f64, format_watch_time};

/// Print an estimation report to console
///
/// Displays:
/// - Population and sample sizes
/// - Estimated total and average watch time
/// - Unresolved sample identifiers by cause
/// - Watch events per year
pub fn print_report(report: &EstimationReport) {
    print!("{}", render_report(report));
}

/// Render an estimation report as text
pub fn render_report(report: &EstimationReport) -> String {
    let mut out = String::new();
    let rule = "═══════════════════════════════════════════════════════════";

    out.push_str(&format!("{}\n", rule));
    out.push_str("                 WATCH TIME ESTIMATE\n");
    out.push_str(&format!("{}\n\n", rule));

    out.push_str("History:\n");
    out.push_str(&format!("  Entries:       {}\n", format_number(report.population as u64)));
    out.push_str(&format!("  Missing links: {}\n", format_number(report.missing_links as u64)));
    out.push('\n');

    out.push_str("Sample:\n");
    out.push_str(&format!(
        "  Size:          {} ({} drawn)\n",
        format_number(report.sample_size as u64),
        format_number(report.sampled as u64)
    ));
    out.push_str(&format!("  Requests:      {}\n", report.batches));
    out.push_str(&format!("  Total:         {}\n", format_watch_time(report.sample_total_duration)));

    if report.unresolved_in_sample > 0 {
        out.push_str(&format!("  Unresolved:    {}\n", report.unresolved_in_sample));
        out.push_str(&format!("    Over a day:  {}\n", report.out_of_range));
        out.push_str(&format!("    Unavailable: {}\n", report.unavailable));
    }

    if report.is_degraded() {
        out.push_str(&format!(
            "  WARNING: {} of {} requests failed, estimate uses the remaining sample\n",
            report.failed_batches, report.batches
        ));
    }
    out.push('\n');

    out.push_str("Estimate:\n");
    out.push_str(&format!(
        "  Total watch time: {} ({} seconds)\n",
        format_watch_time(report.total_estimated_duration),
        format_number(report.total_estimated_duration)
    ));
    out.push_str(&format!(
        "  Average video:    {}\n",
        format_seconds_f64(report.average_duration)
    ));

    if !report.year_buckets.is_empty() {
        out.push('\n');
        out.push_str("Videos per year:\n");
        for (year, count) in report.year_buckets.iter() {
            out.push_str(&format!("  {}: {}\n", year, format_number(count)));
        }
    }

    out.push_str(&format!("{}\n", rule));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::histogram::YearHistogram;

    fn report() -> EstimationReport {
        let mut year_buckets = YearHistogram::new();
        year_buckets.record(2020);
        year_buckets.record(2020);
        year_buckets.record(2021);

        EstimationReport {
            population: 10,
            sample_size: 10,
            sampled: 8,
            missing_links: 2,
            missing_from_sample: 2,
            unresolved_in_sample: 0,
            out_of_range: 0,
            unavailable: 0,
            batches: 1,
            failed_batches: 0,
            total_estimated_duration: 6000,
            sample_total_duration: 4800,
            average_duration: 600.0,
            year_buckets,
        }
    }

    #[test]
    fn test_render_report() {
        let text = render_report(&report());
        assert!(text.contains("Total watch time: 1h 40m (6,000 seconds)"));
        assert!(text.contains("Average video:    10m"));
        assert!(text.contains("  2020: 2"));
        assert!(text.contains("  2021: 1"));
        assert!(!text.contains("Unresolved"));
        assert!(!text.contains("WARNING"));
    }

    #[test]
    fn test_render_degraded_report() {
        let mut report = report();
        report.batches = 3;
        report.failed_batches = 1;
        report.unresolved_in_sample = 20;
        report.unavailable = 20;

        let text = render_report(&report);
        assert!(text.contains("Unresolved:    20"));
        assert!(text.contains("1 of 3 requests failed"));
    }
}
