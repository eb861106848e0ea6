use crate::analyzer::{AnalysisResult, AnalysisSummary, ParseError};
use crate::commands::FixReport;
use crate::rules::Diagnostic;
use crate::utils::normalize_display_path;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use std::io::Write;

/// Helper to create a styled table
fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

/// Print one `path:line:col: [rule] message` line per diagnostic.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_diagnostics(
    writer: &mut impl Write,
    diagnostics: &[Diagnostic],
) -> std::io::Result<()> {
    for d in diagnostics {
        let location = format!("{}:{}:{}", normalize_display_path(&d.file), d.line, d.col);
        writeln!(
            writer,
            "{}: {} {}",
            location.bold(),
            format!("[{}]", d.rule_id).yellow(),
            d.message
        )?;
        if let Some(fix) = d.fix() {
            writeln!(writer, "  {} {}", "fix:".dimmed(), fix.label.dimmed())?;
        }
    }
    Ok(())
}

/// Print a list of parse errors.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_parse_errors(writer: &mut impl Write, errors: &[ParseError]) -> std::io::Result<()> {
    if errors.is_empty() {
        return Ok(());
    }

    writeln!(writer, "\n{}", "Parse Errors".bold().underline().red())?;

    let mut table = create_table(vec!["File", "Error"]);
    for e in errors {
        table.add_row(vec![
            Cell::new(normalize_display_path(&e.file)).add_attribute(Attribute::Bold),
            Cell::new(&e.error).fg(Color::Red),
        ]);
    }

    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print the summary table.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary(writer: &mut impl Write, summary: &AnalysisSummary) -> std::io::Result<()> {
    fn count_cell(count: usize, bad: bool) -> Cell {
        let cell = Cell::new(count);
        if bad && count > 0 {
            cell.fg(Color::Red).add_attribute(Attribute::Bold)
        } else {
            cell.fg(Color::Green)
        }
    }

    let mut table = create_table(vec!["Metric", "Count"]);
    table.add_row(vec![
        Cell::new("Files analysed"),
        count_cell(summary.total_files, false),
    ]);
    table.add_row(vec![
        Cell::new("Lines analysed"),
        count_cell(summary.total_lines_analyzed, false),
    ]);
    table.add_row(vec![
        Cell::new("Diagnostics"),
        count_cell(summary.diagnostics_count, true),
    ]);
    table.add_row(vec![
        Cell::new("Files with diagnostics"),
        count_cell(summary.files_with_diagnostics, true),
    ]);
    table.add_row(vec![
        Cell::new("Suppressed").add_attribute(Attribute::Dim),
        Cell::new(summary.suppressed_count).add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Parse errors"),
        count_cell(summary.parse_errors_count, true),
    ]);
    writeln!(writer, "\n{table}")?;
    Ok(())
}

/// Print the full report.
///
/// # Errors
///
/// Returns an error if writing to the writer fails.
pub fn print_report(writer: &mut impl Write, result: &AnalysisResult) -> std::io::Result<()> {
    if result.diagnostics.is_empty() && result.parse_errors.is_empty() {
        writeln!(writer, "{}", "✓ All clean! Nothing to modernize.".green())?;
    } else {
        print_diagnostics(writer, &result.diagnostics)?;
        print_parse_errors(writer, &result.parse_errors)?;
    }
    print_summary(writer, &result.analysis_summary)
}

/// Print a quiet report (diagnostic lines and a one-line recap) for CI/CD
/// mode.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_report_quiet(writer: &mut impl Write, result: &AnalysisResult) -> std::io::Result<()> {
    print_diagnostics(writer, &result.diagnostics)?;
    let summary = &result.analysis_summary;
    writeln!(
        writer,
        "[SUMMARY] {} diagnostics in {} files, {} parse errors",
        summary.diagnostics_count, summary.total_files, summary.parse_errors_count
    )
}

/// Print what `--fix` did.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_fix_report(writer: &mut impl Write, report: &FixReport) -> std::io::Result<()> {
    for file in &report.files {
        let path = normalize_display_path(&file.path);
        writeln!(
            writer,
            "{} {} ({} applied, {} skipped)",
            "Fixed".green().bold(),
            path,
            file.applied,
            file.skipped
        )?;
    }
    for (path, error) in &report.failures {
        writeln!(
            writer,
            "{} {}: {}",
            "Failed".red().bold(),
            normalize_display_path(path),
            error
        )?;
    }
    writeln!(
        writer,
        "{} fixes applied, {} skipped as conflicting",
        report.applied(),
        report.skipped()
    )
}
