//! Text and JSON rendering of the analysis report

use std::io::{self, Write};

use serde::Serialize;

use crate::analysis::summary::{format_count, format_money};
use crate::analysis::{
    AiThreatReport, CorrelationMatrix, CrossTab, DescriptiveStats, EducationReport,
    ExperienceReport, LanguageReport, Outcome, RemoteWorkReport, SurveyReport,
};
use crate::core::constants::{display, output_formats};
use crate::core::error::Result;
use crate::reporting::RenderedChart;
use crate::ui::color::{Colors, colorize, heading};

/// Document printed by `--format json`
#[derive(Debug, Serialize)]
pub struct JsonDocument<'a> {
    pub generated_at: String,
    pub report: &'a SurveyReport,
    pub charts: &'a [RenderedChart],
}

/// Print the report to stdout in the requested format
pub fn display_report(
    report: &SurveyReport,
    charts: &[RenderedChart],
    output_format: &str,
    quiet: bool,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match output_format {
        output_formats::JSON => {
            let json = render_json(report, charts, chrono::Utc::now().to_rfc3339())?;
            writeln!(out, "{json}")?;
        }
        _ if quiet => {}
        _ => write_text_report(&mut out, report, charts)?,
    }
    Ok(())
}

pub fn render_json(
    report: &SurveyReport,
    charts: &[RenderedChart],
    generated_at: String,
) -> Result<String> {
    let document = JsonDocument {
        generated_at,
        report,
        charts,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Write the human-readable report: one section per question, the summary,
/// then the chart files.
pub fn write_text_report<W: Write>(
    out: &mut W,
    report: &SurveyReport,
    charts: &[RenderedChart],
) -> io::Result<()> {
    section(
        out,
        "Q1: Compensation by work experience",
        &report.experience,
        write_experience,
    )?;
    section(
        out,
        "Q2: Most used programming languages",
        &report.languages,
        write_languages,
    )?;
    section(
        out,
        "Q3: Compensation by education level",
        &report.education,
        write_education,
    )?;
    section(
        out,
        "Q4: Job satisfaction by remote work mode",
        &report.remote_work,
        write_remote_work,
    )?;
    section(
        out,
        "Q5: AI threat perception by experience",
        &report.ai_threat,
        write_ai_threat,
    )?;
    section(
        out,
        "Correlation matrix",
        &report.correlation,
        write_correlation,
    )?;

    rule(out, "Summary")?;
    for (label, value) in report.summary.entries() {
        writeln!(out, "  {:<36} {}", format!("{label}:"), value)?;
    }

    if !charts.is_empty() {
        write_charts(out, charts)?;
    }
    Ok(())
}

fn rule<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", heading(title))?;
    writeln!(
        out,
        "{}",
        colorize(&"=".repeat(display::RULE_WIDTH), Colors::BRIGHT_BLACK)
    )
}

fn section<W, T, F>(out: &mut W, title: &str, outcome: &Outcome<T>, body: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce(&mut W, &T) -> io::Result<()>,
{
    rule(out, title)?;
    match outcome {
        Outcome::Available(value) => body(out, value),
        Outcome::Unavailable(reason) => writeln!(
            out,
            "  {} {}",
            display::ERROR_EMOJI,
            colorize(&format!("Unavailable: {reason}"), Colors::RED)
        ),
    }
}

fn write_stats_header<W: Write>(out: &mut W, first: &str) -> io::Result<()> {
    writeln!(
        out,
        "  {}",
        colorize(
            &format!(
                "{first:<34} {:>7} {:>10} {:>10} {:>10}",
                "count", "mean", "median", "std"
            ),
            Colors::BOLD
        )
    )
}

fn write_stats_row<W: Write>(out: &mut W, label: &str, stats: &DescriptiveStats) -> io::Result<()> {
    writeln!(
        out,
        "  {label:<34} {:>7} {:>10} {:>10} {:>10}",
        format_count(stats.count),
        format_money(stats.mean),
        format_money(stats.median),
        format_money(stats.std_dev)
    )
}

fn write_subset_note<W: Write>(out: &mut W, rows: usize, excluded: usize) -> io::Result<()> {
    writeln!(
        out,
        "  {}",
        colorize(
            &format!(
                "{} rows analyzed, {} excluded",
                format_count(rows),
                format_count(excluded)
            ),
            Colors::DIM
        )
    )
}

fn format_coefficient(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |value| format!("{value:.3}"))
}

fn write_experience<W: Write>(out: &mut W, report: &ExperienceReport) -> io::Result<()> {
    write_stats_header(out, "experience")?;
    for bracket in &report.brackets {
        write_stats_row(out, &bracket.bracket, &bracket.compensation)?;
    }
    writeln!(
        out,
        "  Pearson correlation (experience vs compensation): {}",
        colorize(&format_coefficient(report.correlation), Colors::CYAN)
    )?;
    write_subset_note(out, report.rows, report.excluded)
}

fn write_languages<W: Write>(out: &mut W, report: &LanguageReport) -> io::Result<()> {
    for (rank, language) in report.top.iter().enumerate() {
        writeln!(
            out,
            "  {:>3}. {:<28} {:>8}",
            colorize(&(rank + 1).to_string(), Colors::DIM),
            language.language,
            format_count(language.count)
        )?;
    }
    writeln!(
        out,
        "  {}",
        colorize(
            &format!(
                "{} respondents, {} distinct languages",
                format_count(report.respondents),
                format_count(report.distinct_languages)
            ),
            Colors::DIM
        )
    )
}

fn write_education<W: Write>(out: &mut W, report: &EducationReport) -> io::Result<()> {
    write_stats_header(out, "education")?;
    for bucket in report.by_median() {
        write_stats_row(out, &bucket.bucket, &bucket.compensation)?;
    }
    if report.unrecognized > 0 {
        writeln!(
            out,
            "  {} {} unrecognized education values grouped as Other",
            display::WARNING_EMOJI,
            format_count(report.unrecognized)
        )?;
    }
    write_subset_note(out, report.rows, report.excluded)
}

fn write_crosstab<W: Write>(out: &mut W, table: &CrossTab, corner: &str) -> io::Result<()> {
    let mut header = format!("{corner:<34}");
    for column in &table.column_labels {
        header.push_str(&format!(" {:>7}", truncate(column, 7)));
    }
    writeln!(out, "  {}", colorize(&header, Colors::BOLD))?;

    for (row, label) in table.row_labels.iter().enumerate() {
        let mut line = format!("{:<34}", truncate(label, 34));
        for percent in &table.row_percentages[row] {
            line.push_str(&format!(" {:>6.1}%", percent));
        }
        writeln!(out, "  {line}")?;
    }
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}

fn write_remote_work<W: Write>(out: &mut W, report: &RemoteWorkReport) -> io::Result<()> {
    write_crosstab(out, &report.crosstab, "remote work / satisfaction")?;
    writeln!(out)?;
    write_stats_header(out, "mean satisfaction")?;
    for mode in &report.satisfaction {
        writeln!(
            out,
            "  {:<34} {:>7} {:>10} {:>10} {:>10}",
            truncate(&mode.mode, 34),
            format_count(mode.satisfaction.count),
            format_coefficient(mode.satisfaction.mean),
            format_coefficient(mode.satisfaction.median),
            format_coefficient(mode.satisfaction.std_dev)
        )?;
    }
    write_subset_note(out, report.rows, report.excluded)
}

fn write_ai_threat<W: Write>(out: &mut W, report: &AiThreatReport) -> io::Result<()> {
    for share in &report.overall {
        writeln!(
            out,
            "  {:<34} {:>8} {:>6.1}%",
            share.category,
            format_count(share.count),
            share.percent
        )?;
    }
    writeln!(out)?;
    write_crosstab(out, &report.by_experience, "experience / perception")?;
    write_subset_note(out, report.rows, report.excluded)
}

fn write_correlation<W: Write>(out: &mut W, matrix: &CorrelationMatrix) -> io::Result<()> {
    let mut header = format!("{:<22}", "");
    for field in &matrix.fields {
        header.push_str(&format!(" {:>10}", truncate(field, 10)));
    }
    writeln!(out, "  {}", colorize(&header, Colors::BOLD))?;

    for (row, field) in matrix.fields.iter().enumerate() {
        let mut line = format!("{field:<22}");
        for column in 0..=row {
            line.push_str(&format!(" {:>10}", format_coefficient(matrix.get(row, column))));
        }
        writeln!(out, "  {line}")?;
    }
    write_subset_note(out, matrix.rows, matrix.excluded)
}

fn write_charts<W: Write>(out: &mut W, charts: &[RenderedChart]) -> io::Result<()> {
    rule(out, "Charts")?;
    for chart in charts {
        match &chart.outcome {
            Outcome::Available(path) => writeln!(
                out,
                "  {} {}",
                display::CHART_EMOJI,
                colorize(&path.display().to_string(), Colors::BLUE)
            )?,
            Outcome::Unavailable(reason) => writeln!(
                out,
                "  {} {}: {}",
                display::ERROR_EMOJI,
                chart.kind.file_name(),
                colorize(reason, Colors::RED)
            )?,
        }
    }

    let written = charts.iter().filter(|chart| chart.outcome.is_available()).count();
    let status = if written == charts.len() {
        colorize(
            &format!("{} {written} charts written", display::SUCCESS_EMOJI),
            Colors::GREEN
        )
    } else {
        colorize(
            &format!(
                "{} {written} of {} charts written",
                display::WARNING_EMOJI,
                charts.len()
            ),
            Colors::YELLOW
        )
    };
    writeln!(out, "  {status}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SurveyAnalysis;
    use crate::core::types::{DatasetShape, SurveyRecord};
    use crate::reporting::ChartKind;
    use std::path::PathBuf;

    fn record(compensation: f64, experience: f64, languages: &str) -> SurveyRecord {
        SurveyRecord {
            compensation_yearly: Some(compensation),
            work_experience_years: Some(experience),
            years_code: Some(experience + 2.0),
            languages_used: Some(languages.to_string()),
            education_level: Some("Bachelor's degree (B.A., B.S., B.Eng., etc.)".to_string()),
            remote_work_mode: Some("Remote".to_string()),
            job_satisfaction: Some(7.0),
            ai_threat_perception: Some("No".to_string()),
            tool_count_work: Some(5.0),
            country: Some("Sweden".to_string()),
            dev_type: Some("Developer, back-end".to_string()),
        }
    }

    fn sample_report() -> SurveyReport {
        let records = vec![
            record(60_000.0, 1.0, "Python;SQL"),
            record(90_000.0, 4.0, "Rust"),
            record(120_000.0, 12.0, "Python"),
        ];
        SurveyAnalysis::default().run(
            &records,
            DatasetShape {
                rows: 3,
                columns: 11,
            },
        )
    }

    fn text_of(report: &SurveyReport, charts: &[RenderedChart]) -> String {
        let mut buffer = Vec::new();
        write_text_report(&mut buffer, report, charts).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_text_report_has_every_section() {
        let text = text_of(&sample_report(), &[]);

        for title in [
            "Q1: Compensation by work experience",
            "Q2: Most used programming languages",
            "Q3: Compensation by education level",
            "Q4: Job satisfaction by remote work mode",
            "Q5: AI threat perception by experience",
            "Correlation matrix",
            "Summary",
        ] {
            assert!(text.contains(title), "missing section {title}");
        }
        assert!(!text.contains("Charts"));
        assert!(text.contains("0-2 years"));
        assert!(text.contains("Python"));
        assert!(text.contains("Total responses:"));
    }

    #[test]
    fn test_text_report_shows_unavailable_reason() {
        let mut report = sample_report();
        report.languages = Outcome::Unavailable("top-N must be positive".to_string());

        let text = text_of(&report, &[]);
        assert!(text.contains("Unavailable: top-N must be positive"));
    }

    #[test]
    fn test_text_report_lists_charts() {
        let charts = vec![
            RenderedChart {
                kind: ChartKind::ExperienceCompensation,
                outcome: Outcome::Available(PathBuf::from(
                    "plots/plot1_compensation_experience.svg",
                )),
            },
            RenderedChart {
                kind: ChartKind::TopLanguages,
                outcome: Outcome::Unavailable("analysis unavailable".to_string()),
            },
        ];

        let text = text_of(&sample_report(), &charts);
        assert!(text.contains("plots/plot1_compensation_experience.svg"));
        assert!(text.contains("plot2_top_languages.svg: analysis unavailable"));
        assert!(text.contains("1 of 2 charts written"));
    }

    #[test]
    fn test_render_json_document() {
        let report = sample_report();
        let json = render_json(&report, &[], "2026-01-01T00:00:00+00:00".to_string()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["generated_at"], "2026-01-01T00:00:00+00:00");
        assert_eq!(value["report"]["shape"]["rows"], 3);
        assert_eq!(value["report"]["experience"]["status"], "available");
        assert!(value["charts"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Remote", 10), "Remote");
        assert_eq!(truncate("Hybrid (some remote)", 7), "Hybrid…");
        assert_eq!(truncate("Hybrid (some remote)", 7).chars().count(), 7);
    }

    #[test]
    fn test_format_coefficient() {
        assert_eq!(format_coefficient(Some(0.12345)), "0.123");
        assert_eq!(format_coefficient(None), "n/a");
    }
}
