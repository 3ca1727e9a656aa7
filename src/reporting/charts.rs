//! Chart rendering
//!
//! Six SVG charts, one per result table. Every renderer receives the same
//! immutable [`ChartStyle`]; charts are independent and render in parallel.

use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::prelude::*;
use plotters::style::full_palette::{
    BLUE_600, BROWN_400, GREEN_600, GREY_600, ORANGE_600, PINK_400, PURPLE_400, RED_600, TEAL_600,
};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::analysis::summary::format_count;
use crate::analysis::{
    AiThreatReport, BoxSummary, CorrelationMatrix, EducationReport, ExperienceReport,
    LanguageReport, Outcome, RemoteWorkReport, SurveyReport,
};
use crate::core::constants::charts;
use crate::core::error::{Result, SurveyError};
use crate::reporting::logging;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Series colors, cycled by category index
const PALETTE: [RGBColor; 9] = [
    BLUE_600, ORANGE_600, GREEN_600, RED_600, PURPLE_400, BROWN_400, PINK_400, GREY_600, TEAL_600,
];

/// Half the width of a box or bar, in category units
const HALF_WIDTH: f64 = 0.35;

/// Stacked segments thinner than this (percent) are not annotated
const MIN_ANNOTATED_SHARE: f64 = 5.0;

/// Visual settings shared by every chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub font: String,
    pub title_size: u32,
    pub label_size: u32,
    /// Upper bound of compensation axes; larger values are drawn at the bound
    pub compensation_ceiling: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: charts::DEFAULT_WIDTH,
            height: charts::DEFAULT_HEIGHT,
            font: charts::DEFAULT_FONT.to_string(),
            title_size: 28,
            label_size: 15,
            compensation_ceiling: charts::COMPENSATION_CEILING,
        }
    }
}

impl ChartStyle {
    fn title_font(&self) -> FontDesc<'_> {
        (self.font.as_str(), self.title_size).into_font()
    }

    fn label_font(&self) -> FontDesc<'_> {
        (self.font.as_str(), self.label_size).into_font()
    }

    fn annotation(&self, pos: Pos, color: &RGBColor) -> TextStyle<'_> {
        (self.font.as_str(), self.label_size.saturating_sub(2).max(8))
            .into_font()
            .color(color)
            .pos(pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    ExperienceCompensation,
    TopLanguages,
    EducationCompensation,
    RemoteWorkSatisfaction,
    AiThreatByExperience,
    CorrelationMatrix,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::ExperienceCompensation,
        ChartKind::TopLanguages,
        ChartKind::EducationCompensation,
        ChartKind::RemoteWorkSatisfaction,
        ChartKind::AiThreatByExperience,
        ChartKind::CorrelationMatrix,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::ExperienceCompensation => charts::EXPERIENCE_FILE,
            ChartKind::TopLanguages => charts::LANGUAGES_FILE,
            ChartKind::EducationCompensation => charts::EDUCATION_FILE,
            ChartKind::RemoteWorkSatisfaction => charts::REMOTE_WORK_FILE,
            ChartKind::AiThreatByExperience => charts::AI_THREAT_FILE,
            ChartKind::CorrelationMatrix => charts::CORRELATION_FILE,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::ExperienceCompensation => "Compensation by Experience Level",
            ChartKind::TopLanguages => "Most Popular Programming Languages",
            ChartKind::EducationCompensation => "Compensation by Education Level",
            ChartKind::RemoteWorkSatisfaction => "Job Satisfaction by Work Arrangement (%)",
            ChartKind::AiThreatByExperience => "AI Threat Perception by Experience Level",
            ChartKind::CorrelationMatrix => "Correlation of Key Numeric Fields",
        }
    }
}

/// Outcome of one chart job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedChart {
    pub kind: ChartKind,
    pub outcome: Outcome<PathBuf>,
}

/// Render every chart into `output_dir`, overwriting existing files.
///
/// Only failing to create the directory is an error; each chart reports its
/// own failure in the returned list, in [`ChartKind::ALL`] order.
pub fn render_all(
    report: &SurveyReport,
    output_dir: &Path,
    style: &ChartStyle,
) -> Result<Vec<RenderedChart>> {
    std::fs::create_dir_all(output_dir)?;

    Ok(ChartKind::ALL
        .par_iter()
        .map(|&kind| {
            let outcome = match render(kind, report, output_dir, style) {
                Ok(path) => Outcome::Available(path),
                Err(e) => {
                    logging::log_error(&format!("Could not render {}", kind.file_name()), Some(&e));
                    Outcome::Unavailable(e.to_string())
                }
            };
            RenderedChart { kind, outcome }
        })
        .collect())
}

/// Data behind one chart, resolved before any file is opened
enum ChartData<'r> {
    Experience(&'r ExperienceReport),
    Languages(&'r LanguageReport),
    Education(&'r EducationReport),
    RemoteWork(&'r RemoteWorkReport),
    AiThreat(&'r AiThreatReport),
    Correlation(&'r CorrelationMatrix),
}

impl<'r> ChartData<'r> {
    fn resolve(kind: ChartKind, report: &'r SurveyReport) -> Result<Self> {
        Ok(match kind {
            ChartKind::ExperienceCompensation => {
                ChartData::Experience(required(kind, &report.experience)?)
            }
            ChartKind::TopLanguages => ChartData::Languages(required(kind, &report.languages)?),
            ChartKind::EducationCompensation => {
                ChartData::Education(required(kind, &report.education)?)
            }
            ChartKind::RemoteWorkSatisfaction => {
                ChartData::RemoteWork(required(kind, &report.remote_work)?)
            }
            ChartKind::AiThreatByExperience => ChartData::AiThreat(required(kind, &report.ai_threat)?),
            ChartKind::CorrelationMatrix => {
                ChartData::Correlation(required(kind, &report.correlation)?)
            }
        })
    }

    fn draw(&self, root: &Area<'_>, style: &ChartStyle) -> Result<()> {
        match self {
            ChartData::Experience(data) => draw_experience(root, style, data),
            ChartData::Languages(data) => draw_languages(root, style, data),
            ChartData::Education(data) => draw_education(root, style, data),
            ChartData::RemoteWork(data) => draw_remote_work(root, style, data),
            ChartData::AiThreat(data) => draw_ai_threat(root, style, data),
            ChartData::Correlation(data) => draw_correlation(root, style, data),
        }
    }
}

/// Render one chart and return the written path.
///
/// The chart is drawn into a hidden sibling file and renamed onto the stable
/// path once complete. A failed chart leaves any existing file untouched.
pub fn render(
    kind: ChartKind,
    report: &SurveyReport,
    output_dir: &Path,
    style: &ChartStyle,
) -> Result<PathBuf> {
    let data = ChartData::resolve(kind, report)?;
    let path = output_dir.join(kind.file_name());
    let staging = staging_path(output_dir, kind);

    if let Err(e) = draw_to(&staging, &data, style) {
        let _ = std::fs::remove_file(&staging);
        return Err(e);
    }
    std::fs::rename(&staging, &path).inspect_err(|_| {
        let _ = std::fs::remove_file(&staging);
    })?;

    logging::log_chart_written(&path);
    Ok(path)
}

fn staging_path(output_dir: &Path, kind: ChartKind) -> PathBuf {
    output_dir.join(format!(".{}.partial", kind.file_name()))
}

fn draw_to(target: &Path, data: &ChartData<'_>, style: &ChartStyle) -> Result<()> {
    let root = SVGBackend::new(target, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;
    data.draw(&root, style)?;
    root.present()?;
    Ok(())
}

fn required<T>(kind: ChartKind, outcome: &Outcome<T>) -> Result<&T> {
    outcome.available().ok_or_else(|| {
        SurveyError::Chart(format!(
            "{} skipped, its analysis is unavailable",
            kind.file_name()
        ))
    })
}

fn draw_experience(root: &Area<'_>, style: &ChartStyle, report: &ExperienceReport) -> Result<()> {
    let groups: Vec<(&str, Option<BoxSummary>)> = report
        .brackets
        .iter()
        .map(|bracket| (bracket.bracket.as_str(), bracket.compensation.box_summary))
        .collect();
    draw_box_plot(
        root,
        style,
        ChartKind::ExperienceCompensation.title(),
        "Years of professional experience",
        &groups,
    )
}

fn draw_education(root: &Area<'_>, style: &ChartStyle, report: &EducationReport) -> Result<()> {
    let groups: Vec<(&str, Option<BoxSummary>)> = report
        .by_median()
        .into_iter()
        .map(|bucket| (bucket.bucket.as_str(), bucket.compensation.box_summary))
        .collect();
    draw_box_plot(
        root,
        style,
        ChartKind::EducationCompensation.title(),
        "Education level (highest median first)",
        &groups,
    )
}

fn draw_box_plot(
    root: &Area<'_>,
    style: &ChartStyle,
    title: &str,
    x_desc: &str,
    groups: &[(&str, Option<BoxSummary>)],
) -> Result<()> {
    if groups.iter().all(|(_, summary)| summary.is_none()) {
        return draw_placeholder(root, style, title);
    }

    let labels: Vec<&str> = groups.iter().map(|(label, _)| *label).collect();
    let ceiling = style.compensation_ceiling;
    let n = groups.len();

    let mut chart = ChartBuilder::on(root)
        .caption(title, style.title_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..ceiling)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| category_label(&labels, *x))
        .y_label_formatter(&|y| format_dollars(*y))
        .x_desc(x_desc)
        .y_desc("Annual compensation (USD)")
        .label_style(style.label_font())
        .axis_desc_style(style.label_font())
        .draw()?;

    let clamp = |value: f64| value.clamp(0.0, ceiling);
    for (index, (_, summary)) in groups.iter().enumerate() {
        let Some(summary) = summary else { continue };
        let color = PALETTE[index % PALETTE.len()];
        let x = index as f64;
        let cap = HALF_WIDTH / 2.0;

        chart.draw_series(std::iter::once(Rectangle::new(
            [
                (x - HALF_WIDTH, clamp(summary.q1)),
                (x + HALF_WIDTH, clamp(summary.q3)),
            ],
            color.mix(0.55).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [
                (x - HALF_WIDTH, clamp(summary.q1)),
                (x + HALF_WIDTH, clamp(summary.q3)),
            ],
            BLACK.stroke_width(1),
        )))?;

        let lower = clamp(summary.lower_whisker);
        let upper = clamp(summary.upper_whisker);
        let lines = [
            vec![(x, lower), (x, clamp(summary.q1))],
            vec![(x, clamp(summary.q3)), (x, upper)],
            vec![(x - cap, lower), (x + cap, lower)],
            vec![(x - cap, upper), (x + cap, upper)],
        ];
        chart.draw_series(
            lines
                .into_iter()
                .map(|points| PathElement::new(points, BLACK.stroke_width(1))),
        )?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![
                (x - HALF_WIDTH, clamp(summary.median)),
                (x + HALF_WIDTH, clamp(summary.median)),
            ],
            BLACK.stroke_width(3),
        )))?;
    }

    Ok(())
}

fn draw_languages(root: &Area<'_>, style: &ChartStyle, report: &LanguageReport) -> Result<()> {
    let title = ChartKind::TopLanguages.title();
    if report.top.is_empty() {
        return draw_placeholder(root, style, title);
    }

    // Most used language on top
    let ranked: Vec<_> = report.top.iter().rev().collect();
    let labels: Vec<&str> = ranked.iter().map(|entry| entry.language.as_str()).collect();
    let max = ranked.iter().map(|entry| entry.count).max().unwrap_or(0) as f64;
    let x_max = (max * 1.15).max(1.0);
    let n = ranked.len();

    let mut chart = ChartBuilder::on(root)
        .caption(title, style.title_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(160)
        .build_cartesian_2d(0f64..x_max, -0.5f64..(n as f64 - 0.5))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&|y| category_label(&labels, *y))
        .x_label_formatter(&|x| format_count(x.max(0.0).round() as usize))
        .x_desc("Respondents")
        .label_style(style.label_font())
        .axis_desc_style(style.label_font())
        .draw()?;

    let color = PALETTE[0];
    chart.draw_series(ranked.iter().enumerate().map(|(index, entry)| {
        let y = index as f64;
        Rectangle::new(
            [(0.0, y - HALF_WIDTH), (entry.count as f64, y + HALF_WIDTH)],
            color.filled(),
        )
    }))?;

    let label_style = style.annotation(Pos::new(HPos::Left, VPos::Center), &BLACK);
    chart.draw_series(ranked.iter().enumerate().map(|(index, entry)| {
        Text::new(
            format_count(entry.count),
            (entry.count as f64 + x_max * 0.01, index as f64),
            label_style.clone(),
        )
    }))?;

    Ok(())
}

fn draw_remote_work(root: &Area<'_>, style: &ChartStyle, report: &RemoteWorkReport) -> Result<()> {
    let title = ChartKind::RemoteWorkSatisfaction.title();
    let tab = &report.crosstab;
    if tab.is_empty() {
        return draw_placeholder(root, style, title);
    }

    let rows = tab.row_labels.len();
    let columns = tab.column_labels.len();
    // First row drawn on top
    let row_labels: Vec<&str> = tab.row_labels.iter().rev().map(String::as_str).collect();
    let column_labels: Vec<&str> = tab.column_labels.iter().map(String::as_str).collect();

    let mut chart = ChartBuilder::on(root)
        .caption(title, style.title_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(260)
        .build_cartesian_2d(
            -0.5f64..(columns as f64 - 0.5),
            -0.5f64..(rows as f64 - 0.5),
        )?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(columns)
        .y_labels(rows)
        .x_label_formatter(&|x| category_label(&column_labels, *x))
        .y_label_formatter(&|y| category_label(&row_labels, *y))
        .x_desc("Job satisfaction (0-10)")
        .label_style(style.label_font())
        .axis_desc_style(style.label_font())
        .draw()?;

    let max = tab
        .row_percentages
        .iter()
        .flatten()
        .copied()
        .fold(0.0f64, f64::max)
        .max(f64::EPSILON);

    let mut cells = Vec::with_capacity(rows * columns);
    let mut annotations = Vec::with_capacity(rows * columns);
    for (i, row) in tab.row_percentages.iter().enumerate() {
        let y = (rows - 1 - i) as f64;
        for (j, percent) in row.iter().enumerate() {
            let x = j as f64;
            let intensity = percent / max;
            cells.push(Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                sequential_color(intensity).filled(),
            ));
            let text_color = if intensity > 0.6 { WHITE } else { BLACK };
            annotations.push(Text::new(
                format!("{percent:.1}"),
                (x, y),
                style.annotation(Pos::new(HPos::Center, VPos::Center), &text_color),
            ));
        }
    }
    chart.draw_series(cells)?;
    chart.draw_series(annotations)?;

    Ok(())
}

fn draw_ai_threat(root: &Area<'_>, style: &ChartStyle, report: &AiThreatReport) -> Result<()> {
    let title = ChartKind::AiThreatByExperience.title();
    let tab = &report.by_experience;
    if tab.is_empty() {
        return draw_placeholder(root, style, title);
    }

    let brackets = tab.row_labels.len();
    let labels: Vec<&str> = tab.row_labels.iter().map(String::as_str).collect();

    // Extra room on the right keeps the legend clear of the bars
    let mut chart = ChartBuilder::on(root)
        .caption(title, style.title_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(brackets as f64 + 1.0), 0f64..100f64)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(brackets)
        .x_label_formatter(&|x| category_label(&labels, *x))
        .y_label_formatter(&|y| format!("{y:.0}%"))
        .x_desc("Years of professional experience")
        .y_desc("Share of respondents")
        .label_style(style.label_font())
        .axis_desc_style(style.label_font())
        .draw()?;

    for (j, category) in tab.column_labels.iter().enumerate() {
        let color = PALETTE[j % PALETTE.len()];
        let segments: Vec<_> = tab
            .row_percentages
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let base: f64 = row[..j].iter().sum();
                let x = i as f64;
                Rectangle::new(
                    [(x - HALF_WIDTH, base), (x + HALF_WIDTH, base + row[j])],
                    color.filled(),
                )
            })
            .collect();

        chart
            .draw_series(segments)?
            .label(category.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    let annotation = style.annotation(Pos::new(HPos::Center, VPos::Center), &WHITE);
    let mut shares = Vec::new();
    for (i, row) in tab.row_percentages.iter().enumerate() {
        let mut base = 0.0;
        for percent in row {
            if *percent >= MIN_ANNOTATED_SHARE {
                shares.push(Text::new(
                    format!("{percent:.0}%"),
                    (i as f64, base + percent / 2.0),
                    annotation.clone(),
                ));
            }
            base += percent;
        }
    }
    chart.draw_series(shares)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.9))
        .border_style(BLACK)
        .label_font(style.label_font())
        .draw()?;

    Ok(())
}

fn draw_correlation(root: &Area<'_>, style: &ChartStyle, matrix: &CorrelationMatrix) -> Result<()> {
    let title = ChartKind::CorrelationMatrix.title();
    if matrix.fields.len() < 2 {
        return draw_placeholder(root, style, title);
    }

    let n = matrix.fields.len();
    let row_labels: Vec<&str> = matrix.fields.iter().rev().map(String::as_str).collect();
    let column_labels: Vec<&str> = matrix.fields.iter().map(String::as_str).collect();

    let mut chart = ChartBuilder::on(root)
        .caption(title, style.title_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(190)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), -0.5f64..(n as f64 - 0.5))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&|x| category_label(&column_labels, *x))
        .y_label_formatter(&|y| category_label(&row_labels, *y))
        .label_style(style.label_font())
        .draw()?;

    let mut cells = Vec::new();
    let mut annotations = Vec::new();
    for (i, j, value) in matrix.visible_cells() {
        let x = j as f64;
        let y = (n - 1 - i) as f64;
        let fill = value.map_or(GREY_600, diverging_color);
        cells.push(Rectangle::new(
            [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
            fill.filled(),
        ));
        let text = value.map_or_else(|| "n/a".to_string(), |value| format!("{value:.2}"));
        let text_color = if value.is_some_and(|value| value.abs() > 0.6) {
            WHITE
        } else {
            BLACK
        };
        annotations.push(Text::new(
            text,
            (x, y),
            style.annotation(Pos::new(HPos::Center, VPos::Center), &text_color),
        ));
    }
    chart.draw_series(cells)?;
    chart.draw_series(annotations)?;

    Ok(())
}

/// Chart frame with a title and a notice instead of data
fn draw_placeholder(root: &Area<'_>, style: &ChartStyle, title: &str) -> Result<()> {
    let (width, height) = root.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);

    root.draw(&Text::new(
        title.to_string(),
        (center.0, 40),
        style
            .title_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;
    root.draw(&Text::new(
        "No data available".to_string(),
        center,
        style.annotation(Pos::new(HPos::Center, VPos::Center), &GREY_600),
    ))?;
    Ok(())
}

/// Label of the category at an integer axis position, empty elsewhere
fn category_label(labels: &[&str], position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels
        .get(index as usize)
        .map_or_else(String::new, |label| label.to_string())
}

/// Axis label for a dollar amount: `$120k`
fn format_dollars(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("${:.0}k", value / 1000.0)
    } else {
        format!("${value:.0}")
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
}

fn blend(from: RGBColor, to: RGBColor, t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    RGBColor(lerp(from.0, to.0, t), lerp(from.1, to.1, t), lerp(from.2, to.2, t))
}

/// White to dark blue for `t` in `[0, 1]`
fn sequential_color(t: f64) -> RGBColor {
    blend(RGBColor(247, 251, 255), RGBColor(8, 48, 107), t)
}

/// Blue for -1, near-white for 0, red for +1
fn diverging_color(value: f64) -> RGBColor {
    let neutral = RGBColor(242, 242, 242);
    if value < 0.0 {
        blend(neutral, RGBColor(59, 76, 192), -value)
    } else {
        blend(neutral, RGBColor(180, 4, 38), value)
    }
}
