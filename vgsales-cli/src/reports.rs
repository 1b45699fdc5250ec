use anyhow::Result;
use clap::ValueEnum;
use colored::{Color, Colorize};
use std::io::Write;

use vgsales_engine::numbers::{round_hundredths, scaled_width};
use vgsales_engine::{
    GenreReport, PlatformReport, RankingChart, RankingReport, RankingRows, SalesMetric,
    SalesReport, TableRow,
};

use crate::util::csv_field;

const BAR_WIDTH: usize = 40;
const NO_MATCHES: &str = "No records match the selected filters.";
const GENRE_PALETTE: [Color; 6] = [
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::Red,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
    Csv,
}

/// Chart or table presentation of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum View {
    #[default]
    Chart,
    Table,
}

/// Title, subtitle and value-axis label shown above a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headings {
    pub title: String,
    pub subtitle: String,
    pub axis: String,
}

pub fn headings(report: &SalesReport) -> Headings {
    let years = report.years();
    match report {
        SalesReport::Platform(r) => Headings {
            title: "Most Popular Gaming Platforms Across Multiple Regions".to_string(),
            subtitle: format!(
                "Total Sales by Platform in {} for the Year Range {} to {}",
                r.region.label(),
                years.min(),
                years.max()
            ),
            axis: format!("Sales in {} (in millions)", r.region.label()),
        },
        SalesReport::Genre(r) => Headings {
            title: "Most Popular Game Genres".to_string(),
            subtitle: format!(
                "{} in {} ({} - {})",
                r.display.label(),
                r.region.long_label(),
                years.min(),
                years.max()
            ),
            axis: format!("Sales in {} (in millions)", r.region.long_label()),
        },
        SalesReport::Ranking(r) => Headings {
            title: format!("Top {} Games Sales in Each Genre", r.per_genre),
            subtitle: format!(
                "Top {} Games by Genre in {} from {} to {}",
                r.per_genre,
                r.region.long_label(),
                years.min(),
                years.max()
            ),
            axis: "Sales".to_string(),
        },
    }
}

/// Header of the sales column in ranking tables, e.g. `Sales (Japan Regions)`.
fn ranking_sales_header(report: &RankingReport) -> String {
    format!("Sales ({})", report.region.long_label())
}

const RANKING_TABLE_HEADERS: [&str; 4] = ["Game Title", "Game Genre", "Release Year", "Game Publisher"];

fn ranking_table_headers(report: &RankingReport) -> Vec<String> {
    let mut headers: Vec<String> = RANKING_TABLE_HEADERS.iter().map(ToString::to_string).collect();
    headers.push(ranking_sales_header(report));
    headers
}

fn platform_table_headers() -> Vec<String> {
    std::iter::once("Platform".to_string())
        .chain(SalesMetric::ALL.iter().map(|m| m.column().to_string()))
        .collect()
}

fn platform_table_rows(report: &PlatformReport) -> Vec<Vec<String>> {
    report
        .totals
        .iter()
        .map(|t| {
            std::iter::once(t.platform.clone())
                .chain(SalesMetric::ALL.iter().map(|m| format!("{:.2}", t.figures.get(*m))))
                .collect()
        })
        .collect()
}

fn ranking_table_cells(row: &TableRow) -> Vec<String> {
    vec![
        row.title.clone(),
        row.genre.clone(),
        row.release_year.clone(),
        row.publisher.clone(),
        row.sales.clone(),
    ]
}

pub fn write_report(
    out: &mut dyn Write,
    format: ReportFormat,
    report: &SalesReport,
    view: View,
) -> Result<()> {
    match format {
        ReportFormat::Console => generate_console_report(out, report, view),
        ReportFormat::Json => generate_json_report(out, report),
        ReportFormat::Markdown => generate_markdown_report(out, report, view),
        ReportFormat::Csv => generate_csv_report(out, report, view),
    }
}

// Console

pub fn generate_console_report(out: &mut dyn Write, report: &SalesReport, view: View) -> Result<()> {
    let heads = headings(report);
    writeln!(out)?;
    writeln!(out, "{}", format!("📊 {}", heads.title).bright_cyan().bold())?;
    writeln!(out, "{}", "=".repeat(heads.title.chars().count() + 3).cyan())?;

    match report {
        SalesReport::Platform(r) => console_platform(out, r, &heads, view),
        SalesReport::Genre(r) => console_genre(out, r, &heads),
        SalesReport::Ranking(r) => console_ranking(out, r, &heads),
    }
}

fn console_platform(
    out: &mut dyn Write,
    report: &PlatformReport,
    heads: &Headings,
    view: View,
) -> Result<()> {
    writeln!(out, "{}", heads.subtitle.bold())?;
    if report.totals.is_empty() {
        writeln!(out, "{NO_MATCHES}")?;
        return Ok(());
    }
    match view {
        View::Chart => {
            writeln!(out, "{}", heads.axis.dimmed())?;
            let bars: Vec<(String, f64, Color)> = report
                .totals
                .iter()
                .map(|t| (t.platform.clone(), t.total, Color::Green))
                .collect();
            write_bars(out, &bars)
        }
        View::Table => write_padded_table(out, &platform_table_headers(), &platform_table_rows(report)),
    }
}

fn console_genre(out: &mut dyn Write, report: &GenreReport, heads: &Headings) -> Result<()> {
    writeln!(out, "{}", format!("{}:", heads.subtitle).bold())?;
    if report.totals.is_empty() {
        writeln!(out, "{NO_MATCHES}")?;
        return Ok(());
    }
    writeln!(out, "{}", heads.axis.dimmed())?;
    let bars: Vec<(String, f64, Color)> = report
        .totals
        .iter()
        .map(|t| (t.genre.clone(), t.total, Color::Yellow))
        .collect();
    write_bars(out, &bars)?;

    writeln!(out)?;
    writeln!(out, "{}", format!("Percentage of {}:", heads.subtitle).bold())?;
    let width = label_width(report.shares.iter().map(|s| s.genre.as_str()));
    for (idx, share) in report.shares.iter().enumerate() {
        let cells = scaled_width(share.percent, 100.0, BAR_WIDTH);
        let color = GENRE_PALETTE[idx % GENRE_PALETTE.len()];
        writeln!(
            out,
            "{:<width$} │ {} {:>6.2}%",
            share.genre,
            "█".repeat(cells).color(color),
            round_hundredths(share.percent)
        )?;
    }
    Ok(())
}

fn console_ranking(out: &mut dyn Write, report: &RankingReport, heads: &Headings) -> Result<()> {
    writeln!(out, "{}", heads.subtitle.bold())?;
    match &report.rows {
        RankingRows::Chart(chart) if chart.bars.is_empty() => writeln!(out, "{NO_MATCHES}")?,
        RankingRows::Table(rows) if rows.is_empty() => writeln!(out, "{NO_MATCHES}")?,
        RankingRows::Chart(chart) => {
            let legend: Vec<String> = chart
                .genre_order
                .iter()
                .map(|g| g.color(genre_color(chart, g)).to_string())
                .collect();
            writeln!(out, "Genres: {}", legend.join(", "))?;
            let bars: Vec<(String, f64, Color)> = chart
                .bars
                .iter()
                .map(|b| (b.label.clone(), b.sales, genre_color(chart, &b.genre)))
                .collect();
            write_bars(out, &bars)?;
        }
        RankingRows::Table(rows) => {
            let cells: Vec<Vec<String>> = rows.iter().map(ranking_table_cells).collect();
            write_padded_table(out, &ranking_table_headers(report), &cells)?;
        }
    }
    Ok(())
}

fn genre_color(chart: &RankingChart, genre: &str) -> Color {
    let idx = chart
        .genre_order
        .iter()
        .position(|g| g == genre)
        .unwrap_or(0);
    GENRE_PALETTE[idx % GENRE_PALETTE.len()]
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0)
}

fn write_bars(out: &mut dyn Write, bars: &[(String, f64, Color)]) -> Result<()> {
    let width = label_width(bars.iter().map(|(label, _, _)| label.as_str()));
    let max = bars.iter().map(|(_, value, _)| *value).fold(0.0_f64, f64::max);
    for (label, value, color) in bars {
        let cells = scaled_width(*value, max, BAR_WIDTH);
        writeln!(
            out,
            "{label:<width$} │ {} {value:.2}",
            "█".repeat(cells).color(*color)
        )?;
    }
    Ok(())
}

fn write_padded_table(out: &mut dyn Write, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(idx) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };
    writeln!(out, "{}", line(headers).bold())?;
    let rule = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    writeln!(out, "{}", "-".repeat(rule))?;
    for row in rows {
        writeln!(out, "{}", line(row.as_slice()))?;
    }
    Ok(())
}

// JSON

pub fn generate_json_report(out: &mut dyn Write, report: &SalesReport) -> Result<()> {
    let heads = headings(report);
    let payload = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "title": heads.title,
        "subtitle": heads.subtitle,
        "report": report,
    });
    let json_output = serde_json::to_string_pretty(&payload)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

// Markdown

fn markdown_table(out: &mut dyn Write, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    let escape = |cell: &String| cell.replace('|', "\\|");
    writeln!(out, "| {} |", headers.iter().map(escape).collect::<Vec<_>>().join(" | "))?;
    writeln!(out, "|{}", " --- |".repeat(headers.len()))?;
    for row in rows {
        writeln!(out, "| {} |", row.iter().map(escape).collect::<Vec<_>>().join(" | "))?;
    }
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &SalesReport, view: View) -> Result<()> {
    let heads = headings(report);
    writeln!(out, "# {}\n", heads.title)?;
    writeln!(out, "## {}\n", heads.subtitle)?;

    match report {
        SalesReport::Platform(r) if r.totals.is_empty() => writeln!(out, "_{NO_MATCHES}_")?,
        SalesReport::Platform(r) => match view {
            View::Chart => {
                let rows: Vec<Vec<String>> = r
                    .totals
                    .iter()
                    .map(|t| vec![t.platform.clone(), format!("{:.2}", t.total)])
                    .collect();
                markdown_table(out, &["Game Platform".to_string(), heads.axis.clone()], &rows)?;
            }
            View::Table => markdown_table(out, &platform_table_headers(), &platform_table_rows(r))?,
        },
        SalesReport::Genre(r) if r.totals.is_empty() => writeln!(out, "_{NO_MATCHES}_")?,
        SalesReport::Genre(r) => {
            let rows: Vec<Vec<String>> = r
                .totals
                .iter()
                .map(|t| vec![t.genre.clone(), format!("{:.2}", t.total)])
                .collect();
            markdown_table(out, &["Game Genre".to_string(), heads.axis.clone()], &rows)?;
            writeln!(out, "\n## Percentage of {}\n", heads.subtitle)?;
            let rows: Vec<Vec<String>> = r
                .shares
                .iter()
                .map(|s| vec![s.genre.clone(), format!("{:.2}%", round_hundredths(s.percent))])
                .collect();
            markdown_table(
                out,
                &["Game Genre".to_string(), "Sales Percentage".to_string()],
                &rows,
            )?;
        }
        SalesReport::Ranking(r) => match &r.rows {
            RankingRows::Chart(chart) if chart.bars.is_empty() => {
                writeln!(out, "_{NO_MATCHES}_")?;
            }
            RankingRows::Table(rows) if rows.is_empty() => writeln!(out, "_{NO_MATCHES}_")?,
            RankingRows::Chart(chart) => {
                let rows: Vec<Vec<String>> = chart
                    .bars
                    .iter()
                    .map(|b| vec![b.label.clone(), b.genre.clone(), format!("{:.2}", b.sales)])
                    .collect();
                markdown_table(
                    out,
                    &[
                        "Game Name".to_string(),
                        "Game Genre".to_string(),
                        heads.axis.clone(),
                    ],
                    &rows,
                )?;
            }
            RankingRows::Table(rows) => {
                let cells: Vec<Vec<String>> = rows.iter().map(ranking_table_cells).collect();
                markdown_table(out, &ranking_table_headers(r), &cells)?;
            }
        },
    }
    Ok(())
}

// CSV

fn csv_line(out: &mut dyn Write, cells: &[String]) -> Result<()> {
    let line: Vec<String> = cells.iter().map(|c| csv_field(c)).collect();
    writeln!(out, "{}", line.join(","))?;
    Ok(())
}

pub fn generate_csv_report(out: &mut dyn Write, report: &SalesReport, view: View) -> Result<()> {
    match report {
        SalesReport::Platform(r) => match view {
            View::Chart => {
                csv_line(out, &["Platform".to_string(), r.metric.column().to_string()])?;
                for t in &r.totals {
                    csv_line(out, &[t.platform.clone(), format!("{:.2}", t.total)])?;
                }
            }
            View::Table => {
                csv_line(out, &platform_table_headers())?;
                for row in platform_table_rows(r) {
                    csv_line(out, &row)?;
                }
            }
        },
        SalesReport::Genre(r) => {
            csv_line(
                out,
                &[
                    "Genre".to_string(),
                    r.metric.column().to_string(),
                    "Share_Pct".to_string(),
                ],
            )?;
            for (total, share) in r.totals.iter().zip(&r.shares) {
                csv_line(
                    out,
                    &[
                        total.genre.clone(),
                        format!("{:.2}", total.total),
                        format!("{:.2}", round_hundredths(share.percent)),
                    ],
                )?;
            }
        }
        SalesReport::Ranking(r) => match &r.rows {
            RankingRows::Chart(chart) => {
                csv_line(
                    out,
                    &[
                        "Game Name".to_string(),
                        "Game Genre".to_string(),
                        r.metric.column().to_string(),
                    ],
                )?;
                for bar in &chart.bars {
                    csv_line(
                        out,
                        &[bar.label.clone(), bar.genre.clone(), format!("{:.2}", bar.sales)],
                    )?;
                }
            }
            RankingRows::Table(rows) => {
                csv_line(out, &ranking_table_headers(r))?;
                for row in rows {
                    csv_line(out, &ranking_table_cells(row))?;
                }
            }
        },
    }
    Ok(())
}
