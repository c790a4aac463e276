use prettytable::{Table, format, row};
use serde::Serialize;
use storeboard_reporting::{SeriesReport, SeriesSource, SeriesSummary};
use storeboard_shared_models::MetricType;

pub const NO_DATA: &str = "No sales data for this period.";

#[derive(Serialize)]
struct JsonReport<'a> {
    metric: MetricType,
    summary: SeriesSummary,
    #[serde(flatten)]
    report: &'a SeriesReport,
}

pub fn render_json(report: &SeriesReport, metric: MetricType) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        metric,
        summary: report.summary(metric),
        report,
    })
}

/// Period table with the plotted metric's column marked.
pub fn render_table(report: &SeriesReport, metric: MetricType) -> String {
    let mut out = format!(
        "{} sales by {} ({})\n",
        capitalize(report.request.period.to_string()),
        report.request.granularity(),
        source_label(report.source)
    );

    if report.is_empty() {
        out.push_str(NO_DATA);
        out.push('\n');
        return out;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row![
        "Period",
        r->column_title("Revenue", metric == MetricType::Revenue),
        r->column_title("Orders", metric == MetricType::Orders)
    ]);
    for point in &report.points {
        table.add_row(row![point.period, r->format!("{:.2}", point.revenue), r->point.orders]);
    }
    out.push_str(&table.to_string());
    out.push_str(&summary_line(&report.summary(metric)));
    out.push('\n');
    out
}

fn summary_line(summary: &SeriesSummary) -> String {
    let mut line = format!(
        "Total: {:.2} revenue across {} orders",
        summary.total_revenue, summary.total_orders
    );
    if let Some(aov) = summary.average_order_value {
        line.push_str(&format!(", {aov:.2} per order"));
    }
    if let Some(peak) = &summary.peak_period {
        line.push_str(&format!(". Peak: {peak}"));
    }
    line
}

fn column_title(name: &str, plotted: bool) -> String {
    if plotted {
        format!("{name} *")
    } else {
        name.to_string()
    }
}

fn source_label(source: SeriesSource) -> &'static str {
    match source {
        SeriesSource::Analytics => "server analytics",
        SeriesSource::ClientAggregation => "aggregated from orders",
        SeriesSource::Unavailable => "unavailable",
    }
}

fn capitalize(text: String) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => text,
    }
}
