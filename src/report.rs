use crate::distribution::DistributionConfig;
use crate::split::{DisplayOrder, SplitReport};
use polars::prelude::PlSmallStr;
use polars::prelude::*;

pub const CURRENCY_SYMBOL: &str = "S/";

/// Formats soles the way es-PE does: `S/ 1,234.50`.
pub fn format_currency(amount: f64) -> String {
    let scaled = amount * 100.0;
    let value = if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        amount
    };
    // formatted as text so no integer width limits the amount
    let text = format!("{:.2}", value.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{CURRENCY_SYMBOL} {}.{cents}", group_thousands(whole))
}

/// Difference column text: a check mark when rounding changed nothing.
pub fn format_difference(difference: f64) -> String {
    let cents = (difference * 100.0).round();
    if cents == 0.0 {
        "✓".to_string()
    } else if cents > 0.0 {
        format!("+{}", format_currency(difference))
    } else {
        format_currency(difference)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Deviation badge shown while assigning people to floors.
pub fn deviation_status(config: &DistributionConfig) -> String {
    match config.current_deviation() {
        0 => "all assigned".to_string(),
        d if d > 0 => format!("{d} remaining"),
        d => format!("{} over target", -d),
    }
}

/// Plain-text summary for pasting into a chat or document.
pub fn summary_text(report: &SplitReport, order: DisplayOrder) -> String {
    let details = report
        .ordered(order)
        .into_iter()
        .map(|r| {
            format!(
                "{}: {} ({} people) - Original: {}",
                r.label,
                format_currency(r.rounded_amount),
                r.people_count,
                format_currency(r.raw_amount)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "SPLIT RESULTS\n\n\
         Total: {}\n\
         Method: {}\n\
         Currency: Peruvian Soles (PEN)\n\
         Rounding: up to 10 céntimos\n\n\
         DETAIL PER FLOOR:\n{}\n\n\
         Rounded total: {}\n\
         Rounding difference: {}",
        format_currency(report.summary.total_amount),
        report.method.label(),
        details,
        format_currency(report.summary.total_rounded),
        format_difference(report.summary.rounding_difference)
    )
}

pub fn config_dataframe(config: &DistributionConfig) -> PolarsResult<DataFrame> {
    let ids: Vec<i64> = config.groups().iter().map(|g| i64::from(g.id)).collect();
    let labels: Vec<&str> = config.groups().iter().map(|g| g.label.as_str()).collect();
    let people: Vec<i64> = config
        .groups()
        .iter()
        .map(|g| i64::from(g.people_count))
        .collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("floor"), labels).into_column(),
        Series::new(PlSmallStr::from_static("people"), people).into_column(),
    ])
}

/// Results as display strings, one row per floor plus nothing else; the
/// totals live in [`SplitReport::summary`].
pub fn report_dataframe(report: &SplitReport, order: DisplayOrder) -> PolarsResult<DataFrame> {
    let rows = report.ordered(order);
    let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
    let people: Vec<i64> = rows.iter().map(|r| i64::from(r.people_count)).collect();
    let percentage: Vec<String> = rows
        .iter()
        .map(|r| format!("{:.1}%", r.percentage_of_total))
        .collect();
    let original: Vec<String> = rows.iter().map(|r| format_currency(r.raw_amount)).collect();
    let rounded: Vec<String> = rows
        .iter()
        .map(|r| format_currency(r.rounded_amount))
        .collect();
    let difference: Vec<String> = rows.iter().map(|r| format_difference(r.difference())).collect();
    let per_person: Vec<String> = rows
        .iter()
        .map(|r| format_currency(r.amount_per_person))
        .collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("floor"), labels).into_column(),
        Series::new(PlSmallStr::from_static("people"), people).into_column(),
        Series::new(PlSmallStr::from_static("percentage"), percentage).into_column(),
        Series::new(PlSmallStr::from_static("original"), original).into_column(),
        Series::new(PlSmallStr::from_static("amount"), rounded).into_column(),
        Series::new(PlSmallStr::from_static("difference"), difference).into_column(),
        Series::new(PlSmallStr::from_static("per_person"), per_person).into_column(),
    ])
}

/// Boxed ASCII table, one line per row.
pub fn render_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| match col.get(row_idx) {
                Ok(AnyValue::Null) | Err(_) => String::new(),
                Ok(AnyValue::String(s)) => s.to_string(),
                Ok(AnyValue::Int64(v)) => v.to_string(),
                Ok(other) => other.to_string(),
            })
            .collect();
        cells.push(row);
    }

    let mut widths: Vec<usize> = names.iter().map(|n| n.chars().count()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &names, &widths);
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.iter().zip(widths) {
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(width.saturating_sub(cell.chars().count())));
        out.push_str(" |");
    }
    out.push('\n');
}
