//! `stats`: whole-history aggregates.

use frost_data::stats::SummaryStatistics;
use frost_db::models::MonthlyFrostSummary;
use serde_json::json;

pub fn run_stats(history_path: &str, json: bool, frost_threshold: f64) -> anyhow::Result<()> {
    let db = crate::open_history(history_path)?;
    let summary = db.query_summary_statistics(frost_threshold)?;
    let months = db.query_monthly_frost(frost_threshold)?;
    if json {
        let body = json!({ "resumen": summary, "mensual": months });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("{}", render_summary(&summary, &months));
    }
    Ok(())
}

pub fn render_summary(summary: &SummaryStatistics, months: &[MonthlyFrostSummary]) -> String {
    let span = match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => format!("{} to {}", first, last),
        _ => "empty history".to_string(),
    };
    let mut lines = vec![
        format!("Records: {} ({})", summary.total_records, span),
        format!("Mean minimum: {:.2} C", summary.mean_temperature),
        format!(
            "Frost days: {} ({:.1}%)",
            summary.frost_days, summary.frost_percentage
        ),
    ];
    if let (Some(low), Some(high)) = (summary.absolute_min, summary.absolute_max) {
        lines.push(format!("Range: {:.1} C to {:.1} C", low, high));
    }
    if !months.is_empty() {
        lines.push(String::new());
        lines.push(format!("{:<9}{:>6}{:>7}{:>8}{:>8}", "Month", "Days", "Frost", "Mean", "Low"));
        for m in months {
            lines.push(format!(
                "{:<9}{:>6}{:>7}{:>8.1}{:>8.1}",
                m.month, m.days, m.frost_days, m.mean_min_temperature, m.lowest_temperature
            ));
        }
    }
    lines.join("\n")
}
