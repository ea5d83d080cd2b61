use common::{ForecastPoint, PriceRecord};

use crate::views::escape_html;

fn table(headers: &[&str], rows: impl Iterator<Item = Vec<String>>) -> String {
    let mut html = String::from("<table class=\"data-table\"><thead><tr>");
    for header in headers {
        html.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    html.push_str("</tr></thead><tbody>");
    for cells in rows {
        html.push_str("<tr>");
        for cell in cells {
            html.push_str(&format!("<td>{}</td>", escape_html(&cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

/// Table of raw price records, one row per trading day.
pub fn price_table(records: &[PriceRecord]) -> String {
    table(
        &["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"],
        records.iter().map(|r| {
            vec![
                r.date.to_string(),
                format!("{:.2}", r.open),
                format!("{:.2}", r.high),
                format!("{:.2}", r.low),
                format!("{:.2}", r.close),
                format!("{:.2}", r.adj_close),
                r.volume.to_string(),
            ]
        }),
    )
}

/// Table of forecast rows with every component column.
pub fn forecast_table(rows: &[ForecastPoint]) -> String {
    table(
        &[
            "ds",
            "trend",
            "trend_lower",
            "trend_upper",
            "weekly",
            "yearly",
            "additive_terms",
            "yhat_lower",
            "yhat_upper",
            "yhat",
        ],
        rows.iter().map(|r| {
            vec![
                r.ds.to_string(),
                format!("{:.4}", r.trend),
                format!("{:.4}", r.trend_lower),
                format!("{:.4}", r.trend_upper),
                format!("{:.4}", r.weekly),
                format!("{:.4}", r.yearly),
                format!("{:.4}", r.additive_terms),
                format!("{:.4}", r.yhat_lower),
                format!("{:.4}", r.yhat_upper),
                format!("{:.4}", r.yhat),
            ]
        }),
    )
}
