use crate::helpers::controls::{MAX_YEARS, MIN_YEARS, STOCK_OPTIONS};
use crate::views::escape_html;

const TITLE: &str = "StockSage: A webapp for predicting stock prices";
const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";
const STYLE: &str = "body{font-family:sans-serif;margin:0;display:flex}\
aside{width:280px;padding:1rem;background:#f0f2f6;min-height:100vh}\
main{flex:1;padding:1rem 2rem}\
.columns{display:flex;gap:2rem}.columns>.left{flex:3}.columns>.right{flex:1}\
.data-table{border-collapse:collapse;font-size:.85rem}\
.data-table td,.data-table th{border:1px solid #ddd;padding:.25rem .5rem;text-align:right}\
.alert{background:#ffe4e4;border:1px solid #d33;padding:1rem;border-radius:4px}\
.about{border:1px solid #ccc;padding:.5rem;border-radius:4px;margin-top:1rem}\
.status{color:#555}";

/// Current state of the sidebar controls.
#[derive(Debug, Clone)]
pub struct Controls {
    /// Ticker the page shows
    pub ticker: String,
    /// Dropdown selection
    pub selected: String,
    /// Free-text entry as typed
    pub custom: String,
    pub years: u32,
}

/// Pre-rendered sections shown once data loaded and the model fitted.
#[derive(Debug, Clone)]
pub struct DashboardContent {
    pub price_table: String,
    pub raw_chart: String,
    pub forecast_table: String,
    pub forecast_chart: String,
    /// Rendered component charts, trend first
    pub components: Vec<String>,
}

/// Everything the dashboard page needs.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub controls: Controls,
    /// True on the first load of the session
    pub first_load: bool,
    /// The sections, or the message of whatever failed
    pub content: Result<DashboardContent, String>,
}

fn sidebar(controls: &Controls) -> String {
    let mut options = String::new();
    for ticker in STOCK_OPTIONS {
        let selected = if ticker == controls.selected { " selected" } else { "" };
        options.push_str(&format!(
            "<option value=\"{0}\"{1}>{0}</option>",
            escape_html(ticker),
            selected
        ));
    }

    format!(
        "<aside>\
<h2>User Input Parameters</h2>\
<form method=\"get\" action=\"/\">\
<label for=\"ticker\">Select dataset for prediction</label><br>\
<select id=\"ticker\" name=\"ticker\">{options}</select><br><br>\
<label for=\"custom_ticker\">Or enter a stock ticker here:</label><br>\
<input id=\"custom_ticker\" name=\"custom_ticker\" type=\"text\" value=\"{custom}\"><br><br>\
<label for=\"years\">Years of prediction: <output id=\"years_value\">{years}</output></label><br>\
<input id=\"years\" name=\"years\" type=\"range\" min=\"{min}\" max=\"{max}\" step=\"1\" value=\"{years}\" \
oninput=\"document.getElementById('years_value').value=this.value\"><br><br>\
<button type=\"submit\">Update</button>\
</form>\
<div class=\"about\">\
<strong>About this app</strong>\
<ul>\
<li>Forecasts a stock's closing price with an additive trend and seasonality model.</li>\
<li>This is a demonstration only and not financial advice.</li>\
</ul>\
<form method=\"post\" action=\"/cache/clear\"><button type=\"submit\">Clear cache</button></form>\
</div>\
</aside>",
        options = options,
        custom = escape_html(&controls.custom),
        years = controls.years,
        min = MIN_YEARS,
        max = MAX_YEARS,
    )
}

fn sections(content: &DashboardContent, years: u32) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"columns\"><div class=\"left\">");
    html.push_str("<h3>Raw data</h3>");
    html.push_str(&content.price_table);
    html.push_str(&content.raw_chart);
    html.push_str("</div><div class=\"right\">");
    html.push_str("<h3>Forecast controls</h3>");
    html.push_str("<p>Use the slider to adjust the forecast period.</p>");
    html.push_str("</div></div>");

    html.push_str("<h3>Forecast data</h3>");
    html.push_str(&content.forecast_table);
    html.push_str(&format!("<p>Forecast plot for {} years</p>", years));
    html.push_str(&content.forecast_chart);
    html.push_str("<p>Forecast components</p>");
    for chart in &content.components {
        html.push_str(chart);
    }
    html
}

/// Renders the complete dashboard page.
pub fn render_dashboard(view: &DashboardView) -> String {
    let status = if view.first_load {
        "<p class=\"status\">Loading data... done!</p>"
    } else {
        ""
    };

    let body = match &view.content {
        Ok(content) => sections(content, view.controls.years),
        Err(message) => format!(
            "<div class=\"alert\"><strong>Could not forecast {}</strong><br>{}</div>",
            escape_html(&view.controls.ticker),
            escape_html(message)
        ),
    };

    format!(
        "<!DOCTYPE html>\
<html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>Stock Forecast App</title>\
<script src=\"{plotly}\"></script>\
<style>{style}</style></head>\
<body>{sidebar}<main>\
<h1>{title} &#x1F4C8;</h1>\
<p>This webapp predicts the stock price using an additive time-series model with trend changepoints and seasonality. \
Select the desired stock and the forecast period, and see the magic happen!</p>\
<h2>{ticker}</h2>\
{status}{body}\
</main></body></html>",
        plotly = PLOTLY_JS,
        style = STYLE,
        sidebar = sidebar(&view.controls),
        title = TITLE,
        ticker = escape_html(&view.controls.ticker),
        status = status,
        body = body,
    )
}
