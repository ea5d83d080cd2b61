use chrono::{Datelike, NaiveDate, Weekday};
use common::{ForecastPoint, PriceRecord};
use compute::forecast::ForecastTable;
use plotly::common::{Fill, Line, Marker, Mode};
use plotly::layout::{Axis, RangeSlider};
use plotly::{Layout, Plot, Scatter};

const FORECAST_COLOR: &str = "#0072B2";
const BAND_COLOR: &str = "rgba(0, 114, 178, 0.2)";
/// Non-leap year the yearly component is drawn over.
const YEARLY_REFERENCE_YEAR: i32 = 2020;

fn date_axis(dates: impl Iterator<Item = NaiveDate>) -> Vec<String> {
    dates.map(|d| d.to_string()).collect()
}

fn slider_axis(title: &str) -> Axis {
    Axis::new()
        .title(title)
        .range_slider(RangeSlider::new().visible(true))
}

/// Renders a figure as a `<div>` with its plotting script.
pub fn to_html(plot: &Plot, div_id: &str) -> String {
    plot.to_inline_html(Some(div_id))
}

/// Open and close prices against date, with a range slider.
pub fn raw_data_chart(records: &[PriceRecord]) -> Plot {
    let dates = date_axis(records.iter().map(|r| r.date));

    let open = Scatter::new(dates.clone(), records.iter().map(|r| r.open).collect::<Vec<f64>>())
        .mode(Mode::Lines)
        .name("stock_open");
    let close = Scatter::new(dates, records.iter().map(|r| r.close).collect::<Vec<f64>>())
        .mode(Mode::Lines)
        .name("stock_close");

    let mut plot = Plot::new();
    plot.add_trace(open);
    plot.add_trace(close);
    plot.set_layout(
        Layout::new()
            .title("Time Series data with Rangeslider")
            .x_axis(slider_axis("Date")),
    );
    plot
}

/// Observed closes, the predicted value and its uncertainty band.
pub fn forecast_chart(records: &[PriceRecord], forecast: &ForecastTable) -> Plot {
    let rows = forecast.rows();
    let dates = date_axis(rows.iter().map(|r| r.ds));

    let actual = Scatter::new(
        date_axis(records.iter().map(|r| r.date)),
        records.iter().map(|r| r.close).collect::<Vec<f64>>(),
    )
    .mode(Mode::Markers)
    .marker(Marker::new().size(3).color("black"))
    .name("Actual");

    let lower = Scatter::new(dates.clone(), rows.iter().map(|r| r.yhat_lower).collect::<Vec<f64>>())
        .mode(Mode::Lines)
        .line(Line::new().width(0.0))
        .show_legend(false)
        .name("Lower bound");
    let upper = Scatter::new(dates.clone(), rows.iter().map(|r| r.yhat_upper).collect::<Vec<f64>>())
        .mode(Mode::Lines)
        .line(Line::new().width(0.0))
        .fill(Fill::ToNextY)
        .fill_color(BAND_COLOR)
        .show_legend(false)
        .name("Upper bound");
    let predicted = Scatter::new(dates, rows.iter().map(|r| r.yhat).collect::<Vec<f64>>())
        .mode(Mode::Lines)
        .line(Line::new().color(FORECAST_COLOR).width(2.0))
        .name("Predicted");

    let mut plot = Plot::new();
    plot.add_trace(actual);
    plot.add_trace(lower);
    plot.add_trace(upper);
    plot.add_trace(predicted);
    plot.set_layout(
        Layout::new()
            .x_axis(slider_axis("ds"))
            .y_axis(Axis::new().title("y"))
            .height(600),
    );
    plot
}

fn component_plot(title: &str, x: Vec<String>, y: Vec<f64>) -> Plot {
    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(x, y)
            .mode(Mode::Lines)
            .line(Line::new().color(FORECAST_COLOR).width(2.0))
            .name(title),
    );
    plot.set_layout(
        Layout::new()
            .x_axis(Axis::new().title(title))
            .y_axis(Axis::new().title(title))
            .height(300),
    );
    plot
}

fn trend_chart(rows: &[ForecastPoint]) -> Plot {
    let dates = date_axis(rows.iter().map(|r| r.ds));

    let lower = Scatter::new(dates.clone(), rows.iter().map(|r| r.trend_lower).collect::<Vec<f64>>())
        .mode(Mode::Lines)
        .line(Line::new().width(0.0))
        .show_legend(false)
        .name("trend_lower");
    let upper = Scatter::new(dates.clone(), rows.iter().map(|r| r.trend_upper).collect::<Vec<f64>>())
        .mode(Mode::Lines)
        .line(Line::new().width(0.0))
        .fill(Fill::ToNextY)
        .fill_color(BAND_COLOR)
        .show_legend(false)
        .name("trend_upper");
    let trend = Scatter::new(dates, rows.iter().map(|r| r.trend).collect::<Vec<f64>>())
        .mode(Mode::Lines)
        .line(Line::new().color(FORECAST_COLOR).width(2.0))
        .name("trend");

    let mut plot = Plot::new();
    plot.add_trace(lower);
    plot.add_trace(upper);
    plot.add_trace(trend);
    plot.set_layout(
        Layout::new()
            .x_axis(Axis::new().title("ds"))
            .y_axis(Axis::new().title("trend"))
            .height(300),
    );
    plot
}

/// Weekly component by day of the week, Sunday first.
fn weekly_chart(rows: &[ForecastPoint]) -> Plot {
    let days = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];
    let mut names = Vec::new();
    let mut values = Vec::new();
    for day in days {
        if let Some(row) = rows.iter().find(|r| r.ds.weekday() == day) {
            names.push(format!("{:?}", day));
            values.push(row.weekly);
        }
    }
    component_plot("weekly", names, values)
}

/// Yearly component over one calendar year, keyed by month and day.
///
/// The reference year is a leap year so 29 February has its own slot.
fn yearly_chart(rows: &[ForecastPoint]) -> Plot {
    let mut by_day: Vec<Option<f64>> = vec![None; 366];
    for row in rows {
        if let Some(day) = row.ds.with_year(YEARLY_REFERENCE_YEAR) {
            by_day[day.ordinal0() as usize] = Some(row.yearly);
        }
    }

    let (dates, values): (Vec<String>, Vec<f64>) = by_day
        .iter()
        .enumerate()
        .filter_map(|(ordinal0, value)| {
            let date = NaiveDate::from_yo_opt(YEARLY_REFERENCE_YEAR, ordinal0 as u32 + 1)?;
            Some((date.format("%B %d").to_string(), (*value)?))
        })
        .unzip();
    component_plot("yearly", dates, values)
}

/// Trend with its band, followed by the enabled seasonal components.
pub fn components_charts(forecast: &ForecastTable) -> Vec<(&'static str, Plot)> {
    let rows = forecast.rows();
    let mut charts = vec![("trend", trend_chart(rows))];
    if forecast.has_weekly() {
        charts.push(("weekly", weekly_chart(rows)));
    }
    if forecast.has_yearly() {
        charts.push(("yearly", yearly_chart(rows)));
    }
    charts
}
