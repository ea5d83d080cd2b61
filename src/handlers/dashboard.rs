use crate::helpers::controls::{
    clamp_years, default_ticker, horizon_days, parse_years, resolve_ticker,
};
use crate::helpers::data::{load_data, mark_loaded, run_forecast};
use crate::helpers::errors::AppError;
use crate::schemas::{AppState, DashboardQuery};
use crate::views::page::{Controls, DashboardContent, DashboardView, render_dashboard};
use crate::views::{charts, tables};
use axum::{
    extract::{Query, State},
    response::Html,
};
use tracing::{debug, info, instrument, trace, warn};

async fn build_content(
    state: &AppState,
    ticker: &str,
    years: u32,
) -> Result<(DashboardContent, bool), AppError> {
    let history = load_data(state, ticker).await?;
    let first_load = mark_loaded(state);
    let tail = state.settings.table_tail;

    let price_table = tables::price_table(history.tail(tail));
    let raw_chart = charts::to_html(&charts::raw_data_chart(history.records()), "raw-data-plot");

    let forecast = run_forecast(history.clone(), horizon_days(years)).await?;
    let forecast_table = tables::forecast_table(forecast.tail(tail));
    let forecast_chart = charts::to_html(
        &charts::forecast_chart(history.records(), &forecast),
        "forecast-plot",
    );
    let components = charts::components_charts(&forecast)
        .iter()
        .map(|(name, plot)| charts::to_html(plot, &format!("component-{}", name)))
        .collect();

    Ok((
        DashboardContent {
            price_table,
            raw_chart,
            forecast_table,
            forecast_chart,
            components,
        },
        first_load,
    ))
}

/// The dashboard page.
///
/// Failures are shown in place of the data sections; the page itself is
/// always served so the controls stay usable.
#[instrument]
pub async fn dashboard(
    Query(query): Query<DashboardQuery>,
    State(state): State<AppState>,
) -> Html<String> {
    trace!("Entering dashboard function");

    let ticker = resolve_ticker(query.ticker.as_deref(), query.custom_ticker.as_deref());
    let years = clamp_years(parse_years(query.years.as_deref()));
    debug!("Rendering dashboard for {} over {} years", ticker, years);

    let controls = Controls {
        ticker: ticker.clone(),
        selected: query
            .ticker
            .clone()
            .unwrap_or_else(|| default_ticker().to_string()),
        custom: query.custom_ticker.clone().unwrap_or_default(),
        years,
    };

    let (content, first_load) = match build_content(&state, &ticker, years).await {
        Ok((content, first_load)) => {
            info!("Dashboard rendered for {}", ticker);
            (Ok(content), first_load)
        }
        Err(e) => {
            warn!("Dashboard for {} failed with {}: {}", ticker, e.status(), e);
            (Err(e.to_string()), false)
        }
    };

    Html(render_dashboard(&DashboardView {
        controls,
        first_load,
        content,
    }))
}
