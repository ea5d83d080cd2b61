use common::TickerOptions;

/// Tickers offered by the dashboard dropdown, in display order.
pub const STOCK_OPTIONS: [&str; 30] = [
    "GOOG", "AAPL", "MSFT", "GME", "AMZN", "FB", "TSLA", "BRK.A", "V", "JNJ", "WMT", "PG", "MA",
    "UNH", "DIS", "NVDA", "HD", "PYPL", "BAC", "VZ", "ADBE", "CMCSA", "NFLX", "KO", "NKE", "MRK",
    "PEP", "T", "PFE", "INTC",
];

pub const MIN_YEARS: u32 = 1;
pub const MAX_YEARS: u32 = 4;
pub const DEFAULT_YEARS: u32 = 1;
pub const DAYS_PER_YEAR: u32 = 365;

/// The dropdown default.
pub fn default_ticker() -> &'static str {
    STOCK_OPTIONS[0]
}

pub fn ticker_options() -> TickerOptions {
    TickerOptions {
        tickers: STOCK_OPTIONS.iter().map(|t| t.to_string()).collect(),
        default_ticker: default_ticker().to_string(),
    }
}

/// Picks the ticker to load.
///
/// A non-blank free-text entry wins and is uppercased; otherwise the dropdown
/// selection is used, falling back to the first option.
pub fn resolve_ticker(selected: Option<&str>, custom: Option<&str>) -> String {
    if let Some(custom) = custom.map(str::trim).filter(|c| !c.is_empty()) {
        return custom.to_uppercase();
    }

    selected
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default_ticker())
        .to_string()
}

/// Forecast horizon in days for a horizon in years.
pub fn horizon_days(years: u32) -> u32 {
    years * DAYS_PER_YEAR
}

/// Reads a year count typed into the query string.
///
/// Fractions and out-of-range numbers saturate to an integer; text that is not
/// a number counts as missing.
pub fn parse_years(raw: Option<&str>) -> Option<i64> {
    let raw = raw.map(str::trim).filter(|r| !r.is_empty())?;
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .map(|v| v as i64)
    })
}

/// Brings a requested year count into the slider range; a missing value gives the default.
pub fn clamp_years(years: Option<i64>) -> u32 {
    match years {
        Some(years) => years.clamp(i64::from(MIN_YEARS), i64::from(MAX_YEARS)) as u32,
        None => DEFAULT_YEARS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_ticker_overrides_selection_and_is_uppercased() {
        assert_eq!(resolve_ticker(Some("MSFT"), Some("aapl")), "AAPL");
        assert_eq!(resolve_ticker(None, Some("  brk.b ")), "BRK.B");
    }

    #[test]
    fn blank_custom_ticker_keeps_selection() {
        assert_eq!(resolve_ticker(Some("TSLA"), Some("")), "TSLA");
        assert_eq!(resolve_ticker(Some("TSLA"), Some("   ")), "TSLA");
        assert_eq!(resolve_ticker(Some("NVDA"), None), "NVDA");
    }

    #[test]
    fn nothing_selected_falls_back_to_first_option() {
        assert_eq!(resolve_ticker(None, None), "GOOG");
        assert_eq!(resolve_ticker(Some(""), None), "GOOG");
    }

    #[test]
    fn horizon_is_years_times_365() {
        let days: Vec<u32> = (1..=4).map(horizon_days).collect();
        assert_eq!(days, vec![365, 730, 1095, 1460]);
    }

    #[test]
    fn years_are_clamped_to_slider_range() {
        assert_eq!(clamp_years(None), 1);
        assert_eq!(clamp_years(Some(0)), 1);
        assert_eq!(clamp_years(Some(-3)), 1);
        assert_eq!(clamp_years(Some(3)), 3);
        assert_eq!(clamp_years(Some(12)), 4);
    }

    #[test]
    fn malformed_years_are_read_leniently() {
        assert_eq!(parse_years(Some(" 3 ")), Some(3));
        assert_eq!(parse_years(Some("2.7")), Some(2));
        assert_eq!(parse_years(Some("99999999999999999999")), Some(i64::MAX));
        assert_eq!(parse_years(Some("-1e30")), Some(i64::MIN));
        assert_eq!(parse_years(Some("abc")), None);
        assert_eq!(parse_years(Some("NaN")), None);
        assert_eq!(parse_years(Some("")), None);
        assert_eq!(parse_years(None), None);

        assert_eq!(clamp_years(parse_years(Some("99999999999999999999"))), 4);
        assert_eq!(clamp_years(parse_years(Some("abc"))), 1);
    }

    #[test]
    fn options_list_thirty_tickers() {
        let options = ticker_options();
        assert_eq!(options.tickers.len(), 30);
        assert_eq!(options.default_ticker, "GOOG");
        assert!(options.tickers.contains(&"BRK.A".to_string()));
        assert_eq!(options.tickers.last().map(String::as_str), Some("INTC"));
    }
}
