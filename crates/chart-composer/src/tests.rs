#[cfg(test)]
mod chart_composer_tests {
    use std::sync::Mutex;

    use approx::assert_relative_eq;
    use chart_core::{
        BarInterval, ChartError, FinancialSnapshot, FundamentalsProvider, Period, PriceBar, PriceHistoryProvider,
        PriceSeries,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use technical_analysis::UserWaveAnchor;

    use crate::layout::TraceKind;
    use crate::{build_chart, ChartComposer, ChartMode, ChartOptions, ChartRequest, FibHigh, PanelKind};

    fn bars(closes: &[f64]) -> Vec<PriceBar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: start + Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 10_000.0,
            })
            .collect()
    }

    fn wave_closes() -> Vec<f64> {
        (0..80).map(|i| 100.0 + (i as f64 * 0.2).sin() * 10.0 + i as f64 * 0.1).collect()
    }

    fn series() -> PriceSeries {
        PriceSeries::new("AAPL", bars(&wave_closes())).unwrap()
    }

    fn snapshot() -> FinancialSnapshot {
        FinancialSnapshot {
            total_revenue: Some(100e9),
            revenue_growth: Some(-0.1),
            market_cap: Some(500e9),
            ..Default::default()
        }
    }

    struct StubPrices {
        result: Result<Vec<PriceBar>, ChartError>,
        calls: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>, BarInterval)>>,
    }

    impl StubPrices {
        fn returning(result: Result<Vec<PriceBar>, ChartError>) -> Self {
            Self { result, calls: Mutex::new(Vec::new()) }
        }
    }

    impl PriceHistoryProvider for StubPrices {
        fn fetch_bars(
            &self,
            _ticker: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
            interval: BarInterval,
        ) -> Result<Vec<PriceBar>, ChartError> {
            self.calls.lock().unwrap().push((start, end, interval));
            self.result.clone()
        }
    }

    struct StubFundamentals {
        result: Result<FinancialSnapshot, ChartError>,
        calls: Mutex<usize>,
    }

    impl StubFundamentals {
        fn returning(result: Result<FinancialSnapshot, ChartError>) -> Self {
            Self { result, calls: Mutex::new(0) }
        }
    }

    impl FundamentalsProvider for StubFundamentals {
        fn fetch_snapshot(&self, _ticker: &str) -> Result<FinancialSnapshot, ChartError> {
            *self.calls.lock().unwrap() += 1;
            self.result.clone()
        }
    }

    fn request(options: ChartOptions) -> ChartRequest {
        ChartRequest { ticker: "AAPL".to_string(), options }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 16, 0, 0).unwrap()
    }

    #[test]
    fn test_price_only_chart() {
        let result = ChartComposer::new()
            .compose("AAPL", &series(), None, &ChartOptions::default())
            .unwrap();

        assert_eq!(result.figure.title, "AAPL Stock Price - Past Year");
        assert_eq!(result.figure.panels.len(), 1);
        assert_eq!(result.figure.height, 600);
        assert_eq!(result.figure.traces.len(), 1);
        assert!(result.figure.trace("Close Price").is_some());
        assert_eq!(result.financial_metrics.market_cap, "N/A");
        assert!(result.price_target.future_value.is_none());
    }

    #[test]
    fn test_all_panels_in_order() {
        let options = ChartOptions {
            show_volume: true,
            show_rsi: true,
            show_macd: true,
            ..Default::default()
        };
        let result = ChartComposer::new().compose("AAPL", &series(), None, &options).unwrap();
        let figure = &result.figure;

        let kinds: Vec<PanelKind> = figure.panels.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PanelKind::Price, PanelKind::Volume, PanelKind::Rsi, PanelKind::Macd]);
        assert_relative_eq!(figure.panels.iter().map(|p| p.height).sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_eq!(figure.height, 1200);

        assert_eq!(figure.trace("Volume").unwrap().row, 2);
        assert_eq!(figure.trace("RSI").unwrap().row, 3);
        assert_eq!(figure.trace("MACD").unwrap().row, 4);
        assert_eq!(figure.trace("Histogram").unwrap().row, 4);
        assert_eq!(figure.horizontal_lines.len(), 3);
    }

    #[test]
    fn test_candlestick_price_trace() {
        let options = ChartOptions { show_candlestick: true, ..Default::default() };
        let result = ChartComposer::new().compose("AAPL", &series(), None, &options).unwrap();

        let trace = result.figure.trace("Price").unwrap();
        assert!(matches!(trace.kind, TraceKind::Candlestick { .. }));
        assert!(result.figure.trace("Close Price").is_none());
    }

    #[test]
    fn test_fibonacci_uses_close_range() {
        let closes = wave_closes();
        let high = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let options = ChartOptions { show_fib: true, show_extensions: true, ..Default::default() };
        let result = ChartComposer::new().compose("AAPL", &series(), None, &options).unwrap();

        let top = format!("0% - ${:.2}", high);
        assert!(result.figure.trace(&top).is_some());
        // Price line + 7 retracements + 4 extensions
        assert_eq!(result.figure.traces.len(), 12);
    }

    #[test]
    fn test_manual_fib_high() {
        let options = ChartOptions {
            show_fib: true,
            manual_fib: true,
            fib_high: Some(FibHigh::Text("300".to_string())),
            ..Default::default()
        };
        let result = ChartComposer::new().compose("AAPL", &series(), None, &options).unwrap();
        assert!(result.figure.trace("0% - $300.00").is_some());

        let bad = ChartOptions { fib_high: Some(FibHigh::Text("lots".to_string())), ..options };
        let err = ChartComposer::new().compose("AAPL", &series(), None, &bad).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_trendlines_mode_skips_fibonacci() {
        let options = ChartOptions {
            chart_mode: ChartMode::Trendlines,
            show_fib: true,
            ..Default::default()
        };
        let result = ChartComposer::new().compose("AAPL", &series(), None, &options).unwrap();
        assert_eq!(result.figure.traces.len(), 1);
    }

    #[test]
    fn test_user_waves_override_auto_detection() {
        let options = ChartOptions {
            show_elliott_auto_waves: true,
            elliott_points: vec![
                UserWaveAnchor { x: "2024-01-10".to_string(), y: 100.0 },
                UserWaveAnchor { x: "2024-02-01".to_string(), y: 120.0 },
            ],
            ..Default::default()
        };
        let result = ChartComposer::new().compose("AAPL", &series(), None, &options).unwrap();
        let figure = &result.figure;

        assert!(figure.trace("User Elliott Waves").is_some());
        assert!(figure.trace("Impulse").is_none());
        assert!(figure.trace("Correction").is_none());

        // Rays reach a year past the last charted bar (2024-03-21)
        match &figure.trace("W2 50.0% Retr.").unwrap().kind {
            TraceKind::Line { x, .. } => assert_eq!(x[1], "2025-03-21"),
            _ => panic!("projection must be a line"),
        }
    }

    #[test]
    fn test_single_anchor_suppresses_auto_waves() {
        let options = ChartOptions {
            show_elliott_auto_waves: true,
            elliott_points: vec![UserWaveAnchor { x: "2024-01-10".to_string(), y: 100.0 }],
            ..Default::default()
        };
        let result = ChartComposer::new().compose("AAPL", &series(), None, &options).unwrap();
        let names: Vec<&str> = result.figure.traces.iter().map(|t| t.name.as_str()).collect();

        assert_eq!(names, vec!["Close Price"]);
        assert!(result.figure.annotations.is_empty());
    }

    #[test]
    fn test_moving_averages_drawn_last() {
        let options = ChartOptions {
            moving_averages: vec![20, 50, 200],
            show_volume: true,
            ..Default::default()
        };
        let result = ChartComposer::new().compose("AAPL", &series(), None, &options).unwrap();
        let names: Vec<&str> = result.figure.traces.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Close Price", "Volume", "MA20", "MA50", "MA200"]);
    }

    #[test]
    fn test_invalid_ticker() {
        for ticker in ["", "  ", "AAPL;DROP"] {
            let err = ChartComposer::new()
                .compose(ticker, &series(), None, &ChartOptions::default())
                .unwrap_err();
            assert!(err.is_invalid_input(), "{:?} should be rejected", ticker);
        }
    }

    #[test]
    fn test_financials_and_valuation() {
        let snap = snapshot();
        let result = ChartComposer::new()
            .compose("AAPL", &series(), Some(&snap), &ChartOptions::default())
            .unwrap();

        assert_eq!(result.financial_metrics.revenue_growth, "-10.00%");
        assert_eq!(result.financial_metrics.total_revenue, "$100.00B");
        assert_eq!(result.price_target.future_value.as_deref(), Some("$191.44B"));
        assert_eq!(result.price_target.rate_increase.as_deref(), Some("0.38x"));
        assert!(result.price_target.adjustments.contains("P/E adjusted to 30 from N/A"));
    }

    #[test]
    fn test_build_chart_requests_period_window() {
        let prices = StubPrices::returning(Ok(bars(&wave_closes())));
        let fundamentals = StubFundamentals::returning(Ok(snapshot()));
        let options = ChartOptions { period: Period::ThreeMonths, ..Default::default() };

        let result = build_chart(&prices, &fundamentals, &request(options), now()).unwrap();

        let calls = prices.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (start, end, interval) = calls[0];
        assert_eq!(end, now());
        assert_eq!(end - start, Duration::days(90));
        assert_eq!(interval, BarInterval::Hour4);
        assert_eq!(*fundamentals.calls.lock().unwrap(), 1);
        assert_eq!(result.figure.title, "AAPL Stock Price - Past 3 Months");
        assert!(result.price_target.future_value.is_some());
    }

    #[test]
    fn test_build_chart_empty_series() {
        let prices = StubPrices::returning(Ok(vec![]));
        let fundamentals = StubFundamentals::returning(Ok(snapshot()));

        let err = build_chart(&prices, &fundamentals, &request(ChartOptions::default()), now()).unwrap_err();
        assert_eq!(err, ChartError::InvalidInput("No data found for ticker: AAPL".to_string()));
    }

    #[test]
    fn test_build_chart_price_source_failure() {
        let prices = StubPrices::returning(Err(ChartError::DataSource("timeout".to_string())));
        let fundamentals = StubFundamentals::returning(Ok(snapshot()));

        let err = build_chart(&prices, &fundamentals, &request(ChartOptions::default()), now()).unwrap_err();
        assert!(matches!(err, ChartError::DataSource(_)));
    }

    #[test]
    fn test_build_chart_absorbs_fundamentals_failure() {
        let prices = StubPrices::returning(Ok(bars(&wave_closes())));
        let fundamentals = StubFundamentals::returning(Err(ChartError::DataSource("rate limited".to_string())));

        let result = build_chart(&prices, &fundamentals, &request(ChartOptions::default()), now()).unwrap();
        assert_eq!(result.financial_metrics.revenue_growth, "N/A");
        assert!(result.price_target.future_value.is_none());
    }

    #[test]
    fn test_build_chart_skips_fundamentals_when_excluded() {
        let prices = StubPrices::returning(Ok(bars(&wave_closes())));
        let fundamentals = StubFundamentals::returning(Ok(snapshot()));
        let options = ChartOptions { include_financials: false, ..Default::default() };

        let result = build_chart(&prices, &fundamentals, &request(options), now()).unwrap();
        assert_eq!(*fundamentals.calls.lock().unwrap(), 0);
        assert_eq!(result.financial_metrics.total_revenue, "N/A");
    }

    #[test]
    fn test_build_chart_rejects_bad_ticker_before_fetching() {
        let prices = StubPrices::returning(Ok(bars(&wave_closes())));
        let fundamentals = StubFundamentals::returning(Ok(snapshot()));
        let bad = ChartRequest { ticker: "A/B".to_string(), options: ChartOptions::default() };

        assert!(build_chart(&prices, &fundamentals, &bad, now()).unwrap_err().is_invalid_input());
        assert!(prices.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_result_serializes() {
        let snap = snapshot();
        let options = ChartOptions { show_rsi: true, ..Default::default() };
        let result = ChartComposer::new().compose("AAPL", &series(), Some(&snap), &options).unwrap();

        let json: serde_json::Value = serde_json::from_str(&result.to_json(false).unwrap()).unwrap();
        assert_eq!(json["price_stats"]["current"], result.price_stats.current.as_str());
        assert_eq!(json["financial_metrics"]["totalRevenue"], "$100.00B");
        assert_eq!(json["price_target"]["futureValue"], "$191.44B");
        assert_eq!(json["figure"]["panels"][1]["kind"], "rsi");
        // Leading RSI values are null
        assert!(json["figure"]["traces"][1]["y"][0].is_null());
    }
}
