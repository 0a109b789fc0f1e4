#[cfg(test)]
mod integration_tests {
    use crate::schemas::{ApiResponse, HealthResponse};
    use crate::test_utils::test_utils::{
        EMPTY_TICKER, FLAT_TICKER, RISING_SESSIONS, RISING_TICKER, SHORT_TICKER, date,
        setup_test_app,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::{Datelike, Weekday};
    use common::{ChartResponse, CompanyProfile, ErrorResponse, PriceSeries, RenderMode};
    use compute::charts::{
        INDICATOR_TITLE, NO_DATA_MESSAGE, NOT_ENOUGH_HISTORY_MESSAGE, PRICE_TITLE, forecast_title,
    };

    fn server() -> TestServer {
        TestServer::new(setup_test_app()).unwrap()
    }

    fn assert_error(response: &axum_test::TestResponse, status: StatusCode, code: &str) {
        response.assert_status(status);
        let body: ErrorResponse = response.json();
        assert!(!body.success);
        assert_eq!(body.code, code);
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = server().get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: HealthResponse = response.json();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.provider, "static");
    }

    #[tokio::test]
    async fn test_company_without_ticker_returns_placeholder() {
        let server = server();

        for path in ["/api/v1/company", "/api/v1/company?ticker=", "/api/v1/company?ticker=%20%20"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::OK);
            let body: ApiResponse<CompanyProfile> = response.json();
            assert!(body.success);
            assert!(body.data.is_placeholder(), "{} should give the placeholder", path);
            assert_eq!(body.data.name, "Stock Prediction");
        }
    }

    #[tokio::test]
    async fn test_company_known_ticker() {
        let response = server()
            .get("/api/v1/company")
            .add_query_param("ticker", "aaa")
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<CompanyProfile> = response.json();
        assert_eq!(body.data.name, "Triple A Inc.");
        assert_eq!(body.data.logo_url.as_deref(), Some("https://example.com/aaa.png"));
        assert_eq!(body.data.description, "Makes batteries.");
    }

    #[tokio::test]
    async fn test_company_unknown_ticker() {
        let response = server()
            .get("/api/v1/company")
            .add_query_param("ticker", "ZZZZ")
            .await;

        assert_error(&response, StatusCode::NOT_FOUND, "ticker_not_found");
    }

    #[tokio::test]
    async fn test_prices_within_range() {
        let response = server()
            .get("/api/v1/prices")
            .add_query_param("ticker", FLAT_TICKER)
            .add_query_param("start_date", "2020-01-01")
            .add_query_param("end_date", "2020-01-03")
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<PriceSeries> = response.json();
        assert_eq!(body.data.ticker, FLAT_TICKER);
        assert_eq!(body.data.len(), 2);
        assert_eq!(body.data.dates(), vec![date(2020, 1, 2), date(2020, 1, 3)]);
    }

    #[tokio::test]
    async fn test_prices_without_start_returns_full_history() {
        let response = server()
            .get("/api/v1/prices")
            .add_query_param("ticker", FLAT_TICKER)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<PriceSeries> = response.json();
        assert_eq!(body.data.len(), 3);
    }

    #[tokio::test]
    async fn test_prices_missing_ticker() {
        let server = server();

        let response = server.get("/api/v1/prices").await;
        assert_error(&response, StatusCode::BAD_REQUEST, "missing_input");

        let response = server.get("/api/v1/prices?ticker=").await;
        assert_error(&response, StatusCode::BAD_REQUEST, "missing_input");
    }

    #[tokio::test]
    async fn test_prices_reversed_range() {
        let response = server()
            .get("/api/v1/prices")
            .add_query_param("ticker", FLAT_TICKER)
            .add_query_param("start_date", "2020-02-01")
            .add_query_param("end_date", "2020-01-01")
            .await;

        assert_error(&response, StatusCode::BAD_REQUEST, "invalid_input");
    }

    #[tokio::test]
    async fn test_price_chart_plots_open_and_close() {
        let response = server()
            .get("/api/v1/charts/price")
            .add_query_param("ticker", FLAT_TICKER)
            .add_query_param("start_date", "2020-01-01")
            .add_query_param("end_date", "2020-01-10")
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ChartResponse> = response.json();
        let spec = &body.data.spec;
        assert_eq!(spec.title, PRICE_TITLE);
        assert!(spec.empty_message.is_none());

        let close = spec.series_named("Close").unwrap();
        let open = spec.series_named("Open").unwrap();
        assert_eq!(close.y, vec![10.0, 10.0, 10.0]);
        assert_eq!(open.y, vec![10.0, 10.0, 10.0]);
        assert_eq!(close.x, vec![date(2020, 1, 2), date(2020, 1, 3), date(2020, 1, 6)]);

        // The figure carries one trace per series
        let traces = body.data.figure["data"].as_array().unwrap();
        assert_eq!(traces.len(), 2);
    }

    #[tokio::test]
    async fn test_indicator_chart_of_flat_prices_is_flat() {
        let response = server()
            .get("/api/v1/charts/indicator")
            .add_query_param("ticker", FLAT_TICKER)
            .add_query_param("start_date", "2020-01-01")
            .add_query_param("end_date", "2020-01-10")
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ChartResponse> = response.json();
        let spec = &body.data.spec;
        assert_eq!(spec.title, INDICATOR_TITLE);
        assert_eq!(spec.y_field, "EWA_20");
        assert_eq!(spec.series.len(), 1);
        assert_eq!(spec.series[0].y, vec![10.0, 10.0, 10.0]);
        assert_eq!(spec.series[0].mode, RenderMode::LinesMarkers);
    }

    #[tokio::test]
    async fn test_indicator_tracks_rising_closes_from_below() {
        let response = server()
            .get("/api/v1/charts/indicator")
            .add_query_param("ticker", RISING_TICKER)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ChartResponse> = response.json();
        let values = &body.data.spec.series[0].y;
        assert_eq!(values.len(), RISING_SESSIONS);
        assert_eq!(values[0], 1.0);
        for (i, value) in values.iter().enumerate().skip(1) {
            assert!(*value < (i + 1) as f64);
            assert!(*value > values[i - 1]);
        }
    }

    #[tokio::test]
    async fn test_charts_for_empty_range_show_message() {
        let server = server();

        for path in ["/api/v1/charts/price", "/api/v1/charts/indicator"] {
            let response = server
                .get(path)
                .add_query_param("ticker", FLAT_TICKER)
                .add_query_param("start_date", "2021-01-01")
                .add_query_param("end_date", "2021-02-01")
                .await;

            response.assert_status(StatusCode::OK);
            let body: ApiResponse<ChartResponse> = response.json();
            assert_eq!(body.message, NO_DATA_MESSAGE);
            assert_eq!(body.data.spec.empty_message.as_deref(), Some(NO_DATA_MESSAGE));
            assert!(body.data.spec.series.is_empty());
        }

        let response = server
            .get("/api/v1/charts/price")
            .add_query_param("ticker", EMPTY_TICKER)
            .await;
        let body: ApiResponse<ChartResponse> = response.json();
        assert_eq!(body.data.spec.empty_message.as_deref(), Some(NO_DATA_MESSAGE));
    }

    #[tokio::test]
    async fn test_chart_unknown_ticker() {
        let response = server()
            .get("/api/v1/charts/price")
            .add_query_param("ticker", "ZZZZ")
            .await;

        assert_error(&response, StatusCode::NOT_FOUND, "ticker_not_found");
    }

    #[tokio::test]
    async fn test_forecast_chart_extends_trend() {
        let response = server()
            .get("/api/v1/charts/forecast")
            .add_query_param("ticker", RISING_TICKER)
            .add_query_param("days", 3)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ChartResponse> = response.json();
        let spec = &body.data.spec;
        assert_eq!(spec.title, forecast_title(3));
        assert_eq!(spec.title, "Predicted Close Price of next 3 days");

        let observed = spec.series_named("Observed").unwrap();
        let projected = spec.series_named("Forecast").unwrap();
        assert_eq!(observed.x.len(), RISING_SESSIONS);
        assert_eq!(projected.x.len(), 3);

        let last_observed = *observed.x.last().unwrap();
        for (k, (day, close)) in projected.x.iter().zip(&projected.y).enumerate() {
            assert!(*day > last_observed);
            assert!(!matches!(day.weekday(), Weekday::Sat | Weekday::Sun));
            let expected = (RISING_SESSIONS + k + 1) as f64;
            assert!((close - expected).abs() < 1e-6, "{} != {}", close, expected);
        }
    }

    #[tokio::test]
    async fn test_forecast_with_too_little_history() {
        let server = server();

        for ticker in [SHORT_TICKER, EMPTY_TICKER] {
            let response = server
                .get("/api/v1/charts/forecast")
                .add_query_param("ticker", ticker)
                .add_query_param("days", 5)
                .await;

            response.assert_status(StatusCode::OK);
            let body: ApiResponse<ChartResponse> = response.json();
            assert_eq!(body.message, NOT_ENOUGH_HISTORY_MESSAGE);
            assert_eq!(body.data.spec.title, forecast_title(5));
            assert!(body.data.spec.series.is_empty());
        }
    }

    #[tokio::test]
    async fn test_forecast_input_validation() {
        let server = server();

        let response = server
            .get("/api/v1/charts/forecast")
            .add_query_param("ticker", RISING_TICKER)
            .await;
        assert_error(&response, StatusCode::BAD_REQUEST, "missing_input");

        let response = server
            .get("/api/v1/charts/forecast")
            .add_query_param("ticker", RISING_TICKER)
            .add_query_param("days", 0)
            .await;
        assert_error(&response, StatusCode::BAD_REQUEST, "invalid_input");

        let response = server
            .get("/api/v1/charts/forecast")
            .add_query_param("days", 5)
            .await;
        assert_error(&response, StatusCode::BAD_REQUEST, "missing_input");
    }

    #[tokio::test]
    async fn test_old_history_forecasts_from_its_last_session() {
        let response = server()
            .get("/api/v1/charts/forecast")
            .add_query_param("ticker", FLAT_TICKER)
            .add_query_param("days", 2)
            .await;

        // AAA stops trading on 2020-01-06, long before today
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ChartResponse> = response.json();
        let spec = &body.data.spec;
        assert!(spec.empty_message.is_none());
        assert_eq!(spec.series_named("Observed").unwrap().x.len(), 3);

        let projected = spec.series_named("Forecast").unwrap();
        assert_eq!(projected.x, vec![date(2020, 1, 7), date(2020, 1, 8)]);
        assert!(projected.y.iter().all(|close| (close - 10.0).abs() < 1e-9));
    }

    #[tokio::test]
    async fn test_undecodable_query_values_return_json_errors() {
        let server = server();

        for path in [
            "/api/v1/charts/forecast?ticker=RISE&days=abc",
            "/api/v1/charts/forecast?ticker=RISE&days=-3",
            "/api/v1/prices?ticker=AAA&start_date=2020-13-01",
            "/api/v1/charts/price?ticker=AAA&end_date=yesterday",
            "/api/v1/charts/indicator?ticker=AAA&start_date=",
        ] {
            let response = server.get(path).await;
            assert_error(&response, StatusCode::BAD_REQUEST, "invalid_input");
            let body: ErrorResponse = response.json();
            assert!(!body.error.is_empty(), "{} has no error text", path);
        }
    }

    #[test]
    fn test_app_setup_keeps_tracing_installed() {
        let _app = setup_test_app();
        assert!(tracing::dispatcher::has_been_set());
    }
}
