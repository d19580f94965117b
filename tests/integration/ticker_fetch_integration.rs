//! Ticker map download against a mock SEC endpoint

use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::fixtures::company_tickers;
use edgar_financials::api::SecEdgarClient;
use edgar_financials::models::Cik;

const USER_AGENT: &str = "edgar-financials tests@example.com";

fn client() -> SecEdgarClient {
    SecEdgarClient::new(USER_AGENT, 100)
        .unwrap()
        .with_retry_policy(3, Duration::from_millis(10))
}

#[test_log::test(tokio::test)]
async fn test_ticker_fetch_retries_after_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/company_tickers.json"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/company_tickers.json"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(company_tickers(&[("AAPL", 320193), ("MSFT", 789019)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let map = client()
        .fetch_ticker_map(&format!("{}/files/company_tickers.json", server.uri()))
        .await
        .unwrap();

    assert_eq!(map.len(), 2);
    assert_eq!(map.get("aapl"), Some(Cik(320193)));
    assert_eq!(map.get("MSFT"), Some(Cik(789019)));
}

#[test_log::test(tokio::test)]
async fn test_ticker_fetch_gives_up_after_three_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let result = client()
        .fetch_ticker_map(&format!("{}/files/company_tickers.json", server.uri()))
        .await;

    assert!(result.is_err());
}
