use std::time::Duration;

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nba_reference_db::error::FetchError;
use nba_reference_db::fetch::{Endpoint, Fetcher, HttpTransport};
use nba_reference_db::rate_limit::{RateLimiter, RateLimiterConfig};
use nba_reference_db::raw::{RawPlayer, RawTeam};

const HOST: &str = "v2.nba.api-sports.io";

fn fetcher(server: &MockServer) -> Fetcher<HttpTransport> {
    let transport =
        HttpTransport::with_base_url(server.uri(), HOST, "test-key", Duration::from_secs(5))
            .unwrap();
    Fetcher::new(transport, RateLimiter::new(RateLimiterConfig::default()).unwrap())
}

#[tokio::test]
async fn sends_auth_headers_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/players"))
        .and(query_param("season", "2023"))
        .and(query_param("team", "17"))
        .and(header("x-rapidapi-host", HOST))
        .and(header("x-rapidapi-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"get": "players", "results": 1,
                "response": [{"id": 265, "firstname": "LeBron", "lastname": "James"}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let mut fetcher = fetcher(&server);
    let players: Vec<RawPlayer> = fetcher.fetch(&Endpoint::players(2023, 17)).await.unwrap();

    assert_eq!(players.len(), 1);
    assert_eq!(players[0].id, 265);
    assert_eq!(players[0].lastname.as_deref(), Some("James"));
}

#[tokio::test]
async fn error_status_aborts_the_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/players/statistics"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut fetcher = fetcher(&server);
    let endpoint = Endpoint::player_stats(2023, 17);
    let result: Result<Vec<RawPlayer>, _> = fetcher.fetch(&endpoint).await;

    match result {
        Err(FetchError::Status { status, path }) => {
            assert_eq!(status, 503);
            assert_eq!(path, "/players/statistics?season=2023&team=17");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/games"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"response": [{"id": "not a number"}]}"#),
        )
        .mount(&server)
        .await;

    let mut fetcher = fetcher(&server);
    let result: Result<Vec<RawTeam>, _> = fetcher.fetch(&Endpoint::games(2023)).await;

    assert!(matches!(result, Err(FetchError::Parse { .. })));
}
