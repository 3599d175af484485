//! Enrichment strategies against wiremock pages.

use std::time::Duration;

use newswatch_pipeline::{
    ArticleExtractor, DateHeuristic, FetchError, PageFetcher, PageTextFetcher, Strategy,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

const ARTICLE_PAGE: &str = r#"<html><head>
<meta property="article:published_time" content="2023-05-01T10:00:00+03:00">
<title>Exports</title>
<script>window.tracking = true;</script>
</head><body>
<nav><p>Home | News | Contacts | About the school and its programmes</p></nav>
<article>
<h1>Grain exports</h1>
<p>Ukrainian grain exports grew in the first quarter despite logistics constraints.</p>
<p>Economists at the school expect the trend to continue through the summer season.</p>
</article>
</body></html>"#;

fn fetcher() -> PageFetcher {
    PageFetcher::new("newswatch-test").expect("fetcher should build")
}

async fn serve(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn article_extractor_returns_body_and_date() {
    let server = MockServer::start().await;
    serve(&server, "/news/a", ResponseTemplate::new(200).set_body_string(ARTICLE_PAGE)).await;

    let strategy = ArticleExtractor::new(fetcher(), TIMEOUT);
    let harvest = strategy
        .harvest(&format!("{}/news/a", server.uri()))
        .await
        .expect("fetch should succeed")
        .expect("page has content");

    let text = harvest.text.expect("body text");
    assert!(text.starts_with("Ukrainian grain exports grew"), "got: {text}");
    assert!(text.contains("through the summer season."));
    assert!(!text.contains("Home | News"));
    assert_eq!(harvest.date.as_deref(), Some("2023-05-01"));
}

#[tokio::test]
async fn page_text_fetcher_strips_markup() {
    let server = MockServer::start().await;
    serve(&server, "/news/a", ResponseTemplate::new(200).set_body_string(ARTICLE_PAGE)).await;

    let strategy = PageTextFetcher::new(fetcher(), TIMEOUT);
    let harvest = strategy
        .harvest(&format!("{}/news/a", server.uri()))
        .await
        .unwrap()
        .unwrap();

    let text = harvest.text.unwrap();
    assert!(text.starts_with("Exports Home | News"), "got: {text}");
    assert!(!text.contains("tracking"));
    assert!(harvest.date.is_none());
}

#[tokio::test]
async fn date_heuristic_uses_url_without_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let strategy = DateHeuristic::new(fetcher(), TIMEOUT);
    let harvest = strategy
        .harvest(&format!("{}/2022/11/03/story", server.uri()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(harvest.date.as_deref(), Some("2022-11-03"));
}

#[tokio::test]
async fn date_heuristic_falls_back_to_time_element() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/story",
        ResponseTemplate::new(200)
            .set_body_string(r#"<p>Posted <time datetime="2021-06-15T08:30:00Z">June 15</time></p>"#),
    )
    .await;

    let strategy = DateHeuristic::new(fetcher(), TIMEOUT);
    let harvest = strategy
        .harvest(&format!("{}/story", server.uri()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(harvest.date.as_deref(), Some("2021-06-15"));
}

#[tokio::test]
async fn missing_page_is_not_found() {
    let server = MockServer::start().await;
    serve(&server, "/gone", ResponseTemplate::new(404)).await;

    let strategy = ArticleExtractor::new(fetcher(), TIMEOUT);
    let result = strategy
        .harvest(&format!("{}/gone", server.uri()))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn server_error_is_a_failure() {
    let server = MockServer::start().await;
    serve(&server, "/broken", ResponseTemplate::new(503)).await;

    let strategy = PageTextFetcher::new(fetcher(), TIMEOUT);
    let err = strategy
        .harvest(&format!("{}/broken", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, FetchError::UnexpectedStatus { status: 503, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn slow_page_times_out() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/slow",
        ResponseTemplate::new(200)
            .set_body_string(ARTICLE_PAGE)
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let timeout = Duration::from_millis(200);
    let strategy = PageTextFetcher::new(fetcher(), timeout);
    let err = strategy
        .harvest(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Timeout(t) if t == timeout), "got: {err:?}");
}

#[tokio::test]
async fn invalid_link_is_a_failure() {
    let strategy = PageTextFetcher::new(fetcher(), TIMEOUT);
    let err = strategy.harvest("not a url").await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl { .. }), "got: {err:?}");
}
