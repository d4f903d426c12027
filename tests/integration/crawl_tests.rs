//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small book site and run the full
//! fetch, parse and write cycle end-to-end.

use bibliocrawl::config::Config;
use bibliocrawl::engine::{build_http_client, run_crawl, Engine, EngineSettings, RetryPolicy};
use bibliocrawl::output::{open_sink, CrawlStats, JsonLinesSink, RecordSink, SqliteSink};
use bibliocrawl::{FollowUp, Orchestrator, ParserRole};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a list-mode configuration pointed at the mock server
fn create_test_config(base_url: &str, output_path: &Path, format: &str, extra: &str) -> Config {
    let content = format!(
        r#"
[site]
base-url = "{base_url}"

[crawl]
mode = "list"
list-name = "1.Best"
start-page = 1
end-page = 2
max-concurrent-pages-open = 2
minimum-time-between-requests = 0
{extra}

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[output]
format = "{format}"
path = "{path}"
"#,
        path = output_path.display()
    );

    let config: Config = toml::from_str(&content).expect("test config should parse");
    bibliocrawl::config::validate(&config).expect("test config should validate");
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

fn book_page(title: &str, author_href: &str, author: &str) -> ResponseTemplate {
    html(&format!(
        r#"<h1 id="bookTitle">{title}</h1>
           <a class="authorName" href="{author_href}"><span>{author}</span></a>"#
    ))
}

fn author_page(name: &str, links: &str) -> ResponseTemplate {
    html(&format!(
        r#"<h1 class="authorName"><span itemprop="name">{name}</span></h1>{links}"#
    ))
}

/// Mounts two list pages, three books and two authors
///
/// The lists repeat "Emma" under different spellings, and two books share
/// an author, so a correct crawl fetches every page exactly once.
async fn mount_book_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/list/show/1.Best"))
        .and(query_param("page", "1"))
        .respond_with(html(
            r##"<a class="bookTitle" href="/book/show/1.Dune">Dune</a>
                <a class="bookTitle" href="/book/show/2.Emma">Emma</a>
                <a class="bookTitle" href="/book/show/2.Emma#reviews">Emma</a>"##,
        ))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/list/show/1.Best"))
        .and(query_param("page", "2"))
        .respond_with(html(
            r#"<a class="bookTitle" href="/book/show/2.Emma?from_search=true">Emma</a>
               <a class="bookTitle" href="/book/show/3.Persuasion">Persuasion</a>"#,
        ))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/book/show/1.Dune"))
        .respond_with(book_page(
            "Dune",
            "/author/show/58.Frank_Herbert",
            "Frank Herbert",
        ))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/book/show/2.Emma"))
        .respond_with(book_page(
            "Emma",
            "/author/show/1265.Jane_Austen",
            "Jane Austen",
        ))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/book/show/3.Persuasion"))
        .respond_with(book_page(
            "Persuasion",
            "/author/show/1265.Jane_Austen?from_search=true",
            "Jane Austen",
        ))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/author/show/58.Frank_Herbert"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/author/show/1265.Jane_Austen"))
        .respond_with(author_page("Jane Austen", ""))
        .expect(1)
        .mount(server)
        .await;
}

fn read_json_lines(path: &Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .expect("output file should exist")
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be JSON"))
        .collect()
}

#[tokio::test]
async fn test_list_crawl_writes_json_lines() {
    let server = MockServer::start().await;
    mount_book_site(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("records.jsonl");
    let config = create_test_config(&server.uri(), &output_path, "jsonl", "");

    let orchestrator = Orchestrator::with_author_crawl(config.crawl.author_crawl);
    let mut sink = open_sink(&config.output).unwrap();
    let stats = Arc::new(CrawlStats::new());

    let snapshot = run_crawl(&config, orchestrator, sink.as_mut(), stats)
        .await
        .expect("crawl should complete");

    assert_eq!(snapshot.pages_fetched, 6);
    assert_eq!(snapshot.pages_failed, 1);
    assert_eq!(snapshot.books, 3);
    assert_eq!(snapshot.authors, 1);
    assert_eq!(snapshot.follow_ups, 8);
    assert_eq!(snapshot.duplicates_skipped, 3);
    assert_eq!(snapshot.observer_failures, 0);

    let records = read_json_lines(&output_path);
    assert_eq!(records.len(), 4);

    let titles: BTreeSet<&str> = records
        .iter()
        .filter(|r| r["type"] == "book")
        .filter_map(|r| r["title"].as_str())
        .collect();
    assert_eq!(titles, BTreeSet::from(["Dune", "Emma", "Persuasion"]));

    let author = records
        .iter()
        .find(|r| r["type"] == "author")
        .expect("one author record");
    assert_eq!(author["name"], "Jane Austen");
    // Whichever spelling of the author link was queued first is the one fetched
    assert!(author["url"]
        .as_str()
        .unwrap()
        .starts_with(&format!("{}/author/show/1265.Jane_Austen", server.uri())));

    let dune = records.iter().find(|r| r["title"] == "Dune").unwrap();
    assert_eq!(dune["author"], "Frank Herbert");
    assert_eq!(dune["url"], format!("{}/book/show/1.Dune", server.uri()));
}

#[tokio::test]
async fn test_list_crawl_writes_sqlite() {
    let server = MockServer::start().await;
    mount_book_site(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("books.db");
    let config = create_test_config(&server.uri(), &output_path, "sqlite", "");

    let mut sink = open_sink(&config.output).unwrap();
    run_crawl(
        &config,
        Orchestrator::with_author_crawl(false),
        sink.as_mut(),
        Arc::new(CrawlStats::new()),
    )
    .await
    .unwrap();
    drop(sink);

    let sink = SqliteSink::open(&output_path).unwrap();
    let books: i64 = sink
        .connection()
        .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
        .unwrap();
    let authors: Vec<String> = sink
        .connection()
        .prepare("SELECT name FROM authors")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(books, 3);
    assert_eq!(authors, vec!["Jane Austen".to_string()]);
}

#[tokio::test]
async fn test_max_pages_stops_dispatch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list/show/1.Best"))
        .and(query_param("page", "1"))
        .respond_with(html(r#"<a class="bookTitle" href="/book/show/1.Dune">Dune</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/list/show/1.Best"))
        .and(query_param("page", "2"))
        .respond_with(html(""))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/book/show/1.Dune"))
        .respond_with(book_page("Dune", "/author/show/58", "Frank Herbert"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("records.jsonl");
    let config = create_test_config(&server.uri(), &output_path, "jsonl", "max-pages = 1");

    let mut sink = open_sink(&config.output).unwrap();
    let snapshot = run_crawl(
        &config,
        Orchestrator::with_author_crawl(false),
        sink.as_mut(),
        Arc::new(CrawlStats::new()),
    )
    .await
    .unwrap();

    assert_eq!(snapshot.pages_fetched, 1);
    assert_eq!(snapshot.follow_ups, 1);
    assert!(read_json_lines(&output_path).is_empty());
}

#[tokio::test]
async fn test_author_crawl_terminates_on_cycles() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/author/show/1.Capote"))
        .respond_with(author_page(
            "Truman Capote",
            r#"<a href="/author/show/2.Lee">Harper Lee</a>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/author/show/2.Lee"))
        .respond_with(author_page(
            "Harper Lee",
            r##"<a href="/author/show/1.Capote">Truman Capote</a>
                <a href="/author/show/1.Capote#bio">Truman Capote</a>
                <a href="/author/show/2.Lee/">Harper Lee</a>"##,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let seed = Url::parse(&format!("{}/author/show/1.Capote", server.uri())).unwrap();
    let client = build_http_client(
        &create_test_config(&server.uri(), Path::new("unused.jsonl"), "jsonl", "").user_agent,
    )
    .unwrap();
    let settings = EngineSettings {
        max_concurrent: 4,
        min_delay: Duration::ZERO,
        max_pages: None,
        retry: RetryPolicy {
            max_retries: 0,
            delay: Duration::ZERO,
        },
    };

    let mut sink = JsonLinesSink::new(Vec::new());
    let snapshot = Engine::new(
        client,
        settings,
        Orchestrator::with_author_crawl(true),
        vec![FollowUp::new(seed, ParserRole::Author)],
        Arc::new(CrawlStats::new()),
    )
    .run(&mut sink)
    .await
    .unwrap();

    assert_eq!(snapshot.pages_fetched, 2);
    assert_eq!(snapshot.authors, 2);
    assert_eq!(snapshot.follow_ups, 4);
    assert_eq!(snapshot.duplicates_skipped, 3);
    assert_eq!(sink.written(), 2);

    sink.finish().unwrap();
    let output = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    let names: BTreeSet<String> = output
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap()["name"].to_string())
        .collect();
    assert_eq!(
        names,
        BTreeSet::from(["\"Harper Lee\"".to_string(), "\"Truman Capote\"".to_string()])
    );
}
