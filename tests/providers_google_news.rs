use kasai_news::ingest::providers::google_news::GoogleNewsSource;
use kasai_news::ingest::types::FeedSource;

const FEED_XML: &str = include_str!("fixtures/google_news_rss.xml");

#[tokio::test]
async fn fixture_parses_into_raw_items() {
    let source = GoogleNewsSource::from_fixture("西葛西", FEED_XML);
    assert_eq!(source.name(), "西葛西");

    let items = source.fetch_items().await.expect("fixture parse ok");
    assert_eq!(items.len(), 4);

    let fire = &items[0];
    assert_eq!(
        fire.link.as_deref(),
        Some("https://news.google.com/rss/articles/CBMiAAA1?oc=5")
    );
    assert_eq!(fire.source.as_deref(), Some("葛西タイムズ"));
    assert_eq!(
        fire.published.map(|p| p.to_rfc3339()),
        Some("2024-10-14T07:00:00+00:00".to_string())
    );
    // XML-level escaping is undone; the HTML inside stays as text.
    assert!(fire.summary.as_deref().unwrap_or_default().contains("<a href="));

    // No pubDate / no source element
    assert!(items[2].published.is_none());
    assert!(items[2].source.is_none());

    // No link at all
    assert!(items[3].link.is_none());
}

#[tokio::test]
async fn broken_fixture_is_an_error() {
    let source = GoogleNewsSource::from_fixture("broken", "<rss><channel><item>");
    assert!(source.fetch_items().await.is_err());
}

#[tokio::test]
async fn unresponsive_server_times_out_and_counts_as_failed() {
    use std::io::Read;
    use std::net::TcpListener;
    use std::time::{Duration, Instant};

    use kasai_news::ingest::fetch_all;
    use kasai_news::ingest::providers::google_news::build_client;

    // Accepts connections and never answers.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            let mut s = stream;
            let mut buf = [0u8; 1024];
            let _ = s.read(&mut buf);
            held.push(s);
        }
    });

    let base = format!("http://{addr}/rss");
    let client = build_client(Duration::from_secs(1)).unwrap();
    let source = GoogleNewsSource::from_query(&base, "slow", &[], client.clone()).unwrap();

    let started = Instant::now();
    assert!(source.fetch_items().await.is_err());
    assert!(started.elapsed() < Duration::from_secs(5));

    let sources: Vec<Box<dyn FeedSource>> =
        vec![Box::new(GoogleNewsSource::from_query(&base, "slow", &[], client).unwrap())];
    let (items, failed) = fetch_all(&sources).await;
    assert!(items.is_empty());
    assert_eq!(failed, 1);
}
