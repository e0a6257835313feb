mod common;

use common::init_tracing;
use lk_news_feed::sources::history_entries_from_listing;
use lk_news_feed::FeedError;
use serde_json::json;

fn file(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "path": format!("data/history/{}", name),
        "type": "file",
        "size": 18342,
        "download_url": format!("https://raw.githubusercontent.com/nuuuwan/lk_news_digest/main/data/history/{}", name),
        "html_url": format!("https://github.com/nuuuwan/lk_news_digest/blob/main/data/history/{}", name)
    })
}

#[test]
fn test_listing_keeps_markdown_files_sorted_by_name() {
    init_tracing();

    let listing = json!([
        file("README.20251026.120000.md"),
        {
            "name": "archive",
            "path": "data/history/archive",
            "type": "dir",
            "download_url": null,
            "html_url": "https://github.com/nuuuwan/lk_news_digest/tree/main/data/history/archive"
        },
        file("notes.txt"),
        file("EDITION-2025-10-03.MD"),
        {
            "name": "pending.md",
            "type": "file",
            "download_url": null,
            "html_url": null
        },
        { "path": "data/history/nameless.md", "type": "file" },
        "not an entry",
        file("README.20251011.082145.md"),
        file("weekly-digest.md")
    ]);

    let entries = history_entries_from_listing(listing).unwrap();
    let names: Vec<_> = entries.iter().map(|entry| entry.name.as_str()).collect();

    assert_eq!(
        names,
        vec![
            "EDITION-2025-10-03.MD",
            "README.20251011.082145.md",
            "README.20251026.120000.md",
            "weekly-digest.md",
        ]
    );
    assert_eq!(
        entries[1].page_url(),
        "https://github.com/nuuuwan/lk_news_digest/blob/main/data/history/README.20251011.082145.md"
    );
}

#[test]
fn test_empty_listing_is_not_an_error() {
    assert!(history_entries_from_listing(json!([])).unwrap().is_empty());
}

#[test]
fn test_non_array_listing_is_rejected() {
    let single_file = file("README.md");
    assert!(matches!(
        history_entries_from_listing(single_file),
        Err(FeedError::Listing(_))
    ));
    assert!(matches!(
        history_entries_from_listing(json!({ "message": "Not Found" })),
        Err(FeedError::Listing(_))
    ));
    assert!(matches!(
        history_entries_from_listing(serde_json::Value::Null),
        Err(FeedError::Listing(_))
    ));
}
