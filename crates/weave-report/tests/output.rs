//! Integration tests for output writing.

use std::fs;

use weave_merge::MergePipeline;
use weave_model::{Document, Item, ItemId, MergeOptions, MergeResult};
use weave_report::{OutputFormat, OutputOptions, RenderOptions, render, write_outputs};

fn merged(items: &[Item]) -> MergeResult {
    let document = Document::from_pairs(
        Some("Coffee corner".to_string()),
        [("Grinders", "burr coffee grinder"), ("Kettles", "gooseneck kettle")],
    );
    MergePipeline::new(MergeOptions::default())
        .unwrap()
        .run(&document, items, 0)
        .unwrap()
}

fn pool() -> Vec<Item> {
    vec![
        Item::new(
            ItemId::new("g1").unwrap(),
            "burr grinder",
            89_000,
            "https://shop.test/g1",
            "g1.jpg",
        ),
        Item::new(
            ItemId::new("k1").unwrap(),
            "gooseneck kettle",
            45_000,
            "https://shop.test/k1",
            "",
        ),
    ]
}

#[test]
fn ready_result_gets_byte_identical_publish_copy() {
    let dir = tempfile::tempdir().unwrap();
    let options = OutputOptions::new(dir.path().join("merged_html"))
        .with_publish_dir(dir.path().join("posting"));
    let result = merged(&pool());
    assert!(result.is_ready());
    let rendered = render(&result, OutputFormat::Html, &RenderOptions::default()).unwrap();

    let written = write_outputs(&result, &rendered, "merged_coffee_20260101_000000.html", &options)
        .unwrap();

    let publish = written.publish.expect("publish copy");
    let primary_bytes = fs::read(&written.primary).unwrap();
    assert_eq!(primary_bytes, fs::read(&publish).unwrap());
    assert_eq!(primary_bytes, rendered.as_bytes());
    assert!(rendered.contains("89,000원"));
}

#[test]
fn skipped_result_writes_primary_only() {
    let dir = tempfile::tempdir().unwrap();
    let options = OutputOptions::new(dir.path().join("out"))
        .with_publish_dir(dir.path().join("posting"))
        .with_format(OutputFormat::Json);
    let result = merged(&[]);
    assert!(!result.is_ready());
    let rendered = render(&result, options.format, &RenderOptions::default()).unwrap();

    let written = write_outputs(&result, &rendered, "merged_coffee.json", &options).unwrap();

    assert!(written.primary.exists());
    assert!(written.publish.is_none());
    assert!(!dir.path().join("posting").exists());
}
