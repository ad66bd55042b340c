//! Integration tests for the command pipelines.

use std::fs;
use std::path::{Path, PathBuf};

use weave_cli::config::{ConfigError, ConfigOverrides, WeaveConfig};
use weave_cli::pipeline::{MergeRequest, run_merge, run_score};
use weave_model::{MergeStatus, SkipReason};
use weave_report::OutputFormat;

const DOCUMENT: &str = "\
# 가전 추천

이번 영상에서 소개한 제품들입니다.

## 노트북
노트북 추천 경량 휴대성

## 청소기
청소기 무선 흡입력

## 커피
커피머신 캡슐 추출
";

const ITEMS: &str = r#"[
    {"id": "A", "title": "경량 노트북 A", "price": "1,350,000원", "url": "/vp/products/a"},
    {"id": "B", "title": "무선 청소기 B", "price": 329000, "url": "/vp/products/b"},
    {"id": "C", "title": "캡슐 커피머신 C", "price": 159000, "url": "/vp/products/c"},
    {"id": "D", "title": "블루투스 스피커 D", "price": 59000, "url": "/vp/products/d"},
    {"id": "E", "title": "가격 없음", "url": "/vp/products/e"}
]"#;

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let document = dir.join("가전_리뷰.md");
    fs::write(&document, DOCUMENT).unwrap();
    let items = dir.join("items.json");
    fs::write(&items, ITEMS).unwrap();
    (document, items)
}

fn config_in(dir: &Path) -> WeaveConfig {
    WeaveConfig::default().with_overrides(&ConfigOverrides {
        base_url: Some("https://www.example.com".to_string()),
        output_dir: Some(dir.join("merged_html")),
        publish_dir: Some(dir.join("posting")),
        ..ConfigOverrides::default()
    })
}

#[test]
fn merge_writes_primary_and_publish_copy() {
    let dir = tempfile::tempdir().unwrap();
    let (document, items) = write_inputs(dir.path());
    let request = MergeRequest {
        document,
        items: vec![items],
        format: OutputFormat::Html,
        dry_run: false,
    };

    let run = run_merge(&request, &config_in(dir.path())).unwrap();

    assert_eq!(run.result.status, MergeStatus::Ready);
    assert_eq!(run.result.stats.assigned, 3);
    assert_eq!(run.result.stats.fallback, 1);
    assert_eq!(run.result.stats.dropped, 1);
    assert!(run.file_name.starts_with("merged_가전_"));
    assert!(run.file_name.ends_with(".html"));

    let outputs = run.outputs.expect("outputs written");
    let publish = outputs.publish.expect("publish copy");
    let html = fs::read_to_string(&outputs.primary).unwrap();
    assert_eq!(fs::read(&outputs.primary).unwrap(), fs::read(publish).unwrap());
    assert!(html.contains("https://www.example.com/vp/products/a"));
    assert!(html.contains("1,350,000원"));
    assert!(html.contains("더 많은 추천 상품"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (document, items) = write_inputs(dir.path());
    let request = MergeRequest {
        document,
        items: vec![items],
        format: OutputFormat::Json,
        dry_run: true,
    };

    let run = run_merge(&request, &config_in(dir.path())).unwrap();

    assert!(run.outputs.is_none());
    assert!(run.file_name.ends_with(".json"));
    assert!(!dir.path().join("merged_html").exists());
}

#[test]
fn empty_pool_is_skipped_without_publish_copy() {
    let dir = tempfile::tempdir().unwrap();
    let (document, _) = write_inputs(dir.path());
    let items = dir.path().join("empty.csv");
    fs::write(&items, "title,price,url\n").unwrap();
    let request = MergeRequest {
        document,
        items: vec![items],
        format: OutputFormat::Html,
        dry_run: false,
    };

    let run = run_merge(&request, &config_in(dir.path())).unwrap();

    assert_eq!(
        run.result.status,
        MergeStatus::Skipped {
            reason: SkipReason::EmptyPool
        }
    );
    let outputs = run.outputs.expect("primary still written");
    assert!(outputs.primary.exists());
    assert!(outputs.publish.is_none());
}

#[test]
fn score_reports_best_sections() {
    let dir = tempfile::tempdir().unwrap();
    let (document, items) = write_inputs(dir.path());

    let (inputs, matrix) = run_score(&document, &[items], &config_in(dir.path())).unwrap();

    assert_eq!(inputs.document.sections.len(), 3);
    assert_eq!(matrix.section_ids.len(), 3);
    let best: Vec<Option<&str>> = matrix
        .rows
        .iter()
        .map(|row| row.best.as_ref().map(|id| id.as_str()))
        .collect();
    assert_eq!(best, vec![Some("s000"), Some("s001"), Some("s002"), None]);
}

#[test]
fn config_file_is_discovered_and_validated() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("weave.toml"),
        "[merge]\ncapacity = 1\n\n[output]\npublish_dir = \"\"\n",
    )
    .unwrap();

    let config = WeaveConfig::discover(None, dir.path()).unwrap();
    assert_eq!(config.merge.capacity, 1);
    assert!(config.output.publish_dir.is_none());

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "[merge]\nfallback_cap = 0\n").unwrap();
    let err = WeaveConfig::discover(Some(&bad), dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));

    let empty = tempfile::tempdir().unwrap();
    assert_eq!(
        WeaveConfig::discover(None, empty.path()).unwrap(),
        WeaveConfig::default()
    );
}
