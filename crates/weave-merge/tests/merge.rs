use proptest::prelude::*;
use weave_merge::MergePipeline;
use weave_model::{
    BlockKind, Document, Item, ItemId, MergeError, MergeOptions, MergeStatus, Node, SectionId,
    SkipReason,
};

fn item(id: &str, title: &str) -> Item {
    Item::new(
        ItemId::new(id).unwrap(),
        title,
        25_000,
        format!("https://shop.example.com/{id}"),
        format!("images/{id}.jpg"),
    )
}

fn gadget_document() -> Document {
    Document::from_pairs(
        Some("가전 추천".to_string()),
        [
            ("노트북", "노트북 추천 경량 휴대성"),
            ("청소기", "청소기 무선 흡입력"),
            ("커피", "커피머신 캡슐 추출"),
        ],
    )
}

fn gadget_items() -> Vec<Item> {
    vec![
        item("A", "경량 노트북 A"),
        item("B", "무선 청소기 B"),
        item("C", "캡슐 커피머신 C"),
        item("D", "블루투스 스피커 D"),
    ]
}

fn node_labels(nodes: &[Node]) -> Vec<String> {
    nodes
        .iter()
        .map(|node| match node {
            Node::Section(section) => format!("section:{}", section.id),
            Node::ItemBlock(block) => {
                let ids: Vec<&str> = block.items.iter().map(|i| i.id.as_str()).collect();
                let kind = match &block.kind {
                    BlockKind::Related { section_id } => format!("related({section_id})"),
                    BlockKind::Fallback => "fallback".to_string(),
                    BlockKind::Standalone => "standalone".to_string(),
                };
                format!("{kind}:{}", ids.join(","))
            }
        })
        .collect()
}

#[test]
fn blocks_follow_their_sections_and_fallback_trails() {
    let pipeline = MergePipeline::new(MergeOptions::default()).unwrap();
    let result = pipeline.run(&gadget_document(), &gadget_items(), 0).unwrap();

    assert_eq!(
        node_labels(&result.document.nodes),
        vec![
            "section:s000",
            "related(s000):A",
            "section:s001",
            "related(s001):B",
            "section:s002",
            "related(s002):C",
            "fallback:D",
        ]
    );
    assert_eq!(result.status, MergeStatus::Ready);
    assert_eq!(result.stats.assigned, 3);
    assert_eq!(result.stats.fallback, 1);
    assert_eq!(result.document.title.as_deref(), Some("가전 추천"));
}

#[test]
fn unstructured_document_gets_one_capped_standalone_block() {
    let document = Document::unstructured(None, "no headings here, just prose");
    let items: Vec<Item> = (0..11)
        .map(|i| item(&format!("p{i}"), "desk lamp"))
        .collect();
    let pipeline = MergePipeline::new(MergeOptions::default()).unwrap();

    let result = pipeline.run(&document, &items, 2).unwrap();

    let blocks: Vec<_> = result.document.blocks().collect();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind, BlockKind::Standalone);
    assert_eq!(blocks[0].items.len(), 8);
    assert_eq!(result.document.withheld.len(), 3);
    assert_eq!(result.document.preamble, "no headings here, just prose");
    assert_eq!(result.stats.withheld, 3);
    assert_eq!(result.stats.dropped, 2);
    assert!(result.is_ready());
}

#[test]
fn empty_pool_leaves_document_unchanged_and_skips_publish() {
    let document = gadget_document();
    let pipeline = MergePipeline::new(MergeOptions::default()).unwrap();

    let result = pipeline.run(&document, &[], 0).unwrap();

    assert_eq!(result.document.blocks().count(), 0);
    let sections: Vec<_> = result.document.sections().cloned().collect();
    assert_eq!(sections, document.sections);
    assert_eq!(
        result.status,
        MergeStatus::Skipped {
            reason: SkipReason::EmptyPool
        }
    );
}

#[test]
fn input_document_is_not_modified() {
    let document = gadget_document();
    let before = document.clone();
    let pipeline = MergePipeline::new(MergeOptions::default()).unwrap();
    let _ = pipeline.run(&document, &gadget_items(), 0).unwrap();
    assert_eq!(document, before);
}

#[test]
fn merging_twice_is_identical() {
    let pipeline = MergePipeline::new(MergeOptions::default()).unwrap();
    let first = pipeline.run(&gadget_document(), &gadget_items(), 0).unwrap();
    let second = pipeline.run(&gadget_document(), &gadget_items(), 0).unwrap();
    assert_eq!(
        serde_json::to_string(&first.document).unwrap(),
        serde_json::to_string(&second.document).unwrap()
    );
}

#[test]
fn redistributed_items_are_counted() {
    let document = Document::from_pairs(
        None,
        [("grinder", "coffee grinder espresso"), ("bags", "travel backpack")],
    );
    let items = vec![
        item("a", "espresso coffee grinder"),
        item("b", "coffee grinder"),
        item("c", "coffee scale"),
    ];
    let pipeline = MergePipeline::new(MergeOptions::default()).unwrap();
    let result = pipeline.run(&document, &items, 0).unwrap();

    assert_eq!(result.stats.redistributed, 1);
    let related_to_bags = result.document.blocks().find(|block| {
        block.kind
            == BlockKind::Related {
                section_id: SectionId::from_ordinal(1),
            }
    });
    assert_eq!(related_to_bags.unwrap().items[0].id.as_str(), "c");
}

#[test]
fn duplicate_pool_ids_are_rejected_before_assignment() {
    let document = Document::from_pairs(
        None,
        [("kitchen", "electric kettle"), ("breakfast", "toaster bread")],
    );
    let items = vec![item("x", "electric kettle"), item("x", "toaster")];
    let pipeline = MergePipeline::new(MergeOptions::default()).unwrap();

    let err = pipeline.run(&document, &items, 0).unwrap_err();

    assert_eq!(err, MergeError::DuplicateItem(ItemId::new("x").unwrap()));
}

const WORDS: &[&str] = &["lamp", "desk", "chair", "mug", "tea", "kettle", "의자", "책상"];

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..4).prop_map(|w| w.join(" "))
}

proptest! {
    #[test]
    fn merged_document_accounts_for_every_item(
        section_texts in prop::collection::vec(text(), 0..5),
        titles in prop::collection::vec(text(), 0..20),
        capacity in 1usize..4,
        fallback_cap in 1usize..10,
    ) {
        let document = Document::from_pairs(
            None,
            section_texts.iter().map(|text| ("", text.clone())),
        );
        let items: Vec<Item> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                Item::new(ItemId::from_index(i), title.clone(), 1, "https://example.com", "")
            })
            .collect();
        let options = MergeOptions::new()
            .with_capacity(capacity)
            .with_fallback_cap(fallback_cap);
        let result = MergePipeline::new(options).unwrap().run(&document, &items, 0).unwrap();

        let mut ids: Vec<String> = result
            .document
            .item_ids()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        prop_assert_eq!(ids.len(), items.len());
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), items.len());

        // Sections keep document order and no related block exceeds capacity.
        let ordinals: Vec<usize> = result.document.sections().map(|s| s.ordinal).collect();
        prop_assert!(ordinals.windows(2).all(|pair| pair[0] < pair[1]));
        let mut previous_section: Option<SectionId> = None;
        for node in &result.document.nodes {
            match node {
                Node::Section(section) => previous_section = Some(section.id.clone()),
                Node::ItemBlock(block) => {
                    if let BlockKind::Related { section_id } = &block.kind {
                        prop_assert_eq!(Some(section_id), previous_section.as_ref());
                        prop_assert!(block.items.len() <= capacity);
                    }
                }
            }
        }
    }
}
