//! HTML rendering of a merged document.

use std::io::Write;

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesStart, BytesText, Event};
use serde::Deserialize;

use weave_model::{BlockKind, Item, ItemBlock, MergedDocument, Node, Section};

use crate::common::{
    end, format_price, start_div, write_classed_text, write_paragraphs, write_text_element,
};

pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x300?text=No+Image";

const STYLE: &str = r"
body { font-family: sans-serif; line-height: 1.6; color: #333; margin: 0; }
.container { max-width: 960px; margin: 0 auto; padding: 20px; }
.section { margin: 24px 0; }
.product-section { margin: 20px 0; padding: 12px; background-color: #f9f9f9; border-radius: 8px; border-left: 4px solid #007bff; }
.product-section h3 { margin-top: 0; font-size: 16px; }
.product-grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 12px; }
.product-card { background: #fff; border: 1px solid #eee; border-radius: 6px; overflow: hidden; }
.product-image { width: 100%; height: 120px; text-align: center; overflow: hidden; border-bottom: 1px solid #eee; }
.product-image img { width: 100%; height: 100%; object-fit: contain; }
.product-info { padding: 10px; }
.product-title { font-size: 13px; margin: 0 0 8px 0; max-height: 2.6em; overflow: hidden; }
.product-price { font-size: 14px; font-weight: bold; color: #e44d26; margin: 0 0 8px 0; }
.product-link { display: inline-block; padding: 6px 12px; background-color: #007bff; color: white; text-decoration: none; border-radius: 4px; font-size: 12px; }
.affiliate-disclosure { margin-top: 40px; padding-top: 20px; border-top: 1px solid #eee; color: #888; font-size: 0.9em; text-align: center; }
@media (max-width: 768px) { .product-grid { grid-template-columns: repeat(2, 1fr); } }
@media (max-width: 480px) { .product-grid { grid-template-columns: 1fr; } }
";

/// Labels and presentation settings for rendered pages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Appended to formatted prices.
    pub price_suffix: String,
    /// Heading of a block that follows its section.
    pub related_heading: String,
    /// Heading of the trailing block of unmatched items.
    pub fallback_heading: String,
    /// Heading of the only block of a document without sections.
    pub standalone_heading: String,
    /// Image used for items without an image reference.
    pub placeholder_image: String,
    /// Text of the per-card link.
    pub link_label: String,
    /// Footer paragraph. Omitted when empty.
    pub disclosure: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            price_suffix: "원".to_string(),
            related_heading: "이 섹션 관련 추천 상품".to_string(),
            fallback_heading: "더 많은 추천 상품".to_string(),
            standalone_heading: "추천 상품".to_string(),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            link_label: "상품 보기".to_string(),
            disclosure: "이 포스팅은 쿠팡 파트너스 활동의 일환으로, 이에 따른 일정액의 수수료를 제공받습니다."
                .to_string(),
        }
    }
}

impl RenderOptions {
    fn heading_for(&self, kind: &BlockKind) -> &str {
        match kind {
            BlockKind::Related { .. } => &self.related_heading,
            BlockKind::Fallback => &self.fallback_heading,
            BlockKind::Standalone => &self.standalone_heading,
        }
    }
}

/// Renders a complete HTML page for `merged`.
pub fn render_html(merged: &MergedDocument, options: &RenderOptions) -> Result<String> {
    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);

    xml.write_event(Event::DocType(BytesText::from_escaped("html")))?;
    let mut html = BytesStart::new("html");
    html.push_attribute(("lang", "ko"));
    xml.write_event(Event::Start(html))?;

    xml.write_event(Event::Start(BytesStart::new("head")))?;
    let mut charset = BytesStart::new("meta");
    charset.push_attribute(("charset", "UTF-8"));
    xml.write_event(Event::Empty(charset))?;
    let mut viewport = BytesStart::new("meta");
    viewport.push_attribute(("name", "viewport"));
    viewport.push_attribute(("content", "width=device-width, initial-scale=1.0"));
    xml.write_event(Event::Empty(viewport))?;
    if let Some(title) = &merged.title {
        write_text_element(&mut xml, "title", title)?;
    }
    xml.write_event(Event::Start(BytesStart::new("style")))?;
    xml.write_event(Event::Text(BytesText::from_escaped(STYLE)))?;
    end(&mut xml, "style")?;
    end(&mut xml, "head")?;

    xml.write_event(Event::Start(BytesStart::new("body")))?;
    start_div(&mut xml, "container")?;
    if let Some(title) = &merged.title {
        write_text_element(&mut xml, "h1", title)?;
    }
    write_paragraphs(&mut xml, &merged.preamble)?;

    for node in &merged.nodes {
        match node {
            Node::Section(section) => write_section(&mut xml, section)?,
            Node::ItemBlock(block) => write_block(&mut xml, block, options)?,
        }
    }

    if !options.disclosure.trim().is_empty() {
        start_div(&mut xml, "affiliate-disclosure")?;
        write_text_element(&mut xml, "p", &options.disclosure)?;
        end(&mut xml, "div")?;
    }
    end(&mut xml, "div")?;
    end(&mut xml, "body")?;
    end(&mut xml, "html")?;

    let mut bytes = xml.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).context("rendered page is not valid UTF-8")
}

fn write_section<W: Write>(xml: &mut Writer<W>, section: &Section) -> Result<()> {
    let mut div = BytesStart::new("div");
    div.push_attribute(("class", "section"));
    div.push_attribute(("id", section.id.as_str()));
    xml.write_event(Event::Start(div))?;
    if !section.heading_text.is_empty() {
        write_text_element(xml, "h2", &section.heading_text)?;
    }
    write_paragraphs(xml, &section.body_text)?;
    end(xml, "div")
}

fn write_block<W: Write>(xml: &mut Writer<W>, block: &ItemBlock, options: &RenderOptions) -> Result<()> {
    if block.items.is_empty() {
        return Ok(());
    }
    let heading = options.heading_for(&block.kind);
    let mut div = BytesStart::new("div");
    match &block.kind {
        BlockKind::Related { section_id } => {
            div.push_attribute(("class", "section product-section"));
            div.push_attribute(("data-section", section_id.as_str()));
        }
        BlockKind::Fallback => div.push_attribute(("class", "section product-section")),
        BlockKind::Standalone => div.push_attribute(("class", "section")),
    }
    xml.write_event(Event::Start(div))?;
    let heading_tag = match block.kind {
        BlockKind::Standalone => "h2",
        BlockKind::Related { .. } | BlockKind::Fallback => "h3",
    };
    write_text_element(xml, heading_tag, heading)?;
    start_div(xml, "product-grid")?;
    for item in &block.items {
        write_card(xml, item, options)?;
    }
    end(xml, "div")?;
    end(xml, "div")
}

pub(crate) fn write_card<W: Write>(
    xml: &mut Writer<W>,
    item: &Item,
    options: &RenderOptions,
) -> Result<()> {
    let image = if item.image_ref.trim().is_empty() {
        options.placeholder_image.as_str()
    } else {
        item.image_ref.as_str()
    };
    let price = format_price(item.price, &options.price_suffix);

    let mut card = BytesStart::new("div");
    card.push_attribute(("class", "product-card"));
    card.push_attribute(("data-item", item.id.as_str()));
    xml.write_event(Event::Start(card))?;

    start_div(xml, "product-image")?;
    let mut image_link = BytesStart::new("a");
    image_link.push_attribute(("href", item.url.as_str()));
    image_link.push_attribute(("target", "_blank"));
    xml.write_event(Event::Start(image_link))?;
    let mut img = BytesStart::new("img");
    img.push_attribute(("src", image));
    img.push_attribute(("alt", item.title.as_str()));
    img.push_attribute(("loading", "lazy"));
    xml.write_event(Event::Empty(img))?;
    end(xml, "a")?;
    end(xml, "div")?;

    start_div(xml, "product-info")?;
    write_classed_text(xml, "h3", "product-title", &item.title)?;
    write_classed_text(xml, "div", "product-price", &price)?;
    let mut link = BytesStart::new("a");
    link.push_attribute(("href", item.url.as_str()));
    link.push_attribute(("class", "product-link"));
    link.push_attribute(("target", "_blank"));
    xml.write_event(Event::Start(link))?;
    xml.write_event(Event::Text(BytesText::new(&options.link_label)))?;
    end(xml, "a")?;
    end(xml, "div")?;

    end(xml, "div")
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_model::{Document, ItemId, SectionId};

    fn item(id: &str, title: &str, price: i64, image: &str) -> Item {
        Item::new(
            ItemId::new(id).unwrap(),
            title,
            price,
            format!("https://shop.example.com/{id}"),
            image,
        )
    }

    fn card_html(item: &Item) -> String {
        let mut xml = Writer::new(Vec::new());
        write_card(&mut xml, item, &RenderOptions::default()).unwrap();
        String::from_utf8(xml.into_inner()).unwrap()
    }

    #[test]
    fn card_uses_placeholder_when_image_missing() {
        let html = card_html(&item("A", "경량 노트북", 1_350_000, ""));
        insta::assert_snapshot!(html, @r#"<div class="product-card" data-item="A"><div class="product-image"><a href="https://shop.example.com/A" target="_blank"><img src="https://via.placeholder.com/300x300?text=No+Image" alt="경량 노트북" loading="lazy"/></a></div><div class="product-info"><h3 class="product-title">경량 노트북</h3><div class="product-price">1,350,000원</div><a href="https://shop.example.com/A" class="product-link" target="_blank">상품 보기</a></div></div>"#);
    }

    #[test]
    fn card_escapes_markup_in_titles() {
        let html = card_html(&item("B", "<b>Mug</b> & Saucer", 9_900, "mug.jpg"));
        assert!(html.contains("&lt;b&gt;Mug&lt;/b&gt; &amp; Saucer"));
        assert!(html.contains(r#"src="mug.jpg""#));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn page_keeps_node_order_and_headings() {
        let document = Document::from_pairs(
            Some("가전 추천".to_string()),
            [("노트북", "경량 노트북 추천"), ("청소기", "무선 청소기")],
        );
        let sections = document.sections.clone();
        let merged = MergedDocument {
            title: document.title.clone(),
            preamble: "영상 요약".to_string(),
            nodes: vec![
                Node::Section(sections[0].clone()),
                Node::ItemBlock(ItemBlock {
                    kind: BlockKind::Related {
                        section_id: SectionId::from_ordinal(0),
                    },
                    items: vec![item("A", "경량 노트북 A", 990_000, "a.jpg")],
                }),
                Node::Section(sections[1].clone()),
                Node::ItemBlock(ItemBlock {
                    kind: BlockKind::Fallback,
                    items: vec![item("D", "블루투스 스피커 D", 59_000, "")],
                }),
            ],
            withheld: Vec::new(),
        };

        let html = render_html(&merged, &RenderOptions::default()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        let order = [
            "<title>가전 추천</title>",
            "<h1>가전 추천</h1>",
            "<p>영상 요약</p>",
            "<h2>노트북</h2>",
            "data-section=\"s000\"",
            "<h3>이 섹션 관련 추천 상품</h3>",
            "990,000원",
            "<h2>청소기</h2>",
            "<h3>더 많은 추천 상품</h3>",
            "59,000원",
            "class=\"affiliate-disclosure\"",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|needle| html.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn standalone_block_and_empty_disclosure() {
        let merged = MergedDocument {
            title: None,
            preamble: "no headings".to_string(),
            nodes: vec![Node::ItemBlock(ItemBlock {
                kind: BlockKind::Standalone,
                items: vec![item("A", "lamp", 12_000, "")],
            })],
            withheld: Vec::new(),
        };
        let options = RenderOptions {
            disclosure: String::new(),
            price_suffix: " KRW".to_string(),
            ..RenderOptions::default()
        };

        let html = render_html(&merged, &options).unwrap();

        assert!(html.contains("<h2>추천 상품</h2>"));
        assert!(html.contains("12,000 KRW"));
        assert!(!html.contains("<title>"));
        assert!(!html.contains("class=\"affiliate-disclosure\""));
    }
}
