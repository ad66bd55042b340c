//! Shared markup helpers.

use std::io::Write;

use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

pub fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

pub fn write_classed_text<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    class: &str,
    text: &str,
) -> Result<()> {
    let mut start = BytesStart::new(name);
    start.push_attribute(("class", class));
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

pub fn start_div<W: Write>(writer: &mut Writer<W>, class: &str) -> Result<()> {
    let mut div = BytesStart::new("div");
    div.push_attribute(("class", class));
    writer.write_event(Event::Start(div))?;
    Ok(())
}

pub fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Writes each blank-line separated paragraph of `text` as a `<p>`.
pub fn write_paragraphs<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<()> {
    for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        write_text_element(writer, "p", paragraph)?;
    }
    Ok(())
}

/// Formats a price with thousands separators, followed by `suffix`.
pub fn format_price(price: i64, suffix: &str) -> String {
    let digits = price.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if price < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push_str(suffix);
    grouped
}
