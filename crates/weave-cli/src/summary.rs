use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use weave_cli::pipeline::{LoadedInputs, MergeRun};
use weave_map::ScoreMatrix;
use weave_model::{BlockKind, MergeStatus, SectionId};

pub fn print_merge_summary(run: &MergeRun) {
    let result = &run.result;
    let stats = &result.stats;
    println!("Document: {}", display_title(run.document.title.as_deref()));
    match &run.outputs {
        Some(outputs) => {
            println!("Output: {}", outputs.primary.display());
            if let Some(path) = &outputs.publish {
                println!("Publish copy: {}", path.display());
            }
        }
        None => println!("Output: {} (dry run, not written)", run.file_name),
    }

    let mut related: BTreeMap<&SectionId, usize> = BTreeMap::new();
    let mut trailing: Option<(&'static str, usize)> = None;
    for block in result.document.blocks() {
        match &block.kind {
            BlockKind::Related { section_id } => {
                *related.entry(section_id).or_default() += block.items.len();
            }
            BlockKind::Fallback => trailing = Some(("Fallback", block.items.len())),
            BlockKind::Standalone => trailing = Some(("Standalone", block.items.len())),
        }
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Section"),
        header_cell("Heading"),
        header_cell("Items"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for section in result.document.sections() {
        let count = related.get(&section.id).copied().unwrap_or(0);
        table.add_row(vec![
            Cell::new(section.id.as_str()),
            Cell::new(display_heading(&section.heading_text)),
            count_cell(count, Color::Green),
        ]);
    }
    if let Some((label, count)) = trailing {
        table.add_row(vec![
            Cell::new(label).fg(Color::Yellow),
            dim_cell("-"),
            count_cell(count, Color::Yellow),
        ]);
    }
    if stats.withheld > 0 {
        table.add_row(vec![
            Cell::new("Withheld").fg(Color::Yellow),
            dim_cell("over display cap"),
            count_cell(stats.withheld, Color::Yellow),
        ]);
    }
    if stats.dropped > 0 {
        table.add_row(vec![
            Cell::new("Dropped").fg(Color::Red),
            dim_cell("rejected records"),
            count_cell(stats.dropped, Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} redistributed", stats.redistributed)).fg(Color::Cyan),
        Cell::new(stats.items).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_rejected_table(run);

    match result.status {
        MergeStatus::Ready => println!("Status: ready"),
        MergeStatus::Skipped { reason } => eprintln!("Status: skipped ({})", reason.description()),
    }
}

fn print_rejected_table(run: &MergeRun) {
    if run.pool.rejected.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Record"),
        header_cell("Reason"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for record in &run.pool.rejected {
        table.add_row(vec![
            Cell::new(record.source.display()),
            Cell::new(record.index),
            Cell::new(&record.reason).fg(Color::Red),
        ]);
    }
    println!();
    println!("Rejected records:");
    println!("{table}");
}

pub fn print_score_matrix(inputs: &LoadedInputs, matrix: &ScoreMatrix) {
    let mut header = vec![header_cell("Item"), header_cell("Title")];
    header.extend(matrix.section_ids.iter().map(|id| header_cell(id.as_str())));
    header.push(header_cell("Best"));

    let mut table = Table::new();
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 0..matrix.section_ids.len() {
        align_column(&mut table, index + 2, CellAlignment::Right);
    }
    for row in &matrix.rows {
        let mut cells = vec![Cell::new(row.item_id.as_str()), Cell::new(&row.title)];
        cells.extend(row.scores.iter().map(|score| score_cell(*score)));
        cells.push(match &row.best {
            Some(section_id) => Cell::new(section_id.as_str())
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            None => dim_cell("-"),
        });
        table.add_row(cells);
    }
    println!("{table}");

    if !inputs.document.sections.is_empty() {
        let mut legend = Table::new();
        legend.set_header(vec![header_cell("Section"), header_cell("Heading")]);
        apply_table_style(&mut legend);
        for section in inputs.document.ordered_sections() {
            legend.add_row(vec![
                Cell::new(section.id.as_str()),
                Cell::new(display_heading(&section.heading_text)),
            ]);
        }
        println!("{legend}");
    }
}

fn display_title(title: Option<&str>) -> &str {
    title.unwrap_or("(untitled)")
}

fn display_heading(heading: &str) -> &str {
    if heading.is_empty() { "(no heading)" } else { heading }
}

fn score_cell(score: f64) -> Cell {
    if score > 0.0 {
        Cell::new(format!("{score:.2}"))
    } else {
        dim_cell("0")
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
