use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use psf_cli::commands::{CopyResult, ShowResult};
use psf_filer::VerifyReport;
use psf_model::{InterpretedNode, RawNode};
use psf_xml::checksum::format_checksum;

pub fn print_verify(report: &VerifyReport) {
    println!("File: {}", report.path.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stored"),
        header_cell("Computed"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    let status = if report.is_valid() {
        Cell::new("OK").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new("MISMATCH")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    };
    table.add_row(vec![
        checksum_cell(report.stored),
        Cell::new(format_checksum(report.computed)),
        status,
    ]);
    println!("{table}");
}

pub fn print_show(result: &ShowResult) {
    println!("File: {}", result.path.display());
    println!(
        "Checksum: {}",
        result
            .summary
            .checksum
            .map_or_else(|| "none".to_string(), format_checksum)
    );

    let mut info = Table::new();
    info.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut info);
    for (label, value) in result.registry.file_info().fields() {
        info.add_row(vec![
            Cell::new(label),
            value.map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{info}");

    let mut nodes = Table::new();
    nodes.set_header(vec![
        header_cell("Node"),
        header_cell("Data pools"),
        header_cell("Lists"),
        header_cell("Elements"),
        header_cell("Raw entries"),
        header_cell("Raw bytes"),
    ]);
    apply_table_style(&mut nodes);
    for index in 1..=5 {
        align_column(&mut nodes, index, CellAlignment::Right);
    }
    for node in result.registry.interpreted_nodes() {
        let raw = result.registry.raw_node(&node.name);
        nodes.add_row(node_row(node, raw));
    }
    println!("{nodes}");

    let missing = result.summary.missing.locations();
    if !missing.is_empty() {
        println!("Missing optional content:");
        for location in missing {
            println!("- {location}");
        }
    }
}

pub fn print_copy(result: &CopyResult) {
    println!(
        "Wrote {} ({} nodes, checksum {})",
        result.output.display(),
        result.nodes,
        format_checksum(result.checksum)
    );
}

fn node_row(node: &InterpretedNode, raw: Option<&RawNode>) -> Vec<Cell> {
    let lists: usize = node.data_pools.iter().map(|pool| pool.lists.len()).sum();
    vec![
        Cell::new(&node.name)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(node.data_pools.len()),
        Cell::new(lists),
        Cell::new(node.element_count()),
        raw.map_or_else(|| dim_cell("-"), |raw| Cell::new(raw.entries.len())),
        raw.map_or_else(|| dim_cell("-"), |raw| Cell::new(raw.byte_count())),
    ]
}

fn checksum_cell(value: Option<u16>) -> Cell {
    match value {
        Some(value) => Cell::new(format_checksum(value)),
        None => dim_cell("none"),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
