//! Table formatting using comfy-table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};

/// Builds a table with a bold header row.
pub fn table(columns: &[&str], rows: &[Vec<String>]) -> Table {
    let mut table = Table::new();

    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(
        columns
            .iter()
            .map(|col| Cell::new(col).add_attribute(Attribute::Bold)),
    );

    for row in rows {
        table.add_row(row);
    }

    table
}
