//! The `capymorph families` command.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Table};

use capymorph_core::QuestionFamily;

pub fn execute() -> Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Family", "Type", "Difficulty", "Description"]);

    for family in QuestionFamily::ALL {
        table.add_row(vec![
            Cell::new(family),
            Cell::new(family.question_type()),
            Cell::new(family.difficulty()),
            Cell::new(family.description()),
        ]);
    }

    println!("{table}");
    Ok(())
}
