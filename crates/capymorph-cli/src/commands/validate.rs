//! The `capymorph validate` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use capymorph_core::audit::audit_batch;
use capymorph_core::sink::read_questions;

pub fn execute(input: PathBuf) -> Result<()> {
    let questions = read_questions(&input)?;

    let mut per_family: BTreeMap<_, usize> = BTreeMap::new();
    for q in &questions {
        *per_family.entry(q.family).or_default() += 1;
    }
    println!("Batch: {} ({} questions)", input.display(), questions.len());
    for (family, count) in &per_family {
        println!("  {family}: {count}");
    }

    let warnings = audit_batch(&questions);
    for w in &warnings {
        let prefix = w
            .question_id
            .map(|id| format!("  [#{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All questions valid.");
        Ok(())
    } else {
        anyhow::bail!("{} warning(s) found in {}", warnings.len(), input.display())
    }
}
