//! The `capymorph init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("capymorph.toml"), SAMPLE_CONFIG)?;
    write_if_missing(Path::new("wordbank.txt"), SAMPLE_WORD_BANK)?;

    println!("\nNext steps:");
    println!("  1. Add words to wordbank.txt (one per line)");
    println!("  2. Run: capymorph generate --seed 42");
    println!("  3. Run: capymorph validate --input capymorph-questions.json");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# capymorph configuration

wordbank = "wordbank.txt"
per_family_quota = 32
min_total = 256
top_up_family = "inflection-vs-derivation"
output = "capymorph-questions.json"
format = "json"
# seed = 42
"#;

const SAMPLE_WORD_BANK: &str = "walk
run
jump
stop
eat
teach
play
carry
drive
happy
calm
busy
kind
dry
cat
fox
bus
dog
child
city
tree
bird
box
";
