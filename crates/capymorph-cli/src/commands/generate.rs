//! The `capymorph generate` command.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, Table};

use capymorph_core::batch::{time_seed, Batch, ProgressReporter};
use capymorph_core::config::load_config_from;
use capymorph_core::model::{Category, QuestionDoc, QuestionFamily};
use capymorph_core::sink::{JsonFileSink, MemorySink, OutputFormat, QuestionSink};
use capymorph_core::wordbank::{load_word_bank, resolve_word_bank_path};
use capymorph_core::{BatchGenerator, Lexicon};

/// Console progress reporter.
///
/// Reports each family's first skipped slot only.
#[derive(Default)]
struct ConsoleReporter {
    reported: RefCell<HashSet<QuestionFamily>>,
}

impl ProgressReporter for ConsoleReporter {
    fn on_question(&self, question: &QuestionDoc) {
        tracing::debug!(id = question.id, family = %question.family, "generated question");
    }

    fn on_family_skipped(&self, family: QuestionFamily, reason: &str) {
        if self.reported.borrow_mut().insert(family) {
            eprintln!("  Skipping {family}: {reason}");
        }
    }

    fn on_batch_complete(&self, total: usize, skipped: usize, elapsed: Duration) {
        eprintln!(
            "\nGenerated {total} questions, {skipped} slots skipped ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    wordbank: Option<PathBuf>,
    quota: Option<usize>,
    min_total: Option<usize>,
    top_up: Option<String>,
    seed: Option<u64>,
    output: Option<PathBuf>,
    format: Option<String>,
    dry_run: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;

    // Command-line flags win over the config file
    if let Some(path) = wordbank {
        config.wordbank = Some(path);
    }
    if let Some(q) = quota {
        config.per_family_quota = q;
    }
    if let Some(m) = min_total {
        config.min_total = m;
    }
    if let Some(family) = &top_up {
        config.top_up_family = family
            .parse::<QuestionFamily>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    if let Some(s) = seed {
        config.seed = Some(s);
    }
    if let Some(path) = output {
        config.output = path;
    }
    if let Some(f) = &format {
        config.format = f.parse::<OutputFormat>().map_err(|e| anyhow::anyhow!(e))?;
    }

    let bank_path = resolve_word_bank_path(config.wordbank.as_deref());
    let words = load_word_bank(&bank_path)?;
    let lexicon = Lexicon::new(words);
    eprintln!(
        "Loaded {} words from {} ({} nouns, {} verbs, {} adjectives)",
        lexicon.words().len(),
        bank_path.display(),
        lexicon.partition(Category::Noun).len(),
        lexicon.partition(Category::Verb).len(),
        lexicon.partition(Category::Adjective).len(),
    );

    let seed = config.seed.unwrap_or_else(time_seed);
    let generator = BatchGenerator::new(&lexicon, config.batch_config());
    let reporter = ConsoleReporter::default();
    let batch = generator
        .run(seed, &reporter)
        .with_context(|| format!("generation from {} failed", bank_path.display()))?;

    print_tally_table(&batch);

    let sink: Box<dyn QuestionSink> = if dry_run {
        Box::new(MemorySink::new())
    } else {
        Box::new(JsonFileSink::new(&config.output, config.format))
    };

    let outcome = sink.insert_many(&batch.questions).await?;
    println!("Inserted {} questions", outcome.accepted);
    for rejected in &outcome.rejected {
        eprintln!("  Rejected question {}: {}", rejected.id, rejected.reason);
    }

    if dry_run {
        eprintln!("Dry run: nothing written (seed {seed})");
    } else {
        eprintln!(
            "Output written to {} (run {}, seed {seed})",
            config.output.display(),
            batch.run_id
        );
    }

    Ok(())
}

fn print_tally_table(batch: &Batch) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Family", "Type", "Generated", "Skipped", "Top-up"]);

    for (family, tally) in &batch.tallies {
        table.add_row(vec![
            Cell::new(family),
            Cell::new(family.question_type()),
            Cell::new(tally.generated),
            Cell::new(tally.skipped),
            Cell::new(tally.topped_up),
        ]);
    }

    eprintln!("{table}");
}
