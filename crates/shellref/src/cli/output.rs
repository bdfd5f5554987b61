//! Plain-text rendering of search results and command details.

use std::io::{self, Write};

use shellref_core::{CommandRecord, SearchMode};

pub fn write_results<W: Write>(
    out: &mut W,
    results: &[&CommandRecord],
    mode: SearchMode,
    show_examples: bool,
) -> io::Result<()> {
    if results.is_empty() {
        writeln!(out, "No commands found ({} search).", mode)?;
        return Ok(());
    }

    for record in results {
        writeln!(
            out,
            "{:<14} {:<12} {}",
            record.name,
            record.category.as_str(),
            record.description
        )?;
        if show_examples {
            if let Some(example) = record.examples.first() {
                writeln!(out, "    $ {}", example.invocation)?;
            }
        }
    }
    writeln!(out, "{} result(s), {} search", results.len(), mode)
}

pub fn write_record<W: Write>(
    out: &mut W,
    record: &CommandRecord,
    related: &[&CommandRecord],
) -> io::Result<()> {
    writeln!(out, "{} - {}", record.name, record.description)?;
    writeln!(
        out,
        "category: {}  difficulty: {}  updated: {}",
        record.category.label(),
        record.difficulty,
        record.last_updated
    )?;
    if !record.usage.is_empty() {
        writeln!(out, "\nUsage:\n    {}", record.usage)?;
    }

    if !record.examples.is_empty() {
        writeln!(out, "\nExamples:")?;
        for example in &record.examples {
            writeln!(out, "    $ {}", example.invocation)?;
            writeln!(out, "      {}", example.short_description)?;
            if let Some(explanation) = &example.explanation {
                writeln!(out, "      {}", explanation)?;
            }
            if let Some(output) = &example.sample_output {
                for line in output.lines() {
                    writeln!(out, "      > {}", line)?;
                }
            }
        }
    }

    if !record.flags.is_empty() {
        writeln!(out, "\nFlags:")?;
        for flag in &record.flags {
            let deprecated = if flag.deprecated { " (deprecated)" } else { "" };
            writeln!(out, "    {:<18} {}{}", flag.token, flag.description, deprecated)?;
        }
    }

    if !record.tags.is_empty() {
        writeln!(out, "\nTags: {}", record.tags.join(", "))?;
    }

    if !related.is_empty() {
        let names: Vec<&str> = related.iter().map(|r| r.name.as_str()).collect();
        writeln!(out, "Related: {}", names.join(", "))?;
    }

    Ok(())
}
