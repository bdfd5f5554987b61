//! `shellref search` and the interactive prompt.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use shellref_core::{Catalog, SearchConfig, SearchEngine, SearchMode, SearchRequest};

use super::output;
use super::SearchArgs;

pub fn run_search(catalog: &Catalog, config: &SearchConfig, args: &SearchArgs) -> Result<()> {
    let query = args.query.join(" ");
    let mode = args
        .mode
        .unwrap_or(config.search.default_mode)
        .resolve(&query);

    let request = SearchRequest::new(query, mode)
        .category(&args.category)
        .difficulty(&args.difficulty)
        .favorites_only(args.favorites)
        .sort_by(args.sort.unwrap_or(config.display.default_sort));

    let engine = SearchEngine::with_config(catalog, config);
    let mut results = engine.search(&request, config.favorites.as_slice());
    if let Some(limit) = args.limit {
        results.truncate(limit);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&results).context("Failed to serialize results")?;
        println!("{}", json);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    output::write_results(&mut out, &results, mode, config.display.show_examples)?;
    Ok(())
}

/// What a line typed at the prompt asks for.
#[derive(Debug, PartialEq)]
enum PromptInput<'a> {
    Quit,
    SetMode(SearchMode),
    Query(&'a str),
}

fn parse_prompt_line(line: &str) -> PromptInput<'_> {
    match line.trim() {
        "" | ":q" | ":quit" => PromptInput::Quit,
        ":nl" => PromptInput::SetMode(SearchMode::NaturalLanguage),
        ":lit" => PromptInput::SetMode(SearchMode::Literal),
        query => PromptInput::Query(query),
    }
}

/// One query per line until an empty line or EOF.
pub fn run_interactive(catalog: &Catalog, config: &SearchConfig) -> Result<()> {
    let engine = SearchEngine::with_config(catalog, config);
    let mut pinned: Option<SearchMode> = None;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(
        out,
        "{} commands loaded. :nl / :lit switch mode, empty line quits.",
        catalog.len()
    )?;

    let mut lines = stdin.lock().lines();
    loop {
        write!(out, "shellref> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line.context("Failed to read input")?;

        match parse_prompt_line(&line) {
            PromptInput::Quit => break,
            PromptInput::SetMode(mode) => {
                pinned = Some(mode);
                writeln!(out, "mode: {}", mode)?;
            }
            PromptInput::Query(query) => {
                let mode = pinned.unwrap_or_else(|| config.search.default_mode.resolve(query));
                let request = SearchRequest::new(query, mode).sort_by(config.display.default_sort);
                let results = engine.search(&request, config.favorites.as_slice());
                output::write_results(&mut out, &results, mode, config.display.show_examples)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_commands() {
        assert_eq!(parse_prompt_line(""), PromptInput::Quit);
        assert_eq!(parse_prompt_line("   "), PromptInput::Quit);
        assert_eq!(parse_prompt_line(":nl"), PromptInput::SetMode(SearchMode::NaturalLanguage));
        assert_eq!(parse_prompt_line(" :lit "), PromptInput::SetMode(SearchMode::Literal));
        assert_eq!(parse_prompt_line(" grep "), PromptInput::Query("grep"));
    }
}
