// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sieve::binary::{Container, SectionOffsets, SieveFooter, SieveHeader, VERSION};
use sieve::{SearchOptions, SearchResult, Searcher};

mod cli;
use cli::display::{
    format_size, pad_left, pad_right, row, savings, score_value, section_bot, section_mid,
    section_top, styled, tier_label, BOLD, DIM, GREEN, RED,
};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Inspect { file } => inspect(&file),
        Commands::Search {
            file,
            query,
            limit,
            no_fuzzy,
            no_prefix,
            json,
        } => {
            let options = SearchOptions {
                fuzzy: !no_fuzzy,
                prefix: !no_prefix,
                ..SearchOptions::default()
            }
            .with_limit(limit);
            search(&file, &query, &options, json)
        }
        Commands::Split {
            file,
            index,
            module,
        } => split(&file, &index, &module),
    }
}

/// Logs go to stderr so `search --json` stays machine-readable.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "sieve=debug",
        _ => "sieve=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

// ============================================================================
// INSPECT
// ============================================================================

fn inspect(path: &Path) -> Result<()> {
    let bytes = read_file(path)?;
    let header = SieveHeader::read(&bytes)
        .with_context(|| format!("{} is not a .sieve file", path.display()))?;
    let offsets = header.section_offsets();

    let crc_status = match SieveFooter::read(&bytes) {
        Ok(footer) => {
            let end = offsets.content_size().min(bytes.len().saturating_sub(SieveFooter::SIZE));
            if footer.crc32 == SieveFooter::compute_crc32(&bytes[..end]) {
                styled(&[GREEN], &format!("{:#010x} ok", footer.crc32))
            } else {
                styled(&[RED], &format!("{:#010x} mismatch", footer.crc32))
            }
        }
        Err(e) => styled(&[RED], &e.to_string()),
    };

    println!();
    section_top("SIEVE FILE");
    row(&format!("  File:        {}", path.display()));
    row(&format!("  Size:        {}", format_size(bytes.len())));
    row(&format!("  Version:     {} (current {})", header.version, VERSION));
    row(&format!("  Documents:   {}", header.doc_count));
    row(&format!("  Terms:       {}", header.term_count));
    row(&format!(
        "  Skip lists:  {}",
        if header.flags.has_skip_lists() { "yes" } else { "no" }
    ));
    row(&format!("  CRC32:       {}", crc_status));

    section_mid("SECTIONS");
    row(&styled(
        &[DIM],
        &format!(
            "  {}{}{}{}{}",
            pad_right("SECTION", 16),
            pad_left("OFFSET", 10),
            pad_left("RAW", 12),
            pad_left("BROTLI", 12),
            pad_left("SAVED", 8)
        ),
    ));
    let mut raw_total = 0;
    let mut compressed_total = 0;
    for (name, (start, end)) in offsets.named() {
        let raw = SectionOffsets::slice(&bytes, (start, end), name).unwrap_or(&[]);
        let compressed = brotli_size(raw)?;
        raw_total += raw.len();
        compressed_total += compressed;
        row(&format!(
            "  {}{}{}{}  {}",
            pad_right(name, 16),
            pad_left(&format!("0x{:06X}", start), 10),
            pad_left(&format_size(end - start), 12),
            pad_left(&format_size(compressed), 12),
            savings(raw.len(), compressed)
        ));
    }
    row(&format!(
        "  {}{}{}{}  {}",
        pad_right(&styled(&[BOLD], "total"), 16),
        pad_left("", 10),
        pad_left(&format_size(raw_total), 12),
        pad_left(&format_size(compressed_total), 12),
        savings(raw_total, compressed_total)
    ));

    section_mid("INDEX");
    match Searcher::from_bytes(&bytes) {
        Ok(searcher) => {
            row(&format!("  Vocabulary:  {} terms", searcher.vocab_size()));
            row(&format!("  Suffixes:    {}", searcher.suffix_index().len()));
            row(&format!("  Sections:    {}", searcher.section_table().len()));
            let fuzzy = searcher.fuzzy_config();
            row(&format!(
                "  Fuzzy:       queries {}..={} chars, thresholds {:?}",
                fuzzy.min_query_len, fuzzy.max_query_len, fuzzy.thresholds
            ));
            for dfa in searcher.fuzzy_matcher().automata() {
                row(&format!(
                    "  Automaton:   k={} {} states",
                    dfa.max_distance(),
                    dfa.state_count()
                ));
            }
        }
        Err(e) => row(&styled(&[RED], &format!("  {}", e))),
    }
    section_bot();
    println!();
    Ok(())
}

fn brotli_size(data: &[u8]) -> Result<usize> {
    let mut compressed = Vec::new();
    {
        let mut encoder = brotli::CompressorWriter::new(&mut compressed, 4096, 11, 22);
        encoder.write_all(data).context("brotli compression failed")?;
    }
    Ok(compressed.len())
}

// ============================================================================
// SEARCH
// ============================================================================

fn search(path: &Path, query: &str, options: &SearchOptions, json: bool) -> Result<()> {
    let bytes = read_file(path)?;
    let searcher = Searcher::from_bytes(&bytes)
        .with_context(|| format!("failed to load {}", path.display()))?;
    let results = searcher.search_with(query, options);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }
    print_results(&searcher, query, &results);
    Ok(())
}

fn print_results(searcher: &Searcher, query: &str, results: &[SearchResult]) {
    println!();
    section_top(&format!("\"{}\"", query));
    if results.is_empty() {
        row(&styled(&[DIM], "  no results"));
    }
    for (rank, result) in results.iter().enumerate() {
        let title = searcher
            .document(result.doc_id)
            .map_or_else(|| format!("doc {}", result.doc_id.get()), |d| d.title.clone());
        row(&format!(
            "{} {} {} {}",
            pad_left(&(rank + 1).to_string(), 3),
            tier_label(result.tier),
            score_value(result.score),
            styled(&[BOLD], &title)
        ));
        let mut detail = String::from("               ");
        if let Some(doc) = searcher.document(result.doc_id) {
            detail.push_str(&doc.href);
        }
        if let Some(section) = &result.section_id {
            detail.push('#');
            detail.push_str(section);
        }
        if let Some(term) = &result.matched_term {
            detail.push_str(&format!("  [{}]", term));
        }
        row(&styled(&[DIM], &detail));
    }
    section_bot();
    println!();
}

// ============================================================================
// SPLIT
// ============================================================================

fn split(path: &Path, index_out: &Path, module_out: &Path) -> Result<()> {
    let bytes = read_file(path)?;
    let split = Container::split_module(&bytes)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    if split.module.is_empty() {
        bail!("{} has no embedded module", path.display());
    }
    fs::write(index_out, &split.index)
        .with_context(|| format!("failed to write {}", index_out.display()))?;
    fs::write(module_out, &split.module)
        .with_context(|| format!("failed to write {}", module_out.display()))?;
    println!(
        "{} {} ({}) + {} ({})",
        styled(&[GREEN], "split"),
        index_out.display(),
        format_size(split.index.len()),
        module_out.display(),
        format_size(split.module.len())
    );
    Ok(())
}
