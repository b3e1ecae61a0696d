use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing_subscriber::{EnvFilter, fmt};
use vectorspace::persist::{load_index, save_corpus, save_meta, IndexPaths, MetaFile};
use vectorspace::{Corpus, CorpusOptions, DocIdGenerator, Document, Preprocessor};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query a TF-IDF vector-space corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a corpus snapshot from input JSON/JSONL files or a directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output snapshot directory
        #[arg(long)]
        output: String,
        /// Worker threads for the DF and TF-IDF phases
        #[arg(long, default_value_t = 1)]
        threads: usize,
        /// Log every term and document as it is processed
        #[arg(short, long, default_value_t = false)]
        debug: bool,
        /// Lowercase, drop English stopwords and stem before indexing
        #[arg(long, default_value_t = false)]
        preprocess: bool,
    },
    /// Rank the documents of a snapshot against a query
    Query {
        /// Snapshot directory
        #[arg(long)]
        index: String,
        /// Free-text query
        #[arg(long)]
        query: String,
        /// Number of results
        #[arg(short, long, default_value_t = 10)]
        k: usize,
        /// Print hits as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = match &cli.command {
        Commands::Build { debug: true, .. } => "debug",
        _ => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Build { input, output, threads, debug, preprocess } => {
            build_corpus(&input, &output, CorpusOptions { threads, debug }, preprocess)
        }
        Commands::Query { index, query, k, json } => run_query(&index, &query, k, json),
    }
}

fn build_corpus(input: &str, output: &str, options: CorpusOptions, preprocess: bool) -> Result<()> {
    let records = load_records(Path::new(input))?;
    tracing::info!(num_records = records.len(), input, "loaded records");

    let preprocessor = preprocess.then(Preprocessor::english);
    let mut ids = DocIdGenerator::new();
    let documents = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Document::from_record(&mut ids, None, r, preprocessor.as_ref()).with_context(|| format!("record #{i}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let start = Instant::now();
    let corpus = Corpus::new(documents, options)?;
    tracing::info!(elapsed_s = start.elapsed().as_secs_f64(), "corpus instantiation (includes TF-IDF matrix)");
    for failure in corpus.failures() {
        tracing::warn!(key = %failure.key, error = %failure.error, "omitted from corpus");
    }

    let paths = IndexPaths::new(output);
    save_corpus(&paths, &corpus)?;
    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into());
    save_meta(&paths, &MetaFile::for_corpus(&corpus, preprocess, created_at))?;

    tracing::info!(output, "snapshot written");
    Ok(())
}

fn run_query(index: &str, query: &str, k: usize, json: bool) -> Result<()> {
    let start = Instant::now();
    let (corpus, meta) = load_index(&IndexPaths::new(index))?;
    tracing::info!(elapsed_s = start.elapsed().as_secs_f64(), num_docs = meta.num_docs, "corpus load from snapshot");

    let preprocessor = meta.preprocessed.then(Preprocessor::english);
    let hits = corpus.search(query, k, preprocessor.as_ref())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }
    println!("\nFor query : {query}");
    for (i, hit) in hits.iter().enumerate() {
        println!("Result {:02} : [{:0.6}] {}", i + 1, hit.score, hit.title);
    }
    println!();
    Ok(())
}

/// Reads raw records from a `.json` file (array or single object), a `.jsonl`
/// file, or every such file below a directory in path order.
fn load_records(input: &Path) -> Result<Vec<Map<String, Value>>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        anyhow::bail!("input path {} does not exist", input.display());
    }

    let mut records = Vec::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut records)?;
        } else {
            read_json(&file, &mut records)?;
        }
    }
    Ok(records)
}

fn read_jsonl(file: &Path, records: &mut Vec<Map<String, Value>>) -> Result<()> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let record = serde_json::from_str(&line).with_context(|| format!("{}:{}", file.display(), n + 1))?;
        records.push(record);
    }
    Ok(())
}

fn read_json(file: &Path, records: &mut Vec<Map<String, Value>>) -> Result<()> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    let json: Value = serde_json::from_reader(reader).with_context(|| format!("parsing {}", file.display()))?;
    match json {
        Value::Array(arr) => {
            for v in arr {
                match v {
                    Value::Object(m) => records.push(m),
                    other => anyhow::bail!("{}: expected an object, found {other}", file.display()),
                }
            }
        }
        Value::Object(m) => records.push(m),
        _ => tracing::warn!(file = %file.display(), "skipping file without records"),
    }
    Ok(())
}
