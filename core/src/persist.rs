use crate::corpus::Corpus;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: usize,
    pub num_terms: usize,
    pub failed_tasks: usize,
    /// Whether documents went through the English preprocessor; queries must too.
    pub preprocessed: bool,
    pub created_at: String,
    pub version: u32,
}

impl MetaFile {
    pub fn for_corpus(corpus: &Corpus, preprocessed: bool, created_at: String) -> Self {
        Self {
            num_docs: corpus.len(),
            num_terms: corpus.terms().len(),
            failed_tasks: corpus.failures().len(),
            preprocessed,
            created_at,
            version: SNAPSHOT_VERSION,
        }
    }
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn corpus(&self) -> PathBuf { self.root.join("corpus.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

impl Corpus {
    /// Opaque snapshot of documents, term index, DF table and matrix.
    pub fn to_snapshot(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_snapshot(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).context("corrupt corpus snapshot")
    }
}

pub fn save_corpus(paths: &IndexPaths, corpus: &Corpus) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.corpus()).with_context(|| format!("creating {}", paths.corpus().display()))?;
    let bytes = corpus.to_snapshot()?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_corpus(paths: &IndexPaths) -> Result<Corpus> {
    let mut f = File::open(paths.corpus()).with_context(|| format!("opening {}", paths.corpus().display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Corpus::from_snapshot(&buf)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta()).with_context(|| format!("opening {}", paths.meta().display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    if meta.version != SNAPSHOT_VERSION {
        anyhow::bail!("unsupported snapshot version {} (expected {})", meta.version, SNAPSHOT_VERSION);
    }
    Ok(meta)
}

/// Load the corpus together with the metadata needed to query it.
pub fn load_index(paths: &IndexPaths) -> Result<(Corpus, MetaFile)> {
    let meta = load_meta(paths)?;
    let corpus = load_corpus(paths)?;
    Ok((corpus, meta))
}
