//! `recommend` command: cosine ranking of a corpus against a preference

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use waypath_core::algo::similarity::{Ranked, TermVector};
use waypath_core::prelude::*;

/// Term weights given directly or derived from free text
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Terms {
    #[serde(default)]
    pub terms: Option<TermVector>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Terms {
    /// Explicit terms win over text
    pub fn vector(&self) -> Result<TermVector> {
        match (&self.terms, &self.text) {
            (Some(terms), _) => Ok(terms.clone()),
            (None, Some(text)) => Ok(term_frequencies(text)),
            (None, None) => bail!("entry has neither `terms` nor `text`"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusEntry {
    pub id: String,
    #[serde(flatten)]
    pub terms: Terms,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid JSON in '{}'", path.display()))
}

/// Rank `corpus` by similarity to `preference`, keeping the best `top`
pub fn recommend(preference: &Terms, corpus: &[CorpusEntry], top: usize) -> Result<Vec<Ranked<String>>> {
    let preference = preference.vector().context("Invalid preference")?;
    let candidates = corpus
        .iter()
        .map(|entry| {
            entry
                .terms
                .vector()
                .map(|vector| (entry.id.clone(), vector))
                .with_context(|| format!("Invalid corpus entry '{}'", entry.id))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut ranked = rank_by_similarity(&preference, &candidates);
    ranked.truncate(top);
    Ok(ranked)
}

pub fn run_recommend(preference: &Path, corpus: &Path, top: usize) -> Result<Vec<Ranked<String>>> {
    let preference: Terms = read_json(preference)?;
    let corpus: Vec<CorpusEntry> = read_json(corpus)?;
    recommend(&preference, &corpus, top)
}
