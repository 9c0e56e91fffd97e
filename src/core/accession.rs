use crate::domain::model::Accession;
use crate::utils::error::Result;
use std::collections::HashSet;
use std::hash::Hash;
use std::path::Path;

/// Accessions that survived normalization, validation and deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessionBatch {
    pub accepted: Vec<Accession>,
    pub rejected: Vec<String>,
}

impl AccessionBatch {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

/// Tokenizes an accession list: `#` starts a comment, tokens split on any whitespace.
pub fn parse_accessions(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

pub async fn read_accessions(path: &Path) -> Result<Vec<String>> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(parse_accessions(&text))
}

pub fn normalize(token: &str) -> String {
    token.trim().to_ascii_uppercase()
}

pub fn validate_accession(acc: &str) -> bool {
    Accession::is_valid(acc)
}

pub fn dedup_preserve_order<T: Eq + Hash + Clone>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

pub fn prepare_accessions(tokens: Vec<String>) -> AccessionBatch {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for token in tokens {
        let acc = normalize(&token);
        match Accession::parse(&acc) {
            Ok(accession) => {
                println!("{} validated", accession);
                accepted.push(accession);
            }
            Err(e) => {
                println!("{}, removed from list", e);
                rejected.push(acc);
            }
        }
    }

    let before = accepted.len();
    let accepted = dedup_preserve_order(accepted);
    if accepted.len() < before {
        tracing::debug!("Removed {} duplicate accessions", before - accepted.len());
    }

    AccessionBatch { accepted, rejected }
}
