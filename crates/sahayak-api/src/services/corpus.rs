// Curriculum corpus catalog
//
// Lists the books available in the retrieval corpus for a curriculum and
// grade by parsing subject names out of corpus file display names.
// Filename conventions: <curriculum>_class<grade>_<subject>_<part>.pdf and
// the legacy grade-<grade>-<subject>-<lang>.pdf.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeSet;

const NCERT_CORPUS_ID: &str = "576460752303423488";
const KTS_CORPUS_ID: &str = "5764607523034234880";

pub struct CorpusService {
    client: Client,
    base_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileListing {
    files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    display_name: String,
}

impl CorpusService {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Unique subjects with a book in the corpus for this curriculum and
    /// grade, sorted alphabetically.
    pub async fn list_books(&self, curriculum: &str, grade: u8) -> Result<Vec<String>> {
        let corpus_id = corpus_id(curriculum)
            .with_context(|| format!("Invalid curriculum type: {curriculum}"))?;
        let base = self
            .base_url
            .as_ref()
            .context("corpus catalog not configured (CORPUS_API_URL not set)")?;

        let listing: FileListing = self
            .client
            .get(format!("{base}/corpora/{corpus_id}/files"))
            .send()
            .await
            .context("Failed to reach corpus catalog")?
            .error_for_status()
            .context("Corpus catalog returned an error")?
            .json()
            .await
            .context("Failed to parse corpus listing")?;

        let subjects: BTreeSet<String> = listing
            .files
            .iter()
            .filter_map(|file| parse_subject(&file.display_name, grade))
            .collect();
        Ok(subjects.into_iter().collect())
    }
}

fn corpus_id(curriculum: &str) -> Option<&'static str> {
    match curriculum.to_lowercase().as_str() {
        "ncert" => Some(NCERT_CORPUS_ID),
        "kts" => Some(KTS_CORPUS_ID),
        _ => None,
    }
}

/// Extract the subject from a corpus file display name for one grade.
/// Returns None for files belonging to other grades or with unparseable
/// names.
pub fn parse_subject(display_name: &str, grade: u8) -> Option<String> {
    let filename = display_name.to_lowercase();
    let class_tag = format!("class{grade}");
    let grade_tag = format!("grade{grade}");
    let dashed_tag = format!("grade-{grade}");

    if filename.contains(&class_tag) || filename.contains(&grade_tag) {
        // ncert_class6_english_1.pdf -> ["ncert", "class6", "english", "1"]
        let stem = filename.trim_end_matches(".pdf");
        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() < 3 {
            return None;
        }
        let position = parts
            .iter()
            .position(|part| part.contains(&class_tag) || part.contains(&grade_tag))?;
        let subject = parts.get(position + 1)?;
        if subject.chars().all(|c| c.is_ascii_digit())
            || matches!(*subject, "part" | "en" | "hi")
        {
            return None;
        }
        return Some(title_case(subject));
    }

    if filename.contains(&dashed_tag) {
        // grade-6-science-en.pdf -> ["grade", "6", "science", "en"]
        let stem = filename.trim_end_matches(".pdf");
        let parts: Vec<&str> = stem.split('-').collect();
        if parts.len() < 3 {
            return None;
        }
        let digits = grade.to_string();
        let position = parts.iter().position(|part| part.contains(&digits))?;
        let subject = parts.get(position + 1)?;
        if subject.chars().all(|c| c.is_ascii_digit())
            || matches!(*subject, "en" | "hi" | "part1" | "part2")
        {
            return None;
        }
        return Some(title_case(subject));
    }

    None
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
