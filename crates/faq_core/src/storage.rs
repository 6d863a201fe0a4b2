use crate::error::{FaqError, Result};
use crate::model::FaqRecord;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Parses a corpus document: a JSON array of `{question, answer}` objects.
pub fn parse_faq_json(bytes: &[u8]) -> Result<Vec<FaqRecord>> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn load_faq_json(path: &Path) -> Result<Vec<FaqRecord>> {
    let bytes = std::fs::read(path).map_err(|e| FaqError::io(path, e))?;
    parse_faq_json(&bytes)
}

pub fn save_faq_jsonl(path: &Path, records: &[FaqRecord]) -> Result<()> {
    let file = File::create(path).map_err(|e| FaqError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    for record in records {
        let line = serde_json::to_string(record)?;
        writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.write_all(b"\n"))
            .map_err(|e| FaqError::io(path, e))?;
    }

    writer.flush().map_err(|e| FaqError::io(path, e))
}

pub fn load_faq_jsonl(path: &Path) -> Result<Vec<FaqRecord>> {
    let file = File::open(path).map_err(|e| FaqError::io(path, e))?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| FaqError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| FaqError::JsonLine {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Loads `.jsonl` files line by line and anything else as a JSON array.
pub fn load_faq_file(path: &Path) -> Result<Vec<FaqRecord>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("jsonl") => load_faq_jsonl(path),
        _ => load_faq_json(path),
    }
}
