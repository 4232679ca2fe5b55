//! Document ingestion: extract text from an upload and split it into the
//! fixed section set by recognizing header lines.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::info;

use crate::editor::{SectionId, Sections};
use crate::gateways::{IngestError, IngestionGateway};

/// Production ingestion gateway. PDF text comes from `pdf-extract`;
/// `.txt` and `.md` uploads are taken as-is.
pub struct DocumentIngestor;

fn extension(filename: &str) -> &str {
    filename.rsplit('.').next().unwrap_or_default()
}

fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, IngestError> {
    match extension(&filename.to_lowercase()) {
        "pdf" => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| IngestError::Extraction(e.to_string())),
        "txt" | "md" => Ok(String::from_utf8_lossy(bytes).into_owned()),
        other => Err(IngestError::UnsupportedFormat(format!(".{other}"))),
    }
}

/// Matches a line against the known section header vocabulary. The first
/// section whose keyword appears as a whole word wins, in `ALL` order.
fn match_header(line: &str) -> Option<SectionId> {
    let words: Vec<String> = line
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();
    let has = |w: &str| words.iter().any(|x| x == w);

    if has("objective") || has("summary") {
        Some(SectionId::Summary)
    } else if has("experience") {
        Some(SectionId::Experience)
    } else if has("education") || (has("academic") && has("background")) {
        Some(SectionId::Education)
    } else if has("skills") || (has("technical") && has("skill")) {
        Some(SectionId::Skills)
    } else if has("projects") {
        Some(SectionId::Projects)
    } else {
        None
    }
}

/// Splits extracted text into sections. Lines before the first recognized
/// header belong to no section and are dropped; every section id is
/// present in the result regardless of what the document contained.
pub(crate) fn split_sections(text: &str) -> Sections {
    fn flush(out: &mut BTreeMap<SectionId, String>, current: Option<SectionId>, buffer: &mut Vec<&str>) {
        if let Some(id) = current {
            if !buffer.is_empty() {
                let entry = out.entry(id).or_default();
                if !entry.is_empty() {
                    entry.push('\n');
                }
                entry.push_str(buffer.join("\n").trim());
            }
        }
        buffer.clear();
    }

    let mut out: BTreeMap<SectionId, String> = BTreeMap::new();
    let mut current: Option<SectionId> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(id) = match_header(line) {
            flush(&mut out, current, &mut buffer);
            current = Some(id);
        } else {
            buffer.push(line);
        }
    }
    flush(&mut out, current, &mut buffer);

    Sections::from(out)
}

#[async_trait]
impl IngestionGateway for DocumentIngestor {
    async fn ingest(&self, filename: &str, bytes: &[u8]) -> Result<Sections, IngestError> {
        let text = extract_text(filename, bytes)?;
        if text.trim().is_empty() {
            return Err(IngestError::Empty);
        }
        let sections = split_sections(&text);
        info!(
            filename,
            bytes = bytes.len(),
            "document ingested and split into sections"
        );
        Ok(sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lines_route_following_text() {
        let text = "\
John Doe
john@example.com

Professional Summary
Seasoned engineer.

Work Experience
Engineer at X
Shipped the thing.

TECHNICAL SKILLS
Rust, Python
";
        let sections = split_sections(text);

        assert_eq!(sections.get(SectionId::Summary), "Seasoned engineer.");
        assert_eq!(
            sections.get(SectionId::Experience),
            "Engineer at X\nShipped the thing."
        );
        assert_eq!(sections.get(SectionId::Skills), "Rust, Python");
        // Contact lines before the first header belong to no section.
        assert!(!sections.get(SectionId::Summary).contains("John Doe"));
    }

    #[test]
    fn test_all_section_ids_present_even_when_absent_from_document() {
        let sections = split_sections("Education\nBSc in CS");
        assert_eq!(sections.get(SectionId::Education), "BSc in CS");
        assert_eq!(sections.get(SectionId::Projects), "");
        assert_eq!(sections.iter().count(), SectionId::ALL.len());
    }

    #[test]
    fn test_header_vocabulary_variants() {
        assert_eq!(match_header("Objective"), Some(SectionId::Summary));
        assert_eq!(match_header("WORK EXPERIENCE"), Some(SectionId::Experience));
        assert_eq!(match_header("Academic Background"), Some(SectionId::Education));
        assert_eq!(match_header("Key Projects"), Some(SectionId::Projects));
        assert_eq!(match_header("References"), None);
        assert_eq!(match_header("Skilled carpenter"), None);
    }

    #[test]
    fn test_repeated_headers_accumulate_into_one_section() {
        let text = "Projects\nCompiler\nProjects\nRay tracer";
        let sections = split_sections(text);
        assert_eq!(sections.get(SectionId::Projects), "Compiler\nRay tracer");
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_rejected() {
        let err = DocumentIngestor
            .ingest("resume.docx", b"PK\x03\x04")
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_plain_text_upload_is_ingested() {
        let sections = DocumentIngestor
            .ingest("resume.txt", b"Summary\nBuilder of things.")
            .await
            .unwrap();
        assert_eq!(sections.get(SectionId::Summary), "Builder of things.");
    }

    #[tokio::test]
    async fn test_blank_document_is_an_error() {
        let err = DocumentIngestor
            .ingest("resume.txt", b"  \n \n")
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Empty));
    }
}
