#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/edgar-trends/edgar-trends/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Narrative-section extraction from filing page text.

use edgar_core::{EdgarError, FilingReport, Result, Ticker};
use regex::Regex;
use tracing::{debug, warn};

/// Pages scanned when looking for the table of contents.
const MAX_TOC_PAGES: usize = 10;

/// Placeholder stored for a heading whose body could not be located.
const SECTION_NOT_FOUND: &str = "Section not found.";

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| EdgarError::Parse(e.to_string()))
}

/// Lowercase text and re-capitalize the first letter of each sentence.
///
/// A sentence boundary is `.`, `!` or `?` followed by whitespace. Filing
/// text arrives fully uppercased after normalization, so this is what makes
/// the stored sections readable.
#[must_use]
pub fn prettify_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut at_sentence_start = true;
    let mut after_punct = false;

    for c in lowered.chars() {
        if c.is_whitespace() {
            if after_punct {
                at_sentence_start = true;
                after_punct = false;
            }
            out.push(c);
            continue;
        }
        after_punct = matches!(c, '.' | '!' | '?');
        if at_sentence_start {
            out.extend(c.to_uppercase());
            at_sentence_start = false;
        } else {
            out.push(c);
        }
    }

    out
}

/// Extract section headings from the table-of-contents pages.
///
/// Scans the first ten pages for TOC entries of the shape
/// `Item N. <title> <page number>` and returns the titles with the
/// `Item N.` prefix stripped.
pub fn extract_headers(pages: &[String]) -> Result<Vec<String>> {
    let mut text = String::new();
    for page in pages.iter().take(MAX_TOC_PAGES) {
        text.push_str(page);
    }

    let toc_entry = compile(r"(?m)(Item\s\d+[A-Z]*\.\s+.+?)\s+\d{1,4}")?;
    let prefix = compile(r"^Item \d+[A-Z]?\.\s*")?;

    let headers: Vec<String> = toc_entry
        .captures_iter(&text)
        .map(|caps| prefix.replace(caps[1].trim(), "").into_owned())
        .collect();

    debug!(headers = headers.len(), "Extracted TOC headers");
    Ok(headers)
}

/// Find the first page index after the table of contents.
///
/// Looks for a "Table of Contents" marker within the first ten pages,
/// then for the first page from there that carries
/// an `Item N.` heading; extraction starts on the page after that. Without
/// a marker the result is page 1, skipping only the cover page.
pub fn detect_toc_end(pages: &[String]) -> Result<usize> {
    let toc_marker = compile(r"(?i)Table of Contents")?;
    let item_heading = compile(r"Item\s*\d+[A-Z]*\.")?;

    let mut toc_start = None;
    let mut toc_end_page = 0;

    for (page_num, page) in pages.iter().take(MAX_TOC_PAGES).enumerate() {
        if toc_start.is_none() && toc_marker.is_match(page) {
            toc_start = Some(page_num);
        }
        if toc_start.is_some() && item_heading.is_match(page) {
            toc_end_page = page_num;
            break;
        }
    }

    Ok(toc_end_page + 1)
}

/// Extract one section's text by its TOC heading.
///
/// The post-TOC text is whitespace-normalized and uppercased, the section
/// start is found as `ITEM N. <heading>`, and the body runs until the next
/// `ITEM N.` heading. Returns `Ok(None)` when the heading never appears in
/// the body text (common for TOC artifacts).
pub fn extract_section(pages: &[String], section_heading: &str) -> Result<Option<String>> {
    let toc_end_page = detect_toc_end(pages)?;

    let mut full_text = String::new();
    for page in pages.iter().skip(toc_end_page) {
        full_text.push_str(page);
        full_text.push('\n');
    }

    let whitespace = compile(r"\s+")?;
    let full_text = whitespace.replace_all(&full_text, " ").to_uppercase();
    let normalized_heading = whitespace
        .replace_all(section_heading.trim(), " ")
        .to_uppercase();

    let section_start = compile(&format!(
        r"(?i)ITEM\s*\d+[A-Z]*\.\s*{}",
        regex::escape(&normalized_heading)
    ))?;
    let Some(m) = section_start.find(&full_text) else {
        warn!(heading = %section_heading, "Section heading not found in body text");
        return Ok(None);
    };
    let start_idx = m.start();

    // The end-of-section scan starts one byte past the section start so the
    // section's own heading cannot match itself. Match starts are always
    // char boundaries, so mapping the offset back keeps the slice valid.
    let next_heading = compile(r"(?i)ITEM\s*\d+[A-Z]*\.")?;
    let end_idx = next_heading
        .find(&full_text[start_idx + 1..])
        .map_or(full_text.len(), |next| start_idx + 1 + next.start());

    let extracted = full_text[start_idx..end_idx].trim();
    if extracted.is_empty() {
        return Ok(None);
    }
    Ok(Some(prettify_text(extracted)))
}

/// Build the sections document for one filing.
///
/// Every TOC heading produces an entry; headings whose body could not be
/// located are stored with a placeholder so the document records what was
/// attempted.
pub fn extract_report(ticker: &Ticker, file_name: &str, pages: &[String]) -> Result<FilingReport> {
    let headers = extract_headers(pages)?;

    let mut report = FilingReport {
        ticker: ticker.storage_key(),
        file_name: file_name.to_string(),
        ..FilingReport::default()
    };

    for header in headers {
        let body = extract_section(pages, &header)?
            .unwrap_or_else(|| SECTION_NOT_FOUND.to_string());
        report.sections.insert(header, body);
    }

    debug!(
        file_name = %report.file_name,
        sections = report.sections.len(),
        "Extracted report sections"
    );
    Ok(report)
}
