// src/crtsh/extract.rs
// =============================================================================
// This module pulls subdomain names out of a crt.sh result page.
//
// crt.sh renders its results as plain HTML tables. The listing we care about
// is the third <table> in the document, and each of its rows is one
// certificate entry. The "Matching Identities" column (the fifth <td>) holds
// the hostname we want.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
//
// Rows are handled one at a time: a broken row is skipped, the rest of the
// table is still read. Only a missing results table fails the whole page.
// =============================================================================

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Where crt.sh puts the results listing (zero-indexed table position)
pub const DEFAULT_TABLE_INDEX: usize = 2;

/// Which cell of a result row holds the matching identity (zero-indexed)
pub const DEFAULT_COLUMN_INDEX: usize = 4;

const WILDCARD_PREFIX: &str = "*.";

// Errors that fail a whole document
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page has fewer tables than the layout we expect
    #[error("result table #{index} not found (page has {found} table(s))")]
    MissingResultTable { index: usize, found: usize },

    /// A CSS selector failed to compile
    #[error("invalid selector '{0}'")]
    Selector(String),
}

// What we got out of a single <tr>
//
// Making "skip" an explicit value (instead of swallowing an error) keeps the
// per-row policy visible at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowExtraction {
    /// A normalized subdomain
    Value(String),
    /// The row was a header, too short, or had an empty cell
    Skip,
}

// Table/column positions of the result listing
//
// These are tied to crt.sh's current HTML layout, so they live in a value
// instead of being scattered as literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub table_index: usize,
    pub column_index: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            table_index: DEFAULT_TABLE_INDEX,
            column_index: DEFAULT_COLUMN_INDEX,
        }
    }
}

// Extracts every subdomain from a crt.sh result page
//
// Parameters:
//   html: the response body
//   layout: which table and column to read
//
// Returns: subdomains in document order (duplicates kept), or an error if the
// results table is missing entirely.
//
// Example:
//   a row whose fifth cell is "*.api.example.com" -> "api.example.com"
pub fn extract_subdomains(html: &str, layout: TableLayout) -> Result<Vec<String>, ExtractError> {
    let rows = extract_rows(html, layout)?;

    Ok(rows
        .into_iter()
        .filter_map(|row| match row {
            RowExtraction::Value(subdomain) => Some(subdomain),
            RowExtraction::Skip => None,
        })
        .collect())
}

// Same as extract_subdomains, but keeps the per-row outcome
//
// The parsed DOM is not Send, so it never leaves this function: callers get
// plain owned values they can hold across an .await.
pub fn extract_rows(html: &str, layout: TableLayout) -> Result<Vec<RowExtraction>, ExtractError> {
    let document = Html::parse_document(html);

    let table_selector = selector("table")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let found = document.select(&table_selector).count();
    let table = document
        .select(&table_selector)
        .nth(layout.table_index)
        .ok_or(ExtractError::MissingResultTable {
            index: layout.table_index,
            found,
        })?;

    Ok(table
        .select(&row_selector)
        .map(|row| extract_row(row, &cell_selector, layout.column_index))
        .collect())
}

// Reads the identity cell out of one row
fn extract_row(row: ElementRef<'_>, cell_selector: &Selector, column_index: usize) -> RowExtraction {
    let Some(cell) = row.select(cell_selector).nth(column_index) else {
        return RowExtraction::Skip;
    };

    let text: String = cell.text().collect();
    match normalize_subdomain(&text) {
        Some(subdomain) => RowExtraction::Value(subdomain),
        None => RowExtraction::Skip,
    }
}

// Trims whitespace and strips one leading "*." wildcard
//
// Returns None when nothing is left.
//
// Examples:
//   "*.example.com"   -> Some("example.com")
//   " www.example.com" -> Some("www.example.com")
//   "*."              -> None
pub fn normalize_subdomain(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_prefix(WILDCARD_PREFIX).unwrap_or(trimmed);

    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::Selector(css.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    // Builds a page shaped like crt.sh: two layout tables, then the results.
    pub(crate) fn result_page(identities: &[&str]) -> String {
        let rows: String = identities
            .iter()
            .enumerate()
            .map(|(i, name)| {
                format!(
                    "<tr><td>{i}</td><td>2024-01-01</td><td>2024-01-01</td>\
                     <td>2025-01-01</td><td>{name}</td><td>{name}</td><td>CA</td></tr>"
                )
            })
            .collect();

        format!(
            "<html><body>\
             <table><tr><td>crt.sh</td></tr></table>\
             <table><tr><td>Criteria</td><td>Type: Identity</td></tr></table>\
             <table>\
             <tr><th>crt.sh ID</th><th>Logged At</th><th>Not Before</th>\
             <th>Not After</th><th>Common Name</th><th>Matching Identities</th></tr>\
             {rows}\
             </table>\
             </body></html>"
        )
    }

    #[test]
    fn test_extract_rows_in_document_order() {
        let html = result_page(&["www.example.com", "api.example.com", "www.example.com"]);
        let subdomains = extract_subdomains(&html, TableLayout::default()).unwrap();
        assert_eq!(
            subdomains,
            vec!["www.example.com", "api.example.com", "www.example.com"]
        );
    }

    #[test]
    fn test_strip_wildcard_prefix_once() {
        assert_eq!(normalize_subdomain("*.example.com"), Some("example.com".to_string()));
        assert_eq!(normalize_subdomain("*.*.example.com"), Some("*.example.com".to_string()));
        assert_eq!(normalize_subdomain("mail.example.com"), Some("mail.example.com".to_string()));
        assert_eq!(normalize_subdomain("a*.example.com"), Some("a*.example.com".to_string()));
    }

    #[test]
    fn test_empty_identity_is_skipped() {
        assert_eq!(normalize_subdomain("  "), None);
        assert_eq!(normalize_subdomain("*."), None);
    }

    #[test]
    fn test_wildcard_rows_are_normalized() {
        let html = result_page(&["*.cdn.example.com", "shop.example.com"]);
        let subdomains = extract_subdomains(&html, TableLayout::default()).unwrap();
        assert_eq!(subdomains, vec!["cdn.example.com", "shop.example.com"]);
    }

    #[test]
    fn test_short_row_does_not_stop_extraction() {
        let html = "<table></table><table></table><table>\
                    <tr><td>1</td><td>a</td><td>b</td><td>c</td><td>one.example.com</td></tr>\
                    <tr><td>2</td><td>only two cells</td></tr>\
                    <tr><td>3</td><td>a</td><td>b</td><td>c</td><td>three.example.com</td></tr>\
                    </table>";

        let rows = extract_rows(html, TableLayout::default()).unwrap();
        assert_eq!(
            rows,
            vec![
                RowExtraction::Value("one.example.com".to_string()),
                RowExtraction::Skip,
                RowExtraction::Value("three.example.com".to_string()),
            ]
        );
    }

    #[test]
    fn test_header_row_is_skipped() {
        let html = result_page(&[]);
        let rows = extract_rows(&html, TableLayout::default()).unwrap();
        assert_eq!(rows, vec![RowExtraction::Skip]);
    }

    #[test]
    fn test_missing_result_table_is_an_error() {
        let html = "<table><tr><td>1</td></tr></table><table></table>";
        let err = extract_subdomains(html, TableLayout::default()).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::MissingResultTable { index: 2, found: 2 }
        ));
    }

    #[test]
    fn test_custom_layout() {
        let html = "<table><tr><td>x</td><td>first.example.com</td></tr></table>";
        let layout = TableLayout {
            table_index: 0,
            column_index: 1,
        };
        let subdomains = extract_subdomains(html, layout).unwrap();
        assert_eq!(subdomains, vec!["first.example.com"]);
    }
}
