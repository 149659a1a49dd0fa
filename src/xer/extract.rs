use crate::metadata::ExportHeader;
use std::collections::HashMap;
use tracing::{debug, warn};

pub(crate) const HEADER_TOKEN: &str = "ERMHDR";
pub(crate) const TABLE_TOKEN: &str = "%T";
const FIELDS_TOKEN: &str = "%F";
const ROW_TOKEN: &str = "%R";
const END_TOKEN: &str = "%E";

/// One table of an interchange file, as text.
///
/// Every row holds exactly `fields.len()` cells: short rows are padded with
/// empty strings when they are added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub name: String,
    pub fields: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            name: name.into(),
            fields,
            rows: Vec::new(),
        }
    }

    /// Position of a field in this table's own header.
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|name| name == field)
    }

    pub fn push_row(&mut self, mut cells: Vec<String>) {
        if cells.len() > self.fields.len() {
            debug!(
                table = %self.name,
                extra = cells.len() - self.fields.len(),
                "dropping cells beyond the field header"
            );
        }
        cells.resize(self.fields.len(), String::new());
        self.rows.push(cells);
    }

    /// Folds another section of the same table into this one. Rows of a
    /// section whose header differs are re-keyed by field name; unseen fields
    /// are appended to the header and earlier rows padded.
    pub fn append_section(&mut self, section: RawTable) {
        if section.fields == self.fields {
            self.rows.extend(section.rows);
            return;
        }

        let positions: Vec<usize> = section
            .fields
            .iter()
            .map(|field| match self.field_index(field) {
                Some(idx) => idx,
                None => {
                    self.fields.push(field.clone());
                    self.fields.len() - 1
                }
            })
            .collect();
        let width = self.fields.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
        for row in section.rows {
            let mut cells = vec![String::new(); width];
            for (cell, &target) in row.into_iter().zip(&positions) {
                cells[target] = cell;
            }
            self.rows.push(cells);
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Everything the extractor found in one file.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub header: Option<ExportHeader>,
    pub tables: HashMap<String, RawTable>,
}

impl Extraction {
    pub fn table(&self, name: &str) -> Option<&RawTable> {
        self.tables.get(name)
    }

    /// Table names in sorted order.
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn close_section(&mut self, section: RawTable) {
        debug!(table = %section.name, rows = section.rows.len(), "table section closed");
        match self.tables.get_mut(&section.name) {
            Some(existing) => {
                debug!(table = %section.name, "appending duplicate table section");
                existing.append_section(section);
            }
            None => {
                self.tables.insert(section.name.clone(), section);
            }
        }
    }
}

enum ScanState {
    SeekingTable,
    ExpectHeader(String),
    CollectingRows(RawTable),
}

/// Splits decoded interchange text into raw tables with a single forward scan.
pub fn extract_tables(text: &str) -> Extraction {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut extraction = Extraction::default();
    let mut state = ScanState::SeekingTable;
    let ends_with_newline = text.ends_with('\n');
    let mut lines = text.split('\n').peekable();

    while let Some(raw_line) = lines.next() {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        let is_last = lines.peek().is_none();
        if line.trim().is_empty() {
            continue;
        }

        let mut cells = line.split('\t');
        let token = cells.next().unwrap_or_default().trim();

        state = match (token, state) {
            (HEADER_TOKEN, state) => {
                extraction.header = Some(ExportHeader::from_cells(cells));
                state
            }
            (TABLE_TOKEN, previous) => {
                finish(&mut extraction, previous);
                match cells.next().map(str::trim).filter(|name| !name.is_empty()) {
                    Some(name) => ScanState::ExpectHeader(name.to_string()),
                    None => {
                        warn!("table start line without a table name, skipping");
                        ScanState::SeekingTable
                    }
                }
            }
            (FIELDS_TOKEN, ScanState::ExpectHeader(name)) => {
                let fields = cells.map(|field| field.trim().to_string()).collect();
                ScanState::CollectingRows(RawTable::new(name, fields))
            }
            (ROW_TOKEN, ScanState::CollectingRows(mut table)) => {
                let row: Vec<String> = cells.map(ToString::to_string).collect();
                if is_last && !ends_with_newline && row.len() < table.fields.len() {
                    warn!(
                        table = %table.name,
                        cells = row.len(),
                        "ignoring incomplete trailing row"
                    );
                } else {
                    table.push_row(row);
                }
                ScanState::CollectingRows(table)
            }
            (ROW_TOKEN | END_TOKEN, ScanState::ExpectHeader(name)) => {
                warn!(table = %name, "table has no field header, skipping");
                ScanState::SeekingTable
            }
            (END_TOKEN, previous) => {
                finish(&mut extraction, previous);
                ScanState::SeekingTable
            }
            (_, state) => state,
        };
    }

    finish(&mut extraction, state);
    extraction
}

fn finish(extraction: &mut Extraction, state: ScanState) {
    match state {
        ScanState::CollectingRows(table) => extraction.close_section(table),
        ScanState::ExpectHeader(name) => {
            warn!(table = %name, "table has no field header, skipping");
        }
        ScanState::SeekingTable => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_only_table_is_kept() {
        let extraction = extract_tables("%T\tCALENDAR\n%F\tclndr_id\tclndr_name\n%E\n");
        let table = extraction.table("CALENDAR").unwrap();
        assert_eq!(table.fields, vec!["clndr_id", "clndr_name"]);
        assert!(table.is_empty());
    }

    #[test]
    fn short_rows_are_padded() {
        let extraction = extract_tables("%T\tTASK\n%F\ta\tb\tc\n%R\t1\n");
        let table = extraction.table("TASK").unwrap();
        assert_eq!(table.rows, vec![vec!["1".to_string(), String::new(), String::new()]]);
    }

    #[test]
    fn table_without_field_header_is_skipped() {
        let text = "%T\tBROKEN\n%R\t1\t2\n%T\tTASK\n%F\ttask_id\n%R\tT1\n";
        let extraction = extract_tables(text);
        assert!(extraction.table("BROKEN").is_none());
        assert_eq!(extraction.table("TASK").unwrap().row_count(), 1);
    }

    #[test]
    fn unknown_and_blank_lines_are_ignored() {
        let text = "garbage line\n\n%T\tTASK\n%F\ttask_id\n\nnoise\t1\n%R\tT1\n";
        let extraction = extract_tables(text);
        assert_eq!(extraction.table("TASK").unwrap().row_count(), 1);
    }

    #[test]
    fn crlf_line_endings_are_stripped() {
        let text = "%T\tTASK\r\n%F\ttask_id\ttask_name\r\n%R\tT1\tDig\r\n";
        let table = extract_tables(text).tables.remove("TASK").unwrap();
        assert_eq!(table.rows[0], vec!["T1".to_string(), "Dig".to_string()]);
    }

    #[test]
    fn incomplete_trailing_row_is_dropped() {
        let text = "%T\tTASK\n%F\ttask_id\ttask_name\n%R\tT1\tDig\n%R\tT2";
        let table = extract_tables(text).tables.remove("TASK").unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn complete_trailing_row_without_newline_is_kept() {
        let text = "%T\tTASK\n%F\ttask_id\ttask_name\n%R\tT1\tDig\n%R\tT2\tPour";
        let table = extract_tables(text).tables.remove("TASK").unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn duplicate_sections_with_different_headers_are_rekeyed() {
        let text = "%T\tTASK\n%F\ttask_id\ttask_name\n%R\tT1\tDig\n\
                    %T\tTASK\n%F\ttask_name\ttask_id\tstatus_code\n%R\tPour\tT2\tTK_Active\n";
        let table = extract_tables(text).tables.remove("TASK").unwrap();
        assert_eq!(table.fields, vec!["task_id", "task_name", "status_code"]);
        assert_eq!(table.rows[0], vec!["T1", "Dig", ""]);
        assert_eq!(table.rows[1], vec!["T2", "Pour", "TK_Active"]);
    }

    #[test]
    fn leading_byte_order_mark_is_ignored() {
        let extraction = extract_tables("\u{feff}%T\tTASK\n%F\ttask_id\tproj_id\n%R\tT1\tP1\n");
        assert_eq!(extraction.table("TASK").unwrap().row_count(), 1);

        let header = extract_tables("\u{feff}ERMHDR\t19.12\n").header.unwrap();
        assert_eq!(header.version.as_deref(), Some("19.12"));
    }

    #[test]
    fn export_header_is_captured() {
        let text = "ERMHDR\t19.12\t2024-03-01\tProject\tadmin\n%T\tTASK\n%F\ttask_id\n";
        let header = extract_tables(text).header.unwrap();
        assert_eq!(header.version.as_deref(), Some("19.12"));
        assert_eq!(header.user_login.as_deref(), Some("admin"));
        assert_eq!(header.currency, None);
    }
}
