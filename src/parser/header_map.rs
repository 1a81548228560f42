//! Column-name to offset index built from a header row

use std::collections::HashMap;

/// Positional index of one header row
///
/// Rebuilt wholesale whenever a new header row is seen; never shared
/// between sheets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: HashMap<String, usize>,
}

impl HeaderMap {
    /// Index every cell of `row`; a repeated header keeps its last offset
    pub fn build<S: AsRef<str>>(row: &[S]) -> Self {
        let columns = row
            .iter()
            .enumerate()
            .map(|(idx, cell)| (cell.as_ref().to_string(), idx))
            .collect();
        Self { columns }
    }

    /// Cell under `column`, or `""` when unregistered or past the row end
    pub fn lookup<'r, S: AsRef<str>>(&self, column: &str, row: &'r [S]) -> &'r str {
        self.offset(column)
            .and_then(|idx| row.get(idx))
            .map(AsRef::as_ref)
            .unwrap_or("")
    }

    pub fn offset(&self, column: &str) -> Option<usize> {
        self.columns.get(column).copied()
    }

    /// Number of distinct header names
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_header_to_its_offset() {
        let headers = HeaderMap::build(&["Seq.", "Descrição", "Canal"]);
        assert_eq!(headers.offset("Seq."), Some(0));
        assert_eq!(headers.offset("Canal"), Some(2));
        assert_eq!(headers.column_count(), 3);
    }

    #[test]
    fn duplicate_header_keeps_last_offset() {
        let headers = HeaderMap::build(&["PU", "Canal", "PU"]);
        assert_eq!(headers.offset("PU"), Some(2));
        assert_eq!(headers.column_count(), 2);
    }

    #[test]
    fn lookup_tolerates_ragged_rows_and_unknown_columns() {
        let headers = HeaderMap::build(&["Seq.", "Descrição", "Canal"]);
        let row = ["1", "Compra"];
        assert_eq!(headers.lookup("Descrição", &row), "Compra");
        assert_eq!(headers.lookup("Canal", &row), "");
        assert_eq!(headers.lookup("Operação", &row), "");
    }

    #[test]
    fn rebuilding_replaces_every_offset() {
        let first = HeaderMap::build(&["Seq.", "Canal"]);
        let second = HeaderMap::build(&["Canal", "Operação", "Seq."]);
        let row = ["A", "B", "C"];

        assert_eq!(first.lookup("Canal", &row), "B");
        assert_eq!(second.lookup("Canal", &row), "A");
        assert_eq!(second.lookup("Seq.", &row), "C");
        assert_eq!(first.lookup("Operação", &row), "");
    }
}
