//! Types returned by the repository utilities.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;

/// One hit of a quick search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub uri: String,
    pub object_type: String,
    pub name: String,
    pub package: Option<String>,
    pub description: Option<String>,
}

/// An object that uses the searched object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageReference {
    pub uri: String,
    pub object_type: String,
    pub name: String,
    pub description: Option<String>,
    pub package: Option<String>,
    /// Parent URI in the usage tree, if any.
    pub parent_uri: Option<String>,
    /// `true` for actual usages, `false` for grouping nodes.
    pub is_result: bool,
    pub usage_information: Option<String>,
}

/// One entry of a package's node structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeEntry {
    pub object_type: String,
    pub name: String,
    pub tech_name: String,
    pub uri: String,
    pub description: String,
    pub expandable: bool,
}

/// An object with an inactive version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InactiveObject {
    pub uri: String,
    pub object_type: String,
    pub name: String,
    pub parent_uri: Option<String>,
    pub user: Option<String>,
    pub deleted: bool,
    /// Transport request the change is recorded on.
    pub transport: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub description: String,
    pub data_type: String,
}

/// Result of a table preview or SQL query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableData {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    /// Rows the backend matched, which may exceed `rows.len()`.
    pub total_rows: u64,
}

impl TableData {
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Write a header line plus one record per row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(self.column_names())?;
        for row in &self.rows {
            csv.write_record(row)?;
        }
        csv.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
