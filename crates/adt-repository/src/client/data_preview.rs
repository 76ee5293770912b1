use abap_adt_client::security::names;
use abap_adt_client::{TimeoutKind, XmlNode};
use tracing::{debug, instrument};

use super::{or_empty, parse_error};
use crate::error::{Error, ErrorKind, Result};
use crate::types::{Column, TableData};

const DDIC_PATH: &str = "/sap/bc/adt/datapreview/ddic";
const FREESTYLE_PATH: &str = "/sap/bc/adt/datapreview/freestyle";
const PREVIEW_ACCEPT: &str = "application/xml, application/vnd.sap.adt.datapreview.table.v1+xml";

impl super::RepositoryClient {
    /// First `max_rows` rows of a dictionary table or view.
    #[instrument(skip(self))]
    pub async fn table_contents(&self, table: &str, max_rows: u32) -> Result<TableData> {
        let table = names::normalize(table);
        if !names::is_valid_object_name(&table) {
            return Err(Error::new(ErrorKind::InvalidArgument(format!(
                "invalid table name: {table}"
            ))));
        }
        let request = self
            .conn()
            .post(DDIC_PATH)
            .query("rowNumber", max_rows.to_string())
            .query("ddicEntityName", table.as_str())
            .accept(PREVIEW_ACCEPT)
            .text(format!("SELECT * FROM {table}"))
            .timeout_kind(TimeoutKind::Long);
        self.preview(request).await
    }

    /// Run an ABAP SQL `SELECT` and return up to `max_rows` rows.
    #[instrument(skip(self, query))]
    pub async fn run_sql(&self, query: &str, max_rows: u32) -> Result<TableData> {
        if query.trim().is_empty() {
            return Err(Error::new(ErrorKind::InvalidArgument(
                "SQL query is empty".to_string(),
            )));
        }
        let request = self
            .conn()
            .post(FREESTYLE_PATH)
            .query("rowNumber", max_rows.to_string())
            .accept(PREVIEW_ACCEPT)
            .text(query.trim())
            .timeout_kind(TimeoutKind::Long);
        self.preview(request).await
    }

    async fn preview(&self, request: abap_adt_client::RequestBuilder) -> Result<TableData> {
        let root = or_empty(self.conn().send_xml(request).await?);
        let data = parse_table_data(&root)?;
        debug!(
            columns = data.columns.len(),
            rows = data.rows.len(),
            total = data.total_rows,
            "Data preview finished"
        );
        Ok(data)
    }
}

/// The backend sends data column by column; rows are rebuilt here.
pub(crate) fn parse_table_data(root: &XmlNode) -> Result<TableData> {
    let total_rows = match root.find_text("totalRows").map(str::trim) {
        Some(text) if !text.is_empty() => text
            .parse()
            .map_err(|_| parse_error(format!("invalid totalRows: {text}")))?,
        _ => 0,
    };

    let mut columns = Vec::new();
    let mut values: Vec<Vec<String>> = Vec::new();
    for column in root.find_all("columns") {
        let Some(metadata) = column.child("metadata") else {
            continue;
        };
        columns.push(Column {
            name: metadata.attr("name").unwrap_or_default().to_string(),
            description: metadata.attr("description").unwrap_or_default().to_string(),
            data_type: metadata.attr("type").unwrap_or_default().to_string(),
        });
        values.push(
            column
                .child("dataSet")
                .map(|set| set.children_named("data").map(|d| d.text().to_string()).collect())
                .unwrap_or_default(),
        );
    }

    let row_count = values.iter().map(Vec::len).max().unwrap_or(0);
    let rows = (0..row_count)
        .map(|row| {
            values
                .iter()
                .map(|column| column.get(row).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(TableData {
        columns,
        rows,
        total_rows,
    })
}
