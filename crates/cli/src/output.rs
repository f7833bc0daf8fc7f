use crate::error::CliError;
use clap::ValueEnum;
use model::{
    core::value::Value,
    records::{display::DisplayOptions, table::TableData},
};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text, elided to the display options
    Table,
    /// `{"columns": [...], "rows": [[...], ...]}`
    Json,
    /// Header row then one record per row; NULL is an empty field
    Csv,
}

pub fn render(
    table: &TableData,
    format: OutputFormat,
    options: &DisplayOptions,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(table.render(options)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&table.to_json())?),
        OutputFormat::Csv => render_csv(table),
    }
}

fn render_csv(table: &TableData) -> Result<String, CliError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(csv_field))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| CliError::Io(err.into_error()))?;
    String::from_utf8(bytes).map_err(|err| CliError::Config(format!("CSV is not UTF-8: {err}")))
}

fn csv_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub async fn write_output(content: &str, path: Option<&Path>) -> Result<(), CliError> {
    match path {
        Some(path) => {
            tokio::fs::write(path, content).await?;
        }
        None => println!("{content}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableData {
        TableData::new(
            vec!["id".into(), "note".into()],
            vec![
                vec![Value::Int(1), Value::String("plain".into())],
                vec![Value::Int(2), Value::String("has, comma".into())],
                vec![Value::Int(3), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn csv_quotes_and_blanks_nulls() {
        let csv = render(&sample(), OutputFormat::Csv, &DisplayOptions::default()).unwrap();
        assert_eq!(csv, "id,note\n1,plain\n2,\"has, comma\"\n3,\n");
    }

    #[test]
    fn json_keeps_columns_and_nulls() {
        let json = render(&sample(), OutputFormat::Json, &DisplayOptions::default()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["columns"], serde_json::json!(["id", "note"]));
        assert_eq!(parsed["rows"][2], serde_json::json!([3, null]));
    }

    #[test]
    fn table_format_uses_display_options() {
        let text = render(&sample(), OutputFormat::Table, &DisplayOptions::default()).unwrap();
        assert_eq!(text, sample().render(&DisplayOptions::default()));
        assert!(text.contains("has, comma"));
    }

    #[tokio::test]
    async fn writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.csv");
        write_output("id\n1\n", Some(&path)).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "id\n1\n");
    }
}
