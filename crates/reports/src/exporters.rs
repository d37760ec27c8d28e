//! Report exporters - CSV and JSON
//!
//! Any [`ReportData`] can be rendered to either format.

/// Trait for exporting reports to different formats
pub trait ReportExporter {
    /// Export to the target format
    fn export(&self, report: &dyn ReportData) -> String;

    /// File extension for this format
    fn extension(&self) -> &'static str;

    /// MIME type for this format
    fn mime_type(&self) -> &'static str;
}

/// Trait for data that can be exported
pub trait ReportData {
    fn title(&self) -> &str;

    /// Column headers
    fn headers(&self) -> Vec<String>;

    /// Data rows, one Vec<String> per row
    fn rows(&self) -> Vec<Vec<String>>;

    /// Summary statistics as key-value pairs
    fn summary(&self) -> Vec<(String, String)>;
}

// ============================================================================
// CSV Exporter
// ============================================================================

/// CSV format exporter
pub struct CsvExporter {
    delimiter: char,
    include_header: bool,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_header(mut self) -> Self {
        self.include_header = false;
        self
    }

    fn escape(&self, field: &str) -> String {
        if field.contains(self.delimiter) || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn write_row(&self, output: &mut String, fields: &[String]) {
        let escaped: Vec<String> = fields.iter().map(|f| self.escape(f)).collect();
        output.push_str(&escaped.join(&self.delimiter.to_string()));
        output.push('\n');
    }
}

impl ReportExporter for CsvExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let mut output = String::new();
        if self.include_header {
            self.write_row(&mut output, &report.headers());
        }
        for row in report.rows() {
            self.write_row(&mut output, &row);
        }
        output
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn mime_type(&self) -> &'static str {
        "text/csv"
    }
}

// ============================================================================
// JSON Exporter
// ============================================================================

/// JSON format exporter
pub struct JsonExporter {
    pretty: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

impl ReportExporter for JsonExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let headers = report.headers();
        let rows: Vec<serde_json::Value> = report
            .rows()
            .iter()
            .map(|row| {
                let obj: serde_json::Map<String, serde_json::Value> = headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| {
                        let value = row.get(i).cloned().unwrap_or_default();
                        (header.clone(), serde_json::Value::String(value))
                    })
                    .collect();
                serde_json::Value::Object(obj)
            })
            .collect();

        let summary: serde_json::Map<String, serde_json::Value> = report
            .summary()
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();

        let output = serde_json::json!({
            "title": report.title(),
            "summary": summary,
            "data": rows,
        });

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_default()
        } else {
            serde_json::to_string(&output).unwrap_or_default()
        }
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture;

    impl ReportData for Fixture {
        fn title(&self) -> &str {
            "Fixture"
        }
        fn headers(&self) -> Vec<String> {
            vec!["Name".to_string(), "Count".to_string()]
        }
        fn rows(&self) -> Vec<Vec<String>> {
            vec![
                vec!["plain".to_string(), "1".to_string()],
                vec!["with, comma".to_string(), "2".to_string()],
            ]
        }
        fn summary(&self) -> Vec<(String, String)> {
            vec![("Total".to_string(), "3".to_string())]
        }
    }

    #[test]
    fn test_csv_escapes_delimiter() {
        let csv = CsvExporter::new().export(&Fixture);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Name,Count");
        assert_eq!(lines[2], "\"with, comma\",2");
    }

    #[test]
    fn test_csv_without_header() {
        let csv = CsvExporter::new().without_header().export(&Fixture);
        assert!(csv.starts_with("plain,1"));
    }

    #[test]
    fn test_json_has_title_summary_and_rows() {
        let json = JsonExporter::new().compact().export(&Fixture);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Fixture");
        assert_eq!(value["summary"]["Total"], "3");
        assert_eq!(value["data"][1]["Name"], "with, comma");
    }
}
