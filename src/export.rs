//! CSV and JSON serialization of result tables.

use std::io::Write;

use crate::models::ResultTable;

/// CSV header row; column labels match the original export format.
pub const CSV_HEADER: &str = "Requête,Question PAA,Réponse,Source";

/// Serialize the table as UTF-8 CSV with a header row.
pub fn to_csv(table: &ResultTable) -> Vec<u8> {
    let mut output = Vec::new();
    writeln!(output, "{}", CSV_HEADER).ok();

    for row in &table.rows {
        writeln!(
            output,
            "{},{},{},{}",
            escape_csv(&row.query),
            escape_csv(&row.question),
            escape_csv(&row.answer),
            escape_csv(&row.source)
        )
        .ok();
    }

    output
}

/// Serialize the table rows as a pretty-printed JSON array.
pub fn to_json(table: &ResultTable) -> Vec<u8> {
    serde_json::to_vec_pretty(&table.rows).unwrap_or_default()
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
