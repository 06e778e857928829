//! Voter roster CSV parsing and validation.
//!
//! The upload template is a fixed header row; uploaded files must contain at
//! least those columns. Validation runs to completion before any database
//! write so a bad file never results in a partial import.

use csv::ReaderBuilder;
use thiserror::Error;

use pulse_types::VoterRecord;

/// Columns every uploaded roster must contain. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 3] = ["phone_number", "first_name", "last_name"];

/// Downloadable upload template.
pub const CSV_TEMPLATE: &str = "phone_number,first_name,last_name\n";

/// Recognized optional column carrying the opt-in flag.
const OPT_IN_COLUMN: &str = "opted_in";

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("failed to parse CSV: {0}")]
    Parse(#[from] csv::Error),
}

/// Outcome of a successful parse: the valid rows plus how many were
/// dropped for a missing phone number.
#[derive(Debug)]
pub struct RosterImport {
    pub voters: Vec<VoterRecord>,
    pub skipped: usize,
}

/// Parse and validate an uploaded roster.
///
/// Column order is free; lookup is by header name. Rows with an empty
/// `phone_number` are dropped silently (counted in `skipped`), matching
/// the upload contract.
pub fn parse_roster(data: &[u8]) -> Result<RosterImport, RosterError> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let column_index = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| column_index(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(RosterError::MissingColumns(missing));
    }

    // Presence checked above
    let phone_idx = column_index("phone_number").unwrap();
    let first_idx = column_index("first_name").unwrap();
    let last_idx = column_index("last_name").unwrap();
    let opt_in_idx = column_index(OPT_IN_COLUMN);

    let mut voters = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let phone_number = field(phone_idx);
        if phone_number.is_empty() {
            skipped += 1;
            continue;
        }

        voters.push(VoterRecord {
            phone_number: phone_number.to_string(),
            first_name: field(first_idx).to_string(),
            last_name: field(last_idx).to_string(),
            opted_in: opt_in_idx.and_then(|idx| parse_opt_in(field(idx))),
        });
    }

    Ok(RosterImport { voters, skipped })
}

fn parse_opt_in(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_template_shaped_file() {
        let csv = "phone_number,first_name,last_name\n\
                   +256700000001,Alice,Okello\n\
                   +256700000002,Ben,Ssentongo\n";
        let import = parse_roster(csv.as_bytes()).expect("parse failed");
        assert_eq!(import.voters.len(), 2);
        assert_eq!(import.skipped, 0);
        assert_eq!(import.voters[0].phone_number, "+256700000001");
        assert_eq!(import.voters[1].last_name, "Ssentongo");
    }

    #[test]
    fn missing_last_name_reports_exactly_that_column() {
        let csv = "phone_number,first_name\n+256700000001,Alice\n";
        match parse_roster(csv.as_bytes()) {
            Err(RosterError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["last_name".to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other.map(|i| i.voters)),
        }
    }

    #[test]
    fn rows_without_phone_number_are_dropped_silently() {
        let csv = "phone_number,first_name,last_name\n\
                   +256700000001,Alice,Okello\n\
                   ,Ben,Ssentongo\n\
                   +256700000003,Carol,Nambi\n";
        let import = parse_roster(csv.as_bytes()).expect("parse failed");
        assert_eq!(import.voters.len(), 2);
        assert_eq!(import.skipped, 1);
        assert!(import.voters.iter().all(|v| v.first_name != "Ben"));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = "district,phone_number,first_name,last_name,notes\n\
                   Kampala,+256700000001,Alice,Okello,vip\n";
        let import = parse_roster(csv.as_bytes()).expect("parse failed");
        assert_eq!(import.voters.len(), 1);
        assert_eq!(import.voters[0].first_name, "Alice");
    }

    #[test]
    fn opt_in_column_is_recognized() {
        let csv = "phone_number,first_name,last_name,opted_in\n\
                   +256700000001,Alice,Okello,yes\n\
                   +256700000002,Ben,Ssentongo,0\n\
                   +256700000003,Carol,Nambi,maybe\n";
        let import = parse_roster(csv.as_bytes()).expect("parse failed");
        assert_eq!(import.voters[0].opted_in, Some(true));
        assert_eq!(import.voters[1].opted_in, Some(false));
        assert_eq!(import.voters[2].opted_in, None);
    }

    #[test]
    fn header_only_file_yields_no_rows() {
        let import = parse_roster(CSV_TEMPLATE.as_bytes()).expect("parse failed");
        assert!(import.voters.is_empty());
        assert_eq!(import.skipped, 0);
    }

    #[test]
    fn empty_file_reports_all_columns_missing() {
        match parse_roster(b"") {
            Err(RosterError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["phone_number", "first_name", "last_name"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other.map(|i| i.voters)),
        }
    }
}
