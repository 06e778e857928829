use anyhow::Result;

use pulse_server::db::repositories::VoterRepository;
use pulse_server::db::Database;
use pulse_server::roster::{self, RosterError};

#[test]
fn parsed_roster_flows_into_the_voters_table() -> Result<()> {
    let db = Database::in_memory()?;
    db.initialize()?;
    let repo = VoterRepository::new(db.pool.clone());

    let csv = "phone_number,first_name,last_name,opted_in\n\
               +256700000001,Alice,Okello,yes\n\
               ,Ben,Ssentongo,no\n\
               +256700000003,Carol,Nambi,\n";
    let import = roster::parse_roster(csv.as_bytes())?;
    assert_eq!(import.voters.len(), 2);
    assert_eq!(import.skipped, 1);

    let inserted = repo.insert_batch(&import.voters)?;
    assert_eq!(inserted, 2);
    assert_eq!(repo.count()?, 2);
    Ok(())
}

#[test]
fn invalid_roster_never_reaches_the_database() -> Result<()> {
    let db = Database::in_memory()?;
    db.initialize()?;
    let repo = VoterRepository::new(db.pool.clone());

    let csv = "phone,name\n+256700000001,Alice\n";
    match roster::parse_roster(csv.as_bytes()) {
        Err(RosterError::MissingColumns(cols)) => {
            assert_eq!(cols.len(), 3);
        }
        other => panic!("expected MissingColumns, got {:?}", other.map(|i| i.voters.len())),
    }

    // Validation failed up front, so nothing was written
    assert_eq!(repo.count()?, 0);
    Ok(())
}

#[test]
fn template_round_trips_through_the_parser() -> Result<()> {
    let import = roster::parse_roster(roster::CSV_TEMPLATE.as_bytes())?;
    assert!(import.voters.is_empty());
    assert_eq!(import.skipped, 0);
    Ok(())
}
