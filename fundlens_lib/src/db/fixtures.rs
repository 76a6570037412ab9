//! Small seeded dataset shared by the db tests.
//!
//! Candidates: 1 Raskin (H MD-08), 2 Hogan (S MD), 3 Smith (H MD-05,
//! inactive, no money), 4 Doe (P), 5 Warner (S VA, no money), 6 Moore (GOV MD).
//! Contribution 102 is an earmark receipt and 107 a conduit memo row; both
//! are left out of the summary tables.

use super::Db;

pub(crate) fn open_test_db() -> Db {
    let db = Db::open_in_memory().expect("open in-memory db");
    db.init().expect("init schema");
    db
}

pub(crate) const SEED: &str = "
INSERT INTO candidate (id, name, office, state, district, party, is_active, fec_candidate_id) VALUES
    (1, 'RASKIN, JAMIE', 'H', 'MD', '08', 'DEM', 1, 'H6MD08457'),
    (2, 'HOGAN, LARRY', 'S', 'MD', NULL, 'REP', 1, 'S4MD00327'),
    (3, 'SMITH, JOHN', 'H', 'MD', '05', 'REP', 0, NULL),
    (4, 'DOE, JANE', 'P', NULL, NULL, 'DEM', 1, NULL),
    (5, 'WARNER, MARK', 'S', 'VA', NULL, 'DEM', 1, NULL),
    (6, 'MOORE, WES', 'GOV', 'MD', NULL, 'DEM', 1, NULL);

INSERT INTO committee (id, name, committee_type, party, state, city, is_active, candidate_id) VALUES
    (10, 'RASKIN FOR CONGRESS', 'H', 'DEM', 'MD', 'TAKOMA PARK', 1, 1),
    (11, 'HOGAN FOR SENATE', 'S', 'REP', 'MD', 'ANNAPOLIS', 1, 2),
    (12, 'ACTBLUE', 'V', NULL, 'MA', 'SOMERVILLE', 1, NULL),
    (13, 'SMITH FOR HOUSE', 'H', 'REP', 'MD', 'FREDERICK', 0, 3);

INSERT INTO contributor (id, name, first_name, last_name, city, state, zip, entity_type, employer, occupation, match_confidence) VALUES
    (1, 'ADAMS, ALICE', 'ALICE', 'ADAMS', 'BALTIMORE', 'MD', '21201', 'IND', 'ACME CORP', 'ENGINEER', 0.95),
    (2, 'BROWN, BOB', 'BOB', 'BROWN', 'RICHMOND', 'VA', '23220', 'IND', 'SELF', 'LAWYER', NULL),
    (3, 'TEACHERS PAC', NULL, NULL, 'WASHINGTON', 'DC', '20001', 'PAC', NULL, NULL, NULL),
    (4, 'CHEN, CAROL', 'CAROL', 'CHEN', 'BETHESDA', 'MD', '20814', 'IND', 'ACME CORP', 'TEACHER', NULL);

INSERT INTO contribution (id, contribution_date, amount, contribution_type, election_type, election_year, election_cycle,
                          contributor_id, recipient_committee_id, recipient_candidate_id, source_system,
                          source_transaction_id, memo_text, is_earmark_receipt) VALUES
    (100, '2024-01-15', 100.0, 'DIRECT', 'P2024', 2024, 2024, 1, 10, 1, 'FEC', 'T100', NULL, 0),
    (101, '2024-03-10', 250.0, 'DIRECT', 'G2024', 2024, 2024, 1, 10, 1, 'FEC', 'T101', NULL, 0),
    (102, '2024-02-01', 999.0, 'EARMARK', 'P2024', 2024, 2024, 1, 10, 1, 'FEC', 'T102E', 'EARMARKED THROUGH ACTBLUE', 1),
    (103, '2024-02-20', 500.0, 'DIRECT', 'P2024', 2024, 2024, 2, 10, 1, 'FEC', 'T103', NULL, 0),
    (104, '2024-05-05', 1000.0, 'PAC', 'G2024', 2024, 2024, 3, 11, 2, 'FEC', 'T104', NULL, 0),
    (105, '2024-06-01', 200.0, 'DIRECT', 'G2024', 2024, 2024, 1, 11, 2, 'MD_SBE', 'T105', NULL, 0),
    (106, '2023-11-11', 75.0, 'DIRECT', NULL, 2023, 2024, 2, 12, NULL, 'FEC', 'T106', NULL, 0),
    (107, '2024-04-04', 50.0, 'DIRECT', NULL, 2024, 2024, 2, 12, NULL, 'FEC', 'T107', 'CONDUIT TOTAL LISTED', 0);
";

pub(crate) fn open_seeded_db() -> Db {
    let db = open_test_db();
    db.conn.execute_batch(SEED).expect("seed fixtures");
    db
}

/// Seeded and with the summary tables built.
pub(crate) fn open_refreshed_db() -> Db {
    let mut db = open_seeded_db();
    db.refresh_materialized_views().expect("refresh views");
    db
}
