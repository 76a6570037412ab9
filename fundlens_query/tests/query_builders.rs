use chrono::NaiveDate;
use fundlens_query::{
    contributor_stats_statement, CandidateOrdering, CandidateQuery, CandidateSortBy,
    CommitteeQuery, ContributionQuery, ContributorQuery, Query, Race, RaceQuery, Recipient,
    RecipientContributorsQuery, SortDirection, SqlParam, TopContributorsQuery,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn candidate_search_binds_like_pattern() {
    let stmt = CandidateQuery::default().with_search("warren").select_statement();
    assert!(stmt.sql.contains("c.name LIKE ?1"));
    assert_eq!(stmt.params, vec![SqlParam::Text("%warren%".into())]);
}

#[test]
fn candidate_has_fundraising_uses_positive_total() {
    let stmt = CandidateQuery::default()
        .with_has_fundraising(true)
        .count_statement();
    assert!(stmt.sql.contains("HAVING SUM(amount) > 0"));
}

#[test]
fn candidate_by_state_ranked_asc() {
    let stmt = CandidateQuery::default()
        .with_state("TX")
        .with_stats(true)
        .with_ordering(CandidateOrdering::Ranked)
        .with_sort_by(CandidateSortBy::TotalContributions)
        .with_sort_direction(SortDirection::Asc)
        .select_statement();
    assert!(stmt
        .sql
        .contains("ORDER BY s.total_contributions ASC NULLS LAST, c.name"));
}

#[test]
fn select_and_count_bind_same_params() {
    let q = CommitteeQuery::default()
        .with_state("MD")
        .with_committee_type("H")
        .with_is_active(true);
    assert_eq!(q.select_statement().params, q.count_statement().params);

    let q = ContributorQuery::default()
        .with_city("Baltimore")
        .with_occupation("engineer");
    assert_eq!(q.select_statement().params, q.count_statement().params);
}

#[test]
fn contribution_date_range_is_inclusive() {
    let stmt = ContributionQuery::default()
        .with_start_date(date(2024, 1, 1))
        .with_end_date(date(2024, 6, 30))
        .select_statement();
    assert!(stmt
        .sql
        .contains("x.contribution_date >= ?1 AND x.contribution_date <= ?2"));
}

#[test]
fn top_contributors_reads_view() {
    let stmt = TopContributorsQuery::default().with_state("CA").select_statement();
    assert!(stmt.sql.contains("FROM mv_contributor_stats mv"));
    assert!(stmt.sql.ends_with("LIMIT 10"));
}

#[test]
fn recipient_query_switches_path_on_dates() {
    let mv = RecipientContributorsQuery::new(Recipient::Committee(3));
    assert!(mv
        .select_statement()
        .sql
        .contains("FROM mv_contributor_committee_stats WHERE committee_id = ?1"));

    let live = RecipientContributorsQuery::new(Recipient::Candidate(3)).with_date_to(date(2024, 12, 31));
    let sql = live.select_statement().sql;
    assert!(sql.contains("x.recipient_candidate_id = ?1"));
    assert!(sql.contains("x.is_earmark_receipt = 0"));
    assert!(!sql.contains("mv_contributor_candidate_stats"));
}

#[test]
fn recipient_summary_ignores_contributor_filters() {
    let stmt = RecipientContributorsQuery::new(Recipient::Candidate(1))
        .with_state("MD")
        .with_search("smith")
        .summary_statement();
    assert!(!stmt.sql.contains("ct."));
    assert_eq!(stmt.params, vec![SqlParam::Integer(1)]);
}

#[test]
fn senate_race_filters_state() {
    let stmt = RaceQuery::new(Race::Senate { state: "PA".into() }).candidates_statement();
    assert!(stmt.sql.contains("WHERE c.office = ?1 AND c.state = ?2"));
    assert_eq!(stmt.params[0], SqlParam::Text("S".into()));
}

#[test]
fn page_size_is_clamped() {
    let stmt = ContributorQuery::default().with_page_size(5000).select_statement();
    assert!(stmt.sql.ends_with("LIMIT 1000 OFFSET 0"));
}

#[test]
fn contributor_stats_statement_snapshot() {
    insta::assert_snapshot!(
        contributor_stats_statement(9).sql,
        @"SELECT total_contributions, total_amount, unique_recipients, avg_contribution, first_contribution_date, last_contribution_date FROM mv_contributor_stats WHERE contributor_id = ?1"
    );
}

#[test]
fn top_contributors_count_snapshot() {
    insta::assert_snapshot!(
        TopContributorsQuery::default().with_state("CA").count_statement().sql,
        @"SELECT COUNT(*) FROM mv_contributor_stats mv JOIN contributor ct ON ct.id = mv.contributor_id WHERE ct.state = ?1"
    );
}
