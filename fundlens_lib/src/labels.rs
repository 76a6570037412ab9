//! Human-readable names for the codes stored in the database.
//!
//! Lookups fall back to the code itself, so new codes still render.

pub const STATE_NAMES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
    ("DC", "District of Columbia"),
    ("PR", "Puerto Rico"),
    ("VI", "Virgin Islands"),
    ("GU", "Guam"),
    ("AS", "American Samoa"),
    ("MP", "Northern Mariana Islands"),
];

pub const ENTITY_TYPE_LABELS: &[(&str, &str)] = &[
    ("IND", "Individual"),
    ("ORG", "Organization"),
    ("PAC", "Political Action Committee"),
    ("CAN", "Candidate"),
    ("COM", "Committee"),
    ("PTY", "Party"),
    ("CCM", "Candidate Committee"),
];

/// FEC committee type codes.
pub const COMMITTEE_TYPE_LABELS: &[(&str, &str)] = &[
    ("H", "House"),
    ("S", "Senate"),
    ("P", "Presidential"),
    ("X", "Non-Qualified"),
    ("Y", "Qualified"),
    ("Z", "National Party"),
    ("N", "PAC - Non-Qualified"),
    ("Q", "PAC - Qualified"),
    ("I", "Independent Expenditure"),
    ("O", "Super PAC"),
    ("U", "Single Candidate Independent Expenditure"),
    ("V", "PAC with Non-Contribution Account - Non-Qualified"),
    ("W", "PAC with Non-Contribution Account - Qualified"),
    ("D", "Party - Delegate"),
    ("E", "Party - National"),
];

pub const OFFICE_LABELS: &[(&str, &str)] = &[
    ("H", "U.S. House"),
    ("S", "U.S. Senate"),
    ("P", "President"),
];

fn lookup(table: &[(&str, &str)], code: &str) -> String {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| code.to_string())
}

pub fn state_name(code: &str) -> String {
    lookup(STATE_NAMES, code)
}

pub fn entity_type_label(code: &str) -> String {
    lookup(ENTITY_TYPE_LABELS, code)
}

pub fn committee_type_label(code: &str) -> String {
    lookup(COMMITTEE_TYPE_LABELS, code)
}

pub fn office_label(code: &str) -> String {
    lookup(OFFICE_LABELS, code)
}
