// Primitives shared by the table readers.

use std::collections::HashMap;

use crate::report::*;
use snafu::prelude::*;

pub const BILL_COLUMNS: [&str; 3] = ["id", "title", "sponsor_id"];
pub const LEGISLATOR_COLUMNS: [&str; 2] = ["id", "name"];
pub const VOTE_COLUMNS: [&str; 2] = ["id", "bill_id"];
pub const VOTE_RESULT_COLUMNS: [&str; 3] = ["vote_id", "legislator_id", "vote_type"];

/// Fails if the input does not exist, so that a missing table is reported as such
/// rather than as a generic opening error.
pub fn ensure_exists(path: &Path) -> ReportResult<()> {
    ensure!(
        path.exists(),
        InputSourceMissingSnafu {
            path: path.display().to_string()
        }
    );
    Ok(())
}

/// The position of each column, as found in the first row.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    path: String,
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new<S: AsRef<str>>(path: &str, header: &[S]) -> HeaderIndex {
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (idx, name) in header.iter().enumerate() {
            // If a column is repeated, the first one is used.
            positions
                .entry(name.as_ref().trim().to_string())
                .or_insert(idx);
        }
        debug!("HeaderIndex: {:?}: {:?}", path, positions);
        HeaderIndex {
            path: path.to_string(),
            positions,
        }
    }

    pub fn require(&self, columns: &[&str]) -> ReportResult<()> {
        for c in columns {
            self.position(c)?;
        }
        Ok(())
    }

    pub fn position(&self, column: &str) -> ReportResult<usize> {
        self.positions
            .get(column)
            .copied()
            .context(MissingColumnSnafu {
                path: self.path.as_str(),
                column,
            })
    }
}

/// A row of a table, whatever the storage.
pub trait RawRow {
    fn int_field(&self, field: &str) -> ReportResult<i64>;
    fn text_field(&self, field: &str) -> ReportResult<String>;
}

pub fn parse_int(value: &str, path: &str, lineno: usize, field: &str) -> ReportResult<i64> {
    value.trim().parse::<i64>().ok().context(MalformedFieldSnafu {
        path,
        lineno,
        field,
        value,
    })
}

pub fn read_bill(row: &dyn RawRow) -> ReportResult<Bill> {
    Ok(Bill {
        id: row.int_field("id")?,
        title: row.text_field("title")?,
        sponsor_id: row.int_field("sponsor_id")?,
    })
}

pub fn read_legislator(row: &dyn RawRow) -> ReportResult<Legislator> {
    Ok(Legislator {
        id: row.int_field("id")?,
        name: row.text_field("name")?,
    })
}

pub fn read_vote(row: &dyn RawRow) -> ReportResult<Vote> {
    Ok(Vote {
        id: row.int_field("id")?,
        bill_id: row.int_field("bill_id")?,
    })
}

pub fn read_vote_result(row: &dyn RawRow) -> ReportResult<VoteResult> {
    Ok(VoteResult {
        vote_id: row.int_field("vote_id")?,
        legislator_id: row.int_field("legislator_id")?,
        vote_type: row.int_field("vote_type")?,
    })
}
