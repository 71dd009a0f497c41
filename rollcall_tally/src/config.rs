// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

pub type BillId = i64;
pub type LegislatorId = i64;
pub type VoteId = i64;

/// Name reported when a legislator id cannot be found in the roster.
pub const UNKNOWN: &str = "Unknown";

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Bill {
    pub id: BillId,
    pub title: String,
    /// The primary sponsor. It may not be present in the roster.
    pub sponsor_id: LegislatorId,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Legislator {
    pub id: LegislatorId,
    pub name: String,
}

/// A roll-call event on a single bill.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Vote {
    pub id: VoteId,
    pub bill_id: BillId,
}

/// The position of one legislator in one roll call.
///
/// The code is kept as it was read. It is only checked when the results
/// are tallied.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteResult {
    pub vote_id: VoteId,
    pub legislator_id: LegislatorId,
    pub vote_type: i64,
}

/// The recognized positions in a roll call.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum VoteType {
    /// Yea
    Support,
    /// Nay
    Oppose,
}

impl VoteType {
    pub fn from_code(code: i64) -> Option<VoteType> {
        match code {
            1 => Some(VoteType::Support),
            2 => Some(VoteType::Oppose),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            VoteType::Support => 1,
            VoteType::Oppose => 2,
        }
    }
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LegislatorSummary {
    pub id: LegislatorId,
    pub name: String,
    pub num_supported_bills: u64,
    pub num_opposed_bills: u64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct BillSummary {
    pub id: BillId,
    pub title: String,
    pub supporter_count: u64,
    pub opposer_count: u64,
    pub primary_sponsor: String,
}

/// Errors that prevent a report from being produced.
///
/// No partial report is ever returned alongside an error.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyErrors {
    /// A vote result carries a code that is neither support nor opposition.
    IncorrectVoteCode {
        vote_id: VoteId,
        legislator_id: LegislatorId,
        code: i64,
    },
    /// A vote points to a bill that is missing from the bill table.
    UnknownBill { bill_id: BillId },
}

impl Error for TallyErrors {}

impl Display for TallyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyErrors::IncorrectVoteCode {
                vote_id,
                legislator_id,
                code,
            } => write!(
                f,
                "The voting code `{}` (vote {}, legislator {}) is neither {} (support) nor {} (oppose)",
                code,
                vote_id,
                legislator_id,
                VoteType::Support.code(),
                VoteType::Oppose.code()
            ),
            TallyErrors::UnknownBill { bill_id } => {
                write!(f, "Bill {} is referenced by a vote but missing from the bills", bill_id)
            }
        }
    }
}
