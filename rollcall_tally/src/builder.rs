pub use crate::config::*;

/// A builder for assembling the four tables in memory.
///
/// It is mostly useful for tests and for small datasets that do not come from files.
///
/// ```
/// use rollcall_tally::builder::Builder;
/// # use rollcall_tally::TallyErrors;
///
/// let data = Builder::new()
///     .legislator(1, "Alice")
///     .bill(10, "Act A", 1)
///     .vote(100, 10)
///     .vote_result(100, 1, 1)
///     .build();
///
/// let report = data.legislator_report()?;
/// assert_eq!(report[0].num_supported_bills, 1);
///
/// # Ok::<(), TallyErrors>(())
/// ```
#[derive(Default)]
pub struct Builder {
    pub(crate) _bills: Vec<Bill>,
    pub(crate) _legislators: Vec<Legislator>,
    pub(crate) _votes: Vec<Vote>,
    pub(crate) _vote_results: Vec<VoteResult>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    pub fn legislator(mut self, id: LegislatorId, name: &str) -> Builder {
        self._legislators.push(Legislator {
            id,
            name: name.to_string(),
        });
        self
    }

    pub fn bill(mut self, id: BillId, title: &str, sponsor_id: LegislatorId) -> Builder {
        self._bills.push(Bill {
            id,
            title: title.to_string(),
            sponsor_id,
        });
        self
    }

    pub fn vote(mut self, id: VoteId, bill_id: BillId) -> Builder {
        self._votes.push(Vote { id, bill_id });
        self
    }

    /// Adds the position of a legislator on a vote.
    ///
    /// The code is not checked here, so that invalid inputs can be built too.
    pub fn vote_result(
        mut self,
        vote_id: VoteId,
        legislator_id: LegislatorId,
        vote_type: i64,
    ) -> Builder {
        self._vote_results.push(VoteResult {
            vote_id,
            legislator_id,
            vote_type,
        });
        self
    }

    pub fn build(self) -> Dataset {
        Dataset {
            bills: self._bills,
            legislators: self._legislators,
            votes: self._votes,
            vote_results: self._vote_results,
        }
    }
}

/// All four tables, fully loaded.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Dataset {
    pub bills: Vec<Bill>,
    pub legislators: Vec<Legislator>,
    pub votes: Vec<Vote>,
    pub vote_results: Vec<VoteResult>,
}

impl Dataset {
    pub fn legislator_report(&self) -> Result<Vec<LegislatorSummary>, TallyErrors> {
        crate::legislator_report(&self.votes, &self.vote_results, &self.legislators)
    }

    pub fn bill_report(&self) -> Result<Vec<BillSummary>, TallyErrors> {
        crate::bill_report(&self.votes, &self.bills, &self.vote_results, &self.legislators)
    }
}
