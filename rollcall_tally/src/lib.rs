/*!
Support and opposition tallies for legislative roll calls.

The two entry points are [legislator_report] and [bill_report]. Both take the
tables fully loaded in memory and return one summary per legislator (resp. bill)
that received at least one counted vote, in the order in which they first appear
in the vote results.

```
use rollcall_tally::*;

let legislators = vec![Legislator { id: 1, name: "Alice".to_string() }];
let bills = vec![Bill { id: 10, title: "Act A".to_string(), sponsor_id: 1 }];
let votes = vec![Vote { id: 100, bill_id: 10 }];
let results = vec![VoteResult { vote_id: 100, legislator_id: 1, vote_type: 1 }];

let per_bill = bill_report(&votes, &bills, &results, &legislators)?;
assert_eq!(per_bill[0].supporter_count, 1);
assert_eq!(per_bill[0].primary_sponsor, "Alice");
# Ok::<(), TallyErrors>(())
```
*/
pub mod builder;
mod config;
pub mod manual;
use log::{debug, info};

use std::{
    collections::HashMap,
    hash::Hash,
    ops::{Add, AddAssign},
};

pub use crate::config::*;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
    const ONE: VoteCount = VoteCount(1);
}

impl std::iter::Sum for VoteCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        VoteCount(iter.map(|vc| vc.0).sum())
    }
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

impl Add for VoteCount {
    type Output = VoteCount;
    fn add(self: VoteCount, rhs: VoteCount) -> VoteCount {
        VoteCount(self.0 + rhs.0)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
struct Counts {
    support: VoteCount,
    oppose: VoteCount,
}

impl Counts {
    const EMPTY: Counts = Counts {
        support: VoteCount::EMPTY,
        oppose: VoteCount::EMPTY,
    };

    fn record(&mut self, vote_type: VoteType) {
        match vote_type {
            VoteType::Support => self.support += VoteCount::ONE,
            VoteType::Oppose => self.oppose += VoteCount::ONE,
        }
    }

    fn total(&self) -> VoteCount {
        self.support + self.oppose
    }
}

/// Running counts per key.
///
/// The keys are stored in an arena in the order in which they were first seen,
/// the map only points into the arena.
struct Tally<K> {
    arena: Vec<(K, Counts)>,
    positions: HashMap<K, usize>,
}

impl<K: Eq + Hash + Copy> Tally<K> {
    fn new() -> Tally<K> {
        Tally {
            arena: Vec::new(),
            positions: HashMap::new(),
        }
    }

    fn entry(&mut self, key: K) -> &mut Counts {
        let arena = &mut self.arena;
        let idx = *self.positions.entry(key).or_insert_with(|| {
            arena.push((key, Counts::EMPTY));
            arena.len() - 1
        });
        &mut self.arena[idx].1
    }

    fn total(&self) -> VoteCount {
        self.arena.iter().map(|(_, c)| c.total()).sum()
    }

    fn into_ordered(self) -> Vec<(K, Counts)> {
        self.arena
    }
}

fn classify(vr: &VoteResult) -> Result<VoteType, TallyErrors> {
    VoteType::from_code(vr.vote_type).ok_or(TallyErrors::IncorrectVoteCode {
        vote_id: vr.vote_id,
        legislator_id: vr.legislator_id,
        code: vr.vote_type,
    })
}

// Duplicate ids: the last row wins.
fn legislator_names(legislators: &[Legislator]) -> HashMap<LegislatorId, &str> {
    legislators
        .iter()
        .map(|l| (l.id, l.name.as_str()))
        .collect()
}

fn name_or_unknown(names: &HashMap<LegislatorId, &str>, id: LegislatorId) -> String {
    names.get(&id).copied().unwrap_or(UNKNOWN).to_string()
}

/// Counts, for each legislator, the bills they supported and opposed.
///
/// Arguments:
/// * `votes` the roll calls. They are not needed to count per legislator: every
/// vote result is counted, even if its roll call is unknown.
/// * `vote_results` the positions to count
/// * `legislators` the roster, used to resolve the names. Legislators missing from
/// the roster are reported as [UNKNOWN].
///
/// A single vote result with an unrecognized code fails the whole report.
pub fn legislator_report(
    _votes: &[Vote],
    vote_results: &[VoteResult],
    legislators: &[Legislator],
) -> Result<Vec<LegislatorSummary>, TallyErrors> {
    info!(
        "legislator_report: processing {:?} vote results, {:?} legislators",
        vote_results.len(),
        legislators.len()
    );
    let names = legislator_names(legislators);

    let mut tally: Tally<LegislatorId> = Tally::new();
    for vr in vote_results.iter() {
        let vote_type = classify(vr)?;
        tally.entry(vr.legislator_id).record(vote_type);
    }
    debug!(
        "legislator_report: counted {:?} positions",
        tally.total().0
    );

    let res: Vec<LegislatorSummary> = tally
        .into_ordered()
        .into_iter()
        .map(|(lid, counts)| LegislatorSummary {
            id: lid,
            name: name_or_unknown(&names, lid),
            num_supported_bills: counts.support.0,
            num_opposed_bills: counts.oppose.0,
        })
        .collect();
    info!("legislator_report: {:?} legislators", res.len());
    Ok(res)
}

/// Counts, for each bill, its supporters and opposers.
///
/// Vote results are joined to their bill through the roll calls. The results
/// whose roll call is unknown are skipped. A roll call that points to a bill
/// missing from `bills` is an error ([TallyErrors::UnknownBill]).
///
/// The primary sponsor is resolved through `legislators`, and reported as
/// [UNKNOWN] if absent.
pub fn bill_report(
    votes: &[Vote],
    bills: &[Bill],
    vote_results: &[VoteResult],
    legislators: &[Legislator],
) -> Result<Vec<BillSummary>, TallyErrors> {
    info!(
        "bill_report: processing {:?} vote results, {:?} votes, {:?} bills",
        vote_results.len(),
        votes.len(),
        bills.len()
    );
    let bill_by_vote: HashMap<VoteId, BillId> = votes.iter().map(|v| (v.id, v.bill_id)).collect();
    let bills_by_id: HashMap<BillId, &Bill> = bills.iter().map(|b| (b.id, b)).collect();
    let names = legislator_names(legislators);

    let mut tally: Tally<BillId> = Tally::new();
    let mut skipped: usize = 0;
    for vr in vote_results.iter() {
        let bill_id = match bill_by_vote.get(&vr.vote_id) {
            Some(bid) => *bid,
            None => {
                debug!(
                    "bill_report: skipping result of legislator {:?}: unknown vote {:?}",
                    vr.legislator_id, vr.vote_id
                );
                skipped += 1;
                continue;
            }
        };
        let vote_type = classify(vr)?;
        tally.entry(bill_id).record(vote_type);
    }
    debug!(
        "bill_report: counted {:?} positions, skipped {:?}",
        tally.total().0,
        skipped
    );

    let mut res: Vec<BillSummary> = Vec::new();
    for (bill_id, counts) in tally.into_ordered() {
        let bill = bills_by_id
            .get(&bill_id)
            .ok_or(TallyErrors::UnknownBill { bill_id })?;
        res.push(BillSummary {
            id: bill.id,
            title: bill.title.clone(),
            supporter_count: counts.support.0,
            opposer_count: counts.oppose.0,
            primary_sponsor: name_or_unknown(&names, bill.sponsor_id),
        });
    }
    info!("bill_report: {:?} bills", res.len());
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::builder::{Builder, Dataset};
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn alice_and_bob() -> Builder {
        Builder::new()
            .legislator(1, "Alice")
            .legislator(2, "Bob")
            .bill(10, "Act A", 1)
            .vote(100, 10)
    }

    fn leg(id: i64, name: &str, sup: u64, opp: u64) -> LegislatorSummary {
        LegislatorSummary {
            id,
            name: name.to_string(),
            num_supported_bills: sup,
            num_opposed_bills: opp,
        }
    }

    #[test]
    fn simple_example() {
        init();
        let data = alice_and_bob()
            .vote_result(100, 1, 1)
            .vote_result(100, 2, 2)
            .build();

        assert_eq!(
            data.legislator_report(),
            Ok(vec![leg(1, "Alice", 1, 0), leg(2, "Bob", 0, 1)])
        );
        assert_eq!(
            data.bill_report(),
            Ok(vec![BillSummary {
                id: 10,
                title: "Act A".to_string(),
                supporter_count: 1,
                opposer_count: 1,
                primary_sponsor: "Alice".to_string(),
            }])
        );
    }

    #[test]
    fn unknown_vote_counted_for_legislator_only() {
        init();
        let data = alice_and_bob().vote_result(999, 1, 1).build();

        assert_eq!(data.legislator_report(), Ok(vec![leg(1, "Alice", 1, 0)]));
        assert_eq!(data.bill_report(), Ok(vec![]));
    }

    #[test]
    fn incorrect_code_fails_both_reports() {
        init();
        let data = alice_and_bob()
            .vote_result(100, 2, 1)
            .vote_result(100, 1, 3)
            .build();
        let expected = TallyErrors::IncorrectVoteCode {
            vote_id: 100,
            legislator_id: 1,
            code: 3,
        };
        assert_eq!(data.legislator_report(), Err(expected.clone()));
        assert_eq!(data.bill_report(), Err(expected));
    }

    #[test]
    fn incorrect_code_on_unknown_vote_only_fails_legislators() {
        // The bill report never classifies results it cannot join.
        init();
        let data = alice_and_bob().vote_result(999, 1, 0).build();
        assert!(matches!(
            data.legislator_report(),
            Err(TallyErrors::IncorrectVoteCode { code: 0, .. })
        ));
        assert_eq!(data.bill_report(), Ok(vec![]));
    }

    #[test]
    fn unknown_names() {
        init();
        let data = Builder::new()
            .legislator(1, "Alice")
            .bill(10, "Act A", 42)
            .vote(100, 10)
            .vote_result(100, 7, 2)
            .build();

        assert_eq!(data.legislator_report(), Ok(vec![leg(7, UNKNOWN, 0, 1)]));
        let bills = data.bill_report().unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].primary_sponsor, UNKNOWN);
    }

    #[test]
    fn missing_bill_is_an_error() {
        init();
        let data = Builder::new()
            .legislator(1, "Alice")
            .vote(100, 10)
            .vote_result(100, 1, 1)
            .build();
        assert_eq!(
            data.bill_report(),
            Err(TallyErrors::UnknownBill { bill_id: 10 })
        );
        // The legislator report does not need the bills.
        assert_eq!(data.legislator_report(), Ok(vec![leg(1, "Alice", 1, 0)]));
    }

    #[test]
    fn first_encounter_order() {
        init();
        let data = Builder::new()
            .legislator(1, "Alice")
            .legislator(2, "Bob")
            .legislator(3, "Clara")
            .bill(10, "Act A", 1)
            .bill(20, "Act B", 2)
            .vote(100, 10)
            .vote(200, 20)
            .vote_result(200, 3, 1)
            .vote_result(100, 1, 2)
            .vote_result(200, 1, 1)
            .vote_result(100, 3, 1)
            .build();

        let legs = data.legislator_report().unwrap();
        let ids: Vec<i64> = legs.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(legs[0], leg(3, "Clara", 2, 0));
        assert_eq!(legs[1], leg(1, "Alice", 1, 1));

        let bills = data.bill_report().unwrap();
        let ids: Vec<i64> = bills.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![20, 10]);
        assert_eq!((bills[0].supporter_count, bills[0].opposer_count), (2, 0));
        assert_eq!((bills[1].supporter_count, bills[1].opposer_count), (1, 1));
        assert_eq!(bills[0].primary_sponsor, "Bob");
    }

    #[test]
    fn legislator_counts_partition_results() {
        init();
        let mut builder = alice_and_bob().vote(101, 10).legislator(3, "Clara");
        let codes = [1, 2, 2, 1, 1, 2, 1, 1, 2, 2, 2];
        for (idx, code) in codes.iter().enumerate() {
            let lid = (idx % 4) as i64 + 1;
            let vid = if idx % 2 == 0 { 100 } else { 101 };
            builder = builder.vote_result(vid, lid, *code);
        }
        let data = builder.build();

        let legs = data.legislator_report().unwrap();
        let total: u64 = legs
            .iter()
            .map(|l| l.num_supported_bills + l.num_opposed_bills)
            .sum();
        assert_eq!(total as usize, data.vote_results.len());
        assert_eq!(legs.len(), 4);
        assert_eq!(legs[3].name, UNKNOWN);

        let bills = data.bill_report().unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(
            (bills[0].supporter_count + bills[0].opposer_count) as usize,
            codes.len()
        );
    }

    #[test]
    fn reports_are_idempotent() {
        init();
        let data = alice_and_bob()
            .vote_result(100, 2, 2)
            .vote_result(100, 1, 1)
            .vote_result(999, 5, 1)
            .build();
        assert_eq!(data.legislator_report(), data.legislator_report());
        assert_eq!(data.bill_report(), data.bill_report());
    }

    #[test]
    fn empty_results() {
        init();
        let data: Dataset = alice_and_bob().build();
        assert_eq!(data.legislator_report(), Ok(vec![]));
        assert_eq!(data.bill_report(), Ok(vec![]));
    }

    #[test]
    fn duplicate_ids_last_wins() {
        init();
        let data = Builder::new()
            .legislator(1, "Alice")
            .legislator(1, "Alicia")
            .bill(10, "Act A", 1)
            .bill(10, "Act A (amended)", 1)
            .vote(100, 10)
            .vote_result(100, 1, 1)
            .build();
        assert_eq!(data.legislator_report(), Ok(vec![leg(1, "Alicia", 1, 0)]));
        let bills = data.bill_report().unwrap();
        assert_eq!(bills[0].title, "Act A (amended)");
        assert_eq!(bills[0].primary_sponsor, "Alicia");
    }

    #[test]
    fn vote_type_codes() {
        assert_eq!(VoteType::from_code(1), Some(VoteType::Support));
        assert_eq!(VoteType::from_code(2), Some(VoteType::Oppose));
        assert_eq!(VoteType::from_code(0), None);
        assert_eq!(VoteType::from_code(-1), None);
        assert_eq!(VoteType::Oppose.code(), 2);
    }

    #[test]
    fn incorrect_code_message() {
        let e = TallyErrors::IncorrectVoteCode {
            vote_id: 100,
            legislator_id: 1,
            code: 3,
        };
        assert_eq!(
            e.to_string(),
            "The voting code `3` (vote 100, legislator 1) is neither 1 (support) nor 2 (oppose)"
        );
    }
}
