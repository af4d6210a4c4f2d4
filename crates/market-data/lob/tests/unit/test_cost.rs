//! Fill-cost scans
//!
//! Every strategy is checked against the same expectations; the chunked and
//! SIMD scans must stop at exactly the level where the scalar scan stops.

use crate::utils::book;
use common::Qty;
use lob::{Fill, LANES, LevelBook, ScanStrategy, cost_to_fill, fill};
use rstest::rstest;

#[rstest]
#[case::empty_book(&[], 10, 0)]
#[case::zero_shares(&[(10, 4), (12, 6)], 0, 0)]
#[case::two_levels(&[(10, 4), (12, 6)], 5, 52)]
#[case::replaced_level(&[(10, 4), (12, 10)], 8, 88)]
#[case::partial(&[(5, 2)], 10, 10)]
#[case::exact_depth(&[(1, 1), (2, 2), (3, 3)], 6, 14)]
fn cost_cases(#[case] levels: &[(u32, u32)], #[case] shares: u32, #[case] expected: u64) {
    let book = book(levels);
    assert_eq!(cost_to_fill(&book, Qty::new(shares)), expected);
    for strategy in ScanStrategy::ALL {
        assert_eq!(fill(&book, Qty::new(shares), strategy).cost, expected, "{strategy}");
    }
}

/// Ladder of `n` levels priced 1..=n with quantity 1 each
fn ladder(n: u32) -> LevelBook {
    let pairs: Vec<_> = (1..=n).map(|p| (p, 1)).collect();
    book(&pairs)
}

#[rstest]
fn early_exit_at_every_position(
    #[values(ScanStrategy::Scalar, ScanStrategy::Chunked, ScanStrategy::Simd)] strategy: ScanStrategy,
) {
    let n = (LANES * 5 + 3) as u32;
    let book = ladder(n);
    for shares in 0..=n + 2 {
        let bought = shares.min(n);
        let expected = u64::from(bought) * u64::from(bought + 1) / 2;
        let got = fill(&book, Qty::new(shares), strategy);
        assert_eq!(got.cost, expected, "{strategy} shares={shares}");
        assert_eq!(got.filled, u64::from(bought));
    }
}

#[test]
fn test_partial_fill_reports_unfilled() {
    let book = book(&[(7, 3), (9, 1)]);
    for strategy in ScanStrategy::ALL {
        let got = fill(&book, Qty::new(10), strategy);
        assert_eq!(
            got,
            Fill {
                cost: 30,
                filled: 4,
                requested: 10,
            }
        );
        assert!(got.is_partial());
        assert_eq!(got.unfilled(), 6);
    }
}

#[test]
fn test_large_chunk_not_priced_past_target() {
    // One cheap level then a chunk whose combined quantity exceeds the target;
    // the expensive tail must never enter the cost.
    let book = book(&[(1, 5), (2, 1), (3, 1), (4, 1), (1_000_000, 1_000), (2_000_000, 1_000)]);
    for strategy in ScanStrategy::ALL {
        assert_eq!(fill(&book, Qty::new(8), strategy).cost, 5 + 2 + 3 + 4, "{strategy}");
    }
}

#[test]
fn test_average_price() {
    let book = book(&[(10, 4), (12, 6)]);
    let got = fill(&book, Qty::new(5), ScanStrategy::Scalar);
    assert_eq!(got.average_price(), Some(52.0 / 5.0));
    assert_eq!(fill(&book, Qty::ZERO, ScanStrategy::Scalar).average_price(), None);
}
