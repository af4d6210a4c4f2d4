//! Synthetic feeds driven through the engine

use depth_cost::{SynthConfig, generate};
use lob::{RunConfig, ScanStrategy, run_with};
use rstest::rstest;

#[rstest]
#[case::defaults(SynthConfig::default().with_batches(500))]
#[case::narrow_window(SynthConfig { price_levels: 8, ..SynthConfig::default().with_batches(500) })]
#[case::delete_heavy(SynthConfig { delete_ratio: 0.6, ..SynthConfig::default().with_batches(500) })]
#[case::wide_batches(SynthConfig { max_delta_levels: 400, ..SynthConfig::default().with_batches(50) })]
fn generated_feeds_pass_checked_runs(#[case] config: SynthConfig) {
    let batches = generate(&config);
    let mut checksums = ScanStrategy::ALL.into_iter().map(|scan| {
        let engine = RunConfig { scan, ..RunConfig::checked() };
        run_with(engine, &batches).map(|(result, _)| result.checksum)
    });

    let first = checksums.next().unwrap().unwrap();
    for checksum in checksums {
        assert_eq!(checksum.unwrap(), first);
    }
}

#[test]
fn test_seed_changes_checksum() {
    let a = generate(&SynthConfig::default().with_batches(200).with_seed(1));
    let b = generate(&SynthConfig::default().with_batches(200).with_seed(2));
    assert_ne!(lob::run(&a), lob::run(&b));
}

#[test]
fn test_price_floor_shifts_prices() {
    let config = SynthConfig { price_floor: 5_000, ..SynthConfig::default().with_batches(100) };
    let lowest = generate(&config)
        .iter()
        .flat_map(|b| b.levels.iter().map(|l| l.price.as_u32()))
        .min();
    assert!(lowest.is_none_or(|p| p >= 5_000));
}
