use floor_split::split::summarize;
use floor_split::{
    CalculationMethod, DisplayOrder, DistributionConfig, Group, SplitReport, ValidationError,
    compute_split, compute_split_from_input,
};

const EPSILON: f64 = 1e-9;

fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

fn groups(counts: &[u32]) -> Vec<Group> {
    counts
        .iter()
        .enumerate()
        .map(|(idx, people)| Group::new(idx as u32 + 1, *people))
        .collect()
}

#[test]
fn per_person_splits_by_head_count() {
    let results = compute_split(100.0, &groups(&[3, 2]), CalculationMethod::PerPerson);
    assert_eq!(results.len(), 2);

    let first = &results[0];
    assert_eq!(first.group_id, 1);
    assert!(approx_equal(first.raw_amount, 60.0));
    assert_eq!(first.rounded_amount, 60.0);
    assert!(approx_equal(first.percentage_of_total, 60.0));
    assert!(approx_equal(first.amount_per_person, 20.0));

    let second = &results[1];
    assert!(approx_equal(second.raw_amount, 40.0));
    assert_eq!(second.rounded_amount, 40.0);
    assert!(approx_equal(second.percentage_of_total, 40.0));
    assert!(approx_equal(second.amount_per_person, 20.0));
}

#[test]
fn equal_gives_every_floor_the_same_rounded_share() {
    let results = compute_split(100.0, &groups(&[1, 1, 1]), CalculationMethod::Equal);
    assert_eq!(results.len(), 3);
    for result in &results {
        assert!(approx_equal(result.raw_amount, 100.0 / 3.0));
        assert_eq!(result.rounded_amount, 33.40);
        assert!((result.percentage_of_total - 33.33).abs() < 0.01);
    }
}

#[test]
fn equal_ignores_head_count_for_the_share_but_not_per_person() {
    let results = compute_split(90.0, &groups(&[1, 2, 0]), CalculationMethod::Equal);
    assert!(results.iter().all(|r| approx_equal(r.raw_amount, 30.0)));
    assert!(approx_equal(results[0].amount_per_person, 30.0));
    assert!(approx_equal(results[1].amount_per_person, 15.0));
    assert_eq!(results[2].amount_per_person, 0.0);
}

#[test]
fn empty_floor_gets_nothing_under_per_person() {
    let results = compute_split(50.0, &groups(&[0, 5]), CalculationMethod::PerPerson);
    assert_eq!(results[0].raw_amount, 0.0);
    assert_eq!(results[0].rounded_amount, 0.0);
    assert_eq!(results[0].amount_per_person, 0.0);
    assert_eq!(results[0].percentage_of_total, 0.0);
    assert!(approx_equal(results[1].raw_amount, 50.0));
}

#[test]
fn insufficient_input_yields_no_results() {
    for method in CalculationMethod::variants() {
        assert!(compute_split(100.0, &groups(&[0, 0, 0]), method).is_empty());
        assert!(compute_split(0.0, &groups(&[2, 2]), method).is_empty());
        assert!(compute_split(-5.0, &groups(&[2, 2]), method).is_empty());
        assert!(compute_split(f64::NAN, &groups(&[2, 2]), method).is_empty());
        assert!(compute_split(f64::INFINITY, &groups(&[2, 2]), method).is_empty());
        assert!(compute_split(100.0, &[], method).is_empty());
    }
}

#[test]
fn unparseable_amount_input_yields_no_results() {
    let floors = groups(&[2, 3]);
    for input in ["", ".", "abc", "12.345", "-4"] {
        assert!(
            compute_split_from_input(input, &floors, CalculationMethod::PerPerson).is_empty(),
            "{input:?}"
        );
    }
    let results = compute_split_from_input("15.21", &floors, CalculationMethod::PerPerson);
    assert_eq!(results.len(), 2);
}

#[test]
fn per_person_shares_reconcile_to_the_total() {
    let cases: &[(f64, &[u32])] = &[
        (100.0, &[3, 2]),
        (87.53, &[4, 1, 7]),
        (15.21, &[1, 1, 1, 1, 1, 1, 1]),
        (1234.56, &[10, 0, 3, 9, 2]),
        (0.01, &[3]),
    ];
    for (amount, counts) in cases {
        let results = compute_split(*amount, &groups(counts), CalculationMethod::PerPerson);
        let pct: f64 = results.iter().map(|r| r.percentage_of_total).sum();
        let raw: f64 = results.iter().map(|r| r.raw_amount).sum();
        assert!((pct - 100.0).abs() < 1e-6, "{amount} {counts:?}: {pct}");
        assert!((raw - amount).abs() < 1e-6, "{amount} {counts:?}: {raw}");
        for r in &results {
            assert!(r.rounded_amount + EPSILON >= r.raw_amount);
            assert!(r.difference() < 0.10);
        }
    }
}

#[test]
fn results_follow_floor_creation_order() {
    let config = DistributionConfig::from_counts(6, &[1, 2, 3]).unwrap();
    let results = compute_split(60.0, config.groups(), CalculationMethod::PerPerson);
    let ids: Vec<u32> = results.iter().map(|r| r.group_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn summary_surfaces_the_rounding_surplus() {
    let report =
        SplitReport::build(100.0, &groups(&[1, 1, 1]), CalculationMethod::PerPerson).unwrap();
    let summary = &report.summary;
    assert_eq!(summary.total_people, 3);
    assert!(approx_equal(summary.total_amount, 100.0));
    assert!((summary.total_rounded - 100.2).abs() < 1e-6);
    assert!((summary.rounding_difference - 0.2).abs() < 1e-6);
    assert!((summary.average_per_person - 100.0 / 3.0).abs() < 1e-9);
    assert!(summary.rounding_difference >= 0.0);
}

#[test]
fn summary_is_absent_without_results() {
    assert!(summarize(100.0, &[]).is_none());
    assert!(SplitReport::build(100.0, &groups(&[0]), CalculationMethod::Equal).is_none());
}

#[test]
fn reversed_display_order_flips_floors() {
    let report =
        SplitReport::build(30.0, &groups(&[1, 1, 1]), CalculationMethod::PerPerson).unwrap();
    let ids: Vec<u32> = report
        .ordered(DisplayOrder::Reversed)
        .iter()
        .map(|r| r.group_id)
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[test]
fn method_names_parse() {
    assert_eq!("per_person".parse::<CalculationMethod>(), Ok(CalculationMethod::PerPerson));
    assert_eq!("Equal".parse::<CalculationMethod>(), Ok(CalculationMethod::Equal));
    assert_eq!(
        "weighted".parse::<CalculationMethod>(),
        Err(ValidationError::UnknownMethod {
            input: "weighted".into()
        })
    );
    assert_eq!(CalculationMethod::default(), CalculationMethod::PerPerson);
}

#[test]
fn huge_head_counts_split_without_overflow() {
    let results = compute_split(
        100.0,
        &groups(&[3_000_000_000, 3_000_000_000]),
        CalculationMethod::PerPerson,
    );
    assert_eq!(results.len(), 2);
    for result in &results {
        assert!((result.raw_amount - 50.0).abs() < 1e-6);
        assert!((result.percentage_of_total - 50.0).abs() < 1e-6);
    }

    let summary = summarize(100.0, &results).unwrap();
    assert_eq!(summary.total_people, 6_000_000_000);
}
