use atlas_packer_core::search::{BinarySearch, next_pow2, round_mod4};

/// Drives a search to exhaustion against a monotone "fits" predicate and
/// returns the smallest passing candidate seen.
fn drive(search: &mut BinarySearch, fits_at: impl Fn(u32) -> bool) -> (Option<u32>, Vec<u32>) {
    let mut best: Option<u32> = None;
    let mut seen = Vec::new();
    let mut candidate = Some(search.reset());
    while let Some(c) = candidate {
        seen.push(c);
        let fits = fits_at(c);
        if fits {
            best = Some(best.map_or(c, |b: u32| b.min(c)));
        }
        candidate = search.next(fits);
    }
    (best, seen)
}

#[test]
fn plain_search_finds_smallest_passing_size() {
    let mut search = BinarySearch::new(1, 100, 0, false, false);
    let (best, _) = drive(&mut search, |c| c >= 37);
    assert_eq!(best, Some(37));
}

#[test]
fn fuzziness_trades_tightness_for_fewer_probes() {
    let mut exact = BinarySearch::new(1, 1000, 0, false, false);
    let (_, seen_exact) = drive(&mut exact, |c| c >= 537);

    let mut fuzzy = BinarySearch::new(1, 1000, 25, false, false);
    let (best, seen_fuzzy) = drive(&mut fuzzy, |c| c >= 537);

    assert!(seen_fuzzy.len() < seen_exact.len());
    let best = best.expect("a passing size must be found");
    assert!(best >= 537);
    assert!(best <= 537 + 25);
}

#[test]
fn pot_mode_emits_powers_of_two_only() {
    let mut search = BinarySearch::new(10, 1024, 15, true, false);
    let (best, seen) = drive(&mut search, |c| c >= 100);
    for c in &seen {
        assert!(c.is_power_of_two(), "candidate {c} is not a power of two");
    }
    // Smallest power of two >= 100.
    assert_eq!(best, Some(128));
}

#[test]
fn mod4_mode_emits_multiples_of_four_only() {
    let mut search = BinarySearch::new(10, 100, 0, false, true);
    let (best, seen) = drive(&mut search, |c| c >= 50);
    for c in &seen {
        assert_eq!(c % 4, 0, "candidate {c} is not a multiple of four");
    }
    let best = best.expect("a passing size must be found");
    assert!((50..=56).contains(&best));
}

#[test]
fn exhausted_window_stops() {
    let mut search = BinarySearch::new(64, 64, 0, false, false);
    assert_eq!(search.reset(), 64);
    assert_eq!(search.next(true), None);
    assert_eq!(search.next(false), None);
}

#[test]
fn next_pow2_rounds_up() {
    assert_eq!(next_pow2(0), 1);
    assert_eq!(next_pow2(1), 1);
    assert_eq!(next_pow2(2), 2);
    assert_eq!(next_pow2(3), 4);
    assert_eq!(next_pow2(10), 16);
    assert_eq!(next_pow2(1024), 1024);
    assert_eq!(next_pow2(1025), 2048);
}

#[test]
fn round_mod4_rounds_up() {
    assert_eq!(round_mod4(0), 0);
    assert_eq!(round_mod4(1), 4);
    assert_eq!(round_mod4(4), 4);
    assert_eq!(round_mod4(10), 12);
    assert_eq!(round_mod4(12), 12);
}
