use aquaview_core::generator::BASELINE;
use aquaview_core::history::History;
use aquaview_schemas::sample::Sample;

fn sample_at(time: i64) -> Sample {
    Sample { time, ..BASELINE }
}

#[test]
fn capacity_bound_holds_under_any_append_sequence() {
    let mut history = History::new();
    for t in 0..100 {
        history.append(sample_at(t));
        assert!(history.len() <= History::CAPACITY);
    }
    assert_eq!(history.len(), History::CAPACITY);
    // Oldest entries were evicted, newest kept.
    assert_eq!(history.iter().next().map(|s| s.time), Some(70));
    assert_eq!(history.current().map(|s| s.time), Some(99));
}

#[test]
fn order_is_chronological() {
    let mut history = History::new();
    for t in 0..50 {
        history.append(sample_at(t));
    }
    let times: Vec<i64> = history.iter().map(|s| s.time).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn current_is_absent_when_empty() {
    let history = History::new();
    assert!(history.is_empty());
    assert!(history.current().is_none());
}

#[test]
fn recent_returns_newest_in_order() {
    let mut history = History::new();
    for t in 0..30 {
        history.append(sample_at(t));
    }
    let recent = history.recent(10);
    assert_eq!(recent.len(), 10);
    assert_eq!(recent.first().map(|s| s.time), Some(20));
    assert_eq!(recent.last().map(|s| s.time), Some(29));

    // Asking for more than we have returns everything.
    assert_eq!(history.recent(100).len(), 30);
}

#[test]
fn from_samples_truncates_to_the_newest() {
    let samples: Vec<Sample> = (0..40).map(sample_at).collect();
    let history = History::from_samples(samples);
    assert_eq!(history.len(), History::CAPACITY);
    assert_eq!(history.iter().next().map(|s| s.time), Some(10));
}
