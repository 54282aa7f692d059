use super::*;

#[test]
fn oldest_entries_drop_at_capacity() {
    let mut log = MessageLog::with_capacity(2);
    log.info("one");
    log.warn("two");
    log.error("three");

    let texts: Vec<&str> = log.entries().map(|entry| entry.text.as_str()).collect();
    assert_eq!(texts, vec!["two", "three"]);
    assert_eq!(log.last().expect("entry").level, LogLevel::Error);
}

#[test]
fn entries_are_timestamped_in_order() {
    let mut log = MessageLog::default();
    log.info("first");
    log.info("second");

    let stamps: Vec<_> = log.entries().map(|entry| entry.at).collect();
    assert!(stamps[0] <= stamps[1]);
}

#[test]
fn zero_capacity_keeps_latest_entry() {
    let mut log = MessageLog::with_capacity(0);
    log.info("a");
    log.info("b");
    assert_eq!(log.len(), 1);

    log.clear();
    assert!(log.is_empty());
}
