//! Property-based tests for fanlog using proptest

use fanlog::core::bounded_queue::{BoundedQueue, Dequeue, Enqueue};
use fanlog::core::layout::to_positional_layout;
use fanlog::prelude::*;
use proptest::prelude::*;
use std::time::Duration;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warning),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

proptest! {
    /// Level string conversions roundtrip exactly
    #[test]
    fn test_level_str_roundtrip(level in any_level()) {
        let as_str = level.as_str();
        let parsed: LogLevel = as_str.parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Level parsing is case-insensitive and trims whitespace
    #[test]
    fn test_level_parse_case_and_whitespace(level in any_level(), lower in any::<bool>()) {
        let name = if lower {
            level.as_str().to_lowercase()
        } else {
            level.as_str().to_string()
        };
        let padded = format!("  {} ", name);
        prop_assert_eq!(padded.parse::<LogLevel>().unwrap(), level);
    }

    /// Level ordering matches the numeric discriminants
    #[test]
    fn test_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1 as u8;
        let val2 = level2 as u8;
        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 < level2, val1 < val2);
    }
}

proptest! {
    /// Record messages never carry raw newlines, carriage returns, or tabs
    #[test]
    fn test_record_sanitization(message in ".*") {
        let record = LogRecord::new(LogLevel::Info, message, "t");
        prop_assert!(!record.message.contains('\n'));
        prop_assert!(!record.message.contains('\r'));
        prop_assert!(!record.message.contains('\t'));
    }

    /// Cloned records carry identical payloads
    #[test]
    fn test_record_clone_equivalence(message in ".*", tag in "[a-z]{0,12}") {
        let record = LogRecord::new(LogLevel::Error, message, tag);
        let copy = record.clone();
        prop_assert_eq!(copy.message, record.message);
        prop_assert_eq!(copy.tag, record.tag);
        prop_assert_eq!(copy.timestamp, record.timestamp);
    }
}

proptest! {
    /// Items flow through the queue in FIFO order and unchanged
    #[test]
    fn test_queue_roundtrip(items in proptest::collection::vec(any::<u32>(), 0..64)) {
        let queue = BoundedQueue::new(64, Duration::from_millis(5));
        for item in &items {
            prop_assert_eq!(queue.enqueue(*item), Enqueue::Accepted);
        }
        for item in &items {
            prop_assert_eq!(
                queue.dequeue(Duration::from_millis(10)),
                Dequeue::Signaled(*item)
            );
        }
        prop_assert!(queue.is_empty());
    }

    /// Shutdown never loses buffered items
    #[test]
    fn test_queue_shutdown_preserves_buffered(items in proptest::collection::vec(any::<u32>(), 1..32)) {
        let queue = BoundedQueue::new(32, Duration::from_millis(5));
        for item in &items {
            queue.enqueue(*item);
        }
        queue.shutdown();
        for item in &items {
            prop_assert_eq!(
                queue.dequeue(Duration::from_millis(10)),
                Dequeue::Signaled(*item)
            );
        }
        prop_assert_eq!(queue.dequeue(Duration::from_millis(10)), Dequeue::Shutdown);
    }
}

proptest! {
    /// Layouts without placeholders come back unchanged
    #[test]
    fn test_layout_identity_without_placeholders(layout in "[a-zA-Z0-9 \\]\\[:.-]*") {
        prop_assert_eq!(to_positional_layout(&layout, false), layout.clone());
        prop_assert_eq!(to_positional_layout(&layout, true), layout);
    }

    /// Layouts already containing %s or %d are returned verbatim
    #[test]
    fn test_layout_positional_passthrough(prefix in "[a-z ]{0,10}", suffix in "[a-z ]{0,10}") {
        let layout = format!("{}%s{}{{message}}", prefix, suffix);
        prop_assert_eq!(to_positional_layout(&layout, false), layout.clone());
        let layout = format!("{}%d{}", prefix, suffix);
        prop_assert_eq!(to_positional_layout(&layout, true), layout);
    }

    /// Applying the transform twice equals applying it once
    #[test]
    fn test_layout_idempotent(
        fields in proptest::collection::vec(0usize..5, 0..6),
        zero_based in any::<bool>(),
    ) {
        const NAMES: [&str; 5] = ["timestamp", "threadid", "loglevel", "message", "tag"];
        let layout: String = fields
            .iter()
            .map(|&i| format!("{{{}}} ", NAMES[i]))
            .collect();
        let once = to_positional_layout(&layout, zero_based);
        prop_assert_eq!(to_positional_layout(&once, zero_based), once);
    }
}
