//! Property-based tests for model types.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::model::{TimeWindow, UserId};

    proptest! {
        #[test]
        fn test_non_blank_user_ids_are_valid(id in "[a-z0-9_]{1,20}") {
            let user = UserId::new(&id);
            prop_assert!(user.is_ok(), "Failed for user: {}", id);
            let user = user.unwrap();
            prop_assert_eq!(user.as_str(), id.as_str());
        }

        #[test]
        fn test_overlap_is_symmetric(
            a in -1000i64..1000, la in 0i64..500,
            b in -1000i64..1000, lb in 0i64..500
        ) {
            let w1 = TimeWindow::new(a, a + la).unwrap();
            let w2 = TimeWindow::new(b, b + lb).unwrap();
            prop_assert_eq!(w1.overlap(&w2), w2.overlap(&w1));
        }

        #[test]
        fn test_overlap_never_exceeds_either_window(
            a in -1000i64..1000, la in 0i64..500,
            b in -1000i64..1000, lb in 0i64..500
        ) {
            let w1 = TimeWindow::new(a, a + la).unwrap();
            let w2 = TimeWindow::new(b, b + lb).unwrap();
            if let Some(overlap) = w1.overlap(&w2) {
                prop_assert!(overlap <= w1.len());
                prop_assert!(overlap <= w2.len());
            }
        }

        #[test]
        fn test_len_never_overflows(start in any::<i64>(), end in any::<i64>()) {
            let (start, end) = if start <= end { (start, end) } else { (end, start) };
            let window = TimeWindow::new(start, end).unwrap();
            prop_assert_eq!(window.len() as i128, end as i128 - start as i128);
        }
    }
}
