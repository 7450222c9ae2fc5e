//! Test helpers.

use crate::angle::AngleUnit;
use crate::preferences::MockPreferenceStore;
use crate::service::TrigRequest;
use crate::trig::TrigFunction;

/// A mock store that reports `unit` for every user and accepts any write.
#[must_use]
pub fn mock_store_with_unit(unit: Option<AngleUnit>) -> MockPreferenceStore {
    let mut store = MockPreferenceStore::new();
    store.expect_get_unit().returning(move |_| unit);
    store.expect_set_unit().returning(|_, _| ());
    store.expect_user_count().returning(|| 0);
    store
}

/// Shorthand for building a [`TrigRequest`].
#[must_use]
pub fn request(raw: &str, function: Option<TrigFunction>, user_id: i64) -> TrigRequest {
    TrigRequest {
        raw_angle: raw.to_string(),
        function,
        user_id,
    }
}
