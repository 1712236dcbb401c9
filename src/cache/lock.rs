use std::sync::{Mutex, MutexGuard};

use tracing::warn;

pub(crate) fn mutex_lock<'a, T>(
    lock: &'a Mutex<T>,
    region: &'static str,
    op: &'static str,
) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(
                target = "travelpro::cache",
                op,
                region,
                result = "poisoned_recovered",
                "Recovered from poisoned cache region lock"
            );
            poisoned.into_inner()
        }
    }
}
