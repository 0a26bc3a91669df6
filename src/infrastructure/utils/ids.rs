use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

static LAST_ID_MS: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamp, bumped so that two calls never return the same value.
pub fn next_timestamp_ms() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID_MS.load(Ordering::Relaxed);

    loop {
        let next = if now > last { now } else { last + 1 };
        match LAST_ID_MS.compare_exchange_weak(last, next, Ordering::SeqCst, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

/// Timestamp based id used for media items, comments and stored images.
pub fn next_timestamp_id() -> String {
    next_timestamp_ms().to_string()
}
