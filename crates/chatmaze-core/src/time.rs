/// Logical time in milliseconds. The core never reads a clock; every
/// timestamp is handed in by the driver.
pub type Timestamp = u64;

/// Milliseconds from `earlier` to `now`, clamped at zero when `earlier` lies
/// in the future.
pub fn elapsed(now: Timestamp, earlier: Timestamp) -> u64 {
    now.saturating_sub(earlier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_counts_forward() {
        assert_eq!(elapsed(1500, 500), 1000);
    }

    #[test]
    fn elapsed_clamps_future_timestamps() {
        assert_eq!(elapsed(100, 5000), 0);
    }
}
