use core::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// `duration * n`, or `None` if the product does not fit a [`Duration`].
pub(crate) fn checked_mul_duration(duration: Duration, n: u64) -> Option<Duration> {
    let nanos = duration.as_nanos().checked_mul(u128::from(n))?;
    from_nanos(nanos)
}

/// `duration * n`, clamped to [`Duration::MAX`].
pub(crate) fn saturating_mul_duration(duration: Duration, n: u64) -> Duration {
    checked_mul_duration(duration, n).unwrap_or(Duration::MAX)
}

pub(crate) fn from_nanos(nanos: u128) -> Option<Duration> {
    let secs = u64::try_from(nanos / NANOS_PER_SEC).ok()?;
    // Always < 1e9, so the cast is lossless.
    let subsec = (nanos % NANOS_PER_SEC) as u32;
    Some(Duration::new(secs, subsec))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_beyond_u32_factors() {
        let d = checked_mul_duration(Duration::from_millis(7), 1 << 41).unwrap();
        assert_eq!(d.as_millis(), 7 * (1 << 41));
        assert_eq!(checked_mul_duration(Duration::from_nanos(3), 0), Some(Duration::ZERO));
    }

    #[test]
    fn overflow_is_detected_and_saturated() {
        assert_eq!(checked_mul_duration(Duration::from_secs(u64::MAX), 2), None);
        assert_eq!(
            saturating_mul_duration(Duration::from_secs(u64::MAX), 2),
            Duration::MAX
        );
        assert_eq!(
            saturating_mul_duration(Duration::from_secs(2), 3),
            Duration::from_secs(6)
        );
    }
}
