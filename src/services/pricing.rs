use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const SECONDS_PER_HOUR: i64 = 3600;

/// Amount owed for a booking interval, in minor currency units:
/// `round(hourly rate x duration in hours)`, half away from zero.
pub fn amount_cents(unit_cents_per_hour: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let seconds = (end - start).num_seconds().max(0);
    let hours = Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR);
    (Decimal::from(unit_cents_per_hour) * hours)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, hour, minute, 0).unwrap()
    }

    #[test]
    fn whole_and_fractional_hours() {
        assert_eq!(amount_cents(1000, at(0, 0), at(1, 30)), 1500);
        assert_eq!(amount_cents(1000, at(0, 0), at(0, 45)), 750);
        assert_eq!(amount_cents(5000, at(9, 0), at(10, 0)), 5000);
    }

    #[test]
    fn half_unit_boundaries_round_away_from_zero() {
        // 1001 cents/hr for 30 minutes = 500.5 -> 501
        assert_eq!(amount_cents(1001, at(0, 0), at(0, 30)), 501);
        // 999 cents/hr for 30 minutes = 499.5 -> 500
        assert_eq!(amount_cents(999, at(0, 0), at(0, 30)), 500);
    }

    #[test]
    fn degenerate_intervals_price_to_zero() {
        assert_eq!(amount_cents(1000, at(1, 0), at(1, 0)), 0);
        assert_eq!(amount_cents(1000, at(2, 0), at(1, 0)), 0);
        assert_eq!(amount_cents(0, at(0, 0), at(8, 0)), 0);
    }
}
