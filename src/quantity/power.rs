use std::ops::Mul;

use chrono::TimeDelta;

use crate::quantity::energy::KilowattHours;

quantity!(Watts, via: f64, suffix: "W", precision: 1);

impl Mul<TimeDelta> for Watts {
    type Output = KilowattHours;

    /// Energy produced when the power is held constant for the given time.
    fn mul(self, rhs: TimeDelta) -> Self::Output {
        let hours = rhs.as_seconds_f64() / 3600.0;
        KilowattHours(self.0 * hours / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_one_hour_is_watts_over_thousand() {
        assert_abs_diff_eq!((Watts(4500.0) * TimeDelta::hours(1)).0, 4.5);
    }

    #[test]
    fn test_quarter_hour() {
        assert_abs_diff_eq!((Watts(1000.0) * TimeDelta::minutes(15)).0, 0.25);
    }

    #[test]
    fn test_display() {
        assert_eq!(Watts(4233.333).to_string(), "4233.3 W");
        assert_eq!(format!("{:?}", Watts(12.0)), "12.0W");
    }

    #[test]
    fn test_ordering() {
        assert!(Watts(1.0) < Watts(2.0));
        assert_eq!(Watts(1.0).max(Watts(3.0)), Watts(3.0));
    }
}
