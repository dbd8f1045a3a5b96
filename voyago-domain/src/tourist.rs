use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::Lifecycle;

/// A tourist account. The wallet is a scalar balance debited
/// synchronously during booking; it must never go negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tourist {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub wallet: f64,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
}

impl Tourist {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        date_of_birth: NaiveDate,
        wallet: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            date_of_birth,
            wallet,
            lifecycle: Lifecycle::Active,
            created_at: Utc::now(),
        }
    }

    /// Calendar age on the given date: full years elapsed, counting the
    /// birthday itself as already turned.
    pub fn age_on(&self, date: NaiveDate) -> i32 {
        let mut age = date.year() - self.date_of_birth.year();
        if (date.month(), date.day()) < (self.date_of_birth.month(), self.date_of_birth.day()) {
            age -= 1;
        }
        age
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tourist_born(y: i32, m: u32, d: u32) -> Tourist {
        Tourist::new(
            "nour",
            "nour@example.com",
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            0.0,
        )
    }

    #[test]
    fn age_counts_the_birthday_itself() {
        let tourist = tourist_born(2006, 3, 15);
        let eighteenth = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(tourist.age_on(eighteenth), 18);
    }

    #[test]
    fn age_before_birthday_is_one_less() {
        let tourist = tourist_born(2006, 3, 15);
        let day_before = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        assert_eq!(tourist.age_on(day_before), 17);
    }

    #[test]
    fn age_later_in_the_year() {
        let tourist = tourist_born(1990, 1, 2);
        let date = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
        assert_eq!(tourist.age_on(date), 34);
    }
}
