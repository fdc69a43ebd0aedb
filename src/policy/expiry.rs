use chrono::{Datelike, NaiveDate};

use crate::manifest::Cell;

/// Past this many hours after expiry a machine is dropped from the output.
pub const GRACE_HOURS: i64 = 7 * 24;

/// Formats accepted for `expires`, tried in order. The second one is what
/// spreadsheets tend to turn the first into.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date format for expires {0:?}, format should be 'YYYY-MM-DD'")]
pub struct InvalidDate(pub String);

/// Outcome of the expiry policy for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub expires: NaiveDate,
    /// Hours from the expiry date to the start of `today`; positive once expired.
    pub delta_hours: i64,
    pub power: bool,
    pub excluded: bool,
}

impl Expiry {
    /// `YYYY-MM-DD`, the only form written to the output.
    pub fn expires_string(&self) -> String {
        self.expires.format(DATE_FORMATS[0]).to_string()
    }
}

/// Work out expiry, power state and grace exclusion for an `expires` cell.
///
/// An empty cell means "one year from today". A machine is powered off from
/// its expiry day onwards and excluded once it is [`GRACE_HOURS`] past it.
pub fn evaluate(cell: &Cell, today: NaiveDate) -> Result<Expiry, InvalidDate> {
    let expires = if cell.is_empty() {
        one_year_after(today)
    } else {
        parse_date(cell.render())?
    };

    let delta_hours = (today - expires).num_hours();
    Ok(Expiry {
        expires,
        delta_hours,
        power: delta_hours < 0,
        excluded: delta_hours >= GRACE_HOURS,
    })
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, InvalidDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| InvalidDate(raw.to_string()))
}

/// Same month and day next year; 29 February rolls over to 1 March.
pub fn one_year_after(today: NaiveDate) -> NaiveDate {
    let year = today.year() + 1;
    today
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn empty_expiry_is_one_year_out() {
        let today = date(2026, 10, 17);
        let e = evaluate(&text(""), today).unwrap();
        assert_eq!(e.expires_string(), "2027-10-17");
        assert!(e.power);
        assert!(!e.excluded);
    }

    #[test]
    fn leap_day_rolls_to_march() {
        assert_eq!(one_year_after(date(2028, 2, 29)), date(2029, 3, 1));
        assert_eq!(one_year_after(date(2027, 2, 28)), date(2028, 2, 28));
    }

    #[test]
    fn accepts_both_formats() {
        assert_eq!(parse_date("2020-01-01").unwrap(), date(2020, 1, 1));
        assert_eq!(parse_date("01/02/2020").unwrap(), date(2020, 2, 1));
        assert_eq!(parse_date("not-a-date"), Err(InvalidDate("not-a-date".into())));
        assert!(parse_date("2020/01/01").is_err());
        assert!(parse_date("31/02/2020").is_err());
    }

    #[test]
    fn numeric_cell_is_still_checked_as_a_date() {
        assert!(evaluate(&Cell::from_raw("20300101"), date(2026, 1, 1)).is_err());
    }

    #[test]
    fn long_expired_is_off_and_excluded() {
        let e = evaluate(&text("2020-01-01"), date(2026, 10, 17)).unwrap();
        assert!(!e.power);
        assert!(e.excluded);
        assert_eq!(e.expires_string(), "2020-01-01");
    }

    #[test]
    fn fallback_format_is_normalized() {
        let e = evaluate(&text("01/02/2031"), date(2026, 10, 17)).unwrap();
        assert_eq!(e.expires_string(), "2031-02-01");
        assert!(e.power);
    }

    #[test]
    fn power_and_grace_boundaries() {
        let today = date(2026, 10, 17);
        let at = |d: NaiveDate| evaluate(&text(&d.format("%Y-%m-%d").to_string()), today).unwrap();

        let tomorrow = at(date(2026, 10, 18));
        assert!(tomorrow.power);
        assert_eq!(tomorrow.delta_hours, -24);

        let on_the_day = at(today);
        assert!(!on_the_day.power);
        assert!(!on_the_day.excluded);

        let six_days = at(date(2026, 10, 11));
        assert!(!six_days.power);
        assert!(!six_days.excluded);
        assert_eq!(six_days.delta_hours, 144);

        let seven_days = at(date(2026, 10, 10));
        assert_eq!(seven_days.delta_hours, GRACE_HOURS);
        assert!(seven_days.excluded);
    }
}
