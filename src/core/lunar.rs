//! Chinese lunar calendar conversion.
//!
//! Table-driven over lunar years 1900..=2100. Each year is packed into one
//! word:
//!
//! - bits 0-3: leap month number, 0 when the year has none
//! - bits 4-15: lengths of months 12..1 (month 1 in bit 15), set = 30 days
//! - bit 16: length of the leap month, set = 30 days
//!
//! Lunar year 1900 starts on Gregorian 1900-01-31; lunar year 2100 ends on
//! Gregorian 2101-01-28.

use crate::domain::model::{CalendarDate, CalendarSystem};
use crate::utils::error::{LifeCodeError, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt;

pub const MIN_LUNAR_YEAR: i32 = 1900;
pub const MAX_LUNAR_YEAR: i32 = 2100;

/// `num_days_from_ce` of 1900-01-31.
const EPOCH_DAYS_FROM_CE: i32 = 693_626;

#[rustfmt::skip]
const LUNAR_YEAR_INFO: [u32; 201] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2, // 1900
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977, // 1910
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970, // 1920
    0x06566, 0x0d4a0, 0x0ea50, 0x16a95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950, // 1930
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557, // 1940
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0, // 1950
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0, // 1960
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b6a0, 0x195a6, // 1970
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570, // 1980
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x05ac0, 0x0ab60, 0x096d5, 0x092e0, // 1990
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5, // 2000
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930, // 2010
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530, // 2020
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45, // 2030
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0, // 2040
    0x14b63, 0x09370, 0x049f8, 0x04970, 0x064b0, 0x168a6, 0x0ea50, 0x06b20, 0x1a6c4, 0x0aae0, // 2050
    0x092e0, 0x0d2e3, 0x0c960, 0x0d557, 0x0d4a0, 0x0da50, 0x05d55, 0x056a0, 0x0a6d0, 0x055d4, // 2060
    0x052d0, 0x0a9b8, 0x0a950, 0x0b4a0, 0x0b6a6, 0x0ad50, 0x055a0, 0x0aba4, 0x0a5b0, 0x052b0, // 2070
    0x0b273, 0x06930, 0x07337, 0x06aa0, 0x0ad50, 0x14b55, 0x04b60, 0x0a570, 0x054e4, 0x0d160, // 2080
    0x0e968, 0x0d520, 0x0daa0, 0x16aa6, 0x056d0, 0x04ae0, 0x0a9d4, 0x0a2d0, 0x0d150, 0x0f252, // 2090
    0x0d520,                                                                                   // 2100
];

fn year_info(year: i32) -> Option<u32> {
    if (MIN_LUNAR_YEAR..=MAX_LUNAR_YEAR).contains(&year) {
        Some(LUNAR_YEAR_INFO[(year - MIN_LUNAR_YEAR) as usize])
    } else {
        None
    }
}

fn leap_month_of(info: u32) -> Option<u8> {
    match (info & 0xf) as u8 {
        0 => None,
        month => Some(month),
    }
}

fn leap_month_days(info: u32) -> u32 {
    match leap_month_of(info) {
        None => 0,
        Some(_) if info & 0x10000 != 0 => 30,
        Some(_) => 29,
    }
}

fn month_days(info: u32, month: u8) -> u32 {
    if info & (0x10000 >> month) != 0 {
        30
    } else {
        29
    }
}

fn year_days(info: u32) -> u32 {
    (1..=12).map(|m| month_days(info, m)).sum::<u32>() + leap_month_days(info)
}

/// A date in the Chinese lunar calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LunarDate {
    year: i32,
    month: u8,
    day: u8,
    is_leap_month: bool,
}

impl LunarDate {
    /// Validates the date against the table: the leap flag is only accepted
    /// on that year's leap month and the day must fit the month's length.
    pub fn new(year: i32, month: u8, day: u8, is_leap_month: bool) -> Result<Self> {
        let label = || {
            let leap = if is_leap_month { " (leap month)" } else { "" };
            format!("{:04}-{:02}-{:02}{}", year, month, day, leap)
        };

        let info = year_info(year).ok_or_else(|| {
            LifeCodeError::lunar(
                label(),
                format!(
                    "lunar year {} is outside the supported range {}..={}",
                    year, MIN_LUNAR_YEAR, MAX_LUNAR_YEAR
                ),
            )
        })?;

        if !(1..=12).contains(&month) {
            return Err(LifeCodeError::lunar(
                label(),
                "month must be between 1 and 12",
            ));
        }

        let length = if is_leap_month {
            if leap_month_of(info) != Some(month) {
                return Err(LifeCodeError::lunar(
                    label(),
                    format!("lunar year {} has no leap month {}", year, month),
                ));
            }
            leap_month_days(info)
        } else {
            month_days(info, month)
        };

        if day == 0 || day as u32 > length {
            return Err(LifeCodeError::lunar(
                label(),
                format!("day must be between 1 and {} for this month", length),
            ));
        }

        Ok(Self {
            year,
            month,
            day,
            is_leap_month,
        })
    }

    pub fn from_gregorian(date: NaiveDate) -> Result<Self> {
        let out_of_range = || {
            LifeCodeError::lunar(
                date.to_string(),
                "only Gregorian dates from 1900-01-31 to 2101-01-28 can be converted",
            )
        };

        let days = date.num_days_from_ce() - EPOCH_DAYS_FROM_CE;
        if days < 0 {
            return Err(out_of_range());
        }
        let mut offset = days as u32;

        let mut year = MIN_LUNAR_YEAR;
        let info = loop {
            let info = year_info(year).ok_or_else(out_of_range)?;
            let length = year_days(info);
            if offset < length {
                break info;
            }
            offset -= length;
            year += 1;
        };

        let leap = leap_month_of(info);
        for month in 1..=12u8 {
            let length = month_days(info, month);
            if offset < length {
                return Ok(Self {
                    year,
                    month,
                    day: offset as u8 + 1,
                    is_leap_month: false,
                });
            }
            offset -= length;

            if leap == Some(month) {
                let length = leap_month_days(info);
                if offset < length {
                    return Ok(Self {
                        year,
                        month,
                        day: offset as u8 + 1,
                        is_leap_month: true,
                    });
                }
                offset -= length;
            }
        }

        Err(out_of_range())
    }

    pub fn to_gregorian(&self) -> Result<NaiveDate> {
        let info = year_info(self.year)
            .ok_or_else(|| LifeCodeError::lunar(self.to_string(), "lunar year outside the table"))?;

        let mut offset: u32 = LUNAR_YEAR_INFO
            .iter()
            .take((self.year - MIN_LUNAR_YEAR) as usize)
            .map(|&i| year_days(i))
            .sum();

        let leap = leap_month_of(info);
        for month in 1..self.month {
            offset += month_days(info, month);
            if leap == Some(month) {
                offset += leap_month_days(info);
            }
        }
        // The leap month follows the regular month of the same number.
        if self.is_leap_month {
            offset += month_days(info, self.month);
        }
        offset += self.day as u32 - 1;

        NaiveDate::from_num_days_from_ce_opt(EPOCH_DAYS_FROM_CE + offset as i32).ok_or_else(|| {
            LifeCodeError::lunar(self.to_string(), "no Gregorian equivalent for this date")
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn is_leap_month(&self) -> bool {
        self.is_leap_month
    }

    pub fn to_calendar_date(&self) -> CalendarDate {
        CalendarDate::from_parts(
            CalendarSystem::ChineseLunar,
            self.year,
            self.month,
            self.day,
            self.is_leap_month,
        )
    }
}

impl fmt::Display for LunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        if self.is_leap_month {
            write!(f, " (leap month)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lunar(date: NaiveDate) -> (i32, u8, u8, bool) {
        let l = LunarDate::from_gregorian(date).unwrap();
        (l.year(), l.month(), l.day(), l.is_leap_month())
    }

    #[test]
    fn test_epoch_is_first_lunar_day() {
        assert_eq!(ymd(1900, 1, 31).num_days_from_ce(), EPOCH_DAYS_FROM_CE);
        assert_eq!(lunar(ymd(1900, 1, 31)), (1900, 1, 1, false));
    }

    #[test]
    fn test_lunar_new_years() {
        assert_eq!(lunar(ymd(1984, 2, 2)), (1984, 1, 1, false));
        assert_eq!(lunar(ymd(2000, 2, 5)), (2000, 1, 1, false));
        assert_eq!(lunar(ymd(2023, 1, 22)), (2023, 1, 1, false));
        assert_eq!(lunar(ymd(2024, 2, 10)), (2024, 1, 1, false));
    }

    #[test]
    fn test_date_before_new_year_belongs_to_previous_lunar_year() {
        assert_eq!(lunar(ymd(2024, 2, 9)).0, 2023);
        assert_eq!(lunar(ymd(1900, 2, 28)), (1900, 1, 29, false));
    }

    #[test]
    fn test_ordinary_date() {
        assert_eq!(lunar(ymd(1990, 5, 15)), (1990, 4, 21, false));
        assert_eq!(lunar(ymd(1995, 10, 24)), (1995, 9, 1, false));
    }

    #[test]
    fn test_leap_months() {
        assert_eq!(year_info(2020).and_then(leap_month_of), Some(4));
        assert_eq!(year_info(2023).and_then(leap_month_of), Some(2));
        assert_eq!(year_info(2024).and_then(leap_month_of), None);

        assert_eq!(lunar(ymd(2020, 5, 22)), (2020, 4, 30, false));
        assert_eq!(lunar(ymd(2020, 5, 23)), (2020, 4, 1, true));
        assert_eq!(lunar(ymd(2020, 6, 20)), (2020, 4, 29, true));
        assert_eq!(lunar(ymd(2020, 6, 21)), (2020, 5, 1, false));

        assert_eq!(lunar(ymd(2023, 3, 22)), (2023, 2, 1, true));
        assert_eq!(lunar(ymd(2023, 4, 20)), (2023, 3, 1, false));
        assert_eq!(lunar(ymd(2033, 12, 22)), (2033, 11, 1, true));
    }

    #[test]
    fn test_supported_range_bounds() {
        assert!(LunarDate::from_gregorian(ymd(1900, 1, 30)).is_err());
        assert_eq!(lunar(ymd(2101, 1, 28)), (2100, 12, 29, false));
        let err = LunarDate::from_gregorian(ymd(2101, 1, 29)).unwrap_err();
        assert!(matches!(err, LifeCodeError::LunarConversion { .. }));
    }

    #[test]
    fn test_new_validates_against_table() {
        assert!(LunarDate::new(2023, 2, 30, false).is_ok());
        assert!(LunarDate::new(2023, 2, 29, true).is_ok());
        assert!(LunarDate::new(2023, 2, 30, true).is_err());
        assert!(LunarDate::new(2024, 2, 1, true).is_err());
        assert!(LunarDate::new(1990, 4, 30, false).is_err());
        assert!(LunarDate::new(1990, 13, 1, false).is_err());
        assert!(LunarDate::new(1990, 1, 0, false).is_err());
        assert!(LunarDate::new(1899, 1, 1, false).is_err());
        assert!(LunarDate::new(2101, 1, 1, false).is_err());
    }

    #[test]
    fn test_to_gregorian_known_dates() {
        let d = LunarDate::new(1990, 4, 21, false).unwrap();
        assert_eq!(d.to_gregorian().unwrap(), ymd(1990, 5, 15));

        let d = LunarDate::new(2020, 4, 1, true).unwrap();
        assert_eq!(d.to_gregorian().unwrap(), ymd(2020, 5, 23));

        let d = LunarDate::new(2017, 6, 30, true).unwrap();
        assert_eq!(d.to_gregorian().unwrap(), ymd(2017, 8, 21));
    }

    #[test]
    fn test_round_trip_across_table() {
        let mut date = ymd(1900, 1, 31);
        let end = ymd(2101, 1, 28);
        while date <= end {
            let l = LunarDate::from_gregorian(date).unwrap();
            assert_eq!(l.to_gregorian().unwrap(), date, "round trip failed for {}", date);
            date += Duration::days(1);
        }
    }

    #[test]
    fn test_table_total_matches_gregorian_span() {
        let total: u32 = LUNAR_YEAR_INFO.iter().map(|&i| year_days(i)).sum();
        let span = ymd(2101, 1, 29).num_days_from_ce() - EPOCH_DAYS_FROM_CE;
        assert_eq!(total as i32, span);
    }

    #[test]
    fn test_display_marks_leap_month() {
        let d = LunarDate::new(2020, 4, 1, true).unwrap();
        assert_eq!(d.to_string(), "2020-04-01 (leap month)");
        assert!(d.to_calendar_date().is_leap_month());
    }
}
