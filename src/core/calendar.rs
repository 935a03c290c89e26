use crate::core::lunar::LunarDate;
use crate::domain::model::{AnalysisRequest, CalendarDate, CalendarSystem, DatePair};
use crate::utils::error::{LifeCodeError, Result};
use chrono::{Datelike, NaiveDate};

const MAX_YEAR: i32 = 9999;

/// Splits a strict `YYYY-MM-DD` string into its numeric fields.
fn split_iso(input: &str) -> Result<(i32, u32, u32)> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split('-').collect();
    let malformed = || LifeCodeError::invalid_date(input, "expected the YYYY-MM-DD format");

    if parts.len() != 3
        || parts[0].len() != 4
        || parts[1].len() != 2
        || parts[2].len() != 2
        || !parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(malformed());
    }

    let year = parts[0].parse::<i32>().map_err(|_| malformed())?;
    let month = parts[1].parse::<u32>().map_err(|_| malformed())?;
    let day = parts[2].parse::<u32>().map_err(|_| malformed())?;
    Ok((year, month, day))
}

/// Parses a Gregorian `YYYY-MM-DD` date that must exist in the proleptic
/// Gregorian calendar, with a year in `1..=9999`.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate> {
    let (year, month, day) = split_iso(input)?;
    if !(1..=MAX_YEAR).contains(&year) {
        return Err(LifeCodeError::invalid_date(
            input,
            format!("year must be between 1 and {}", MAX_YEAR),
        ));
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        LifeCodeError::invalid_date(input, "this day does not exist in the Gregorian calendar")
    })
}

/// Parses a lunar `YYYY-MM-DD` date and validates it against the lunar table.
pub fn parse_lunar_date(input: &str, is_leap_month: bool) -> Result<LunarDate> {
    let (year, month, day) = split_iso(input)?;
    let month = u8::try_from(month)
        .map_err(|_| LifeCodeError::lunar(input.trim(), "month must be between 1 and 12"))?;
    let day = u8::try_from(day)
        .map_err(|_| LifeCodeError::lunar(input.trim(), "day is out of range"))?;
    LunarDate::new(year, month, day, is_leap_month)
}

/// Thai solar dates share the Gregorian day, month and year numbering.
pub fn thai_solar(date: NaiveDate) -> CalendarDate {
    CalendarDate::from_parts(
        CalendarSystem::GregorianThai,
        date.year(),
        date.month() as u8,
        date.day() as u8,
        false,
    )
}

/// Converts one Gregorian birth date into both calendar systems.
pub fn convert(date: NaiveDate) -> Result<DatePair> {
    let lunar = LunarDate::from_gregorian(date)?;
    Ok(DatePair {
        thai: thai_solar(date),
        lunar: lunar.to_calendar_date(),
    })
}

/// Works out both calendar dates from whichever fields the request carries.
pub fn resolve_dates(request: &AnalysisRequest) -> Result<DatePair> {
    let birth_date = non_empty(&request.birth_date);
    let thai_dob = non_empty(&request.thai_dob);
    let chinese_dob = non_empty(&request.chinese_dob);

    match (birth_date, thai_dob, chinese_dob) {
        (Some(birth), None, None) => {
            tracing::debug!("Converting birth date {} into both calendars", birth);
            convert(parse_iso_date(birth)?)
        }
        (Some(_), _, _) => Err(LifeCodeError::ValidationError {
            message: "birth_date cannot be combined with thai_dob or chinese_dob".to_string(),
        }),
        (None, Some(thai), Some(chinese)) => {
            let thai = thai_solar(parse_iso_date(thai)?);
            let lunar = parse_lunar_date(chinese, request.chinese_leap_month)?;
            Ok(DatePair {
                thai,
                lunar: lunar.to_calendar_date(),
            })
        }
        (None, Some(thai), None) => {
            tracing::debug!("Deriving the lunar date from thai_dob {}", thai);
            convert(parse_iso_date(thai)?)
        }
        (None, None, Some(chinese)) => {
            tracing::debug!("Deriving the Thai date from chinese_dob {}", chinese);
            let lunar = parse_lunar_date(chinese, request.chinese_leap_month)?;
            let gregorian = lunar.to_gregorian()?;
            Ok(DatePair {
                thai: thai_solar(gregorian),
                lunar: lunar.to_calendar_date(),
            })
        }
        (None, None, None) => Err(LifeCodeError::ValidationError {
            message: "a birth date is required (birth_date, thai_dob or chinese_dob)".to_string(),
        }),
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
