use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Points per occurrence in the date digits (circle).
pub const CIRCLE_POINTS: u32 = 1;
/// Points per occurrence in the gift number (triangle).
pub const TRIANGLE_POINTS: u32 = 3;
/// Points per occurrence in the life code (square).
pub const SQUARE_POINTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarSystem {
    GregorianThai,
    ChineseLunar,
}

/// A validated day/month/year in one calendar system.
///
/// Only the calendar converter creates these, so every instance names a day
/// that exists in its calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CalendarDate {
    system: CalendarSystem,
    year: i32,
    month: u8,
    day: u8,
    is_leap_month: bool,
}

impl CalendarDate {
    pub(crate) fn from_parts(
        system: CalendarSystem,
        year: i32,
        month: u8,
        day: u8,
        is_leap_month: bool,
    ) -> Self {
        Self {
            system,
            year,
            month,
            day,
            is_leap_month,
        }
    }

    pub fn system(&self) -> CalendarSystem {
        self.system
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

    /// Always false for Thai-solar dates.
    pub fn is_leap_month(&self) -> bool {
        self.is_leap_month
    }

    pub fn to_iso_string(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iso_string())?;
        if self.is_leap_month {
            write!(f, " (leap month)")?;
        }
        Ok(())
    }
}

/// The same birth date in both calendar systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePair {
    pub thai: CalendarDate,
    pub lunar: CalendarDate,
}

/// Ordered decimal digits, each in `0..=9`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct DigitSequence(Vec<u8>);

impl DigitSequence {
    /// Decimal digits of `value`, most significant first. Zero yields `[0]`.
    pub fn from_number(value: u32) -> Self {
        let mut digits = Self::default();
        digits.push_padded(value, 1);
        digits
    }

    /// Appends `value` left-padded with zeros to at least `width` digits.
    pub(crate) fn push_padded(&mut self, value: u32, width: usize) {
        let start = self.0.len();
        let mut remaining = value;
        loop {
            self.0.push((remaining % 10) as u8);
            remaining /= 10;
            if remaining == 0 {
                break;
            }
        }
        while self.0.len() - start < width {
            self.0.push(0);
        }
        self.0[start..].reverse();
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&d| d as u32).sum()
    }
}

/// A digit-sum-derived scalar together with its own digits.
///
/// Serializes as the bare integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivedNumber {
    value: u32,
    digits: DigitSequence,
}

pub type GiftNumber = DerivedNumber;
pub type LifeCode = DerivedNumber;

impl DerivedNumber {
    pub fn new(value: u32) -> Self {
        Self {
            value,
            digits: DigitSequence::from_number(value),
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn digits(&self) -> &DigitSequence {
        &self.digits
    }
}

impl Serialize for DerivedNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.value)
    }
}

impl fmt::Display for DerivedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Occurrences of one digit in each weighted source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ShapeCount {
    #[serde(rename = "circles")]
    pub from_dob: u32,
    #[serde(rename = "triangles")]
    pub from_gift_number: u32,
    #[serde(rename = "squares")]
    pub from_life_code: u32,
}

impl ShapeCount {
    pub fn weight(&self) -> u32 {
        SQUARE_POINTS * self.from_life_code
            + TRIANGLE_POINTS * self.from_gift_number
            + CIRCLE_POINTS * self.from_dob
    }

    pub fn is_present(&self) -> bool {
        self.weight() > 0
    }
}

/// Per-digit tally over `0..=9`. Always carries all ten entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DigitBreakdown {
    counts: [ShapeCount; 10],
}

impl DigitBreakdown {
    pub fn from_counts(counts: [ShapeCount; 10]) -> Self {
        Self { counts }
    }

    pub fn get(&self, digit: u8) -> Option<&ShapeCount> {
        self.counts.get(digit as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &ShapeCount)> {
        self.counts.iter().enumerate().map(|(d, c)| (d as u8, c))
    }

    /// Total weight of `digit`; zero for anything outside `0..=9`.
    pub fn weight(&self, digit: u8) -> u32 {
        self.get(digit).map(ShapeCount::weight).unwrap_or(0)
    }

    pub fn is_present(&self, digit: u8) -> bool {
        self.weight(digit) > 0
    }

    pub fn weights(&self) -> BTreeMap<u8, u32> {
        self.iter().map(|(d, c)| (d, c.weight())).collect()
    }
}

impl Serialize for DigitBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (digit, count) in self.iter() {
            map.serialize_entry(&digit, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum World {
    /// Thai-solar date: thinking, the inner self.
    Inner,
    /// Chinese lunar date: action, the outer self.
    Outer,
}

impl World {
    pub fn title(&self) -> &'static str {
        match self {
            World::Inner => "Inner World",
            World::Outer => "Outer World",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldAnalysis {
    pub world: World,
    pub calendar_date: CalendarDate,
    pub dob_digits: DigitSequence,
    pub gift_number: GiftNumber,
    pub life_code: LifeCode,
    pub weights: BTreeMap<u8, u32>,
    pub shapes: DigitBreakdown,
    pub combo_lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Th,
    En,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Th => write!(f, "th"),
            Language::En => write!(f, "en"),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "th" => Ok(Language::Th),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language '{}', expected th or en", other)),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Gregorian birth date; both calendar dates are derived from it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thai_dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese_dob: Option<String>,
    /// Marks `chinese_dob` as falling in that lunar year's leap month.
    #[serde(default)]
    pub chinese_leap_month: bool,
    #[serde(default)]
    pub language: Language,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl AnalysisRequest {
    pub fn for_birth_date(date: impl Into<String>) -> Self {
        Self {
            birth_date: Some(date.into()),
            ..Default::default()
        }
    }
}

impl fmt::Debug for AnalysisRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisRequest")
            .field("birth_date", &self.birth_date)
            .field("thai_dob", &self.thai_dob)
            .field("chinese_dob", &self.chinese_dob)
            .field("chinese_leap_month", &self.chinese_leap_month)
            .field("language", &self.language)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub inner_world: WorldAnalysis,
    pub outer_world: WorldAnalysis,
    /// Empty when the narrative is disabled or failed.
    pub ai_analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_error: Option<String>,
}
