use crate::domain::model::DigitBreakdown;
use std::fmt;

/// Board rows as laid out for display.
pub const BOARD_LAYOUT: [&[u8]; 3] = [&[1, 4, 7], &[2, 5, 8], &[3, 6, 9, 0]];

/// A fixed grouping of board digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComboLine {
    digits: &'static [u8],
}

impl ComboLine {
    pub const fn new(digits: &'static [u8]) -> Self {
        Self { digits }
    }

    pub fn digits(&self) -> &'static [u8] {
        self.digits
    }

    pub fn contains(&self, digit: u8) -> bool {
        self.digits.contains(&digit)
    }

    /// Active when every member digit carries some weight.
    pub fn is_active(&self, breakdown: &DigitBreakdown) -> bool {
        self.digits.iter().all(|&d| breakdown.is_present(d))
    }

    /// `"1-4-7"` style label.
    pub fn label(&self) -> String {
        self.digits
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for ComboLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Every line, in declaration order: rows, columns, diagonals, pairs.
pub static COMBO_LINES: [ComboLine; 12] = [
    ComboLine::new(&[1, 4, 7]),
    ComboLine::new(&[2, 5, 8]),
    ComboLine::new(&[3, 6, 9, 0]),
    ComboLine::new(&[1, 2, 3]),
    ComboLine::new(&[4, 5, 6]),
    ComboLine::new(&[7, 8, 9]),
    ComboLine::new(&[1, 5, 9]),
    ComboLine::new(&[3, 5, 7]),
    ComboLine::new(&[2, 4]),
    ComboLine::new(&[2, 6]),
    ComboLine::new(&[4, 8]),
    ComboLine::new(&[6, 8]),
];

pub fn detect_combos(breakdown: &DigitBreakdown) -> Vec<&'static ComboLine> {
    COMBO_LINES
        .iter()
        .filter(|line| line.is_active(breakdown))
        .collect()
}

pub fn combo_labels(breakdown: &DigitBreakdown) -> Vec<String> {
    detect_combos(breakdown).into_iter().map(ComboLine::label).collect()
}
