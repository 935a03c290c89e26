use crate::domain::model::{CalendarDate, DerivedNumber, DigitSequence, GiftNumber, LifeCode};

/// Day, then month, then year; day and month are padded to two digits and
/// the year to four, for both calendar systems.
pub fn extract_digits(date: &CalendarDate) -> DigitSequence {
    let mut digits = DigitSequence::default();
    digits.push_padded(date.day() as u32, 2);
    digits.push_padded(date.month() as u32, 2);
    digits.push_padded(date.year().unsigned_abs(), 4);
    digits
}

/// Plain digit sum, never reduced.
pub fn gift_number(digits: &DigitSequence) -> GiftNumber {
    DerivedNumber::new(digits.sum())
}

/// Digital root of the gift number: keep summing decimal digits until a
/// single digit remains.
pub fn life_code(gift: &GiftNumber) -> LifeCode {
    DerivedNumber::new(digital_root(gift.value()))
}

pub fn digital_root(mut value: u32) -> u32 {
    while value > 9 {
        value = DigitSequence::from_number(value).sum();
    }
    value
}
