use crate::domain::model::Language;

/// Display label for one board digit.
#[derive(Debug, Clone, Copy)]
pub struct DigitKeyword {
    pub th: &'static str,
    pub en: &'static str,
}

pub const DIGIT_KEYWORDS: [DigitKeyword; 10] = [
    DigitKeyword { th: "จิตวิญญาณ", en: "Spirit" },
    DigitKeyword { th: "ผู้นำ", en: "Leadership" },
    DigitKeyword { th: "ความสัมพันธ์", en: "Partnership" },
    DigitKeyword { th: "ความคิดสร้างสรรค์", en: "Creativity" },
    DigitKeyword { th: "ความมั่นคง", en: "Stability" },
    DigitKeyword { th: "อิสรภาพ", en: "Freedom" },
    DigitKeyword { th: "ความรับผิดชอบ", en: "Responsibility" },
    DigitKeyword { th: "ปัญญา", en: "Wisdom" },
    DigitKeyword { th: "อำนาจ", en: "Power" },
    DigitKeyword { th: "ความเมตตา", en: "Compassion" },
];

pub fn keyword(digit: u8, language: Language) -> &'static str {
    match DIGIT_KEYWORDS.get(digit as usize) {
        Some(k) => match language {
            Language::Th => k.th,
            Language::En => k.en,
        },
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(keyword(1, Language::En), "Leadership");
        assert_eq!(keyword(1, Language::Th), "ผู้นำ");
        assert_eq!(keyword(10, Language::En), "");
    }
}
