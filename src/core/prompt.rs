use crate::domain::model::{Language, WorldAnalysis};
use std::fmt::Write;

fn format_weights(world: &WorldAnalysis) -> String {
    world
        .weights
        .iter()
        .map(|(digit, weight)| format!("{}:{}", digit, weight))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_combos(world: &WorldAnalysis, none: &str) -> String {
    if world.combo_lines.is_empty() {
        none.to_string()
    } else {
        world.combo_lines.join(", ")
    }
}

/// Prompt for the narrative service, built from both worlds.
pub fn build_prompt(inner: &WorldAnalysis, outer: &WorldAnalysis, language: Language) -> String {
    let mut prompt = String::new();

    match language {
        Language::Th => {
            let _ = writeln!(
                prompt,
                "คุณคือผู้เชี่ยวชาญด้านรหัสชีวิต (Life Code) ที่อ่านปฏิทินไทยเป็นโลกภายใน (ความคิด) และปฏิทินจีนเป็นโลกภายนอก (การกระทำ)"
            );
            let _ = writeln!(prompt);
            for (label, world) in [("ฝั่งความคิด (Inner World)", inner), ("ฝั่งการกระทำ (Outer World)", outer)] {
                let _ = writeln!(prompt, "{}: วันที่ {}", label, world.calendar_date);
                let _ = writeln!(
                    prompt,
                    "- เลขพรสวรรค์: {}, รหัสชีวิต: {}",
                    world.gift_number, world.life_code
                );
                let _ = writeln!(prompt, "- คะแนนตัวเลข: {}", format_weights(world));
                let _ = writeln!(prompt, "- คอมโบที่ได้: {}", format_combos(world, "ไม่มี"));
                let _ = writeln!(prompt);
            }
            let _ = writeln!(
                prompt,
                "คำสั่ง: วิเคราะห์อุปนิสัยและพรสวรรค์ โดยเฉพาะความขัดแย้งระหว่างความคิดกับการกระทำ แล้วให้คำแนะนำในการใช้ชีวิต ตอบเป็นภาษาไทย"
            );
        }
        Language::En => {
            let _ = writeln!(
                prompt,
                "You are a Life Code expert who reads the Thai calendar as the inner world (thinking) and the Chinese lunar calendar as the outer world (action)."
            );
            let _ = writeln!(prompt);
            for world in [inner, outer] {
                let _ = writeln!(prompt, "{}: date {}", world.world.title(), world.calendar_date);
                let _ = writeln!(
                    prompt,
                    "- Gift number: {}, Life code: {}",
                    world.gift_number, world.life_code
                );
                let _ = writeln!(prompt, "- Digit weights: {}", format_weights(world));
                let _ = writeln!(prompt, "- Active combos: {}", format_combos(world, "none"));
                let _ = writeln!(prompt);
            }
            let _ = writeln!(
                prompt,
                "Instructions: analyse personality and talents, especially the conflict between what this person thinks and what they do, then give practical life advice. Answer in English."
            );
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calendar::{convert, parse_iso_date};
    use crate::core::world::analyze_pair;

    fn worlds() -> (WorldAnalysis, WorldAnalysis) {
        analyze_pair(&convert(parse_iso_date("1990-05-15").unwrap()).unwrap())
    }

    #[test]
    fn test_english_prompt_lists_both_worlds() {
        let (inner, outer) = worlds();
        let prompt = build_prompt(&inner, &outer, Language::En);
        assert!(prompt.contains("Inner World: date 1990-05-15"));
        assert!(prompt.contains("Outer World: date 1990-04-21"));
        assert!(prompt.contains("Gift number: 30, Life code: 3"));
        assert!(prompt.contains("Gift number: 26, Life code: 8"));
        assert!(prompt.contains("Active combos: 1-5-9"));
        assert!(prompt.contains("Active combos: 2-4, 2-6, 4-8, 6-8"));
    }

    #[test]
    fn test_thai_prompt_is_default_language() {
        let (inner, outer) = worlds();
        let prompt = build_prompt(&inner, &outer, Language::default());
        assert!(prompt.contains("เลขพรสวรรค์: 30, รหัสชีวิต: 3"));
        assert!(prompt.contains("ตอบเป็นภาษาไทย"));
    }

    #[test]
    fn test_empty_combos_are_spelled_out() {
        let (mut inner, outer) = worlds();
        inner.combo_lines.clear();
        let prompt = build_prompt(&inner, &outer, Language::En);
        assert!(prompt.contains("Active combos: none"));
    }
}
