use crate::core::combo::{BOARD_LAYOUT, COMBO_LINES};
use crate::domain::model::{AnalysisReport, Language, ShapeCount, WorldAnalysis};
use crate::render::keywords::keyword;
use std::fmt::Write;

const CELL_WIDTH: usize = 14;

/// Squares, then triangles, then circles, straight from the tally.
pub fn shape_glyphs(count: &ShapeCount) -> String {
    let mut glyphs = String::new();
    glyphs.extend(std::iter::repeat('■').take(count.from_life_code as usize));
    glyphs.extend(std::iter::repeat('▲').take(count.from_gift_number as usize));
    glyphs.extend(std::iter::repeat('●').take(count.from_dob as usize));
    if glyphs.is_empty() {
        glyphs.push('·');
    }
    glyphs
}

fn in_active_combo(world: &WorldAnalysis, digit: u8) -> bool {
    COMBO_LINES
        .iter()
        .filter(|line| line.contains(digit))
        .any(|line| world.combo_lines.contains(&line.label()))
}

pub fn render_world(world: &WorldAnalysis, language: Language) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", world.world.title(), world.calendar_date);
    for row in BOARD_LAYOUT.iter() {
        let mut line = String::from(" ");
        for &digit in row.iter() {
            let marker = if in_active_combo(world, digit) { '*' } else { ' ' };
            let glyphs = world
                .shapes
                .get(digit)
                .map(shape_glyphs)
                .unwrap_or_default();
            let cell = format!("{}{} {}", marker, digit, glyphs);
            let _ = write!(line, "{:<width$}", cell, width = CELL_WIDTH);
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }

    let digits: Vec<String> = world.dob_digits.iter().map(|d| d.to_string()).collect();
    let _ = writeln!(
        out,
        " Digits: {}  Gift number: {}  Life code: {}",
        digits.join(","),
        world.gift_number,
        world.life_code
    );

    let combos = if world.combo_lines.is_empty() {
        "none".to_string()
    } else {
        world.combo_lines.join(", ")
    };
    let _ = writeln!(out, " Active combos: {}", combos);

    let strengths: Vec<String> = world
        .shapes
        .iter()
        .filter(|(_, c)| c.is_present())
        .map(|(d, _)| format!("{} {}", d, keyword(d, language)))
        .collect();
    let _ = writeln!(out, " Present: {}", strengths.join(", "));

    out
}

pub fn render_report(report: &AnalysisReport, language: Language) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", render_world(&report.inner_world, language));
    let _ = writeln!(out, "{}", render_world(&report.outer_world, language));

    if !report.ai_analysis.is_empty() {
        let _ = writeln!(out, "AI Destiny Analysis");
        let _ = writeln!(out, "{}", report.ai_analysis.trim_end());
    } else if let Some(error) = &report.narrative_error {
        let _ = writeln!(out, "Narrative unavailable: {}", error);
    }

    out
}
