use crate::core::{combo, digits, matrix};
use crate::domain::model::{CalendarDate, DatePair, World, WorldAnalysis};

/// Runs extraction, derived numbers, tally and combo detection for one date.
pub fn analyze_world(world: World, date: &CalendarDate) -> WorldAnalysis {
    let dob_digits = digits::extract_digits(date);
    let gift_number = digits::gift_number(&dob_digits);
    let life_code = digits::life_code(&gift_number);
    let shapes = matrix::tally(&dob_digits, &gift_number, &life_code);
    let combo_lines = combo::combo_labels(&shapes);

    tracing::debug!(
        world = world.title(),
        date = %date,
        gift_number = gift_number.value(),
        life_code = life_code.value(),
        combos = combo_lines.len(),
        "World analysed"
    );

    WorldAnalysis {
        world,
        calendar_date: *date,
        dob_digits,
        gift_number,
        life_code,
        weights: shapes.weights(),
        shapes,
        combo_lines,
    }
}

/// Inner world from the Thai date, outer world from the lunar date.
pub fn analyze_pair(pair: &DatePair) -> (WorldAnalysis, WorldAnalysis) {
    (
        analyze_world(World::Inner, &pair.thai),
        analyze_world(World::Outer, &pair.lunar),
    )
}
