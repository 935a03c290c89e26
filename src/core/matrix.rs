use crate::domain::model::{DigitBreakdown, DigitSequence, GiftNumber, LifeCode, ShapeCount};

/// Exact per-digit tally over the three weighted sources.
///
/// Each source is counted on its own: a digit found in the date, the gift
/// number and the life code contributes to all three counters at once.
pub fn tally(dob: &DigitSequence, gift: &GiftNumber, life: &LifeCode) -> DigitBreakdown {
    let mut counts = [ShapeCount::default(); 10];

    for digit in dob.iter() {
        counts[digit as usize].from_dob += 1;
    }
    for digit in gift.digits().iter() {
        counts[digit as usize].from_gift_number += 1;
    }
    for digit in life.digits().iter() {
        counts[digit as usize].from_life_code += 1;
    }

    DigitBreakdown::from_counts(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DerivedNumber;

    fn seq(digits: &[u32]) -> DigitSequence {
        let mut s = DigitSequence::default();
        for &d in digits {
            s.push_padded(d, 1);
        }
        s
    }

    #[test]
    fn test_tally_counts_each_source_independently() {
        let dob = seq(&[1, 5, 0, 5, 1, 9, 9, 0]);
        let gift = DerivedNumber::new(30);
        let life = DerivedNumber::new(3);
        let breakdown = tally(&dob, &gift, &life);

        let zero = breakdown.get(0).unwrap();
        assert_eq!((zero.from_dob, zero.from_gift_number, zero.from_life_code), (2, 1, 0));
        let three = breakdown.get(3).unwrap();
        assert_eq!((three.from_dob, three.from_gift_number, three.from_life_code), (0, 1, 1));
        assert_eq!(breakdown.weight(3), 8);
        assert_eq!(breakdown.weight(0), 5);
        assert_eq!(breakdown.weight(4), 0);
    }

    #[test]
    fn test_tally_sums_match_source_lengths() {
        let dob = seq(&[2, 9, 0, 2, 1, 9, 8, 8]);
        let gift = DerivedNumber::new(39);
        let life = DerivedNumber::new(3);
        let breakdown = tally(&dob, &gift, &life);

        let (circles, triangles, squares) = breakdown.iter().fold((0, 0, 0), |acc, (_, c)| {
            (acc.0 + c.from_dob, acc.1 + c.from_gift_number, acc.2 + c.from_life_code)
        });
        assert_eq!(circles as usize, dob.len());
        assert_eq!(triangles as usize, gift.digits().len());
        assert_eq!(squares as usize, life.digits().len());
    }

    #[test]
    fn test_weight_eight_is_not_decomposed_greedily() {
        // 8 points could read as square + triangle or as eight circles; the
        // tally keeps the actual sources.
        let dob = seq(&[7, 7, 7, 7, 7, 7, 7, 7]);
        let breakdown = tally(&dob, &DerivedNumber::new(56), &DerivedNumber::new(2));
        let seven = breakdown.get(7).unwrap();
        assert_eq!(seven.weight(), 8);
        assert_eq!((seven.from_dob, seven.from_gift_number, seven.from_life_code), (8, 0, 0));
    }
}
