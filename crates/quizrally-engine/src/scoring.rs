//! Pure point computation for a single answer.
//!
//! The reward curve is linear in the fraction of time remaining: a correct
//! answer earns between [`BASE_POINTS`] (at the last instant) and
//! [`BASE_POINTS`] + [`SPEED_BONUS`] (instantly). Wrong answers earn 0.

/// Points every correct answer earns regardless of speed.
pub const BASE_POINTS: u32 = 200;

/// Additional points awarded proportionally to the remaining-time fraction.
pub const SPEED_BONUS: u32 = 800;

/// Computes the points for one answer.
///
/// `remaining_ms` is signed: a submission that arrives after the nominal
/// deadline (or with negative remaining time from clock skew) clamps to
/// the 200-point floor rather than going negative, and a skewed early
/// submission clamps to the 1000-point ceiling.
pub fn score(is_correct: bool, remaining_ms: i64, limit_ms: u64) -> u32 {
    if !is_correct {
        return 0;
    }
    // limit_ms > 0 is enforced at question validation; max(1) keeps the
    // division defined even for a hand-built zero-limit question.
    let speed_factor =
        (remaining_ms as f64 / limit_ms.max(1) as f64).clamp(0.0, 1.0);
    (f64::from(BASE_POINTS) + f64::from(SPEED_BONUS) * speed_factor).round()
        as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_wrong_answer_is_zero() {
        assert_eq!(score(false, 10_000, 10_000), 0);
        assert_eq!(score(false, 0, 10_000), 0);
    }

    #[test]
    fn test_score_instant_answer_hits_ceiling() {
        assert_eq!(score(true, 10_000, 10_000), 1000);
    }

    #[test]
    fn test_score_last_instant_answer_hits_floor() {
        assert_eq!(score(true, 0, 10_000), 200);
    }

    #[test]
    fn test_score_eighty_percent_remaining_is_840() {
        // The reference scenario: 8000 of 10000 ms remaining.
        assert_eq!(score(true, 8_000, 10_000), 840);
    }

    #[test]
    fn test_score_negative_remaining_clamps_to_floor() {
        // Late arrival or clock skew must not push below the floor.
        assert_eq!(score(true, -500, 10_000), 200);
    }

    #[test]
    fn test_score_remaining_above_limit_clamps_to_ceiling() {
        assert_eq!(score(true, 15_000, 10_000), 1000);
    }

    #[test]
    fn test_score_zero_limit_does_not_divide_by_zero() {
        // Question validation rejects a zero limit, but the function
        // itself must still be total.
        assert_eq!(score(true, 1_000, 0), 1000);
    }

    #[test]
    fn test_score_is_monotone_in_remaining_time() {
        let limit = 10_000;
        let mut last = 0;
        for remaining in (0..=limit).step_by(250) {
            let s = score(true, remaining as i64, limit);
            assert!(s >= last, "score dropped at remaining={remaining}");
            assert!((200..=1000).contains(&s));
            last = s;
        }
    }
}
