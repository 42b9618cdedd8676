//! Score arithmetic for correct guesses.

use std::time::Duration;

/// Points for a correct guess: a flat base plus a share of the
/// multiplier that shrinks linearly over the drawing phase.
///
/// The elapsed fraction is clamped, so a guess racing the end of the
/// round still credits at least `base` — a correct guess never earns a
/// negative amount. The result is truncated toward zero.
pub fn guess_score(
    elapsed: Duration,
    round_length: Duration,
    base: i32,
    multiplier: i32,
) -> i32 {
    let consumed = if round_length.is_zero() {
        1.0
    } else {
        elapsed.as_secs_f64() / round_length.as_secs_f64()
    };
    let fraction_left = (1.0 - consumed).clamp(0.0, 1.0);
    base + (multiplier as f64 * fraction_left) as i32
}

/// The drawer's cut for one correct guess: the bonus pool divided evenly
/// (integer division) across the players in the room.
pub fn drawer_share(bonus: i32, player_count: usize) -> i32 {
    bonus / player_count.max(1) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUND: Duration = Duration::from_secs(60);

    #[test]
    fn test_instant_guess_earns_full_multiplier() {
        assert_eq!(guess_score(Duration::ZERO, ROUND, 50, 50), 100);
    }

    #[test]
    fn test_halfway_guess_earns_half_multiplier() {
        assert_eq!(guess_score(Duration::from_secs(30), ROUND, 50, 50), 75);
    }

    #[test]
    fn test_last_second_guess_earns_base() {
        assert_eq!(guess_score(ROUND, ROUND, 50, 50), 50);
    }

    #[test]
    fn test_score_strictly_decreases_with_elapsed() {
        let mut previous = i32::MAX;
        for secs in [0, 12, 24, 36, 48, 60] {
            let score =
                guess_score(Duration::from_secs(secs), ROUND, 50, 50);
            assert!(
                score < previous,
                "score at {secs}s should be below the previous sample"
            );
            previous = score;
        }
    }

    #[test]
    fn test_elapsed_beyond_round_clamps_to_base() {
        // A guess processed just after the nominal end must not dip
        // below the base.
        let late = ROUND + Duration::from_millis(500);
        assert_eq!(guess_score(late, ROUND, 50, 50), 50);
    }

    #[test]
    fn test_score_truncates_toward_zero() {
        // 1/3 elapsed → 2/3 of 50 = 33.33… → 33.
        let score = guess_score(Duration::from_secs(20), ROUND, 50, 50);
        assert_eq!(score, 50 + 33);
    }

    #[test]
    fn test_zero_round_length_earns_base() {
        assert_eq!(guess_score(Duration::ZERO, Duration::ZERO, 50, 50), 50);
    }

    #[test]
    fn test_drawer_share_divides_evenly() {
        assert_eq!(drawer_share(50, 2), 25);
        assert_eq!(drawer_share(50, 3), 16);
        assert_eq!(drawer_share(50, 8), 6);
    }

    #[test]
    fn test_drawer_share_guards_empty_room() {
        assert_eq!(drawer_share(50, 0), 50);
    }
}
