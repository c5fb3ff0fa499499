//! Pin generation.

use quizrally_protocol::Pin;
use rand::Rng;

/// Generates a uniformly random 6-digit pin.
///
/// Uniqueness against live rooms is NOT guaranteed here; see
/// [`RoomStore::allocate_pin`](crate::RoomStore::allocate_pin) for the
/// collision-checked path.
pub fn generate_pin() -> Pin {
    let mut rng = rand::rng();
    Pin(rng.random_range(0..1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_pin_stays_in_six_digit_range() {
        for _ in 0..1_000 {
            let pin = generate_pin();
            assert!(pin.0 < 1_000_000);
            assert_eq!(pin.to_string().len(), 6);
        }
    }
}
