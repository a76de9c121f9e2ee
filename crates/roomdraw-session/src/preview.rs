//! Rolling preview frames.

use rand::Rng;
use roomdraw_core::{Assignment, Entry};

/// Builds one display-only frame for the rolling animation.
///
/// The frame has one row per original entry. Each row pairs a randomly
/// drawn person with an independently drawn room label, so rows may repeat
/// people or rooms; the frame is not a valid assignment.
pub fn preview_frame<R: Rng + ?Sized>(original: &[Entry], rng: &mut R) -> Vec<Assignment> {
    let len = original.len();
    (0..len)
        .map(|_| {
            let person = &original[rng.random_range(0..len)];
            let room = &original[rng.random_range(0..len)];
            Assignment::new(person.candidate(), room.room_slot())
        })
        .collect()
}
