//! Room-slot label parsing.
//!
//! A label such as `南-16-1-1001-A` names bedroom `A` of apartment
//! `南-16-1-1001`. Every slot whose label parses to the same base room is
//! part of the same physical room.

use serde::{Deserialize, Serialize};

/// The physical-room key derived from a room-slot label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomKey {
    /// Physical room identifier; equal values mean the same room.
    pub base_room: String,
    /// Trailing sub-unit tag (a bedroom letter), if the label has one.
    pub sub_unit: Option<String>,
}

/// How labels are split into base room and sub-unit.
///
/// The default matches the campus labelling scheme: `-` separated, and a
/// sub-unit is only recognised on labels with at least five segments
/// (`building-block-unit-room-letter`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseRule {
    /// Segment separator.
    pub delimiter: char,
    /// Minimum segment count (sub-unit included) for the last segment to
    /// be treated as a sub-unit. Values below 2 behave like 2.
    pub min_segments: usize,
}

impl Default for ParseRule {
    fn default() -> Self {
        Self {
            delimiter: '-',
            min_segments: 5,
        }
    }
}

impl ParseRule {
    /// Splits `room_slot` into a [`RoomKey`]. Never fails: anything that
    /// doesn't look like `<base><delimiter><letter>` has no sub-unit.
    pub fn parse(&self, room_slot: &str) -> RoomKey {
        let segments: Vec<&str> = room_slot.split(self.delimiter).collect();
        let threshold = self.min_segments.max(2);

        if let Some((last, rest)) = segments.split_last() {
            if segments.len() >= threshold && is_sub_unit(last) {
                let mut buf = [0u8; 4];
                let sep: &str = self.delimiter.encode_utf8(&mut buf);
                return RoomKey {
                    base_room: rest.join(sep),
                    sub_unit: Some((*last).to_string()),
                };
            }
        }

        RoomKey {
            base_room: room_slot.to_string(),
            sub_unit: None,
        }
    }
}

/// Parses with [`ParseRule::default`].
pub fn parse(room_slot: &str) -> RoomKey {
    ParseRule::default().parse(room_slot)
}

fn is_sub_unit(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphabetic())
}
