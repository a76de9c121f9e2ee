//! Buckets room slots by physical room.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::{Entry, ParseRule};

/// One addressable slot inside a physical room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub room_slot: String,
    pub sub_unit: Option<String>,
    /// Position of the contributing entry in the original input.
    pub original_index: usize,
}

/// All slots that share one base room, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomGroup {
    pub base_room: String,
    pub slots: Vec<Slot>,
}

impl RoomGroup {
    /// A shared room has at least two slots and must be filled by one gender.
    pub fn is_shared(&self) -> bool {
        self.slots.len() >= 2
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Result of [`group`]: shared and single rooms, each in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    pub shared: Vec<RoomGroup>,
    pub single: Vec<RoomGroup>,
}

impl Grouping {
    pub fn total_slots(&self) -> usize {
        self.shared
            .iter()
            .chain(self.single.iter())
            .map(RoomGroup::len)
            .sum()
    }
}

/// Groups the entries' room slots by base room.
///
/// Group order follows the first appearance of each base room; slots
/// within a group keep input order. A room slot label yields one slot no
/// matter how many rows repeat it; the first row's position is kept.
pub fn group(entries: &[Entry], rule: &ParseRule) -> Grouping {
    let mut order: Vec<RoomGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut labels: HashSet<&str> = HashSet::new();

    for (original_index, entry) in entries.iter().enumerate() {
        if !labels.insert(entry.room_slot()) {
            debug!(room_slot = entry.room_slot(), original_index, "repeated room slot ignored");
            continue;
        }
        let key = rule.parse(entry.room_slot());
        let slot = Slot {
            room_slot: entry.room_slot().to_string(),
            sub_unit: key.sub_unit,
            original_index,
        };
        match index.get(&key.base_room) {
            Some(&at) => order[at].slots.push(slot),
            None => {
                index.insert(key.base_room.clone(), order.len());
                order.push(RoomGroup {
                    base_room: key.base_room,
                    slots: vec![slot],
                });
            }
        }
    }

    let (shared, single) = order.into_iter().partition(RoomGroup::is_shared);
    Grouping { shared, single }
}
