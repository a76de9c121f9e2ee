//! The gender-constrained room allocator.
//!
//! Shared rooms are resolved first, each from a single gender pool. A
//! shared room that neither pool can fill on its own is not split; its
//! slots drop into the single-slot phase (the "overflow"), where they are
//! filled from whoever is left without a gender constraint.
//!
//! The allocator is total: every input produces a result. When slots and
//! people don't balance, the surplus is left out of the result and listed
//! in [`Allocation`].

use rand::Rng;
use tracing::{debug, trace};

use crate::grouper::{Grouping, Slot, group};
use crate::pools::{GenderPools, shuffle};
use crate::{Assignment, Candidate, EmployeeId, Entry, Gender, ParseRule};

/// Full outcome of one draw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Filled slots, in shuffled display order.
    pub assignments: Vec<Assignment>,
    /// Room slots left empty because the candidates ran out. Every row
    /// brings one person and at most one distinct slot, so this is empty
    /// for any `Entry` input; the walk still honours it.
    pub unfilled_slots: Vec<String>,
    /// Employees never dequeued because the slots ran out.
    pub unplaced: Vec<EmployeeId>,
    /// Base rooms that could not be filled by one gender and were
    /// filled slot by slot instead.
    pub overflowed_groups: Vec<String>,
}

/// Runs draws with a fixed room-label [`ParseRule`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Allocator {
    rule: ParseRule,
}

impl Allocator {
    pub fn new(rule: ParseRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> &ParseRule {
        &self.rule
    }

    /// Assigns the entries' people to the entries' room slots.
    ///
    /// `original` is only read. The only other input is `rng`.
    pub fn allocate<R: Rng + ?Sized>(&self, original: &[Entry], rng: &mut R) -> Vec<Assignment> {
        self.allocate_detailed(original, rng).assignments
    }

    /// Same draw as [`allocate`](Self::allocate), also reporting what was
    /// left over.
    pub fn allocate_detailed<R: Rng + ?Sized>(
        &self,
        original: &[Entry],
        rng: &mut R,
    ) -> Allocation {
        let mut pools = GenderPools::build(original);
        pools.shuffle(rng);

        let Grouping { mut shared, single } = group(original, &self.rule);
        shuffle(&mut shared, rng);

        let mut assignments: Vec<Assignment> = Vec::with_capacity(original.len());
        let mut overflow: Vec<Slot> = Vec::new();
        let mut overflowed_groups = Vec::new();

        for room in shared {
            let size = room.len();
            let chosen = match (pools.male.len() >= size, pools.female.len() >= size) {
                (true, true) => Some(if rng.random_bool(0.5) {
                    Gender::Male
                } else {
                    Gender::Female
                }),
                (true, false) => Some(Gender::Male),
                (false, true) => Some(Gender::Female),
                (false, false) => None,
            };

            match chosen {
                Some(gender) => {
                    let candidates = pools.take(gender, size);
                    trace!(base_room = %room.base_room, size, %gender, "shared room filled");
                    assignments.extend(
                        room.slots
                            .into_iter()
                            .zip(candidates)
                            .map(|(slot, candidate)| Assignment::new(candidate, slot.room_slot)),
                    );
                }
                None => {
                    trace!(base_room = %room.base_room, size, "shared room overflowed");
                    overflowed_groups.push(room.base_room);
                    overflow.extend(room.slots);
                }
            }
        }

        let mut remaining: Vec<Candidate> = pools.into_remaining().into();
        shuffle(&mut remaining, rng);

        let mut single_slots: Vec<Slot> = single
            .into_iter()
            .flat_map(|room| room.slots)
            .chain(overflow)
            .collect();
        shuffle(&mut single_slots, rng);

        let mut remaining = remaining.into_iter();
        let mut unfilled_slots = Vec::new();
        for slot in single_slots {
            match remaining.next() {
                Some(candidate) => assignments.push(Assignment::new(candidate, slot.room_slot)),
                None => unfilled_slots.push(slot.room_slot),
            }
        }
        let unplaced: Vec<EmployeeId> = remaining.map(|c| c.employee_id).collect();

        // Display order only.
        shuffle(&mut assignments, rng);

        debug!(
            entries = original.len(),
            assigned = assignments.len(),
            overflowed = overflowed_groups.len(),
            unfilled = unfilled_slots.len(),
            unplaced = unplaced.len(),
            "allocation complete"
        );

        Allocation {
            assignments,
            unfilled_slots,
            unplaced,
            overflowed_groups,
        }
    }
}

/// Allocates with the default [`ParseRule`].
pub fn allocate<R: Rng + ?Sized>(original: &[Entry], rng: &mut R) -> Vec<Assignment> {
    Allocator::default().allocate(original, rng)
}
