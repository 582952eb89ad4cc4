//! Combat resolution: a pure function of two field arrays.
//!
//! Fired cards are queued in slot order (lowest index first) and
//! resolved by occupancy case:
//!
//! - both sides empty: nothing happens;
//! - exactly one card per side: a lockstep duel, with the loser's
//!   overflow hitting its owner's hp — and on a mutual kill, only the
//!   side that overkilled harder pays, and only the *difference*;
//! - multiple cards on both sides: front-to-back pairwise duels, then
//!   every unpaired leftover strikes the opposing player directly;
//! - one card against many: the lone card absorbs a full pass of
//!   attacks, then retaliates against the front of the queue with
//!   overflow carrying forward through kills, repeating until one side
//!   is gone. Attackers "used up" on a mid-pass kill never redirect.
//!
//! Nothing here can fail: every input combination produces an outcome.
//! Damage totals are what the owners' hp should lose; clamping at zero
//! is the caller's job.

use std::collections::VecDeque;

use manaduel_protocol::{FieldCard, FIELD_SLOTS};

/// The result of resolving one combat exchange.
///
/// Survivors are repacked from slot 0; the battle loop clears both
/// fields right after broadcasting this, so original slot positions
/// are not preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatOutcome {
    pub survivors_a: [Option<FieldCard>; FIELD_SLOTS],
    pub survivors_b: [Option<FieldCard>; FIELD_SLOTS],
    /// Hp damage suffered by the owner of field `a`.
    pub damage_to_a: i32,
    /// Hp damage suffered by the owner of field `b`.
    pub damage_to_b: i32,
}

/// Resolves one combat exchange between two fields.
pub fn resolve_combat(
    field_a: &[Option<FieldCard>; FIELD_SLOTS],
    field_b: &[Option<FieldCard>; FIELD_SLOTS],
) -> CombatOutcome {
    let qa: VecDeque<FieldCard> = field_a.iter().flatten().cloned().collect();
    let qb: VecDeque<FieldCard> = field_b.iter().flatten().cloned().collect();

    match (qa.len(), qb.len()) {
        (0, 0) => CombatOutcome {
            survivors_a: Default::default(),
            survivors_b: Default::default(),
            damage_to_a: 0,
            damage_to_b: 0,
        },
        (1, 1) => {
            let duel = duel(qa[0].clone(), qb[0].clone());
            CombatOutcome {
                survivors_a: pack(duel.survivor_a.into_iter().collect()),
                survivors_b: pack(duel.survivor_b.into_iter().collect()),
                damage_to_a: duel.damage_to_a,
                damage_to_b: duel.damage_to_b,
            }
        }
        (1, n) if n > 1 => {
            let half = solo_vs_multi(qa[0].clone(), qb);
            CombatOutcome {
                survivors_a: pack(half.solo_survivor.into_iter().collect()),
                survivors_b: pack(half.multi_survivors),
                damage_to_a: half.damage_to_solo_owner,
                damage_to_b: half.damage_to_multi_owner,
            }
        }
        (n, 1) if n > 1 => {
            let half = solo_vs_multi(qb[0].clone(), qa);
            CombatOutcome {
                survivors_a: pack(half.multi_survivors),
                survivors_b: pack(half.solo_survivor.into_iter().collect()),
                damage_to_a: half.damage_to_multi_owner,
                damage_to_b: half.damage_to_solo_owner,
            }
        }
        // Covers N-vs-M with both > 1, and any case where one side is
        // empty (the pairwise loop never runs and every card on the
        // populated side strikes the opposing player directly).
        _ => pairwise(qa, qb),
    }
}

/// Outcome of a single 1v1 duel.
struct DuelOutcome {
    survivor_a: Option<FieldCard>,
    survivor_b: Option<FieldCard>,
    damage_to_a: i32,
    damage_to_b: i32,
}

/// Two cards exchange simultaneous damage in lockstep until at least
/// one reaches non-positive defense.
///
/// Mutual kill: the side with the larger overflow pays the difference;
/// an exact tie costs neither owner anything.
fn duel(mut a: FieldCard, mut b: FieldCard) -> DuelOutcome {
    // Two harmless cards would never finish the exchange.
    if a.attack <= 0 && b.attack <= 0 {
        return DuelOutcome {
            survivor_a: Some(a),
            survivor_b: Some(b),
            damage_to_a: 0,
            damage_to_b: 0,
        };
    }

    loop {
        let next_a = a.defense - b.attack;
        let next_b = b.defense - a.attack;
        a.defense = next_a;
        b.defense = next_b;
        if a.defense <= 0 || b.defense <= 0 {
            break;
        }
    }

    match (a.defense > 0, b.defense > 0) {
        (true, false) => DuelOutcome {
            damage_to_b: -b.defense,
            survivor_a: Some(a),
            survivor_b: None,
            damage_to_a: 0,
        },
        (false, true) => DuelOutcome {
            damage_to_a: -a.defense,
            survivor_a: None,
            survivor_b: Some(b),
            damage_to_b: 0,
        },
        // Mutual kill: overflow-difference rule.
        _ => {
            let overflow_a = -a.defense;
            let overflow_b = -b.defense;
            DuelOutcome {
                survivor_a: None,
                survivor_b: None,
                damage_to_a: (overflow_a - overflow_b).max(0),
                damage_to_b: (overflow_b - overflow_a).max(0),
            }
        }
    }
}

/// Front-to-back pairwise resolution for N-vs-M (and the degenerate
/// cases where one queue is empty from the start).
fn pairwise(mut qa: VecDeque<FieldCard>, mut qb: VecDeque<FieldCard>) -> CombatOutcome {
    let mut survivors_a = Vec::new();
    let mut survivors_b = Vec::new();
    let mut damage_to_a = 0;
    let mut damage_to_b = 0;

    while let (Some(a), Some(b)) = (qa.pop_front(), qb.pop_front()) {
        let duel = duel(a, b);
        survivors_a.extend(duel.survivor_a);
        survivors_b.extend(duel.survivor_b);
        damage_to_a += duel.damage_to_a;
        damage_to_b += duel.damage_to_b;
    }

    // Whichever queue still holds cards was never answered: each
    // leftover deals its full attack to the opposing player.
    for card in qa {
        damage_to_b += card.attack.max(0);
        survivors_a.push(card);
    }
    for card in qb {
        damage_to_a += card.attack.max(0);
        survivors_b.push(card);
    }

    CombatOutcome {
        survivors_a: pack(survivors_a),
        survivors_b: pack(survivors_b),
        damage_to_a,
        damage_to_b,
    }
}

/// Outcome of the solo-vs-multi case, sides abstracted.
struct SoloOutcome {
    solo_survivor: Option<FieldCard>,
    multi_survivors: Vec<FieldCard>,
    damage_to_solo_owner: i32,
    damage_to_multi_owner: i32,
}

/// One card against a queue of two or more.
///
/// Each round trip: the full multi queue attacks the solo card in
/// order; if it survives, it retaliates against the queue front with
/// overflow cascading through kills. A kill mid-pass consumes the
/// remaining attackers (no redirect). Retaliation overflow with no
/// card left to absorb it lands on the multi owner's hp.
fn solo_vs_multi(mut solo: FieldCard, mut queue: VecDeque<FieldCard>) -> SoloOutcome {
    let mut damage_to_solo_owner = 0;
    let mut damage_to_multi_owner = 0;

    while !queue.is_empty() {
        // Stalemate guard: nobody left who can deal damage.
        if solo.attack <= 0 && queue.iter().all(|c| c.attack <= 0) {
            break;
        }

        // The pass: every queued card strikes the solo card.
        for attacker in &queue {
            solo.defense -= attacker.attack;
            if solo.defense <= 0 {
                damage_to_solo_owner += -solo.defense;
                return SoloOutcome {
                    solo_survivor: None,
                    multi_survivors: queue.into_iter().collect(),
                    damage_to_solo_owner,
                    damage_to_multi_owner,
                };
            }
        }

        // Retaliation with kill-carry-forward.
        let mut overflow = solo.attack;
        while overflow > 0 {
            match queue.front_mut() {
                Some(front) => {
                    front.defense -= overflow;
                    if front.defense <= 0 {
                        overflow = -front.defense;
                        queue.pop_front();
                    } else {
                        overflow = 0;
                    }
                }
                None => {
                    damage_to_multi_owner += overflow;
                    overflow = 0;
                }
            }
        }
    }

    SoloOutcome {
        solo_survivor: Some(solo),
        multi_survivors: queue.into_iter().collect(),
        damage_to_solo_owner,
        damage_to_multi_owner,
    }
}

/// Repacks survivors into a field array from slot 0.
fn pack(cards: Vec<FieldCard>) -> [Option<FieldCard>; FIELD_SLOTS] {
    let mut field: [Option<FieldCard>; FIELD_SLOTS] = Default::default();
    for (slot, card) in cards.into_iter().take(FIELD_SLOTS).enumerate() {
        field[slot] = Some(card);
    }
    field
}
