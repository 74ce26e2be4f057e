//! Deciding who won.
//!
//! Elimination events are authoritative. Recordings that end on the cycle
//! limit carry none, so the resolver falls back to execution activity
//! over the whole log: more executions wins, then the later last
//! execution, then a draw.

use std::fmt;

use coreplay_format::{Event, EventKind, WarriorId};

use crate::state::ReplayCursor;

/// Result of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BattleOutcome {
    /// The first warrior (id 0) won.
    Warrior1Wins,
    /// The second warrior (id 1) won.
    Warrior2Wins,
    /// Neither won.
    Draw,
    /// The replay has not reached the end yet.
    Undetermined,
}

impl BattleOutcome {
    /// Outcome in which `warrior` wins.
    pub fn win_for(warrior: WarriorId) -> Self {
        match warrior {
            WarriorId::FIRST => Self::Warrior1Wins,
            _ => Self::Warrior2Wins,
        }
    }

    /// The winner, if there is one.
    pub fn winner(self) -> Option<WarriorId> {
        match self {
            Self::Warrior1Wins => Some(WarriorId::FIRST),
            Self::Warrior2Wins => Some(WarriorId::SECOND),
            Self::Draw | Self::Undetermined => None,
        }
    }

    /// Whether the battle has been decided (a win or a draw).
    pub fn is_decided(self) -> bool {
        self != Self::Undetermined
    }
}

impl fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warrior1Wins => write!(f, "warrior 1 wins"),
            Self::Warrior2Wins => write!(f, "warrior 2 wins"),
            Self::Draw => write!(f, "draw"),
            Self::Undetermined => write!(f, "undetermined"),
        }
    }
}

/// Which rule settled the outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerdictBasis {
    /// The cursor has not reached the end.
    Pending,
    /// One or both warriors were explicitly eliminated.
    Elimination,
    /// No eliminations; one warrior executed strictly more instructions.
    ExecutionCount,
    /// Execution counts tied; one warrior executed later.
    LastExecution,
    /// Nothing separated the warriors.
    Tie,
}

/// Outcome plus the evidence behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    /// The outcome.
    pub outcome: BattleOutcome,
    /// Rule that decided it.
    pub basis: VerdictBasis,
    /// Execute events per warrior across the whole log. Zero when the
    /// fallback was not needed.
    pub executions: [u64; 2],
    /// Cycle of each warrior's last execute event, if any.
    pub last_execution: [Option<u32>; 2],
}

impl Verdict {
    fn settled(outcome: BattleOutcome, basis: VerdictBasis) -> Self {
        Self {
            outcome,
            basis,
            executions: [0; 2],
            last_execution: [None; 2],
        }
    }
}

/// Resolve the outcome. Returns [`BattleOutcome::Undetermined`] until the
/// cursor has consumed every event.
pub fn resolve(cursor: &ReplayCursor, events: &[Event]) -> BattleOutcome {
    judge(cursor, events).outcome
}

/// Resolve the outcome and report how it was reached.
pub fn judge(cursor: &ReplayCursor, events: &[Event]) -> Verdict {
    if cursor.position() < events.len() {
        return Verdict::settled(BattleOutcome::Undetermined, VerdictBasis::Pending);
    }

    match cursor.eliminated_count() {
        2 => return Verdict::settled(BattleOutcome::Draw, VerdictBasis::Elimination),
        1 => {
            if let Some(fallen) = cursor.eliminated().next() {
                return Verdict::settled(
                    BattleOutcome::win_for(fallen.opponent()),
                    VerdictBasis::Elimination,
                );
            }
        }
        _ => {}
    }

    let mut executions = [0u64; 2];
    let mut last_execution: [Option<u32>; 2] = [None; 2];
    for event in events.iter().filter(|e| e.kind == EventKind::Execute) {
        let i = event.warrior.index();
        executions[i] += 1;
        last_execution[i] = Some(last_execution[i].map_or(event.cycle, |c| c.max(event.cycle)));
    }

    let (w0, w1) = (WarriorId::FIRST.index(), WarriorId::SECOND.index());
    let (outcome, basis) = if executions[w0] != executions[w1] {
        let leader = if executions[w0] > executions[w1] {
            WarriorId::FIRST
        } else {
            WarriorId::SECOND
        };
        (BattleOutcome::win_for(leader), VerdictBasis::ExecutionCount)
    } else if last_execution[w0] != last_execution[w1] {
        // `None < Some(_)`: a warrior that never executed ranks lowest.
        let leader = if last_execution[w0] > last_execution[w1] {
            WarriorId::FIRST
        } else {
            WarriorId::SECOND
        };
        (BattleOutcome::win_for(leader), VerdictBasis::LastExecution)
    } else {
        (BattleOutcome::Draw, VerdictBasis::Tie)
    };

    Verdict {
        outcome,
        basis,
        executions,
        last_execution,
    }
}
