//! Data types for recording headers and event records.

use std::fmt;

// ── WarriorId ───────────────────────────────────────────────────

/// Identifies one of the two competing warriors.
///
/// Only ids 0 and 1 exist; [`WarriorId::new`] rejects anything else, so a
/// `WarriorId` held by a validated [`Event`] is always in range.
///
/// # Examples
///
/// ```
/// use coreplay_format::WarriorId;
///
/// assert_eq!(WarriorId::new(1), Some(WarriorId::SECOND));
/// assert_eq!(WarriorId::new(2), None);
/// assert_eq!(WarriorId::FIRST.opponent(), WarriorId::SECOND);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WarriorId(u8);

impl WarriorId {
    /// The first warrior (header slot 1, wire id 0).
    pub const FIRST: Self = Self(0);
    /// The second warrior (header slot 2, wire id 1).
    pub const SECOND: Self = Self(1);
    /// Both warriors in id order.
    pub const BOTH: [Self; 2] = [Self::FIRST, Self::SECOND];

    /// Validate a raw wire id.
    pub fn new(raw: u8) -> Option<Self> {
        (raw <= 1).then_some(Self(raw))
    }

    /// The raw wire id (0 or 1).
    pub fn raw(self) -> u8 {
        self.0
    }

    /// The id as an array index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The other warrior.
    pub fn opponent(self) -> Self {
        Self(1 - self.0)
    }
}

impl fmt::Display for WarriorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── EventKind ───────────────────────────────────────────────────

/// What happened in a recorded event.
///
/// Discriminants are the wire values of the `kind` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum EventKind {
    /// An instruction was executed at `address`. `data` holds the opcode.
    Execute = 0,
    /// A cell was read.
    Read = 1,
    /// A cell was written. `data` packs the A/B fields as `a << 16 | b`.
    Write = 2,
    /// A cell was decremented in place.
    Decrement = 3,
    /// A cell was incremented in place.
    Increment = 4,
    /// A task was spawned. `data` holds the warrior's task count.
    Spawn = 5,
    /// A single task died. `data` holds the remaining task count.
    ProcessTerminate = 6,
    /// The warrior's last task died.
    WarriorEliminated = 7,
    /// A new cycle started. The event's `cycle` is the cycle number.
    CycleBoundary = 8,
    /// A task was pushed onto the queue; `address` is the pushed value.
    TaskQueuePush = 9,
}

impl EventKind {
    /// All kinds in wire order.
    pub const ALL: [Self; 10] = [
        Self::Execute,
        Self::Read,
        Self::Write,
        Self::Decrement,
        Self::Increment,
        Self::Spawn,
        Self::ProcessTerminate,
        Self::WarriorEliminated,
        Self::CycleBoundary,
        Self::TaskQueuePush,
    ];

    /// Decode a wire discriminant.
    pub fn from_wire(raw: u16) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    /// The wire discriminant.
    pub fn wire(self) -> u16 {
        self as u16
    }

    /// Short upper-case label, as printed by the inspection report.
    pub fn label(self) -> &'static str {
        match self {
            Self::Execute => "EXEC",
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Decrement => "DEC",
            Self::Increment => "INC",
            Self::Spawn => "SPL",
            Self::ProcessTerminate => "DAT",
            Self::WarriorEliminated => "DIE",
            Self::CycleBoundary => "CYCLE",
            Self::TaskQueuePush => "PUSH",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── RecordHeader ────────────────────────────────────────────────

/// The fixed 168-byte recording header.
///
/// # Examples
///
/// ```
/// use coreplay_format::{RecordHeader, WarriorId};
///
/// let header = RecordHeader::new(8000, "Imp", "Dwarf", 0, 4000);
/// assert!(header.magic_ok());
/// assert_eq!(header.name(WarriorId::SECOND), "Dwarf");
/// assert_eq!(header.expected_file_size(), 168);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordHeader {
    /// Raw magic tag. Should equal [`MAGIC`](crate::MAGIC).
    pub magic: [u8; 8],
    /// Format version.
    pub version: u32,
    /// Arena size in memory locations.
    pub core_size: u32,
    /// Cycles the simulation ran for.
    pub total_cycles: u32,
    /// Event count declared by the producer.
    pub total_events: u32,
    /// Name of the first warrior.
    pub warrior1_name: String,
    /// Name of the second warrior.
    pub warrior2_name: String,
    /// Load address of the first warrior.
    pub warrior1_start: u32,
    /// Load address of the second warrior.
    pub warrior2_start: u32,
}

impl RecordHeader {
    /// Build a current-version header with zero declared events.
    pub fn new(
        core_size: u32,
        warrior1_name: impl Into<String>,
        warrior2_name: impl Into<String>,
        warrior1_start: u32,
        warrior2_start: u32,
    ) -> Self {
        Self {
            magic: crate::MAGIC,
            version: crate::FORMAT_VERSION,
            core_size,
            total_cycles: 0,
            total_events: 0,
            warrior1_name: warrior1_name.into(),
            warrior2_name: warrior2_name.into(),
            warrior1_start,
            warrior2_start,
        }
    }

    /// Whether the magic tag matches.
    pub fn magic_ok(&self) -> bool {
        self.magic == crate::MAGIC
    }

    /// The magic tag as text, NUL padding stripped.
    pub fn magic_str(&self) -> String {
        let end = self.magic.iter().position(|&b| b == 0).unwrap_or(8);
        String::from_utf8_lossy(&self.magic[..end]).into_owned()
    }

    /// A warrior's name.
    pub fn name(&self, warrior: WarriorId) -> &str {
        match warrior {
            WarriorId::FIRST => &self.warrior1_name,
            _ => &self.warrior2_name,
        }
    }

    /// A warrior's load address.
    pub fn start(&self, warrior: WarriorId) -> u32 {
        match warrior {
            WarriorId::FIRST => self.warrior1_start,
            _ => self.warrior2_start,
        }
    }

    /// File size implied by the declared event count.
    pub fn expected_file_size(&self) -> u64 {
        crate::reader::expected_file_size(self.total_events)
    }
}

// ── Events ──────────────────────────────────────────────────────

/// An event record exactly as it sits on the wire, before validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawEvent {
    /// Cycle the event happened in.
    pub cycle: u32,
    /// Arena address (or pushed value for queue pushes).
    pub address: u16,
    /// Undecoded [`EventKind`] discriminant.
    pub kind: u16,
    /// Undecoded warrior id.
    pub warrior: u8,
    /// Kind-specific payload.
    pub data: u32,
}

/// Why a raw record was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordDefect {
    /// `address >= core_size`.
    AddressOutOfRange {
        /// The offending address.
        address: u16,
        /// Core size from the header.
        core_size: u32,
    },
    /// Warrior id other than 0 or 1.
    InvalidWarrior {
        /// The offending id.
        warrior: u8,
    },
    /// Kind outside the known enumeration.
    UnknownKind {
        /// The offending discriminant.
        kind: u16,
    },
}

impl fmt::Display for RecordDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddressOutOfRange { address, core_size } => {
                write!(f, "address {address} outside core of size {core_size}")
            }
            Self::InvalidWarrior { warrior } => write!(f, "invalid warrior id {warrior}"),
            Self::UnknownKind { kind } => write!(f, "unknown event kind {kind}"),
        }
    }
}

impl RawEvent {
    /// Validate against the header's core size.
    pub fn validate(&self, core_size: u32) -> Result<Event, RecordDefect> {
        if u32::from(self.address) >= core_size {
            return Err(RecordDefect::AddressOutOfRange {
                address: self.address,
                core_size,
            });
        }
        let warrior = WarriorId::new(self.warrior).ok_or(RecordDefect::InvalidWarrior {
            warrior: self.warrior,
        })?;
        let kind =
            EventKind::from_wire(self.kind).ok_or(RecordDefect::UnknownKind { kind: self.kind })?;
        Ok(Event {
            cycle: self.cycle,
            address: self.address,
            kind,
            warrior,
            data: self.data,
        })
    }
}

/// A validated event record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    /// Cycle the event happened in.
    pub cycle: u32,
    /// Arena address, always `< core_size`.
    pub address: u16,
    /// What happened.
    pub kind: EventKind,
    /// Which warrior caused it.
    pub warrior: WarriorId,
    /// Kind-specific payload.
    pub data: u32,
}

impl Event {
    /// Convenience constructor.
    pub fn new(cycle: u32, address: u16, kind: EventKind, warrior: WarriorId, data: u32) -> Self {
        Self {
            cycle,
            address,
            kind,
            warrior,
            data,
        }
    }

    /// The wire form of this event.
    pub fn to_raw(&self) -> RawEvent {
        RawEvent {
            cycle: self.cycle,
            address: self.address,
            kind: self.kind.wire(),
            warrior: self.warrior.raw(),
            data: self.data,
        }
    }

    /// Opcode of an executed instruction.
    pub fn opcode(&self) -> Option<u32> {
        (self.kind == EventKind::Execute).then_some(self.data)
    }

    /// `(a_value, b_value)` of a written cell.
    pub fn write_value(&self) -> Option<(u16, u16)> {
        (self.kind == EventKind::Write).then_some(((self.data >> 16) as u16, self.data as u16))
    }

    /// Task count carried by spawn and task-death events.
    pub fn tasks(&self) -> Option<u32> {
        matches!(self.kind, EventKind::Spawn | EventKind::ProcessTerminate).then_some(self.data)
    }
}
