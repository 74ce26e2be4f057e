//! Summary statistics for a loaded recording.
//!
//! [`InspectReport`] answers "is this file sane and what is in it"
//! without replaying it: per-kind counts, per-warrior activity, the
//! cycle range covered, and the load report.

use std::fmt;

use indexmap::IndexMap;

use crate::reader::{LoadWarning, ReadStats, Recording};
use crate::types::{EventKind, RecordHeader, WarriorId};

/// Aggregated view of a recording.
#[derive(Clone, Debug)]
pub struct InspectReport {
    /// Header as read.
    pub header: RecordHeader,
    /// Event counts per kind, in wire order. Kinds never seen are absent.
    pub kind_counts: IndexMap<EventKind, u64>,
    /// Events attributed to each warrior, indexed by [`WarriorId::index`].
    pub warrior_activity: [u64; 2],
    /// Lowest and highest cycle seen, if any events exist.
    pub cycle_range: Option<(u32, u32)>,
    /// Load statistics.
    pub stats: ReadStats,
    /// Load warnings.
    pub warnings: Vec<LoadWarning>,
}

impl InspectReport {
    /// Build a report from a loaded recording.
    pub fn new(recording: &Recording) -> Self {
        let mut counts = [0u64; 10];
        let mut warrior_activity = [0u64; 2];
        let mut cycle_range: Option<(u32, u32)> = None;

        for event in recording.events() {
            counts[event.kind.wire() as usize] += 1;
            warrior_activity[event.warrior.index()] += 1;
            cycle_range = Some(match cycle_range {
                None => (event.cycle, event.cycle),
                Some((lo, hi)) => (lo.min(event.cycle), hi.max(event.cycle)),
            });
        }

        let kind_counts = EventKind::ALL
            .iter()
            .zip(counts)
            .filter(|(_, n)| *n > 0)
            .map(|(kind, n)| (*kind, n))
            .collect();

        Self {
            header: recording.header().clone(),
            kind_counts,
            warrior_activity,
            cycle_range,
            stats: *recording.stats(),
            warnings: recording.warnings().to_vec(),
        }
    }

    /// Count for one kind (zero if never seen).
    pub fn count(&self, kind: EventKind) -> u64 {
        self.kind_counts.get(&kind).copied().unwrap_or(0)
    }
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.header;
        writeln!(f, "magic:        {:?} v{}", h.magic_str(), h.version)?;
        writeln!(f, "core size:    {}", h.core_size)?;
        writeln!(f, "cycles:       {}", h.total_cycles)?;
        writeln!(
            f,
            "events:       {} read, {} declared, {} dropped",
            self.stats.events_read,
            h.total_events,
            self.stats.invalid.total()
        )?;
        for warrior in WarriorId::BOTH {
            writeln!(
                f,
                "warrior {}:    {:?} @ {} ({} events)",
                warrior.raw() + 1,
                h.name(warrior),
                h.start(warrior),
                self.warrior_activity[warrior.index()]
            )?;
        }
        if let Some((lo, hi)) = self.cycle_range {
            writeln!(f, "cycle range:  {lo}..={hi}")?;
        }
        for (kind, n) in &self.kind_counts {
            let pct = *n as f64 * 100.0 / self.stats.events_read.max(1) as f64;
            writeln!(f, "  {:<6} {:>10} ({pct:5.1}%)", kind.label(), n)?;
        }
        for warning in &self.warnings {
            writeln!(f, "warning: {warning}")?;
        }
        Ok(())
    }
}
