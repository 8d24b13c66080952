//! Per-group measurements, the engine's output.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::defaults::Tolerances;
use crate::document::Groups;
use crate::errors::MeasureError;
use crate::log::debug;
use crate::shapes::Measure;
use crate::types::Bounds;

/// Total outline length and union box of one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupMeasure {
    /// Sum of every shape's length, in user units.
    pub length: f64,
    /// `None` when the group drew nothing.
    pub bounds: Option<Bounds>,
}

/// Measurements keyed by sanitized group id.
///
/// Serializes as a plain map, `{"8MM": {"length": .., "bounds": {..}}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Report {
    pub groups: BTreeMap<String, GroupMeasure>,
}

impl Report {
    /// Measure every shape of every group. The first failing shape aborts
    /// the whole report.
    pub fn from_groups(groups: &Groups, tolerances: &Tolerances) -> Result<Report, MeasureError> {
        let mut report = Report::default();
        for (id, shapes) in groups {
            let mut length = 0.0;
            let mut bounds = Bounds::EMPTY;
            for (i, shape) in shapes.iter().enumerate() {
                let (l, b) = shape
                    .measure(tolerances)
                    .map_err(|e| e.within(format!("<{}> #{} in group {id:?}", shape.kind(), i + 1)))?;
                length += l;
                bounds = bounds.expand(b);
            }
            debug!(group = %id, length, "measured group");
            report.groups.insert(
                id.clone(),
                GroupMeasure {
                    length,
                    bounds: bounds.non_empty(),
                },
            );
        }
        Ok(report)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&GroupMeasure> {
        self.groups.get(id)
    }

    pub fn total_length(&self) -> f64 {
        self.groups.values().map(|g| g.length).sum()
    }

    /// Union of every group's box; `None` when nothing was drawn.
    pub fn bounds(&self) -> Option<Bounds> {
        self.groups
            .values()
            .filter_map(|g| g.bounds)
            .reduce(Bounds::expand)
    }
}

fn write_row(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    width: usize,
    length: f64,
    bounds: Option<Bounds>,
) -> fmt::Result {
    write!(f, "{name:<width$}  {length:>10.2}")?;
    match bounds {
        Some(b) => writeln!(f, "  {:>10.2}  {:>10.2}", b.width(), b.height()),
        None => writeln!(f, "  {:>10}  {:>10}", "-", "-"),
    }
}

/// A plain table: one row per group, then the total.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .groups
            .keys()
            .map(|id| id.chars().count())
            .chain(["group".len()])
            .max()
            .unwrap_or_default();
        writeln!(
            f,
            "{:<width$}  {:>10}  {:>10}  {:>10}",
            "group", "length", "width", "height"
        )?;
        for (id, group) in &self.groups {
            write_row(f, id, width, group.length, group.bounds)?;
        }
        write_row(f, "total", width, self.total_length(), self.bounds())
    }
}
