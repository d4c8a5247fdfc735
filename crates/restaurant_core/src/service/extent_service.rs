//! Load-all / save-all orchestration.
//!
//! # Responsibility
//! - Enumerate every persisted entity kind from one static table.
//! - Report per-kind outcomes without aborting on a single failure.
//!
//! # Invariants
//! - `PERSISTED_KINDS` lists each entity kind exactly once.
//! - A failure for one kind never skips the remaining kinds.
//! - Integrity violations found after `load_all` are reported, not repaired.

use crate::extent::{Entity, HasExtent, Registry};
use crate::model::customer::Customer;
use crate::model::dish::Dish;
use crate::model::menu::Menu;
use crate::model::order::Order;
use crate::model::payment::Payment;
use crate::model::reservation::Reservation;
use crate::model::restaurant::Restaurant;
use crate::model::staff::Employee;
use crate::model::table::Table;
use crate::model::valet::Valet;
use crate::persist::{ExtentStore, LoadStatus};
use crate::relation::{audit, IntegrityViolation};
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Outcome of saving one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved { path: PathBuf, count: usize },
    Failed { reason: String },
}

/// Load and save entry points for one entity kind.
pub struct PersistedKind {
    pub kind: &'static str,
    load: fn(&ExtentStore, &mut Registry) -> LoadStatus,
    save: fn(&ExtentStore, &Registry) -> SaveStatus,
}

const fn persisted<T: Entity>() -> PersistedKind
where
    Registry: HasExtent<T>,
{
    PersistedKind {
        kind: T::KIND,
        load: load_kind::<T>,
        save: save_kind::<T>,
    }
}

/// Every kind written by `save_all` and read by `load_all`, in that order.
pub static PERSISTED_KINDS: &[PersistedKind] = &[
    persisted::<Customer>(),
    persisted::<Order>(),
    persisted::<Payment>(),
    persisted::<Table>(),
    persisted::<Reservation>(),
    persisted::<Menu>(),
    persisted::<Dish>(),
    persisted::<Employee>(),
    persisted::<Restaurant>(),
    persisted::<Valet>(),
];

fn load_kind<T: Entity>(store: &ExtentStore, registry: &mut Registry) -> LoadStatus
where
    Registry: HasExtent<T>,
{
    store.load_into(registry.extent_mut::<T>())
}

fn save_kind<T: Entity>(store: &ExtentStore, registry: &Registry) -> SaveStatus
where
    Registry: HasExtent<T>,
{
    let extent = registry.extent::<T>();
    match store.save(extent) {
        Ok(path) => SaveStatus::Saved {
            path,
            count: extent.len(),
        },
        Err(err) => SaveStatus::Failed {
            reason: err.to_string(),
        },
    }
}

/// Outcome for one kind within a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindReport<S> {
    pub kind: &'static str,
    pub status: S,
}

/// Per-kind outcomes of `load_all` or `save_all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtentReport<S> {
    pub kinds: Vec<KindReport<S>>,
    /// Populated by `load_all` only.
    pub violations: Vec<IntegrityViolation>,
}

pub type LoadReport = ExtentReport<LoadStatus>;
pub type SaveReport = ExtentReport<SaveStatus>;

impl<S> ExtentReport<S> {
    pub fn status_of(&self, kind: &str) -> Option<&S> {
        self.kinds
            .iter()
            .find(|report| report.kind == kind)
            .map(|report| &report.status)
    }
}

impl LoadReport {
    /// Kinds whose file existed but could not be used.
    pub fn recovered(&self) -> usize {
        self.kinds
            .iter()
            .filter(|report| matches!(report.status, LoadStatus::Recovered { .. }))
            .count()
    }

    /// Entities installed across all kinds.
    pub fn loaded_entities(&self) -> usize {
        self.kinds
            .iter()
            .map(|report| match report.status {
                LoadStatus::Loaded { count } => count,
                LoadStatus::Missing | LoadStatus::Recovered { .. } => 0,
            })
            .sum()
    }
}

impl SaveReport {
    pub fn failed(&self) -> usize {
        self.kinds
            .iter()
            .filter(|report| matches!(report.status, SaveStatus::Failed { .. }))
            .count()
    }
}

/// Bulk persistence over every registered kind.
#[derive(Debug, Clone, Default)]
pub struct ExtentService {
    store: ExtentStore,
}

impl ExtentService {
    pub fn new(store: ExtentStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ExtentStore {
        &self.store
    }

    /// Replaces every extent in `registry` with its persisted contents.
    ///
    /// Kinds that fail to load end up empty; the registry is then audited and
    /// any violation is logged and returned in the report.
    pub fn load_all(&self, registry: &mut Registry) -> LoadReport {
        let started_at = Instant::now();
        let kinds: Vec<_> = PERSISTED_KINDS
            .iter()
            .map(|entry| KindReport {
                kind: entry.kind,
                status: (entry.load)(&self.store, registry),
            })
            .collect();

        let violations = audit(registry);
        for violation in &violations {
            warn!(
                "event=integrity_violation module=service status=error violation=\"{}\"",
                violation
            );
        }

        let report = LoadReport { kinds, violations };
        info!(
            "event=extent_load_all module=service status={} entities={} recovered={} violations={} duration_ms={}",
            if report.recovered() == 0 { "ok" } else { "error" },
            report.loaded_entities(),
            report.recovered(),
            report.violations.len(),
            started_at.elapsed().as_millis()
        );
        report
    }

    /// Writes every extent in `registry`.
    pub fn save_all(&self, registry: &Registry) -> SaveReport {
        let started_at = Instant::now();
        let kinds: Vec<_> = PERSISTED_KINDS
            .iter()
            .map(|entry| KindReport {
                kind: entry.kind,
                status: (entry.save)(&self.store, registry),
            })
            .collect();

        let report = SaveReport {
            kinds,
            violations: Vec::new(),
        };
        let failed = report.failed();
        if failed == 0 {
            info!(
                "event=extent_save_all module=service status=ok kinds={} duration_ms={}",
                report.kinds.len(),
                started_at.elapsed().as_millis()
            );
        } else {
            error!(
                "event=extent_save_all module=service status=error kinds={} failed={} duration_ms={}",
                report.kinds.len(),
                failed,
                started_at.elapsed().as_millis()
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::PERSISTED_KINDS;
    use std::collections::BTreeSet;

    #[test]
    fn persisted_kinds_are_unique_and_complete() {
        let kinds: BTreeSet<_> = PERSISTED_KINDS.iter().map(|entry| entry.kind).collect();
        assert_eq!(kinds.len(), PERSISTED_KINDS.len());
        for kind in [
            "Customer",
            "Order",
            "Payment",
            "Table",
            "Reservation",
            "Menu",
            "Dish",
            "Employee",
            "Restaurant",
            "Valet",
        ] {
            assert!(kinds.contains(kind), "{kind} is not persisted");
        }
    }
}
