//! Record store
//!
//! Saved budgets live outside the engine. The store owns identity: it assigns
//! ids and creation timestamps, and keeps the raw input next to the computed
//! snapshot, projections and (optionally) rendered charts.
//!
//! Two implementations:
//! - [`MemoryStore`] - process-local, used by tests and `--no-save` flows
//! - [`JsonFileStore`] - a single JSON document, rewritten atomically

use std::fs;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::calculator::BudgetSnapshot;
use crate::charts::{chart_series, ChartRenderer, ChartSet};
use crate::error::{Error, Result};
use crate::frequency::PaycheckContributions;
use crate::input::{BudgetInput, RawInput};
use crate::projection::{project, ProjectionSet};

/// A saved budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecord {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Raw input as submitted, plus resolved percents and per-paycheck amounts
    pub input_data: RawInput,
    pub calculations: BudgetSnapshot,
    pub projections: ProjectionSet,
    #[serde(default)]
    pub charts: ChartSet,
}

/// A budget about to be saved (no identity yet)
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub name: String,
    pub input_data: RawInput,
    pub calculations: BudgetSnapshot,
    pub projections: ProjectionSet,
    pub charts: ChartSet,
}

/// List view of a saved budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub liquid_savings: f64,
    pub monthly_401k_employee: f64,
    pub monthly_401k_employer: f64,
    pub monthly_401k_total: f64,
    pub total_monthly_savings: f64,
    pub savings_rate: f64,
    pub monthly_income: f64,
}

impl From<&BudgetRecord> for RecordSummary {
    fn from(record: &BudgetRecord) -> Self {
        let c = &record.calculations;
        Self {
            id: record.id,
            name: record.name.clone(),
            created_at: record.created_at,
            liquid_savings: c.liquid_savings,
            monthly_401k_employee: c.monthly_401k_employee,
            monthly_401k_employer: c.monthly_401k_employer,
            monthly_401k_total: c.monthly_401k_total,
            total_monthly_savings: c.total_monthly_savings,
            savings_rate: c.savings_rate,
            monthly_income: c.monthly_income,
        }
    }
}

/// Persistence collaborator for calculated budgets
pub trait BudgetStore: Send + Sync {
    /// Human-readable location for status output
    fn location(&self) -> String;

    fn insert(&self, record: NewRecord) -> Result<BudgetRecord>;

    fn list(&self) -> Result<Vec<RecordSummary>>;

    fn get(&self, id: u64) -> Result<BudgetRecord>;

    fn delete(&self, id: u64) -> Result<()>;

    fn set_charts(&self, id: u64, charts: ChartSet) -> Result<BudgetRecord>;

    fn count(&self) -> Result<usize>;
}

/// On-disk / in-memory document shared by both stores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Records {
    /// Ids are never reused, even after deletes
    next_id: u64,
    records: Vec<BudgetRecord>,
}

impl Records {
    fn insert(&mut self, new: NewRecord) -> BudgetRecord {
        self.next_id = self
            .next_id
            .max(self.records.iter().map(|r| r.id).max().unwrap_or(0))
            + 1;
        let record = BudgetRecord {
            id: self.next_id,
            name: new.name,
            created_at: Utc::now(),
            input_data: new.input_data,
            calculations: new.calculations,
            projections: new.projections,
            charts: new.charts,
        };
        self.records.push(record.clone());
        record
    }

    fn get(&self, id: u64) -> Result<&BudgetRecord> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("budget {}", id)))
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut BudgetRecord> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("budget {}", id)))
    }

    fn delete(&mut self, id: u64) -> Result<()> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return Err(Error::NotFound(format!("budget {}", id)));
        }
        Ok(())
    }

    fn summaries(&self) -> Vec<RecordSummary> {
        self.records.iter().map(RecordSummary::from).collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| Error::Store("store lock poisoned".to_string()))
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BudgetStore for MemoryStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn insert(&self, record: NewRecord) -> Result<BudgetRecord> {
        Ok(lock(&self.records)?.insert(record))
    }

    fn list(&self) -> Result<Vec<RecordSummary>> {
        Ok(lock(&self.records)?.summaries())
    }

    fn get(&self, id: u64) -> Result<BudgetRecord> {
        lock(&self.records)?.get(id).cloned()
    }

    fn delete(&self, id: u64) -> Result<()> {
        lock(&self.records)?.delete(id)
    }

    fn set_charts(&self, id: u64, charts: ChartSet) -> Result<BudgetRecord> {
        let mut records = lock(&self.records)?;
        let record = records.get_mut(id)?;
        record.charts = charts;
        Ok(record.clone())
    }

    fn count(&self) -> Result<usize> {
        Ok(lock(&self.records)?.records.len())
    }
}

/// Store backed by one JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    guard: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store at `path`. The file is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Records> {
        if !self.path.exists() {
            return Ok(Records::default());
        }
        let file = fs::File::open(&self.path).map_err(|e| {
            Error::Store(format!("Failed to open {}: {}", self.path.display(), e))
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            Error::Store(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    /// Write to a temp file in the same directory, then rename over the store
    fn write(&self, records: &Records) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            info!("Created store directory: {}", dir.display());
        }

        let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut temp, records)?;
        temp.flush()?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| {
            Error::Store(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;
        Ok(())
    }

    fn update<T>(&self, f: impl FnOnce(&mut Records) -> Result<T>) -> Result<T> {
        let _guard = lock(&self.guard)?;
        let mut records = self.read()?;
        let out = f(&mut records)?;
        self.write(&records)?;
        Ok(out)
    }
}

impl BudgetStore for JsonFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn insert(&self, record: NewRecord) -> Result<BudgetRecord> {
        self.update(|records| Ok(records.insert(record)))
    }

    fn list(&self) -> Result<Vec<RecordSummary>> {
        let _guard = lock(&self.guard)?;
        Ok(self.read()?.summaries())
    }

    fn get(&self, id: u64) -> Result<BudgetRecord> {
        let _guard = lock(&self.guard)?;
        self.read()?.get(id).cloned()
    }

    fn delete(&self, id: u64) -> Result<()> {
        self.update(|records| records.delete(id))
    }

    fn set_charts(&self, id: u64, charts: ChartSet) -> Result<BudgetRecord> {
        self.update(|records| {
            let record = records.get_mut(id)?;
            record.charts = charts;
            Ok(record.clone())
        })
    }

    fn count(&self) -> Result<usize> {
        let _guard = lock(&self.guard)?;
        Ok(self.read()?.records.len())
    }
}

/// Name for a budget saved without one, e.g. "Budget 2026-10-16 09:30"
pub fn default_record_name(format: &str) -> Result<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(Error::Config(format!("Invalid name format: {}", format)));
    }
    Ok(Local::now().format_with_items(items.into_iter()).to_string())
}

/// Raw input with the resolved percents and per-paycheck dollar amounts added
pub fn augmented_input(raw: &RawInput, input: &BudgetInput) -> RawInput {
    let mut data = raw.clone();
    let percents = input.resolved_percents();
    let per_paycheck = PaycheckContributions::from_input(input);

    let extras = [
        ("retirement_401k_percent", percents.retirement_contribution_percent),
        ("employer_401k_match_percent", percents.employer_match_percent),
        ("retirement_401k_amount_per_paycheck", per_paycheck.employee),
        ("employer_401k_match_amount_per_paycheck", per_paycheck.employer),
    ];
    for (key, value) in extras {
        data.insert(key.to_string(), Value::from(value));
    }
    data
}

/// Render charts, logging instead of failing
fn try_render(
    renderer: &dyn ChartRenderer,
    snapshot: &BudgetSnapshot,
    projections: &ProjectionSet,
) -> Option<ChartSet> {
    match renderer.render(&chart_series(snapshot, projections)) {
        Ok(charts) => Some(charts),
        Err(e) => {
            warn!(renderer = renderer.name(), error = %e, "Chart rendering failed");
            None
        }
    }
}

/// Save a computed budget. Chart rendering is best effort: a failing
/// renderer leaves the record without charts.
pub fn save_budget(
    store: &dyn BudgetStore,
    renderer: Option<&dyn ChartRenderer>,
    name: String,
    raw: &RawInput,
    input: &BudgetInput,
    snapshot: BudgetSnapshot,
) -> Result<BudgetRecord> {
    let projections = project(&snapshot);
    // A non-finite figure would be written as null and break every later read
    projections.check_finite()?;
    let charts = renderer
        .and_then(|r| try_render(r, &snapshot, &projections))
        .unwrap_or_default();

    let record = store.insert(NewRecord {
        name,
        input_data: augmented_input(raw, input),
        calculations: snapshot,
        projections,
        charts,
    })?;
    info!(id = record.id, name = %record.name, "Budget saved");
    Ok(record)
}

/// Fetch a budget, rendering and saving charts if it has none yet
pub fn load_budget(
    store: &dyn BudgetStore,
    renderer: Option<&dyn ChartRenderer>,
    id: u64,
) -> Result<BudgetRecord> {
    let record = store.get(id)?;
    let renderer = match renderer {
        Some(r) if record.charts.is_empty() => r,
        _ => return Ok(record),
    };

    let Some(charts) = try_render(renderer, &record.calculations, &record.projections) else {
        return Ok(record);
    };
    match store.set_charts(id, charts.clone()) {
        Ok(updated) => Ok(updated),
        Err(e) => {
            warn!(id, error = %e, "Failed to save regenerated charts");
            Ok(BudgetRecord { charts, ..record })
        }
    }
}
