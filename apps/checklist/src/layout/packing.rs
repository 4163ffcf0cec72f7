//! Packing Engine — assigns whole categories to columns under a height budget.
//!
//! # Strategies
//! - `best_fit`: first-fit-decreasing. Categories sorted by height (descending, stable);
//!   each goes into the first column with room, or a new column.
//! - `alphabetical`, `numerical`, `custom`: order the categories, then *sequential fill*:
//!   only the last column is ever considered, earlier columns are never backfilled.
//!
//! A category is never split. One that is taller than a whole column is placed alone in a
//! new column and reported as an overflow; that is accepted, not an error.
//!
//! Decisions are reported through a [`PackObserver`] so they can be logged or inspected.

use tracing::{debug, warn};

use crate::errors::AppError;
use crate::layout::geometry::LayoutConfig;
use crate::models::{Category, CategoryCollection};

// ────────────────────────────────────────────────────────────────────────────
// Strategy selection
// ────────────────────────────────────────────────────────────────────────────

/// The packing policy, chosen once when the settings are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PackingStrategy {
    /// First-fit-decreasing bin packing.
    #[default]
    BestFit,
    /// Category names ascending, case-sensitive (`"Z" < "a"`).
    Alphabetical,
    /// Category names parsed as numbers, ascending.
    Numerical,
    /// Position in `order`; unlisted categories last, in input order.
    /// `None` keeps the input order.
    Custom { order: Option<Vec<String>> },
}

impl PackingStrategy {
    /// Maps the `fit_method` setting to a strategy. Unknown names fall back to `best_fit`.
    pub fn resolve(fit_method: Option<&str>, category_order: Option<Vec<String>>) -> Self {
        match fit_method.unwrap_or("best_fit") {
            "best_fit" => PackingStrategy::BestFit,
            "alphabetical" => PackingStrategy::Alphabetical,
            "numerical" => PackingStrategy::Numerical,
            "custom" => PackingStrategy::Custom {
                order: category_order,
            },
            other => {
                warn!("Invalid fit method '{other}', defaulting to 'best_fit'");
                PackingStrategy::BestFit
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PackingStrategy::BestFit => "best_fit",
            PackingStrategy::Alphabetical => "alphabetical",
            PackingStrategy::Numerical => "numerical",
            PackingStrategy::Custom { .. } => "custom",
        }
    }

    /// Assigns every category of the collection to exactly one column.
    pub fn assign_columns<'a>(
        &self,
        categories: &'a CategoryCollection,
        config: &LayoutConfig,
        observer: &mut dyn PackObserver,
    ) -> Result<Vec<Column<'a>>, AppError> {
        let columns = match self {
            PackingStrategy::BestFit => best_fit(categories.iter().collect(), config, observer),
            PackingStrategy::Alphabetical => {
                sequential_fill(sort_alphabetically(categories), config, observer)
            }
            PackingStrategy::Numerical => {
                sequential_fill(sort_numerically(categories)?, config, observer)
            }
            PackingStrategy::Custom { order } => {
                sequential_fill(sort_custom(categories, order.as_deref()), config, observer)
            }
        };
        Ok(columns)
    }
}

/// Packs `categories` with the strategy selected in `config`.
pub fn pack<'a>(
    categories: &'a CategoryCollection,
    config: &LayoutConfig,
    observer: &mut dyn PackObserver,
) -> Result<Vec<Column<'a>>, AppError> {
    config.strategy.assign_columns(categories, config, observer)
}

// ────────────────────────────────────────────────────────────────────────────
// Observer
// ────────────────────────────────────────────────────────────────────────────

/// A single packing decision.
#[derive(Debug, Clone, PartialEq)]
pub enum PackEvent {
    Measured { category: String, height: f32 },
    ColumnOpened { column: usize, budget: f32 },
    Placed { category: String, column: usize, remaining: f32 },
    /// The category alone is taller than a column.
    Overflow { category: String, height: f32, budget: f32 },
}

pub trait PackObserver {
    fn on_event(&mut self, event: PackEvent);
}

/// Records events for later inspection.
impl PackObserver for Vec<PackEvent> {
    fn on_event(&mut self, event: PackEvent) {
        self.push(event);
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PackObserver for TracingObserver {
    fn on_event(&mut self, event: PackEvent) {
        match event {
            PackEvent::Measured { category, height } => {
                debug!(%category, height, "Measured category");
            }
            PackEvent::ColumnOpened { column, budget } => {
                debug!(column = column + 1, budget, "Opened column");
            }
            PackEvent::Placed {
                category,
                column,
                remaining,
            } => {
                debug!(%category, column = column + 1, remaining, "Placed category");
            }
            PackEvent::Overflow {
                category,
                height,
                budget,
            } => {
                warn!(
                    %category,
                    height,
                    budget,
                    "Category is taller than a column; placing it alone"
                );
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Columns
// ────────────────────────────────────────────────────────────────────────────

/// A packed column: categories top to bottom. Immutable once packing returns.
#[derive(Debug, Clone, PartialEq)]
pub struct Column<'a> {
    categories: Vec<&'a Category>,
    height: f32,
}

impl<'a> Column<'a> {
    pub fn categories(&self) -> &[&'a Category] {
        &self.categories
    }

    /// Total CategoryHeight of the column's content.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

}

/// Column under construction, tracking its remaining budget.
struct OpenColumn<'a> {
    categories: Vec<&'a Category>,
    remaining: f32,
    height: f32,
}

impl OpenColumn<'_> {
    fn has_room_for(&self, height: f32) -> bool {
        self.remaining - height >= 0.0
    }
}

struct ColumnSet<'a> {
    columns: Vec<OpenColumn<'a>>,
    budget: f32,
}

impl<'a> ColumnSet<'a> {
    fn new(budget: f32) -> Self {
        Self {
            columns: Vec::new(),
            budget,
        }
    }

    fn open(&mut self, category: &'a Category, height: f32, observer: &mut dyn PackObserver) {
        let column = self.columns.len();
        observer.on_event(PackEvent::ColumnOpened {
            column,
            budget: self.budget,
        });
        if height > self.budget {
            observer.on_event(PackEvent::Overflow {
                category: category.name.clone(),
                height,
                budget: self.budget,
            });
        }
        self.columns.push(OpenColumn {
            categories: Vec::new(),
            remaining: self.budget,
            height: 0.0,
        });
        self.place(column, category, height, observer);
    }

    fn place(
        &mut self,
        column: usize,
        category: &'a Category,
        height: f32,
        observer: &mut dyn PackObserver,
    ) {
        let target = &mut self.columns[column];
        target.categories.push(category);
        target.remaining -= height;
        target.height += height;
        observer.on_event(PackEvent::Placed {
            category: category.name.clone(),
            column,
            remaining: target.remaining,
        });
    }

    fn finish(self) -> Vec<Column<'a>> {
        self.columns
            .into_iter()
            .map(|c| Column {
                categories: c.categories,
                height: c.height,
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fill policies
// ────────────────────────────────────────────────────────────────────────────

fn measure<'a>(
    ordered: Vec<&'a Category>,
    config: &LayoutConfig,
    observer: &mut dyn PackObserver,
) -> Vec<(&'a Category, f32)> {
    ordered
        .into_iter()
        .map(|category| {
            let height = config.category_height(category);
            observer.on_event(PackEvent::Measured {
                category: category.name.clone(),
                height,
            });
            (category, height)
        })
        .collect()
}

/// First-fit-decreasing: tallest first, each into the first column with room.
fn best_fit<'a>(
    categories: Vec<&'a Category>,
    config: &LayoutConfig,
    observer: &mut dyn PackObserver,
) -> Vec<Column<'a>> {
    let mut measured = measure(categories, config, observer);
    // Stable: equal heights keep input order.
    measured.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut set = ColumnSet::new(config.usable_height());
    for (category, height) in measured {
        match set.columns.iter().position(|c| c.has_room_for(height)) {
            Some(column) => set.place(column, category, height, observer),
            None => set.open(category, height, observer),
        }
    }
    set.finish()
}

/// Appends to the last column only; opens a new one when it is full.
fn sequential_fill<'a>(
    ordered: Vec<&'a Category>,
    config: &LayoutConfig,
    observer: &mut dyn PackObserver,
) -> Vec<Column<'a>> {
    let measured = measure(ordered, config, observer);

    let mut set = ColumnSet::new(config.usable_height());
    for (category, height) in measured {
        match set.columns.last() {
            Some(last) if last.has_room_for(height) => {
                let column = set.columns.len() - 1;
                set.place(column, category, height, observer);
            }
            _ => set.open(category, height, observer),
        }
    }
    set.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Orderings
// ────────────────────────────────────────────────────────────────────────────

fn sort_alphabetically(categories: &CategoryCollection) -> Vec<&Category> {
    let mut ordered: Vec<&Category> = categories.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));
    ordered
}

fn sort_numerically(categories: &CategoryCollection) -> Result<Vec<&Category>, AppError> {
    let mut keyed = categories
        .iter()
        .map(|c| {
            c.name
                .trim()
                .parse::<f64>()
                .map(|key| (key, c))
                .map_err(|_| AppError::NonNumericCategory(c.name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, c)| c).collect())
}

fn sort_custom<'a>(categories: &'a CategoryCollection, order: Option<&[String]>) -> Vec<&'a Category> {
    let mut ordered: Vec<&Category> = categories.iter().collect();
    if let Some(order) = order {
        ordered.sort_by_key(|c| {
            order
                .iter()
                .position(|name| *name == c.name)
                .unwrap_or(usize::MAX)
        });
    }
    ordered
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
