//! Document budget checker.
//!
//! The reducer reports every line, nested block and scalar it consumes to a
//! [`BudgetEnforcer`], which stops pathological inputs before they allocate
//! deep trees or huge amounts of scalar text.

use serde::{Deserialize, Serialize};

/// Budgets for reducing a single document.
///
/// The defaults are permissive for configuration files and fixtures while
/// stopping obviously resource-amplifying inputs.
///
/// ```rust
/// let options = yamlify::options! {
///     budget: Some(yamlify::budget! {
///         max_depth: 8,
///     }),
/// };
/// let document = yamlify::parse_document("a:\n b:\n  c: 1\n", &options);
/// assert!(document.is_ok());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Budget {
    /// Maximum number of non-blank lines in a document.
    ///
    /// Default: 1,000,000
    pub max_lines: usize,
    /// Maximum nesting depth of blocks.
    ///
    /// Default: 256
    pub max_depth: usize,
    /// Maximum total bytes of scalar values.
    ///
    /// Default: 67,108,864 (64 MiB)
    pub max_total_scalar_bytes: usize,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_lines: 1_000_000,
            max_depth: 256, // recursion depth of the reducer
            max_total_scalar_bytes: 64 * 1024 * 1024,
        }
    }
}

/// What tripped the budget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetBreach {
    /// The document has more than [`Budget::max_lines`] non-blank lines.
    Lines {
        /// Number of non-blank lines in the document.
        lines: usize,
    },
    /// A block is nested deeper than [`Budget::max_depth`].
    Depth {
        /// Depth reached when the breach occurred.
        depth: usize,
    },
    /// The cumulative size of scalar values exceeded [`Budget::max_total_scalar_bytes`].
    ScalarBytes {
        /// Sum of scalar value lengths seen so far.
        total_scalar_bytes: usize,
    },
}

/// Stateful helper that enforces an optional [`Budget`] while a document is reduced.
#[derive(Debug, Default)]
pub(crate) struct BudgetEnforcer {
    budget: Option<Budget>,
    depth: usize,
    total_scalar_bytes: usize,
}

impl BudgetEnforcer {
    pub(crate) fn new(budget: Option<Budget>) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }

    pub(crate) fn observe_lines(&self, lines: usize) -> Result<(), BudgetBreach> {
        match &self.budget {
            Some(budget) if lines > budget.max_lines => Err(BudgetBreach::Lines { lines }),
            _ => Ok(()),
        }
    }

    pub(crate) fn enter_block(&mut self) -> Result<(), BudgetBreach> {
        self.depth = self.depth.saturating_add(1);
        match &self.budget {
            Some(budget) if self.depth > budget.max_depth => {
                Err(BudgetBreach::Depth { depth: self.depth })
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn leave_block(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn observe_scalar(&mut self, value: &str) -> Result<(), BudgetBreach> {
        self.total_scalar_bytes = self.total_scalar_bytes.saturating_add(value.len());
        match &self.budget {
            Some(budget) if self.total_scalar_bytes > budget.max_total_scalar_bytes => {
                Err(BudgetBreach::ScalarBytes {
                    total_scalar_bytes: self.total_scalar_bytes,
                })
            }
            _ => Ok(()),
        }
    }
}
