//! Conditions gating the configured action, and the structured report
//! handed to it on a pass.

use crate::containers::Container;
use crate::error::{ObserverError, Result};
use crate::types::ScrollDirection;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Arbitrary user predicate. Added without validation.
pub type CustomPredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Condition inputs for a single configuration call.
///
/// Only valid inputs add conditions: the direction label must be `"up"`
/// or `"down"`, the offset threshold must be positive. Anything else is
/// dropped without error.
#[derive(Clone, Default)]
pub struct ConditionSpec {
    /// Direction label.
    pub direction: Option<String>,
    /// Offset threshold, in scroll units.
    pub offset: Option<f64>,
    /// Arbitrary predicate.
    pub custom: Option<CustomPredicate>,
}

impl ConditionSpec {
    /// A direction-only spec.
    pub fn direction(label: impl Into<String>) -> Self {
        Self {
            direction: Some(label.into()),
            ..Default::default()
        }
    }

    /// An offset-only spec.
    pub fn offset(threshold: f64) -> Self {
        Self {
            offset: Some(threshold),
            ..Default::default()
        }
    }

    /// A custom-predicate-only spec.
    pub fn custom(predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self {
            custom: Some(Arc::new(predicate)),
            ..Default::default()
        }
    }
}

/// A single named predicate.
///
/// Values are captured when the condition is added; reconfiguring later
/// appends new conditions and never rewrites these.
#[derive(Clone)]
pub enum Condition {
    /// Passes when the offset moved in the given direction since the
    /// previous check. A tie (no movement) never passes.
    Direction(ScrollDirection),
    /// Passes when the current offset strictly exceeds the threshold.
    Offset(f64),
    /// User-supplied predicate.
    Custom(CustomPredicate),
}

impl Condition {
    /// Parse a direction label into a condition.
    pub fn direction(label: &str) -> Result<Self> {
        Ok(Condition::Direction(label.parse()?))
    }

    /// Validate an offset threshold into a condition.
    pub fn offset(threshold: f64) -> Result<Self> {
        if threshold > 0.0 {
            Ok(Condition::Offset(threshold))
        } else {
            Err(ObserverError::NonPositiveThreshold(threshold))
        }
    }

    /// Report key identifying this condition's outcome.
    pub fn name(&self) -> &'static str {
        match self {
            Condition::Direction(_) => "direction",
            Condition::Offset(_) => "offset",
            Condition::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Direction(direction) => write!(f, "Direction({})", direction),
            Condition::Offset(threshold) => write!(f, "Offset({})", threshold),
            Condition::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Measured outcome of one passing condition.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConditionOutcome {
    Direction {
        direction: ScrollDirection,
        /// Offset change since the previous check.
        moved_by: f64,
    },
    Offset {
        threshold: f64,
        current: f64,
    },
    Custom,
}

/// Structured pass result handed to the action.
///
/// Maps each passing condition's name to its measured outcome, so the
/// action can introspect what matched. When the same kind is configured
/// more than once, the last evaluated outcome owns the key.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct CheckReport {
    outcomes: BTreeMap<&'static str, ConditionOutcome>,
}

impl CheckReport {
    fn record(&mut self, name: &'static str, outcome: ConditionOutcome) {
        self.outcomes.insert(name, outcome);
    }

    /// Outcome recorded under a condition name.
    pub fn get(&self, name: &str) -> Option<&ConditionOutcome> {
        self.outcomes.get(name)
    }

    /// Whether a condition of this name passed.
    pub fn contains(&self, name: &str) -> bool {
        self.outcomes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Names of the passing conditions, in key order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.outcomes.keys().copied()
    }
}

/// Append-only list of conditions.
///
/// Each configuration call appends; earlier conditions keep the values
/// they captured when added. The set never shrinks short of rebuilding
/// the observer.
#[derive(Clone, Default)]
pub struct ConditionSet {
    conditions: Vec<Condition>,
}

impl ConditionSet {
    /// Append the valid conditions from a spec.
    ///
    /// Invalid direction labels and non-positive thresholds add nothing;
    /// a custom predicate is always added.
    pub fn append(&mut self, spec: ConditionSpec) {
        if let Some(label) = spec.direction {
            match Condition::direction(&label) {
                Ok(condition) => self.conditions.push(condition),
                Err(error) => tracing::debug!(%label, "ignoring direction condition: {error}"),
            }
        }

        if let Some(threshold) = spec.offset {
            match Condition::offset(threshold) {
                Ok(condition) => self.conditions.push(condition),
                Err(error) => tracing::debug!(threshold, "ignoring offset condition: {error}"),
            }
        }

        if let Some(predicate) = spec.custom {
            self.conditions.push(Condition::Custom(predicate));
        }
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate every condition in registration order.
    ///
    /// Short-circuits on the first failure and returns `None`; returns the
    /// pass report when all conditions hold (vacuously for an empty set).
    ///
    /// `last_offset` is the direction tracking state. It is rewritten only
    /// when a direction condition is evaluated, so the recorded offset and
    /// the comparison always come from the same check.
    pub fn check(&self, container: &Container, last_offset: &mut f64) -> Option<CheckReport> {
        let mut report = CheckReport::default();

        for condition in &self.conditions {
            let outcome = match condition {
                Condition::Direction(direction) => {
                    let current = container.scroll_offset();
                    let moved_by = current - *last_offset;
                    *last_offset = current;

                    if moved_by * direction.sign() > 0.0 {
                        ConditionOutcome::Direction {
                            direction: *direction,
                            moved_by,
                        }
                    } else {
                        return None;
                    }
                }
                Condition::Offset(threshold) => {
                    let current = container.scroll_offset();
                    if current > *threshold {
                        ConditionOutcome::Offset {
                            threshold: *threshold,
                            current,
                        }
                    } else {
                        return None;
                    }
                }
                Condition::Custom(predicate) => {
                    if predicate() {
                        ConditionOutcome::Custom
                    } else {
                        return None;
                    }
                }
            };

            report.record(condition.name(), outcome);
        }

        Some(report)
    }
}

impl fmt::Debug for ConditionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.conditions).finish()
    }
}
