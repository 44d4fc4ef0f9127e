//! Budget aggregate entity.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BudgetId, DepartmentId, Money, RecordMetadata, SegmentId};

use super::{BudgetError, BudgetPeriod};

/// Budget aggregate - an allocation of funds over a date range,
/// optionally scoped to a segment and/or department.
///
/// # Invariants
///
/// - `start_date < end_date`
/// - `consumed >= 0` always; reversal floors at zero
/// - `remaining = allocated - consumed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier for this budget.
    pub id: BudgetId,

    /// Display name; unique together with period and date range.
    pub name: String,

    /// Segment this budget tracks, if segment-scoped.
    pub segment_id: Option<SegmentId>,

    /// Department this budget tracks, if department-scoped.
    pub department_id: Option<DepartmentId>,

    /// Reporting period classification.
    pub period: BudgetPeriod,

    /// First day the budget covers, inclusive.
    pub start_date: NaiveDate,

    /// Last day the budget covers, inclusive.
    pub end_date: NaiveDate,

    /// Amount allocated for the period.
    pub allocated: Money,

    /// Amount consumed by approved expenses.
    pub consumed: Money,

    /// Whether the budget participates in consumption tracking.
    pub is_active: bool,

    /// Audit, soft-delete, and optimistic-lock metadata.
    pub meta: RecordMetadata,
}

impl Budget {
    /// Creates a new active budget with zero consumption.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` unless `start_date < end_date`.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        name: String,
        segment_id: Option<SegmentId>,
        department_id: Option<DepartmentId>,
        period: BudgetPeriod,
        start_date: NaiveDate,
        end_date: NaiveDate,
        allocated: Money,
    ) -> Result<Self, BudgetError> {
        if end_date <= start_date {
            return Err(BudgetError::InvalidDateRange);
        }
        Ok(Self {
            id: BudgetId::new(),
            name,
            segment_id,
            department_id,
            period,
            start_date,
            end_date,
            allocated,
            consumed: Money::ZERO,
            is_active: true,
            meta: RecordMetadata::new(),
        })
    }

    /// Remaining funds: `allocated - consumed`.
    ///
    /// May go negative-in-spirit once consumption exceeds allocation;
    /// the subtraction itself floors at zero only for consumption, so
    /// remaining is reported as zero at full consumption and beyond.
    pub fn remaining(&self) -> Money {
        self.allocated.saturating_sub(self.consumed)
    }

    /// Utilization percentage: `consumed / allocated x 100`, rounded
    /// half-up to two decimals; zero when nothing is allocated.
    pub fn utilization(&self) -> Decimal {
        if self.allocated.is_zero() {
            return Decimal::ZERO;
        }
        (self.consumed.amount() * Decimal::ONE_HUNDRED / self.allocated.amount())
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Adds consumption from an approved expense allocation.
    pub fn add_consumption(&mut self, amount: Money) {
        self.consumed = self.consumed.add(amount);
        self.meta.touch();
    }

    /// Reverses consumption, flooring at zero.
    pub fn reduce_consumption(&mut self, amount: Money) {
        self.consumed = self.consumed.saturating_sub(amount);
        self.meta.touch();
    }

    /// Returns true if the budget covers the given date.
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if this budget should receive consumption for an
    /// allocation against the given segment on the given date.
    pub fn matches(&self, segment_id: SegmentId, date: NaiveDate) -> bool {
        self.is_active
            && !self.meta.is_deleted()
            && self.segment_id == Some(segment_id)
            && self.covers_date(date)
    }

    /// Returns true if remaining funds cover the requested amount.
    pub fn has_available(&self, requested: Money) -> bool {
        self.remaining() >= requested
    }

    /// Changes the covered date range.
    pub fn reschedule(
        &mut self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), BudgetError> {
        if end_date <= start_date {
            return Err(BudgetError::InvalidDateRange);
        }
        self.start_date = start_date;
        self.end_date = end_date;
        self.meta.touch();
        Ok(())
    }

    /// Marks the budget active for consumption tracking.
    pub fn activate(&mut self) {
        self.is_active = true;
        self.meta.touch();
    }

    /// Removes the budget from consumption tracking.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.meta.touch();
    }

    /// Soft-deletes the budget.
    pub fn soft_delete(&mut self) {
        self.meta.mark_deleted();
    }
}
