//! Strongly-typed identifier value objects.
//!
//! Every entity in the domain is addressed by its own identifier type so
//! that an `ExpenseId` can never be passed where a `BudgetId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a user.
    UserId
);
uuid_id!(
    /// Unique identifier for a role.
    RoleId
);
uuid_id!(
    /// Unique identifier for a department.
    DepartmentId
);
uuid_id!(
    /// Unique identifier for a cost-allocation segment.
    SegmentId
);
uuid_id!(
    /// Unique identifier for an expense.
    ExpenseId
);
uuid_id!(
    /// Unique identifier for an approval workflow.
    WorkflowId
);
uuid_id!(
    /// Unique identifier for an approval step within a workflow.
    StepId
);
uuid_id!(
    /// Unique identifier for a workflow history record.
    HistoryId
);
uuid_id!(
    /// Unique identifier for a budget.
    BudgetId
);
uuid_id!(
    /// Unique identifier for a budget threshold.
    ThresholdId
);
uuid_id!(
    /// Unique identifier for a budget alert.
    AlertId
);
