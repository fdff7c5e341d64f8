//! Request bodies for cash outflows: purchase expenses and miscellaneous costs.

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::Money;
use crate::validation::{validate_name, validate_positive, validate_uuid};

/// An expense charged against an existing purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    pub purchase_id: String,
    pub title: String,
    pub amount: Money,
}

impl NewExpense {
    /// Returns the trimmed title.
    pub fn validate(&self) -> CoreResult<String> {
        validate_uuid("purchase_id", &self.purchase_id)?;
        let title = validate_name("title", &self.title)?;
        validate_positive("amount", self.amount)?;
        Ok(title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMiscellaneousCost {
    pub title: String,
    pub amount: Money,
}

impl NewMiscellaneousCost {
    /// Returns the trimmed title.
    pub fn validate(&self) -> CoreResult<String> {
        let title = validate_name("title", &self.title)?;
        validate_positive("amount", self.amount)?;
        Ok(title)
    }
}
