//! Subscription plans
//!
//! The plan set is closed. Each plan maps to an opaque price id at the
//! checkout provider.

use std::fmt;

/// Price ids used when none are configured
pub const DEFAULT_MONTHLY_PRICE: &str = "price_monthly_id_here";
pub const DEFAULT_YEARLY_PRICE: &str = "price_yearly_id_here";
pub const DEFAULT_FAMILY_PRICE: &str = "price_family_id_here";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Monthly,
    Yearly,
    Family,
}

impl Plan {
    /// Parse a client-facing plan identifier
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "price_monthly" => Some(Plan::Monthly),
            "price_yearly" => Some(Plan::Yearly),
            "price_family" => Some(Plan::Family),
            _ => None,
        }
    }

    pub fn as_id(&self) -> &'static str {
        match self {
            Plan::Monthly => "price_monthly",
            Plan::Yearly => "price_yearly",
            Plan::Family => "price_family",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_id())
    }
}

/// Plan -> external price id
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    pub monthly: String,
    pub yearly: String,
    pub family: String,
}

impl PlanCatalog {
    pub fn new(
        monthly: impl Into<String>,
        yearly: impl Into<String>,
        family: impl Into<String>,
    ) -> Self {
        Self {
            monthly: monthly.into(),
            yearly: yearly.into(),
            family: family.into(),
        }
    }

    pub fn price_for(&self, plan: Plan) -> &str {
        match plan {
            Plan::Monthly => &self.monthly,
            Plan::Yearly => &self.yearly,
            Plan::Family => &self.family,
        }
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_MONTHLY_PRICE, DEFAULT_YEARLY_PRICE, DEFAULT_FAMILY_PRICE)
    }
}
