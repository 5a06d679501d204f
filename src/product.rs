//! Products are the commodities which flow through the supply chain.
use crate::id::{ProductID, define_id_identity};
use crate::units::MoneyPerFlow;
use std::fmt;

/// A product flowing through the supply chain.
///
/// Products are identified by name: two `Product`s with the same ID compare equal and hash
/// identically, regardless of their other attributes.
#[derive(Debug, Clone)]
pub struct Product {
    /// The product's name (e.g. "steel-coil")
    pub id: ProductID,
    /// Cost of holding one unit in stock for one period
    pub unit_holding_cost: MoneyPerFlow,
}
define_id_identity! {Product}

impl Product {
    /// Create a new product with no holding cost
    pub fn new(id: &str) -> Self {
        Self::with_holding_cost(id, MoneyPerFlow(0.0))
    }

    /// Create a new product with the given holding cost
    pub fn with_holding_cost(id: &str, unit_holding_cost: MoneyPerFlow) -> Self {
        Self {
            id: id.into(),
            unit_holding_cost,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
