//! Lanes are the directed transportation links between nodes.
use crate::node::Node;
use crate::units::{Flow, MoneyPerFlow};
use std::fmt;

/// A transportation lane from one node to another.
///
/// The cost, minimum quantity and lead time apply to every product shipped along the lane. Lanes
/// have no identity of their own, so two lanes with the same endpoints and attributes are only
/// told apart by reference (see [`Arc::ptr_eq`](std::sync::Arc::ptr_eq)).
#[derive(Debug, Clone)]
pub struct Lane {
    /// Where shipments depart from
    pub origin: Node,
    /// Where shipments arrive
    pub destination: Node,
    /// Shipping cost per unit
    pub unit_cost: MoneyPerFlow,
    /// Minimum quantity per shipment. Not enforced here.
    pub minimum_quantity: Flow,
    /// Transit time in periods
    pub time: u32,
}

impl Lane {
    /// Create a new lane with no cost, no minimum quantity and no transit time
    pub fn new(origin: Node, destination: Node) -> Self {
        Self {
            origin,
            destination,
            unit_cost: MoneyPerFlow(0.0),
            minimum_quantity: Flow(0.0),
            time: 0,
        }
    }

    /// Set the shipping cost per unit
    pub fn with_unit_cost(mut self, unit_cost: MoneyPerFlow) -> Self {
        self.unit_cost = unit_cost;
        self
    }

    /// Set the minimum quantity per shipment
    pub fn with_minimum_quantity(mut self, minimum_quantity: Flow) -> Self {
        self.minimum_quantity = minimum_quantity;
        self
    }

    /// Set the transit time in periods
    pub fn with_time(mut self, time: u32) -> Self {
        self.time = time;
        self
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.origin, self.destination)
    }
}
