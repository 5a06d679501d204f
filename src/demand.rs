//! Code for working with time-phased customer demand. Demand is given per customer and product,
//! with one quantity for each period of the planning horizon.
use crate::node::Customer;
use crate::product::Product;
use crate::units::{Dimensionless, Flow};
use anyhow::{Result, ensure};
use std::fmt;
use std::sync::Arc;

/// The demand a customer has for a product
#[derive(Debug, Clone, PartialEq)]
pub struct Demand {
    /// The customer placing the demand
    pub customer: Arc<Customer>,
    /// The product demanded
    pub product: Arc<Product>,
    /// Target fraction of demand which must be satisfied (between 0 and 1 inclusive)
    pub service_level: Dimensionless,
    /// Quantity demanded in each period, indexed by time
    pub quantities: Vec<Flow>,
}

/// Check that a service level is between 0 and 1 inclusive
pub fn check_service_level(service_level: Dimensionless) -> Result<()> {
    ensure!(
        (0.0..=1.0).contains(&service_level.0),
        "Service level must be between 0 and 1 (got {service_level})"
    );

    Ok(())
}

impl Demand {
    /// Create a new demand record.
    ///
    /// Fails if the service level is not between 0 and 1.
    pub fn new(
        customer: Arc<Customer>,
        product: Arc<Product>,
        service_level: Dimensionless,
        quantities: Vec<Flow>,
    ) -> Result<Self> {
        check_service_level(service_level)?;

        Ok(Self {
            customer,
            product,
            service_level,
            quantities,
        })
    }

    /// Whether this record is for the given customer and product
    pub fn matches(&self, customer: &Customer, product: &Product) -> bool {
        *self.customer == *customer && *self.product == *product
    }

    /// The quantity demanded in the given period, if within the series
    pub fn get(&self, time: usize) -> Option<Flow> {
        self.quantities.get(time).copied()
    }

    /// The total quantity demanded over all periods
    pub fn total(&self) -> Flow {
        self.quantities.iter().copied().sum()
    }

    /// The number of periods covered by this record
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// Whether the record covers no periods
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

impl fmt::Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.customer, self.product)
    }
}
