//! Fixtures for tests

use crate::location::Location;
use crate::model::SupplyChainModel;
use crate::node::{
    Customer, Node, Plant, PlantProduct, Storage, StorageProduct, Supplier, SupplierProduct,
};
use crate::product::Product;
use crate::units::{Flow, Limit, MoneyPerFlow};
use rstest::fixture;
use std::sync::Arc;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn location() -> Location {
    Location::with_name(51.5, -0.12, "Depot")
}

#[fixture]
pub fn widget() -> Arc<Product> {
    Arc::new(Product::with_holding_cost("widget", MoneyPerFlow(0.1)))
}

#[fixture]
pub fn gadget() -> Arc<Product> {
    Arc::new(Product::new("gadget"))
}

#[fixture]
pub fn supplier(location: Location, widget: Arc<Product>) -> Arc<Supplier> {
    let mut supplier = Supplier::new("S1", location);
    supplier.add_product(
        widget,
        SupplierProduct {
            unit_cost: MoneyPerFlow(1.0),
            maximum_throughput: Limit::Finite(Flow(100.0)),
        },
    );
    Arc::new(supplier)
}

#[fixture]
pub fn plant(location: Location, widget: Arc<Product>) -> Arc<Plant> {
    let mut plant = Plant::new("P1", location);
    plant.add_product(
        widget,
        PlantProduct {
            unit_cost: MoneyPerFlow(2.0),
            ..Default::default()
        },
    );
    Arc::new(plant)
}

#[fixture]
pub fn storage(location: Location, widget: Arc<Product>) -> Arc<Storage> {
    let mut storage = Storage::new("W1", location);
    storage.add_product(
        widget,
        StorageProduct {
            initial_inventory: Flow(5.0),
            ..Default::default()
        },
    );
    Arc::new(storage)
}

#[fixture]
pub fn customer(location: Location, widget: Arc<Product>) -> Arc<Customer> {
    let mut customer = Customer::new("C1", location);
    customer.add_product(widget, Flow(10.0));
    Arc::new(customer)
}

#[fixture]
pub fn plant_node(plant: Arc<Plant>) -> Node {
    plant.into()
}

#[fixture]
pub fn storage_node(storage: Arc<Storage>) -> Node {
    storage.into()
}

#[fixture]
pub fn customer_node(customer: Arc<Customer>) -> Node {
    customer.into()
}

/// A model with one of each kind of node, no lanes and no demand, over three periods
#[fixture]
pub fn model(
    widget: Arc<Product>,
    supplier: Arc<Supplier>,
    plant: Arc<Plant>,
    storage: Arc<Storage>,
    customer: Arc<Customer>,
) -> SupplyChainModel {
    let mut model = SupplyChainModel::new(3).unwrap();
    model.add_product(widget);
    model.add_supplier(supplier);
    model.add_plant(plant);
    model.add_storage(storage);
    model.add_customer(customer);
    model
}
