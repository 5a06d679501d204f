//! Checks on the consistency of a whole [`SupplyChainModel`], run before it is handed to consumers.
//!
//! Registration calls on the model accept input without cross-checking it against the rest of the
//! model. These checks catch references to entities which were never registered, cyclic bills of
//! material and other problems which would otherwise only surface in the downstream optimiser.
use crate::demand::Demand;
use crate::graph::{check_bill_of_material_acyclic, unreachable_customers};
use crate::id::{IDCollection, ProductID};
use crate::model::SupplyChainModel;
use crate::node::{Node, NodeKind};
use crate::units::MoneyPerFlow;
use anyhow::{Context, Result, bail, ensure};
use indexmap::IndexSet;
use itertools::Itertools;
use log::{info, warn};
use std::collections::HashSet;
use std::fmt::Display;
use strum::IntoEnumIterator;

/// Report a problem which is only an error in strict mode
fn report<T: Display>(strict: bool, message: T) -> Result<()> {
    if strict {
        bail!("{message}");
    }

    warn!("{message}");
    Ok(())
}

/// Check for entities registered more than once under the same name
fn check_duplicate_names(model: &SupplyChainModel, strict: bool) -> Result<()> {
    for id in model.products().iter().map(|product| &product.id).duplicates() {
        report(strict, format!("Product {id} has been added more than once"))?;
    }

    for kind in NodeKind::iter() {
        let duplicates = model
            .iter_nodes()
            .filter(|node| node.kind() == kind)
            .map(|node| node.id().clone())
            .duplicates();
        for id in duplicates {
            report(strict, format!("The {kind} {id} has been added more than once"))?;
        }
    }

    Ok(())
}

/// Check that lanes run between registered nodes
fn check_lanes(model: &SupplyChainModel, nodes: &HashSet<Node>) -> Result<()> {
    for lane in model.lanes() {
        for (end, node) in [("origin", &lane.origin), ("destination", &lane.destination)] {
            ensure!(
                nodes.contains(node),
                "The {end} of lane {lane} is the {} {}, which has not been added to the model",
                node.kind(),
                node.id()
            );
        }

        if lane.unit_cost < MoneyPerFlow(0.0) {
            warn!("Lane {lane} has a negative unit cost ({})", lane.unit_cost);
        }

        if lane.time as usize >= model.horizon() {
            warn!(
                "Lane {lane} has a transit time of {} periods, which is not less than the horizon",
                lane.time
            );
        }
    }

    Ok(())
}

/// Check that products referenced by nodes have been registered
fn check_node_products(model: &SupplyChainModel, product_ids: &IndexSet<ProductID>) -> Result<()> {
    for node in model.iter_nodes() {
        for product in node.iter_products() {
            product_ids.get_id(&product.id).with_context(|| {
                format!(
                    "The {} {} refers to product {}, which has not been added to the model",
                    node.kind(),
                    node.id(),
                    product.id
                )
            })?;
        }
    }

    for plant in model.plants() {
        for (product_id, entry) in &plant.products {
            for component_id in entry.attributes.bill_of_material.keys() {
                product_ids.get_id(component_id).with_context(|| {
                    format!(
                        "Bill of material for product {product_id} at plant {} refers to \
                        product {component_id}, which has not been added to the model",
                        plant.id
                    )
                })?;
            }
        }
    }

    check_bill_of_material_acyclic(model.plants())
}

/// Whether the registered customer for a demand record lacks the demanded product.
///
/// The customer is looked up by name, as the record may hold a different instance.
fn customer_lacks_product(model: &SupplyChainModel, demand: &Demand) -> bool {
    model
        .get_node(NodeKind::Customer, &demand.customer.id.0)
        .is_some_and(|customer| !customer.has_product(&demand.product.id.0))
}

/// Check that demand refers to registered customers and products
fn check_demands(
    model: &SupplyChainModel,
    nodes: &HashSet<Node>,
    product_ids: &IndexSet<ProductID>,
) -> Result<()> {
    for demand in model.demands() {
        let customer = Node::from(&demand.customer);
        ensure!(
            nodes.contains(&customer),
            "Demand {demand} is for customer {}, which has not been added to the model",
            demand.customer.id
        );
        product_ids.get_id(&demand.product.id).with_context(|| {
            format!(
                "Demand {demand} is for product {}, which has not been added to the model",
                demand.product.id
            )
        })?;

        if customer_lacks_product(model, demand) {
            warn!(
                "Customer {} has demand for product {}, which was not added to the customer",
                demand.customer.id,
                demand.product.id
            );
        }
    }

    Ok(())
}

/// Check that every customer with demand can be reached from a supplier or plant
fn check_reachability(model: &SupplyChainModel, strict: bool) -> Result<()> {
    let demanding: HashSet<_> = model
        .demands()
        .iter()
        .map(|demand| demand.customer.id.clone())
        .collect();

    for node in unreachable_customers(model) {
        if demanding.contains(node.id()) {
            report(
                strict,
                format!(
                    "Customer {} has demand but cannot be reached from any supplier or plant",
                    node.id()
                ),
            )?;
        }
    }

    Ok(())
}

/// Check that the model is consistent.
///
/// The following are errors:
///
/// * A lane endpoint, or the customer or product of a demand record, that has not been added
/// * A node or bill of material referring to a product that has not been added
/// * A cycle in the bills of material
///
/// The following cause a warning, or an error if `strict` is set:
///
/// * An entity added more than once under the same name
/// * A customer with demand which cannot be reached from any supplier or plant
pub fn validate_model(model: &SupplyChainModel, strict: bool) -> Result<()> {
    let nodes: HashSet<Node> = model.iter_nodes().collect();
    let product_ids: IndexSet<ProductID> = model
        .products()
        .iter()
        .map(|product| product.id.clone())
        .collect();

    check_duplicate_names(model, strict)?;
    check_lanes(model, &nodes)?;
    check_node_products(model, &product_ids)?;
    check_demands(model, &nodes, &product_ids)?;
    check_reachability(model, strict)?;

    info!("Supply chain model validation successful");

    Ok(())
}
