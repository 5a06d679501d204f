//! An in-memory model of multi-echelon supply chain networks.
//!
//! Suppliers, plants, storage locations and customers are connected by directed transportation
//! lanes, with time-phased customer demand for products. A [`SupplyChainModel`] collects these and
//! indexes the lanes into and out of each node, so that an optimiser built on top of it can look up
//! the flows at a node without scanning every lane.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod demand;
pub mod graph;
pub mod id;
pub mod lane;
pub mod location;
pub mod log;
pub mod model;
pub mod node;
pub mod product;
pub mod settings;
pub mod units;
pub mod validation;

pub use model::SupplyChainModel;

#[cfg(test)]
mod fixture;

/// Get the config directory for supplynet.
///
/// Falls back to the current directory on platforms with no config directory.
pub fn get_supplynet_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("supplynet");

    path
}
