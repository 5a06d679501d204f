//! Module for creating and analysing graphs of the supply chain
use crate::id::ProductID;
use crate::lane::Lane;
use crate::model::SupplyChainModel;
use crate::node::{Node, Plant};
use crate::units::Flow;
use anyhow::{Result, anyhow};
use petgraph::Directed;
use petgraph::algo::toposort;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::HashMap;
use std::sync::Arc;

/// A directed graph of the supply chain network, with a node for each site and an edge for each
/// lane
pub type NetworkGraph = Graph<Node, Arc<Lane>, Directed>;

/// A directed graph with an edge from each manufactured product to each of its components
pub type BillOfMaterialGraph = Graph<ProductID, Flow, Directed>;

/// Get the index for a graph node, adding the node the first time it is encountered
fn get_or_add_node<N, E>(
    graph: &mut Graph<N, E, Directed>,
    indices: &mut HashMap<N, NodeIndex>,
    node: &N,
) -> NodeIndex
where
    N: Clone + Eq + std::hash::Hash,
{
    *indices
        .entry(node.clone())
        .or_insert_with(|| graph.add_node(node.clone()))
}

/// Creates a directed graph of the supply chain network.
///
/// The graph contains one node for each distinct registered node (duplicate names are merged) and
/// one for each lane endpoint which was never registered. There is an edge for every lane, in the
/// order the lanes were added.
pub fn create_network_graph(model: &SupplyChainModel) -> NetworkGraph {
    let mut graph = Graph::new();
    let mut indices = HashMap::new();

    for node in model.iter_nodes() {
        get_or_add_node(&mut graph, &mut indices, &node);
    }

    for lane in model.lanes() {
        let source = get_or_add_node(&mut graph, &mut indices, &lane.origin);
        let target = get_or_add_node(&mut graph, &mut indices, &lane.destination);
        graph.add_edge(source, target, Arc::clone(lane));
    }

    graph
}

/// Creates a directed graph of bills of material for the given plants.
///
/// There is an edge from product A to product B if any plant uses B as a component of A. If more
/// than one plant makes the same product, there is an edge for each.
pub fn create_bill_of_material_graph(plants: &[Arc<Plant>]) -> BillOfMaterialGraph {
    let mut graph = Graph::new();
    let mut indices = HashMap::new();

    for plant in plants {
        for (product_id, entry) in &plant.products {
            let product = get_or_add_node(&mut graph, &mut indices, product_id);
            for (component_id, quantity) in &entry.attributes.bill_of_material {
                let component = get_or_add_node(&mut graph, &mut indices, component_id);
                graph.add_edge(product, component, *quantity);
            }
        }
    }

    graph
}

/// Check that no product requires itself, directly or indirectly, as a component
pub fn check_bill_of_material_acyclic(plants: &[Arc<Plant>]) -> Result<()> {
    let graph = create_bill_of_material_graph(plants);
    toposort(&graph, None).map_err(|cycle| {
        anyhow!(
            "Cycle detected in bill of material for product {}",
            graph[cycle.node_id()]
        )
    })?;

    Ok(())
}

/// Get the customers which cannot be reached along lanes from any supplier or plant
pub fn unreachable_customers(model: &SupplyChainModel) -> Vec<Node> {
    let graph = create_network_graph(model);

    // Walk the graph from every source at once
    let mut dfs = Dfs::empty(&graph);
    dfs.stack
        .extend(graph.node_indices().filter(|&idx| graph[idx].is_source()));
    while dfs.next(&graph).is_some() {}

    graph
        .node_indices()
        .filter(|&idx| {
            matches!(graph[idx], Node::Customer(_)) && !dfs.discovered.contains(idx.index())
        })
        .map(|idx| graph[idx].clone())
        .collect()
}
