//! The supply chain model: the aggregate owning every entity, lane and demand record, along with
//! the adjacency indices used to look up the lanes into and out of each node.
//!
//! A model is populated through `&mut self` calls by a single owner, then handed to consumers
//! read-only (see [`SupplyChainModel::into_shared`]).
use crate::demand::Demand;
use crate::lane::Lane;
use crate::node::{Customer, Node, NodeKind, Plant, Storage, Supplier};
use crate::product::Product;
use crate::settings::Settings;
use crate::units::{Dimensionless, Flow};
use crate::validation::validate_model;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use log::{debug, info};
use std::sync::Arc;

/// The service level used when none is given for a demand record
pub const DEFAULT_SERVICE_LEVEL: Dimensionless = Dimensionless(1.0);

/// Lanes grouped by one of their endpoints, in the order the lanes were added
pub type LaneIndex = IndexMap<Node, Vec<Arc<Lane>>>;

/// A supply chain model
#[derive(Debug, Clone)]
pub struct SupplyChainModel {
    horizon: usize,
    products: Vec<Arc<Product>>,
    suppliers: Vec<Arc<Supplier>>,
    plants: Vec<Arc<Plant>>,
    storages: Vec<Arc<Storage>>,
    customers: Vec<Arc<Customer>>,
    lanes: Vec<Arc<Lane>>,
    demands: Vec<Demand>,
    lanes_in: LaneIndex,
    lanes_out: LaneIndex,
}

impl SupplyChainModel {
    /// Create an empty model covering the given number of periods
    pub fn new(horizon: usize) -> Result<Self> {
        ensure!(horizon > 0, "Planning horizon must be at least one period");

        Ok(Self {
            horizon,
            products: Vec::new(),
            suppliers: Vec::new(),
            plants: Vec::new(),
            storages: Vec::new(),
            customers: Vec::new(),
            lanes: Vec::new(),
            demands: Vec::new(),
            lanes_in: LaneIndex::new(),
            lanes_out: LaneIndex::new(),
        })
    }

    /// The number of periods in the planning horizon
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Add a product to the supply chain
    pub fn add_product(&mut self, product: impl Into<Arc<Product>>) -> Arc<Product> {
        let product = product.into();
        debug!("Adding product {product}");
        self.products.push(Arc::clone(&product));
        product
    }

    /// Add a supplier to the supply chain
    pub fn add_supplier(&mut self, supplier: impl Into<Arc<Supplier>>) -> Arc<Supplier> {
        let supplier = supplier.into();
        debug!("Adding supplier {supplier}");
        self.suppliers.push(Arc::clone(&supplier));
        supplier
    }

    /// Add a plant to the supply chain
    pub fn add_plant(&mut self, plant: impl Into<Arc<Plant>>) -> Arc<Plant> {
        let plant = plant.into();
        debug!("Adding plant {plant}");
        self.plants.push(Arc::clone(&plant));
        plant
    }

    /// Add a storage location to the supply chain
    pub fn add_storage(&mut self, storage: impl Into<Arc<Storage>>) -> Arc<Storage> {
        let storage = storage.into();
        debug!("Adding storage location {storage}");
        self.storages.push(Arc::clone(&storage));
        storage
    }

    /// Add a customer to the supply chain
    pub fn add_customer(&mut self, customer: impl Into<Arc<Customer>>) -> Arc<Customer> {
        let customer = customer.into();
        debug!("Adding customer {customer}");
        self.customers.push(Arc::clone(&customer));
        customer
    }

    /// Add a lane to the supply chain.
    ///
    /// The lane is appended to the lane list and to the adjacency indices for its origin and
    /// destination.
    pub fn add_lane(&mut self, lane: Lane) -> Arc<Lane> {
        let lane = Arc::new(lane);
        debug!("Adding lane {lane}");

        self.lanes.push(Arc::clone(&lane));
        self.lanes_in
            .entry(lane.destination.clone())
            .or_default()
            .push(Arc::clone(&lane));
        self.lanes_out
            .entry(lane.origin.clone())
            .or_default()
            .push(Arc::clone(&lane));

        lane
    }

    /// Add customer demand for a product, with one quantity for each period of the horizon.
    ///
    /// If `service_level` is `None`, [`DEFAULT_SERVICE_LEVEL`] is used.
    ///
    /// Fails without modifying the model if the service level is not between 0 and 1, if the
    /// number of quantities differs from the horizon or if demand has already been added for this
    /// customer and product.
    pub fn add_demand(
        &mut self,
        customer: &Arc<Customer>,
        product: &Arc<Product>,
        quantities: Vec<Flow>,
        service_level: Option<Dimensionless>,
    ) -> Result<()> {
        let demand = Demand::new(
            Arc::clone(customer),
            Arc::clone(product),
            service_level.unwrap_or(DEFAULT_SERVICE_LEVEL),
            quantities,
        )?;

        ensure!(
            demand.len() == self.horizon,
            "Demand for {} by customer {} covers {} periods, but the horizon is {} periods",
            product.id,
            customer.id,
            demand.len(),
            self.horizon
        );
        ensure!(
            self.get_demand_record(customer, product).is_none(),
            "Demand for {} by customer {} has already been added",
            product.id,
            customer.id
        );

        debug!("Adding demand {demand}");
        self.demands.push(demand);

        Ok(())
    }

    /// Get the demand record for a customer and product, if any
    pub fn get_demand_record(&self, customer: &Customer, product: &Product) -> Option<&Demand> {
        self.demands
            .iter()
            .find(|demand| demand.matches(customer, product))
    }

    /// Get the demand of a customer for a product in the given period.
    ///
    /// # Returns
    ///
    /// The quantity demanded, or `None` if no demand has been added for this customer and product
    /// (whatever the value of `time`). Fails if there is demand but `time` is beyond the planning
    /// horizon.
    pub fn get_demands(
        &self,
        customer: &Customer,
        product: &Product,
        time: usize,
    ) -> Result<Option<Flow>> {
        let Some(demand) = self.get_demand_record(customer, product) else {
            return Ok(None);
        };

        let quantity = demand.get(time).with_context(|| {
            format!(
                "Time {time} is beyond the planning horizon ({} periods)",
                self.horizon
            )
        })?;

        Ok(Some(quantity))
    }

    /// Get the service level for a customer and product, if demand has been added for them
    pub fn get_service_level(
        &self,
        customer: &Customer,
        product: &Product,
    ) -> Option<Dimensionless> {
        self.get_demand_record(customer, product)
            .map(|demand| demand.service_level)
    }

    /// Get the total demand for a product across all customers in the given period
    pub fn total_demand(&self, product: &Product, time: usize) -> Result<Flow> {
        ensure!(
            time < self.horizon,
            "Time {time} is beyond the planning horizon ({} periods)",
            self.horizon
        );

        Ok(self
            .demands
            .iter()
            .filter(|demand| *demand.product == *product)
            .filter_map(|demand| demand.get(time))
            .sum())
    }

    /// Get the lanes leading to a node, in the order they were added.
    ///
    /// Fails if the node is not the destination of any lane.
    pub fn get_lanes_in(&self, node: &Node) -> Result<&[Arc<Lane>]> {
        self.lanes_in
            .get(node)
            .map(Vec::as_slice)
            .with_context(|| format!("Node {} is not the destination of any lane", node.id()))
    }

    /// Get the lanes leaving a node, in the order they were added.
    ///
    /// Fails if the node is not the origin of any lane.
    pub fn get_lanes_out(&self, node: &Node) -> Result<&[Arc<Lane>]> {
        self.lanes_out
            .get(node)
            .map(Vec::as_slice)
            .with_context(|| format!("Node {} is not the origin of any lane", node.id()))
    }

    /// The index of lanes by destination
    pub fn lanes_in(&self) -> &LaneIndex {
        &self.lanes_in
    }

    /// The index of lanes by origin
    pub fn lanes_out(&self) -> &LaneIndex {
        &self.lanes_out
    }

    /// All lanes, in the order they were added
    pub fn lanes(&self) -> &[Arc<Lane>] {
        &self.lanes
    }

    /// All demand records, in the order they were added
    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    /// All products, in the order they were added
    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    /// All suppliers, in the order they were added
    pub fn suppliers(&self) -> &[Arc<Supplier>] {
        &self.suppliers
    }

    /// All plants, in the order they were added
    pub fn plants(&self) -> &[Arc<Plant>] {
        &self.plants
    }

    /// All storage locations, in the order they were added
    pub fn storages(&self) -> &[Arc<Storage>] {
        &self.storages
    }

    /// All customers, in the order they were added
    pub fn customers(&self) -> &[Arc<Customer>] {
        &self.customers
    }

    /// Get the first product added with the given name
    pub fn get_product(&self, name: &str) -> Option<&Arc<Product>> {
        self.products.iter().find(|product| &*product.id.0 == name)
    }

    /// Get the first node of the given kind added with the given name
    pub fn get_node(&self, kind: NodeKind, name: &str) -> Option<Node> {
        self.iter_nodes()
            .find(|node| node.kind() == kind && &*node.id().0 == name)
    }

    /// Iterate over every registered node: suppliers, then plants, storage locations and customers
    pub fn iter_nodes(&self) -> impl Iterator<Item = Node> + '_ {
        let suppliers = self.suppliers.iter().map(Node::from);
        let plants = self.plants.iter().map(Node::from);
        let storages = self.storages.iter().map(Node::from);
        let customers = self.customers.iter().map(Node::from);

        suppliers.chain(plants).chain(storages).chain(customers)
    }

    /// Check the model is consistent.
    ///
    /// See [`validate_model`] for the checks performed. If `strict` is set, suspicious input which
    /// would otherwise only cause a warning (e.g. duplicate names) is an error.
    pub fn validate(&self, strict: bool) -> Result<()> {
        validate_model(self, strict)
    }

    /// Validate the model and freeze it for read-only use by consumers, which may be on other
    /// threads.
    pub fn into_shared(self, strict: bool) -> Result<Arc<Self>> {
        self.validate(strict)
            .context("Supply chain model failed validation")?;
        info!(
            "Supply chain model ready: {} nodes, {} lanes, {} demand records",
            self.iter_nodes().count(),
            self.lanes.len(),
            self.demands.len()
        );

        Ok(Arc::new(self))
    }

    /// As [`SupplyChainModel::into_shared`], with strictness taken from the program settings
    pub fn into_shared_with(self, settings: &Settings) -> Result<Arc<Self>> {
        self.into_shared(settings.strict_validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{
        assert_error, customer, customer_node, location, model, plant_node, storage_node, widget,
    };
    use crate::location::Location;
    use rstest::rstest;

    fn flows(values: &[f64]) -> Vec<Flow> {
        values.iter().copied().map(Flow).collect()
    }

    fn lane_ptrs(lanes: &[Arc<Lane>]) -> Vec<*const Lane> {
        lanes.iter().map(Arc::as_ptr).collect()
    }

    #[test]
    fn test_demand_not_found_empty_model() {
        let model = SupplyChainModel::new(3).unwrap();
        let customer = Customer::new("C", Location::new(0.0, 0.0));
        let product = Product::new("X");
        assert_eq!(model.get_demands(&customer, &product, 5).unwrap(), None);
    }

    #[test]
    fn test_new_zero_horizon() {
        assert_error!(
            SupplyChainModel::new(0),
            "Planning horizon must be at least one period"
        );
    }

    #[rstest]
    fn test_lanes_scenario(
        mut model: SupplyChainModel,
        plant_node: Node,
        storage_node: Node,
        customer_node: Node,
    ) {
        let p_to_s = model.add_lane(Lane::new(plant_node.clone(), storage_node.clone()));
        let s_to_c = model.add_lane(Lane::new(storage_node.clone(), customer_node.clone()));

        assert_eq!(
            lane_ptrs(model.get_lanes_out(&plant_node).unwrap()),
            [Arc::as_ptr(&p_to_s)]
        );
        assert_eq!(
            lane_ptrs(model.get_lanes_in(&customer_node).unwrap()),
            [Arc::as_ptr(&s_to_c)]
        );
        assert_eq!(
            lane_ptrs(model.get_lanes_in(&storage_node).unwrap()),
            [Arc::as_ptr(&p_to_s)]
        );
        assert_eq!(
            lane_ptrs(model.get_lanes_out(&storage_node).unwrap()),
            [Arc::as_ptr(&s_to_c)]
        );
        assert_error!(
            model.get_lanes_in(&plant_node),
            "Node P1 is not the destination of any lane"
        );
        assert_error!(
            model.get_lanes_out(&customer_node),
            "Node C1 is not the origin of any lane"
        );
        assert_eq!(model.lanes().len(), 2);
    }

    #[rstest]
    fn test_lane_indices_stay_in_sync(
        mut model: SupplyChainModel,
        plant_node: Node,
        storage_node: Node,
        customer_node: Node,
    ) {
        let nodes = [plant_node, storage_node, customer_node];
        let pairs = [(0, 1), (1, 2), (0, 2), (0, 1), (2, 1), (1, 2)];

        for (origin, destination) in pairs {
            model.add_lane(Lane::new(nodes[origin].clone(), nodes[destination].clone()));

            // After every call, each index entry is exactly the matching lanes, in call order
            for node in &nodes {
                let expected_in: Vec<_> = model
                    .lanes()
                    .iter()
                    .filter(|lane| lane.destination == *node)
                    .map(Arc::as_ptr)
                    .collect();
                let expected_out: Vec<_> = model
                    .lanes()
                    .iter()
                    .filter(|lane| lane.origin == *node)
                    .map(Arc::as_ptr)
                    .collect();

                match model.get_lanes_in(node) {
                    Ok(lanes) => assert_eq!(lane_ptrs(lanes), expected_in),
                    Err(_) => assert!(expected_in.is_empty()),
                }
                match model.get_lanes_out(node) {
                    Ok(lanes) => assert_eq!(lane_ptrs(lanes), expected_out),
                    Err(_) => assert!(expected_out.is_empty()),
                }
            }
        }
    }

    #[rstest]
    fn test_lane_lookup_by_name(
        mut model: SupplyChainModel,
        plant_node: Node,
        customer_node: Node,
    ) {
        model.add_lane(Lane::new(plant_node, customer_node));

        // A separately constructed node with the same kind and name finds the same lanes
        let plant = Node::from(Plant::new("P1", Location::new(0.0, 0.0)));
        assert_eq!(model.get_lanes_out(&plant).unwrap().len(), 1);

        // ...but a node of a different kind does not
        let supplier = Node::from(Supplier::new("P1", Location::new(0.0, 0.0)));
        assert!(model.get_lanes_out(&supplier).is_err());
    }

    #[rstest]
    fn test_demand_scenario(
        mut model: SupplyChainModel,
        customer: Arc<Customer>,
        widget: Arc<Product>,
    ) {
        model
            .add_demand(
                &customer,
                &widget,
                flows(&[10.0, 20.0, 30.0]),
                Some(Dimensionless(0.95)),
            )
            .unwrap();

        assert_eq!(
            model.get_demands(&customer, &widget, 1).unwrap(),
            Some(Flow(20.0))
        );
        assert_eq!(
            model.get_service_level(&customer, &widget),
            Some(Dimensionless(0.95))
        );
        assert_error!(
            model.get_demands(&customer, &widget, 5),
            "Time 5 is beyond the planning horizon (3 periods)"
        );
    }

    #[rstest]
    fn test_demand_default_service_level(
        mut model: SupplyChainModel,
        customer: Arc<Customer>,
        widget: Arc<Product>,
    ) {
        model
            .add_demand(&customer, &widget, flows(&[1.0, 2.0, 3.0]), None)
            .unwrap();
        assert_eq!(
            model.get_service_level(&customer, &widget),
            Some(DEFAULT_SERVICE_LEVEL)
        );
    }

    #[rstest]
    fn test_demand_not_found(
        mut model: SupplyChainModel,
        customer: Arc<Customer>,
        widget: Arc<Product>,
    ) {
        let gadget = Product::new("gadget");
        model
            .add_demand(&customer, &widget, flows(&[1.0, 2.0, 3.0]), None)
            .unwrap();

        // Not found regardless of the time, even beyond the horizon
        for time in 0..model.horizon() + 3 {
            assert_eq!(model.get_demands(&customer, &gadget, time).unwrap(), None);
        }
        assert_eq!(model.get_service_level(&customer, &gadget), None);

        let other_customer = Customer::new("C2", Location::new(0.0, 0.0));
        assert_eq!(model.get_demands(&other_customer, &widget, 0).unwrap(), None);
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.1)]
    fn test_add_demand_invalid_service_level(
        mut model: SupplyChainModel,
        customer: Arc<Customer>,
        widget: Arc<Product>,
        #[case] service_level: f64,
    ) {
        assert!(
            model
                .add_demand(
                    &customer,
                    &widget,
                    flows(&[1.0, 2.0, 3.0]),
                    Some(Dimensionless(service_level))
                )
                .is_err()
        );
        assert!(model.demands().is_empty());
    }

    #[rstest]
    fn test_add_demand_wrong_length(
        mut model: SupplyChainModel,
        customer: Arc<Customer>,
        widget: Arc<Product>,
    ) {
        assert_error!(
            model.add_demand(&customer, &widget, flows(&[1.0, 2.0]), None),
            "Demand for widget by customer C1 covers 2 periods, but the horizon is 3 periods"
        );
        assert!(model.demands().is_empty());
    }

    #[rstest]
    fn test_add_demand_duplicate_rejected(
        mut model: SupplyChainModel,
        customer: Arc<Customer>,
        widget: Arc<Product>,
    ) {
        model
            .add_demand(&customer, &widget, flows(&[1.0, 2.0, 3.0]), Some(Dimensionless(0.5)))
            .unwrap();

        // Same customer and product, but separately constructed instances
        let customer2 = Arc::new(Customer::new("C1", Location::new(0.0, 0.0)));
        let widget2 = Arc::new(Product::new("widget"));
        assert_error!(
            model.add_demand(&customer2, &widget2, flows(&[4.0, 5.0, 6.0]), None),
            "Demand for widget by customer C1 has already been added"
        );

        // The first record is the one which remains visible
        assert_eq!(model.demands().len(), 1);
        assert_eq!(
            model.get_demands(&customer, &widget, 0).unwrap(),
            Some(Flow(1.0))
        );
        assert_eq!(
            model.get_service_level(&customer, &widget),
            Some(Dimensionless(0.5))
        );
    }

    #[rstest]
    fn test_total_demand(
        mut model: SupplyChainModel,
        customer: Arc<Customer>,
        widget: Arc<Product>,
    ) {
        let customer2 = model.add_customer(Customer::new("C2", Location::new(0.0, 0.0)));
        model
            .add_demand(&customer, &widget, flows(&[1.0, 2.0, 3.0]), None)
            .unwrap();
        model
            .add_demand(&customer2, &widget, flows(&[10.0, 20.0, 30.0]), None)
            .unwrap();

        assert_eq!(model.total_demand(&widget, 2).unwrap(), Flow(33.0));
        assert_eq!(
            model.total_demand(&Product::new("gadget"), 0).unwrap(),
            Flow(0.0)
        );
        assert!(model.total_demand(&widget, 3).is_err());
    }

    #[rstest]
    fn test_identical_lanes_are_distinct(
        mut model: SupplyChainModel,
        plant_node: Node,
        storage_node: Node,
    ) {
        let first = model.add_lane(Lane::new(plant_node.clone(), storage_node.clone()));
        let second = model.add_lane(Lane::new(plant_node.clone(), storage_node));
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(
            lane_ptrs(model.get_lanes_out(&plant_node).unwrap()),
            [Arc::as_ptr(&first), Arc::as_ptr(&second)]
        );
    }

    #[rstest]
    fn test_add_entities_keeps_duplicates(mut model: SupplyChainModel, location: Location) {
        let before = model.plants().len();
        model.add_plant(Plant::new("P1", location.clone()));
        assert_eq!(model.plants().len(), before + 1);

        // First match wins on lookup
        let node = model.get_node(NodeKind::Plant, "P1").unwrap();
        let Node::Plant(plant) = node else {
            panic!("Expected a plant");
        };
        assert!(Arc::ptr_eq(&plant, &model.plants()[0]));

        model.add_product(Product::new("widget"));
        assert_eq!(
            model
                .products()
                .iter()
                .filter(|p| &*p.id.0 == "widget")
                .count(),
            2
        );
        assert!(Arc::ptr_eq(
            model.get_product("widget").unwrap(),
            &model.products()[0]
        ));
    }

    #[rstest]
    fn test_iter_nodes(model: SupplyChainModel) {
        let kinds: Vec<_> = model.iter_nodes().map(|node| node.kind()).collect();
        assert_eq!(
            kinds,
            [
                NodeKind::Supplier,
                NodeKind::Plant,
                NodeKind::Storage,
                NodeKind::Customer
            ]
        );
        assert!(model.get_node(NodeKind::Customer, "P1").is_none());
    }

    #[rstest]
    fn test_into_shared_with_settings(mut model: SupplyChainModel, location: Location) {
        model.add_plant(Plant::new("P1", location));

        let lenient = Settings::default();
        assert!(model.clone().into_shared_with(&lenient).is_ok());

        let strict = Settings {
            strict_validation: true,
            ..Settings::default()
        };
        let err = model.into_shared_with(&strict).unwrap_err();
        assert_eq!(err.to_string(), "Supply chain model failed validation");
        assert_eq!(
            err.root_cause().to_string(),
            "The plant P1 has been added more than once"
        );
    }

    #[test]
    fn test_model_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SupplyChainModel>();
        assert_send_sync::<Arc<SupplyChainModel>>();
    }
}
