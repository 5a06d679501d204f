//! Nodes are the sites of the supply chain network: suppliers, plants, storage locations and
//! customers. Any node can be the endpoint of a [`Lane`](crate::lane::Lane).
//!
//! Each kind of node records per-product attributes, which are registered with an `add_product`
//! call. Registering the same product twice overwrites the earlier attributes.
use crate::id::{NodeID, ProductID, define_id_identity};
use crate::location::Location;
use crate::product::Product;
use crate::units::{Dimensionless, Flow, Limit, Money, MoneyPerFlow};
use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use strum::{Display, EnumIter};

/// Per-product attributes of a node, keyed by product ID
pub type NodeProductMap<T> = IndexMap<ProductID, NodeProduct<T>>;

/// Quantities of component products required to produce one unit of a product
pub type BillOfMaterial = IndexMap<ProductID, Flow>;

/// A product registered with a node, along with the node's attributes for it
#[derive(Debug, Clone, PartialEq)]
pub struct NodeProduct<T> {
    /// The registered product
    pub product: Arc<Product>,
    /// Attributes specific to this node and product
    pub attributes: T,
}

/// Insert or overwrite a product's attributes
fn upsert_product<T>(map: &mut NodeProductMap<T>, product: Arc<Product>, attributes: T) {
    map.insert(
        product.id.clone(),
        NodeProduct {
            product,
            attributes,
        },
    );
}

/// Attributes of a product offered by a [`Supplier`]
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierProduct {
    /// Purchase cost per unit
    pub unit_cost: MoneyPerFlow,
    /// Maximum quantity which can be supplied per period
    pub maximum_throughput: Limit<Flow>,
}

impl Default for SupplierProduct {
    fn default() -> Self {
        Self {
            unit_cost: MoneyPerFlow(0.0),
            maximum_throughput: Limit::Infinity,
        }
    }
}

/// Attributes of a product manufactured by a [`Plant`]
#[derive(Debug, Clone, PartialEq)]
pub struct PlantProduct {
    /// Components consumed per unit produced.
    ///
    /// Cyclic bills of material are not rejected here; see
    /// [`check_bill_of_material_acyclic`](crate::graph::check_bill_of_material_acyclic).
    pub bill_of_material: BillOfMaterial,
    /// Production cost per unit
    pub unit_cost: MoneyPerFlow,
    /// Maximum quantity which can be produced per period
    pub maximum_throughput: Limit<Flow>,
    /// Production lead time in periods
    pub time: u32,
}

impl Default for PlantProduct {
    fn default() -> Self {
        Self {
            bill_of_material: BillOfMaterial::new(),
            unit_cost: MoneyPerFlow(0.0),
            maximum_throughput: Limit::Infinity,
            time: 0,
        }
    }
}

/// Attributes of a product held at a [`Storage`] location
#[derive(Debug, Clone, PartialEq)]
pub struct StorageProduct {
    /// Stock on hand at the start of the horizon
    pub initial_inventory: Flow,
    /// Handling cost per unit passing through the site
    pub unit_handling_cost: MoneyPerFlow,
    /// Maximum quantity which can pass through the site per period
    pub maximum_throughput: Limit<Flow>,
    /// Additional stock to hold, in periods of cover
    pub additional_stock_coverage: Dimensionless,
}

impl Default for StorageProduct {
    fn default() -> Self {
        Self {
            initial_inventory: Flow(0.0),
            unit_handling_cost: MoneyPerFlow(0.0),
            maximum_throughput: Limit::Infinity,
            additional_stock_coverage: Dimensionless(0.0),
        }
    }
}

/// Records that a [`Customer`] demands a product.
///
/// The time series of demand is held separately, in [`Demand`](crate::demand::Demand).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomerProduct {
    /// Nominal demand quantity
    pub demand: Flow,
}

/// Costs and initial state for a facility which can be opened or closed
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityParameters {
    /// Cost per period of keeping the facility open
    pub fixed_cost: Money,
    /// One-off cost of opening the facility
    pub opening_cost: Money,
    /// One-off cost of closing the facility
    pub closing_cost: Limit<Money>,
    /// Whether the facility is open at the start of the horizon
    pub initial_opened: bool,
}

impl FacilityParameters {
    /// Parameters for an open facility with no costs and the given closing cost
    fn open_with_closing_cost(closing_cost: Limit<Money>) -> Self {
        Self {
            fixed_cost: Money(0.0),
            opening_cost: Money(0.0),
            closing_cost,
            initial_opened: true,
        }
    }
}

/// A supplier of raw products
#[derive(Debug, Clone)]
pub struct Supplier {
    /// The supplier's name
    pub id: NodeID,
    /// Where the supplier is
    pub location: Location,
    /// The products offered by this supplier
    pub products: NodeProductMap<SupplierProduct>,
}
define_id_identity! {Supplier}

impl Supplier {
    /// Create a new supplier offering no products
    pub fn new(id: &str, location: Location) -> Self {
        Self {
            id: id.into(),
            location,
            products: NodeProductMap::new(),
        }
    }

    /// Indicate that this supplier can supply a product
    pub fn add_product(&mut self, product: Arc<Product>, attributes: SupplierProduct) {
        upsert_product(&mut self.products, product, attributes);
    }

    /// Get the attributes for a product, if registered
    pub fn get_product(&self, product_id: &str) -> Option<&SupplierProduct> {
        self.products.get(product_id).map(|p| &p.attributes)
    }
}

/// A production plant
#[derive(Debug, Clone)]
pub struct Plant {
    /// The plant's name
    pub id: NodeID,
    /// Where the plant is
    pub location: Location,
    /// Opening and closing costs for the plant
    pub facility: FacilityParameters,
    /// The products made at this plant
    pub products: NodeProductMap<PlantProduct>,
}
define_id_identity! {Plant}

impl Plant {
    /// Create a new open plant with no costs.
    ///
    /// Closing the plant is made prohibitively expensive by default.
    pub fn new(id: &str, location: Location) -> Self {
        Self::with_facility(
            id,
            location,
            FacilityParameters::open_with_closing_cost(Limit::Infinity),
        )
    }

    /// Create a new plant with the given facility parameters
    pub fn with_facility(id: &str, location: Location, facility: FacilityParameters) -> Self {
        Self {
            id: id.into(),
            location,
            facility,
            products: NodeProductMap::new(),
        }
    }

    /// Indicate that this plant can produce a product
    pub fn add_product(&mut self, product: Arc<Product>, attributes: PlantProduct) {
        upsert_product(&mut self.products, product, attributes);
    }

    /// Get the attributes for a product, if registered
    pub fn get_product(&self, product_id: &str) -> Option<&PlantProduct> {
        self.products.get(product_id).map(|p| &p.attributes)
    }
}

/// A storage location, such as a warehouse or distribution centre
#[derive(Debug, Clone)]
pub struct Storage {
    /// The storage location's name
    pub id: NodeID,
    /// Where the storage location is
    pub location: Location,
    /// Opening and closing costs for the site
    pub facility: FacilityParameters,
    /// The products stored at this site
    pub products: NodeProductMap<StorageProduct>,
}
define_id_identity! {Storage}

impl Storage {
    /// Create a new open storage location with no costs.
    ///
    /// Closing the site is unboundedly profitable by default, so it is only kept open if needed.
    pub fn new(id: &str, location: Location) -> Self {
        Self::with_facility(
            id,
            location,
            FacilityParameters::open_with_closing_cost(Limit::NegInfinity),
        )
    }

    /// Create a new storage location with the given facility parameters
    pub fn with_facility(id: &str, location: Location, facility: FacilityParameters) -> Self {
        Self {
            id: id.into(),
            location,
            facility,
            products: NodeProductMap::new(),
        }
    }

    /// Indicate that this site can store a product
    pub fn add_product(&mut self, product: Arc<Product>, attributes: StorageProduct) {
        upsert_product(&mut self.products, product, attributes);
    }

    /// Get the attributes for a product, if registered
    pub fn get_product(&self, product_id: &str) -> Option<&StorageProduct> {
        self.products.get(product_id).map(|p| &p.attributes)
    }
}

/// A customer
#[derive(Debug, Clone)]
pub struct Customer {
    /// The customer's name
    pub id: NodeID,
    /// Where the customer is
    pub location: Location,
    /// The products demanded by this customer
    pub products: NodeProductMap<CustomerProduct>,
}
define_id_identity! {Customer}

impl Customer {
    /// Create a new customer demanding no products
    pub fn new(id: &str, location: Location) -> Self {
        Self {
            id: id.into(),
            location,
            products: NodeProductMap::new(),
        }
    }

    /// Indicate that this customer demands a product
    pub fn add_product(&mut self, product: Arc<Product>, demand: Flow) {
        upsert_product(&mut self.products, product, CustomerProduct { demand });
    }

    /// Get the attributes for a product, if registered
    pub fn get_product(&self, product_id: &str) -> Option<&CustomerProduct> {
        self.products.get(product_id).map(|p| &p.attributes)
    }
}

/// The kinds of [`Node`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    /// A [`Supplier`]
    Supplier,
    /// A [`Plant`]
    Plant,
    /// A [`Storage`] location
    Storage,
    /// A [`Customer`]
    Customer,
}

/// Any site which can be the endpoint of a lane.
///
/// Nodes are identified by their kind and name, so two separately constructed plants called "P1"
/// are the same node, whereas a plant and a customer both called "P1" are not.
#[derive(Debug, Clone)]
pub enum Node {
    /// A supplier node
    Supplier(Arc<Supplier>),
    /// A plant node
    Plant(Arc<Plant>),
    /// A storage node
    Storage(Arc<Storage>),
    /// A customer node
    Customer(Arc<Customer>),
}

impl Node {
    /// The node's name
    pub fn id(&self) -> &NodeID {
        match self {
            Node::Supplier(supplier) => &supplier.id,
            Node::Plant(plant) => &plant.id,
            Node::Storage(storage) => &storage.id,
            Node::Customer(customer) => &customer.id,
        }
    }

    /// What kind of node this is
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Supplier(_) => NodeKind::Supplier,
            Node::Plant(_) => NodeKind::Plant,
            Node::Storage(_) => NodeKind::Storage,
            Node::Customer(_) => NodeKind::Customer,
        }
    }

    /// Where the node is
    pub fn location(&self) -> &Location {
        match self {
            Node::Supplier(supplier) => &supplier.location,
            Node::Plant(plant) => &plant.location,
            Node::Storage(storage) => &storage.location,
            Node::Customer(customer) => &customer.location,
        }
    }

    /// Whether a product has been registered with this node
    pub fn has_product(&self, product_id: &str) -> bool {
        match self {
            Node::Supplier(supplier) => supplier.products.contains_key(product_id),
            Node::Plant(plant) => plant.products.contains_key(product_id),
            Node::Storage(storage) => storage.products.contains_key(product_id),
            Node::Customer(customer) => customer.products.contains_key(product_id),
        }
    }

    /// Iterate over the products registered with this node, in registration order
    pub fn iter_products(&self) -> Box<dyn Iterator<Item = &Arc<Product>> + '_> {
        match self {
            Node::Supplier(supplier) => Box::new(supplier.products.values().map(|p| &p.product)),
            Node::Plant(plant) => Box::new(plant.products.values().map(|p| &p.product)),
            Node::Storage(storage) => Box::new(storage.products.values().map(|p| &p.product)),
            Node::Customer(customer) => Box::new(customer.products.values().map(|p| &p.product)),
        }
    }

    /// Whether this node is a source of product (i.e. a supplier or a plant)
    pub fn is_source(&self) -> bool {
        matches!(self, Node::Supplier(_) | Node::Plant(_))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.id() == other.id()
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.id().hash(state);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id(), self.location())
    }
}

macro_rules! impl_node_from {
    ($variant:ident) => {
        impl From<$variant> for Node {
            fn from(value: $variant) -> Self {
                Node::$variant(Arc::new(value))
            }
        }

        impl From<Arc<$variant>> for Node {
            fn from(value: Arc<$variant>) -> Self {
                Node::$variant(value)
            }
        }

        impl From<&Arc<$variant>> for Node {
            fn from(value: &Arc<$variant>) -> Self {
                Node::$variant(Arc::clone(value))
            }
        }

        impl fmt::Display for $variant {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} ({})", self.id, self.location)
            }
        }
    };
}

impl_node_from!(Supplier);
impl_node_from!(Plant);
impl_node_from!(Storage);
impl_node_from!(Customer);
