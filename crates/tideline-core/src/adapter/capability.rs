use std::fmt;

/// The optional methods an adapter may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterMethod {
    Find,
    Create,
    CreateEach,
    Update,
    Destroy,
    Count,
    Sum,
    Avg,
    Join,
}

impl AdapterMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            AdapterMethod::Find => "find",
            AdapterMethod::Create => "create",
            AdapterMethod::CreateEach => "createEach",
            AdapterMethod::Update => "update",
            AdapterMethod::Destroy => "destroy",
            AdapterMethod::Count => "count",
            AdapterMethod::Sum => "sum",
            AdapterMethod::Avg => "avg",
            AdapterMethod::Join => "join",
        }
    }
}

impl fmt::Display for AdapterMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    pub find: bool,
    pub create: bool,
    pub create_each: bool,
    pub update: bool,
    pub destroy: bool,
    pub count: bool,
    pub sum: bool,
    pub avg: bool,

    /// When true, the adapter resolves join descriptors itself. Otherwise the
    /// engine issues one query per join hop and stitches the results.
    pub join: bool,
}

impl Capability {
    /// Every method, including native joins.
    pub const FULL: Self = Self {
        find: true,
        create: true,
        create_each: true,
        update: true,
        destroy: true,
        count: true,
        sum: true,
        avg: true,
        join: true,
    };

    /// Every method except native joins.
    pub const NO_JOIN: Self = Self {
        join: false,
        ..Self::FULL
    };

    /// Only reads are possible.
    pub const READ_ONLY: Self = Self {
        create: false,
        create_each: false,
        update: false,
        destroy: false,
        ..Self::FULL
    };

    pub fn supports(&self, method: AdapterMethod) -> bool {
        match method {
            AdapterMethod::Find => self.find,
            AdapterMethod::Create => self.create,
            AdapterMethod::CreateEach => self.create_each,
            AdapterMethod::Update => self.update,
            AdapterMethod::Destroy => self.destroy,
            AdapterMethod::Count => self.count,
            AdapterMethod::Sum => self.sum,
            AdapterMethod::Avg => self.avg,
            AdapterMethod::Join => self.join,
        }
    }
}
