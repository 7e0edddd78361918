use super::SortClause;

/// A `where` clause. Keys are attribute names before compilation and column
/// names after.
pub type Where = serde_json::Map<String, serde_json::Value>;

/// Normalized, attribute-named criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    /// Always present. An empty dictionary matches every record.
    pub where_clause: Where,

    /// `None` means unlimited.
    pub limit: Option<u64>,
    pub skip: u64,
    pub sort: Vec<SortClause>,

    /// Either `["*"]` or an explicit list of attribute names.
    pub select: Vec<String>,
    pub omit: Vec<String>,
}

/// Column-named criteria sent to the adapter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhysicalCriteria {
    pub where_clause: Where,
    pub limit: Option<u64>,
    pub skip: u64,
    pub sort: Vec<SortClause>,
    pub select: Vec<String>,
}

impl Criteria {
    pub const SELECT_ALL: &'static str = "*";

    pub fn is_select_all(&self) -> bool {
        matches!(&self.select[..], [only] if only == Self::SELECT_ALL)
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria {
            where_clause: Where::new(),
            limit: None,
            skip: 0,
            sort: vec![],
            select: vec![Self::SELECT_ALL.to_string()],
            omit: vec![],
        }
    }
}

impl From<Criteria> for PhysicalCriteria {
    fn from(criteria: Criteria) -> Self {
        PhysicalCriteria {
            where_clause: criteria.where_clause,
            limit: criteria.limit,
            skip: criteria.skip,
            sort: criteria.sort,
            select: criteria.select,
        }
    }
}
