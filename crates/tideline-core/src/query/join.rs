use super::PhysicalCriteria;

/// One hop of a populate, as handed to the adapter.
///
/// A populate through a junction or through model produces two joins: the
/// first (`parent -> mediator`) has `select == false` and no criteria, the
/// second (`mediator -> child`) carries the caller's subcriteria.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Model identity of the parent side.
    pub parent_identity: String,

    /// Parent table.
    pub parent: String,

    /// Column on the parent table.
    pub parent_key: String,

    /// Model identity of the child side.
    pub child_identity: String,

    /// Child table.
    pub child: String,

    /// Column on the child table matched against `parent_key`.
    pub child_key: String,

    /// Attribute the populated records are nested under.
    pub alias: String,

    /// False for the hop into a junction or through table; its columns are
    /// never returned to the caller.
    pub select: bool,

    pub criteria: Option<PhysicalCriteria>,

    /// True when the association is plural.
    pub collection: bool,

    /// True when the association is singular.
    pub model: bool,

    /// True for both hops of a populate through a junction or through
    /// table.
    pub junction_table: bool,

    /// The parent key is a foreign key whose value is replaced by the
    /// populated record.
    pub remove_parent_key: bool,
}
