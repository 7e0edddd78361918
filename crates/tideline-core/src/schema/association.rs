/// How a plural association is stored.
///
/// Computed once when the schema is built; nothing downstream re-derives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Association {
    /// Children carry a foreign key (`via`) pointing at the parent.
    OneToMany {
        /// Attribute on the child holding the foreign key.
        via: String,
    },

    /// Links live in an auto-generated junction model.
    ManyToManyViaJunction {
        junction: String,

        /// Junction attribute referencing the parent.
        parent_reference: String,

        /// Junction attribute referencing the child.
        child_reference: String,
    },

    /// Links live in a user-defined through model.
    ManyToManyViaThrough {
        through: String,
        parent_reference: String,
        child_reference: String,
    },
}

impl Association {
    pub fn is_one_to_many(&self) -> bool {
        matches!(self, Association::OneToMany { .. })
    }

    pub fn is_many_to_many(&self) -> bool {
        !self.is_one_to_many()
    }

    /// Identity of the junction or through model, if any.
    pub fn mediator(&self) -> Option<&str> {
        match self {
            Association::OneToMany { .. } => None,
            Association::ManyToManyViaJunction { junction, .. } => Some(junction),
            Association::ManyToManyViaThrough { through, .. } => Some(through),
        }
    }

    /// `(parent_reference, child_reference)` on the mediator.
    pub fn references(&self) -> Option<(&str, &str)> {
        match self {
            Association::OneToMany { .. } => None,
            Association::ManyToManyViaJunction {
                parent_reference,
                child_reference,
                ..
            }
            | Association::ManyToManyViaThrough {
                parent_reference,
                child_reference,
                ..
            } => Some((parent_reference, child_reference)),
        }
    }
}
