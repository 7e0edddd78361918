use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Find,
    FindOne,
    Stream,
    Count,
    Sum,
    Avg,
    Create,
    CreateEach,
    Update,
    Destroy,
    AddToCollection,
    RemoveFromCollection,
    ReplaceCollection,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        use Method::*;

        match self {
            Find => "find",
            FindOne => "findOne",
            Stream => "stream",
            Count => "count",
            Sum => "sum",
            Avg => "avg",
            Create => "create",
            CreateEach => "createEach",
            Update => "update",
            Destroy => "destroy",
            AddToCollection => "addToCollection",
            RemoveFromCollection => "removeFromCollection",
            ReplaceCollection => "replaceCollection",
        }
    }

    /// Methods that accept `populates`.
    pub fn is_read(self) -> bool {
        matches!(self, Method::Find | Method::FindOne | Method::Stream)
    }

    pub fn is_collection(self) -> bool {
        matches!(
            self,
            Method::AddToCollection | Method::RemoveFromCollection | Method::ReplaceCollection
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
