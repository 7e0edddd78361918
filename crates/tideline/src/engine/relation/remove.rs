use super::{update, Link};
use crate::engine::Engine;

use tideline_core::query::{CollectionChange, Meta, Where};
use tideline_core::{Omen, Record, Result};

use futures::future::try_join_all;
use serde_json::{json, Value};

impl Engine {
    /// Unlink the associated ids from every target. Other links are left
    /// alone.
    pub(super) async fn remove(
        &self,
        link: Link<'_>,
        change: CollectionChange,
        meta: Meta,
        omen: Omen,
    ) -> Result<()> {
        match link {
            Link::Mediated {
                mediator,
                parent_reference,
                child_reference,
            } => {
                // Each target's links are disjoint, so order does not matter
                let destroys = change.target_record_ids.iter().map(|target| {
                    let mut only = Where::new();
                    only.insert(parent_reference.to_string(), target.clone());
                    only.insert(
                        child_reference.to_string(),
                        json!({ "in": change.associated_ids }),
                    );

                    self.write(super::destroy(mediator, only, meta.clone()), omen)
                });

                try_join_all(destroys).await?;
                Ok(())
            }
            Link::ForeignKey { child, via } => {
                let mut only = Where::new();
                only.insert(
                    child.primary_key.clone(),
                    json!({ "in": change.associated_ids }),
                );
                only.insert(via.to_string(), json!({ "in": change.target_record_ids }));

                let mut unset = Record::new();
                unset.insert(via.to_string(), Value::Null);

                self.write(update(child, only, unset, meta), omen).await
            }
        }
    }
}
