use super::{create_each, cross_product, update, Link};
use crate::engine::Engine;

use tideline_core::query::{CollectionChange, Meta, Where};
use tideline_core::{Omen, Record, Result};

use futures::future::try_join_all;
use serde_json::{json, Value};

impl Engine {
    /// Make the associated ids the complete collection of every target.
    ///
    /// The clearing write always completes before anything is linked.
    pub(super) async fn replace(
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
                let mut clear = Where::new();
                clear.insert(
                    parent_reference.to_string(),
                    json!({ "in": change.target_record_ids }),
                );

                self.write(super::destroy(mediator, clear, meta.clone()), omen)
                    .await?;

                if change.associated_ids.is_empty() {
                    return Ok(());
                }

                let rows = cross_product(&change, parent_reference, child_reference);
                self.write(create_each(mediator, rows, meta), omen).await
            }
            Link::ForeignKey { child, via } => {
                let mut clear = Where::new();
                clear.insert(via.to_string(), json!({ "in": change.target_record_ids }));

                let mut unset = Record::new();
                unset.insert(via.to_string(), Value::Null);

                self.write(update(child, clear, unset, meta.clone()), omen)
                    .await?;

                let mut writes = vec![];

                for target in &change.target_record_ids {
                    for associated in &change.associated_ids {
                        let mut only = Where::new();
                        only.insert(child.primary_key.clone(), associated.clone());

                        let mut set = Record::new();
                        set.insert(via.to_string(), target.clone());

                        writes.push(self.write(update(child, only, set, meta.clone()), omen));
                    }
                }

                try_join_all(writes).await?;
                Ok(())
            }
        }
    }
}
