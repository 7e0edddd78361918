use super::{create_each, cross_product, update, Link};
use crate::engine::Engine;

use tideline_core::query::{CollectionChange, Meta, Where};
use tideline_core::{Omen, Record, Result};

use futures::future::try_join_all;
use serde_json::json;

impl Engine {
    /// Link the associated ids to every target, keeping existing links.
    pub(super) async fn add(
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
                let rows = cross_product(&change, parent_reference, child_reference);
                self.write(create_each(mediator, rows, meta), omen).await
            }
            Link::ForeignKey { child, via } => {
                // A child has a single parent: with several targets the last
                // write to land wins.
                let updates = change.target_record_ids.iter().map(|target| {
                    let mut only = Where::new();
                    only.insert(
                        child.primary_key.clone(),
                        json!({ "in": change.associated_ids }),
                    );

                    let mut set = Record::new();
                    set.insert(via.to_string(), target.clone());

                    self.write(update(child, only, set, meta.clone()), omen)
                });

                try_join_all(updates).await?;
                Ok(())
            }
        }
    }
}
