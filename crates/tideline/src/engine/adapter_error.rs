use tideline_core::adapter::{AdapterError, Footprint};
use tideline_core::schema::Model;
use tideline_core::{Error, Omen};

use tracing::warn;

/// Classify a raw adapter error for `model`.
///
/// Only the `notUnique` footprint is understood. Its column names are
/// mapped back to attribute names; a footprint without keys, or with any
/// other identity, points at a bug in the adapter.
pub(super) fn normalize(model: &Model, raw: AdapterError, omen: Omen) -> Error {
    let attr_names = match raw.footprint() {
        None => return Error::adapter_unexpected(&model.identity, raw, omen),
        Some(footprint) if !footprint.is_not_unique() => {
            return Error::adapter_malformed(&model.identity, raw, omen)
        }
        Some(Footprint { keys: None, .. }) => {
            return Error::adapter_malformed(&model.identity, raw, omen)
        }
        Some(Footprint {
            keys: Some(keys), ..
        }) => keys
            .iter()
            .filter_map(|key| {
                let attr = model
                    .stored_attributes()
                    .find(|attr| attr.column_name.as_deref() == Some(key.as_str()));

                if attr.is_none() {
                    warn!(
                        model = %model.identity,
                        column = %key,
                        "adapter reported a uniqueness violation on an unrecognized column"
                    );
                }

                attr.map(|attr| attr.name.clone())
            })
            .collect(),
    };

    Error::unique(&model.identity, attr_names, raw, omen)
}
