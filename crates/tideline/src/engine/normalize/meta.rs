use tideline_core::query::{Lease, Meta};
use tideline_core::{Error, Result};

use serde_json::Value;

pub(super) fn normalize(raw: Value, lease: Option<Lease>) -> Result<Meta> {
    let mut meta = Meta {
        lease,
        ..Meta::default()
    };

    let entries = match raw {
        Value::Null => return Ok(meta),
        Value::Object(entries) => entries,
        other => {
            return Err(Error::invalid_meta(format!(
                "meta must be a dictionary, got `{other}`"
            )))
        }
    };

    for (key, value) in entries {
        let flag = match &key[..] {
            "fetch" => Some(&mut meta.fetch),
            "cascade" => Some(&mut meta.cascade),
            "skipAllLifecycleCallbacks" => Some(&mut meta.skip_all_lifecycle_callbacks),
            _ => None,
        };

        // Unrecognised keys belong to the adapter
        let Some(flag) = flag else {
            meta.extras.insert(key, value);
            continue;
        };

        match value {
            Value::Bool(value) => *flag = value,
            other => {
                return Err(Error::invalid_meta(format!(
                    "`{key}` must be a boolean, got `{other}`"
                )))
            }
        }
    }

    Ok(meta)
}
