use super::{adapter_error, compile, Engine};

use tideline_core::adapter::{Operation, Rows};
use tideline_core::query::{Join, StageTwoQuery};
use tideline_core::schema::Model;
use tideline_core::{Error, Omen, Record, Result};

use serde_json::Value;
use tracing::{debug, warn};

impl Engine {
    /// Send one compiled operation to the adapter.
    ///
    /// The adapter's capability is checked first. Failures reported by the
    /// adapter are normalized against `model`.
    pub(super) async fn exec_operation(
        &self,
        model: &Model,
        operation: Operation,
        omen: Omen,
    ) -> Result<Rows> {
        let method = operation.method();

        if !self.adapter.capability().supports(method) {
            return Err(Error::unsupported_operation(
                self.adapter.identity(),
                method,
            ));
        }

        let datastore = model.datastore.as_deref().unwrap_or(&self.datastore);

        debug!(
            adapter = self.adapter.identity(),
            datastore,
            method = %method,
            table = operation.using(),
            "exec"
        );

        match self.adapter.exec(datastore, operation).await {
            Ok(response) => Ok(response.rows),
            Err(raw) => Err(adapter_error::normalize(model, raw, omen)),
        }
    }

    /// Compile and run a stage-two query.
    pub(super) async fn exec_query(&self, query: StageTwoQuery, omen: Omen) -> Result<Rows> {
        let model = self.schema.model(&query.using)?;
        let operation = compile(&self.schema, query)?;
        self.exec_operation(model, operation, omen).await
    }

    /// Rename the columns of records returned for `model` back to attribute
    /// names, including records nested under a populated alias.
    pub(super) fn unserialize_records(
        &self,
        model: &Model,
        joins: &[Join],
        records: &mut [Record],
    ) -> Result<()> {
        // Only the hop that carries user-visible records matters
        let populated: Vec<(&Join, &Model)> = joins
            .iter()
            .filter(|join| join.select)
            .map(|join| {
                self.schema
                    .model(&join.child_identity)
                    .map(|child| (join, child))
            })
            .collect::<Result<_>>()?;

        for record in records.iter_mut() {
            let detached: Vec<_> = populated
                .iter()
                .map(|(join, _)| record.remove(&join.alias))
                .collect();

            model.transformer.unserialize(record);
            self.check_primary_key(model, record);

            for ((join, child), value) in populated.iter().zip(detached) {
                let value = match value {
                    Some(Value::Array(children)) => Value::Array(
                        children
                            .into_iter()
                            .map(|child_record| self.unserialize_child(child, child_record))
                            .collect(),
                    ),
                    Some(child_record @ Value::Object(_)) => self.unserialize_child(child, child_record),
                    Some(other) => other,
                    None if join.collection => Value::Array(vec![]),
                    None => Value::Null,
                };

                record.insert(join.alias.clone(), value);
            }
        }

        Ok(())
    }

    fn unserialize_child(&self, child: &Model, value: Value) -> Value {
        match value {
            Value::Object(mut record) => {
                child.transformer.unserialize(&mut record);
                self.check_primary_key(child, &record);
                Value::Object(record)
            }
            other => other,
        }
    }

    fn check_primary_key(&self, model: &Model, record: &Record) {
        if !matches!(record.get(&model.primary_key), Some(value) if !value.is_null()) {
            warn!(
                model = %model.identity,
                primary_key = %model.primary_key,
                "adapter returned a record without a primary key value"
            );
        }
    }
}
