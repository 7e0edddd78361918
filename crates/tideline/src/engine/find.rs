use super::{compile, normalize, Engine};

use tideline_core::adapter::Operation;
use tideline_core::query::{Method, QueryBody, Request, SortClause, StageTwoQuery};
use tideline_core::{bail, Error, Omen, Record, Result};

use tracing::warn;

/// Records fetched per round trip while streaming.
const STREAM_BATCH_SIZE: u64 = 30;

impl Engine {
    pub(crate) async fn find(&self, request: Request, omen: Omen) -> Result<Vec<Record>> {
        match normalize(&self.schema, Method::Find, request) {
            Ok(query) => self.find_records(query, omen).await,
            Err(err) if err.is_noop() => Ok(vec![]),
            Err(err) => Err(err),
        }
    }

    pub(crate) async fn find_one(&self, request: Request, omen: Omen) -> Result<Option<Record>> {
        let query = match normalize(&self.schema, Method::FindOne, request) {
            Ok(query) => query,
            Err(err) if err.is_noop() => return Ok(None),
            Err(err) => return Err(err),
        };

        let using = query.using.clone();
        let mut records = self.find_records(query, omen).await?;

        if records.len() > 1 {
            return Err(Error::too_many_records(format!(
                "`findOne` on `{using}` matched {} records",
                records.len()
            )));
        }

        Ok(records.pop())
    }

    /// Page through every match, handing records to `each` one at a time.
    /// An error from `each` stops the stream.
    pub(crate) async fn stream<F>(&self, request: Request, mut each: F, omen: Omen) -> Result<()>
    where
        F: FnMut(Record) -> Result<()>,
    {
        let query = match normalize(&self.schema, Method::Stream, request) {
            Ok(query) => query,
            Err(err) if err.is_noop() => return Ok(()),
            Err(err) => return Err(err),
        };

        let StageTwoQuery {
            using, meta, body, ..
        } = query;

        let QueryBody::Find {
            mut criteria,
            populates,
        } = body
        else {
            bail!("stream query was normalized into a non-find body");
        };

        // Paging needs a stable order
        if criteria.sort.is_empty() {
            let model = self.schema.model(&using)?;
            criteria.sort.push(SortClause::asc(&model.primary_key));
        }

        let mut remaining = criteria.limit;
        let mut skip = criteria.skip;

        loop {
            let batch_size = match remaining {
                Some(0) => break,
                Some(remaining) => remaining.min(STREAM_BATCH_SIZE),
                None => STREAM_BATCH_SIZE,
            };

            let mut batch_criteria = criteria.clone();
            batch_criteria.skip = skip;
            batch_criteria.limit = Some(batch_size);

            let batch = StageTwoQuery {
                method: Method::Stream,
                using: using.clone(),
                meta: meta.clone(),
                body: QueryBody::Find {
                    criteria: batch_criteria,
                    populates: populates.clone(),
                },
            };

            let mut records = self.find_records(batch, omen).await?;

            if records.len() as u64 > batch_size {
                warn!(
                    model = %using,
                    limit = batch_size,
                    returned = records.len(),
                    "adapter returned more records than the batch limit"
                );
                records.truncate(batch_size as usize);
            }

            let fetched = records.len() as u64;

            for record in records {
                each(record)?;
            }

            if fetched < batch_size {
                break;
            }

            skip += fetched;
            remaining = remaining.map(|remaining| remaining - fetched);
        }

        Ok(())
    }

    pub(crate) async fn count(&self, request: Request, omen: Omen) -> Result<u64> {
        match normalize(&self.schema, Method::Count, request) {
            Ok(query) => self.exec_query(query, omen).await?.into_count(),
            Err(err) if err.is_noop() => Ok(0),
            Err(err) => Err(err),
        }
    }

    /// `sum` or `avg`.
    pub(crate) async fn aggregate(&self, method: Method, request: Request, omen: Omen) -> Result<f64> {
        match normalize(&self.schema, method, request) {
            Ok(query) => self.exec_query(query, omen).await?.into_number(),
            Err(err) if err.is_noop() => Ok(0.0),
            Err(err) => Err(err),
        }
    }

    /// Run a normalized find, resolving populates natively when the adapter
    /// can and in memory otherwise.
    pub(super) async fn find_records(&self, query: StageTwoQuery, omen: Omen) -> Result<Vec<Record>> {
        let model = self.schema.model(&query.using)?;

        let Operation::Find(find) = compile(&self.schema, query)? else {
            bail!("find query compiled into a non-find operation");
        };

        let joins = find.joins.clone();

        let mut records = if joins.is_empty() || self.adapter.capability().join {
            self.exec_operation(model, Operation::Find(find), omen)
                .await?
                .into_records()?
        } else {
            self.find_with_polyfill(model, find, omen).await?
        };

        self.unserialize_records(model, &joins, &mut records)?;
        Ok(records)
    }
}
