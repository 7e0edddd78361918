mod builder;
pub use builder::Builder;

use crate::engine::{self, Engine};

use tideline_core::adapter::Operation;
use tideline_core::query::{Method, Request, StageTwoQuery};
use tideline_core::{Omen, Record, Result, Schema};

use std::future::Future;
use std::sync::Arc;

/// Handle to a set of models backed by one adapter.
///
/// Every operation is a plain method returning a future. The call site is
/// captured when the method is called, not when the future is polled, so
/// adapter errors point at the caller.
#[derive(Debug, Clone)]
pub struct Db {
    engine: Arc<Engine>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.engine.schema
    }

    /// Validate and canonicalize a request without running it.
    pub fn normalize(&self, method: Method, request: Request) -> Result<StageTwoQuery> {
        engine::normalize(&self.engine.schema, method, request)
    }

    /// Compile a normalized query into the operation the adapter would
    /// receive. The query is consumed.
    pub fn compile(&self, query: StageTwoQuery) -> Result<Operation> {
        engine::compile(&self.engine.schema, query)
    }

    /// Find all matching records.
    #[track_caller]
    pub fn find(&self, request: Request) -> impl Future<Output = Result<Vec<Record>>> + '_ {
        let omen = Omen::capture();
        async move { self.engine.find(request, omen).await }
    }

    /// Find at most one record. More than one match is an error.
    #[track_caller]
    pub fn find_one(&self, request: Request) -> impl Future<Output = Result<Option<Record>>> + '_ {
        let omen = Omen::capture();
        async move { self.engine.find_one(request, omen).await }
    }

    /// Visit every matching record, fetching them in batches.
    #[track_caller]
    pub fn stream<'a, F>(
        &'a self,
        request: Request,
        each: F,
    ) -> impl Future<Output = Result<()>> + 'a
    where
        F: FnMut(Record) -> Result<()> + Send + 'a,
    {
        let omen = Omen::capture();
        async move { self.engine.stream(request, each, omen).await }
    }

    #[track_caller]
    pub fn count(&self, request: Request) -> impl Future<Output = Result<u64>> + '_ {
        let omen = Omen::capture();
        async move { self.engine.count(request, omen).await }
    }

    /// Sum `numeric_attr_name` over matching records.
    #[track_caller]
    pub fn sum(&self, request: Request) -> impl Future<Output = Result<f64>> + '_ {
        let omen = Omen::capture();
        async move { self.engine.aggregate(Method::Sum, request, omen).await }
    }

    /// Average `numeric_attr_name` over matching records.
    #[track_caller]
    pub fn avg(&self, request: Request) -> impl Future<Output = Result<f64>> + '_ {
        let omen = Omen::capture();
        async move { self.engine.aggregate(Method::Avg, request, omen).await }
    }

    /// Insert one record. The created record is returned when `meta.fetch`
    /// is set.
    #[track_caller]
    pub fn create(&self, request: Request) -> impl Future<Output = Result<Option<Record>>> + '_ {
        let omen = Omen::capture();
        async move {
            let mut records = self.engine.create(Method::Create, request, omen).await?;
            Ok(records.pop())
        }
    }

    /// Insert a batch of records. The created records are returned when
    /// `meta.fetch` is set.
    #[track_caller]
    pub fn create_each(&self, request: Request) -> impl Future<Output = Result<Vec<Record>>> + '_ {
        let omen = Omen::capture();
        async move { self.engine.create(Method::CreateEach, request, omen).await }
    }

    #[track_caller]
    pub fn update(&self, request: Request) -> impl Future<Output = Result<Vec<Record>>> + '_ {
        let omen = Omen::capture();
        async move { self.engine.update(request, omen).await }
    }

    #[track_caller]
    pub fn destroy(&self, request: Request) -> impl Future<Output = Result<Vec<Record>>> + '_ {
        let omen = Omen::capture();
        async move { self.engine.destroy(request, omen).await }
    }

    #[track_caller]
    pub fn add_to_collection(&self, request: Request) -> impl Future<Output = Result<()>> + '_ {
        let omen = Omen::capture();
        async move {
            self.engine
                .collection(Method::AddToCollection, request, omen)
                .await
        }
    }

    #[track_caller]
    pub fn remove_from_collection(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<()>> + '_ {
        let omen = Omen::capture();
        async move {
            self.engine
                .collection(Method::RemoveFromCollection, request, omen)
                .await
        }
    }

    #[track_caller]
    pub fn replace_collection(&self, request: Request) -> impl Future<Output = Result<()>> + '_ {
        let omen = Omen::capture();
        async move {
            self.engine
                .collection(Method::ReplaceCollection, request, omen)
                .await
        }
    }
}
