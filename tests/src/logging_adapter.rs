use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tideline_core::{
    adapter::{AdapterError, Capability, Operation, Response, Rows},
    Adapter,
};

/// Operations recorded by a `LoggingAdapter`, shared with the test.
pub type OpsLog = Arc<Mutex<VecDeque<AdapterOp>>>;

/// Records every operation the engine sends, then forwards it unchanged.
#[derive(Debug)]
pub struct LoggingAdapter {
    inner: Box<dyn Adapter>,
    ops_log: OpsLog,
}

/// One call into the wrapped adapter.
#[derive(Debug)]
pub struct AdapterOp {
    pub datastore: String,
    pub operation: Operation,

    /// What the inner adapter answered. `None` when it failed.
    pub rows: Option<Rows>,
}

impl LoggingAdapter {
    pub fn new(adapter: Box<dyn Adapter>) -> Self {
        Self {
            inner: adapter,
            ops_log: OpsLog::default(),
        }
    }

    pub fn ops_log_handle(&self) -> OpsLog {
        self.ops_log.clone()
    }
}

#[async_trait]
impl Adapter for LoggingAdapter {
    fn identity(&self) -> &str {
        self.inner.identity()
    }

    fn capability(&self) -> &Capability {
        self.inner.capability()
    }

    async fn exec(&self, datastore: &str, operation: Operation) -> Result<Response, AdapterError> {
        let logged = operation.clone();
        let result = self.inner.exec(datastore, operation).await;

        // Logged after the call so failed operations still show up
        self.ops_log.lock().unwrap().push_back(AdapterOp {
            datastore: datastore.to_string(),
            operation: logged,
            rows: result.as_ref().ok().map(|response| copy_rows(&response.rows)),
        });

        result
    }
}

fn copy_rows(rows: &Rows) -> Rows {
    match rows {
        Rows::Records(records) => Rows::Records(records.clone()),
        Rows::Count(count) => Rows::Count(*count),
        Rows::Number(number) => Rows::Number(*number),
        Rows::Empty => Rows::Empty,
    }
}
