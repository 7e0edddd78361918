use crate::{
    exec_log::ExecLog,
    logging_adapter::{LoggingAdapter, OpsLog},
    memory_adapter::MemoryAdapter,
};
use tideline::{db, Db};
use tideline_core::{adapter::Capability, schema::Type};

/// A database backed by a fresh [`MemoryAdapter`], with every adapter
/// operation logged.
pub struct DbTest {
    adapter: MemoryAdapter,
    ops_log: OpsLog,
}

impl DbTest {
    /// An adapter supporting every method, including native joins.
    pub fn new() -> Self {
        Self::with_capability(Capability::FULL)
    }

    pub fn with_capability(capability: Capability) -> Self {
        Self {
            adapter: MemoryAdapter::with_capability(capability),
            ops_log: OpsLog::default(),
        }
    }

    /// Build `builder` over a logged memory adapter.
    pub fn try_setup_db(&mut self, builder: &mut db::Builder) -> tideline::Result<Db> {
        let logging_adapter = LoggingAdapter::new(Box::new(self.adapter.clone()));
        self.ops_log = logging_adapter.ops_log_handle();

        let db = builder.build(logging_adapter)?;

        // Numeric primary keys are assigned by the adapter
        for model in db.schema().models() {
            let pk = model.primary_key_attribute()?;

            if pk.primitive_ty() == Some(Type::Number) {
                self.adapter.auto_increment(&model.table_name, pk.column()?);
            }
        }

        Ok(db)
    }

    pub fn setup_db(&mut self, builder: &mut db::Builder) -> Db {
        self.try_setup_db(builder).unwrap()
    }

    /// The adapter behind the database, for seeding and inspecting tables
    pub fn adapter(&self) -> &MemoryAdapter {
        &self.adapter
    }

    /// Operations sent since the database was built.
    pub fn log(&self) -> ExecLog {
        ExecLog::new(self.ops_log.clone())
    }
}

impl Default for DbTest {
    fn default() -> Self {
        Self::new()
    }
}
