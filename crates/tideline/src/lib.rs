pub mod db;
pub use db::Db;

mod engine;

pub use tideline_core::{
    adapter::{self, Adapter},
    query::{self, Request},
    schema::{self, AttributeDef, ModelDef},
    Error, ErrorCode, Omen, Record, Result,
};
