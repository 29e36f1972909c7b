//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod cache;
pub mod config;
pub mod id_types;
pub mod table;
pub mod translate;

use crate::error::Result;
use idmap_mapping::{Mapper, MapperConfig};

/// A mapper for one short-lived invocation; no background sweep
pub(crate) fn mapper(config: MapperConfig) -> Result<Mapper> {
    Ok(Mapper::builder().config(config).background_cleanup(false).build()?)
}
