//! IR Loading - the IR-provider port and its JSON adapter
//!
//! The analysis never parses source code; a host tool lowers a translation
//! unit to an `IrModule` and hands it over, either in memory
//! (`ModuleBuilder`) or serialized as JSON.

pub mod json;

pub use json::JsonIrProvider;

use crate::errors::Result;
use crate::shared::models::IrModule;

/// IR Provider Port
pub trait IrProvider {
    /// Load one translation unit
    fn load(&self) -> Result<IrModule>;

    /// Where the module comes from, for logging
    fn describe(&self) -> String;
}
