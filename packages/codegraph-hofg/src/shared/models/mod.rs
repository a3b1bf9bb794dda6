//! IR data model
//!
//! This is the interface of the IR provider: functions, basic blocks,
//! instructions, operands, call targets and debug locations. The analysis
//! never mutates it.

pub mod builder;
pub mod index;
pub mod instruction;
pub mod module;
pub mod value;

pub use builder::{FunctionBuilder, ModuleBuilder};
pub use index::{ModuleIndex, ValueDef};
pub use instruction::{InstKind, Instruction, PhiIncoming};
pub use module::{BasicBlock, Constant, Function, Global, IrModule, Param};
pub use value::{BlockId, FunctionId, IrType, SourceLocation, ValueId};
