//! Module-wide value lookup
//!
//! `ModuleIndex` resolves a `ValueId` to its definition (global, constant,
//! parameter or instruction) in O(1) and validates that the module can be
//! traversed at all.

use super::instruction::{InstKind, Instruction};
use super::module::{Constant, Function, Global, IrModule, Param};
use super::value::{BlockId, FunctionId, IrType, SourceLocation, ValueId};
use crate::errors::{HofgError, Result};
use rustc_hash::{FxHashMap, FxHashSet};

/// Where a value is defined
#[derive(Debug, Clone, Copy)]
pub enum ValueDef<'m> {
    Global(&'m Global),
    Constant(&'m Constant),
    Argument {
        function: FunctionId,
        index: usize,
        param: &'m Param,
    },
    Instruction {
        function: FunctionId,
        block: BlockId,
        inst: &'m Instruction,
    },
}

/// Read-only index over one `IrModule`
pub struct ModuleIndex<'m> {
    module: &'m IrModule,
    defs: FxHashMap<ValueId, ValueDef<'m>>,
    functions_by_name: FxHashMap<&'m str, FunctionId>,
}

impl<'m> ModuleIndex<'m> {
    /// Build the index, rejecting modules that cannot be traversed
    pub fn new(module: &'m IrModule) -> Result<Self> {
        let mut defs: FxHashMap<ValueId, ValueDef<'m>> = FxHashMap::default();
        let mut functions_by_name = FxHashMap::default();

        let mut define = |id: ValueId, def: ValueDef<'m>| -> Result<()> {
            if defs.insert(id, def).is_some() {
                return Err(HofgError::malformed(format!("value {} defined twice", id)));
            }
            Ok(())
        };

        for global in &module.globals {
            define(global.id, ValueDef::Global(global))?;
        }
        for constant in &module.constants {
            define(constant.id, ValueDef::Constant(constant))?;
        }

        for (idx, function) in module.functions.iter().enumerate() {
            let fid = FunctionId(idx as u32);
            if functions_by_name.insert(function.name.as_str(), fid).is_some() {
                return Err(HofgError::malformed(format!(
                    "function '{}' defined twice",
                    function.name
                )));
            }

            for (index, param) in function.params.iter().enumerate() {
                define(
                    param.id,
                    ValueDef::Argument {
                        function: fid,
                        index,
                        param,
                    },
                )?;
            }

            let block_ids: FxHashSet<BlockId> = function.blocks.iter().map(|b| b.id).collect();
            if block_ids.len() != function.blocks.len() {
                return Err(HofgError::malformed(format!(
                    "duplicate block id in '{}'",
                    function.name
                )));
            }

            for block in &function.blocks {
                for inst in &block.instructions {
                    define(
                        inst.id,
                        ValueDef::Instruction {
                            function: fid,
                            block: block.id,
                            inst,
                        },
                    )?;
                    Self::check_block_refs(function, inst, &block_ids)?;
                }
            }
        }

        Ok(Self {
            module,
            defs,
            functions_by_name,
        })
    }

    fn check_block_refs(
        function: &Function,
        inst: &Instruction,
        block_ids: &FxHashSet<BlockId>,
    ) -> Result<()> {
        let mut targets = inst.kind.successors();
        if let InstKind::Phi { incoming } = &inst.kind {
            targets.extend(incoming.iter().map(|i| i.block));
        }
        match targets.into_iter().find(|b| !block_ids.contains(b)) {
            Some(missing) => Err(HofgError::malformed(format!(
                "instruction {} in '{}' references unknown block {}",
                inst.id, function.name, missing
            ))),
            None => Ok(()),
        }
    }

    pub fn module(&self) -> &'m IrModule {
        self.module
    }

    pub fn def(&self, value: ValueId) -> Option<ValueDef<'m>> {
        self.defs.get(&value).copied()
    }

    /// Defining instruction of a value, if it is an instruction result
    pub fn inst(&self, value: ValueId) -> Option<&'m Instruction> {
        match self.def(value)? {
            ValueDef::Instruction { inst, .. } => Some(inst),
            _ => None,
        }
    }

    pub fn type_of(&self, value: ValueId) -> IrType {
        match self.def(value) {
            Some(ValueDef::Global(g)) => g.ty,
            Some(ValueDef::Constant(c)) => c.ty,
            Some(ValueDef::Argument { param, .. }) => param.ty,
            Some(ValueDef::Instruction { inst, .. }) => inst.ty,
            None => IrType::Void,
        }
    }

    pub fn is_global(&self, value: ValueId) -> bool {
        matches!(self.def(value), Some(ValueDef::Global(_)))
    }

    /// `(function, index)` when the value is a formal parameter
    pub fn argument(&self, value: ValueId) -> Option<(FunctionId, usize)> {
        match self.def(value)? {
            ValueDef::Argument {
                function, index, ..
            } => Some((function, index)),
            _ => None,
        }
    }

    pub fn is_field_access(&self, value: ValueId) -> bool {
        matches!(
            self.inst(value).map(|i| &i.kind),
            Some(InstKind::FieldAccess { .. })
        )
    }

    pub fn location_of(&self, value: ValueId) -> Option<&'m SourceLocation> {
        self.inst(value)?.location.as_ref()
    }

    pub fn function(&self, id: FunctionId) -> &'m Function {
        &self.module.functions[id.index()]
    }

    pub fn function_by_name(&self, name: &str) -> Option<FunctionId> {
        self.functions_by_name.get(name).copied()
    }

    pub fn function_ids(&self) -> impl Iterator<Item = FunctionId> {
        (0..self.module.functions.len() as u32).map(FunctionId)
    }

    /// Human-readable name: `@global`, `%name`, or `%id`
    pub fn display_name(&self, value: ValueId) -> String {
        match self.def(value) {
            Some(ValueDef::Global(g)) => format!("@{}", g.name),
            Some(ValueDef::Constant(c)) => c.text.clone().unwrap_or_else(|| value.to_string()),
            Some(ValueDef::Argument { param, .. }) => match &param.name {
                Some(name) => format!("%{}", name),
                None => value.to_string(),
            },
            Some(ValueDef::Instruction { inst, .. }) => match &inst.name {
                Some(name) => format!("%{}", name),
                None => value.to_string(),
            },
            None => value.to_string(),
        }
    }
}
