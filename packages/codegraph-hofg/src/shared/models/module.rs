//! IR module, functions and basic blocks

use super::instruction::{InstKind, Instruction};
use super::value::{BlockId, IrType, ValueId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Module-scoped variable (its value is the address of the global)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Global {
    pub id: ValueId,
    pub name: String,
    #[serde(default = "pointer_type")]
    pub ty: IrType,
}

/// Constant operand (null pointer, integer literal, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constant {
    pub id: ValueId,
    #[serde(default)]
    pub ty: IrType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Formal parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub id: ValueId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "pointer_type")]
    pub ty: IrType,
}

fn pointer_type() -> IrType {
    IrType::Pointer
}

/// Basic block: ordered instructions ending in a terminator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

impl BasicBlock {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            name: None,
            instructions: Vec::new(),
        }
    }

    /// Last instruction if it is a terminator
    pub fn terminator(&self) -> Option<&Instruction> {
        self.instructions.last().filter(|i| i.kind.is_terminator())
    }

    pub fn successors(&self) -> Vec<BlockId> {
        self.terminator()
            .map(|t| t.kind.successors())
            .unwrap_or_default()
    }
}

/// Function: a declaration when it has no blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub return_type: IrType,
    #[serde(default)]
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn entry(&self) -> Option<&BasicBlock> {
        self.blocks.first()
    }

    /// Immediate predecessors of every block, derived from terminators
    ///
    /// Each block appears as a key, the entry block with an empty list.
    pub fn predecessors(&self) -> FxHashMap<BlockId, Vec<BlockId>> {
        let mut preds: FxHashMap<BlockId, Vec<BlockId>> =
            self.blocks.iter().map(|b| (b.id, Vec::new())).collect();

        for block in &self.blocks {
            for succ in block.successors() {
                let entry = preds.entry(succ).or_default();
                if !entry.contains(&block.id) {
                    entry.push(block.id);
                }
            }
        }

        preds
    }

    /// Position of a formal parameter
    pub fn param_index(&self, value: ValueId) -> Option<usize> {
        self.params.iter().position(|p| p.id == value)
    }

    /// All instructions in block order
    pub fn instructions(&self) -> impl Iterator<Item = (BlockId, &Instruction)> {
        self.blocks
            .iter()
            .flat_map(|b| b.instructions.iter().map(move |i| (b.id, i)))
    }

    /// Returned operands
    pub fn returned_values(&self) -> Vec<ValueId> {
        self.instructions()
            .filter_map(|(_, i)| match i.kind {
                InstKind::Ret { value } => value,
                _ => None,
            })
            .collect()
    }
}

/// One translation unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrModule {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default)]
    pub globals: Vec<Global>,
    #[serde(default)]
    pub constants: Vec<Constant>,
    #[serde(default)]
    pub functions: Vec<Function>,
}

impl IrModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_file: None,
            globals: Vec::new(),
            constants: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}
