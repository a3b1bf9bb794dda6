//! IR instructions
//!
//! An instruction is its own result value (LLVM style): `Instruction::id` is
//! both the instruction's identity and the `ValueId` other instructions use to
//! reference its result.

use super::value::{BlockId, IrType, SourceLocation, ValueId};
use serde::{Deserialize, Serialize};

/// One incoming edge of a phi node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhiIncoming {
    pub value: ValueId,
    pub block: BlockId,
}

/// Instruction shapes the analysis distinguishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum InstKind {
    /// Stack slot
    Alloca,

    /// Direct call (`callee: None` for indirect/unresolved targets)
    Call {
        #[serde(default)]
        callee: Option<String>,
        #[serde(default)]
        args: Vec<ValueId>,
    },

    /// `result = *address`
    Load { address: ValueId },

    /// `*address = value`
    Store { value: ValueId, address: ValueId },

    /// Type cast (bitcast / pointer cast)
    Cast { source: ValueId },

    /// Struct member / element address (`&base->field`)
    FieldAccess {
        base: ValueId,
        #[serde(default)]
        indices: Vec<u32>,
    },

    /// SSA merge
    Phi { incoming: Vec<PhiIncoming> },

    /// Return, optionally with a value
    Ret {
        #[serde(default)]
        value: Option<ValueId>,
    },

    /// Unconditional branch
    Br { target: BlockId },

    /// Conditional branch; `then_block` is taken when `condition` holds
    CondBr {
        condition: ValueId,
        then_block: BlockId,
        else_block: BlockId,
    },

    /// Anything else (arithmetic, comparisons, ...)
    Other {
        opcode: String,
        #[serde(default)]
        operands: Vec<ValueId>,
    },
}

impl InstKind {
    /// Value operands in positional order
    pub fn operands(&self) -> Vec<ValueId> {
        match self {
            InstKind::Alloca | InstKind::Br { .. } => vec![],
            InstKind::Call { args, .. } => args.clone(),
            InstKind::Load { address } => vec![*address],
            InstKind::Store { value, address } => vec![*value, *address],
            InstKind::Cast { source } => vec![*source],
            InstKind::FieldAccess { base, .. } => vec![*base],
            InstKind::Phi { incoming } => incoming.iter().map(|i| i.value).collect(),
            InstKind::Ret { value } => value.iter().copied().collect(),
            InstKind::CondBr { condition, .. } => vec![*condition],
            InstKind::Other { operands, .. } => operands.clone(),
        }
    }

    /// Check whether `value` is one of the operands
    pub fn uses(&self, value: ValueId) -> bool {
        self.operands().contains(&value)
    }

    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            InstKind::Ret { .. } | InstKind::Br { .. } | InstKind::CondBr { .. }
        )
    }

    /// Successor blocks (terminators only)
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            InstKind::Br { target } => vec![*target],
            InstKind::CondBr {
                then_block,
                else_block,
                ..
            } => vec![*then_block, *else_block],
            _ => vec![],
        }
    }

    /// Short opcode name
    pub fn opcode(&self) -> &str {
        match self {
            InstKind::Alloca => "alloca",
            InstKind::Call { .. } => "call",
            InstKind::Load { .. } => "load",
            InstKind::Store { .. } => "store",
            InstKind::Cast { .. } => "cast",
            InstKind::FieldAccess { .. } => "field_access",
            InstKind::Phi { .. } => "phi",
            InstKind::Ret { .. } => "ret",
            InstKind::Br { .. } => "br",
            InstKind::CondBr { .. } => "cond_br",
            InstKind::Other { opcode, .. } => opcode,
        }
    }
}

/// A single IR instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Identity and result value
    pub id: ValueId,

    /// Optional source-level name (`p`, `call`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Result type (`void` when the instruction produces no value)
    #[serde(default)]
    pub ty: IrType,

    #[serde(flatten)]
    pub kind: InstKind,

    /// Debug location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl Instruction {
    pub fn new(id: ValueId, ty: IrType, kind: InstKind) -> Self {
        Self {
            id,
            name: None,
            ty,
            kind,
            location: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Callee name of a direct call
    pub fn callee(&self) -> Option<&str> {
        match &self.kind {
            InstKind::Call {
                callee: Some(name), ..
            } => Some(name.as_str()),
            _ => None,
        }
    }
}
