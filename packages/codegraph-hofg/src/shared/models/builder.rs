//! Programmatic IR construction
//!
//! Hosts that already have an IR in memory (and tests) build an `IrModule`
//! without going through JSON. Value ids are allocated module-wide, and every
//! instruction gets a source location on consecutive lines of the module's
//! source file unless `at_line` says otherwise.
//!
//! ```rust,ignore
//! let mut mb = ModuleBuilder::new("leak.c");
//! let mut f = mb.function("main", 0);
//! let p = f.call("malloc", &[]);
//! let q = f.cast(p);
//! f.ret(None);
//! f.finish();
//! let module = mb.build();
//! ```

use super::instruction::{InstKind, Instruction, PhiIncoming};
use super::module::{BasicBlock, Constant, Function, Global, IrModule, Param};
use super::value::{BlockId, FunctionId, IrType, SourceLocation, ValueId};

/// Builds an `IrModule`
pub struct ModuleBuilder {
    module: IrModule,
    next_value: u32,
    next_line: u32,
}

impl ModuleBuilder {
    /// `file` is used as module name and source file of every location
    pub fn new(file: impl Into<String>) -> Self {
        let file = file.into();
        let mut module = IrModule::new(file.clone());
        module.source_file = Some(file);
        Self {
            module,
            next_value: 1,
            next_line: 1,
        }
    }

    fn fresh(&mut self) -> ValueId {
        let id = ValueId(self.next_value);
        self.next_value += 1;
        id
    }

    fn file(&self) -> String {
        self.module
            .source_file
            .clone()
            .unwrap_or_else(|| self.module.name.clone())
    }

    /// Declare a pointer-typed global
    pub fn global(&mut self, name: impl Into<String>) -> ValueId {
        let id = self.fresh();
        self.module.globals.push(Global {
            id,
            name: name.into(),
            ty: IrType::Pointer,
        });
        id
    }

    /// Declare a constant operand
    pub fn constant(&mut self, ty: IrType, text: impl Into<String>) -> ValueId {
        let id = self.fresh();
        self.module.constants.push(Constant {
            id,
            ty,
            text: Some(text.into()),
        });
        id
    }

    /// Declare an external function (no body)
    pub fn declare(&mut self, name: impl Into<String>, params: usize) -> FunctionId {
        let params = (0..params)
            .map(|_| Param {
                id: self.fresh(),
                name: None,
                ty: IrType::Pointer,
            })
            .collect();
        self.module.functions.push(Function {
            name: name.into(),
            params,
            return_type: IrType::Pointer,
            blocks: vec![],
        });
        FunctionId(self.module.functions.len() as u32 - 1)
    }

    /// Start a function with `params` pointer-typed parameters
    pub fn function(&mut self, name: impl Into<String>, params: usize) -> FunctionBuilder<'_> {
        let params = (0..params)
            .map(|i| Param {
                id: self.fresh(),
                name: Some(format!("arg{}", i)),
                ty: IrType::Pointer,
            })
            .collect();
        let function = Function {
            name: name.into(),
            params,
            return_type: IrType::Void,
            blocks: vec![BasicBlock::new(BlockId(0))],
        };
        FunctionBuilder {
            module: self,
            function,
            current: BlockId(0),
        }
    }

    pub fn build(self) -> IrModule {
        self.module
    }
}

/// Builds one function body, appending to the current block
pub struct FunctionBuilder<'a> {
    module: &'a mut ModuleBuilder,
    function: Function,
    current: BlockId,
}

impl<'a> FunctionBuilder<'a> {
    pub fn param(&self, index: usize) -> ValueId {
        self.function.params[index].id
    }

    pub fn returns(&mut self, ty: IrType) -> &mut Self {
        self.function.return_type = ty;
        self
    }

    /// Create a new (empty) block; does not switch to it
    pub fn block(&mut self) -> BlockId {
        let id = BlockId(self.function.blocks.len() as u32);
        self.function.blocks.push(BasicBlock::new(id));
        id
    }

    pub fn switch_to(&mut self, block: BlockId) -> &mut Self {
        self.current = block;
        self
    }

    /// Line number of the next instruction
    pub fn at_line(&mut self, line: u32) -> &mut Self {
        self.module.next_line = line;
        self
    }

    fn push(&mut self, ty: IrType, kind: InstKind) -> ValueId {
        let id = self.module.fresh();
        let location = SourceLocation::new(self.module.file(), self.module.next_line);
        self.module.next_line += 1;

        // Block ids are positions in `blocks`
        self.function.blocks[self.current.0 as usize]
            .instructions
            .push(Instruction::new(id, ty, kind).with_location(location));
        id
    }

    pub fn alloca(&mut self) -> ValueId {
        self.push(IrType::Pointer, InstKind::Alloca)
    }

    /// Pointer-returning direct call
    pub fn call(&mut self, callee: &str, args: &[ValueId]) -> ValueId {
        self.push(
            IrType::Pointer,
            InstKind::Call {
                callee: Some(callee.to_string()),
                args: args.to_vec(),
            },
        )
    }

    /// Void direct call
    pub fn call_void(&mut self, callee: &str, args: &[ValueId]) -> ValueId {
        self.push(
            IrType::Void,
            InstKind::Call {
                callee: Some(callee.to_string()),
                args: args.to_vec(),
            },
        )
    }

    /// Call through a function pointer
    pub fn call_indirect(&mut self, args: &[ValueId]) -> ValueId {
        self.push(
            IrType::Pointer,
            InstKind::Call {
                callee: None,
                args: args.to_vec(),
            },
        )
    }

    /// Pointer cast
    pub fn cast(&mut self, source: ValueId) -> ValueId {
        self.push(IrType::Pointer, InstKind::Cast { source })
    }

    pub fn load(&mut self, address: ValueId, ty: IrType) -> ValueId {
        self.push(ty, InstKind::Load { address })
    }

    pub fn store(&mut self, value: ValueId, address: ValueId) -> ValueId {
        self.push(IrType::Void, InstKind::Store { value, address })
    }

    pub fn field(&mut self, base: ValueId, index: u32) -> ValueId {
        self.push(
            IrType::Pointer,
            InstKind::FieldAccess {
                base,
                indices: vec![0, index],
            },
        )
    }

    pub fn phi(&mut self, incoming: &[(ValueId, BlockId)]) -> ValueId {
        let incoming = incoming
            .iter()
            .map(|&(value, block)| PhiIncoming { value, block })
            .collect();
        self.push(IrType::Pointer, InstKind::Phi { incoming })
    }

    /// Non-pointer operation (comparison, arithmetic)
    pub fn op(&mut self, opcode: &str, operands: &[ValueId]) -> ValueId {
        self.push(
            IrType::Int,
            InstKind::Other {
                opcode: opcode.to_string(),
                operands: operands.to_vec(),
            },
        )
    }

    pub fn br(&mut self, target: BlockId) -> ValueId {
        self.push(IrType::Void, InstKind::Br { target })
    }

    pub fn cond_br(&mut self, condition: ValueId, then_block: BlockId, else_block: BlockId) -> ValueId {
        self.push(
            IrType::Void,
            InstKind::CondBr {
                condition,
                then_block,
                else_block,
            },
        )
    }

    pub fn ret(&mut self, value: Option<ValueId>) -> ValueId {
        self.push(IrType::Void, InstKind::Ret { value })
    }

    /// Append the function to the module
    pub fn finish(self) -> FunctionId {
        self.module.module.functions.push(self.function);
        FunctionId(self.module.module.functions.len() as u32 - 1)
    }
}
