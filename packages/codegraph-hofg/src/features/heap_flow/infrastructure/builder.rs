//! HOFG Builder - instruction pattern handlers
//!
//! Scans function bodies block by block, recognizes allocation,
//! deallocation, copy, field-derived copy, store, merge, return and call
//! shapes, and emits vertices/edges into the graph it owns. Summaries are
//! created lazily through `get_or_create_summary`; call-site instantiation
//! lives in `call_site.rs`.
//!
//! Lookups are optional everywhere: an operand without a vertex simply
//! produces no edge.

use super::guard_index::GuardIndex;
use super::summary_table::SummaryTable;
use crate::features::heap_flow::domain::{
    BuildStats, FlowEdge, FunctionSummary, Hofg, TransformKind, Vertex,
};
use crate::features::heap_flow::ports::CallClassifier;
use crate::shared::models::{
    BasicBlock, BlockId, Function, FunctionId, InstKind, Instruction, ModuleIndex, PhiIncoming,
    ValueDef, ValueId,
};
use rustc_hash::{FxHashMap, FxHashSet};

/// Levels of load/cast/field indirection followed when tracing a pointer
const TRACE_DEPTH: usize = 2;

// ═══════════════════════════════════════════════════════════════════════════
// Scan context
// ═══════════════════════════════════════════════════════════════════════════

/// State of one function body scan
pub(super) struct ScanContext {
    pub function: FunctionId,
    pub block: BlockId,
    pub guards: GuardIndex,
    /// Stack slot → index of the formal argument spilled into it
    pub spills: FxHashMap<ValueId, usize>,
    /// Reload of a spill slot → the formal it holds
    pub reloads: FxHashMap<ValueId, ValueId>,
}

impl ScanContext {
    /// Reloaded formals stand for the formal itself
    pub fn canonical(&self, value: ValueId) -> ValueId {
        self.reloads.get(&value).copied().unwrap_or(value)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════

/// Owns the HOFG and the summary table for one analysis run
pub struct HofgBuilder<'a> {
    pub(super) index: &'a ModuleIndex<'a>,
    pub(super) classifier: &'a dyn CallClassifier,
    pub(super) graph: Hofg,
    pub(super) summaries: SummaryTable,
    pub(super) stats: BuildStats,
}

impl<'a> HofgBuilder<'a> {
    pub fn new(index: &'a ModuleIndex<'a>, classifier: &'a dyn CallClassifier) -> Self {
        Self {
            index,
            classifier,
            graph: Hofg::new(),
            summaries: SummaryTable::new(),
            stats: BuildStats::default(),
        }
    }

    pub fn graph(&self) -> &Hofg {
        &self.graph
    }

    pub fn summaries(&self) -> &SummaryTable {
        &self.summaries
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// One fixpoint round: rescan every function of the module
    pub fn build_round(&mut self) {
        self.summaries.begin_round();
        for function in self.index.function_ids() {
            self.refresh(function);
        }
    }

    /// Rescan a function unless it was already scanned this round
    pub fn refresh(&mut self, function: FunctionId) {
        if self.is_summarizable(function) {
            self.scan_function(function);
        }
    }

    /// Existing summary (possibly in progress), or a freshly generated one
    ///
    /// `None` for declarations and allocator wrappers.
    pub fn get_or_create_summary(&mut self, function: FunctionId) -> Option<FunctionSummary> {
        if !self.is_summarizable(function) {
            return None;
        }
        if !self.summaries.contains(function) {
            self.scan_function(function);
        }
        self.summaries.get(function).cloned()
    }

    pub fn into_parts(self) -> (Hofg, Vec<FunctionSummary>, BuildStats) {
        (self.graph, self.summaries.into_summaries(), self.stats)
    }

    fn is_summarizable(&self, function: FunctionId) -> bool {
        let function = self.index.function(function);
        !function.is_declaration() && !self.classifier.is_allocator_wrapper(&function.name)
    }

    fn scan_function(&mut self, id: FunctionId) {
        let function = self.index.function(id);
        let started = self.summaries.begin_scan(id, || {
            FunctionSummary::new(
                id,
                function.name.clone(),
                function.params.iter().map(|p| p.id).collect(),
                function.return_type,
            )
        });
        if !started {
            return;
        }

        tracing::debug!("Scanning '{}' (round {})", function.name, self.summaries.round());
        self.stats.functions_scanned += 1;

        let spills = self.spills(function);
        let reloads = Self::reloads(function, &spills);
        let mut ctx = ScanContext {
            function: id,
            block: BlockId(0),
            guards: GuardIndex::compute(function),
            spills,
            reloads,
        };

        for block in &function.blocks {
            ctx.block = block.id;
            for inst in &block.instructions {
                self.stats.instructions_scanned += 1;
                self.visit(&ctx, block, inst);
            }
        }

        self.summaries.finish_scan(id);
    }

    /// `store %arg, %slot` with `%slot = alloca`, when nothing else is
    /// ever stored into the slot
    fn spills(&self, function: &Function) -> FxHashMap<ValueId, usize> {
        let mut spills: FxHashMap<ValueId, usize> = FxHashMap::default();
        let mut overwritten: FxHashSet<ValueId> = FxHashSet::default();

        for (_, inst) in function.instructions() {
            let InstKind::Store { value, address } = inst.kind else {
                continue;
            };
            let is_slot = matches!(
                self.index.inst(address).map(|i| &i.kind),
                Some(InstKind::Alloca)
            );
            match function.param_index(value) {
                Some(index) if is_slot && !spills.contains_key(&address) => {
                    spills.insert(address, index);
                }
                _ => {
                    overwritten.insert(address);
                }
            }
        }

        spills.retain(|slot, _| !overwritten.contains(slot));
        spills
    }

    /// `%r = load %slot` for every spill slot
    fn reloads(
        function: &Function,
        spills: &FxHashMap<ValueId, usize>,
    ) -> FxHashMap<ValueId, ValueId> {
        function
            .instructions()
            .filter_map(|(_, inst)| match inst.kind {
                InstKind::Load { address } => {
                    let index = *spills.get(&address)?;
                    Some((inst.id, function.params.get(index)?.id))
                }
                _ => None,
            })
            .collect()
    }

    fn visit(&mut self, ctx: &ScanContext, block: &'a BasicBlock, inst: &'a Instruction) {
        match &inst.kind {
            InstKind::Call { callee: None, .. } => {
                self.stats.unresolved += 1;
                tracing::debug!("Indirect call {} skipped", inst.id);
            }
            InstKind::Call {
                callee: Some(name),
                args,
            } => {
                if self.classifier.is_allocator(name) {
                    self.handle_allocation(ctx, block, inst);
                } else if self.classifier.is_deallocator(name) {
                    self.handle_deallocation(ctx, inst, args);
                } else if let Some(callee) = self.index.function_by_name(name) {
                    if !self.index.function(callee).is_declaration() {
                        self.handle_call(ctx, inst, callee, args);
                    }
                }
            }
            // Spilling and reloading a formal moves no heap value
            InstKind::Load { address } | InstKind::Store { address, .. }
                if ctx.spills.contains_key(address) => {}
            InstKind::Load { address }
                if inst.ty.is_pointer() && !self.index.is_field_access(*address) =>
            {
                self.handle_copy(ctx, inst, *address);
            }
            InstKind::Cast { source } if self.index.is_field_access(*source) => {
                self.handle_field_copy(ctx, inst, *source);
            }
            InstKind::Store { value, address } if self.index.type_of(*value).is_pointer() => {
                self.handle_store(ctx, inst, *value, *address);
            }
            InstKind::Phi { incoming } => self.handle_merge(ctx, inst, incoming),
            InstKind::Ret { value: Some(value) } => self.handle_return(ctx, *value),
            _ => {}
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Pattern handlers
    // ═══════════════════════════════════════════════════════════════════════

    /// `%p = malloc(..)`, consumed by a cast or a store in the same block
    fn handle_allocation(&mut self, ctx: &ScanContext, block: &BasicBlock, call: &Instruction) {
        let object = self.graph.insert_vertex(Vertex::object(call.id));
        self.stats.allocations += 1;

        let consumer = block
            .instructions
            .iter()
            .skip_while(|i| i.id != call.id)
            .skip(1)
            .find(|i| i.kind.uses(call.id));

        match consumer.map(|c| (c, &c.kind)) {
            Some((cast, InstKind::Cast { source })) if *source == call.id && cast.ty.is_pointer() => {
                self.emit(
                    ctx,
                    FlowEdge::new(object, Vertex::pointer(cast.id)).with_location(call.location.clone()),
                );
            }
            Some((_, InstKind::Store { value, address })) if *value == call.id => {
                self.emit(
                    ctx,
                    FlowEdge::new(object, Vertex::pointer(ctx.canonical(*address)))
                        .with_location(call.location.clone()),
                );
                // Output parameter: `*out = malloc(..)`
                if let Some(index) = self.trace_formal(ctx, *address) {
                    self.record_transform(ctx, index, TransformKind::Allocator);
                }
            }
            _ => {}
        }
    }

    /// `free(p)`: the freed pointer flows into the sink
    fn handle_deallocation(&mut self, ctx: &ScanContext, call: &Instruction, args: &[ValueId]) {
        let sink = self.graph.insert_vertex(Vertex::sink(call.id));
        self.stats.deallocations += 1;

        let Some(pointer) = args
            .first()
            .and_then(|&arg| self.resolve_freed_pointer(arg))
            .map(|p| ctx.canonical(p))
        else {
            self.stats.unresolved += 1;
            tracing::debug!("Deallocation {} has no resolvable pointer", call.id);
            return;
        };

        self.emit(
            ctx,
            FlowEdge::new(Vertex::pointer(pointer), sink).with_location(call.location.clone()),
        );

        if let Some(index) = self.trace_formal(ctx, pointer) {
            self.record_transform(ctx, index, TransformKind::Deallocator);
        }
        if self.trace_global(pointer).is_some() {
            if let Some(summary) = self.summaries.get_mut(ctx.function) {
                summary.global_deallocations.insert(call.id);
            }
        }
    }

    /// `%q = load %p` with `%p` not a field access
    fn handle_copy(&mut self, ctx: &ScanContext, load: &Instruction, address: ValueId) {
        if let Some(index) = self.trace_formal(ctx, address) {
            self.record_transform(ctx, index, TransformKind::Deallocator);
        }

        let address = ctx.canonical(address);
        if self.graph.contains_vertex(address) {
            self.emit(
                ctx,
                FlowEdge::new(Vertex::pointer(address), Vertex::pointer(load.id))
                    .with_location(load.location.clone()),
            );
            self.stats.copies += 1;
        }
    }

    /// `%c = cast (field %base, ..)`: alias the struct pointer
    fn handle_field_copy(&mut self, ctx: &ScanContext, cast: &Instruction, field: ValueId) {
        let Some(InstKind::FieldAccess { base, .. }) = self.index.inst(field).map(|i| &i.kind) else {
            return;
        };

        if let Some(index) = self.trace_formal(ctx, *base) {
            self.record_transform(ctx, index, TransformKind::Deallocator);
        }

        let base = ctx.canonical(*base);
        if self.graph.contains_vertex(base) {
            self.emit(
                ctx,
                FlowEdge::new(Vertex::pointer(base), Vertex::pointer(cast.id))
                    .with_location(cast.location.clone()),
            );
            self.stats.field_copies += 1;
        }
    }

    /// `store %v, %dst` with `%v` pointer-typed
    fn handle_store(&mut self, ctx: &ScanContext, store: &Instruction, value: ValueId, address: ValueId) {
        if matches!(self.index.def(value), Some(ValueDef::Constant(_))) {
            return;
        }
        let (value, address) = (ctx.canonical(value), ctx.canonical(address));

        self.emit(
            ctx,
            FlowEdge::new(Vertex::pointer(value), Vertex::pointer(address))
                .with_location(store.location.clone()),
        );
        self.stats.stores += 1;

        if !self.graph.carries_object(value) {
            return;
        }

        if self.index.is_global(address) {
            if let Some(summary) = self.summaries.get_mut(ctx.function) {
                summary.global_allocations.insert(store.id);
            }
        }
        if let Some(index) = self.trace_formal(ctx, address) {
            self.record_transform(ctx, index, TransformKind::Allocator);
        }
    }

    /// `%m = phi [..]`, skipping incoming values the merge already flows into
    fn handle_merge(&mut self, ctx: &ScanContext, phi: &Instruction, incoming: &[PhiIncoming]) {
        let mut merged = false;
        for value in incoming.iter().map(|i| ctx.canonical(i.value)) {
            if !self.graph.contains_vertex(value) || self.graph.has_edge(phi.id, value) {
                continue;
            }
            merged |= self.emit(
                ctx,
                FlowEdge::new(Vertex::pointer(value), Vertex::pointer(phi.id))
                    .with_location(phi.location.clone()),
            );
        }
        if merged {
            self.stats.merges += 1;
        }
    }

    fn handle_return(&mut self, ctx: &ScanContext, value: ValueId) {
        let value = ctx.canonical(value);
        if !self.graph.contains_vertex(value) {
            return;
        }

        let taint = self.graph.carries_object(value);
        if let Some(summary) = self.summaries.get_mut(ctx.function) {
            summary.return_values.insert(value);
            summary.return_taint |= taint;
            self.stats.returns += 1;
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Helpers
    // ═══════════════════════════════════════════════════════════════════════

    /// Stamp guards and insert
    ///
    /// Edges between two globals get only the block's own entry conditions.
    pub(super) fn emit(&mut self, ctx: &ScanContext, edge: FlowEdge) -> bool {
        let guards = if self.index.is_global(edge.tail.value) && self.index.is_global(edge.head.value) {
            ctx.guards.entry_conditions(ctx.block)
        } else {
            ctx.guards.conditions(ctx.block)
        };
        self.graph.add_edge(edge.with_guards(guards))
    }

    fn record_transform(&mut self, ctx: &ScanContext, index: usize, kind: TransformKind) {
        if let Some(summary) = self.summaries.get_mut(ctx.function) {
            summary.record_transform(index, kind);
        }
    }

    /// Pointer actually freed by `free(arg)`
    ///
    /// Recognized shapes: `cast p`, `cast (load (field base))`,
    /// `cast (field (load p))`, or the argument itself.
    pub(super) fn resolve_freed_pointer(&self, arg: ValueId) -> Option<ValueId> {
        let kind_of = |v: ValueId| self.index.inst(v).map(|i| &i.kind);

        let pointer = match kind_of(arg) {
            Some(InstKind::Cast { source }) => match kind_of(*source) {
                Some(InstKind::Load { address }) => match kind_of(*address) {
                    Some(InstKind::FieldAccess { base, .. }) => *base,
                    _ => *source,
                },
                Some(InstKind::FieldAccess { base, .. }) => match kind_of(*base) {
                    Some(InstKind::Load { .. }) => *base,
                    _ => *source,
                },
                _ => *source,
            },
            _ => arg,
        };

        match self.index.def(pointer) {
            None | Some(ValueDef::Constant(_)) => None,
            Some(_) => Some(pointer),
        }
    }

    /// Index of the current function's formal argument `value` derives from
    fn trace_formal(&self, ctx: &ScanContext, value: ValueId) -> Option<usize> {
        let mut current = value;
        for _ in 0..=TRACE_DEPTH {
            if let Some((function, index)) = self.index.argument(current) {
                return (function == ctx.function).then_some(index);
            }
            current = match self.index.inst(current).map(|i| &i.kind)? {
                InstKind::Load { address } => {
                    if let Some(&index) = ctx.spills.get(address) {
                        return Some(index);
                    }
                    *address
                }
                InstKind::Cast { source } => *source,
                InstKind::FieldAccess { base, .. } => *base,
                _ => return None,
            };
        }
        None
    }

    /// Global `value` derives from
    pub(super) fn trace_global(&self, value: ValueId) -> Option<ValueId> {
        let mut current = value;
        for _ in 0..=TRACE_DEPTH {
            if self.index.is_global(current) {
                return Some(current);
            }
            current = match self.index.inst(current).map(|i| &i.kind)? {
                InstKind::Load { address } => *address,
                InstKind::Cast { source } => *source,
                InstKind::FieldAccess { base, .. } => *base,
                _ => return None,
            };
        }
        None
    }
}
