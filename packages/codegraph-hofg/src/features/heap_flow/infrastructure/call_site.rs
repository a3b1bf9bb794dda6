//! Call-site handling: parameter binding and summary instantiation
//!
//! A call to a defined function binds every actual argument that already has
//! a vertex to the callee's formal, then projects the callee summary into the
//! caller. Instantiated edges carry the call instruction as discriminant, so
//! the same callee flow instantiated at two call sites stays two edges.

use super::builder::{HofgBuilder, ScanContext};
use crate::features::heap_flow::domain::{FlowEdge, FunctionSummary, TransformKind, Vertex};
use crate::shared::models::{FunctionId, InstKind, Instruction, ValueDef, ValueId};

impl<'a> HofgBuilder<'a> {
    pub(super) fn handle_call(
        &mut self,
        ctx: &ScanContext,
        call: &Instruction,
        callee: FunctionId,
        args: &[ValueId],
    ) {
        self.stats.calls += 1;
        let function = self.index.function(callee);
        let args: Vec<ValueId> = args.iter().map(|&a| ctx.canonical(a)).collect();

        for (position, &actual) in args.iter().enumerate() {
            let Some(formal) = function.params.get(position) else {
                // Variadic or mismatched signature
                self.stats.unresolved += 1;
                tracing::debug!(
                    "Call {}: argument {} has no formal in '{}'",
                    call.id,
                    position,
                    function.name
                );
                continue;
            };

            if self.graph.contains_vertex(actual) {
                self.emit(
                    ctx,
                    FlowEdge::new(Vertex::pointer(actual), Vertex::pointer(formal.id))
                        .with_location(call.location.clone()),
                );
            }
        }

        if let Some(summary) = self.get_or_create_summary(callee) {
            self.instantiate(ctx, call, &args, &summary);
        }
    }

    /// Project a callee summary onto this call site
    fn instantiate(
        &mut self,
        ctx: &ScanContext,
        call: &Instruction,
        args: &[ValueId],
        summary: &FunctionSummary,
    ) {
        self.stats.summaries_instantiated += 1;

        for transform in &summary.argument_transforms {
            let actual = args
                .get(transform.index)
                .copied()
                .filter(|&a| !self.is_constant(a));
            let formal = summary.formal_arguments.get(transform.index).copied();
            let (Some(actual), Some(formal)) = (actual, formal) else {
                self.stats.unresolved += 1;
                continue;
            };

            let (tail, head) = match transform.kind {
                // Output parameter: the callee's object flows out into the actual
                TransformKind::Allocator => (formal, actual),
                // The actual's referent is consumed inside the callee
                TransformKind::Deallocator => (actual, formal),
            };
            self.emit_at(ctx, call.id, Vertex::pointer(tail), Vertex::pointer(head));
        }

        for &store in &summary.global_allocations {
            self.replay_global_allocation(ctx, call.id, store);
        }

        for &free in &summary.global_deallocations {
            self.replay_global_deallocation(ctx, call.id, free);
        }

        if summary.returns_heap() {
            for &returned in &summary.return_values {
                self.emit_at(ctx, call.id, Vertex::pointer(returned), Vertex::pointer(call.id));
            }
        }
    }

    /// `Object → value → global`, as recorded for `store value, @global`
    fn replay_global_allocation(&mut self, ctx: &ScanContext, call: ValueId, store: ValueId) {
        let Some(InstKind::Store { value, address }) = self.index.inst(store).map(|i| &i.kind) else {
            return;
        };

        for object in self.graph.objects_feeding(*value) {
            self.emit_at(ctx, call, object, Vertex::pointer(*value));
        }
        self.emit_at(ctx, call, Vertex::pointer(*value), Vertex::pointer(*address));
    }

    /// `global → pointer → sink`, as recorded for `free(load @global)`
    fn replay_global_deallocation(&mut self, ctx: &ScanContext, call: ValueId, free: ValueId) {
        let pointer = self
            .index
            .inst(free)
            .and_then(|i| match &i.kind {
                InstKind::Call { args, .. } => args.first().copied(),
                _ => None,
            })
            .and_then(|arg| self.resolve_freed_pointer(arg));
        let Some(pointer) = pointer else {
            return;
        };
        let Some(global) = self.trace_global(pointer) else {
            return;
        };

        if global != pointer {
            self.emit_at(ctx, call, Vertex::pointer(global), Vertex::pointer(pointer));
        }
        self.emit_at(ctx, call, Vertex::pointer(pointer), Vertex::sink(free));
    }

    fn emit_at(&mut self, ctx: &ScanContext, call: ValueId, tail: Vertex, head: Vertex) -> bool {
        self.emit(ctx, FlowEdge::new(tail, head).at_call_site(call))
    }

    fn is_constant(&self, value: ValueId) -> bool {
        matches!(self.index.def(value), Some(ValueDef::Constant(_)))
    }
}
