use crate::{
    player::Seat,
    resolver::{ResolutionCtx, ResolutionResult, Resolver},
};

/// One executed step, kept for replay debugging and assertions.
#[derive(Debug, Clone)]
pub struct ExecutedStep {
    pub kind: &'static str,
    pub source: Seat,
    pub result: ResolutionResult,
}

/// LIFO stack of pending effect steps. The engine's outer loop pops until
/// empty; a failure is recorded, never fatal to the stack.
#[derive(Debug, Default)]
pub struct ResolutionStack {
    entries: Vec<(Resolver, ResolutionCtx)>,
    history: Vec<ExecutedStep>,
}

impl ResolutionStack {
    pub fn push(&mut self, resolver: Resolver, ctx: ResolutionCtx) {
        debug!(kind = resolver.kind(), source = %ctx.source, "push");
        self.entries.push((resolver, ctx));
    }

    pub(crate) fn pop_entry(&mut self) -> Option<(Resolver, ResolutionCtx)> {
        self.entries.pop()
    }

    pub(crate) fn record(&mut self, step: ExecutedStep) {
        self.history.push(step);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Read-only execution trace, oldest first.
    pub fn history(&self) -> &[ExecutedStep] {
        &self.history
    }
}
