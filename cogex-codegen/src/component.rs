use cogex_core::{EmitPhase, Phase, TargetRuntime};
use cogex_experiment::RoutineContext;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::ir::Stmt;
use crate::printer::Printer;
use crate::writer::CodeWriter;

/// A routine element that contributes code to each compile pass.
pub trait Component {
    fn name(&self) -> &str;

    fn kind(&self) -> &'static str;

    /// Statements for one pass. Empty when the component has nothing to add.
    fn emit(&self, phase: EmitPhase, ctx: &RoutineContext) -> Vec<Stmt>;

    /// Runtime library modules the emitted code uses.
    fn required_imports(&self, _runtime: TargetRuntime) -> &'static [&'static str] {
        &[]
    }
}

/// Emits one pass of `component` into `out`, leaving the indent where it was.
pub fn write_phase(
    component: &dyn Component,
    phase: EmitPhase,
    ctx: &RoutineContext,
    printer: &dyn Printer,
    out: &mut CodeWriter,
) {
    let stmts = component.emit(phase, ctx);
    debug!(
        component = component.name(),
        kind = component.kind(),
        phase = phase.label(),
        runtime = %printer.runtime(),
        statements = stmts.len(),
        "emitting"
    );
    printer.block(&stmts, out);
}

/// Generated code for one routine, one section per compile pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoutineScript {
    pub imports: Vec<String>,
    pub declare: String,
    pub routine_start: String,
    pub each_frame: String,
    pub routine_end: String,
}

impl RoutineScript {
    pub fn section(&self, phase: EmitPhase) -> &str {
        match phase {
            EmitPhase::Declare => &self.declare,
            EmitPhase::RoutineStart => &self.routine_start,
            EmitPhase::EachFrame => &self.each_frame,
            EmitPhase::RoutineEnd => &self.routine_end,
        }
    }

    fn section_mut(&mut self, phase: EmitPhase) -> &mut String {
        match phase {
            EmitPhase::Declare => &mut self.declare,
            EmitPhase::RoutineStart => &mut self.routine_start,
            EmitPhase::EachFrame => &mut self.each_frame,
            EmitPhase::RoutineEnd => &mut self.routine_end,
        }
    }
}

/// Visits every component once per pass, in pass order.
#[instrument(skip_all, fields(routine = %ctx.name, runtime = %printer.runtime()))]
pub fn compile_routine(
    components: &[&dyn Component],
    ctx: &RoutineContext,
    printer: &dyn Printer,
) -> RoutineScript {
    let mut script = RoutineScript::default();
    for component in components {
        for module in component.required_imports(printer.runtime()) {
            if !script.imports.iter().any(|m| m.as_str() == *module) {
                script.imports.push(module.to_string());
            }
        }
    }

    let mut phase = Some(EmitPhase::default());
    while let Some(current) = phase {
        let level = usize::from(current.is_routine_scoped());
        let mut out = printer.writer(level);
        for component in components {
            write_phase(*component, current, ctx, printer, &mut out);
        }
        *script.section_mut(current) = out.into_string();
        phase = current.next();
    }
    debug!(components = components.len(), "routine compiled");
    script
}
