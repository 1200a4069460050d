use cogex_core::TargetRuntime;

use crate::browser::BrowserPrinter;
use crate::desktop::DesktopPrinter;
use crate::ir::{BinOp, Expr, Stmt};
use crate::writer::CodeWriter;

/// Renders emitted statements in one runtime's syntax.
pub trait Printer: Send + Sync {
    fn runtime(&self) -> TargetRuntime;

    fn indent_unit(&self) -> &'static str;

    fn expr(&self, expr: &Expr) -> String;

    fn stmt(&self, stmt: &Stmt, out: &mut CodeWriter);

    fn block(&self, stmts: &[Stmt], out: &mut CodeWriter) {
        for stmt in stmts {
            self.stmt(stmt, out);
        }
    }

    fn writer(&self, level: usize) -> CodeWriter {
        CodeWriter::with_level(self.indent_unit(), level)
    }

    /// Operand of `op`, parenthesised when it would otherwise bind looser.
    fn operand(&self, op: BinOp, expr: &Expr) -> String {
        let text = self.expr(expr);
        let wrap = match expr {
            Expr::Binary { op: inner, .. } => inner.precedence() < op.precedence(),
            Expr::Code(code) => !is_atomic(code),
            Expr::Changed(..) | Expr::AnyPressed(..) | Expr::NonEmpty(..) => true,
            _ => false,
        };
        if wrap { format!("({text})") } else { text }
    }
}

/// Experimenter code that is a single literal or dotted name.
pub(crate) fn is_atomic(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.'))
        || code.parse::<f64>().is_ok()
}

static DESKTOP: DesktopPrinter = DesktopPrinter;
static BROWSER: BrowserPrinter = BrowserPrinter;

/// Printer for the runtime a caller compiles for.
pub fn printer_for(runtime: TargetRuntime) -> &'static dyn Printer {
    match runtime {
        TargetRuntime::Desktop => &DESKTOP,
        TargetRuntime::Browser => &BROWSER,
    }
}
