use cogex_core::TargetRuntime;

use crate::ir::{BinOp, Expr, RuntimeClass, Stmt};
use crate::printer::Printer;
use crate::writer::CodeWriter;

/// PsychoJS syntax: braces, `push`, `PsychoJS.Status` constants.
///
/// Frame code runs in a fresh function call every frame, so routine-persistent
/// variables live on the shared `my` object. Every data record goes to
/// `psychoJS.experiment`, which tracks the active loop itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserPrinter;

const EXPERIMENT: &str = "psychoJS.experiment";

impl BrowserPrinter {
    fn list(&self, items: &[Expr]) -> String {
        let items: Vec<String> = items.iter().map(|e| self.expr(e)).collect();
        format!("[{}]", items.join(", "))
    }

    fn body(&self, body: &[Stmt], out: &mut CodeWriter) {
        {
            let mut inner = out.indent();
            self.block(body, &mut inner);
        }
        out.line("}");
    }
}

impl Printer for BrowserPrinter {
    fn runtime(&self) -> TargetRuntime {
        TargetRuntime::Browser
    }

    fn indent_unit(&self) -> &'static str {
        "  "
    }

    fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Name(name) => name.to_string(),
            Expr::State(name) => format!("my.{name}"),
            Expr::Attr(recv, attr) => format!("{}.{}", self.expr(recv), attr),
            Expr::Index(recv, i) => format!("{}[{}]", self.expr(recv), i),
            Expr::Call { recv, method, args } => {
                let args: Vec<String> = args.iter().map(|a| self.expr(a)).collect();
                format!("{}.{}({})", self.expr(recv), method, args.join(", "))
            }
            Expr::Construct(class) => match class {
                RuntimeClass::Mouse => "new core.Mouse({win: psychoJS.window})".to_string(),
            },
            Expr::List(items) => self.list(items),
            Expr::Int(n) => n.to_string(),
            Expr::Bool(b) => b.to_string(),
            Expr::Null => "null".to_string(),
            Expr::Status(status) => format!("PsychoJS.Status.{}", status.constant()),
            Expr::Code(code) => code.clone(),
            Expr::Binary { op, lhs, rhs } => {
                let sym = match op {
                    BinOp::And => "&&",
                    BinOp::Eq => "===",
                    BinOp::Ge => ">=",
                    BinOp::Add => "+",
                };
                format!("{} {} {}", self.operand(*op, lhs), sym, self.operand(*op, rhs))
            }
            Expr::Changed(a, b) => format!(
                "!{}.every((e, i) => e === {}[i])",
                self.expr(a),
                self.expr(b)
            ),
            Expr::AnyPressed(buttons) => {
                format!("{}.reduce((sum, e) => sum + e, 0) > 0", self.expr(buttons))
            }
            Expr::NonEmpty(seq) => format!("{}.length > 0", self.expr(seq)),
        }
    }

    fn stmt(&self, stmt: &Stmt, out: &mut CodeWriter) {
        match stmt {
            Stmt::Comment(text) => out.line(&format!("// {text}")),
            Stmt::Assign { target, value } => {
                out.line(&format!("{} = {};", self.expr(target), self.expr(value)))
            }
            Stmt::Unpack { names, value } => {
                let names: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();
                out.line(&format!("let [{}] = {};", names.join(", "), self.expr(value)))
            }
            // locals are declared with `let` where they are first assigned
            Stmt::DeclareLocals(_) => {}
            Stmt::Append { list, value } => {
                out.line(&format!("{}.push({});", self.expr(list), self.expr(value)))
            }
            Stmt::If { cond, body } => {
                out.line(&format!("if ({}) {{", self.expr(cond)));
                self.body(body, out);
            }
            Stmt::ForEach { var, items, body } => {
                out.line(&format!("for (const {} of {}) {{", var, self.list(items)));
                self.body(body, out);
            }
            Stmt::EndRoutine => out.line("continueRoutine = false;"),
            Stmt::AddData { key, value, .. } => {
                out.line(&format!("{EXPERIMENT}.addData('{key}', {});", self.expr(value)))
            }
            Stmt::NextEntry { .. } => out.line(&format!("{EXPERIMENT}.nextEntry();")),
            // a bare block, so each component may declare the same `let` names
            Stmt::Scope(body) => {
                out.line("{");
                self.body(body, out);
            }
        }
    }
}
