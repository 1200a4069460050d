use cogex_core::TargetRuntime;

use crate::ir::{BinOp, Expr, RuntimeClass, Stmt};
use crate::printer::Printer;
use crate::writer::CodeWriter;

/// PsychoPy script syntax: indentation blocks, `append`, bare status constants.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopPrinter;

impl DesktopPrinter {
    fn list(&self, items: &[Expr]) -> String {
        let items: Vec<String> = items.iter().map(|e| self.expr(e)).collect();
        format!("[{}]", items.join(", "))
    }
}

impl Printer for DesktopPrinter {
    fn runtime(&self) -> TargetRuntime {
        TargetRuntime::Desktop
    }

    fn indent_unit(&self) -> &'static str {
        "    "
    }

    fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Name(name) | Expr::State(name) => name.to_string(),
            Expr::Attr(recv, attr) => format!("{}.{}", self.expr(recv), attr),
            Expr::Index(recv, i) => format!("{}[{}]", self.expr(recv), i),
            Expr::Call { recv, method, args } => {
                let args: Vec<String> = args.iter().map(|a| self.expr(a)).collect();
                format!("{}.{}({})", self.expr(recv), method, args.join(", "))
            }
            Expr::Construct(class) => match class {
                RuntimeClass::Mouse => "event.Mouse(win=win)".to_string(),
            },
            Expr::List(items) => self.list(items),
            Expr::Int(n) => n.to_string(),
            Expr::Bool(true) => "True".to_string(),
            Expr::Bool(false) => "False".to_string(),
            Expr::Null => "None".to_string(),
            Expr::Status(status) => status.constant().to_string(),
            Expr::Code(code) => code.clone(),
            Expr::Binary { op, lhs, rhs } => {
                let sym = match op {
                    BinOp::And => "and",
                    BinOp::Eq => "==",
                    BinOp::Ge => ">=",
                    BinOp::Add => "+",
                };
                format!("{} {} {}", self.operand(*op, lhs), sym, self.operand(*op, rhs))
            }
            Expr::Changed(a, b) => format!("{} != {}", self.expr(a), self.expr(b)),
            Expr::AnyPressed(buttons) => format!("sum({}) > 0", self.expr(buttons)),
            Expr::NonEmpty(seq) => format!("len({})", self.expr(seq)),
        }
    }

    fn stmt(&self, stmt: &Stmt, out: &mut CodeWriter) {
        match stmt {
            Stmt::Comment(text) => out.line(&format!("# {text}")),
            Stmt::Assign { target, value } => {
                out.line(&format!("{} = {}", self.expr(target), self.expr(value)))
            }
            Stmt::Unpack { names, value } => {
                let names: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();
                out.line(&format!("{} = {}", names.join(", "), self.expr(value)))
            }
            Stmt::DeclareLocals(names) => {
                let placeholders = vec![Expr::Null; names.len()];
                let names: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();
                out.line(&format!("{} = {}", names.join(", "), self.list(&placeholders)))
            }
            Stmt::Append { list, value } => {
                out.line(&format!("{}.append({})", self.expr(list), self.expr(value)))
            }
            Stmt::If { cond, body } => {
                out.line(&format!("if {}:", self.expr(cond)));
                self.body(body, out);
            }
            Stmt::ForEach { var, items, body } => {
                out.line(&format!("for {} in {}:", var, self.list(items)));
                self.body(body, out);
            }
            Stmt::EndRoutine => out.line("continueRoutine = False"),
            Stmt::AddData { handler, key, value } => {
                out.line(&format!("{handler}.addData('{key}', {})", self.expr(value)))
            }
            Stmt::NextEntry { handler } => out.line(&format!("{handler}.nextEntry()")),
            // function-level locals; a later component simply rebinds them
            Stmt::Scope(body) => self.block(body, out),
        }
    }
}

impl DesktopPrinter {
    fn body(&self, body: &[Stmt], out: &mut CodeWriter) {
        let mut inner = out.indent();
        if body.is_empty() {
            inner.line("pass");
        }
        self.block(body, &mut inner);
    }
}
