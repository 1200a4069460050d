//! Code generation for experiment components.
//!
//! Components emit [`ir::Stmt`] trees per compile pass; a [`Printer`] turns
//! them into PsychoPy (desktop) or PsychoJS (browser) source.

pub mod browser;
pub mod component;
pub mod desktop;
pub mod ir;
pub mod mouse;
pub mod printer;
pub mod writer;

pub use browser::BrowserPrinter;
pub use component::{Component, RoutineScript, compile_routine, write_phase};
pub use desktop::DesktopPrinter;
pub use ir::{Expr, Stmt};
pub use mouse::MouseComponent;
pub use printer::{Printer, printer_for};
pub use writer::CodeWriter;
