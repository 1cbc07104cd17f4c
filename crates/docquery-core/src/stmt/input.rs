use super::{ExprArg, ExprScan, Value};

/// Supplies the values an expression cannot compute by itself: top-level
/// arguments and the documents read by each [`ExprScan`].
pub trait Input {
    fn resolve_arg(&mut self, expr_arg: &ExprArg) -> Option<Value> {
        let _ = expr_arg;
        None
    }

    fn resolve_scan(&mut self, scan: &ExprScan) -> Option<Value> {
        let _ = scan;
        None
    }
}

#[derive(Debug, Default)]
pub struct ConstInput {}

impl ConstInput {
    pub fn new() -> ConstInput {
        ConstInput {}
    }
}

impl Input for ConstInput {}

impl<I: Input> Input for &mut I {
    fn resolve_arg(&mut self, expr_arg: &ExprArg) -> Option<Value> {
        (**self).resolve_arg(expr_arg)
    }

    fn resolve_scan(&mut self, scan: &ExprScan) -> Option<Value> {
        (**self).resolve_scan(scan)
    }
}

impl Input for &[Value] {
    fn resolve_arg(&mut self, expr_arg: &ExprArg) -> Option<Value> {
        self.get(expr_arg.position).cloned()
    }
}

impl Input for &Vec<Value> {
    fn resolve_arg(&mut self, expr_arg: &ExprArg) -> Option<Value> {
        self.get(expr_arg.position).cloned()
    }
}

impl<const N: usize> Input for [Value; N] {
    fn resolve_arg(&mut self, expr_arg: &ExprArg) -> Option<Value> {
        self.get(expr_arg.position).cloned()
    }
}
