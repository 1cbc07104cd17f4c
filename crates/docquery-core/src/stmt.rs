mod direction;
pub use direction::Direction;

mod eval;

mod eval_assign;

mod eval_call;

mod expr;
pub use expr::Expr;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_arg;
pub use expr_arg::ExprArg;

mod expr_assign;
pub use expr_assign::{AssignJoin, AssignSource, ExprAssign};

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_call;
pub use expr_call::ExprCall;

mod expr_cast;
pub use expr_cast::ExprCast;

mod expr_entities;
pub use expr_entities::ExprEntities;

mod expr_func;
pub use expr_func::ExprFunc;

mod expr_if;
pub use expr_if::ExprIf;

mod expr_in_list;
pub use expr_in_list::ExprInList;

mod expr_is_null;
pub use expr_is_null::ExprIsNull;

mod expr_list;
pub use expr_list::ExprList;

mod expr_member;
pub use expr_member::ExprMember;

mod expr_not;
pub use expr_not::ExprNot;

mod expr_or;
pub use expr_or::ExprOr;

mod expr_project;
pub use expr_project::ExprProject;

mod expr_query_source;
pub use expr_query_source::ExprQuerySource;

mod expr_record;
pub use expr_record::ExprRecord;

mod expr_scan;
pub use expr_scan::ExprScan;

mod input;
pub use input::{ConstInput, Input};

mod method;
pub use method::Method;

mod node;
pub use node::Node;

mod op_binary;
pub use op_binary::BinaryOp;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

mod value_cmp;

mod value_record;
pub use value_record::ValueRecord;

mod value_stream;
pub use value_stream::ValueStream;

pub mod visit;
pub use visit::Visit;

pub mod visit_mut;
pub use visit_mut::VisitMut;

use crate::schema::app::{FieldId, ModelId};
use std::fmt;
