//! External quantifier collaboration: command construction, invocation,
//! and expression table parsing.

pub mod command;
pub mod expression;

pub use command::{run_quantifier, QuantCommand, EXPRESSION_FILE};
pub use expression::{parse_expression_table, ExpressionRecord};
