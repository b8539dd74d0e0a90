//! Structured error taxonomy for the evaluation engine.
//!
//! Every failure the engine raises carries a stable kind plus the offending
//! value or symbol, rendered to a string so errors stay cheap to clone and
//! compare. The trampoline driver is the single point where these are caught
//! and handed to the caller-supplied handler; nothing inside the engine
//! recovers from an error locally.

use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, SchemeError>;

/// The categorized failure type for everything the engine can raise.
///
/// `Internal` is reserved for should-be-unreachable states (engine bugs,
/// e.g. the binding walk running out of values after the arity check already
/// passed) and is distinguishable from every user-facing kind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemeError {
    /// Malformed special-form operands.
    #[error("{form}: syntax error: {detail}")]
    Syntax { form: &'static str, detail: String },

    /// A formal argument specification that is not nil, a symbol, or a
    /// (possibly dotted) list of symbols.
    #[error("invalid formal argument list: {0}")]
    InvalidFormals(String),

    /// The same name appears twice in a formal argument specification,
    /// including a clash between a fixed name and the rest name.
    #[error("duplicate formal argument: {0}")]
    DuplicateFormal(String),

    /// Exact arity mismatch.
    #[error("wrong number of arguments: expected {expected}, received {received}")]
    WrongArgumentCount { expected: usize, received: usize },

    /// Ranged arity: too few.
    #[error("not enough arguments: expected at least {min}, received {received}")]
    NotEnoughArguments { min: usize, received: usize },

    /// Ranged arity: too many.
    #[error("too many arguments: expected at most {max}, received {received}")]
    TooManyArguments { max: usize, received: usize },

    /// Symbol lookup walked the whole parent chain without a hit.
    #[error("unbound symbol: {0}")]
    UnboundSymbol(String),

    /// Assignment target does not exist anywhere in the parent chain.
    #[error("set!: unbound symbol: {0}")]
    AssignUnbound(String),

    /// An operand is not of the kind an operation requires.
    #[error("type error: expected {expected}, got {found}")]
    Type { expected: &'static str, found: String },

    /// The operator position of a combination held a non-applicable value.
    #[error("not applicable: {0}")]
    NotApplicable(String),

    /// A malformed entry in a binding list of `let`/`let*`/`letrec`/`do`.
    #[error("{syntax}: bad binding: {binding}")]
    BadBinding { syntax: &'static str, binding: String },

    /// Mutation attempted on a value marked constant.
    #[error("cannot modify constant: {0}")]
    ConstantMutation(String),

    /// Integer arithmetic left the representable range.
    #[error("integer overflow in {0}")]
    Overflow(&'static str),

    /// The reader hit malformed input.
    #[error("parse error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// Raised by the `error` procedure from language level.
    #[error("error: {0}")]
    User(String),

    /// An engine invariant was violated. Always a bug, never user error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_kinds_render_their_payload() {
        let e = SchemeError::UnboundSymbol("x".to_string());
        assert_eq!(e.to_string(), "unbound symbol: x");

        let e = SchemeError::WrongArgumentCount {
            expected: 2,
            received: 3,
        };
        assert_eq!(
            e.to_string(),
            "wrong number of arguments: expected 2, received 3"
        );
    }

    #[test]
    fn internal_errors_are_distinguishable() {
        let internal = SchemeError::Internal("bind underflow".to_string());
        assert!(matches!(internal, SchemeError::Internal(_)));
        assert!(!matches!(internal, SchemeError::User(_)));
    }
}
