//! Special forms, registered as syntax operations in the top-level
//! environment. Each one receives its operands raw and decides per operand
//! whether, when, and in which environment to evaluate.

mod assign;
mod binding;
mod conditional;
mod define;
mod do_loop;
mod lambda;
mod logic;
mod quote;
mod sequence;
mod time;

use crate::engine::Environment;

/// Installs every special form. Registration order carries no meaning.
pub fn install(env: &Environment) {
    assign::install(env);
    binding::install(env);
    conditional::install(env);
    define::install(env);
    do_loop::install(env);
    lambda::install(env);
    logic::install(env);
    quote::install(env);
    sequence::install(env);
    time::install(env);
}
