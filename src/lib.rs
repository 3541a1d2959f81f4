mod ast;
mod parser;
mod reasoner;
mod standardize;
mod subst;
mod unify;

pub use ast::*;
pub use parser::{load_knowledge_base, parse_knowledge_base, parse_query, LoadError, ParseError};
pub use reasoner::{KnowledgeBase, Prover, ProverConfig};
pub use standardize::Renamer;
pub use subst::Substitution;
pub use unify::{unify_lists, unify_literals, unify_terms};
