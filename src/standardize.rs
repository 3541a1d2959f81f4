use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ast::*;

// Shared by every renamer in the process, so substitutions produced by one
// prover can be handed to another without instance clashes.
static NEXT_INSTANCE: AtomicUsize = AtomicUsize::new(1);

/// Issues fresh variable instances for standardizing rules apart.
///
/// Instance `0` is reserved for variables as written by the user, so renamed
/// rule variables can never collide with query variables.
#[derive(Debug, Default)]
pub struct Renamer {
    issued: usize,
}

impl Renamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fresh variables issued so far.
    pub fn issued(&self) -> usize {
        self.issued
    }

    fn fresh(&mut self, v: &Variable) -> Variable {
        self.issued += 1;
        let instance = NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed);
        Variable::with_instance(v.name.clone(), instance)
    }

    /// Copy of `rule` with every variable replaced by a fresh one. The same
    /// source variable maps to the same fresh variable throughout the copy.
    pub fn standardize_apart(&mut self, rule: &Rule) -> Rule {
        let mut map: HashMap<Variable, Variable> = HashMap::new();
        let head = self.rename_literal(&rule.head, &mut map);
        let body = rule
            .body
            .iter()
            .map(|lit| self.rename_literal(lit, &mut map))
            .collect();
        Rule { head, body }
    }

    fn rename_literal(&mut self, lit: &Literal, map: &mut HashMap<Variable, Variable>) -> Literal {
        Literal {
            pred: lit.pred.clone(),
            args: lit.args.iter().map(|t| self.rename_term(t, map)).collect(),
        }
    }

    fn rename_term(&mut self, t: &Term, map: &mut HashMap<Variable, Variable>) -> Term {
        match t {
            Term::Const(_) => t.clone(),
            Term::Var(v) => {
                if let Some(nv) = map.get(v) {
                    return Term::Var(nv.clone());
                }
                let nv = self.fresh(v);
                map.insert(v.clone(), nv.clone());
                Term::Var(nv)
            }
            Term::Compound(name, args) => {
                Term::Compound(name.clone(), args.iter().map(|a| self.rename_term(a, map)).collect())
            }
        }
    }
}
