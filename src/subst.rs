use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::ast::*;

/// Append-only binding list. The latest binding of a variable shadows any
/// earlier one; extending always produces a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: Vec<(Variable, Term)>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.bindings.iter().map(|(v, t)| (v, t))
    }

    pub fn lookup(&self, v: &Variable) -> Option<&Term> {
        self.bindings
            .iter()
            .rev()
            .find(|(bv, _)| bv == v)
            .map(|(_, t)| t)
    }

    /// Copy of `self` with `v -> t` appended.
    pub fn extend(&self, v: Variable, t: Term) -> Substitution {
        let mut bindings = Vec::with_capacity(self.bindings.len() + 1);
        bindings.extend_from_slice(&self.bindings);
        bindings.push((v, t));
        Substitution { bindings }
    }

    /// Follow variable bindings until reaching a non-variable or an unbound
    /// variable.
    pub fn walk<'a>(&'a self, mut t: &'a Term) -> &'a Term {
        while let Term::Var(v) = t {
            match self.lookup(v) {
                Some(next) => t = next,
                None => break,
            }
        }
        t
    }

    /// Does `v` occur in `t` once bindings are taken into account?
    pub fn occurs(&self, v: &Variable, t: &Term) -> bool {
        match self.walk(t) {
            Term::Const(_) => false,
            Term::Var(w) => w == v,
            Term::Compound(_, args) => args.iter().any(|a| self.occurs(v, a)),
        }
    }

    /// Apply the substitution all the way down.
    pub fn resolve(&self, t: &Term) -> Term {
        match self.walk(t) {
            Term::Compound(name, args) => {
                Term::Compound(name.clone(), args.iter().map(|a| self.resolve(a)).collect())
            }
            other => other.clone(),
        }
    }

    pub fn resolve_literal(&self, lit: &Literal) -> Literal {
        Literal {
            pred: lit.pred.clone(),
            args: lit.args.iter().map(|a| self.resolve(a)).collect(),
        }
    }

    /// Values of the variables of `query`, in order of first appearance.
    ///
    /// A value that is still an unbound variable is reported as the first
    /// query variable sharing it, so `same(X, Y)` answers `Y = X` rather than
    /// naming a renamed rule variable. Variables left entirely unbound are
    /// omitted.
    pub fn answer(&self, query: &[Literal]) -> Vec<(Variable, Term)> {
        let mut seen = HashSet::new();
        let mut vars = vec![];
        for lit in query {
            for a in &lit.args {
                a.collect_vars(&mut seen, &mut vars);
            }
        }

        let resolved: Vec<(Variable, Term)> = vars
            .into_iter()
            .map(|v| {
                let val = self.resolve(&Term::Var(v.clone()));
                (v, val)
            })
            .collect();

        let mut aliases: HashMap<Variable, Variable> = HashMap::new();
        for (v, val) in &resolved {
            if let Term::Var(u) = val {
                aliases.entry(u.clone()).or_insert_with(|| v.clone());
            }
        }

        resolved
            .into_iter()
            .filter_map(|(v, val)| {
                let val = rename_aliases(&val, &aliases);
                if val == Term::Var(v.clone()) {
                    None
                } else {
                    Some((v, val))
                }
            })
            .collect()
    }
}

fn rename_aliases(t: &Term, aliases: &HashMap<Variable, Variable>) -> Term {
    match t {
        Term::Var(u) => match aliases.get(u) {
            Some(q) => Term::Var(q.clone()),
            None => t.clone(),
        },
        Term::Const(_) => t.clone(),
        Term::Compound(name, args) => Term::Compound(
            name.clone(),
            args.iter().map(|a| rename_aliases(a, aliases)).collect(),
        ),
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (v, t)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}/{t}")?;
        }
        write!(f, "}}")
    }
}
