use std::collections::HashSet;
use std::fmt;

/// A logic variable. Instance `0` is the variable as written in the source;
/// standardizing a rule apart issues higher instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    pub name: String,
    pub instance: usize,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable { name: name.into(), instance: 0 }
    }

    pub fn with_instance(name: impl Into<String>, instance: usize) -> Self {
        Variable { name: name.into(), instance }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Const(String),
    Var(Variable),
    Compound(String, Vec<Term>),
}

impl Term {
    pub fn constant(name: impl Into<String>) -> Self {
        Term::Const(name.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(Variable::new(name))
    }

    pub fn compound(functor: impl Into<String>, args: Vec<Term>) -> Self {
        Term::Compound(functor.into(), args)
    }

    /// Syntactic occurrence of `v` in this term (no bindings consulted).
    pub fn contains_var(&self, v: &Variable) -> bool {
        match self {
            Term::Const(_) => false,
            Term::Var(w) => w == v,
            Term::Compound(_, args) => args.iter().any(|a| a.contains_var(v)),
        }
    }

    pub fn is_ground(&self) -> bool {
        match self {
            Term::Const(_) => true,
            Term::Var(_) => false,
            Term::Compound(_, args) => args.iter().all(Term::is_ground),
        }
    }

    /// Push every variable of this term onto `out`, in order of first
    /// appearance, skipping ones already seen.
    pub fn collect_vars(&self, seen: &mut HashSet<Variable>, out: &mut Vec<Variable>) {
        match self {
            Term::Const(_) => {}
            Term::Var(v) => {
                if seen.insert(v.clone()) {
                    out.push(v.clone());
                }
            }
            Term::Compound(_, args) => {
                for a in args {
                    a.collect_vars(seen, out);
                }
            }
        }
    }
}

/// Predicate symbol applied to an ordered argument list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub pred: String,
    pub args: Vec<Term>,
}

impl Literal {
    pub fn new(pred: impl Into<String>, args: Vec<Term>) -> Self {
        Literal { pred: pred.into(), args }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn is_ground(&self) -> bool {
        self.args.iter().all(Term::is_ground)
    }

    pub fn variables(&self) -> Vec<Variable> {
        let mut seen = HashSet::new();
        let mut out = vec![];
        for a in &self.args {
            a.collect_vars(&mut seen, &mut out);
        }
        out
    }
}

/// Horn clause: `head :- body[0], body[1], ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub head: Literal,
    pub body: Vec<Literal>,
}

impl Rule {
    pub fn new(head: Literal, body: Vec<Literal>) -> Self {
        Rule { head, body }
    }

    /// Distinct variables of head and body, head first.
    pub fn variables(&self) -> Vec<Variable> {
        let mut seen = HashSet::new();
        let mut out = vec![];
        for lit in std::iter::once(&self.head).chain(&self.body) {
            for a in &lit.args {
                a.collect_vars(&mut seen, &mut out);
            }
        }
        out
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}_{}", self.name, self.instance)
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Term]) -> fmt::Result {
    write!(f, "(")?;
    for (i, a) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{a}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Const(c) => write!(f, "{c}"),
            Term::Var(v) => write!(f, "{v}"),
            Term::Compound(name, args) => {
                write!(f, "{name}")?;
                write_args(f, args)
            }
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pred)?;
        if self.args.is_empty() {
            Ok(())
        } else {
            write_args(f, &self.args)
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if !self.body.is_empty() {
            write!(f, " :- ")?;
            for (i, lit) in self.body.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{lit}")?;
            }
        }
        write!(f, ".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_terms_and_literals() {
        let t = Term::compound("f", vec![Term::constant("a"), Term::var("X")]);
        assert_eq!(t.to_string(), "f(a, X)");

        let v = Term::Var(Variable::with_instance("Y", 3));
        assert_eq!(v.to_string(), "Y_3");

        assert_eq!(Literal::new("rains", vec![]).to_string(), "rains");
        assert_eq!(Literal::new("p", vec![t]).to_string(), "p(f(a, X))");
    }

    #[test]
    fn display_rule() {
        let r = Rule::new(
            Literal::new("ancestor", vec![Term::var("X"), Term::var("Y")]),
            vec![Literal::new("parent", vec![Term::var("X"), Term::var("Y")])],
        );
        assert_eq!(r.to_string(), "ancestor(X, Y) :- parent(X, Y).");
    }

    #[test]
    fn variables_are_distinct_and_ordered() {
        let r = Rule::new(
            Literal::new("ancestor", vec![Term::var("X"), Term::var("Y")]),
            vec![
                Literal::new("parent", vec![Term::var("X"), Term::var("Z")]),
                Literal::new("ancestor", vec![Term::var("Z"), Term::var("Y")]),
            ],
        );
        let names: Vec<_> = r.variables().into_iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["X", "Y", "Z"]);
    }

    #[test]
    fn instance_distinguishes_variables() {
        assert_ne!(Variable::new("X"), Variable::with_instance("X", 1));
        let t = Term::compound("g", vec![Term::Var(Variable::with_instance("X", 1))]);
        assert!(!t.contains_var(&Variable::new("X")));
        assert!(t.contains_var(&Variable::with_instance("X", 1)));
        assert!(!t.is_ground());
    }
}
