//! Syntactic unification with occurs-check.
//!
//! Every function takes the current substitution by reference and returns a
//! new one on success; `None` means the two sides do not unify.

use crate::ast::*;
use crate::subst::Substitution;

/// Most general unifier of two literals under `s`.
pub fn unify_literals(a: &Literal, b: &Literal, s: &Substitution) -> Option<Substitution> {
    if a.pred != b.pred || a.args.len() != b.args.len() {
        return None;
    }
    unify_lists(&a.args, &b.args, s)
}

/// Pairwise left-to-right unification of two term lists.
pub fn unify_lists(xs: &[Term], ys: &[Term], s: &Substitution) -> Option<Substitution> {
    if xs.len() != ys.len() {
        return None;
    }
    let mut cur = s.clone();
    for (x, y) in xs.iter().zip(ys) {
        cur = unify_terms(x, y, &cur)?;
    }
    Some(cur)
}

/// Most general unifier of two terms under `s`.
pub fn unify_terms(a: &Term, b: &Term, s: &Substitution) -> Option<Substitution> {
    let a = s.walk(a);
    let b = s.walk(b);

    match (a, b) {
        (Term::Const(ca), Term::Const(cb)) => (ca == cb).then(|| s.clone()),

        (Term::Var(va), Term::Var(vb)) if va == vb => Some(s.clone()),

        (Term::Var(va), t) => bind_var(va, t, s),
        (t, Term::Var(vb)) => bind_var(vb, t, s),

        (Term::Compound(fa, aa), Term::Compound(fb, ab)) => {
            if fa != fb || aa.len() != ab.len() {
                return None;
            }
            unify_lists(aa, ab, s)
        }

        // constant vs compound
        _ => None,
    }
}

// `v` is unbound here: callers walked both sides first.
fn bind_var(v: &Variable, t: &Term, s: &Substitution) -> Option<Substitution> {
    if let Term::Compound(..) = t {
        if s.occurs(v, t) {
            return None;
        }
    }
    Some(s.extend(v.clone(), t.clone()))
}
