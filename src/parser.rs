use std::fs;
use std::path::{Path, PathBuf};

use pest::iterators::Pair;
use pest::Parser as PestParser; // <- trait (gives KbParser::parse)
use pest_derive::Parser;        // <- derive macro (generates Rule enum + impl)
use thiserror::Error;
use tracing::debug;

use crate::ast::{self, Literal, Term, Variable};
use crate::reasoner::KnowledgeBase;

#[derive(Parser)]
#[grammar = "kb.pest"]
struct KbParser;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("parse error: {0}")]
    Pest(#[from] pest::error::Error<Rule>),
    #[error("unexpected rule: {0:?}")]
    Unexpected(Rule),
    #[error("fact is not ground: {0}")]
    NonGroundFact(Literal),
}

/// Failure to build a knowledge base from files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

pub fn parse_knowledge_base(input: &str) -> Result<KnowledgeBase, ParseError> {
    let mut pairs = KbParser::parse(Rule::document, input)?;
    let Some(doc) = pairs.next() else {
        return Err(ParseError::Unexpected(Rule::document));
    };

    let mut kb = KnowledgeBase::default();
    for item in doc.into_inner() {
        match item.as_rule() {
            Rule::clause => {
                let rule = build_clause(item)?;
                if rule.body.is_empty() {
                    if !rule.head.is_ground() {
                        return Err(ParseError::NonGroundFact(rule.head));
                    }
                    kb.add_fact(rule.head);
                } else {
                    kb.add_rule(rule);
                }
            }
            Rule::EOI => {}
            r => return Err(ParseError::Unexpected(r)),
        }
    }
    Ok(kb)
}

/// Parse a conjunctive query such as `?- parent(tom, X), female(X).`
/// Both the `?-` prefix and the trailing period are optional.
pub fn parse_query(input: &str) -> Result<Vec<Literal>, ParseError> {
    let mut pairs = KbParser::parse(Rule::query, input)?;
    let Some(q) = pairs.next() else {
        return Err(ParseError::Unexpected(Rule::query));
    };

    for item in q.into_inner() {
        if item.as_rule() == Rule::body {
            return build_body(item);
        }
    }
    Err(ParseError::Unexpected(Rule::query))
}

/// Read every file in order into one knowledge base.
pub fn load_knowledge_base<P: AsRef<Path>>(paths: &[P]) -> Result<KnowledgeBase, LoadError> {
    let mut kb = KnowledgeBase::default();
    for path in paths {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let part = parse_knowledge_base(&text).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            facts = part.facts.len(),
            rules = part.rules.len(),
            "loaded {}",
            path.display()
        );
        kb.extend(part);
    }
    Ok(kb)
}

fn build_clause(pair: Pair<Rule>) -> Result<ast::Rule, ParseError> {
    let mut it = pair.into_inner();
    let head = match it.next() {
        Some(p) => build_literal(p)?,
        None => return Err(ParseError::Unexpected(Rule::clause)),
    };
    let body = match it.next() {
        Some(p) => build_body(p)?,
        None => vec![],
    };
    Ok(ast::Rule { head, body })
}

fn build_body(pair: Pair<Rule>) -> Result<Vec<Literal>, ParseError> {
    pair.into_inner().map(build_literal).collect()
}

fn build_literal(pair: Pair<Rule>) -> Result<Literal, ParseError> {
    if pair.as_rule() != Rule::literal {
        return Err(ParseError::Unexpected(pair.as_rule()));
    }
    let mut it = pair.into_inner();
    let pred = match it.next() {
        Some(p) => p.as_str().to_string(),
        None => return Err(ParseError::Unexpected(Rule::literal)),
    };
    let args = it.map(build_term).collect::<Result<Vec<_>, _>>()?;
    Ok(Literal { pred, args })
}

fn build_term(pair: Pair<Rule>) -> Result<Term, ParseError> {
    match pair.as_rule() {
        Rule::variable => Ok(Term::Var(Variable::new(pair.as_str()))),
        Rule::constant => Ok(Term::Const(pair.as_str().to_string())),
        Rule::compound => {
            let mut it = pair.into_inner();
            let functor = match it.next() {
                Some(p) => p.as_str().to_string(),
                None => return Err(ParseError::Unexpected(Rule::compound)),
            };
            let args = it.map(build_term).collect::<Result<Vec<_>, _>>()?;
            Ok(Term::Compound(functor, args))
        }
        r => Err(ParseError::Unexpected(r)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAMILY: &str = r#"
        % facts
        parent(tom, bob).
        parent(bob, ann).

        ancestor(X, Y) :- parent(X, Y).
        ancestor(X, Y) :- parent(X, Z), ancestor(Z, Y).
    "#;

    #[test]
    fn parses_facts_and_rules_in_order() {
        let kb = parse_knowledge_base(FAMILY).unwrap();
        assert_eq!(kb.facts.len(), 2);
        assert_eq!(kb.facts[0].to_string(), "parent(tom, bob)");
        assert_eq!(kb.rules.len(), 2);
        assert_eq!(
            kb.rules[1].to_string(),
            "ancestor(X, Y) :- parent(X, Z), ancestor(Z, Y)."
        );
    }

    #[test]
    fn parses_terms() {
        let kb = parse_knowledge_base("p(f(a, g(_B)), -12, Xs) :- q(Xs). rains.").unwrap();
        let head = &kb.rules[0].head;
        assert_eq!(
            head.args[0],
            Term::compound(
                "f",
                vec![Term::constant("a"), Term::compound("g", vec![Term::var("_B")])]
            )
        );
        assert_eq!(head.args[1], Term::constant("-12"));
        assert_eq!(head.args[2], Term::var("Xs"));
        assert_eq!(kb.facts, vec![Literal::new("rains", vec![])]);
    }

    #[test]
    fn rejects_non_ground_fact() {
        let err = parse_knowledge_base("likes(X, pizza).").unwrap_err();
        assert!(matches!(err, ParseError::NonGroundFact(_)));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            parse_knowledge_base("parent(tom, bob"),
            Err(ParseError::Pest(_))
        ));
        assert!(parse_knowledge_base("Parent(tom).").is_err());
    }

    #[test]
    fn empty_document() {
        let kb = parse_knowledge_base("  % nothing here\n").unwrap();
        assert!(kb.is_empty());
    }

    #[test]
    fn query_forms() {
        let a = parse_query("?- parent(tom, X), female(X).").unwrap();
        let b = parse_query("parent(tom, X), female(X)").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert_eq!(a[1], Literal::new("female", vec![Term::var("X")]));
        assert!(parse_query("?- .").is_err());
    }
}
