use tracing::{debug, info, trace};

use crate::ast::*;
use crate::standardize::Renamer;
use crate::subst::Substitution;
use crate::unify::unify_literals;

/// Facts and rules, in the order they were loaded. Order decides which proof
/// the prover finds first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeBase {
    pub facts: Vec<Literal>,
    pub rules: Vec<Rule>,
}

impl KnowledgeBase {
    pub fn new(facts: Vec<Literal>, rules: Vec<Rule>) -> Self {
        KnowledgeBase { facts, rules }
    }

    pub fn add_fact(&mut self, fact: Literal) {
        self.facts.push(fact);
    }

    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Append the facts and rules of `other` after our own.
    pub fn extend(&mut self, other: KnowledgeBase) {
        self.facts.extend(other.facts);
        self.rules.extend(other.rules);
    }

    /// Rules whose head uses `pred`, in knowledge-base order.
    pub fn rules_for<'a>(&'a self, pred: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |r| r.head.pred == pred)
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty() && self.rules.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProverConfig {
    /// Maximum rule nesting depth. `None` searches without limit, which does
    /// not terminate on rules that recurse without reaching a fact.
    pub max_depth: Option<usize>,
}

/// Depth-first backward chainer over a borrowed knowledge base.
///
/// Goals are matched against facts first, taking only the first fact that
/// unifies; then against rule heads in order, committing to the first rule
/// whose body can be proved.
#[derive(Debug)]
pub struct Prover<'kb> {
    kb: &'kb KnowledgeBase,
    renamer: Renamer,
    config: ProverConfig,
}

impl<'kb> Prover<'kb> {
    pub fn new(kb: &'kb KnowledgeBase) -> Self {
        Self::with_config(kb, ProverConfig::default())
    }

    pub fn with_config(kb: &'kb KnowledgeBase, config: ProverConfig) -> Self {
        Prover { kb, renamer: Renamer::new(), config }
    }

    pub fn knowledge_base(&self) -> &'kb KnowledgeBase {
        self.kb
    }

    /// Prove a single goal from an empty substitution.
    pub fn ask(&mut self, goal: &Literal) -> Option<Substitution> {
        info!("query: {goal}");
        let res = self.prove(goal, &Substitution::new());
        log_outcome(&res);
        res
    }

    /// Prove a conjunction of goals from an empty substitution.
    pub fn ask_all(&mut self, goals: &[Literal]) -> Option<Substitution> {
        info!("query: {} goal(s)", goals.len());
        let res = self.prove_all(goals, &Substitution::new());
        log_outcome(&res);
        res
    }

    /// First fact that unifies with `goal` under `s`.
    pub fn ask_facts(&self, goal: &Literal, s: &Substitution) -> Option<Substitution> {
        self.kb.facts.iter().find_map(|fact| {
            let mgu = unify_literals(goal, fact, s)?;
            trace!("{goal} matched fact {fact}");
            Some(mgu)
        })
    }

    pub fn prove(&mut self, goal: &Literal, s: &Substitution) -> Option<Substitution> {
        self.prove_goal(goal, s, 0)
    }

    pub fn prove_all(&mut self, goals: &[Literal], s: &Substitution) -> Option<Substitution> {
        self.prove_goals(goals, s, 0)
    }

    fn prove_goal(&mut self, goal: &Literal, s: &Substitution, depth: usize) -> Option<Substitution> {
        if let Some(mgu) = self.ask_facts(goal, s) {
            return Some(mgu);
        }

        if let Some(max) = self.config.max_depth {
            if depth >= max {
                debug!("depth limit {max} reached at {goal}");
                return None;
            }
        }

        let kb = self.kb;
        for candidate in kb.rules_for(&goal.pred) {
            let rule = self.renamer.standardize_apart(candidate);
            let Some(mgu) = unify_literals(goal, &rule.head, s) else {
                continue;
            };
            debug!(depth, "trying {rule} for {goal}");
            match self.prove_goals(&rule.body, &mgu, depth + 1) {
                Some(proof) => {
                    debug!(depth, "proved {goal} with {rule}");
                    return Some(proof);
                }
                None => debug!(depth, "body of {rule} failed"),
            }
        }

        None
    }

    fn prove_goals(&mut self, goals: &[Literal], s: &Substitution, depth: usize) -> Option<Substitution> {
        let mut cur = s.clone();
        for goal in goals {
            cur = self.prove_goal(goal, &cur, depth)?;
        }
        Some(cur)
    }
}

fn log_outcome(res: &Option<Substitution>) {
    match res {
        Some(s) => info!(bindings = s.len(), "proved"),
        None => info!("no proof"),
    }
}
