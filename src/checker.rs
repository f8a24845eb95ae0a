//! The HUCTL model checker.
//!
//! [`ModelChecker::verify`] evaluates a formula bottom-up into a
//! [`StateMap`]: for every state, the exact parameter set for which the
//! formula holds there. Boolean connectives combine child maps through the
//! solver; temporal operators run fixed-point iteration over the transition
//! model.
//!
//! # Fixed points
//!
//! Termination is detected through parameter-set equality between rounds,
//! never an iteration counter: the value lattice (unions of rectangles) has
//! no small finite height. A configurable round bound guards against
//! non-terminating decompositions; exceeding it aborts the `verify` call
//! with [`CheckError::NonConvergence`].
//!
//! After the first full round, only *dirty* states are reprocessed: states
//! with a successor whose value changed in the previous round. This is the
//! worklist optimization; it does not affect semantics.
//!
//! # Sharing
//!
//! The checker borrows the model immutably and owns the materialized
//! successor/predecessor adjacency; independent `verify` calls on the same
//! checker are fully isolated (the memo table and in-progress maps are local
//! to one call).

use std::collections::HashMap;

use log::debug;

use crate::error::{CheckError, Result};
use crate::formula::Formula;
use crate::model::{Model, SetOf, Transition};
use crate::solver::Solver;
use crate::state_map::StateMap;
use crate::types::State;

const DEFAULT_ITERATION_LIMIT: usize = 10_000;

/// Evaluates HUCTL formulas over a parametrized transition model.
pub struct ModelChecker<'a, M: Model> {
    model: &'a M,
    successors: Vec<Vec<Transition<SetOf<M>>>>,
    predecessors: Vec<Vec<State>>,
    iteration_limit: usize,
}

impl<M: Model> std::fmt::Debug for ModelChecker<'_, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelChecker")
            .field("iteration_limit", &self.iteration_limit)
            .finish_non_exhaustive()
    }
}

impl<'a, M: Model> ModelChecker<'a, M> {
    /// Creates a checker, materializing the model's transition structure.
    ///
    /// The model's `successors` stays lazy; the checker builds the inverted
    /// (predecessor) index once, since every fixed-point loop needs it.
    pub fn new(model: &'a M) -> Result<Self> {
        Self::with_iteration_limit(model, DEFAULT_ITERATION_LIMIT)
    }

    /// Creates a checker with a custom fixed-point round bound.
    pub fn with_iteration_limit(model: &'a M, iteration_limit: usize) -> Result<Self> {
        assert!(iteration_limit > 0, "Iteration limit must be positive");

        let state_count = model.state_count();
        let mut successors = Vec::with_capacity(state_count);
        let mut predecessors = vec![Vec::new(); state_count];
        for state in 0..state_count {
            let transitions = model.successors(state)?;
            for transition in &transitions {
                if transition.target >= state_count {
                    return Err(CheckError::InvalidStateIndex {
                        state: transition.target,
                        state_count,
                    });
                }
                if !predecessors[transition.target].contains(&state) {
                    predecessors[transition.target].push(state);
                }
            }
            successors.push(transitions);
        }

        Ok(ModelChecker {
            model,
            successors,
            predecessors,
            iteration_limit,
        })
    }

    fn solver(&self) -> &M::Solver {
        self.model.solver()
    }

    fn state_count(&self) -> usize {
        self.model.state_count()
    }

    /// Computes the parameter synthesis result for `formula`.
    ///
    /// Each distinct subformula is evaluated once per call; the memo table is
    /// discarded when the call returns.
    pub fn verify(&self, formula: &Formula) -> Result<StateMap<SetOf<M>>> {
        debug!("verify({})", formula);
        let mut memo = HashMap::new();
        self.eval(formula, &mut memo)
    }

    fn eval(
        &self,
        formula: &Formula,
        memo: &mut HashMap<Formula, StateMap<SetOf<M>>>,
    ) -> Result<StateMap<SetOf<M>>> {
        if let Some(known) = memo.get(formula) {
            return Ok(known.clone());
        }

        let result = match formula {
            Formula::True => self.constant_map(self.solver().universe()),
            Formula::False => self.constant_map(self.solver().empty()),
            Formula::Prop(prop) => {
                let mut map = self.constant_map(self.solver().empty());
                for state in 0..self.state_count() {
                    if self.model.satisfies(prop, state)? {
                        map.set(state, self.solver().universe());
                    }
                }
                map
            }
            Formula::Mode(label) => {
                let mut map = self.constant_map(self.solver().empty());
                for state in 0..self.state_count() {
                    if self.model.in_mode(label, state)? {
                        map.set(state, self.solver().universe());
                    }
                }
                map
            }
            Formula::Not(phi) => {
                let phi = self.eval(phi, memo)?;
                self.complement_map(&phi)?
            }
            Formula::And(phi, psi) => {
                let phi = self.eval(phi, memo)?;
                let psi = self.eval(psi, memo)?;
                self.zip_map(&phi, &psi, |s, a, b| s.intersect(a, b))?
            }
            Formula::Or(phi, psi) => {
                let phi = self.eval(phi, memo)?;
                let psi = self.eval(psi, memo)?;
                self.zip_map(&phi, &psi, |s, a, b| s.union(a, b))?
            }
            Formula::EX(phi) => {
                let phi = self.eval(phi, memo)?;
                self.ex_map(&phi)?
            }
            Formula::EF(phi) => {
                let phi = self.eval(phi, memo)?;
                self.eval_ef(formula, &phi)?
            }
            Formula::EG(phi) => {
                let phi = self.eval(phi, memo)?;
                self.eval_eg(formula, &phi)?
            }
            Formula::EU(phi, psi) => {
                let phi = self.eval(phi, memo)?;
                let psi = self.eval(psi, memo)?;
                self.eval_eu(formula, &phi, &psi)?
            }
            // A-quantified operators reduce to their E-duals.
            Formula::AX(phi) => {
                // AX φ = !EX !φ
                let phi = self.eval(phi, memo)?;
                let not_phi = self.complement_map(&phi)?;
                let ex = self.ex_map(&not_phi)?;
                self.complement_map(&ex)?
            }
            Formula::AF(phi) => {
                // AF φ = !EG !φ
                let phi = self.eval(phi, memo)?;
                let not_phi = self.complement_map(&phi)?;
                let eg = self.eval_eg(formula, &not_phi)?;
                self.complement_map(&eg)?
            }
            Formula::AG(phi) => {
                // AG φ = !EF !φ
                let phi = self.eval(phi, memo)?;
                let not_phi = self.complement_map(&phi)?;
                let ef = self.eval_ef(formula, &not_phi)?;
                self.complement_map(&ef)?
            }
            Formula::AU(phi, psi) => {
                // A[φ U ψ] = !(E[!ψ U (!φ && !ψ)] || EG !ψ)
                let phi = self.eval(phi, memo)?;
                let psi = self.eval(psi, memo)?;
                let not_phi = self.complement_map(&phi)?;
                let not_psi = self.complement_map(&psi)?;
                let both = self.zip_map(&not_phi, &not_psi, |s, a, b| s.intersect(a, b))?;
                let eu = self.eval_eu(formula, &not_psi, &both)?;
                let eg = self.eval_eg(formula, &not_psi)?;
                let either = self.zip_map(&eu, &eg, |s, a, b| s.union(a, b))?;
                self.complement_map(&either)?
            }
        };

        memo.insert(formula.clone(), result.clone());
        Ok(result)
    }

    fn constant_map(&self, value: SetOf<M>) -> StateMap<SetOf<M>> {
        StateMap::new(self.state_count(), value)
    }

    fn complement_map(&self, map: &StateMap<SetOf<M>>) -> Result<StateMap<SetOf<M>>> {
        let solver = self.solver();
        let universe = solver.universe();
        let mut result = self.constant_map(solver.empty());
        for (state, value) in map.iter() {
            result.set(state, solver.complement(value, &universe)?);
        }
        Ok(result)
    }

    fn zip_map(
        &self,
        a: &StateMap<SetOf<M>>,
        b: &StateMap<SetOf<M>>,
        op: impl Fn(&M::Solver, &SetOf<M>, &SetOf<M>) -> Result<SetOf<M>>,
    ) -> Result<StateMap<SetOf<M>>> {
        let solver = self.solver();
        let mut result = self.constant_map(solver.empty());
        for state in 0..self.state_count() {
            result.set(state, op(solver, a.get(state), b.get(state))?);
        }
        Ok(result)
    }

    /// One EX step for a single state: the parameters under which some
    /// successor is both reachable and in `map`.
    fn ex_value(&self, state: State, map: &StateMap<SetOf<M>>) -> Result<SetOf<M>> {
        let solver = self.solver();
        let mut value = solver.empty();
        for transition in &self.successors[state] {
            let reached = solver.intersect(&transition.enabling, map.get(transition.target))?;
            if !solver.is_empty(&reached) {
                value = solver.union(&value, &reached)?;
            }
        }
        Ok(value)
    }

    fn ex_map(&self, map: &StateMap<SetOf<M>>) -> Result<StateMap<SetOf<M>>> {
        let mut result = self.constant_map(self.solver().empty());
        for state in 0..self.state_count() {
            result.set(state, self.ex_value(state, map)?);
        }
        Ok(result)
    }

    /// Runs a fixed-point loop from `seed`.
    ///
    /// Per round, each dirty state's value is recomputed as
    /// `step(state, current value, EX value)`; states are marked dirty for
    /// the next round when a successor's value changed. Works for least and
    /// greatest fixed points alike: monotonicity of `step` is the caller's
    /// obligation, the driver only iterates until per-state equality.
    fn fixed_point(
        &self,
        formula: &Formula,
        seed: StateMap<SetOf<M>>,
        step: impl Fn(State, &SetOf<M>, &SetOf<M>) -> Result<SetOf<M>>,
    ) -> Result<StateMap<SetOf<M>>> {
        let solver = self.solver();
        let mut current = seed;
        let mut dirty: Vec<State> = (0..self.state_count()).collect();
        let mut rounds = 0;

        while !dirty.is_empty() {
            rounds += 1;
            if rounds > self.iteration_limit {
                return Err(CheckError::NonConvergence {
                    formula: formula.to_string(),
                    limit: self.iteration_limit,
                });
            }

            let mut changed = Vec::new();
            for &state in &dirty {
                let ex = self.ex_value(state, &current)?;
                let next = step(state, current.get(state), &ex)?;
                if !solver.equals(&next, current.get(state))? {
                    current.set(state, next);
                    changed.push(state);
                }
            }
            debug!(
                "fixed-point round {}: {} of {} dirty states changed",
                rounds,
                changed.len(),
                dirty.len()
            );

            dirty.clear();
            for &state in &changed {
                for &pred in &self.predecessors[state] {
                    if !dirty.contains(&pred) {
                        dirty.push(pred);
                    }
                }
            }
        }

        Ok(current)
    }

    /// EF φ: least fixed point `Z = φ ∨ EX Z`, seeded with φ.
    fn eval_ef(&self, formula: &Formula, phi: &StateMap<SetOf<M>>) -> Result<StateMap<SetOf<M>>> {
        let solver = self.solver();
        self.fixed_point(formula, phi.clone(), |_, old, ex| solver.union(old, ex))
    }

    /// EG φ: greatest fixed point `Z = φ ∧ EX Z`, seeded with φ.
    ///
    /// The current value is always a subset of φ (the seed), so intersecting
    /// with the EX value keeps the restriction to φ-states.
    fn eval_eg(&self, formula: &Formula, phi: &StateMap<SetOf<M>>) -> Result<StateMap<SetOf<M>>> {
        let solver = self.solver();
        self.fixed_point(formula, phi.clone(), |_, old, ex| solver.intersect(old, ex))
    }

    /// E[φ U ψ]: least fixed point `Z = ψ ∨ (φ ∧ EX Z)`, seeded with ψ.
    fn eval_eu(
        &self,
        formula: &Formula,
        phi: &StateMap<SetOf<M>>,
        psi: &StateMap<SetOf<M>>,
    ) -> Result<StateMap<SetOf<M>>> {
        let solver = self.solver();
        self.fixed_point(formula, psi.clone(), |state, old, ex| {
            // the seed already contributes ψ, so growing by φ ∧ EX Z
            // yields ψ ∨ (φ ∧ EX Z)
            let step = solver.intersect(phi.get(state), ex)?;
            solver.union(old, &step)
        })
    }
}
