//! Parametrized transition models.
//!
//! A [`Model`] is a parametrized transition system: per state, a finite set
//! of `(target, enabling parameter set)` pairs, plus satisfaction of atomic
//! propositions. [`GridModel`] is the continuous-dynamics instance: states
//! are grid cells, and a transition across a facet is enabled exactly for the
//! parameter subset where the externally supplied [`Dynamics`] oracle
//! indicates outward flow.

use std::cell::RefCell;

use log::debug;

use crate::encoder::GridEncoder;
use crate::error::{CheckError, Result};
use crate::formula::Proposition;
use crate::solver::Solver;
use crate::types::{Direction, State};

/// One outgoing transition, enabled for the `enabling` parameter subset.
///
/// The enabling set may be the full universe (unconditional) or empty
/// (never taken); models are free to omit empty-enabling transitions.
#[derive(Debug, Clone)]
pub struct Transition<P> {
    pub target: State,
    pub enabling: P,
}

/// External dynamics-sign oracle.
///
/// `facet_flow` returns the parameter subset for which the continuous flow
/// points *outward* across the given facet of the given cell. How that set is
/// derived (sign of the derivative at facet vertices, interval evaluation,
/// ...) is the model producer's concern; the engine treats it as opaque.
pub trait Dynamics<P> {
    fn facet_flow(&self, state: State, dimension: usize, direction: Direction) -> P;
}

impl<P, F> Dynamics<P> for F
where
    F: Fn(State, usize, Direction) -> P,
{
    fn facet_flow(&self, state: State, dimension: usize, direction: Direction) -> P {
        self(state, dimension, direction)
    }
}

impl<P> Dynamics<P> for Box<dyn Dynamics<P>> {
    fn facet_flow(&self, state: State, dimension: usize, direction: Direction) -> P {
        (**self).facet_flow(state, dimension, direction)
    }
}

/// A parametrized transition system the checker can evaluate formulas on.
pub trait Model {
    type Solver: Solver;

    /// The parameter-set algebra shared by all enabling sets of this model.
    fn solver(&self) -> &Self::Solver;

    /// Total number of states; valid ids are `[0, state_count)`.
    fn state_count(&self) -> usize;

    /// All outgoing transitions of `state` with non-empty enabling sets.
    fn successors(&self, state: State) -> Result<Vec<Transition<SetOf<Self>>>>;

    /// Whether `state` satisfies the atomic proposition.
    fn satisfies(&self, prop: &Proposition, state: State) -> Result<bool>;

    /// Whether `state` belongs to the named mode.
    ///
    /// Models without modes reject every mode predicate.
    fn in_mode(&self, label: &str, state: State) -> Result<bool> {
        let _ = state;
        Err(CheckError::malformed(format!(
            "mode predicate `{}` on a model without modes",
            label
        )))
    }
}

/// The parameter-set type of a model.
pub type SetOf<M> = <<M as Model>::Solver as Solver>::Set;

/// Grid transition model over a dynamics oracle.
///
/// Successor enumeration is bounded by `2 * D` per state: one candidate per
/// facet, kept only when the neighbor exists and the oracle's outward-flow
/// set is non-empty. Facet enabling sets are computed once and cached.
pub struct GridModel<S: Solver, D> {
    solver: S,
    encoder: GridEncoder,
    dynamics: D,
    // (state, dimension, direction) -> enabling set; None = not yet computed
    facet_cache: RefCell<Vec<Option<S::Set>>>,
}

impl<S: Solver, D: Dynamics<S::Set>> GridModel<S, D> {
    pub fn new(solver: S, encoder: GridEncoder, dynamics: D) -> Self {
        let slots = encoder.state_count() * encoder.dimensions() * 2;
        GridModel {
            solver,
            encoder,
            dynamics,
            facet_cache: RefCell::new(vec![None; slots]),
        }
    }

    pub fn encoder(&self) -> &GridEncoder {
        &self.encoder
    }

    fn facet_index(&self, state: State, dimension: usize, direction: Direction) -> usize {
        (state * self.encoder.dimensions() + dimension) * 2 + direction.index()
    }

    /// The cached outward-flow enabling set for one facet.
    pub fn facet_enabling(&self, state: State, dimension: usize, direction: Direction) -> S::Set {
        let index = self.facet_index(state, dimension, direction);
        if let Some(cached) = &self.facet_cache.borrow()[index] {
            return cached.clone();
        }
        let enabling = self.dynamics.facet_flow(state, dimension, direction);
        self.facet_cache.borrow_mut()[index] = Some(enabling.clone());
        enabling
    }
}

impl<S: Solver, D: Dynamics<S::Set>> Model for GridModel<S, D> {
    type Solver = S;

    fn solver(&self) -> &S {
        &self.solver
    }

    fn state_count(&self) -> usize {
        self.encoder.state_count()
    }

    fn successors(&self, state: State) -> Result<Vec<Transition<S::Set>>> {
        let mut result = Vec::new();
        for dimension in 0..self.encoder.dimensions() {
            for direction in Direction::BOTH {
                let Some(target) = self.encoder.neighbor(state, dimension, direction)? else {
                    continue;
                };
                let enabling = self.facet_enabling(state, dimension, direction);
                if !self.solver.is_empty(&enabling) {
                    debug!("successor {} -{}{}-> {}", state, direction, dimension, target);
                    result.push(Transition { target, enabling });
                }
            }
        }
        Ok(result)
    }

    fn satisfies(&self, prop: &Proposition, state: State) -> Result<bool> {
        if prop.dimension >= self.encoder.dimensions() {
            return Err(CheckError::DimensionMismatch {
                expected: self.encoder.dimensions(),
                found: prop.dimension,
            });
        }
        if prop.cut > self.encoder.count(prop.dimension) {
            return Err(CheckError::malformed(format!(
                "proposition cut {} outside dimension {} (size {})",
                prop.cut,
                prop.dimension,
                self.encoder.count(prop.dimension)
            )));
        }
        let coordinate = self.encoder.coordinate(state, prop.dimension)?;
        Ok(if prop.above {
            coordinate >= prop.cut
        } else {
            coordinate < prop.cut
        })
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::rect::Rectangle;
    use crate::solver::{ParamSet, RectSolver};

    fn universe() -> Rectangle {
        Rectangle::new(vec![-1.0], vec![1.0])
    }

    // 1D line of 3 cells with rightward flow everywhere.
    fn line_model() -> GridModel<RectSolver, impl Dynamics<ParamSet>> {
        let solver = RectSolver::new(universe());
        let all = solver.universe();
        let none = solver.empty();
        GridModel::new(
            solver,
            GridEncoder::new(vec![3]),
            move |_state: State, _dim: usize, dir: Direction| match dir {
                Direction::Positive => all.clone(),
                Direction::Negative => none.clone(),
            },
        )
    }

    #[test]
    fn test_line_successors() {
        let model = line_model();
        let s = model.solver().clone();

        let succ0 = model.successors(0).unwrap();
        assert_eq!(succ0.len(), 1);
        assert_eq!(succ0[0].target, 1);
        assert!(s.equals(&succ0[0].enabling, &s.universe()).unwrap());

        let succ1 = model.successors(1).unwrap();
        assert_eq!(succ1.len(), 1);
        assert_eq!(succ1[0].target, 2);

        // rightmost cell has no outgoing facet with a neighbor
        assert!(model.successors(2).unwrap().is_empty());
    }

    #[test]
    fn test_empty_enabling_suppressed() {
        let solver = RectSolver::new(universe());
        let none = solver.empty();
        let model = GridModel::new(
            solver,
            GridEncoder::new(vec![2]),
            move |_: State, _: usize, _: Direction| none.clone(),
        );
        assert!(model.successors(0).unwrap().is_empty());
        assert!(model.successors(1).unwrap().is_empty());
    }

    #[test]
    fn test_satisfies() {
        let model = line_model();
        let above = Proposition::new(0, 2, true);
        assert!(!model.satisfies(&above, 0).unwrap());
        assert!(!model.satisfies(&above, 1).unwrap());
        assert!(model.satisfies(&above, 2).unwrap());

        let below = Proposition::new(0, 2, false);
        assert!(model.satisfies(&below, 0).unwrap());
        assert!(!model.satisfies(&below, 2).unwrap());
    }

    #[test]
    fn test_satisfies_bad_dimension() {
        let model = line_model();
        let bad = Proposition::new(5, 0, true);
        assert!(matches!(
            model.satisfies(&bad, 0).unwrap_err(),
            CheckError::DimensionMismatch { .. }
        ));
    }

    #[test]
    fn test_mode_predicate_rejected() {
        let model = line_model();
        assert!(matches!(
            model.in_mode("on", 0).unwrap_err(),
            CheckError::MalformedFormula { .. }
        ));
    }

    #[test]
    fn test_facet_cache_returns_same_set() {
        let model = line_model();
        let s = model.solver().clone();
        let first = model.facet_enabling(1, 0, Direction::Positive);
        let second = model.facet_enabling(1, 0, Direction::Positive);
        assert!(s.equals(&first, &second).unwrap());
    }
}
