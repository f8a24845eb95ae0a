//! # huctl-rs: Parameter Synthesis for Hybrid Dynamical Systems
//!
//! **`huctl-rs`** is a symbolic model-checking engine for parameter synthesis:
//! given a discretized state-transition model whose transitions are enabled
//! only under certain continuous-parameter valuations, and a HUCTL formula,
//! it computes for every discrete state the exact set of parameter valuations
//! for which the formula holds.
//!
//! ## How it works
//!
//! Parameter subsets are represented symbolically as finite unions of
//! axis-aligned hyperrectangles, kept canonical (disjoint, merged) so that
//! emptiness, inclusion, and equality are cheap structural questions. The
//! checker evaluates a formula bottom-up: boolean connectives combine
//! per-state sets through the [`Solver`][crate::solver::Solver] algebra, and
//! temporal operators (EX, EF, EG, EU and their A-duals) run fixed-point
//! iteration over the transition model, terminating on per-state set
//! equality.
//!
//! ## Key components
//!
//! - **[`solver`]**: the parameter-set algebra. The checker is generic over
//!   the [`Solver`][crate::solver::Solver] contract, so non-rectangular
//!   representations can be substituted.
//! - **[`encoder`]**: the bijection between grid coordinates and dense state
//!   identifiers, plus facet adjacency.
//! - **[`model`]**: the transition-model abstraction and the grid model
//!   driven by an external dynamics oracle.
//! - **[`hybrid`]**: composition of continuous modes and guarded discrete
//!   jumps into one model over a mode-partitioned state namespace.
//! - **[`checker`]**: the memoized fixed-point evaluator behind
//!   [`verify`][crate::checker::ModelChecker::verify].
//!
//! ## Basic Usage
//!
//! ```rust
//! use huctl_rs::checker::ModelChecker;
//! use huctl_rs::encoder::GridEncoder;
//! use huctl_rs::formula::Formula;
//! use huctl_rs::model::{GridModel, Model};
//! use huctl_rs::rect::Rectangle;
//! use huctl_rs::solver::{RectSolver, Solver};
//! use huctl_rs::types::{Direction, State};
//!
//! // 1. A solver over the parameter box [-1, 1]
//! let solver = RectSolver::new(Rectangle::new(vec![-1.0], vec![1.0]));
//!
//! // 2. A 1D grid of two cells whose flow always points upward
//! let all = solver.universe();
//! let none = solver.empty();
//! let model = GridModel::new(
//!     solver,
//!     GridEncoder::new(vec![2]),
//!     move |_: State, _: usize, dir: Direction| match dir {
//!         Direction::Positive => all.clone(),
//!         Direction::Negative => none.clone(),
//!     },
//! );
//!
//! // 3. Synthesize parameters for "the upper cell is reachable"
//! let checker = ModelChecker::new(&model).unwrap();
//! let result = checker.verify(&Formula::prop(0, 1, true).ef()).unwrap();
//!
//! // 4. Both states can reach it for every parameter valuation
//! let s = model.solver();
//! assert!(s.equals(result.get(0), &s.universe()).unwrap());
//! assert!(s.equals(result.get(1), &s.universe()).unwrap());
//! ```

pub mod checker;
pub mod encoder;
pub mod error;
pub mod formula;
pub mod hybrid;
pub mod model;
pub mod rect;
pub mod solver;
pub mod state_map;
pub mod types;
