//! Hybrid models: continuous modes joined by guarded discrete jumps.
//!
//! A [`HybridModel`] composes several [`GridModel`]s (one per mode, all over
//! the same discretization grid) into one transition model over a shared
//! state namespace. The namespace is partitioned by mode through the pure
//! mapping `global = mode * states_per_mode + local`; there is no shared
//! registry of modes, everything is owned by the model value.
//!
//! Successors of a hybrid state are the active mode's continuous successors
//! (translated into the global namespace) followed by jump successors whose
//! guard-derived enabling set, intersected with the jump's parameter
//! constraint, is non-empty.

use log::debug;

use crate::error::{CheckError, Result};
use crate::formula::Proposition;
use crate::model::{Dynamics, GridModel, Model, Transition};
use crate::solver::Solver;
use crate::types::{ModeId, State};

/// A discrete mode: a label plus the continuous model governing it.
pub struct HybridMode<S: Solver, D> {
    label: String,
    model: GridModel<S, D>,
}

impl<S: Solver, D: Dynamics<S::Set>> HybridMode<S, D> {
    pub fn new(label: impl Into<String>, model: GridModel<S, D>) -> Self {
        HybridMode {
            label: label.into(),
            model,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn model(&self) -> &GridModel<S, D> {
        &self.model
    }
}

/// A guarded jump between modes.
///
/// The guard maps a *local* source state to the parameter subset for which
/// the jump is allowed there; the jump is taken under
/// `guard(local) ∩ constraint`. Resets pin selected dimensions of the target
/// coordinates to fixed grid cells.
pub struct Jump<P> {
    pub from: ModeId,
    pub to: ModeId,
    guard: Box<dyn Fn(State) -> P>,
    constraint: P,
    resets: Vec<(usize, usize)>,
}

impl<P> Jump<P> {
    pub fn new(from: ModeId, to: ModeId, guard: impl Fn(State) -> P + 'static, constraint: P) -> Self {
        Jump {
            from,
            to,
            guard: Box::new(guard),
            constraint,
            resets: Vec::new(),
        }
    }

    /// Pins `(dimension, coordinate)` pairs of the target state.
    pub fn with_resets(mut self, resets: Vec<(usize, usize)>) -> Self {
        self.resets = resets;
        self
    }
}

/// Several continuous modes plus discrete jumps, as one transition model.
pub struct HybridModel<S: Solver, D> {
    solver: S,
    modes: Vec<HybridMode<S, D>>,
    jumps: Vec<Jump<S::Set>>,
    states_per_mode: usize,
}

impl<S: Solver, D> std::fmt::Debug for HybridModel<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridModel")
            .field("states_per_mode", &self.states_per_mode)
            .finish_non_exhaustive()
    }
}

impl<S: Solver, D: Dynamics<S::Set>> HybridModel<S, D> {
    /// Composes modes and jumps, validating consistency.
    ///
    /// All modes must share the discretization grid (so the per-mode state
    /// ranges are uniform) and the parameter dimension; jumps must reference
    /// existing modes and in-range reset coordinates.
    pub fn new(solver: S, modes: Vec<HybridMode<S, D>>, jumps: Vec<Jump<S::Set>>) -> Result<Self> {
        if modes.is_empty() {
            return Err(CheckError::invalid_model("at least one mode is required"));
        }
        let encoder = modes[0].model.encoder();
        for mode in &modes {
            if mode.model.encoder() != encoder {
                return Err(CheckError::invalid_model(format!(
                    "mode `{}` uses a different discretization grid",
                    mode.label
                )));
            }
            if mode.model.solver().dimension() != solver.dimension() {
                return Err(CheckError::DimensionMismatch {
                    expected: solver.dimension(),
                    found: mode.model.solver().dimension(),
                });
            }
        }
        for jump in &jumps {
            if jump.from >= modes.len() || jump.to >= modes.len() {
                return Err(CheckError::invalid_model(format!(
                    "jump references unknown mode {} -> {}",
                    jump.from, jump.to
                )));
            }
            for &(dimension, coordinate) in &jump.resets {
                if dimension >= encoder.dimensions() || coordinate >= encoder.count(dimension) {
                    return Err(CheckError::InvalidCoordinate {
                        dimension,
                        coordinate,
                        size: if dimension < encoder.dimensions() {
                            encoder.count(dimension)
                        } else {
                            0
                        },
                    });
                }
            }
        }
        let states_per_mode = encoder.state_count();
        Ok(HybridModel {
            solver,
            modes,
            jumps,
            states_per_mode,
        })
    }

    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    pub fn states_per_mode(&self) -> usize {
        self.states_per_mode
    }

    pub fn modes(&self) -> &[HybridMode<S, D>] {
        &self.modes
    }

    /// The mode id of a label, if declared.
    pub fn mode_id(&self, label: &str) -> Option<ModeId> {
        self.modes.iter().position(|m| m.label == label)
    }

    /// Pure partition function `(mode, local) -> global`.
    pub fn global_state(&self, mode: ModeId, local: State) -> Result<State> {
        if mode >= self.modes.len() {
            return Err(CheckError::invalid_model(format!("unknown mode id {}", mode)));
        }
        if local >= self.states_per_mode {
            return Err(CheckError::InvalidStateIndex {
                state: local,
                state_count: self.states_per_mode,
            });
        }
        Ok(mode * self.states_per_mode + local)
    }

    /// The mode a global state belongs to.
    pub fn mode_of(&self, state: State) -> Result<ModeId> {
        self.check_state(state)?;
        Ok(state / self.states_per_mode)
    }

    /// The local (within-mode) state of a global state.
    pub fn local_of(&self, state: State) -> Result<State> {
        self.check_state(state)?;
        Ok(state % self.states_per_mode)
    }

    /// The global-state range occupied by the named mode.
    pub fn mode_range(&self, label: &str) -> Result<std::ops::Range<State>> {
        let mode = self
            .mode_id(label)
            .ok_or_else(|| CheckError::malformed(format!("unknown mode `{}`", label)))?;
        let start = mode * self.states_per_mode;
        Ok(start..start + self.states_per_mode)
    }

    fn check_state(&self, state: State) -> Result<()> {
        let state_count = self.state_count();
        if state >= state_count {
            return Err(CheckError::InvalidStateIndex { state, state_count });
        }
        Ok(())
    }

    fn jump_target(&self, jump: &Jump<S::Set>, local: State) -> Result<State> {
        let encoder = self.modes[jump.to].model.encoder();
        let mut coords = encoder.decode(local)?;
        for &(dimension, coordinate) in &jump.resets {
            coords[dimension] = coordinate;
        }
        let target_local = encoder.encode(&coords)?;
        self.global_state(jump.to, target_local)
    }
}

impl<S: Solver, D: Dynamics<S::Set>> Model for HybridModel<S, D> {
    type Solver = S;

    fn solver(&self) -> &S {
        &self.solver
    }

    fn state_count(&self) -> usize {
        self.modes.len() * self.states_per_mode
    }

    fn successors(&self, state: State) -> Result<Vec<Transition<S::Set>>> {
        let mode = self.mode_of(state)?;
        let local = self.local_of(state)?;

        // continuous successors of the active mode, lifted into the global namespace
        let mut result = Vec::new();
        for transition in self.modes[mode].model.successors(local)? {
            result.push(Transition {
                target: self.global_state(mode, transition.target)?,
                enabling: transition.enabling,
            });
        }

        // discrete jumps out of this mode
        for jump in self.jumps.iter().filter(|j| j.from == mode) {
            let guard = (jump.guard)(local);
            let enabling = self.solver.intersect(&guard, &jump.constraint)?;
            if self.solver.is_empty(&enabling) {
                continue;
            }
            let target = self.jump_target(jump, local)?;
            debug!(
                "jump {} ({}) -> {} ({})",
                state,
                self.modes[jump.from].label,
                target,
                self.modes[jump.to].label
            );
            result.push(Transition { target, enabling });
        }

        Ok(result)
    }

    fn satisfies(&self, prop: &Proposition, state: State) -> Result<bool> {
        let mode = self.mode_of(state)?;
        let local = self.local_of(state)?;
        self.modes[mode].model.satisfies(prop, local)
    }

    fn in_mode(&self, label: &str, state: State) -> Result<bool> {
        let range = self.mode_range(label)?;
        self.check_state(state)?;
        Ok(range.contains(&state))
    }
}
