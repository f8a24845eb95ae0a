//! Two-mode thermostat scenario: parameter synthesis across discrete jumps.
//!
//! Mode "on" heats (temperature flows upward), mode "off" cools. The heater
//! switches off at the top temperature cell and back on at the bottom one;
//! the off-switch works only for part of the parameter space.

use huctl_rs::checker::ModelChecker;
use huctl_rs::encoder::GridEncoder;
use huctl_rs::formula::Formula;
use huctl_rs::hybrid::{HybridMode, HybridModel, Jump};
use huctl_rs::model::{Dynamics, GridModel, Model};
use huctl_rs::rect::Rectangle;
use huctl_rs::solver::{ParamSet, RectSolver, Solver};
use huctl_rs::types::{Direction, State};

const CELLS: usize = 4;

type BoxedDynamics = Box<dyn Dynamics<ParamSet>>;

fn solver() -> RectSolver {
    RectSolver::new(Rectangle::new(vec![0.0], vec![1.0]))
}

fn set(lo: f64, hi: f64) -> ParamSet {
    ParamSet::from_rectangles(1, [Rectangle::new(vec![lo], vec![hi])]).unwrap()
}

fn directed_mode(label: &str, heating: bool) -> HybridMode<RectSolver, BoxedDynamics> {
    let s = solver();
    let all = s.universe();
    let none = s.empty();
    let dynamics: BoxedDynamics = Box::new(move |_: State, _: usize, dir: Direction| {
        let outward = match dir {
            Direction::Positive => heating,
            Direction::Negative => !heating,
        };
        if outward {
            all.clone()
        } else {
            none.clone()
        }
    });
    HybridMode::new(label, GridModel::new(s, GridEncoder::new(vec![CELLS]), dynamics))
}

/// `switch_off`: parameter constraint of the on -> off jump.
fn thermostat(switch_off: ParamSet) -> HybridModel<RectSolver, BoxedDynamics> {
    let s = solver();
    let all = s.universe();
    let none = s.empty();
    let at_top = {
        let (all, none) = (all.clone(), none.clone());
        move |local: State| if local == CELLS - 1 { all.clone() } else { none.clone() }
    };
    let at_bottom = move |local: State| if local == 0 { all.clone() } else { none.clone() };
    HybridModel::new(
        s,
        vec![directed_mode("on", true), directed_mode("off", false)],
        vec![
            Jump::new(0, 1, at_top, switch_off),
            Jump::new(1, 0, at_bottom, solver().universe()),
        ],
    )
    .unwrap()
}

#[test]
fn cooling_reachable_only_where_switch_works() {
    let model = thermostat(set(0.5, 1.0));
    let checker = ModelChecker::new(&model).unwrap();
    let s = model.solver();

    let result = checker.verify(&Formula::mode("off").ef()).unwrap();
    // every "on" state heats up to the top and can jump, but only for the
    // parameters where the off-switch is allowed
    for state in model.mode_range("on").unwrap() {
        assert!(s.equals(result.get(state), &set(0.5, 1.0)).unwrap());
    }
    // "off" states satisfy the predicate outright
    for state in model.mode_range("off").unwrap() {
        assert!(s.equals(result.get(state), &s.universe()).unwrap());
    }
}

#[test]
fn mode_predicate_negation() {
    let model = thermostat(solver().universe());
    let checker = ModelChecker::new(&model).unwrap();
    let s = model.solver();

    let result = checker.verify(&Formula::mode("on").not()).unwrap();
    for state in model.mode_range("on").unwrap() {
        assert!(s.is_empty(result.get(state)));
    }
    for state in model.mode_range("off").unwrap() {
        assert!(s.equals(result.get(state), &s.universe()).unwrap());
    }
}

#[test]
fn thermostat_cycles_forever() {
    // with a working switch everywhere, the hybrid system loops on/off
    // indefinitely, so "the heater is on infinitely often" (AG EF on) holds
    // for the whole parameter space
    let model = thermostat(solver().universe());
    let checker = ModelChecker::new(&model).unwrap();
    let s = model.solver();

    let result = checker.verify(&Formula::mode("on").ef().ag()).unwrap();
    for state in 0..model.state_count() {
        assert!(s.equals(result.get(state), &s.universe()).unwrap());
    }
}

#[test]
fn broken_switch_strands_the_heater() {
    // with an always-empty switch constraint the "on" mode can never leave
    let model = thermostat(solver().empty());
    let checker = ModelChecker::new(&model).unwrap();
    let s = model.solver();

    let result = checker.verify(&Formula::mode("off").ef()).unwrap();
    for state in model.mode_range("on").unwrap() {
        assert!(s.is_empty(result.get(state)));
    }
}

#[test]
fn top_cell_keeps_heat_under_broken_switch() {
    // EG (mode == on): with no jump and upward flow, only runs that get
    // stuck at the top... which has no successor at all, so EG is empty.
    let model = thermostat(solver().empty());
    let checker = ModelChecker::new(&model).unwrap();
    let s = model.solver();

    let result = checker.verify(&Formula::mode("on").eg()).unwrap();
    for state in model.mode_range("on").unwrap() {
        assert!(s.is_empty(result.get(state)));
    }
}

#[test]
fn unknown_mode_label_fails() {
    let model = thermostat(solver().universe());
    let checker = ModelChecker::new(&model).unwrap();
    assert!(checker.verify(&Formula::mode("idle").ef()).is_err());
}
