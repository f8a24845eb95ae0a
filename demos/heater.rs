//! Parameter synthesis for a two-mode thermostat.
//!
//! The heater's "on" mode warms the room, the "off" mode cools it. The
//! switch-off jump only works for part of the parameter space; the demo
//! synthesizes, per state, the parameters under which the room can cool
//! down (`EF (mode == off)`).

use clap::Parser;
use log::info;

use huctl_rs::checker::ModelChecker;
use huctl_rs::encoder::GridEncoder;
use huctl_rs::formula::Formula;
use huctl_rs::hybrid::{HybridMode, HybridModel, Jump};
use huctl_rs::model::{Dynamics, GridModel, Model};
use huctl_rs::rect::Rectangle;
use huctl_rs::solver::{ParamSet, RectSolver, Solver};
use huctl_rs::types::{Direction, State};

#[derive(Parser)]
struct Args {
    /// Number of temperature cells per mode.
    #[arg(long, default_value_t = 8)]
    cells: usize,

    /// Lower bound of the parameter range where the off-switch works.
    #[arg(long, default_value_t = 0.5)]
    switch_from: f64,
}

type BoxedDynamics = Box<dyn Dynamics<ParamSet>>;

fn directed_mode(
    solver: RectSolver,
    label: &str,
    cells: usize,
    heating: bool,
) -> HybridMode<RectSolver, BoxedDynamics> {
    let all = solver.universe();
    let none = solver.empty();
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
    HybridMode::new(
        label,
        GridModel::new(solver, GridEncoder::new(vec![cells]), dynamics),
    )
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Args::parse();

    let solver = RectSolver::new(Rectangle::new(vec![0.0], vec![1.0]));
    let switch_off =
        ParamSet::from_rectangles(1, [Rectangle::new(vec![args.switch_from], vec![1.0])])?;

    let cells = args.cells;
    let all = solver.universe();
    let none = solver.empty();
    let at_top = {
        let (all, none) = (all.clone(), none.clone());
        move |local: State| if local == cells - 1 { all.clone() } else { none.clone() }
    };
    let at_bottom = move |local: State| if local == 0 { all.clone() } else { none.clone() };

    let model = HybridModel::new(
        solver.clone(),
        vec![
            directed_mode(solver.clone(), "on", cells, true),
            directed_mode(solver.clone(), "off", cells, false),
        ],
        vec![
            Jump::new(0, 1, at_top, switch_off),
            Jump::new(1, 0, at_bottom, solver.universe()),
        ],
    )?;
    info!("thermostat model with {} states", model.state_count());

    let formula = Formula::mode("off").ef();
    info!("verifying {}", formula);

    let checker = ModelChecker::new(&model)?;
    let result = checker.verify(&formula)?;

    for (state, params) in result.iter() {
        let mode = if model.in_mode("on", state)? { "on" } else { "off" };
        let cell = model.local_of(state)?;
        println!("state {:3} (mode {:3}, cell {:2}) holds for {}", state, mode, cell, params);
    }

    Ok(())
}
