//! All-SAT enumeration: solve, decode, block, repeat

use super::Tiling;
use crate::error::{Result, TilingError};
use crate::sat::encoder::CnfEncoder;
use crate::sat::solver::{SatSolver, SolverOutcome};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Where the driver is in its solve/decode/block cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Between steps; the clause list is valid CNF
    Idle,
    AwaitingSolver,
    Decoding,
    Blocking,
    /// Terminal, after UNSAT, the solution cap, or a fatal error
    Done,
}

/// What a single step produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Found(Tiling),
    /// The model decoded to an already recorded tiling
    Duplicate,
    /// The solver reported UNSAT: every tiling has been found
    Exhausted,
    LimitReached,
}

/// Summary of a finished enumeration
#[derive(Debug, Clone)]
pub struct EnumerationResult {
    pub tilings: Vec<Tiling>,
    pub duplicates: usize,
    pub solver_calls: usize,
    /// True when the solver proved no further tiling exists
    pub exhausted: bool,
    pub elapsed: Duration,
}

/// Drives one encoder and one solver through the All-SAT loop
pub struct EnumerationDriver<S: SatSolver> {
    encoder: CnfEncoder,
    solver: S,
    state: DriverState,
    seen: HashSet<Tiling>,
    tilings: Vec<Tiling>,
    duplicates: usize,
    solver_calls: usize,
    exhausted: bool,
    max_solutions: Option<usize>,
}

impl<S: SatSolver> EnumerationDriver<S> {
    pub fn new(encoder: CnfEncoder, solver: S) -> Self {
        Self {
            encoder,
            solver,
            state: DriverState::Idle,
            seen: HashSet::new(),
            tilings: Vec::new(),
            duplicates: 0,
            solver_calls: 0,
            exhausted: false,
            max_solutions: None,
        }
    }

    /// Stop after `limit` distinct tilings
    pub fn with_max_solutions(mut self, limit: Option<usize>) -> Self {
        self.max_solutions = limit;
        self
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn encoder(&self) -> &CnfEncoder {
        &self.encoder
    }

    /// Distinct tilings recorded so far, in discovery order
    pub fn tilings(&self) -> &[Tiling] {
        &self.tilings
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn solver_calls(&self) -> usize {
        self.solver_calls
    }

    /// Run one solver call and process its answer
    ///
    /// Any error is fatal: the driver moves to `Done` and every later step
    /// reports the terminal outcome without calling the solver again.
    pub fn step(&mut self) -> Result<StepOutcome> {
        if self.state == DriverState::Done {
            return Ok(self.terminal_outcome());
        }
        if self
            .max_solutions
            .is_some_and(|limit| self.tilings.len() >= limit)
        {
            info!("Stopping after {} tilings", self.tilings.len());
            self.state = DriverState::Done;
            return Ok(StepOutcome::LimitReached);
        }

        self.state = DriverState::AwaitingSolver;
        self.solver_calls += 1;
        debug!(
            "Solver call {} ({}): {} variables, {} clauses",
            self.solver_calls,
            self.solver.name(),
            self.encoder.num_variables(),
            self.encoder.num_clauses()
        );
        let outcome = self
            .solver
            .solve(self.encoder.num_variables(), self.encoder.clauses());
        let assignment = match outcome {
            Ok(SolverOutcome::Satisfiable(assignment)) => assignment,
            Ok(SolverOutcome::Unsatisfiable) => {
                self.state = DriverState::Done;
                self.exhausted = true;
                info!(
                    "Enumeration complete: {} tilings, {} duplicates, {} solver calls",
                    self.tilings.len(),
                    self.duplicates,
                    self.solver_calls
                );
                return Ok(StepOutcome::Exhausted);
            }
            Err(err) => return self.fail(err),
        };

        self.state = DriverState::Decoding;
        let tiling = match self.encoder.decode(&assignment) {
            Ok(tiling) => tiling,
            Err(err) => return self.fail(err),
        };

        self.state = DriverState::Blocking;
        if let Err(err) = self.encoder.block(&assignment) {
            return self.fail(err);
        }
        self.state = DriverState::Idle;

        if self.seen.insert(tiling.clone()) {
            debug!("Tiling {} found", self.tilings.len() + 1);
            self.tilings.push(tiling.clone());
            Ok(StepOutcome::Found(tiling))
        } else {
            self.duplicates += 1;
            warn!("Solver returned an already recorded tiling");
            Ok(StepOutcome::Duplicate)
        }
    }

    /// Step until the solver reports UNSAT or the solution cap is hit
    pub fn run(&mut self) -> Result<EnumerationResult> {
        let start_time = Instant::now();

        loop {
            match self.step()? {
                StepOutcome::Found(_) | StepOutcome::Duplicate => continue,
                StepOutcome::Exhausted | StepOutcome::LimitReached => break,
            }
        }

        Ok(EnumerationResult {
            tilings: self.tilings.clone(),
            duplicates: self.duplicates,
            solver_calls: self.solver_calls,
            exhausted: self.exhausted,
            elapsed: start_time.elapsed(),
        })
    }

    fn terminal_outcome(&self) -> StepOutcome {
        if self.exhausted {
            StepOutcome::Exhausted
        } else {
            StepOutcome::LimitReached
        }
    }

    fn fail<T>(&mut self, err: TilingError) -> Result<T> {
        self.state = DriverState::Done;
        Err(err)
    }
}
