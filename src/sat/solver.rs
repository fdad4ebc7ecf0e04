//! The SAT solver boundary: an external DIMACS process or in-process CaDiCaL

use super::constraints::{Clause, Var};
use super::dimacs::{parse_model, to_dimacs};
use crate::error::{Result, TilingError};
use cadical::Solver;
use log::debug;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

/// Exit code a DIMACS solver uses to report a satisfiable formula
pub const EXIT_SATISFIABLE: i32 = 10;
/// Exit code a DIMACS solver uses to report an unsatisfiable formula
pub const EXIT_UNSATISFIABLE: i32 = 20;

/// Truth values reported by a solver, keyed by variable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    values: HashMap<Var, bool>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, var: Var, value: bool) {
        self.values.insert(var, value);
    }

    pub fn value(&self, var: Var) -> Option<bool> {
        self.values.get(&var).copied()
    }

    /// Unassigned variables read as false
    pub fn is_true(&self, var: Var) -> bool {
        self.value(var).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Variables assigned true, in ascending order
    pub fn true_variables(&self) -> Vec<Var> {
        let mut vars: Vec<Var> = self
            .values
            .iter()
            .filter_map(|(&var, &value)| value.then_some(var))
            .collect();
        vars.sort_unstable();
        vars
    }
}

impl FromIterator<(Var, bool)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (Var, bool)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Result of one solver call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverOutcome {
    Satisfiable(Assignment),
    Unsatisfiable,
}

/// Anything that can decide a CNF formula
///
/// `clauses` is the complete formula on every call. Callers only ever append
/// to it between calls, which incremental backends may rely on.
pub trait SatSolver {
    fn solve(&mut self, num_variables: usize, clauses: &[Clause]) -> Result<SolverOutcome>;

    fn name(&self) -> &str;
}

/// A solver binary fed DIMACS on stdin
///
/// Exit code 10 means satisfiable with a `v` model on stdout, 20 means
/// unsatisfiable; every other status is a failure. The program is executed
/// directly with its argument list, never through a shell.
#[derive(Debug, Clone)]
pub struct ExternalSolver {
    program: PathBuf,
    args: Vec<String>,
}

impl ExternalSolver {
    pub fn new<P: AsRef<Path>>(program: P) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Apply the exit-code contract to a finished solver run
    pub fn interpret(code: Option<i32>, stdout: &str, stderr: &str) -> Result<SolverOutcome> {
        match code {
            Some(EXIT_SATISFIABLE) => Ok(SolverOutcome::Satisfiable(parse_model(stdout)?)),
            Some(EXIT_UNSATISFIABLE) => Ok(SolverOutcome::Unsatisfiable),
            Some(other) => Err(TilingError::SolverFailure {
                status: format!("exit code {}", other),
                stderr: stderr.trim().to_string(),
            }),
            None => Err(TilingError::SolverFailure {
                status: "termination by signal".to_string(),
                stderr: stderr.trim().to_string(),
            }),
        }
    }
}

impl SatSolver for ExternalSolver {
    fn solve(&mut self, num_variables: usize, clauses: &[Clause]) -> Result<SolverOutcome> {
        let start_time = Instant::now();
        let dimacs = to_dimacs(num_variables, clauses);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Feed stdin from a separate thread so a solver that starts printing
        // before it has read everything cannot deadlock us.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("solver stdin was not captured"))?;
        let writer = std::thread::spawn(move || stdin.write_all(dimacs.as_bytes()));

        let output = child.wait_with_output()?;
        let write_result = writer
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(
            "{} finished with {} after {:.3}s",
            self.program.display(),
            output.status,
            start_time.elapsed().as_secs_f64()
        );

        let outcome = Self::interpret(output.status.code(), &stdout, &stderr)?;
        write_result?;
        Ok(outcome)
    }

    fn name(&self) -> &str {
        "external"
    }
}

/// In-process CaDiCaL backend
///
/// Incremental: each call only hands the solver the clauses appended since
/// the previous call.
pub struct CadicalSolver {
    solver: Solver,
    submitted: usize,
}

impl CadicalSolver {
    /// Create a new SAT solver instance
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            submitted: 0,
        }
    }

    /// Number of clauses handed to the solver so far
    pub fn clause_count(&self) -> usize {
        self.submitted
    }

    /// Reset the solver (clear all clauses)
    pub fn reset(&mut self) {
        self.solver = Solver::new();
        self.submitted = 0;
    }
}

impl Default for CadicalSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SatSolver for CadicalSolver {
    fn solve(&mut self, num_variables: usize, clauses: &[Clause]) -> Result<SolverOutcome> {
        if clauses.len() < self.submitted {
            // A different formula; the solver cannot forget clauses
            self.reset();
        }

        for clause in &clauses[self.submitted..] {
            self.solver
                .add_clause(clause.literals.iter().map(|lit| lit.to_dimacs()));
        }
        self.submitted = clauses.len();

        let start_time = Instant::now();
        let result = self.solver.solve();
        debug!(
            "cadical answered {:?} after {:.3}s",
            result,
            start_time.elapsed().as_secs_f64()
        );

        match result {
            Some(true) => {
                let assignment = (0..num_variables)
                    .map(Var::from_index)
                    .filter_map(|var| {
                        self.solver
                            .value(var.id() as i32)
                            .map(|value| (var, value))
                    })
                    .collect();
                Ok(SolverOutcome::Satisfiable(assignment))
            }
            Some(false) => Ok(SolverOutcome::Unsatisfiable),
            None => Err(TilingError::SolverFailure {
                status: "cadical gave up without an answer".to_string(),
                stderr: String::new(),
            }),
        }
    }

    fn name(&self) -> &str {
        "cadical"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::constraints::Lit;

    fn lit(v: i32) -> Lit {
        Lit::from_dimacs(v).unwrap()
    }

    fn var(v: u32) -> Var {
        Var::new(v).unwrap()
    }

    #[test]
    fn test_assignment_accessors() {
        let assignment: Assignment = [(var(2), true), (var(1), false), (var(5), true)]
            .into_iter()
            .collect();
        assert_eq!(assignment.true_variables(), vec![var(2), var(5)]);
        assert!(!assignment.is_true(var(1)));
        assert!(!assignment.is_true(var(9)));
        assert_eq!(assignment.value(var(9)), None);
    }

    #[test]
    fn test_exit_code_contract() {
        let sat = ExternalSolver::interpret(Some(10), "s SATISFIABLE\nv 1 -2 0\n", "").unwrap();
        match sat {
            SolverOutcome::Satisfiable(assignment) => {
                assert!(assignment.is_true(var(1)));
                assert!(!assignment.is_true(var(2)));
            }
            SolverOutcome::Unsatisfiable => panic!("expected a model"),
        }

        let unsat = ExternalSolver::interpret(Some(20), "s UNSATISFIABLE\n", "").unwrap();
        assert_eq!(unsat, SolverOutcome::Unsatisfiable);

        let failure = ExternalSolver::interpret(Some(1), "", "parse error\n");
        match failure {
            Err(TilingError::SolverFailure { status, stderr }) => {
                assert_eq!(status, "exit code 1");
                assert_eq!(stderr, "parse error");
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(ExternalSolver::interpret(None, "", "").is_err());
        assert!(matches!(
            ExternalSolver::interpret(Some(10), "s SATISFIABLE\n", ""),
            Err(TilingError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let mut solver = ExternalSolver::new("/nonexistent/solver-binary");
        let result = solver.solve(1, &[Clause::unit(lit(1))]);
        assert!(matches!(result, Err(TilingError::SolverIo(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_external_script_round_trip() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-solver.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\ncat > /dev/null\necho 's SATISFIABLE'\necho 'v -1 2 0'\nexit 10\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut solver = ExternalSolver::new(&script);
        let outcome = solver.solve(2, &[Clause::binary(lit(1), lit(2))]).unwrap();
        match outcome {
            SolverOutcome::Satisfiable(assignment) => {
                assert!(assignment.is_true(var(2)));
                assert!(!assignment.is_true(var(1)));
            }
            SolverOutcome::Unsatisfiable => panic!("expected a model"),
        }
    }

    #[test]
    fn test_cadical_satisfiable() {
        let mut solver = CadicalSolver::new();

        // (x1 ∨ x2) ∧ (¬x1 ∨ x2)
        let clauses = vec![
            Clause::new(vec![lit(1), lit(2)]),
            Clause::new(vec![lit(-1), lit(2)]),
        ];

        match solver.solve(2, &clauses).unwrap() {
            SolverOutcome::Satisfiable(assignment) => assert!(assignment.is_true(var(2))),
            SolverOutcome::Unsatisfiable => panic!("formula is satisfiable"),
        }
    }

    #[test]
    fn test_cadical_unsatisfiable() {
        let mut solver = CadicalSolver::new();
        let clauses = vec![Clause::unit(lit(1)), Clause::unit(lit(-1))];
        assert_eq!(solver.solve(1, &clauses).unwrap(), SolverOutcome::Unsatisfiable);
    }

    #[test]
    fn test_cadical_is_incremental() {
        let mut solver = CadicalSolver::new();
        let mut clauses = vec![Clause::new(vec![lit(1), lit(2)])];
        assert!(matches!(
            solver.solve(2, &clauses).unwrap(),
            SolverOutcome::Satisfiable(_)
        ));
        assert_eq!(solver.clause_count(), 1);

        clauses.push(Clause::unit(lit(-1)));
        clauses.push(Clause::unit(lit(-2)));
        assert_eq!(solver.solve(2, &clauses).unwrap(), SolverOutcome::Unsatisfiable);
        assert_eq!(solver.clause_count(), 3);
    }
}
