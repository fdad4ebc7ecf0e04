//! DIMACS CNF text and solver model lines

use super::constraints::{Clause, Lit};
use super::solver::Assignment;
use crate::error::{Result, TilingError};
use std::fmt::Write;

/// Render a formula as DIMACS CNF
///
/// The output is a pure function of its inputs: a `p cnf` header followed by
/// one zero-terminated line per clause, in clause order.
pub fn to_dimacs(num_variables: usize, clauses: &[Clause]) -> String {
    let mut out = String::with_capacity(32 + clauses.len() * 16);
    // Writing into a String cannot fail
    let _ = writeln!(out, "p cnf {} {}", num_variables, clauses.len());
    for clause in clauses {
        for lit in &clause.literals {
            let _ = write!(out, "{} ", lit);
        }
        out.push_str("0\n");
    }
    out
}

/// Extract the model from a solver's standard output
///
/// Every line starting with `v` or `V` contributes signed literals until a
/// `0` terminates the model; other lines (`c` comments, the `s` status
/// line) are ignored.
pub fn parse_model(output: &str) -> Result<Assignment> {
    let mut assignment = Assignment::new();
    let mut terminated = false;
    let mut saw_value_line = false;

    for line in output.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('v').or_else(|| line.strip_prefix('V')) else {
            continue;
        };
        saw_value_line = true;

        for token in rest.split_whitespace() {
            let value: i32 = token.parse().map_err(|_| {
                TilingError::MalformedOutput(format!("invalid literal '{}' in model line", token))
            })?;
            match Lit::from_dimacs(value) {
                Some(lit) => assignment.set(lit.var(), lit.is_positive()),
                None => {
                    terminated = true;
                    break;
                }
            }
        }

        if terminated {
            break;
        }
    }

    if !saw_value_line {
        return Err(TilingError::MalformedOutput(
            "satisfiable result without a model line".to_string(),
        ));
    }
    if !terminated {
        return Err(TilingError::MalformedOutput(
            "model is not terminated by 0".to_string(),
        ));
    }

    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::constraints::Var;

    fn lit(v: i32) -> Lit {
        Lit::from_dimacs(v).unwrap()
    }

    #[test]
    fn test_dimacs_layout() {
        let clauses = vec![
            Clause::new(vec![lit(1), lit(-2)]),
            Clause::unit(lit(3)),
        ];
        assert_eq!(to_dimacs(3, &clauses), "p cnf 3 2\n1 -2 0\n3 0\n");
    }

    #[test]
    fn test_empty_formula() {
        assert_eq!(to_dimacs(0, &[]), "p cnf 0 0\n");
    }

    #[test]
    fn test_parse_single_line_model() {
        let output = "c some banner\ns SATISFIABLE\nv 1 -2 3 0\n";
        let assignment = parse_model(output).unwrap();
        assert_eq!(assignment.value(Var::new(1).unwrap()), Some(true));
        assert_eq!(assignment.value(Var::new(2).unwrap()), Some(false));
        assert_eq!(assignment.value(Var::new(3).unwrap()), Some(true));
        assert_eq!(assignment.len(), 3);
    }

    #[test]
    fn test_parse_split_model_lines() {
        let output = "s SATISFIABLE\nv -1 2\nV 3\nv -4 0\nv 5 0\n";
        let assignment = parse_model(output).unwrap();
        assert_eq!(assignment.len(), 4);
        assert!(assignment.is_true(Var::new(3).unwrap()));
        assert_eq!(assignment.value(Var::new(5).unwrap()), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_model("v 1 x 0\n"),
            Err(TilingError::MalformedOutput(_))
        ));
        assert!(matches!(
            parse_model("s SATISFIABLE\n"),
            Err(TilingError::MalformedOutput(_))
        ));
        assert!(matches!(
            parse_model("v 1 2\n"),
            Err(TilingError::MalformedOutput(_))
        ));
    }
}
