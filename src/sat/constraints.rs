//! Literals, clauses and the cardinality building blocks of the encoding

use itertools::Itertools;
use std::fmt;
use std::ops::Not;

/// A CNF variable, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(u32);

impl Var {
    /// Wrap a DIMACS variable number, which must be positive
    pub fn new(id: u32) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    /// The variable at zero-based position `index` in numbering order
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    pub fn id(self) -> u32 {
        self.0
    }

    pub fn positive(self) -> Lit {
        Lit(self.0 as i32)
    }

    pub fn negative(self) -> Lit {
        Lit(-(self.0 as i32))
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A variable together with its polarity, in DIMACS signed form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(i32);

impl Lit {
    /// Wrap a signed DIMACS literal; zero is the clause terminator, not a literal
    pub fn from_dimacs(value: i32) -> Option<Self> {
        (value != 0).then_some(Self(value))
    }

    pub fn var(self) -> Var {
        Var(self.0.unsigned_abs())
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn to_dimacs(self) -> i32 {
        self.0
    }
}

impl Not for Lit {
    type Output = Lit;

    fn not(self) -> Lit {
        Lit(-self.0)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<Lit>,
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<Lit>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: Lit) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: Lit, lit2: Lit) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// Whether the clause holds under `value`, which reports each variable's truth
    pub fn is_satisfied_by(&self, value: impl Fn(Var) -> bool) -> bool {
        self.literals
            .iter()
            .any(|&lit| value(lit.var()) == lit.is_positive())
    }
}

/// Pairwise encoding of "at most one of `literals` is true"
///
/// Produces one binary clause per pair, so a group of n literals costs
/// n(n-1)/2 clauses and no auxiliary variables.
pub fn at_most_one(literals: &[Lit]) -> Vec<Clause> {
    literals
        .iter()
        .tuple_combinations()
        .map(|(&a, &b)| Clause::binary(!a, !b))
        .collect()
}

/// "At least one of `literals` is true"; nothing for an empty group
pub fn at_least_one(literals: &[Lit]) -> Option<Clause> {
    (!literals.is_empty()).then(|| Clause::new(literals.to_vec()))
}

/// "Exactly one of `literals` is true"
pub fn exactly_one(literals: &[Lit]) -> Vec<Clause> {
    let mut clauses = at_most_one(literals);
    clauses.extend(at_least_one(literals));
    clauses
}

/// `a <-> b` as two binary clauses
pub fn equivalent(a: Lit, b: Lit) -> [Clause; 2] {
    [Clause::binary(!a, b), Clause::binary(!b, a)]
}
