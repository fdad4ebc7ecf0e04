//! Variable management for SAT encoding

use super::constraints::Var;
use crate::error::{Result, TilingError};
use std::collections::HashMap;

/// "Board cell (row, col) holds part `part` of an instance of piece `piece`"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlacementLiteral {
    pub row: usize,
    pub col: usize,
    pub piece: usize,
    pub part: usize,
}

impl PlacementLiteral {
    pub fn new(row: usize, col: usize, piece: usize, part: usize) -> Self {
        Self { row, col, piece, part }
    }
}

/// Types of variables used in the SAT encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    Placement(PlacementLiteral),
}

/// Bijection between encoding variables and DIMACS variable numbers
///
/// Numbers are dense and start at 1. [`VariableSpace::for_board`] allocates
/// every placement literal up front in row-major, then piece, then part
/// order, so a variable's number depends only on the board dimensions and
/// the sorted piece list.
#[derive(Debug, Default)]
pub struct VariableSpace {
    /// Map from variable type to SAT variable
    variable_map: HashMap<Variable, Var>,
    /// Index `id - 1` holds the variable numbered `id`
    variables: Vec<Variable>,
}

impl VariableSpace {
    /// Create an empty variable space
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate every placement literal of a `width` x `height` board
    /// holding `piece_count` pieces of `piece_size` cells each
    pub fn for_board(width: usize, height: usize, piece_count: usize, piece_size: usize) -> Self {
        let mut space = Self::new();
        for row in 0..height {
            for col in 0..width {
                for piece in 0..piece_count {
                    for part in 0..piece_size {
                        space.allocate(Variable::Placement(PlacementLiteral::new(
                            row, col, piece, part,
                        )));
                    }
                }
            }
        }
        space
    }

    /// Get or create the SAT variable for `variable`
    pub fn allocate(&mut self, variable: Variable) -> Var {
        if let Some(&var) = self.variable_map.get(&variable) {
            return var;
        }

        let var = Var::from_index(self.variables.len());
        self.variables.push(variable);
        self.variable_map.insert(variable, var);
        var
    }

    /// Look up an already allocated variable
    pub fn get(&self, variable: &Variable) -> Option<Var> {
        self.variable_map.get(variable).copied()
    }

    /// Look up the variable of an already allocated placement literal
    pub fn placement(&self, row: usize, col: usize, piece: usize, part: usize) -> Option<Var> {
        self.get(&Variable::Placement(PlacementLiteral::new(row, col, piece, part)))
    }

    /// The encoding variable a SAT variable stands for
    pub fn resolve(&self, var: Var) -> Result<Variable> {
        self.variables
            .get(var.id() as usize - 1)
            .copied()
            .ok_or(TilingError::UnknownVariable(var.id()))
    }

    /// Get the total number of variables created
    pub fn size(&self) -> usize {
        self.variables.len()
    }

    /// All variables in numbering order
    pub fn iter(&self) -> impl Iterator<Item = (Var, Variable)> + '_ {
        self.variables
            .iter()
            .enumerate()
            .map(|(index, &variable)| (Var::from_index(index), variable))
    }

    /// Get statistics about variable usage
    pub fn statistics(&self) -> VariableStatistics {
        let mut placement_variables = 0;

        for variable in &self.variables {
            match variable {
                Variable::Placement(_) => placement_variables += 1,
            }
        }

        VariableStatistics {
            total_variables: self.size(),
            placement_variables,
        }
    }
}

/// Statistics about variable usage
#[derive(Debug, Clone)]
pub struct VariableStatistics {
    pub total_variables: usize,
    pub placement_variables: usize,
}

impl std::fmt::Display for VariableStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Placement variables: {}", self.placement_variables)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(row: usize, col: usize, piece: usize, part: usize) -> Variable {
        Variable::Placement(PlacementLiteral::new(row, col, piece, part))
    }

    #[test]
    fn test_allocate_is_idempotent() {
        let mut space = VariableSpace::new();

        let first = space.allocate(placement(0, 0, 0, 0));
        let second = space.allocate(placement(1, 1, 0, 0));
        assert_eq!(first.id(), 1);
        assert_eq!(second.id(), 2);

        let again = space.allocate(placement(0, 0, 0, 0));
        assert_eq!(first, again);
        assert_eq!(space.size(), 2);
    }

    #[test]
    fn test_board_numbering_is_dense_and_ordered() {
        let space = VariableSpace::for_board(3, 2, 2, 2);
        assert_eq!(space.size(), 3 * 2 * 2 * 2);

        // row-major, then piece, then part
        assert_eq!(space.placement(0, 0, 0, 0).unwrap().id(), 1);
        assert_eq!(space.placement(0, 0, 0, 1).unwrap().id(), 2);
        assert_eq!(space.placement(0, 0, 1, 0).unwrap().id(), 3);
        assert_eq!(space.placement(0, 1, 0, 0).unwrap().id(), 5);
        assert_eq!(space.placement(1, 0, 0, 0).unwrap().id(), 13);
        assert_eq!(space.placement(1, 2, 1, 1).unwrap().id(), 24);
        assert!(space.placement(2, 0, 0, 0).is_none());
    }

    #[test]
    fn test_resolve_inverts_allocate() {
        let space = VariableSpace::for_board(2, 2, 1, 3);
        for (var, variable) in space.iter() {
            assert_eq!(space.resolve(var).unwrap(), variable);
            assert_eq!(space.get(&variable), Some(var));
        }
    }

    #[test]
    fn test_resolve_out_of_range() {
        let space = VariableSpace::for_board(1, 1, 1, 1);
        let stray = Var::new(2).unwrap();
        assert!(matches!(
            space.resolve(stray),
            Err(TilingError::UnknownVariable(2))
        ));
    }

    #[test]
    fn test_statistics() {
        let space = VariableSpace::for_board(2, 2, 1, 1);
        let stats = space.statistics();
        assert_eq!(stats.total_variables, 4);
        assert_eq!(stats.placement_variables, 4);
    }
}
