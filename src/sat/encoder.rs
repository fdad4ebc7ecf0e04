//! CNF encoding of polyomino tilings
//!
//! Every board cell carries one variable per (piece, part) pair, meaning
//! "this cell holds that part of an instance of that piece". The clause set
//! is built from four rules:
//!
//! 1. coverage: exactly one placement variable per cell is true;
//! 2. uniqueness (optional): each (piece, part) is used on at most one cell;
//! 3. rigidity: for every anchor whose translated piece fits on the board,
//!    the part variables of that instance are pairwise equivalent, and for
//!    every anchor where it does not fit they are all false;
//! 4. domain pruning: a part is false on rows and columns where no in-bounds
//!    anchor could have put it.
//!
//! Rule 3 only visits anchors inside the board, so the near-side half of
//! rule 4 (row below the part's row offset, column left of its column
//! offset) is what rules out variables whose anchor would lie above or to
//! the left of the board. The far-side half repeats what rule 3 already
//! forces; units are deduplicated so it adds no clauses.

use super::constraints::{at_most_one, equivalent, exactly_one, Clause, Lit, Var};
use super::dimacs::to_dimacs;
use super::solver::Assignment;
use super::variables::{PlacementLiteral, Variable, VariableSpace};
use crate::error::{Result, TilingError};
use crate::polyomino::Piece;
use crate::tiling::Tiling;
use log::{debug, info};
use std::collections::HashSet;

/// Dimensions of the rectangle being tiled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TilingError::InvalidBoard { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Whether a signed (row, col) position lies on the board
    pub fn contains(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |col| (row, col)))
    }
}

/// Clause counts per encoding rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClauseCounts {
    pub coverage: usize,
    pub uniqueness: usize,
    pub rigidity: usize,
    pub pruning: usize,
    pub blocking: usize,
}

/// Builds and owns the CNF instance of one tiling problem
#[derive(Debug)]
pub struct CnfEncoder {
    board: Board,
    pieces: Vec<Piece>,
    piece_size: usize,
    unique: bool,
    variables: VariableSpace,
    clauses: Vec<Clause>,
    /// Variables already fixed to false by a unit clause
    forbidden: HashSet<Var>,
    counts: ClauseCounts,
}

impl CnfEncoder {
    /// Validate the problem and build its complete clause set
    ///
    /// Pieces are sorted into canonical order first; a piece's position in
    /// that order is its piece index in variables, DIMACS output and tilings.
    pub fn encode(board: Board, pieces: Vec<Piece>, unique: bool) -> Result<Self> {
        Board::new(board.width, board.height)?;

        let mut pieces = pieces;
        pieces.sort();
        pieces.dedup();

        let piece_size = pieces.first().map(Piece::size).ok_or(TilingError::NoPieces)?;
        if let Some((index, piece)) = pieces
            .iter()
            .enumerate()
            .find(|(_, piece)| piece.size() != piece_size)
        {
            return Err(TilingError::MixedPieceSizes {
                index,
                expected: piece_size,
                found: piece.size(),
            });
        }
        if board.area() % piece_size != 0 {
            return Err(TilingError::AreaNotMultiple {
                area: board.area(),
                size: piece_size,
            });
        }

        let variables =
            VariableSpace::for_board(board.width, board.height, pieces.len(), piece_size);

        let mut encoder = Self {
            board,
            pieces,
            piece_size,
            unique,
            variables,
            clauses: Vec::new(),
            forbidden: HashSet::new(),
            counts: ClauseCounts::default(),
        };

        encoder.encode_board_constraints()?;
        for index in 0..encoder.pieces.len() {
            encoder.encode_piece(index)?;
        }

        info!(
            "Encoded {}x{} board with {} pieces of size {}: {} variables, {} clauses",
            board.width,
            board.height,
            encoder.pieces.len(),
            piece_size,
            encoder.num_variables(),
            encoder.num_clauses()
        );
        debug!("{:?}", encoder.counts);

        Ok(encoder)
    }

    pub fn board(&self) -> Board {
        self.board
    }

    /// Pieces in canonical order, indexed by piece index
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece_size(&self) -> usize {
        self.piece_size
    }

    pub fn variables(&self) -> &VariableSpace {
        &self.variables
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn num_variables(&self) -> usize {
        self.variables.size()
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// The variable of a placement literal inside the board
    pub fn placement_var(&self, row: usize, col: usize, piece: usize, part: usize) -> Option<Var> {
        self.variables.placement(row, col, piece, part)
    }

    /// The whole formula as DIMACS CNF text
    pub fn export_dimacs(&self) -> String {
        to_dimacs(self.num_variables(), &self.clauses)
    }

    /// Append a clause to the formula
    ///
    /// Every literal must belong to the variable space, so the exported
    /// header stays truthful.
    pub fn add_clause(&mut self, clause: Clause) -> Result<()> {
        if clause.is_empty() {
            return Err(TilingError::EmptyClause);
        }
        if let Some(lit) = clause
            .literals
            .iter()
            .find(|lit| lit.var().id() as usize > self.num_variables())
        {
            return Err(TilingError::UnknownVariable(lit.var().id()));
        }
        self.clauses.push(clause);
        Ok(())
    }

    /// Append the clause forbidding `assignment`'s placement pattern
    pub fn block(&mut self, assignment: &Assignment) -> Result<()> {
        let clause = self.blocking_clause(assignment)?;
        self.add_clause(clause)?;
        self.counts.blocking += 1;
        Ok(())
    }

    /// Placement literals that are true in `assignment`, in variable order
    pub fn placements(&self, assignment: &Assignment) -> Vec<PlacementLiteral> {
        self.variables
            .iter()
            .filter(|(var, _)| assignment.is_true(*var))
            .map(|(_, variable)| match variable {
                Variable::Placement(placement) => placement,
            })
            .collect()
    }

    /// Turn a satisfying assignment into the tiling it describes
    pub fn decode(&self, assignment: &Assignment) -> Result<Tiling> {
        let mut cells: Vec<Option<usize>> = vec![None; self.board.area()];

        for placement in self.placements(assignment) {
            let slot = &mut cells[placement.row * self.board.width + placement.col];
            if slot.is_some() {
                return Err(TilingError::DoubleCover {
                    row: placement.row,
                    col: placement.col,
                });
            }
            *slot = Some(placement.piece);
        }

        let cells = cells
            .into_iter()
            .enumerate()
            .map(|(index, cell)| {
                cell.ok_or(TilingError::UncoveredCell {
                    row: index / self.board.width,
                    col: index % self.board.width,
                })
            })
            .collect::<Result<Vec<usize>>>()?;

        Tiling::new(self.board.width, self.board.height, cells)
    }

    /// The disjunction of the negations of every true placement literal
    ///
    /// Coverage makes exactly one placement true per cell, so the clause has
    /// one literal per board cell; any other count is an encoding bug.
    pub fn blocking_clause(&self, assignment: &Assignment) -> Result<Clause> {
        let literals: Vec<Lit> = self
            .variables
            .iter()
            .filter(|(var, _)| assignment.is_true(*var))
            .map(|(var, _)| var.negative())
            .collect();

        if literals.len() != self.board.area() {
            return Err(TilingError::BlockingClauseSize {
                expected: self.board.area(),
                found: literals.len(),
            });
        }

        Ok(Clause::new(literals))
    }

    /// Placement literals of one instance of `piece` anchored at (row, col),
    /// or `None` if it does not fit on the board there
    pub fn instance(&self, piece: usize, row: usize, col: usize) -> Option<Vec<PlacementLiteral>> {
        let shape = self.pieces.get(piece)?;
        shape
            .offsets()
            .enumerate()
            .map(|(part, (dr, dc))| {
                let (r, c) = (row + dr, col + dc);
                (r < self.board.height && c < self.board.width)
                    .then(|| PlacementLiteral::new(r, c, piece, part))
            })
            .collect()
    }

    /// An assignment making exactly `placements` true and everything else false
    pub fn assignment_for(&self, placements: &[PlacementLiteral]) -> Result<Assignment> {
        let mut assignment: Assignment = self.variables.iter().map(|(var, _)| (var, false)).collect();
        for placement in placements {
            let var = self
                .variables
                .get(&Variable::Placement(*placement))
                .ok_or(TilingError::UnallocatedPlacement(*placement))?;
            assignment.set(var, true);
        }
        Ok(assignment)
    }

    /// Whether `assignment` satisfies every clause of the formula
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.is_satisfied_by(|var| assignment.is_true(var)))
    }

    /// Get encoding statistics
    pub fn statistics(&self) -> EncodingStatistics {
        EncodingStatistics {
            board_width: self.board.width,
            board_height: self.board.height,
            piece_count: self.pieces.len(),
            piece_size: self.piece_size,
            unique: self.unique,
            total_variables: self.num_variables(),
            total_clauses: self.num_clauses(),
            counts: self.counts,
        }
    }

    fn var(&self, row: usize, col: usize, piece: usize, part: usize) -> Result<Var> {
        self.variables
            .placement(row, col, piece, part)
            .ok_or(TilingError::UnallocatedPlacement(PlacementLiteral::new(row, col, piece, part)))
    }

    /// Fix a variable to false, once
    fn forbid(&mut self, var: Var) -> bool {
        if self.forbidden.insert(var) {
            self.clauses.push(Clause::unit(var.negative()));
            true
        } else {
            false
        }
    }

    /// Coverage for every cell, plus uniqueness when enabled
    fn encode_board_constraints(&mut self) -> Result<()> {
        let piece_count = self.pieces.len();

        for (row, col) in self.board.cells() {
            let group: Vec<Lit> = (0..piece_count)
                .flat_map(|piece| (0..self.piece_size).map(move |part| (piece, part)))
                .map(|(piece, part)| self.var(row, col, piece, part).map(Var::positive))
                .collect::<Result<_>>()?;
            let clauses = exactly_one(&group);
            self.counts.coverage += clauses.len();
            self.clauses.extend(clauses);
        }

        if self.unique {
            for piece in 0..piece_count {
                for part in 0..self.piece_size {
                    let group: Vec<Lit> = self
                        .board
                        .cells()
                        .map(|(row, col)| self.var(row, col, piece, part).map(Var::positive))
                        .collect::<Result<_>>()?;
                    let clauses = at_most_one(&group);
                    self.counts.uniqueness += clauses.len();
                    self.clauses.extend(clauses);
                }
            }
        }

        Ok(())
    }

    /// Rigidity over every anchor, then domain pruning, for one piece
    fn encode_piece(&mut self, piece: usize) -> Result<()> {
        let offsets: Vec<(usize, usize)> = self.pieces[piece].offsets().collect();
        let (height, width) = (self.board.height, self.board.width);

        for (row, col) in self.board.cells() {
            match self.instance(piece, row, col) {
                Some(instance) => {
                    let lits: Vec<Lit> = instance
                        .iter()
                        .map(|p| self.var(p.row, p.col, p.piece, p.part).map(Var::positive))
                        .collect::<Result<_>>()?;
                    for (i, &first) in lits.iter().enumerate() {
                        for &second in &lits[i + 1..] {
                            self.clauses.extend(equivalent(first, second));
                            self.counts.rigidity += 2;
                        }
                    }
                }
                None => {
                    for (part, &(dr, dc)) in offsets.iter().enumerate() {
                        let (r, c) = (row + dr, col + dc);
                        if r < height && c < width {
                            let var = self.var(r, c, piece, part)?;
                            if self.forbid(var) {
                                self.counts.rigidity += 1;
                            }
                        }
                    }
                }
            }
        }

        let shape_height = self.pieces[piece].height();
        let shape_width = self.pieces[piece].width();
        for (part, &(dr, dc)) in offsets.iter().enumerate() {
            // Part `part` can only sit on rows dr..=height-shape_height+dr
            let below = shape_height - 1 - dr;
            let right = shape_width - 1 - dc;
            for (row, col) in self.board.cells() {
                let infeasible = row < dr || col < dc || row + below >= height || col + right >= width;
                if infeasible {
                    let var = self.var(row, col, piece, part)?;
                    if self.forbid(var) {
                        self.counts.pruning += 1;
                    }
                }
            }
        }

        Ok(())
    }
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub board_width: usize,
    pub board_height: usize,
    pub piece_count: usize,
    pub piece_size: usize,
    pub unique: bool,
    pub total_variables: usize,
    pub total_clauses: usize,
    pub counts: ClauseCounts,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Board: {}x{}", self.board_width, self.board_height)?;
        writeln!(f, "  Pieces: {} of size {}", self.piece_count, self.piece_size)?;
        writeln!(f, "  Unique pieces: {}", self.unique)?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses)?;
        writeln!(f, "    coverage: {}", self.counts.coverage)?;
        writeln!(f, "    uniqueness: {}", self.counts.uniqueness)?;
        writeln!(f, "    rigidity: {}", self.counts.rigidity)?;
        writeln!(f, "    pruning: {}", self.counts.pruning)?;
        writeln!(f, "    blocking: {}", self.counts.blocking)?;
        Ok(())
    }
}
