//! Tactical detectors: immediate wins, forced-win sequences (VCF/VCT) and
//! single-ply shape shortcuts.
//!
//! Every detector that places trial stones takes them back before returning,
//! so the board hash is unchanged afterwards.


use std::time::Instant;

use crate::board::player::Player;
use crate::board::pos::{Pos, DIRECTIONS};
use crate::board::Board;
use crate::pattern::{PatternClassifier, PatternCounts, PatternKind};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Combined threat level at which a VCT move forces a reply.
pub const VCT_TRIGGER: i32 = 5;
/// Reach of a VCT reply along each line through the attacking stone.
const VCT_REPLY_RADIUS: i32 = 4;
/// Most replies a VCT node will branch on.
const VCT_MAX_REPLIES: usize = 2;
/// `find_winning_combo` threshold, in tenths.
const WINNING_COMBO_THRESHOLD: i32 = 15;
/// Forced-win nodes between clock reads.
pub const SCAN_CHECK_INTERVAL: usize = 64;

pub type Cells = SmallVec<[Pos; 8]>;

/// Threat points of the shapes a stone sits in: open four 10, closed four 4,
/// open three 5 per pair, five 100.
pub fn threat_points(counts: &PatternCounts) -> i32 {
    if counts.five > 0 {
        return 100;
    }
    10 * counts.open_four as i32 + 4 * counts.closed_four as i32 + 5 * counts.open_three as i32 / 2
}

/// Clock and memo shared by the nodes of one forced-win scan.
#[derive(Default)]
struct ScanBudget {
    deadline: Option<Instant>,
    nodes: usize,
    exhausted: bool,
    /// Attacker-to-move positions already shown not to win. Every attacking
    /// move costs one ply, so within a scan a hash also fixes the depth left.
    failed: FxHashSet<u64>,
}

impl ScanBudget {
    /// Counts a node and reports whether the deadline has passed.
    fn spent(&mut self) -> bool {
        if !self.exhausted && self.nodes % SCAN_CHECK_INTERVAL == 0 {
            self.exhausted = self.deadline.map_or(false, |deadline| Instant::now() >= deadline);
        }
        self.nodes += 1;
        self.exhausted
    }
}

/// Runs tactical scans over a board it borrows mutably for trial placements.
pub struct ThreatDetector<'a> {
    board: &'a mut Board,
    classifier: &'a mut PatternClassifier,
    budget: ScanBudget,
}

impl<'a> ThreatDetector<'a> {
    pub fn new(board: &'a mut Board, classifier: &'a mut PatternClassifier) -> Self {
        Self {
            board,
            classifier,
            budget: ScanBudget::default(),
        }
    }

    /// Makes the forced-win scans give up, finding nothing, once `deadline`
    /// has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.budget.deadline = Some(deadline);
        self
    }

    pub fn board(&self) -> &Board {
        self.board
    }

    /// True once a scan ran into the deadline. Its `None` then means
    /// "not found in time" rather than "no forced win".
    pub fn out_of_time(&self) -> bool {
        self.budget.exhausted
    }

    /// Runs `f` on a detector for the board with a trial stone on `pos`.
    pub fn with_stone<T, F>(&mut self, pos: Pos, player: Player, f: F) -> T
    where
        F: FnOnce(&mut ThreatDetector<'_>) -> T,
    {
        let classifier = &mut *self.classifier;
        let budget = std::mem::take(&mut self.budget);

        let (result, budget) = self.board.with_stone(pos, player, |board| {
            let mut inner = ThreatDetector {
                board,
                classifier,
                budget,
            };
            let result = f(&mut inner);
            (result, inner.budget)
        });

        self.budget = budget;
        result
    }

    /// Empty cells touching a stone, in row-major order.
    fn candidates(&self) -> Vec<Pos> {
        self.board.neighborhood(1).collect()
    }

    /// Pattern counts for a hypothetical `player` stone on `pos`.
    pub fn counts_at(&mut self, pos: Pos, player: Player) -> PatternCounts {
        self.classifier.counts_at(self.board, pos, player)
    }

    /// First cell in row-major order that completes five for `player`.
    pub fn find_immediate_win(&mut self, player: Player) -> Option<Pos> {
        self.candidates()
            .into_iter()
            .find(|&pos| self.board.with_stone(pos, player, |board| board.check_win(pos)))
    }

    /// Every cell that completes five for `player`.
    pub fn winning_cells(&mut self, player: Player) -> Cells {
        self.candidates()
            .into_iter()
            .filter(|&pos| self.board.with_stone(pos, player, |board| board.check_win(pos)))
            .collect()
    }

    /// Replies available to the defender against `attacker`'s four threats. A
    /// single winning cell must be taken; two or more cannot all be covered, so
    /// there is no reply. Without a winning cell nothing is forced and every
    /// adjacent cell is a reply.
    pub fn find_defense_moves(&mut self, attacker: Player) -> Cells {
        let wins = self.winning_cells(attacker);
        match wins.len() {
            0 => self.candidates().into_iter().collect(),
            1 => wins,
            _ => Cells::new(),
        }
    }

    /// Searches for a victory by continuous fours: every attacking move makes a
    /// four, every defence is forced. Returns the first move of the sequence.
    pub fn find_forced_win_vcf(&mut self, player: Player, max_depth: u8) -> Option<Pos> {
        self.budget.failed.clear();
        self.vcf(player, max_depth)
    }

    fn vcf(&mut self, player: Player, max_depth: u8) -> Option<Pos> {
        let hash = self.board.hash();
        if max_depth == 0 || self.budget.failed.contains(&hash) {
            return None;
        }

        let threats: Vec<Pos> = self
            .candidates()
            .into_iter()
            .filter(|&pos| self.counts_at(pos, player).has_four_threat())
            .collect();

        let found = threats.into_iter().find(|&pos| {
            self.with_stone(pos, player, |d| d.vcf_after_threat(pos, player, max_depth))
        });
        if found.is_none() && !self.budget.exhausted {
            self.budget.failed.insert(hash);
        }
        found
    }

    fn vcf_after_threat(&mut self, pos: Pos, player: Player, max_depth: u8) -> bool {
        if self.budget.spent() {
            return false;
        }
        if self.board.check_win(pos) {
            return true;
        }

        let defender = player.opposite();
        if self.find_immediate_win(defender).is_some() {
            return false;
        }

        let defenses = self.find_defense_moves(player);
        match defenses.as_slice() {
            [] => true,
            [reply] => self.with_stone(*reply, defender, |d| {
                d.vcf(player, max_depth - 1).is_some()
            }),
            _ => false,
        }
    }

    /// Searches for a victory by continuous threats: attacking moves start from
    /// open threes and build up to fours, the defender may have up to two
    /// replies at each step. Heuristic; a found sequence is strong, not proven.
    pub fn find_forced_win_vct(&mut self, player: Player, max_depth: u8) -> Option<Pos> {
        self.budget.failed.clear();
        self.vct(player, max_depth)
    }

    fn vct(&mut self, player: Player, max_depth: u8) -> Option<Pos> {
        let hash = self.board.hash();
        if max_depth == 0 || self.budget.failed.contains(&hash) {
            return None;
        }
        if let Some(pos) = self.find_immediate_win(player) {
            return Some(pos);
        }

        let seeds: Vec<Pos> = self
            .candidates()
            .into_iter()
            .filter(|&pos| self.counts_at(pos, player).has_forcing_threat())
            .collect();

        let found = seeds.into_iter().find(|&pos| {
            self.with_stone(pos, player, |d| d.vct_after_threat(pos, player, max_depth))
        });
        if found.is_none() && !self.budget.exhausted {
            self.budget.failed.insert(hash);
        }
        found
    }

    fn vct_after_threat(&mut self, pos: Pos, player: Player, max_depth: u8) -> bool {
        if self.budget.spent() {
            return false;
        }
        if self.board.check_win(pos) {
            return true;
        }

        let defender = player.opposite();
        if self.find_immediate_win(defender).is_some() {
            return false;
        }

        let replies = match self.vct_replies(pos, player) {
            Some(replies) => replies,
            None => return false,
        };
        if replies.len() > VCT_MAX_REPLIES {
            return false;
        }

        replies.into_iter().all(|reply| {
            self.with_stone(reply, defender, |d| d.vct(player, max_depth - 1).is_some())
        })
    }

    /// Defender replies to the stone `player` just put on `pos`, or `None` when
    /// the move does not reach the trigger level and forces nothing.
    fn vct_replies(&mut self, pos: Pos, player: Player) -> Option<Cells> {
        let wins = self.winning_cells(player);
        match wins.len() {
            0 => {}
            1 => return Some(wins),
            _ => return Some(Cells::new()),
        }

        if threat_points(&self.counts_at(pos, player)) < VCT_TRIGGER {
            return None;
        }

        let defender = player.opposite();
        let mut replies = Cells::new();
        for &(dr, dc) in DIRECTIONS.iter() {
            for step in (-VCT_REPLY_RADIUS..=VCT_REPLY_RADIUS).filter(|&s| s != 0) {
                let cell = match pos.offset(dr * step, dc * step) {
                    Some(cell) if self.board.is_empty_at(cell) => cell,
                    _ => continue,
                };
                let classifier = &mut *self.classifier;
                let remaining = self.board.with_stone(cell, defender, |board| {
                    threat_points(&classifier.counts_at(board, pos, player))
                });
                if remaining < VCT_TRIGGER {
                    replies.push(cell);
                }
            }
        }
        Some(replies)
    }

    fn find_first<F>(&mut self, player: Player, accept: F) -> Option<Pos>
    where
        F: Fn(&PatternCounts) -> bool,
    {
        self.candidates()
            .into_iter()
            .find(|&pos| accept(&self.counts_at(pos, player)))
    }

    /// A cell giving an open four, two open threes, or an open three plus a closed four.
    pub fn find_critical_move(&mut self, player: Player) -> Option<Pos> {
        self.find_first(player, |c| {
            c.open_four >= 1 || c.open_three >= 2 || (c.open_three >= 1 && c.closed_four >= 1)
        })
    }

    /// The cell with the strongest combination of threats, if it is strong enough
    /// (open four 1, open three 0.5, closed four 0.3; at least 1.5).
    pub fn find_winning_combo(&mut self, player: Player) -> Option<Pos> {
        let mut best = None;
        let mut best_threats = 0;

        for pos in self.candidates() {
            let c = self.counts_at(pos, player);
            let threats =
                10 * c.open_four as i32 + 5 * c.open_three as i32 + 3 * c.closed_four as i32;
            if threats > best_threats {
                best_threats = threats;
                best = Some(pos);
            }
        }

        if best_threats >= WINNING_COMBO_THRESHOLD {
            best
        } else {
            None
        }
    }

    /// A cell giving two fours at once.
    pub fn find_double_four(&mut self, player: Player) -> Option<Pos> {
        self.find_first(player, |c| {
            c.closed_four >= 2 || (c.closed_four >= 1 && c.open_four >= 1)
        })
    }

    pub fn find_alive_three(&mut self, player: Player) -> Option<Pos> {
        self.find_first(player, |c| c.open_three >= 1)
    }

    /// First cell where `player` would form at least one line of `kind`.
    pub fn find_pattern_move(&mut self, player: Player, kind: PatternKind) -> Option<Pos> {
        self.find_first(player, |c| c.of_kind(kind) >= 1)
    }

    /// Number of distinct lines holding an open three or stronger, for both players.
    pub fn count_active_threats(&mut self) -> usize {
        let mut lines = FxHashSet::default();

        for pos in Pos::all() {
            let player = match self.board.get(pos).player() {
                Some(player) => player,
                None => continue,
            };
            let patterns = self.classifier.patterns_at(self.board, pos, player);
            for (axis, pattern) in patterns.iter().enumerate() {
                if pattern.kind > PatternKind::OpenThree {
                    continue;
                }
                let (row, col) = (pos.row as i32, pos.col as i32);
                let line = match DIRECTIONS[axis] {
                    (0, _) => row,
                    (_, 0) => col,
                    (_, 1) => row - col,
                    _ => row + col,
                };
                lines.insert((player, axis, line));
            }
        }

        lines.len()
    }
}
