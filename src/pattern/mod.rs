//! Line-shape recognition.
//!
//! A stone's neighbourhood along one axis is read into a 9-cell `LineSignature`
//! (four cells either side of it) and matched against fixed shape templates.


use crate::board::player::{Cell, Player};
use crate::board::pos::{Pos, DIRECTIONS};
use crate::board::Board;
use crate::cache;
use lru::LruCache;

pub const SIGNATURE_LEN: usize = 9;
const SIGNATURE_CENTER: usize = 4;

/// Scores awarded per matched template.
pub struct PatternScore;

impl PatternScore {
    pub const FIVE: i32 = 100_000;
    pub const OPEN_FOUR: i32 = 10_000;
    pub const CLOSED_FOUR: i32 = 5_000;
    /// An open three forces a reply just like a closed four does.
    pub const OPEN_THREE: i32 = 5_000;
    pub const CLOSED_THREE: i32 = 1_000;
    pub const OPEN_TWO: i32 = 500;
    pub const CLOSED_TWO: i32 = 50;
    pub const SINGLE: i32 = 10;
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum LineCell {
    Own,
    Empty,
    /// An opponent stone or the board edge.
    Blocked,
}

impl LineCell {
    fn code(self) -> u8 {
        match self {
            LineCell::Own => b'1',
            LineCell::Empty => b'0',
            LineCell::Blocked => b'2',
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LineSignature(pub [LineCell; SIGNATURE_LEN]);

impl LineSignature {
    /// Reads the line through `pos` along `(dr, dc)` from `player`'s point of view.
    /// The center cell is always `Own`, which lets callers score a hypothetical
    /// placement without touching the board.
    pub fn read(board: &Board, pos: Pos, (dr, dc): (i32, i32), player: Player) -> Self {
        let own = Cell::from(player);
        let mut cells = [LineCell::Blocked; SIGNATURE_LEN];
        for (i, slot) in cells.iter_mut().enumerate() {
            let step = i as i32 - SIGNATURE_CENTER as i32;
            *slot = match pos.offset(dr * step, dc * step) {
                None => LineCell::Blocked,
                Some(_) if step == 0 => LineCell::Own,
                Some(p) => match board.get(p) {
                    Cell::Empty => LineCell::Empty,
                    cell if cell == own => LineCell::Own,
                    _ => LineCell::Blocked,
                },
            };
        }
        Self(cells)
    }

    /// Parses the `1`/`0`/`2` shorthand (own/empty/blocked). Missing trailing
    /// cells are treated as blocked.
    pub fn parse(shape: &str) -> Option<Self> {
        let mut cells = [LineCell::Blocked; SIGNATURE_LEN];
        let mut len = 0;
        for (slot, c) in cells.iter_mut().zip(shape.chars()) {
            *slot = match c {
                '1' => LineCell::Own,
                '0' => LineCell::Empty,
                '2' => LineCell::Blocked,
                _ => return None,
            };
            len += 1;
        }
        if len != shape.chars().count() {
            return None;
        }
        Some(Self(cells))
    }

    fn codes(&self) -> [u8; SIGNATURE_LEN] {
        let mut codes = [0; SIGNATURE_LEN];
        for (code, cell) in codes.iter_mut().zip(self.0.iter()) {
            *code = cell.code();
        }
        codes
    }
}

/// Named line shapes, strongest first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum PatternKind {
    Five,
    OpenFour,
    ClosedFour,
    OpenThree,
    ClosedThree,
    OpenTwo,
    ClosedTwo,
    Single,
    None,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pattern {
    pub kind: PatternKind,
    pub score: i32,
}

impl Pattern {
    pub const NONE: Pattern = Pattern {
        kind: PatternKind::None,
        score: 0,
    };
}

struct Template {
    kind: PatternKind,
    shapes: &'static [&'static str],
    score: i32,
    /// Stop at the first matching shape instead of adding up every match.
    exclusive: bool,
}

/// Shape templates in priority order.
const TEMPLATES: [Template; 7] = [
    Template {
        kind: PatternKind::Five,
        shapes: &["11111"],
        score: PatternScore::FIVE,
        exclusive: true,
    },
    Template {
        kind: PatternKind::OpenFour,
        shapes: &["011110"],
        score: PatternScore::OPEN_FOUR,
        exclusive: true,
    },
    Template {
        kind: PatternKind::ClosedFour,
        shapes: &["11110", "01111", "11011", "10111", "11101"],
        score: PatternScore::CLOSED_FOUR,
        exclusive: false,
    },
    Template {
        kind: PatternKind::OpenThree,
        shapes: &["001110", "011100", "011010", "010110"],
        score: PatternScore::OPEN_THREE,
        exclusive: false,
    },
    Template {
        kind: PatternKind::ClosedThree,
        shapes: &[
            "001112", "211100", "010112", "211010", "011012", "210110", "10011", "11001",
            "10101", "2011102",
        ],
        score: PatternScore::CLOSED_THREE,
        exclusive: false,
    },
    Template {
        kind: PatternKind::OpenTwo,
        shapes: &["001100", "0011000", "001010", "010100", "000110", "011000"],
        score: PatternScore::OPEN_TWO,
        exclusive: false,
    },
    Template {
        kind: PatternKind::ClosedTwo,
        shapes: &["00110", "01100", "010010", "01001"],
        score: PatternScore::CLOSED_TWO,
        exclusive: false,
    },
];

fn contains(haystack: &[u8], shape: &str) -> bool {
    let needle = shape.as_bytes();
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Classifies a signature without caching. The first kind with any matching
/// template wins; within a kind, matching templates add up unless the kind
/// is exclusive.
pub fn classify_line(signature: &LineSignature) -> Pattern {
    let codes = signature.codes();

    for template in TEMPLATES.iter() {
        let mut score = 0;
        for shape in template.shapes {
            if contains(&codes, shape) {
                score += template.score;
                if template.exclusive {
                    break;
                }
            }
        }
        if score > 0 {
            return Pattern {
                kind: template.kind,
                score,
            };
        }
    }

    if codes.contains(&b'1') {
        return Pattern {
            kind: PatternKind::Single,
            score: PatternScore::SINGLE,
        };
    }
    Pattern::NONE
}

/// How many of the four lines through a cell form each shape.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct PatternCounts {
    pub five: u8,
    pub open_four: u8,
    pub closed_four: u8,
    pub open_three: u8,
    pub closed_three: u8,
    pub open_two: u8,
    pub closed_two: u8,
}

impl PatternCounts {
    pub fn record(&mut self, kind: PatternKind) {
        match kind {
            PatternKind::Five => self.five += 1,
            PatternKind::OpenFour => self.open_four += 1,
            PatternKind::ClosedFour => self.closed_four += 1,
            PatternKind::OpenThree => self.open_three += 1,
            PatternKind::ClosedThree => self.closed_three += 1,
            PatternKind::OpenTwo => self.open_two += 1,
            PatternKind::ClosedTwo => self.closed_two += 1,
            PatternKind::Single | PatternKind::None => {}
        }
    }

    pub fn of_kind(&self, kind: PatternKind) -> u8 {
        match kind {
            PatternKind::Five => self.five,
            PatternKind::OpenFour => self.open_four,
            PatternKind::ClosedFour => self.closed_four,
            PatternKind::OpenThree => self.open_three,
            PatternKind::ClosedThree => self.closed_three,
            PatternKind::OpenTwo => self.open_two,
            PatternKind::ClosedTwo => self.closed_two,
            PatternKind::Single | PatternKind::None => 0,
        }
    }

    /// Five, open four or closed four.
    pub fn has_four_threat(&self) -> bool {
        self.five + self.open_four + self.closed_four > 0
    }

    /// Anything from an open three upwards.
    pub fn has_forcing_threat(&self) -> bool {
        self.has_four_threat() || self.open_three > 0
    }
}

/// Pattern classification with a bounded cache keyed by signature.
pub struct PatternClassifier {
    cache: LruCache<LineSignature, Pattern>,
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self::with_capacity(cache::PATTERN_CACHE_CAPACITY)
    }
}

impl PatternClassifier {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: cache::bounded(capacity),
        }
    }

    pub fn classify(&mut self, signature: &LineSignature) -> Pattern {
        if let Some(pattern) = self.cache.get(signature) {
            return *pattern;
        }
        let pattern = classify_line(signature);
        self.cache.put(*signature, pattern);
        pattern
    }

    /// Classifies all four lines through `pos` as if `player` stood there.
    pub fn patterns_at(&mut self, board: &Board, pos: Pos, player: Player) -> [Pattern; 4] {
        let mut patterns = [Pattern::NONE; 4];
        for (pattern, &direction) in patterns.iter_mut().zip(DIRECTIONS.iter()) {
            *pattern = self.classify(&LineSignature::read(board, pos, direction, player));
        }
        patterns
    }

    pub fn counts_at(&mut self, board: &Board, pos: Pos, player: Player) -> PatternCounts {
        let mut counts = PatternCounts::default();
        for pattern in self.patterns_at(board, pos, player).iter() {
            counts.record(pattern.kind);
        }
        counts
    }

    /// Sum of the four line scores through `pos` for `player`.
    pub fn line_score_at(&mut self, board: &Board, pos: Pos, player: Player) -> i32 {
        self.patterns_at(board, pos, player)
            .iter()
            .map(|pattern| pattern.score)
            .sum()
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
