use std::fmt;

/// A board square. Files and ranks both run 1..=8; file 1 is the a-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub file: u8,
    pub rank: u8,
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if (1..=8).contains(&file) && (1..=8).contains(&rank) {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// The square reached by stepping `file_step` files and `rank_step`
    /// ranks from here, or `None` if that leaves the board.
    pub fn offset(self, file_step: i8, rank_step: i8) -> Option<Self> {
        let file = self.file as i8 + file_step;
        let rank = self.rank as i8 + rank_step;
        if (1..=8).contains(&file) && (1..=8).contains(&rank) {
            Some(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// All 64 squares in rank-major order (a1, b1, ..., h8). Board scans
    /// use this order so move enumeration is deterministic.
    pub fn all() -> impl Iterator<Item = Square> {
        (1..=8).flat_map(|rank| (1..=8).map(move |file| Square { file, rank }))
    }

    pub fn from_algebraic(notation: &str) -> Option<Self> {
        let mut chars = notation.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }

        Some(Self {
            file: (file as u8) - b'a' + 1,
            rank: (rank as u8) - b'0',
        })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file - 1) as char, self.rank)
    }
}
