//! Position catalog: board offices and their cadre counterparts
//!
//! The declaration order of [`BoardPosition`] is the canonical order used for
//! every listing and report. It is neither alphabetical nor insertion order.

use crate::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const CADRE_SUFFIX: &str = "_cadre";

/// An elected board office
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BoardPosition {
    President,
    Mentor,
    LegalAdvisor,
    Secretary,
    Treasurer,
    ActingPresident,
    VpMembership,
    VpPrograms,
    VpCommunications,
    VpFundraising,
    VpCommunityService,
}

impl BoardPosition {
    /// Canonical order
    pub const ALL: [BoardPosition; 11] = [
        BoardPosition::President,
        BoardPosition::Mentor,
        BoardPosition::LegalAdvisor,
        BoardPosition::Secretary,
        BoardPosition::Treasurer,
        BoardPosition::ActingPresident,
        BoardPosition::VpMembership,
        BoardPosition::VpPrograms,
        BoardPosition::VpCommunications,
        BoardPosition::VpFundraising,
        BoardPosition::VpCommunityService,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BoardPosition::President => "president",
            BoardPosition::Mentor => "mentor",
            BoardPosition::LegalAdvisor => "legal_advisor",
            BoardPosition::Secretary => "secretary",
            BoardPosition::Treasurer => "treasurer",
            BoardPosition::ActingPresident => "acting_president",
            BoardPosition::VpMembership => "vp_membership",
            BoardPosition::VpPrograms => "vp_programs",
            BoardPosition::VpCommunications => "vp_communications",
            BoardPosition::VpFundraising => "vp_fundraising",
            BoardPosition::VpCommunityService => "vp_community_service",
        }
    }

    /// Zero-based index in canonical order
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    pub fn cadre(&self) -> PositionCode {
        PositionCode::Cadre(*self)
    }

    pub fn code(&self) -> PositionCode {
        PositionCode::Board(*self)
    }
}

impl fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoardPosition {
    type Err = CatalogError;

    fn from_str(s: &str) -> CatalogResult<Self> {
        match s.parse::<PositionCode>()? {
            PositionCode::Board(board) => Ok(board),
            PositionCode::Cadre(_) => Err(CatalogError::NotBoardPosition(s.to_string())),
        }
    }
}

impl TryFrom<String> for BoardPosition {
    type Error = CatalogError;

    fn try_from(value: String) -> CatalogResult<Self> {
        value.parse()
    }
}

impl From<BoardPosition> for String {
    fn from(position: BoardPosition) -> Self {
        position.as_str().to_string()
    }
}

/// A board office or the cadre seat paired with it.
///
/// Ordering follows the canonical board order, with each board code sorting
/// before every cadre code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PositionCode {
    Board(BoardPosition),
    Cadre(BoardPosition),
}

impl PositionCode {
    /// The paired code on the other side of the board/cadre divide
    pub fn counterpart(&self) -> PositionCode {
        match self {
            PositionCode::Board(board) => PositionCode::Cadre(*board),
            PositionCode::Cadre(board) => PositionCode::Board(*board),
        }
    }

    pub fn is_cadre(&self) -> bool {
        matches!(self, PositionCode::Cadre(_))
    }

    /// The board office this code belongs to (itself, or the one it supports)
    pub fn board(&self) -> BoardPosition {
        match self {
            PositionCode::Board(board) | PositionCode::Cadre(board) => *board,
        }
    }
}

impl fmt::Display for PositionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionCode::Board(board) => f.write_str(board.as_str()),
            PositionCode::Cadre(board) => write!(f, "{}{}", board.as_str(), CADRE_SUFFIX),
        }
    }
}

impl FromStr for PositionCode {
    type Err = CatalogError;

    fn from_str(s: &str) -> CatalogResult<Self> {
        let (base, cadre) = match s.strip_suffix(CADRE_SUFFIX) {
            Some(base) => (base, true),
            None => (s, false),
        };
        let board = BoardPosition::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == base)
            .ok_or_else(|| CatalogError::UnknownPosition(s.to_string()))?;

        Ok(if cadre {
            PositionCode::Cadre(board)
        } else {
            PositionCode::Board(board)
        })
    }
}

impl TryFrom<String> for PositionCode {
    type Error = CatalogError;

    fn try_from(value: String) -> CatalogResult<Self> {
        value.parse()
    }
}

impl From<PositionCode> for String {
    fn from(code: PositionCode) -> Self {
        code.to_string()
    }
}

/// Ordered listings over the position catalog
pub struct PositionCatalog;

impl PositionCatalog {
    pub fn board_codes() -> Vec<PositionCode> {
        BoardPosition::ALL.iter().map(|b| b.code()).collect()
    }

    pub fn cadre_codes() -> Vec<PositionCode> {
        BoardPosition::ALL.iter().map(|b| b.cadre()).collect()
    }

    /// Board codes in canonical order, followed by cadre codes in the same order
    pub fn all_codes() -> Vec<PositionCode> {
        let mut codes = Self::board_codes();
        codes.extend(Self::cadre_codes());
        codes
    }

    pub fn counterpart(code: PositionCode) -> PositionCode {
        code.counterpart()
    }

    pub fn is_cadre(code: PositionCode) -> bool {
        code.is_cadre()
    }
}
