//! @ai:module:intent Production tables for both TextGrid syntaxes and their shared reductions
//! @ai:module:layer domain
//! @ai:module:public_api Production, Step, steps
//! @ai:module:depends_on lexer, textgrid, format, error
//! @ai:module:stateless true
//!
//! Each production of the logical grammar has one terminal sequence per
//! syntax. The full table interleaves labels, brackets and indices with the
//! values; the short table keeps only the values. Both feed the same
//! reductions, so the syntax never reaches the data model.

use crate::error::{Error, Position, Result};
use crate::format::Syntax;
use crate::lexer::{self, TokenKind};
use crate::textgrid::{Interval, IntervalTier, Point, PointTier, Tier, TierKind};

/// @ai:intent Grammar productions, in the order the parser visits them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Production {
    /// `File type = "ooTextFile"` `Object class = "TextGrid"`
    Preamble,
    Bounds,
    TiersFlag,
    TierCount,
    /// Opens a tier and yields its class tag.
    TierHead,
    IntervalTierHead,
    PointTierHead,
    Interval,
    Point,
    End,
}

/// @ai:intent One terminal position inside a production
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// An identifier with exactly this text.
    Keyword(&'static str),
    Equals,
    Colon,
    LBracket,
    RBracket,
    /// Bracketed 1-based position within the enclosing list.
    Index,
    Number,
    /// Declared number of tiers, intervals or points.
    Count,
    Text,
    Flag,
    Eof,
}

use Step::*;

const PREAMBLE: &[Step] = &[
    Keyword("File"),
    Keyword("type"),
    Equals,
    Text,
    Keyword("Object"),
    Keyword("class"),
    Equals,
    Text,
];

const FULL_BOUNDS: &[Step] = &[
    Keyword("xmin"),
    Equals,
    Number,
    Keyword("xmax"),
    Equals,
    Number,
];

const FULL_TIERS_FLAG: &[Step] = &[Keyword("tiers?"), Flag];

const FULL_TIER_COUNT: &[Step] = &[
    Keyword("size"),
    Equals,
    Count,
    Keyword("item"),
    LBracket,
    RBracket,
    Colon,
];

const FULL_TIER_HEAD: &[Step] = &[
    Keyword("item"),
    LBracket,
    Index,
    RBracket,
    Colon,
    Keyword("class"),
    Equals,
    Text,
];

const FULL_INTERVAL_TIER_HEAD: &[Step] = &[
    Keyword("name"),
    Equals,
    Text,
    Keyword("xmin"),
    Equals,
    Number,
    Keyword("xmax"),
    Equals,
    Number,
    Keyword("intervals"),
    Colon,
    Keyword("size"),
    Equals,
    Count,
];

const FULL_POINT_TIER_HEAD: &[Step] = &[
    Keyword("name"),
    Equals,
    Text,
    Keyword("xmin"),
    Equals,
    Number,
    Keyword("xmax"),
    Equals,
    Number,
    Keyword("points"),
    Colon,
    Keyword("size"),
    Equals,
    Count,
];

const FULL_INTERVAL: &[Step] = &[
    Keyword("intervals"),
    LBracket,
    Index,
    RBracket,
    Colon,
    Keyword("xmin"),
    Equals,
    Number,
    Keyword("xmax"),
    Equals,
    Number,
    Keyword("text"),
    Equals,
    Text,
];

const FULL_POINT: &[Step] = &[
    Keyword("points"),
    LBracket,
    Index,
    RBracket,
    Colon,
    Keyword("number"),
    Equals,
    Number,
    Keyword("mark"),
    Equals,
    Text,
];

const SHORT_BOUNDS: &[Step] = &[Number, Number];
const SHORT_TIERS_FLAG: &[Step] = &[Flag];
const SHORT_TIER_COUNT: &[Step] = &[Count];
const SHORT_TIER_HEAD: &[Step] = &[Text];
const SHORT_TIER_BODY_HEAD: &[Step] = &[Text, Number, Number, Count];
const SHORT_INTERVAL: &[Step] = &[Number, Number, Text];
const SHORT_POINT: &[Step] = &[Number, Text];

const END: &[Step] = &[Eof];

/// @ai:intent Look up the terminal sequence of a production under a syntax
/// @ai:effects pure
pub fn steps(syntax: Syntax, production: Production) -> &'static [Step] {
    match (syntax, production) {
        (_, Production::Preamble) => PREAMBLE,
        (_, Production::End) => END,
        (Syntax::Full, Production::Bounds) => FULL_BOUNDS,
        (Syntax::Full, Production::TiersFlag) => FULL_TIERS_FLAG,
        (Syntax::Full, Production::TierCount) => FULL_TIER_COUNT,
        (Syntax::Full, Production::TierHead) => FULL_TIER_HEAD,
        (Syntax::Full, Production::IntervalTierHead) => FULL_INTERVAL_TIER_HEAD,
        (Syntax::Full, Production::PointTierHead) => FULL_POINT_TIER_HEAD,
        (Syntax::Full, Production::Interval) => FULL_INTERVAL,
        (Syntax::Full, Production::Point) => FULL_POINT,
        (Syntax::Short, Production::Bounds) => SHORT_BOUNDS,
        (Syntax::Short, Production::TiersFlag) => SHORT_TIERS_FLAG,
        (Syntax::Short, Production::TierCount) => SHORT_TIER_COUNT,
        (Syntax::Short, Production::TierHead) => SHORT_TIER_HEAD,
        (Syntax::Short, Production::IntervalTierHead | Production::PointTierHead) => {
            SHORT_TIER_BODY_HEAD
        }
        (Syntax::Short, Production::Interval) => SHORT_INTERVAL,
        (Syntax::Short, Production::Point) => SHORT_POINT,
    }
}

impl Step {
    /// @ai:intent Whether the lookahead token can be shifted in this position
    /// @ai:effects pure
    pub fn accepts(&self, kind: &TokenKind) -> bool {
        match (self, kind) {
            (Keyword(expected), TokenKind::Ident(found)) => expected == found,
            (Equals, TokenKind::Equals)
            | (Colon, TokenKind::Colon)
            | (LBracket, TokenKind::LBracket)
            | (RBracket, TokenKind::RBracket)
            | (Index | Number | Count, TokenKind::Number(_))
            | (Text, TokenKind::Str(_))
            | (Flag, TokenKind::Flag(_))
            | (Eof, TokenKind::Eof) => true,
            _ => false,
        }
    }

    /// @ai:intent Human-readable token kinds this position accepts
    /// @ai:effects pure
    pub fn expected(&self) -> Vec<String> {
        let one = |s: &str| vec![s.to_string()];
        match self {
            Keyword(word) => vec![format!("`{word}`")],
            Equals => one("`=`"),
            Colon => one("`:`"),
            LBracket => one("`[`"),
            RBracket => one("`]`"),
            Index => one("index"),
            Number => one("number"),
            Count => one("count"),
            Text => one("string"),
            Flag => vec!["`<exists>`".to_string(), "`<absent>`".to_string()],
            Eof => one("end of input"),
        }
    }
}

/// @ai:intent A value shifted off the token stream, awaiting reduction
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    Count(usize),
    Text(String),
    Flag(lexer::Flag),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shifted {
    pub operand: Operand,
    pub position: Position,
}

/// Operands of one production, consumed in shift order.
///
/// The tables fix the operand order of every production, so a mismatch here is
/// a table bug rather than an input error.
pub struct Operands(std::vec::IntoIter<Shifted>);

impl Operands {
    pub fn new(shifted: Vec<Shifted>) -> Self {
        Self(shifted.into_iter())
    }

    fn next(&mut self) -> Shifted {
        match self.0.next() {
            Some(shifted) => shifted,
            None => unreachable!("production reduced with too few operands"),
        }
    }

    fn number(&mut self) -> f64 {
        match self.next().operand {
            Operand::Number(value) => value,
            other => unreachable!("expected number operand, table shifted {other:?}"),
        }
    }

    fn count(&mut self) -> usize {
        match self.next().operand {
            Operand::Count(value) => value,
            other => unreachable!("expected count operand, table shifted {other:?}"),
        }
    }

    fn text(&mut self) -> (String, Position) {
        let shifted = self.next();
        match shifted.operand {
            Operand::Text(value) => (value, shifted.position),
            other => unreachable!("expected string operand, table shifted {other:?}"),
        }
    }

    fn flag(&mut self) -> lexer::Flag {
        match self.next().operand {
            Operand::Flag(value) => value,
            other => unreachable!("expected flag operand, table shifted {other:?}"),
        }
    }
}

/// @ai:intent Convert a count token's value to a non-negative integer
/// @ai:effects pure
pub fn count_from(value: f64) -> Option<usize> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= usize::MAX as f64 {
        Some(value as usize)
    } else {
        None
    }
}

pub const FILE_TYPES: &[&str] = &["ooTextFile", "ooTextFile short"];
pub const OBJECT_CLASS: &str = "TextGrid";

/// @ai:intent Validate the file type and object class strings
/// @ai:post Err(Format) for anything that is not a TextGrid text file
/// @ai:effects pure
pub fn reduce_preamble(mut ops: Operands) -> Result<()> {
    let (file_type, _) = ops.text();
    let (object_class, _) = ops.text();

    if !FILE_TYPES.contains(&file_type.as_str()) {
        return Err(Error::Format {
            field: "file type",
            found: file_type,
        });
    }
    if object_class != OBJECT_CLASS {
        return Err(Error::Format {
            field: "object class",
            found: object_class,
        });
    }
    Ok(())
}

pub fn reduce_bounds(mut ops: Operands) -> (f64, f64) {
    (ops.number(), ops.number())
}

pub fn reduce_flag(mut ops: Operands) -> lexer::Flag {
    ops.flag()
}

pub fn reduce_count(mut ops: Operands) -> usize {
    ops.count()
}

/// @ai:intent Pick the tier variant from its class tag
/// @ai:post Err(Parse) at the tag for anything but IntervalTier or TextTier
/// @ai:effects pure
pub fn reduce_tier_class(mut ops: Operands) -> Result<TierKind> {
    let (class, position) = ops.text();
    match class.as_str() {
        "IntervalTier" => Ok(TierKind::Interval),
        "TextTier" => Ok(TierKind::Point),
        _ => Err(Error::parse(
            position,
            format!("string {class:?}"),
            [
                "string \"IntervalTier\"".to_string(),
                "string \"TextTier\"".to_string(),
            ],
        )),
    }
}

/// @ai:intent Tier attributes read before its items
#[derive(Debug, Clone, PartialEq)]
pub struct TierHeader {
    pub kind: TierKind,
    pub name: String,
    pub xmin: f64,
    pub xmax: f64,
    pub count: usize,
}

pub fn reduce_tier_head(kind: TierKind, mut ops: Operands) -> TierHeader {
    let (name, _) = ops.text();
    TierHeader {
        kind,
        name,
        xmin: ops.number(),
        xmax: ops.number(),
        count: ops.count(),
    }
}

pub fn reduce_interval(mut ops: Operands) -> Interval {
    let xmin = ops.number();
    let xmax = ops.number();
    let (text, _) = ops.text();
    Interval::new(xmin, xmax, text)
}

pub fn reduce_point(mut ops: Operands) -> Point {
    let time = ops.number();
    let (text, _) = ops.text();
    Point::new(time, text)
}

/// @ai:intent A tier whose items are still being reduced
#[derive(Debug)]
pub enum OpenTier {
    Interval(TierHeader, Vec<Interval>),
    Point(TierHeader, Vec<Point>),
}

/// Upper bound on preallocation from a declared count; the count itself is untrusted.
const MAX_PREALLOC: usize = 4096;

impl OpenTier {
    pub fn new(header: TierHeader) -> Self {
        let capacity = header.count.min(MAX_PREALLOC);
        match header.kind {
            TierKind::Interval => OpenTier::Interval(header, Vec::with_capacity(capacity)),
            TierKind::Point => OpenTier::Point(header, Vec::with_capacity(capacity)),
        }
    }

    pub fn item_production(&self) -> Production {
        match self {
            OpenTier::Interval(..) => Production::Interval,
            OpenTier::Point(..) => Production::Point,
        }
    }

    pub fn close(self) -> Tier {
        match self {
            OpenTier::Interval(h, intervals) => {
                Tier::Interval(IntervalTier::new(h.name, h.xmin, h.xmax, intervals))
            }
            OpenTier::Point(h, points) => Tier::Point(PointTier::new(h.name, h.xmin, h.xmax, points)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shifted(operands: Vec<Operand>) -> Operands {
        Operands::new(
            operands
                .into_iter()
                .map(|operand| Shifted {
                    operand,
                    position: Position::new(1, 1),
                })
                .collect(),
        )
    }

    #[test]
    fn test_short_tables_hold_only_values() {
        let productions = [
            Production::Bounds,
            Production::TierCount,
            Production::TierHead,
            Production::IntervalTierHead,
            Production::PointTierHead,
            Production::Interval,
            Production::Point,
        ];
        for production in productions {
            assert!(steps(Syntax::Short, production)
                .iter()
                .all(|s| matches!(s, Number | Count | Text)));
        }
    }

    #[test]
    fn test_tables_carry_same_operands() {
        let operands = |syntax, production| -> Vec<Step> {
            steps(syntax, production)
                .iter()
                .copied()
                .filter(|s| matches!(s, Number | Count | Text | Flag))
                .collect()
        };
        for production in [
            Production::Preamble,
            Production::Bounds,
            Production::TiersFlag,
            Production::TierCount,
            Production::TierHead,
            Production::IntervalTierHead,
            Production::PointTierHead,
            Production::Interval,
            Production::Point,
            Production::End,
        ] {
            assert_eq!(
                operands(Syntax::Full, production),
                operands(Syntax::Short, production),
                "{production:?}"
            );
        }
    }

    #[test]
    fn test_keyword_accepts_only_exact_ident() {
        assert!(Keyword("xmin").accepts(&TokenKind::Ident("xmin".to_string())));
        assert!(!Keyword("xmin").accepts(&TokenKind::Ident("xmax".to_string())));
        assert!(!Keyword("xmin").accepts(&TokenKind::Str("xmin".to_string())));
        assert!(Index.accepts(&TokenKind::Number(1.0)));
        assert!(!Text.accepts(&TokenKind::Number(1.0)));
    }

    #[test]
    fn test_count_from_rejects_fractions_and_negatives() {
        assert_eq!(count_from(3.0), Some(3));
        assert_eq!(count_from(0.0), Some(0));
        assert_eq!(count_from(1.5), None);
        assert_eq!(count_from(-1.0), None);
        assert_eq!(count_from(f64::INFINITY), None);
    }

    #[test]
    fn test_preamble_accepts_short_file_type() {
        let ops = shifted(vec![
            Operand::Text("ooTextFile short".to_string()),
            Operand::Text("TextGrid".to_string()),
        ]);
        assert!(reduce_preamble(ops).is_ok());
    }

    #[test]
    fn test_preamble_rejects_other_object_class() {
        let ops = shifted(vec![
            Operand::Text("ooTextFile".to_string()),
            Operand::Text("Pitch".to_string()),
        ]);
        match reduce_preamble(ops) {
            Err(Error::Format { field, found }) => {
                assert_eq!(field, "object class");
                assert_eq!(found, "Pitch");
            }
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tier_class_is_parse_error() {
        let ops = shifted(vec![Operand::Text("PitchTier".to_string())]);
        match reduce_tier_class(ops) {
            Err(Error::Parse { found, expected, .. }) => {
                assert_eq!(found, "string \"PitchTier\"");
                assert_eq!(expected.len(), 2);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_open_tier_closes_into_variant() {
        let header = TierHeader {
            kind: TierKind::Point,
            name: "bell".to_string(),
            xmin: 0.0,
            xmax: 2.0,
            count: 0,
        };
        let open = OpenTier::new(header);
        assert_eq!(open.item_production(), Production::Point);
        let tier = open.close();
        assert_eq!(tier.kind(), TierKind::Point);
        assert_eq!(tier.name(), "bell");
        assert!(tier.is_empty());
    }
}
