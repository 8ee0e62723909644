//! @ai:module:intent Drive the grammar tables over a token stream to build a TextGrid
//! @ai:module:layer application
//! @ai:module:public_api parse_textgrid, parse_str, parse_file, Parser, Source
//! @ai:module:depends_on lexer, grammar, format, consistency, config, error
//! @ai:module:stateless true
//!
//! The parser is a deterministic shift/reduce loop with one token of
//! lookahead. Its state is the current production and the position inside it.
//! For every state and lookahead exactly one action applies: shift when the
//! token matches the step, reduce when the production is complete, fail
//! otherwise. Nothing is retried.

use crate::config::ParseOptions;
use crate::consistency::check_consistency;
use crate::error::{Error, Position, Result};
use crate::format::Syntax;
use crate::grammar::{self, OpenTier, Operand, Operands, Production, Shifted, Step};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::textgrid::{TextGrid, Tier, TierKind};
use std::path::Path;

/// @ai:intent Where the raw TextGrid text comes from
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Path(&'a Path),
    Text(&'a str),
}

impl<'a> From<&'a Path> for Source<'a> {
    fn from(path: &'a Path) -> Self {
        Source::Path(path)
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(text: &'a str) -> Self {
        Source::Text(text)
    }
}

/// @ai:intent Parse a TextGrid and return its tiers in file order
/// @ai:post on Err no partial result is produced
/// @ai:effects fs:read when source is a path
pub fn parse_textgrid(source: Source<'_>, options: &ParseOptions) -> Result<Vec<Tier>> {
    let grid = match source {
        Source::Path(path) => parse_file(path, options)?,
        Source::Text(text) => parse_str(text, options)?,
    };
    Ok(grid.into_tiers())
}

/// @ai:intent Read a TextGrid file from disk and parse it
/// @ai:pre path exists and is readable as UTF-8
/// @ai:effects fs:read
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<TextGrid> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "read TextGrid file");
    parse_str(&content, options)
}

/// @ai:intent Parse in-memory TextGrid text, optionally checking consistency
/// @ai:effects pure
pub fn parse_str(text: &str, options: &ParseOptions) -> Result<TextGrid> {
    let tokens = tokenize(text)?;
    let syntax = options.format.resolve(&tokens);
    let grid = Parser::new(tokens, syntax).parse()?;

    if options.check_consistency {
        check_consistency(&grid)?;
    }
    Ok(grid)
}

/// @ai:intent Declared length of a list and how many items have been reduced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counter {
    declared: usize,
    consumed: usize,
}

impl Counter {
    fn new(declared: usize) -> Self {
        Self {
            declared,
            consumed: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.declared - self.consumed
    }

    /// 1-based index the next bracketed item must carry.
    fn next_index(&self) -> usize {
        self.consumed + 1
    }
}

enum Action {
    Shift(Step),
    Reduce,
    Error(Vec<String>),
}

/// @ai:intent Single-use parser over a fully tokenized input
pub struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    syntax: Syntax,
    production: Production,
    step: usize,
    operands: Vec<Shifted>,
    tier_count: Counter,
    item_count: Counter,
    bounds: (f64, f64),
    tiers: Vec<Tier>,
    open: Option<OpenTier>,
}

impl Parser {
    /// @ai:post the token stream ends with Eof, appended when missing
    pub fn new(mut tokens: Vec<Token>, syntax: Syntax) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let position = tokens
                .last()
                .map_or(Position::new(1, 1), |t| t.position);
            tokens.push(Token {
                kind: TokenKind::Eof,
                position,
            });
        }
        Self {
            tokens,
            cursor: 0,
            syntax,
            production: Production::Preamble,
            step: 0,
            operands: Vec::new(),
            tier_count: Counter::default(),
            item_count: Counter::default(),
            bounds: (0.0, 0.0),
            tiers: Vec::new(),
            open: None,
        }
    }

    /// @ai:intent Run the shift/reduce loop to acceptance or the first error
    /// @ai:effects pure
    pub fn parse(mut self) -> Result<TextGrid> {
        tracing::debug!(syntax = %self.syntax, tokens = self.tokens.len(), "parsing TextGrid");
        loop {
            match self.action() {
                Action::Shift(step) => self.shift(step)?,
                Action::Reduce => {
                    if let Some(grid) = self.reduce()? {
                        return Ok(grid);
                    }
                }
                Action::Error(expected) => {
                    let token = self.lookahead();
                    return Err(Error::parse(token.position, token.kind.to_string(), expected));
                }
            }
        }
    }

    fn lookahead(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.cursor.min(last)]
    }

    fn action(&self) -> Action {
        match grammar::steps(self.syntax, self.production).get(self.step) {
            None => Action::Reduce,
            Some(step) if step.accepts(&self.lookahead().kind) => Action::Shift(*step),
            Some(Step::Index) => Action::Error(vec![self.index_expected()]),
            Some(step) => Action::Error(step.expected()),
        }
    }

    fn index_counter(&self) -> Counter {
        match self.production {
            Production::TierHead => self.tier_count,
            _ => self.item_count,
        }
    }

    fn index_expected(&self) -> String {
        format!("index {}", self.index_counter().next_index())
    }

    fn shift(&mut self, step: Step) -> Result<()> {
        let token = self.lookahead().clone();
        let operand = match (step, token.kind) {
            (Step::Number, TokenKind::Number(value)) => Some(Operand::Number(value)),
            (Step::Text, TokenKind::Str(value)) => Some(Operand::Text(value)),
            (Step::Flag, TokenKind::Flag(flag)) => Some(Operand::Flag(flag)),
            (Step::Count, TokenKind::Number(value)) => match grammar::count_from(value) {
                Some(count) => Some(Operand::Count(count)),
                None => {
                    return Err(Error::parse(
                        token.position,
                        format!("number {value}"),
                        ["non-negative integer count".to_string()],
                    ))
                }
            },
            (Step::Index, TokenKind::Number(value)) => {
                let expected = self.index_counter().next_index();
                if grammar::count_from(value) != Some(expected) {
                    return Err(Error::parse(
                        token.position,
                        format!("index {value}"),
                        [self.index_expected()],
                    ));
                }
                None
            }
            _ => None,
        };

        if let Some(operand) = operand {
            self.operands.push(Shifted {
                operand,
                position: token.position,
            });
        }
        if step != Step::Eof {
            self.cursor += 1;
        }
        self.step += 1;
        Ok(())
    }

    fn goto(&mut self, production: Production) {
        self.production = production;
        self.step = 0;
    }

    /// Returns the finished grid once `End` is reduced.
    fn reduce(&mut self) -> Result<Option<TextGrid>> {
        let ops = Operands::new(std::mem::take(&mut self.operands));

        match self.production {
            Production::Preamble => {
                grammar::reduce_preamble(ops)?;
                self.goto(Production::Bounds);
            }
            Production::Bounds => {
                self.bounds = grammar::reduce_bounds(ops);
                self.goto(Production::TiersFlag);
            }
            Production::TiersFlag => match grammar::reduce_flag(ops) {
                crate::lexer::Flag::Exists => self.goto(Production::TierCount),
                crate::lexer::Flag::Absent => {
                    self.tier_count = Counter::new(0);
                    self.goto(Production::End);
                }
            },
            Production::TierCount => {
                self.tier_count = Counter::new(grammar::reduce_count(ops));
                tracing::trace!(declared = self.tier_count.declared, "tier count");
                self.next_tier();
            }
            Production::TierHead => match grammar::reduce_tier_class(ops)? {
                TierKind::Interval => self.goto(Production::IntervalTierHead),
                TierKind::Point => self.goto(Production::PointTierHead),
            },
            Production::IntervalTierHead | Production::PointTierHead => {
                let kind = match self.production {
                    Production::IntervalTierHead => TierKind::Interval,
                    _ => TierKind::Point,
                };
                let header = grammar::reduce_tier_head(kind, ops);
                self.item_count = Counter::new(header.count);
                self.open = Some(OpenTier::new(header));
                self.next_item();
            }
            Production::Interval => {
                let interval = grammar::reduce_interval(ops);
                match self.open.as_mut() {
                    Some(OpenTier::Interval(_, intervals)) => intervals.push(interval),
                    _ => unreachable!("interval reduced outside an interval tier"),
                }
                self.item_count.consumed += 1;
                self.next_item();
            }
            Production::Point => {
                let point = grammar::reduce_point(ops);
                match self.open.as_mut() {
                    Some(OpenTier::Point(_, points)) => points.push(point),
                    _ => unreachable!("point reduced outside a point tier"),
                }
                self.item_count.consumed += 1;
                self.next_item();
            }
            Production::End => {
                let (xmin, xmax) = self.bounds;
                let tiers = std::mem::take(&mut self.tiers);
                tracing::debug!(tiers = tiers.len(), "accepted TextGrid");
                return Ok(Some(TextGrid::new(xmin, xmax, tiers)));
            }
        }
        Ok(None)
    }

    fn next_item(&mut self) {
        if self.item_count.remaining() > 0 {
            if let Some(open) = &self.open {
                let production = open.item_production();
                self.goto(production);
                return;
            }
        }
        if let Some(open) = self.open.take() {
            let tier = open.close();
            tracing::debug!(
                index = self.tiers.len(),
                name = tier.name(),
                class = tier.class_name(),
                items = tier.len(),
                "reduced tier"
            );
            self.tiers.push(tier);
            self.tier_count.consumed += 1;
        }
        self.next_tier();
    }

    fn next_tier(&mut self) {
        if self.tier_count.remaining() > 0 {
            self.goto(Production::TierHead);
        } else {
            self.goto(Production::End);
        }
    }
}
