//! Typed modifiers; `from_flags` gives `None` when no relevant flag is set.

use std::str::FromStr;

use crate::cmd_parser::Flags;
use crate::coerce::{self, Numeric};

/// `SET` modifiers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SetOptions {
    pub expire_seconds: Option<i64>,
    pub expire_millis: Option<i64>,
    pub expire_at_seconds: Option<i64>,
    pub expire_at_millis: Option<i64>,
    pub only_if_absent: bool,
    pub only_if_present: bool,
    pub keep_ttl: bool,
    pub return_old_value: bool,
}

impl SetOptions {
    pub fn from_flags(flags: &Flags) -> Option<Self> {
        let opts = SetOptions {
            expire_seconds: flags.ex,
            expire_millis: flags.px,
            expire_at_seconds: flags.exat,
            expire_at_millis: flags.pxat,
            only_if_absent: flags.nx,
            only_if_present: flags.xx,
            keep_ttl: flags.keepttl,
            return_old_value: flags.get,
        };
        (opts != SetOptions::default()).then_some(opts)
    }

    /// Modifier tokens in wire order. Within a conflicting group only the
    /// first set option is sent: `NX` over `XX`, then `EX`, `PX`, `EXAT`,
    /// `PXAT`, `KEEPTTL`.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.only_if_absent {
            args.push("NX".to_string());
        } else if self.only_if_present {
            args.push("XX".to_string());
        }
        if self.return_old_value {
            args.push("GET".to_string());
        }
        let expiry = [
            ("EX", self.expire_seconds),
            ("PX", self.expire_millis),
            ("EXAT", self.expire_at_seconds),
            ("PXAT", self.expire_at_millis),
        ]
        .into_iter()
        .find_map(|(name, value)| value.map(|value| (name, value)));
        match expiry {
            Some((name, value)) => {
                args.push(name.to_string());
                args.push(value.to_string());
            }
            None if self.keep_ttl => args.push("KEEPTTL".to_string()),
            None => {}
        }
        args
    }
}

/// `ZADD` modifiers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ZAddOptions {
    pub only_new: bool,
    pub only_existing: bool,
    pub only_greater: bool,
    pub only_less: bool,
    pub return_changed: bool,
}

impl ZAddOptions {
    pub fn from_flags(flags: &Flags) -> Option<Self> {
        let opts = ZAddOptions {
            only_new: flags.nx,
            only_existing: flags.xx,
            only_greater: flags.gt,
            only_less: flags.lt,
            return_changed: flags.ch,
        };
        (opts != ZAddOptions::default()).then_some(opts)
    }

    /// `NX` wins over `XX` and `LT` over `GT`.
    pub fn to_args(&self) -> Vec<String> {
        [
            (self.only_new, "NX"),
            (self.only_existing && !self.only_new, "XX"),
            (self.only_greater && !self.only_less, "GT"),
            (self.only_less, "LT"),
            (self.return_changed, "CH"),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .map(|(_, name)| name.to_string())
        .collect()
    }
}

/// `--limit offset,count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub offset: i64,
    pub count: i64,
}

impl FromStr for Limit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (offset, count) = s
            .split_once(',')
            .ok_or_else(|| format!("expected <offset,count>, got '{s}'"))?;
        let parse = |part: &str, what: &str| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| format!("invalid {what} '{}' in limit '{s}'", part.trim()))
        };
        Ok(Limit {
            offset: parse(offset, "offset")?,
            count: parse(count, "count")?,
        })
    }
}

/// Options of the generalized sorted-set range.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RangeOptions {
    pub with_scores: bool,
    pub by_score: bool,
    pub by_lex: bool,
    pub rev: bool,
    pub limit: Option<Limit>,
}

impl RangeOptions {
    /// Every range flag, as taken by `ZRANGE` and `ZREVRANGE`.
    pub fn from_flags(flags: &Flags) -> Option<Self> {
        let opts = RangeOptions {
            by_score: flags.byscore,
            by_lex: flags.bylex,
            rev: flags.rev,
            ..Self::paging(flags)
        };
        (opts != RangeOptions::default()).then_some(opts)
    }

    /// Only `--withscores` and `--limit`, as taken by the score-bounded
    /// variants.
    pub fn paging_from_flags(flags: &Flags) -> Option<Self> {
        let opts = Self::paging(flags);
        (opts != RangeOptions::default()).then_some(opts)
    }

    fn paging(flags: &Flags) -> Self {
        RangeOptions {
            with_scores: flags.withscores,
            limit: flags.limit,
            ..Default::default()
        }
    }

    pub fn by_score(mut self) -> Self {
        self.by_score = true;
        self
    }

    pub fn rev(mut self) -> Self {
        self.rev = true;
        self
    }

    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.by_score {
            args.push("BYSCORE".to_string());
        }
        if self.by_lex {
            args.push("BYLEX".to_string());
        }
        if self.rev {
            args.push("REV".to_string());
        }
        if let Some(limit) = self.limit {
            args.extend(["LIMIT".to_string(), limit.offset.to_string(), limit.count.to_string()]);
        }
        if self.with_scores {
            args.push("WITHSCORES".to_string());
        }
        args
    }
}

/// `MATCH` / `COUNT` modifiers of the scan family.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScanOptions {
    pub pattern: Option<String>,
    pub count: Option<Numeric>,
}

impl ScanOptions {
    /// Pick `MATCH <pattern>` and `COUNT <n>` out of `tokens`, in any order and
    /// case-insensitively. A keyword without a following token is ignored, as
    /// is anything unrecognized.
    pub fn parse(tokens: &[String]) -> Option<Self> {
        let mut opts = ScanOptions::default();
        let mut iter = tokens.iter();
        while let Some(token) = iter.next() {
            if token.eq_ignore_ascii_case("MATCH") {
                if let Some(pattern) = iter.next() {
                    opts.pattern = Some(pattern.clone());
                }
            } else if token.eq_ignore_ascii_case("COUNT") {
                if let Some(count) = iter.next() {
                    opts.count = Some(coerce::numeric(count));
                }
            }
        }
        (opts != ScanOptions::default()).then_some(opts)
    }

    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(pattern) = &self.pattern {
            args.extend(["MATCH".to_string(), pattern.clone()]);
        }
        if let Some(count) = &self.count {
            args.extend(["COUNT".to_string(), count.to_string()]);
        }
        args
    }
}
