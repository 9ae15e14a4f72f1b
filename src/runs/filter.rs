//! Filter tokens emitted by the run table.
//!
//! A token is the unit a search field works in: `tag:dagster/schedule=daily`
//! is `{ token: "tag", value: "dagster/schedule=daily" }`.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::{Result, RunboardError};

/// Token name: lowercase identifier before the first `:`
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z][a-z0-9_]*):(.*)$").expect("valid regex"));

/// Callback that receives a replacement filter set
pub type OnSetFilter<'a> = &'a dyn Fn(Vec<FilterToken>);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterToken {
    pub token: String,
    pub value: String,
}

impl FilterToken {
    pub fn new(token: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            value: value.into(),
        }
    }

    /// Kind of filter, if the query layer understands this token
    pub fn kind(&self) -> Option<FilterKind> {
        FilterKind::from_token(&self.token)
    }
}

impl fmt::Display for FilterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.token, self.value)
    }
}

impl FromStr for FilterToken {
    type Err = RunboardError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = TOKEN_RE
            .captures(s.trim())
            .ok_or_else(|| RunboardError::InvalidFilterToken { raw: s.to_string() })?;
        let token = FilterToken::new(&caps[1], &caps[2]);
        if token.value.is_empty() || token.kind().is_none() {
            return Err(RunboardError::InvalidFilterToken { raw: s.to_string() });
        }
        Ok(token)
    }
}

/// Filter kinds understood by the runs query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Id,
    Pipeline,
    Status,
    Tag,
}

impl FilterKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "id" => Some(Self::Id),
            "pipeline" => Some(Self::Pipeline),
            "status" => Some(Self::Status),
            "tag" => Some(Self::Tag),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Pipeline => "pipeline",
            Self::Status => "status",
            Self::Tag => "tag",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter Queue
// ─────────────────────────────────────────────────────────────────────────────

/// Parent-owned queue of filter requests.
///
/// Rows only see the sending side through [`FilterQueue::emitter`]; the owner
/// drains the queue after each input event and applies the latest request.
pub struct FilterQueue {
    tx: mpsc::UnboundedSender<Vec<FilterToken>>,
    rx: mpsc::UnboundedReceiver<Vec<FilterToken>>,
}

impl FilterQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Closure usable as an [`OnSetFilter`] callback
    pub fn emitter(&self) -> impl Fn(Vec<FilterToken>) + '_ {
        move |tokens| {
            // The receiver lives as long as the queue, so send cannot fail here.
            let _ = self.tx.send(tokens);
        }
    }

    /// Take every pending request, oldest first
    pub fn drain(&mut self) -> Vec<Vec<FilterToken>> {
        let mut pending = Vec::new();
        while let Ok(tokens) = self.rx.try_recv() {
            pending.push(tokens);
        }
        pending
    }
}

impl Default for FilterQueue {
    fn default() -> Self {
        Self::new()
    }
}
