//! Upstream trade sources.
//!
//! A [`TradeSource`] hands the pipeline the raw batches of one trade date.
//! Transport, retries and authentication are the source's own business; the
//! pipeline only needs the column mappings.
//!
//! | Source | Description |
//! |--------|-------------|
//! | [`SimulatedTradeSource`] | Random day of positions with injected gaps |
//! | [`JsonFileTradeSource`] | JSON array of batches read from disk |

mod json_file;
mod simulated;

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDate;

use crate::batch::RawBatch;

pub use json_file::JsonFileTradeSource;
pub use simulated::SimulatedTradeSource;

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    InvalidRequest,
    Malformed,
}

/// Structured upstream error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Malformed,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Malformed => "source.malformed",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Upstream provider contract.
///
/// Implementations must be `Send + Sync`; the returned future is boxed so the
/// trait stays object safe.
pub trait TradeSource: Send + Sync {
    /// Short name used in logs and run reports.
    fn name(&self) -> &'static str;

    /// Fetch every batch recorded for `trade_date`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the upstream cannot be reached or its
    /// payload cannot be decoded into batches.
    fn fetch_trades<'a>(
        &'a self,
        trade_date: NaiveDate,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawBatch>, SourceError>> + Send + 'a>>;
}
