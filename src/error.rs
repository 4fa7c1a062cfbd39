//! Error kinds shared across the engine's public surface.

use std::time::Duration;
use thiserror::Error;

/// Errors that can terminate a call to the engine outright.
///
/// Per-probe failures never surface here: a probe that fails degrades to a
/// neutral sub-result (see [`crate::result::ProbeOutcome`]) and the overall
/// validation still completes. `Error` is reserved for the cases spec §7
/// calls fatal: malformed input, rate limiting, and circuit-open conditions
/// that a caller asked to observe directly (e.g. the SMTP prober surfacing
/// why it produced an `unknown` result).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("invalid email syntax: {0}")]
    InvalidSyntax(String),

    #[error("bulk request exceeds the maximum of {max} addresses (got {got})")]
    InvalidBulkSize { max: usize, got: usize },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("DNS provider(s) unavailable: {0}")]
    DnsUnavailable(String),

    #[error("DNS query timed out")]
    DnsTimeout,

    #[error("could not reach any SMTP host for the domain")]
    SmtpUnreachable,

    #[error("SMTP server rejected the dialog with code {code}")]
    SmtpRejected { code: u16 },

    #[error("circuit breaker '{0}' is open")]
    CircuitOpen(String),

    #[error("probe exceeded its timeout")]
    ProbeTimeout,

    #[error("transient upstream failure: {0}")]
    TransientUpstream(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Structured `{code, message}` shape for callers that need to report a
    /// fatal error without any partial result, per spec §7.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidSyntax(_) => "invalid_syntax",
            Error::InvalidBulkSize { .. } => "invalid_bulk_size",
            Error::RateLimited { .. } => "rate_limited",
            Error::DnsUnavailable(_) => "dns_unavailable",
            Error::DnsTimeout => "dns_timeout",
            Error::SmtpUnreachable => "smtp_unreachable",
            Error::SmtpRejected { .. } => "smtp_rejected",
            Error::CircuitOpen(_) => "circuit_open",
            Error::ProbeTimeout => "probe_timeout",
            Error::TransientUpstream(_) => "transient_upstream",
            Error::InvalidInput(_) => "invalid_input",
        }
    }
}
