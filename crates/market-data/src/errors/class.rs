/// Classification for fallback policy.
///
/// Used to determine how the cascade should respond to errors from providers.
///
/// # Behavior Summary
///
/// | Class | Substitute Content? | Caller Sees Error? |
/// |-------|--------------------|--------------------|
/// | `Substitute(_)` | Yes | No |
/// | `Surface` | No | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FallbackClass {
    /// Mask the error with a substitute dataset shaped like a genuine
    /// response. The wrapped [`FailureCause`] is retained for status
    /// reporting so the substitution stays internally distinguishable.
    Substitute(FailureCause),

    /// Surface the error to the caller unchanged.
    ///
    /// Used for caller mistakes (`InvalidRequest`) and unexpected local
    /// faults (`Internal`) - the one class of errors that must never be
    /// masked behind plausible-looking data.
    Surface,
}

/// The upstream condition that triggered a substitution.
///
/// Status reporting maps these onto provider states: rate limiting and
/// outages mean a provider is degraded, a missing credential means it was
/// never configured at all.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureCause {
    /// The upstream explicitly throttled the request.
    RateLimited,

    /// The upstream was unreachable, timed out, or returned a server error.
    Unavailable,

    /// The required credential is absent.
    NotConfigured,
}
