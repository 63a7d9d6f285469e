/// Non-fatal scroll-to failures.
///
/// None of these should crash a host: the list simply ends up at a best-effort offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScrollToError {
    /// No item in the current data set has the requested key.
    #[error("scroll_to: no item matches the requested key")]
    InvalidTarget,
    /// The iteration budget ran out before the target offset stabilized.
    #[error("scroll_to: gave up after {attempts} attempts without converging")]
    ConvergenceExhausted { attempts: u32 },
    /// The controller was cancelled (the list is being torn down).
    #[error("scroll_to: controller was cancelled")]
    Cancelled,
}
