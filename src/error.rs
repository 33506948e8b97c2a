//! Error definitions shared across library modules.
//! The taxonomy is deliberately local: every failure is reported to the
//! immediate caller and none of them is fatal.
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Failures reported by the dispatch registry and listener subscriptions.
pub enum RegistryError {
    /// Mailbox index outside `[0, num_filters)`.
    #[error("Invalid mailbox {mailbox}: only {num_filters} available")]
    InvalidMailbox { mailbox: usize, num_filters: usize },
    /// Every listener slot is taken.
    #[error("Listener registry is full")]
    RegistryFull,
    /// The listener is not attached to this registry.
    #[error("Listener not found")]
    NotFound,
    /// Registration tables are borrowed by an in-flight dispatch.
    #[error("Registry busy")]
    Busy,
}
