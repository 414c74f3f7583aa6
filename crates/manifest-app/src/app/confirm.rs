//! Confirmation gate for destructive operations

/// Asked before anything irreversible happens. Returning `false` leaves the
/// state untouched.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Approves every prompt (`--yes`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
