//! Copy-to-clipboard policy and the transient feedback label
//!
//! The browser bindings live in `platform::clipboard`; this module decides
//! what a pair of attempts adds up to and what the button should say.

use crate::consts::COPY_FEEDBACK_MS;
use crate::error::{Error, Result};

pub const COPIED_LABEL: &str = "Copied!";
pub const FAILED_LABEL: &str = "Copy failed";

/// Which mechanism ended up writing the clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    ClipboardApi,
    SelectionFallback,
}

/// Combine the primary attempt with the fallback. The fallback only runs
/// when the primary was denied.
pub fn resolve_copy<F>(primary: Result<()>, fallback: F) -> Result<CopyMethod>
where
    F: FnOnce() -> Result<()>,
{
    match primary {
        Ok(()) => Ok(CopyMethod::ClipboardApi),
        Err(denied) => {
            log::warn!("{denied}, trying selection copy");
            match fallback() {
                Ok(()) => Ok(CopyMethod::SelectionFallback),
                Err(Error::CopyFailed(reason)) => Err(Error::CopyFailed(reason)),
                Err(other) => Err(Error::CopyFailed(other.to_string())),
            }
        }
    }
}

/// Label shown on the copy button after an attempt
#[derive(Debug, Clone, PartialEq)]
pub struct CopyFeedback {
    message: Option<&'static str>,
    clear_at: f64,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl CopyFeedback {
    pub fn new() -> Self {
        Self {
            message: None,
            clear_at: 0.0,
        }
    }

    /// Show the outcome of a copy for `COPY_FEEDBACK_MS`
    pub fn show(&mut self, outcome: &Result<CopyMethod>, now: f64) -> &'static str {
        let message = match outcome {
            Ok(_) => COPIED_LABEL,
            Err(_) => FAILED_LABEL,
        };
        self.message = Some(message);
        self.clear_at = now + COPY_FEEDBACK_MS;
        message
    }

    /// Current message, if any. Expired messages are dropped.
    pub fn current(&mut self, now: f64) -> Option<&'static str> {
        if self.message.is_some() && now >= self.clear_at {
            self.message = None;
        }
        self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_success_skips_fallback() {
        let result = resolve_copy(Ok(()), || panic!("fallback must not run"));
        assert_eq!(result, Ok(CopyMethod::ClipboardApi));
    }

    #[test]
    fn test_denied_recovers_with_fallback() {
        let result = resolve_copy(Err(Error::ClipboardDenied("NotAllowedError".into())), || Ok(()));
        assert_eq!(result, Ok(CopyMethod::SelectionFallback));
    }

    #[test]
    fn test_both_failing_surfaces_copy_failed() {
        let result = resolve_copy(Err(Error::ClipboardDenied("no api".into())), || {
            Err(Error::CopyFailed("execCommand returned false".into()))
        });
        assert_eq!(result, Err(Error::CopyFailed("execCommand returned false".into())));
    }

    #[test]
    fn test_feedback_clears_after_two_seconds() {
        let mut feedback = CopyFeedback::new();
        assert_eq!(feedback.current(0.0), None);

        let label = feedback.show(&Err(Error::CopyFailed("x".into())), 1000.0);
        assert_eq!(label, FAILED_LABEL);
        assert_eq!(feedback.current(2999.0), Some(FAILED_LABEL));
        assert_eq!(feedback.current(3000.0), None);
        assert_eq!(feedback.current(3001.0), None);
    }

    #[test]
    fn test_feedback_restarts_on_new_copy() {
        let mut feedback = CopyFeedback::new();
        feedback.show(&Ok(CopyMethod::ClipboardApi), 0.0);
        feedback.show(&Ok(CopyMethod::SelectionFallback), 1500.0);
        assert_eq!(feedback.current(3000.0), Some(COPIED_LABEL));
    }
}
