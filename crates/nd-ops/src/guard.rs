//! Turning a failed check into a stop.
//!
//! [`require_ok`] and the [`require_ok!`](crate::require_ok!) macro are the
//! single place where a non-OK [`Status`] becomes an execution-stopping
//! [`GuardFault`]. The diagnostic is logged at `error` level before the fault
//! is returned, and callers propagate it with `?`.

use std::fmt;
use std::panic::Location;

use crate::status::Status;

/// Where a guard was evaluated, and what it evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardSite {
    expr: String,
    file: &'static str,
    line: u32,
}

impl GuardSite {
    pub fn new(expr: impl Into<String>, file: &'static str, line: u32) -> Self {
        Self {
            expr: expr.into(),
            file,
            line,
        }
    }

    /// Source text (or caller-supplied description) of the guarded check.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for GuardSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A guarded check returned something other than `Status::Ok`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed at {site} code={}({}) \"{}\"", .status.code(), .status, .site.expr())]
pub struct GuardFault {
    status: Status,
    site: GuardSite,
}

impl GuardFault {
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn site(&self) -> &GuardSite {
        &self.site
    }
}

/// Check `status` at an explicit site.
///
/// `Ok` is a no-op. Anything else is logged and returned as a [`GuardFault`].
pub fn require_at(status: Status, site: GuardSite) -> Result<(), GuardFault> {
    if status.is_ok() {
        return Ok(());
    }
    tracing::error!(
        code = status.code(),
        status = %status,
        expr = site.expr(),
        file = site.file(),
        line = site.line(),
        "validation error"
    );
    Err(GuardFault { status, site })
}

/// Check `status`, recording the caller's location and the given description.
///
/// ```
/// use nd_ops::{require_ok, Status};
///
/// assert!(require_ok(Status::Ok, "always fine").is_ok());
/// let fault = require_ok(Status::BadOrder, "orders match").unwrap_err();
/// assert_eq!(fault.status(), Status::BadOrder);
/// assert_eq!(fault.site().expr(), "orders match");
/// ```
#[track_caller]
pub fn require_ok(status: Status, expr: &str) -> Result<(), GuardFault> {
    if status.is_ok() {
        return Ok(());
    }
    let caller = Location::caller();
    require_at(status, GuardSite::new(expr, caller.file(), caller.line()))
}

/// Evaluate a status expression and `?`-propagate a [`GuardFault`] if it is not OK.
///
/// The fault records the expression's source text and the macro's
/// file and line.
///
/// ```
/// use nd_ops::{require_ok, Block, OpError, Status};
/// use nd_ops::validation::validate_non_empty_input;
///
/// fn needs_inputs(block: &Block) -> Result<Status, OpError> {
///     require_ok!(validate_non_empty_input(block));
///     Ok(Status::Ok)
/// }
///
/// let err = needs_inputs(&Block::new(0)).unwrap_err();
/// assert!(err.to_string().contains("validate_non_empty_input(block)"));
/// ```
#[macro_export]
macro_rules! require_ok {
    ($status:expr) => {
        $crate::guard::require_at(
            $status,
            $crate::guard::GuardSite::new(stringify!($status), file!(), line!()),
        )?
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpError;

    #[test]
    fn test_ok_is_noop() {
        assert_eq!(require_ok(Status::Ok, "noop"), Ok(()));
    }

    #[test]
    fn test_every_failure_trips() {
        for code in [1, 2, 3, 4, 5, 20, 30, 31, 32, 33, 34, 50] {
            let status = Status::from_code(code).unwrap();
            let fault = require_ok(status, "check").unwrap_err();
            assert_eq!(fault.status(), status);
        }
    }

    #[test]
    fn test_fault_records_caller_location() {
        let line = line!() + 1;
        let fault = require_ok(Status::BadLength, "lengths").unwrap_err();
        assert_eq!(fault.site().file(), file!());
        assert_eq!(fault.site().line(), line);
    }

    #[test]
    fn test_fault_message() {
        let fault = require_at(Status::BadOrder, GuardSite::new("orders()", "op.rs", 12)).unwrap_err();
        assert_eq!(
            fault.to_string(),
            "validation failed at op.rs:12 code=33(BAD_ORDER) \"orders()\""
        );
    }

    fn guarded(status: Status, reached: &mut bool) -> Result<Status, OpError> {
        require_ok!(status);
        *reached = true;
        Ok(Status::Ok)
    }

    #[test]
    fn test_macro_stops_execution() {
        let mut reached = false;
        let err = guarded(Status::BadDimensions, &mut reached).unwrap_err();
        assert!(!reached);
        match err {
            OpError::Guard(fault) => {
                assert_eq!(fault.status(), Status::BadDimensions);
                assert_eq!(fault.site().expr(), "status");
            }
            other => panic!("unexpected error: {other}"),
        }

        let mut reached = false;
        assert_eq!(guarded(Status::Ok, &mut reached).unwrap(), Status::Ok);
        assert!(reached);
    }
}
