use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a validation step or of an operation's execution.
///
/// `Ok` is the only success value. The numeric codes are stable and shared
/// with the rest of the engine, so they are what gets logged and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum Status {
    Ok = 0,
    BadInput = 1,
    BadShape = 2,
    BadRank = 3,
    BadParams = 4,
    BadOutput = 5,
    Validation = 20,
    BadGraph = 30,
    BadLength = 31,
    BadDimensions = 32,
    BadOrder = 33,
    BadArguments = 34,
    KernelFailure = 50,
}

impl Status {
    const ALL: [Status; 13] = [
        Status::Ok,
        Status::BadInput,
        Status::BadShape,
        Status::BadRank,
        Status::BadParams,
        Status::BadOutput,
        Status::Validation,
        Status::BadGraph,
        Status::BadLength,
        Status::BadDimensions,
        Status::BadOrder,
        Status::BadArguments,
        Status::KernelFailure,
    ];

    /// Whether this is the success value.
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }

    /// Numeric status code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Look up a status by its numeric code.
    pub fn from_code(code: i32) -> Option<Status> {
        Self::ALL.iter().copied().find(|s| s.code() == code)
    }

    /// Run `next` only if this status is `Ok`; otherwise keep the failure.
    ///
    /// ```
    /// use nd_ops::Status;
    ///
    /// let s = Status::BadOrder.and_then(|| Status::BadLength);
    /// assert_eq!(s, Status::BadOrder);
    /// ```
    pub fn and_then(self, next: impl FnOnce() -> Status) -> Status {
        if self.is_ok() {
            next()
        } else {
            self
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadInput => "BAD_INPUT",
            Status::BadShape => "BAD_SHAPE",
            Status::BadRank => "BAD_RANK",
            Status::BadParams => "BAD_PARAMS",
            Status::BadOutput => "BAD_OUTPUT",
            Status::Validation => "VALIDATION",
            Status::BadGraph => "BAD_GRAPH",
            Status::BadLength => "BAD_LENGTH",
            Status::BadDimensions => "BAD_DIMENSIONS",
            Status::BadOrder => "BAD_ORDER",
            Status::BadArguments => "BAD_ARGUMENTS",
            Status::KernelFailure => "KERNEL_FAILURE",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_ok_is_ok() {
        for s in Status::ALL {
            assert_eq!(s.is_ok(), s == Status::Ok);
        }
    }

    #[test]
    fn test_codes_are_distinct() {
        for (i, a) in Status::ALL.iter().enumerate() {
            for b in &Status::ALL[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Status::from_code(0), Some(Status::Ok));
        assert_eq!(Status::from_code(31), Some(Status::BadLength));
        assert_eq!(Status::from_code(33), Some(Status::BadOrder));
        assert_eq!(Status::from_code(999), None);
    }

    #[test]
    fn test_and_then_short_circuits() {
        let mut ran = false;
        let s = Status::BadInput.and_then(|| {
            ran = true;
            Status::Ok
        });
        assert_eq!(s, Status::BadInput);
        assert!(!ran);
        assert_eq!(Status::Ok.and_then(|| Status::BadDimensions), Status::BadDimensions);
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(format!("{}", Status::BadDimensions), "BAD_DIMENSIONS");
        let json = serde_json::to_string(&Status::BadLength).unwrap();
        assert_eq!(json, "\"BAD_LENGTH\"");
    }
}
