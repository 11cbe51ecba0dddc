use std::fmt;

use serde::Serialize;

use crate::error::OpError;
use crate::Result;

/// Immutable identity and arity of an operation kind.
///
/// `num_inputs` is the minimum number of input variables the operation
/// needs; `num_outputs` is how many output slots it writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OpDescriptor {
    name: String,
    num_inputs: usize,
    num_outputs: usize,
}

impl OpDescriptor {
    /// Create a descriptor.
    ///
    /// # Panics
    /// Panics if `name` is empty. Use [`OpDescriptor::try_new`] for names
    /// and counts that come from outside the program.
    pub fn new(name: impl Into<String>, num_inputs: usize, num_outputs: usize) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "operation name must not be empty");
        Self {
            name,
            num_inputs,
            num_outputs,
        }
    }

    /// Create a descriptor from signed counts, rejecting negatives and empty names.
    pub fn try_new(name: impl Into<String>, num_inputs: i64, num_outputs: i64) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(OpError::EmptyName);
        }
        let num_inputs = usize::try_from(num_inputs).map_err(|_| OpError::NegativeCount {
            op: name.clone(),
            which: "input",
            count: num_inputs,
        })?;
        let num_outputs = usize::try_from(num_outputs).map_err(|_| OpError::NegativeCount {
            op: name.clone(),
            which: "output",
            count: num_outputs,
        })?;
        Ok(Self {
            name,
            num_inputs,
            num_outputs,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minimum number of input variables.
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    /// Number of output slots written.
    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }
}

impl fmt::Display for OpDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(in={}, out={})", self.name, self.num_inputs, self.num_outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let d = OpDescriptor::new("add", 2, 1);
        assert_eq!(d.name(), "add");
        assert_eq!(d.num_inputs(), 2);
        assert_eq!(d.num_outputs(), 1);
        assert_eq!(format!("{d}"), "add(in=2, out=1)");
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn test_empty_name_panics() {
        OpDescriptor::new("", 1, 1);
    }

    #[test]
    fn test_try_new_rejects_negative_counts() {
        let err = OpDescriptor::try_new("conv2d", -1, 1).unwrap_err();
        assert!(matches!(err, OpError::NegativeCount { which: "input", count: -1, .. }));

        let err = OpDescriptor::try_new("conv2d", 3, -2).unwrap_err();
        assert!(matches!(err, OpError::NegativeCount { which: "output", count: -2, .. }));

        assert!(matches!(OpDescriptor::try_new("", 0, 0), Err(OpError::EmptyName)));
        assert_eq!(OpDescriptor::try_new("noop", 0, 0).unwrap().num_inputs(), 0);
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&OpDescriptor::new("matmul", 2, 1)).unwrap();
        assert_eq!(json, r#"{"name":"matmul","num_inputs":2,"num_outputs":1}"#);
    }
}
