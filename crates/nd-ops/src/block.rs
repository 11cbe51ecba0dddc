//! Per-invocation execution context.
//!
//! A [`Block`] groups the input variables and output slots of one operation
//! call. Operations borrow it for the duration of `execute`; the caller owns
//! it and reads results back afterwards.

use nd_core::Tensor;

/// A named graph variable wrapping at most one tensor.
#[derive(Debug, Clone, Default)]
pub struct Variable {
    id: i32,
    name: Option<String>,
    tensor: Option<Tensor>,
}

impl Variable {
    pub fn new(id: i32, tensor: Tensor) -> Self {
        Self {
            id,
            name: None,
            tensor: Some(tensor),
        }
    }

    /// A variable that has been declared but holds no tensor yet.
    pub fn empty(id: i32) -> Self {
        Self {
            id,
            name: None,
            tensor: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The wrapped tensor handle, if any.
    pub fn tensor(&self) -> Option<&Tensor> {
        self.tensor.as_ref()
    }
}

impl From<Tensor> for Variable {
    fn from(tensor: Tensor) -> Self {
        Variable::new(0, tensor)
    }
}

/// Ordered inputs plus output slots for a single operation call.
///
/// Input position 0 is the reference that the match-style checks compare
/// every other input against.
#[derive(Debug, Clone, Default)]
pub struct Block {
    id: i32,
    inputs: Vec<Variable>,
    outputs: Vec<Option<Tensor>>,
}

impl Block {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Build a block from input tensors, numbering variables from 0.
    pub fn from_tensors(id: i32, tensors: impl IntoIterator<Item = Tensor>) -> Self {
        let inputs = tensors
            .into_iter()
            .enumerate()
            .map(|(i, t)| Variable::new(i as i32, t))
            .collect();
        Self {
            id,
            inputs,
            outputs: Vec::new(),
        }
    }

    /// Builder-style input append.
    pub fn with_input(mut self, variable: impl Into<Variable>) -> Self {
        self.push_input(variable);
        self
    }

    pub fn push_input(&mut self, variable: impl Into<Variable>) {
        self.inputs.push(variable.into());
    }

    /// Graph node id this block belongs to.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Input variables in order.
    pub fn variables(&self) -> &[Variable] {
        &self.inputs
    }

    pub fn variable(&self, index: usize) -> Option<&Variable> {
        self.inputs.get(index)
    }

    /// Tensor of input `index`, if the variable exists and holds one.
    pub fn input(&self, index: usize) -> Option<&Tensor> {
        self.inputs.get(index).and_then(Variable::tensor)
    }

    /// Number of input variables.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn output(&self, index: usize) -> Option<&Tensor> {
        self.outputs.get(index).and_then(Option::as_ref)
    }

    /// Store `tensor` in output slot `index`, growing the slot list as needed.
    pub fn set_output(&mut self, index: usize, tensor: Tensor) {
        if self.outputs.len() <= index {
            self.outputs.resize(index + 1, None);
        }
        self.outputs[index] = Some(tensor);
    }

    pub fn take_output(&mut self, index: usize) -> Option<Tensor> {
        self.outputs.get_mut(index).and_then(Option::take)
    }

    /// Number of output slots (filled or not).
    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }
}
