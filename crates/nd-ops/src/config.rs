//! JSON run descriptions: which operation to run on which inputs.
//!
//! ```json
//! {
//!   "op": "add",
//!   "block_id": 1,
//!   "inputs": [
//!     { "shape": [2, 3], "data": [1, 2, 3, 4, 5, 6] },
//!     { "shape": [6], "order": "f", "dtype": "f64", "data": [1, 1, 1, 1, 1, 1] }
//!   ]
//! }
//! ```

use std::path::Path;

use nd_core::{CoreError, DType, Order, Shape, Tensor};
use serde::{Deserialize, Serialize};

use crate::block::{Block, Variable};
use crate::error::OpError;
use crate::Result;

/// One operation invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Registered operation name.
    pub op: String,
    #[serde(default)]
    pub block_id: i32,
    #[serde(default)]
    pub inputs: Vec<TensorSpec>,
}

/// Description of a single input tensor.
///
/// `data` holds values in logical row-major order regardless of `order`.
/// Leaving it out (or `null`) declares the variable without a tensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorSpec {
    pub shape: Vec<usize>,
    #[serde(default)]
    pub order: Order,
    #[serde(default)]
    pub dtype: DType,
    #[serde(default)]
    pub data: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TensorSpec {
    /// Build the tensor, or `None` when no data was given.
    ///
    /// The shape must have an addressable element count even without data.
    pub fn to_tensor(&self) -> Result<Option<Tensor>> {
        if Shape::new(&self.shape).checked_numel().is_none() {
            return Err(CoreError::ShapeOverflow(self.shape.clone()).into());
        }
        let Some(data) = &self.data else {
            return Ok(None);
        };
        let tensor = Tensor::from_values(data, &self.shape, self.dtype, self.order)?;
        Ok(Some(tensor))
    }
}

impl RunConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RunConfig = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    fn check(&self) -> Result<()> {
        if self.op.trim().is_empty() {
            return Err(OpError::Config("`op` must name an operation".into()));
        }
        Ok(())
    }

    /// Turn the input specs into a block, numbering variables from 0.
    pub fn to_block(&self) -> Result<Block> {
        let mut block = Block::new(self.block_id);
        for (i, spec) in self.inputs.iter().enumerate() {
            let id = i as i32;
            let tensor = spec
                .to_tensor()
                .map_err(|e| OpError::Config(format!("input {i}: {e}")))?;
            let mut variable = match tensor {
                Some(t) => Variable::new(id, t),
                None => Variable::empty(id),
            };
            if let Some(name) = &spec.name {
                variable = variable.with_name(name.clone());
            }
            block.push_input(variable);
        }
        Ok(block)
    }
}
