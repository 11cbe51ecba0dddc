use crate::block::Block;
use crate::descriptor::OpDescriptor;
use crate::status::Status;
use crate::Result;

/// Base trait for every numeric operation.
///
/// Implementors own their [`OpDescriptor`] and provide
/// [`validate_and_execute`](DeclarableOp::validate_and_execute). Callers go
/// through [`Execute::execute`], which is implemented for every
/// `DeclarableOp` and cannot be replaced.
///
/// Operations keep no per-call state: the block is borrowed for one call
/// only, so a single instance can serve concurrent calls as long as each
/// call has its own block.
pub trait DeclarableOp: Send + Sync {
    /// Name and arity of this operation.
    fn descriptor(&self) -> &OpDescriptor;

    /// Validate the block, then compute and write outputs.
    ///
    /// Run the checks this operation's semantics need, in order, stopping at
    /// the first failure. Return that failure's status without doing the
    /// numeric work, or guard the check with [`require_ok!`](crate::require_ok!)
    /// to stop with an [`OpError::Guard`](crate::OpError::Guard). On success
    /// write the outputs into the block and return `Status::Ok`.
    fn validate_and_execute(&self, block: &mut Block) -> Result<Status>;

    fn op_name(&self) -> &str {
        self.descriptor().name()
    }
}

/// Public entry point for running an operation.
pub trait Execute {
    /// Run the operation on `block`.
    ///
    /// # Panics
    /// Panics if `block` is `None`. A missing block is a caller bug, not a
    /// data problem, and the operation's own logic is never reached.
    fn execute(&self, block: Option<&mut Block>) -> Result<Status>;
}

impl<T: DeclarableOp + ?Sized> Execute for T {
    fn execute(&self, block: Option<&mut Block>) -> Result<Status> {
        let Some(block) = block else {
            tracing::error!(op = self.op_name(), "execute called without a block");
            panic!("{}: execute called without a block", self.op_name());
        };

        let span = tracing::trace_span!("execute", op = self.op_name(), block = block.id());
        let _enter = span.enter();

        let result = self.validate_and_execute(block);
        match &result {
            Ok(status) => tracing::trace!(code = status.code(), status = %status, "finished"),
            Err(err) => tracing::debug!(error = %err, "aborted"),
        }
        result
    }
}

/// Declare an operation struct together with its descriptor and body.
///
/// Generates the struct (holding its [`OpDescriptor`]), `new()`, `Default`,
/// and the [`DeclarableOp`] impl.
///
/// ```
/// use nd_ops::{declare_op, require_ok, Block, Execute, Status};
/// use nd_ops::validation::validate_non_empty_input;
///
/// declare_op! {
///     /// Copies input 0 to output 0.
///     pub struct Duplicate("duplicate", inputs = 1, outputs = 1);
///
///     fn validate_and_execute(&self, block) {
///         require_ok!(validate_non_empty_input(block));
///         let input = block.input(0).cloned();
///         if let Some(t) = input {
///             block.set_output(0, t);
///         }
///         Ok(Status::Ok)
///     }
/// }
///
/// let op = Duplicate::new();
/// assert_eq!(op.descriptor().num_inputs(), 1);
/// let mut block = Block::new(0).with_input(nd_core::Tensor::from_f32(&[1.0], &[1]));
/// assert_eq!(op.execute(Some(&mut block)).unwrap(), Status::Ok);
/// ```
#[macro_export]
macro_rules! declare_op {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($op_name:expr, inputs = $nin:expr, outputs = $nout:expr);

        fn validate_and_execute(&$this:ident, $block:ident) $body:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            descriptor: $crate::OpDescriptor,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    descriptor: $crate::OpDescriptor::new($op_name, $nin, $nout),
                }
            }

            pub fn descriptor(&self) -> &$crate::OpDescriptor {
                &self.descriptor
            }
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::DeclarableOp for $name {
            fn descriptor(&self) -> &$crate::OpDescriptor {
                &self.descriptor
            }

            fn validate_and_execute(
                &$this,
                $block: &mut $crate::Block,
            ) -> $crate::Result<$crate::Status> $body
        }
    };
}
