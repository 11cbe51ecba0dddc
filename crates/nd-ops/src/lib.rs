//! # nd-ops
//!
//! Declarable operations for the nd tensor engine.
//!
//! Every numeric kernel plugs into the same contract:
//! - an immutable [`OpDescriptor`] declares its name and arity
//! - [`DeclarableOp::validate_and_execute`] runs cheap structural checks from
//!   [`validation`] over the borrowed [`Block`], then does the work
//! - data problems come back as a [`Status`]; tripped guards
//!   ([`require_ok!`]) come back as [`OpError::Guard`]
//!
//! The public entry point is [`Execute::execute`], which every op gets for free.

pub mod block;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod guard;
pub mod op;
pub mod ops;
pub mod registry;
pub mod status;
pub mod validation;

pub use block::{Block, Variable};
pub use config::{RunConfig, TensorSpec};
pub use descriptor::OpDescriptor;
pub use error::OpError;
pub use guard::{require_ok, GuardFault, GuardSite};
pub use op::{DeclarableOp, Execute};
pub use registry::OpRegistry;
pub use status::Status;

pub type Result<T> = std::result::Result<T, OpError>;
