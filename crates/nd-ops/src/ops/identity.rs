use crate::status::Status;
use crate::validation::{validate_input_count, validate_non_empty_input};

crate::declare_op! {
    /// Passes input 0 through to output 0 unchanged.
    pub struct Identity("identity", inputs = 1, outputs = 1);

    fn validate_and_execute(&self, block) {
        crate::require_ok!(validate_input_count(block, self.descriptor()));
        crate::require_ok!(validate_non_empty_input(block));

        let Some(input) = block.input(0).cloned() else {
            return Ok(Status::BadInput);
        };
        block.set_output(0, input);
        Ok(Status::Ok)
    }
}
