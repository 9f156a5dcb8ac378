pub mod locator;
pub mod location;
pub mod stack_trace;

pub use locator::{DEFAULT_IGNORED, Locator};
pub use location::SourceLocation;
pub use stack_trace::{CallFrame, StackTrace};
