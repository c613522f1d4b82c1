mod registry;
pub mod search;

pub use registry::{json_schema_number, json_schema_object, json_schema_string, Tool, ToolRegistry};
pub use search::{ArgumentsError, SearchArguments, SearchTool};
