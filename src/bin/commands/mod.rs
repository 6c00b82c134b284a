pub mod convert_cmd;
pub mod parse_cmd;
pub mod schema_cmd;
pub mod show_cmd;
pub mod validate_cmd;

pub use convert_cmd::cmd_convert;
pub use parse_cmd::cmd_parse;
pub use schema_cmd::cmd_schema;
pub use show_cmd::cmd_show;
pub use validate_cmd::cmd_validate;
