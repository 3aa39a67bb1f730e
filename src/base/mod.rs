pub mod text;

pub use text::{is_identifier, is_pascal_case, pascal_case};
