pub mod dedent;

pub use dedent::{dedent, dedent_str, min_indent, Template};
