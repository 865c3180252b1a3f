/// Interpolates like `format!`, then normalizes the result with
/// [`dedent::dedent_str`].
///
/// ```
/// let port = 5133;
/// let text = electric_cli::dedent!("
///     Port to listen on.
///     Defaults to {port}.
/// ");
/// assert_eq!(text, "Port to listen on. Defaults to 5133.");
/// ```
#[macro_export]
macro_rules! dedent {
    ($($arg:tt)*) => {
        $crate::dedent::dedent_str(&::std::format!($($arg)*))
    };
}

pub mod config;
pub mod dedent;
pub mod error;
