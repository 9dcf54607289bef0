//! # Input Sanitization & Validation
//!
//! A small input validation framework for the interactive CLI. It defines
//! composable validation filters ([`Sanitize`]) that are applied to
//! user-provided strings. Filters run in order and short-circuit on the
//! first failure, returning a friendly error message describing what went
//! wrong.
//!
//! ## Features
//! - Type validation via [`DesiredType`]
//! - Multiple-option matching with [`Sanitize::MatchStrings`]
//! - Inclusive range validation with [`Sanitize::IsBetween`]
//!
//! ## Example
//! ```rust,no_run
//! use crawlmap::utils::{Sanitize, Terminal};
//!
//! // Ensure input is an integer between 1 and 32 (inclusive)
//! let workers = Terminal::ask(
//!     "Worker count (1-32):",
//!     &[Sanitize::IsBetween(1, 32)],
//! );
//! println!("In range: {}", workers.answer);
//! ```
use std::{error::Error, fmt::Display};

/// Represents a validation filter that can be applied to user input.
///
/// - `MatchStrings`: ensures that the input matches one of the given options.
/// - `IsType`: ensures that the input can be parsed into a certain [`DesiredType`].
/// - `IsBetween`: ensures that a numeric input is within an inclusive range `[min, max]`.
pub enum Sanitize {
    MatchStrings(Vec<String>),
    IsType(DesiredType),
    IsBetween(isize, isize),
}

/// Trait for input validation.
/// Any type that implements this can validate a string input and return
/// either `Ok(())` if the input is valid or a [`FilterErrorNot`] on failure.
trait Validate {
    fn validate(&self, input: &str) -> Result<(), FilterErrorNot>;
}

/// Represents an error that occurs when input validation fails.
#[derive(Debug)]
pub(crate) enum FilterErrorNot {
    Type(DesiredType),
    MatchStrings(Vec<String>),
    Between(isize, isize),
}

impl Display for FilterErrorNot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(t) => write!(f, "The value is not a {:?}, try again!", t),
            Self::MatchStrings(v) => write!(
                f,
                "The value doesn't match with the options: {}, try again!",
                v.join(", ")
            ),
            Self::Between(n1, n2) => {
                write!(f, "The value is not between {} and {}, try again!", n1, n2)
            }
        }
    }
}

impl Error for FilterErrorNot {}

/// Macro helper that validates if an input string can be parsed into the
/// given Rust type. Expands into a `Result<(), expr>`.
#[macro_export]
macro_rules! check_type {
    ($input:expr, $t:ty, $err:expr) => {
        match $input.parse::<$t>() {
            Ok(_) => Ok(()),
            Err(_) => $err,
        }
    };
}

impl Sanitize {
    /// Executes all provided filters against the given answer.
    ///
    /// - Trims whitespace before validation.
    /// - Stops and returns the first error encountered.
    /// - Returns the cleaned string if all filters pass.
    pub(crate) fn execute(answer: &str, filters: &[Sanitize]) -> Result<String, FilterErrorNot> {
        let clean_answer = answer.trim();

        for filter in filters {
            match filter.validate(clean_answer) {
                Ok(_) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(clean_answer.to_string())
    }
}

impl Validate for Sanitize {
    fn validate(&self, input: &str) -> Result<(), FilterErrorNot> {
        match self {
            Sanitize::IsType(ty) => ty.parse(input),
            Sanitize::MatchStrings(options) => {
                if options.contains(&input.to_string()) {
                    Ok(())
                } else {
                    Err(FilterErrorNot::MatchStrings(options.clone()))
                }
            }
            Sanitize::IsBetween(n1, n2) => match DesiredType::Isize.parse(input) {
                Ok(_) => {
                    let input_parsed: isize = input.parse().unwrap_or_default();
                    if input_parsed >= *n1 && input_parsed <= *n2 {
                        Ok(())
                    } else {
                        Err(FilterErrorNot::Between(*n1, *n2))
                    }
                }
                Err(e) => Err(e),
            },
        }
    }
}

/// Represents the desired type to which the input should be parsed.
///
/// Used together with [`Sanitize::IsType`] to validate primitive values.
#[derive(Debug)]
pub enum DesiredType {
    String,
    U16,
    Usize,
    Isize,
}

impl DesiredType {
    /// Applies the corresponding [`check_type!`] validation for the variant.
    fn parse(&self, input: &str) -> Result<(), FilterErrorNot> {
        match self {
            DesiredType::String => {
                check_type!(input, String, Err(FilterErrorNot::Type(DesiredType::String)))
            }
            DesiredType::U16 => {
                check_type!(input, u16, Err(FilterErrorNot::Type(DesiredType::U16)))
            }
            DesiredType::Usize => {
                check_type!(input, usize, Err(FilterErrorNot::Type(DesiredType::Usize)))
            }
            DesiredType::Isize => {
                check_type!(input, isize, Err(FilterErrorNot::Type(DesiredType::Isize)))
            }
        }
    }
}
