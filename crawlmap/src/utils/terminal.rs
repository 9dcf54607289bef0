//! # Terminal Input Helper
//!
//! Utilities for interacting with the terminal to request user input. The
//! prompt repeats until the input satisfies the provided validation
//! filters; validation itself is delegated to [`Sanitize`].
//!
//! ## Example
//! ```rust,no_run
//! use crawlmap::utils::{DesiredType, Sanitize, Terminal};
//!
//! let input = Terminal::ask(
//!     "Seed address (http://...):",
//!     &[Sanitize::IsType(DesiredType::String)],
//! );
//! println!("The input: {}", input.answer);
//! ```

use crate::utils::sanitize::Sanitize;
use std::io;

/// A helper for repeatedly asking the user for input until it passes all
/// [`Sanitize`] filters. Internally calls [`Sanitize::execute`].
pub struct Terminal {
    pub answer: String,
}

impl Terminal {
    /// Prints a question to the terminal and loops until a valid answer is
    /// received. Returns a [`Terminal`] struct containing the accepted
    /// answer.
    pub fn ask(question: &str, filters: &[Sanitize]) -> Terminal {
        let answer: String = loop {
            println!("{}", question);
            let mut answer = String::new();

            match io::stdin().read_line(&mut answer) {
                Ok(_) => {
                    let sanitized_answer = Sanitize::execute(answer.as_str(), filters);

                    match sanitized_answer {
                        Ok(data) => break data,
                        Err(e) => {
                            println!("{}", e);
                            continue;
                        }
                    }
                }
                Err(_) => {
                    eprintln!("Couldn't read line..");
                    continue;
                }
            };
        };

        Terminal { answer }
    }
}
