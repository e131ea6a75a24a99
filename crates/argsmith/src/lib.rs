//! Declarative command-line argument parsing.
//!
//! Options and positionals are declared on an [`ArgumentParser`] together
//! with a typed destination ([`Single`], [`Multi`], [`Switch`], ...). Parsing
//! fills the destinations and returns a [`ParseResult`] with the arguments
//! nobody claimed and every problem found along the way; it never stops at
//! the first bad token.
//!
//! ```
//! use argsmith::{ArgumentParser, ErrorKind, ParserConfig, Single, Switch};
//!
//! # fn main() -> Result<(), argsmith::Error> {
//! let mut parser =
//!     ArgumentParser::with_config(ParserConfig::new().program("demo").on_exit_return());
//! let count = parser
//!     .add_option(Single::<u32>::new(), &["-c", "--count"])?
//!     .has_argument()?
//!     .slot();
//! let verbose = parser.add_option(Switch::new(), &["-v"])?.slot();
//!
//! let result = parser.parse_args(&["-v", "--count", "3", "--bogus"])?;
//! assert_eq!(parser.get(count).get(), Some(&3));
//! assert!(parser.get(verbose).get());
//! assert!(result.has_error(ErrorKind::UnknownOption));
//! # Ok(())
//! # }
//! ```

mod argparser;
mod config;
mod describe;
mod error;
mod group;
pub mod help;
mod option;
mod parser;
mod registry;
mod result;
mod validate;
mod value;

pub use argparser::{ArgumentParser, Arguments, Outcome};
pub use config::{ExitMode, ParserConfig};
pub use describe::{ArgumentDescription, GroupDescription};
pub use error::{DefinitionError, Error};
pub use option::AssignAction;
pub use registry::{GroupConfig, OptionConfig};
pub use result::{ErrorKind, ParseError, ParseResult};
pub use value::{ConversionError, Converted, Multi, Single, SlotId, Switch, Value, Void};
