//! Prompt templating for stock-crew
//!
//! Two small pieces live here:
//!
//! - [`Template`]: text with `{name}` placeholders, rendered strictly against
//!   a set of variables. `{{` and `}}` produce literal braces.
//! - [`PromptBuilder`]: a fluent API for assembling prompts out of sections,
//!   bullets and conditional fragments.
//!
//! # Quick Start
//!
//! ```
//! use crew_prompt::{PromptBuilder, Template, Variables};
//!
//! let template = Template::new("Analyze {company} stock");
//! let mut vars = Variables::new();
//! vars.insert("company".to_string(), "AAPL".to_string());
//! assert_eq!(template.render(&vars).unwrap(), "Analyze AAPL stock");
//!
//! let prompt = PromptBuilder::new()
//!     .text("You are a helpful assistant.")
//!     .section("Tools")
//!     .bullet("Stock Price")
//!     .build();
//! assert!(prompt.contains("## Tools"));
//! ```

mod builder;
mod error;
mod template;

pub use builder::PromptBuilder;
pub use error::{PromptError, Result};
pub use template::{Template, Variables};
