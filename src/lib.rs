//! Kimetsu Forge — structured RPG asset generation
//!
//! Turns a [`GenerationRequest`](types::GenerationRequest) into a typed,
//! scored [`GeneratedItem`](types::GeneratedItem) by prompting a chain of
//! LLM providers in a fixed order until one returns decodable JSON, then
//! re-running the chain while the result scores below the acceptance
//! threshold.
//!
//! # Quick Start
//!
//! ```no_run
//! use kimetsu_forge::prelude::*;
//!
//! # async fn example() -> kimetsu_forge::error::Result<()> {
//! let forge = Forge::new(ForgeConfig::load()?)?;
//! let request = GenerationRequest::builder()
//!     .category(Category::Oni)
//!     .level(8)
//!     .build();
//! let item = forge.generate(&request, &ProviderKeySet::from_env()).await?;
//! println!("{}", serde_json::to_string_pretty(&item)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod forge;
pub mod generation;
pub mod models;
pub mod prelude;
pub mod prompt;
pub mod provider;
pub mod store;
pub mod types;
pub mod util;
pub mod validation;

pub use forge::{Forge, ForgeBuilder};
