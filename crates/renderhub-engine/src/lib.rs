//! # renderhub-engine
//!
//! Template rendering on top of [Tera](https://keats.github.io/tera/), with
//! every render routed through the hook pipeline of `renderhub-hooks`.
//!
//! ```no_run
//! use renderhub_engine::Renderer;
//! use serde_json::json;
//!
//! # fn main() -> renderhub_core::AppResult<()> {
//! let renderer = Renderer::builder().base_dir("templates").build()?;
//! let out = renderer.render("Hello {{ name }}", &json!({ "name": "World" }))?;
//! assert_eq!(out, "Hello World");
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod detect;
pub mod error;
pub mod filters;
pub mod renderer;

pub use convert::to_data_map;
pub use detect::is_template_source;
pub use renderer::{Renderer, RendererBuilder};
