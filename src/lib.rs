//! Build nested JSON objects by recording actions and folding over them.
//!
//! An [`ObjectBuilder`] records mutations (`set`, `append`, `insert_after`,
//! `copy`, ...) into an [`ActionLog`] without touching any data. Calling
//! [`ObjectBuilder::value`] replays the log over an empty flat projection,
//! expands the dotted keys into a nested object and prunes empty branches.
//! Builders can be branched with part of their history selected by key
//! pattern.
//!
//! ```
//! use objectfold::{FilterSpec, ObjectBuilder};
//! use serde_json::json;
//!
//! let mut builder = ObjectBuilder::new();
//! builder
//!     .set("todo.title", "write docs")
//!     .set("todo.items", json!([{"id": 0}, {"id": 1}]))
//!     .insert_after("todo.items", json!({"id": {"gte": 1}}), [json!({"id": 2})]);
//!
//! assert_eq!(
//!     builder.value().unwrap(),
//!     json!({"todo": {"title": "write docs", "items": [{"id": 0}, {"id": 1}, {"id": 2}]}})
//! );
//!
//! let titles = builder.clone_filtered(FilterSpec::new().include("title").fuzzy(true)).unwrap();
//! assert_eq!(titles.value().unwrap(), json!({"todo": {"title": "write docs"}}));
//! ```

mod action;
mod builder;
mod error;
mod filter;
mod handlers;
mod log;
pub mod materialize;
mod matcher;
pub mod path;

pub use action::{
    Action, ActionKind, Arg, CopyOptions, Replacement, UpdateFn, UpdateOptions, Updater,
};
pub use builder::ObjectBuilder;
pub use error::{FoldError, FoldResult, value_type_name};
pub use filter::{CloneFilter, FilterSpec, filter_actions};
pub use log::ActionLog;
pub use materialize::Projection;
pub use matcher::{Operator, matches};
