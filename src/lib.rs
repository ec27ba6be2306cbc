//! A small JSON-over-HTTP blog: posts live in one JSON file and every
//! request loads, changes, and rewrites the whole collection.

extern crate iron;
extern crate router;
extern crate rustc_serialize;

pub mod blog;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod model;

pub use crate::blog::Blog;
pub use crate::config::Config;
pub use crate::database::{Database, JsonDatabase, MemoryDatabase};
pub use crate::error::{Error, Result};
pub use crate::model::{Post, PostForm};
