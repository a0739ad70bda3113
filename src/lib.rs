//! cardcat: render a YAML card catalog to a static HTML page and mirror the
//! catalog's images to local disk.
//!
//! Layers, from the inside out: [`domain`] (the classified catalog tree),
//! [`application`] (page builder, image fetcher, document store),
//! [`infrastructure`] (filesystem, HTTP and template implementations) and
//! [`cli`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
