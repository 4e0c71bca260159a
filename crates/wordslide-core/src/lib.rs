//! wordslide-core: Word-reveal sequencing, rating sessions and data model.
//!
//! This crate defines the data model, the reveal and rating state machines,
//! and the async drivers that bind them to a timer, user input and a view.

pub mod engine;
pub mod error;
pub mod mock;
pub mod model;
pub mod rating;
pub mod reveal;
pub mod sequencer;
pub mod timeline;
pub mod traits;
