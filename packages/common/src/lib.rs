//! # QuickEdit Common
//!
//! The DOM seam shared by the editing core and its hosts.
//!
//! The editor never talks to a browser directly. Everything it needs from a
//! page goes through the [`Dom`] trait: tree navigation, attributes, inner
//! markup, computed styles and inline style properties. [`MemoryDom`] is the
//! headless implementation used in tests.

pub mod dom;
pub mod error;
pub mod memory_dom;
pub mod result;
pub mod selector;
pub mod style;
pub mod walk;

mod selector_lexer;

pub use dom::{Dom, NodeId};
pub use error::*;
pub use memory_dom::{ElementSpec, MemoryDom};
pub use result::*;
pub use selector::{query_selector, query_selector_all, selector_path, SelectorList};
pub use walk::*;
