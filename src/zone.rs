//! Declared zone data, organised per view.
//!
//! A value declared without a view is visible from every view; a value
//! declared under a view only from that one. Resolution happens in two
//! independent steps: the view step concatenates the view's own values with
//! the default view's ([`node::Node::lookup`]), and the host step falls back
//! to the default host `*` when a host has nothing for the view
//! ([`host::HostRef::resolve`]).

pub mod attribute;
pub mod builder;
pub mod domain;
pub mod host;
pub mod node;
pub mod value;

pub use attribute::Attribute;
pub use builder::DomainBuilder;
pub use domain::Domain;
pub use value::Value;
