//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**. They are defined entirely by their
//! attribute values, so two value objects with the same values are equal.

/// Marker trait for value objects.
///
/// - **Value Object**: no identity (an invoice line `{ "Widget", 2, 10.0 }` equals
///   any other line with the same name, quantity and rate)
/// - **Entity**: has identity (two invoices with the same id are the same invoice)
///
/// Value objects are owned by exactly one parent and are replaced rather than
/// shared. Derived attributes (such as a line total) are computed on construction,
/// so a value object is always internally consistent.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct PostalAddress {
///     lines: Vec<String>,
/// }
///
/// impl ValueObject for PostalAddress {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
