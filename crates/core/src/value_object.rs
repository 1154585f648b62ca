//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable domain objects defined entirely by their
/// attribute values: two with the same values are the same thing. To
/// "modify" one, build a new one. `ContactInfo` and `Month` are value
/// objects; `Kit` is an entity.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
