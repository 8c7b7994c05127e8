/// A store command buffered on a connection until the next flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set a string key, overwriting any previous value.
    Set { key: String, value: String },
    /// Delete a key of any type.
    Del { key: String },
    /// Increment an integer counter by one.
    Incr { key: String },
    /// Append a value to the tail of a list.
    RPush { key: String, value: String },
    /// Add a member to a set.
    SAdd { key: String, member: String },
    /// Remove a member from a set.
    SRem { key: String, member: String },
}
