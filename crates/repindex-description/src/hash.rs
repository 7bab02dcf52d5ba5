//! Cache-invalidation hash over a description's dependency graph

use crate::IndexDescription;
use md5::{Digest, Md5};
use std::fmt::Write;

/// Concatenates `+{id}-{change number}` for every node that has a change
/// number, visiting a node before its dependencies and dependencies in list
/// order. A node without a change number still has its dependencies visited.
pub fn table_hash_input(root: &IndexDescription) -> String {
    let mut buffer = String::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let Some(change_number) = node.get_last_table_change_number() {
            // Writing to a String cannot fail
            let _ = write!(buffer, "+{}-{}", node.get_id_and_version(), change_number);
        }
        stack.extend(node.get_dependencies().iter().rev());
    }
    buffer
}

/// MD5 hex digest of [`table_hash_input`]
pub fn table_hash(root: &IndexDescription) -> String {
    let input = table_hash_input(root);
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    tracing::trace!(table = %root.get_id_and_version(), %input, %hash, "computed table hash");
    hash
}
