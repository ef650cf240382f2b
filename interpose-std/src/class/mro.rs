//! C3 linearization.

use super::Class;
use interpose_core::ClassError;
use std::{collections::VecDeque, sync::Arc};

/// Compute the resolution order of a class named `class` with `bases`,
/// excluding the class itself.
pub(super) fn linearize(class: &str, bases: &[Arc<Class>]) -> Result<Vec<Arc<Class>>, ClassError> {
    let mut sequences: Vec<VecDeque<Arc<Class>>> = bases
        .iter()
        .map(|base| base.linearization().collect())
        .collect();
    sequences.push(bases.iter().cloned().collect());

    let mut order = Vec::new();
    loop {
        sequences.retain(|seq| !seq.is_empty());
        if sequences.is_empty() {
            return Ok(order);
        }

        // First head that appears in no tail.
        let next = sequences
            .iter()
            .filter_map(VecDeque::front)
            .find(|head| {
                !sequences
                    .iter()
                    .any(|seq| seq.iter().skip(1).any(|c| Arc::ptr_eq(c, head)))
            })
            .cloned()
            .ok_or_else(|| ClassError::InconsistentHierarchy(class.to_string()))?;

        for seq in &mut sequences {
            if seq.front().is_some_and(|head| Arc::ptr_eq(head, &next)) {
                seq.pop_front();
            }
        }
        order.push(next);
    }
}
