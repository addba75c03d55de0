//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The object pool.
//!
//! Encoding a `Value` graph and decoding a bplist document both revolve
//! around the same intermediate representation: a flat, deduplicated,
//! insertion-ordered vector of objects in which every array/dictionary child
//! is replaced by its index into the vector rather than holding the child
//! directly.
//!
//! This is a two-layer design (`Vec<Value>` during collection, then a
//! parallel `Vec<FlatObject>` once flattened) rather than an in-place type
//! pun, so no entry in the pool is ever simultaneously "a container of
//! values" and "a container of indices".

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::value::Value;

/// A pool entry once containers have been flattened to hold indices instead
/// of nested values.
#[derive(Clone, Debug)]
pub enum FlatObject {
    /// Any non-container value, carried through unchanged.
    Leaf(Value),
    /// An array, with each element replaced by its pool index.
    Array(Vec<usize>),
    /// A dictionary, with each key and value replaced by its pool index.
    Dict(Vec<(usize, usize)>),
}

/// Depth-first collects every distinct `(variant, value)` reachable from `root`
/// into an insertion-ordered pool, with `root` always occupying index 0.
pub fn collect(root: &Value) -> Vec<Value> {
    let mut pool = Vec::new();
    collect_into(root, &mut pool);
    pool
}

fn collect_into(value: &Value, pool: &mut Vec<Value>) {
    if pool.iter().any(|existing| existing == value) {
        return;
    }
    pool.push(value.clone());
    match value {
        Value::Array(elements) => {
            for element in elements {
                collect_into(element, pool);
            }
        }
        Value::Dict(entries) => {
            for (key, val) in entries {
                collect_into(key, pool);
                collect_into(val, pool);
            }
        }
        _ => {}
    }
}

/// Finds the index of a value within the pool, matching by the same
/// variant-and-equality rule used during `collect`.
fn index_of(pool: &[Value], value: &Value) -> usize {
    pool.iter()
        .position(|existing| existing == value)
        .expect("value must already be present in the pool built by `collect`")
}

/// Flattens a collected pool into parallel `FlatObject` entries, replacing
/// each container's children with their pool indices.
pub fn flatten(pool: &[Value]) -> Result<Vec<FlatObject>> {
    if pool.len() >= 0x10000 {
        return Err(Error::PoolOverflow);
    }
    Ok(pool.iter().map(|value| match value {
        Value::Array(elements) => {
            let indices = elements.iter().map(|e| index_of(pool, e)).collect();
            FlatObject::Array(indices)
        }
        Value::Dict(entries) => {
            let indices = entries.iter()
                .map(|(k, v)| (index_of(pool, k), index_of(pool, v)))
                .collect();
            FlatObject::Dict(indices)
        }
        leaf => FlatObject::Leaf(leaf.clone()),
    }).collect())
}

/// Recursively resolves a flattened pool back into a `Value` tree, starting
/// at `root_index`.
///
/// Containers may reference any earlier or later entry in the pool, so this
/// walks the pool by index rather than assuming forward order. A stack of
/// indices currently being resolved detects cycles, which can only occur in
/// corrupt or adversarial input since `flatten` never produces one.
pub fn unflatten(pool: &[FlatObject], root_index: usize) -> Result<Value> {
    if root_index >= pool.len() {
        return Err(Error::InvalidObjectReference);
    }
    let mut in_progress = vec![false; pool.len()];
    let mut resolved: Vec<Option<Value>> = vec![None; pool.len()];
    unflatten_index(pool, root_index, &mut in_progress, &mut resolved)
}

fn unflatten_index(
    pool: &[FlatObject],
    index: usize,
    in_progress: &mut Vec<bool>,
    resolved: &mut Vec<Option<Value>>,
) -> Result<Value> {
    if index >= pool.len() {
        return Err(Error::InvalidObjectReference);
    }
    if let Some(value) = &resolved[index] {
        return Ok(value.clone());
    }
    if in_progress[index] {
        return Err(Error::CycleDetected);
    }
    in_progress[index] = true;

    let value = match &pool[index] {
        FlatObject::Leaf(v) => v.clone(),
        FlatObject::Array(indices) => {
            let mut elements = Vec::with_capacity(indices.len());
            for &i in indices {
                elements.push(unflatten_index(pool, i, in_progress, resolved)?);
            }
            Value::Array(elements)
        }
        FlatObject::Dict(pairs) => {
            let mut map = BTreeMap::new();
            for &(k, v) in pairs {
                let key = unflatten_index(pool, k, in_progress, resolved)?;
                let value = unflatten_index(pool, v, in_progress, resolved)?;
                map.insert(key, value);
            }
            Value::Dict(map)
        }
    };

    in_progress[index] = false;
    resolved[index] = Some(value.clone());
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_dedupes_identical_leaves() {
        let root = Value::Array(vec![Value::Int(1), Value::Int(1), Value::Int(2)]);
        let pool = collect(&root);
        // root array + two distinct integers.
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_collect_keeps_distinct_variants_separate() {
        let root = Value::Array(vec![Value::Int(1), Value::True]);
        let pool = collect(&root);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_flatten_array_indices() {
        let root = Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(1)]);
        let pool = collect(&root);
        let flat = flatten(&pool).unwrap();
        match &flat[0] {
            FlatObject::Array(indices) => assert_eq!(indices, &vec![1, 2, 1]),
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn test_roundtrip_collect_flatten_unflatten() {
        let mut dict = BTreeMap::new();
        dict.insert(Value::string("x"), Value::Int(1));
        dict.insert(Value::string("y"), Value::Int(20));
        let root = Value::Dict(dict);

        let pool = collect(&root);
        let flat = flatten(&pool).unwrap();
        let result = unflatten(&flat, 0).unwrap();

        assert_eq!(result, root);
    }

    #[test]
    fn test_unflatten_detects_cycle() {
        // An array at index 0 that references itself -- not producible by `flatten`,
        // but exactly the shape a corrupt decode could hand to `unflatten`.
        let flat = vec![FlatObject::Array(vec![0])];
        assert_eq!(unflatten(&flat, 0), Err(Error::CycleDetected));
    }

    #[test]
    fn test_unflatten_rejects_out_of_range_reference() {
        // An array whose sole reference points past the end of the pool --
        // the shape a hand-built `0xA1 0xFF` object with `num_objects=1` takes.
        let flat = vec![FlatObject::Array(vec![1])];
        assert_eq!(unflatten(&flat, 0), Err(Error::InvalidObjectReference));
    }

    #[test]
    fn test_unflatten_rejects_out_of_range_root() {
        let flat = vec![FlatObject::Leaf(Value::Null)];
        assert_eq!(unflatten(&flat, 1), Err(Error::InvalidObjectReference));
    }
}
