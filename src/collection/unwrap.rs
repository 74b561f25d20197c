//! Collection unwrapping
//!
//! Walks a decorator chain down to the raw collection with a bounded number
//! of steps, so a cyclic chain fails instead of hanging.

use super::types::{Layer, Unwrap};
use crate::error::{Error, Result};

/// A source collection together with the raw collection beneath it
pub struct Unwrapped<'a, D: Unwrap + ?Sized> {
    /// The collection as handed in (slices are taken from here)
    pub source: &'a D,
    /// The innermost collection (counting and key introspection)
    pub raw: &'a D::Raw,
    /// Number of decorator layers walked through
    pub depth: usize,
}

/// Resolve `source` to its raw collection, walking at most `max_depth` layers
pub fn unwrap_collection<D>(source: &D, max_depth: usize) -> Result<Unwrapped<'_, D>>
where
    D: Unwrap + ?Sized,
{
    let mut layer = source.inner();

    for depth in 0..=max_depth {
        match layer {
            Layer::Raw(raw) => {
                if depth > 0 {
                    tracing::debug!("Unwrapped {} decorator layer(s)", depth);
                }
                return Ok(Unwrapped { source, raw, depth });
            }
            Layer::Wrapped(next) => {
                layer = next.inner();
            }
        }
    }

    Err(Error::UnwrapLoop { max_depth })
}
