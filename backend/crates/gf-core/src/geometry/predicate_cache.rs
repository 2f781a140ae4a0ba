use crate::{ContainmentPredicate, GeographicBoundary, Result, to_containment_predicate};

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Memoizes predicates per boundary id. Boundaries are static at runtime, so
/// entries are never invalidated.
#[derive(Default)]
pub struct PredicateCache {
    predicates: RwLock<HashMap<String, Arc<ContainmentPredicate>>>,
}

impl PredicateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&self, boundary: &GeographicBoundary) -> Result<Arc<ContainmentPredicate>> {
        {
            let predicates = self.predicates.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(predicate) = predicates.get(&boundary.id) {
                return Ok(Arc::clone(predicate));
            }
        }

        let predicate = Arc::new(to_containment_predicate(boundary)?);

        let mut predicates = self.predicates.write().unwrap_or_else(PoisonError::into_inner);
        let entry = predicates
            .entry(boundary.id.clone())
            .or_insert(predicate);

        Ok(Arc::clone(entry))
    }

    pub fn len(&self) -> usize {
        self.predicates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
