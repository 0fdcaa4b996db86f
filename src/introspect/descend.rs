//! Conversions from field types to descendable property values

use super::{NodeRef, PropertyValue, Validatable};
use std::sync::{Arc, Mutex, OnceLock, RwLock, Weak};

/// A shared handle that can be viewed as a graph node
pub trait IntoNode {
    fn to_node(&self) -> NodeRef;
}

impl<T: Validatable> IntoNode for Arc<T> {
    fn to_node(&self) -> NodeRef {
        Arc::clone(self) as NodeRef
    }
}

impl IntoNode for Arc<dyn Validatable> {
    fn to_node(&self) -> NodeRef {
        Arc::clone(self)
    }
}

/// A field type whose value may contain nested validatable objects.
///
/// Errors are reported as messages and become traversal defects.
pub trait Descend {
    fn descend(&self) -> Result<PropertyValue, String>;
}

impl<T: Validatable> Descend for Arc<T> {
    fn descend(&self) -> Result<PropertyValue, String> {
        Ok(PropertyValue::Object(self.to_node()))
    }
}

impl Descend for Arc<dyn Validatable> {
    fn descend(&self) -> Result<PropertyValue, String> {
        Ok(PropertyValue::Object(self.to_node()))
    }
}

impl<N: IntoNode> Descend for Option<N> {
    fn descend(&self) -> Result<PropertyValue, String> {
        Ok(match self {
            Some(node) => PropertyValue::Object(node.to_node()),
            None => PropertyValue::Absent,
        })
    }
}

impl<T: Validatable> Descend for Weak<T> {
    fn descend(&self) -> Result<PropertyValue, String> {
        Ok(match self.upgrade() {
            Some(node) => PropertyValue::Object(node as NodeRef),
            None => PropertyValue::Absent,
        })
    }
}

impl<N: IntoNode> Descend for [N] {
    fn descend(&self) -> Result<PropertyValue, String> {
        Ok(PropertyValue::Collection(
            self.iter().map(|node| Some(node.to_node())).collect(),
        ))
    }
}

impl<N: IntoNode> Descend for Vec<N> {
    fn descend(&self) -> Result<PropertyValue, String> {
        self.as_slice().descend()
    }
}

impl<N: IntoNode> Descend for Vec<Option<N>> {
    fn descend(&self) -> Result<PropertyValue, String> {
        Ok(PropertyValue::Collection(
            self.iter()
                .map(|slot| slot.as_ref().map(IntoNode::to_node))
                .collect(),
        ))
    }
}

impl<N: IntoNode> Descend for Option<Vec<N>> {
    fn descend(&self) -> Result<PropertyValue, String> {
        match self {
            Some(items) => items.descend(),
            None => Ok(PropertyValue::Absent),
        }
    }
}

impl<N: IntoNode> Descend for OnceLock<N> {
    fn descend(&self) -> Result<PropertyValue, String> {
        Ok(match self.get() {
            Some(node) => PropertyValue::Object(node.to_node()),
            None => PropertyValue::Absent,
        })
    }
}

impl<N: IntoNode> Descend for RwLock<Option<N>> {
    fn descend(&self) -> Result<PropertyValue, String> {
        let guard = self
            .read()
            .map_err(|e| format!("Failed to read guarded reference: {e}"))?;
        Descend::descend(&*guard)
    }
}

impl<N: IntoNode> Descend for Mutex<Option<N>> {
    fn descend(&self) -> Result<PropertyValue, String> {
        let guard = self
            .lock()
            .map_err(|e| format!("Failed to lock guarded reference: {e}"))?;
        Descend::descend(&*guard)
    }
}
