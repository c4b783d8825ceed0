//! Shared field buffers and the per-grid [`FieldStore`].
//!
//! A field is a named dense `f64` array with one value per element of a
//! single [`ElementKind`]. The store owns the registration; a
//! [`FieldHandle`] is a cheap clone of the same buffer, so values written
//! through any handle are visible through the store and every other
//! handle. Handles can read and write but never resize.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::FieldError;
use crate::id::ElementKind;

/// A shared, fixed-length `f64` buffer.
///
/// Cloning shares the buffer. Borrows are checked at runtime: holding a
/// [`write`](Self::write) guard while calling [`read`](Self::read) on the
/// same buffer panics, exactly as with [`RefCell`]. Components should keep
/// guards short-lived and never hold one across a call into another
/// component.
#[derive(Clone)]
pub struct FieldHandle {
    len: usize,
    buf: Rc<RefCell<Box<[f64]>>>,
}

impl FieldHandle {
    /// Wrap `values` in a new buffer.
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            len: values.len(),
            buf: Rc::new(RefCell::new(values.into_boxed_slice())),
        }
    }

    /// A new buffer of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self::full(len, 0.0)
    }

    /// A new buffer of `len` copies of `value`.
    pub fn full(len: usize, value: f64) -> Self {
        Self::new(vec![value; len])
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if the buffer holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the values for reading.
    pub fn read(&self) -> Ref<'_, [f64]> {
        Ref::map(self.buf.borrow(), |b| &**b)
    }

    /// Borrow the values for writing.
    pub fn write(&self) -> RefMut<'_, [f64]> {
        RefMut::map(self.buf.borrow_mut(), |b| &mut **b)
    }

    /// Copy the current values out.
    pub fn to_vec(&self) -> Vec<f64> {
        self.read().to_vec()
    }

    /// Overwrite every value with `value`.
    pub fn fill(&self, value: f64) {
        self.write().fill(value);
    }

    /// `true` if both handles share one buffer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.buf, &other.buf)
    }
}

impl From<Vec<f64>> for FieldHandle {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl fmt::Debug for FieldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHandle")
            .field("len", &self.len)
            .field("holders", &Rc::strong_count(&self.buf))
            .finish()
    }
}

/// Number of elements of each kind in a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ElementCounts {
    /// Number of nodes.
    pub nodes: usize,
    /// Number of links.
    pub links: usize,
    /// Number of patches.
    pub patches: usize,
    /// Number of corners.
    pub corners: usize,
    /// Number of faces.
    pub faces: usize,
    /// Number of cells.
    pub cells: usize,
}

impl ElementCounts {
    /// Count for one element kind.
    pub fn of(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Node => self.nodes,
            ElementKind::Link => self.links,
            ElementKind::Patch => self.patches,
            ElementKind::Corner => self.corners,
            ElementKind::Face => self.faces,
            ElementKind::Cell => self.cells,
        }
    }
}

#[derive(Debug)]
struct FieldEntry {
    handle: FieldHandle,
    units: Option<String>,
}

/// Mapping from `(element kind, name)` to a registered field.
///
/// Names are kept in registration order per kind, so [`keys`](Self::keys)
/// is deterministic. Registering a name that already exists replaces the
/// old registration; the old buffer stays valid for whoever still holds a
/// handle to it but is no longer reachable through the store.
#[derive(Debug)]
pub struct FieldStore {
    counts: ElementCounts,
    groups: [IndexMap<String, FieldEntry>; 6],
}

impl FieldStore {
    /// An empty store for a grid with the given element counts.
    pub fn new(counts: ElementCounts) -> Self {
        Self {
            counts,
            groups: Default::default(),
        }
    }

    /// Element counts the store validates against.
    pub fn counts(&self) -> ElementCounts {
        self.counts
    }

    /// Register a new field of zeros.
    pub fn add_zeros(&mut self, kind: ElementKind, name: &str) -> FieldHandle {
        self.add_full(kind, name, 0.0)
    }

    /// Register a new field of ones.
    pub fn add_ones(&mut self, kind: ElementKind, name: &str) -> FieldHandle {
        self.add_full(kind, name, 1.0)
    }

    /// Register a new field with every value set to `value`.
    pub fn add_full(&mut self, kind: ElementKind, name: &str, value: f64) -> FieldHandle {
        let handle = FieldHandle::full(self.counts.of(kind), value);
        self.register(kind, name, handle.clone());
        handle
    }

    /// Wrap `values` in a new buffer and attach it.
    pub fn add_field(
        &mut self,
        kind: ElementKind,
        name: &str,
        values: Vec<f64>,
    ) -> Result<FieldHandle, FieldError> {
        let handle = FieldHandle::new(values);
        self.attach(kind, name, handle.clone())?;
        Ok(handle)
    }

    /// Register an existing buffer without copying it.
    ///
    /// Fails with [`FieldError::SizeMismatch`] unless the buffer has one
    /// value per element of `kind`; nothing is registered in that case.
    pub fn attach(
        &mut self,
        kind: ElementKind,
        name: &str,
        handle: FieldHandle,
    ) -> Result<(), FieldError> {
        let expected = self.counts.of(kind);
        if handle.len() != expected {
            return Err(FieldError::SizeMismatch {
                kind,
                name: name.to_string(),
                expected,
                actual: handle.len(),
            });
        }
        self.register(kind, name, handle);
        Ok(())
    }

    fn register(&mut self, kind: ElementKind, name: &str, handle: FieldHandle) {
        let entry = FieldEntry {
            handle,
            units: None,
        };
        match self.groups[kind.index()].insert(name.to_string(), entry) {
            Some(_) => warn!(%kind, name, "field replaced"),
            None => debug!(%kind, name, len = self.counts.of(kind), "field registered"),
        }
    }

    /// Handle to a registered field.
    pub fn field(&self, kind: ElementKind, name: &str) -> Result<FieldHandle, FieldError> {
        self.groups[kind.index()]
            .get(name)
            .map(|entry| entry.handle.clone())
            .ok_or_else(|| FieldError::UnknownField {
                kind,
                name: name.to_string(),
            })
    }

    /// Copy of a registered field's current values.
    pub fn field_values(&self, kind: ElementKind, name: &str) -> Result<Vec<f64>, FieldError> {
        self.field(kind, name).map(|h| h.to_vec())
    }

    /// `true` if `name` is registered on `kind`.
    pub fn has_field(&self, kind: ElementKind, name: &str) -> bool {
        self.groups[kind.index()].contains_key(name)
    }

    /// Field names registered on `kind`, in registration order.
    pub fn keys(&self, kind: ElementKind) -> impl Iterator<Item = &str> + '_ {
        self.groups[kind.index()].keys().map(String::as_str)
    }

    /// Number of fields registered on `kind`.
    pub fn len(&self, kind: ElementKind) -> usize {
        self.groups[kind.index()].len()
    }

    /// `true` if no field is registered on any kind.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(IndexMap::is_empty)
    }

    /// Annotate a registered field with units (e.g. `"m"`).
    pub fn set_units(
        &mut self,
        kind: ElementKind,
        name: &str,
        units: impl Into<String>,
    ) -> Result<(), FieldError> {
        let entry = self.groups[kind.index()].get_mut(name).ok_or_else(|| {
            FieldError::UnknownField {
                kind,
                name: name.to_string(),
            }
        })?;
        entry.units = Some(units.into());
        Ok(())
    }

    /// Units of a registered field, if any were set.
    pub fn units(&self, kind: ElementKind, name: &str) -> Result<Option<&str>, FieldError> {
        self.groups[kind.index()]
            .get(name)
            .map(|entry| entry.units.as_deref())
            .ok_or_else(|| FieldError::UnknownField {
                kind,
                name: name.to_string(),
            })
    }
}
