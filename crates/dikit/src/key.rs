//! Canonical lookup keys
//!
//! A [`RegistrationKey`] identifies a factory: the requested type plus an
//! optional tag. An [`InstanceKey`] identifies a cached instance and adds an
//! optional scope. Factory lookup for an instance always goes through
//! [`InstanceKey::registration_key`], so every scope shares the same factory.
//!
//! A missing tag and an empty tag compose to the same key. A missing scope and
//! an empty scope do not.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable identity of a requested contract type
///
/// Equality and hashing only consider the [`TypeId`]; the name is kept for
/// diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct TypeIdentity {
    id: TypeId,
    name: &'static str,
}

impl TypeIdentity {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Key under which a factory is stored
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistrationKey {
    ty: TypeIdentity,
    // Empty when no tag was supplied
    tag: String,
}

impl RegistrationKey {
    pub fn compose(ty: TypeIdentity, tag: Option<&str>) -> Self {
        Self {
            ty,
            tag: tag.unwrap_or_default().to_owned(),
        }
    }

    pub fn of<T: ?Sized + 'static>(tag: Option<&str>) -> Self {
        Self::compose(TypeIdentity::of::<T>(), tag)
    }

    pub fn type_identity(&self) -> TypeIdentity {
        self.ty
    }

    /// The tag, or `None` for the untagged registration
    pub fn tag(&self) -> Option<&str> {
        if self.tag.is_empty() {
            None
        } else {
            Some(&self.tag)
        }
    }
}

impl fmt::Display for RegistrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)?;
        if !self.tag.is_empty() {
            write!(f, "@{}", self.tag)?;
        }
        Ok(())
    }
}

/// Key under which a resolved instance is cached
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    registration: RegistrationKey,
    scope: Option<String>,
}

impl InstanceKey {
    pub fn compose(ty: TypeIdentity, tag: Option<&str>, scope: Option<&str>) -> Self {
        Self {
            registration: RegistrationKey::compose(ty, tag),
            scope: scope.map(str::to_owned),
        }
    }

    pub fn of<T: ?Sized + 'static>(tag: Option<&str>, scope: Option<&str>) -> Self {
        Self::compose(TypeIdentity::of::<T>(), tag, scope)
    }

    /// The factory key this instance is built from (scope stripped)
    pub fn registration_key(&self) -> &RegistrationKey {
        &self.registration
    }

    pub fn type_identity(&self) -> TypeIdentity {
        self.registration.ty
    }

    pub fn tag(&self) -> Option<&str> {
        self.registration.tag()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = &self.scope {
            write!(f, "{scope}/")?;
        }
        write!(f, "{}", self.registration)
    }
}
