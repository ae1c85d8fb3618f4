//! Ownership and "manage all" authorization rules.
//!
//! A user may modify or delete a category/image when they hold the matching
//! manage-all permission, or when they are the recorded creator. Admins hold
//! every permission implicitly. A resource whose creator has been deleted
//! (`created_by = NULL`) can only be managed through the manage-all grant.

use serde::{Serialize, Serializer};

use crate::error::CoreError;
use crate::roles::ROLE_ADMIN;
use crate::types::DbId;

/// Codename stored in `user_permissions` for category-wide management.
pub const PERM_MANAGE_ALL_CATEGORIES: &str = "can_manage_all_categories";

/// Codename stored in `user_permissions` for image-wide management.
pub const PERM_MANAGE_ALL_IMAGES: &str = "can_manage_all_images";

/// A grantable permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ManageAllCategories,
    ManageAllImages,
}

impl Permission {
    pub const ALL: [Permission; 2] = [Permission::ManageAllCategories, Permission::ManageAllImages];

    pub fn codename(self) -> &'static str {
        match self {
            Permission::ManageAllCategories => PERM_MANAGE_ALL_CATEGORIES,
            Permission::ManageAllImages => PERM_MANAGE_ALL_IMAGES,
        }
    }

    pub fn from_codename(codename: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.codename() == codename)
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.codename())
    }
}

/// Parse a list of codenames, rejecting anything unknown.
///
/// Duplicates collapse; the result keeps first-seen order.
pub fn parse_codenames(codenames: &[String]) -> Result<Vec<Permission>, CoreError> {
    let mut out = Vec::with_capacity(codenames.len());
    for name in codenames {
        let perm = Permission::from_codename(name).ok_or_else(|| {
            CoreError::Validation(format!("Unknown permission '{name}'"))
        })?;
        if !out.contains(&perm) {
            out.push(perm);
        }
    }
    Ok(out)
}

/// Everything the authorization rules need to know about the caller.
#[derive(Debug, Clone)]
pub struct Grants {
    pub user_id: DbId,
    pub role: String,
    granted: Vec<Permission>,
}

impl Grants {
    /// Build grants from a role name and the codenames stored for the user.
    /// Codenames that no longer map to a [`Permission`] are ignored.
    pub fn new(user_id: DbId, role: impl Into<String>, codenames: &[String]) -> Self {
        let granted = codenames
            .iter()
            .filter_map(|c| Permission::from_codename(c))
            .collect();
        Self {
            user_id,
            role: role.into(),
            granted,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn has(&self, perm: Permission) -> bool {
        self.is_admin() || self.granted.contains(&perm)
    }

    /// Permissions in effect, admin role expanded.
    pub fn effective(&self) -> Vec<Permission> {
        Permission::ALL
            .into_iter()
            .filter(|p| self.has(*p))
            .collect()
    }

    fn owns(&self, created_by: Option<DbId>) -> bool {
        created_by == Some(self.user_id)
    }
}

pub fn can_manage_all_categories(grants: &Grants) -> bool {
    grants.has(Permission::ManageAllCategories)
}

pub fn can_manage_category(grants: &Grants, created_by: Option<DbId>) -> bool {
    can_manage_all_categories(grants) || grants.owns(created_by)
}

pub fn can_manage_all_images(grants: &Grants) -> bool {
    grants.has(Permission::ManageAllImages)
}

pub fn can_manage_image(grants: &Grants, created_by: Option<DbId>) -> bool {
    can_manage_all_images(grants) || grants.owns(created_by)
}

/// [`can_manage_category`] as a `Result`, for use with `?` in handlers.
pub fn ensure_can_manage_category(
    grants: &Grants,
    category_id: DbId,
    created_by: Option<DbId>,
) -> Result<(), CoreError> {
    if can_manage_category(grants, created_by) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "You do not have permission to manage category {category_id}"
        )))
    }
}

/// [`can_manage_image`] as a `Result`, for use with `?` in handlers.
pub fn ensure_can_manage_image(
    grants: &Grants,
    image_id: DbId,
    created_by: Option<DbId>,
) -> Result<(), CoreError> {
    if can_manage_image(grants, created_by) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "You do not have permission to manage image {image_id}"
        )))
    }
}
