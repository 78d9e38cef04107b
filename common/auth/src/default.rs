use crate::Permission;
use venter_entity::role::Role;

/// The permissions granted to each role.
///
/// Employees work with their own files, admins additionally manage all files of their
/// organisation and onboard new employees.
pub const DEFAULT_ROLE_PERMISSIONS: &[(Role, &[Permission])] = &[
    (
        Role::Employee,
        &[
            Permission::UploadFile,
            Permission::ReadFile,
            Permission::ReadCategory,
        ],
    ),
    (
        Role::Admin,
        &[
            Permission::UploadFile,
            Permission::ReadFile,
            Permission::ReadAllFiles,
            Permission::DeleteFile,
            Permission::ReadCategory,
            Permission::RegisterEmployee,
        ],
    ),
];

/// The permissions of a role, as configured by [`DEFAULT_ROLE_PERMISSIONS`].
pub fn permissions_of(role: Role) -> &'static [Permission] {
    DEFAULT_ROLE_PERMISSIONS
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, permissions)| *permissions)
        .unwrap_or_default()
}
