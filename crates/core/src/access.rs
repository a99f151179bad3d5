//! User access levels stored in `users.access_level`.

/// Regular account. Can log in but cannot reach the admin area.
pub const ACCESS_LEVEL_USER: i32 = 1;

/// Site owner / administrator.
pub const ACCESS_LEVEL_ADMIN: i32 = 3;

/// Whether the given access level grants the admin area.
pub fn is_admin(access_level: i32) -> bool {
    access_level >= ACCESS_LEVEL_ADMIN
}
