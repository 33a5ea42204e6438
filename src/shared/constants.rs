/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - can manage the catalog and run the seed
pub const ROLE_ADMIN: &str = "admin";

/// Super user role - elevated access to private diagnostics routes
pub const ROLE_SUPER_USER: &str = "super-user";

/// Default role assigned to every registered account
pub const ROLE_USER: &str = "user";
