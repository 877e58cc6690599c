use uuid::Uuid;

/// A caller known to the fake identity provider.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Accepted by the identity provider but the user has no tenant membership.
pub const NO_TENANT_TOKEN: &str = "token-without-tenant";

pub fn tenant_a_user() -> TestUser {
    TestUser {
        tenant_id: Uuid::from_u128(0xa000_0000_0000_0000_0000_0000_0000_0001),
        user_id: Uuid::from_u128(0xa000_0000_0000_0000_0000_0000_0000_0002),
        token: "token-tenant-a".to_string(),
    }
}

pub fn tenant_b_user() -> TestUser {
    TestUser {
        tenant_id: Uuid::from_u128(0xb000_0000_0000_0000_0000_0000_0000_0001),
        user_id: Uuid::from_u128(0xb000_0000_0000_0000_0000_0000_0000_0002),
        token: "token-tenant-b".to_string(),
    }
}
