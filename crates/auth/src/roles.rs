use serde::{Deserialize, Serialize};

/// Role classifier carried as a number on the wire (`userRole`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Role {
    Admin,
    Driver,
    Customer,
    /// A code this client does not know about; kept so it round-trips.
    Unknown(u8),
}

impl Role {
    pub fn code(&self) -> u8 {
        match self {
            Role::Admin => 1,
            Role::Driver => 2,
            Role::Customer => 3,
            Role::Unknown(code) => *code,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Driver => "Driver",
            Role::Customer => "Customer",
            Role::Unknown(_) => "User",
        }
    }
}

impl From<u8> for Role {
    fn from(code: u8) -> Self {
        match code {
            1 => Role::Admin,
            2 => Role::Driver,
            3 => Role::Customer,
            other => Role::Unknown(other),
        }
    }
}

impl From<Role> for u8 {
    fn from(role: Role) -> Self {
        role.code()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}
