use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// A named grant, optionally scoped to a single resource.
///
/// Role rows are shared: every user who is `org_admin` of organization 7
/// links to the same row through `users_roles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub resource_type: Option<String>,
    pub resource_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn role_name(&self) -> Option<RoleName> {
        self.name.parse().ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    OrgUser,
    OrgAdmin,
    SuperAdmin,
    Partner,
}

impl RoleName {
    pub const ALL: [RoleName; 4] = [
        RoleName::OrgUser,
        RoleName::OrgAdmin,
        RoleName::SuperAdmin,
        RoleName::Partner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::OrgUser => "org_user",
            RoleName::OrgAdmin => "org_admin",
            RoleName::SuperAdmin => "super_admin",
            RoleName::Partner => "partner",
        }
    }

    /// The kind of resource this role attaches to, `None` for global roles.
    pub fn resource_type(&self) -> Option<ResourceType> {
        match self {
            RoleName::OrgUser | RoleName::OrgAdmin => Some(ResourceType::Organization),
            RoleName::Partner => Some(ResourceType::Partner),
            RoleName::SuperAdmin => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RoleName::OrgUser => "Organization User",
            RoleName::OrgAdmin => "Organization Admin",
            RoleName::SuperAdmin => "Super Admin",
            RoleName::Partner => "Partner",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleName::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("Invalid resource type {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Organization,
    Partner,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Organization => "Organization",
            ResourceType::Partner => "Partner",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Organization" => Some(ResourceType::Organization),
            "Partner" => Some(ResourceType::Partner),
            _ => None,
        }
    }
}
