use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// DataSource: A named origin of records
// ---------------------------------------------------------------------------

/// A logical data source a report can draw records from.
///
/// The four built-in sources have dedicated record accessors. Any other name
/// is carried as [`DataSource::Other`] so configurations referencing sources
/// the engine does not know yet still deserialize; such sources yield no
/// fields and no records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataSource {
    Deals,
    Properties,
    Expenses,
    Commissions,
    Other(String),
}

impl DataSource {
    /// The built-in sources, in catalog order.
    pub const BUILT_IN: [DataSource; 4] = [
        DataSource::Deals,
        DataSource::Properties,
        DataSource::Expenses,
        DataSource::Commissions,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            DataSource::Deals => "deals",
            DataSource::Properties => "properties",
            DataSource::Expenses => "expenses",
            DataSource::Commissions => "commissions",
            DataSource::Other(name) => name,
        }
    }

    /// Whether the engine has a record accessor for this source.
    pub fn is_built_in(&self) -> bool {
        !matches!(self, DataSource::Other(_))
    }
}

impl From<&str> for DataSource {
    fn from(name: &str) -> Self {
        match name {
            "deals" => DataSource::Deals,
            "properties" => DataSource::Properties,
            "expenses" => DataSource::Expenses,
            "commissions" => DataSource::Commissions,
            other => DataSource::Other(other.to_string()),
        }
    }
}

impl From<String> for DataSource {
    fn from(name: String) -> Self {
        DataSource::from(name.as_str())
    }
}

impl From<DataSource> for String {
    fn from(source: DataSource) -> Self {
        source.as_str().to_string()
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Role / Scope: Who is asking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agent,
}

/// The acting user a report is generated for.
///
/// Admins see every record; agents only see records they own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub user_id: String,
    pub role: Role,
}

impl Scope {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::Admin)
    }

    pub fn agent(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::Agent)
    }

    /// Whether a record owned by `owner` is visible in this scope.
    pub fn can_see(&self, owner: Option<&str>) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Agent => owner == Some(self.user_id.as_str()),
        }
    }
}
