//! Domain models for rangers, credentials, and sessions.

use serde::{Deserialize, Serialize};

/// Role assigned to self-registered accounts
pub const DEFAULT_ROLE: &str = "Wildlife Ranger";

/// Park assigned to new accounts until dispatch reassigns them
pub const DEFAULT_PARK: &str = "Serengeti National Park";

/// A ranger account as the rest of the application sees it.
///
/// Created on signup; deactivation flips `is_active` instead of deleting the
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub ranger_id: String,
    pub team: String,
    pub park: String,
    pub avatar: String,
    pub join_date: String,
    pub is_active: bool,
}

/// Login form input. Never stored beyond the call that uses it.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Signup form input. Never stored beyond the call that uses it.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupCredentials {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub ranger_id: String,
    pub team: String,
}

/// An authenticated session: the signed-in ranger plus their opaque token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Profile row as stored in the hosted profile store.
///
/// The `email` column is unpopulated on the wire; callers fill it from the
/// identity session when assembling a [`User`].
#[derive(Debug, Clone, Deserialize)]
pub struct RangerProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: String,
    pub ranger_id: String,
    pub team: String,
    pub park: String,
    pub avatar: String,
    pub join_date: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl RangerProfile {
    /// Assemble the uniform [`User`] shape, taking the email from the identity
    /// session rather than the profile row.
    pub fn into_user(self, email: &str) -> User {
        User {
            id: self.id,
            email: email.to_string(),
            name: self.name,
            role: self.role,
            ranger_id: self.ranger_id,
            team: self.team,
            park: self.park,
            avatar: self.avatar,
            join_date: self.join_date,
            is_active: self.is_active,
        }
    }
}

/// Uppercased initials for an avatar badge ("Sarah Johnson" -> "SJ")
pub fn avatar_initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_initials() {
        assert_eq!(avatar_initials("Sarah Johnson"), "SJ");
        assert_eq!(avatar_initials("amina"), "A");
        assert_eq!(avatar_initials("Joseph K. Mwangi"), "JK");
        assert_eq!(avatar_initials("  David   Okello  "), "DO");
        assert_eq!(avatar_initials(""), "");
    }

    #[test]
    fn test_profile_row_deserializes_and_maps_to_user() {
        let row = serde_json::json!({
            "id": "8c2f0a4e-8a3f-4f0e-9f3d-1a2b3c4d5e6f",
            "name": "Sarah Johnson",
            "email": "",
            "role": "Senior Ranger",
            "ranger_id": "SNP-001",
            "team": "Alpha Team",
            "park": "Serengeti National Park",
            "avatar": "SJ",
            "join_date": "2021-03-15",
            "is_active": true
        });

        let profile: RangerProfile = serde_json::from_value(row).unwrap();
        let user = profile.into_user("sarah.johnson@safarimap.com");

        assert_eq!(user.email, "sarah.johnson@safarimap.com");
        assert_eq!(user.ranger_id, "SNP-001");
        assert_eq!(user.join_date, "2021-03-15");
        assert!(user.is_active);
    }

    #[test]
    fn test_profile_row_defaults() {
        // Rows written before the is_active column existed deserialize as active
        let row = serde_json::json!({
            "id": "1",
            "name": "Test Ranger",
            "role": "Wildlife Ranger",
            "ranger_id": "TSV-204",
            "team": "Bravo Team",
            "park": "Tsavo East",
            "avatar": "TR",
            "join_date": "2024-01-01"
        });

        let profile: RangerProfile = serde_json::from_value(row).unwrap();
        assert!(profile.is_active);
        assert!(profile.email.is_empty());
    }
}
