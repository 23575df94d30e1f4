//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::validation::{validate_user_id, UserValidationError};
use crate::domain::wallet::EthAddress;

/// User identifier - alphanumeric + hyphens, max 50 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        validate_user_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Know-your-customer verification status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    /// Nothing submitted yet
    #[default]
    Pending,
    /// Awaiting manual review
    Submitted,
    Verified,
    Rejected,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for KycStatus {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "submitted" => Ok(Self::Submitted),
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            other => Err(UserValidationError::UnknownKycStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for KycStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted state of a user, used to rebuild the entity from storage
#[derive(Debug, Clone)]
pub struct UserSnapshot {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub kyc_status: KycStatus,
    pub kyc_submitted_at: Option<DateTime<Utc>>,
    pub wallet_address: Option<EthAddress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    /// Username for login
    username: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    kyc_status: KycStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    kyc_submitted_at: Option<DateTime<Utc>>,
    /// Checksummed wallet address set through the profile
    #[serde(skip_serializing_if = "Option::is_none")]
    wallet_address: Option<EthAddress>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user with KYC pending and no wallet address
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        email: Option<String>,
        phone_number: Option<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            email,
            phone_number,
            kyc_status: KycStatus::Pending,
            kyc_submitted_at: None,
            wallet_address: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Rebuild a user from persisted state
    pub fn restore(snapshot: UserSnapshot) -> Self {
        Self {
            id: snapshot.id,
            username: snapshot.username,
            password_hash: snapshot.password_hash,
            email: snapshot.email,
            phone_number: snapshot.phone_number,
            kyc_status: snapshot.kyc_status,
            kyc_submitted_at: snapshot.kyc_submitted_at,
            wallet_address: snapshot.wallet_address,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
            last_login_at: snapshot.last_login_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn kyc_status(&self) -> KycStatus {
        self.kyc_status
    }

    pub fn kyc_submitted_at(&self) -> Option<DateTime<Utc>> {
        self.kyc_submitted_at
    }

    pub fn wallet_address(&self) -> Option<&EthAddress> {
        self.wallet_address.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    // Mutators

    /// Update the password hash
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    pub fn set_phone_number(&mut self, phone_number: Option<String>) {
        self.phone_number = phone_number;
        self.touch();
    }

    pub fn set_wallet_address(&mut self, wallet_address: Option<EthAddress>) {
        self.wallet_address = wallet_address;
        self.touch();
    }

    /// Record a login
    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }

    /// Move KYC to `submitted`
    ///
    /// Pending and rejected users move to submitted; a repeated submission
    /// while already submitted leaves the state untouched. Verified users
    /// cannot resubmit.
    pub fn submit_kyc(&mut self) -> Result<(), UserValidationError> {
        match self.kyc_status {
            KycStatus::Verified => Err(UserValidationError::KycAlreadyVerified),
            KycStatus::Submitted => Ok(()),
            KycStatus::Pending | KycStatus::Rejected => {
                let now = Utc::now();
                self.kyc_status = KycStatus::Submitted;
                self.kyc_submitted_at = Some(now);
                self.updated_at = now;
                Ok(())
            }
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(id: &str, username: &str) -> User {
        let user_id = UserId::new(id).unwrap();
        User::new(
            user_id,
            username,
            "hashed_password",
            None,
            Some("+15551234567".to_string()),
        )
    }

    fn with_kyc(status: KycStatus) -> User {
        let user = create_test_user("user-1", "alice");
        User::restore(UserSnapshot {
            id: user.id().clone(),
            username: user.username().to_string(),
            password_hash: user.password_hash().to_string(),
            email: None,
            phone_number: None,
            kyc_status: status,
            kyc_submitted_at: None,
            wallet_address: None,
            created_at: user.created_at(),
            updated_at: user.updated_at(),
            last_login_at: None,
        })
    }

    #[test]
    fn test_user_id_valid() {
        let id = UserId::new("user-123").unwrap();
        assert_eq!(id.as_str(), "user-123");
    }

    #[test]
    fn test_user_id_invalid() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("-user").is_err());
        assert!(UserId::new("user-").is_err());
    }

    #[test]
    fn test_generated_user_id_is_valid() {
        let id = UserId::generate();
        assert!(UserId::new(id.as_str()).is_ok());
    }

    #[test]
    fn test_kyc_status_round_trip_str() {
        for status in [
            KycStatus::Pending,
            KycStatus::Submitted,
            KycStatus::Verified,
            KycStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<KycStatus>().unwrap(), status);
        }
        assert!("approved".parse::<KycStatus>().is_err());
    }

    #[test]
    fn test_user_creation() {
        let user = create_test_user("user-1", "alice");

        assert_eq!(user.username(), "alice");
        assert_eq!(user.phone_number(), Some("+15551234567"));
        assert_eq!(user.kyc_status(), KycStatus::Pending);
        assert!(user.wallet_address().is_none());
        assert!(user.last_login_at().is_none());
    }

    #[test]
    fn test_kyc_pending_to_submitted() {
        let mut user = create_test_user("user-1", "alice");

        user.submit_kyc().unwrap();
        assert_eq!(user.kyc_status(), KycStatus::Submitted);
        assert!(user.kyc_submitted_at().is_some());
    }

    #[test]
    fn test_kyc_resubmission_is_idempotent() {
        let mut user = create_test_user("user-1", "alice");
        user.submit_kyc().unwrap();
        let submitted_at = user.kyc_submitted_at();

        user.submit_kyc().unwrap();
        assert_eq!(user.kyc_status(), KycStatus::Submitted);
        assert_eq!(user.kyc_submitted_at(), submitted_at);
    }

    #[test]
    fn test_kyc_rejected_can_resubmit() {
        let mut user = with_kyc(KycStatus::Rejected);

        user.submit_kyc().unwrap();
        assert_eq!(user.kyc_status(), KycStatus::Submitted);
    }

    #[test]
    fn test_kyc_verified_cannot_resubmit() {
        let mut user = with_kyc(KycStatus::Verified);

        assert_eq!(
            user.submit_kyc(),
            Err(UserValidationError::KycAlreadyVerified)
        );
        assert_eq!(user.kyc_status(), KycStatus::Verified);
    }

    #[test]
    fn test_user_update_password() {
        let mut user = create_test_user("user-1", "alice");
        let original_updated = user.updated_at();

        // Small delay to ensure timestamp differs
        std::thread::sleep(std::time::Duration::from_millis(10));

        user.set_password_hash("new_hash");
        assert_eq!(user.password_hash(), "new_hash");
        assert!(user.updated_at() > original_updated);
    }

    #[test]
    fn test_set_wallet_address() {
        let mut user = create_test_user("user-1", "alice");
        let address = EthAddress::parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();

        user.set_wallet_address(Some(address));
        assert_eq!(
            user.wallet_address().map(|a| a.checksummed()),
            Some("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_string())
        );

        user.set_wallet_address(None);
        assert!(user.wallet_address().is_none());
    }

    #[test]
    fn test_user_serialization_excludes_password() {
        let user = create_test_user("user-1", "alice");

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("\"kyc_status\":\"pending\""));
    }
}
