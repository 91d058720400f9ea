use thiserror::Error;

/// Fields that must be filled before a challenge can run, in check order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    UserToken,
    SecretKey,
    ChallengeId,
}

impl FormField {
    pub const REQUIRED: [FormField; 3] = [FormField::UserToken, FormField::SecretKey, FormField::ChallengeId];

    pub fn label(self) -> &'static str {
        match self {
            FormField::UserToken => "User Token",
            FormField::SecretKey => "Secret Key",
            FormField::ChallengeId => "Challenge ID",
        }
    }
}

/// First required field found empty
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{} is Empty", .0.label())]
pub struct ValidationError(pub FormField);

/// Session-lifetime form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub user_token: String,
    pub secret_key: String,
    pub challenge_id: String,
}

/// Validated values, ready to hand to the SDK
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRequest {
    pub user_token: String,
    pub secret_key: String,
    pub challenge_id: String,
}

impl FormInput {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::UserToken => &self.user_token,
            FormField::SecretKey => &self.secret_key,
            FormField::ChallengeId => &self.challenge_id,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::UserToken => &mut self.user_token,
            FormField::SecretKey => &mut self.secret_key,
            FormField::ChallengeId => &mut self.challenge_id,
        }
    }

    /// Check required fields in order; the first empty one wins.
    /// Whitespace counts as content.
    pub fn validate(&self) -> Result<ChallengeRequest, ValidationError> {
        if let Some(field) = FormField::REQUIRED.into_iter().find(|f| self.field(*f).is_empty()) {
            return Err(ValidationError(field));
        }

        Ok(ChallengeRequest {
            user_token: self.user_token.clone(),
            secret_key: self.secret_key.clone(),
            challenge_id: self.challenge_id.clone(),
        })
    }
}
