use async_trait::async_trait;

use crate::domain::{
    models::{CandidateFile, Profile, UserId},
    AvatarError,
};

/// Result of a completed avatar replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarReplacement {
    pub storage_path: String,
    pub public_url: String,
}

#[async_trait]
pub trait AvatarService: Send + Sync + 'static {
    /// Replace the caller's single avatar: validate, remove the previous
    /// object(s), upload the new one, link it to the profile.
    async fn replace_avatar(
        &self,
        user: &UserId,
        file: CandidateFile,
    ) -> Result<AvatarReplacement, AvatarError>;

    /// Idempotent retry of the link step after `LinkUpdateFailed`: the
    /// object already exists, only the profile row is patched.
    async fn link_avatar(&self, user: &UserId, public_url: &str) -> Result<(), AvatarError>;

    async fn get_profile(&self, user: &UserId) -> Result<Profile, AvatarError>;
}
