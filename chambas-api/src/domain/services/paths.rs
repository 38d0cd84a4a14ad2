//! Storage path conventions, reproduced exactly for interoperability with
//! previously stored objects.
//!
//! - avatar: `{identityId}/avatar-{epochMillis}.{ext}`
//! - listing image: `{identityId}/{listingId}/{epochMillis}-{randomToken}.{ext}`

use rand::{distributions::Alphanumeric, Rng};
use time::OffsetDateTime;

use crate::domain::models::{CandidateFile, ListingId, UserId};

const TOKEN_LEN: usize = 8;

pub(super) fn avatar_prefix(user: &UserId) -> String {
    format!("{user}/")
}

pub(super) fn avatar_path(user: &UserId, file: &CandidateFile) -> String {
    format!("{user}/avatar-{}.{}", epoch_millis(), file.extension())
}

pub(super) fn listing_prefix(author: &UserId, listing: &ListingId) -> String {
    format!("{author}/{listing}/")
}

pub(super) fn listing_image_path(
    author: &UserId,
    listing: &ListingId,
    file: &CandidateFile,
) -> String {
    format!(
        "{author}/{listing}/{}-{}.{}",
        epoch_millis(),
        random_token(),
        file.extension()
    )
}

fn epoch_millis() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn listing_image_path_follows_convention() {
        let author = UserId::new(Uuid::new_v4());
        let listing = ListingId::new(Uuid::new_v4());
        let file = CandidateFile::new("photo.jpg", "image/jpeg", vec![0u8; 8]);

        let path = listing_image_path(&author, &listing, &file);

        assert!(path.starts_with(&format!("{author}/{listing}/")));
        assert!(path.ends_with(".jpg"));
        assert!(path.starts_with(&listing_prefix(&author, &listing)));
    }

    #[test]
    fn avatar_path_lives_under_identity_prefix() {
        let user = UserId::new(Uuid::new_v4());
        let file = CandidateFile::new("me.png", "image/png", vec![0u8; 8]);

        let path = avatar_path(&user, &file);

        assert!(path.starts_with(&avatar_prefix(&user)));
        assert!(path.contains("/avatar-"));
        assert!(path.ends_with(".png"));
    }

    #[test]
    fn extension_falls_back_to_content_type() {
        let user = UserId::new(Uuid::new_v4());
        let file = CandidateFile::new("noext", "image/webp", vec![0u8; 8]);

        assert!(avatar_path(&user, &file).ends_with(".webp"));
    }

    #[test]
    fn paths_for_the_same_file_are_unique() {
        let author = UserId::new(Uuid::new_v4());
        let listing = ListingId::new(Uuid::new_v4());
        let file = CandidateFile::new("photo.jpg", "image/jpeg", vec![0u8; 8]);

        let first = listing_image_path(&author, &listing, &file);
        let second = listing_image_path(&author, &listing, &file);

        assert_ne!(first, second);
    }
}
