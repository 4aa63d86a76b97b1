//! Editable profile form backed by the current Directus user.

use tracing::{info, instrument};

use crate::directus::{ProfileUpdate, StorefrontClient, StorefrontError, User};

/// Local edit state for the signed-in user's name.
///
/// The form remembers the values it was seeded with so callers can tell
/// whether anything needs saving.
#[derive(Debug, Clone)]
pub struct ProfileForm {
    user: User,
    loaded: ProfileUpdate,
    current: ProfileUpdate,
}

impl ProfileForm {
    /// Fetch the current user and seed the form from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be fetched.
    pub async fn load(client: &StorefrontClient) -> Result<Self, StorefrontError> {
        let user = client.current_user().await?;
        Ok(Self::from_user(user))
    }

    /// Seed the form from an already fetched user.
    #[must_use]
    pub fn from_user(user: User) -> Self {
        let loaded = ProfileUpdate {
            first_name: user.first_name.clone().unwrap_or_default(),
            last_name: user.last_name.clone().unwrap_or_default(),
        };
        Self {
            user,
            current: loaded.clone(),
            loaded,
        }
    }

    /// The user the form was last seeded with.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.current.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.current.last_name
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.current.first_name = first_name.into();
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.current.last_name = last_name.into();
    }

    /// Whether the form differs from the loaded values.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.current != self.loaded
    }

    /// The pending update.
    #[must_use]
    pub const fn update(&self) -> &ProfileUpdate {
        &self.current
    }

    /// Save the names, then refetch the user and reseed the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation or the refetch fails. On error the
    /// local edits are kept.
    #[instrument(skip_all, fields(user_id = %self.user.id))]
    pub async fn submit(&mut self, client: &StorefrontClient) -> Result<User, StorefrontError> {
        client.update_user(&self.user.id, &self.current).await?;
        info!("Profile saved");

        let user = client.current_user().await?;
        *self = Self::from_user(user.clone());
        Ok(user)
    }
}
