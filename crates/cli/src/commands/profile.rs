//! Profile commands.
//!
//! # Usage
//!
//! ```bash
//! wardrobe profile show
//! wardrobe profile edit --first-name Lin
//! ```

use std::fmt::Write as _;

use serde_json::json;
use wardrobe_storefront::{ProfileForm, StorefrontClient, User};

use super::{CliError, Output, or_dash};

/// Print the signed-in user.
pub async fn show(client: &StorefrontClient, out: &Output) -> Result<(), CliError> {
    let user = client.current_user().await?;
    out.emit(&user, render_user)
}

/// Apply name edits and print the refreshed profile.
pub async fn edit(
    client: &StorefrontClient,
    out: &Output,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<(), CliError> {
    let mut form = ProfileForm::load(client).await?;
    apply_edits(&mut form, first_name, last_name);

    if !form.is_dirty() {
        tracing::info!("Profile unchanged, skipping update");
        return out.emit(&json!({ "updated": false }), |_| {
            "nothing to update".to_string()
        });
    }

    let user = form.submit(client).await?;
    out.emit(&user, |user| format!("Profile updated.\n\n{}", render_user(user)))
}

fn apply_edits(form: &mut ProfileForm, first_name: Option<String>, last_name: Option<String>) {
    if let Some(first_name) = first_name {
        form.set_first_name(first_name.trim());
    }
    if let Some(last_name) = last_name {
        form.set_last_name(last_name.trim());
    }
}

pub(crate) fn render_user(user: &User) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "ID:          {}", user.id);
    let _ = writeln!(text, "Name:        {}", or_dash(Some(user.display_name().as_str())));
    let _ = writeln!(text, "First name:  {}", or_dash(user.first_name.as_deref()));
    let _ = writeln!(text, "Last name:   {}", or_dash(user.last_name.as_deref()));
    let _ = writeln!(text, "Email:       {}", or_dash(user.email.as_deref()));
    let _ = writeln!(text, "Status:      {}", user.status);
    let role = user.role.as_ref().and_then(|r| r.name.as_deref());
    let _ = writeln!(text, "Role:        {}", or_dash(role));
    let _ = writeln!(text, "Last access: {}", or_dash(user.last_access.as_deref()));
    text
}
