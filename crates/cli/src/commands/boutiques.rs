//! Boutique and terminal commands.
//!
//! # Usage
//!
//! ```bash
//! wardrobe boutiques list
//! wardrobe boutiques show 3
//! wardrobe terminals list --boutique 3
//! wardrobe terminals find 9774d56d682e549c
//! wardrobe terminals register 9774d56d682e549c --brand Xiaomi --model "Pad 6"
//! ```

use std::fmt::Write as _;

use wardrobe_core::BoutiqueId;
use wardrobe_storefront::{
    Boutique, StorefrontClient, Terminal, TerminalRegistration, TerminalSync,
};

use super::{CliError, Output, or_dash};

pub async fn list(client: &StorefrontClient, out: &Output) -> Result<(), CliError> {
    let boutiques = client.boutiques().await?;
    out.emit(boutiques.as_slice(), render_boutiques)
}

pub async fn show(client: &StorefrontClient, out: &Output, id: &str) -> Result<(), CliError> {
    let boutique = client.boutique(&BoutiqueId::from(id.trim())).await?;
    out.emit(&boutique, |boutique| {
        let mut text = render_boutique(boutique);
        if let Some(url) = boutique
            .main_image
            .as_ref()
            .and_then(|image| client.thumbnail_url(image, None))
        {
            let _ = writeln!(text, "Image:       {url}");
        }
        text
    })
}

pub async fn terminals(
    client: &StorefrontClient,
    out: &Output,
    boutique: &str,
) -> Result<(), CliError> {
    let terminals = client.terminals(&BoutiqueId::from(boutique.trim())).await?;
    out.emit(terminals.as_slice(), render_terminals)
}

pub async fn find_terminal(
    client: &StorefrontClient,
    out: &Output,
    android_id: &str,
) -> Result<(), CliError> {
    let terminal = client.terminal_by_android_id(android_id.trim()).await?;
    out.emit(&terminal, |terminal| {
        terminal.as_ref().map_or_else(
            || format!("No terminal registered for {}.", android_id.trim()),
            render_terminal,
        )
    })
}

pub async fn register_terminal(
    client: &StorefrontClient,
    out: &Output,
    registration: &TerminalRegistration,
) -> Result<(), CliError> {
    let sync = client.sync_terminal(registration).await?;
    out.emit(&sync, render_sync)
}

fn render_boutiques(boutiques: &[Boutique]) -> String {
    if boutiques.is_empty() {
        return "No boutiques found.".to_string();
    }

    let mut text = String::new();
    for boutique in boutiques {
        let _ = writeln!(
            text,
            "{:<12} {:<16} {}",
            boutique.id,
            or_dash(boutique.city.as_deref()),
            or_dash(boutique.name.as_deref())
        );
    }
    text
}

fn render_boutique(boutique: &Boutique) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}", or_dash(boutique.name.as_deref()));
    let _ = writeln!(text);
    let _ = writeln!(text, "ID:          {}", boutique.id);
    let _ = writeln!(text, "Code:        {}", or_dash(boutique.code.as_deref()));
    let _ = writeln!(text, "Category:    {}", or_dash(boutique.category.as_deref()));
    let _ = writeln!(text, "Address:     {}", or_dash(boutique.address.as_deref()));
    let _ = writeln!(text, "City:        {}", or_dash(boutique.city.as_deref()));
    let _ = writeln!(text, "Contact:     {}", or_dash(boutique.contact.as_deref()));
    if let Some(stars) = boutique.stars {
        let _ = writeln!(text, "Stars:       {stars}");
    }
    let _ = writeln!(text, "Status:      {}", or_dash(boutique.status.as_deref()));
    let _ = writeln!(text, "Expires:     {}", or_dash(boutique.expire_date.as_deref()));
    text
}

fn render_terminals(terminals: &[Terminal]) -> String {
    if terminals.is_empty() {
        return "No terminals registered.".to_string();
    }

    let mut text = String::new();
    for terminal in terminals {
        let _ = writeln!(
            text,
            "{:<12} {:<20} {}",
            terminal.id,
            or_dash(terminal.android_id.as_deref()),
            or_dash(terminal.device_name.as_deref())
        );
    }
    text
}

fn render_terminal(terminal: &Terminal) -> String {
    let os = match (terminal.os_name.as_deref(), terminal.os_version.as_deref()) {
        (Some(name), Some(version)) => format!("{name} {version}"),
        (name, version) => or_dash(name.or(version)).to_string(),
    };
    let boutique = terminal
        .boutique
        .as_ref()
        .map(|b| b.name.clone().unwrap_or_else(|| b.id.to_string()));

    let mut text = String::new();
    let _ = writeln!(text, "{}", or_dash(terminal.device_name.as_deref()));
    let _ = writeln!(text);
    let _ = writeln!(text, "ID:          {}", terminal.id);
    let _ = writeln!(text, "Android ID:  {}", or_dash(terminal.android_id.as_deref()));
    let _ = writeln!(text, "Type:        {}", or_dash(terminal.device_type.as_deref()));
    let _ = writeln!(text, "OS:          {os}");
    let _ = writeln!(text, "Boutique:    {}", or_dash(boutique.as_deref()));
    let _ = writeln!(text, "Updated:     {}", or_dash(terminal.date_updated.as_deref()));
    text
}

fn render_sync(sync: &TerminalSync) -> String {
    match sync {
        TerminalSync::Created(id) => format!("Registered new terminal {id}"),
        TerminalSync::Updated(id) => format!("Updated terminal {id}"),
    }
}
