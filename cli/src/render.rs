//! Text rendering of the diary state and identity.

use std::io::{self, Write};

use diary_core::{ApiStatus, DiaryState, Identity, Travel, TravelClient};

pub fn identity<W: Write>(out: &mut W, identity: &Identity) -> io::Result<()> {
    if !identity.is_signed_in() {
        return writeln!(out, "Not signed in. Run `diary login --name <name> --email <email>`.");
    }
    writeln!(out, "{} <{}>", identity.name, identity.email)?;
    if !identity.photo_url.is_empty() {
        writeln!(out, "photo: {}", identity.photo_url)?;
    }
    Ok(())
}

/// Render the list branch the way the main screen does: entries on success,
/// a retry hint on failure.
pub fn state<W: Write>(out: &mut W, state: &DiaryState, client: &TravelClient) -> io::Result<()> {
    match state.status {
        ApiStatus::Loading => writeln!(out, "Loading..."),
        ApiStatus::Failed => writeln!(
            out,
            "Could not load your travel diary. Run `diary list` to try again."
        ),
        ApiStatus::Success if state.travels.is_empty() => {
            writeln!(out, "No travel entries yet. Add one with `diary add`.")
        }
        ApiStatus::Success => {
            for entry in &state.travels {
                travel(out, entry, client)?;
            }
            Ok(())
        }
    }
}

/// One entry: id and title, then the description and absolute photo URL.
pub fn travel<W: Write>(out: &mut W, travel: &Travel, client: &TravelClient) -> io::Result<()> {
    let done = if travel.completed { " (completed)" } else { "" };
    writeln!(out, "[{}] {}{}", travel.id, travel.title, done)?;
    if let Some(description) = travel.description.as_deref().filter(|d| !d.is_empty()) {
        writeln!(out, "    {description}")?;
    }
    if let Some(url) = client.image_url(travel) {
        writeln!(out, "    {url}")?;
    }
    Ok(())
}
