// brix-core/src/application/editor.rs
//
// CRUD over an in-memory `ProfileDocument`. Every operation checks its
// precondition first and returns a new document, so a failed call leaves
// the caller's document exactly as it was. Incoming outputs are
// canonicalized like parsed ones. Nothing here touches the disk.

use crate::domain::DomainError;
use crate::domain::profile::{OutputConfig, OutputUpdate, Profile, ProfileDocument};

/// Profile names in declaration order.
pub fn list_profile_names(document: &ProfileDocument) -> Vec<String> {
    document.profiles.keys().cloned().collect()
}

/// Output names of one profile in declaration order.
pub fn list_output_names(
    document: &ProfileDocument,
    profile: &str,
) -> Result<Vec<String>, DomainError> {
    Ok(find_profile(document, profile)?.outputs.keys().cloned().collect())
}

pub fn get_output<'a>(
    document: &'a ProfileDocument,
    profile: &str,
    output: &str,
) -> Result<&'a OutputConfig, DomainError> {
    find_profile(document, profile)?
        .outputs
        .get(output)
        .ok_or_else(|| output_not_found(profile, output))
}

pub fn add_profile(
    document: &ProfileDocument,
    name: &str,
    target: &str,
    output_name: &str,
    mut output: OutputConfig,
) -> Result<ProfileDocument, DomainError> {
    check_name(name, "profile")?;
    check_name(output_name, "output")?;
    if document.contains(name) {
        return Err(DomainError::ProfileAlreadyExists(name.to_string()));
    }
    output.canonicalize()?;

    let mut next = document.clone();
    next.profiles
        .insert(name.to_string(), Profile::new(target, output_name, output));
    Ok(next)
}

/// `target` is not checked against the profile's outputs; dbt resolves it.
pub fn update_profile_target(
    document: &ProfileDocument,
    name: &str,
    target: &str,
) -> Result<ProfileDocument, DomainError> {
    find_profile(document, name)?;

    let mut next = document.clone();
    if let Some(profile) = next.profiles.get_mut(name) {
        profile.target = target.to_string();
    }
    Ok(next)
}

pub fn delete_profile(
    document: &ProfileDocument,
    name: &str,
) -> Result<ProfileDocument, DomainError> {
    find_profile(document, name)?;

    let mut next = document.clone();
    next.profiles.shift_remove(name);
    Ok(next)
}

pub fn add_output(
    document: &ProfileDocument,
    profile: &str,
    output_name: &str,
    mut output: OutputConfig,
) -> Result<ProfileDocument, DomainError> {
    check_name(output_name, "output")?;
    if find_profile(document, profile)?.outputs.contains_key(output_name) {
        return Err(DomainError::OutputAlreadyExists {
            profile: profile.to_string(),
            output: output_name.to_string(),
        });
    }
    output.canonicalize()?;

    let mut next = document.clone();
    if let Some(entry) = next.profiles.get_mut(profile) {
        entry.outputs.insert(output_name.to_string(), output);
    }
    Ok(next)
}

/// Applies the fields set in `update`, re-running output validation.
pub fn update_output(
    document: &ProfileDocument,
    profile: &str,
    output_name: &str,
    update: &OutputUpdate,
) -> Result<ProfileDocument, DomainError> {
    let updated = get_output(document, profile, output_name)?.with_update(update)?;

    let mut next = document.clone();
    if let Some(slot) = next
        .profiles
        .get_mut(profile)
        .and_then(|entry| entry.outputs.get_mut(output_name))
    {
        *slot = updated;
    }
    Ok(next)
}

pub fn delete_output(
    document: &ProfileDocument,
    profile: &str,
    output_name: &str,
) -> Result<ProfileDocument, DomainError> {
    let entry = find_profile(document, profile)?;
    if !entry.outputs.contains_key(output_name) {
        return Err(output_not_found(profile, output_name));
    }
    if entry.outputs.len() == 1 {
        return Err(DomainError::LastOutput(profile.to_string()));
    }

    let mut next = document.clone();
    if let Some(entry) = next.profiles.get_mut(profile) {
        entry.outputs.shift_remove(output_name);
    }
    Ok(next)
}

fn find_profile<'a>(document: &'a ProfileDocument, name: &str) -> Result<&'a Profile, DomainError> {
    document
        .get(name)
        .ok_or_else(|| DomainError::ProfileNotFound(name.to_string()))
}

fn check_name(name: &str, kind: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::schema(format!("{} names must be non-empty", kind)));
    }
    Ok(())
}

fn output_not_found(profile: &str, output: &str) -> DomainError {
    DomainError::OutputNotFound {
        profile: profile.to_string(),
        output: output.to_string(),
    }
}
