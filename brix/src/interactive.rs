// brix/src/interactive.rs
//
// Menu-driven editing over the same editor operations as `--action`.
// Every completed operation is saved right away; Esc backs out of the
// current menu, Esc or Ctrl-C on the main menu leaves.

use std::fmt;
use std::path::Path;

use inquire::validator::ValueRequiredValidator;
use inquire::{Confirm, CustomType, InquireError, Password, Select, Text};

use brix_core::application::editor;
use brix_core::domain::profile::{
    AuthMode, DatabricksOutput, DuckDbOutput, MEMORY_PATH, OutputConfig, OutputUpdate, ProfileDocument,
};
use brix_core::infrastructure::config::save_profiles;

use crate::commands::profile::load_or_empty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainAction {
    AddProfile,
    EditProfile,
    DeleteProfile,
    AddOutput,
    EditOutput,
    DeleteOutput,
    Exit,
}

impl MainAction {
    const ALL: [MainAction; 7] = [
        MainAction::AddProfile,
        MainAction::EditProfile,
        MainAction::DeleteProfile,
        MainAction::AddOutput,
        MainAction::EditOutput,
        MainAction::DeleteOutput,
        MainAction::Exit,
    ];
}

impl fmt::Display for MainAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MainAction::AddProfile => "Add a new profile",
            MainAction::EditProfile => "Edit an existing profile",
            MainAction::DeleteProfile => "Delete a profile",
            MainAction::AddOutput => "Add an output to a profile",
            MainAction::EditOutput => "Edit an output",
            MainAction::DeleteOutput => "Delete an output",
            MainAction::Exit => "Exit",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    DuckDb,
    Databricks,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::DuckDb => f.write_str("DuckDB"),
            Backend::Databricks => f.write_str("Databricks"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Token,
    OAuthBrowser,
    OAuthClient,
    OAuthAzure,
    Later,
}

impl fmt::Display for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Auth::Token => "Personal access token",
            Auth::OAuthBrowser => "OAuth (browser login)",
            Auth::OAuthClient => "OAuth service principal (AWS/GCP)",
            Auth::OAuthAzure => "OAuth service principal (Azure)",
            Auth::Later => "Configure later (env_var in profiles.yml)",
        };
        f.write_str(label)
    }
}

impl From<AuthMode> for Auth {
    fn from(mode: AuthMode) -> Self {
        match mode {
            AuthMode::Token => Auth::Token,
            AuthMode::OAuthInteractive => Auth::OAuthBrowser,
            AuthMode::OAuthClientCredentials => Auth::OAuthClient,
            AuthMode::OAuthAzure => Auth::OAuthAzure,
            AuthMode::Deferred => Auth::Later,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProfileMenu {
    Target,
    EditOutput,
    Back,
}

impl fmt::Display for ProfileMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileMenu::Target => f.write_str("Change default target"),
            ProfileMenu::EditOutput => f.write_str("Edit an output"),
            ProfileMenu::Back => f.write_str("Back"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMenu {
    Path,
    Threads,
    Back,
}

impl fmt::Display for OutputMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMenu::Path => f.write_str("Change path"),
            OutputMenu::Threads => f.write_str("Change threads"),
            OutputMenu::Back => f.write_str("Back"),
        }
    }
}

/// `Ok(None)` when the user backed out of a prompt.
fn answer<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn optional(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

struct Session<'a> {
    path: &'a Path,
    document: ProfileDocument,
}

pub fn run(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        println!("No profiles found at {}. Creating new file.", path.display());
    }
    let mut session = Session {
        path,
        document: load_or_empty(path)?,
    };
    println!("Editing profiles at: {}", path.display());

    loop {
        let choice = answer(
            Select::new("What would you like to do?", MainAction::ALL.to_vec()).prompt(),
        )?;
        let action = match choice {
            None | Some(MainAction::Exit) => break,
            Some(action) => action,
        };
        if let Err(e) = session.dispatch(action) {
            eprintln!("❌ {}", e);
        }
    }

    println!("Goodbye!");
    Ok(())
}

impl Session<'_> {
    fn dispatch(&mut self, action: MainAction) -> anyhow::Result<()> {
        match action {
            MainAction::AddProfile => self.add_profile(),
            MainAction::EditProfile => match self.select_profile("Select profile to edit:")? {
                Some(profile) => self.edit_profile(&profile),
                None => Ok(()),
            },
            MainAction::DeleteProfile => self.delete_profile(),
            MainAction::AddOutput => self.add_output(),
            MainAction::EditOutput => {
                let Some(profile) = self.select_profile("Select profile:")? else {
                    return Ok(());
                };
                match self.select_output(&profile)? {
                    Some(output) => self.edit_output(&profile, &output),
                    None => Ok(()),
                }
            }
            MainAction::DeleteOutput => self.delete_output(),
            MainAction::Exit => Ok(()),
        }
    }

    fn commit(&mut self, next: ProfileDocument, message: String) -> anyhow::Result<()> {
        save_profiles(&next, self.path)?;
        self.document = next;
        println!("✅ {}", message);
        Ok(())
    }

    fn select_profile(&self, message: &str) -> anyhow::Result<Option<String>> {
        let names = editor::list_profile_names(&self.document);
        if names.is_empty() {
            println!("No profiles defined yet.");
            return Ok(None);
        }
        answer(Select::new(message, names).prompt())
    }

    fn select_output(&self, profile: &str) -> anyhow::Result<Option<String>> {
        let names = editor::list_output_names(&self.document, profile)?;
        answer(Select::new("Select output:", names).prompt())
    }

    fn add_profile(&mut self) -> anyhow::Result<()> {
        let Some(name) = answer(
            Text::new("Enter profile name:")
                .with_validator(ValueRequiredValidator::default())
                .prompt(),
        )?
        else {
            return Ok(());
        };
        let Some(target) = answer(Text::new("Enter default target name:").with_default("dev").prompt())?
        else {
            return Ok(());
        };
        let Some(output_name) = answer(
            Text::new("Enter initial output name:")
                .with_default(&target)
                .prompt(),
        )?
        else {
            return Ok(());
        };
        let Some(output) = prompt_output_config()? else {
            return Ok(());
        };

        let next = editor::add_profile(&self.document, &name, &target, &output_name, output)?;
        self.commit(next, format!("Added profile '{}'", name))
    }

    fn delete_profile(&mut self) -> anyhow::Result<()> {
        let Some(profile) = self.select_profile("Select profile to delete:")? else {
            return Ok(());
        };
        if !confirm(&format!("profile '{}'", profile))? {
            return Ok(());
        }
        let next = editor::delete_profile(&self.document, &profile)?;
        self.commit(next, format!("Deleted profile '{}'", profile))
    }

    fn add_output(&mut self) -> anyhow::Result<()> {
        let Some(profile) = self.select_profile("Select profile:")? else {
            return Ok(());
        };
        let Some(output_name) = answer(
            Text::new("Enter output name:")
                .with_validator(ValueRequiredValidator::default())
                .prompt(),
        )?
        else {
            return Ok(());
        };
        let Some(output) = prompt_output_config()? else {
            return Ok(());
        };

        let next = editor::add_output(&self.document, &profile, &output_name, output)?;
        self.commit(
            next,
            format!("Added output '{}' to profile '{}'", output_name, profile),
        )
    }

    fn delete_output(&mut self) -> anyhow::Result<()> {
        let Some(profile) = self.select_profile("Select profile:")? else {
            return Ok(());
        };
        let Some(output) = self.select_output(&profile)? else {
            return Ok(());
        };
        if !confirm(&format!("output '{}' from profile '{}'", output, profile))? {
            return Ok(());
        }
        let next = editor::delete_output(&self.document, &profile, &output)?;
        self.commit(
            next,
            format!("Deleted output '{}' from profile '{}'", output, profile),
        )
    }

    fn edit_profile(&mut self, profile: &str) -> anyhow::Result<()> {
        loop {
            let Some(current) = self.document.get(profile) else {
                eprintln!("Profile '{}' not found.", profile);
                return Ok(());
            };
            let target = current.target.clone();
            let outputs: Vec<&str> = current.outputs.keys().map(String::as_str).collect();
            println!("\n[Editing profile: {}]", profile);
            println!("  target: {}", target);
            println!("  outputs: {}", outputs.join(", "));

            let menu = vec![ProfileMenu::Target, ProfileMenu::EditOutput, ProfileMenu::Back];
            match answer(Select::new("What would you like to edit?", menu).prompt())? {
                None | Some(ProfileMenu::Back) => return Ok(()),
                Some(ProfileMenu::Target) => {
                    if let Some(new_target) =
                        answer(Text::new("Enter new target:").with_default(&target).prompt())?
                    {
                        let next = editor::update_profile_target(&self.document, profile, &new_target)?;
                        self.commit(next, format!("Updated target to '{}'", new_target))?;
                    }
                }
                Some(ProfileMenu::EditOutput) => {
                    if let Some(output) = self.select_output(profile)? {
                        self.edit_output(profile, &output)?;
                    }
                }
            }
        }
    }

    fn edit_output(&mut self, profile: &str, output: &str) -> anyhow::Result<()> {
        loop {
            let config = editor::get_output(&self.document, profile, output)?.clone();
            println!("\n[Editing output: {}.{}]", profile, output);
            println!("  type: {}", config.type_name());

            let mut menu = Vec::with_capacity(3);
            match &config {
                OutputConfig::DuckDb(duck) => {
                    println!("  path: {}", duck.path);
                    menu.push(OutputMenu::Path);
                }
                OutputConfig::Databricks(warehouse) => {
                    println!("  host: {}", warehouse.host);
                    println!("  auth: {}", Auth::from(warehouse.auth_mode()?));
                }
            }
            println!("  threads: {}", config.threads());
            menu.extend([OutputMenu::Threads, OutputMenu::Back]);

            let update = match answer(Select::new("What would you like to edit?", menu).prompt())? {
                None | Some(OutputMenu::Back) => return Ok(()),
                Some(OutputMenu::Path) => {
                    let current = match &config {
                        OutputConfig::DuckDb(duck) => duck.path.clone(),
                        OutputConfig::Databricks(_) => MEMORY_PATH.to_string(),
                    };
                    answer(Text::new("Enter new path:").with_default(&current).prompt())?.map(|path| {
                        OutputUpdate {
                            path: Some(path),
                            threads: None,
                        }
                    })
                }
                Some(OutputMenu::Threads) => answer(
                    CustomType::<u32>::new("Enter new thread count:")
                        .with_default(config.threads())
                        .with_error_message("Please enter a positive integer")
                        .prompt(),
                )?
                .map(|threads| OutputUpdate {
                    path: None,
                    threads: Some(threads),
                }),
            };

            if let Some(update) = update {
                match editor::update_output(&self.document, profile, output, &update) {
                    Ok(next) => self.commit(next, format!("Updated output '{}'", output))?,
                    Err(e) => eprintln!("❌ {}", e),
                }
            }
        }
    }
}

fn confirm(what: &str) -> anyhow::Result<bool> {
    Ok(answer(
        Confirm::new(&format!("Delete {}?", what))
            .with_default(false)
            .prompt(),
    )?
    .unwrap_or(false))
}

fn prompt_threads() -> anyhow::Result<Option<u32>> {
    answer(
        CustomType::<u32>::new("Enter thread count:")
            .with_default(1)
            .with_error_message("Please enter a positive integer")
            .prompt(),
    )
}

fn prompt_output_config() -> anyhow::Result<Option<OutputConfig>> {
    let backends = vec![Backend::DuckDb, Backend::Databricks];
    let Some(backend) = answer(Select::new("Select output type:", backends).prompt())? else {
        return Ok(None);
    };

    match backend {
        Backend::DuckDb => {
            let Some(path) = answer(Text::new("Enter DuckDB path:").with_default(MEMORY_PATH).prompt())?
            else {
                return Ok(None);
            };
            let Some(threads) = prompt_threads()? else {
                return Ok(None);
            };
            Ok(Some(DuckDbOutput::new(path, threads)?.into()))
        }
        Backend::Databricks => prompt_databricks(),
    }
}

fn prompt_databricks() -> anyhow::Result<Option<OutputConfig>> {
    let required = |message: &str| {
        answer(
            Text::new(message)
                .with_validator(ValueRequiredValidator::default())
                .prompt(),
        )
    };
    let secret = |message: &str| {
        answer(
            Password::new(message)
                .without_confirmation()
                .with_validator(ValueRequiredValidator::default())
                .prompt(),
        )
    };

    let Some(host) = required("Workspace host (e.g. adb-123.azuredatabricks.net):")? else {
        return Ok(None);
    };
    let Some(http_path) = required("SQL warehouse HTTP path:")? else {
        return Ok(None);
    };
    let Some(schema) = required("Schema:")? else {
        return Ok(None);
    };
    let Some(catalog) = answer(Text::new("Catalog (optional):").prompt())? else {
        return Ok(None);
    };

    let methods = vec![
        Auth::Token,
        Auth::OAuthBrowser,
        Auth::OAuthClient,
        Auth::OAuthAzure,
        Auth::Later,
    ];
    let Some(auth) = answer(Select::new("Authentication method:", methods).prompt())? else {
        return Ok(None);
    };

    let mut builder = DatabricksOutput::builder(schema, host, http_path);
    builder = match auth {
        Auth::Token => match secret("Personal access token:")? {
            Some(token) => builder.token(token),
            None => return Ok(None),
        },
        Auth::OAuthBrowser => builder.oauth(),
        Auth::OAuthClient => {
            let (Some(id), Some(client_secret)) = (required("Client ID:")?, secret("Client secret:")?)
            else {
                return Ok(None);
            };
            builder.oauth().client_id(id).client_secret(client_secret)
        }
        Auth::OAuthAzure => {
            let (Some(id), Some(client_secret)) = (
                required("Azure client ID:")?,
                secret("Azure client secret:")?,
            ) else {
                return Ok(None);
            };
            builder
                .oauth()
                .azure_client_id(id)
                .azure_client_secret(client_secret)
        }
        Auth::Later => builder,
    };
    if let Some(catalog) = optional(catalog) {
        builder = builder.catalog(catalog);
    }
    let Some(threads) = prompt_threads()? else {
        return Ok(None);
    };

    Ok(Some(builder.threads(threads).build()?.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_ends_with_exit() {
        assert_eq!(MainAction::ALL.last(), Some(&MainAction::Exit));
        assert_eq!(MainAction::ALL[0].to_string(), "Add a new profile");
    }

    #[test]
    fn test_auth_label_follows_output_credentials() -> anyhow::Result<()> {
        let azure = DatabricksOutput::builder("analytics", "x.azuredatabricks.net", "/sql/abc")
            .oauth()
            .azure_client_id("id")
            .azure_client_secret("secret")
            .build()?;
        assert_eq!(Auth::from(azure.auth_mode()?), Auth::OAuthAzure);

        let deferred = DatabricksOutput::builder("analytics", "x.databricks.com", "/sql/abc").build()?;
        assert_eq!(
            Auth::from(deferred.auth_mode()?).to_string(),
            "Configure later (env_var in profiles.yml)"
        );
        Ok(())
    }

    #[test]
    fn test_optional_trims_blank_input() {
        assert_eq!(optional("   ".to_string()), None);
        assert_eq!(optional(" main ".to_string()), Some("main".to_string()));
    }

    #[test]
    fn test_cancelled_prompt_is_none() -> anyhow::Result<()> {
        let result: Result<String, InquireError> = Err(InquireError::OperationCanceled);
        assert_eq!(answer(result)?, None);
        Ok(())
    }
}
