// brix/src/commands/project.rs
//
// USE CASE: Scaffold a new dbt project.

use brix_core::application::{ProjectInitOptions, init_project};
use brix_core::infrastructure::config::ProjectSettings;
use brix_core::infrastructure::passthrough::DbtLauncher;

use crate::cli::ProjectInitArgs;

pub fn init(args: ProjectInitArgs) -> anyhow::Result<()> {
    let packages = (!args.packages.is_empty()).then_some(args.packages);
    let options = ProjectInitOptions {
        name: args.name,
        profile: args.profile,
        base_dir: args.base_dir,
        team: args.team,
        packages,
        materialization: args.materialization,
        persist_docs: args.persist_docs,
        with_example: args.with_example,
        force: args.force,
    };

    let result = init_project(&options, &ProjectSettings::from_env())?;
    println!("✨ {}", result.message);
    for file in &result.files_created {
        println!("   + {}", file);
    }

    if args.run_deps {
        if options.packages.is_none() {
            println!("ℹ️  No packages.yml, skipping dbt deps.");
        } else {
            println!("📦 Running dbt deps...");
            let code = DbtLauncher::default().run(&["deps"], Some(result.project_path.as_path()))?;
            if code != 0 {
                anyhow::bail!("dbt deps failed with exit code {}", code);
            }
        }
    }

    Ok(())
}
