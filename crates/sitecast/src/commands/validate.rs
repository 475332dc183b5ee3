use colored::Colorize;

pub fn handle() -> anyhow::Result<()> {
    println!("{}", "Validating configuration...".blue());

    let project_root = sitecast_core::find_project_root()?;
    println!(
        "Project root: {}",
        project_root.display().to_string().cyan()
    );

    match sitecast_core::load_site_from_root(&project_root) {
        Ok(site) => {
            println!("{}", "✓ Configuration is valid!".green().bold());
            println!();
            println!("Summary:");
            println!("  Domain: {}", site.domain.cyan());
            println!("  Source: {}", site.source_dir.display().to_string().cyan());
            println!(
                "  Documents: {} / {}",
                site.index_document, site.error_document
            );
            println!(
                "  Provider: {} ({})",
                site.provider.name.cyan(),
                site.provider.region
            );
            println!(
                "  Certificate: {}",
                if site.certificate.is_some() {
                    "enabled".green()
                } else {
                    "disabled".yellow()
                }
            );
            println!(
                "  Distribution: {}",
                if site.distribution.is_some() {
                    "enabled".green()
                } else {
                    "disabled".yellow()
                }
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", format!("✗ Configuration error: {err}").red());
            Err(err.into())
        }
    }
}
