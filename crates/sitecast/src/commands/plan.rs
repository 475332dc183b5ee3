use colored::Colorize;
use sitecast_cloud::{PipelineOptions, site_pipeline};

/// Dry run: everything `up` would do, printed instead of executed.
pub fn handle() -> anyhow::Result<()> {
    let (project_root, site) = sitecast_core::load_site()?;

    let source_dir = site.resolved_source_dir(&project_root);
    let plan = sitecast_sync::plan(&source_dir)?;

    let graph = site_pipeline(&PipelineOptions {
        with_certificate: site.certificate.is_some(),
        with_distribution: site.distribution.is_some(),
    })?;

    println!("Site: {}", site.domain.cyan());
    println!(
        "Provider: {} ({})",
        site.provider.name.cyan(),
        site.provider.region
    );

    println!();
    println!("{}", format!("Stages ({}):", graph.len()).bold());
    for stage in graph.stages() {
        if stage.depends_on.is_empty() {
            println!("  • {}", stage.name.cyan());
        } else {
            println!(
                "  • {} (after {})",
                stage.name.cyan(),
                stage.depends_on.join(", ")
            );
        }
    }

    println!();
    println!("{}", format!("Uploads ({}):", plan.len()).bold());
    for op in &plan.operations {
        let content_type = op.content_type.unwrap_or("(no content type)");
        println!("  • {} ({})", op.remote_key.cyan(), content_type);
    }

    println!();
    println!("{}", plan.summary().to_string().bold());
    println!("Nothing was changed; run {} to apply.", "sitecast up".cyan());

    Ok(())
}
