use colored::Colorize;
use sitecast_cloud::StateManager;

pub async fn handle() -> anyhow::Result<()> {
    let project_root = sitecast_core::find_project_root()?;

    let Some(record) = StateManager::new(&project_root).load().await? else {
        println!("{}", "No completed run yet.".yellow());
        println!("Run {} to provision the site.", "sitecast up".cyan());
        return Ok(());
    };

    println!("Site: {}", record.domain.cyan());
    println!("Last run: {}", record.completed_at.to_rfc3339());
    println!();

    let outputs = &record.outputs;
    if let Some(bucket) = &outputs.bucket {
        println!("  Bucket: {}", bucket.cyan());
    }
    if let Some(endpoint) = &outputs.website_endpoint {
        println!("  Website: {}", endpoint.cyan());
    }
    if let Some(arn) = &outputs.certificate_arn {
        println!("  Certificate: {}", arn.cyan());
    }
    for dns in &outputs.certificate_validation {
        println!(
            "  DNS validation: {} {} → {}",
            dns.name.cyan(),
            dns.record_type,
            dns.value
        );
    }
    if let Some(id) = &outputs.distribution_id {
        println!("  Distribution: {}", id.cyan());
    }
    if let Some(domain) = &outputs.distribution_domain {
        println!("  CDN: {}", domain.cyan());
    }

    Ok(())
}
