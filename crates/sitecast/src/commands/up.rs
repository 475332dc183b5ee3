use colored::Colorize;
use sitecast_cloud::{
    DriverOptions, PipelineOptions, ProvisioningDriver, RunRecord, RunStatus, SiteHost, SiteSpec,
    StageStatus, StateManager, site_pipeline,
};
use sitecast_cloud_aws::{AwsSiteHost, public_read_policy};
use std::time::Duration;

pub async fn handle(yes: bool, timeout: Option<u64>, concurrency: usize) -> anyhow::Result<()> {
    let (project_root, site) = sitecast_core::load_site()?;

    let source_dir = site.resolved_source_dir(&project_root);
    let plan = sitecast_sync::plan(&source_dir)?;

    println!("Site: {}", site.domain.cyan());
    println!("Source: {}", source_dir.display().to_string().cyan());
    println!("{}", plan.summary());

    let graph = site_pipeline(&PipelineOptions {
        with_certificate: site.certificate.is_some(),
        with_distribution: site.distribution.is_some(),
    })?;

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

    if !yes {
        println!();
        print!("Provision {} now? [y/N]: ", site.domain);
        use std::io::Write;
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    let host = AwsSiteHost::new(&site.provider.region);
    let auth = host.check_auth().await?;
    if !auth.authenticated {
        anyhow::bail!(
            "AWS authentication failed: {}",
            auth.error.unwrap_or_else(|| "unknown".to_string())
        );
    }
    if let Some(account) = &auth.account_info {
        println!();
        println!("Authenticated as {}", account.cyan());
    }

    let spec = SiteSpec {
        domain: site.domain.clone(),
        bucket: site.domain.clone(),
        index_document: site.index_document.clone(),
        error_document: site.error_document.clone(),
        force_destroy: site.force_destroy,
        policy: public_read_policy(&site.domain),
        price_class: site
            .distribution
            .as_ref()
            .map(|d| d.price_class.clone())
            .unwrap_or_else(|| "PriceClass_100".to_string()),
    };

    let options = DriverOptions {
        upload_concurrency: concurrency,
        stage_timeout: timeout.map(Duration::from_secs),
        ..Default::default()
    };

    let driver = ProvisioningDriver::new(host, graph, spec, plan, options);
    let report = driver.run().await;

    println!();
    for (name, status) in &report.stages {
        let mark = match status {
            StageStatus::Succeeded => "✓".green(),
            StageStatus::Failed => "✗".red(),
            _ => "•".yellow(),
        };
        println!("  {} {} ({})", mark, name, status);
    }

    match report.status {
        RunStatus::Completed => {
            let outputs = report.outputs.unwrap_or_default();

            println!();
            println!("{}", "✓ Provisioning complete".green().bold());
            if let Some(endpoint) = &outputs.website_endpoint {
                println!("  Website: {}", endpoint.cyan());
            }
            if let Some(arn) = &outputs.certificate_arn {
                println!("  Certificate: {}", arn.cyan());
            }
            for record in &outputs.certificate_validation {
                println!(
                    "  DNS validation: {} {} → {}",
                    record.name.cyan(),
                    record.record_type,
                    record.value
                );
            }
            if let Some(domain) = &outputs.distribution_domain {
                println!("  CDN: {}", domain.cyan());
            }

            let record = RunRecord::new(&site.domain, outputs);
            StateManager::new(&project_root).save(&record).await?;
            Ok(())
        }
        _ => {
            eprintln!();
            if let Some(failure) = &report.failure {
                eprintln!(
                    "{}",
                    format!("✗ Stage '{}' failed: {}", failure.stage, failure.message).red()
                );
            }
            if !report.never_ran.is_empty() {
                eprintln!("  Never ran: {}", report.never_ran.join(", "));
            }
            anyhow::bail!("provisioning aborted")
        }
    }
}
