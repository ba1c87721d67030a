use std::path::Path;
use crate::cli::commands::ValidateArgs;
use crate::config::credentials::mask_secret;
use crate::config::parse_config;
use crate::errors::BlackCardError;

pub async fn handle_validate(args: ValidateArgs) -> Result<(), BlackCardError> {
    let config = parse_config(Path::new(&args.config)).await?;
    let outreach = config.outreach();
    println!("Configuration is valid: {}", args.config);
    println!("  server:   {}:{}", config.server().host, config.server().port);
    println!("  database: {}", config.database().path);
    match config.llm.as_ref().and_then(|l| l.provider.as_deref().map(|p| (p, l))) {
        Some((provider, llm)) => println!(
            "  llm:      {} (key {})",
            provider,
            llm.api_key.as_deref().map(mask_secret).unwrap_or_else(|| "missing".into())
        ),
        None => println!("  llm:      none (heuristic enrichment)"),
    }
    match config.places().api_key.as_deref() {
        Some(key) => println!("  places:   google (key {})", mask_secret(key)),
        None => println!("  places:   none"),
    }
    if let Some(token) = config.server().api_token.as_deref() {
        println!("  api token: {}", mask_secret(token));
    }
    println!("  loss overrides: {}", outreach.loss_overrides.len());
    Ok(())
}
