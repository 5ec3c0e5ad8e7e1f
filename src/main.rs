//! Translate phrase keys from the command line.
//!
//! Usage:
//!   lazy-i18n [--locale <locale>] [--load-async] <key>...
//!
//! Required environment variables:
//! - I18N_LOCALES (comma-separated, e.g. "en-US,en-FR")
//!
//! Optional:
//! - I18N_FALLBACK (defaults to the first locale)
//! - I18N_FOLDER (defaults to i18n)
//! - I18N_LAZY_LOADING, I18N_CASE_SENSITIVE, I18N_ONLY_DOT_SEPARATOR, I18N_SYNC_LOADING

use anyhow::{bail, Context, Result};
use lazy_i18n::{I18n, I18nOptions};
use tracing::info;

struct Args {
    locale: Option<String>,
    load_async: bool,
    keys: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        locale: None,
        load_async: false,
        keys: Vec::new(),
    };

    let mut raw = std::env::args().skip(1);
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--locale" => args.locale = Some(raw.next().context("--locale needs a value")?),
            "--load-async" => args.load_async = true,
            flag if flag.starts_with("--") => bail!("Unknown flag: {}", flag),
            _ => args.keys.push(arg),
        }
    }

    if args.keys.is_empty() {
        bail!("Usage: lazy-i18n [--locale <locale>] [--load-async] <key>...");
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lazy_i18n=info".parse()?),
        )
        .init();

    let args = parse_args()?;
    let options = I18nOptions::from_env()?.with_sync_loading(!args.load_async);
    let mut i18n = I18n::new(options).context("Failed to initialize translations")?;

    if args.load_async {
        let count = i18n.load_translations().await?;
        info!("Indexed or loaded {} translation files", count);
    }

    if let Some(locale) = &args.locale {
        i18n.set_locale(locale)?;
    }

    for key in &args.keys {
        let text = i18n.translate_async(key, &Default::default()).await;
        println!("{}", text);
    }

    info!(
        "Done: {}",
        serde_json::to_string(&i18n.metrics()).context("Failed to serialize metrics")?
    );
    Ok(())
}
