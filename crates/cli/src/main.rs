use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dotyield_core::catalog::Catalog;
use dotyield_core::domain::asset::AssetId;
use dotyield_core::domain::recommendation::Recommendation;
use dotyield_core::domain::selection::Selection;

#[derive(Debug, Parser)]
#[command(name = "dotyield")]
struct Args {
    /// Comma separated assets to evaluate, e.g. `DOT,USDC`.
    #[arg(long)]
    assets: String,

    /// Catalog seed file. Defaults to CATALOG_PATH, then the built-in catalog.
    #[arg(long)]
    catalog: Option<String>,

    /// Print the recommendation as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = dotyield_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    if let Err(err) = run(&args, &settings) {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %err, "recommendation run failed");
        return Err(err);
    }
    Ok(())
}

fn run(args: &Args, settings: &dotyield_core::config::Settings) -> anyhow::Result<()> {
    let catalog = match args.catalog.as_deref() {
        Some(path) => Catalog::from_seed_file(path)?,
        None => settings.load_catalog()?,
    };

    let selection = parse_selection(&args.assets)?;
    let recommendation = dotyield_core::recommender::recommend(&catalog, &selection)
        .context("cannot recommend for this selection")?;

    tracing::info!(
        assets = %catalog.canonical_key(&selection),
        picks = recommendation.picks.len(),
        "recommendation computed"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recommendation)?);
    } else {
        print!("{}", render_text(&catalog, &recommendation));
    }
    Ok(())
}

fn parse_selection(assets: &str) -> anyhow::Result<Selection> {
    let selection: Selection = AssetId::parse_list(assets).into_iter().collect();
    anyhow::ensure!(
        !selection.is_empty(),
        "--assets must name at least one asset (got {assets:?})"
    );
    Ok(selection)
}

fn render_text(catalog: &Catalog, recommendation: &Recommendation) -> String {
    let mut out = String::new();
    for pick in &recommendation.picks {
        let name = catalog
            .asset(&pick.asset)
            .map(|info| info.name.as_str())
            .unwrap_or_else(|| pick.asset.as_str());
        match &pick.best {
            Some(p) => {
                let lockup = if p.lockup == 0 {
                    "none".to_string()
                } else {
                    format!("{} days", p.lockup)
                };
                out.push_str(&format!(
                    "{} ({}): {}  apy {}%  fee {:.1}%  lockup {}  risk {}  score {:.1}\n",
                    pick.asset,
                    name,
                    p.name,
                    p.apy,
                    p.fee * 100.0,
                    lockup,
                    p.risk_level().label(),
                    p.score.unwrap_or_default(),
                ));
            }
            None => out.push_str(&format!("{} ({}): no candidates\n", pick.asset, name)),
        }
    }
    out.push_str(&format!("\nSuggestion: {}\n", recommendation.suggestion));
    out
}

fn init_sentry(settings: &dotyield_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_selection_rejects_empty() {
        assert!(parse_selection("").is_err());
        assert!(parse_selection(" , ,").is_err());
        assert_eq!(parse_selection("dot,KSM").unwrap().len(), 2);
    }

    #[test]
    fn text_output_lists_winner_and_suggestion() {
        let catalog = Catalog::builtin();
        let selection = parse_selection("DOT").unwrap();
        let rec = dotyield_core::recommender::recommend(&catalog, &selection).unwrap();
        let text = render_text(&catalog, &rec);
        assert!(text.starts_with("DOT (Polkadot): Parallel Finance"));
        assert!(text.contains("lockup 30 days"));
        assert!(text.contains("risk Medium"));
        assert!(text.contains("score 178.0"));
        assert!(text.contains(catalog.suggestion_for_key("DOT").unwrap()));
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from(["dotyield", "--assets", "DOT,USDC", "--json"]).unwrap();
        assert_eq!(args.assets, "DOT,USDC");
        assert!(args.json);
        assert!(args.catalog.is_none());
    }
}
