//! Coinage command line.
//!
//! Answers currency, rounding, conversion and format lookups from the
//! built-in providers plus the rate table in `config/`.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coinage_core::bootstrap::StaticDiscovery;
use coinage_core::providers::ConfiguredRateProvider;
use coinage_core::spi::{ExchangeRateProvider, ProviderRecord};
use coinage_core::{
    AmountFormatQuery, ConversionQuery, Conversions, Currencies, Formats, Registry, RoundingQuery,
    Roundings,
};
use coinage_shared::AppConfig;
use coinage_shared::types::{CurrencyUnit, Locale, Money, RateType};

#[derive(Parser)]
#[command(name = "coinage")]
#[command(about = "Currency, rounding, conversion and format lookups", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered providers and default chains
    Providers,

    /// Resolve a single currency by code or locale
    Currency {
        /// ISO code (e.g. CHF)
        code: Option<String>,

        /// Locale such as de_CH, used when no code is given
        #[arg(short, long)]
        locale: Option<Locale>,

        /// Explicit provider chain, comma separated
        #[arg(short, long, value_delimiter = ',')]
        providers: Vec<String>,
    },

    /// List currencies, optionally for one locale
    Currencies {
        /// Only currencies used in this locale
        #[arg(short, long)]
        locale: Option<Locale>,

        /// Explicit provider chain, comma separated
        #[arg(short, long, value_delimiter = ',')]
        providers: Vec<String>,
    },

    /// Round an amount
    Round {
        /// Amount, e.g. 12.345
        amount: Decimal,

        /// Currency code
        currency: String,

        /// Named rounding (e.g. bankers, half-up)
        #[arg(short, long)]
        name: Option<String>,

        /// Target scale
        #[arg(short, long)]
        scale: Option<u32>,

        /// Explicit provider chain, comma separated
        #[arg(short, long, value_delimiter = ',')]
        providers: Vec<String>,
    },

    /// Convert an amount into another currency
    Convert {
        /// Amount, e.g. 100
        amount: Decimal,

        /// Base currency code
        from: String,

        /// Term currency code
        to: String,

        /// Restrict to one rate type (historic, realtime, deferred, other)
        #[arg(short, long)]
        rate_type: Option<RateType>,

        /// Explicit provider chain, comma separated
        #[arg(short, long, value_delimiter = ',')]
        providers: Vec<String>,
    },

    /// Render an amount
    Format {
        /// Amount, e.g. 1234.5
        amount: Decimal,

        /// Currency code
        currency: String,

        /// Locale such as de_CH
        #[arg(short, long)]
        locale: Option<Locale>,

        /// Format name
        #[arg(short, long)]
        name: Option<String>,

        /// Explicit provider chain, comma separated
        #[arg(short, long, value_delimiter = ',')]
        providers: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let facility = build_facility(&config);
    info!(
        records = facility.records().len(),
        disabled = ?config.registry.disabled_providers,
        "Provider facility assembled"
    );
    Registry::global().install(Arc::new(facility));

    run(Cli::parse().command)
}

/// Built-in providers plus the configured rate table, minus disabled names.
fn build_facility(config: &AppConfig) -> StaticDiscovery {
    let mut facility = StaticDiscovery::builtin();
    let rates = ConfiguredRateProvider::from_config(&config.rates);
    if !rates.is_empty() {
        facility = facility.with_record(ProviderRecord::provider::<dyn ExchangeRateProvider>(
            Arc::new(rates),
        ));
    }
    facility.without_providers(&config.registry.disabled_providers)
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Providers => {
            println!("facility: {}", Registry::global().facility_name());
            print_chain("currency", &Currencies::global().default_chain());
            print_chain("rounding", &Roundings::global().default_chain());
            print_chain("conversion", &Conversions::global().default_chain());
            print_chain("format", &Formats::global().default_chain());
        }
        Commands::Currency {
            code,
            locale,
            providers,
        } => {
            let currencies = Currencies::global();
            let chain = names(&providers);
            let unit = match (code, locale) {
                (Some(code), _) => currencies.currency(&code, &chain)?,
                (None, Some(locale)) => currencies.currency_for_locale(&locale, &chain)?,
                (None, None) => anyhow::bail!("either a currency code or --locale is required"),
            };
            print_unit(&unit);
        }
        Commands::Currencies { locale, providers } => {
            let currencies = Currencies::global();
            let chain = names(&providers);
            let units = match locale {
                Some(locale) => currencies.currencies_for_locale(&locale, &chain),
                None => currencies.all_currencies(&chain),
            };
            for unit in &units {
                print_unit(unit);
            }
        }
        Commands::Round {
            amount,
            currency,
            name,
            scale,
            providers,
        } => {
            let unit = lookup_currency(&currency)?;
            let mut query = RoundingQuery::builder()
                .currency(unit.clone())
                .provider_names(providers);
            if let Some(name) = name {
                query = query.rounding_name(name);
            }
            if let Some(scale) = scale {
                query = query.scale(scale);
            }
            let query = query.build();
            let rounding = Roundings::global()
                .rounding(&query)
                .with_context(|| format!("No rounding for {query}"))?;
            let rounded = rounding.apply(&Money::new(amount, unit));
            println!("{rounded} ({})", rounding.context.rounding_name);
        }
        Commands::Convert {
            amount,
            from,
            to,
            rate_type,
            providers,
        } => {
            let base = lookup_currency(&from)?;
            let term = lookup_currency(&to)?;
            let mut query = ConversionQuery::builder()
                .term_currency(term)
                .provider_names(providers);
            if let Some(rate_type) = rate_type {
                query = query.rate_types([rate_type]);
            }
            let conversion = Conversions::global().conversion(&query.build())?;
            let rate = conversion.exchange_rate(&base)?;
            let converted = rate.convert(&Money::new(amount, base));
            println!(
                "{converted} (rate {} via {})",
                rate.factor.normalize(),
                rate.context.provider.as_deref().unwrap_or("unknown")
            );
        }
        Commands::Format {
            amount,
            currency,
            locale,
            name,
            providers,
        } => {
            let unit = lookup_currency(&currency)?;
            let mut query = AmountFormatQuery::builder().provider_names(providers);
            if let Some(locale) = locale {
                query = query.locale(locale);
            }
            if let Some(name) = name {
                query = query.format_name(name);
            }
            let format = Formats::global().amount_format(&query.build())?;
            println!("{}", format.format(&Money::new(amount, unit)));
        }
    }
    Ok(())
}

fn lookup_currency(code: &str) -> anyhow::Result<CurrencyUnit> {
    Currencies::global()
        .currency(code, &[])
        .with_context(|| format!("Cannot resolve currency {code}"))
}

fn names(providers: &[String]) -> Vec<&str> {
    providers.iter().map(String::as_str).collect()
}

fn print_chain(domain: &str, chain: &[String]) {
    println!("{domain:<10} {}", chain.join(", "));
}

fn print_unit(unit: &CurrencyUnit) {
    let numeric = unit
        .numeric_code()
        .map_or_else(|| "---".to_string(), |n| format!("{n:03}"));
    println!(
        "{} {numeric} digits={} provider={}",
        unit.code(),
        unit.default_fraction_digits(),
        unit.provider()
    );
}
