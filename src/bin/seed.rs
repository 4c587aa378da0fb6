use peta_riset::{Config, PostgresRepository, init_pool, run_migrations, seed_researches};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_CSV_PATH: &str = "static/Data Web Hanif - Sheet1.csv";

fn print_usage(bin_name: &str) {
    eprintln!("Usage: {bin_name} [path/to/data.csv]");
}

fn init_tracing(log_level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    if json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let mut args = std::env::args();
    let bin_name = args.next().unwrap_or_else(|| "seed".to_string());
    let csv_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_CSV_PATH.to_string()));

    if args.next().is_some() {
        print_usage(&bin_name);
        std::process::exit(2);
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {err}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level, config.logging.json_format);

    let pool = match init_pool(&config.database) {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("Failed to open database pool: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run_migrations(&pool).await {
        eprintln!("Failed to run migrations: {err}");
        std::process::exit(1);
    }

    let repo = PostgresRepository::new(pool);
    match seed_researches(&repo, &csv_path).await {
        Ok(summary) => {
            println!(
                "Seed completed: rows_parsed={}, rows_inserted={}",
                summary.rows_parsed, summary.rows_inserted
            );
        }
        Err(err) => {
            eprintln!("Seed failed: {err}");
            std::process::exit(1);
        }
    }
}
