use peta_riset::{Config, PostgresRepository, UserRepository, init_pool, run_migrations};
use tracing_subscriber::EnvFilter;

fn print_usage(bin_name: &str) {
    eprintln!("Usage: {bin_name} --email you@example.com --password yourpassword");
}

fn get_arg(args: &[String], flag: &str) -> Option<String> {
    let index = args.iter().position(|arg| arg == flag)?;
    args.get(index + 1).cloned()
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

    let args: Vec<String> = std::env::args().collect();
    let bin_name = args.first().map(String::as_str).unwrap_or("create-admin").to_string();

    let (Some(email), Some(password)) = (get_arg(&args, "--email"), get_arg(&args, "--password")) else {
        print_usage(&bin_name);
        std::process::exit(2);
    };

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

    match repo.get_user_by_email(&email).await {
        Ok(Some(_)) => {
            eprintln!("User already exists.");
            std::process::exit(1);
        }
        Ok(None) => {}
        Err(err) => {
            eprintln!("Failed to look up user: {err}");
            std::process::exit(1);
        }
    }

    match repo.create_user(&email, &password, true).await {
        Ok(user) => println!("Admin user created: {}", user.email),
        Err(err) => {
            eprintln!("Failed to create admin user: {err}");
            std::process::exit(1);
        }
    }
}
