use recoflow::cli::{execute, parse_args, USAGE};
use recoflow::config::AppConfig;
use recoflow::errors::AppError;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // RUST_LOG controla el nivel; los `log::` de los crates se capturan igual.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = match run(&args) {
        Ok(output) => {
            println!("{output}");
            0
        }
        Err(e) => {
            eprintln!("[recoflow] {e}");
            if matches!(e, AppError::Usage(_)) {
                eprintln!("{USAGE}");
            }
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(args: &[String]) -> Result<String, AppError> {
    let command = parse_args(args)?;
    let config = AppConfig::from_env()?;
    let output = execute(&command, &config)?;
    Ok(serde_json::to_string_pretty(&output)?)
}
