use std::io::{self, Write};

use reqres::config::{parse_base_url, Config, DEFAULT_BASE_URL};
use reqres::error::Result;

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        let answer = prompt(&format!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        ))?;

        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Reqres CLI Configuration");
    println!("========================\n");

    let base_url = prompt(&format!("Enter the API base URL [{DEFAULT_BASE_URL}]: "))?;
    let base_url = if base_url.is_empty() {
        DEFAULT_BASE_URL.to_string()
    } else {
        parse_base_url(&base_url)?.to_string()
    };

    let api_key = prompt("Enter your API key (sent as x-api-key) [optional]: ")?;

    let config = Config {
        base_url: Some(base_url),
        api_key: (!api_key.is_empty()).then_some(api_key),
        ..Config::default()
    };
    let config_path = config.save()?;

    println!("\nConfig saved to {}", config_path.display());
    println!("You can now use 'reqres' commands!");

    Ok(())
}
