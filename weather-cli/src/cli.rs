use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text};
use weathernow_core::{Config, GeolocationConfig, WeatherQueryController, present_now};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathernow", version, about = "Current weather for a city or your location")]
pub struct Cli {
    /// Runs the interactive lookup screen when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and geolocation mode.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "Paris" or "Paris,FR".
        #[arg(value_parser = non_blank)]
        city: String,
    },

    /// Show current weather at the device location.
    Here,
}

fn non_blank(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("city name must not be empty".to_string());
    }
    Ok(value.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            None => interactive::run(&controller()?).await,
            Some(Command::Show { city }) => {
                let controller = controller()?;
                interactive::with_pending(&controller, controller.submit_by_name(&city)).await;
                print_outcome(&controller)
            }
            Some(Command::Here) => {
                let controller = controller()?;
                interactive::with_pending(&controller, controller.submit_by_location()).await?;
                print_outcome(&controller)
            }
        }
    }
}

fn controller() -> anyhow::Result<WeatherQueryController> {
    let config = Config::load()?.with_env();
    Ok(WeatherQueryController::from_config(&config))
}

fn print_outcome(controller: &WeatherQueryController) -> anyhow::Result<()> {
    let state = controller.state();
    match &state.result {
        Some(result) => {
            println!("{}", render::weather(&present_now(result), result));
            Ok(())
        }
        None => bail!("{}", state.status_message),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("OpenWeather API key:")
        .with_default(config.api_key())
        .prompt()
        .context("API key prompt aborted")?;
    config.api_key = Some(api_key).filter(|k| !k.trim().is_empty());

    let modes = vec!["ip", "fixed", "disabled"];
    let mode = Select::new("Device location source:", modes)
        .with_help_message("ip: approximate from public IP, fixed: a set position")
        .prompt()
        .context("Geolocation prompt aborted")?;

    config.geolocation = match mode {
        "fixed" => {
            let latitude = CustomType::<f64>::new("Latitude:")
                .with_error_message("Please enter a number of degrees")
                .prompt()?;
            let longitude = CustomType::<f64>::new("Longitude:")
                .with_error_message("Please enter a number of degrees")
                .prompt()?;
            GeolocationConfig::Fixed { latitude, longitude }
        }
        "disabled" => GeolocationConfig::Disabled,
        _ => GeolocationConfig::Ip,
    };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
