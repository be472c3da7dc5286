//! CLI entry point for the PDFsquid client.

use std::io::{self, Read};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use pdfsquid::{ApiResponse, FormParams, ResponseFile, ZoneApi};
use tracing::{debug, info};

mod cli;

use cli::{Args, Command, ConvertArgs, OutputArgs};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(command = ?args.command, zone = %args.zone, "CLI arguments parsed");

    let mut builder = ZoneApi::builder(&args.api_key, &args.api_secret, &args.zone)
        .ssl(!args.no_ssl)
        .api_version(&args.api_version)
        .read_timeout(Duration::from_secs(args.timeout));
    if let Some(endpoint) = &args.endpoint {
        builder = builder.endpoint(endpoint);
    }
    let client = builder.build().context("failed to configure client")?;

    match args.command {
        Command::Ping => println!("{}", client.is_api_accessible().await),
        Command::AuthCheck => println!("{}", client.is_auth_correct().await),
        Command::HtmlToPdf(convert) => {
            let html = read_html(&convert.input)?;
            let params = form_params(&convert);
            if convert.queue {
                print_response(&client.html_to_pdf_async(&html, &params).await?)?;
            } else {
                save(&client.html_to_pdf(&html, &params).await?, &convert.output).await?;
            }
        }
        Command::HtmlToImg(convert) => {
            let html = read_html(&convert.input)?;
            let params = form_params(&convert);
            if convert.queue {
                print_response(&client.html_to_img_async(&html, &params).await?)?;
            } else {
                save(&client.html_to_img(&html, &params).await?, &convert.output).await?;
            }
        }
        Command::UrlToPdf(convert) => {
            let params = form_params(&convert);
            if convert.queue {
                print_response(&client.url_to_pdf_async(&convert.input, &params).await?)?;
            } else {
                save(&client.url_to_pdf(&convert.input, &params).await?, &convert.output).await?;
            }
        }
        Command::UrlToImg(convert) => {
            let params = form_params(&convert);
            if convert.queue {
                print_response(&client.url_to_img_async(&convert.input, &params).await?)?;
            } else {
                save(&client.url_to_img(&convert.input, &params).await?, &convert.output).await?;
            }
        }
        Command::GetFile(get) => {
            save(&client.get_file(&get.id).await?, &get.output).await?;
        }
    }

    Ok(())
}

fn read_html(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read HTML from stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
}

fn form_params(convert: &ConvertArgs) -> FormParams {
    convert
        .params
        .iter()
        .map(|(key, value)| (key.clone(), value.clone().into()))
        .collect()
}

async fn save(file: &ResponseFile, output: &OutputArgs) -> Result<()> {
    let path = file
        .save_file(&output.output_dir, output.name.as_deref())
        .await?;
    info!(path = %path.display(), bytes = file.len(), "saved converted file");
    println!("{}", path.display());
    Ok(())
}

fn print_response(response: &ApiResponse) -> Result<()> {
    match response {
        ApiResponse::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        ApiResponse::Text(text) => println!("{text}"),
        ApiResponse::File(file) => info!(bytes = file.len(), "unexpected file response"),
    }
    Ok(())
}
