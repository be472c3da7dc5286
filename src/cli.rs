//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Convert HTML and web pages to PDF or images with a PDFsquid zone.
#[derive(Parser, Debug)]
#[command(name = "pdfsquid")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// API key of the zone
    #[arg(long, env = "PDFSQUID_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// API secret of the zone
    #[arg(long, env = "PDFSQUID_API_SECRET", hide_env_values = true)]
    pub api_secret: String,

    /// Zone identifier (the subdomain of pdfsquid.com)
    #[arg(short, long, env = "PDFSQUID_ZONE")]
    pub zone: String,

    /// Use plain HTTP instead of HTTPS
    #[arg(long)]
    pub no_ssl: bool,

    /// API version to call
    #[arg(long, default_value = "v1")]
    pub api_version: String,

    /// Base URL replacing https://{zone}.pdfsquid.com
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Read timeout in seconds (1-3600)
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the zone is reachable (prints true/false)
    Ping,

    /// Check that the credentials are accepted (prints true/false)
    AuthCheck,

    /// Convert an HTML file to PDF
    HtmlToPdf(ConvertArgs),

    /// Convert an HTML file to an image
    HtmlToImg(ConvertArgs),

    /// Render a web page to PDF
    UrlToPdf(ConvertArgs),

    /// Render a web page to an image
    UrlToImg(ConvertArgs),

    /// Download the result of an asynchronous conversion
    GetFile(GetFileArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ConvertArgs {
    /// HTML file path (html-to-*) or page URL (url-to-*); "-" reads HTML from stdin
    pub input: String,

    /// Queue the conversion and print the job description instead of waiting
    #[arg(long = "async")]
    pub queue: bool,

    /// Extra API parameter as key=value (repeatable)
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(ClapArgs, Debug)]
pub struct GetFileArgs {
    /// Conversion id returned by an asynchronous conversion
    pub id: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(ClapArgs, Debug)]
pub struct OutputArgs {
    /// Directory to save the file to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// File name without extension (defaults to the conversion id)
    #[arg(short, long)]
    pub name: Option<String>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}
