use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use psdsvg::{
    ConvertOptions, Converter, ImageReference, JsonDocumentParser, OutputMode,
};

/// Convert a layered document dump to SVG or HTML
#[derive(Debug, Parser)]
#[command(name = "psdsvg", version, about)]
struct Args {
    /// Layer tree dump (JSON)
    input: PathBuf,

    /// Markup file to write
    output: PathBuf,

    /// Directory for exported images [default: <OUTPUT>.files.d]
    #[arg(long, value_name = "DIR")]
    resource_dir: Option<PathBuf>,

    /// URL prefix for image references [default: resource dir relative to OUTPUT]
    #[arg(long, value_name = "URL")]
    url_base: Option<String>,

    /// Write absolutely positioned HTML instead of SVG
    #[arg(long)]
    html: bool,

    /// Reference images through background-image styles
    #[arg(long)]
    background_images: bool,
}

impl From<Args> for ConvertOptions {
    fn from(args: Args) -> Self {
        ConvertOptions {
            output_resource_dir: args.resource_dir,
            output_resource_url_base: args.url_base,
            mode: if args.html {
                OutputMode::Html
            } else {
                OutputMode::Svg
            },
            image_reference: if args.background_images {
                ImageReference::BackgroundImage
            } else {
                ImageReference::Href
            },
            ..Default::default()
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("psdsvg=info"))
        .init();

    let args = Args::parse();
    let input = args.input.clone();
    let output = args.output.clone();
    let converter = Converter::with_options(args.into());

    match converter.convert_file(&JsonDocumentParser, &input, &output) {
        Ok(conversion) => {
            log::info!(
                "Wrote {} ({} images)",
                conversion.output.display(),
                conversion.images.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("psdsvg: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::try_parse_from(["psdsvg", "in.json", "out.svg"]).unwrap();
        let options = ConvertOptions::from(args);
        assert_eq!(options.mode, OutputMode::Svg);
        assert_eq!(options.image_reference, ImageReference::Href);
        assert!(options.output_resource_dir.is_none());
        assert!(options.output_resource_url_base.is_none());
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "psdsvg",
            "in.json",
            "out.html",
            "--resource-dir",
            "assets",
            "--url-base",
            "/static",
            "--html",
            "--background-images",
        ])
        .unwrap();
        assert_eq!(args.output, PathBuf::from("out.html"));

        let options = ConvertOptions::from(args);
        assert_eq!(options.mode, OutputMode::Html);
        assert_eq!(options.image_reference, ImageReference::BackgroundImage);
        assert_eq!(options.output_resource_dir, Some(PathBuf::from("assets")));
        assert_eq!(options.output_resource_url_base.as_deref(), Some("/static"));
    }

    #[test]
    fn test_missing_output_is_rejected() {
        assert!(Args::try_parse_from(["psdsvg", "in.json"]).is_err());
    }
}
