// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Command-line interface for the contributor mosaic service.
//!
//! `serve` runs the HTTP API, `render` writes PNG/SVG artifacts for a single
//! repository, and `layout` prints the grid geometry for a contributor count.

use std::{
    io,
    path::{Path, PathBuf},
    process,
    sync::Arc,
};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use contributor_mosaic::{
    AppState, ConfigOverrides, ContributorSource, DEFAULT_AVATAR_DIAMETER, Error, FontSet,
    GitHubSource, HttpAvatarLoader, ImageFormat, LayoutGeometry, RasterRenderer, RenderStyle, RenderedImage,
    RepositoryRef, ServiceConfig, build_router, compute_layout, render_vector, write_artifact,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line interface of the contributor mosaic service.
#[derive(Debug, Parser,)]
#[command(name = "contributor-mosaic", version, about = "Render GitHub contributors as image mosaics")]
struct Cli
{
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Default,)]
struct GlobalArgs
{
    /// Optional YAML configuration file.
    #[arg(long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf,>,

    /// GitHub token used for API requests.
    #[arg(long = "github-token", env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    github_token: Option<String,>,

    /// Public host of the deployment, used in embed snippets.
    #[arg(long = "deploy-url", env = "DEPLOY_URL", global = true)]
    deploy_url: Option<String,>,

    /// Font file used for PNG text instead of the system fonts.
    #[arg(long = "font", value_name = "PATH", global = true)]
    font: Option<PathBuf,>,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Run the HTTP API.
    Serve(ServeArgs,),
    /// Render a repository's mosaic to files.
    Render(RenderArgs,),
    /// Print the grid geometry for a contributor count as JSON.
    Layout(LayoutArgs,),
}

#[derive(Debug, Args,)]
struct ServeArgs
{
    /// Socket address to listen on.
    #[arg(long = "bind", env = "CONTRIB_BIND", value_name = "ADDR")]
    bind: Option<String,>,
}

#[derive(Debug, Args,)]
struct RenderArgs
{
    /// Repository owner.
    #[arg(long = "owner")]
    owner: String,

    /// Repository name.
    #[arg(long = "repo")]
    repo: String,

    /// Output encoding.
    #[arg(long = "format", value_enum, default_value_t = ArtifactFormat::Png)]
    format: ArtifactFormat,

    /// Directory receiving `{owner}-{repo}.{png,svg}`.
    #[arg(long = "output", value_name = "DIR", default_value = ".")]
    output: PathBuf,
}

#[derive(Debug, Args,)]
struct LayoutArgs
{
    /// Number of contributors to lay out.
    #[arg(long = "count")]
    count: usize,

    /// Avatar diameter in pixels.
    #[arg(
        long = "diameter",
        default_value_t = DEFAULT_AVATAR_DIAMETER,
        value_parser = clap::value_parser!(u32).range(1..=512)
    )]
    diameter: u32,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

/// Artifact encodings accepted by `render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum,)]
enum ArtifactFormat
{
    Png,
    Svg,
    Both,
}

impl ArtifactFormat
{
    fn formats(self,) -> &'static [ImageFormat]
    {
        match self {
            Self::Png => &[ImageFormat::Png],
            Self::Svg => &[ImageFormat::Svg],
            Self::Both => &[ImageFormat::Png, ImageFormat::Svg],
        }
    }
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    init_tracing();

    if let Err(error,) = run(Cli::parse(),).await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_tracing()
{
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,contributor_mosaic=debug".into(),),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr,),)
        .init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates configuration, upstream, render and I/O errors.
async fn run(cli: Cli,) -> Result<(), Error,>
{
    match cli.command {
        Command::Serve(args,) => {
            let config = resolve_config(&cli.global, args.bind,)?;
            run_serve(config,).await
        }
        Command::Render(args,) => {
            let config = resolve_config(&cli.global, None,)?;
            run_render(config, args,).await
        }
        Command::Layout(args,) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_layout(&mut handle, &compute_layout(args.count, args.diameter,), args.pretty,)
        }
    }
}

fn resolve_config(global: &GlobalArgs, bind: Option<String,>,) -> Result<ServiceConfig, Error,>
{
    ServiceConfig::resolve(global.config.as_deref(), ConfigOverrides {
        bind,
        github_token: global.github_token.clone(),
        deploy_url: global.deploy_url.clone(),
        font_path: global.font.clone(),
    },)
}

fn load_fonts(font_path: Option<&Path,>,) -> Result<FontSet, Error,>
{
    match font_path {
        Some(path,) => FontSet::from_file(path,),
        None => Ok(FontSet::system(),),
    }
}

async fn run_serve(config: ServiceConfig,) -> Result<(), Error,>
{
    let source = GitHubSource::new(config.github_token.as_deref(), config.request_timeout(),)?;
    let loader = HttpAvatarLoader::new(config.avatar_timeout(),)?;
    let fonts = load_fonts(config.font_path.as_deref(),)?;
    if config.github_token.is_none() {
        warn!("GITHUB_TOKEN is not set; GitHub requests use the anonymous rate limit");
    }

    let state =
        AppState::new(Arc::new(source,), Arc::new(loader,), fonts, config.deploy_url.as_deref(),);
    let app = build_router(state,);

    let server_error = |source: io::Error| Error::Server {
        address: config.bind.clone(),
        source,
    };
    let listener = tokio::net::TcpListener::bind(&config.bind,).await.map_err(server_error,)?;

    info!("Contributor mosaic listening on {}", config.bind);
    info!("  - GET  /api/contributors/image");
    info!("  - POST /api/contributors");
    info!("  - GET  /health");

    axum::serve(listener, app,)
        .with_graceful_shutdown(shutdown_signal(),)
        .await
        .map_err(server_error,)
}

async fn shutdown_signal()
{
    if let Err(error,) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", error);
        std::future::pending::<(),>().await;
    }
    info!("Shutdown signal received");
}

async fn run_render(config: ServiceConfig, args: RenderArgs,) -> Result<(), Error,>
{
    let repository = RepositoryRef::new(&args.owner, &args.repo,)?;
    let source = GitHubSource::new(config.github_token.as_deref(), config.request_timeout(),)?;
    let contributors = source.fetch_contributors(&repository,).await?;

    let title = repository.title();
    let style = RenderStyle::badge();
    let mut locations = Vec::new();

    for format in args.format.formats() {
        let image = match format {
            ImageFormat::Png => {
                let loader = HttpAvatarLoader::new(config.avatar_timeout(),)?;
                let fonts = load_fonts(config.font_path.as_deref(),)?;
                let renderer = RasterRenderer::new(Arc::new(loader,), fonts,);
                RenderedImage::Png(renderer.render(&contributors, &title, &style,).await?,)
            }
            ImageFormat::Svg => RenderedImage::Svg(render_vector(&contributors, &title, &style,),),
        };
        locations.push(write_artifact(&args.output, &repository, image,)?,);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &locations,)?;

    Ok((),)
}

fn write_layout<W: io::Write,>(
    writer: &mut W,
    layout: &LayoutGeometry,
    pretty: bool,
) -> Result<(), Error,>
{
    if pretty {
        serde_json::to_writer_pretty(writer, layout,)?;
    } else {
        serde_json::to_writer(writer, layout,)?;
    }

    Ok((),)
}

#[cfg(test)]
mod tests
{
    use std::{fs, io::Cursor};

    use clap::Parser;
    use contributor_mosaic::{DEFAULT_BIND, ImageFormat, compute_layout};
    use tempfile::tempdir;

    use super::{ArtifactFormat, Cli, Command, GlobalArgs, resolve_config, write_layout};

    #[test]
    fn render_subcommand_uses_png_and_current_directory_by_default()
    {
        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "render",
            "--owner",
            "acme",
            "--repo",
            "widgets",
        ],)
        .expect("failed to parse CLI",);

        let args = match cli.command {
            Command::Render(args,) => args,
            other => panic!("unexpected command variant: {other:?}"),
        };
        assert_eq!(args.owner, "acme");
        assert_eq!(args.repo, "widgets");
        assert_eq!(args.format, ArtifactFormat::Png);
        assert_eq!(args.output, std::path::PathBuf::from("."));
    }

    #[test]
    fn both_format_expands_to_png_and_svg()
    {
        assert_eq!(ArtifactFormat::Both.formats(), &[ImageFormat::Png, ImageFormat::Svg]);
        assert_eq!(ArtifactFormat::Svg.formats(), &[ImageFormat::Svg]);
    }

    #[test]
    fn global_options_are_accepted_after_subcommand()
    {
        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "layout",
            "--count",
            "7",
            "--config",
            "mosaic.yaml",
        ],)
        .expect("failed to parse CLI",);

        assert_eq!(cli.global.config.as_deref(), Some(std::path::Path::new("mosaic.yaml")));
        assert!(matches!(cli.command, Command::Layout(ref args) if args.count == 7));
    }

    #[test]
    fn layout_diameter_outside_supported_range_is_rejected()
    {
        for diameter in ["0", "513", "4294967295"] {
            let result = Cli::try_parse_from([
                env!("CARGO_PKG_NAME"),
                "layout",
                "--count",
                "30",
                "--diameter",
                diameter,
            ],);
            assert!(result.is_err(), "diameter {diameter} should be rejected");
        }

        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "layout",
            "--count",
            "30",
            "--diameter",
            "512",
        ],)
        .expect("failed to parse CLI",);
        assert!(matches!(cli.command, Command::Layout(ref args) if args.diameter == 512));
    }

    #[test]
    fn layout_writer_emits_compact_and_pretty_json()
    {
        let layout = compute_layout(30, 60,);

        let mut buffer = Cursor::new(Vec::new(),);
        write_layout(&mut buffer, &layout, false,).expect("failed to serialize layout",);
        let output = String::from_utf8(buffer.into_inner(),).expect("invalid UTF-8",);
        assert!(output.starts_with("{\"canvas_width\":945,\"canvas_height\":330"));
        assert!(output.contains("\"columns_per_row\":12,\"row_count\":3"));

        let mut buffer = Cursor::new(Vec::new(),);
        write_layout(&mut buffer, &layout, true,).expect("failed to serialize layout",);
        let output = String::from_utf8(buffer.into_inner(),).expect("invalid UTF-8",);
        assert!(output.contains("\n  \"row_count\": 3"));
    }

    #[test]
    fn config_file_values_are_overridden_by_flags()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let config_path = temp.path().join("mosaic.yaml",);
        fs::write(&config_path, "bind: 127.0.0.1:8080\ndeploy_url: file.example.com\n",)
            .expect("failed to write config",);

        let global = GlobalArgs {
            config: Some(config_path,),
            deploy_url: Some("cli.example.com".to_owned(),),
            ..GlobalArgs::default()
        };

        let config = resolve_config(&global, None,).expect("config should resolve",);
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.deploy_url.as_deref(), Some("cli.example.com"));

        let config = resolve_config(&GlobalArgs::default(), Some("0.0.0.0:9999".to_owned(),),)
            .expect("config should resolve",);
        assert_ne!(config.bind, DEFAULT_BIND);
    }
}
