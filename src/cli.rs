use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::info;

use crate::{compact_svg, Chart, SvgTemplate, Theme, TibberClient, TIBBER_API_URL};

/// Generate SVG charts from Tibber spot prices.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Theme of the SVG.
    #[arg(long, value_enum, default_value_t = Theme::Dark)]
    pub theme: Theme,

    /// Tibber access token.
    #[arg(long, env = "TIBBER_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Jinja template the chart is rendered with.
    #[arg(long, default_value = "template.svg.jinja2")]
    pub template: PathBuf,

    /// Write today.svg and tomorrow.svg instead of printing today's chart.
    #[arg(long)]
    pub split: bool,

    /// Directory the split charts are written to.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// GraphQL endpoint of the Tibber API.
    #[arg(long, env = "TIBBER_API_URL", default_value = TIBBER_API_URL)]
    pub api_url: String,
}

pub async fn run(cli: &Cli) -> Result<()> {
    run_with_output(cli, &mut std::io::stdout()).await
}

/// Like [`run`], printing the single chart to `stdout`.
pub async fn run_with_output(cli: &Cli, stdout: &mut impl Write) -> Result<()> {
    let template = SvgTemplate::from_path(&cli.template)
        .with_context(|| format!("loading template {}", cli.template.display()))?;

    let info = TibberClient::with_endpoint(&cli.api_url, &cli.access_token)
        .fetch_price_info()
        .await
        .context("fetching prices failed")?;

    let now = Utc::now();
    let chart = Chart {
        theme: cli.theme,
        ..Chart::default()
    };
    let today = compact_svg(&chart.render(&template, &info.today, &info.current, now)?)?;

    if cli.split {
        let tomorrow = Chart {
            show_now: false,
            ..chart
        }
        .render(&template, &info.tomorrow, &info.current, now)?;
        let tomorrow = compact_svg(&tomorrow)?;

        // both charts are rendered before the first file is touched
        write_svg(&cli.out_dir.join("today.svg"), &today)?;
        write_svg(&cli.out_dir.join("tomorrow.svg"), &tomorrow)?;
    } else {
        writeln!(stdout, "{today}").context("writing chart to stdout")?;
    }

    Ok(())
}

fn write_svg(path: &Path, svg: &str) -> Result<()> {
    std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "wrote chart");

    Ok(())
}
