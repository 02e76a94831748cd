//! jetpack-sample - Name form backed by bindings
//!
//! Labels, hints, paddings and colors come from a resource table; the entered
//! names live in the default preference store and survive between runs when a
//! preferences directory is configured.

use anyhow::{Context, Result};
use clap::Parser;
use jetpack_core::config::Config;
use jetpack_core::{BindingOptions, Optional, Required};
use jetpack_preferences::{bind_preference, PreferenceManager, PreferencesSource};
use jetpack_resources::{
    bind_color_resource, bind_dimension_pixel_size_resource, bind_dimension_resource, bind_string_resource,
    ResourceId, ResourceVal, Resources,
};
use jetpack_telemetry::TelemetryConfig;
use tracing::{debug, info};

const SAMPLE_TABLE: &str = include_str!("../res/sample.toml");

const FIRST_NAME_LABEL: ResourceId = ResourceId(0x7f01_0001);
const FIRST_NAME_HINT: ResourceId = ResourceId(0x7f01_0002);
const LAST_NAME_LABEL: ResourceId = ResourceId(0x7f01_0003);
const LAST_NAME_HINT: ResourceId = ResourceId(0x7f01_0004);
const PADDING_TINY: ResourceId = ResourceId(0x7f02_0001);
const PADDING_SMALL: ResourceId = ResourceId(0x7f02_0002);
const PADDING_LARGE: ResourceId = ResourceId(0x7f02_0003);
const FONT_SMALL: ResourceId = ResourceId(0x7f02_0004);
const FONT_NORMAL: ResourceId = ResourceId(0x7f02_0005);
const COLOR_PRIMARY: ResourceId = ResourceId(0x7f03_0001);
const COLOR_HINT: ResourceId = ResourceId(0x7f03_0002);

#[derive(Parser)]
#[command(name = "jetpack-sample")]
#[command(about = "Name form backed by preference and resource bindings")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to jetpack.toml discovery)
    #[arg(short, long, env = "JETPACK_CONFIG")]
    config: Option<String>,

    /// Store a new first name
    #[arg(long)]
    first_name: Option<String>,

    /// Store a new last name
    #[arg(long)]
    last_name: Option<String>,

    /// Forget both stored names
    #[arg(long, conflicts_with_all = ["first_name", "last_name"])]
    reset: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Everything the form displays, bound once
struct NameForm {
    first_name: Optional<String, PreferencesSource>,
    last_name: Optional<String, PreferencesSource>,
    visits: Required<i32, PreferencesSource>,

    first_name_label: ResourceVal<String>,
    first_name_hint: ResourceVal<String>,
    last_name_label: ResourceVal<String>,
    last_name_hint: ResourceVal<String>,

    padding_tiny: ResourceVal<i32>,
    padding_small: ResourceVal<i32>,
    padding_large: ResourceVal<i32>,
    font_small: ResourceVal<f32>,
    font_normal: ResourceVal<f32>,
    color_primary: ResourceVal<u32>,
    color_hint: ResourceVal<u32>,
}

impl NameForm {
    /// Preference bindings follow `options`, so `[bindings]` decides whether defaults get written
    fn bind(manager: &PreferenceManager, resources: &Resources, options: BindingOptions) -> Result<Self> {
        Ok(Self {
            first_name: bind_preference(manager.clone(), "first_name").options(options).optional()?,
            last_name: bind_preference(manager.clone(), "last_name").options(options).optional()?,
            visits: bind_preference(manager.clone(), "visits")
                .options(options)
                .with_default(0)
                .required()?,

            first_name_label: bind_string_resource(resources.clone(), FIRST_NAME_LABEL),
            first_name_hint: bind_string_resource(resources.clone(), FIRST_NAME_HINT),
            last_name_label: bind_string_resource(resources.clone(), LAST_NAME_LABEL),
            last_name_hint: bind_string_resource(resources.clone(), LAST_NAME_HINT),

            padding_tiny: bind_dimension_pixel_size_resource(resources.clone(), PADDING_TINY),
            padding_small: bind_dimension_pixel_size_resource(resources.clone(), PADDING_SMALL),
            padding_large: bind_dimension_pixel_size_resource(resources.clone(), PADDING_LARGE),
            font_small: bind_dimension_resource(resources.clone(), FONT_SMALL),
            font_normal: bind_dimension_resource(resources.clone(), FONT_NORMAL),
            color_primary: bind_color_resource(resources.clone(), COLOR_PRIMARY),
            color_hint: bind_color_resource(resources.clone(), COLOR_HINT),
        })
    }

    /// The "done" action: store whatever was entered
    fn submit(&self, first_name: Option<String>, last_name: Option<String>) -> Result<()> {
        if let Some(value) = first_name {
            self.first_name.set(Some(value))?;
        }
        if let Some(value) = last_name {
            self.last_name.set(Some(value))?;
        }
        Ok(())
    }

    fn visit(&self) -> Result<i32> {
        let visits = self.visits.get()? + 1;
        self.visits.set(visits)?;
        Ok(visits)
    }

    fn reset(&self) -> Result<()> {
        self.first_name.remove()?;
        self.last_name.remove()?;
        Ok(())
    }

    fn render(&self) -> Result<String> {
        let indent = " ".repeat(usize::try_from(self.padding_large.get()?).unwrap_or(0) / 4);
        let field = |label: &ResourceVal<String>, hint: &ResourceVal<String>, value: Option<String>| -> Result<String> {
            let shown = match value {
                Some(value) if !value.is_empty() => value,
                _ => format!("<{}>", hint.get()?),
            };
            Ok(format!("{indent}{}: {shown}", label.get()?))
        };

        let mut lines = vec![
            field(&self.first_name_label, &self.first_name_hint, self.first_name.get()?)?,
            field(&self.last_name_label, &self.last_name_hint, self.last_name.get()?)?,
        ];
        lines.push(format!("{indent}Visits: {}", self.visits.get()?));
        lines.push(format!(
            "{indent}(padding {}/{}/{}px, fonts {:.1}/{:.1}px, primary #{:08x}, hint #{:08x})",
            self.padding_tiny.get()?,
            self.padding_small.get()?,
            self.padding_large.get()?,
            self.font_small.get()?,
            self.font_normal.get()?,
            self.color_primary.get()?,
            self.color_hint.get()?,
        ));
        Ok(lines.join("\n"))
    }
}

fn load_resources(config: &Config) -> Result<Resources> {
    let resources = &config.schema.resources;
    if resources.table.is_some() {
        return Resources::from_config(resources).context("Failed to load resource table");
    }

    debug!("No resource table configured, using the bundled sample table");
    Ok(Resources::from_toml_str(SAMPLE_TABLE)?.with_density(resources.density, resources.scaled_density))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let mut telemetry = TelemetryConfig::from(&config.schema.logging);
    if cli.verbose {
        telemetry.log_level = "debug".to_string();
    }
    jetpack_telemetry::init_with_config(telemetry)?;

    if let Some(path) = &config.path {
        info!(path = %path, "Using configuration file");
    }

    let manager = PreferenceManager::from_config(&config.schema.preferences);
    let resources = load_resources(&config)?;
    let form = NameForm::bind(&manager, &resources, BindingOptions::from_config(&config.schema.bindings))?;

    if cli.reset {
        form.reset()?;
        info!("Stored names removed");
    } else if cli.first_name.is_some() || cli.last_name.is_some() {
        form.submit(cli.first_name, cli.last_name)?;
        info!("Stored names updated");
    }

    let visits = form.visit()?;
    debug!(visits, "Visit recorded");

    println!("{}", form.render()?);
    Ok(())
}
