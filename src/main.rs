//! geargen - involute gear solids from the command line
//!
//! Builds one gear and writes it to the file given by `-o`; the extension picks
//! the format (`.stl`, `.dxf`).

use anyhow::{Context, Result};
use clap::Parser;
use geargen::composer::{
    DEFAULT_FLAT_PART_COEFF, DEFAULT_HELIX_ANGLE, DEFAULT_SHAFT_ANGLE, GearRequest, GearType,
    SolidComposer,
};
use geargen::float_types::Real;
use geargen::gear::DEFAULT_PRESSURE_ANGLE;
use geargen::io::export_mesh;
use geargen::kernel::CsgKernel;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "geargen")]
#[command(about = "Generate involute gear solids", long_about = None)]
struct Cli {
    /// Output file (format determined by extension: .stl, .dxf)
    #[arg(short, long)]
    output: PathBuf,

    /// Gear module
    #[arg(short, long)]
    module: Real,

    /// Number of teeth
    #[arg(short = 'n', long)]
    teeth: usize,

    /// Face width
    #[arg(short, long)]
    width: Real,

    /// Root fillet radius
    #[arg(long)]
    root_fillet: Option<Real>,

    /// Pressure angle in degrees
    #[arg(long, default_value_t = DEFAULT_PRESSURE_ANGLE)]
    pressure_angle: Real,

    /// Helix angle in degrees (helical and herringbone gears)
    #[arg(short = 'a', long, default_value_t = DEFAULT_HELIX_ANGLE)]
    helix_angle: Real,

    /// Module and pressure angle are measured in the normal plane of the teeth
    #[arg(long)]
    normal: bool,

    /// spur, helical, herringbone, internal, internal_helical, internal_herringbone or bevel
    #[arg(short = 't', long = "type", default_value = "spur")]
    gear_type: String,

    /// Outer diameter of internal gears
    #[arg(long)]
    outer_diameter: Option<Real>,

    /// Teeth of the mating bevel gear
    #[arg(long)]
    counterpart_teeth: Option<usize>,

    /// Angle between the bevel gear shafts in degrees
    #[arg(long, default_value_t = DEFAULT_SHAFT_ANGLE)]
    shaft_angle: Real,

    /// Share of the pitch radius left flat on bevel gear faces
    #[arg(long, default_value_t = DEFAULT_FLAT_PART_COEFF)]
    flat_part_coeff: Real,

    /// Write ASCII instead of binary STL
    #[arg(long)]
    ascii: bool,

    /// Log every kernel call
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn request(&self) -> Result<GearRequest> {
        let gear_type: GearType = self.gear_type.parse()?;
        let mut request = GearRequest::new(gear_type, self.module, self.teeth, self.width)
            .with_pressure_angle(self.pressure_angle)
            .with_helix_angle(self.helix_angle)
            .with_normal_module(self.normal)
            .with_shaft_angle(self.shaft_angle)
            .with_flat_part_coeff(self.flat_part_coeff);
        if let Some(radius) = self.root_fillet {
            request = request.with_root_fillet(radius);
        }
        if let Some(diameter) = self.outer_diameter {
            request = request.with_outer_diameter(diameter);
        }
        if let Some(teeth) = self.counterpart_teeth {
            request = request.with_counterpart_teeth(teeth);
        }
        Ok(request)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let request = cli.request()?;
    let gear = SolidComposer::new(CsgKernel::default())
        .compose(&request)
        .with_context(|| format!("building {} gear", request.gear_type))?;
    export_mesh(&gear, &cli.output, cli.ascii)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        },
    }
}
